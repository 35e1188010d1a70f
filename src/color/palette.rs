use indexmap::IndexMap;

/// Name returned when a hex value has no palette entry.
pub const UNKNOWN_COLOR: &str = "Unknown Color";

/// Fixed exact-match palette mapping canonical hex values to readable names.
///
/// This is intentionally coarse: it names locally-derived fallback colors only.
/// Classifier results carry their own names and never consult the palette.
#[derive(Debug, Clone)]
pub struct Palette {
    entries: IndexMap<String, String>,
}

impl Palette {
    /// Build a palette from `(hex, name)` pairs, canonicalising hex keys to
    /// the uppercase `#RRGGBB` form.
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, S)>,
        S: Into<String>,
    {
        let entries = entries
            .into_iter()
            .map(|(hex, name)| (canonical_key(&hex.into()), name.into()))
            .collect();
        Self { entries }
    }

    /// Look up the readable name for a hex value, `"Unknown Color"` on miss.
    pub fn name_of(&self, hex: &str) -> &str {
        self.entries
            .get(&canonical_key(hex))
            .map(String::as_str)
            .unwrap_or(UNKNOWN_COLOR)
    }

    /// Number of entries in the palette.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the palette holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for Palette {
    /// The built-in ten-entry palette: primary/secondary colors plus
    /// black, white, brown, and pink.
    fn default() -> Self {
        Self::new([
            ("#FF0000", "Red"),
            ("#00FF00", "Green"),
            ("#0000FF", "Blue"),
            ("#FFFF00", "Yellow"),
            ("#FFA500", "Orange"),
            ("#800080", "Purple"),
            ("#FFC0CB", "Pink"),
            ("#A52A2A", "Brown"),
            ("#000000", "Black"),
            ("#FFFFFF", "White"),
        ])
    }
}

fn canonical_key(hex: &str) -> String {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    format!("#{}", digits.to_ascii_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_palette_has_ten_entries() {
        assert_eq!(Palette::default().len(), 10);
    }

    #[test]
    fn exact_match_returns_name() {
        let palette = Palette::default();
        assert_eq!(palette.name_of("#FF0000"), "Red");
        assert_eq!(palette.name_of("#FFC0CB"), "Pink");
    }

    #[test]
    fn lookup_is_case_and_prefix_insensitive() {
        let palette = Palette::default();
        assert_eq!(palette.name_of("ff0000"), "Red");
        assert_eq!(palette.name_of("#ffa500"), "Orange");
    }

    #[test]
    fn miss_returns_unknown_color() {
        let palette = Palette::default();
        assert_eq!(palette.name_of("#C01C80"), UNKNOWN_COLOR);
    }
}
