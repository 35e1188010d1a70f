/// An RGB triple with 8-bit channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

/// An HSV triple with integer components: hue in degrees within `[0, 360)`,
/// saturation and value as percents within `[0, 100]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hsv {
    /// Hue in degrees.
    pub h: u16,
    /// Saturation percent.
    pub s: u8,
    /// Value percent.
    pub v: u8,
}

/// Convert an RGB triple to integer HSV using the standard 6-sector formula.
///
/// Hue is rounded to the nearest degree and wrapped into `[0, 360)`; saturation
/// and value are rounded to integer percents. Saturation is zero for black.
pub fn rgb_to_hsv(r: u8, g: u8, b: u8) -> Hsv {
    let r = f64::from(r) / 255.0;
    let g = f64::from(g) / 255.0;
    let b = f64::from(b) / 255.0;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;

    let sector = if delta == 0.0 {
        0.0
    } else if max == r {
        ((g - b) / delta) % 6.0
    } else if max == g {
        (b - r) / delta + 2.0
    } else {
        (r - g) / delta + 4.0
    };

    let hue = ((sector * 60.0).round() as i32).rem_euclid(360);
    let saturation = if max == 0.0 { 0.0 } else { delta / max };

    Hsv {
        h: hue as u16,
        s: (saturation * 100.0).round() as u8,
        v: (max * 100.0).round() as u8,
    }
}

/// Parse a 6-hex-digit color string (optional `#` prefix, case-insensitive).
///
/// Returns black on any mismatch; this is a silent fallback, not an error.
pub fn hex_to_rgb(hex: &str) -> Rgb {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Rgb { r: 0, g: 0, b: 0 };
    }

    // Length and digit checks above make these parses infallible.
    let channel = |range: std::ops::Range<usize>| {
        u8::from_str_radix(&digits[range], 16).unwrap_or_default()
    };

    Rgb {
        r: channel(0..2),
        g: channel(2..4),
        b: channel(4..6),
    }
}

/// Format an RGB triple as the canonical uppercase `#RRGGBB` string.
pub fn format_hex(r: u8, g: u8, b: u8) -> String {
    format!("#{r:02X}{g:02X}{b:02X}")
}

/// Format an RGB triple for display, e.g. `(192, 28, 128)`.
pub fn format_rgb(r: u8, g: u8, b: u8) -> String {
    format!("({r}, {g}, {b})")
}

/// Format an HSV triple for display, e.g. `(327°, 85%, 75%)`.
pub fn format_hsv(hsv: Hsv) -> String {
    format!("({}°, {}%, {}%)", hsv.h, hsv.s, hsv.v)
}
