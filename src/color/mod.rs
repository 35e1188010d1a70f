//! Pure color-space conversions and the fallback naming palette.

mod conversion;
/// Exact-match hex to human-readable name lookup.
pub mod palette;

pub use conversion::{Hsv, Rgb, format_hex, format_hsv, format_rgb, hex_to_rgb, rgb_to_hsv};
pub use palette::Palette;
