use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    bridge::classifier::Prediction,
    color::{format_hex, format_hsv, format_rgb, rgb_to_hsv},
};

/// A resolved color as shown and narrated to the user.
///
/// For locally-derived results the `hex`/`rgb`/`hsv` fields are mutually
/// consistent encodings of the same color. Classifier-origin results keep the
/// collaborator's fields verbatim and are never re-derived.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DetectedColor {
    /// Human-readable label; `"Unknown"`/`"Unknown Color"` mean no confident match.
    pub name: String,
    /// Canonical uppercase `#RRGGBB`.
    pub hex: String,
    /// Formatted RGB triple, e.g. `(192, 28, 128)`.
    pub rgb: String,
    /// Formatted HSV triple, e.g. `(327°, 85%, 75%)`.
    pub hsv: String,
    /// Classifier confidence in `[0, 1]`; absent for deterministic fallbacks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

impl DetectedColor {
    /// Build a locally-derived result whose fields are all computed from the
    /// given channels. Carries no confidence.
    pub fn from_channels(name: impl Into<String>, r: u8, g: u8, b: u8) -> Self {
        Self {
            name: name.into(),
            hex: format_hex(r, g, b),
            rgb: format_rgb(r, g, b),
            hsv: format_hsv(rgb_to_hsv(r, g, b)),
            confidence: None,
        }
    }
}

impl From<Prediction> for DetectedColor {
    /// Classifier payloads are authoritative: every field is taken as-is.
    fn from(prediction: Prediction) -> Self {
        Self {
            name: prediction.name,
            hex: prediction.hex,
            rgb: prediction.rgb,
            hsv: prediction.hsv,
            confidence: prediction.confidence,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_channels_keeps_fields_consistent() {
        let color = DetectedColor::from_channels("Unknown Color", 192, 28, 128);
        assert_eq!(color.hex, "#C01C80");
        assert_eq!(color.rgb, "(192, 28, 128)");
        assert!(color.confidence.is_none());
    }

    #[test]
    fn prediction_fields_pass_through_verbatim() {
        let color: DetectedColor = Prediction {
            name: "Red".into(),
            hex: "#FF0000".into(),
            rgb: "(255,0,0)".into(),
            hsv: "(0,100,100)".into(),
            confidence: Some(0.92),
        }
        .into();
        // Collaborator formatting is preserved even when it differs from ours.
        assert_eq!(color.rgb, "(255,0,0)");
        assert_eq!(color.confidence, Some(0.92));
    }

    #[test]
    fn confidence_is_omitted_from_json_when_absent() {
        let color = DetectedColor::from_channels("Black", 0, 0, 0);
        let json = serde_json::to_string(&color).unwrap();
        assert!(!json.contains("confidence"));
    }
}
