use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationErrors};

use crate::{
    dto::{
        color::DetectedColor,
        validation::{validate_coordinate, validate_unit_interval},
    },
    state::detector::DetectorPhase,
};

fn default_true() -> bool {
    true
}

/// Payload used to open a new detection session.
///
/// Screen dimensions are fixed for the session's lifetime and are the basis
/// for normalizing tap coordinates before they cross the classifier boundary.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreateSessionRequest {
    /// Screen width in pixels.
    #[validate(range(min = 1))]
    pub screen_width: u32,
    /// Screen height in pixels.
    #[validate(range(min = 1))]
    pub screen_height: u32,
    /// Whether voice narration starts enabled.
    #[serde(default = "default_true")]
    pub voice_enabled: bool,
    /// Whether color code readouts start visible.
    #[serde(default = "default_true")]
    pub color_codes_visible: bool,
}

/// A tap at a screen coordinate, requesting a color resolution.
#[derive(Debug, Deserialize, ToSchema)]
pub struct TapRequest {
    /// Horizontal screen coordinate in pixels.
    pub x: f64,
    /// Vertical screen coordinate in pixels.
    pub y: f64,
}

impl Validate for TapRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if let Err(e) = validate_coordinate(self.x) {
            errors.add("x", e);
        }
        if let Err(e) = validate_coordinate(self.y) {
            errors.add("y", e);
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

/// A normalized RGB sample submitted directly to the classifier surface.
#[derive(Debug, Deserialize, ToSchema)]
pub struct PredictRequest {
    /// Normalized red channel in `[0, 1]`.
    pub nr: f64,
    /// Normalized green channel in `[0, 1]`.
    pub ng: f64,
    /// Normalized blue channel in `[0, 1]`.
    pub nb: f64,
}

impl Validate for PredictRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        for (field, value) in [("nr", self.nr), ("ng", self.ng), ("nb", self.nb)] {
            if let Err(e) = validate_unit_interval(value) {
                errors.add(field, e);
            }
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

/// Externally visible phase of a detection session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum DetectorPhaseDto {
    /// Live viewfinder, sampler idle.
    Live,
    /// Live viewfinder with the interval sampler running.
    Sampling,
    /// Frozen viewfinder awaiting taps.
    Frozen,
}

impl From<DetectorPhase> for DetectorPhaseDto {
    fn from(phase: DetectorPhase) -> Self {
        match phase {
            DetectorPhase::Live { sampling: false } => DetectorPhaseDto::Live,
            DetectorPhase::Live { sampling: true } => DetectorPhaseDto::Sampling,
            DetectorPhase::Frozen => DetectorPhaseDto::Frozen,
        }
    }
}

/// Snapshot of a detection session returned by session endpoints.
#[derive(Debug, Serialize, ToSchema)]
pub struct SessionSnapshot {
    /// Session identifier.
    pub id: Uuid,
    /// Current phase.
    pub phase: DetectorPhaseDto,
    /// Crosshair horizontal position in screen pixels.
    pub crosshair_x: f64,
    /// Crosshair vertical position in screen pixels.
    pub crosshair_y: f64,
    /// Whether voice narration is enabled.
    pub voice_enabled: bool,
    /// Whether color code readouts are visible.
    pub color_codes_visible: bool,
    /// Most recently published reading, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reading: Option<DetectedColor>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tap_request_rejects_negative_coordinates() {
        let tap = TapRequest { x: -1.0, y: 10.0 };
        assert!(tap.validate().is_err());
    }

    #[test]
    fn predict_request_rejects_out_of_range_channels() {
        let ok = PredictRequest {
            nr: 0.5,
            ng: 0.0,
            nb: 1.0,
        };
        assert!(ok.validate().is_ok());

        let bad = PredictRequest {
            nr: 1.5,
            ng: 0.0,
            nb: 0.0,
        };
        assert!(bad.validate().is_err());
    }

    #[test]
    fn phase_dto_maps_all_machine_phases() {
        assert_eq!(
            DetectorPhaseDto::from(DetectorPhase::Live { sampling: true }),
            DetectorPhaseDto::Sampling
        );
        assert_eq!(
            DetectorPhaseDto::from(DetectorPhase::Frozen),
            DetectorPhaseDto::Frozen
        );
    }
}
