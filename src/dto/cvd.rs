use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationErrors};

use crate::{
    dto::validation::{validate_image_path, validate_unit_interval},
    state::cvd::{CvdSession, CvdType},
};

/// Payload selecting the CVD type for a session.
#[derive(Debug, Deserialize, ToSchema)]
pub struct SetCvdTypeRequest {
    /// The deficiency type to simulate or correct.
    pub cvd_type: CvdType,
}

/// Payload installing an image into the session preview.
#[derive(Debug, Deserialize, ToSchema)]
pub struct SetImageRequest {
    /// Path or `file://` URI of the image to preview.
    pub path: String,
}

impl Validate for SetImageRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if let Err(e) = validate_image_path(&self.path) {
            errors.add("path", e);
        }
        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

/// Payload requesting a daltonization pass over the current preview.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct CvdProcessRequest {
    /// Transform severity in `[0, 1]`; defaults to the configured severity.
    #[serde(default)]
    pub severity: Option<f64>,
}

impl Validate for CvdProcessRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if let Some(severity) = self.severity
            && let Err(e) = validate_unit_interval(severity)
        {
            errors.add("severity", e);
        }
        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

/// Snapshot of a CVD session returned by its endpoints.
#[derive(Debug, Serialize, ToSchema)]
pub struct CvdSnapshot {
    /// Session identifier.
    pub id: Uuid,
    /// Currently previewed image reference, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview: Option<String>,
    /// Selected CVD type, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cvd_type: Option<CvdType>,
    /// True while a transform is in flight.
    pub processing: bool,
}

impl From<CvdSession> for CvdSnapshot {
    fn from(session: CvdSession) -> Self {
        Self {
            id: session.id,
            preview: session.preview,
            cvd_type: session.cvd_type,
            processing: session.processing,
        }
    }
}
