use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Color-vision-deficiency types supported by the daltonizer collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum CvdType {
    /// Red-deficient vision.
    Protanopia,
    /// Green-deficient vision.
    Deuteranopia,
    /// Blue-deficient vision.
    Tritanopia,
}

impl CvdType {
    /// Fixed numeric code used on the collaborator boundary.
    pub fn code(self) -> u8 {
        match self {
            CvdType::Protanopia => 0,
            CvdType::Deuteranopia => 1,
            CvdType::Tritanopia => 2,
        }
    }
}

/// In-memory state of one CVD simulation session.
///
/// Nothing here outlives the session: the preview reference is discarded with
/// the session and no transform output is persisted.
#[derive(Debug, Clone)]
pub struct CvdSession {
    /// Session identifier.
    pub id: Uuid,
    /// Reference to the image currently previewed, if any.
    pub preview: Option<String>,
    /// Selected CVD type; a transform cannot run until one is chosen.
    pub cvd_type: Option<CvdType>,
    /// True while a transform is in flight; blocks overlapping attempts.
    pub processing: bool,
}

impl CvdSession {
    /// Create an empty session with a fresh identifier.
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            preview: None,
            cvd_type: None,
            processing: false,
        }
    }
}

impl Default for CvdSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cvd_codes_match_the_collaborator_contract() {
        assert_eq!(CvdType::Protanopia.code(), 0);
        assert_eq!(CvdType::Deuteranopia.code(), 1);
        assert_eq!(CvdType::Tritanopia.code(), 2);
    }

    #[test]
    fn new_session_starts_empty() {
        let session = CvdSession::new();
        assert!(session.preview.is_none());
        assert!(session.cvd_type.is_none());
        assert!(!session.processing);
    }
}
