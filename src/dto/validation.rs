//! Validation helpers for DTOs.

use validator::ValidationError;

/// Validates that a screen coordinate is finite and non-negative.
pub fn validate_coordinate(value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() {
        let mut err = ValidationError::new("coordinate_not_finite");
        err.message = Some("Coordinate must be a finite number".into());
        return Err(err);
    }

    if value < 0.0 {
        let mut err = ValidationError::new("coordinate_negative");
        err.message = Some("Coordinate must not be negative".into());
        return Err(err);
    }

    Ok(())
}

/// Validates that a normalized channel or severity lies within `[0, 1]`.
pub fn validate_unit_interval(value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() || !(0.0..=1.0).contains(&value) {
        let mut err = ValidationError::new("unit_interval");
        err.message = Some("Value must lie within [0, 1]".into());
        return Err(err);
    }

    Ok(())
}

/// Validates that an image path is non-empty once trimmed.
pub fn validate_image_path(path: &str) -> Result<(), ValidationError> {
    if path.trim().is_empty() {
        let mut err = ValidationError::new("image_path_empty");
        err.message = Some("Image path must not be empty".into());
        return Err(err);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coordinates_accept_zero_and_positive_values() {
        assert!(validate_coordinate(0.0).is_ok());
        assert!(validate_coordinate(959.5).is_ok());
    }

    #[test]
    fn coordinates_reject_negative_and_non_finite_values() {
        assert!(validate_coordinate(-1.0).is_err());
        assert!(validate_coordinate(f64::NAN).is_err());
        assert!(validate_coordinate(f64::INFINITY).is_err());
    }

    #[test]
    fn unit_interval_bounds_are_inclusive() {
        assert!(validate_unit_interval(0.0).is_ok());
        assert!(validate_unit_interval(1.0).is_ok());
        assert!(validate_unit_interval(1.01).is_err());
        assert!(validate_unit_interval(f64::NAN).is_err());
    }

    #[test]
    fn image_paths_must_not_be_blank() {
        assert!(validate_image_path("/tmp/photo.jpg").is_ok());
        assert!(validate_image_path("").is_err());
        assert!(validate_image_path("   ").is_err());
    }
}
