use crate::models::RentInput;

/// Check the quantitative fields a prediction is meaningful for
///
/// Returns the message reported to the client for the first failing check.
/// Comparisons are written so that NaN fails every range.
pub fn validate_input(input: &RentInput) -> Result<(), String> {
    if !(input.bedrooms >= 1.0) {
        return Err("Invalid input: bedrooms must be >= 1".to_string());
    }
    if !(input.bathrooms >= 1.0) {
        return Err("Invalid input: bathrooms must be >= 1".to_string());
    }
    if !(input.floor_area > 0.0) {
        return Err("Invalid input: floor_area must be > 0".to_string());
    }
    if !(-90.0..=90.0).contains(&input.lat) {
        return Err("Invalid input: latitude must be between -90 and 90".to_string());
    }
    if !(-180.0..=180.0).contains(&input.lng) {
        return Err("Invalid input: longitude must be between -180 and 180".to_string());
    }
    Ok(())
}
