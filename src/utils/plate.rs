use crate::error::{AppError, AppResult};
use regex::Regex;

/// Normalize a plate for storage: trimmed and uppercased.
pub fn normalize_plate(plate: &str) -> String {
    plate.trim().to_uppercase()
}

/// Validate a normalized plate number.
pub fn validate_plate(plate: &str) -> AppResult<()> {
    let plate_regex = Regex::new(r"^[A-Z0-9][A-Z0-9 -]{1,19}$").unwrap();

    if !plate_regex.is_match(plate) {
        return Err(AppError::ValidationError(
            "Invalid plate number: expected 2-20 characters (letters, digits, spaces or dashes)"
                .to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_plate() {
        assert_eq!(normalize_plate("  ka01ab1234 "), "KA01AB1234");
        assert_eq!(normalize_plate("dl-3c 4567"), "DL-3C 4567");
    }

    #[test]
    fn test_validate_plate() {
        assert!(validate_plate("KA01AB1234").is_ok());
        assert!(validate_plate("DL-3C 4567").is_ok());
        assert!(validate_plate("A").is_err());
        assert!(validate_plate("").is_err());
        assert!(validate_plate("BAD*PLATE").is_err());
        assert!(validate_plate(&"X".repeat(21)).is_err());
    }
}
