// Validation utilities module
// Custom validation functions for domain-specific field rules

use validator::ValidationError;

/// Validates that a roll number is non-blank and uses only characters that
/// appear on printed college documents (letters, digits, '-', '/').
pub fn validate_roll_number(value: &str) -> Result<(), ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::new("roll_number_blank"));
    }
    if trimmed
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '/')
    {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_roll_number"))
    }
}

/// Validates that a required text field is not just whitespace.
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::new("must_not_be_blank"))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roll_numbers_accept_document_characters() {
        assert!(validate_roll_number("CR-2024/001").is_ok());
        assert!(validate_roll_number("CR1").is_ok());
    }

    #[test]
    fn roll_numbers_reject_blank_and_odd_characters() {
        assert!(validate_roll_number("   ").is_err());
        assert!(validate_roll_number("CR 001").is_err());
        assert!(validate_roll_number("CR#1").is_err());
    }

    #[test]
    fn blank_check_trims_whitespace() {
        assert!(validate_not_blank("  batch 2024 ").is_ok());
        assert!(validate_not_blank(" \t").is_err());
    }
}
