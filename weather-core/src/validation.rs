pub const EMPTY_NAME: &str = "City name cannot be empty";
pub const NAME_TOO_SHORT: &str = "City name must be at least 2 characters long";
pub const NAME_BAD_CHARS: &str =
    "City name can only contain letters, spaces, hyphens, and apostrophes";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub error: Option<String>,
}

impl ValidationResult {
    fn valid() -> Self {
        Self {
            is_valid: true,
            error: None,
        }
    }

    fn invalid(message: &str) -> Self {
        Self {
            is_valid: false,
            error: Some(message.to_string()),
        }
    }
}

/// Check user input before it is sent to the provider. The first failing
/// rule wins.
pub fn validate_city_name(input: &str) -> ValidationResult {
    if input.trim().is_empty() {
        return ValidationResult::invalid(EMPTY_NAME);
    }

    // Untrimmed length, counted in characters.
    if input.chars().count() < 2 {
        return ValidationResult::invalid(NAME_TOO_SHORT);
    }

    let allowed = |c: char| c.is_ascii_alphabetic() || c.is_whitespace() || c == '-' || c == '\'';
    if !input.chars().all(allowed) {
        return ValidationResult::invalid(NAME_BAD_CHARS);
    }

    ValidationResult::valid()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn error_of(input: &str) -> Option<String> {
        validate_city_name(input).error
    }

    #[test]
    fn accepts_plain_names() {
        for name in ["New York", "Paris", "Saint-Etienne", "L'Aquila", "Al Ain"] {
            assert_eq!(validate_city_name(name), ValidationResult::valid(), "{name}");
        }
    }

    #[test]
    fn empty_and_blank_input() {
        assert_eq!(error_of("").as_deref(), Some(EMPTY_NAME));
        assert_eq!(error_of("   ").as_deref(), Some(EMPTY_NAME));
        assert!(!validate_city_name("\t").is_valid);
    }

    #[test]
    fn single_character_is_too_short() {
        assert_eq!(error_of("A").as_deref(), Some(NAME_TOO_SHORT));
    }

    #[test]
    fn length_is_checked_before_trimming() {
        // " A" has two characters, so it passes the length rule.
        assert!(validate_city_name(" A").is_valid);
    }

    #[test]
    fn rejects_digits_and_punctuation() {
        assert_eq!(error_of("Sao3Paulo").as_deref(), Some(NAME_BAD_CHARS));
        assert_eq!(error_of("Paris!").as_deref(), Some(NAME_BAD_CHARS));
        assert_eq!(error_of("Zürich").as_deref(), Some(NAME_BAD_CHARS));
    }
}
