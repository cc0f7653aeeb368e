//! Common validation utilities

use once_cell::sync::Lazy;
use regex::Regex;

static OTP_CODE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]{6}$").unwrap());

static EMAIL_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

/// A submitted code must be exactly six ASCII digits
pub fn is_valid_otp_code(code: &str) -> bool {
    OTP_CODE_REGEX.is_match(code)
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_REGEX.is_match(email)
}

pub fn not_blank(value: &str) -> bool {
    !value.trim().is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_otp_code_format() {
        assert!(is_valid_otp_code("123456"));
        assert!(is_valid_otp_code("000000"));
        assert!(!is_valid_otp_code("12345"));
        assert!(!is_valid_otp_code("1234567"));
        assert!(!is_valid_otp_code("12a456"));
        assert!(!is_valid_otp_code(" 123456"));
        assert!(!is_valid_otp_code("１２３４５６"));
    }

    #[test]
    fn test_email_format() {
        assert!(is_valid_email("asha@example.com"));
        assert!(!is_valid_email("asha@example"));
        assert!(!is_valid_email("not an email"));
    }
}
