//! Canonicalization, structural validation and display formatting.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use cv_shared::utils::phone::digits_only;

use super::country::Country;
use crate::errors::PhoneError;

/// E.164 shape: `+`, a non-zero leading digit, 7 to 15 digits in total
static E164_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\+[1-9][0-9]{6,14}$").unwrap());

static CANONICAL_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\+[0-9]+$").unwrap());

/// Which canonicalization rule produced a number, in precedence order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CanonicalRule {
    /// No digits in the input
    Empty,
    /// Input was already in `+` international form
    Explicit,
    /// Default country's calling code already embedded at full length
    EmbeddedPrefix,
    /// Ten-digit local mobile number in the default country
    DefaultCountry,
    /// Calling code and length of another supported country
    KnownPattern(Country),
    /// Nothing matched; `+` prepended to the digits
    Fallback,
}

/// A canonical number with the rule that produced it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Canonicalized {
    pub number: String,
    pub rule: CanonicalRule,
}

/// Country and national number split out of a phone number
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedPhone {
    pub country: Option<Country>,
    pub national_number: String,
    pub is_valid: bool,
}

/// Phone number normalizer bound to a default country
///
/// The default country decides how ten-digit numbers without a calling code
/// are read and which national numbers count as mobiles during validation.
/// Inputs that could belong to several countries are resolved by rule
/// precedence alone, so an explicit `+` form is the only unambiguous input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhoneNormalizer {
    default_country: Country,
}

impl Default for PhoneNormalizer {
    fn default() -> Self {
        Self::new(Country::India)
    }
}

impl PhoneNormalizer {
    pub fn new(default_country: Country) -> Self {
        Self { default_country }
    }

    pub fn default_country(&self) -> Country {
        self.default_country
    }

    /// Strip every non-digit character
    pub fn clean(input: &str) -> String {
        digits_only(input)
    }

    /// Whether `input` is already `+` followed by digits only
    pub fn is_canonical(input: &str) -> bool {
        CANONICAL_REGEX.is_match(input)
    }

    /// Convert arbitrary input into `+<calling code><national number>`
    ///
    /// Returns an empty string when the input holds no digits.
    pub fn canonicalize(&self, input: &str) -> String {
        self.canonicalize_explained(input).number
    }

    /// [`PhoneNormalizer::canonicalize`] plus the rule that fired
    pub fn canonicalize_explained(&self, input: &str) -> Canonicalized {
        let digits = Self::clean(input);
        if digits.is_empty() {
            return Canonicalized {
                number: String::new(),
                rule: CanonicalRule::Empty,
            };
        }

        let plus_digits = |rule| Canonicalized {
            number: format!("+{}", digits),
            rule,
        };

        if input.trim_start().starts_with('+') {
            return plus_digits(CanonicalRule::Explicit);
        }

        let default = self.default_country;
        if digits.starts_with(default.calling_code()) && default.international_lengths().contains(&digits.len()) {
            return plus_digits(CanonicalRule::EmbeddedPrefix);
        }

        if let Some(national) = default.local_to_national(&digits) {
            return Canonicalized {
                number: format!("{}{}", default.dial_prefix(), national),
                rule: CanonicalRule::DefaultCountry,
            };
        }

        match Country::identify(&digits) {
            Some(country) => plus_digits(CanonicalRule::KnownPattern(country)),
            None => plus_digits(CanonicalRule::Fallback),
        }
    }

    /// Canonicalize unless the input is already canonical; idempotent
    pub fn normalize(&self, input: &str) -> String {
        if Self::is_canonical(input) {
            return input.to_string();
        }
        self.canonicalize(input)
    }

    /// E.164 shape check plus per-country refinement
    ///
    /// Numbers in the default country's numbering plan must carry a mobile
    /// national number; other recognised countries only need a valid length.
    pub fn validate_structural(&self, phone: &str) -> bool {
        if !E164_REGEX.is_match(phone) {
            return false;
        }

        let digits = &phone[1..];
        match Country::identify(digits) {
            Some(country) if country.shares_calling_code(self.default_country) => {
                let national = &digits[country.calling_code().len()..];
                self.default_country.is_mobile_national(national)
            }
            _ => true,
        }
    }

    /// Normalize and validate in one step
    pub fn normalize_valid(&self, input: &str) -> Result<String, PhoneError> {
        let normalized = self.normalize(input);
        if normalized.is_empty() || !self.validate_structural(&normalized) {
            return Err(PhoneError::InvalidNumber {
                phone: input.trim().to_string(),
            });
        }
        Ok(normalized)
    }

    /// Human-readable rendering with country spacing where the layout is known
    ///
    /// Unrecognised numbers come back as `+` and digits without spacing.
    pub fn format_for_display(&self, phone: &str) -> String {
        let canonical = self.normalize(phone);
        if canonical.is_empty() {
            return canonical;
        }

        let digits = &canonical[1..];
        Country::identify(digits)
            .and_then(|country| {
                let national = &digits[country.calling_code().len()..];
                country
                    .group_national(national)
                    .map(|grouped| format!("{} {}", country.dial_prefix(), grouped))
            })
            .unwrap_or(canonical)
    }

    /// Format a number for the country named by `iso_code`
    ///
    /// A leading calling code for that country is dropped before grouping;
    /// national numbers without a known layout are appended unspaced.
    pub fn format_for_country(phone: &str, iso_code: &str) -> Result<String, PhoneError> {
        let country: Country = iso_code.parse()?;
        let digits = Self::clean(phone);
        let national = match digits.strip_prefix(country.calling_code()) {
            Some(rest) if country.international_lengths().contains(&digits.len()) => rest,
            _ => digits.as_str(),
        };

        Ok(match country.group_national(national) {
            Some(grouped) => format!("{} {}", country.dial_prefix(), grouped),
            None => format!("{}{}", country.dial_prefix(), national),
        })
    }

    /// Country recognised from calling code and length, if any
    pub fn country_of(phone: &str) -> Option<Country> {
        Country::identify(&Self::clean(phone))
    }

    /// Split a number into country and national parts
    pub fn parse(&self, phone: &str) -> ParsedPhone {
        let digits = Self::clean(phone);
        let country = Country::identify(&digits);
        let national_number = match country {
            Some(c) => digits[c.calling_code().len()..].to_string(),
            None => digits,
        };
        ParsedPhone {
            country,
            national_number,
            is_valid: self.validate_structural(&self.normalize(phone)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn india() -> PhoneNormalizer {
        PhoneNormalizer::new(Country::India)
    }

    #[test]
    fn test_clean() {
        assert_eq!(PhoneNormalizer::clean("+91 (987) 654-3210"), "919876543210");
        assert_eq!(PhoneNormalizer::clean(""), "");
        assert_eq!(PhoneNormalizer::clean("call me"), "");
    }

    #[test]
    fn test_ten_digit_indian_mobile() {
        let normalizer = india();
        assert_eq!(normalizer.canonicalize("9876543210"), "+919876543210");
        assert_eq!(normalizer.format_for_display("9876543210"), "+91 98765 43210");
        assert!(normalizer.validate_structural("+919876543210"));
    }

    #[test]
    fn test_every_default_country_mobile_is_canonical_and_valid() {
        let normalizer = india();
        for lead in '6'..='9' {
            for tail in ["000000000", "123456789", "876543210", "999999999"] {
                let local = format!("{}{}", lead, tail);
                let canonical = normalizer.canonicalize(&local);
                assert_eq!(canonical, format!("+91{}", local));
                assert!(normalizer.validate_structural(&canonical), "{}", canonical);
            }
        }
    }

    #[test]
    fn test_spaced_international_input() {
        let normalizer = india();
        assert_eq!(normalizer.normalize("+91 98765 43210"), "+919876543210");
        assert_eq!(normalizer.normalize("+919876543210"), "+919876543210");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let normalizer = india();
        let inputs = [
            "",
            "   ",
            "+",
            "abc",
            "9876543210",
            "5876543210",
            "09876543210",
            "919876543210",
            "+91 98765 43210",
            "(415) 555-2671",
            "14155552671",
            "+1-415-555-2671",
            "447123456789",
            "0412345678",
            "61412345678",
            "12345",
            "+0012345678",
            "++91++98765",
        ];
        for input in inputs {
            let once = normalizer.normalize(input);
            assert_eq!(normalizer.normalize(&once), once, "input {:?}", input);
        }
    }

    #[test]
    fn test_empty_input_yields_empty_string() {
        let normalizer = india();
        assert_eq!(normalizer.canonicalize(""), "");
        assert_eq!(normalizer.normalize("   "), "");
        assert_eq!(normalizer.format_for_display(""), "");
        assert!(!normalizer.validate_structural(""));
    }

    #[test]
    fn test_rule_precedence() {
        let normalizer = india();
        assert_eq!(normalizer.canonicalize_explained("+91 98765 43210").rule, CanonicalRule::Explicit);
        assert_eq!(normalizer.canonicalize_explained("919876543210").rule, CanonicalRule::EmbeddedPrefix);
        assert_eq!(normalizer.canonicalize_explained("98765 43210").rule, CanonicalRule::DefaultCountry);
        assert_eq!(
            normalizer.canonicalize_explained("14155552671").rule,
            CanonicalRule::KnownPattern(Country::UnitedStates)
        );
        assert_eq!(
            normalizer.canonicalize_explained("4471234567890").rule,
            CanonicalRule::KnownPattern(Country::UnitedKingdom)
        );
        assert_eq!(
            normalizer.canonicalize_explained("612345678901").rule,
            CanonicalRule::KnownPattern(Country::Australia)
        );
        assert_eq!(normalizer.canonicalize_explained("").rule, CanonicalRule::Empty);
    }

    #[test]
    fn test_non_mobile_ten_digits_fall_back_to_plain_prefix() {
        let explained = india().canonicalize_explained("5876543210");
        assert_eq!(explained.number, "+5876543210");
        assert_eq!(explained.rule, CanonicalRule::Fallback);
    }

    #[test]
    fn test_other_default_countries() {
        let us = PhoneNormalizer::new(Country::UnitedStates);
        assert_eq!(us.canonicalize("(415) 555-2671"), "+14155552671");
        assert!(us.validate_structural("+14155552671"));
        assert!(!us.validate_structural("+11155552671"));

        let au = PhoneNormalizer::new(Country::Australia);
        assert_eq!(au.canonicalize("0412 345 678"), "+61412345678");
        assert_eq!(au.format_for_display("0412 345 678"), "+61 412 345 678");
    }

    #[test]
    fn test_validate_structural() {
        let normalizer = india();
        assert!(!normalizer.validate_structural("919876543210"));
        assert!(!normalizer.validate_structural("+915876543210"));
        assert!(!normalizer.validate_structural("+0123456789"));
        assert!(!normalizer.validate_structural("+91 98765 43210"));
        assert!(!normalizer.validate_structural("+1234567890123456"));
        assert!(!normalizer.validate_structural("+123456"));
        // other identifiable countries only need the right length
        assert!(normalizer.validate_structural("+11155552671"));
        assert!(normalizer.validate_structural("+447123456789"));
        assert!(normalizer.validate_structural("+61412345678"));
        // unidentified countries pass on E.164 shape
        assert!(normalizer.validate_structural("+8613812345678"));
    }

    #[test]
    fn test_normalize_valid() {
        let normalizer = india();
        assert_eq!(normalizer.normalize_valid(" 98765-43210 ").unwrap(), "+919876543210");
        assert!(matches!(
            normalizer.normalize_valid("+915876543210"),
            Err(PhoneError::InvalidNumber { .. })
        ));
        assert!(normalizer.normalize_valid("").is_err());
    }

    #[test]
    fn test_format_for_display() {
        let normalizer = india();
        assert_eq!(normalizer.format_for_display("+919876543210"), "+91 98765 43210");
        assert_eq!(normalizer.format_for_display("+14155552671"), "+1 415 555 2671");
        assert_eq!(normalizer.format_for_display("+447123456789"), "+44 7123 456789");
        assert_eq!(normalizer.format_for_display("+61412345678"), "+61 412 345 678");
        assert_eq!(normalizer.format_for_display("+8613812345678"), "+8613812345678");
    }

    #[test]
    fn test_format_for_country() {
        assert_eq!(
            PhoneNormalizer::format_for_country("9876543210", "IN").unwrap(),
            "+91 98765 43210"
        );
        assert_eq!(
            PhoneNormalizer::format_for_country("+1 416 555 1234", "CA").unwrap(),
            "+1 416 555 1234"
        );
        assert_eq!(PhoneNormalizer::format_for_country("412345678", "au").unwrap(), "+61 412 345 678");
        assert_eq!(PhoneNormalizer::format_for_country("12345", "GB").unwrap(), "+4412345");
        assert_eq!(
            PhoneNormalizer::format_for_country("9876543210", "FR"),
            Err(PhoneError::UnsupportedCountry { code: "FR".into() })
        );
    }

    #[test]
    fn test_parse() {
        let parsed = india().parse("+91 98765 43210");
        assert_eq!(parsed.country, Some(Country::India));
        assert_eq!(parsed.national_number, "9876543210");
        assert!(parsed.is_valid);

        let unknown = india().parse("12345");
        assert_eq!(unknown.country, None);
        assert_eq!(unknown.national_number, "12345");
        assert!(!unknown.is_valid);
        assert_eq!(PhoneNormalizer::country_of("+14155552671"), Some(Country::UnitedStates));
    }
}
