//! Phone number normalization, validation and display formatting
//!
//! All functions are pure. Canonical numbers are `+` followed by the
//! country calling code and national number, digits only.

pub mod country;
pub mod normalizer;

pub use country::Country;
pub use normalizer::{CanonicalRule, Canonicalized, ParsedPhone, PhoneNormalizer};
