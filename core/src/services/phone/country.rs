//! Countries with dedicated normalization and formatting rules

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use std::str::FromStr;

use crate::errors::PhoneError;

static INDIA_MOBILE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[6-9][0-9]{9}$").unwrap());

// North American Numbering Plan: area code and exchange never start with 0 or 1
static NANP_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[2-9][0-9]{9}$").unwrap());

static UK_MOBILE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^7[0-9]{9}$").unwrap());

static AUSTRALIA_MOBILE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^4[0-9]{8}$").unwrap());

// Australian mobiles dialled locally carry the 0 trunk prefix
static AUSTRALIA_LOCAL_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^0(4[0-9]{8})$").unwrap());

/// Supported countries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Country {
    India,
    UnitedStates,
    Canada,
    UnitedKingdom,
    Australia,
}

impl Country {
    pub const ALL: [Country; 5] = [
        Country::India,
        Country::UnitedStates,
        Country::Canada,
        Country::UnitedKingdom,
        Country::Australia,
    ];

    /// ISO 3166-1 alpha-2 code
    pub fn iso_code(&self) -> &'static str {
        match self {
            Country::India => "IN",
            Country::UnitedStates => "US",
            Country::Canada => "CA",
            Country::UnitedKingdom => "GB",
            Country::Australia => "AU",
        }
    }

    /// Calling code digits without the `+`
    pub fn calling_code(&self) -> &'static str {
        match self {
            Country::India => "91",
            Country::UnitedStates | Country::Canada => "1",
            Country::UnitedKingdom => "44",
            Country::Australia => "61",
        }
    }

    /// Calling code with the leading `+`
    pub fn dial_prefix(&self) -> String {
        format!("+{}", self.calling_code())
    }

    /// Accepted digit counts of the full international number, calling code included
    pub fn international_lengths(&self) -> RangeInclusive<usize> {
        match self {
            Country::India => 12..=12,
            Country::UnitedStates | Country::Canada => 11..=11,
            Country::UnitedKingdom => 12..=13,
            Country::Australia => 11..=12,
        }
    }

    /// Whether a national number has this country's mobile leading-digit shape
    pub fn is_mobile_national(&self, national: &str) -> bool {
        match self {
            Country::India => INDIA_MOBILE_REGEX.is_match(national),
            Country::UnitedStates | Country::Canada => NANP_REGEX.is_match(national),
            Country::UnitedKingdom => UK_MOBILE_REGEX.is_match(national),
            Country::Australia => AUSTRALIA_MOBILE_REGEX.is_match(national),
        }
    }

    /// National number for a 10-digit locally dialled mobile, if it fits this country
    pub fn local_to_national(&self, digits: &str) -> Option<String> {
        if digits.len() != 10 {
            return None;
        }
        match self {
            Country::Australia => AUSTRALIA_LOCAL_REGEX
                .captures(digits)
                .and_then(|c| c.get(1))
                .map(|m| m.as_str().to_string()),
            _ if self.is_mobile_national(digits) => Some(digits.to_string()),
            _ => None,
        }
    }

    /// Identify the country of a digits-only international number by calling
    /// code and total length; `+1` numbers resolve to the United States
    pub fn identify(digits: &str) -> Option<Country> {
        [
            Country::India,
            Country::UnitedStates,
            Country::UnitedKingdom,
            Country::Australia,
        ]
        .into_iter()
        .find(|c| digits.starts_with(c.calling_code()) && c.international_lengths().contains(&digits.len()))
    }

    /// Whether two countries share a numbering plan
    pub fn shares_calling_code(&self, other: Country) -> bool {
        self.calling_code() == other.calling_code()
    }

    /// Group a national number with spaces, when its length has a known layout
    pub fn group_national(&self, national: &str) -> Option<String> {
        let groups: &[usize] = match (self, national.len()) {
            (Country::India, 10) => &[5, 5],
            (Country::UnitedStates | Country::Canada, 10) => &[3, 3, 4],
            (Country::UnitedKingdom, 10) => &[4, 6],
            (Country::Australia, 9) => &[3, 3, 3],
            _ => return None,
        };

        let mut parts = Vec::with_capacity(groups.len());
        let mut start = 0;
        for size in groups {
            parts.push(&national[start..start + size]);
            start += size;
        }
        Some(parts.join(" "))
    }
}

impl FromStr for Country {
    type Err = PhoneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_ascii_uppercase();
        Country::ALL
            .into_iter()
            .find(|c| c.iso_code() == code)
            .ok_or(PhoneError::UnsupportedCountry { code })
    }
}

impl std::fmt::Display for Country {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.iso_code())
    }
}
