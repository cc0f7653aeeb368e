//! User profile fields the verification flow reads and writes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Profile record keyed by the verified identity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// Stable identity key (the verified email)
    pub identity_key: String,

    pub name: Option<String>,

    /// Contact number in canonical form once normalized
    pub contact_number: Option<String>,

    pub is_contact_verified: bool,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl UserProfile {
    pub fn new(identity_key: impl Into<String>, name: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            identity_key: identity_key.into(),
            name,
            contact_number: None,
            is_contact_verified: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Contact number if one is stored and non-blank
    pub fn contact(&self) -> Option<&str> {
        self.contact_number
            .as_deref()
            .filter(|c| !c.trim().is_empty())
    }

    /// Replace the contact number; a new number always needs re-verification
    pub fn set_contact(&mut self, contact: String) {
        self.contact_number = Some(contact);
        self.is_contact_verified = false;
        self.updated_at = Utc::now();
    }

    pub fn mark_contact_verified(&mut self) {
        self.is_contact_verified = true;
        self.updated_at = Utc::now();
    }
}
