//! Identity resolved from a bearer credential

use serde::{Deserialize, Serialize};

/// Caller identity as reported by the external identity verifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifiedIdentity {
    /// Provider-side subject id
    pub subject: String,
    pub email: String,
    pub name: Option<String>,
}

impl VerifiedIdentity {
    /// Key challenges and profiles are filed under
    pub fn key(&self) -> &str {
        &self.email
    }
}
