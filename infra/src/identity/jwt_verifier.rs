//! HS256 JWT verification of identity-provider tokens
//!
//! The identity provider signs tokens with a shared secret. A token is
//! accepted when the signature and expiry check out, the optional issuer
//! and audience match, and it carries an email to key the caller by.

use async_trait::async_trait;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use tracing::debug;

use cv_core::domain::value_objects::VerifiedIdentity;
use cv_core::errors::DomainError;
use cv_core::services::identity::IdentityVerifier;
use cv_shared::config::IdentityConfig;
use cv_shared::utils::validation::is_valid_email;

/// Claims read from an identity token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityClaims {
    pub sub: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    pub exp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aud: Option<Audience>,
}

/// `aud` claim: a single value or a list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Audience {
    One(String),
    Many(Vec<String>),
}

pub struct JwtIdentityVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtIdentityVerifier {
    pub fn new(config: &IdentityConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = config.leeway_secs;

        if let Some(issuer) = &config.issuer {
            validation.set_issuer(&[issuer.as_str()]);
        }
        match &config.audience {
            Some(audience) => validation.set_audience(&[audience.as_str()]),
            None => validation.validate_aud = false,
        }

        Self {
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation,
        }
    }

    fn reject(message: impl Into<String>) -> DomainError {
        DomainError::UpstreamAuth {
            message: message.into(),
        }
    }
}

#[async_trait]
impl IdentityVerifier for JwtIdentityVerifier {
    async fn verify(&self, credential: &str) -> Result<VerifiedIdentity, DomainError> {
        let data = decode::<IdentityClaims>(credential.trim(), &self.decoding_key, &self.validation).map_err(|e| {
            debug!(event = "identity_token_rejected", error = %e, "Identity token rejected");
            Self::reject(format!("Invalid identity token: {}", e))
        })?;

        let claims = data.claims;
        let email = claims
            .email
            .map(|e| e.trim().to_lowercase())
            .filter(|e| !e.is_empty())
            .ok_or_else(|| Self::reject("Identity token carries no email"))?;
        if !is_valid_email(&email) {
            return Err(Self::reject("Identity token email is not an address"));
        }

        Ok(VerifiedIdentity {
            subject: claims.sub,
            email,
            name: claims.name.filter(|n| !n.trim().is_empty()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use jsonwebtoken::{encode, EncodingKey, Header};

    const SECRET: &str = "test-identity-secret";

    fn claims(email: Option<&str>, expires_in: Duration) -> IdentityClaims {
        IdentityClaims {
            sub: "auth0|abc123".to_string(),
            email: email.map(str::to_string),
            name: Some("Asha".to_string()),
            exp: (Utc::now() + expires_in).timestamp(),
            iss: None,
            aud: None,
        }
    }

    fn token(claims: &IdentityClaims, secret: &str) -> String {
        encode(&Header::new(Algorithm::HS256), claims, &EncodingKey::from_secret(secret.as_bytes())).unwrap()
    }

    #[tokio::test]
    async fn test_valid_token() {
        let verifier = JwtIdentityVerifier::new(&IdentityConfig::new(SECRET));
        let jwt = token(&claims(Some("Asha@Example.com"), Duration::hours(1)), SECRET);

        let identity = verifier.verify(&jwt).await.unwrap();
        assert_eq!(identity.email, "asha@example.com");
        assert_eq!(identity.subject, "auth0|abc123");
        assert_eq!(identity.name.as_deref(), Some("Asha"));
        assert_eq!(identity.key(), "asha@example.com");
    }

    #[tokio::test]
    async fn test_rejects_bad_signature_and_expiry() {
        let verifier = JwtIdentityVerifier::new(&IdentityConfig::new(SECRET));

        let forged = token(&claims(Some("asha@example.com"), Duration::hours(1)), "other-secret");
        assert!(matches!(verifier.verify(&forged).await, Err(DomainError::UpstreamAuth { .. })));

        let expired = token(&claims(Some("asha@example.com"), Duration::hours(-2)), SECRET);
        assert!(matches!(verifier.verify(&expired).await, Err(DomainError::UpstreamAuth { .. })));

        assert!(verifier.verify("not-a-jwt").await.is_err());
    }

    #[tokio::test]
    async fn test_rejects_token_without_email() {
        let verifier = JwtIdentityVerifier::new(&IdentityConfig::new(SECRET));
        let jwt = token(&claims(None, Duration::hours(1)), SECRET);
        assert!(matches!(verifier.verify(&jwt).await, Err(DomainError::UpstreamAuth { .. })));
    }

    #[tokio::test]
    async fn test_issuer_and_audience_checked_when_configured() {
        let config = IdentityConfig {
            issuer: Some("https://id.example.com/".to_string()),
            audience: Some("contact-verify".to_string()),
            ..IdentityConfig::new(SECRET)
        };
        let verifier = JwtIdentityVerifier::new(&config);

        let mut good = claims(Some("asha@example.com"), Duration::hours(1));
        good.iss = Some("https://id.example.com/".to_string());
        good.aud = Some(Audience::One("contact-verify".to_string()));
        assert!(verifier.verify(&token(&good, SECRET)).await.is_ok());

        let mut wrong_aud = good.clone();
        wrong_aud.aud = Some(Audience::One("someone-else".to_string()));
        assert!(verifier.verify(&token(&wrong_aud, SECRET)).await.is_err());

        let mut wrong_iss = good;
        wrong_iss.iss = Some("https://evil.example.com/".to_string());
        assert!(verifier.verify(&token(&wrong_iss, SECRET)).await.is_err());
    }

    #[tokio::test]
    async fn test_accepts_audience_list() {
        let config = IdentityConfig {
            audience: Some("contact-verify".to_string()),
            ..IdentityConfig::new(SECRET)
        };
        let verifier = JwtIdentityVerifier::new(&config);

        let mut listed = claims(Some("asha@example.com"), Duration::hours(1));
        listed.aud = Some(Audience::Many(vec![
            "https://api.example.com".to_string(),
            "contact-verify".to_string(),
        ]));
        assert!(verifier.verify(&token(&listed, SECRET)).await.is_ok());

        listed.aud = Some(Audience::Many(vec!["https://api.example.com".to_string()]));
        assert!(verifier.verify(&token(&listed, SECRET)).await.is_err());

        // Without a configured audience a listed claim still decodes
        let open = JwtIdentityVerifier::new(&IdentityConfig::new(SECRET));
        listed.aud = Some(Audience::Many(vec!["anything".to_string()]));
        assert!(open.verify(&token(&listed, SECRET)).await.is_ok());
    }

    #[tokio::test]
    async fn test_rejects_email_claim_that_is_not_an_address() {
        let verifier = JwtIdentityVerifier::new(&IdentityConfig::new(SECRET));
        let jwt = token(&claims(Some("asha"), Duration::hours(1)), SECRET);
        assert!(matches!(verifier.verify(&jwt).await, Err(DomainError::UpstreamAuth { .. })));
    }
}
