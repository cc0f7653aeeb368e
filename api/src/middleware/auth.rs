//! Bearer authentication middleware
//!
//! Extracts the token from the `Authorization` header, resolves it through
//! the configured [`IdentityVerifier`] and injects the resulting identity
//! into the request extensions. Handlers read it with the
//! [`AuthenticatedIdentity`] extractor.

use actix_web::{
    dev::{Payload, Service, ServiceRequest, ServiceResponse, Transform},
    http::header::AUTHORIZATION,
    Error, FromRequest, HttpMessage, HttpRequest,
};
use futures_util::future::LocalBoxFuture;
use std::{
    future::{ready, Ready},
    rc::Rc,
    sync::Arc,
    task::{Context, Poll},
};

use cv_core::domain::value_objects::VerifiedIdentity;
use cv_core::errors::DomainError;
use cv_core::services::identity::IdentityVerifier;

use crate::handlers::ApiError;

/// Identity of the caller, available on routes behind [`IdentityAuth`]
#[derive(Debug, Clone)]
pub struct AuthenticatedIdentity(pub VerifiedIdentity);

impl AuthenticatedIdentity {
    /// Key profiles and challenges are filed under
    pub fn key(&self) -> &str {
        self.0.key()
    }
}

impl FromRequest for AuthenticatedIdentity {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let result = req
            .extensions()
            .get::<AuthenticatedIdentity>()
            .cloned()
            .ok_or_else(|| unauthorized("Authentication required").into());
        ready(result)
    }
}

/// Authentication middleware factory
pub struct IdentityAuth {
    verifier: Arc<dyn IdentityVerifier>,
}

impl IdentityAuth {
    pub fn new(verifier: Arc<dyn IdentityVerifier>) -> Self {
        Self { verifier }
    }
}

impl<S, B> Transform<S, ServiceRequest> for IdentityAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = IdentityAuthMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(IdentityAuthMiddleware {
            service: Rc::new(service),
            verifier: Arc::clone(&self.verifier),
        }))
    }
}

pub struct IdentityAuthMiddleware<S> {
    service: Rc<S>,
    verifier: Arc<dyn IdentityVerifier>,
}

impl<S, B> Service<ServiceRequest> for IdentityAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, ctx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let verifier = Arc::clone(&self.verifier);

        Box::pin(async move {
            let token = extract_bearer_token(&req)
                .ok_or_else(|| unauthorized("Missing or invalid Authorization header"))?;

            let identity = verifier.verify(&token).await.map_err(ApiError::from)?;
            tracing::debug!(event = "identity_resolved", identity = %identity.key(), "Request authenticated");

            req.extensions_mut().insert(AuthenticatedIdentity(identity));
            service.call(req).await
        })
    }
}

fn unauthorized(message: &str) -> ApiError {
    ApiError(DomainError::UpstreamAuth {
        message: message.to_string(),
    })
}

/// Extracts the Bearer token from the Authorization header
fn extract_bearer_token(req: &ServiceRequest) -> Option<String> {
    req.headers()
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test;

    #[::std::prelude::v1::test]
    fn test_extract_bearer_token() {
        let req = test::TestRequest::default()
            .insert_header((AUTHORIZATION, "Bearer test_token_123"))
            .to_srv_request();
        assert_eq!(extract_bearer_token(&req), Some("test_token_123".to_string()));

        let req = test::TestRequest::default()
            .insert_header((AUTHORIZATION, "test_token_123"))
            .to_srv_request();
        assert_eq!(extract_bearer_token(&req), None);

        let req = test::TestRequest::default()
            .insert_header((AUTHORIZATION, "Bearer   "))
            .to_srv_request();
        assert_eq!(extract_bearer_token(&req), None);

        let req = test::TestRequest::default().to_srv_request();
        assert_eq!(extract_bearer_token(&req), None);
    }
}
