//! Middleware modules for the API
//!
//! - `auth`: bearer token authentication via the identity verifier
//! - `cors`: cross-origin configuration per environment

pub mod auth;
pub mod cors;

pub use auth::{AuthenticatedIdentity, IdentityAuth};
pub use cors::create_cors;
