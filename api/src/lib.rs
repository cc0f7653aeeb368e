//! HTTP surface for contact verification
//!
//! Exposes the verification flow over actix-web. The binary in `main.rs`
//! wires concrete infrastructure; tests build the same app with in-memory
//! collaborators through [`app::create_app`].

pub mod app;
pub mod bootstrap;
pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod state;
pub mod telemetry;

pub use app::create_app;
pub use state::{AppService, AppState};
