//! Value objects passed between layers

pub mod delivery;
pub mod identity;

pub use delivery::{DeliveryReceipt, DeliveryResult, DeliveryStatus};
pub use identity::VerifiedIdentity;
