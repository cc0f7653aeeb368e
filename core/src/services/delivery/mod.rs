//! SMS delivery: provider capability and the ordered fallback chain

pub mod chain;
pub mod provider;

pub use chain::{deliver, DeliveryChain, DeliveryPolicy};
pub use provider::{verification_message, SmsProvider};
