//! Database module - MySQL implementations using SQLx
//!
//! Only user profiles are persisted here; challenges live in the
//! challenge store.

pub mod connection;
pub mod mysql;

// Re-export commonly used types
pub use connection::DatabasePool;
pub use mysql::MySqlProfileRepository;
