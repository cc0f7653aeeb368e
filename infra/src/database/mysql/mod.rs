//! MySQL repository implementations

pub mod profile_repository;

pub use profile_repository::MySqlProfileRepository;
