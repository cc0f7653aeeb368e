pub mod challenge;
pub mod profile;

pub use challenge::{ChallengeStore, InMemoryChallengeStore, Reservation};
pub use profile::{InMemoryProfileRepository, ProfileRepository};
