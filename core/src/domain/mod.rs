//! Domain layer: entities and value objects of the verification flow

pub mod entities;
pub mod value_objects;

pub use entities::*;
pub use value_objects::*;
