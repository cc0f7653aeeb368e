//! Maintenance of stored contact numbers

mod normalization;

pub use normalization::{ContactChange, ContactNormalizationJob, NormalizationReport};
