//! Foundational data structures: field descriptors, schemas, and error types.

pub mod error;
pub mod fields;
