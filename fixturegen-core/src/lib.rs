//! Core functionality for fixturegen.
//!
//! This crate provides the building blocks for generating test data: a
//! constraint-driven value generator, a registry of character classes, an
//! introspector that reads and writes record fields by name, and a fixture
//! manager that creates and cleans up objects through a repository.

pub mod chars;
pub mod constraint;
pub mod data;
pub mod error;
pub mod fixture;
pub mod formats;
pub mod gen;
pub mod identity;
pub mod introspect;
pub mod manager;
pub mod value;

// Re-export the main types
pub use chars::*;
pub use constraint::*;
pub use data::*;
pub use error::*;
pub use fixture::*;
pub use formats::*;
pub use gen::*;
pub use identity::*;
pub use introspect::*;
pub use manager::*;
pub use value::*;
