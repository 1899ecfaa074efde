//! fixturegen test data library.
//!
//! This is the main entry point for fixturegen: constraint-driven value
//! generation, named-field record access, and fixture managers that clean
//! up after themselves.
//!
//! ```rust
//! use fixturegen::*;
//!
//! let mut gen = ValueGenerator::with_seed(Seed::from_u64(42));
//! let login = gen
//!     .generate_named("ALPHA", &["min=5", "max=5", "lowercase"])
//!     .unwrap();
//! assert_eq!(login.as_str().map(|s| s.chars().count()), Some(5));
//! ```

pub use fixturegen_core::*;

// Re-export derive macros when available
#[cfg(feature = "derive")]
pub use fixturegen_derive::*;
