//! Domain building blocks for the video catalog: shared types, the core
//! error type, and the declarative payload validation engine.
//!
//! Nothing in this crate touches the database; checks that need storage
//! (such as `exists:` rules) are surfaced as data for the caller to run.

pub mod error;
pub mod serde_helpers;
pub mod types;
pub mod validation;
