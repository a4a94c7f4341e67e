//! Video catalog API server library.
//!
//! Exposes the building blocks (config, state, error handling, the generic
//! CRUD handlers, routes) so integration tests and the binary entrypoint
//! can both access them.

pub mod config;
pub mod crud;
pub mod error;
pub mod handlers;
pub mod query;
pub mod router;
pub mod routes;
pub mod state;
