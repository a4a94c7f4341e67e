//! Shared query parameter types for API handlers.

use serde::Deserialize;

/// Query parameters for endpoints that can include soft-deleted rows
/// (`?with_deleted=true`).
#[derive(Debug, Default, Deserialize)]
pub struct WithDeletedParams {
    #[serde(default)]
    pub with_deleted: bool,
}
