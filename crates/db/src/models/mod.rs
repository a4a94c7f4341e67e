//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO built from the validated payload
//! - A `Deserialize` update DTO (optional fields) for partial application
//! - The entity's rule set, parsed once

pub mod cast_member;
pub mod category;
pub mod genre;
pub mod video;
