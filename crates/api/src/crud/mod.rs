//! Generic CRUD orchestration shared by every resource.
//!
//! [`ResourceHandler`] runs the five standard actions for any
//! [`Resource`](catalog_db::repositories::Resource). [`RelationalHandler`]
//! wraps it for resources that own many-to-many associations, running each
//! write and its [`RelationSync`] step in one transaction.

mod handler;
mod relational;

pub use handler::ResourceHandler;
pub use relational::{RelationSync, RelationalHandler};
