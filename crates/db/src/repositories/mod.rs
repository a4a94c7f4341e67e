//! Repository layer: one zero-sized struct per table.
//!
//! Entity repositories implement [`Resource`]; list, lookup and the
//! soft-delete lifecycle come from its provided methods.

pub mod cast_member_repo;
pub mod category_repo;
pub mod genre_repo;
pub mod reference_repo;
pub mod resource;
pub mod trash_repo;
pub mod video_repo;

pub use cast_member_repo::CastMemberRepo;
pub use category_repo::CategoryRepo;
pub use genre_repo::GenreRepo;
pub use reference_repo::ReferenceRepo;
pub use resource::Resource;
pub use trash_repo::TrashRepo;
pub use video_repo::VideoRepo;
