pub mod resource;
pub mod trash;
pub mod video;
