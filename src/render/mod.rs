/// Cache of resolved layer images
pub mod cache;
/// Layer stacking and PNG encoding
pub mod compositor;
/// Image source loading bounded by a timeout
pub mod loader;
