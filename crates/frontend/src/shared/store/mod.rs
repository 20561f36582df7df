//! Client-side state containers for backend resources

pub mod file;
pub mod handle;
pub mod resource;
pub mod sequence;

pub use file::{FileState, FileStore};
pub use handle::{FileHandle, ResourceHandle};
pub use resource::{DialogKey, ResourceState, ResourceStore};
