//! Common types and traits for all backend resources

pub mod entity_metadata;
pub mod resource;

// Re-exports
pub use entity_metadata::EntityMetadata;
pub use resource::Resource;
