// File: ./src/model/mod.rs
// Aggregates the split model files
pub mod event;
pub mod note;

// Re-export types so callers can use `crate::model::Note` directly
pub use event::Event;
pub use note::{Attribute, AttributeType, Note};
