pub mod builder;
pub mod dates;
pub mod model;
pub mod notify;
pub mod store;
pub mod subscription;

pub use builder::{EventBuilder, EventFields, customisable_label};
pub use model::{Attribute, AttributeType, Event, Note};
pub use notify::NotificationSink;
pub use store::NoteStore;
