// File: ./src/subscription.rs
// Explicit observer wiring for client components: callbacks registered and
// removed by event name. The event builder itself does not use this; it
// exists for embedders that refresh their calendar when the note graph
// changes (e.g. on an "entitiesReloaded" event).
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

pub type HandlerId = u64;

type Handler = Arc<dyn Fn(&Value) + Send + Sync>;

#[derive(Default)]
pub struct EventSubscriptions {
    next_id: HandlerId,
    handlers: HashMap<String, Vec<(HandlerId, Handler)>>,
}

impl EventSubscriptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a callback for an event name and returns the id to
    /// unregister it with.
    pub fn register<F>(&mut self, event_name: &str, handler: F) -> HandlerId
    where
        F: Fn(&Value) + Send + Sync + 'static,
    {
        self.next_id += 1;
        let id = self.next_id;
        self.handlers
            .entry(event_name.to_string())
            .or_default()
            .push((id, Arc::new(handler)));
        id
    }

    /// Removes a previously registered callback. Returns false when the id is
    /// unknown (e.g. already unregistered).
    pub fn unregister(&mut self, id: HandlerId) -> bool {
        let mut removed = false;
        self.handlers.retain(|_, handlers| {
            let before = handlers.len();
            handlers.retain(|(handler_id, _)| *handler_id != id);
            removed |= handlers.len() != before;
            !handlers.is_empty()
        });
        removed
    }

    /// Invokes every callback registered for the event name, in registration
    /// order. Unknown event names are a no-op.
    pub fn emit(&self, event_name: &str, payload: &Value) {
        if let Some(handlers) = self.handlers.get(event_name) {
            for (_, handler) in handlers {
                handler(payload);
            }
        }
    }

    pub fn handler_count(&self, event_name: &str) -> usize {
        self.handlers.get(event_name).map_or(0, Vec::len)
    }
}
