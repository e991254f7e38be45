// File: ./src/notify.rs
// User-visible error reporting boundary. Fire-and-forget: the builder never
// waits on or inspects the outcome of a notification.
use log::error;
use std::sync::Mutex;

pub trait NotificationSink: Send + Sync {
    fn show_error(&self, message: &str);
}

/// Routes notifications to the log when no toast layer is wired in.
pub struct LogNotifier;

impl NotificationSink for LogNotifier {
    fn show_error(&self, message: &str) {
        error!("{}", message);
    }
}

/// Collects messages for later inspection. Used by tests and headless
/// embedders.
#[derive(Default)]
pub struct BufferedNotifier {
    messages: Mutex<Vec<String>>,
}

impl BufferedNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<String> {
        match self.messages.lock() {
            Ok(messages) => messages.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl NotificationSink for BufferedNotifier {
    fn show_error(&self, message: &str) {
        match self.messages.lock() {
            Ok(mut messages) => messages.push(message.to_string()),
            Err(poisoned) => poisoned.into_inner().push(message.to_string()),
        }
    }
}
