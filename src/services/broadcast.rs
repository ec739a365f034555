//! Event sinks: a trace-only sink and an in-memory log

use std::sync::Mutex;

use super::Broadcaster;

#[derive(Debug, Clone, PartialEq)]
pub struct PublishedEvent {
    pub event: String,
    pub payload: serde_json::Value,
}

/// Keeps every published event; also traces it
#[derive(Debug, Default)]
pub struct EventLog {
    events: Mutex<Vec<PublishedEvent>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<PublishedEvent> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }

    pub fn named(&self, event: &str) -> Vec<PublishedEvent> {
        self.events()
            .into_iter()
            .filter(|e| e.event == event)
            .collect()
    }

    pub fn drain(&self) -> Vec<PublishedEvent> {
        self.events
            .lock()
            .map(|mut e| std::mem::take(&mut *e))
            .unwrap_or_default()
    }
}

impl Broadcaster for EventLog {
    fn publish(&self, event: &str, payload: serde_json::Value) {
        tracing::trace!(event, %payload, "publish");
        if let Ok(mut events) = self.events.lock() {
            events.push(PublishedEvent {
                event: event.to_string(),
                payload,
            });
        }
    }
}

/// Traces every event and keeps nothing
#[derive(Debug, Default, Clone, Copy)]
pub struct TraceBroadcaster;

impl Broadcaster for TraceBroadcaster {
    fn publish(&self, event: &str, payload: serde_json::Value) {
        tracing::debug!(event, %payload, "publish");
    }
}

impl<T: Broadcaster + ?Sized> Broadcaster for std::sync::Arc<T> {
    fn publish(&self, event: &str, payload: serde_json::Value) {
        (**self).publish(event, payload)
    }
}
