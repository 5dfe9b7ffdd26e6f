//! Event storage with filtering
//!
//! Thread-safe storage for tracer events, queried with custom predicates.

use super::tracer_events::{EventFilterFn, TracerEvent, TracerRecord};
use std::sync::{Mutex, MutexGuard};

/// Store for capturing and querying tracer events
#[derive(Default)]
pub struct EventStore {
    events: Mutex<Vec<Box<dyn TracerEvent>>>,
}

impl EventStore {
    fn lock(&self) -> MutexGuard<'_, Vec<Box<dyn TracerEvent>>> {
        // A panic while holding the lock leaves the Vec itself intact
        self.events.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn store(&self, event: Box<dyn TracerEvent>) {
        self.lock().push(event);
    }

    fn passes(event: &dyn TracerEvent, filter_func: Option<&dyn EventFilterFn>) -> bool {
        filter_func.map_or(true, |filter| filter.matches(event))
    }

    /// Get typed copies of events matching the filter, in recording order
    pub fn get_records(&self, filter_func: Option<&dyn EventFilterFn>) -> Vec<TracerRecord> {
        self.lock()
            .iter()
            .filter(|e| Self::passes(e.as_ref(), filter_func))
            .map(|e| e.to_record())
            .collect()
    }

    /// Get the last N event summaries, optionally filtered
    pub fn get_last_n_summaries(
        &self,
        n: usize,
        filter_func: Option<&dyn EventFilterFn>,
    ) -> Vec<String> {
        let mut summaries: Vec<String> = self
            .lock()
            .iter()
            .filter(|e| Self::passes(e.as_ref(), filter_func))
            .map(|e| e.printable_summary())
            .collect();
        let skip = summaries.len().saturating_sub(n);
        summaries.drain(..skip);
        summaries
    }

    /// Clear all events from the store
    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Get the total number of events in the store
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Check if the store is empty
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracer::tracer_events::AgentInteractionTracerEvent;

    fn interaction(timestamp: f64, correlation_id: &str, to_agent: &str) -> Box<dyn TracerEvent> {
        Box::new(AgentInteractionTracerEvent {
            timestamp,
            correlation_id: correlation_id.to_string(),
            source: "test".to_string(),
            from_agent: "router".to_string(),
            to_agent: to_agent.to_string(),
            event_type: "dispatch".to_string(),
            event_id: None,
        })
    }

    #[test]
    fn test_store_event() {
        let store = EventStore::default();
        store.store(interaction(1.0, "a", "math"));

        assert_eq!(store.len(), 1);
        assert!(!store.is_empty());
    }

    #[test]
    fn test_custom_filter_and_records() {
        let store = EventStore::default();
        store.store(interaction(1.0, "turn-1", "math"));
        store.store(interaction(2.0, "turn-2", "weather"));
        store.store(interaction(3.0, "turn-1", "research"));

        let filter = |e: &dyn TracerEvent| e.correlation_id() == "turn-1";
        let records = store.get_records(Some(&filter));

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].timestamp(), 1.0);
        assert_eq!(records[1].timestamp(), 3.0);
    }

    #[test]
    fn test_last_n_summaries() {
        let store = EventStore::default();
        store.store(interaction(1.0, "a", "math"));
        store.store(interaction(2.0, "a", "weather"));
        store.store(interaction(3.0, "a", "research"));

        let last_two = store.get_last_n_summaries(2, None);
        assert_eq!(last_two.len(), 2);
        assert!(last_two[0].contains("weather"));
        assert!(last_two[1].contains("research"));

        assert_eq!(store.get_last_n_summaries(10, None).len(), 3);
    }

    #[test]
    fn test_clear() {
        let store = EventStore::default();
        store.store(interaction(1.0, "a", "math"));
        store.clear();

        assert!(store.is_empty());
    }
}
