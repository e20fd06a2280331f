//! In-memory event sink for indexers and tests.

use crate::events::GovernanceEvent;
use crate::ports::EventSink;
use parking_lot::RwLock;

/// Append-only event log.
#[derive(Debug, Default)]
pub struct InMemoryEventLog {
    events: RwLock<Vec<GovernanceEvent>>,
}

impl InMemoryEventLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All events in publication order.
    #[must_use]
    pub fn events(&self) -> Vec<GovernanceEvent> {
        self.events.read().clone()
    }

    /// Events with the given topic.
    #[must_use]
    pub fn by_topic(&self, topic: &str) -> Vec<GovernanceEvent> {
        self.events
            .read()
            .iter()
            .filter(|event| event.topic() == topic)
            .cloned()
            .collect()
    }

    /// Number of events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.read().len()
    }

    /// True if nothing was published.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.read().is_empty()
    }

    /// JSON array of every event.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&*self.events.read())
    }
}

impl EventSink for InMemoryEventLog {
    fn publish(&self, event: &GovernanceEvent) {
        self.events.write().push(event.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Address;
    use crate::events::topics;

    #[test]
    fn test_log_and_export() {
        let log = InMemoryEventLog::new();
        assert!(log.is_empty());
        log.publish(&GovernanceEvent::Paused { by: Address::ZERO });
        log.publish(&GovernanceEvent::Unpaused { by: Address::ZERO });

        assert_eq!(log.len(), 2);
        assert_eq!(log.by_topic(topics::UNPAUSED).len(), 1);
        let json: serde_json::Value = serde_json::from_str(&log.to_json().unwrap()).unwrap();
        assert_eq!(json[0]["type"], "Paused");
    }
}
