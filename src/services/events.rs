// src/services/events.rs
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::models::{Asset, Domain};

/// What happened to a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Created,
    Updated,
    Deleted,
}

/// A committed change, carrying the full row as it was written (or, for a
/// delete, as it was last seen).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "entity", rename_all = "lowercase")]
pub enum CatalogEvent {
    Domain { kind: ChangeKind, record: Domain },
    Asset { kind: ChangeKind, record: Asset },
}

/// Broadcast hub for catalog changes. Publishing never blocks; subscribers
/// that fall behind see a lag error on their receiver rather than slowing
/// the writer down, and dropping a receiver is the whole unsubscribe story.
#[derive(Debug, Clone)]
pub struct CatalogEvents {
    sender: broadcast::Sender<CatalogEvent>,
}

impl CatalogEvents {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<CatalogEvent> {
        self.sender.subscribe()
    }

    pub fn publish(&self, event: CatalogEvent) {
        // Err means no live subscribers, which is fine.
        let _ = self.sender.send(event);
    }
}

impl Default for CatalogEvents {
    fn default() -> Self {
        Self::new(64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn sample_domain() -> Domain {
        let now = Utc::now();
        Domain {
            id: 1,
            name: "Hydrology".to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn every_subscriber_sees_every_event() {
        let events = CatalogEvents::default();
        let mut first = events.subscribe();
        let mut second = events.subscribe();

        let event = CatalogEvent::Domain {
            kind: ChangeKind::Created,
            record: sample_domain(),
        };
        events.publish(event.clone());

        assert_eq!(first.recv().await.unwrap(), event);
        assert_eq!(second.recv().await.unwrap(), event);
    }

    #[tokio::test]
    async fn publishing_without_subscribers_is_a_no_op() {
        let events = CatalogEvents::default();
        events.publish(CatalogEvent::Domain {
            kind: ChangeKind::Deleted,
            record: sample_domain(),
        });
    }

    #[test]
    fn events_tag_entity_and_kind_in_the_payload() {
        let json = serde_json::to_value(CatalogEvent::Domain {
            kind: ChangeKind::Updated,
            record: sample_domain(),
        })
        .unwrap();
        assert_eq!(json["entity"], "domain");
        assert_eq!(json["kind"], "updated");
        assert_eq!(json["record"]["name"], "Hydrology");
    }
}
