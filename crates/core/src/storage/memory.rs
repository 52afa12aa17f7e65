use crate::domain::record::{NewRecord, StoredRecord};
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Process-lifetime store of generated itineraries. Records are written once
/// and never updated or evicted.
#[derive(Debug, Default)]
pub struct ItineraryStore {
    records: RwLock<HashMap<Uuid, StoredRecord>>,
}

impl ItineraryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assigns a fresh id and creation time, stores the record and returns the
    /// stored copy. Id assignment and insert happen under one write lock.
    pub async fn put(&self, record: NewRecord) -> StoredRecord {
        let mut records = self.records.write().await;
        let mut id = Uuid::new_v4();
        while records.contains_key(&id) {
            id = Uuid::new_v4();
        }

        let stored = StoredRecord {
            id,
            destination: record.destination,
            budget: record.budget,
            days: record.days,
            itinerary: record.itinerary,
            weather: record.weather,
            created_at: Utc::now(),
        };
        records.insert(id, stored.clone());
        tracing::debug!(%id, total = records.len(), "stored itinerary record");
        stored
    }

    /// Looks up a record by its textual id. Ids that are not valid UUIDs are
    /// simply unknown.
    pub async fn get(&self, id: &str) -> Option<StoredRecord> {
        let id = Uuid::parse_str(id.trim()).ok()?;
        self.records.read().await.get(&id).cloned()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
