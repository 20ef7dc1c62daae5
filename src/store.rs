//! Persistence collaborator: an opaque key/value + event-append store.
//!
//! The service only needs `get`, `set` and `append`. `MemoryStore` keeps everything in
//! process memory; a real backend would implement the same trait.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, instrument};

/// One tracked learning event.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LearningEvent {
  pub id: String,
  pub event_type: String,
  pub user_id: String,
  pub course_id: Option<String>,
  pub question_id: String,
  pub subject: String,
  pub concept: String,
  pub similarity: f64,
  pub score: u32,
  pub classification: String,
  pub attempt_number: u32,
  pub timestamp_ms: u64,
}

#[async_trait]
pub trait Store: Send + Sync {
  async fn get(&self, id: &str) -> Result<Option<serde_json::Value>, String>;
  async fn set(&self, id: &str, record: serde_json::Value) -> Result<(), String>;
  async fn append(&self, event: LearningEvent) -> Result<(), String>;
}

#[derive(Default)]
pub struct MemoryStore {
  records: RwLock<HashMap<String, serde_json::Value>>,
  events: RwLock<Vec<LearningEvent>>,
}

impl MemoryStore {
  pub fn new() -> Self { Self::default() }

  /// Snapshot of every appended event, oldest first.
  #[cfg(test)]
  pub async fn events(&self) -> Vec<LearningEvent> {
    self.events.read().await.clone()
  }
}

#[async_trait]
impl Store for MemoryStore {
  #[instrument(level = "debug", skip(self))]
  async fn get(&self, id: &str) -> Result<Option<serde_json::Value>, String> {
    Ok(self.records.read().await.get(id).cloned())
  }

  #[instrument(level = "debug", skip(self, record))]
  async fn set(&self, id: &str, record: serde_json::Value) -> Result<(), String> {
    self.records.write().await.insert(id.to_string(), record);
    Ok(())
  }

  #[instrument(level = "debug", skip(self, event), fields(event_id = %event.id, event_type = %event.event_type))]
  async fn append(&self, event: LearningEvent) -> Result<(), String> {
    let mut events = self.events.write().await;
    events.push(event);
    debug!(target: "sea_bridge", total = events.len(), "Learning event appended");
    Ok(())
  }
}
