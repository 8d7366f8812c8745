//! Latest-value map of raw download progress.
//!
//! The narrower progress channel pushes `{download_id, progress,
//! status, message}` frames for single downloads outside any workflow.
//! [`ProgressMap`] keeps the latest frame per download id; entries are
//! upserted on receipt and only removed by an explicit
//! [`clear`](ProgressMap::clear) from the consumer.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::DbId;

/// One progress frame from the download channel.
///
/// `status` stays a free string: the tracker emits values outside the
/// download lifecycle enum (e.g. `"unknown"`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressUpdate {
    pub download_id: DbId,
    pub progress: f64,
    pub status: String,
    /// May arrive as `null`.
    #[serde(default)]
    pub message: Option<String>,
}

/// Latest known progress for one download, with receipt time.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressEntry {
    pub progress: f64,
    pub status: String,
    pub message: String,
    pub observed_at: DateTime<Utc>,
}

/// Per-download latest-value store.
#[derive(Debug, Clone, Default)]
pub struct ProgressMap {
    entries: HashMap<DbId, ProgressEntry>,
}

impl ProgressMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record (or replace) the latest frame for its download id.
    pub fn upsert(&mut self, update: ProgressUpdate) {
        self.entries.insert(
            update.download_id,
            ProgressEntry {
                progress: update.progress,
                status: update.status,
                message: update.message.unwrap_or_default(),
                observed_at: Utc::now(),
            },
        );
    }

    pub fn get(&self, download_id: DbId) -> Option<&ProgressEntry> {
        self.entries.get(&download_id)
    }

    /// Drop a download's entry. Entries are never expired implicitly.
    pub fn clear(&mut self, download_id: DbId) -> bool {
        self.entries.remove(&download_id).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (DbId, &ProgressEntry)> {
        self.entries.iter().map(|(id, e)| (*id, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn update(id: DbId, progress: f64, status: &str) -> ProgressUpdate {
        ProgressUpdate {
            download_id: id,
            progress,
            status: status.to_string(),
            message: None,
        }
    }

    #[test]
    fn upsert_replaces_previous_frame() {
        let mut map = ProgressMap::new();
        map.upsert(update(1, 10.0, "downloading"));
        map.upsert(update(1, 55.5, "downloading"));

        let entry = map.get(1).unwrap();
        assert_eq!(entry.progress, 55.5);
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn entries_survive_until_cleared() {
        let mut map = ProgressMap::new();
        map.upsert(update(1, 100.0, "completed"));
        map.upsert(update(2, 0.0, "failed"));

        assert!(map.clear(1));
        assert!(!map.clear(1));
        assert!(map.get(2).is_some());
    }

    #[test]
    fn frame_parses_without_message() {
        let frame: ProgressUpdate =
            serde_json::from_str(r#"{"download_id":3,"progress":42.0,"status":"downloading"}"#)
                .unwrap();
        assert_eq!(frame.download_id, 3);
        assert_eq!(frame.message, None);
    }
}
