//! Per-user analysis history, newest first, capped per user.
//!
//! Appends are read-modify-write on one user's list under a single mutex, so
//! concurrent uploads from the same user cannot lose records.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::analyze::{AnalysisResult, Tone};
use crate::store::{load_json_or_default, save_json_atomic, StoreError};

pub const DEFAULT_HISTORY_CAP: usize = 30;

/// One analysed upload as returned to the client and kept in history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub id: Uuid,
    pub filename: String,
    pub extracted_text: String,
    pub summary: String,
    /// Hashtag form (`#token`).
    pub keywords: Vec<String>,
    pub tone: Tone,
    pub timestamp: DateTime<Utc>,
}

impl HistoryRecord {
    pub fn new(
        id: Uuid,
        filename: impl Into<String>,
        extracted_text: &str,
        result: AnalysisResult,
    ) -> Self {
        let keywords = result.hashtags();
        Self {
            id,
            filename: filename.into(),
            extracted_text: extracted_text.trim().to_string(),
            summary: result.summary,
            keywords,
            tone: result.tone,
            timestamp: Utc::now(),
        }
    }
}

#[derive(Debug)]
pub struct HistoryStore {
    path: Option<PathBuf>,
    inner: Mutex<HashMap<String, Vec<HistoryRecord>>>,
    cap: usize,
}

impl HistoryStore {
    /// Load history from `path` (missing file → empty). Lists already longer
    /// than `cap` are cut down on load.
    pub fn open(path: impl Into<PathBuf>, cap: usize) -> Result<Self, StoreError> {
        let path = path.into();
        let cap = cap.max(1);
        let mut all: HashMap<String, Vec<HistoryRecord>> = load_json_or_default(&path)?;
        for list in all.values_mut() {
            list.truncate(cap);
        }
        Ok(Self {
            path: Some(path),
            inner: Mutex::new(all),
            cap,
        })
    }

    pub fn in_memory(cap: usize) -> Self {
        Self {
            path: None,
            inner: Mutex::new(HashMap::new()),
            cap: cap.max(1),
        }
    }

    pub fn cap(&self) -> usize {
        self.cap
    }

    /// Insert `record` at the front of `user`'s list and drop anything past the cap.
    /// If the file cannot be written the in-memory list is left as it was.
    pub fn append(&self, user: &str, record: HistoryRecord) -> Result<(), StoreError> {
        let mut all = self.inner.lock().expect("history mutex poisoned");
        let previous = all.get(user).cloned();
        let list = all.entry(user.to_string()).or_default();
        list.insert(0, record);
        list.truncate(self.cap);
        if let Some(path) = &self.path {
            if let Err(e) = save_json_atomic(path, &*all) {
                match previous {
                    Some(list) => {
                        all.insert(user.to_string(), list);
                    }
                    None => {
                        all.remove(user);
                    }
                }
                return Err(e);
            }
        }
        Ok(())
    }

    /// `user`'s records, newest first. Unknown users get an empty list.
    pub fn read(&self, user: &str) -> Vec<HistoryRecord> {
        let all = self.inner.lock().expect("history mutex poisoned");
        all.get(user).cloned().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(n: usize) -> HistoryRecord {
        HistoryRecord::new(
            Uuid::new_v4(),
            format!("scan-{n}.png"),
            &format!("  text {n}  "),
            AnalysisResult {
                summary: format!("summary {n}"),
                keywords: vec![format!("k{n}")],
                tone: Tone::Neutral,
            },
        )
    }

    #[test]
    fn newest_first_and_capped() {
        let h = HistoryStore::in_memory(3);
        for n in 0..5 {
            h.append("ann@example.com", record(n)).unwrap();
        }
        let names: Vec<_> = h
            .read("ann@example.com")
            .into_iter()
            .map(|r| r.filename)
            .collect();
        assert_eq!(names, vec!["scan-4.png", "scan-3.png", "scan-2.png"]);
    }

    #[test]
    fn users_are_partitioned() {
        let h = HistoryStore::in_memory(DEFAULT_HISTORY_CAP);
        h.append("ann@example.com", record(1)).unwrap();
        assert_eq!(h.read("ann@example.com").len(), 1);
        assert!(h.read("bob@example.com").is_empty());
    }

    #[test]
    fn record_trims_text_and_formats_hashtags() {
        let r = record(7);
        assert_eq!(r.extracted_text, "text 7");
        assert_eq!(r.keywords, vec!["#k7"]);
    }
}
