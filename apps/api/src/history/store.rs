//! File-backed record store, newest first, capped at 50.
//!
//! All operations are synchronous and fail closed: an I/O or serialization
//! problem logs a warning and returns `None`/`false`/empty instead of
//! propagating. The worst case is missing history, never a crash.

use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

use tracing::{info, warn};
use uuid::Uuid;

use crate::models::history::HistoryRecord;

/// The store keeps the 50 most recent records; saving past the cap evicts
/// the oldest.
pub const MAX_RECORDS: usize = 50;

pub struct HistoryStore {
    path: PathBuf,
    records: Mutex<Vec<HistoryRecord>>,
}

impl HistoryStore {
    /// Opens the store, loading existing records. A missing file is an
    /// empty store; a corrupt file is logged and treated as empty.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let records = match fs::read_to_string(&path) {
            Ok(data) => match serde_json::from_str::<Vec<HistoryRecord>>(&data) {
                Ok(mut records) => {
                    records.sort_by(|a, b| b.date.cmp(&a.date));
                    records.truncate(MAX_RECORDS);
                    info!("Loaded {} history records from {}", records.len(), path.display());
                    records
                }
                Err(e) => {
                    warn!("History file {} is corrupt ({e}); starting empty", path.display());
                    Vec::new()
                }
            },
            Err(_) => Vec::new(),
        };
        Self {
            path,
            records: Mutex::new(records),
        }
    }

    /// Prepends a record, evicting beyond the cap, and persists. Returns
    /// the stored record, or `None` when persisting failed (the in-memory
    /// list is left unchanged in that case).
    pub fn save(&self, record: HistoryRecord) -> Option<HistoryRecord> {
        let mut records = self.records.lock().ok()?;
        let mut next = records.clone();
        next.insert(0, record.clone());
        next.truncate(MAX_RECORDS);
        if !self.persist(&next) {
            return None;
        }
        *records = next;
        Some(record)
    }

    /// All records, newest first.
    pub fn list(&self) -> Vec<HistoryRecord> {
        self.records.lock().map(|r| r.clone()).unwrap_or_default()
    }

    pub fn get(&self, id: Uuid) -> Option<HistoryRecord> {
        self.records
            .lock()
            .ok()?
            .iter()
            .find(|r| r.id == id)
            .cloned()
    }

    /// Removes exactly one record; `false` for an unknown id. The order of
    /// the remaining records is untouched.
    pub fn delete(&self, id: Uuid) -> bool {
        let Ok(mut records) = self.records.lock() else {
            return false;
        };
        let Some(index) = records.iter().position(|r| r.id == id) else {
            return false;
        };
        let mut next = records.clone();
        next.remove(index);
        if !self.persist(&next) {
            return false;
        }
        *records = next;
        true
    }

    pub fn clear(&self) -> bool {
        let Ok(mut records) = self.records.lock() else {
            return false;
        };
        if !self.persist(&[]) {
            return false;
        }
        records.clear();
        true
    }

    /// Serializes the full record list for download.
    pub fn export(&self) -> Option<String> {
        let records = self.records.lock().ok()?;
        match serde_json::to_string_pretty(&*records) {
            Ok(json) => Some(json),
            Err(e) => {
                warn!("History export failed: {e}");
                None
            }
        }
    }

    /// Replaces the stored list with an exported blob. Invalid payloads
    /// leave the store untouched and return `false`.
    pub fn import(&self, data: &str) -> bool {
        let mut imported: Vec<HistoryRecord> = match serde_json::from_str(data) {
            Ok(records) => records,
            Err(e) => {
                warn!("History import rejected: {e}");
                return false;
            }
        };
        imported.sort_by(|a, b| b.date.cmp(&a.date));
        imported.truncate(MAX_RECORDS);

        let Ok(mut records) = self.records.lock() else {
            return false;
        };
        if !self.persist(&imported) {
            return false;
        }
        *records = imported;
        true
    }

    fn persist(&self, records: &[HistoryRecord]) -> bool {
        let json = match serde_json::to_string_pretty(records) {
            Ok(json) => json,
            Err(e) => {
                warn!("History serialization failed: {e}");
                return false;
            }
        };
        if let Err(e) = fs::write(&self.path, json) {
            warn!("History write to {} failed: {e}", self.path.display());
            return false;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::history::{SessionSummary, SkillVector};
    use crate::models::interview::{Difficulty, KnowledgeLevel, Role, TierCounts};
    use chrono::{Duration, Utc};

    fn record(score: u32, minutes_ago: i64) -> HistoryRecord {
        HistoryRecord {
            id: Uuid::new_v4(),
            date: Utc::now() - Duration::minutes(minutes_ago),
            role: Role::Backend,
            difficulty: Difficulty::Mid,
            score,
            skills: SkillVector::default(),
            summary: SessionSummary {
                questions_count: 5,
                answered_count: 5,
                duration_ms: 60_000,
                knowledge_level: KnowledgeLevel::Intermediate,
                strengths: vec!["clear structure".to_string()],
                weaknesses: Vec::new(),
                stats: TierCounts {
                    correct: 3,
                    partial: 2,
                    incorrect: 0,
                },
            },
        }
    }

    fn temp_store() -> (tempfile::TempDir, HistoryStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = HistoryStore::open(dir.path().join("history.json"));
        (dir, store)
    }

    #[test]
    fn test_missing_file_opens_empty() {
        let (_dir, store) = temp_store();
        assert!(store.list().is_empty());
    }

    #[test]
    fn test_save_prepends_newest_first() {
        let (_dir, store) = temp_store();
        let older = store.save(record(60, 10)).unwrap();
        let newer = store.save(record(70, 0)).unwrap();
        let list = store.list();
        assert_eq!(list[0].id, newer.id);
        assert_eq!(list[1].id, older.id);
    }

    #[test]
    fn test_cap_evicts_oldest_on_51st_save() {
        let (_dir, store) = temp_store();
        let first = store.save(record(50, 100)).unwrap();
        for i in 0..MAX_RECORDS {
            store.save(record(50, (MAX_RECORDS - i) as i64)).unwrap();
        }
        let list = store.list();
        assert_eq!(list.len(), MAX_RECORDS);
        assert!(!list.iter().any(|r| r.id == first.id));
    }

    #[test]
    fn test_delete_unknown_id_is_noop_false() {
        let (_dir, store) = temp_store();
        store.save(record(50, 0)).unwrap();
        assert!(!store.delete(Uuid::new_v4()));
        assert_eq!(store.list().len(), 1);
    }

    #[test]
    fn test_delete_removes_exactly_one_preserving_order() {
        let (_dir, store) = temp_store();
        let a = store.save(record(50, 20)).unwrap();
        let b = store.save(record(60, 10)).unwrap();
        let c = store.save(record(70, 0)).unwrap();
        assert!(store.delete(b.id));
        let list = store.list();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].id, c.id);
        assert_eq!(list[1].id, a.id);
    }

    #[test]
    fn test_clear_empties_the_store() {
        let (_dir, store) = temp_store();
        store.save(record(50, 0)).unwrap();
        assert!(store.clear());
        assert!(store.list().is_empty());
    }

    #[test]
    fn test_export_import_round_trip() {
        let (_dir, store) = temp_store();
        store.save(record(50, 20)).unwrap();
        store.save(record(88, 0)).unwrap();
        let exported = store.export().unwrap();

        let (_dir2, other) = temp_store();
        assert!(other.import(&exported));
        let original = store.list();
        let restored = other.list();
        assert_eq!(original.len(), restored.len());
        for (a, b) in original.iter().zip(&restored) {
            assert_eq!(a.id, b.id);
            assert_eq!(a.score, b.score);
        }
    }

    #[test]
    fn test_import_rejects_garbage_and_keeps_data() {
        let (_dir, store) = temp_store();
        store.save(record(50, 0)).unwrap();
        assert!(!store.import("not json at all"));
        assert_eq!(store.list().len(), 1);
    }

    #[test]
    fn test_reopen_reads_persisted_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.json");
        let saved = {
            let store = HistoryStore::open(&path);
            store.save(record(73, 0)).unwrap()
        };
        let reopened = HistoryStore::open(&path);
        let list = reopened.list();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].id, saved.id);
        assert_eq!(list[0].score, 73);
    }

    #[test]
    fn test_corrupt_file_opens_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.json");
        fs::write(&path, "{{{{ definitely not json").unwrap();
        let store = HistoryStore::open(&path);
        assert!(store.list().is_empty());
    }
}
