//! Persistence - SQLite-backed key-value records
//!
//! Two independent JSON records, written wholesale on every mutation:
//! the log map (exercise id -> entry) and the order map (day id -> id
//! sequence). A read that fails for any reason degrades to an empty map;
//! the application always starts from a valid state.

use std::collections::HashMap;
use std::path::Path;

use anyhow::Result;
use rusqlite::{Connection, OptionalExtension, params};
use serde::{Serialize, de::DeserializeOwned};
use tracing::warn;

use crate::entry::LogEntry;

const LOGS_KEY: &str = "workout_logs_v2";
const ORDER_KEY: &str = "exercise_order_v1";

pub type LogsMap = HashMap<String, LogEntry>;
pub type OrderMap = HashMap<String, Vec<String>>;

/// Key-value store wrapper
pub struct Store {
    conn: Connection,
}

impl Store {
    /// Open or create the store file
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        let store = Self { conn };
        store.init_schema()?;
        Ok(store)
    }

    /// Ephemeral store: everything works, nothing survives the process.
    /// Used as the degraded fallback when the file cannot be opened.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> Result<()> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS records (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            )",
            [],
        )?;
        Ok(())
    }

    fn get_raw(&self, key: &str) -> Option<String> {
        let row = self
            .conn
            .query_row("SELECT value FROM records WHERE key = ?1", params![key], |row| {
                row.get(0)
            })
            .optional();
        match row {
            Ok(value) => value,
            Err(e) => {
                warn!(key, error = %e, "record read failed, treating as absent");
                None
            }
        }
    }

    fn load_record<T: DeserializeOwned + Default>(&self, key: &str) -> T {
        match self.get_raw(key) {
            None => T::default(),
            Some(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                warn!(key, error = %e, "discarding malformed record");
                T::default()
            }),
        }
    }

    fn save_record<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let json = serde_json::to_string(value)?;
        self.conn.execute(
            "INSERT OR REPLACE INTO records (key, value) VALUES (?1, ?2)",
            params![key, json],
        )?;
        Ok(())
    }

    pub fn load_logs(&self) -> LogsMap {
        self.load_record(LOGS_KEY)
    }

    pub fn save_logs(&self, logs: &LogsMap) -> Result<()> {
        self.save_record(LOGS_KEY, logs)
    }

    pub fn load_order(&self) -> OrderMap {
        self.load_record(ORDER_KEY)
    }

    pub fn save_order(&self, order: &OrderMap) -> Result<()> {
        self.save_record(ORDER_KEY, order)
    }

    /// Drop both records
    pub fn clear(&self) -> Result<()> {
        self.conn
            .execute("DELETE FROM records WHERE key IN (?1, ?2)", params![LOGS_KEY, ORDER_KEY])?;
        Ok(())
    }

    /// True when a record row exists for the key (test hook for reset)
    pub fn has_record(&self, key: &str) -> bool {
        self.get_raw(key).is_some()
    }
}

/// Record keys, exposed for inspection in tests and diagnostics
pub mod keys {
    pub const LOGS: &str = super::LOGS_KEY;
    pub const ORDER: &str = super::ORDER_KEY;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::{SetData, build_dynamic, build_standard};
    use tempfile::TempDir;

    fn temp_store() -> (TempDir, Store) {
        let dir = TempDir::new().unwrap();
        let store = Store::open(&dir.path().join("test.db")).unwrap();
        (dir, store)
    }

    #[test]
    fn test_fresh_store_is_empty() {
        let (_dir, store) = temp_store();
        assert!(store.load_logs().is_empty());
        assert!(store.load_order().is_empty());
    }

    #[test]
    fn test_logs_round_trip_is_identical() {
        let (dir, store) = temp_store();

        let mut logs = LogsMap::new();
        logs.insert("lun_1".to_string(), build_standard("3", "10", "50", "note").unwrap());
        logs.insert(
            "mar_1".to_string(),
            build_dynamic(
                &[SetData { reps: "10".into(), kg: "60".into() }],
                "",
            )
            .unwrap(),
        );
        store.save_logs(&logs).unwrap();

        // same handle and a reopened handle both observe the write
        assert_eq!(store.load_logs(), logs);
        drop(store);
        let reopened = Store::open(&dir.path().join("test.db")).unwrap();
        assert_eq!(reopened.load_logs(), logs);
    }

    #[test]
    fn test_order_round_trip_is_identical() {
        let (_dir, store) = temp_store();

        let mut order = OrderMap::new();
        order.insert("lun".to_string(), vec!["lun_2".to_string(), "lun_1".to_string()]);
        store.save_order(&order).unwrap();
        assert_eq!(store.load_order(), order);
    }

    #[test]
    fn test_malformed_record_degrades_to_empty() {
        let (_dir, store) = temp_store();
        store
            .conn
            .execute(
                "INSERT INTO records (key, value) VALUES (?1, ?2)",
                params![keys::LOGS, "{not json"],
            )
            .unwrap();

        assert!(store.load_logs().is_empty());

        // a subsequent save repairs the record
        let mut logs = LogsMap::new();
        logs.insert("lun_1".to_string(), build_standard("3", "10", "50", "").unwrap());
        store.save_logs(&logs).unwrap();
        assert_eq!(store.load_logs(), logs);
    }

    #[test]
    fn test_clear_removes_both_records() {
        let (_dir, store) = temp_store();

        let mut logs = LogsMap::new();
        logs.insert("lun_1".to_string(), build_standard("3", "10", "50", "").unwrap());
        store.save_logs(&logs).unwrap();
        let mut order = OrderMap::new();
        order.insert("lun".to_string(), vec!["lun_1".to_string()]);
        store.save_order(&order).unwrap();

        store.clear().unwrap();
        assert!(!store.has_record(keys::LOGS));
        assert!(!store.has_record(keys::ORDER));
        assert!(store.load_logs().is_empty());
        assert!(store.load_order().is_empty());
    }

    #[test]
    fn test_in_memory_store_works() {
        let store = Store::open_in_memory().unwrap();
        let mut order = OrderMap::new();
        order.insert("sab".to_string(), vec!["sab_2".to_string(), "sab_1".to_string()]);
        store.save_order(&order).unwrap();
        assert_eq!(store.load_order(), order);
    }
}
