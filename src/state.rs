//! Application state - in-memory mirrors with unconditional write-through
//!
//! The controller owns the two mirrors and the active day. Every mutation
//! persists immediately; a failed write is logged and the in-memory state
//! keeps the change, so the UI never blocks on storage.

use tracing::error;

use crate::catalog::{self, Exercise, WeekDay};
use crate::entry::LogEntry;
use crate::ordering::{self, Direction};
use crate::store::{LogsMap, OrderMap, Store};

pub struct AppState {
    store: Store,
    pub logs: LogsMap,
    pub order: OrderMap,
    pub active_day: &'static str,
}

impl AppState {
    /// Initialize the mirrors from storage; the active day defaults to today
    pub fn load(store: Store) -> Self {
        let logs = store.load_logs();
        let order = store.load_order();
        Self { store, logs, order, active_day: catalog::today_id() }
    }

    pub fn active_day_info(&self) -> &'static WeekDay {
        catalog::find_day(self.active_day).unwrap_or(&catalog::WEEK_DAYS[0])
    }

    /// Switch the active day. Unknown ids are ignored.
    pub fn select_day(&mut self, day_id: &str) {
        if let Some(day) = catalog::find_day(day_id) {
            self.active_day = day.id;
        }
    }

    /// A day's exercises in display order (stored permutation over catalog)
    pub fn exercises_for_day(&self, day_id: &str) -> Vec<&'static Exercise> {
        ordering::compute_order(
            catalog::exercises_for_day(day_id),
            self.order.get(day_id).map(|v| v.as_slice()),
        )
    }

    pub fn active_exercises(&self) -> Vec<&'static Exercise> {
        self.exercises_for_day(self.active_day)
    }

    pub fn log_for(&self, exercise_id: &str) -> Option<&LogEntry> {
        self.logs.get(exercise_id)
    }

    /// Replace the entry for an exercise wholesale
    pub fn save_log(&mut self, exercise_id: &str, entry: LogEntry) {
        self.logs.insert(exercise_id.to_string(), entry);
        self.persist_logs();
    }

    /// Delete the entry for an exercise; no-op if absent
    pub fn remove_log(&mut self, exercise_id: &str) {
        if self.logs.remove(exercise_id).is_some() {
            self.persist_logs();
        }
    }

    /// Replace a day's stored order wholesale
    pub fn reorder(&mut self, day_id: &str, new_order: Vec<String>) {
        self.order.insert(day_id.to_string(), new_order);
        self.persist_order();
    }

    /// Move an exercise of the active day one slot up or down. Returns
    /// false for an out-of-bounds move (silently absorbed).
    pub fn move_exercise(&mut self, index: usize, direction: Direction) -> bool {
        let current = self.active_exercises();
        match ordering::move_exercise(&current, index, direction) {
            Some(new_order) => {
                self.reorder(self.active_day, new_order);
                true
            }
            None => false,
        }
    }

    /// Clear both records and both mirrors; equivalent to a fresh start
    pub fn reset_all(&mut self) {
        if let Err(e) = self.store.clear() {
            error!(error = %e, "storage clear failed");
        }
        self.logs.clear();
        self.order.clear();
        self.active_day = catalog::today_id();
    }

    fn persist_logs(&self) {
        if let Err(e) = self.store.save_logs(&self.logs) {
            error!(error = %e, "log write failed, in-memory state kept");
        }
    }

    fn persist_order(&self) {
        if let Err(e) = self.store.save_order(&self.order) {
            error!(error = %e, "order write failed, in-memory state kept");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::build_standard;
    use crate::store::keys;
    use tempfile::TempDir;

    fn temp_state() -> (TempDir, AppState) {
        let dir = TempDir::new().unwrap();
        let store = Store::open(&dir.path().join("state.db")).unwrap();
        (dir, AppState::load(store))
    }

    fn reopen(dir: &TempDir) -> AppState {
        AppState::load(Store::open(&dir.path().join("state.db")).unwrap())
    }

    #[test]
    fn test_save_log_writes_through() {
        let (dir, mut state) = temp_state();
        state.save_log("lun_1", build_standard("3", "10", "50", "").unwrap());

        let reloaded = reopen(&dir);
        assert_eq!(reloaded.log_for("lun_1"), state.log_for("lun_1"));
    }

    #[test]
    fn test_save_log_replaces_wholesale() {
        let (_dir, mut state) = temp_state();
        state.save_log("lun_1", build_standard("3", "10", "50", "old").unwrap());
        state.save_log("lun_1", build_standard("4", "8", "55", "").unwrap());

        let entry = state.log_for("lun_1").unwrap();
        assert_eq!(entry.sets.as_deref(), Some("4"));
        assert!(entry.note.is_none());
    }

    #[test]
    fn test_remove_log_is_noop_when_absent() {
        let (dir, mut state) = temp_state();
        state.remove_log("lun_1");
        assert!(state.logs.is_empty());

        state.save_log("lun_1", build_standard("3", "10", "50", "").unwrap());
        state.remove_log("lun_1");
        assert!(state.logs.is_empty());
        assert!(reopen(&dir).logs.is_empty());
    }

    #[test]
    fn test_reorder_persists_and_orders_day() {
        let (dir, mut state) = temp_state();
        state.select_day("mar");
        assert!(state.move_exercise(1, Direction::Up));

        let ids: Vec<_> = state.active_exercises().iter().map(|ex| ex.id).collect();
        assert_eq!(&ids[..2], &["mar_2", "mar_1"]);

        let mut reloaded = reopen(&dir);
        reloaded.select_day("mar");
        let ids: Vec<_> = reloaded.active_exercises().iter().map(|ex| ex.id).collect();
        assert_eq!(&ids[..2], &["mar_2", "mar_1"]);
    }

    #[test]
    fn test_move_out_of_bounds_changes_nothing() {
        let (_dir, mut state) = temp_state();
        state.select_day("mar");
        assert!(!state.move_exercise(0, Direction::Up));
        assert!(state.order.is_empty());
    }

    #[test]
    fn test_select_day_ignores_unknown_id() {
        let (_dir, mut state) = temp_state();
        state.select_day("sab");
        state.select_day("xyz");
        assert_eq!(state.active_day, "sab");
    }

    #[test]
    fn test_reset_clears_state_and_records() {
        let (dir, mut state) = temp_state();
        state.save_log("lun_1", build_standard("3", "10", "50", "").unwrap());
        state.select_day("mar");
        state.move_exercise(1, Direction::Up);

        state.reset_all();
        assert!(state.logs.is_empty());
        assert!(state.order.is_empty());
        assert_eq!(state.active_day, catalog::today_id());

        let store = Store::open(&dir.path().join("state.db")).unwrap();
        assert!(!store.has_record(keys::LOGS));
        assert!(!store.has_record(keys::ORDER));
    }
}
