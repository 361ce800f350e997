//! Log entries - the two logging granularities and validated entry construction

use chrono::Local;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Localized date format used in stored entries (same shape the app has
/// always written, so old records keep matching the same-day gate)
pub const DATE_FORMAT: &str = "%d/%m/%Y";

/// One set in dynamic mode. Values stay as entered; empty string means unset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetData {
    pub reps: String,
    pub kg: String,
}

impl SetData {
    /// A set counts only when both fields were filled in
    pub fn is_complete(&self) -> bool {
        !self.reps.is_empty() && !self.kg.is_empty()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogMode {
    #[default]
    Standard,
    Dynamic,
}

/// The single stored record per exercise. Replaced wholesale on save.
///
/// Serialized field names match the record shape this app has always
/// persisted (`dynamicSets` etc.); optional fields are omitted, never null.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    pub date: String,
    pub timestamp: i64,
    pub mode: LogMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sets: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reps: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kg: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dynamic_sets: Option<Vec<SetData>>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EntryError {
    #[error("sets, reps and load are all required in standard mode")]
    IncompleteInput,
    #[error("at least one set needs both reps and load")]
    NoValidSets,
}

pub fn today_string() -> String {
    Local::now().format(DATE_FORMAT).to_string()
}

fn base_entry(mode: LogMode, note: &str) -> LogEntry {
    let note = note.trim();
    LogEntry {
        date: today_string(),
        timestamp: Local::now().timestamp_millis(),
        mode,
        note: (!note.is_empty()).then(|| note.to_string()),
        sets: None,
        reps: None,
        kg: None,
        dynamic_sets: None,
    }
}

/// Aggregate entry: one sets/reps/load triple. All three are mandatory.
pub fn build_standard(sets: &str, reps: &str, kg: &str, note: &str) -> Result<LogEntry, EntryError> {
    if sets.is_empty() || reps.is_empty() || kg.is_empty() {
        return Err(EntryError::IncompleteInput);
    }
    let mut entry = base_entry(LogMode::Standard, note);
    entry.sets = Some(sets.to_string());
    entry.reps = Some(reps.to_string());
    entry.kg = Some(kg.to_string());
    Ok(entry)
}

/// Per-set entry: incomplete rows are dropped, order of the rest preserved.
pub fn build_dynamic(sets: &[SetData], note: &str) -> Result<LogEntry, EntryError> {
    let valid: Vec<SetData> = sets.iter().filter(|s| s.is_complete()).cloned().collect();
    if valid.is_empty() {
        return Err(EntryError::NoValidSets);
    }
    let mut entry = base_entry(LogMode::Dynamic, note);
    entry.dynamic_sets = Some(valid);
    Ok(entry)
}

impl LogEntry {
    /// Same-day gate for the quick-undo control
    pub fn logged_today(&self) -> bool {
        self.date == today_string()
    }

    /// Valid set count for the weekly volume report. Never fails: a
    /// non-numeric or missing sets field counts as zero.
    pub fn set_count(&self) -> u32 {
        match self.mode {
            LogMode::Dynamic => self
                .dynamic_sets
                .as_deref()
                .map(|sets| sets.iter().filter(|s| s.is_complete()).count() as u32)
                .unwrap_or(0),
            LogMode::Standard => self
                .sets
                .as_deref()
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(0),
        }
    }

    /// One-line rendering for lists and CLI output
    pub fn summary(&self) -> String {
        match self.mode {
            LogMode::Standard => format!(
                "{} x {} @ {} kg",
                self.sets.as_deref().unwrap_or("-"),
                self.reps.as_deref().unwrap_or("-"),
                self.kg.as_deref().unwrap_or("-"),
            ),
            LogMode::Dynamic => match self.dynamic_sets.as_deref() {
                Some(sets) if !sets.is_empty() => sets
                    .iter()
                    .map(|s| format!("{}x{}", s.reps, s.kg))
                    .collect::<Vec<_>>()
                    .join(", "),
                _ => "-".to_string(),
            },
        }
    }
}

/// Input field a placeholder is requested for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Sets,
    Reps,
    Kg,
}

/// "Last time" hint for an input field. Display-only, never stored.
///
/// Dynamic history is indexed per set position; anything missing shows "0".
pub fn previous_value(last: Option<&LogEntry>, field: Field, set_index: usize) -> String {
    let Some(entry) = last else {
        return "0".to_string();
    };

    match entry.mode {
        LogMode::Dynamic => {
            let Some(sets) = entry.dynamic_sets.as_deref() else {
                return "0".to_string();
            };
            match field {
                Field::Sets => sets.len().to_string(),
                Field::Reps | Field::Kg => sets
                    .get(set_index)
                    .map(|s| {
                        let v = if field == Field::Reps { &s.reps } else { &s.kg };
                        if v.is_empty() { "0".to_string() } else { v.clone() }
                    })
                    .unwrap_or_else(|| "0".to_string()),
            }
        }
        LogMode::Standard => {
            let v = match field {
                Field::Sets => entry.sets.as_deref(),
                Field::Reps => entry.reps.as_deref(),
                Field::Kg => entry.kg.as_deref(),
            };
            match v {
                Some(v) if !v.is_empty() => v.to_string(),
                _ => "0".to_string(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(reps: &str, kg: &str) -> SetData {
        SetData { reps: reps.to_string(), kg: kg.to_string() }
    }

    #[test]
    fn test_standard_requires_all_fields() {
        assert_eq!(build_standard("", "10", "50", ""), Err(EntryError::IncompleteInput));
        assert_eq!(build_standard("3", "", "50", ""), Err(EntryError::IncompleteInput));
        assert_eq!(build_standard("3", "10", "", ""), Err(EntryError::IncompleteInput));
    }

    #[test]
    fn test_standard_success() {
        let entry = build_standard("3", "10", "50", "").unwrap();
        assert_eq!(entry.mode, LogMode::Standard);
        assert_eq!(entry.sets.as_deref(), Some("3"));
        assert_eq!(entry.reps.as_deref(), Some("10"));
        assert_eq!(entry.kg.as_deref(), Some("50"));
        assert!(entry.dynamic_sets.is_none());
        assert_eq!(entry.date, today_string());
    }

    #[test]
    fn test_note_trimmed_and_omitted_when_blank() {
        let entry = build_standard("3", "10", "50", "   ").unwrap();
        assert!(entry.note.is_none());
        let entry = build_standard("3", "10", "50", "  drop set  ").unwrap();
        assert_eq!(entry.note.as_deref(), Some("drop set"));
    }

    #[test]
    fn test_dynamic_filters_incomplete_sets() {
        let entry = build_dynamic(&[set("10", "50"), set("", "20")], "").unwrap();
        assert_eq!(entry.mode, LogMode::Dynamic);
        assert_eq!(entry.dynamic_sets, Some(vec![set("10", "50")]));
        assert!(entry.sets.is_none());
    }

    #[test]
    fn test_dynamic_preserves_entry_order() {
        let entry = build_dynamic(&[set("10", "50"), set("", ""), set("8", "55")], "").unwrap();
        assert_eq!(entry.dynamic_sets, Some(vec![set("10", "50"), set("8", "55")]));
    }

    #[test]
    fn test_dynamic_without_valid_sets_fails() {
        assert_eq!(build_dynamic(&[set("", "")], ""), Err(EntryError::NoValidSets));
        assert_eq!(build_dynamic(&[], ""), Err(EntryError::NoValidSets));
    }

    #[test]
    fn test_set_count_standard_parses_or_zero() {
        let entry = build_standard("3", "10", "50", "").unwrap();
        assert_eq!(entry.set_count(), 3);
        let mut entry = build_standard("abc", "10", "50", "").unwrap();
        assert_eq!(entry.set_count(), 0);
        entry.sets = None;
        assert_eq!(entry.set_count(), 0);
    }

    #[test]
    fn test_set_count_dynamic_counts_complete_sets() {
        let entry =
            build_dynamic(&[set("10", "50"), set("8", "50"), set("", "50")], "").unwrap();
        // the incomplete third row never made it into the entry
        assert_eq!(entry.set_count(), 2);
    }

    #[test]
    fn test_placeholders_without_history() {
        assert_eq!(previous_value(None, Field::Sets, 0), "0");
        assert_eq!(previous_value(None, Field::Kg, 3), "0");
    }

    #[test]
    fn test_placeholders_standard() {
        let entry = build_standard("3", "10", "50", "").unwrap();
        assert_eq!(previous_value(Some(&entry), Field::Sets, 0), "3");
        assert_eq!(previous_value(Some(&entry), Field::Reps, 0), "10");
        assert_eq!(previous_value(Some(&entry), Field::Kg, 0), "50");
    }

    #[test]
    fn test_placeholders_dynamic_by_position() {
        let entry = build_dynamic(&[set("10", "50"), set("8", "55")], "").unwrap();
        assert_eq!(previous_value(Some(&entry), Field::Sets, 0), "2");
        assert_eq!(previous_value(Some(&entry), Field::Reps, 1), "8");
        assert_eq!(previous_value(Some(&entry), Field::Kg, 1), "55");
        // index past the recorded sets
        assert_eq!(previous_value(Some(&entry), Field::Reps, 5), "0");
    }

    #[test]
    fn test_logged_today() {
        let entry = build_standard("3", "10", "50", "").unwrap();
        assert!(entry.logged_today());
        let mut old = entry.clone();
        old.date = "01/01/2020".to_string();
        assert!(!old.logged_today());
    }

    #[test]
    fn test_json_shape_round_trip() {
        let entry = build_dynamic(&[set("10", "50")], "note").unwrap();
        let json = serde_json::to_string(&entry).unwrap();
        assert!(json.contains("\"dynamicSets\""));
        assert!(!json.contains("\"sets\""));
        let back: LogEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(back, entry);
    }

    #[test]
    fn test_summary_formats() {
        let std_entry = build_standard("3", "10", "50", "").unwrap();
        assert_eq!(std_entry.summary(), "3 x 10 @ 50 kg");
        let dyn_entry = build_dynamic(&[set("10", "50"), set("8", "55")], "").unwrap();
        assert_eq!(dyn_entry.summary(), "10x50, 8x55");
    }
}
