//! Weekly training volume per muscle group
//!
//! Aggregates valid set counts from every stored entry, after collapsing
//! the catalog's granular muscle labels into canonical groups.

use std::collections::HashMap;

use crate::catalog;
use crate::entry::LogEntry;

/// One normalization rule. A rule matches when the lowercased muscle label
/// contains any muscle token, or the lowercased exercise name contains any
/// name token. Rules are evaluated top to bottom, first match wins.
struct GroupRule {
    group: &'static str,
    muscle_tokens: &'static [&'static str],
    name_tokens: &'static [&'static str],
}

/// Rule order matters: "ampiezza" must claim Dorsali before the generic
/// back tokens, and the RDL name check must claim Glutei before Femorali.
const GROUP_RULES: &[GroupRule] = &[
    GroupRule { group: "Petto", muscle_tokens: &["petto"], name_tokens: &[] },
    GroupRule {
        group: "Dorsali",
        muscle_tokens: &["dorsali", "ampiezza", "lat machine"],
        name_tokens: &[],
    },
    GroupRule {
        group: "Upper Back",
        muscle_tokens: &["schiena", "upper", "spessore", "trapezi", "back"],
        name_tokens: &[],
    },
    GroupRule { group: "Spalle", muscle_tokens: &["spalle", "deltoidi"], name_tokens: &[] },
    GroupRule { group: "Bicipiti", muscle_tokens: &["bicipiti"], name_tokens: &[] },
    GroupRule { group: "Tricipiti", muscle_tokens: &["tricipiti"], name_tokens: &[] },
    GroupRule { group: "Avambracci", muscle_tokens: &["avambracci", "polso"], name_tokens: &[] },
    GroupRule { group: "Quadricipiti", muscle_tokens: &["quadricipiti"], name_tokens: &[] },
    // Romanian deadlifts are hip-hinge work: force them into Glutes even
    // when the label says hamstrings
    GroupRule { group: "Glutei", muscle_tokens: &["glutei"], name_tokens: &["rdl"] },
    GroupRule { group: "Femorali", muscle_tokens: &["femorali"], name_tokens: &[] },
    GroupRule { group: "Aduttori", muscle_tokens: &["interno", "aduttori"], name_tokens: &[] },
    GroupRule { group: "Polpacci", muscle_tokens: &["polpacci"], name_tokens: &[] },
    GroupRule { group: "Addome", muscle_tokens: &["addome"], name_tokens: &[] },
];

/// Canonical group for a muscle label. Unmatched labels pass through
/// unchanged as their own group.
pub fn normalize_muscle(muscle: &str, exercise_name: &str) -> String {
    let muscle_lower = muscle.to_lowercase();
    let name_lower = exercise_name.to_lowercase();

    for rule in GROUP_RULES {
        let muscle_hit = rule.muscle_tokens.iter().any(|t| muscle_lower.contains(t));
        let name_hit = rule.name_tokens.iter().any(|t| name_lower.contains(t));
        if muscle_hit || name_hit {
            return rule.group.to_string();
        }
    }
    muscle.to_string()
}

/// Set counts per normalized group across all stored entries, sorted by
/// descending total. Entries whose exercise id left the catalog are skipped.
/// Pure read-side computation, recomputed from scratch every call.
pub fn weekly_volume(logs: &HashMap<String, LogEntry>) -> Vec<(String, u32)> {
    let mut totals: HashMap<String, u32> = HashMap::new();

    for (exercise_id, entry) in logs {
        let Some(exercise) = catalog::find_exercise(exercise_id) else {
            continue;
        };
        let group = normalize_muscle(exercise.muscle, exercise.name);
        *totals.entry(group).or_insert(0) += entry.set_count();
    }

    let mut out: Vec<(String, u32)> = totals.into_iter().collect();
    out.sort_by(|a, b| b.1.cmp(&a.1));
    out
}

/// Weekly volume with a text gauge per group, for terminal output
pub fn weekly_report(logs: &HashMap<String, LogEntry>) -> Vec<(String, u32, &'static str)> {
    let volume = weekly_volume(logs);
    let max = volume.iter().map(|(_, c)| *c).max().unwrap_or(1).max(1);

    volume
        .into_iter()
        .map(|(group, count)| {
            let ratio = count as f32 / max as f32;
            let bar = match ratio {
                r if r >= 0.75 => "[++++]",
                r if r >= 0.50 => "[+++.]",
                r if r >= 0.25 => "[++..]",
                r if r > 0.0 => "[+...]",
                _ => "[....]",
            };
            (group, count, bar)
        })
        .collect()
}
