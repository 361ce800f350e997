//! Display ordering of a day's exercises
//!
//! A stored order is the full id sequence for one day. Ids missing from it
//! (exercises added to the catalog later) keep their catalog-relative
//! position after every ranked id, so nothing silently disappears.

use crate::catalog::Exercise;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

/// Overlay a stored permutation onto the catalog order for one day.
///
/// No stored order (or an empty one) means catalog order. Ranked ids sort
/// by their stored position; unranked ids follow, keeping relative catalog
/// order (stable sort).
pub fn compute_order(
    day_exercises: Vec<&'static Exercise>,
    stored: Option<&[String]>,
) -> Vec<&'static Exercise> {
    let Some(order) = stored else {
        return day_exercises;
    };
    if order.is_empty() {
        return day_exercises;
    }

    let mut out = day_exercises;
    out.sort_by_key(|ex| order.iter().position(|id| id == ex.id).unwrap_or(usize::MAX));
    out
}

/// Swap an exercise with its neighbour and materialize the complete new
/// order for the day. Out-of-bounds moves are a silent no-op (`None`).
pub fn move_exercise(
    current: &[&'static Exercise],
    index: usize,
    direction: Direction,
) -> Option<Vec<String>> {
    if index >= current.len() {
        return None;
    }
    let target = match direction {
        Direction::Up => index.checked_sub(1)?,
        Direction::Down => index + 1,
    };
    if target >= current.len() {
        return None;
    }

    let mut ids: Vec<String> = current.iter().map(|ex| ex.id.to_string()).collect();
    ids.swap(index, target);
    Some(ids)
}
