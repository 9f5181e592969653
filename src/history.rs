//! User-facing history rows derived from the step log.
//!
//! The history view shows one row per snapshot with the signed change versus
//! the immediately preceding snapshot. Selecting a row maps to
//! [`Session::jump_to`](crate::Session::jump_to) with the row's `index`.

use crate::snapshot::Snapshot;

/// One row of the history view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryRow {
    /// 0-based index into the step log; pass this to `jump_to`.
    pub index: usize,
    /// Capture time of the snapshot.
    pub time_str: String,
    /// The top player's total at this step.
    pub top: i64,
    /// The bottom player's total at this step.
    pub bottom: i64,
    /// Signed change of the top total versus the preceding step (0 for the
    /// first row).
    pub top_diff: i64,
    /// Signed change of the bottom total versus the preceding step (0 for the
    /// first row).
    pub bottom_diff: i64,
}

impl HistoryRow {
    /// The 1-based number shown to the user for this row.
    #[must_use]
    pub fn display_number(&self) -> usize {
        self.index + 1
    }
}

/// Builds the full set of history rows for a snapshot sequence.
#[must_use]
pub fn history_rows(steps: &[Snapshot]) -> Vec<HistoryRow> {
    steps
        .iter()
        .enumerate()
        .map(|(index, step)| {
            let prev = index.checked_sub(1).and_then(|i| steps.get(i));
            HistoryRow {
                index,
                time_str: step.time_str.clone(),
                top: step.top,
                bottom: step.bottom,
                top_diff: prev.map_or(0, |p| step.top - p.top),
                bottom_diff: prev.map_or(0, |p| step.bottom - p.bottom),
            }
        })
        .collect()
}

/// Formats a signed diff for display: `(+5)`, `(-3)`. Zero diffs are not
/// rendered in the history view.
#[must_use]
pub fn diff_str(diff: i64) -> String {
    if diff > 0 {
        format!("(+{})", diff)
    } else {
        format!("({})", diff)
    }
}
