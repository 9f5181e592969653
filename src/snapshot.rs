use serde::{Deserialize, Serialize};

/// Identifies one of the two counters in a session.
///
/// The names reflect the physical layout of a two-player table: one counter
/// faces each player across the device.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayerKey {
    /// The counter facing the player across the table.
    Top,
    /// The counter facing the player holding the device.
    Bottom,
}

impl PlayerKey {
    /// Returns the key of the other player's counter.
    #[must_use]
    pub fn other(self) -> Self {
        match self {
            PlayerKey::Top => PlayerKey::Bottom,
            PlayerKey::Bottom => PlayerKey::Top,
        }
    }
}

/// One recorded pair of life totals plus a human-readable capture time.
///
/// Snapshots are immutable once created. Values are never clamped: negative
/// totals are legitimate game states (e.g. lethal damage on the stack).
/// `time_str` is display-only, assigned at creation and never recomputed.
///
/// The serde field names (`Top`, `Bottom`, `TimeStr`) are part of the
/// persisted document format and must stay stable across versions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// The top player's life total.
    #[serde(rename = "Top")]
    pub top: i64,
    /// The bottom player's life total.
    #[serde(rename = "Bottom")]
    pub bottom: i64,
    /// Human-readable capture time, assigned at snapshot creation.
    #[serde(rename = "TimeStr")]
    pub time_str: String,
}

impl Snapshot {
    /// Creates a new snapshot from both totals and a capture-time string.
    #[must_use]
    pub fn new(top: i64, bottom: i64, time_str: impl Into<String>) -> Self {
        Self {
            top,
            bottom,
            time_str: time_str.into(),
        }
    }

    /// Returns the total for the given counter.
    #[must_use]
    pub fn value(&self, key: PlayerKey) -> i64 {
        match key {
            PlayerKey::Top => self.top,
            PlayerKey::Bottom => self.bottom,
        }
    }
}

/// Per-counter values for a commit. A `None` value defaults to the latest
/// snapshot's corresponding total when the commit is resolved.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct CommitValues {
    /// Explicit new total for the top counter, if any.
    pub top: Option<i64>,
    /// Explicit new total for the bottom counter, if any.
    pub bottom: Option<i64>,
}

impl CommitValues {
    /// A commit that changes neither counter (both default to the latest totals).
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// A commit that sets a single counter to an explicit total.
    #[must_use]
    pub fn single(key: PlayerKey, value: i64) -> Self {
        match key {
            PlayerKey::Top => Self {
                top: Some(value),
                bottom: None,
            },
            PlayerKey::Bottom => Self {
                top: None,
                bottom: Some(value),
            },
        }
    }

    /// Sets the value for the given counter, returning the updated struct.
    #[must_use]
    pub fn with(mut self, key: PlayerKey, value: i64) -> Self {
        match key {
            PlayerKey::Top => self.top = Some(value),
            PlayerKey::Bottom => self.bottom = Some(value),
        }
        self
    }
}

/// Source of human-readable capture times for new snapshots.
///
/// Sessions take a clock at construction so tests can pin timestamps.
pub trait Clock {
    /// Returns the current time formatted for display, e.g. `4:31:05 PM`.
    fn time_str(&self) -> String;
}

/// The default [`Clock`], formatting the local wall-clock time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn time_str(&self) -> String {
        chrono::Local::now().format("%-I:%M:%S %p").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ========================================================================
    // PlayerKey Tests
    // ========================================================================

    #[test]
    fn other_swaps_keys() {
        assert_eq!(PlayerKey::Top.other(), PlayerKey::Bottom);
        assert_eq!(PlayerKey::Bottom.other(), PlayerKey::Top);
    }

    // ========================================================================
    // Snapshot Tests
    // ========================================================================

    #[test]
    fn value_selects_by_key() {
        let snap = Snapshot::new(40, 37, "1:00:00 PM");
        assert_eq!(snap.value(PlayerKey::Top), 40);
        assert_eq!(snap.value(PlayerKey::Bottom), 37);
    }

    #[test]
    fn negative_totals_are_preserved() {
        let snap = Snapshot::new(-3, 0, "1:00:00 PM");
        assert_eq!(snap.top, -3);
        assert_eq!(snap.bottom, 0);
    }

    #[test]
    fn serializes_with_stable_field_names() {
        let snap = Snapshot::new(40, 40, "1:00:00 PM");
        let json = serde_json::to_string(&snap).unwrap();
        assert!(json.contains("\"Top\":40"));
        assert!(json.contains("\"Bottom\":40"));
        assert!(json.contains("\"TimeStr\":\"1:00:00 PM\""));
    }

    #[test]
    fn deserializes_original_document_fields() {
        let snap: Snapshot =
            serde_json::from_str(r#"{"Top":35,"Bottom":40,"TimeStr":"2:15:09 PM"}"#).unwrap();
        assert_eq!(snap, Snapshot::new(35, 40, "2:15:09 PM"));
    }

    // ========================================================================
    // CommitValues Tests
    // ========================================================================

    #[test]
    fn empty_commit_has_no_values() {
        let values = CommitValues::empty();
        assert!(values.top.is_none());
        assert!(values.bottom.is_none());
    }

    #[test]
    fn single_sets_only_one_counter() {
        let values = CommitValues::single(PlayerKey::Bottom, 12);
        assert_eq!(values.bottom, Some(12));
        assert!(values.top.is_none());
    }

    #[test]
    fn with_builds_both_values() {
        let values = CommitValues::empty()
            .with(PlayerKey::Top, 20)
            .with(PlayerKey::Bottom, 18);
        assert_eq!(values.top, Some(20));
        assert_eq!(values.bottom, Some(18));
    }

    #[test]
    fn system_clock_produces_nonempty_string() {
        assert!(!SystemClock.time_str().is_empty());
    }
}
