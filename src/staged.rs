//! Per-counter staged-delta tracking.
//!
//! A staged delta is an uncommitted pending change layered visually on top of
//! a counter's last committed value. It is transient state: it never persists
//! and it is discarded whenever the counter's baseline changes underneath it.

use crate::snapshot::PlayerKey;

/// Accumulates an uncommitted signed offset for one counter.
///
/// The tracker is "armed" once anything has been staged, even if the offsets
/// net to zero, so that a +5/-5 sequence still reads as a pending change.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StagedDelta {
    pending: i64,
    armed: bool,
}

impl StagedDelta {
    /// Creates an empty tracker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `delta` to the pending offset and returns the new pending total.
    /// Offsets are never clamped.
    pub fn stage(&mut self, delta: i64) -> i64 {
        self.pending += delta;
        self.armed = true;
        self.pending
    }

    /// Zeroes and disarms the tracker. Idempotent: calling this any number of
    /// times leaves the tracker empty, regardless of how the baseline display
    /// paths are wired.
    pub fn reset(&mut self) {
        self.pending = 0;
        self.armed = false;
    }

    /// The current pending offset.
    #[must_use]
    pub fn pending(&self) -> i64 {
        self.pending
    }

    /// Whether anything has been staged since the last reset.
    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// The value a commit would produce: `baseline + pending`.
    #[must_use]
    pub fn resolved(&self, baseline: i64) -> i64 {
        baseline + self.pending
    }

    /// Captures the pending offset and resets the tracker.
    pub fn take(&mut self) -> i64 {
        let pending = self.pending;
        self.reset();
        pending
    }
}

/// One player's counter: a staged-delta tracker plus the display baseline
/// (latest committed total) and maximum (starting total).
///
/// This is the widget-facing surface of the core: rendering reads
/// [`preview`](Counter::preview) and [`maximum`](Counter::maximum), the
/// session writes [`set_baseline`](Counter::set_baseline) and
/// [`set_maximum`](Counter::set_maximum) whenever the log changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Counter {
    key: PlayerKey,
    baseline: i64,
    maximum: i64,
    staged: StagedDelta,
}

impl Counter {
    /// Creates a counter with equal baseline and maximum and nothing staged.
    #[must_use]
    pub fn new(key: PlayerKey, starting: i64) -> Self {
        Self {
            key,
            baseline: starting,
            maximum: starting,
            staged: StagedDelta::new(),
        }
    }

    /// Which player this counter belongs to.
    #[must_use]
    pub fn key(&self) -> PlayerKey {
        self.key
    }

    /// The last committed total for this counter.
    #[must_use]
    pub fn baseline(&self) -> i64 {
        self.baseline
    }

    /// The session's starting total for this counter, used as the display
    /// denominator.
    #[must_use]
    pub fn maximum(&self) -> i64 {
        self.maximum
    }

    /// Updates the display maximum. Any staged delta is discarded, since an
    /// external history change invalidates the pending edit.
    pub fn set_maximum(&mut self, value: i64) {
        self.maximum = value;
        self.staged.reset();
    }

    /// Updates the committed baseline. Any staged delta is discarded.
    pub fn set_baseline(&mut self, value: i64) {
        self.baseline = value;
        self.staged.reset();
    }

    /// Accumulates a pending change and returns the new preview value.
    pub fn stage(&mut self, delta: i64) -> i64 {
        self.staged.stage(delta);
        self.preview()
    }

    /// The value currently shown on the counter: baseline plus pending offset.
    #[must_use]
    pub fn preview(&self) -> i64 {
        self.staged.resolved(self.baseline)
    }

    /// Whether a change is staged but not yet committed.
    #[must_use]
    pub fn has_pending(&self) -> bool {
        self.staged.is_armed()
    }

    /// The resolved value of the staged change, or `None` if nothing is
    /// staged. Used when composing a commit for the sibling counter's default.
    #[must_use]
    pub fn resolved_pending_value(&self) -> Option<i64> {
        self.staged
            .is_armed()
            .then(|| self.staged.resolved(self.baseline))
    }

    /// Captures the resolved commit value and clears the staged delta.
    pub fn take_resolved(&mut self) -> i64 {
        self.baseline + self.staged.take()
    }

    /// Discards any staged delta.
    pub fn reset_staged(&mut self) {
        self.staged.reset();
    }
}

// #########
// # TESTS #
// #########
