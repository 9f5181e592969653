//! The ordered history of life-total snapshots for one session.
//!
//! This module provides [`StepLog`], a linear undo/redo structure over an
//! append-only sequence of [`Snapshot`]s. History is a line, not a tree:
//! committing forward after an undo discards the undone steps for good.

use tracing::debug;

use crate::snapshot::{CommitValues, Snapshot};
use crate::LedgerError;

/// An ordered, never-empty history of snapshots plus a redo stack.
///
/// Invariants:
/// - The log always contains at least the starting snapshot.
/// - The first element defines the session's starting totals (the display
///   maximums); the last element is the current state.
/// - Every forward commit clears the redo stack.
///
/// The redo stack is ordered so that `pop` yields the chronologically next
/// snapshot to restore. Repeated [`redo`](StepLog::redo) after a
/// [`jump_to`](StepLog::jump_to) therefore replays the truncated tail in its
/// original order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepLog {
    steps: Vec<Snapshot>,
    redo_stack: Vec<Snapshot>,
}

impl StepLog {
    /// Creates a log containing only the given starting snapshot.
    #[must_use]
    pub fn new(starting: Snapshot) -> Self {
        Self {
            steps: vec![starting],
            redo_stack: Vec::new(),
        }
    }

    /// Creates a log from a previously persisted snapshot sequence.
    ///
    /// Fails if the sequence is empty, since a log must always contain its
    /// starting snapshot. The persistence gateway maps this failure to the
    /// default log rather than surfacing it.
    pub fn from_steps(steps: Vec<Snapshot>) -> Result<Self, LedgerError> {
        if steps.is_empty() {
            return Err(LedgerError::MalformedPersistedState {
                context: "persisted step sequence is empty".to_string(),
            });
        }
        Ok(Self {
            steps,
            redo_stack: Vec::new(),
        })
    }

    /// The number of snapshots in the log. Always at least 1.
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Always `false`: the starting snapshot is irremovable.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// The number of snapshots available for redo.
    #[must_use]
    pub fn redo_len(&self) -> usize {
        self.redo_stack.len()
    }

    /// Whether an undo would succeed.
    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.steps.len() > 1
    }

    /// Whether a redo would succeed.
    #[must_use]
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// The session's starting snapshot. Its totals are the display maximums.
    #[must_use]
    pub fn starting(&self) -> &Snapshot {
        // Non-empty invariant: element 0 always exists.
        &self.steps[0]
    }

    /// The current snapshot.
    #[must_use]
    pub fn latest(&self) -> &Snapshot {
        // Non-empty invariant: the last element always exists.
        &self.steps[self.steps.len() - 1]
    }

    /// All snapshots in chronological order.
    #[must_use]
    pub fn steps(&self) -> &[Snapshot] {
        &self.steps
    }

    /// Hard reset: replaces the whole history with a fresh starting snapshot
    /// and discards the redo stack. This is the "new game" operation, not an
    /// append.
    pub fn start_new(&mut self, starting: Snapshot) {
        debug!(top = starting.top, bottom = starting.bottom, "starting new log");
        self.steps = vec![starting];
        self.redo_stack.clear();
    }

    /// Appends a new snapshot resolved from `values`: each counter takes its
    /// explicit value if provided, otherwise the latest snapshot's total.
    ///
    /// Clears the redo stack unconditionally. This is the only operation
    /// permitted to clear the redo stack as a side effect of forward progress.
    pub fn commit(&mut self, values: CommitValues, time_str: impl Into<String>) -> &Snapshot {
        let latest = self.latest();
        let snapshot = Snapshot::new(
            values.top.unwrap_or(latest.top),
            values.bottom.unwrap_or(latest.bottom),
            time_str,
        );
        debug!(
            top = snapshot.top,
            bottom = snapshot.bottom,
            len = self.steps.len() + 1,
            "commit"
        );
        self.steps.push(snapshot);
        self.redo_stack.clear();
        self.latest()
    }

    /// Moves the latest snapshot onto the redo stack.
    ///
    /// Fails with [`LedgerError::EmptyHistory`] if only the starting snapshot
    /// remains; the log is left untouched.
    pub fn undo(&mut self) -> Result<(), LedgerError> {
        if self.steps.len() <= 1 {
            return Err(LedgerError::EmptyHistory);
        }
        if let Some(snapshot) = self.steps.pop() {
            debug!(len = self.steps.len(), "undo");
            self.redo_stack.push(snapshot);
        }
        Ok(())
    }

    /// Moves the most recently undone snapshot back onto the log.
    ///
    /// Fails with [`LedgerError::NothingToRedo`] if the redo stack is empty;
    /// the log is left untouched.
    pub fn redo(&mut self) -> Result<(), LedgerError> {
        match self.redo_stack.pop() {
            Some(snapshot) => {
                self.steps.push(snapshot);
                debug!(len = self.steps.len(), "redo");
                Ok(())
            }
            None => Err(LedgerError::NothingToRedo),
        }
    }

    /// Truncates the log so that `index` becomes the current snapshot.
    ///
    /// The truncated tail replaces the redo stack wholesale and is replayable
    /// oldest-first: `jump_to(i)` followed by `len - 1 - i` redos restores the
    /// log exactly. Fails with [`LedgerError::IndexOutOfRange`] if `index` is
    /// not a valid position; the log is left untouched.
    pub fn jump_to(&mut self, index: usize) -> Result<(), LedgerError> {
        if index >= self.steps.len() {
            return Err(LedgerError::IndexOutOfRange {
                index,
                len: self.steps.len(),
            });
        }
        let tail = self.steps.split_off(index + 1);
        // Reversed so that pop() yields the element just after `index` first.
        self.redo_stack = tail.into_iter().rev().collect();
        debug!(index, redo = self.redo_stack.len(), "jump");
        Ok(())
    }
}

impl Default for StepLog {
    /// A log holding the conventional 40/40 starting snapshot with an empty
    /// time string. Sessions normally construct their default through the
    /// configured clock instead.
    fn default() -> Self {
        Self::new(Snapshot::new(40, 40, ""))
    }
}

// #########
// # TESTS #
// #########
