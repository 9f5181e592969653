//! Property-based tests for the step log.
//!
//! These tests use proptest to verify invariants hold under random operation
//! sequences.
//!
//! # Invariants Tested
//!
//! - INV-SL1: The log length never drops below 1 (the starting snapshot is
//!   irremovable).
//! - INV-SL2: A commit grows the log by exactly 1 and empties the redo stack.
//! - INV-SL3: Undo followed immediately by redo is the identity on
//!   `(steps, redo_stack)`.
//! - INV-SL4: `jump_to(i)` followed by `len - 1 - i` redos restores the log's
//!   pre-jump length and content.
//! - INV-SL5: Failed operations never mutate state.

use life_ledger::{CommitValues, LedgerError, PlayerKey, Snapshot, StepLog};
use proptest::prelude::*;

// ============================================================================
// Operations and Strategies
// ============================================================================

#[derive(Debug, Clone)]
enum LogOp {
    Commit { key: PlayerKey, value: i64 },
    Undo,
    Redo,
    JumpTo(usize),
}

fn key_strategy() -> impl Strategy<Value = PlayerKey> {
    prop_oneof![Just(PlayerKey::Top), Just(PlayerKey::Bottom)]
}

fn op_strategy() -> impl Strategy<Value = LogOp> {
    prop_oneof![
        (key_strategy(), -60i64..60).prop_map(|(key, value)| LogOp::Commit { key, value }),
        Just(LogOp::Undo),
        Just(LogOp::Redo),
        (0usize..20).prop_map(LogOp::JumpTo),
    ]
}

fn apply(log: &mut StepLog, op: &LogOp) {
    match op {
        LogOp::Commit { key, value } => {
            log.commit(CommitValues::single(*key, *value), "1:00:00 PM");
        }
        LogOp::Undo => {
            let _ = log.undo();
        }
        LogOp::Redo => {
            let _ = log.redo();
        }
        LogOp::JumpTo(index) => {
            let _ = log.jump_to(*index);
        }
    }
}

fn starting_log() -> StepLog {
    StepLog::new(Snapshot::new(40, 40, "1:00:00 PM"))
}

// ============================================================================
// Invariant Tests
// ============================================================================

proptest! {
    #[test]
    fn log_is_never_empty(ops in prop::collection::vec(op_strategy(), 0..100)) {
        let mut log = starting_log();
        for op in &ops {
            apply(&mut log, op);
            prop_assert!(log.len() >= 1);
            prop_assert_eq!(log.starting().top, 40);
        }
    }

    #[test]
    fn commit_grows_by_one_and_clears_redo(
        ops in prop::collection::vec(op_strategy(), 0..50),
        key in key_strategy(),
        value in -60i64..60,
    ) {
        let mut log = starting_log();
        for op in &ops {
            apply(&mut log, op);
        }

        let len_before = log.len();
        log.commit(CommitValues::single(key, value), "1:00:01 PM");
        prop_assert_eq!(log.len(), len_before + 1);
        prop_assert_eq!(log.redo_len(), 0);
        prop_assert_eq!(log.latest().value(key), value);
    }

    #[test]
    fn undo_then_redo_is_identity(ops in prop::collection::vec(op_strategy(), 0..50)) {
        let mut log = starting_log();
        for op in &ops {
            apply(&mut log, op);
        }

        let before = log.clone();
        match log.undo() {
            Ok(()) => {
                log.redo()?;
                prop_assert_eq!(log, before);
            }
            Err(err) => {
                prop_assert_eq!(err, LedgerError::EmptyHistory);
                prop_assert_eq!(log, before);
            }
        }
    }

    #[test]
    fn jump_then_full_redo_restores_content(
        ops in prop::collection::vec(op_strategy(), 0..50),
        index_seed in 0usize..50,
    ) {
        let mut log = starting_log();
        for op in &ops {
            apply(&mut log, op);
        }

        let before = log.clone();
        let index = index_seed % log.len();
        log.jump_to(index)?;
        prop_assert_eq!(log.len(), index + 1);

        for _ in 0..(before.len() - 1 - index) {
            log.redo()?;
        }
        prop_assert_eq!(log.steps(), before.steps());
        prop_assert_eq!(log.len(), before.len());
    }

    #[test]
    fn failed_operations_do_not_mutate(ops in prop::collection::vec(op_strategy(), 0..50)) {
        let mut log = starting_log();
        for op in &ops {
            apply(&mut log, op);
        }

        let before = log.clone();
        let out_of_range = log.len() + 7;
        prop_assert!(log.jump_to(out_of_range).is_err());
        prop_assert_eq!(&log, &before);

        if log.redo_len() == 0 {
            prop_assert_eq!(log.redo(), Err(LedgerError::NothingToRedo));
            prop_assert_eq!(&log, &before);
        }
        if log.len() == 1 {
            prop_assert_eq!(log.undo(), Err(LedgerError::EmptyHistory));
            prop_assert_eq!(&log, &before);
        }
    }

    #[test]
    fn commit_defaults_preserve_untouched_counter(
        key in key_strategy(),
        value in -60i64..60,
    ) {
        let mut log = starting_log();
        log.commit(CommitValues::single(key, value), "1:00:01 PM");
        prop_assert_eq!(log.latest().value(key.other()), 40);
    }
}
