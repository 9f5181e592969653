//! Convenient re-exports for common usage.
//!
//! This module provides a "prelude" that re-exports the most commonly used
//! types from life-ledger, allowing you to import them all at once.
//!
//! # Usage
//!
//! ```rust
//! use life_ledger::prelude::*;
//! ```
//!
//! # Example
//!
//! ```rust
//! use life_ledger::prelude::*;
//! use web_time::Instant;
//!
//! let mut session = SessionBuilder::new(MemoryStore::new())
//!     .with_config(SessionConfig::manual())
//!     .start();
//!
//! session.stage(PlayerKey::Top, -5, Instant::now());
//! session.commit(PlayerKey::Top);
//! assert_eq!(session.view().top.baseline, 35);
//! ```

// Session controller
pub use crate::session::{
    CounterView, Session, SessionBuilder, SessionConfig, ViewObserver, ViewState,
};

// Fundamental types
pub use crate::snapshot::{Clock, CommitValues, PlayerKey, Snapshot, SystemClock};

// History engine
pub use crate::history::HistoryRow;
pub use crate::staged::{Counter, StagedDelta};
pub use crate::step_log::StepLog;

// Persistence
pub use crate::persistence::{JsonFileStore, MemoryStore, StateStore};

// Error handling
pub use crate::error::LedgerError;
