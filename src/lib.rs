//! # life-ledger
//!
//! The state/history engine of a two-player life-total counter: an ordered
//! step log of life snapshots, linear undo/redo, a staged-then-committed
//! value protocol per counter, and persistence of the whole log across
//! restarts.
//!
//! The crate deliberately contains no rendering. A [`Session`] is the single
//! owner of all mutable state; rendering surfaces observe it through the
//! synchronous [`ViewState`] contract and drive it through explicit commands.
//! Instead of timers threaded through UI callbacks, the auto-commit debounce
//! is poll-driven: the host event loop calls [`Session::poll`] with the
//! current instant.
//!
//! ```rust
//! use life_ledger::prelude::*;
//! use web_time::Instant;
//!
//! let mut session = SessionBuilder::new(MemoryStore::new())
//!     .with_config(SessionConfig::manual())
//!     .start();
//!
//! // Tap -1 five times, then accept.
//! let now = Instant::now();
//! for _ in 0..5 {
//!     session.stage(PlayerKey::Top, -1, now);
//! }
//! session.commit(PlayerKey::Top);
//! assert_eq!(session.view().top.baseline, 35);
//!
//! // Changed our minds.
//! session.undo()?;
//! assert_eq!(session.view().top.baseline, 40);
//! session.redo()?;
//! assert_eq!(session.view().top.baseline, 35);
//! # Ok::<(), life_ledger::LedgerError>(())
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub use error::LedgerError;
pub use history::{diff_str, history_rows, HistoryRow};
pub use persistence::{JsonFileStore, MemoryStore, StateStore};
pub use session::{CounterView, Session, SessionBuilder, SessionConfig, ViewObserver, ViewState};
pub use snapshot::{Clock, CommitValues, PlayerKey, Snapshot, SystemClock};
pub use staged::{Counter, StagedDelta};
pub use step_log::StepLog;

#[doc(hidden)]
pub mod error;
pub mod history;
pub mod persistence;
pub mod prelude;
pub mod session;
#[doc(hidden)]
pub mod snapshot;
pub mod staged;
pub mod step_log;
