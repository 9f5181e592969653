//! The session controller: the single owner of all mutable session state.
//!
//! A [`Session`] owns the step log, the redo stack, both counters, the
//! persistence gateway, and the clock. All mutations flow through its command
//! methods; each committing command finishes with a synchronous display-sync
//! pass and a persistence write before returning, so observers never see
//! partial state.
//!
//! Control flow is poll-driven rather than callback-driven: the auto-commit
//! debounce is a per-counter deadline that the host event loop advances by
//! calling [`Session::poll`] with the current instant. There is no timer
//! threaded through rendering code.

use std::sync::Arc;

use tracing::debug;
use web_time::{Duration, Instant};

use crate::history::{history_rows, HistoryRow};
use crate::persistence::StateStore;
use crate::snapshot::{Clock, CommitValues, PlayerKey, Snapshot, SystemClock};
use crate::staged::Counter;
use crate::step_log::StepLog;
use crate::LedgerError;

/// Default starting life total for both players.
const DEFAULT_STARTING_LIFE: i64 = 40;
/// Default debounce before a staged delta auto-commits.
const DEFAULT_AUTO_COMMIT_DELAY: Duration = Duration::from_millis(1500);

/// Configuration for a [`Session`].
///
/// # Example
///
/// ```
/// use life_ledger::SessionConfig;
///
/// // A 20-life format with manual commits:
/// let config = SessionConfig {
///     starting_top: 20,
///     starting_bottom: 20,
///     ..SessionConfig::manual()
/// };
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    /// Starting life total for the top counter when no persisted log exists.
    ///
    /// Default: 40
    pub starting_top: i64,
    /// Starting life total for the bottom counter when no persisted log exists.
    ///
    /// Default: 40
    pub starting_bottom: i64,
    /// Whether staged deltas commit automatically after the debounce delay.
    /// A persisted toggle, if present, overrides this at session start.
    ///
    /// Default: `true`
    pub auto_commit: bool,
    /// How long after the last `stage` call an auto-commit fires.
    ///
    /// Default: 1500ms
    pub auto_commit_delay: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            starting_top: DEFAULT_STARTING_LIFE,
            starting_bottom: DEFAULT_STARTING_LIFE,
            auto_commit: true,
            auto_commit_delay: DEFAULT_AUTO_COMMIT_DELAY,
        }
    }
}

impl SessionConfig {
    /// Manual commits: every staged change requires an explicit accept.
    #[must_use]
    pub fn manual() -> Self {
        Self {
            auto_commit: false,
            ..Self::default()
        }
    }

    /// A 20-life configuration for standard two-player formats.
    #[must_use]
    pub fn twenty_life() -> Self {
        Self {
            starting_top: 20,
            starting_bottom: 20,
            ..Self::default()
        }
    }
}

/// The display-sync contract output for one counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CounterView {
    /// The session's starting total: the display denominator. Also prefills
    /// the new-session form.
    pub maximum: i64,
    /// The latest committed total.
    pub baseline: i64,
    /// The value to show: baseline plus any pending offset.
    pub preview: i64,
    /// Whether an uncommitted change is staged.
    pub has_pending: bool,
}

/// The full display-sync contract output, recomputed synchronously after
/// every mutation. Observers receive it before the triggering command
/// returns, so no interleaved partial state is ever visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewState {
    /// The top counter's view.
    pub top: CounterView,
    /// The bottom counter's view.
    pub bottom: CounterView,
    /// Whether the undo affordance should be enabled (`len > 1`).
    pub can_undo: bool,
    /// Whether the redo affordance should be enabled.
    pub can_redo: bool,
}

impl ViewState {
    /// The view for the given counter.
    #[must_use]
    pub fn counter(&self, key: PlayerKey) -> &CounterView {
        match key {
            PlayerKey::Top => &self.top,
            PlayerKey::Bottom => &self.bottom,
        }
    }
}

/// Receives the refreshed [`ViewState`] after every session mutation.
///
/// Implementations must not call back into the session; they only mirror
/// state into whatever rendering surface exists.
pub trait ViewObserver {
    /// Called synchronously after each mutation, before the command returns.
    fn view_changed(&self, view: &ViewState);
}

/// Builds a [`Session`].
///
/// After setting all appropriate values, use [`SessionBuilder::start`] to
/// consume the builder, load persisted state, and create the session.
#[must_use = "SessionBuilder must be consumed by calling start()"]
pub struct SessionBuilder<S: StateStore> {
    store: S,
    clock: Box<dyn Clock>,
    config: SessionConfig,
    observer: Option<Arc<dyn ViewObserver>>,
}

impl<S: StateStore> SessionBuilder<S> {
    /// Constructs a builder around the given persistence gateway, with the
    /// default configuration and the system clock.
    pub fn new(store: S) -> Self {
        Self {
            store,
            clock: Box::new(SystemClock),
            config: SessionConfig::default(),
            observer: None,
        }
    }

    /// Sets the session configuration.
    pub fn with_config(mut self, config: SessionConfig) -> Self {
        self.config = config;
        self
    }

    /// Replaces the timestamp clock. Tests use this to pin capture times.
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Registers the display-sync observer.
    pub fn with_observer(mut self, observer: Arc<dyn ViewObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Loads persisted state and starts the session.
    ///
    /// A missing or malformed persisted log silently becomes the default
    /// single-snapshot log from the configured starting totals. The persisted
    /// auto-commit toggle, if present, overrides the configured default.
    pub fn start(self) -> Session<S> {
        let Self {
            store,
            clock,
            config,
            observer,
        } = self;

        let log = match store.load_log().map(StepLog::from_steps) {
            Some(Ok(log)) => {
                debug!(len = log.len(), "restored persisted step log");
                log
            }
            _ => StepLog::new(Snapshot::new(
                config.starting_top,
                config.starting_bottom,
                clock.time_str(),
            )),
        };
        let auto_commit = store.load_auto_commit().unwrap_or(config.auto_commit);

        let mut session = Session {
            top: Counter::new(PlayerKey::Top, log.starting().top),
            bottom: Counter::new(PlayerKey::Bottom, log.starting().bottom),
            log,
            store,
            clock,
            config,
            auto_commit,
            top_deadline: None,
            bottom_deadline: None,
            observer,
        };
        session.after_mutation();
        session
    }
}

/// The session controller for one two-player game.
///
/// See the [module documentation](self) for the ownership and control-flow
/// model. All state-mutating methods leave the session fully synchronized and
/// persisted when they return.
pub struct Session<S: StateStore> {
    log: StepLog,
    top: Counter,
    bottom: Counter,
    store: S,
    clock: Box<dyn Clock>,
    config: SessionConfig,
    auto_commit: bool,
    top_deadline: Option<Instant>,
    bottom_deadline: Option<Instant>,
    observer: Option<Arc<dyn ViewObserver>>,
}

impl<S: StateStore> std::fmt::Debug for Session<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("log_len", &self.log.len())
            .field("redo_len", &self.log.redo_len())
            .field("auto_commit", &self.auto_commit)
            .field("top", &self.top)
            .field("bottom", &self.bottom)
            .finish_non_exhaustive()
    }
}

impl<S: StateStore> Session<S> {
    /// The step log. Read-only: all mutations go through session commands.
    #[must_use]
    pub fn log(&self) -> &StepLog {
        &self.log
    }

    /// The counter for the given player.
    #[must_use]
    pub fn counter(&self, key: PlayerKey) -> &Counter {
        match key {
            PlayerKey::Top => &self.top,
            PlayerKey::Bottom => &self.bottom,
        }
    }

    fn counter_mut(&mut self, key: PlayerKey) -> &mut Counter {
        match key {
            PlayerKey::Top => &mut self.top,
            PlayerKey::Bottom => &mut self.bottom,
        }
    }

    fn deadline(&self, key: PlayerKey) -> Option<Instant> {
        match key {
            PlayerKey::Top => self.top_deadline,
            PlayerKey::Bottom => self.bottom_deadline,
        }
    }

    fn deadline_mut(&mut self, key: PlayerKey) -> &mut Option<Instant> {
        match key {
            PlayerKey::Top => &mut self.top_deadline,
            PlayerKey::Bottom => &mut self.bottom_deadline,
        }
    }

    /// Whether staged deltas currently auto-commit.
    #[must_use]
    pub fn auto_commit(&self) -> bool {
        self.auto_commit
    }

    /// The current display-sync contract output.
    #[must_use]
    pub fn view(&self) -> ViewState {
        let counter_view = |c: &Counter| CounterView {
            maximum: c.maximum(),
            baseline: c.baseline(),
            preview: c.preview(),
            has_pending: c.has_pending(),
        };
        ViewState {
            top: counter_view(&self.top),
            bottom: counter_view(&self.bottom),
            can_undo: self.log.can_undo(),
            can_redo: self.log.can_redo(),
        }
    }

    /// User-facing history rows for the current log.
    #[must_use]
    pub fn history(&self) -> Vec<HistoryRow> {
        history_rows(self.log.steps())
    }

    /// The earliest pending auto-commit deadline, if any. Hosts can use this
    /// to schedule their next [`poll`](Session::poll) wakeup.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        match (self.top_deadline, self.bottom_deadline) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Accumulates a pending change on one counter and returns the new
    /// preview value.
    ///
    /// In auto-commit mode this cancels the counter's previous debounce
    /// deadline and starts a fresh one at `now + auto_commit_delay`, so only
    /// the cumulative offset since the last reset commits, once, when the
    /// user stops tapping.
    pub fn stage(&mut self, key: PlayerKey, delta: i64, now: Instant) -> i64 {
        let preview = self.counter_mut(key).stage(delta);
        let deadline = self
            .auto_commit
            .then(|| now + self.config.auto_commit_delay);
        *self.deadline_mut(key) = deadline;
        debug!(?key, delta, preview, "staged");
        self.notify();
        preview
    }

    /// Commits one counter's staged value as a new snapshot.
    ///
    /// The committing counter resolves to `baseline + pending`. In manual
    /// mode, a change staged on the *other* counter rides along in the same
    /// snapshot; otherwise the other counter defaults to its latest committed
    /// value. Clears the redo stack and both staged deltas.
    pub fn commit(&mut self, key: PlayerKey) {
        let value = self.counter_mut(key).take_resolved();
        let mut values = CommitValues::single(key, value);
        if !self.auto_commit {
            let other = key.other();
            if let Some(sibling) = self.counter(other).resolved_pending_value() {
                values = values.with(other, sibling);
            }
        }
        let time_str = self.clock.time_str();
        self.log.commit(values, time_str);
        self.after_mutation();
    }

    /// Moves the latest snapshot onto the redo stack.
    ///
    /// Fails with [`LedgerError::EmptyHistory`] if only the starting snapshot
    /// remains; the session is left untouched. Any staged deltas are
    /// discarded on success (the baselines changed underneath them).
    pub fn undo(&mut self) -> Result<(), LedgerError> {
        self.log.undo()?;
        self.after_mutation();
        Ok(())
    }

    /// Replays the most recently undone snapshot.
    ///
    /// Fails with [`LedgerError::NothingToRedo`] if the redo stack is empty;
    /// the session is left untouched.
    pub fn redo(&mut self) -> Result<(), LedgerError> {
        self.log.redo()?;
        self.after_mutation();
        Ok(())
    }

    /// Rewinds history so the snapshot at `index` becomes current; the
    /// truncated tail becomes replayable via [`redo`](Session::redo).
    ///
    /// Fails with [`LedgerError::IndexOutOfRange`] for an invalid index; the
    /// session is left untouched.
    pub fn jump_to(&mut self, index: usize) -> Result<(), LedgerError> {
        self.log.jump_to(index)?;
        self.after_mutation();
        Ok(())
    }

    /// Starts a new game with the given totals, discarding all history.
    pub fn start_new(&mut self, top: i64, bottom: i64) {
        let snapshot = Snapshot::new(top, bottom, self.clock.time_str());
        self.log.start_new(snapshot);
        self.after_mutation();
    }

    /// Toggles auto-commit mode and persists the flag.
    ///
    /// Turning the mode off cancels any pending debounce deadlines (the
    /// staged deltas stay, awaiting a manual commit). Turning it on arms a
    /// deadline for any counter that already has something staged.
    pub fn set_auto_commit(&mut self, enabled: bool, now: Instant) {
        self.auto_commit = enabled;
        self.store.save_auto_commit(enabled);
        for key in [PlayerKey::Top, PlayerKey::Bottom] {
            let armed = enabled && self.counter(key).has_pending();
            let deadline = armed.then(|| now + self.config.auto_commit_delay);
            *self.deadline_mut(key) = deadline;
        }
        debug!(enabled, "auto-commit toggled");
    }

    /// Drives pending auto-commits: commits every counter whose debounce
    /// deadline has elapsed at `now`. Returns `true` if anything committed.
    ///
    /// The host event loop calls this on timer wakeups (see
    /// [`next_deadline`](Session::next_deadline)); calling it early or often
    /// is harmless.
    pub fn poll(&mut self, now: Instant) -> bool {
        let mut committed = false;
        for key in [PlayerKey::Top, PlayerKey::Bottom] {
            let due = matches!(self.deadline(key), Some(deadline) if now >= deadline);
            if due {
                debug!(?key, "auto-commit deadline elapsed");
                self.commit(key);
                committed = true;
            }
        }
        committed
    }

    /// Synchronizes counters with the log, notifies the observer, and writes
    /// the persisted document. Runs after every log mutation, before the
    /// triggering command returns.
    fn after_mutation(&mut self) {
        let starting = self.log.starting().clone();
        let latest = self.log.latest().clone();
        for key in [PlayerKey::Top, PlayerKey::Bottom] {
            let counter = self.counter_mut(key);
            counter.set_maximum(starting.value(key));
            counter.set_baseline(latest.value(key));
            *self.deadline_mut(key) = None;
        }
        self.notify();
        self.store.save_log(self.log.steps());
    }

    fn notify(&self) {
        if let Some(observer) = &self.observer {
            observer.view_changed(&self.view());
        }
    }
}

// #########
// # TESTS #
// #########
