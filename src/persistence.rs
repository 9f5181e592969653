//! The persistence gateway: load/save of the serialized step log.
//!
//! The persisted document is a whole-document JSON replace with no
//! transactional guarantees; the last writer wins. Malformed or missing data
//! never surfaces as an error — the session falls back to its default
//! single-snapshot log. A second, independent flag persists the auto-commit
//! toggle.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::snapshot::Snapshot;

/// The serialized document wrapping the step sequence.
///
/// Field names match the original persisted format and must stay stable.
#[derive(Debug, Serialize, Deserialize)]
struct PersistedDoc {
    #[serde(rename = "Steps")]
    steps: Vec<Snapshot>,
}

/// Durable storage for the step log and the auto-commit flag.
///
/// Writes are fire-and-forget: implementations log failures and return
/// normally, since losing a write is strictly better than corrupting the
/// in-memory session. Loads return `None` for absent *or* malformed data.
pub trait StateStore {
    /// Reads the persisted snapshot sequence, or `None` if absent/malformed.
    fn load_log(&self) -> Option<Vec<Snapshot>>;

    /// Overwrites the persisted snapshot sequence with `steps`.
    fn save_log(&mut self, steps: &[Snapshot]);

    /// Reads the persisted auto-commit flag, or `None` if absent/malformed.
    fn load_auto_commit(&self) -> Option<bool>;

    /// Overwrites the persisted auto-commit flag.
    fn save_auto_commit(&mut self, enabled: bool);
}

/// Serializes a snapshot sequence to the persisted document text.
fn encode_log(steps: &[Snapshot]) -> Result<String, serde_json::Error> {
    serde_json::to_string(&PersistedDoc {
        steps: steps.to_vec(),
    })
}

/// Deserializes the persisted document text, rejecting empty step sequences
/// (a log must always contain its starting snapshot).
fn decode_log(text: &str) -> Option<Vec<Snapshot>> {
    match serde_json::from_str::<PersistedDoc>(text) {
        Ok(doc) if !doc.steps.is_empty() => Some(doc.steps),
        Ok(_) => {
            warn!("persisted step sequence is empty, falling back to default");
            None
        }
        Err(err) => {
            warn!(%err, "malformed persisted state, falling back to default");
            None
        }
    }
}

/// A [`StateStore`] backed by two JSON files in a directory: `data.json` for
/// the step log and `auto-submit.json` for the toggle, mirroring the original
/// storage keys.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    log_path: PathBuf,
    flag_path: PathBuf,
}

impl JsonFileStore {
    /// Creates a store rooted at `dir`. The directory is created on first
    /// write, not here.
    #[must_use]
    pub fn new(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            log_path: dir.join("data.json"),
            flag_path: dir.join("auto-submit.json"),
        }
    }

    fn write(path: &Path, contents: &str) {
        if let Some(parent) = path.parent() {
            if let Err(err) = fs::create_dir_all(parent) {
                warn!(%err, path = %path.display(), "could not create store directory");
                return;
            }
        }
        match fs::write(path, contents) {
            Ok(()) => debug!(path = %path.display(), bytes = contents.len(), "state written"),
            Err(err) => warn!(%err, path = %path.display(), "state write failed"),
        }
    }
}

impl StateStore for JsonFileStore {
    fn load_log(&self) -> Option<Vec<Snapshot>> {
        let text = fs::read_to_string(&self.log_path).ok()?;
        decode_log(&text)
    }

    fn save_log(&mut self, steps: &[Snapshot]) {
        match encode_log(steps) {
            Ok(text) => Self::write(&self.log_path, &text),
            Err(err) => warn!(%err, "could not serialize step log"),
        }
    }

    fn load_auto_commit(&self) -> Option<bool> {
        let text = fs::read_to_string(&self.flag_path).ok()?;
        serde_json::from_str(text.trim()).ok()
    }

    fn save_auto_commit(&mut self, enabled: bool) {
        Self::write(&self.flag_path, if enabled { "true" } else { "false" });
    }
}

/// An in-memory [`StateStore`] for tests and ephemeral sessions. Stores the
/// serialized document text, not the live structures, so round-trips exercise
/// the real format.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    log_text: Option<String>,
    auto_commit: Option<bool>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-seeded with raw document text, malformed or not.
    /// Useful for exercising the corruption fallback.
    #[must_use]
    pub fn with_log_text(text: impl Into<String>) -> Self {
        Self {
            log_text: Some(text.into()),
            auto_commit: None,
        }
    }

    /// The raw persisted document text, if any write has happened.
    #[must_use]
    pub fn log_text(&self) -> Option<&str> {
        self.log_text.as_deref()
    }
}

impl StateStore for MemoryStore {
    fn load_log(&self) -> Option<Vec<Snapshot>> {
        decode_log(self.log_text.as_deref()?)
    }

    fn save_log(&mut self, steps: &[Snapshot]) {
        match encode_log(steps) {
            Ok(text) => self.log_text = Some(text),
            Err(err) => warn!(%err, "could not serialize step log"),
        }
    }

    fn load_auto_commit(&self) -> Option<bool> {
        self.auto_commit
    }

    fn save_auto_commit(&mut self, enabled: bool) {
        self.auto_commit = Some(enabled);
    }
}

// #########
// # TESTS #
// #########
