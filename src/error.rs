use std::error::Error;
use std::fmt;
use std::fmt::Display;

/// This enum contains all error messages this library can return. Most fallible API
/// functions will generally return a [`Result<(), LedgerError>`].
///
/// [`Result<(), LedgerError>`]: std::result::Result
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LedgerError {
    /// Undo was requested while the step log contains only its starting snapshot.
    /// The starting snapshot can never be removed.
    EmptyHistory,
    /// Redo was requested while the redo stack is empty. Redo is only available
    /// immediately after an undo (or jump) with no intervening commit.
    NothingToRedo,
    /// An invalid step-log index was provided to a jump request.
    IndexOutOfRange {
        /// The index that was requested.
        index: usize,
        /// The current length of the step log (valid indices are `0..len`).
        len: usize,
    },
    /// The persisted state document could not be deserialized or failed validation.
    ///
    /// This error never escapes session construction: the persistence gateway
    /// swallows it and substitutes the default single-snapshot log.
    MalformedPersistedState {
        /// A description of what failed to deserialize or validate.
        context: String,
    },
}

impl Display for LedgerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LedgerError::EmptyHistory => {
                write!(
                    f,
                    "Nothing to undo: the step log only contains the starting snapshot."
                )
            }
            LedgerError::NothingToRedo => {
                write!(f, "Nothing to redo: the redo stack is empty.")
            }
            LedgerError::IndexOutOfRange { index, len } => {
                write!(
                    f,
                    "Step index {} is out of range: the log has {} step(s).",
                    index, len
                )
            }
            LedgerError::MalformedPersistedState { context } => {
                write!(f, "Malformed persisted state: {}", context)
            }
        }
    }
}

impl Error for LedgerError {}
