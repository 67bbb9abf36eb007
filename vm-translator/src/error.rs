//! Error type for the VM translator
//!
//! Widens the original `projetc7` prototype (which `expect()`s and
//! `panic!()`s on malformed input) into the error kinds a full translator
//! has to report: I/O failures and located syntax errors (file name + line
//! number + reason), per the propagation policy that aborts on the first
//! error with no recovery.

use std::fmt;

#[derive(Debug)]
pub enum TranslateError {
    Io(std::io::Error),
    /// A line failed to parse or validate: unrecognized command, bad
    /// segment, out-of-range index, `pop constant`, arity mismatch.
    Syntax {
        file: String,
        line: usize,
        message: String,
    },
}

impl TranslateError {
    #[must_use]
    pub fn syntax(file: &str, line: usize, message: impl Into<String>) -> Self {
        Self::Syntax {
            file: file.to_string(),
            line,
            message: message.into(),
        }
    }
}

impl std::error::Error for TranslateError {}

impl fmt::Display for TranslateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Syntax {
                file,
                line,
                message,
            } => write!(f, "{file}:{line}: {message}"),
        }
    }
}

impl From<std::io::Error> for TranslateError {
    fn from(error: std::io::Error) -> Self {
        Self::Io(error)
    }
}
