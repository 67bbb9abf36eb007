//! Error type for the Hack assembler
//!
//! Widens the parser's original two-variant sketch into the error kinds
//! a full assembler has to report: I/O failures and located syntax errors
//! (file name + line number + reason), per the propagation policy that
//! aborts on the first error with no recovery.

use std::fmt;

#[derive(Debug)]
pub enum AssembleError {
    Io(std::io::Error),
    /// A line failed to parse or validate: illegal symbol, unknown
    /// mnemonic, malformed A/C/L instruction, out-of-range address.
    Syntax {
        file: String,
        line: usize,
        message: String,
    },
}

impl AssembleError {
    #[must_use]
    pub fn syntax(file: &str, line: usize, message: impl Into<String>) -> Self {
        Self::Syntax {
            file: file.to_string(),
            line,
            message: message.into(),
        }
    }
}

impl std::error::Error for AssembleError {}

impl fmt::Display for AssembleError {
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

impl From<std::io::Error> for AssembleError {
    fn from(error: std::io::Error) -> Self {
        Self::Io(error)
    }
}
