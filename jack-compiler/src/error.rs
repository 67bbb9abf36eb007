//! Error type for the Jack compiler
//!
//! Same located-error shape as `hack_assembler::AssembleError` and
//! `vm_translator::TranslateError`, widened with a `Semantic` variant for
//! the checks that are not purely syntactic: undefined names, a
//! constructor not returning `this`, a method call resolved against a
//! non-object type (§7).

use std::fmt;

#[derive(Debug)]
pub enum CompileError {
    Io(std::io::Error),
    /// Lexical or grammatical failure: illegal character, unterminated
    /// string/block comment, malformed number, unexpected or missing
    /// token, arity mismatch.
    Syntax {
        file: String,
        line: usize,
        message: String,
    },
    /// Passes the grammar but violates a language rule: undefined
    /// identifier, constructor not returning `this`, method call on a
    /// non-object type.
    Semantic {
        file: String,
        line: usize,
        message: String,
    },
}

impl CompileError {
    #[must_use]
    pub fn syntax(file: &str, line: usize, message: impl Into<String>) -> Self {
        Self::Syntax {
            file: file.to_string(),
            line,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn semantic(file: &str, line: usize, message: impl Into<String>) -> Self {
        Self::Semantic {
            file: file.to_string(),
            line,
            message: message.into(),
        }
    }
}

impl std::error::Error for CompileError {}

impl fmt::Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Syntax {
                file,
                line,
                message,
            }
            | Self::Semantic {
                file,
                line,
                message,
            } => write!(f, "{file}:{line}: {message}"),
        }
    }
}

impl From<std::io::Error> for CompileError {
    fn from(error: std::io::Error) -> Self {
        Self::Io(error)
    }
}
