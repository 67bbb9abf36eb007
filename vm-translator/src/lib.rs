//! VM Translator for the `Nand2Tetris` course
//!
//! Translates the stack-oriented VM language into Hack assembly,
//! implementing the full calling convention (§4.4): arithmetic, the eight
//! memory segments, program flow (`label`/`goto`/`if-goto`), function
//! definition/call/return, and the bootstrap sequence for multi-file
//! translation units that include `Sys.vm`.
//!
//! # Architecture
//! - [`parser`]: line-oriented tokenizing + validation of the nine VM
//!   command shapes
//! - [`code_writer`]: in-memory assembly emission
//! - [`error`]: located (file + line) error reporting
//!
//! # Example
//!
//! ```rust
//! use vm_translator::translate_source;
//!
//! let asm = translate_source("Add.vm", "push constant 7\npush constant 8\nadd\n").unwrap();
//! assert!(asm.contains("D+M"));
//! ```

#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::missing_errors_doc, clippy::module_name_repetitions)]

pub mod code_writer;
pub mod error;
pub mod parser;

use code_writer::CodeWriter;
use parser::Command;

pub use error::TranslateError;
pub use parser::{ArithOp, Segment};

/// Translates a single VM source unit into Hack assembly and returns it
/// as a string. `file` is the basename used both for error messages and
/// to key the `static` segment's per-file namespace (§4.4).
///
/// # Errors
/// Returns [`TranslateError::Syntax`] on the first invalid or
/// out-of-range command, with the offending line number.
pub fn translate_source(file: &str, source: &str) -> Result<String, TranslateError> {
    let mut writer = CodeWriter::new();
    writer.set_file_name(file);
    emit_unit(&mut writer, file, source)?;
    Ok(writer.into_output())
}

/// Translates several VM files into one assembly listing, as the VM
/// translator does for a directory input (§6): each unit keeps its own
/// static-variable namespace, and a bootstrap (`SP=256; call Sys.init 0`)
/// is emitted first iff one of the units is named `Sys`.
///
/// `units` is `(file_name, source)` pairs; callers are responsible for
/// any directory-ordering policy (e.g. sorting for determinism).
///
/// # Errors
/// See [`translate_source`]; the first invalid unit aborts the whole
/// translation.
pub fn translate_units(units: &[(String, String)]) -> Result<String, TranslateError> {
    let mut writer = CodeWriter::new();

    let has_sys = units.iter().any(|(name, _)| basename(name) == "Sys");
    if has_sys {
        writer.write_bootstrap();
    }

    for (file, source) in units {
        writer.set_file_name(file);
        emit_unit(&mut writer, file, source)?;
    }

    Ok(writer.into_output())
}

fn basename(file: &str) -> &str {
    std::path::Path::new(file)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(file)
}

fn emit_unit(writer: &mut CodeWriter, file: &str, source: &str) -> Result<(), TranslateError> {
    let commands = parser::parse_lines(file, source)?;
    for (_line, command) in commands {
        match command {
            Command::Arithmetic(op) => writer.write_arithmetic(op),
            Command::Push(seg, idx) => writer.write_push(seg, idx),
            Command::Pop(seg, idx) => writer.write_pop(seg, idx),
            Command::Label(name) => writer.write_label(&name),
            Command::Goto(name) => writer.write_goto(&name),
            Command::IfGoto(name) => writer.write_if(&name),
            Command::Function(name, locals) => writer.write_function(&name, locals),
            Command::Call(name, args) => writer.write_call(&name, args),
            Command::Return => writer.write_return(),
        }
    }
    Ok(())
}
