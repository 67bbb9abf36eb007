//! Jack Compiler for the `Nand2Tetris` course
//!
//! Compiles Jack source directly to VM code in a single pass: no
//! intermediate AST, no XML output. The tokenizer feeds the
//! compilation engine, which emits VM commands as each grammar rule is
//! recognized, exactly as `CompilationEngine.py`'s `compile_*` methods
//! do against their `VMWriter`.
//!
//! # Architecture
//! - [`tokenizer`]: lexing, with a `phf::phf_map!` keyword table
//! - [`symbol_table`]: two-scope (class/subroutine) name resolution
//! - [`compilation_engine`]: recursive-descent parse + VM emission
//! - [`vm_writer`]: formatted VM command emission
//! - [`error`]: located (file + line) syntax and semantic error reporting
//!
//! # Example
//!
//! ```rust
//! use jack_compiler::compile_source;
//!
//! let vm = compile_source(
//!     "Main.jack",
//!     "class Main { function void main() { do Output.printInt(1); return; } }",
//! )
//! .unwrap();
//! assert!(vm.contains("call Output.printInt 1"));
//! ```

#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::missing_errors_doc, clippy::module_name_repetitions)]

pub mod compilation_engine;
pub mod error;
pub mod symbol_table;
pub mod tokenizer;
pub mod vm_writer;

pub use error::CompileError;
pub use symbol_table::{Kind, SymbolTable};
pub use tokenizer::{Keyword, Token};

/// Compiles one Jack source file to VM text.
///
/// `file` qualifies error messages only; the VM code produced does not
/// otherwise depend on the file name (unlike the VM translator's
/// `static` segment, Jack classes carry their own namespace via the
/// class name baked into every function/call label).
///
/// # Errors
/// Returns [`CompileError::Syntax`] on the first lexical or
/// grammatical failure, or [`CompileError::Semantic`] on an undefined
/// name, a constructor that doesn't return `this`, or a method call
/// resolved against a non-object type, all with the offending line
/// number.
pub fn compile_source(file: &str, source: &str) -> Result<String, CompileError> {
    compilation_engine::compile(file, source)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compiles_a_minimal_class() {
        let vm = compile_source(
            "Main.jack",
            "class Main {\n    function void main() {\n        return;\n    }\n}\n",
        )
        .unwrap();
        assert_eq!(vm, "function Main.main 0\npush constant 0\nreturn\n");
    }

    #[test]
    fn syntax_error_reports_file_and_line() {
        let err = compile_source("Bad.jack", "class Bad {\n    function void f() {\n        let;\n    }\n}\n")
            .unwrap_err();
        assert!(err.to_string().starts_with("Bad.jack:3:"), "got: {err}");
    }
}
