//! Jack Compiler - Main Entry Point
//!
//! Compiles Jack source into VM code (`Nand2Tetris` Project 10/11).
//!
//! # Usage
//! ```bash
//! cargo run <input.jack>
//! cargo run <directory>
//! ```
//!
//! A single `.jack` file compiles to a matching `.vm` file. A directory
//! compiles every `.jack` file in it independently, each to its own
//! `.vm` file with the same basename. Unlike the VM translator, Jack
//! classes are self-namespaced by class name, so there is nothing to
//! concatenate.

#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use jack_compiler::CompileError;

type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

fn main() {
    let args: Vec<String> = env::args().collect();
    if args.len() != 2 {
        eprintln!("Usage: {} <input.jack | directory>", args[0]);
        process::exit(1);
    }

    if let Err(e) = run(&args[1]) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run(input: &str) -> Result<()> {
    let path = Path::new(input);

    let jack_files: Vec<PathBuf> = if path.is_dir() {
        let mut files: Vec<PathBuf> = fs::read_dir(path)?
            .filter_map(std::result::Result::ok)
            .map(|entry| entry.path())
            .filter(|p| p.extension().and_then(|s| s.to_str()) == Some("jack"))
            .collect();
        files.sort();
        files
    } else {
        vec![path.to_path_buf()]
    };

    if jack_files.is_empty() {
        eprintln!("no .jack files found in {input}");
        process::exit(1);
    }

    for file in &jack_files {
        let output = compile_file(file).map_err(box_err)?;
        println!(
            "Compilation complete: {} -> {}",
            file.display(),
            output.display()
        );
    }
    Ok(())
}

fn compile_file(path: &Path) -> std::result::Result<PathBuf, CompileError> {
    let source = fs::read_to_string(path)?;
    let file_name = path
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("input.jack");
    let vm = jack_compiler::compile_source(file_name, &source)?;
    let output_path = path.with_extension("vm");
    fs::write(&output_path, vm)?;
    Ok(output_path)
}

fn box_err(e: CompileError) -> Box<dyn std::error::Error> {
    Box::new(e)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_file_output_path_swaps_extension() {
        let path = PathBuf::from("Main.jack").with_extension("vm");
        assert_eq!(path, PathBuf::from("Main.vm"));
    }
}
