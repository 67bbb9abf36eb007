//! VM Translator - Main Entry Point
//!
//! Translates Hack VM language into Hack assembly (`Nand2Tetris` Project 7/8).
//!
//! # Usage
//! ```bash
//! cargo run <input.vm>
//! cargo run <directory>
//! ```
//!
//! A single `.vm` file translates to a matching `.asm` file. A directory
//! of `.vm` files concatenates into `<dirname>.asm`, each keeping its own
//! static-variable namespace, with the bootstrap sequence emitted first
//! iff the directory contains `Sys.vm` (§6).

#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use vm_translator::TranslateError;

type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

fn main() {
    let args: Vec<String> = env::args().collect();
    if args.len() != 2 {
        eprintln!("Usage: {} <input.vm | directory>", args[0]);
        process::exit(1);
    }

    if let Err(e) = run(&args[1]) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run(input: &str) -> Result<()> {
    let path = Path::new(input);

    let (output_path, asm) = if path.is_dir() {
        translate_directory(path)?
    } else {
        translate_file(path)?
    };

    fs::write(&output_path, asm)?;
    println!(
        "Translation complete: {} -> {}",
        input,
        output_path.display()
    );
    Ok(())
}

fn translate_file(path: &Path) -> Result<(PathBuf, String)> {
    let source = fs::read_to_string(path)?;
    let file_name = path
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("input.vm");
    let asm = vm_translator::translate_source(file_name, &source).map_err(box_err)?;
    Ok((path.with_extension("asm"), asm))
}

fn translate_directory(dir: &Path) -> Result<(PathBuf, String)> {
    let mut vm_files: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(std::result::Result::ok)
        .map(|entry| entry.path())
        .filter(|p| p.extension().and_then(|s| s.to_str()) == Some("vm"))
        .collect();
    vm_files.sort();

    let mut units = Vec::with_capacity(vm_files.len());
    for file in &vm_files {
        let source = fs::read_to_string(file)?;
        let name = file
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("unit.vm")
            .to_string();
        units.push((name, source));
    }

    let asm = vm_translator::translate_units(&units).map_err(box_err)?;

    let dir_name = dir
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("output");
    let output = dir.join(format!("{dir_name}.asm"));
    Ok((output, asm))
}

fn box_err(e: TranslateError) -> Box<dyn std::error::Error> {
    Box::new(e)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_file_output_path_swaps_extension() {
        let (path, _) = (PathBuf::from("Foo.vm").with_extension("asm"), ());
        assert_eq!(path, PathBuf::from("Foo.asm"));
    }
}
