//! Hack Assembler - Main Entry Point
//!
//! A two-pass assembler for the Hack assembly language (`Nand2Tetris` Project 6).
//!
//! # Usage
//! ```bash
//! cargo run <input.asm> [output.hack]
//! ```

#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

use std::env;
use std::fs;
use std::process;

use hack_assembler::AssembleError;

type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

/// Determines the output file path
fn output_path(input: &str, explicit_output: Option<&str>) -> String {
    explicit_output.map_or_else(
        || input.replace(".asm", ".hack"),
        std::string::ToString::to_string,
    )
}

fn box_err(e: AssembleError) -> Box<dyn std::error::Error> {
    Box::new(e)
}

fn run(input_path: &str, output: &str) -> Result<()> {
    let source = fs::read_to_string(input_path)?;
    let hack = hack_assembler::assemble_source(input_path, &source).map_err(box_err)?;
    fs::write(output, hack)?;
    println!("Assembly completed. Output written to {output}");
    Ok(())
}

fn main() {
    let args: Vec<String> = env::args().collect();

    if !(2..=3).contains(&args.len()) {
        eprintln!("Usage: {} <input.asm> [output.hack]", args[0]);
        eprintln!();
        eprintln!("Examples:");
        eprintln!("  {} Add.asm", args[0]);
        eprintln!("  {} Add.asm Add.hack", args[0]);
        process::exit(1);
    }

    let input_path = &args[1];
    let output = output_path(input_path, args.get(2).map(String::as_str));

    if let Err(e) = run(input_path, &output) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}
