//! VM writer (§4.6, corresponding to `VMWriter.py`)
//!
//! Thin formatted-emission layer over an in-memory buffer, the same
//! shape as `vm_translator::code_writer::CodeWriter` but for the VM
//! language itself rather than Hack assembly, one `write_command`-style
//! helper per line shape.

use std::fmt::Write as _;

#[derive(Default)]
pub struct VmWriter {
    output: String,
}

impl VmWriter {
    #[must_use]
    pub fn new() -> Self {
        Self {
            output: String::with_capacity(4096),
        }
    }

    #[must_use]
    pub fn into_output(self) -> String {
        self.output
    }

    pub fn write_push(&mut self, segment: &str, index: u16) {
        let _ = writeln!(self.output, "push {segment} {index}");
    }

    pub fn write_pop(&mut self, segment: &str, index: u16) {
        let _ = writeln!(self.output, "pop {segment} {index}");
    }

    pub fn write_arithmetic(&mut self, command: &str) {
        let _ = writeln!(self.output, "{command}");
    }

    pub fn write_label(&mut self, label: &str) {
        let _ = writeln!(self.output, "label {label}");
    }

    pub fn write_goto(&mut self, label: &str) {
        let _ = writeln!(self.output, "goto {label}");
    }

    pub fn write_if(&mut self, label: &str) {
        let _ = writeln!(self.output, "if-goto {label}");
    }

    pub fn write_call(&mut self, name: &str, num_args: u16) {
        let _ = writeln!(self.output, "call {name} {num_args}");
    }

    pub fn write_function(&mut self, name: &str, num_locals: u16) {
        let _ = writeln!(self.output, "function {name} {num_locals}");
    }

    pub fn write_return(&mut self) {
        self.output.push_str("return\n");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emits_push_and_call_in_expected_shape() {
        let mut w = VmWriter::new();
        w.write_push("constant", 7);
        w.write_call("Math.multiply", 2);
        w.write_return();
        assert_eq!(
            w.into_output(),
            "push constant 7\ncall Math.multiply 2\nreturn\n"
        );
    }
}
