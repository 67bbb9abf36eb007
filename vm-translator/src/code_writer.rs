//! 汇编代码生成器：将VM命令翻译成Hack汇编指令。
//!
//! Builds the output in memory (a `String`) rather than streaming straight
//! to a file, so `lib.rs` can hand callers a finished assembly listing
//! without touching the filesystem, the same shape as
//! `hack_assembler::assemble_lines`. `main.rs` is the only place that
//! opens a file.

use crate::parser::{ArithOp, Segment};
use std::fmt::Write as _;

// 定义一个宏来简化汇编代码的写入
macro_rules! write_asm {
    ($out:expr, $($line:literal)*) => {
        $out.push_str(concat!($($line, "\n"),*))
    };
}

pub struct CodeWriter {
    output: String,
    /// Basename of the `.vm` file currently being translated; keys the
    /// per-file static-variable namespace (§4.4, §9).
    filename: String,
    /// Name of the enclosing `function` command, for `<function>$<label>`
    /// scoping of `label`/`goto`/`if-goto` (§4.4).
    current_function: Option<String>,
    /// Monotonic counter so each `eq`/`gt`/`lt` gets a fresh label (§4.4).
    compare_counter: usize,
    /// Monotonic counter for `call`'s generated return-address labels.
    return_counter: usize,
}

impl Default for CodeWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl CodeWriter {
    #[must_use]
    pub fn new() -> Self {
        CodeWriter {
            output: String::with_capacity(4096),
            filename: String::new(),
            current_function: None,
            compare_counter: 0,
            return_counter: 0,
        }
    }

    /// 设置当前编译单元的静态变量命名空间（取文件名，不含扩展名和路径）。
    pub fn set_file_name(&mut self, filename: &str) {
        let name = std::path::Path::new(filename)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(filename);
        self.filename.clear();
        self.filename.push_str(name);
    }

    #[must_use]
    pub fn into_output(self) -> String {
        self.output
    }

    /// Bootstrap sequence (§4.4): `SP=256` then `call Sys.init 0`, emitted
    /// once before any translated unit when `Sys.vm` is part of the batch.
    pub fn write_bootstrap(&mut self) {
        self.output.push_str("// bootstrap: SP=256; call Sys.init 0\n");
        write_asm!(self.output,
            "@256"
            "D=A"
            "@SP"
            "M=D"
        );
        self.write_call("Sys.init", 0);
    }

    pub fn write_arithmetic(&mut self, op: ArithOp) {
        let _ = writeln!(self.output, "// vm command: {op:?}");
        match op {
            ArithOp::Add => self.write_binary_op("D+M"),
            ArithOp::Sub => self.write_binary_op("M-D"),
            ArithOp::And => self.write_binary_op("D&M"),
            ArithOp::Or => self.write_binary_op("D|M"),
            ArithOp::Neg => self.write_unary_op("-M"),
            ArithOp::Not => self.write_unary_op("!M"),
            ArithOp::Eq => self.write_comparison("JEQ"),
            ArithOp::Gt => self.write_comparison("JGT"),
            ArithOp::Lt => self.write_comparison("JLT"),
        }
    }

    /// Pops the top value into D, leaves `*(SP-1)` as the other operand,
    /// folds `comp` into `*(SP-1)` and decrements SP by one net.
    fn write_binary_op(&mut self, comp: &str) {
        write_asm!(self.output,
            "@SP"
            "AM=M-1"
            "D=M"
            "A=A-1"
        );
        let _ = writeln!(self.output, "M={comp}");
    }

    fn write_unary_op(&mut self, comp: &str) {
        write_asm!(self.output,
            "@SP"
            "A=M-1"
        );
        let _ = writeln!(self.output, "M={comp}");
    }

    /// `*(SP-1) - *SP`, true (-1) on the matching jump else false (0).
    /// Each call gets a fresh label pair so nested comparisons never
    /// collide (§4.4 "unique label").
    fn write_comparison(&mut self, jump: &str) {
        let n = self.compare_counter;
        self.compare_counter += 1;
        write_asm!(self.output,
            "@SP"
            "AM=M-1"
            "D=M"
            "A=A-1"
            "D=M-D"
            "M=-1"
        );
        let _ = writeln!(self.output, "@COMPARE_TRUE_{n}");
        let _ = writeln!(self.output, "D;{jump}");
        write_asm!(self.output,
            "@SP"
            "A=M-1"
            "M=0"
        );
        let _ = writeln!(self.output, "(COMPARE_TRUE_{n})");
    }

    pub fn write_push(&mut self, segment: Segment, index: u16) {
        let _ = writeln!(self.output, "// vm command: push {segment:?} {index}");
        match segment {
            Segment::Constant => {
                let _ = writeln!(self.output, "@{index}");
                self.output.push_str("D=A\n");
            }
            Segment::Local | Segment::Argument | Segment::This | Segment::That => {
                let _ = writeln!(self.output, "@{}", segment_pointer(segment));
                write_asm!(self.output, "D=M");
                let _ = writeln!(self.output, "@{index}");
                self.output.push_str("A=D+A\nD=M\n");
            }
            Segment::Temp => {
                let addr = 5 + index;
                let _ = writeln!(self.output, "@{addr}");
                self.output.push_str("D=M\n");
            }
            Segment::Pointer => {
                let _ = writeln!(self.output, "@{}", pointer_register(index));
                self.output.push_str("D=M\n");
            }
            Segment::Static => {
                let _ = writeln!(self.output, "@{}.{index}", self.filename);
                self.output.push_str("D=M\n");
            }
        }
        self.write_push_d();
        self.output.push('\n');
    }

    pub fn write_pop(&mut self, segment: Segment, index: u16) {
        let _ = writeln!(self.output, "// vm command: pop {segment:?} {index}");
        match segment {
            Segment::Local | Segment::Argument | Segment::This | Segment::That => {
                let _ = writeln!(self.output, "@{}", segment_pointer(segment));
                self.output.push_str("D=M\n");
                let _ = writeln!(self.output, "@{index}");
                write_asm!(self.output,
                    "D=D+A"
                    "@R13"
                    "M=D"
                );
                self.write_pop_to_d();
                write_asm!(self.output,
                    "@R13"
                    "A=M"
                    "M=D"
                );
            }
            Segment::Temp => {
                let addr = 5 + index;
                self.write_pop_to_d();
                let _ = writeln!(self.output, "@{addr}");
                self.output.push_str("M=D\n");
            }
            Segment::Pointer => {
                self.write_pop_to_d();
                let _ = writeln!(self.output, "@{}", pointer_register(index));
                self.output.push_str("M=D\n");
            }
            Segment::Static => {
                self.write_pop_to_d();
                let _ = writeln!(self.output, "@{}.{index}", self.filename);
                self.output.push_str("M=D\n");
            }
            Segment::Constant => unreachable!("pop constant is rejected by the parser"),
        }
    }

    fn write_push_d(&mut self) {
        write_asm!(self.output,
            "@SP"
            "A=M"
            "M=D"
            "@SP"
            "M=M+1"
        );
    }

    fn write_pop_to_d(&mut self) {
        write_asm!(self.output,
            "@SP"
            "AM=M-1"
            "D=M"
        );
    }

    /// VM labels are scoped to the enclosing function as `<function>$<label>`
    /// (§4.4); outside any function the bare name is used.
    fn scoped_label(&self, label: &str) -> String {
        match &self.current_function {
            Some(f) => format!("{f}${label}"),
            None => label.to_string(),
        }
    }

    pub fn write_label(&mut self, label: &str) {
        let _ = writeln!(self.output, "({})", self.scoped_label(label));
    }

    pub fn write_goto(&mut self, label: &str) {
        let scoped = self.scoped_label(label);
        let _ = writeln!(self.output, "@{scoped}");
        self.output.push_str("0;JMP\n");
    }

    /// Pops the top of stack and jumps if non-zero (JNE).
    pub fn write_if(&mut self, label: &str) {
        let scoped = self.scoped_label(label);
        self.write_pop_to_d();
        let _ = writeln!(self.output, "@{scoped}");
        self.output.push_str("D;JNE\n");
    }

    /// `function f k` (§4.4): label `f`, then push `k` zeroed locals.
    pub fn write_function(&mut self, name: &str, num_locals: u16) {
        self.current_function = Some(name.to_string());
        let _ = writeln!(self.output, "({name})");
        for _ in 0..num_locals {
            self.output.push_str("@SP\nA=M\nM=0\n@SP\nM=M+1\n");
        }
    }

    /// `call f n` (§4.4): push return address + saved frame, reposition
    /// ARG/LCL, jump to `f`, then emit the return label.
    pub fn write_call(&mut self, name: &str, num_args: u16) {
        self.return_counter += 1;
        let return_label = format!("RETURN_{}", self.return_counter);

        let _ = writeln!(self.output, "@{return_label}");
        self.output.push_str("D=A\n");
        self.write_push_d();

        for symbol in ["LCL", "ARG", "THIS", "THAT"] {
            let _ = writeln!(self.output, "@{symbol}");
            self.output.push_str("D=M\n");
            self.write_push_d();
        }

        // ARG = SP - n - 5
        write_asm!(self.output, "@SP" "D=M");
        let offset = u32::from(num_args) + 5;
        let _ = writeln!(self.output, "@{offset}");
        write_asm!(self.output,
            "D=D-A"
            "@ARG"
            "M=D"
            "@SP"
            "D=M"
            "@LCL"
            "M=D"
        );

        let _ = writeln!(self.output, "@{name}");
        self.output.push_str("0;JMP\n");
        let _ = writeln!(self.output, "({return_label})");
    }

    /// `return` (§4.4): unwind the frame saved by `call` and jump back.
    pub fn write_return(&mut self) {
        // FRAME (R13) = LCL
        write_asm!(self.output, "@LCL" "D=M" "@R13" "M=D");
        // RET (R14) = *(FRAME-5)
        write_asm!(self.output,
            "@5"
            "A=D-A"
            "D=M"
            "@R14"
            "M=D"
        );
        // *ARG = return value (top of stack)
        self.write_pop_to_d();
        write_asm!(self.output, "@ARG" "A=M" "M=D");
        // SP = ARG+1
        write_asm!(self.output, "@ARG" "D=M+1" "@SP" "M=D");

        for (offset, symbol) in [(1, "THAT"), (2, "THIS"), (3, "ARG"), (4, "LCL")] {
            let _ = writeln!(self.output, "@R13");
            self.output.push_str("D=M\n");
            let _ = writeln!(self.output, "@{offset}");
            write_asm!(self.output, "A=D-A" "D=M");
            let _ = writeln!(self.output, "@{symbol}");
            self.output.push_str("M=D\n");
        }

        write_asm!(self.output, "@R14" "A=M" "0;JMP");
    }
}

fn segment_pointer(segment: Segment) -> &'static str {
    match segment {
        Segment::Local => "LCL",
        Segment::Argument => "ARG",
        Segment::This => "THIS",
        Segment::That => "THAT",
        _ => unreachable!("only the four indexed pointer segments call this"),
    }
}

fn pointer_register(index: u16) -> &'static str {
    match index {
        0 => "THIS",
        1 => "THAT",
        _ => unreachable!("pointer index is validated to 0..=1 by the parser"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_constant_then_add() {
        let mut cw = CodeWriter::new();
        cw.write_push(Segment::Constant, 7);
        cw.write_push(Segment::Constant, 8);
        cw.write_arithmetic(ArithOp::Add);
        let asm = cw.into_output();
        assert!(asm.contains("@7"));
        assert!(asm.contains("@8"));
        assert!(asm.contains("D+M"));
    }

    #[test]
    fn labels_scope_to_enclosing_function() {
        let mut cw = CodeWriter::new();
        cw.write_function("Foo.bar", 0);
        cw.write_label("LOOP");
        let asm = cw.into_output();
        assert!(asm.contains("(Foo.bar$LOOP)"));
    }

    #[test]
    fn bare_label_outside_function_is_unscoped() {
        let mut cw = CodeWriter::new();
        cw.write_label("LOOP");
        let asm = cw.into_output();
        assert!(asm.contains("(LOOP)"));
    }

    #[test]
    fn call_pushes_five_frame_words_before_jump() {
        let mut cw = CodeWriter::new();
        cw.write_call("Foo.bar", 2);
        let asm = cw.into_output();
        // five pushes: return address, LCL, ARG, THIS, THAT
        assert_eq!(asm.matches("M=M+1").count(), 5);
        assert!(asm.contains("@Foo.bar"));
        assert!(asm.contains("(RETURN_1)"));
    }

    #[test]
    fn static_segment_is_namespaced_by_filename() {
        let mut cw = CodeWriter::new();
        cw.set_file_name("Foo.vm");
        cw.write_push(Segment::Static, 3);
        let asm = cw.into_output();
        assert!(asm.contains("@Foo.3"));
    }
}
