//! Parser module for the VM language
//!
//! Line-oriented like the Hack assembly parser: strips `//` comments and
//! surrounding whitespace, skips blank lines, and classifies what remains
//! into one of the nine VM command shapes (§4.3). Unlike the original
//! `projetc7` prototype (which cached whitespace-split parts and let
//! `arg1`/`arg2` panic on a bad shape), every command is validated and
//! parsed into a [`Command`] up front, with the offending source line
//! number attached to any error.

use crate::error::TranslateError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithOp {
    Add,
    Sub,
    Neg,
    Eq,
    Gt,
    Lt,
    And,
    Or,
    Not,
}

impl ArithOp {
    fn from_str(s: &str) -> Option<Self> {
        Some(match s {
            "add" => Self::Add,
            "sub" => Self::Sub,
            "neg" => Self::Neg,
            "eq" => Self::Eq,
            "gt" => Self::Gt,
            "lt" => Self::Lt,
            "and" => Self::And,
            "or" => Self::Or,
            "not" => Self::Not,
            _ => return None,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment {
    Local,
    Argument,
    This,
    That,
    Pointer,
    Temp,
    Constant,
    Static,
}

impl Segment {
    fn from_str(s: &str) -> Option<Self> {
        Some(match s {
            "local" => Self::Local,
            "argument" => Self::Argument,
            "this" => Self::This,
            "that" => Self::That,
            "pointer" => Self::Pointer,
            "temp" => Self::Temp,
            "constant" => Self::Constant,
            "static" => Self::Static,
            _ => return None,
        })
    }
}

/// A fully parsed and validated VM command, tagged as in §3.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Arithmetic(ArithOp),
    Push(Segment, u16),
    Pop(Segment, u16),
    Label(String),
    Goto(String),
    IfGoto(String),
    Function(String, u16),
    Call(String, u16),
    Return,
}

/// Strips a `//` comment and surrounding whitespace from one source line.
fn clean(line: &str) -> &str {
    let without_comment = line.find("//").map_or(line, |pos| &line[..pos]);
    without_comment.trim()
}

/// Parses preprocessed VM source into commands paired with their original
/// 1-based source line number (for error messages). Blank and
/// comment-only lines are dropped before classification, matching the
/// lexer description in §4.3.
pub fn parse_lines(file: &str, source: &str) -> Result<Vec<(usize, Command)>, TranslateError> {
    let mut commands = Vec::new();

    for (idx, raw) in source.lines().enumerate() {
        let line_no = idx + 1;
        let text = clean(raw);
        if text.is_empty() {
            continue;
        }
        let parts: Vec<&str> = text.split_whitespace().collect();
        let command = parse_command(file, line_no, &parts)?;
        commands.push((line_no, command));
    }

    Ok(commands)
}

fn parse_command(file: &str, line: usize, parts: &[&str]) -> Result<Command, TranslateError> {
    let err = |message: String| TranslateError::syntax(file, line, message);

    match parts[0] {
        "push" | "pop" => {
            if parts.len() != 3 {
                return Err(err(format!(
                    "expected '{} <segment> <index>', got '{}'",
                    parts[0],
                    parts.join(" ")
                )));
            }
            let segment = Segment::from_str(parts[1])
                .ok_or_else(|| err(format!("unknown segment \"{}\"", parts[1])))?;
            let index = parse_index(file, line, parts[2])?;

            if parts[0] == "pop" && segment == Segment::Constant {
                return Err(err("pop constant is illegal".to_string()));
            }
            validate_segment_range(file, line, segment, index)?;

            Ok(if parts[0] == "push" {
                Command::Push(segment, index)
            } else {
                Command::Pop(segment, index)
            })
        }
        "label" | "goto" | "if-goto" => {
            if parts.len() != 2 {
                return Err(err(format!(
                    "expected '{} <symbol>', got '{}'",
                    parts[0],
                    parts.join(" ")
                )));
            }
            let name = parts[1].to_string();
            Ok(match parts[0] {
                "label" => Command::Label(name),
                "goto" => Command::Goto(name),
                _ => Command::IfGoto(name),
            })
        }
        "function" | "call" => {
            if parts.len() != 3 {
                return Err(err(format!(
                    "expected '{} <name> <int>', got '{}'",
                    parts[0],
                    parts.join(" ")
                )));
            }
            let name = parts[1].to_string();
            let count = parse_index(file, line, parts[2])?;
            Ok(if parts[0] == "function" {
                Command::Function(name, count)
            } else {
                Command::Call(name, count)
            })
        }
        "return" => {
            if parts.len() != 1 {
                return Err(err("return takes no arguments".to_string()));
            }
            Ok(Command::Return)
        }
        other => {
            if parts.len() != 1 {
                return Err(err(format!("unexpected arguments after \"{other}\"")));
            }
            ArithOp::from_str(other)
                .map(Command::Arithmetic)
                .ok_or_else(|| err(format!("unknown command \"{other}\"")))
        }
    }
}

fn parse_index(file: &str, line: usize, text: &str) -> Result<u16, TranslateError> {
    text.parse::<u16>()
        .map_err(|_| TranslateError::syntax(file, line, format!("invalid index \"{text}\"")))
}

fn validate_segment_range(
    file: &str,
    line: usize,
    segment: Segment,
    index: u16,
) -> Result<(), TranslateError> {
    match segment {
        Segment::Pointer if index > 1 => Err(TranslateError::syntax(
            file,
            line,
            format!("pointer index {index} out of range (0..=1)"),
        )),
        Segment::Temp if index > 7 => Err(TranslateError::syntax(
            file,
            line,
            format!("temp index {index} out of range (0..=7)"),
        )),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_arithmetic() {
        let cmds = parse_lines("t.vm", "add\nsub\nneg\n").unwrap();
        assert_eq!(
            cmds,
            vec![
                (1, Command::Arithmetic(ArithOp::Add)),
                (2, Command::Arithmetic(ArithOp::Sub)),
                (3, Command::Arithmetic(ArithOp::Neg)),
            ]
        );
    }

    #[test]
    fn strips_comments_and_blanks() {
        let cmds = parse_lines("t.vm", "// header\n\npush constant 7 // seven\n").unwrap();
        assert_eq!(cmds, vec![(3, Command::Push(Segment::Constant, 7))]);
    }

    #[test]
    fn rejects_pop_constant() {
        let err = parse_lines("t.vm", "pop constant 0\n").unwrap_err();
        assert!(err.to_string().contains("pop constant is illegal"));
    }

    #[test]
    fn rejects_out_of_range_pointer() {
        let err = parse_lines("t.vm", "push pointer 2\n").unwrap_err();
        assert!(err.to_string().contains("pointer index 2"));
    }

    #[test]
    fn rejects_out_of_range_temp() {
        let err = parse_lines("t.vm", "pop temp 8\n").unwrap_err();
        assert!(err.to_string().contains("temp index 8"));
    }

    #[test]
    fn rejects_unknown_segment() {
        let err = parse_lines("t.vm", "push weird 0\n").unwrap_err();
        assert!(err.to_string().contains("unknown segment"));
    }

    #[test]
    fn reports_line_number() {
        let err = parse_lines("t.vm", "add\nbogus\n").unwrap_err();
        assert!(err.to_string().starts_with("t.vm:2:"));
    }

    #[test]
    fn parses_function_call_return() {
        let cmds = parse_lines("t.vm", "function Foo.bar 2\ncall Foo.bar 2\nreturn\n").unwrap();
        assert_eq!(
            cmds,
            vec![
                (1, Command::Function("Foo.bar".to_string(), 2)),
                (2, Command::Call("Foo.bar".to_string(), 2)),
                (3, Command::Return),
            ]
        );
    }
}
