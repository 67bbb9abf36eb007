//! Recursive-descent Jack parser + direct VM emission (§4.6)
//!
//! Method-for-method mirror of `CompilationEngine.py`: no materialized
//! AST, VM commands are written as each grammar rule is recognized. The
//! token stream is tokenized up front (batch, like the VM translator's
//! parser) and consumed through a simple cursor rather than the
//! original's stateful `current_token`/`next_token` properties, which
//! reads more naturally against Rust's `Option`/`match`.

use crate::error::CompileError;
use crate::symbol_table::{Kind, SymbolTable};
use crate::tokenizer::{self, Keyword, Token};
use crate::vm_writer::VmWriter;

pub struct CompilationEngine<'a> {
    file: &'a str,
    tokens: Vec<(Token, usize)>,
    pos: usize,
    symbols: SymbolTable,
    writer: VmWriter,
    class_name: String,
    current_subroutine_kind: Option<Keyword>,
    current_return_type: Option<String>,
    label_counter: usize,
}

/// Compiles one Jack source file to VM text.
///
/// # Errors
/// Returns [`CompileError::Syntax`] on the first lexical or grammatical
/// failure, or [`CompileError::Semantic`] on an undefined name, a
/// constructor that doesn't return `this`, or a method call resolved
/// against a non-object type, all with the offending line number.
pub fn compile(file: &str, source: &str) -> Result<String, CompileError> {
    let tokens = tokenizer::tokenize(file, source)?;
    let mut engine = CompilationEngine {
        file,
        tokens,
        pos: 0,
        symbols: SymbolTable::new(),
        writer: VmWriter::new(),
        class_name: String::new(),
        current_subroutine_kind: None,
        current_return_type: None,
        label_counter: 0,
    };
    engine.compile_class()?;
    Ok(engine.writer.into_output())
}

fn describe_token(tok: &Token) -> String {
    match tok {
        Token::Keyword(k) => format!("keyword \"{}\"", k.as_str()),
        Token::Symbol(c) => format!("symbol \"{c}\""),
        Token::IntConst(v) => format!("integer {v}"),
        Token::StringConst(s) => format!("string \"{s}\""),
        Token::Identifier(s) => format!("identifier \"{s}\""),
    }
}

fn is_primitive_type(type_name: &str) -> bool {
    matches!(type_name, "int" | "char" | "boolean")
}

impl<'a> CompilationEngine<'a> {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|(t, _)| t)
    }

    fn peek_symbol(&self, c: char) -> bool {
        matches!(self.peek(), Some(Token::Symbol(s)) if *s == c)
    }

    fn peek_keyword_is(&self, kw: Keyword) -> bool {
        matches!(self.peek(), Some(Token::Keyword(k)) if *k == kw)
    }

    fn peek_keyword_in(&self, kws: &[Keyword]) -> bool {
        matches!(self.peek(), Some(Token::Keyword(k)) if kws.contains(k))
    }

    fn current_line(&self) -> usize {
        self.tokens
            .get(self.pos)
            .or_else(|| self.tokens.last())
            .map_or(1, |(_, l)| *l)
    }

    fn advance(&mut self) -> Result<(Token, usize), CompileError> {
        if self.pos >= self.tokens.len() {
            return Err(CompileError::syntax(
                self.file,
                self.current_line(),
                "unexpected end of file",
            ));
        }
        let item = self.tokens[self.pos].clone();
        self.pos += 1;
        Ok(item)
    }

    fn unexpected(&self, line: usize, expected: &str, got: &Token) -> CompileError {
        CompileError::syntax(
            self.file,
            line,
            format!("expected {expected} but got {}", describe_token(got)),
        )
    }

    fn expect_symbol(&mut self, c: char) -> Result<usize, CompileError> {
        let (tok, line) = self.advance()?;
        match tok {
            Token::Symbol(s) if s == c => Ok(line),
            other => Err(self.unexpected(line, &format!("symbol \"{c}\""), &other)),
        }
    }

    fn expect_keyword(&mut self, kw: Keyword) -> Result<usize, CompileError> {
        let (tok, line) = self.advance()?;
        match tok {
            Token::Keyword(k) if k == kw => Ok(line),
            other => Err(self.unexpected(line, &format!("keyword \"{}\"", kw.as_str()), &other)),
        }
    }

    fn expect_identifier(&mut self) -> Result<(String, usize), CompileError> {
        let (tok, line) = self.advance()?;
        match tok {
            Token::Identifier(name) => Ok((name, line)),
            other => Err(self.unexpected(line, "an identifier", &other)),
        }
    }

    /// `int` | `char` | `boolean` | a class-name identifier.
    fn expect_type(&mut self) -> Result<String, CompileError> {
        let (tok, line) = self.advance()?;
        match tok {
            Token::Keyword(Keyword::Int) => Ok("int".to_string()),
            Token::Keyword(Keyword::Char) => Ok("char".to_string()),
            Token::Keyword(Keyword::Boolean) => Ok("boolean".to_string()),
            Token::Identifier(name) => Ok(name),
            other => Err(self.unexpected(line, "a type", &other)),
        }
    }

    fn next_label_id(&mut self) -> usize {
        let id = self.label_counter;
        self.label_counter += 1;
        id
    }

    //
    // structure compilation
    //

    fn compile_class(&mut self) -> Result<(), CompileError> {
        self.expect_keyword(Keyword::Class)?;
        let (name, _) = self.expect_identifier()?;
        self.class_name = name;
        self.expect_symbol('{')?;

        while self.peek_keyword_in(&[Keyword::Static, Keyword::Field]) {
            self.compile_class_var_dec()?;
        }
        while self.peek_keyword_in(&[Keyword::Constructor, Keyword::Function, Keyword::Method]) {
            self.compile_subroutine()?;
        }

        self.expect_symbol('}')?;
        if self.pos != self.tokens.len() {
            let line = self.current_line();
            return Err(CompileError::syntax(
                self.file,
                line,
                "unexpected tokens after the class's closing '}'",
            ));
        }
        Ok(())
    }

    fn compile_class_var_dec(&mut self) -> Result<(), CompileError> {
        let (tok, line) = self.advance()?;
        let kind = match tok {
            Token::Keyword(Keyword::Static) => Kind::Static,
            Token::Keyword(Keyword::Field) => Kind::Field,
            other => return Err(self.unexpected(line, "\"static\" or \"field\"", &other)),
        };
        self.compile_var_dec_list(kind)
    }

    /// Shared `type name (',' name)* ';'` tail for class-var, parameter,
    /// and local-var declarations.
    fn compile_var_dec_list(&mut self, kind: Kind) -> Result<(), CompileError> {
        let type_name = self.expect_type()?;
        let (name, _) = self.expect_identifier()?;
        self.symbols.define(&name, &type_name, kind);
        while self.peek_symbol(',') {
            self.advance()?;
            let (name, _) = self.expect_identifier()?;
            self.symbols.define(&name, &type_name, kind);
        }
        self.expect_symbol(';')?;
        Ok(())
    }

    fn compile_subroutine(&mut self) -> Result<(), CompileError> {
        self.symbols.start_subroutine();
        let (tok, line) = self.advance()?;
        let sub_kind = match tok {
            Token::Keyword(k @ (Keyword::Constructor | Keyword::Function | Keyword::Method)) => k,
            other => {
                return Err(self.unexpected(line, "\"constructor\", \"function\" or \"method\"", &other))
            }
        };
        self.current_subroutine_kind = Some(sub_kind);

        if sub_kind == Keyword::Method {
            let class_name = self.class_name.clone();
            self.symbols.define("this", &class_name, Kind::Argument);
        }

        let (return_type, return_line) = self.compile_return_type()?;
        if sub_kind == Keyword::Constructor && return_type != self.class_name {
            return Err(CompileError::semantic(
                self.file,
                return_line,
                "constructor must declare its own class as the return type",
            ));
        }
        self.current_return_type = Some(return_type);

        let (sub_name, _) = self.expect_identifier()?;
        self.expect_symbol('(')?;
        self.compile_parameter_list()?;
        self.expect_symbol(')')?;
        self.compile_subroutine_body(sub_kind, &sub_name)?;
        Ok(())
    }

    fn compile_return_type(&mut self) -> Result<(String, usize), CompileError> {
        let (tok, line) = self.advance()?;
        let name = match tok {
            Token::Keyword(Keyword::Void) => "void".to_string(),
            Token::Keyword(Keyword::Int) => "int".to_string(),
            Token::Keyword(Keyword::Char) => "char".to_string(),
            Token::Keyword(Keyword::Boolean) => "boolean".to_string(),
            Token::Identifier(name) => name,
            other => return Err(self.unexpected(line, "\"void\" or a type", &other)),
        };
        Ok((name, line))
    }

    fn compile_parameter_list(&mut self) -> Result<(), CompileError> {
        if self.peek_symbol(')') {
            return Ok(());
        }
        let type_name = self.expect_type()?;
        let (name, _) = self.expect_identifier()?;
        self.symbols.define(&name, &type_name, Kind::Argument);
        while self.peek_symbol(',') {
            self.advance()?;
            let type_name = self.expect_type()?;
            let (name, _) = self.expect_identifier()?;
            self.symbols.define(&name, &type_name, Kind::Argument);
        }
        Ok(())
    }

    fn compile_subroutine_body(&mut self, sub_kind: Keyword, sub_name: &str) -> Result<(), CompileError> {
        self.expect_symbol('{')?;
        while self.peek_keyword_is(Keyword::Var) {
            self.compile_var_dec()?;
        }

        let function_name = format!("{}.{}", self.class_name, sub_name);
        let num_locals = self.symbols.var_count(Kind::Var);
        self.writer.write_function(&function_name, num_locals);

        match sub_kind {
            Keyword::Constructor => {
                let num_fields = self.symbols.var_count(Kind::Field);
                self.writer.write_push("constant", num_fields);
                self.writer.write_call("Memory.alloc", 1);
                self.writer.write_pop("pointer", 0);
            }
            Keyword::Method => {
                self.writer.write_push("argument", 0);
                self.writer.write_pop("pointer", 0);
            }
            Keyword::Function => {}
            _ => unreachable!("compile_subroutine only passes constructor/function/method"),
        }

        self.compile_statements()?;
        self.expect_symbol('}')?;
        Ok(())
    }

    fn compile_var_dec(&mut self) -> Result<(), CompileError> {
        self.expect_keyword(Keyword::Var)?;
        self.compile_var_dec_list(Kind::Var)
    }

    //
    // statement compilation
    //

    fn compile_statements(&mut self) -> Result<(), CompileError> {
        loop {
            match self.peek() {
                Some(Token::Keyword(Keyword::Let)) => self.compile_let()?,
                Some(Token::Keyword(Keyword::If)) => self.compile_if()?,
                Some(Token::Keyword(Keyword::While)) => self.compile_while()?,
                Some(Token::Keyword(Keyword::Do)) => self.compile_do()?,
                Some(Token::Keyword(Keyword::Return)) => self.compile_return()?,
                _ => break,
            }
        }
        Ok(())
    }

    fn compile_do(&mut self) -> Result<(), CompileError> {
        self.expect_keyword(Keyword::Do)?;
        let (name, line) = self.expect_identifier()?;
        self.compile_subroutine_call(name, line)?;
        self.writer.write_pop("temp", 0);
        self.expect_symbol(';')?;
        Ok(())
    }

    fn compile_let(&mut self) -> Result<(), CompileError> {
        self.expect_keyword(Keyword::Let)?;
        let (var_name, line) = self.expect_identifier()?;
        let is_array = self.peek_symbol('[');
        if is_array {
            self.compile_array_subscript(&var_name, line)?;
        }
        self.expect_symbol('=')?;
        self.compile_expression()?;
        self.expect_symbol(';')?;

        if is_array {
            // RHS already evaluated; route through temp so committing the
            // destination pointer cannot disturb a `that` read inside RHS.
            self.writer.write_pop("temp", 1);
            self.writer.write_pop("pointer", 1);
            self.writer.write_push("temp", 1);
            self.writer.write_pop("that", 0);
        } else {
            self.assign_variable(&var_name, line)?;
        }
        Ok(())
    }

    fn compile_while(&mut self) -> Result<(), CompileError> {
        self.expect_keyword(Keyword::While)?;
        let id = self.next_label_id();
        let start_label = format!("WHILE_START_{id}");
        let end_label = format!("WHILE_END_{id}");

        self.writer.write_label(&start_label);
        self.expect_symbol('(')?;
        self.compile_expression()?;
        self.expect_symbol(')')?;
        self.writer.write_arithmetic("not");
        self.writer.write_if(&end_label);

        self.expect_symbol('{')?;
        self.compile_statements()?;
        self.expect_symbol('}')?;

        self.writer.write_goto(&start_label);
        self.writer.write_label(&end_label);
        Ok(())
    }

    fn compile_if(&mut self) -> Result<(), CompileError> {
        self.expect_keyword(Keyword::If)?;
        let id = self.next_label_id();
        let else_label = format!("IF_ELSE_{id}");
        let end_label = format!("IF_END_{id}");

        self.expect_symbol('(')?;
        self.compile_expression()?;
        self.expect_symbol(')')?;
        self.writer.write_arithmetic("not");
        self.writer.write_if(&else_label);

        self.expect_symbol('{')?;
        self.compile_statements()?;
        self.expect_symbol('}')?;
        self.writer.write_goto(&end_label);

        self.writer.write_label(&else_label);
        if self.peek_keyword_is(Keyword::Else) {
            self.advance()?;
            self.expect_symbol('{')?;
            self.compile_statements()?;
            self.expect_symbol('}')?;
        }
        self.writer.write_label(&end_label);
        Ok(())
    }

    fn compile_return(&mut self) -> Result<(), CompileError> {
        let line = self.expect_keyword(Keyword::Return)?;
        let sub_kind = self
            .current_subroutine_kind
            .expect("compile_return only runs inside a subroutine body");

        if sub_kind == Keyword::Constructor {
            match self.advance()? {
                (Token::Keyword(Keyword::This), _) => self.writer.write_push("pointer", 0),
                (_, this_line) => {
                    return Err(CompileError::semantic(
                        self.file,
                        this_line,
                        "constructor must return \"this\"",
                    ))
                }
            }
        } else if !self.peek_symbol(';') {
            self.compile_expression()?;
        } else {
            let return_type = self.current_return_type.clone().unwrap_or_default();
            if return_type != "void" {
                return Err(CompileError::semantic(
                    self.file,
                    line,
                    format!("expected a return value of type \"{return_type}\""),
                ));
            }
            self.writer.write_push("constant", 0);
        }

        self.expect_symbol(';')?;
        self.writer.write_return();
        Ok(())
    }

    fn assign_variable(&mut self, name: &str, line: usize) -> Result<(), CompileError> {
        let kind = self.require_defined(name, line)?;
        let index = self.symbols.index_of(name).expect("kind_of just succeeded");
        self.writer.write_pop(kind.segment(), index);
        Ok(())
    }

    fn load_variable(&mut self, name: &str, line: usize) -> Result<(), CompileError> {
        let kind = self.require_defined(name, line)?;
        let index = self.symbols.index_of(name).expect("kind_of just succeeded");
        self.writer.write_push(kind.segment(), index);
        Ok(())
    }

    fn require_defined(&self, name: &str, line: usize) -> Result<Kind, CompileError> {
        self.symbols.kind_of(name).ok_or_else(|| {
            CompileError::semantic(self.file, line, format!("name used before declared: \"{name}\""))
        })
    }

    /// `varName '[' expression ']'`: pushes the subscript, then the
    /// array's base address, then `add`, leaving `base+subscript` on
    /// top of the stack (§4.6).
    fn compile_array_subscript(&mut self, var_name: &str, line: usize) -> Result<(), CompileError> {
        self.expect_symbol('[')?;
        self.compile_expression()?;
        self.expect_symbol(']')?;
        self.load_variable(var_name, line)?;
        self.writer.write_arithmetic("add");
        Ok(())
    }

    //
    // expression compilation
    //

    fn peek_binary_op(&self) -> Option<char> {
        match self.peek() {
            Some(Token::Symbol(c)) if "+-*/&|<>=".contains(*c) => Some(*c),
            _ => None,
        }
    }

    fn compile_expression(&mut self) -> Result<(), CompileError> {
        self.compile_term()?;
        while let Some(op) = self.peek_binary_op() {
            self.advance()?;
            self.compile_term()?;
            self.emit_binary_op(op);
        }
        Ok(())
    }

    fn emit_binary_op(&mut self, op: char) {
        match op {
            '+' => self.writer.write_arithmetic("add"),
            '-' => self.writer.write_arithmetic("sub"),
            '&' => self.writer.write_arithmetic("and"),
            '|' => self.writer.write_arithmetic("or"),
            '<' => self.writer.write_arithmetic("lt"),
            '>' => self.writer.write_arithmetic("gt"),
            '=' => self.writer.write_arithmetic("eq"),
            '*' => self.writer.write_call("Math.multiply", 2),
            '/' => self.writer.write_call("Math.divide", 2),
            _ => unreachable!("peek_binary_op only returns recognized operators"),
        }
    }

    fn compile_term(&mut self) -> Result<(), CompileError> {
        match self.peek() {
            Some(Token::Symbol('(')) => {
                self.advance()?;
                self.compile_expression()?;
                self.expect_symbol(')')?;
                Ok(())
            }
            Some(Token::Symbol('-')) => {
                self.advance()?;
                self.compile_term()?;
                self.writer.write_arithmetic("neg");
                Ok(())
            }
            Some(Token::Symbol('~')) => {
                self.advance()?;
                self.compile_term()?;
                self.writer.write_arithmetic("not");
                Ok(())
            }
            _ => self.compile_atomic_term(),
        }
    }

    fn compile_atomic_term(&mut self) -> Result<(), CompileError> {
        let (tok, line) = self.advance()?;
        match tok {
            Token::IntConst(value) => {
                self.writer.write_push("constant", value);
                Ok(())
            }
            Token::StringConst(text) => {
                self.compile_string_constant(&text);
                Ok(())
            }
            Token::Keyword(Keyword::True) => {
                // true = -1 (all bits set, §4.4 Truth convention / §8
                // Testable property 6's sibling invariant); pushing 1
                // then negating is the correct encoding, unlike the
                // `push constant 0; neg` fallthrough the distilled spec
                // text lifted from the original's KW_THIS/KW_TRUE bug
                // (see DESIGN.md).
                self.writer.write_push("constant", 1);
                self.writer.write_arithmetic("neg");
                Ok(())
            }
            Token::Keyword(Keyword::False | Keyword::Null) => {
                self.writer.write_push("constant", 0);
                Ok(())
            }
            Token::Keyword(Keyword::This) => {
                self.writer.write_push("pointer", 0);
                Ok(())
            }
            Token::Identifier(name) => {
                if self.peek_symbol('[') {
                    self.compile_array_subscript(&name, line)?;
                    self.writer.write_pop("pointer", 1);
                    self.writer.write_push("that", 0);
                    Ok(())
                } else if self.peek_symbol('(') || self.peek_symbol('.') {
                    self.compile_subroutine_call(name, line)
                } else {
                    self.load_variable(&name, line)
                }
            }
            other => Err(self.unexpected(line, "a term", &other)),
        }
    }

    fn compile_string_constant(&mut self, text: &str) {
        #[allow(clippy::cast_possible_truncation)]
        let len = text.chars().count() as u16;
        self.writer.write_push("constant", len);
        self.writer.write_call("String.new", 1);
        for c in text.chars() {
            self.writer.write_push("constant", c as u16);
            self.writer.write_call("String.appendChar", 2);
        }
    }

    /// `subroutineName '(' exprList ')'` or `(class|var) '.' name '(' exprList ')'`.
    /// The first identifier has already been consumed by the caller.
    ///
    /// Resolution (§4.6, §9's ambiguity note): a `name` found in the
    /// symbol table is a variable, so compile a method call on it,
    /// pushing it as the implicit receiver. Otherwise `name` is taken
    /// as a class name and the call is static.
    fn compile_subroutine_call(&mut self, name: String, line: usize) -> Result<(), CompileError> {
        let (full_name, implicit_args) = if self.peek_symbol('.') {
            self.advance()?;
            let (member, _) = self.expect_identifier()?;
            match self.symbols.kind_of(&name) {
                Some(kind) => {
                    let type_name = self.symbols.type_of(&name).unwrap_or_default().to_string();
                    if is_primitive_type(&type_name) {
                        return Err(CompileError::semantic(
                            self.file,
                            line,
                            format!("cannot call a method on non-object type \"{type_name}\""),
                        ));
                    }
                    let index = self.symbols.index_of(&name).expect("kind_of just succeeded");
                    self.writer.write_push(kind.segment(), index);
                    (format!("{type_name}.{member}"), 1)
                }
                None => (format!("{name}.{member}"), 0),
            }
        } else {
            self.writer.write_push("pointer", 0);
            (format!("{}.{name}", self.class_name), 1)
        };

        self.expect_symbol('(')?;
        let explicit_args = self.compile_expression_list()?;
        self.expect_symbol(')')?;
        self.writer.write_call(&full_name, implicit_args + explicit_args);
        Ok(())
    }

    fn compile_expression_list(&mut self) -> Result<u16, CompileError> {
        if self.peek_symbol(')') {
            return Ok(0);
        }
        let mut count: u16 = 1;
        self.compile_expression()?;
        while self.peek_symbol(',') {
            self.advance()?;
            self.compile_expression()?;
            count += 1;
        }
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Scenario S4 from the spec: a constructor's prologue and body.
    #[test]
    fn scenario_s4_point_constructor() {
        let source = "\
class Point {
    field int x, y;
    constructor Point new(int ax, int ay) {
        let x = ax;
        let y = ay;
        return this;
    }
}
";
        let vm = compile("Point.jack", source).unwrap();
        let expected = "\
function Point.new 0
push constant 2
call Memory.alloc 1
pop pointer 0
push argument 0
pop this 0
push argument 1
pop this 1
push pointer 0
return
";
        assert_eq!(vm, expected);
    }

    /// Scenario S5 from the spec: a method call through a local variable.
    #[test]
    fn scenario_s5_method_call_on_variable() {
        let source = "\
class Main {
    function void run() {
        var Point p;
        do p.move(1, 2);
        return;
    }
}
";
        let vm = compile("Main.jack", source).unwrap();
        assert!(vm.contains("push local 0\npush constant 1\npush constant 2\ncall Point.move 3\npop temp 0\n"));
    }

    /// Scenario S6 from the spec: `let a[i] = a[j];` routes the RHS
    /// array read through `that`/`temp`/`pointer` in the order that
    /// protects it from the LHS pointer commit.
    #[test]
    fn scenario_s6_array_write_from_array_read() {
        let source = "\
class Main {
    function void run() {
        var Array a;
        var int i, j;
        let a[i] = a[j];
        return;
    }
}
";
        let vm = compile("Main.jack", source).unwrap();
        // RHS (a[j]) evaluated into that/pointer 1 before the LHS pointer is committed
        assert!(vm.contains("pop pointer 1\npush that 0\npop temp 1\npop pointer 1\npush temp 1\npop that 0"));
    }

    #[test]
    fn true_false_null_this_constants() {
        let source = "\
class Main {
    function boolean run() {
        do Main.sink(true);
        do Main.sink(false);
        do Main.sink(null);
        return true;
    }
}
";
        let vm = compile("Main.jack", source).unwrap();
        // true => push constant 1; neg  (yields -1, per the Truth convention)
        assert!(vm.contains("push constant 1\nneg\ncall Main.sink 1"));
        assert!(vm.contains("push constant 0\ncall Main.sink 1"));
    }

    #[test]
    fn string_literal_emits_new_plus_appendchar_per_character() {
        let source = "\
class Main {
    function void run() {
        do Main.sink(\"ab\");
        return;
    }
}
";
        let vm = compile("Main.jack", source).unwrap();
        let expected_call = "\
push constant 2
call String.new 1
push constant 97
call String.appendChar 2
push constant 98
call String.appendChar 2
call Main.sink 1
";
        assert!(vm.contains(expected_call));
    }

    #[test]
    fn no_operator_precedence_left_to_right() {
        // 1 + 2 * 3 must compile as (1+2)*3, not 1+(2*3).
        let source = "\
class Main {
    function int run() {
        return 1 + 2 * 3;
    }
}
";
        let vm = compile("Main.jack", source).unwrap();
        let expected = "\
function Main.run 0
push constant 1
push constant 2
add
push constant 3
call Math.multiply 2
return
";
        assert_eq!(vm, expected);
    }

    #[test]
    fn if_else_labels_follow_the_spec_template() {
        let source = "\
class Main {
    function void run() {
        if (true) {
            do Main.a();
        } else {
            do Main.b();
        }
        return;
    }
}
";
        let vm = compile("Main.jack", source).unwrap();
        assert!(vm.contains("if-goto IF_ELSE_0"));
        assert!(vm.contains("goto IF_END_0"));
        assert!(vm.contains("label IF_ELSE_0"));
        assert!(vm.contains("label IF_END_0"));
    }

    #[test]
    fn while_loop_labels_follow_the_spec_template() {
        let source = "\
class Main {
    function void run() {
        while (true) {
            do Main.a();
        }
        return;
    }
}
";
        let vm = compile("Main.jack", source).unwrap();
        assert!(vm.contains("label WHILE_START_0"));
        assert!(vm.contains("if-goto WHILE_END_0"));
        assert!(vm.contains("goto WHILE_START_0"));
        assert!(vm.contains("label WHILE_END_0"));
    }

    #[test]
    fn subroutine_local_shadows_class_field() {
        let source = "\
class Main {
    field int x;
    function void run() {
        var int x;
        let x = 5;
        return;
    }
}
";
        let vm = compile("Main.jack", source).unwrap();
        // local x (kind var -> segment local), not the field
        assert!(vm.contains("pop local 0"));
        assert!(!vm.contains("pop this 0"));
    }

    #[test]
    fn undefined_variable_is_a_semantic_error() {
        let source = "\
class Main {
    function void run() {
        let missing = 1;
        return;
    }
}
";
        let err = compile("Main.jack", source).unwrap_err();
        assert!(err.to_string().contains("used before declared"));
    }

    #[test]
    fn constructor_must_return_this() {
        let source = "\
class Point {
    constructor Point new() {
        return;
    }
}
";
        let err = compile("Point.jack", source).unwrap_err();
        assert!(err.to_string().contains("must return"));
    }

    #[test]
    fn static_function_call_has_no_implicit_receiver() {
        let source = "\
class Main {
    function void run() {
        do Math.max(1, 2);
        return;
    }
}
";
        let vm = compile("Main.jack", source).unwrap();
        assert!(vm.contains("push constant 1\npush constant 2\ncall Math.max 2\n"));
    }

    #[test]
    fn bare_call_is_a_method_on_current_class() {
        let source = "\
class Main {
    method void helper() {
        return;
    }
    method void run() {
        do helper();
        return;
    }
}
";
        let vm = compile("Main.jack", source).unwrap();
        assert!(vm.contains("push pointer 0\ncall Main.helper 1"));
    }
}
