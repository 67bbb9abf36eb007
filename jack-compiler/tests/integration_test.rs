use jack_compiler::compile_source;

/// Scenario S4: constructor prologue (`Memory.alloc` sized by field
/// count, `pop pointer 0`) precedes the body, and the implicit `return
/// this` is the bare `push pointer 0; return`.
#[test]
fn scenario_s4_constructor_prologue_and_return_this() {
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
    let vm = compile_source("Point.jack", source).unwrap();
    assert!(vm.starts_with("function Point.new 0\n"));
    assert!(vm.contains("push constant 2\ncall Memory.alloc 1\npop pointer 0\n"));
    assert!(vm.trim_end().ends_with("push pointer 0\nreturn"));
}

/// Scenario S5: calling a method through a variable pushes the
/// variable as the implicit receiver and resolves the callee by the
/// variable's declared type, not its name.
#[test]
fn scenario_s5_method_call_through_a_variable() {
    let source = "\
class Main {
    function void main() {
        var Point p;
        let p = Point.new(1, 2);
        do p.move(3, 4);
        return;
    }
}
";
    let vm = compile_source("Main.jack", source).unwrap();
    assert!(vm.contains("call Point.new 2\npop local 0\n"));
    assert!(vm.contains("push local 0\npush constant 3\npush constant 4\ncall Point.move 3\npop temp 0\n"));
}

/// Scenario S6: `let a[i] = a[j]` must evaluate and stash the RHS
/// before the destination pointer is committed, so a shared `that`
/// segment can't corrupt the read.
#[test]
fn scenario_s6_array_write_with_array_valued_rhs() {
    let source = "\
class Main {
    function void main() {
        var Array a;
        var int i, j;
        let a[i] = a[j];
        return;
    }
}
";
    let vm = compile_source("Main.jack", source).unwrap();
    let write_order = "pop pointer 1\npush that 0\npop temp 1\npop pointer 1\npush temp 1\npop that 0";
    assert!(vm.contains(write_order), "got:\n{vm}");
}

/// Testable property 5: a subroutine-scope local shadows a
/// class-scope field of the same name.
#[test]
fn property_local_shadows_field() {
    let source = "\
class Main {
    field int count;

    function void run() {
        var int count;
        let count = 9;
        return;
    }
}
";
    let vm = compile_source("Main.jack", source).unwrap();
    assert!(vm.contains("pop local 0"));
    assert!(!vm.contains("pop this"));
}

/// Testable property 6: a string literal emits `String.new` sized by
/// character count, then one `String.appendChar` per character.
#[test]
fn property_string_literal_emission() {
    let source = "\
class Main {
    function void run() {
        do Output.printString(\"hi\");
        return;
    }
}
";
    let vm = compile_source("Main.jack", source).unwrap();
    let expected = "\
push constant 2
call String.new 1
push constant 104
call String.appendChar 2
push constant 105
call String.appendChar 2
call Output.printString 1
";
    assert!(vm.contains(expected), "got:\n{vm}");
}

#[test]
fn nested_expressions_compile_left_to_right_without_precedence() {
    let source = "\
class Main {
    function int run() {
        return (1 + 2) * 3;
    }
}
";
    let vm = compile_source("Main.jack", source).unwrap();
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
fn whole_class_with_control_flow_compiles() {
    let source = "\
class Main {
    function int max(int a, int b) {
        if (a > b) {
            return a;
        } else {
            return b;
        }
    }
}
";
    let vm = compile_source("Main.jack", source).unwrap();
    assert!(vm.contains("function Main.max 0"));
    assert!(vm.contains("gt"));
    assert!(vm.contains("if-goto IF_ELSE_0"));
    assert!(vm.contains("label IF_ELSE_0"));
    assert!(vm.contains("label IF_END_0"));
}

#[test]
fn method_on_primitive_typed_variable_is_a_semantic_error() {
    let source = "\
class Main {
    function void run() {
        var int n;
        do n.foo();
        return;
    }
}
";
    let err = compile_source("Main.jack", source).unwrap_err();
    assert!(err.to_string().contains("non-object type"));
}

#[test]
fn undeclared_name_is_a_located_semantic_error() {
    let source = "\
class Main {
    function void run() {
        let ghost = 1;
        return;
    }
}
";
    let err = compile_source("Main.jack", source).unwrap_err();
    let message = err.to_string();
    assert!(message.starts_with("Main.jack:3:"), "got: {message}");
    assert!(message.contains("used before declared"));
}

#[test]
fn constructor_not_returning_this_is_a_semantic_error() {
    let source = "\
class Point {
    constructor Point new() {
        return;
    }
}
";
    let err = compile_source("Point.jack", source).unwrap_err();
    assert!(err.to_string().contains("must return \"this\""));
}

#[test]
fn unterminated_string_is_a_syntax_error_with_line_number() {
    let source = "class Main {\n    function void run() {\n        do f(\"oops);\n    }\n}\n";
    let err = compile_source("Main.jack", source).unwrap_err();
    assert!(err.to_string().starts_with("Main.jack:3:"));
}
