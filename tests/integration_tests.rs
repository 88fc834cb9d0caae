//! Integration tests for end-to-end evaluation.
//!
//! These tests verify that the complete pipeline works correctly from source
//! code through tokenization, parsing and interpretation, including the
//! diagnostics reported when a stage fails.

use std::{cell::RefCell, rc::Rc};

use pretty_assertions::assert_eq;
use quill::{
    interpreter::{interpreter::Interpreter, stdlib::builtins_with_output},
    lexer::lexer::tokenize,
    parser::parser::{parse, Parser},
    runtime::{builtins::BuiltinRegistry, error::RuntimeError, object::Object},
};

/// Runs `source`, returning the final value and everything `puts` printed.
fn evaluate(source: &str) -> (Object, String) {
    let output = Rc::new(RefCell::new(Vec::<u8>::new()));
    let interpreter = Interpreter::new(&builtins_with_output(output.clone()));

    let tokens = tokenize(source).expect("source should tokenize");
    let program = parse(tokens).expect("source should parse");
    let result = interpreter.run(&program);

    let printed = String::from_utf8(output.borrow().clone()).unwrap();
    (result, printed)
}

#[test]
fn test_run_program_with_output() {
    let source = r#"
        // FizzBuzz up to 15
        for (let i = 1; i <= 15; i += 1) {
            if i % 15 == 0 {
                puts("FizzBuzz");
            } else if i % 3 == 0 {
                puts("Fizz");
            } else if i % 5 == 0 {
                puts("Buzz");
            } else {
                puts(i);
            }
        }
    "#;

    let (result, printed) = evaluate(source);
    assert_eq!(result, Object::Null);
    assert_eq!(
        printed.lines().collect::<Vec<_>>(),
        vec![
            "1", "2", "Fizz", "4", "Buzz", "Fizz", "7", "8", "Fizz", "Buzz", "11", "Fizz", "13", "14",
            "FizzBuzz"
        ]
    );
}

#[test]
fn test_closures_share_captured_state() {
    let source = r#"
        fn make_account(balance) {
            let deposit = fn(amount) { balance += amount; return balance; };
            let read = fn() { return balance; };
            return {"deposit": deposit, "read": read};
        }

        let account = make_account(10);
        account["deposit"](5);
        account["deposit"](20);
        account["read"]();
    "#;

    assert_eq!(evaluate(source).0, Object::Integer(35));
}

#[test]
fn test_block_scopes_do_not_leak() {
    let source = r#"
        let x = "outer";
        {
            let x = "inner";
            puts(x);
            let only_here = 1;
        }
        puts(x);
        only_here;
    "#;

    let (result, printed) = evaluate(source);
    assert_eq!(result, Object::Error(RuntimeError::identifier_not_found("only_here")));
    assert_eq!(printed, "inner\nouter\n");
}

#[test]
fn test_classes_end_to_end() {
    let source = r#"
        class Stack {
            fn init() { this.items = []; }
            fn push(value) { push(this.items, value); return this; }
            fn pop() { return remove_at(this.items, len(this.items) - 1); }
            fn size() { return len(this.items); }
        }

        class CountingStack extends Stack {
            fn init() { super.init(); this.pushes = 0; }
            fn push(value) { this.pushes = this.pushes + 1; return super.push(value); }
        }

        let s = CountingStack();
        s.push(1).push(2).push(3);
        let top = s.pop();
        [top, s.size(), s.pushes, type(s)];
    "#;

    assert_eq!(evaluate(source).0.inspect(), "[3, 2, 3, \"INSTANCE\"]");
}

#[test]
fn test_runtime_error_surfaces_as_error_object() {
    let (result, printed) = evaluate("puts(\"before\"); let x = [1, 2][5]; puts(\"after\");");

    assert_eq!(result, Object::Error(RuntimeError::index_out_of_range(5, 2)));
    assert_eq!(result.inspect(), "INDEX_ERROR: Index 5 out of range for length 2");
    assert_eq!(printed, "before\n");
}

#[test]
fn test_parse_errors_are_collected() {
    let source = "let a = 1;\nlet = 2;\nwhile true { break; }\ncontinue;\nlet b = 3";
    let diagnostics = parse(tokenize(source).unwrap()).unwrap_err();

    let rendered: Vec<String> = diagnostics.iter().map(|d| d.to_string()).collect();
    assert_eq!(
        rendered,
        vec![
            "Parse Error at line 2, column 5: Expected Identifier, got Assignment",
            "Parse Error at line 4, column 1: 'continue' outside of a loop body",
            "Parse Error at line 5, column 10: Expected Semicolon, got EOF",
        ]
    );
}

#[test]
fn test_lex_error_reports_position() {
    let error = tokenize("let x = 1;\nlet y = #;").unwrap_err();

    assert_eq!(error.character, '#');
    assert_eq!(error.to_string(), "Unrecognised character '#' at line 2, column 9");
}

#[test]
fn test_custom_builtin_registry() {
    let mut builtins = BuiltinRegistry::new();
    builtins.register("twice", "twice(x): double an integer", |args| match args {
        [Object::Integer(x)] => Ok(Object::Integer(x * 2)),
        _ => Err(RuntimeError::custom("twice() takes one integer")),
    });

    let interpreter = Interpreter::new(&builtins);
    let program = Parser::new().parse(tokenize("twice(21);").unwrap()).unwrap();
    assert_eq!(interpreter.run(&program), Object::Integer(42));

    // Only the registered builtins exist
    let program = parse(tokenize("len([]);").unwrap()).unwrap();
    assert_eq!(
        interpreter.run(&program),
        Object::Error(RuntimeError::identifier_not_found("len"))
    );
}

#[test]
fn test_ast_round_trips_through_display() {
    let source = "let f = fn(x) { return x * (x + 1); }; f(3);";
    let program = parse(tokenize(source).unwrap()).unwrap();

    assert_eq!(
        program.to_string(),
        "let f = fn(x) { return (x * (x + 1)); };\nf(3);"
    );

    // The printed form parses back to the same tree
    let reparsed = parse(tokenize(&program.to_string()).unwrap()).unwrap();
    assert_eq!(reparsed, program);
}
