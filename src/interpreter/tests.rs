//! Unit tests for the interpreter module.
//!
//! Covers operators and their errors, scoping, closures, loop control,
//! collections, classes with inheritance and the builtins.

use std::{cell::RefCell, rc::Rc};

use pretty_assertions::assert_eq;

use super::{interpreter::Interpreter, stdlib::builtins_with_output};
use crate::{
    lexer::lexer::tokenize,
    parser::parser::parse,
    runtime::{error::RuntimeError, object::Object},
};

fn run_with_output(source: &str) -> (Object, String) {
    let output = Rc::new(RefCell::new(Vec::<u8>::new()));
    let interpreter = Interpreter::new(&builtins_with_output(output.clone()));
    let program = parse(tokenize(source).unwrap()).unwrap();

    let result = interpreter.run(&program);
    let text = String::from_utf8(output.borrow().clone()).unwrap();
    (result, text)
}

fn run(source: &str) -> Object {
    run_with_output(source).0
}

fn error(source: &str) -> RuntimeError {
    match run(source) {
        Object::Error(error) => error,
        other => panic!("expected an error, got {}", other.inspect()),
    }
}

fn string(value: &str) -> Object {
    Object::String(value.to_string())
}

#[test]
fn test_eval_arithmetic() {
    assert_eq!(run("1 + 2 * 3;"), Object::Integer(7));
    assert_eq!(run("(1 + 2) * 3;"), Object::Integer(9));
    assert_eq!(run("7 / 2;"), Object::Integer(3));
    assert_eq!(run("7 % 3;"), Object::Integer(1));
    assert_eq!(run("-5 + 2;"), Object::Integer(-3));
    assert_eq!(run("10 - 2 - 3;"), Object::Integer(5));
}

#[test]
fn test_eval_arithmetic_errors() {
    assert_eq!(error("1 / 0;"), RuntimeError::division_by_zero());
    assert_eq!(error("1 % 0;"), RuntimeError::modulo_by_zero());
    assert_eq!(error("9223372036854775807 + 1;"), RuntimeError::overflow());
    assert_eq!(error("1 / 0;").category(), "ARITHMETIC_ERROR");
}

#[test]
fn test_eval_comparison_and_equality() {
    assert_eq!(run("1 < 2;"), Object::Boolean(true));
    assert_eq!(run("2 <= 1;"), Object::Boolean(false));
    assert_eq!(run("1 == 1;"), Object::Boolean(true));
    assert_eq!(run("1 != 1;"), Object::Boolean(false));
    assert_eq!(run("\"a\" < \"b\";"), Object::Boolean(true));
    assert_eq!(run("null == null;"), Object::Boolean(true));
    assert_eq!(run("1 == \"1\";"), Object::Boolean(false));
    assert_eq!(run("[1, [2]] == [1, [2]];"), Object::Boolean(true));
}

#[test]
fn test_eval_strings() {
    assert_eq!(run("\"foo\" + \"bar\";"), string("foobar"));
    assert_eq!(
        error("1 + \"a\";").message(),
        "Unsupported operand types for +: INTEGER and STRING"
    );
    assert_eq!(error("\"a\" - \"b\";").category(), "TYPE_ERROR");
    assert_eq!(error("-\"a\";").category(), "TYPE_ERROR");
}

#[test]
fn test_eval_logical_operators_short_circuit() {
    let source = "
        let called = false;
        fn side() { called = true; return true; }
        false && side();
        true || side();
        called;
    ";
    assert_eq!(run(source), Object::Boolean(false));

    assert_eq!(run("1 && \"x\";"), Object::Boolean(true));
    assert_eq!(run("0 || \"\";"), Object::Boolean(false));
    assert_eq!(run("!0;"), Object::Boolean(true));
    assert_eq!(run("![];"), Object::Boolean(true));
}

#[test]
fn test_eval_conditionals_use_truthiness() {
    assert_eq!(run("if 0 { 1; } else { 2; }"), Object::Integer(2));
    assert_eq!(run("if \"x\" { 1; } else { 2; }"), Object::Integer(1));
    assert_eq!(run("if null { 1; }"), Object::Null);
    assert_eq!(
        run("let x = 5; if x < 0 { \"neg\"; } else if x == 0 { \"zero\"; } else { \"pos\"; }"),
        string("pos")
    );
}

#[test]
fn test_eval_identifiers() {
    assert_eq!(run("let x = 5; x;"), Object::Integer(5));
    assert_eq!(run("let x = 5;"), Object::Null);
    assert_eq!(error("y;"), RuntimeError::identifier_not_found("y"));
    assert_eq!(error("y = 1;"), RuntimeError::identifier_not_found("y"));
    assert_eq!(run("let a = 1; let b = 2; a = b = 3; a + b;"), Object::Integer(6));
}

#[test]
fn test_eval_block_scope() {
    assert_eq!(
        error("{ let inner = 1; } inner;"),
        RuntimeError::identifier_not_found("inner")
    );
    assert_eq!(run("let x = 1; { x = 2; } x;"), Object::Integer(2));
    assert_eq!(run("let x = 1; { let x = 2; } x;"), Object::Integer(1));
    assert_eq!(
        error("if true { let t = 1; } t;"),
        RuntimeError::identifier_not_found("t")
    );
}

#[test]
fn test_eval_functions_and_recursion() {
    let source = "
        fn fib(n) { if n < 2 { return n; } return fib(n - 1) + fib(n - 2); }
        fib(15);
    ";
    assert_eq!(run(source), Object::Integer(610));

    assert_eq!(run("fn nothing() { 1; } nothing();"), Object::Null);
    assert_eq!(run("let add = fn(a, b) { return a + b; }; add(2, 3);"), Object::Integer(5));
    assert_eq!(
        error("fn f(a) { return a; } f(1, 2);").message(),
        "Function 'f' expects 1 argument(s), got 2"
    );
    assert_eq!(error("1(2);").message(), "INTEGER is not callable");
}

#[test]
fn test_eval_closures_observe_mutation() {
    let source = "
        fn make_counter() {
            let count = 0;
            return fn() { count += 1; return count; };
        }
        let counter = make_counter();
        counter();
        counter();
        counter();
    ";
    assert_eq!(run(source), Object::Integer(3));

    assert_eq!(
        run("let x = 1; let f = fn() { return x; }; x = 5; f();"),
        Object::Integer(5)
    );
}

#[test]
fn test_eval_while_with_break_and_continue() {
    let source = "
        let i = 0;
        let sum = 0;
        while true {
            i += 1;
            if i > 9 { break; }
            if i % 2 == 0 { continue; }
            sum += i;
        }
        sum;
    ";
    assert_eq!(run(source), Object::Integer(25));
}

#[test]
fn test_eval_for_loop() {
    assert_eq!(
        run("let total = 0; for (let i = 0; i < 5; i += 1) { total += i; } total;"),
        Object::Integer(10)
    );
    assert_eq!(
        error("for (let i = 0; i < 1; i += 1) { } i;"),
        RuntimeError::identifier_not_found("i")
    );

    let source = "
        let found = -1;
        for (let i = 0; i < 100; i += 1) {
            if i * i > 50 { found = i; break; }
        }
        found;
    ";
    assert_eq!(run(source), Object::Integer(8));

    // `continue` still runs the update clause
    let source = "
        let evens = 0;
        for (let i = 0; i < 10; i += 1) {
            if i % 2 == 1 { continue; }
            evens += 1;
        }
        evens;
    ";
    assert_eq!(run(source), Object::Integer(5));
}

#[test]
fn test_eval_loop_bodies_get_fresh_scopes() {
    let source = "
        let fs = [];
        for (let i = 0; i < 3; i += 1) {
            let j = i * 10;
            push(fs, fn() { return j; });
        }
        fs[0]() + fs[1]() + fs[2]();
    ";
    assert_eq!(run(source), Object::Integer(30));
}

#[test]
fn test_eval_return_unwinds_loops() {
    let source = "
        fn first_over(xs, n) {
            for (let i = 0; i < len(xs); i += 1) {
                while true { if xs[i] > n { return xs[i]; } break; }
            }
            return null;
        }
        [first_over([1, 5, 9, 12], 6), first_over([1], 6)];
    ";
    assert_eq!(run(source).inspect(), "[9, null]");

    assert_eq!(run("return 5; 6;"), Object::Integer(5));
}

#[test]
fn test_eval_arrays() {
    assert_eq!(run("let xs = [1, 2, 3]; xs[1];"), Object::Integer(2));
    assert_eq!(run("let xs = [1, 2, 3]; xs[0] = 9; xs;").inspect(), "[9, 2, 3]");
    assert_eq!(error("[1, 2][2];"), RuntimeError::index_out_of_range(2, 2));
    assert_eq!(error("[1, 2][-1];"), RuntimeError::index_out_of_range(-1, 2));
    assert_eq!(error("let xs = []; xs[0] = 1;").category(), "INDEX_ERROR");
    assert_eq!(error("let xs = [1]; xs[-1] = 1;"), RuntimeError::index_out_of_range(-1, 1));
    assert_eq!(error("[1][\"a\"];").category(), "TYPE_ERROR");

    // Arrays are shared, not copied, on assignment
    assert_eq!(run("let a = [1]; let b = a; b[0] = 2; a[0];"), Object::Integer(2));

    assert_eq!(run("let a = [1]; push(a, a); str(a);"), string("[1, [...]]"));
    assert_eq!(run("let a = [1]; push(a, a); a == a[1];"), Object::Boolean(true));
}

#[test]
fn test_eval_hashes() {
    assert_eq!(
        run("let h = {\"a\": 1}; h[\"b\"] = 2; h[\"a\"] + h[\"b\"];"),
        Object::Integer(3)
    );
    assert_eq!(run("let h = {\"a\": 1}; h[\"zzz\"];"), Object::Null);
    assert_eq!(
        run("let h = {\"b\": 2, \"a\": \"x\"}; h;").inspect(),
        "{\"a\": \"x\", \"b\": 2}"
    );
    assert_eq!(
        error("let h = {1: 2};").message(),
        "Hash keys must be STRING, got INTEGER"
    );
}

const ANIMALS: &str = "
    class Animal {
        fn init(name) { this.name = name; }
        fn speak() { return this.name + \" makes a sound\"; }
        fn describe() { return \"animal \" + this.name; }
    }
    class Dog extends Animal {
        fn speak() { return super.speak() + \" (woof)\"; }
    }
    class Puppy extends Dog {
        fn speak() { return super.speak() + \"!\"; }
    }
";

#[test]
fn test_eval_classes_and_inheritance() {
    assert_eq!(
        run(&format!("{} Animal(\"Cat\").speak();", ANIMALS)),
        string("Cat makes a sound")
    );
    assert_eq!(
        run(&format!("{} Dog(\"Rex\").speak();", ANIMALS)),
        string("Rex makes a sound (woof)")
    );
    assert_eq!(
        run(&format!("{} Puppy(\"Bit\").speak();", ANIMALS)),
        string("Bit makes a sound (woof)!")
    );
    assert_eq!(
        run(&format!("{} Puppy(\"Bit\").describe();", ANIMALS)),
        string("animal Bit")
    );
}

#[test]
fn test_eval_instance_fields() {
    let source = format!(
        "{} let d = Dog(\"Rex\"); d.name = \"Max\"; let speak = d.speak; d.age = 3; [speak(), d.age];",
        ANIMALS
    );
    assert_eq!(run(&source).inspect(), "[\"Max makes a sound (woof)\", 3]");

    assert_eq!(
        run(&format!("{} let d = Dog(\"Rex\"); d.speak = 1; d.speak;", ANIMALS)),
        Object::Integer(1)
    );
    assert_eq!(
        error(&format!("{} Dog(\"Rex\").fly();", ANIMALS)),
        RuntimeError::undefined_property("fly")
    );
    assert_eq!(error("1.x;").category(), "TYPE_ERROR");
}

#[test]
fn test_eval_class_construction_errors() {
    assert_eq!(error("class A { } A(1);").category(), "TYPE_ERROR");
    assert_eq!(error("let x = 1; class A extends x { }").category(), "TYPE_ERROR");
    assert_eq!(error("class A extends Missing { }"), RuntimeError::identifier_not_found("Missing"));
    assert_eq!(run("class A { } type(A());"), string("INSTANCE"));
}

#[test]
fn test_eval_context_errors() {
    assert_eq!(error("this;"), RuntimeError::this_outside_instance());
    assert_eq!(error("fn f() { return this; } f();"), RuntimeError::this_outside_instance());
    assert_eq!(error("fn f() { return super.x; } f();"), RuntimeError::super_outside_method());
    assert_eq!(
        error("class A { fn m() { return super.m(); } } A().m();"),
        RuntimeError::super_without_parent("A")
    );
    assert_eq!(error("this;").category(), "CONTEXT_ERROR");
}

#[test]
fn test_eval_super_does_not_leak_into_nested_classes() {
    let source = "
        class A { fn m() { return \"A.m\"; } }
        class C extends A {
            fn make() {
                class B { fn m() { return super.m(); } }
                return B().m();
            }
            fn direct() { return super.m(); }
        }
    ";

    assert_eq!(
        error(&format!("{} C().make();", source)),
        RuntimeError::super_without_parent("B")
    );
    assert_eq!(run(&format!("{} C().direct();", source)), string("A.m"));
}

#[test]
fn test_eval_stops_at_first_error() {
    let output = Rc::new(RefCell::new(Vec::<u8>::new()));
    let interpreter = Interpreter::new(&builtins_with_output(output.clone()));
    let program = parse(tokenize("let x = 1; x = 1 / 0; x = 99;").unwrap()).unwrap();

    assert_eq!(interpreter.run(&program), Object::Error(RuntimeError::division_by_zero()));
    assert_eq!(interpreter.globals().borrow().get("x"), Ok(Object::Integer(1)));
}

#[test]
fn test_globals_persist_between_runs() {
    let output = Rc::new(RefCell::new(Vec::<u8>::new()));
    let interpreter = Interpreter::new(&builtins_with_output(output.clone()));

    interpreter.run(&parse(tokenize("fn double(x) { return x * 2; }").unwrap()).unwrap());
    let result = interpreter.run(&parse(tokenize("double(21);").unwrap()).unwrap());

    assert_eq!(result, Object::Integer(42));
}

#[test]
fn test_builtin_puts_writes_output() {
    let (result, output) = run_with_output("puts(1, \"a\", [1, \"b\"]); puts(); puts({\"k\": null});");

    assert_eq!(result, Object::Null);
    assert_eq!(output, "1 a [1, \"b\"]\n\n{\"k\": null}\n");
}

#[test]
fn test_builtin_collections() {
    assert_eq!(run("len(\"héllo\");"), Object::Integer(5));
    assert_eq!(run("len([1, 2]);"), Object::Integer(2));
    assert_eq!(run("len({\"a\": 1});"), Object::Integer(1));
    assert_eq!(run("let a = []; push(a, 1); push(a, 2); a;").inspect(), "[1, 2]");
    assert_eq!(run("insert([1, 3], 1, 2);").inspect(), "[1, 2, 3]");
    assert_eq!(run("let a = [1, 2, 1]; remove(a, 1); a;").inspect(), "[2, 1]");
    assert_eq!(run("remove([1], 5);"), Object::Boolean(false));
    assert_eq!(run("let a = [1, 2, 3]; [remove_at(a, 0), a];").inspect(), "[1, [2, 3]]");
    assert_eq!(run("let a = [1]; clear(a); len(a);"), Object::Integer(0));
    assert_eq!(run("keys({\"b\": 1, \"a\": 2});").inspect(), "[\"a\", \"b\"]");
    assert_eq!(run("has_key({\"a\": 1}, \"a\");"), Object::Boolean(true));
    assert_eq!(run("let h = {\"a\": 1}; [delete(h, \"a\"), delete(h, \"a\")];").inspect(), "[true, false]");
    assert_eq!(run("let h = {\"a\": 1}; remove(h, \"a\");"), Object::Integer(1));
    assert_eq!(error("remove({}, \"a\");"), RuntimeError::key_not_found("a"));
    assert_eq!(error("remove_at([], 0);").category(), "INDEX_ERROR");
}

#[test]
fn test_builtin_conversions() {
    assert_eq!(run("type(1);"), string("INTEGER"));
    assert_eq!(run("type(\"s\");"), string("STRING"));
    assert_eq!(run("type(len);"), string("BUILTIN"));
    assert_eq!(run("type(fn() { });"), string("FUNCTION"));
    assert_eq!(run("str([1, \"a\"]);"), string("[1, \"a\"]"));
    assert_eq!(run("str(12) + \"!\";"), string("12!"));
}

#[test]
fn test_builtin_argument_errors() {
    assert_eq!(
        error("len();"),
        RuntimeError::custom("len() takes 1 argument(s), got 0")
    );
    assert_eq!(error("len(1);").message(), "len() expects STRING, ARRAY or HASH, got INTEGER");
    assert_eq!(error("push(1, 2);").category(), "TYPE_ERROR");
}
