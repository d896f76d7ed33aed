//! Unit tests for the executor.
//!
//! Programs here are run without the analyzer, so the runtime checks
//! that back up static analysis are exercised directly.

use std::rc::Rc;

use rstest::rstest;

use super::executor::{execute, Executor, Slot, Value, STACK_CAPACITY};
use crate::{
    ast::{ast::Module, types::Type},
    errors::errors::Error,
    lexer::lexer::tokenize,
    parser::parser::parse,
};

fn module(source: &str) -> Module {
    let tokens = tokenize(source.to_string(), Some("test.clam".to_string())).unwrap();
    let (_, result) = parse(tokens, Rc::new("test.clam".to_string()));
    result.unwrap()
}

fn run(source: &str) -> Result<i32, Error> {
    let _ = env_logger::builder().is_test(true).try_init();
    execute(&module(source))
}

#[rstest]
#[case("export int main() { return 12345; }", 12345)]
#[case("int foo() { return 1; } export int main() { return foo(); }", 1)]
#[case("export int main() { int a = 1; { int a = 2; return a; } }", 2)]
#[case("int a = 1 + 2 + 3; int b = a + 4; export int main() { return b; }", 10)]
#[case("export int main() { return 7 / 2 + 7 % 3; }", 4)]
#[case("export int main() { return -7 / 2; }", -3)]
#[case("export int main() { return -7 % 3; }", -1)]
#[case("export int main() { return 1 << 4 | 3; }", 19)]
#[case("export int main() { return 0xF0 >> 4 & 0x3; }", 3)]
#[case("export int main() { return 6 ^ 3; }", 5)]
#[case("export int main() { return ~0; }", -1)]
#[case("export int main() { return -8 >> 1; }", -4)]
#[case("export int main() { return 2147483647 + 1; }", i32::MIN)]
#[case("export int main() { int m = -2147483647 - 1; return m / -1; }", i32::MIN)]
#[case("export int main() { return 1 << 33; }", 2)]
#[case("export int main() { return 1 < 2 ? 10 : 20; }", 10)]
#[case("export int main() { return 1 > 2 ? 10 : 20; }", 20)]
#[case("export int main() { if (1 == 1 && !false) return 1; else return 2; }", 1)]
#[case("export int main() { if (true != true || 3 >= 4) return 1; return 2; }", 2)]
#[case("export int main() { int a; bool b; if (b) return 1; return a; }", 0)]
#[case("int sub(int a, int b) { return a - b; } export int main() { return sub(10, 3); }", 7)]
#[case("int fact(int n) { if (n <= 1) return 1; return n * fact(n - 1); } export int main() { return fact(10); }", 3628800)]
#[case("int fib(int n) { if (n < 2) return n; return fib(n - 1) + fib(n - 2); } export int main() { return fib(15); }", 610)]
fn test_run_returns(#[case] source: &str, #[case] expected: i32) {
    assert_eq!(run(source).unwrap(), expected);
}

#[test]
fn test_compound_assignment() {
    let source = "export int main() {
        int a = 5;
        a += 3; a -= 1; a *= 6; a /= 4; a %= 7;
        a |= 8; a &= 12; a ^= 5;
        a++; a++; a--;
        return a;
    }";
    // 5 -> 8 -> 7 -> 42 -> 10 -> 3 -> 11 -> 8 -> 13 -> 14
    assert_eq!(run(source).unwrap(), 14);
}

#[test]
fn test_assignment_writes_through_to_globals() {
    let source = "int counter = 0;
        void bump() { counter += 2; }
        export int main() { bump(); bump(); counter++; return counter; }";
    assert_eq!(run(source).unwrap(), 5);
}

#[test]
fn test_assignment_targets_innermost_binding() {
    let source = "int a = 100;
        export int main() { int a = 1; { a = 5; } return a; }";
    assert_eq!(run(source).unwrap(), 5);
}

#[test]
fn test_callee_cannot_see_caller_locals() {
    let source = "int peek() { return local; }
        export int main() { int local = 3; return peek(); }";
    assert_eq!(
        run(source).unwrap_err().get_error_name(),
        "VariableNotDeclared"
    );
}

#[test]
fn test_parameters_shadow_globals() {
    let source = "int x = 1; int id(int x) { return x; } export int main() { return id(9) + x; }";
    assert_eq!(run(source).unwrap(), 10);
}

#[test]
fn test_arguments_evaluate_right_to_left() {
    let source = "int trace = 0;
        int mark(int digit) { trace = trace * 10 + digit; return digit; }
        int pair(int a, int b) { return a; }
        export int main() { pair(mark(1), mark(2)); return trace; }";
    assert_eq!(run(source).unwrap(), 21);
}

#[rstest]
#[case("false && f()", 0)]
#[case("true || f()", 0)]
#[case("true && f()", 1)]
#[case("false || f()", 1)]
fn test_logical_short_circuit(#[case] condition: &str, #[case] calls: i32) {
    let source = format!(
        "int calls = 0;
        bool f() {{ calls++; return true; }}
        export int main() {{ bool r = {}; return calls; }}",
        condition
    );
    assert_eq!(run(&source).unwrap(), calls);
}

#[test]
fn test_conditional_evaluates_one_branch() {
    let source = "int calls = 0;
        int f() { calls++; return 1; }
        export int main() { int r = true ? 2 : f(); return calls * 10 + r; }";
    assert_eq!(run(source).unwrap(), 2);
}

#[test]
fn test_global_initializer_calls_function() {
    let source = "int twice(int v) { return v * 2; } int g = twice(21); export int main() { return g; }";
    assert_eq!(run(source).unwrap(), 42);
}

#[test]
fn test_runtime_division_by_zero() {
    let error = run("int a = 10; int b = 0; export int main() { return a / b; }").unwrap_err();

    assert_eq!(error.get_error_name(), "DivisionByZero");
    assert_eq!(error.to_string(), "division by zero");
}

#[rstest]
#[case("export int main() { int a = 1; int z = 0; a %= z; return a; }")]
#[case("export int main() { int a = 1; int z = 0; a /= z; return a; }")]
#[case("int z = 0; export int main() { return 5 % z; }")]
fn test_runtime_division_by_zero_variants(#[case] source: &str) {
    assert_eq!(run(source).unwrap_err().get_error_name(), "DivisionByZero");
}

#[rstest]
#[case("int a = 1;", "MainNotFound")]
#[case("int main() { return 0; }", "MainNotExported")]
#[case("export bool main() { return true; }", "MainReturnType")]
#[case("int f(bool b) { if (b) return 1; } export int main() { return f(false); }", "MissingReturn")]
#[case("void f() {} export int main() { return f(); }", "VoidValue")]
#[case("export int main() { return missing(); }", "FunctionNotDeclared")]
#[case("export int main() { return nothing; }", "VariableNotDeclared")]
#[case("int f(int a) { return a; } export int main() { return f(); }", "MissingArguments")]
#[case("int f(int a) { return a; } export int main() { return f(1, 2); }", "UnexpectedArguments")]
#[case("int f(int a) { return a; } export int main() { return f(true); }", "TypeMatchError")]
#[case("export int main() { return true + 1; }", "OperandTypesMismatch")]
fn test_runtime_errors(#[case] source: &str, #[case] expected: &str) {
    assert_eq!(run(source).unwrap_err().get_error_name(), expected);
}

#[test]
fn test_missing_return_only_fails_on_the_taken_path() {
    let source = "int f(bool b) { if (b) return 1; } export int main() { return f(true); }";
    assert_eq!(run(source).unwrap(), 1);
}

#[test]
fn test_void_call_as_statement() {
    let source = "int g = 0; void set(int v) { g = v; return; } export int main() { set(4); true ? set(5) : set(6); return g; }";
    assert_eq!(run(source).unwrap(), 5);
}

#[test]
fn test_stack_is_released_after_run() {
    let module = module(
        "int g = 7; bool h;
        int f(int a) { int b = a; { int c = b; return c; } }
        export int main() { int x = 1; { int y = f(x); } return x; }",
    );
    let mut executor = Executor::new(&module);

    assert_eq!(executor.run().unwrap(), 1);
    assert!(executor.stack().is_empty());
    assert_eq!(
        executor.globals(),
        &[
            Slot {
                name: "g".to_string(),
                value: Value::Int(7),
                level: 0,
            },
            Slot {
                name: "h".to_string(),
                value: Value::Bool(false),
                level: 0,
            },
        ]
    );
}

#[test]
fn test_stack_capacity() {
    let module = module("export int main() { return 0; }");

    assert!(Executor::new(&module).stack_capacity() >= STACK_CAPACITY);
    assert!(Executor::with_capacity(&module, 16).stack_capacity() >= 16);
}

#[test]
fn test_executor_can_run_twice() {
    let module = module("int g = 1; export int main() { g += 1; return g; }");
    let mut executor = Executor::new(&module);

    assert_eq!(executor.run().unwrap(), 2);
    assert_eq!(executor.run().unwrap(), 2);
}

#[test]
fn test_value_defaults() {
    assert_eq!(Value::default_for(Type::Int), Some(Value::Int(0)));
    assert_eq!(Value::default_for(Type::Bool), Some(Value::Bool(false)));
    assert_eq!(Value::default_for(Type::Void), None);
    assert_eq!(Value::Int(-3).to_string(), "-3");
}
