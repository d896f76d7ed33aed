//! Unit tests for the parser module.
//!
//! This module contains tests for parsing the language constructs:
//! - Top-level declarations
//! - Statements and compound assignment
//! - Expression precedence and associativity
//! - Syntax errors

use std::rc::Rc;

use rstest::rstest;

use super::parser::parse;
use crate::{
    ast::{
        ast::{Declaration, Module},
        expressions::{BinaryOp, Expr, ExprKind, LogicalOp, UnaryOp},
        statements::{AssignOp, StmtKind},
        types::Type,
    },
    errors::errors::Error,
    lexer::lexer::tokenize,
};

fn parse_source(source: &str) -> Result<Module, Error> {
    let tokens = tokenize(source.to_string(), Some("test.clam".to_string())).unwrap();
    let (_, result) = parse(tokens, Rc::new("test.clam".to_string()));
    result
}

/// Parses `int x = <expr>;` and returns the initializer.
fn parse_init(expr: &str) -> Expr {
    let module = parse_source(&format!("int x = {};", expr)).unwrap();
    match &module.declarations[0] {
        Declaration::Variable(variable) => variable.init.clone().unwrap(),
        other => panic!("expected variable, found {:?}", other),
    }
}

/// Renders an expression fully parenthesised, for precedence checks.
fn shape(expr: &Expr) -> String {
    match &expr.kind {
        ExprKind::Number(value) => value.to_string(),
        ExprKind::Boolean(value) => value.to_string(),
        ExprKind::Symbol(name) => name.clone(),
        ExprKind::Call { callee, arguments } => format!(
            "{}({})",
            shape(callee),
            arguments.iter().map(shape).collect::<Vec<_>>().join(", ")
        ),
        ExprKind::Unary { operator, operand } => format!("({}{})", operator, shape(operand)),
        ExprKind::Binary {
            left,
            operator,
            right,
        } => format!("({} {} {})", shape(left), operator, shape(right)),
        ExprKind::Logical {
            left,
            operator,
            right,
        } => format!("({} {} {})", shape(left), operator, shape(right)),
        ExprKind::Conditional {
            condition,
            then_expr,
            else_expr,
        } => format!(
            "({} ? {} : {})",
            shape(condition),
            shape(then_expr),
            shape(else_expr)
        ),
    }
}

#[test]
fn test_parse_variable_declaration() {
    let module = parse_source("int x = 42;").unwrap();

    assert_eq!(module.declarations.len(), 1);
    assert!(module.functions.is_empty());
    match &module.declarations[0] {
        Declaration::Variable(variable) => {
            assert_eq!(variable.name, "x");
            assert_eq!(variable.var_type, Type::Int);
            assert!(!variable.exported);
            assert_eq!(variable.init.as_ref().unwrap().kind, ExprKind::Number(42));
        }
        other => panic!("expected variable, found {:?}", other),
    }
}

#[test]
fn test_parse_exported_declaration_without_initializer() {
    let module = parse_source("export bool flag;").unwrap();

    match &module.declarations[0] {
        Declaration::Variable(variable) => {
            assert!(variable.exported);
            assert_eq!(variable.var_type, Type::Bool);
            assert!(variable.init.is_none());
        }
        other => panic!("expected variable, found {:?}", other),
    }
}

#[test]
fn test_parse_function_declaration() {
    let module = parse_source("int add(int a, bool b) { return a; }").unwrap();

    let function = module.find_function("add").unwrap();
    assert_eq!(function.return_type, Type::Int);
    assert_eq!(function.parameters.len(), 2);
    assert_eq!(function.parameters[0].name, "a");
    assert_eq!(function.parameters[1].param_type, Type::Bool);
    assert_eq!(function.body.len(), 1);
    assert!(matches!(function.body[0].kind, StmtKind::Return(Some(_))));
}

#[test]
fn test_module_tracks_function_indices() {
    let module = parse_source("int a; void f() {} int b = 1; export int main() { return 0; }").unwrap();

    assert_eq!(module.declarations.len(), 4);
    assert_eq!(module.functions, vec![1, 3]);
    let names: Vec<&str> = module.functions().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["f", "main"]);
    assert_eq!(module.variables().count(), 2);
}

#[test]
fn test_parse_statements() {
    let module = parse_source(
        "void f() { ; int a = 1; a = 2; a++; a--; f(); { a += 1; } if (true) return; else {} }",
    )
    .unwrap();
    let body = &module.find_function("f").unwrap().body;

    assert!(matches!(body[0].kind, StmtKind::Empty));
    assert!(matches!(body[1].kind, StmtKind::Declaration(Declaration::Variable(_))));
    assert!(matches!(
        body[2].kind,
        StmtKind::Assign {
            operator: AssignOp::Assign,
            ..
        }
    ));
    assert!(matches!(body[3].kind, StmtKind::Increment(_)));
    assert!(matches!(body[4].kind, StmtKind::Decrement(_)));
    assert!(matches!(body[5].kind, StmtKind::Expression(_)));
    assert!(matches!(body[6].kind, StmtKind::Compound(_)));
    match &body[7].kind {
        StmtKind::If {
            then_body,
            else_body,
            ..
        } => {
            assert!(matches!(then_body.kind, StmtKind::Return(None)));
            assert!(else_body.is_some());
        }
        other => panic!("expected if, found {:?}", other),
    }
}

#[rstest]
#[case("+=", AssignOp::Add)]
#[case("-=", AssignOp::Sub)]
#[case("*=", AssignOp::Mul)]
#[case("/=", AssignOp::Div)]
#[case("%=", AssignOp::Mod)]
#[case("&=", AssignOp::BitAnd)]
#[case("|=", AssignOp::BitOr)]
#[case("^=", AssignOp::Xor)]
fn test_parse_compound_assignment(#[case] symbol: &str, #[case] expected: AssignOp) {
    let module = parse_source(&format!("void f() {{ a {} 2; }}", symbol)).unwrap();
    let body = &module.find_function("f").unwrap().body;

    match &body[0].kind {
        StmtKind::Assign { operator, .. } => assert_eq!(*operator, expected),
        other => panic!("expected assignment, found {:?}", other),
    }
}

#[rstest]
#[case("1 + 2 * 3", "(1 + (2 * 3))")]
#[case("1 - 2 - 3", "((1 - 2) - 3)")]
#[case("(1 + 2) * 3", "((1 + 2) * 3)")]
#[case("1 + 2 & 3", "(1 + (2 & 3))")]
#[case("1 << 2 & 3", "((1 << 2) & 3)")]
#[case("a < b == c > d", "((a < b) == (c > d))")]
#[case("a || b && c", "(a || (b && c))")]
#[case("-a * b", "((-a) * b)")]
#[case("!f(1, 2)", "(!f(1, 2))")]
#[case("~-a", "(~(-a))")]
#[case("a ? b : c ? d : e", "(a ? b : (c ? d : e))")]
#[case("a || b ? 1 : 2", "((a || b) ? 1 : 2)")]
fn test_parse_precedence(#[case] source: &str, #[case] expected: &str) {
    assert_eq!(shape(&parse_init(source)), expected);
}

#[test]
fn test_parse_operator_kinds() {
    match parse_init("a && b").kind {
        ExprKind::Logical { operator, .. } => assert_eq!(operator, LogicalOp::And),
        other => panic!("expected logical, found {:?}", other),
    }
    match parse_init("a % b").kind {
        ExprKind::Binary { operator, .. } => assert_eq!(operator, BinaryOp::Mod),
        other => panic!("expected binary, found {:?}", other),
    }
    match parse_init("!a").kind {
        ExprKind::Unary { operator, .. } => assert_eq!(operator, UnaryOp::Not),
        other => panic!("expected unary, found {:?}", other),
    }
}

#[rstest]
#[case("0x10", 16)]
#[case("0XfF", 255)]
#[case("2147483647", i32::MAX)]
#[case("0xFFFFFFFF", -1)]
fn test_parse_numbers(#[case] source: &str, #[case] expected: i32) {
    assert_eq!(parse_init(source).kind, ExprKind::Number(expected));
}

#[test]
fn test_parse_number_overflow() {
    let error = parse_source("int x = 2147483648;").unwrap_err();
    assert_eq!(error.get_error_name(), "NumberParseError");
}

#[test]
fn test_parse_literal_zero_detection() {
    assert!(parse_init("0").is_literal_zero());
    assert!(parse_init("-+0").is_literal_zero());
    assert!(!parse_init("1").is_literal_zero());
    assert!(!parse_init("(a)").is_literal_zero());
}

#[test]
fn test_parse_spans() {
    let module = parse_source("int x = 1 + 23;").unwrap();
    let init = match &module.declarations[0] {
        Declaration::Variable(variable) => variable.init.clone().unwrap(),
        other => panic!("expected variable, found {:?}", other),
    };

    assert_eq!(init.span.start.0, 8);
    assert_eq!(init.span.end.0, 14);
    assert_eq!(module.declarations[0].span().end.0, 15);
}

#[test]
fn test_parse_empty_program() {
    let module = parse_source("").unwrap();
    assert!(module.declarations.is_empty());
}

#[rstest]
#[case("int x = 42")]
#[case("int = 42;")]
#[case("x = 1;")]
#[case("int f( { }")]
#[case("int f(int a,) { }")]
#[case("void f() { if true return; }")]
#[case("void f() { g(1 2); }")]
#[case("void f() { return 1 }")]
#[case("void f() {")]
#[case("int x = a ? b;")]
fn test_parse_syntax_errors(#[case] source: &str) {
    assert!(parse_source(source).is_err());
}

#[rstest]
#[case("void f(bool c) { if (c) int x = 1; }", 24)]
#[case("void f(bool c) { if (c) ; else bool x; }", 31)]
#[case("void f(bool c) { if (c) export int x; }", 24)]
#[case("void f(bool c) { if (c) return; else if (c) int g() { return 1; } }", 44)]
fn test_parse_declaration_as_branch_body(#[case] source: &str, #[case] offset: u32) {
    let error = parse_source(source).unwrap_err();

    assert_eq!(error.get_error_name(), "UnexpectedTokenDetailed");
    assert_eq!(error.get_position().0, offset);
}

#[test]
fn test_parse_declaration_in_braced_branch() {
    let module = parse_source("void f(bool c) { if (c) { int x = 1; } else { bool y; } }").unwrap();
    assert_eq!(module.functions().count(), 1);
}

#[test]
fn test_parse_error_position() {
    let error = parse_source("int x = 1\nint y;").unwrap_err();

    assert_eq!(error.get_error_name(), "UnexpectedToken");
    assert_eq!(error.get_position().0, 10);
}
