//! Unit tests for the C generator.

use std::rc::Rc;

use rstest::rstest;

use super::generator::{expression, generate, GeneratedSource};
use crate::{
    ast::ast::{Declaration, Module},
    lexer::lexer::tokenize,
    parser::parser::parse,
};

fn module(source: &str) -> Module {
    let tokens = tokenize(source.to_string(), Some("test.clam".to_string())).unwrap();
    let (_, result) = parse(tokens, Rc::new("test.clam".to_string()));
    result.unwrap()
}

fn translate(source: &str) -> GeneratedSource {
    generate(&module(source)).unwrap()
}

fn init_expression(source: &str) -> String {
    let module = module(&format!("int x = {};", source));
    match &module.declarations[0] {
        Declaration::Variable(variable) => expression(variable.init.as_ref().unwrap()),
        other => panic!("expected variable, found {:?}", other),
    }
}

#[test]
fn test_generate_module() {
    let generated = translate(
        "int a = 1;
        export int b = a + 1;
        int f(int x) { if (x > 0) return x; else { return -x; } }
        export int main() { int c; c += f(b); return c; }",
    );

    assert_eq!(
        generated.source,
        "#include <stdbool.h>\n\
         \n\
         static int a = 1;\n\
         int b;\n\
         static int f(int x);\n\
         \n\
         int f(int x)\n\
         {\n\
         \tif (x > 0)\n\
         \t\treturn x;\n\
         \telse\n\
         \t{\n\
         \t\treturn (-x);\n\
         \t}\n\
         }\n\
         \n\
         int main()\n\
         {\n\
         \tb = (a + 1);\n\
         \tint c = 0;\n\
         \tc += f(b);\n\
         \treturn c;\n\
         }\n"
    );
    assert_eq!(generated.header, "#include <stdbool.h>\n\nextern int b;\n");
}

#[test]
fn test_exported_function_goes_to_header() {
    let generated = translate("export bool even(int n, bool strict) { return n % 2 == 0; }");

    assert_eq!(
        generated.header,
        "#include <stdbool.h>\n\nextern bool even(int n, bool strict);\n"
    );
    assert!(generated.source.contains("\nbool even(int n, bool strict);\n"));
    assert!(!generated.source.contains("static bool even"));
    assert!(generated.source.contains("\treturn ((n % 2) == 0);\n"));
}

#[test]
fn test_module_without_main_still_has_entry_point() {
    let generated = translate("bool flag = true; int g = -3;");

    assert!(generated.source.contains("static bool flag = true;\n"));
    assert!(generated.source.contains("static int g = (-3);\n"));
    assert!(generated
        .source
        .ends_with("int main()\n{\n\treturn 0;\n}\n"));
}

#[test]
fn test_call_initializers_move_into_main() {
    let generated = translate(
        "int one() { return 1; } int g = one(); bool h = !true; export int main() { return g; }",
    );

    assert!(generated.source.contains("static int g;\n"));
    assert!(generated.source.contains("static bool h;\n"));
    assert!(generated
        .source
        .contains("int main()\n{\n\tg = one();\n\th = (!true);\n\treturn g;\n}\n"));
}

#[test]
fn test_statements() {
    let generated = translate(
        "void f(int a) { ; bool b; a = 2; a++; a--; a ^= 1; f(a); { int c = a; } if (b) { return; } }",
    );

    let expected = "void f(int a)\n\
                    {\n\
                    \t;\n\
                    \tbool b = false;\n\
                    \ta = 2;\n\
                    \ta++;\n\
                    \ta--;\n\
                    \ta ^= 1;\n\
                    \tf(a);\n\
                    \t{\n\
                    \t\tint c = a;\n\
                    \t}\n\
                    \tif (b)\n\
                    \t{\n\
                    \t\treturn;\n\
                    \t}\n\
                    }\n";
    assert!(
        generated.source.contains(expected),
        "{}",
        generated.source
    );
}

#[rstest]
#[case("1 + 2 * 3", "(1 + (2 * 3))")]
#[case("1 + 2 & 3", "(1 + (2 & 3))")]
#[case("a || b && !c", "(a || (b && (!c)))")]
#[case("~-a", "(~(-a))")]
#[case("a ? b : c", "(a ? b : c)")]
#[case("f(1, g(2))", "f(1, g(2))")]
#[case("0xFFFFFFFF", "(-1)")]
#[case("0x80000000", "(-2147483647 - 1)")]
fn test_expressions_are_parenthesised(#[case] source: &str, #[case] expected: &str) {
    assert_eq!(init_expression(source), expected);
}

#[test]
fn test_if_condition_keeps_inner_grouping() {
    let generated = translate("void f(bool a, bool b) { if ((a || b) && a) return; }");
    assert!(generated.source.contains("\tif ((a || b) && a)\n\t\treturn;\n"));
}

#[test]
fn test_local_function_is_rejected() {
    let error = generate(&module("void f() { void g() {} }")).unwrap_err();
    assert_eq!(error.get_error_name(), "LocalFunctionDeclaration");
}
