//! Textual C backend.
//!
//! Translates an analyzed `Module` into a C99 translation unit plus a header
//! holding the `extern` declarations of everything the module exports.

use crate::{
    ast::{
        ast::{Declaration, FunctionDecl, Module, Parameter, VariableDecl},
        expressions::{Expr, ExprKind},
        statements::{Stmt, StmtKind},
        types::Type,
    },
    errors::errors::{Error, ErrorImpl},
};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct GeneratedSource {
    pub header: String,
    pub source: String,
}

pub struct Generator {
    /// `extern` lines for exported globals and functions
    header: String,
    /// Global definitions and function prototypes, in source order
    declarations: String,
    /// Function definitions other than `main`
    definitions: String,
    /// Global initializers that must run at the start of C `main`
    init_globals: String,
    /// Body of the module's own `main`
    main: String,
    has_main: bool,
    level: usize,
}

impl Default for Generator {
    fn default() -> Self {
        Self::new()
    }
}

impl Generator {
    pub fn new() -> Self {
        Generator {
            header: String::new(),
            declarations: String::new(),
            definitions: String::new(),
            init_globals: String::new(),
            main: String::new(),
            has_main: false,
            level: 0,
        }
    }

    pub fn generate(mut self, module: &Module) -> Result<GeneratedSource, Error> {
        for declaration in &module.declarations {
            match declaration {
                Declaration::Variable(variable) => self.global(variable),
                Declaration::Function(function) => self.function(function)?,
            }
        }

        let mut header = String::from("#include <stdbool.h>\n");
        if !self.header.is_empty() {
            header.push('\n');
            header.push_str(&self.header);
        }

        let mut source = String::from("#include <stdbool.h>\n\n");
        source.push_str(&self.declarations);
        if !self.declarations.is_empty() {
            source.push('\n');
        }
        source.push_str(&self.definitions);
        source.push_str("int main()\n{\n");
        source.push_str(&self.init_globals);
        source.push_str(&self.main);
        if !self.has_main {
            source.push_str("\treturn 0;\n");
        }
        source.push_str("}\n");

        log::debug!(
            "generated {} bytes of source, {} bytes of header",
            source.len(),
            header.len()
        );
        Ok(GeneratedSource { header, source })
    }

    fn global(&mut self, variable: &VariableDecl) {
        let type_name = c_type(variable.var_type);

        if variable.exported {
            self.header
                .push_str(&format!("extern {} {};\n", type_name, variable.name));
        } else {
            self.declarations.push_str("static ");
        }
        self.declarations
            .push_str(&format!("{} {}", type_name, variable.name));

        match &variable.init {
            // File-scope initializers must be constant expressions.
            Some(init) if init.is_constant_literal() => {
                self.declarations.push_str(&format!(" = {}", expression(init)));
            }
            Some(init) => {
                self.init_globals
                    .push_str(&format!("\t{} = {};\n", variable.name, expression(init)));
            }
            None => {}
        }
        self.declarations.push_str(";\n");
    }

    fn function(&mut self, function: &FunctionDecl) -> Result<(), Error> {
        if function.name == "main" {
            self.has_main = true;
            self.level = 1;

            let mut body = String::new();
            for stmt in &function.body {
                self.statement(stmt, &mut body)?;
            }
            self.main.push_str(&body);

            self.level = 0;
            return Ok(());
        }

        let signature = format!(
            "{} {}({})",
            c_type(function.return_type),
            function.name,
            parameter_list(&function.parameters)
        );

        if function.exported {
            self.header.push_str(&format!("extern {};\n", signature));
        } else {
            self.declarations.push_str("static ");
        }
        self.declarations.push_str(&format!("{};\n", signature));

        let mut definition = format!("{}\n{{\n", signature);
        self.level = 1;
        for stmt in &function.body {
            self.statement(stmt, &mut definition)?;
        }
        self.level = 0;
        definition.push_str("}\n\n");

        self.definitions.push_str(&definition);
        Ok(())
    }

    fn indent(&self, out: &mut String) {
        for _ in 0..self.level {
            out.push('\t');
        }
    }

    fn line(&self, out: &mut String, text: &str) {
        self.indent(out);
        out.push_str(text);
        out.push('\n');
    }

    /// Emits a branch body: blocks stay at the current level, single statements
    /// are indented one level deeper.
    fn branch(&mut self, stmt: &Stmt, out: &mut String) -> Result<(), Error> {
        if let StmtKind::Compound(_) = stmt.kind {
            return self.statement(stmt, out);
        }

        self.level += 1;
        let result = self.statement(stmt, out);
        self.level -= 1;
        result
    }

    fn statement(&mut self, stmt: &Stmt, out: &mut String) -> Result<(), Error> {
        match &stmt.kind {
            StmtKind::Empty => self.line(out, ";"),
            StmtKind::Declaration(Declaration::Variable(variable)) => {
                // Locals start from the same zero value the interpreter gives them.
                let init = match &variable.init {
                    Some(init) => expression(init),
                    None => default_literal(variable.var_type).to_string(),
                };
                self.line(
                    out,
                    &format!("{} {} = {};", c_type(variable.var_type), variable.name, init),
                );
            }
            StmtKind::Declaration(Declaration::Function(function)) => {
                return Err(Error::new(
                    ErrorImpl::LocalFunctionDeclaration {
                        function: function.name.clone(),
                    },
                    function.span.start.clone(),
                ));
            }
            StmtKind::Assign {
                target,
                operator,
                value,
            } => self.line(
                out,
                &format!(
                    "{} {} {};",
                    expression(target),
                    operator.symbol(),
                    expression(value)
                ),
            ),
            StmtKind::Increment(target) => self.line(out, &format!("{}++;", expression(target))),
            StmtKind::Decrement(target) => self.line(out, &format!("{}--;", expression(target))),
            StmtKind::If {
                condition,
                then_body,
                else_body,
            } => {
                let condition = expression(condition);
                // Strip the outer parentheses `expression` adds; `if` supplies its own.
                let condition = condition
                    .strip_prefix('(')
                    .and_then(|inner| inner.strip_suffix(')'))
                    .filter(|inner| balanced(inner))
                    .unwrap_or(condition.as_str());

                self.line(out, &format!("if ({})", condition));
                self.branch(then_body, out)?;

                if let Some(else_body) = else_body {
                    self.line(out, "else");
                    self.branch(else_body, out)?;
                }
            }
            StmtKind::Return(None) => self.line(out, "return;"),
            StmtKind::Return(Some(value)) => {
                self.line(out, &format!("return {};", expression(value)))
            }
            StmtKind::Expression(expr) => self.line(out, &format!("{};", expression(expr))),
            StmtKind::Compound(body) => {
                self.line(out, "{");
                self.level += 1;
                for stmt in body {
                    self.statement(stmt, out)?;
                }
                self.level -= 1;
                self.line(out, "}");
            }
        }
        Ok(())
    }
}

fn c_type(value_type: Type) -> &'static str {
    match value_type {
        Type::Void | Type::Error => "void",
        Type::Int => "int",
        Type::Bool => "bool",
    }
}

fn default_literal(value_type: Type) -> &'static str {
    match value_type {
        Type::Bool => "false",
        _ => "0",
    }
}

fn parameter_list(parameters: &[Parameter]) -> String {
    parameters
        .iter()
        .map(|parameter| format!("{} {}", c_type(parameter.param_type), parameter.name))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Whether every `(` in `text` is closed before any unmatched `)`.
fn balanced(text: &str) -> bool {
    let mut depth = 0usize;
    for c in text.chars() {
        match c {
            '(' => depth += 1,
            ')' => match depth.checked_sub(1) {
                Some(next) => depth = next,
                None => return false,
            },
            _ => {}
        }
    }
    depth == 0
}

/// Renders an expression, parenthesising every operator node.
pub fn expression(expr: &Expr) -> String {
    match &expr.kind {
        ExprKind::Number(value) if *value == i32::MIN => String::from("(-2147483647 - 1)"),
        ExprKind::Number(value) if *value < 0 => format!("({})", value),
        ExprKind::Number(value) => value.to_string(),
        ExprKind::Boolean(value) => value.to_string(),
        ExprKind::Symbol(name) => name.clone(),
        ExprKind::Call { callee, arguments } => format!(
            "{}({})",
            expression(callee),
            arguments
                .iter()
                .map(expression)
                .collect::<Vec<_>>()
                .join(", ")
        ),
        ExprKind::Unary { operator, operand } => {
            format!("({}{})", operator, expression(operand))
        }
        ExprKind::Binary {
            left,
            operator,
            right,
        } => format!("({} {} {})", expression(left), operator, expression(right)),
        ExprKind::Logical {
            left,
            operator,
            right,
        } => format!("({} {} {})", expression(left), operator, expression(right)),
        ExprKind::Conditional {
            condition,
            then_expr,
            else_expr,
        } => format!(
            "({} ? {} : {})",
            expression(condition),
            expression(then_expr),
            expression(else_expr)
        ),
    }
}

/// Translates an analyzed module to C.
pub fn generate(module: &Module) -> Result<GeneratedSource, Error> {
    Generator::new().generate(module)
}
