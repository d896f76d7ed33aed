//! Scope-resolving type checker.
//!
//! Walks a `Module` once, resolving every identifier through a stack of
//! level-tagged variants and enforcing the operator algebra. The first
//! violation is returned as a fatal `Error`.

use crate::{
    ast::{
        ast::{Declaration, FunctionDecl, Module, VariableDecl},
        expressions::{BinaryOp, Expr, ExprKind, UnaryOp},
        statements::{AssignOp, Stmt, StmtKind},
        types::Type,
    },
    errors::errors::{Error, ErrorImpl},
    Position, Span,
};

/// A named, typed binding introduced at some nesting level.
#[derive(Debug, Clone)]
pub struct Variant {
    pub name: String,
    pub var_type: Type,
    pub level: usize,
}

pub struct Analyzer<'a> {
    module: &'a Module,
    variants: Vec<Variant>,
    level: usize,
    function: Option<&'a FunctionDecl>,
}

impl<'a> Analyzer<'a> {
    pub fn new(module: &'a Module) -> Self {
        Analyzer {
            module,
            variants: Vec::new(),
            level: 0,
            function: None,
        }
    }

    /// Checks the whole module: globals first, then every function.
    pub fn analyze(&mut self) -> Result<(), Error> {
        self.variants.clear();
        self.level = 0;

        self.check_function_names()?;

        let module = self.module;
        for variable in module.variables() {
            self.variable(variable)?;
        }

        for function in module.functions() {
            self.function(function)?;
        }

        log::debug!(
            "analyzed {} globals and {} functions",
            self.variants.len(),
            self.module.functions.len()
        );
        Ok(())
    }

    /// Variants visible at the current level.
    pub fn variants(&self) -> &[Variant] {
        &self.variants
    }

    fn check_function_names(&self) -> Result<(), Error> {
        let functions: Vec<&FunctionDecl> = self.module.functions().collect();
        for (index, function) in functions.iter().enumerate() {
            if functions[..index].iter().any(|other| other.name == function.name) {
                return Err(Error::new(
                    ErrorImpl::FunctionAlreadyDeclared {
                        function: function.name.clone(),
                    },
                    function.span.start.clone(),
                ));
            }
        }
        Ok(())
    }

    fn declare(&mut self, name: &str, var_type: Type, position: &Position) -> Result<(), Error> {
        if var_type == Type::Void {
            return Err(Error::new(
                ErrorImpl::VoidVariable {
                    variable: name.to_string(),
                },
                position.clone(),
            ));
        }

        let duplicate = self
            .variants
            .iter()
            .rev()
            .take_while(|variant| variant.level == self.level)
            .any(|variant| variant.name == name);
        if duplicate {
            return Err(Error::new(
                ErrorImpl::VariableAlreadyDeclared {
                    variable: name.to_string(),
                },
                position.clone(),
            ));
        }

        self.variants.push(Variant {
            name: name.to_string(),
            var_type,
            level: self.level,
        });
        Ok(())
    }

    fn variable(&mut self, variable: &VariableDecl) -> Result<(), Error> {
        if variable.var_type == Type::Void {
            return self.declare(&variable.name, variable.var_type, &variable.span.start);
        }

        if let Some(init) = &variable.init {
            let init_type = self.expression(init)?;
            if !init_type.is_convertible_to(variable.var_type) {
                return Err(type_mismatch(variable.var_type, init_type, &init.span));
            }
        }

        self.declare(&variable.name, variable.var_type, &variable.span.start)
    }

    fn function(&mut self, function: &'a FunctionDecl) -> Result<(), Error> {
        log::debug!("checking function `{}`", function.name);

        if function.name == "main" {
            if !function.exported {
                return Err(Error::new(
                    ErrorImpl::MainNotExported,
                    function.span.start.clone(),
                ));
            }
            if function.return_type != Type::Int {
                return Err(Error::new(
                    ErrorImpl::MainReturnType {
                        received: function.return_type.to_string(),
                    },
                    function.span.start.clone(),
                ));
            }
        }

        let saved = self.variants.len();
        self.level += 1;
        self.function = Some(function);

        for parameter in &function.parameters {
            self.declare(&parameter.name, parameter.param_type, &parameter.span.start)?;
        }

        let mut returns = false;
        for stmt in &function.body {
            returns |= self.statement(stmt)?;
        }

        if function.return_type != Type::Void && !returns {
            return Err(Error::new(
                ErrorImpl::MissingReturn {
                    function: function.name.clone(),
                },
                function.span.start.clone(),
            ));
        }

        log::trace!(
            "leaving `{}`, dropping {} variants",
            function.name,
            self.variants.len() - saved
        );
        self.variants.truncate(saved);
        self.level -= 1;
        self.function = None;
        Ok(())
    }

    /// Checks one statement, returning whether it guarantees a return.
    fn statement(&mut self, stmt: &Stmt) -> Result<bool, Error> {
        match &stmt.kind {
            StmtKind::Empty => Ok(false),
            StmtKind::Declaration(Declaration::Function(function)) => Err(Error::new(
                ErrorImpl::LocalFunctionDeclaration {
                    function: function.name.clone(),
                },
                function.span.start.clone(),
            )),
            StmtKind::Declaration(Declaration::Variable(variable)) => {
                if variable.exported {
                    return Err(Error::new(
                        ErrorImpl::LocalExport {
                            variable: variable.name.clone(),
                        },
                        variable.span.start.clone(),
                    ));
                }
                self.variable(variable)?;
                Ok(false)
            }
            StmtKind::If {
                condition,
                then_body,
                else_body,
            } => {
                let condition_type = self.expression(condition)?;
                if condition_type != Type::Bool {
                    return Err(type_mismatch(Type::Bool, condition_type, &condition.span));
                }

                let then_returns = self.statement(then_body)?;
                let else_returns = match else_body {
                    Some(else_body) => self.statement(else_body)?,
                    None => false,
                };
                Ok(then_returns && else_returns)
            }
            StmtKind::Compound(body) => {
                let saved = self.variants.len();
                self.level += 1;

                let mut returns = false;
                for stmt in body {
                    returns |= self.statement(stmt)?;
                }

                self.variants.truncate(saved);
                self.level -= 1;
                Ok(returns)
            }
            StmtKind::Assign {
                target,
                operator,
                value,
            } => {
                self.assignment(target, *operator, value)?;
                Ok(false)
            }
            StmtKind::Increment(target) | StmtKind::Decrement(target) => {
                let symbol = if matches!(stmt.kind, StmtKind::Increment(_)) {
                    "++"
                } else {
                    "--"
                };

                let target_type = self.lvalue(target)?;
                if target_type != Type::Int {
                    return Err(Error::new(
                        ErrorImpl::OperandTypeError {
                            operator: symbol.to_string(),
                            received: target_type.to_string(),
                        },
                        target.span.start.clone(),
                    ));
                }
                Ok(false)
            }
            StmtKind::Return(value) => {
                self.return_statement(value.as_ref(), &stmt.span)?;
                Ok(true)
            }
            StmtKind::Expression(expr) => {
                self.expression(expr)?;
                Ok(false)
            }
        }
    }

    fn return_statement(&mut self, value: Option<&Expr>, span: &Span) -> Result<(), Error> {
        let Some(function) = self.function else {
            return Ok(());
        };

        match (function.return_type, value) {
            (Type::Void, Some(_)) => Err(Error::new(
                ErrorImpl::ReturnValueInVoidFunction {
                    function: function.name.clone(),
                },
                span.start.clone(),
            )),
            (Type::Void, None) => Ok(()),
            (_, None) => Err(Error::new(
                ErrorImpl::MissingReturnValue {
                    function: function.name.clone(),
                },
                span.start.clone(),
            )),
            (return_type, Some(expr)) => {
                let value_type = self.expression(expr)?;
                if !value_type.is_convertible_to(return_type) {
                    return Err(type_mismatch(return_type, value_type, &expr.span));
                }
                Ok(())
            }
        }
    }

    /// Resolves an assignment target, which must be a bare identifier.
    fn lvalue(&mut self, target: &Expr) -> Result<Type, Error> {
        if target.as_symbol().is_none() {
            return Err(Error::new(
                ErrorImpl::InvalidLvalue,
                target.span.start.clone(),
            ));
        }
        self.expression(target)
    }

    fn assignment(&mut self, target: &Expr, operator: AssignOp, value: &Expr) -> Result<(), Error> {
        let target_type = self.lvalue(target)?;
        let value_type = self.expression(value)?;

        let result_type = match operator.binary_operator() {
            Some(binary) => {
                if binary.is_division() && value.is_literal_zero() {
                    return Err(Error::new(
                        ErrorImpl::StaticDivisionByZero,
                        value.span.start.clone(),
                    ));
                }
                binary_type(binary, target_type, value_type, &target.span)?
            }
            None => value_type,
        };

        if !result_type.is_convertible_to(target_type) {
            return Err(type_mismatch(target_type, result_type, &value.span));
        }
        Ok(())
    }

    fn lookup(&self, name: &str) -> Option<&Variant> {
        self.variants
            .iter()
            .rev()
            .find(|variant| variant.level <= self.level && variant.name == name)
    }

    /// Infers the type of an expression.
    pub fn expression(&mut self, expr: &Expr) -> Result<Type, Error> {
        match &expr.kind {
            ExprKind::Number(_) => Ok(Type::Int),
            ExprKind::Boolean(_) => Ok(Type::Bool),
            ExprKind::Symbol(name) => match self.lookup(name) {
                Some(variant) => Ok(variant.var_type),
                None => Err(Error::new(
                    ErrorImpl::VariableNotDeclared {
                        variable: name.clone(),
                    },
                    expr.span.start.clone(),
                )),
            },
            ExprKind::Call { callee, arguments } => self.call(callee, arguments),
            ExprKind::Unary { operator, operand } => {
                let operand_type = self.expression(operand)?;
                let expected = match operator {
                    UnaryOp::Not => Type::Bool,
                    UnaryOp::Plus | UnaryOp::Minus | UnaryOp::BitNot => Type::Int,
                };

                if operand_type != expected {
                    return Err(Error::new(
                        ErrorImpl::OperandTypeError {
                            operator: operator.to_string(),
                            received: operand_type.to_string(),
                        },
                        expr.span.start.clone(),
                    ));
                }
                Ok(expected)
            }
            ExprKind::Binary {
                left,
                operator,
                right,
            } => {
                let left_type = self.expression(left)?;
                let right_type = self.expression(right)?;

                if operator.is_division() && right.is_literal_zero() {
                    return Err(Error::new(
                        ErrorImpl::StaticDivisionByZero,
                        right.span.start.clone(),
                    ));
                }
                binary_type(*operator, left_type, right_type, &expr.span)
            }
            ExprKind::Logical {
                left,
                operator,
                right,
            } => {
                let left_type = self.expression(left)?;
                let right_type = self.expression(right)?;

                if left_type != Type::Bool || right_type != Type::Bool {
                    return Err(operand_mismatch(
                        operator.symbol(),
                        left_type,
                        right_type,
                        &expr.span,
                    ));
                }
                Ok(Type::Bool)
            }
            ExprKind::Conditional {
                condition,
                then_expr,
                else_expr,
            } => {
                let condition_type = self.expression(condition)?;
                if condition_type != Type::Bool {
                    return Err(type_mismatch(Type::Bool, condition_type, &condition.span));
                }

                let then_type = self.expression(then_expr)?;
                let else_type = self.expression(else_expr)?;
                if then_type != else_type {
                    return Err(type_mismatch(then_type, else_type, &else_expr.span));
                }
                Ok(then_type)
            }
        }
    }

    fn call(&mut self, callee: &Expr, arguments: &[Expr]) -> Result<Type, Error> {
        let Some(name) = callee.as_symbol() else {
            return Err(Error::new(ErrorImpl::InvalidCallee, callee.span.start.clone()));
        };

        let module = self.module;
        let Some(function) = module.find_function(name) else {
            return Err(Error::new(
                ErrorImpl::FunctionNotDeclared {
                    function: name.to_string(),
                },
                callee.span.start.clone(),
            ));
        };

        let expected = function.parameters.len();
        let received = arguments.len();
        if received > expected {
            return Err(Error::new(
                ErrorImpl::UnexpectedArguments { expected, received },
                arguments[expected].span.start.clone(),
            ));
        }
        if received < expected {
            return Err(Error::new(
                ErrorImpl::MissingArguments { expected, received },
                callee.span.start.clone(),
            ));
        }

        for (argument, parameter) in arguments.iter().zip(&function.parameters) {
            let argument_type = self.expression(argument)?;
            if argument_type != parameter.param_type {
                return Err(Error::new(
                    ErrorImpl::ArgumentTypeMatchError {
                        expected: parameter.param_type.to_string(),
                        received: argument_type.to_string(),
                    },
                    argument.span.start.clone(),
                ));
            }
        }

        Ok(function.return_type)
    }
}

fn type_mismatch(expected: Type, received: Type, span: &Span) -> Error {
    Error::new(
        ErrorImpl::TypeMatchError {
            expected: expected.to_string(),
            received: received.to_string(),
        },
        span.start.clone(),
    )
}

fn operand_mismatch(operator: &str, left: Type, right: Type, span: &Span) -> Error {
    Error::new(
        ErrorImpl::OperandTypesMismatch {
            operator: operator.to_string(),
            left: left.to_string(),
            right: right.to_string(),
        },
        span.start.clone(),
    )
}

/// Result type of a binary operator, shared by compound assignment.
fn binary_type(operator: BinaryOp, left: Type, right: Type, span: &Span) -> Result<Type, Error> {
    match operator {
        BinaryOp::Eq | BinaryOp::Ne => match (left, right) {
            (Type::Int, Type::Int) | (Type::Bool, Type::Bool) => Ok(Type::Bool),
            _ => Err(operand_mismatch(operator.symbol(), left, right, span)),
        },
        BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge => match (left, right) {
            (Type::Int, Type::Int) => Ok(Type::Bool),
            _ => Err(operand_mismatch(operator.symbol(), left, right, span)),
        },
        _ => match (left, right) {
            (Type::Int, Type::Int) => Ok(Type::Int),
            _ => Err(operand_mismatch(operator.symbol(), left, right, span)),
        },
    }
}

/// Type-checks `module`, returning the first violation found.
pub fn analyze(module: &Module) -> Result<(), Error> {
    Analyzer::new(module).analyze()
}
