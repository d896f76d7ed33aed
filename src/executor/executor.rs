//! Tree-walking interpreter.
//!
//! Values live in one slot stack reserved up front. A call frame is the
//! window `frame_base..len` of that stack; blocks and frames truncate the
//! stack back to where they started when they exit.

use std::{fmt::Display, rc::Rc};

use crate::{
    ast::{
        ast::{Declaration, FunctionDecl, Module, VariableDecl},
        expressions::{BinaryOp, Expr, ExprKind, LogicalOp, UnaryOp},
        statements::{AssignOp, Stmt, StmtKind},
        types::Type,
    },
    errors::errors::{Error, ErrorImpl},
    Position,
};

/// Slots reserved for the value stack before execution starts.
pub const STACK_CAPACITY: usize = 65536;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Value {
    Int(i32),
    Bool(bool),
}

impl Value {
    /// Value of a variant declared without an initializer.
    pub fn default_for(value_type: Type) -> Option<Value> {
        match value_type {
            Type::Int => Some(Value::Int(0)),
            Type::Bool => Some(Value::Bool(false)),
            Type::Void | Type::Error => None,
        }
    }

    pub fn value_type(&self) -> Type {
        match self {
            Value::Int(_) => Type::Int,
            Value::Bool(_) => Type::Bool,
        }
    }

    fn type_error(&self, expected: Type, position: &Position) -> Error {
        Error::new(
            ErrorImpl::TypeMatchError {
                expected: expected.to_string(),
                received: self.value_type().to_string(),
            },
            position.clone(),
        )
    }

    fn expect_type(self, expected: Type, position: &Position) -> Result<Value, Error> {
        if self.value_type() != expected {
            return Err(self.type_error(expected, position));
        }
        Ok(self)
    }

    fn as_int(self, position: &Position) -> Result<i32, Error> {
        match self {
            Value::Int(value) => Ok(value),
            Value::Bool(_) => Err(self.type_error(Type::Int, position)),
        }
    }

    fn as_bool(self, position: &Position) -> Result<bool, Error> {
        match self {
            Value::Bool(value) => Ok(value),
            Value::Int(_) => Err(self.type_error(Type::Bool, position)),
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Int(value) => write!(f, "{}", value),
            Value::Bool(value) => write!(f, "{}", value),
        }
    }
}

/// A named runtime value tagged with the level that introduced it.
#[derive(Debug, Clone, PartialEq)]
pub struct Slot {
    pub name: String,
    pub value: Value,
    pub level: usize,
}

/// How a statement finished.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Flow {
    Normal,
    Return(Option<Value>),
}

#[derive(Debug, Clone, Copy)]
enum SlotRef {
    Stack(usize),
    Global(usize),
}

pub struct Executor<'a> {
    module: &'a Module,
    globals: Vec<Slot>,
    stack: Vec<Slot>,
    frame_base: usize,
    level: usize,
}

impl<'a> Executor<'a> {
    pub fn new(module: &'a Module) -> Self {
        Self::with_capacity(module, STACK_CAPACITY)
    }

    pub fn with_capacity(module: &'a Module, capacity: usize) -> Self {
        Executor {
            module,
            globals: Vec::new(),
            stack: Vec::with_capacity(capacity),
            frame_base: 0,
            level: 0,
        }
    }

    pub fn globals(&self) -> &[Slot] {
        &self.globals
    }

    pub fn stack(&self) -> &[Slot] {
        &self.stack
    }

    pub fn stack_capacity(&self) -> usize {
        self.stack.capacity()
    }

    /// Initialises the globals, then calls the exported `main`.
    pub fn run(&mut self) -> Result<i32, Error> {
        self.globals.clear();
        self.stack.clear();
        self.frame_base = 0;
        self.level = 0;

        let module = self.module;
        for variable in module.variables() {
            let value = self.initial_value(variable)?;
            log::trace!("global `{}` = {}", variable.name, value);
            self.globals.push(Slot {
                name: variable.name.clone(),
                value,
                level: 0,
            });
        }

        let Some(main) = module.find_function("main") else {
            return Err(Error::new(ErrorImpl::MainNotFound, module_position(module)));
        };
        if !main.exported {
            return Err(Error::new(ErrorImpl::MainNotExported, main.span.start.clone()));
        }
        if main.return_type != Type::Int {
            return Err(Error::new(
                ErrorImpl::MainReturnType {
                    received: main.return_type.to_string(),
                },
                main.span.start.clone(),
            ));
        }

        let result = self.call(main, &[], &main.span.start)?;
        match result {
            Some(value) => value.as_int(&main.span.start),
            None => Err(Error::new(
                ErrorImpl::VoidValue {
                    function: main.name.clone(),
                },
                main.span.start.clone(),
            )),
        }
    }

    fn initial_value(&mut self, variable: &VariableDecl) -> Result<Value, Error> {
        match &variable.init {
            Some(init) => self
                .evaluate(init)?
                .expect_type(variable.var_type, &init.span.start),
            None => Value::default_for(variable.var_type).ok_or_else(|| {
                Error::new(
                    ErrorImpl::VoidVariable {
                        variable: variable.name.clone(),
                    },
                    variable.span.start.clone(),
                )
            }),
        }
    }

    /// Invokes `function`, returning its value or `None` for `void`.
    pub fn call(
        &mut self,
        function: &'a FunctionDecl,
        arguments: &[Expr],
        position: &Position,
    ) -> Result<Option<Value>, Error> {
        let expected = function.parameters.len();
        let received = arguments.len();
        if received > expected {
            return Err(Error::new(
                ErrorImpl::UnexpectedArguments { expected, received },
                position.clone(),
            ));
        }
        if received < expected {
            return Err(Error::new(
                ErrorImpl::MissingArguments { expected, received },
                position.clone(),
            ));
        }

        // Arguments are evaluated right to left, in the caller's frame.
        let mut values = Vec::with_capacity(received);
        for argument in arguments.iter().rev() {
            values.push(self.evaluate(argument)?);
        }
        values.reverse();

        let base = self.stack.len();
        for (parameter, value) in function.parameters.iter().zip(values) {
            let value = value.expect_type(parameter.param_type, &parameter.span.start)?;
            self.stack.push(Slot {
                name: parameter.name.clone(),
                value,
                level: self.level + 1,
            });
        }

        let saved_base = self.frame_base;
        let saved_level = self.level;
        self.frame_base = base;
        self.level += 1;
        log::trace!(
            "enter `{}` (frame {}..{}, level {})",
            function.name,
            base,
            self.stack.len(),
            self.level
        );

        let mut flow = Flow::Normal;
        for stmt in &function.body {
            flow = self.execute(stmt)?;
            if let Flow::Return(_) = flow {
                break;
            }
        }

        self.stack.truncate(base);
        self.frame_base = saved_base;
        self.level = saved_level;
        log::trace!("leave `{}`", function.name);

        match (function.return_type, flow) {
            (Type::Void, _) => Ok(None),
            (return_type, Flow::Return(Some(value))) => {
                Ok(Some(value.expect_type(return_type, &function.span.start)?))
            }
            _ => Err(Error::new(
                ErrorImpl::MissingReturn {
                    function: function.name.clone(),
                },
                function.span.start.clone(),
            )),
        }
    }

    /// Executes one statement.
    pub fn execute(&mut self, stmt: &Stmt) -> Result<Flow, Error> {
        match &stmt.kind {
            StmtKind::Empty => Ok(Flow::Normal),
            StmtKind::Declaration(Declaration::Variable(variable)) => {
                let value = self.initial_value(variable)?;
                let slot = Slot {
                    name: variable.name.clone(),
                    value,
                    level: self.level,
                };

                if self.level == 0 {
                    self.globals.push(slot);
                } else {
                    self.stack.push(slot);
                }
                Ok(Flow::Normal)
            }
            StmtKind::Declaration(Declaration::Function(function)) => Err(Error::new(
                ErrorImpl::LocalFunctionDeclaration {
                    function: function.name.clone(),
                },
                function.span.start.clone(),
            )),
            StmtKind::Compound(body) => {
                let saved = self.stack.len();
                self.level += 1;

                let mut flow = Flow::Normal;
                for stmt in body {
                    flow = self.execute(stmt)?;
                    if let Flow::Return(_) = flow {
                        break;
                    }
                }

                self.stack.truncate(saved);
                self.level -= 1;
                Ok(flow)
            }
            StmtKind::If {
                condition,
                then_body,
                else_body,
            } => {
                if self.evaluate(condition)?.as_bool(&condition.span.start)? {
                    self.execute(then_body)
                } else if let Some(else_body) = else_body {
                    self.execute(else_body)
                } else {
                    Ok(Flow::Normal)
                }
            }
            StmtKind::Assign {
                target,
                operator,
                value,
            } => {
                self.assign(target, *operator, value)?;
                Ok(Flow::Normal)
            }
            StmtKind::Increment(target) | StmtKind::Decrement(target) => {
                let delta = if matches!(stmt.kind, StmtKind::Increment(_)) {
                    1
                } else {
                    -1
                };

                let slot = self.resolve_target(target)?;
                let current = self.slot(slot).value.as_int(&target.span.start)?;
                self.slot_mut(slot).value = Value::Int(current.wrapping_add(delta));
                Ok(Flow::Normal)
            }
            StmtKind::Return(value) => {
                let value = match value {
                    Some(expr) => Some(self.evaluate(expr)?),
                    None => None,
                };
                Ok(Flow::Return(value))
            }
            StmtKind::Expression(expr) => {
                self.discard(expr)?;
                Ok(Flow::Normal)
            }
        }
    }

    fn assign(&mut self, target: &Expr, operator: AssignOp, value: &Expr) -> Result<(), Error> {
        let slot = self.resolve_target(target)?;
        let value = self.evaluate(value)?;

        let current = self.slot(slot).value;
        let updated = match operator.binary_operator() {
            Some(binary) => binary_value(binary, current, value, &target.span.start)?,
            None => value.expect_type(current.value_type(), &target.span.start)?,
        };

        self.slot_mut(slot).value = updated;
        Ok(())
    }

    fn resolve_target(&self, target: &Expr) -> Result<SlotRef, Error> {
        match target.as_symbol() {
            Some(name) => self.resolve(name, &target.span.start),
            None => Err(Error::new(
                ErrorImpl::InvalidLvalue,
                target.span.start.clone(),
            )),
        }
    }

    /// Innermost visible slot named `name`: the current frame first, then globals.
    fn resolve(&self, name: &str, position: &Position) -> Result<SlotRef, Error> {
        let local = self.stack[self.frame_base..]
            .iter()
            .rposition(|slot| slot.level <= self.level && slot.name == name);
        if let Some(index) = local {
            return Ok(SlotRef::Stack(self.frame_base + index));
        }

        match self.globals.iter().rposition(|slot| slot.name == name) {
            Some(index) => Ok(SlotRef::Global(index)),
            None => Err(Error::new(
                ErrorImpl::VariableNotDeclared {
                    variable: name.to_string(),
                },
                position.clone(),
            )),
        }
    }

    fn slot(&self, slot: SlotRef) -> &Slot {
        match slot {
            SlotRef::Stack(index) => &self.stack[index],
            SlotRef::Global(index) => &self.globals[index],
        }
    }

    fn slot_mut(&mut self, slot: SlotRef) -> &mut Slot {
        match slot {
            SlotRef::Stack(index) => &mut self.stack[index],
            SlotRef::Global(index) => &mut self.globals[index],
        }
    }

    fn function(&self, callee: &Expr) -> Result<&'a FunctionDecl, Error> {
        let Some(name) = callee.as_symbol() else {
            return Err(Error::new(ErrorImpl::InvalidCallee, callee.span.start.clone()));
        };

        let module = self.module;
        module.find_function(name).ok_or_else(|| {
            Error::new(
                ErrorImpl::FunctionNotDeclared {
                    function: name.to_string(),
                },
                callee.span.start.clone(),
            )
        })
    }

    /// Evaluates an expression statement, allowing `void` calls.
    fn discard(&mut self, expr: &Expr) -> Result<(), Error> {
        match &expr.kind {
            ExprKind::Call { callee, arguments } => {
                let function = self.function(callee)?;
                self.call(function, arguments, &expr.span.start)?;
            }
            ExprKind::Conditional {
                condition,
                then_expr,
                else_expr,
            } => {
                if self.evaluate(condition)?.as_bool(&condition.span.start)? {
                    self.discard(then_expr)?;
                } else {
                    self.discard(else_expr)?;
                }
            }
            _ => {
                self.evaluate(expr)?;
            }
        }
        Ok(())
    }

    /// Evaluates an expression to a value.
    pub fn evaluate(&mut self, expr: &Expr) -> Result<Value, Error> {
        let position = &expr.span.start;

        match &expr.kind {
            ExprKind::Number(value) => Ok(Value::Int(*value)),
            ExprKind::Boolean(value) => Ok(Value::Bool(*value)),
            ExprKind::Symbol(name) => {
                let slot = self.resolve(name, position)?;
                Ok(self.slot(slot).value)
            }
            ExprKind::Call { callee, arguments } => {
                let function = self.function(callee)?;
                self.call(function, arguments, position)?.ok_or_else(|| {
                    Error::new(
                        ErrorImpl::VoidValue {
                            function: function.name.clone(),
                        },
                        position.clone(),
                    )
                })
            }
            ExprKind::Unary { operator, operand } => {
                let value = self.evaluate(operand)?;
                let position = &operand.span.start;
                Ok(match operator {
                    UnaryOp::Plus => Value::Int(value.as_int(position)?),
                    UnaryOp::Minus => Value::Int(value.as_int(position)?.wrapping_neg()),
                    UnaryOp::Not => Value::Bool(!value.as_bool(position)?),
                    UnaryOp::BitNot => Value::Int(!value.as_int(position)?),
                })
            }
            ExprKind::Binary {
                left,
                operator,
                right,
            } => {
                let left_value = self.evaluate(left)?;
                let right_value = self.evaluate(right)?;
                binary_value(*operator, left_value, right_value, &right.span.start)
            }
            ExprKind::Logical {
                left,
                operator,
                right,
            } => {
                let left_value = self.evaluate(left)?.as_bool(&left.span.start)?;
                let decided = match operator {
                    LogicalOp::And => !left_value,
                    LogicalOp::Or => left_value,
                };
                if decided {
                    return Ok(Value::Bool(left_value));
                }

                let right_value = self.evaluate(right)?.as_bool(&right.span.start)?;
                Ok(Value::Bool(right_value))
            }
            ExprKind::Conditional {
                condition,
                then_expr,
                else_expr,
            } => {
                if self.evaluate(condition)?.as_bool(&condition.span.start)? {
                    self.evaluate(then_expr)
                } else {
                    self.evaluate(else_expr)
                }
            }
        }
    }
}

/// Applies a binary operator with 32-bit wrapping semantics.
fn binary_value(
    operator: BinaryOp,
    left: Value,
    right: Value,
    position: &Position,
) -> Result<Value, Error> {
    let mismatch = || {
        Error::new(
            ErrorImpl::OperandTypesMismatch {
                operator: operator.to_string(),
                left: left.value_type().to_string(),
                right: right.value_type().to_string(),
            },
            position.clone(),
        )
    };

    let (Value::Int(l), Value::Int(r)) = (left, right) else {
        return match operator {
            BinaryOp::Eq | BinaryOp::Ne if left.value_type() == right.value_type() => {
                Ok(Value::Bool((left == right) == (operator == BinaryOp::Eq)))
            }
            _ => Err(mismatch()),
        };
    };

    if operator.is_division() && r == 0 {
        return Err(Error::new(ErrorImpl::DivisionByZero, position.clone()));
    }

    Ok(match operator {
        BinaryOp::Add => Value::Int(l.wrapping_add(r)),
        BinaryOp::Sub => Value::Int(l.wrapping_sub(r)),
        BinaryOp::Mul => Value::Int(l.wrapping_mul(r)),
        BinaryOp::Div => Value::Int(l.wrapping_div(r)),
        BinaryOp::Mod => Value::Int(l.wrapping_rem(r)),
        BinaryOp::BitAnd => Value::Int(l & r),
        BinaryOp::BitOr => Value::Int(l | r),
        BinaryOp::Xor => Value::Int(l ^ r),
        BinaryOp::Shl => Value::Int(l.wrapping_shl(r as u32)),
        BinaryOp::Shr => Value::Int(l.wrapping_shr(r as u32)),
        BinaryOp::Eq => Value::Bool(l == r),
        BinaryOp::Ne => Value::Bool(l != r),
        BinaryOp::Lt => Value::Bool(l < r),
        BinaryOp::Le => Value::Bool(l <= r),
        BinaryOp::Gt => Value::Bool(l > r),
        BinaryOp::Ge => Value::Bool(l >= r),
    })
}

/// Start of the module's file, for diagnostics that have no better anchor.
fn module_position(module: &Module) -> Position {
    match module.declarations.first() {
        Some(declaration) => Position(0, Rc::clone(&declaration.span().start.1)),
        None => Position::null(),
    }
}

/// Runs `module` with the default stack capacity, returning `main`'s value.
pub fn execute(module: &Module) -> Result<i32, Error> {
    Executor::new(module).run()
}
