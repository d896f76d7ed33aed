use crate::Span;

use super::{expressions::Expr, statements::Stmt, types::Type};

/// A function parameter. Parameters behave like local variants of the
/// function body.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub name: String,
    pub param_type: Type,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDecl {
    pub name: String,
    pub return_type: Type,
    pub parameters: Vec<Parameter>,
    pub body: Vec<Stmt>,
    pub exported: bool,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VariableDecl {
    pub name: String,
    pub var_type: Type,
    pub init: Option<Expr>,
    pub exported: bool,
    pub span: Span,
}

/// A top-level or local declaration.
#[derive(Debug, Clone, PartialEq)]
pub enum Declaration {
    Function(FunctionDecl),
    Variable(VariableDecl),
}

impl Declaration {
    pub fn name(&self) -> &str {
        match self {
            Declaration::Function(function) => &function.name,
            Declaration::Variable(variable) => &variable.name,
        }
    }

    pub fn span(&self) -> &Span {
        match self {
            Declaration::Function(function) => &function.span,
            Declaration::Variable(variable) => &variable.span,
        }
    }
}

/// A parsed source file.
///
/// `declarations` keeps source order. `functions` holds the indices of the
/// function declarations, also in source order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Module {
    pub declarations: Vec<Declaration>,
    pub functions: Vec<usize>,
}

impl Module {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, declaration: Declaration) {
        if matches!(declaration, Declaration::Function(_)) {
            self.functions.push(self.declarations.len());
        }
        self.declarations.push(declaration);
    }

    pub fn functions(&self) -> impl Iterator<Item = &FunctionDecl> {
        self.functions
            .iter()
            .filter_map(|index| match &self.declarations[*index] {
                Declaration::Function(function) => Some(function),
                Declaration::Variable(_) => None,
            })
    }

    pub fn variables(&self) -> impl Iterator<Item = &VariableDecl> {
        self.declarations.iter().filter_map(|declaration| match declaration {
            Declaration::Variable(variable) => Some(variable),
            Declaration::Function(_) => None,
        })
    }

    /// First function declared with `name`.
    pub fn find_function(&self, name: &str) -> Option<&FunctionDecl> {
        self.functions().find(|function| function.name == name)
    }
}
