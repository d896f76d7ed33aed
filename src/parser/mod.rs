//! Parser module for building an Abstract Syntax Tree (AST).
//!
//! This module contains the parser that transforms a stream of tokens
//! into a `Module`. It uses a Pratt parser for expressions with proper
//! operator precedence and handles:
//!
//! - Top-level and local declarations (functions, variants)
//! - Statements (assignment, increment, if/else, return, blocks)
//! - Expressions (unary, binary, logical, conditional, calls, literals)
//!
//! The parser uses NUD (null denotation) and LED (left denotation) functions
//! for expression parsing with binding power for precedence handling.

pub mod expr;
pub mod lookups;
pub mod parser;
pub mod stmt;
pub mod types;

#[cfg(test)]
mod tests;
