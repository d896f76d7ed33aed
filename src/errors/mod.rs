//! Error types and error handling for the toolchain.
//!
//! Every problem the lexer, parser, analyzer or executor detects is fatal and
//! is reported as a single [`errors::Error`] carrying a source position. This
//! module defines:
//!
//! - The error structure with source position information
//! - Specific error variants for each phase
//! - Diagnostic names and suggestions used when rendering

pub mod errors;

#[cfg(test)]
mod tests;
