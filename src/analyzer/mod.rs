//! Semantic analysis: scoping, typing and return completeness.

pub mod analyzer;
