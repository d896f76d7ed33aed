//! C code generation for analyzed modules.

pub mod generator;

#[cfg(test)]
mod tests;
