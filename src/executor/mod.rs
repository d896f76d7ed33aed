//! Tree-walking interpreter over an analyzed `Module`.

pub mod executor;

#[cfg(test)]
mod tests;
