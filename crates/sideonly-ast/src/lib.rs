//! sideonly AST - Core value types shared by the whole workspace
//!
//! This crate defines the build-variant sides a declaration may exist on,
//! the side-set algebra used to combine them, the annotation reader, and
//! spans for source locations.

mod annotation;
mod side;
mod span;

pub use annotation::*;
pub use side::*;
pub use span::*;
