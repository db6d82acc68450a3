//! Sideonly - client/server side restriction checking
//!
//! This is the root workspace crate that provides integration tests.
//! The actual implementation is in the workspace member crates.

// Re-export main crates for convenience
pub use sideonly_ast as ast;
pub use sideonly_checker as checker;
pub use sideonly_symbols as symbols;

pub use sideonly_checker::{check, CheckOptions, CheckResult};
pub use sideonly_symbols::{load, LoadOptions};
