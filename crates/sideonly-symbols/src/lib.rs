//! sideonly-symbols: the resolved symbol graph
//!
//! This crate owns the data the side checker runs over:
//! - Declarations as a tagged variant with explicit structural parent edges
//! - Use sites (references, calls, constructions) with their resolved targets
//! - Loading the JSON interchange format a resolution front end emits
//! - Validating that parent edges and lexical nesting are acyclic
//!
//! # Example
//!
//! ```
//! use sideonly_symbols::{load, LoadOptions};
//!
//! let json = r#"{
//!   "declarations": [
//!     { "name": "Packet", "kind": "class", "annotation": "{Side.SERVER}" },
//!     { "name": "Packet.encode", "kind": "method", "parent": "Packet" }
//!   ]
//! }"#;
//!
//! let result = load(json, &LoadOptions::default()).unwrap();
//! assert_eq!(result.graph.len(), 2);
//! ```

mod cycle;
mod error;
mod graph;
mod interchange;
mod loader;
mod symbol;

pub use cycle::CycleDetector;
pub use error::SymbolError;
pub use graph::{SymbolGraph, SymbolResult};
pub use interchange::{DeclEntry, GraphFile, UseEntry};
pub use loader::{GraphLoader, LoadOptions, DEFAULT_ROOT_CLASS};
pub use symbol::{
    DeclId, DeclKind, DeclNode, Declaration, EdgeKind, ParentEdge, UseKind, UseSite, UseSiteId,
};

/// Load a symbol graph from interchange JSON
///
/// # Returns
/// * `Ok(SymbolResult)` - Graph with deferred errors (if any)
/// * `Err(Vec<SymbolError>)` - Hard errors that prevent checking
pub fn load(json: &str, options: &LoadOptions) -> Result<SymbolResult, Vec<SymbolError>> {
    let file: GraphFile = serde_json::from_str(json).map_err(|e| {
        vec![SymbolError::Json {
            message: e.to_string(),
        }]
    })?;
    build_graph(&file, options)
}

/// Build a symbol graph from an already-deserialized interchange file
pub fn build_graph(file: &GraphFile, options: &LoadOptions) -> Result<SymbolResult, Vec<SymbolError>> {
    let (graph, deferred_errors) = GraphLoader::new(options).load(file)?;

    validate(&graph)?;

    Ok(SymbolResult {
        graph,
        source: file.source.clone(),
        deferred_errors,
    })
}

/// Check that a graph is safe to resolve: no cycles through parent edges or
/// lexical nesting
pub fn validate(graph: &SymbolGraph) -> Result<(), Vec<SymbolError>> {
    let cycle_errors = CycleDetector::detect_cycles(graph);
    if cycle_errors.is_empty() {
        Ok(())
    } else {
        Err(cycle_errors)
    }
}
