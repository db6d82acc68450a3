//! JSON interchange format emitted by a source-resolution front end
//!
//! Declarations and use sites refer to each other by name; the loader
//! resolves names into [`DeclId`](crate::DeclId)s.

use crate::{DeclKind, UseKind};
use serde::{Deserialize, Serialize};
use sideonly_ast::Span;
use std::path::PathBuf;

/// A whole resolved program
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GraphFile {
    /// Source file the spans point into, relative to the graph file
    #[serde(default)]
    pub source: Option<PathBuf>,

    #[serde(default)]
    pub declarations: Vec<DeclEntry>,

    #[serde(default)]
    pub use_sites: Vec<UseEntry>,
}

/// One declaration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeclEntry {
    pub name: String,

    pub kind: DeclKind,

    #[serde(default)]
    pub span: Span,

    /// Raw text of the `@SideOnly` value attribute
    #[serde(default)]
    pub annotation: Option<String>,

    /// Innermost lexically enclosing declaration
    #[serde(default)]
    pub parent: Option<String>,

    /// Classes only; the root class name is accepted and ignored
    #[serde(default)]
    pub superclass: Option<String>,

    /// Implemented interfaces (classes) or extended interfaces (interfaces)
    #[serde(default)]
    pub interfaces: Vec<String>,

    /// Anonymous classes only: the type named in the `new` expression
    #[serde(default)]
    pub supertypes: Vec<String>,

    /// Anonymous classes only: span of the `new` expression's type reference
    #[serde(default)]
    pub instantiation: Option<Span>,
}

/// One reference, call or construction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UseEntry {
    pub kind: UseKind,

    pub text: String,

    #[serde(default)]
    pub span: Span,

    #[serde(default)]
    pub target: Option<String>,

    #[serde(default)]
    pub scope: Option<String>,

    #[serde(default)]
    pub constructor: Option<String>,
}
