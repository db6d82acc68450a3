//! Error types for symbol graph loading

use sideonly_ast::Span;
use thiserror::Error;

/// Errors from loading and validating a symbol graph
#[derive(Debug, Clone, Error)]
pub enum SymbolError {
    /// E-SYMBOL-000: Interchange input is not valid JSON for the graph format
    #[error("malformed symbol graph: {message}")]
    Json { message: String },

    /// E-SYMBOL-001: Undefined reference (soft error, the edge is dropped)
    #[error("undefined reference: {name}")]
    UndefinedReference {
        name: String,
        span: Span,
        /// The declaration or use site containing the unresolved reference
        referrer: String,
    },

    /// E-SYMBOL-002: Duplicate declaration name (hard error)
    #[error("duplicate declaration: {name}")]
    DuplicateName { name: String, span: Span },

    /// E-SYMBOL-003: Cycle through parent edges (hard error)
    #[error("circular declaration structure: {cycle}")]
    CircularParent {
        /// Full cycle path, e.g., "A -> B -> A"
        cycle: String,
        span: Span,
    },

    /// E-SYMBOL-004: Enclosing declaration not found (hard error)
    #[error("unknown enclosing declaration `{parent}` for `{child}`")]
    UnknownParent {
        parent: String,
        child: String,
        span: Span,
    },

    /// E-SYMBOL-005: Member declared outside a class (hard error)
    #[error("{kind} `{name}` must be declared inside a class, found `{parent}`")]
    MisplacedMember {
        name: String,
        kind: &'static str,
        parent: String,
        span: Span,
    },

    /// E-SYMBOL-006: Anonymous classes have no annotation slot (hard error)
    #[error("anonymous class `{name}` cannot carry @SideOnly")]
    AnnotationNotAllowed { name: String, span: Span },
}

impl SymbolError {
    /// Get the source span of this error
    pub fn span(&self) -> Span {
        match self {
            SymbolError::Json { .. } => Span::dummy(),
            SymbolError::UndefinedReference { span, .. } => *span,
            SymbolError::DuplicateName { span, .. } => *span,
            SymbolError::CircularParent { span, .. } => *span,
            SymbolError::UnknownParent { span, .. } => *span,
            SymbolError::MisplacedMember { span, .. } => *span,
            SymbolError::AnnotationNotAllowed { span, .. } => *span,
        }
    }

    /// Whether this error prevents the graph from being checked
    pub fn is_hard_error(&self) -> bool {
        !matches!(self, SymbolError::UndefinedReference { .. })
    }

    /// Error code for machine-readable output
    pub fn code(&self) -> &'static str {
        match self {
            SymbolError::Json { .. } => "E-SYMBOL-000",
            SymbolError::UndefinedReference { .. } => "E-SYMBOL-001",
            SymbolError::DuplicateName { .. } => "E-SYMBOL-002",
            SymbolError::CircularParent { .. } => "E-SYMBOL-003",
            SymbolError::UnknownParent { .. } => "E-SYMBOL-004",
            SymbolError::MisplacedMember { .. } => "E-SYMBOL-005",
            SymbolError::AnnotationNotAllowed { .. } => "E-SYMBOL-006",
        }
    }
}
