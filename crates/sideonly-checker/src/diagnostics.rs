//! Diagnostic context and fix suggestions
//!
//! Turns access denials and symbol loading errors into diagnostics with an
//! explanation, the parents that narrowed the target, and suggested fixes.

use serde::Serialize;
use sideonly_ast::{SideSet, Span};
use sideonly_symbols::SymbolError;

use crate::{CheckError, Denial, DenialReason, SideResolver};

/// A diagnostic with context, suggestions, and explanations
#[derive(Debug, Clone, Serialize)]
pub struct Diagnostic {
    /// The underlying error
    pub error: DiagnosticKind,
    /// Suggested fixes
    pub suggestions: Vec<FixSuggestion>,
    /// Related source locations
    pub related: Vec<RelatedLocation>,
    /// Human-readable explanation of why this error occurred
    pub explanation: String,
    /// Primary source span
    pub span: Span,
    pub severity: Severity,
    /// Error code (e.g., "E-SIDE-001")
    pub code: String,
}

/// Kind of diagnostic
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// A use site or instantiation the context cannot reach
    Access(AccessDiagnostic),
    /// A problem in the loaded symbol graph
    Symbol(SymbolDiagnostic),
}

/// Access-specific diagnostic information
#[derive(Debug, Clone, Serialize)]
pub struct AccessDiagnostic {
    pub error: CheckError,
    pub reason: DenialReason,
    pub target_side: SideSet,
    /// Enclosing method or constructor
    pub context: Option<String>,
    pub context_side: Option<SideSet>,
}

/// Symbol-specific diagnostic information
#[derive(Debug, Clone, Serialize)]
pub struct SymbolDiagnostic {
    pub message: String,
}

/// A suggested fix for an error
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "fix", rename_all = "snake_case")]
pub enum FixSuggestion {
    /// Restrict the enclosing method to the side the target exists on
    AnnotateContext {
        context: String,
        sides: SideSet,
        /// The context declaration
        location: Span,
        /// The annotation to insert above it
        code_snippet: String,
    },
    /// Remove the offending reference
    RemoveReference {
        text: String,
        location: Span,
    },
}

/// A related source location with context
#[derive(Debug, Clone, Serialize)]
pub struct RelatedLocation {
    /// Message explaining the relation
    pub message: String,
    pub span: Span,
    /// Label for the location (e.g., "restricts here")
    pub label: String,
}

/// Severity level of a diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
        }
    }
}

impl Diagnostic {
    /// Create a new diagnostic
    pub fn new(
        error: DiagnosticKind,
        span: Span,
        code: impl Into<String>,
        explanation: impl Into<String>,
    ) -> Self {
        Self {
            error,
            suggestions: Vec::new(),
            related: Vec::new(),
            explanation: explanation.into(),
            span,
            severity: Severity::Error,
            code: code.into(),
        }
    }

    /// Add a fix suggestion
    pub fn with_suggestion(mut self, suggestion: FixSuggestion) -> Self {
        self.suggestions.push(suggestion);
        self
    }

    /// Add a related location
    pub fn with_related(mut self, related: RelatedLocation) -> Self {
        self.related.push(related);
        self
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    /// Get the primary message for this diagnostic
    pub fn message(&self) -> String {
        match &self.error {
            DiagnosticKind::Access(a) => a.error.to_string(),
            DiagnosticKind::Symbol(s) => s.message.clone(),
        }
    }

    /// Format the diagnostic as a simple string
    pub fn format_simple(&self) -> String {
        let mut output = format!(
            "{}[{}]: {}\n",
            self.severity.as_str(),
            self.code,
            self.message()
        );

        if !self.explanation.is_empty() {
            output.push_str(&format!("\nExplanation:\n  {}\n", self.explanation));
        }

        if !self.suggestions.is_empty() {
            output.push_str("\nSuggested fixes:\n");
            for (i, suggestion) in self.suggestions.iter().enumerate() {
                output.push_str(&format!("  {}. {}\n", i + 1, suggestion.description()));
            }
        }

        if !self.related.is_empty() {
            output.push_str("\nRelated locations:\n");
            for related in &self.related {
                output.push_str(&format!(
                    "  - {} (at {}..{})\n",
                    related.message, related.span.start, related.span.end
                ));
            }
        }

        output
    }
}

impl FixSuggestion {
    /// Get a human-readable description of this suggestion
    pub fn description(&self) -> String {
        match self {
            FixSuggestion::AnnotateContext {
                context,
                code_snippet,
                ..
            } => {
                format!("Annotate `{}` with `{}`", context, code_snippet)
            }
            FixSuggestion::RemoveReference { text, .. } => {
                format!("Remove the reference to `{}`", text)
            }
        }
    }

    /// Get the code snippet for this fix (if applicable)
    pub fn code_snippet(&self) -> Option<&str> {
        match self {
            FixSuggestion::AnnotateContext { code_snippet, .. } => Some(code_snippet),
            FixSuggestion::RemoveReference { .. } => None,
        }
    }
}

/// Symbol errors become diagnostics; soft ones are only warnings
impl From<&SymbolError> for Diagnostic {
    fn from(error: &SymbolError) -> Self {
        let explanation = match error {
            SymbolError::UndefinedReference { .. } => {
                "The name does not resolve to any declaration in the graph. The edge is dropped and uses of it are not checked."
            }
            SymbolError::CircularParent { .. } => {
                "Parent edges and lexical nesting must form a tree-like hierarchy without cycles."
            }
            SymbolError::AnnotationNotAllowed { .. } => {
                "Anonymous classes take their side from their supertypes and where they are created."
            }
            _ => "",
        };
        let severity = if error.is_hard_error() {
            Severity::Error
        } else {
            Severity::Warning
        };

        Diagnostic::new(
            DiagnosticKind::Symbol(SymbolDiagnostic {
                message: error.to_string(),
            }),
            error.span(),
            error.code(),
            explanation,
        )
        .with_severity(severity)
    }
}

/// Builder for creating diagnostics from access denials
pub struct AccessDiagnosticBuilder<'r, 'g> {
    resolver: &'r SideResolver<'g>,
    denial: &'r Denial,
    annotation: String,
}

impl<'r, 'g> AccessDiagnosticBuilder<'r, 'g> {
    pub fn new(resolver: &'r SideResolver<'g>, denial: &'r Denial) -> Self {
        Self {
            resolver,
            denial,
            annotation: "SideOnly".to_string(),
        }
    }

    /// Annotation name used in suggested fixes
    pub fn with_annotation(mut self, annotation: impl Into<String>) -> Self {
        self.annotation = annotation.into();
        self
    }

    /// Build the final diagnostic
    pub fn build(self) -> Diagnostic {
        let graph = self.resolver.graph();
        let denial = self.denial;
        let error = denial.error(self.resolver);
        let target = graph.name_of(denial.target);
        let context = denial.context.map(|ctx| graph.name_of(ctx).to_string());

        let explanation = self.explanation(target, context.as_deref());

        let mut diagnostic = Diagnostic::new(
            DiagnosticKind::Access(AccessDiagnostic {
                error: error.clone(),
                reason: denial.reason,
                target_side: denial.target_side,
                context: context.clone(),
                context_side: denial.context_side,
            }),
            denial.span,
            error.code(),
            explanation,
        );

        for (edge, side) in self.resolver.narrowing(denial.target) {
            let Some(parent) = graph.get(edge.target) else {
                continue;
            };
            diagnostic = diagnostic.with_related(RelatedLocation {
                message: format!("{} `{}` exists on {}", edge.kind.describe(), parent.name, side),
                span: parent.span,
                label: "restricts here".to_string(),
            });
        }
        if let (Some(ctx), Some(name)) = (denial.context.and_then(|c| graph.get(c)), &context) {
            if let Some(side) = denial.context_side {
                diagnostic = diagnostic.with_related(RelatedLocation {
                    message: format!("`{}` runs on {}", name, side),
                    span: ctx.span,
                    label: "context".to_string(),
                });
            }
        }

        // Narrowing the context only helps when the two share a side
        if denial.reason == DenialReason::NarrowerThanContext {
            if let (Some(ctx), Some(name)) = (denial.context.and_then(|c| graph.get(c)), &context) {
                let sides = denial
                    .target_side
                    .intersect(denial.context_side.unwrap_or_default());
                diagnostic = diagnostic.with_suggestion(FixSuggestion::AnnotateContext {
                    context: name.clone(),
                    sides,
                    location: ctx.span,
                    code_snippet: format!("@{}({})", self.annotation, sides.annotation_literal()),
                });
            }
        }
        if denial.site.is_some() {
            diagnostic = diagnostic.with_suggestion(FixSuggestion::RemoveReference {
                text: denial.text.clone(),
                location: denial.span,
            });
        }

        diagnostic
    }

    fn explanation(&self, target: &str, context: Option<&str>) -> String {
        let denial = self.denial;
        let context = context.unwrap_or("this initializer");
        let context_side = denial.context_side.unwrap_or_default();

        if denial.site.is_none() && denial.target_side.is_empty() {
            return format!(
                "The anonymous class `{}` can exist on no side: its supertypes exclude each other.",
                target
            );
        }
        if denial.site.is_none() {
            return format!(
                "The anonymous class `{}` can only exist on {}, but it is created in `{}` which runs on {}.",
                target, denial.target_side, context, context_side
            );
        }
        match denial.reason {
            DenialReason::NarrowerThanContext => format!(
                "`{}` runs on {} but `{}` only exists on {}. Code that runs on both sides may only use declarations that exist on both.",
                context, context_side, target, denial.target_side
            ),
            DenialReason::NoCommonSide => format!(
                "`{}` exists on {} while `{}` runs on {}. The two share no side.",
                target, denial.target_side, context, context_side
            ),
            DenialReason::Unreachable => format!(
                "`{}` exists on no side: its annotation and its parents exclude each other.",
                target
            ),
        }
    }
}
