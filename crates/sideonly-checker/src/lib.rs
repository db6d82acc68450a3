//! Sideonly Checker
//!
//! Resolves effective side-sets, validates every use site against its
//! enclosing context, and synthesizes hints for inferred restrictions.

mod diagnostics;
mod hints;
mod resolver;
mod validator;

pub use diagnostics::*;
pub use hints::{Hint, HintOptions, HintSynthesizer};
pub use resolver::SideResolver;
pub use validator::{Access, AccessValidator, Denial, DenialKind, DenialReason};

use std::collections::HashSet;

use serde::Serialize;
use sideonly_symbols::{DeclId, SymbolGraph};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CheckError {
    #[error("can't access side-only `{text}` from here")]
    InaccessibleSide { target: String, text: String },

    #[error("can't access side-only `{text}` from here: anonymous class `{class}` cannot exist in `{context}`")]
    UnreachableInContext {
        class: String,
        text: String,
        context: String,
    },
}

impl CheckError {
    pub fn code(&self) -> &'static str {
        match self {
            CheckError::InaccessibleSide { .. } => "E-SIDE-001",
            CheckError::UnreachableInContext { .. } => "E-SIDE-002",
        }
    }
}

/// Options for a check pass
#[derive(Debug, Clone, Default)]
pub struct CheckOptions {
    /// `None` skips hint synthesis
    pub hints: Option<HintOptions>,
}

/// Result of checking a graph
#[derive(Debug, Default)]
pub struct CheckResult {
    /// Access diagnostics, ordered by position
    pub diagnostics: Vec<Diagnostic>,
    /// Hints in declaration order
    pub hints: Vec<Hint>,
}

impl CheckResult {
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.is_error())
    }
}

/// Check every use site and anonymous instantiation in a graph
pub fn check(graph: &SymbolGraph, options: &CheckOptions) -> CheckResult {
    let resolver = SideResolver::new(graph);
    let validator = AccessValidator::new(&resolver);
    let annotation = options
        .hints
        .as_ref()
        .map(|h| h.annotation.clone())
        .unwrap_or_else(|| HintOptions::default().annotation);

    let site_denials: Vec<Denial> = graph
        .use_sites()
        .filter_map(|site| validator.validate(site).denial().cloned())
        .collect();

    // a denied reference to an anonymous class is already reported on its
    // `new` expression, so its instantiation check adds nothing
    let reported: HashSet<DeclId> = site_denials
        .iter()
        .filter(|denial| denial.kind == DenialKind::UnreachableInContext)
        .map(|denial| denial.target)
        .collect();
    let instantiation_denials = graph
        .anonymous_classes()
        .filter(|anon| !reported.contains(&anon.id))
        .filter_map(|anon| validator.check_instantiation(anon.id).denial().cloned());

    let mut diagnostics: Vec<Diagnostic> = site_denials
        .iter()
        .cloned()
        .chain(instantiation_denials)
        .map(|denial| {
            AccessDiagnosticBuilder::new(&resolver, &denial)
                .with_annotation(annotation.clone())
                .build()
        })
        .collect();
    diagnostics.sort_by_key(|d| (d.span.start, d.span.end));

    let hints = match &options.hints {
        Some(hint_options) => HintSynthesizer::new(&resolver, hint_options.clone()).hints(),
        None => Vec::new(),
    };

    tracing::debug!(
        "checked {} use sites: {} diagnostics, {} hints",
        graph.use_sites().count(),
        diagnostics.len(),
        hints.len()
    );

    CheckResult { diagnostics, hints }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sideonly_ast::{SideSet, Span};
    use sideonly_symbols::{Declaration, UseSite};

    #[test]
    fn check_reports_in_source_order() {
        let mut graph = SymbolGraph::new();
        let c = graph.insert(Declaration::class("C")).unwrap();
        let server = graph
            .insert(Declaration::method("C.server", c).with_sides(SideSet::SERVER))
            .unwrap();
        let client = graph
            .insert(Declaration::method("C.client", c).with_sides(SideSet::CLIENT))
            .unwrap();
        let open = graph.insert(Declaration::method("C.open", c)).unwrap();
        graph.add_use(UseSite::call("server()", Some(server), Some(client)).at(Span::new(50, 58)));
        graph.add_use(UseSite::call("server()", Some(server), Some(open)).at(Span::new(20, 28)));
        graph.add_use(UseSite::call("open()", Some(open), Some(client)).at(Span::new(30, 36)));

        let result = check(&graph, &CheckOptions::default());
        assert!(result.has_errors());
        let spans: Vec<_> = result.errors().map(|d| d.span.start).collect();
        assert_eq!(spans, vec![20, 50]);
        assert!(result.hints.is_empty());
    }

    #[test]
    fn anonymous_reference_and_instantiation_reported_once() {
        let mut graph = SymbolGraph::new();
        let client_api = graph
            .insert(Declaration::interface("ClientApi").with_sides(SideSet::CLIENT))
            .unwrap();
        let c = graph.insert(Declaration::class("C")).unwrap();
        let server = graph
            .insert(Declaration::method("C.server", c).with_sides(SideSet::SERVER))
            .unwrap();
        let anon = graph
            .insert(
                Declaration::anonymous("C.server$1", server, Span::new(12, 21))
                    .implements(client_api),
            )
            .unwrap();
        graph.add_use(UseSite::construction("ClientApi", Some(anon), None, Some(server)).at(Span::new(8, 21)));

        let result = check(&graph, &CheckOptions::default());
        assert_eq!(result.diagnostics.len(), 1);
        let diag = &result.diagnostics[0];
        assert_eq!(diag.code, "E-SIDE-002");
        assert_eq!(diag.span, Span::new(12, 21));
        assert_eq!(
            diag.message(),
            "can't access side-only `ClientApi` from here: anonymous class `C.server$1` cannot exist in `C.server`"
        );
    }

    #[test]
    fn sites_without_spans_are_reported_separately() {
        let mut graph = SymbolGraph::new();
        let c = graph.insert(Declaration::class("C")).unwrap();
        let a = graph
            .insert(Declaration::method("C.a", c).with_sides(SideSet::SERVER))
            .unwrap();
        let b = graph
            .insert(Declaration::method("C.b", c).with_sides(SideSet::CLIENT))
            .unwrap();
        let open = graph.insert(Declaration::method("C.open", c)).unwrap();
        graph.add_use(UseSite::call("a()", Some(a), Some(open)));
        graph.add_use(UseSite::call("b()", Some(b), Some(open)));

        let result = check(&graph, &CheckOptions::default());
        assert_eq!(result.diagnostics.len(), 2);
        assert!(result.diagnostics.iter().all(|d| d.span.is_dummy()));
        let messages: Vec<_> = result.diagnostics.iter().map(Diagnostic::message).collect();
        assert!(messages.contains(&"can't access side-only `a()` from here".to_string()));
        assert!(messages.contains(&"can't access side-only `b()` from here".to_string()));
    }

    #[test]
    fn anonymous_class_with_conflicting_interfaces_is_reported() {
        let mut graph = SymbolGraph::new();
        let i = graph
            .insert(Declaration::interface("I").with_sides(SideSet::CLIENT))
            .unwrap();
        let j = graph
            .insert(Declaration::interface("J").with_sides(SideSet::SERVER))
            .unwrap();
        let c = graph.insert(Declaration::class("C")).unwrap();
        let m = graph.insert(Declaration::method("C.m", c)).unwrap();
        graph
            .insert(
                Declaration::anonymous("C.m$1", m, Span::new(5, 6))
                    .implements(i)
                    .implements(j),
            )
            .unwrap();

        let result = check(&graph, &CheckOptions::default());
        assert_eq!(result.diagnostics.len(), 1);
        let diag = &result.diagnostics[0];
        assert_eq!(diag.code, "E-SIDE-002");
        assert_eq!(diag.span, Span::new(5, 6));
        assert!(diag.explanation.contains("supertypes exclude each other"));
    }

    #[test]
    fn hints_are_collected_when_enabled() {
        let mut graph = SymbolGraph::new();
        let a = graph
            .insert(Declaration::class("A").with_sides(SideSet::SERVER))
            .unwrap();
        graph.insert(Declaration::class("B").extends(a)).unwrap();

        let options = CheckOptions {
            hints: Some(HintOptions::default()),
        };
        let result = check(&graph, &options);
        assert!(!result.has_errors());
        assert_eq!(result.hints.len(), 1);
        assert_eq!(result.hints[0].text, "@SideOnly({Side.SERVER})");
    }

    #[test]
    fn error_codes() {
        let err = CheckError::InaccessibleSide {
            target: "C.m".into(),
            text: "m()".into(),
        };
        assert_eq!(err.code(), "E-SIDE-001");
        assert_eq!(err.to_string(), "can't access side-only `m()` from here");
    }

    #[test]
    fn components_are_shareable() {
        fn assert_sync<T: Send + Sync>() {}
        assert_sync::<SymbolGraph>();
        assert_sync::<AccessValidator<'static, 'static>>();
        assert_sync::<HintSynthesizer<'static, 'static>>();
    }
}
