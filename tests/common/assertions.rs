use sideonly::ast::{SideSet, Span};
use sideonly::checker::{CheckResult, Diagnostic, SideResolver};
use sideonly::symbols::SymbolGraph;

/// Assert the effective side of a named declaration
pub fn assert_side(graph: &SymbolGraph, name: &str, expected: SideSet) {
    let id = graph
        .id_of(name)
        .unwrap_or_else(|| panic!("Expected declaration: {}", name));
    let actual = SideResolver::new(graph).effective_side(id);
    assert_eq!(actual, expected, "effective side of `{}`", name);
}

/// Assert a diagnostic with the given code starts at the given span
pub fn assert_diagnostic<'a>(result: &'a CheckResult, code: &str, span: Span) -> &'a Diagnostic {
    result
        .diagnostics
        .iter()
        .find(|d| d.code == code && d.span == span)
        .unwrap_or_else(|| {
            panic!(
                "Expected {} at {}..{}, got: {:?}",
                code,
                span.start,
                span.end,
                result.diagnostics.iter().map(|d| (&d.code, d.span)).collect::<Vec<_>>()
            )
        })
}

/// Span of the `n`th occurrence (1-based) of `needle` in `source`
pub fn span_of(source: &str, needle: &str, n: usize) -> Span {
    let start = source
        .match_indices(needle)
        .nth(n - 1)
        .map(|(i, _)| i)
        .unwrap_or_else(|| panic!("`{}` occurs fewer than {} times", needle, n));
    Span::new(start, start + needle.len())
}
