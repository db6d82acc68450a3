//! End-to-end tests over the network fixture
//!
//! The fixture graph describes tests/fixtures/Network.java, so every span
//! asserted here can be located in that source.

mod common;

use common::assertions::{assert_diagnostic, assert_side, span_of};
use common::fixtures::{load_fixture, load_graph};
use sideonly::ast::SideSet;
use sideonly::checker::{DenialReason, DiagnosticKind, FixSuggestion, HintOptions};
use sideonly::{check, CheckOptions};

fn check_network() -> sideonly::CheckResult {
    let symbols = load_graph("network.json");
    let options = CheckOptions {
        hints: Some(HintOptions::default()),
    };
    check(&symbols.graph, &options)
}

#[test]
fn e2e_fixture_loads_cleanly() {
    let symbols = load_graph("network.json");
    assert!(symbols.deferred_errors.is_empty());
    assert_eq!(symbols.graph.len(), 21);
    assert_eq!(symbols.graph.use_sites().count(), 7);
    assert_eq!(
        symbols.source.as_deref().and_then(|p| p.to_str()),
        Some("Network.java")
    );
}

#[test]
fn e2e_effective_sides() {
    let symbols = load_graph("network.json");
    let graph = &symbols.graph;

    assert_side(graph, "Runnable", SideSet::BOTH);
    assert_side(graph, "ServerWorld.tick", SideSet::SERVER);
    assert_side(graph, "Inherited", SideSet::SERVER);
    assert_side(graph, "Inherited.save", SideSet::SERVER);
    assert_side(graph, "Packet.encode", SideSet::BOTH);
    assert_side(graph, "Packet.display$1", SideSet::CLIENT);
    assert_side(graph, "Packet.display$1.draw", SideSet::CLIENT);
    assert_side(graph, "Packet.schedule$1", SideSet::BOTH);
    assert_side(graph, "Packet.preview$1", SideSet::EMPTY);
    assert_side(graph, "ServerPacket.handle", SideSet::BOTH);
}

#[test]
fn e2e_diagnostics() {
    let source = load_fixture("Network.java");
    let result = check_network();

    assert_eq!(result.diagnostics.len(), 3, "{:#?}", result.diagnostics);
    assert!(result.has_errors());

    // unrestricted `encode` calls a server-only method
    let call = assert_diagnostic(&result, "E-SIDE-001", span_of(&source, "apply(null)", 1));
    assert_eq!(call.message(), "can't access side-only `apply(null)` from here");
    match &call.error {
        DiagnosticKind::Access(access) => {
            assert_eq!(access.reason, DenialReason::NarrowerThanContext);
            assert_eq!(access.context.as_deref(), Some("Packet.encode"));
        }
        other => panic!("unexpected diagnostic kind: {:?}", other),
    }
    assert!(matches!(
        &call.suggestions[0],
        FixSuggestion::AnnotateContext { code_snippet, .. } if code_snippet == "@SideOnly({Side.SERVER})"
    ));

    // a server method names a client-only type
    let reference = assert_diagnostic(&result, "E-SIDE-001", span_of(&source, "Renderer", 4));
    assert!(reference.explanation.contains("share no side"));

    // and instantiates it anonymously
    let new_expr = assert_diagnostic(&result, "E-SIDE-002", span_of(&source, "Renderer", 5));
    assert!(new_expr.message().contains("Packet.preview$1"));
}

#[test]
fn e2e_diagnostics_in_source_order() {
    let result = check_network();
    let starts: Vec<_> = result.diagnostics.iter().map(|d| d.span.start).collect();
    let mut sorted = starts.clone();
    sorted.sort_unstable();
    assert_eq!(starts, sorted);
}

#[test]
fn e2e_hints() {
    let symbols = load_graph("network.json");
    let result = check_network();
    let hinted: Vec<(&str, &str, usize)> = result
        .hints
        .iter()
        .map(|h| (symbols.graph.name_of(h.decl), h.text.as_str(), h.depth))
        .collect();

    assert_eq!(
        hinted,
        vec![
            ("ServerWorld.tick", "@SideOnly({Side.SERVER})", 1),
            ("Renderer.draw", "@SideOnly({Side.CLIENT})", 1),
            ("Packet.display$1", "@SideOnly({Side.CLIENT})", 2),
            ("Packet.preview$1", "@SideOnly({})", 2),
            ("Inherited", "@SideOnly({Side.SERVER})", 0),
            ("Inherited.save", "@SideOnly({Side.SERVER})", 1),
        ]
    );
}

#[test]
fn e2e_hints_disabled() {
    let symbols = load_graph("network.json");
    let result = check(&symbols.graph, &CheckOptions::default());
    assert!(result.hints.is_empty());
    assert_eq!(result.diagnostics.len(), 3);
}

#[test]
fn e2e_json_report_round_trips_through_serde() {
    let result = check_network();
    let json = serde_json::to_value(&result.diagnostics).unwrap();
    let codes: Vec<_> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["code"].as_str().unwrap())
        .collect();
    assert_eq!(codes, vec!["E-SIDE-001", "E-SIDE-001", "E-SIDE-002"]);
}
