//! Cycle detection for declaration structure
//!
//! Side resolution recurses through parent edges and context lookup walks
//! lexical parents, so both relations must be acyclic. A well-formed host
//! graph never has cycles; hand-written interchange files might.

use crate::{DeclId, SymbolError, SymbolGraph};
use std::collections::HashMap;

/// Visit state for DFS cycle detection
#[derive(Clone, Copy, PartialEq, Eq)]
enum VisitState {
    NotVisited,
    InProgress,
    Completed,
}

/// Detects cycles through structural and lexical parent links
pub struct CycleDetector;

impl CycleDetector {
    /// Returns one error per cycle found
    pub fn detect_cycles(graph: &SymbolGraph) -> Vec<SymbolError> {
        let mut errors = Vec::new();
        let mut state: HashMap<DeclId, VisitState> = graph
            .iter()
            .map(|d| (d.id, VisitState::NotVisited))
            .collect();
        let mut path: Vec<DeclId> = Vec::new();

        for decl in graph.iter() {
            if state[&decl.id] == VisitState::NotVisited {
                if let Some(cycle) = Self::visit(graph, decl.id, &mut state, &mut path) {
                    errors.push(cycle);
                }
                path.clear();
            }
        }

        errors
    }

    fn successors(graph: &SymbolGraph, node: DeclId) -> Vec<DeclId> {
        let Some(decl) = graph.get(node) else {
            return Vec::new();
        };
        let mut next: Vec<DeclId> = decl.parents().into_iter().map(|e| e.target).collect();
        next.extend(decl.parent);
        next
    }

    /// DFS visit, returns Some(error) if cycle detected
    fn visit(
        graph: &SymbolGraph,
        node: DeclId,
        state: &mut HashMap<DeclId, VisitState>,
        path: &mut Vec<DeclId>,
    ) -> Option<SymbolError> {
        state.insert(node, VisitState::InProgress);
        path.push(node);

        let span = graph.get(node)?.span;

        for parent in Self::successors(graph, node) {
            match state.get(&parent) {
                Some(VisitState::InProgress) => {
                    let cycle_start = path.iter().position(|&id| id == parent)?;
                    let cycle_path: Vec<&str> = path[cycle_start..]
                        .iter()
                        .map(|id| graph.name_of(*id))
                        .collect();

                    let cycle = format!("{} -> {}", cycle_path.join(" -> "), graph.name_of(parent));
                    return Some(SymbolError::CircularParent { cycle, span });
                }
                Some(VisitState::NotVisited) => {
                    if let Some(err) = Self::visit(graph, parent, state, path) {
                        return Some(err);
                    }
                }
                // Completed, or an ID outside the graph
                _ => {}
            }
        }

        path.pop();
        state.insert(node, VisitState::Completed);
        None
    }
}
