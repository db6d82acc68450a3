//! Effective side resolution
//!
//! The effective side-set of a declaration is its own annotation (or the
//! full set when it has none) intersected with the effective side-sets of
//! all its structural parents. Results are memoized for the lifetime of the
//! resolver, which borrows the graph and so cannot outlive a change to it.

use std::collections::HashMap;

use parking_lot::RwLock;
use sideonly_ast::SideSet;
use sideonly_symbols::{DeclId, ParentEdge, SymbolGraph};

/// Declarations being resolved, outermost first
#[derive(Default)]
struct Walk {
    stack: Vec<DeclId>,
    /// Whether the current frame's parents reached a declaration on the stack
    cyclic: bool,
}

/// Memoizing side resolver for one analysis pass
///
/// Safe to share between threads: the cache only ever receives the same
/// value for the same key, so racing writers are harmless.
pub struct SideResolver<'g> {
    graph: &'g SymbolGraph,
    cache: RwLock<HashMap<DeclId, SideSet>>,
}

impl<'g> SideResolver<'g> {
    pub fn new(graph: &'g SymbolGraph) -> Self {
        Self {
            graph,
            cache: RwLock::new(HashMap::new()),
        }
    }

    pub fn graph(&self) -> &'g SymbolGraph {
        self.graph
    }

    /// The side-set a declaration may exist on
    ///
    /// Unknown IDs resolve to the full set. A cycle met along the way
    /// contributes no constraint, and nothing on a cyclic path is memoized.
    pub fn effective_side(&self, id: DeclId) -> SideSet {
        self.resolve(id, &mut Walk::default())
    }

    fn resolve(&self, id: DeclId, walk: &mut Walk) -> SideSet {
        if let Some(&side) = self.cache.read().get(&id) {
            return side;
        }
        let Some(decl) = self.graph.get(id) else {
            return SideSet::BOTH;
        };
        if walk.stack.contains(&id) {
            tracing::warn!("cycle through `{}` while resolving sides", decl.name);
            walk.cyclic = true;
            return SideSet::BOTH;
        }

        let outer_cyclic = std::mem::take(&mut walk.cyclic);
        walk.stack.push(id);
        let mut side = decl.own_sides().unwrap_or(SideSet::BOTH);
        for edge in decl.parents() {
            if side.is_empty() {
                break;
            }
            side = side.intersect(self.resolve(edge.target, walk));
        }
        walk.stack.pop();

        tracing::debug!("effective side of `{}` is {}", decl.name, side);
        if !walk.cyclic {
            self.cache.write().insert(id, side);
        }
        walk.cyclic |= outer_cyclic;
        side
    }

    /// Intersection over an anonymous class's (or any class's) supertypes
    /// alone, ignoring its own annotation, context and enclosing class
    pub fn supertype_side(&self, id: DeclId) -> SideSet {
        let Some(decl) = self.graph.get(id) else {
            return SideSet::BOTH;
        };
        decl.node
            .supertypes()
            .into_iter()
            .fold(SideSet::BOTH, |side, parent| {
                side.intersect(self.effective_side(parent))
            })
    }

    /// Parent edges that restrict a declaration, with their effective sides
    pub fn narrowing(&self, id: DeclId) -> Vec<(ParentEdge, SideSet)> {
        let Some(decl) = self.graph.get(id) else {
            return Vec::new();
        };
        decl.parents()
            .into_iter()
            .map(|edge| (edge, self.effective_side(edge.target)))
            .filter(|(_, side)| !side.is_unrestricted())
            .collect()
    }

    /// Number of memoized declarations
    pub fn cached(&self) -> usize {
        self.cache.read().len()
    }

    /// Drop all memoized results
    pub fn clear(&mut self) {
        self.cache.get_mut().clear();
    }
}
