//! Symbol graph data structure

use crate::{DeclId, DeclKind, Declaration, SymbolError, UseSite, UseSiteId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// The resolved declarations and use sites of one program
///
/// Built once, validated, then only read for the rest of an analysis pass.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct SymbolGraph {
    /// All declarations indexed by numeric ID
    declarations: Vec<Declaration>,

    /// Name to ID mapping for lookup
    by_name: HashMap<String, DeclId>,

    /// All use sites indexed by numeric ID
    use_sites: Vec<UseSite>,
}

impl SymbolGraph {
    /// Create a new empty symbol graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a new declaration, returning error if the name is taken
    pub fn insert(&mut self, mut decl: Declaration) -> Result<DeclId, SymbolError> {
        if self.by_name.contains_key(&decl.name) {
            return Err(SymbolError::DuplicateName {
                name: decl.name.clone(),
                span: decl.span,
            });
        }

        let id = DeclId(self.declarations.len() as u32);
        decl.id = id;
        self.by_name.insert(decl.name.clone(), id);
        self.declarations.push(decl);
        Ok(id)
    }

    /// Record a use site
    pub fn add_use(&mut self, mut site: UseSite) -> UseSiteId {
        let id = UseSiteId(self.use_sites.len() as u32);
        site.id = id;
        self.use_sites.push(site);
        id
    }

    /// Get a declaration by ID
    pub fn get(&self, id: DeclId) -> Option<&Declaration> {
        self.declarations.get(id.0 as usize)
    }

    /// Get a declaration by name
    pub fn get_by_name(&self, name: &str) -> Option<&Declaration> {
        self.by_name.get(name).and_then(|id| self.get(*id))
    }

    /// Get the ID for a declaration name
    pub fn id_of(&self, name: &str) -> Option<DeclId> {
        self.by_name.get(name).copied()
    }

    /// Name of a declaration, or `?` for unknown IDs
    pub fn name_of(&self, id: DeclId) -> &str {
        self.get(id).map(|d| d.name.as_str()).unwrap_or("?")
    }

    pub fn kind_of(&self, id: DeclId) -> Option<DeclKind> {
        self.get(id).map(Declaration::kind)
    }

    /// Get a use site by ID
    pub fn use_site(&self, id: UseSiteId) -> Option<&UseSite> {
        self.use_sites.get(id.0 as usize)
    }

    /// Iterate over all declarations
    pub fn iter(&self) -> impl Iterator<Item = &Declaration> {
        self.declarations.iter()
    }

    /// Iterate over all use sites
    pub fn use_sites(&self) -> impl Iterator<Item = &UseSite> {
        self.use_sites.iter()
    }

    /// Get all anonymous classes
    pub fn anonymous_classes(&self) -> impl Iterator<Item = &Declaration> {
        self.declarations
            .iter()
            .filter(|d| d.kind() == DeclKind::AnonymousClass)
    }

    /// Get the number of declarations in the graph
    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    /// Check if the graph has no declarations
    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    /// Lexical ancestors of a declaration, innermost first, excluding itself
    pub fn ancestors(&self, id: DeclId) -> impl Iterator<Item = &Declaration> + '_ {
        let mut next = self.get(id).and_then(|d| d.parent);
        std::iter::from_fn(move || {
            let decl = self.get(next?)?;
            next = decl.parent;
            Some(decl)
        })
        // bounded in case a malformed graph was never validated
        .take(self.len())
    }

    /// Innermost method or constructor enclosing code at `scope`, including
    /// `scope` itself
    pub fn executable_context(&self, scope: DeclId) -> Option<DeclId> {
        let decl = self.get(scope)?;
        if decl.kind().is_executable() {
            return Some(scope);
        }
        self.enclosing_method(scope)
    }

    /// Innermost method or constructor strictly enclosing a declaration
    pub fn enclosing_method(&self, id: DeclId) -> Option<DeclId> {
        self.ancestors(id)
            .find(|d| d.kind().is_executable())
            .map(|d| d.id)
    }

    /// The class-like declaration lexically containing this one, if its
    /// direct parent is one
    pub fn containing_class(&self, id: DeclId) -> Option<&Declaration> {
        let parent = self.get(id)?.parent?;
        self.get(parent).filter(|p| p.kind().is_class_like())
    }

    /// Lexical nesting depth: the number of enclosing classes and methods.
    /// Fields do not indent what their initializers declare.
    pub fn depth(&self, id: DeclId) -> usize {
        self.ancestors(id)
            .filter(|d| d.kind().is_class_like() || d.kind().is_executable())
            .count()
    }
}

/// Result of symbol graph loading
#[derive(Debug)]
pub struct SymbolResult {
    /// The loaded symbol graph
    pub graph: SymbolGraph,
    /// Source file the graph was resolved from, if the input names one
    pub source: Option<PathBuf>,
    /// Soft errors (unresolved references whose edges were dropped)
    pub deferred_errors: Vec<SymbolError>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use sideonly_ast::Span;

    #[test]
    fn duplicate_names_are_rejected() {
        let mut graph = SymbolGraph::new();
        graph.insert(Declaration::class("A")).unwrap();
        let err = graph.insert(Declaration::class("A")).unwrap_err();
        assert_eq!(err.code(), "E-SYMBOL-002");
        assert_eq!(graph.len(), 1);
    }

    #[test]
    fn executable_context_walks_outward() {
        let mut graph = SymbolGraph::new();
        let class = graph.insert(Declaration::class("C")).unwrap();
        let method = graph.insert(Declaration::method("C.m", class)).unwrap();
        let anon = graph
            .insert(Declaration::anonymous("C.m$1", method, Span::dummy()))
            .unwrap();
        let inner = graph.insert(Declaration::method("C.m$1.run", anon)).unwrap();
        let field = graph.insert(Declaration::field("C.f", class)).unwrap();

        assert_eq!(graph.executable_context(inner), Some(inner));
        assert_eq!(graph.enclosing_method(inner), Some(method));
        assert_eq!(graph.executable_context(anon), Some(method));
        assert_eq!(graph.executable_context(field), None);
    }

    #[test]
    fn depth_counts_lexical_ancestors() {
        let mut graph = SymbolGraph::new();
        let outer = graph.insert(Declaration::class("O")).unwrap();
        let inner = graph
            .insert(Declaration::class("O.I").nested_in(outer))
            .unwrap();
        let method = graph.insert(Declaration::method("O.I.m", inner)).unwrap();
        let anon = graph
            .insert(Declaration::anonymous("O.I.m$1", method, Span::dummy()))
            .unwrap();

        assert_eq!(graph.depth(outer), 0);
        assert_eq!(graph.depth(method), 2);
        assert_eq!(graph.depth(anon), 3);
        assert_eq!(graph.containing_class(method).map(|d| d.id), Some(inner));
        assert!(graph.containing_class(anon).is_none());
    }

    #[test]
    fn depth_skips_field_initializers() {
        let mut graph = SymbolGraph::new();
        let class = graph.insert(Declaration::class("C")).unwrap();
        let field = graph.insert(Declaration::field("C.f", class)).unwrap();
        let anon = graph
            .insert(Declaration::anonymous("C.f$1", field, Span::dummy()))
            .unwrap();
        let method = graph.insert(Declaration::method("C.f$1.run", anon)).unwrap();

        assert_eq!(graph.depth(field), 1);
        assert_eq!(graph.depth(anon), 1);
        assert_eq!(graph.depth(method), 2);
    }
}
