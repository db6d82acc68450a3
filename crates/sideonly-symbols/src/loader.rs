//! Building a symbol graph from the interchange format
//!
//! Pass 1 assigns an ID to every declaration name. Pass 2 derives each
//! declaration's structural edges from its kind and lexical parent and
//! resolves every name reference. Unknown supertypes and use-site targets
//! are soft errors; everything that makes the structure ambiguous is hard.

use crate::interchange::{DeclEntry, GraphFile, UseEntry};
use crate::{DeclId, DeclKind, DeclNode, Declaration, SymbolError, SymbolGraph, UseSite};
use sideonly_ast::SideAnnotation;
use std::collections::HashMap;

/// Name of the universal root class when none is configured
pub const DEFAULT_ROOT_CLASS: &str = "java.lang.Object";

/// Host-language facts the loader needs
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Superclass name that contributes no constraint
    pub root_class: String,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            root_class: DEFAULT_ROOT_CLASS.to_string(),
        }
    }
}

/// Resolves an interchange file into a symbol graph
pub struct GraphLoader<'a> {
    options: &'a LoadOptions,
    ids: HashMap<&'a str, (DeclId, DeclKind)>,
    errors: Vec<SymbolError>,
}

impl<'a> GraphLoader<'a> {
    pub fn new(options: &'a LoadOptions) -> Self {
        Self {
            options,
            ids: HashMap::new(),
            errors: Vec::new(),
        }
    }

    /// Load all declarations and use sites
    ///
    /// Returns the graph with soft errors, or every error found if any of
    /// them is hard.
    pub fn load(mut self, file: &'a GraphFile) -> Result<(SymbolGraph, Vec<SymbolError>), Vec<SymbolError>> {
        // Pass 1: assign IDs in declaration order
        let mut unique: Vec<&DeclEntry> = Vec::new();
        for entry in &file.declarations {
            if self.ids.contains_key(entry.name.as_str()) {
                self.errors.push(SymbolError::DuplicateName {
                    name: entry.name.clone(),
                    span: entry.span,
                });
                continue;
            }
            let id = DeclId(unique.len() as u32);
            self.ids.insert(entry.name.as_str(), (id, entry.kind));
            unique.push(entry);
        }

        // Pass 2: resolve structure
        let declarations: Vec<Option<Declaration>> =
            unique.iter().map(|entry| self.declaration(entry)).collect();
        let use_sites: Vec<Option<UseSite>> =
            file.use_sites.iter().map(|entry| self.use_site(entry)).collect();

        if self.errors.iter().any(SymbolError::is_hard_error) {
            return Err(self.errors);
        }

        let mut graph = SymbolGraph::new();
        for decl in declarations.into_iter().flatten() {
            if let Err(e) = graph.insert(decl) {
                self.errors.push(e);
            }
        }
        for site in use_sites.into_iter().flatten() {
            graph.add_use(site);
        }

        tracing::debug!(
            "loaded {} declarations, {} use sites",
            graph.len(),
            file.use_sites.len()
        );
        Ok((graph, self.errors))
    }

    fn declaration(&mut self, entry: &DeclEntry) -> Option<Declaration> {
        let parent = self.lexical_parent(entry.parent.as_deref(), &entry.name, entry)?;

        let node = match entry.kind {
            DeclKind::Method | DeclKind::Constructor | DeclKind::Field => {
                let owner = match parent {
                    Some((id, kind)) if kind.is_class_like() => id,
                    _ => {
                        self.errors.push(SymbolError::MisplacedMember {
                            name: entry.name.clone(),
                            kind: entry.kind.describe(),
                            parent: entry.parent.clone().unwrap_or_else(|| "<top level>".into()),
                            span: entry.span,
                        });
                        return None;
                    }
                };
                match entry.kind {
                    DeclKind::Method => DeclNode::Method { owner },
                    DeclKind::Constructor => DeclNode::Constructor { owner },
                    _ => DeclNode::Field { owner },
                }
            }
            DeclKind::Class => DeclNode::Class {
                superclass: entry
                    .superclass
                    .as_deref()
                    .and_then(|name| self.supertype(name, &entry.name, entry)),
                interfaces: self.supertypes(&entry.interfaces, entry),
                outer: Self::outer(parent),
            },
            DeclKind::Interface => {
                let mut extends = self.supertypes(&entry.interfaces, entry);
                extends.extend(
                    entry
                        .superclass
                        .as_deref()
                        .and_then(|name| self.supertype(name, &entry.name, entry)),
                );
                DeclNode::Interface {
                    extends,
                    outer: Self::outer(parent),
                }
            }
            DeclKind::AnonymousClass => {
                if entry.annotation.is_some() {
                    self.errors.push(SymbolError::AnnotationNotAllowed {
                        name: entry.name.clone(),
                        span: entry.span,
                    });
                    return None;
                }
                let names = entry
                    .superclass
                    .iter()
                    .chain(&entry.supertypes)
                    .chain(&entry.interfaces);
                let supertypes = names
                    .filter_map(|name| self.supertype(name, &entry.name, entry))
                    .collect();
                let context = match parent {
                    Some((id, kind)) if !kind.is_class_like() => Some(id),
                    // initializer block of a class, or a synthetic top-level graph
                    _ => None,
                };
                DeclNode::AnonymousClass {
                    supertypes,
                    context,
                    instantiation: entry.instantiation.unwrap_or(entry.span),
                }
            }
        };

        Some(Declaration {
            id: DeclId(0),
            name: entry.name.clone(),
            span: entry.span,
            annotation: entry.annotation.as_deref().map(SideAnnotation::read),
            parent: parent.map(|(id, _)| id),
            node,
        })
    }

    fn use_site(&mut self, entry: &UseEntry) -> Option<UseSite> {
        let scope = self.lexical_parent(entry.scope.as_deref(), &entry.text, entry)?;
        let target = entry
            .target
            .as_deref()
            .and_then(|name| self.reference(name, &entry.text, entry.span));
        let constructor = entry
            .constructor
            .as_deref()
            .and_then(|name| self.reference(name, &entry.text, entry.span));

        let mut site = UseSite::reference(entry.text.clone(), target, scope.map(|(id, _)| id)).at(entry.span);
        site.kind = entry.kind;
        site.constructor = constructor;
        Some(site)
    }

    /// `Some(None)` for top-level items, `None` after recording an error
    fn lexical_parent(
        &mut self,
        name: Option<&str>,
        child: &str,
        spanned: &impl HasSpan,
    ) -> Option<Option<(DeclId, DeclKind)>> {
        let Some(name) = name else {
            return Some(None);
        };
        match self.ids.get(name) {
            Some(&found) => Some(Some(found)),
            None => {
                self.errors.push(SymbolError::UnknownParent {
                    parent: name.to_string(),
                    child: child.to_string(),
                    span: spanned.span(),
                });
                None
            }
        }
    }

    fn outer(parent: Option<(DeclId, DeclKind)>) -> Option<DeclId> {
        // local classes inside methods are not nested in the structural sense
        parent.filter(|(_, kind)| kind.is_class_like()).map(|(id, _)| id)
    }

    fn supertypes(&mut self, names: &[String], entry: &DeclEntry) -> Vec<DeclId> {
        names
            .iter()
            .filter_map(|name| self.supertype(name, &entry.name, entry))
            .collect()
    }

    fn supertype(&mut self, name: &str, referrer: &str, entry: &DeclEntry) -> Option<DeclId> {
        if name == self.options.root_class {
            return None;
        }
        self.reference(name, referrer, entry.span)
    }

    fn reference(&mut self, name: &str, referrer: &str, span: sideonly_ast::Span) -> Option<DeclId> {
        match self.ids.get(name) {
            Some(&(id, _)) => Some(id),
            None => {
                self.errors.push(SymbolError::UndefinedReference {
                    name: name.to_string(),
                    span,
                    referrer: referrer.to_string(),
                });
                None
            }
        }
    }
}

trait HasSpan {
    fn span(&self) -> sideonly_ast::Span;
}

impl HasSpan for DeclEntry {
    fn span(&self) -> sideonly_ast::Span {
        self.span
    }
}

impl HasSpan for UseEntry {
    fn span(&self) -> sideonly_ast::Span {
        self.span
    }
}
