//! Virtual annotations for declarations with an inferred side

use serde::{Deserialize, Serialize};
use sideonly_ast::{SideSet, Span};
use sideonly_symbols::{DeclId, DeclKind};

use crate::SideResolver;

/// How hints are rendered
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HintOptions {
    /// Annotation name shown in the hint
    pub annotation: String,
    /// Spaces per nesting level
    pub indent_width: usize,
}

impl Default for HintOptions {
    fn default() -> Self {
        Self {
            annotation: "SideOnly".to_string(),
            indent_width: 4,
        }
    }
}

/// A synthesized annotation to display above a declaration
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Hint {
    pub decl: DeclId,
    /// The side-set the hint claims
    pub sides: SideSet,
    /// e.g. `@SideOnly({Side.SERVER})`
    pub text: String,
    /// Lexical nesting depth of the declaration
    pub depth: usize,
    /// Span of the declaration the hint sits above
    pub span: Span,
}

impl Hint {
    pub fn indent(&self, width: usize) -> String {
        " ".repeat(self.depth * width)
    }

    /// The hint as a full line, indented to its declaration
    pub fn line(&self, width: usize) -> String {
        format!("{}{}", self.indent(width), self.text)
    }
}

/// Decides which declarations get a hint and what it says
pub struct HintSynthesizer<'r, 'g> {
    resolver: &'r SideResolver<'g>,
    options: HintOptions,
}

impl<'r, 'g> HintSynthesizer<'r, 'g> {
    pub fn new(resolver: &'r SideResolver<'g>, options: HintOptions) -> Self {
        Self { resolver, options }
    }

    pub fn options(&self) -> &HintOptions {
        &self.options
    }

    /// Hints for every eligible declaration, in graph order
    pub fn hints(&self) -> Vec<Hint> {
        self.resolver
            .graph()
            .iter()
            .filter_map(|decl| self.hint_for(decl.id))
            .collect()
    }

    pub fn hint_for(&self, id: DeclId) -> Option<Hint> {
        let graph = self.resolver.graph();
        let decl = graph.get(id)?;

        if !matches!(
            decl.kind(),
            DeclKind::Class | DeclKind::Interface | DeclKind::AnonymousClass | DeclKind::Method
        ) {
            return None;
        }
        // members of anonymous classes would repeat the class's own hint
        if graph
            .containing_class(id)
            .is_some_and(|c| c.kind() == DeclKind::AnonymousClass)
        {
            return None;
        }
        if decl.has_annotation() {
            return None;
        }

        let sides = self.display_side(id);
        if sides.is_unrestricted() {
            return None;
        }

        Some(Hint {
            decl: id,
            sides,
            text: format!("@{}({})", self.options.annotation, sides.annotation_literal()),
            depth: graph.depth(id),
            span: decl.span,
        })
    }

    /// The side-set a hint may claim for a declaration
    ///
    /// Inside a method the hint must not promise more than the validator
    /// accepts: an unrestricted method narrowed to one side shows as empty.
    /// This also covers anonymous-class methods that resolve empty.
    pub fn display_side(&self, id: DeclId) -> SideSet {
        let graph = self.resolver.graph();
        let side = self.resolver.effective_side(id);

        let Some(method) = graph.enclosing_method(id) else {
            return side;
        };
        let method_side = self.resolver.effective_side(method);
        let narrowed = side.intersect(method_side);
        if method_side.is_unrestricted() && narrowed.is_restricted() {
            SideSet::EMPTY
        } else {
            narrowed
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sideonly_ast::SideAnnotation;
    use sideonly_symbols::{Declaration, SymbolGraph};

    fn hints(graph: &SymbolGraph) -> Vec<Hint> {
        let resolver = SideResolver::new(graph);
        HintSynthesizer::new(&resolver, HintOptions::default()).hints()
    }

    #[test]
    fn inherited_restriction_gets_hint() {
        let mut graph = SymbolGraph::new();
        let a = graph
            .insert(Declaration::class("A").with_sides(SideSet::SERVER))
            .unwrap();
        let b = graph.insert(Declaration::class("B").extends(a)).unwrap();
        let m = graph.insert(Declaration::method("B.m", b)).unwrap();

        let hints = hints(&graph);
        let decls: Vec<_> = hints.iter().map(|h| h.decl).collect();
        assert_eq!(decls, vec![b, m]);
        assert_eq!(hints[0].text, "@SideOnly({Side.SERVER})");
        assert_eq!(hints[0].depth, 0);
        assert_eq!(hints[1].depth, 1);
        assert_eq!(hints[1].line(4), "    @SideOnly({Side.SERVER})");
    }

    #[test]
    fn annotated_declarations_are_skipped() {
        let mut graph = SymbolGraph::new();
        graph
            .insert(Declaration::class("A").with_sides(SideSet::CLIENT))
            .unwrap();
        graph
            .insert(Declaration::class("B").with_annotation(SideAnnotation::Unrecognized("?".into())))
            .unwrap();
        assert!(hints(&graph).is_empty());
    }

    #[test]
    fn fields_and_constructors_are_not_targets() {
        let mut graph = SymbolGraph::new();
        let a = graph
            .insert(Declaration::class("A").with_sides(SideSet::CLIENT))
            .unwrap();
        graph.insert(Declaration::field("A.f", a)).unwrap();
        graph.insert(Declaration::constructor("A.<init>", a)).unwrap();
        assert!(hints(&graph).is_empty());
    }

    #[test]
    fn empty_side_is_shown() {
        let mut graph = SymbolGraph::new();
        let a = graph
            .insert(Declaration::class("A").with_sides(SideSet::CLIENT))
            .unwrap();
        let s = graph
            .insert(Declaration::interface("S").with_sides(SideSet::SERVER))
            .unwrap();
        graph
            .insert(Declaration::class("B").extends(a).implements(s))
            .unwrap();

        let hints = hints(&graph);
        assert_eq!(hints.len(), 1);
        assert_eq!(hints[0].text, "@SideOnly({})");
    }

    #[test]
    fn anonymous_class_in_restricted_method() {
        let mut graph = SymbolGraph::new();
        let iface = graph.insert(Declaration::interface("I")).unwrap();
        let c = graph.insert(Declaration::class("C")).unwrap();
        let m = graph
            .insert(Declaration::method("C.m", c).with_sides(SideSet::SERVER))
            .unwrap();
        let anon = graph
            .insert(Declaration::anonymous("C.m$1", m, Span::dummy()).implements(iface))
            .unwrap();
        graph.insert(Declaration::method("C.m$1.run", anon)).unwrap();

        let hints = hints(&graph);
        // the anonymous class's own method is not hinted separately
        assert_eq!(hints.len(), 1);
        assert_eq!(hints[0].decl, anon);
        assert_eq!(hints[0].sides, SideSet::SERVER);
        assert_eq!(hints[0].depth, 2);
    }

    #[test]
    fn restricted_class_in_unrestricted_method_shows_empty() {
        let mut graph = SymbolGraph::new();
        let client = graph
            .insert(Declaration::interface("ClientApi").with_sides(SideSet::CLIENT))
            .unwrap();
        let c = graph.insert(Declaration::class("C")).unwrap();
        let m = graph.insert(Declaration::method("C.m", c)).unwrap();
        let local = graph
            .insert(Declaration::class("C.m.Local").implements(client).within(m))
            .unwrap();

        let resolver = SideResolver::new(&graph);
        let synth = HintSynthesizer::new(&resolver, HintOptions::default());
        assert_eq!(resolver.effective_side(local), SideSet::CLIENT);
        assert_eq!(synth.display_side(local), SideSet::EMPTY);
        assert_eq!(synth.hint_for(local).unwrap().text, "@SideOnly({})");
    }

    #[test]
    fn custom_annotation_name() {
        let mut graph = SymbolGraph::new();
        let a = graph
            .insert(Declaration::class("A").with_sides(SideSet::CLIENT))
            .unwrap();
        let b = graph.insert(Declaration::class("B").extends(a)).unwrap();

        let resolver = SideResolver::new(&graph);
        let options = HintOptions {
            annotation: "OnlyIn".into(),
            indent_width: 2,
        };
        let hint = HintSynthesizer::new(&resolver, options).hint_for(b).unwrap();
        assert_eq!(hint.text, "@OnlyIn({Side.CLIENT})");
    }
}
