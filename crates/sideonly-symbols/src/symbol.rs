//! Declarations, use sites and structural parent edges

use serde::{Deserialize, Serialize};
use sideonly_ast::{SideAnnotation, SideSet, Span};

/// Unique identifier for a declaration in the graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DeclId(pub u32);

/// Unique identifier for a use site in the graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UseSiteId(pub u32);

/// Kind of declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeclKind {
    Class,
    Interface,
    Method,
    Constructor,
    Field,
    AnonymousClass,
}

impl DeclKind {
    /// Class, interface or anonymous class
    pub fn is_class_like(self) -> bool {
        matches!(self, DeclKind::Class | DeclKind::Interface | DeclKind::AnonymousClass)
    }

    /// Method or constructor: a context code executes in
    pub fn is_executable(self) -> bool {
        matches!(self, DeclKind::Method | DeclKind::Constructor)
    }

    pub fn describe(self) -> &'static str {
        match self {
            DeclKind::Class => "class",
            DeclKind::Interface => "interface",
            DeclKind::Method => "method",
            DeclKind::Constructor => "constructor",
            DeclKind::Field => "field",
            DeclKind::AnonymousClass => "anonymous class",
        }
    }
}

/// Why one declaration constrains another
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EdgeKind {
    /// Non-root superclass of a class
    Superclass,
    /// Implemented or extended interface
    Interface,
    /// Superclass or interface named in an anonymous class's `new` expression
    Supertype,
    /// Enclosing class of a nested class
    Outer,
    /// Declaring class of a member
    Owner,
    /// Method or field initializer an anonymous class is instantiated in
    Context,
}

impl EdgeKind {
    pub fn describe(self) -> &'static str {
        match self {
            EdgeKind::Superclass => "superclass",
            EdgeKind::Interface => "interface",
            EdgeKind::Supertype => "supertype",
            EdgeKind::Outer => "enclosing class",
            EdgeKind::Owner => "declaring class",
            EdgeKind::Context => "instantiation context",
        }
    }
}

/// A structural parent of a declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParentEdge {
    pub kind: EdgeKind,
    pub target: DeclId,
}

/// The kind-specific structure of a declaration, with its parent edges
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeclNode {
    Class {
        /// `None` when the superclass is the universal root
        superclass: Option<DeclId>,
        interfaces: Vec<DeclId>,
        outer: Option<DeclId>,
    },
    Interface {
        extends: Vec<DeclId>,
        outer: Option<DeclId>,
    },
    Method {
        owner: DeclId,
    },
    Constructor {
        owner: DeclId,
    },
    Field {
        owner: DeclId,
    },
    AnonymousClass {
        supertypes: Vec<DeclId>,
        /// `None` for instantiations in initializer blocks
        context: Option<DeclId>,
        /// The type reference in the `new` expression
        instantiation: Span,
    },
}

impl DeclNode {
    pub fn kind(&self) -> DeclKind {
        match self {
            DeclNode::Class { .. } => DeclKind::Class,
            DeclNode::Interface { .. } => DeclKind::Interface,
            DeclNode::Method { .. } => DeclKind::Method,
            DeclNode::Constructor { .. } => DeclKind::Constructor,
            DeclNode::Field { .. } => DeclKind::Field,
            DeclNode::AnonymousClass { .. } => DeclKind::AnonymousClass,
        }
    }

    /// All structural parents whose side-sets constrain this declaration
    pub fn parents(&self) -> Vec<ParentEdge> {
        let edge = |kind, target| ParentEdge { kind, target };
        match self {
            DeclNode::Class {
                superclass,
                interfaces,
                outer,
            } => superclass
                .map(|s| edge(EdgeKind::Superclass, s))
                .into_iter()
                .chain(interfaces.iter().map(|&i| edge(EdgeKind::Interface, i)))
                .chain(outer.map(|o| edge(EdgeKind::Outer, o)))
                .collect(),
            DeclNode::Interface { extends, outer } => extends
                .iter()
                .map(|&i| edge(EdgeKind::Interface, i))
                .chain(outer.map(|o| edge(EdgeKind::Outer, o)))
                .collect(),
            DeclNode::Method { owner }
            | DeclNode::Constructor { owner }
            | DeclNode::Field { owner } => vec![edge(EdgeKind::Owner, *owner)],
            DeclNode::AnonymousClass {
                supertypes,
                context,
                ..
            } => supertypes
                .iter()
                .map(|&s| edge(EdgeKind::Supertype, s))
                .chain(context.map(|c| edge(EdgeKind::Context, c)))
                .collect(),
        }
    }

    /// Supertypes only: superclass, interfaces, or an anonymous class's bases
    pub fn supertypes(&self) -> Vec<DeclId> {
        self.parents()
            .into_iter()
            .filter(|e| {
                matches!(
                    e.kind,
                    EdgeKind::Superclass | EdgeKind::Interface | EdgeKind::Supertype
                )
            })
            .map(|e| e.target)
            .collect()
    }
}

/// A declaration in the symbol graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Declaration {
    /// Assigned on graph insertion
    pub id: DeclId,

    /// Unique name, e.g. "net.Packet.encode"
    pub name: String,

    pub span: Span,

    /// The explicit `@SideOnly` value, if any
    pub annotation: Option<SideAnnotation>,

    /// Innermost lexically enclosing declaration
    pub parent: Option<DeclId>,

    pub node: DeclNode,
}

impl Declaration {
    fn new(name: impl Into<String>, node: DeclNode, parent: Option<DeclId>) -> Self {
        Self {
            id: DeclId(0), // Will be assigned during graph insertion
            name: name.into(),
            span: Span::dummy(),
            annotation: None,
            parent,
            node,
        }
    }

    /// A top-level class extending the universal root
    pub fn class(name: impl Into<String>) -> Self {
        Self::new(
            name,
            DeclNode::Class {
                superclass: None,
                interfaces: Vec::new(),
                outer: None,
            },
            None,
        )
    }

    /// A top-level interface
    pub fn interface(name: impl Into<String>) -> Self {
        Self::new(
            name,
            DeclNode::Interface {
                extends: Vec::new(),
                outer: None,
            },
            None,
        )
    }

    pub fn method(name: impl Into<String>, owner: DeclId) -> Self {
        Self::new(name, DeclNode::Method { owner }, Some(owner))
    }

    pub fn constructor(name: impl Into<String>, owner: DeclId) -> Self {
        Self::new(name, DeclNode::Constructor { owner }, Some(owner))
    }

    pub fn field(name: impl Into<String>, owner: DeclId) -> Self {
        Self::new(name, DeclNode::Field { owner }, Some(owner))
    }

    /// An anonymous class instantiated in `context` (a method, constructor
    /// or field initializer)
    pub fn anonymous(name: impl Into<String>, context: DeclId, instantiation: Span) -> Self {
        Self::new(
            name,
            DeclNode::AnonymousClass {
                supertypes: Vec::new(),
                context: Some(context),
                instantiation,
            },
            Some(context),
        )
    }

    /// Nest a class or interface inside `outer`
    pub fn nested_in(mut self, outer_class: DeclId) -> Self {
        match &mut self.node {
            DeclNode::Class { outer, .. } | DeclNode::Interface { outer, .. } => {
                *outer = Some(outer_class);
            }
            _ => {}
        }
        self.parent = Some(outer_class);
        self
    }

    /// Place this declaration lexically inside `parent` without a structural
    /// edge (local classes, anonymous classes in initializer blocks)
    pub fn within(mut self, parent: DeclId) -> Self {
        self.parent = Some(parent);
        self
    }

    pub fn extends(mut self, base: DeclId) -> Self {
        match &mut self.node {
            DeclNode::Class { superclass, .. } => *superclass = Some(base),
            DeclNode::Interface { extends, .. } => extends.push(base),
            DeclNode::AnonymousClass { supertypes, .. } => supertypes.push(base),
            _ => {}
        }
        self
    }

    pub fn implements(mut self, interface: DeclId) -> Self {
        match &mut self.node {
            DeclNode::Class { interfaces, .. } => interfaces.push(interface),
            DeclNode::Interface { extends, .. } => extends.push(interface),
            DeclNode::AnonymousClass { supertypes, .. } => supertypes.push(interface),
            _ => {}
        }
        self
    }

    pub fn with_sides(self, sides: SideSet) -> Self {
        self.with_annotation(SideAnnotation::Declared(sides))
    }

    pub fn with_annotation(mut self, annotation: SideAnnotation) -> Self {
        self.annotation = Some(annotation);
        self
    }

    pub fn at(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    pub fn kind(&self) -> DeclKind {
        self.node.kind()
    }

    pub fn parents(&self) -> Vec<ParentEdge> {
        self.node.parents()
    }

    /// The side-set this declaration is explicitly constrained to
    pub fn own_sides(&self) -> Option<SideSet> {
        self.annotation.as_ref().and_then(SideAnnotation::sides)
    }

    /// Whether the source carries an annotation, readable or not
    pub fn has_annotation(&self) -> bool {
        self.annotation.is_some()
    }

    /// The `new` expression's type reference, for anonymous classes
    pub fn instantiation(&self) -> Option<Span> {
        match self.node {
            DeclNode::AnonymousClass { instantiation, .. } => Some(instantiation),
            _ => None,
        }
    }
}

/// Kind of use site
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UseKind {
    /// A plain reference expression (field read, method reference)
    Reference,
    /// A method call
    Call,
    /// A `new` expression
    Construction,
}

/// An expression that resolves to a declaration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UseSite {
    /// Assigned on graph insertion
    pub id: UseSiteId,

    pub kind: UseKind,

    /// Source text of the reference, as shown in diagnostics
    pub text: String,

    pub span: Span,

    /// The resolved declaration; `None` when resolution failed
    pub target: Option<DeclId>,

    /// Innermost declaration lexically containing the site
    pub scope: Option<DeclId>,

    /// Matched constructor, for constructions
    pub constructor: Option<DeclId>,
}

impl UseSite {
    fn new(kind: UseKind, text: impl Into<String>, target: Option<DeclId>, scope: Option<DeclId>) -> Self {
        Self {
            id: UseSiteId(0),
            kind,
            text: text.into(),
            span: Span::dummy(),
            target,
            scope,
            constructor: None,
        }
    }

    pub fn reference(text: impl Into<String>, target: Option<DeclId>, scope: Option<DeclId>) -> Self {
        Self::new(UseKind::Reference, text, target, scope)
    }

    pub fn call(text: impl Into<String>, target: Option<DeclId>, scope: Option<DeclId>) -> Self {
        Self::new(UseKind::Call, text, target, scope)
    }

    pub fn construction(
        text: impl Into<String>,
        class: Option<DeclId>,
        constructor: Option<DeclId>,
        scope: Option<DeclId>,
    ) -> Self {
        let mut site = Self::new(UseKind::Construction, text, class, scope);
        site.constructor = constructor;
        site
    }

    pub fn at(mut self, span: Span) -> Self {
        self.span = span;
        self
    }
}
