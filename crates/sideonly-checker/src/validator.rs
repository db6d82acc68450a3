//! Access validation at use sites
//!
//! A use site is valid when every build variant that compiles its enclosing
//! method also contains the target. An unrestricted method runs on both
//! variants, so it may only use unrestricted targets; a restricted method
//! may use targets available on its own side.

use serde::Serialize;
use sideonly_ast::{SideSet, Span};
use sideonly_symbols::{DeclId, DeclKind, EdgeKind, UseKind, UseSite, UseSiteId};

use crate::{CheckError, SideResolver};

/// Outcome of validating one use site
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Access {
    Allowed,
    Denied(Denial),
}

impl Access {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Access::Allowed)
    }

    pub fn denial(&self) -> Option<&Denial> {
        match self {
            Access::Allowed => None,
            Access::Denied(denial) => Some(denial),
        }
    }
}

/// Which failure a denial reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DenialKind {
    /// The context cannot guarantee the target exists
    InaccessibleSide,
    /// An anonymous class cannot exist where it is instantiated
    UnreachableInContext,
}

/// Why the sides do not fit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DenialReason {
    /// Target and context share no side
    NoCommonSide,
    /// Context runs on both sides, target exists on one
    NarrowerThanContext,
    /// Target exists on no side at all
    Unreachable,
}

/// A rejected access with everything needed to explain it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Denial {
    pub kind: DenialKind,
    pub reason: DenialReason,
    /// The declaration that cannot be used here
    pub target: DeclId,
    /// Side-set of the target as seen from this site
    pub target_side: SideSet,
    /// Enclosing method or constructor, if any
    pub context: Option<DeclId>,
    pub context_side: Option<SideSet>,
    /// Where to report
    pub span: Span,
    /// Source text of the offending reference
    pub text: String,
    /// The use site, for use-site denials
    pub site: Option<UseSiteId>,
}

/// Validates use sites against their enclosing context
pub struct AccessValidator<'r, 'g> {
    resolver: &'r SideResolver<'g>,
}

impl<'r, 'g> AccessValidator<'r, 'g> {
    pub fn new(resolver: &'r SideResolver<'g>) -> Self {
        Self { resolver }
    }

    /// Decide whether a reference, call or construction is permitted
    pub fn validate(&self, site: &UseSite) -> Access {
        let graph = self.resolver.graph();
        // Unresolved references belong to the front end
        let Some(target) = site.target else {
            return Access::Allowed;
        };
        let Some(target_decl) = graph.get(target) else {
            return Access::Allowed;
        };

        let mut target_side = self.resolver.effective_side(target);
        if site.kind == UseKind::Construction {
            if let Some(constructor) = site.constructor {
                target_side = target_side.intersect(self.resolver.effective_side(constructor));
            }
        }

        let context = site.scope.and_then(|scope| graph.executable_context(scope));
        let context_side = context.map(|ctx| self.resolver.effective_side(ctx));

        let Some(reason) = Self::verdict(target_side, context_side) else {
            tracing::debug!("`{}` allowed ({} in {:?})", site.text, target_side, context_side);
            return Access::Allowed;
        };

        // Anonymous classes are reported where the user wrote `new`
        let (kind, span) = match target_decl.instantiation() {
            Some(instantiation) => (DenialKind::UnreachableInContext, instantiation),
            None => (DenialKind::InaccessibleSide, site.span),
        };

        tracing::debug!("`{}` denied: {:?}", site.text, reason);
        Access::Denied(Denial {
            kind,
            reason,
            target,
            target_side,
            context,
            context_side,
            span,
            text: site.text.clone(),
            site: Some(site.id),
        })
    }

    fn verdict(target_side: SideSet, context_side: Option<SideSet>) -> Option<DenialReason> {
        match context_side {
            Some(context_side) => {
                let allowed = target_side.intersect(context_side);
                if target_side.is_empty() {
                    Some(DenialReason::Unreachable)
                } else if allowed.is_empty() {
                    Some(DenialReason::NoCommonSide)
                } else if context_side.is_unrestricted() && allowed.is_restricted() {
                    Some(DenialReason::NarrowerThanContext)
                } else {
                    None
                }
            }
            None => target_side.is_empty().then_some(DenialReason::Unreachable),
        }
    }

    /// Check that an anonymous class can exist where it is instantiated
    ///
    /// Denied whenever the class resolves to no side. The reason is
    /// `Unreachable` when its supertypes alone already exclude each other,
    /// and `NoCommonSide` when the instantiation context ruled it out.
    pub fn check_instantiation(&self, class: DeclId) -> Access {
        let graph = self.resolver.graph();
        let Some(decl) = graph.get(class) else {
            return Access::Allowed;
        };
        let Some(instantiation) = decl.instantiation() else {
            return Access::Allowed;
        };

        if !self.resolver.effective_side(class).is_empty() {
            return Access::Allowed;
        }
        let base_side = self.resolver.supertype_side(class);
        let reason = if base_side.is_empty() {
            DenialReason::Unreachable
        } else {
            DenialReason::NoCommonSide
        };

        let context = decl
            .parents()
            .into_iter()
            .find(|edge| edge.kind == EdgeKind::Context)
            .map(|edge| edge.target);
        let context_side = context.map(|ctx| self.resolver.effective_side(ctx));

        let text = decl
            .node
            .supertypes()
            .first()
            .map(|s| graph.name_of(*s).to_string())
            .unwrap_or_else(|| decl.name.clone());

        Access::Denied(Denial {
            kind: DenialKind::UnreachableInContext,
            reason,
            target: class,
            target_side: base_side,
            context,
            context_side,
            span: instantiation,
            text,
            site: None,
        })
    }
}

impl Denial {
    /// The semantic failure this denial reports
    pub fn error(&self, resolver: &SideResolver<'_>) -> CheckError {
        let graph = resolver.graph();
        let target = graph.name_of(self.target).to_string();
        match self.kind {
            DenialKind::InaccessibleSide => CheckError::InaccessibleSide {
                target,
                text: self.text.clone(),
            },
            DenialKind::UnreachableInContext => CheckError::UnreachableInContext {
                class: target,
                text: self.text.clone(),
                context: self
                    .context
                    .map(|ctx| graph.name_of(ctx).to_string())
                    .unwrap_or_else(|| "<initializer>".into()),
            },
        }
    }

    /// Anonymous classes have no annotation slot to fix
    pub fn target_is_anonymous(&self, resolver: &SideResolver<'_>) -> bool {
        resolver.graph().kind_of(self.target) == Some(DeclKind::AnonymousClass)
    }
}
