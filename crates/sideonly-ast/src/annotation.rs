//! Reading `@SideOnly` annotation values
//!
//! The host hands over the raw text of the annotation's `value` attribute,
//! e.g. `Side.CLIENT` or `{Side.CLIENT, Side.SERVER}`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{Side, SideSet};

/// Errors from reading an annotation value
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnnotationError {
    #[error("unknown side `{0}`")]
    UnknownSide(String),

    #[error("unbalanced braces in `{0}`")]
    UnbalancedBraces(String),
}

/// The own annotation attached to a declaration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SideAnnotation {
    /// A value naming only known sides
    Declared(SideSet),
    /// A value we could not read; it places no constraint on the declaration
    Unrecognized(String),
}

impl SideAnnotation {
    /// Read an annotation value leniently: anything unreadable is kept as
    /// `Unrecognized` rather than rejected
    pub fn read(text: &str) -> Self {
        match parse_sides(text) {
            Ok(sides) => SideAnnotation::Declared(sides),
            Err(err) => {
                tracing::warn!("ignoring @SideOnly value `{}`: {}", text, err);
                SideAnnotation::Unrecognized(text.to_string())
            }
        }
    }

    /// The side-set this annotation constrains to, if any
    pub fn sides(&self) -> Option<SideSet> {
        match self {
            SideAnnotation::Declared(sides) => Some(*sides),
            SideAnnotation::Unrecognized(_) => None,
        }
    }
}

impl From<SideSet> for SideAnnotation {
    fn from(sides: SideSet) -> Self {
        SideAnnotation::Declared(sides)
    }
}

/// Parse an annotation value into a side-set
///
/// Accepts a single element or a brace-delimited array; elements may be
/// qualified (`Side.SERVER`) or bare (`SERVER`). `BOTH` names the full set.
/// `{}` is the empty set.
pub fn parse_sides(text: &str) -> Result<SideSet, AnnotationError> {
    let trimmed = text.trim();
    let inner = match (trimmed.strip_prefix('{'), trimmed.ends_with('}')) {
        (Some(rest), true) => &rest[..rest.len() - 1],
        (None, false) => trimmed,
        _ => return Err(AnnotationError::UnbalancedBraces(text.to_string())),
    };
    if inner.contains(['{', '}']) {
        return Err(AnnotationError::UnbalancedBraces(text.to_string()));
    }

    let mut sides = SideSet::EMPTY;
    for element in inner.split(',').map(str::trim).filter(|e| !e.is_empty()) {
        let name = element.strip_prefix("Side.").unwrap_or(element);
        sides = match name {
            "BOTH" => SideSet::BOTH,
            other => match other.parse::<Side>() {
                Ok(side) => sides.union(SideSet::only(side)),
                Err(()) => return Err(AnnotationError::UnknownSide(element.to_string())),
            },
        };
    }
    Ok(sides)
}
