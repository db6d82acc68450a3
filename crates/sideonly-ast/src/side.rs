//! Build-variant sides and the side-set algebra

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A build variant a declaration may or may not exist in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    Client,
    Server,
}

impl Side {
    pub const ALL: [Side; 2] = [Side::Client, Side::Server];

    pub fn name(self) -> &'static str {
        match self {
            Side::Client => "CLIENT",
            Side::Server => "SERVER",
        }
    }

    fn bit(self) -> u8 {
        match self {
            Side::Client => 0b01,
            Side::Server => 0b10,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Side {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CLIENT" => Ok(Side::Client),
            "SERVER" => Ok(Side::Server),
            _ => Err(()),
        }
    }
}

/// A subset of {CLIENT, SERVER}
///
/// The full set means "unrestricted", a singleton means the declaration only
/// exists in that variant, and the empty set means it exists in none.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "Vec<Side>", from = "Vec<Side>")]
pub struct SideSet(u8);

impl SideSet {
    pub const EMPTY: SideSet = SideSet(0);
    pub const CLIENT: SideSet = SideSet(0b01);
    pub const SERVER: SideSet = SideSet(0b10);
    pub const BOTH: SideSet = SideSet(0b11);

    pub fn only(side: Side) -> Self {
        SideSet(side.bit())
    }

    pub fn intersect(self, other: SideSet) -> SideSet {
        SideSet(self.0 & other.0)
    }

    pub fn union(self, other: SideSet) -> SideSet {
        SideSet(self.0 | other.0)
    }

    pub fn contains(self, side: Side) -> bool {
        self.0 & side.bit() != 0
    }

    pub fn is_subset(self, other: SideSet) -> bool {
        self.0 & !other.0 == 0
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Exists on every variant
    pub fn is_unrestricted(self) -> bool {
        self.len() > 1
    }

    /// Exists on exactly one variant
    pub fn is_restricted(self) -> bool {
        self.len() == 1
    }

    /// The single side, if this set is a singleton
    pub fn single(self) -> Option<Side> {
        let mut iter = self.iter();
        match (iter.next(), iter.next()) {
            (Some(side), None) => Some(side),
            _ => None,
        }
    }

    pub fn iter(self) -> impl Iterator<Item = Side> {
        Side::ALL.into_iter().filter(move |side| self.contains(*side))
    }

    /// Source form of this set as an annotation value, e.g. `{Side.CLIENT}`
    pub fn annotation_literal(self) -> String {
        let sides: Vec<String> = self.iter().map(|s| format!("Side.{}", s)).collect();
        format!("{{{}}}", sides.join(", "))
    }
}

impl Default for SideSet {
    fn default() -> Self {
        SideSet::BOTH
    }
}

impl FromIterator<Side> for SideSet {
    fn from_iter<I: IntoIterator<Item = Side>>(iter: I) -> Self {
        iter.into_iter()
            .fold(SideSet::EMPTY, |set, side| set.union(SideSet::only(side)))
    }
}

impl From<Vec<Side>> for SideSet {
    fn from(sides: Vec<Side>) -> Self {
        sides.into_iter().collect()
    }
}

impl From<SideSet> for Vec<Side> {
    fn from(set: SideSet) -> Self {
        set.iter().collect()
    }
}

impl fmt::Display for SideSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.single() {
            Some(side) => write!(f, "{}", side),
            None => {
                let sides: Vec<&str> = self.iter().map(Side::name).collect();
                write!(f, "{{{}}}", sides.join(", "))
            }
        }
    }
}

impl fmt::Debug for SideSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SideSet({})", self)
    }
}
