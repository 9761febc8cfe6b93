//! Which synthesized nodes get an element of their own.
//!
//! Operators and punctuation between siblings have no token position in the
//! AST. For each category the table decides whether the text between the
//! neighbouring siblings is wrapped in an element ([`Placement::Wrap`]) or
//! left as plain text in the parent's gap ([`Placement::Gap`]).

use std::fmt;
use std::str::FromStr;

use regurgitator_syntax::{NodeKind, Separator};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Placement {
    Wrap,
    Gap,
}

impl Placement {
    pub fn as_str(self) -> &'static str {
        match self {
            Placement::Wrap => "wrap",
            Placement::Gap => "gap",
        }
    }
}

impl fmt::Display for Placement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown placement {0:?}, expected \"wrap\" or \"gap\"")]
pub struct UnknownPlacement(pub String);

impl FromStr for Placement {
    type Err = UnknownPlacement;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "wrap" => Ok(Placement::Wrap),
            "gap" => Ok(Placement::Gap),
            other => Err(UnknownPlacement(other.to_string())),
        }
    }
}

/// Per-category placement of synthesized nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeparatorTable {
    /// Binary, unary, boolean, comparison and augmented-assignment operators
    pub operator: Placement,
    /// `=` in assignments
    pub equals: Placement,
    /// `,` between elements and arguments
    pub comma: Placement,
    /// `:` between dict keys and values
    pub colon: Placement,
}

impl Default for SeparatorTable {
    fn default() -> Self {
        Self {
            operator: Placement::Wrap,
            equals: Placement::Gap,
            comma: Placement::Gap,
            colon: Placement::Gap,
        }
    }
}

impl SeparatorTable {
    /// Every category placed the same way.
    pub fn uniform(placement: Placement) -> Self {
        Self {
            operator: placement,
            equals: placement,
            comma: placement,
            colon: placement,
        }
    }

    /// Placement for a synthesized node of this kind. Kinds outside the
    /// table are always wrapped.
    pub fn placement(&self, kind: &NodeKind) -> Placement {
        match kind {
            NodeKind::Operator(_) => self.operator,
            NodeKind::Separator(Separator::Equals) => self.equals,
            NodeKind::Separator(Separator::Comma) => self.comma,
            NodeKind::Separator(Separator::Colon) => self.colon,
            _ => Placement::Wrap,
        }
    }
}
