//! Constraint operators and the primitive modifiers they expand into

use serde::{Deserialize, Serialize};
use std::fmt;

/// A comparison operator in a textual constraint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    /// `==`
    #[serde(rename = "==")]
    Exact,
    /// `!=`
    #[serde(rename = "!=")]
    NotEqual,
    /// `>=`
    #[serde(rename = ">=")]
    GreaterOrEqual,
    /// `>`
    #[serde(rename = ">")]
    Greater,
    /// `<=`
    #[serde(rename = "<=")]
    LessOrEqual,
    /// `<`
    #[serde(rename = "<")]
    Less,
}

impl Operator {
    /// All operators, longest symbols first so prefix matching is unambiguous
    pub const ALL: [Operator; 6] = [
        Operator::Exact,
        Operator::NotEqual,
        Operator::GreaterOrEqual,
        Operator::LessOrEqual,
        Operator::Greater,
        Operator::Less,
    ];

    /// Returns the textual symbol
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Exact => "==",
            Operator::NotEqual => "!=",
            Operator::GreaterOrEqual => ">=",
            Operator::Greater => ">",
            Operator::LessOrEqual => "<=",
            Operator::Less => "<",
        }
    }

    /// Look up an operator by its symbol
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.as_str() == symbol)
    }

    /// Expand into the primitive modifiers applied for `op version`
    ///
    /// The strict operators are a bound plus an exclusion of the same value.
    pub fn modifiers<V: Clone>(&self, version: V) -> Vec<Modifier<V>> {
        match self {
            Operator::Exact => vec![Modifier::Exact(version)],
            Operator::NotEqual => vec![Modifier::Exclusion(version)],
            Operator::GreaterOrEqual => vec![Modifier::Minimum(version)],
            Operator::LessOrEqual => vec![Modifier::Maximum(version)],
            Operator::Greater => vec![
                Modifier::Minimum(version.clone()),
                Modifier::Exclusion(version),
            ],
            Operator::Less => vec![
                Modifier::Maximum(version.clone()),
                Modifier::Exclusion(version),
            ],
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single primitive change to a range
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Modifier<V> {
    Minimum(V),
    Maximum(V),
    Exclusion(V),
    Exact(V),
}

/// One `(operator, version)` pair of a structured requirement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequirementPart {
    pub op: Operator,
    pub version: String,
}

impl RequirementPart {
    /// Creates a new RequirementPart
    pub fn new(op: Operator, version: impl Into<String>) -> Self {
        Self {
            op,
            version: version.into(),
        }
    }
}

impl fmt::Display for RequirementPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.op, self.version)
    }
}
