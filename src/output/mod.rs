//! Rendering of ranges
//!
//! This module provides:
//! - Structured output as ordered `(operator, version)` pairs
//! - String output in the same grammar the parser reads

use crate::domain::{ModuleVersion, Operator, Range, RequirementPart};

/// Render a range as ordered `(operator, version)` pairs
///
/// The lower bound comes first, then the upper bound, then each remaining
/// exclusion. A bound that is also excluded is written with the strict
/// operator and the exclusion is not repeated.
pub fn structured<V: ModuleVersion>(range: &Range<V>) -> Vec<RequirementPart> {
    let bounds = match range {
        Range::Exact(version) => {
            return vec![RequirementPart::new(Operator::Exact, version.to_string())];
        }
        Range::Bounded(bounds) => bounds,
    };

    let mut exclusions: Vec<&V> = bounds.exclusions().iter().collect();
    let mut parts = Vec::with_capacity(exclusions.len() + 2);

    for (bound, inclusive, strict) in [
        (bounds.minimum(), Operator::GreaterOrEqual, Operator::Greater),
        (bounds.maximum(), Operator::LessOrEqual, Operator::Less),
    ] {
        let Some(bound) = bound else {
            continue;
        };
        let before = exclusions.len();
        exclusions.retain(|e| *e != bound);
        let op = if exclusions.len() == before {
            inclusive
        } else {
            strict
        };
        parts.push(RequirementPart::new(op, bound.to_string()));
    }

    parts.extend(
        exclusions
            .into_iter()
            .map(|e| RequirementPart::new(Operator::NotEqual, e.to_string())),
    );
    parts
}

/// Join structured parts into a requirement string
///
/// A lone `>=` part is written as the bare version.
pub fn render(parts: &[RequirementPart]) -> String {
    if let [only] = parts {
        if only.op == Operator::GreaterOrEqual {
            return only.version.clone();
        }
    }

    parts
        .iter()
        .map(|part| part.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
