//! The constraint range of a single dependency
//!
//! A range is either bounded (optional inclusive minimum and maximum plus a
//! set of excluded versions) or collapsed to one exact version. Every
//! modifier returns a new range and leaves the receiver untouched.

use super::{Modifier, ModuleVersion, RequirementPart};
use crate::error::{ConstraintError, RangeError};
use crate::output;
use crate::parser;
use std::fmt;
use std::str::FromStr;

/// Bounds and exclusions of a range that has not collapsed
///
/// Invariants after every modifier: `minimum < maximum` when both exist,
/// and `exclusions` is sorted, deduplicated, and inside the bounds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bounds<V> {
    minimum: Option<V>,
    maximum: Option<V>,
    exclusions: Vec<V>,
}

impl<V> Default for Bounds<V> {
    fn default() -> Self {
        Self {
            minimum: None,
            maximum: None,
            exclusions: Vec::new(),
        }
    }
}

impl<V: ModuleVersion> Bounds<V> {
    /// Returns the inclusive minimum
    pub fn minimum(&self) -> Option<&V> {
        self.minimum.as_ref()
    }

    /// Returns the inclusive maximum
    pub fn maximum(&self) -> Option<&V> {
        self.maximum.as_ref()
    }

    /// Returns the excluded versions in ascending order
    pub fn exclusions(&self) -> &[V] {
        &self.exclusions
    }

    fn accepts(&self, version: &V) -> bool {
        if let Some(ref minimum) = self.minimum {
            if version < minimum {
                return false;
            }
        }
        if let Some(ref maximum) = self.maximum {
            if version > maximum {
                return false;
            }
        }
        !self.exclusions.contains(version)
    }

    fn within_bounds(&self, version: &V) -> bool {
        self.minimum.as_ref().map_or(true, |min| version >= min)
            && self.maximum.as_ref().map_or(true, |max| version <= max)
    }

    /// Reduce to canonical form, collapsing to an exact range when the bounds meet
    fn simplify(mut self) -> Result<Range<V>, RangeError> {
        if let (Some(minimum), Some(maximum)) = (&self.minimum, &self.maximum) {
            if minimum == maximum {
                if self.exclusions.contains(minimum) {
                    return Err(RangeError::ExcludedBoundary {
                        version: minimum.to_string(),
                    });
                }
                return Ok(Range::Exact(minimum.clone()));
            }
            if minimum > maximum {
                return Err(RangeError::MinimumExceedsMaximum {
                    minimum: minimum.to_string(),
                    maximum: maximum.to_string(),
                });
            }
        }

        let mut exclusions = std::mem::take(&mut self.exclusions);
        exclusions.retain(|e| self.within_bounds(e));
        exclusions.sort();
        exclusions.dedup();
        self.exclusions = exclusions;

        Ok(Range::Bounded(self))
    }
}

/// The full constraint on one dependency
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Range<V> {
    /// Optional bounds with exclusions
    Bounded(Bounds<V>),
    /// Exactly one acceptable version
    Exact(V),
}

impl<V> Default for Range<V> {
    fn default() -> Self {
        Range::Bounded(Bounds::default())
    }
}

impl<V: ModuleVersion> Range<V> {
    /// Creates an exact range
    pub fn exact(version: V) -> Self {
        Range::Exact(version)
    }

    /// Returns true if the range has collapsed to a single version
    pub fn is_exact(&self) -> bool {
        matches!(self, Range::Exact(_))
    }

    /// Returns true if `version` satisfies every constraint of the range
    pub fn accepts(&self, version: &V) -> bool {
        match self {
            Range::Bounded(bounds) => bounds.accepts(version),
            Range::Exact(exact) => version == exact,
        }
    }

    /// Raise the minimum to `version` if it is higher than the current one
    pub fn with_minimum(&self, version: V) -> Result<Range<V>, RangeError> {
        match self {
            Range::Bounded(bounds) => {
                let mut bounds = bounds.clone();
                bounds.minimum = Some(match bounds.minimum.take() {
                    Some(current) if current >= version => current,
                    _ => version,
                });
                bounds.simplify()
            }
            Range::Exact(exact) => {
                if *exact >= version {
                    Ok(self.clone())
                } else {
                    Err(RangeError::MinimumAboveExact {
                        minimum: version.to_string(),
                        exact: exact.to_string(),
                    })
                }
            }
        }
    }

    /// Lower the maximum to `version` if it is lower than the current one
    pub fn with_maximum(&self, version: V) -> Result<Range<V>, RangeError> {
        match self {
            Range::Bounded(bounds) => {
                let mut bounds = bounds.clone();
                bounds.maximum = Some(match bounds.maximum.take() {
                    Some(current) if current <= version => current,
                    _ => version,
                });
                bounds.simplify()
            }
            Range::Exact(exact) => {
                if *exact <= version {
                    Ok(self.clone())
                } else {
                    Err(RangeError::MaximumBelowExact {
                        maximum: version.to_string(),
                        exact: exact.to_string(),
                    })
                }
            }
        }
    }

    /// Exclude a single version
    pub fn with_exclusion(&self, version: V) -> Result<Range<V>, RangeError> {
        match self {
            Range::Bounded(bounds) => {
                let mut bounds = bounds.clone();
                bounds.exclusions.push(version);
                bounds.simplify()
            }
            Range::Exact(exact) => {
                if *exact != version {
                    Ok(self.clone())
                } else {
                    Err(RangeError::ExcludesExact {
                        version: version.to_string(),
                    })
                }
            }
        }
    }

    /// Pin the range to `version`, which must already be accepted
    pub fn with_exact_version(&self, version: V) -> Result<Range<V>, RangeError> {
        match self {
            Range::Bounded(bounds) => {
                if bounds.accepts(&version) {
                    Ok(Range::Exact(version))
                } else {
                    Err(RangeError::ExactOutsideRange {
                        version: version.to_string(),
                        range: self.as_string(),
                    })
                }
            }
            Range::Exact(exact) => {
                if *exact == version {
                    Ok(self.clone())
                } else {
                    Err(RangeError::ExactMismatch {
                        requested: version.to_string(),
                        exact: exact.to_string(),
                    })
                }
            }
        }
    }

    /// Apply one primitive modifier
    pub fn apply(&self, modifier: &Modifier<V>) -> Result<Range<V>, RangeError> {
        match modifier {
            Modifier::Minimum(v) => self.with_minimum(v.clone()),
            Modifier::Maximum(v) => self.with_maximum(v.clone()),
            Modifier::Exclusion(v) => self.with_exclusion(v.clone()),
            Modifier::Exact(v) => self.with_exact_version(v.clone()),
        }
    }

    /// Apply every constraint of `other` on top of this range
    pub fn merge(&self, other: &Range<V>) -> Result<Range<V>, RangeError> {
        other
            .as_modifiers()
            .iter()
            .try_fold(self.clone(), |range, modifier| range.apply(modifier))
    }

    /// The ordered modifier log that rebuilds this range from an empty one
    ///
    /// Bounded ranges yield minimum, then maximum, then each exclusion in
    /// ascending order. Exact ranges yield a single exact modifier.
    pub fn as_modifiers(&self) -> Vec<Modifier<V>> {
        match self {
            Range::Bounded(bounds) => {
                let mut modifiers = Vec::with_capacity(bounds.exclusions.len() + 2);
                if let Some(ref minimum) = bounds.minimum {
                    modifiers.push(Modifier::Minimum(minimum.clone()));
                }
                if let Some(ref maximum) = bounds.maximum {
                    modifiers.push(Modifier::Maximum(maximum.clone()));
                }
                modifiers.extend(bounds.exclusions.iter().cloned().map(Modifier::Exclusion));
                modifiers
            }
            Range::Exact(exact) => vec![Modifier::Exact(exact.clone())],
        }
    }

    /// Render as ordered `(operator, version)` pairs
    pub fn as_struct(&self) -> Vec<RequirementPart> {
        output::structured(self)
    }

    /// Render in the textual constraint grammar
    pub fn as_string(&self) -> String {
        output::render(&self.as_struct())
    }
}

impl<V: ModuleVersion> fmt::Display for Range<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_string())
    }
}

impl<V: ModuleVersion> FromStr for Range<V> {
    type Err = ConstraintError;

    /// Parse a textual constraint; a blank string means minimum `0`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            return Ok(Range::default().with_minimum(V::zero())?);
        }

        let mut range = Range::default();
        for part in parser::parse_requirement(s)? {
            let version = V::parse_version(&part.version)?;
            for modifier in part.op.modifiers(version) {
                range = range.apply(&modifier)?;
            }
        }
        Ok(range)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Version;

    fn v(s: &str) -> Version {
        s.parse().unwrap()
    }

    fn range(s: &str) -> Range<Version> {
        s.parse().unwrap()
    }

    #[test]
    fn test_default_accepts_everything() {
        let r = Range::<Version>::default();
        assert!(r.accepts(&v("0")));
        assert!(r.accepts(&v("999.999")));
        assert_eq!(r.as_string(), "");
    }

    #[test]
    fn test_with_minimum_keeps_highest() {
        let r = Range::default().with_minimum(v("1.208")).unwrap();
        let r = r.with_minimum(v("2.602")).unwrap();
        let r = r.with_minimum(v("2.0")).unwrap();
        assert_eq!(r.as_string(), "2.602");
        assert!(r.accepts(&v("2.602")));
        assert!(!r.accepts(&v("2.601")));
    }

    #[test]
    fn test_with_maximum_keeps_lowest() {
        let r = Range::default().with_maximum(v("3.0")).unwrap();
        let r = r.with_maximum(v("2.0")).unwrap();
        let r = r.with_maximum(v("2.5")).unwrap();
        assert_eq!(r.as_string(), "<= 2.0");
        assert!(r.accepts(&v("2.0")));
        assert!(!r.accepts(&v("2.001")));
    }

    #[test]
    fn test_receiver_is_not_modified() {
        let original = Range::default().with_minimum(v("1.0")).unwrap();
        let _ = original.with_maximum(v("2.0")).unwrap();
        let _ = original.with_exclusion(v("1.5")).unwrap();
        assert_eq!(original.as_string(), "1.0");
    }

    #[test]
    fn test_equal_bounds_collapse_to_exact() {
        let r = Range::default()
            .with_minimum(v("1.5"))
            .unwrap()
            .with_maximum(v("1.5"))
            .unwrap();
        assert!(r.is_exact());
        assert_eq!(r.as_string(), "== 1.5");
    }

    #[test]
    fn test_equal_bounds_excluded_is_conflict() {
        let r = Range::default()
            .with_minimum(v("1.5"))
            .unwrap()
            .with_exclusion(v("1.5"))
            .unwrap();
        let err = r.with_maximum(v("1.5")).unwrap_err();
        assert_eq!(
            err,
            RangeError::ExcludedBoundary {
                version: "1.5".to_string()
            }
        );
    }

    #[test]
    fn test_minimum_exceeds_maximum() {
        let r = Range::default().with_maximum(v("1.0")).unwrap();
        let err = r.with_minimum(v("2.0")).unwrap_err();
        assert_eq!(format!("{}", err), "minimum 2.0 exceeds maximum 1.0");
    }

    #[test]
    fn test_exclusions_outside_bounds_dropped() {
        let r = Range::default()
            .with_exclusion(v("0.5"))
            .unwrap()
            .with_exclusion(v("1.5"))
            .unwrap()
            .with_exclusion(v("3.0"))
            .unwrap()
            .with_minimum(v("1.0"))
            .unwrap()
            .with_maximum(v("2.0"))
            .unwrap();
        match &r {
            Range::Bounded(bounds) => assert_eq!(bounds.exclusions(), &[v("1.5")]),
            Range::Exact(_) => panic!("expected bounded range"),
        }
        assert_eq!(r.as_string(), ">= 1.0, <= 2.0, != 1.5");
    }

    #[test]
    fn test_exclusions_sorted_and_deduplicated() {
        let r = Range::default()
            .with_exclusion(v("3"))
            .unwrap()
            .with_exclusion(v("1"))
            .unwrap()
            .with_exclusion(v("3.0"))
            .unwrap();
        assert_eq!(r.as_string(), "!= 1, != 3");
    }

    #[test]
    fn test_exclusion_rejects_version() {
        let r = Range::default().with_exclusion(v("1.5")).unwrap();
        assert!(!r.accepts(&v("1.5")));
        assert!(!r.accepts(&v("1.500")));
        assert!(r.accepts(&v("1.6")));
    }

    #[test]
    fn test_exact_version_inside_range() {
        let r = range(">= 1.0, <= 2.0");
        let exact = r.with_exact_version(v("1.5")).unwrap();
        assert_eq!(exact, Range::exact(v("1.5")));
        assert!(exact.accepts(&v("1.5")));
        assert!(!exact.accepts(&v("1.6")));
    }

    #[test]
    fn test_exact_version_outside_range() {
        let r = range(">= 1.0, <= 2.0");
        let err = r.with_exact_version(v("3.0")).unwrap_err();
        assert_eq!(
            format!("{}", err),
            "exact specification 3.0 outside of range >= 1.0, <= 2.0"
        );
    }

    #[test]
    fn test_exact_tolerates_compatible_modifiers() {
        let r = Range::exact(v("6.01"));
        assert_eq!(r.with_minimum(v("6.0")).unwrap(), r);
        assert_eq!(r.with_minimum(v("6.01")).unwrap(), r);
        assert_eq!(r.with_maximum(v("7")).unwrap(), r);
        assert_eq!(r.with_exclusion(v("5")).unwrap(), r);
        assert_eq!(r.with_exact_version(v("6.010")).unwrap(), r);
    }

    #[test]
    fn test_exact_rejects_incompatible_modifiers() {
        let r = Range::exact(v("6.01"));
        assert!(matches!(
            r.with_minimum(v("7.0")),
            Err(RangeError::MinimumAboveExact { .. })
        ));
        assert!(matches!(
            r.with_maximum(v("6.0")),
            Err(RangeError::MaximumBelowExact { .. })
        ));
        assert!(matches!(
            r.with_exclusion(v("6.01")),
            Err(RangeError::ExcludesExact { .. })
        ));
        assert!(matches!(
            r.with_exact_version(v("6.02")),
            Err(RangeError::ExactMismatch { .. })
        ));
    }

    #[test]
    fn test_as_modifiers_order() {
        let r = range(">= 1, <= 9, != 7, != 3");
        assert_eq!(
            r.as_modifiers(),
            vec![
                Modifier::Minimum(v("1")),
                Modifier::Maximum(v("9")),
                Modifier::Exclusion(v("3")),
                Modifier::Exclusion(v("7")),
            ]
        );
        assert_eq!(
            Range::exact(v("2")).as_modifiers(),
            vec![Modifier::Exact(v("2"))]
        );
    }

    #[test]
    fn test_merge() {
        let left = range(">= 1.0, != 1.5");
        let right = range("<= 2.0, != 1.7");
        let merged = left.merge(&right).unwrap();
        assert_eq!(merged.as_string(), ">= 1.0, <= 2.0, != 1.5, != 1.7");
    }

    #[test]
    fn test_merge_conflict() {
        let left = range(">= 3.0");
        let right = range("<= 2.0");
        assert!(matches!(
            left.merge(&right),
            Err(RangeError::MinimumExceedsMaximum { .. })
        ));
    }

    #[test]
    fn test_merge_into_exact() {
        let merged = range("== 1.5").merge(&range(">= 1.0, < 2.0")).unwrap();
        assert_eq!(merged.as_string(), "== 1.5");
    }

    #[test]
    fn test_from_str_blank_is_zero() {
        assert_eq!(range("").as_string(), "0");
        assert_eq!(range("  ").as_string(), "0");
    }

    #[test]
    fn test_from_str_errors() {
        assert!(matches!(
            "= 2".parse::<Range<Version>>(),
            Err(ConstraintError::Parse(_))
        ));
        assert!(matches!(
            ">= bogus".parse::<Range<Version>>(),
            Err(ConstraintError::Version(_))
        ));
        assert!(matches!(
            ">= 2, <= 1".parse::<Range<Version>>(),
            Err(ConstraintError::Conflict(_))
        ));
    }

    #[test]
    fn test_display() {
        let r = range("> 1, < 2");
        assert_eq!(format!("{}", r), "> 1, < 2");
    }

    #[test]
    fn test_semver_range() {
        let r: Range<semver::Version> = ">= 1.2.3, < 2.0.0".parse().unwrap();
        assert!(r.accepts(&semver::Version::new(1, 9, 0)));
        assert!(!r.accepts(&semver::Version::new(2, 0, 0)));
        assert_eq!(r.as_string(), ">= 1.2.3, < 2.0.0");
    }
}
