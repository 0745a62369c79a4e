//! Version values for package metadata
//!
//! Handles the two numbering styles found in package metadata:
//! - Decimal: `1.208`, `2.602`, `10` (the fraction is read in groups of three digits)
//! - Dotted-decimal: `v1.2.3`, `1.2.3`, `v5`
//!
//! Underscore alpha markers (`1.02_03`) are stripped before parsing.

use crate::error::VersionError;
use regex::Regex;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

// Regex patterns for the two numbering styles
static DOTTED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:v[0-9]+(?:\.[0-9]+)*|[0-9]+\.[0-9]+(?:\.[0-9]+)+)$").unwrap());
static DECIMAL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([0-9]+)(?:\.([0-9]*))?$").unwrap());

/// Capabilities a version type must offer to be constrained by a range
pub trait ModuleVersion: Clone + Ord + fmt::Display + fmt::Debug {
    /// Parse a version from its string form
    fn parse_version(raw: &str) -> Result<Self, VersionError>;

    /// The version every blank requirement stands for
    fn zero() -> Self;
}

/// A package-metadata version with its original spelling preserved
///
/// Each numeric component must fit in a `u64`; longer digit runs are
/// rejected as invalid rather than truncated.
#[derive(Debug, Clone)]
pub struct Version {
    original: String,
    components: Vec<u64>,
}

impl Version {
    /// Returns the numeric components used for comparison
    pub fn components(&self) -> &[u64] {
        &self.components
    }
}

impl ModuleVersion for Version {
    fn parse_version(raw: &str) -> Result<Self, VersionError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(invalid(raw, "empty version string"));
        }

        let normalized = trimmed.replace('_', "");

        if DOTTED_RE.is_match(&normalized) {
            let digits = normalized.strip_prefix('v').unwrap_or(&normalized);
            let components = digits
                .split('.')
                .map(|part| parse_component(raw, part))
                .collect::<Result<Vec<_>, _>>()?;
            return Ok(Self {
                original: trimmed.to_string(),
                components,
            });
        }

        if let Some(caps) = DECIMAL_RE.captures(&normalized) {
            let integer = caps.get(1).map_or("", |m| m.as_str());
            let mut components = vec![parse_component(raw, integer)?];

            if let Some(fraction) = caps.get(2).map(|m| m.as_str()) {
                let mut padded = fraction.to_string();
                while padded.len() % 3 != 0 {
                    padded.push('0');
                }
                for chunk in padded.as_bytes().chunks(3) {
                    let group = std::str::from_utf8(chunk)
                        .map_err(|_| invalid(raw, "non-ascii fraction"))?;
                    components.push(parse_component(raw, group)?);
                }
            }

            return Ok(Self {
                original: trimmed.to_string(),
                components,
            });
        }

        Err(invalid(raw, "not a decimal or dotted-decimal version"))
    }

    fn zero() -> Self {
        Self {
            original: "0".to_string(),
            components: vec![0],
        }
    }
}

fn parse_component(raw: &str, part: &str) -> Result<u64, VersionError> {
    part.parse::<u64>()
        .map_err(|e| invalid(raw, format!("component '{}': {}", part, e)))
}

fn invalid(raw: &str, message: impl Into<String>) -> VersionError {
    VersionError::Invalid {
        raw: raw.to_string(),
        message: message.into(),
    }
}

impl FromStr for Version {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_version(s)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.original)
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Version {}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        // Missing trailing components count as zero
        let len = self.components.len().max(other.components.len());
        for i in 0..len {
            let a = self.components.get(i).copied().unwrap_or(0);
            let b = other.components.get(i).copied().unwrap_or(0);
            match a.cmp(&b) {
                Ordering::Equal => continue,
                ord => return ord,
            }
        }
        Ordering::Equal
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl ModuleVersion for semver::Version {
    fn parse_version(raw: &str) -> Result<Self, VersionError> {
        semver::Version::parse(raw.trim()).map_err(|e| invalid(raw, e.to_string()))
    }

    fn zero() -> Self {
        semver::Version::new(0, 0, 0)
    }
}
