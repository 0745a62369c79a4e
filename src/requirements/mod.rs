//! Version requirements indexed by dependency name
//!
//! Every mutation goes through one choke-point that:
//! - applies the modifier to a copy of the module's range
//! - refuses content changes once the aggregate is finalized
//! - tags range conflicts with the module name
//!
//! Multi-step calls (textual constraints, merges) are staged and only
//! committed when every step succeeds.

mod options;
mod serialization;

pub use options::{BadVersionHook, RequirementsOptions};

use crate::domain::{Modifier, ModuleVersion, Range, RequirementPart, Version};
use crate::error::RequirementsError;
use crate::parser;
use std::collections::BTreeMap;

/// Something that may hold a textual requirement
///
/// `None` and blank strings both stand for an absent requirement.
pub trait RequirementText {
    /// Returns the requirement string, if one is present
    fn requirement_text(&self) -> Option<&str>;
}

impl RequirementText for str {
    fn requirement_text(&self) -> Option<&str> {
        Some(self)
    }
}

impl RequirementText for String {
    fn requirement_text(&self) -> Option<&str> {
        Some(self.as_str())
    }
}

impl<T: RequirementText + ?Sized> RequirementText for &T {
    fn requirement_text(&self) -> Option<&str> {
        (**self).requirement_text()
    }
}

impl<T: RequirementText> RequirementText for Option<T> {
    fn requirement_text(&self) -> Option<&str> {
        self.as_ref().and_then(|text| text.requirement_text())
    }
}

/// Version requirements for a set of named dependencies
#[derive(Debug)]
pub struct Requirements<V: ModuleVersion = Version> {
    requirements: BTreeMap<String, Range<V>>,
    finalized: bool,
    options: RequirementsOptions<V>,
}

impl<V: ModuleVersion> Default for Requirements<V> {
    fn default() -> Self {
        Self::new()
    }
}

/// Clones are never finalized
impl<V: ModuleVersion> Clone for Requirements<V> {
    fn clone(&self) -> Self {
        Self {
            requirements: self.requirements.clone(),
            finalized: false,
            options: self.options.clone(),
        }
    }
}

impl<V: ModuleVersion> Requirements<V> {
    /// Create an empty aggregate with default options
    pub fn new() -> Self {
        Self::with_options(RequirementsOptions::default())
    }

    /// Create an empty aggregate with the given options
    pub fn with_options(options: RequirementsOptions<V>) -> Self {
        Self {
            requirements: BTreeMap::new(),
            finalized: false,
            options,
        }
    }

    /// Build an aggregate from `module -> requirement string` pairs
    pub fn from_string_hash<I, K, T>(
        hash: I,
        options: RequirementsOptions<V>,
    ) -> Result<Self, RequirementsError>
    where
        I: IntoIterator<Item = (K, T)>,
        K: AsRef<str>,
        T: RequirementText,
    {
        let mut requirements = Self::with_options(options);
        for (module, text) in hash {
            requirements.add_string_requirement(module.as_ref(), text)?;
        }
        Ok(requirements)
    }

    /// Require at least `version`
    ///
    /// A minimum of `0` never changes an existing entry.
    pub fn add_minimum(
        &mut self,
        module: &str,
        version: &str,
    ) -> Result<&mut Self, RequirementsError> {
        let version = self.version_for(module, version)?;
        self.add_modifier(module, Modifier::Minimum(version))
    }

    /// Require at most `version`
    pub fn add_maximum(
        &mut self,
        module: &str,
        version: &str,
    ) -> Result<&mut Self, RequirementsError> {
        let version = self.version_for(module, version)?;
        self.add_modifier(module, Modifier::Maximum(version))
    }

    /// Forbid `version`
    pub fn add_exclusion(
        &mut self,
        module: &str,
        version: &str,
    ) -> Result<&mut Self, RequirementsError> {
        let version = self.version_for(module, version)?;
        self.add_modifier(module, Modifier::Exclusion(version))
    }

    /// Require exactly `version`
    pub fn exact_version(
        &mut self,
        module: &str,
        version: &str,
    ) -> Result<&mut Self, RequirementsError> {
        let version = self.version_for(module, version)?;
        self.add_modifier(module, Modifier::Exact(version))
    }

    /// Apply an already-parsed modifier to `module`
    pub fn add_modifier(
        &mut self,
        module: &str,
        modifier: Modifier<V>,
    ) -> Result<&mut Self, RequirementsError> {
        self.modify_entry(module, &[modifier])
    }

    /// Apply a textual constraint such as `>= 1.2, != 1.5, <= 2.0`
    ///
    /// An absent or blank requirement is read as `0` and logged as a warning.
    /// Either every constraint in the string is applied or none is.
    pub fn add_string_requirement<T: RequirementText>(
        &mut self,
        module: &str,
        requirement: T,
    ) -> Result<&mut Self, RequirementsError> {
        let text = match requirement.requirement_text() {
            Some(text) if !text.trim().is_empty() => text,
            _ => {
                warn_blank(module);
                return self.add_modifier(module, Modifier::Minimum(V::zero()));
            }
        };

        let parts = parser::parse_requirement(text)
            .map_err(|source| RequirementsError::parse(module, text, source))?;

        let mut modifiers = Vec::with_capacity(parts.len());
        for part in parts {
            let version = self.version_for(module, &part.version)?;
            modifiers.extend(part.op.modifiers(version));
        }

        self.modify_entry(module, &modifiers)
    }

    /// Merge every requirement of `other` into this aggregate
    ///
    /// Each of `other`'s ranges is replayed as its modifier log, so failures
    /// carry the right module name. Nothing is changed if any module fails.
    pub fn add_requirements(
        &mut self,
        other: &Requirements<V>,
    ) -> Result<&mut Self, RequirementsError> {
        let mut staged = Vec::with_capacity(other.requirements.len());

        for (module, range) in &other.requirements {
            if let Some(entry) =
                self.replay(module, self.requirements.get(module), &range.as_modifiers())?
            {
                staged.push((module.clone(), entry));
            }
        }

        self.requirements.extend(staged);
        Ok(self)
    }

    /// Returns true if `version` satisfies the requirements of `module`
    ///
    /// A module without requirements accepts every version.
    pub fn accepts_module(&self, module: &str, version: &V) -> bool {
        self.requirements
            .get(module)
            .map_or(true, |range| range.accepts(version))
    }

    /// Remove every requirement of `module`
    pub fn clear_requirement(&mut self, module: &str) -> Result<&mut Self, RequirementsError> {
        if !self.requirements.contains_key(module) {
            return Ok(self);
        }
        if self.finalized {
            return Err(RequirementsError::finalized_clear(module));
        }

        self.requirements.remove(module);
        tracing::debug!("Cleared requirements for {module}");
        Ok(self)
    }

    /// Returns the names of all modules with requirements, in name order
    pub fn required_modules(&self) -> Vec<&str> {
        self.requirements.keys().map(String::as_str).collect()
    }

    /// Returns the range stored for `module`
    pub fn range_for_module(&self, module: &str) -> Option<&Range<V>> {
        self.requirements.get(module)
    }

    /// Returns the canonical requirement string for `module`
    pub fn requirements_for_module(&self, module: &str) -> Option<String> {
        self.requirements.get(module).map(Range::as_string)
    }

    /// Returns the structured requirement for `module`
    pub fn structured_requirements_for_module(&self, module: &str) -> Option<Vec<RequirementPart>> {
        self.requirements.get(module).map(Range::as_struct)
    }

    /// Lock the aggregate against content changes
    pub fn finalize(&mut self) {
        if !self.finalized {
            tracing::debug!("Finalized requirements for {} modules", self.len());
        }
        self.finalized = true;
    }

    /// Returns true once `finalize` has been called
    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    /// Returns true if every requirement is a bare minimum version
    pub fn is_simple(&self) -> bool {
        self.requirements
            .values()
            .all(|range| !range.as_string().contains(char::is_whitespace))
    }

    /// Returns the canonical requirement string of every module
    pub fn as_string_hash(&self) -> BTreeMap<String, String> {
        self.requirements
            .iter()
            .map(|(module, range)| (module.clone(), range.as_string()))
            .collect()
    }

    /// Returns the number of modules with requirements
    pub fn len(&self) -> usize {
        self.requirements.len()
    }

    /// Returns true if no module has requirements
    pub fn is_empty(&self) -> bool {
        self.requirements.is_empty()
    }

    /// Iterate over `(module, range)` pairs in name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Range<V>)> {
        self.requirements
            .iter()
            .map(|(module, range)| (module.as_str(), range))
    }

    fn modify_entry(
        &mut self,
        module: &str,
        modifiers: &[Modifier<V>],
    ) -> Result<&mut Self, RequirementsError> {
        if let Some(entry) = self.replay(module, self.requirements.get(module), modifiers)? {
            self.requirements.insert(module.to_string(), entry);
        }
        Ok(self)
    }

    /// Apply `modifiers` in order starting from `current`, without storing anything
    fn replay(
        &self,
        module: &str,
        current: Option<&Range<V>>,
        modifiers: &[Modifier<V>],
    ) -> Result<Option<Range<V>>, RequirementsError> {
        let mut entry = current.cloned();
        for modifier in modifiers {
            entry = Some(self.modified_entry(module, entry.as_ref(), modifier)?);
        }
        Ok(entry)
    }

    fn modified_entry(
        &self,
        module: &str,
        current: Option<&Range<V>>,
        modifier: &Modifier<V>,
    ) -> Result<Range<V>, RequirementsError> {
        let Some(current) = current else {
            if self.finalized {
                return Err(RequirementsError::finalized_add(module));
            }
            return Range::default()
                .apply(modifier)
                .map_err(|source| RequirementsError::range_conflict(module, source));
        };

        if let Modifier::Minimum(version) = modifier {
            if *version == V::zero() {
                return Ok(current.clone());
            }
        }

        let updated = current
            .apply(modifier)
            .map_err(|source| RequirementsError::range_conflict(module, source))?;

        if self.finalized && current.as_string() != updated.as_string() {
            return Err(RequirementsError::finalized_modify(module));
        }
        Ok(updated)
    }

    fn version_for(&self, module: &str, raw: &str) -> Result<V, RequirementsError> {
        if raw.trim().is_empty() {
            warn_blank(module);
            return Ok(V::zero());
        }

        let err = match V::parse_version(raw) {
            Ok(version) => return Ok(version),
            Err(err) => err,
        };

        let Some(hook) = self.options.bad_version_hook() else {
            return Err(RequirementsError::version_conflict(
                module,
                raw,
                err.to_string(),
            ));
        };

        tracing::debug!("Coercing version '{raw}' for {module} with bad version hook");
        hook(raw, module).ok_or_else(|| {
            RequirementsError::version_conflict(
                module,
                raw,
                format!("bad version hook could not recover it ({err})"),
            )
        })
    }
}

fn warn_blank(module: &str) {
    tracing::warn!("Undefined requirement for {module} treated as '0'");
}
