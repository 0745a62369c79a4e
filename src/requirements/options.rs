//! Configuration for a requirements aggregate
//!
//! This module provides the RequirementsOptions struct that carries the
//! optional bad-version hook into the aggregate at construction time.

use std::fmt;
use std::sync::Arc;

/// Hook invoked with `(raw_version, module)` when a version string fails to parse
///
/// Returning `None` means the string could not be recovered either.
pub type BadVersionHook<V> = Arc<dyn Fn(&str, &str) -> Option<V> + Send + Sync>;

/// Options for a requirements aggregate
pub struct RequirementsOptions<V> {
    bad_version_hook: Option<BadVersionHook<V>>,
}

impl<V> RequirementsOptions<V> {
    /// Create options with no hook
    pub fn new() -> Self {
        Self {
            bad_version_hook: None,
        }
    }

    /// Set the hook used to coerce unparsable version strings
    pub fn with_bad_version_hook<F>(mut self, hook: F) -> Self
    where
        F: Fn(&str, &str) -> Option<V> + Send + Sync + 'static,
    {
        self.bad_version_hook = Some(Arc::new(hook));
        self
    }

    /// Returns the configured hook, if any
    pub fn bad_version_hook(&self) -> Option<&BadVersionHook<V>> {
        self.bad_version_hook.as_ref()
    }
}

impl<V> Default for RequirementsOptions<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> Clone for RequirementsOptions<V> {
    fn clone(&self) -> Self {
        Self {
            bad_version_hook: self.bad_version_hook.clone(),
        }
    }
}

impl<V> fmt::Debug for RequirementsOptions<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequirementsOptions")
            .field("bad_version_hook", &self.bad_version_hook.is_some())
            .finish()
    }
}
