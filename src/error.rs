//! Error types using thiserror
//!
//! Error hierarchy:
//! - VersionError: A version string could not be parsed
//! - ParseError: A textual constraint is malformed
//! - RangeError: Two constraints on the same range contradict each other
//! - ConstraintError: Any of the above, raised while building a standalone range
//! - RequirementsError: Failures of the requirements aggregate, tagged with the module name

use thiserror::Error;

/// Errors raised while parsing a version string
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VersionError {
    /// The string is not a recognizable version
    #[error("invalid version '{raw}': {message}")]
    Invalid { raw: String, message: String },
}

/// Errors raised by the textual constraint grammar
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// A comma-separated slot holds nothing
    #[error("empty constraint in requirement string")]
    EmptyConstraint,

    /// The token starts with something that looks like an operator but is not one
    #[error("unrecognized operator in '{token}'")]
    UnknownOperator { token: String },

    /// An operator with no version after it
    #[error("missing version after '{op}'")]
    MissingVersion { op: String },
}

/// Contradictions detected by the range algebra
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RangeError {
    #[error("minimum {minimum} exceeds maximum {maximum}")]
    MinimumExceedsMaximum { minimum: String, maximum: String },

    #[error("minimum and maximum are both {version}, which is excluded")]
    ExcludedBoundary { version: String },

    #[error("exact specification {version} outside of range {range}")]
    ExactOutsideRange { version: String, range: String },

    #[error("minimum {minimum} exceeds exact specification {exact}")]
    MinimumAboveExact { minimum: String, exact: String },

    #[error("maximum {maximum} below exact specification {exact}")]
    MaximumBelowExact { maximum: String, exact: String },

    #[error("tried to exclude {version}, which is already exactly specified")]
    ExcludesExact { version: String },

    #[error("can't be exactly {requested} when exact requirement is already {exact}")]
    ExactMismatch { requested: String, exact: String },
}

/// Errors raised while building a single range from text
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConstraintError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Version(#[from] VersionError),

    #[error(transparent)]
    Conflict(#[from] RangeError),
}

/// Errors raised by the requirements aggregate
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RequirementsError {
    /// The new constraint contradicts the module's existing range
    #[error("illegal requirements for {module}: {source}")]
    RangeConflict {
        module: String,
        #[source]
        source: RangeError,
    },

    /// The aggregate is finalized and the call would change it
    #[error("{message}")]
    FinalizedMutation { module: String, message: String },

    /// The requirement string does not follow the constraint grammar
    #[error("invalid requirement '{requirement}' for {module}: {source}")]
    Parse {
        module: String,
        requirement: String,
        #[source]
        source: ParseError,
    },

    /// A version string could not be converted, even with the bad-version hook
    #[error("can't convert '{version}' for {module}: {message}")]
    VersionConflict {
        module: String,
        version: String,
        message: String,
    },
}

impl RequirementsError {
    /// Creates a new RangeConflict error
    pub fn range_conflict(module: impl Into<String>, source: RangeError) -> Self {
        RequirementsError::RangeConflict {
            module: module.into(),
            source,
        }
    }

    /// Creates the error for adding a module to a finalized aggregate
    pub fn finalized_add(module: impl Into<String>) -> Self {
        let module = module.into();
        RequirementsError::FinalizedMutation {
            message: format!("can't add new requirements for {module} to finalized requirements"),
            module,
        }
    }

    /// Creates the error for changing an existing module of a finalized aggregate
    pub fn finalized_modify(module: impl Into<String>) -> Self {
        let module = module.into();
        RequirementsError::FinalizedMutation {
            message: format!("can't modify finalized requirements for {module}"),
            module,
        }
    }

    /// Creates the error for clearing a module of a finalized aggregate
    pub fn finalized_clear(module: impl Into<String>) -> Self {
        let module = module.into();
        RequirementsError::FinalizedMutation {
            message: format!("can't clear requirements for {module} on finalized requirements"),
            module,
        }
    }

    /// Creates a new Parse error
    pub fn parse(
        module: impl Into<String>,
        requirement: impl Into<String>,
        source: ParseError,
    ) -> Self {
        RequirementsError::Parse {
            module: module.into(),
            requirement: requirement.into(),
            source,
        }
    }

    /// Creates a new VersionConflict error
    pub fn version_conflict(
        module: impl Into<String>,
        version: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        RequirementsError::VersionConflict {
            module: module.into(),
            version: version.into(),
            message: message.into(),
        }
    }

    /// Returns the module the failure is attributed to
    pub fn module(&self) -> &str {
        match self {
            RequirementsError::RangeConflict { module, .. }
            | RequirementsError::FinalizedMutation { module, .. }
            | RequirementsError::Parse { module, .. }
            | RequirementsError::VersionConflict { module, .. } => module,
        }
    }
}
