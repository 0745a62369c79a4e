//! depreqs - Version-range requirements for named dependencies
//!
//! This library keeps the version constraints of a set of dependencies:
//! - Minimum, maximum and excluded versions per dependency
//! - Collapse to an exact version when the bounds meet
//! - Conflict detection when constraints contradict each other
//! - Parsing and rendering of `>= 1.2, != 1.5, <= 2.0` style strings
//! - Merging of requirement sets and a finalize lock

pub mod domain;
pub mod error;
pub mod output;
pub mod parser;
pub mod requirements;

pub use domain::{Modifier, ModuleVersion, Operator, Range, RequirementPart, Version};
pub use error::{ConstraintError, ParseError, RangeError, RequirementsError, VersionError};
pub use requirements::{Requirements, RequirementsOptions};
