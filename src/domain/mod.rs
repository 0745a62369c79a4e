//! Core domain models for depreqs
//!
//! This module contains the fundamental types used throughout the library:
//! - Version values and the capability trait ranges are generic over
//! - Operators and the primitive modifiers they expand into
//! - The per-dependency constraint range

mod operator;
mod range;
mod version;

pub use operator::{Modifier, Operator, RequirementPart};
pub use range::{Bounds, Range};
pub use version::{ModuleVersion, Version};
