//! Textual constraint grammar
//!
//! A requirement string is a comma-separated list of constraints, each an
//! optional operator followed by a version:
//! - `1.2` (bare version, same as `>= 1.2`)
//! - `>= 1.2, != 1.5, <= 2.0`
//! - `== 6.01`
//!
//! The parser only splits and classifies tokens; versions stay as strings
//! so that callers can decide how to convert them.

mod requirement;

pub use requirement::parse_requirement;
