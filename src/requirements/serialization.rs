//! Serde support for requirements
//!
//! A `Requirements` value is written as its string hash, a map of module
//! name to canonical requirement string. Reading accepts strings, integers
//! and nulls (a null requirement is read as `0`).

use super::{Requirements, RequirementsOptions};
use crate::domain::ModuleVersion;
use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A requirement value as it may appear in a metadata file
#[derive(Deserialize)]
#[serde(untagged)]
enum RawRequirement {
    Text(String),
    Integer(u64),
}

impl RawRequirement {
    fn into_text(self) -> String {
        match self {
            RawRequirement::Text(text) => text,
            RawRequirement::Integer(n) => n.to_string(),
        }
    }
}

impl<V: ModuleVersion> Serialize for Requirements<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.as_string_hash().serialize(serializer)
    }
}

impl<'de, V: ModuleVersion> Deserialize<'de> for Requirements<V> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = BTreeMap::<String, Option<RawRequirement>>::deserialize(deserializer)?;
        let hash = raw
            .into_iter()
            .map(|(module, requirement)| (module, requirement.map(RawRequirement::into_text)));
        Requirements::from_string_hash(hash, RequirementsOptions::default())
            .map_err(de::Error::custom)
    }
}
