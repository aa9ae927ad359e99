//! Strongly-typed identifiers for footprint entities
//!
//! All IDs are UUID-based but wrapped in newtype structs for type safety.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Unique identifier for a meeting scenario
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScenarioId(Uuid);

impl ScenarioId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for ScenarioId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "scenario:{}", self.0)
    }
}

impl FromStr for ScenarioId {
    type Err = uuid::Error;

    /// Accepts both the bare UUID and the `scenario:` display form.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.strip_prefix("scenario:").unwrap_or(s);
        Uuid::parse_str(raw).map(Self)
    }
}

/// Identifier of one component inside a scenario. Assigned once when the
/// component is created and never changed by updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ComponentId(Uuid);

impl ComponentId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "component:{}", self.0)
    }
}
