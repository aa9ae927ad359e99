//! Coefficient table entries as they are stored on disk.

use std::collections::BTreeMap;
use std::fmt;

use footprint_types::{DamageVector, Ranged};
use serde::{Deserialize, Serialize};

/// Which table a lookup went to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableKind {
    Hardware,
    Software,
    TransportationMean,
    Network,
}

impl fmt::Display for TableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableKind::Hardware => f.write_str("hardware"),
            TableKind::Software => f.write_str("software"),
            TableKind::TransportationMean => f.write_str("transportation mean"),
            TableKind::Network => f.write_str("network"),
        }
    }
}

/// A hardware entry is either made of other hardware entries or carries its
/// own coefficients, never both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HardwareDefinition {
    /// Delegates entirely to its children (e.g. a TV is a base plus a screen).
    Composite { components: BTreeMap<String, u32> },
    Atomic(AtomicHardware),
}

impl HardwareDefinition {
    pub fn as_atomic(&self) -> Option<&AtomicHardware> {
        match self {
            HardwareDefinition::Atomic(atomic) => Some(atomic),
            HardwareDefinition::Composite { .. } => None,
        }
    }

    pub fn is_composite(&self) -> bool {
        matches!(self, HardwareDefinition::Composite { .. })
    }
}

/// Coefficients of a device that is not broken down further.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AtomicHardware {
    /// Whether coefficients are given per unit of size (e.g. per square inch
    /// of screen) and must be multiplied by the item's size.
    #[serde(default)]
    pub size_dependent: bool,

    /// Size used when a usage record does not provide one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_size: Option<f64>,

    pub lifetime_years: f64,

    pub daily_operating_hours: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight_grams: Option<Ranged<f64>>,

    /// Manufacturing damage over the whole lifetime.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embodied: Option<EmbodiedCoefficient>,

    /// Damage per minute of meeting use.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operating_visio: Option<Ranged<DamageVector>>,

    /// Damage per minute on standby.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operating_standby: Option<Ranged<DamageVector>>,

    /// Measured lifetime usage, replacing the lifetime/daily-hours estimate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub known_usage: Option<KnownUsage>,
}

/// Where an item's embodied damage comes from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmbodiedCoefficient {
    Measured(Ranged<DamageVector>),
    /// Borrow the per-gram embodied coefficient of another atomic entry and
    /// scale it by this item's weight.
    AssimilatedTo(String),
}

/// Hours a device spends in meeting use and on standby over its life.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KnownUsage {
    pub visio_hours: f64,
    pub standby_hours: f64,
}

/// Inbound bandwidth of a conferencing client, in Kbit/s.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Bandwidth {
    /// Independent of participant count.
    Flat(f64),
    /// Measured at a few participant counts.
    ByParticipants(BTreeMap<u32, Ranged<f64>>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoftwareDefinition {
    #[serde(default)]
    pub file_size_bytes: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bandwidth: Option<Bandwidth>,

    /// Whether the client is downloaded for meetings instead of streamed.
    #[serde(default)]
    pub download_required: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportSubcategory {
    Car,
    Train,
    Bus,
    Plane,
    Bike,
    Walk,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransportationMeanDefinition {
    pub subcategory: TransportSubcategory,

    /// True when `coefficient` is per passenger-km, false when per vehicle-km.
    #[serde(default)]
    pub per_person_km: bool,

    pub coefficient: DamageVector,
}

/// The full set of tables, as loaded from disk.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogData {
    #[serde(default)]
    pub hardware: BTreeMap<String, HardwareDefinition>,

    #[serde(default)]
    pub software: BTreeMap<String, SoftwareDefinition>,

    #[serde(default)]
    pub transportation_means: BTreeMap<String, TransportationMeanDefinition>,

    /// Damage per transmitted bit, by network profile.
    #[serde(default)]
    pub network: BTreeMap<String, Ranged<DamageVector>>,
}
