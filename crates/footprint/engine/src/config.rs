//! Engine configuration

use serde::{Deserialize, Serialize};

use crate::error::{FootprintError, Result};

/// Constants the damage model needs besides the coefficient tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Working days per year used to estimate a device's lifetime usage.
    #[serde(default = "default_worked_days_per_year")]
    pub worked_days_per_year: f64,

    /// Number of meetings one download of a non-streamed client is spread over.
    #[serde(default = "default_spreading_factor")]
    pub spreading_factor: f64,

    /// Network table entry used for software transfers.
    #[serde(default = "default_network_profile")]
    pub network_profile: String,

    #[serde(default)]
    pub alternatives: AlternativesConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            worked_days_per_year: default_worked_days_per_year(),
            spreading_factor: default_spreading_factor(),
            network_profile: default_network_profile(),
            alternatives: AlternativesConfig::default(),
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.worked_days_per_year > 0.0 && self.worked_days_per_year <= 366.0) {
            return Err(FootprintError::InvalidParameter(format!(
                "worked_days_per_year must be within (0, 366], got {}",
                self.worked_days_per_year
            )));
        }
        if !(self.spreading_factor.is_finite() && self.spreading_factor > 0.0) {
            return Err(FootprintError::InvalidParameter(format!(
                "spreading_factor must be positive, got {}",
                self.spreading_factor
            )));
        }
        self.alternatives.validate()
    }
}

/// One hardware line of an alternative bundle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BundleItem {
    pub hardware: String,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

impl BundleItem {
    pub fn new(hardware: impl Into<String>, quantity: u32) -> Self {
        Self {
            hardware: hardware.into(),
            quantity,
        }
    }
}

/// A journey the light-transport alternative hands out round-robin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceJourney {
    pub mean: String,
    pub distance_km: f64,
}

impl ReferenceJourney {
    pub fn new(mean: impl Into<String>, distance_km: f64) -> Self {
        Self {
            mean: mean.into(),
            distance_km,
        }
    }
}

/// What the two generated alternative scenarios are made of.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlternativesConfig {
    /// Equipment of one participant in a dedicated conferencing setup.
    #[serde(default = "default_heavy_bundle")]
    pub heavy_bundle: Vec<BundleItem>,

    /// Equipment of one participant joining from a plain desktop.
    #[serde(default = "default_light_bundle")]
    pub light_bundle: Vec<BundleItem>,

    #[serde(default = "default_laptop")]
    pub laptop: String,

    /// Conferencing client shared by every participant.
    #[serde(default = "default_software")]
    pub software: String,

    #[serde(default = "default_bus_mean")]
    pub bus_mean: String,

    #[serde(default = "default_bus_distance_km")]
    pub bus_distance_km: f64,

    #[serde(default = "default_reference_journeys")]
    pub reference_journeys: Vec<ReferenceJourney>,
}

impl Default for AlternativesConfig {
    fn default() -> Self {
        Self {
            heavy_bundle: default_heavy_bundle(),
            light_bundle: default_light_bundle(),
            laptop: default_laptop(),
            software: default_software(),
            bus_mean: default_bus_mean(),
            bus_distance_km: default_bus_distance_km(),
            reference_journeys: default_reference_journeys(),
        }
    }
}

impl AlternativesConfig {
    pub fn validate(&self) -> Result<()> {
        if self.reference_journeys.is_empty() {
            return Err(FootprintError::InvalidParameter(
                "alternatives.reference_journeys must not be empty".into(),
            ));
        }
        let mut bundles = self.heavy_bundle.iter().chain(self.light_bundle.iter());
        if let Some(item) = bundles.find(|item| item.quantity == 0) {
            return Err(FootprintError::InvalidParameter(format!(
                "bundle item {} has quantity 0",
                item.hardware
            )));
        }
        Ok(())
    }
}

// Default value helpers
fn default_worked_days_per_year() -> f64 {
    230.0
}

fn default_spreading_factor() -> f64 {
    10.0
}

fn default_network_profile() -> String {
    "default".to_string()
}

fn default_quantity() -> u32 {
    1
}

fn default_heavy_bundle() -> Vec<BundleItem> {
    vec![
        BundleItem::new("desktop", 1),
        BundleItem::new("videoconference-kit", 1),
        BundleItem::new("monitor", 2),
        BundleItem::new("support-structure", 1),
    ]
}

fn default_light_bundle() -> Vec<BundleItem> {
    vec![
        BundleItem::new("desktop", 1),
        BundleItem::new("webcam", 1),
        BundleItem::new("microphone", 1),
    ]
}

fn default_laptop() -> String {
    "laptop".to_string()
}

fn default_software() -> String {
    "jitsi".to_string()
}

fn default_bus_mean() -> String {
    "city-bus".to_string()
}

fn default_bus_distance_km() -> f64 {
    10.0
}

fn default_reference_journeys() -> Vec<ReferenceJourney> {
    vec![
        ReferenceJourney::new("train", 20.0),
        ReferenceJourney::new("city-bus", 5.0),
        ReferenceJourney::new("car", 10.0),
    ]
}
