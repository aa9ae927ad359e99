use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul};

use serde::{Deserialize, Serialize};
use tracing::warn;

/// One of the four damage endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DamageEndpoint {
    HumanHealth,
    EcosystemQuality,
    ClimateChange,
    Resources,
}

impl DamageEndpoint {
    pub const ALL: [DamageEndpoint; 4] = [
        DamageEndpoint::HumanHealth,
        DamageEndpoint::EcosystemQuality,
        DamageEndpoint::ClimateChange,
        DamageEndpoint::Resources,
    ];
}

impl fmt::Display for DamageEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DamageEndpoint::HumanHealth => "human_health",
            DamageEndpoint::EcosystemQuality => "ecosystem_quality",
            DamageEndpoint::ClimateChange => "climate_change",
            DamageEndpoint::Resources => "resources",
        };
        f.write_str(name)
    }
}

/// Environmental damage along the four endpoints.
///
/// Each endpoint carries its own fixed unit and endpoints never influence each
/// other: every operation here is applied pointwise.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DamageVector {
    pub human_health: f64,
    pub ecosystem_quality: f64,
    pub climate_change: f64,
    pub resources: f64,
}

impl DamageVector {
    pub const ZERO: DamageVector = DamageVector {
        human_health: 0.0,
        ecosystem_quality: 0.0,
        climate_change: 0.0,
        resources: 0.0,
    };

    pub fn new(
        human_health: f64,
        ecosystem_quality: f64,
        climate_change: f64,
        resources: f64,
    ) -> Self {
        Self {
            human_health,
            ecosystem_quality,
            climate_change,
            resources,
        }
    }

    /// The same value on every endpoint.
    pub fn splat(value: f64) -> Self {
        Self::new(value, value, value, value)
    }

    pub fn get(&self, endpoint: DamageEndpoint) -> f64 {
        match endpoint {
            DamageEndpoint::HumanHealth => self.human_health,
            DamageEndpoint::EcosystemQuality => self.ecosystem_quality,
            DamageEndpoint::ClimateChange => self.climate_change,
            DamageEndpoint::Resources => self.resources,
        }
    }

    pub fn endpoints(&self) -> [(DamageEndpoint, f64); 4] {
        DamageEndpoint::ALL.map(|endpoint| (endpoint, self.get(endpoint)))
    }

    /// Pointwise difference, clamped at zero on every endpoint.
    pub fn subtract(&self, other: &DamageVector) -> DamageVector {
        self.zip_with(other, |a, b| (a - b).max(0.0))
    }

    pub fn scale(&self, factor: f64) -> DamageVector {
        self.transform(|v| v * factor)
    }

    /// Maps every endpoint through `f`.
    pub fn transform(&self, f: impl Fn(f64) -> f64) -> DamageVector {
        DamageVector {
            human_health: f(self.human_health),
            ecosystem_quality: f(self.ecosystem_quality),
            climate_change: f(self.climate_change),
            resources: f(self.resources),
        }
    }

    pub fn zip_with(&self, other: &DamageVector, f: impl Fn(f64, f64) -> f64) -> DamageVector {
        DamageVector {
            human_health: f(self.human_health, other.human_health),
            ecosystem_quality: f(self.ecosystem_quality, other.ecosystem_quality),
            climate_change: f(self.climate_change, other.climate_change),
            resources: f(self.resources, other.resources),
        }
    }

    pub fn is_zero(&self) -> bool {
        self.endpoints().iter().all(|(_, v)| *v == 0.0)
    }

    /// True when every endpoint is less than or equal to `other`'s.
    pub fn dominated_by(&self, other: &DamageVector) -> bool {
        DamageEndpoint::ALL
            .iter()
            .all(|e| self.get(*e) <= other.get(*e))
    }

    /// Pointwise comparison with a relative tolerance. Endpoints that are both
    /// below `f64::EPSILON` compare equal.
    pub fn approx_eq(&self, other: &DamageVector, rel_tolerance: f64) -> bool {
        DamageEndpoint::ALL.iter().all(|e| {
            let a = self.get(*e);
            let b = other.get(*e);
            let scale = a.abs().max(b.abs());
            scale < f64::EPSILON || (a - b).abs() <= rel_tolerance * scale
        })
    }

    /// Largest amount by which subtracting `other` would go below zero.
    fn deficit(&self, other: &DamageVector) -> f64 {
        DamageEndpoint::ALL
            .iter()
            .map(|e| other.get(*e) - self.get(*e))
            .fold(0.0, f64::max)
    }
}

impl Add for DamageVector {
    type Output = DamageVector;

    /// Pointwise sum.
    fn add(self, rhs: DamageVector) -> DamageVector {
        self.zip_with(&rhs, |a, b| a + b)
    }
}

impl AddAssign for DamageVector {
    fn add_assign(&mut self, rhs: DamageVector) {
        *self = *self + rhs;
    }
}

impl Mul<f64> for DamageVector {
    type Output = DamageVector;

    fn mul(self, rhs: f64) -> DamageVector {
        self.scale(rhs)
    }
}

impl Sum for DamageVector {
    fn sum<I: Iterator<Item = DamageVector>>(iter: I) -> DamageVector {
        iter.fold(DamageVector::ZERO, |acc, d| acc + d)
    }
}

impl<'a> Sum<&'a DamageVector> for DamageVector {
    fn sum<I: Iterator<Item = &'a DamageVector>>(iter: I) -> DamageVector {
        iter.fold(DamageVector::ZERO, |acc, d| acc + *d)
    }
}

/// Relative size of a clamped deficit above which it is reported as a logic
/// error rather than rounding noise.
const MATERIAL_DEFICIT: f64 = 1e-9;

/// The change one incremental update makes to an aggregate total: the stale
/// contribution that leaves and the refreshed one that replaces it.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DamageDelta {
    pub removed: DamageVector,
    pub added: DamageVector,
}

impl DamageDelta {
    pub fn new(removed: DamageVector, added: DamageVector) -> Self {
        Self { removed, added }
    }

    /// `total - removed + added`, with the subtraction clamped at zero.
    pub fn apply(&self, total: &DamageVector) -> DamageVector {
        let deficit = total.deficit(&self.removed);
        let magnitude = total
            .endpoints()
            .iter()
            .chain(self.removed.endpoints().iter())
            .map(|(_, v)| v.abs())
            .fold(0.0, f64::max);
        if deficit > MATERIAL_DEFICIT * magnitude {
            warn!(
                deficit,
                "Incremental update removed more damage than the total held; clamping at zero"
            );
        }
        total.subtract(&self.removed) + self.added
    }

    pub fn is_noop(&self) -> bool {
        self.removed == self.added
    }
}
