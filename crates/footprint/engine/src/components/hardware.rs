//! Hardware usage records.
//!
//! A hardware component is a tree: composite entries own one child component
//! per catalog sub-entry, atomic entries carry the coefficients. Damage of an
//! atomic device is the sum of four typed damages:
//!
//! | type              | coefficient              | minutes charged                          |
//! |-------------------|--------------------------|------------------------------------------|
//! | operating visio   | per minute in use        | meeting duration                         |
//! | operating standby | per minute on standby    | standby minutes per meeting minute × duration |
//! | embodied visio    | lifetime total ÷ visio minutes over life | meeting duration        |
//! | embodied standby  | lifetime total ÷ standby minutes over life | standby minutes per meeting minute × duration |

use footprint_catalog::{AtomicHardware, EmbodiedCoefficient, HardwareDefinition, KnownUsage};
use footprint_types::{Bound, DamageVector, Ranged};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::Resolver;
use crate::error::{FootprintError, Result};
use crate::payload::HardwarePayload;

const MAX_COMPOSITE_DEPTH: usize = 16;

/// The four phases a device's damage is split into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DamageType {
    OperatingVisio,
    EmbodiedVisio,
    OperatingStandby,
    EmbodiedStandby,
}

impl DamageType {
    pub const ALL: [DamageType; 4] = [
        DamageType::OperatingVisio,
        DamageType::EmbodiedVisio,
        DamageType::OperatingStandby,
        DamageType::EmbodiedStandby,
    ];

    pub fn is_operating(self) -> bool {
        matches!(self, DamageType::OperatingVisio | DamageType::OperatingStandby)
    }

    pub fn is_visio(self) -> bool {
        matches!(self, DamageType::OperatingVisio | DamageType::EmbodiedVisio)
    }
}

/// Raw hardware line of a scenario description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HardwareDescriptor {
    pub name: String,

    #[serde(default = "default_quantity")]
    pub quantity: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<f64>,

    /// Fraction of the device's use attributable to the meeting.
    #[serde(default = "default_share")]
    pub share_for_visio: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl HardwareDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            quantity: default_quantity(),
            size: None,
            share_for_visio: default_share(),
            label: None,
        }
    }

    pub fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = quantity;
        self
    }

    pub fn with_size(mut self, size: f64) -> Self {
        self.size = Some(size);
        self
    }

    pub fn with_share(mut self, share_for_visio: f64) -> Self {
        self.share_for_visio = share_for_visio;
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

fn default_quantity() -> u32 {
    1
}

fn default_share() -> f64 {
    1.0
}

/// Fields of a hardware component that can be edited in place.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HardwarePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub share_for_visio: Option<f64>,
}

/// Embodied coefficient after catalog references have been followed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmbodiedSource {
    Measured(Ranged<DamageVector>),
    Assimilated {
        reference: String,
        per_gram: Ranged<DamageVector>,
        weight_grams: Ranged<f64>,
    },
}

impl EmbodiedSource {
    /// Lifetime embodied damage of one unit.
    pub fn resolve(&self, bound: Option<Bound>) -> DamageVector {
        match self {
            EmbodiedSource::Measured(coefficient) => coefficient.resolve(bound),
            EmbodiedSource::Assimilated {
                per_gram,
                weight_grams,
                ..
            } => per_gram.resolve(bound).scale(weight_grams.resolve(bound)),
        }
    }
}

/// Coefficients of an atomic device, copied out of the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AtomicProfile {
    pub size_dependent: bool,
    pub default_size: Option<f64>,
    pub lifetime_years: f64,
    pub daily_operating_hours: f64,
    pub embodied: Option<EmbodiedSource>,
    pub operating_visio: Option<Ranged<DamageVector>>,
    pub operating_standby: Option<Ranged<DamageVector>>,
    pub known_usage: Option<KnownUsage>,
}

impl AtomicProfile {
    fn resolve(name: &str, atomic: &AtomicHardware, resolver: &Resolver<'_>) -> Result<Self> {
        let embodied = match &atomic.embodied {
            None => None,
            Some(EmbodiedCoefficient::Measured(coefficient)) => {
                Some(EmbodiedSource::Measured(*coefficient))
            }
            Some(EmbodiedCoefficient::AssimilatedTo(reference)) => {
                let per_gram = match resolver
                    .catalog
                    .hardware(reference)?
                    .as_atomic()
                    .and_then(|r| r.embodied.as_ref())
                {
                    Some(EmbodiedCoefficient::Measured(coefficient)) => *coefficient,
                    _ => {
                        return Err(FootprintError::InvalidParameter(format!(
                            "hardware {} is assimilated to {}, which has no measured embodied coefficient",
                            name, reference
                        )))
                    }
                };
                let weight_grams = atomic.weight_grams.ok_or_else(|| {
                    FootprintError::InvalidParameter(format!(
                        "hardware {} is assimilated to {} but has no weight",
                        name, reference
                    ))
                })?;
                Some(EmbodiedSource::Assimilated {
                    reference: reference.clone(),
                    per_gram,
                    weight_grams,
                })
            }
        };

        Ok(Self {
            size_dependent: atomic.size_dependent,
            default_size: atomic.default_size,
            lifetime_years: atomic.lifetime_years,
            daily_operating_hours: atomic.daily_operating_hours,
            embodied,
            operating_visio: atomic.operating_visio,
            operating_standby: atomic.operating_standby,
            known_usage: atomic.known_usage,
        })
    }

    /// Hours of visio or standby time over the device's life.
    fn time_over_life(&self, damage_type: DamageType, worked_days_per_year: f64) -> f64 {
        if let Some(usage) = &self.known_usage {
            return if damage_type.is_visio() {
                usage.visio_hours
            } else {
                usage.standby_hours
            };
        }
        let worked_days = self.lifetime_years * worked_days_per_year;
        if damage_type.is_visio() {
            worked_days * self.daily_operating_hours
        } else {
            worked_days * (24.0 - self.daily_operating_hours)
        }
    }

    fn typed_coefficient(&self, damage_type: DamageType, bound: Option<Bound>) -> Option<DamageVector> {
        match damage_type {
            DamageType::EmbodiedVisio | DamageType::EmbodiedStandby => {
                self.embodied.as_ref().map(|e| e.resolve(bound))
            }
            DamageType::OperatingVisio => self.operating_visio.map(|c| c.resolve(bound)),
            DamageType::OperatingStandby => self.operating_standby.map(|c| c.resolve(bound)),
        }
    }

    fn size_factor(&self, size: Option<f64>) -> f64 {
        if self.size_dependent {
            size.or(self.default_size).unwrap_or(1.0)
        } else {
            1.0
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HardwareKind {
    Composite { children: Vec<HardwareComponent> },
    Atomic(AtomicProfile),
}

/// Usage record for one kind of device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HardwareComponent {
    name: String,
    quantity: u32,
    size: Option<f64>,
    share_for_visio: f64,
    worked_days_per_year: f64,
    kind: HardwareKind,
}

impl HardwareComponent {
    /// Looks the descriptor up in the hardware table, expanding composite
    /// entries into owned child components.
    pub fn resolve(descriptor: &HardwareDescriptor, resolver: &Resolver<'_>) -> Result<Self> {
        validate_quantity(&descriptor.name, descriptor.quantity)?;
        validate_share(&descriptor.name, descriptor.share_for_visio)?;
        validate_size(&descriptor.name, descriptor.size)?;
        Self::resolve_at_depth(
            &descriptor.name,
            descriptor.quantity,
            descriptor.size,
            descriptor.share_for_visio,
            resolver,
            0,
        )
    }

    fn resolve_at_depth(
        name: &str,
        quantity: u32,
        size: Option<f64>,
        share_for_visio: f64,
        resolver: &Resolver<'_>,
        depth: usize,
    ) -> Result<Self> {
        if depth > MAX_COMPOSITE_DEPTH {
            return Err(FootprintError::InvalidParameter(format!(
                "hardware {} nests composites deeper than {} levels",
                name, MAX_COMPOSITE_DEPTH
            )));
        }

        let kind = match resolver.catalog.hardware(name)? {
            HardwareDefinition::Composite { components } => {
                let children = components
                    .iter()
                    .map(|(child, child_quantity)| {
                        Self::resolve_at_depth(
                            child,
                            *child_quantity,
                            size,
                            share_for_visio,
                            resolver,
                            depth + 1,
                        )
                    })
                    .collect::<Result<Vec<_>>>()?;
                HardwareKind::Composite { children }
            }
            HardwareDefinition::Atomic(atomic) => {
                HardwareKind::Atomic(AtomicProfile::resolve(name, atomic, resolver)?)
            }
        };

        Ok(Self {
            name: name.to_string(),
            quantity,
            size,
            share_for_visio,
            worked_days_per_year: resolver.config.worked_days_per_year,
            kind,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn size(&self) -> Option<f64> {
        self.size
    }

    pub fn share_for_visio(&self) -> f64 {
        self.share_for_visio
    }

    pub fn kind(&self) -> &HardwareKind {
        &self.kind
    }

    pub fn is_composite(&self) -> bool {
        matches!(self.kind, HardwareKind::Composite { .. })
    }

    pub fn children(&self) -> &[HardwareComponent] {
        match &self.kind {
            HardwareKind::Composite { children } => children,
            HardwareKind::Atomic(_) => &[],
        }
    }

    /// Lifetime visio or standby hours. `None` for composite hardware, whose
    /// children each have their own.
    pub fn time_over_life(&self, damage_type: DamageType) -> Option<f64> {
        match &self.kind {
            HardwareKind::Atomic(profile) => {
                Some(profile.time_over_life(damage_type, self.worked_days_per_year))
            }
            HardwareKind::Composite { .. } => None,
        }
    }

    /// Coefficient behind one damage type, or `None` when the catalog has no
    /// data for it.
    pub fn typed_coefficient(&self, damage_type: DamageType, bound: Option<Bound>) -> Option<DamageVector> {
        match &self.kind {
            HardwareKind::Atomic(profile) => profile.typed_coefficient(damage_type, bound),
            HardwareKind::Composite { .. } => None,
        }
    }

    /// Minutes charged to a damage type for a meeting of `duration_minutes`.
    ///
    /// Visio types are charged the whole meeting. Standby types are charged
    /// the standby hours the device accumulates per hour of meeting use over
    /// its life, scaled to the meeting. A device with no visio time over its
    /// life accrues no standby.
    pub fn duration_for_type(&self, damage_type: DamageType, duration_minutes: u32) -> f64 {
        let minutes = duration_minutes as f64;
        if damage_type.is_visio() {
            return minutes;
        }
        let visio_hours = self.time_over_life(DamageType::OperatingVisio).unwrap_or(0.0);
        let standby_hours = self.time_over_life(DamageType::OperatingStandby).unwrap_or(0.0);
        if visio_hours <= 0.0 {
            return 0.0;
        }
        let standby_minutes_per_visio_hour = standby_hours / visio_hours * 60.0;
        standby_minutes_per_visio_hour / 60.0 * minutes
    }

    /// Damage of one unit for one damage type. Composite hardware sums its
    /// children, each scaled by its own quantity.
    pub fn compute_typed_damage(
        &self,
        damage_type: DamageType,
        duration_minutes: u32,
        bound: Option<Bound>,
    ) -> DamageVector {
        let profile = match &self.kind {
            HardwareKind::Atomic(profile) => profile,
            HardwareKind::Composite { children } => {
                return children
                    .iter()
                    .map(|child| {
                        child
                            .compute_typed_damage(damage_type, duration_minutes, bound)
                            .scale(child.quantity as f64)
                    })
                    .sum();
            }
        };

        let Some(coefficient) = profile.typed_coefficient(damage_type, bound) else {
            return DamageVector::ZERO;
        };
        let size_factor = profile.size_factor(self.size);
        let minutes = self.duration_for_type(damage_type, duration_minutes);

        if damage_type.is_operating() {
            coefficient.scale(self.share_for_visio * size_factor * minutes)
        } else {
            let hours = profile.time_over_life(damage_type, self.worked_days_per_year);
            if hours <= 0.0 {
                return DamageVector::ZERO;
            }
            coefficient.scale(size_factor / hours / 60.0 * minutes)
        }
    }

    /// Total damage of this record, quantity included.
    pub fn compute_damage(&self, payload: &HardwarePayload) -> DamageVector {
        let per_unit: DamageVector = match &self.kind {
            HardwareKind::Composite { children } => children
                .iter()
                .map(|child| child.compute_damage(payload))
                .sum(),
            HardwareKind::Atomic(_) => DamageType::ALL
                .iter()
                .map(|t| self.compute_typed_damage(*t, payload.duration_minutes, payload.bound))
                .sum(),
        };
        let damage = per_unit.scale(self.quantity as f64);
        debug!(
            hardware = %self.name,
            quantity = self.quantity,
            duration_minutes = payload.duration_minutes,
            climate_change = damage.climate_change,
            "Computed hardware damage"
        );
        damage
    }

    /// Applies a patch. A new name re-derives everything from the catalog,
    /// children included; the result must be recomputed by the caller.
    pub fn update(&self, patch: &HardwarePatch, resolver: &Resolver<'_>) -> Result<Self> {
        let name = patch.name.as_deref().unwrap_or(&self.name);
        let quantity = patch.quantity.unwrap_or(self.quantity);
        let size = patch.size.or(self.size);
        let share_for_visio = patch.share_for_visio.unwrap_or(self.share_for_visio);

        validate_quantity(name, quantity)?;
        validate_share(name, share_for_visio)?;
        validate_size(name, size)?;

        if name != self.name {
            return Self::resolve_at_depth(name, quantity, size, share_for_visio, resolver, 0);
        }

        let mut updated = self.clone();
        updated.quantity = quantity;
        updated.inherit(size, share_for_visio);
        Ok(updated)
    }

    fn inherit(&mut self, size: Option<f64>, share_for_visio: f64) {
        self.size = size;
        self.share_for_visio = share_for_visio;
        if let HardwareKind::Composite { children } = &mut self.kind {
            for child in children {
                child.inherit(size, share_for_visio);
            }
        }
    }
}

fn validate_quantity(name: &str, quantity: u32) -> Result<()> {
    if quantity == 0 {
        return Err(FootprintError::InvalidParameter(format!(
            "hardware {} must have a quantity of at least 1",
            name
        )));
    }
    Ok(())
}

fn validate_share(name: &str, share_for_visio: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&share_for_visio) {
        return Err(FootprintError::InvalidParameter(format!(
            "hardware {} share_for_visio must be within 0..=1, got {}",
            name, share_for_visio
        )));
    }
    Ok(())
}

fn validate_size(name: &str, size: Option<f64>) -> Result<()> {
    match size {
        Some(size) if !(size.is_finite() && size > 0.0) => Err(FootprintError::InvalidParameter(
            format!("hardware {} size must be positive, got {}", name, size),
        )),
        _ => Ok(()),
    }
}
