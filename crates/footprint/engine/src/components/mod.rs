//! Usage records and the category dispatch that builds them.

pub mod hardware;
pub mod journey;
pub mod software;
pub mod transport;

use footprint_catalog::CoefficientCatalog;
use footprint_types::{Category, ComponentId, DamageVector};
use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::error::{FootprintError, Result};
use crate::payload::DamagePayload;

pub use hardware::{DamageType, HardwareComponent, HardwareDescriptor, HardwarePatch};
pub use journey::{JourneyComponent, JourneyDescriptor, JourneyPatch};
pub use software::{SoftwareComponent, SoftwareDescriptor, SoftwarePatch};
pub use transport::TransportationMean;

/// What a component needs to read while it is being built or re-derived.
#[derive(Clone, Copy)]
pub struct Resolver<'a> {
    pub(crate) catalog: &'a dyn CoefficientCatalog,
    pub(crate) config: &'a EngineConfig,
}

impl<'a> Resolver<'a> {
    pub fn new(catalog: &'a dyn CoefficientCatalog, config: &'a EngineConfig) -> Self {
        Self { catalog, config }
    }
}

/// A raw, unresolved usage record of any category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "category", rename_all = "lowercase")]
pub enum ComponentDescriptor {
    Hardware(HardwareDescriptor),
    Software(SoftwareDescriptor),
    Journey(JourneyDescriptor),
}

impl ComponentDescriptor {
    pub fn category(&self) -> Category {
        match self {
            ComponentDescriptor::Hardware(_) => Category::Hardware,
            ComponentDescriptor::Software(_) => Category::Software,
            ComponentDescriptor::Journey(_) => Category::Journey,
        }
    }

    fn label(&self) -> String {
        match self {
            ComponentDescriptor::Hardware(d) => d.label.clone().unwrap_or_else(|| d.name.clone()),
            ComponentDescriptor::Software(d) => d.label.clone().unwrap_or_else(|| d.name.clone()),
            ComponentDescriptor::Journey(d) => d
                .label
                .clone()
                .unwrap_or_else(|| format!("{} by {}", d.passenger, d.mean)),
        }
    }
}

impl From<HardwareDescriptor> for ComponentDescriptor {
    fn from(descriptor: HardwareDescriptor) -> Self {
        ComponentDescriptor::Hardware(descriptor)
    }
}

impl From<SoftwareDescriptor> for ComponentDescriptor {
    fn from(descriptor: SoftwareDescriptor) -> Self {
        ComponentDescriptor::Software(descriptor)
    }
}

impl From<JourneyDescriptor> for ComponentDescriptor {
    fn from(descriptor: JourneyDescriptor) -> Self {
        ComponentDescriptor::Journey(descriptor)
    }
}

/// An edit to one component's own fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "category", rename_all = "lowercase")]
pub enum ComponentPatch {
    Hardware(HardwarePatch),
    Software(SoftwarePatch),
    Journey(JourneyPatch),
}

impl ComponentPatch {
    pub fn category(&self) -> Category {
        match self {
            ComponentPatch::Hardware(_) => Category::Hardware,
            ComponentPatch::Software(_) => Category::Software,
            ComponentPatch::Journey(_) => Category::Journey,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentBody {
    Hardware(HardwareComponent),
    Software(SoftwareComponent),
    Journey(JourneyComponent),
}

impl ComponentBody {
    pub fn category(&self) -> Category {
        match self {
            ComponentBody::Hardware(_) => Category::Hardware,
            ComponentBody::Software(_) => Category::Software,
            ComponentBody::Journey(_) => Category::Journey,
        }
    }

    /// Damage of this record for the category slice of `payload`.
    pub fn compute(&self, payload: &DamagePayload) -> DamageVector {
        match self {
            ComponentBody::Hardware(hardware) => hardware.compute_damage(&payload.hardware),
            ComponentBody::Software(software) => software.compute_damage(&payload.software),
            ComponentBody::Journey(journey) => journey.compute_damage(),
        }
    }
}

/// A resolved usage record with its identity and last computed damage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Component {
    id: ComponentId,
    label: String,
    /// `None` until the owning aggregate computes it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    damage: Option<DamageVector>,
    body: ComponentBody,
}

impl Component {
    /// Resolves a descriptor against the catalog and gives it a fresh id.
    pub fn resolve(descriptor: &ComponentDescriptor, resolver: &Resolver<'_>) -> Result<Self> {
        let body = match descriptor {
            ComponentDescriptor::Hardware(d) => {
                ComponentBody::Hardware(HardwareComponent::resolve(d, resolver)?)
            }
            ComponentDescriptor::Software(d) => {
                ComponentBody::Software(SoftwareComponent::resolve(d, resolver)?)
            }
            ComponentDescriptor::Journey(d) => {
                ComponentBody::Journey(JourneyComponent::resolve(d, resolver)?)
            }
        };
        Ok(Self {
            id: ComponentId::generate(),
            label: descriptor.label(),
            damage: None,
            body,
        })
    }

    pub fn id(&self) -> ComponentId {
        self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn category(&self) -> Category {
        self.body.category()
    }

    pub fn damage(&self) -> Option<DamageVector> {
        self.damage
    }

    pub fn body(&self) -> &ComponentBody {
        &self.body
    }

    pub fn as_hardware(&self) -> Option<&HardwareComponent> {
        match &self.body {
            ComponentBody::Hardware(hardware) => Some(hardware),
            _ => None,
        }
    }

    /// Computes and caches this component's damage.
    pub fn compute(&mut self, payload: &DamagePayload) -> DamageVector {
        let damage = self.body.compute(payload);
        self.damage = Some(damage);
        damage
    }

    /// The same component, same id, with `patch` applied. The result carries
    /// no damage until it is computed.
    pub fn updated(
        &self,
        label: Option<&str>,
        patch: &ComponentPatch,
        resolver: &Resolver<'_>,
    ) -> Result<Self> {
        let body = match (&self.body, patch) {
            (ComponentBody::Hardware(c), ComponentPatch::Hardware(p)) => {
                ComponentBody::Hardware(c.update(p, resolver)?)
            }
            (ComponentBody::Software(c), ComponentPatch::Software(p)) => {
                ComponentBody::Software(c.update(p, resolver)?)
            }
            (ComponentBody::Journey(c), ComponentPatch::Journey(p)) => {
                ComponentBody::Journey(c.update(p, resolver)?)
            }
            (body, patch) => {
                return Err(FootprintError::InvalidParameter(format!(
                    "{} patch cannot be applied to {} component {}",
                    patch.category(),
                    body.category(),
                    self.id
                )))
            }
        };
        Ok(Self {
            id: self.id,
            label: label.map(str::to_string).unwrap_or_else(|| self.label.clone()),
            damage: None,
            body,
        })
    }
}
