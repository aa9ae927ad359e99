//! Footprint Engine - Damage computation for virtual meetings
//!
//! A meeting scenario is built from three lists of usage records (hardware,
//! software, journeys). Each record is resolved against a
//! [`CoefficientCatalog`](footprint_catalog::CoefficientCatalog) into a typed
//! component, and damage is summed upward:
//!
//! - **Components**: hardware (composite trees, lifetime proration), software
//!   (download and bandwidth model), journeys (occupancy model)
//! - **CategoryAggregate**: the components of one category and their total
//! - **ScenarioDamage**: the three aggregates and the scenario total
//! - **MeetingScenario**: metadata, full and incremental recompute, alternatives
//! - **FootprintService**: create/read/modify/remove against a [`ScenarioRegistry`]
//!
//! ## Incremental updates
//!
//! Editing one component does not resum its category. The edited component is
//! recomputed on its own and the change is carried upward as a
//! [`DamageDelta`](footprint_types::DamageDelta): `total - old + new`, first for
//! the category total, then for the scenario total. Edits to one scenario are
//! serialized by the registry's per-scenario lock.

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![cfg_attr(not(feature = "strict-docs"), allow(missing_docs))]

pub mod aggregate;
pub mod alternatives;
pub mod components;
pub mod config;
pub mod error;
pub mod payload;
pub mod registry;
pub mod scenario;
pub mod scenario_damage;
pub mod service;

// Re-exports
pub use aggregate::{CategoryAggregate, ComponentUpdate};
pub use alternatives::{AlternativeKind, HeavyVisioPlan};
pub use components::{
    Component, ComponentBody, ComponentDescriptor, ComponentPatch, DamageType, HardwareComponent,
    HardwareDescriptor, HardwarePatch, JourneyComponent, JourneyDescriptor, JourneyPatch, Resolver,
    SoftwareComponent, SoftwareDescriptor, SoftwarePatch, TransportationMean,
};
pub use config::{AlternativesConfig, BundleItem, EngineConfig, ReferenceJourney};
pub use error::{FootprintError, Result};
pub use payload::{DamagePayload, HardwarePayload, JourneyPayload, SoftwarePayload};
pub use registry::{InMemoryScenarioRegistry, ScenarioRegistry, SharedScenario};
pub use scenario::{
    AlternativeOrigin, ComponentChange, MeetingScenario, ModifyOutcome, ScenarioDescriptor,
    ScenarioPatch,
};
pub use scenario_damage::ScenarioDamage;
pub use service::{Alternatives, FootprintService};
