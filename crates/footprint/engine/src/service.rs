//! Entry point for callers outside the engine.

use std::sync::Arc;

use footprint_catalog::CoefficientCatalog;
use footprint_types::{DamageVector, ScenarioId};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::components::Resolver;
use crate::config::EngineConfig;
use crate::error::{FootprintError, Result};
use crate::payload::DamagePayload;
use crate::registry::{InMemoryScenarioRegistry, ScenarioRegistry, SharedScenario};
use crate::scenario::{MeetingScenario, ModifyOutcome, ScenarioDescriptor, ScenarioPatch};

/// The two generated siblings of a scenario, as stored in the registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alternatives {
    pub heavy_visio: MeetingScenario,
    pub light_transport: MeetingScenario,
}

/// Creates, computes, edits and removes scenarios against one catalog and
/// one registry.
pub struct FootprintService {
    catalog: Arc<dyn CoefficientCatalog>,
    registry: Arc<dyn ScenarioRegistry>,
    config: EngineConfig,
}

impl FootprintService {
    pub fn new(
        catalog: Arc<dyn CoefficientCatalog>,
        registry: Arc<dyn ScenarioRegistry>,
        config: EngineConfig,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            catalog,
            registry,
            config,
        })
    }

    /// Service backed by a fresh [`InMemoryScenarioRegistry`].
    pub fn in_memory(catalog: Arc<dyn CoefficientCatalog>, config: EngineConfig) -> Result<Self> {
        Self::new(catalog, Arc::new(InMemoryScenarioRegistry::new()), config)
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn registry(&self) -> &Arc<dyn ScenarioRegistry> {
        &self.registry
    }

    fn resolver(&self) -> Resolver<'_> {
        Resolver::new(self.catalog.as_ref(), &self.config)
    }

    fn shared(&self, id: &ScenarioId) -> Result<SharedScenario> {
        self.registry
            .get(id)
            .ok_or(FootprintError::ScenarioNotFound(*id))
    }

    /// Builds and registers a scenario. Its damage is not computed.
    pub fn create(&self, descriptor: &ScenarioDescriptor) -> Result<MeetingScenario> {
        let scenario = MeetingScenario::build(descriptor, &self.resolver())?;
        info!(
            scenario_id = %scenario.id(),
            creator = %scenario.creator(),
            participants = scenario.participant_count(),
            duration_minutes = scenario.duration_minutes(),
            "Scenario created"
        );
        let snapshot = scenario.clone();
        self.registry.set(scenario);
        Ok(snapshot)
    }

    /// Builds, computes and registers a scenario.
    pub fn create_and_compute(
        &self,
        descriptor: &ScenarioDescriptor,
        payload: &DamagePayload,
    ) -> Result<MeetingScenario> {
        let mut scenario = MeetingScenario::build(descriptor, &self.resolver())?;
        scenario.compute_damage(payload);
        info!(scenario_id = %scenario.id(), "Scenario created");
        let snapshot = scenario.clone();
        self.registry.set(scenario);
        Ok(snapshot)
    }

    /// Snapshot of a registered scenario.
    pub fn read(&self, id: &ScenarioId) -> Result<MeetingScenario> {
        let shared = self.shared(id)?;
        let scenario = shared.lock().clone();
        Ok(scenario)
    }

    pub fn remove(&self, id: &ScenarioId) -> bool {
        let removed = self.registry.delete(id);
        if removed {
            info!(scenario_id = %id, "Scenario removed");
        } else {
            warn!(scenario_id = %id, "Remove requested for unknown scenario");
        }
        removed
    }

    pub fn compute_damage(&self, id: &ScenarioId, payload: &DamagePayload) -> Result<DamageVector> {
        let shared = self.shared(id)?;
        let mut scenario = shared.lock();
        Ok(scenario.compute_damage(payload))
    }

    pub fn modify(&self, id: &ScenarioId, patch: &ScenarioPatch) -> Result<ModifyOutcome> {
        let shared = self.shared(id)?;
        let mut scenario = shared.lock();
        scenario.modify(patch, &self.resolver())
    }

    /// Generates, computes and registers both alternatives of a scenario.
    pub fn generate_alternatives(&self, id: &ScenarioId) -> Result<Alternatives> {
        let shared = self.shared(id)?;
        let (heavy_visio, light_transport) = {
            let scenario = shared.lock();
            scenario.generate_alternatives(&self.resolver())?
        };

        for alternative in [&heavy_visio, &light_transport] {
            info!(
                scenario_id = %alternative.id(),
                parent = %id,
                name = %alternative.name(),
                "Alternative scenario registered"
            );
        }
        self.registry.set(heavy_visio.clone());
        self.registry.set(light_transport.clone());

        Ok(Alternatives {
            heavy_visio,
            light_transport,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::test_support::catalog;
    use crate::components::{HardwareDescriptor, SoftwareDescriptor};

    fn service() -> FootprintService {
        FootprintService::in_memory(Arc::new(catalog()), EngineConfig::default()).unwrap()
    }

    fn descriptor() -> ScenarioDescriptor {
        ScenarioDescriptor {
            creator: "max".into(),
            name: "planning".into(),
            duration_minutes: 90,
            participant_count: 6,
            hardware: vec![HardwareDescriptor::new("desktop").with_quantity(6)],
            software: vec![SoftwareDescriptor::new("jitsi")],
            journeys: Vec::new(),
        }
    }

    #[test]
    fn rejects_invalid_config() {
        let config = EngineConfig {
            spreading_factor: -1.0,
            ..Default::default()
        };
        assert!(FootprintService::in_memory(Arc::new(catalog()), config).is_err());
    }

    #[test]
    fn read_missing_is_not_found() {
        let service = service();
        let err = service.read(&ScenarioId::generate()).unwrap_err();
        assert!(matches!(err, FootprintError::ScenarioNotFound(_)));
    }

    #[test]
    fn create_compute_read_remove() {
        let service = service();
        let created = service.create(&descriptor()).unwrap();
        let id = created.id();

        let total = service
            .compute_damage(&id, &created.payload(None))
            .unwrap();
        assert_eq!(service.read(&id).unwrap().total(), total);

        assert!(service.remove(&id));
        assert!(!service.remove(&id));
        assert!(service.read(&id).is_err());
    }

    #[test]
    fn failed_create_registers_nothing() {
        let service = service();
        let mut bad = descriptor();
        bad.hardware.push(HardwareDescriptor::new("hologram"));
        assert!(service.create(&bad).unwrap_err().is_not_found());
        assert!(service.registry().is_empty());
    }

    #[test]
    fn alternatives_are_registered() {
        let service = service();
        let created = service
            .create_and_compute(&descriptor(), &DamagePayload::upper_bound(90, 6))
            .unwrap();
        let alternatives = service.generate_alternatives(&created.id()).unwrap();
        assert_eq!(service.registry().len(), 3);
        assert!(service.read(&alternatives.heavy_visio.id()).is_ok());
        assert!(service.read(&alternatives.light_transport.id()).is_ok());
    }
}
