//! Meeting scenarios: identity, metadata and the damage tree they own.

use chrono::{DateTime, Utc};
use footprint_types::{Bound, Category, ComponentId, DamageDelta, DamageVector, ScenarioId};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::alternatives::{self, AlternativeKind};
use crate::components::{
    ComponentDescriptor, ComponentPatch, HardwareDescriptor, JourneyDescriptor, Resolver,
    SoftwareDescriptor,
};
use crate::error::{FootprintError, Result};
use crate::payload::DamagePayload;
use crate::scenario_damage::ScenarioDamage;

/// Everything needed to create a scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioDescriptor {
    pub creator: String,
    pub name: String,
    pub duration_minutes: u32,
    pub participant_count: u32,
    #[serde(default)]
    pub hardware: Vec<HardwareDescriptor>,
    #[serde(default)]
    pub software: Vec<SoftwareDescriptor>,
    #[serde(default)]
    pub journeys: Vec<JourneyDescriptor>,
}

impl ScenarioDescriptor {
    /// The payload matching this meeting, with one client per participant.
    pub fn payload(&self, bound: Option<Bound>) -> DamagePayload {
        DamagePayload::uniform(self.duration_minutes, self.participant_count, bound)
    }
}

/// A component-level edit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ComponentChange {
    Update {
        id: ComponentId,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        label: Option<String>,
        patch: ComponentPatch,
    },
    Create {
        descriptor: ComponentDescriptor,
    },
    Remove {
        category: Category,
        id: ComponentId,
    },
}

/// A set of edits applied together by [`MeetingScenario::modify`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScenarioPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creator: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub participant_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component: Option<ComponentChange>,
    /// Required whenever anything has to be recomputed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub damage_payload: Option<DamagePayload>,
}

/// What a modification did to the scenario total.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModifyOutcome {
    pub full_recompute: bool,
    pub delta: DamageDelta,
}

/// Link from a generated alternative back to the scenario it was derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlternativeOrigin {
    pub parent: ScenarioId,
    pub kind: AlternativeKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeetingScenario {
    id: ScenarioId,
    creator: String,
    name: String,
    duration_minutes: u32,
    participant_count: u32,
    damage: ScenarioDamage,
    /// Set until the first full compute.
    needs_full_recompute: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    alternative_of: Option<AlternativeOrigin>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl MeetingScenario {
    /// Resolves every descriptor. Nothing is computed yet.
    pub fn build(descriptor: &ScenarioDescriptor, resolver: &Resolver<'_>) -> Result<Self> {
        let hardware: Vec<ComponentDescriptor> =
            descriptor.hardware.iter().cloned().map(Into::into).collect();
        let software: Vec<ComponentDescriptor> =
            descriptor.software.iter().cloned().map(Into::into).collect();
        let journeys: Vec<ComponentDescriptor> =
            descriptor.journeys.iter().cloned().map(Into::into).collect();

        let damage = ScenarioDamage::build(&hardware, &software, &journeys, resolver)?;
        let now = Utc::now();
        let scenario = Self {
            id: ScenarioId::generate(),
            creator: descriptor.creator.clone(),
            name: descriptor.name.clone(),
            duration_minutes: descriptor.duration_minutes,
            participant_count: descriptor.participant_count,
            damage,
            needs_full_recompute: true,
            alternative_of: None,
            created_at: now,
            updated_at: now,
        };
        debug!(
            scenario_id = %scenario.id,
            components = scenario.damage.component_count(),
            "Scenario built"
        );
        Ok(scenario)
    }

    pub fn id(&self) -> ScenarioId {
        self.id
    }

    pub fn creator(&self) -> &str {
        &self.creator
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn duration_minutes(&self) -> u32 {
        self.duration_minutes
    }

    pub fn participant_count(&self) -> u32 {
        self.participant_count
    }

    pub fn damage(&self) -> &ScenarioDamage {
        &self.damage
    }

    pub fn total(&self) -> DamageVector {
        self.damage.total()
    }

    pub fn needs_full_recompute(&self) -> bool {
        self.needs_full_recompute
    }

    pub fn alternative_of(&self) -> Option<AlternativeOrigin> {
        self.alternative_of
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Payload for this scenario's own duration and participant count.
    pub fn payload(&self, bound: Option<Bound>) -> DamagePayload {
        DamagePayload::uniform(self.duration_minutes, self.participant_count, bound)
    }

    /// Full recompute of every category.
    pub fn compute_damage(&mut self, payload: &DamagePayload) -> DamageVector {
        let total = self.damage.compute_damage(payload);
        self.needs_full_recompute = false;
        info!(
            scenario_id = %self.id,
            human_health = total.human_health,
            ecosystem_quality = total.ecosystem_quality,
            climate_change = total.climate_change,
            resources = total.resources,
            "Scenario damage computed"
        );
        total
    }

    /// Applies metadata, meeting-shape and component edits together.
    ///
    /// A duration or participant-count change triggers a full recompute; a
    /// lone component edit is folded into the totals incrementally. Either
    /// needs `damage_payload`; after a shape change it must describe the new
    /// duration and participant count. Nothing is changed when an error is
    /// returned.
    pub fn modify(&mut self, patch: &ScenarioPatch, resolver: &Resolver<'_>) -> Result<ModifyOutcome> {
        let edit = match &patch.component {
            None => None,
            Some(ComponentChange::Update { id, label, patch }) => Some((*id, label.as_deref(), patch)),
            Some(ComponentChange::Create { descriptor }) => {
                return Err(FootprintError::Unimplemented(format!(
                    "adding a {} component to an existing scenario",
                    descriptor.category()
                )))
            }
            Some(ComponentChange::Remove { category, .. }) => {
                return Err(FootprintError::Unimplemented(format!(
                    "removing a {} component from an existing scenario",
                    category
                )))
            }
        };

        let shape_changed = patch.duration_minutes.is_some_and(|d| d != self.duration_minutes)
            || patch.participant_count.is_some_and(|p| p != self.participant_count);
        let full_recompute = shape_changed || (edit.is_some() && self.needs_full_recompute);

        let payload = match (&patch.damage_payload, full_recompute || edit.is_some()) {
            (Some(payload), _) => Some(payload),
            (None, true) => {
                return Err(FootprintError::MissingParameters(
                    "damage_payload is required to recompute the scenario".into(),
                ))
            }
            (None, false) => None,
        };

        if let Some(payload) = payload.filter(|_| shape_changed) {
            let duration_minutes = patch.duration_minutes.unwrap_or(self.duration_minutes);
            let participant_count = patch.participant_count.unwrap_or(self.participant_count);
            if !payload.fits(duration_minutes, participant_count) {
                return Err(FootprintError::InvalidParameter(format!(
                    "damage_payload must describe {} minutes with {} clients, got {} and {} minutes with {} clients",
                    duration_minutes,
                    participant_count,
                    payload.hardware.duration_minutes,
                    payload.software.duration_minutes,
                    payload.software.instances_number,
                )));
            }
        }

        let update = match (edit, payload) {
            (Some((id, label, component_patch)), Some(payload)) => Some(
                self.damage
                    .aggregate(component_patch.category())
                    .update_component(id, label, component_patch, payload, resolver)?,
            ),
            _ => None,
        };

        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        if let Some(creator) = &patch.creator {
            self.creator = creator.clone();
        }
        if let Some(duration_minutes) = patch.duration_minutes {
            self.duration_minutes = duration_minutes;
        }
        if let Some(participant_count) = patch.participant_count {
            self.participant_count = participant_count;
        }

        let old_total = self.damage.total();
        let outcome = match (update, payload) {
            (Some(update), Some(payload)) if full_recompute => {
                let category = update.component.category();
                self.damage.aggregate_mut(category).replace_component(update.component)?;
                let total = self.compute_damage(payload);
                ModifyOutcome {
                    full_recompute: true,
                    delta: DamageDelta::new(old_total, total),
                }
            }
            (Some(update), Some(_)) => {
                let category = update.component.category();
                let category_delta = self.damage.aggregate_mut(category).apply_update(update)?;
                let total = self.damage.apply_delta(&category_delta);
                debug!(
                    scenario_id = %self.id,
                    category = %category,
                    climate_change = total.climate_change,
                    "Applied incremental update"
                );
                ModifyOutcome {
                    full_recompute: false,
                    delta: DamageDelta::new(old_total, total),
                }
            }
            (None, Some(payload)) if full_recompute => {
                let total = self.compute_damage(payload);
                ModifyOutcome {
                    full_recompute: true,
                    delta: DamageDelta::new(old_total, total),
                }
            }
            _ => ModifyOutcome {
                full_recompute: false,
                delta: DamageDelta::new(old_total, old_total),
            },
        };

        self.updated_at = Utc::now();
        info!(
            scenario_id = %self.id,
            full_recompute = outcome.full_recompute,
            "Scenario modified"
        );
        Ok(outcome)
    }

    /// Builds the heavy-visio and light-transport siblings of this scenario,
    /// computed with upper-bound coefficients. Registering them is up to the
    /// caller.
    pub fn generate_alternatives(&self, resolver: &Resolver<'_>) -> Result<(MeetingScenario, MeetingScenario)> {
        let config = &resolver.config.alternatives;
        let heavy = self.alternative(
            alternatives::heavy_visio(self, config)?,
            AlternativeKind::HeavyVisio,
            resolver,
        )?;
        let light = self.alternative(
            alternatives::light_transport(self, config),
            AlternativeKind::LightTransport,
            resolver,
        )?;
        Ok((heavy, light))
    }

    fn alternative(
        &self,
        descriptor: ScenarioDescriptor,
        kind: AlternativeKind,
        resolver: &Resolver<'_>,
    ) -> Result<MeetingScenario> {
        let mut scenario = Self::build(&descriptor, resolver)?;
        scenario.alternative_of = Some(AlternativeOrigin {
            parent: self.id,
            kind,
        });
        scenario.compute_damage(&descriptor.payload(Some(Bound::Upper)));
        Ok(scenario)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::test_support::{catalog, config};
    use crate::components::HardwarePatch;
    use crate::config::BundleItem;

    fn descriptor() -> ScenarioDescriptor {
        ScenarioDescriptor {
            creator: "hana".into(),
            name: "weekly sync".into(),
            duration_minutes: 60,
            participant_count: 4,
            hardware: vec![
                HardwareDescriptor::new("laptop").with_quantity(3),
                HardwareDescriptor::new("tv"),
            ],
            software: vec![SoftwareDescriptor::new("jitsi")],
            journeys: vec![
                JourneyDescriptor::new("ivo", "car", 25.0).with_people(2),
                JourneyDescriptor::new("jo", "car", 25.0).with_people(2),
            ],
        }
    }

    fn laptop_id(scenario: &MeetingScenario) -> ComponentId {
        scenario.damage().aggregate(Category::Hardware).components()[0].id()
    }

    fn quantity_patch(id: ComponentId, quantity: u32, payload: Option<DamagePayload>) -> ScenarioPatch {
        ScenarioPatch {
            component: Some(ComponentChange::Update {
                id,
                label: None,
                patch: ComponentPatch::Hardware(HardwarePatch {
                    quantity: Some(quantity),
                    ..Default::default()
                }),
            }),
            damage_payload: payload,
            ..Default::default()
        }
    }

    #[test]
    fn build_then_compute() {
        let catalog = catalog();
        let config = config();
        let mut scenario = MeetingScenario::build(&descriptor(), &Resolver::new(&catalog, &config)).unwrap();
        assert!(scenario.needs_full_recompute());
        assert!(scenario.total().is_zero());

        let total = scenario.compute_damage(&scenario.payload(None));
        assert!(!scenario.needs_full_recompute());
        assert!(!total.is_zero());
    }

    #[test]
    fn incremental_update_matches_full_recompute() {
        let catalog = catalog();
        let config = config();
        let resolver = Resolver::new(&catalog, &config);
        let mut scenario = MeetingScenario::build(&descriptor(), &resolver).unwrap();
        let payload = scenario.payload(Some(Bound::Upper));
        scenario.compute_damage(&payload);

        let outcome = scenario
            .modify(&quantity_patch(laptop_id(&scenario), 1, Some(payload)), &resolver)
            .unwrap();
        assert!(!outcome.full_recompute);

        let mut fresh = scenario.clone();
        fresh.compute_damage(&payload);
        assert!(scenario.total().approx_eq(&fresh.total(), 1e-9));
        assert!(outcome.delta.added.approx_eq(&scenario.total(), 1e-12));
    }

    #[test]
    fn component_edit_without_payload_is_rejected() {
        let catalog = catalog();
        let config = config();
        let resolver = Resolver::new(&catalog, &config);
        let mut scenario = MeetingScenario::build(&descriptor(), &resolver).unwrap();
        scenario.compute_damage(&scenario.payload(None));
        let before = scenario.clone();

        let err = scenario
            .modify(&quantity_patch(laptop_id(&scenario), 1, None), &resolver)
            .unwrap_err();
        assert!(matches!(err, FootprintError::MissingParameters(_)));
        assert_eq!(scenario, before);
    }

    #[test]
    fn duration_change_requires_payload_and_recomputes() {
        let catalog = catalog();
        let config = config();
        let resolver = Resolver::new(&catalog, &config);
        let mut scenario = MeetingScenario::build(&descriptor(), &resolver).unwrap();
        scenario.compute_damage(&scenario.payload(None));

        let mut patch = ScenarioPatch {
            duration_minutes: Some(120),
            ..Default::default()
        };
        assert!(matches!(
            scenario.modify(&patch, &resolver),
            Err(FootprintError::MissingParameters(_))
        ));
        assert_eq!(scenario.duration_minutes(), 60);

        patch.damage_payload = Some(DamagePayload::uniform(120, 4, None));
        let outcome = scenario.modify(&patch, &resolver).unwrap();
        assert!(outcome.full_recompute);
        assert_eq!(scenario.duration_minutes(), 120);

        // Journeys do not depend on duration.
        let journeys = scenario.damage().aggregate(Category::Journey).total();
        assert!(outcome.delta.added.dominated_by(&outcome.delta.removed.scale(2.0)));
        assert!(outcome
            .delta
            .added
            .approx_eq(&(outcome.delta.removed.scale(2.0).subtract(&journeys)), 1e-9));
    }

    #[test]
    fn shape_and_component_edit_combine_into_one_recompute() {
        let catalog = catalog();
        let config = config();
        let resolver = Resolver::new(&catalog, &config);
        let mut scenario = MeetingScenario::build(&descriptor(), &resolver).unwrap();
        scenario.compute_damage(&scenario.payload(None));

        let mut patch = quantity_patch(laptop_id(&scenario), 5, Some(DamagePayload::uniform(30, 4, None)));
        patch.duration_minutes = Some(30);
        let outcome = scenario.modify(&patch, &resolver).unwrap();
        assert!(outcome.full_recompute);

        let laptop = &scenario.damage().aggregate(Category::Hardware).components()[0];
        assert_eq!(laptop.as_hardware().map(|h| h.quantity()), Some(5));

        let mut fresh = scenario.clone();
        fresh.compute_damage(&DamagePayload::uniform(30, 4, None));
        assert!(scenario.total().approx_eq(&fresh.total(), 1e-12));
    }

    #[test]
    fn metadata_edits_need_no_payload() {
        let catalog = catalog();
        let config = config();
        let resolver = Resolver::new(&catalog, &config);
        let mut scenario = MeetingScenario::build(&descriptor(), &resolver).unwrap();
        scenario.compute_damage(&scenario.payload(None));
        let total = scenario.total();

        let patch = ScenarioPatch {
            name: Some("monthly sync".into()),
            creator: Some("kim".into()),
            duration_minutes: Some(60),
            ..Default::default()
        };
        let outcome = scenario.modify(&patch, &resolver).unwrap();
        assert!(!outcome.full_recompute);
        assert!(outcome.delta.is_noop());
        assert_eq!(scenario.name(), "monthly sync");
        assert_eq!(scenario.creator(), "kim");
        assert_eq!(scenario.total(), total);
        assert!(scenario.updated_at() >= scenario.created_at());
    }

    #[test]
    fn create_and_remove_are_unimplemented() {
        let catalog = catalog();
        let config = config();
        let resolver = Resolver::new(&catalog, &config);
        let mut scenario = MeetingScenario::build(&descriptor(), &resolver).unwrap();

        let create = ScenarioPatch {
            component: Some(ComponentChange::Create {
                descriptor: HardwareDescriptor::new("webcam").into(),
            }),
            damage_payload: Some(scenario.payload(None)),
            ..Default::default()
        };
        assert!(matches!(
            scenario.modify(&create, &resolver),
            Err(FootprintError::Unimplemented(_))
        ));

        let remove = ScenarioPatch {
            component: Some(ComponentChange::Remove {
                category: Category::Hardware,
                id: laptop_id(&scenario),
            }),
            ..Default::default()
        };
        assert!(matches!(
            scenario.modify(&remove, &resolver),
            Err(FootprintError::Unimplemented(_))
        ));
        assert_eq!(scenario.damage().aggregate(Category::Hardware).len(), 2);
    }

    #[test]
    fn unknown_component_leaves_scenario_untouched() {
        let catalog = catalog();
        let config = config();
        let resolver = Resolver::new(&catalog, &config);
        let mut scenario = MeetingScenario::build(&descriptor(), &resolver).unwrap();
        scenario.compute_damage(&scenario.payload(None));
        let before = scenario.clone();

        let mut patch = quantity_patch(ComponentId::generate(), 2, Some(scenario.payload(None)));
        patch.name = Some("renamed".into());
        assert!(scenario.modify(&patch, &resolver).unwrap_err().is_not_found());
        assert_eq!(scenario, before);
    }

    #[test]
    fn alternatives_keep_shape_and_point_back() {
        let catalog = catalog();
        let config = config();
        let resolver = Resolver::new(&catalog, &config);
        let mut scenario = MeetingScenario::build(&descriptor(), &resolver).unwrap();
        scenario.compute_damage(&scenario.payload(None));

        let (heavy, light) = scenario.generate_alternatives(&resolver).unwrap();
        let pairs = [
            (&heavy, AlternativeKind::HeavyVisio),
            (&light, AlternativeKind::LightTransport),
        ];
        for (alternative, kind) in pairs {
            assert_eq!(alternative.duration_minutes(), 60);
            assert_eq!(alternative.participant_count(), 4);
            assert_eq!(
                alternative.alternative_of(),
                Some(AlternativeOrigin {
                    parent: scenario.id(),
                    kind,
                })
            );
            assert!(!alternative.needs_full_recompute());
            assert!(!alternative.total().is_zero());
        }
        assert_eq!(heavy.name(), "weekly sync (heavy visio)");
        assert_eq!(heavy.damage().aggregate(Category::Journey).len(), 1);
        assert_eq!(light.damage().aggregate(Category::Journey).len(), 4);
    }

    #[test]
    fn alternatives_for_huge_meetings_fail_cleanly() {
        let catalog = catalog();
        let mut config = config();
        config.alternatives.heavy_bundle = vec![BundleItem::new("monitor", 5)];
        let resolver = Resolver::new(&catalog, &config);
        let huge = ScenarioDescriptor {
            participant_count: 3_000_000_000,
            ..descriptor()
        };
        let scenario = MeetingScenario::build(&huge, &resolver).unwrap();
        assert!(matches!(
            scenario.generate_alternatives(&resolver),
            Err(FootprintError::InvalidParameter(_))
        ));
    }
}
