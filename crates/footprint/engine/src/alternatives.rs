//! Rule-based alternative scenarios.
//!
//! Given a scenario, two siblings with the same duration and participant count
//! are derived:
//!
//! - **heavy visio**: a third of the participants (rounded up) sit in a
//!   dedicated conferencing setup, the others join from a plain desktop, and a
//!   fifth of them (rounded up) ride a city bus to get there
//! - **light transport**: two thirds of the participants (rounded up) join on a
//!   laptop, and everyone travels one of the reference journeys
//!
//! Both use the configured conferencing client.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::components::{HardwareDescriptor, JourneyDescriptor, SoftwareDescriptor};
use crate::config::{AlternativesConfig, BundleItem, ReferenceJourney};
use crate::error::{FootprintError, Result};
use crate::scenario::{MeetingScenario, ScenarioDescriptor};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlternativeKind {
    HeavyVisio,
    LightTransport,
}

impl AlternativeKind {
    pub const ALL: [AlternativeKind; 2] = [AlternativeKind::HeavyVisio, AlternativeKind::LightTransport];
}

impl fmt::Display for AlternativeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlternativeKind::HeavyVisio => f.write_str("heavy visio"),
            AlternativeKind::LightTransport => f.write_str("light transport"),
        }
    }
}

/// Bundle and rider counts of the heavy-visio alternative.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeavyVisioPlan {
    pub heavy_bundles: u32,
    pub light_bundles: u32,
    pub bus_riders: u32,
}

impl HeavyVisioPlan {
    pub fn for_participants(participants: u32) -> Self {
        let heavy_bundles = participants.div_ceil(3);
        Self {
            heavy_bundles,
            light_bundles: participants - heavy_bundles,
            bus_riders: participants.div_ceil(5),
        }
    }

    pub fn bundles(&self) -> u32 {
        self.heavy_bundles + self.light_bundles
    }
}

/// Laptops handed out in the light-transport alternative: two thirds of the
/// participants, rounded up.
pub fn light_transport_laptops(participants: u32) -> u32 {
    participants - participants / 3
}

/// Fails when a bundle quantity times the bundle count does not fit a `u32`.
pub fn heavy_visio(parent: &MeetingScenario, config: &AlternativesConfig) -> Result<ScenarioDescriptor> {
    let plan = HeavyVisioPlan::for_participants(parent.participant_count());

    let mut hardware = bundle(&config.heavy_bundle, plan.heavy_bundles, "heavy bundle")?;
    hardware.extend(bundle(&config.light_bundle, plan.light_bundles, "light bundle")?);

    let journeys = (1..=plan.bus_riders)
        .map(|rider| {
            JourneyDescriptor::new(participant(rider), config.bus_mean.clone(), config.bus_distance_km)
        })
        .collect();

    Ok(sibling(parent, AlternativeKind::HeavyVisio, hardware, config, journeys))
}

pub fn light_transport(parent: &MeetingScenario, config: &AlternativesConfig) -> ScenarioDescriptor {
    let laptops = light_transport_laptops(parent.participant_count());
    let hardware = if laptops > 0 {
        vec![HardwareDescriptor::new(config.laptop.clone()).with_quantity(laptops)]
    } else {
        Vec::new()
    };
    let journeys = reference_journeys(parent.participant_count(), &config.reference_journeys);

    sibling(parent, AlternativeKind::LightTransport, hardware, config, journeys)
}

/// Round-robin assignment of reference journeys to participants.
///
/// Participant `i` takes entry `i mod n`, with its distance scaled by
/// `min(participants, n)`. With fewer participants than entries, the entries
/// nobody was assigned go to the last participant.
pub fn reference_journeys(participants: u32, references: &[ReferenceJourney]) -> Vec<JourneyDescriptor> {
    if participants == 0 || references.is_empty() {
        return Vec::new();
    }
    let scale = participants.min(references.len() as u32) as f64;
    let leg = |passenger: u32, reference: &ReferenceJourney| {
        JourneyDescriptor::new(
            participant(passenger),
            reference.mean.clone(),
            reference.distance_km * scale,
        )
    };

    let mut journeys: Vec<_> = (0..participants)
        .map(|i| leg(i + 1, &references[i as usize % references.len()]))
        .collect();
    journeys.extend(
        references
            .iter()
            .skip(participants as usize)
            .map(|reference| leg(participants, reference)),
    );
    journeys
}

fn bundle(items: &[BundleItem], bundles: u32, label: &str) -> Result<Vec<HardwareDescriptor>> {
    if bundles == 0 {
        return Ok(Vec::new());
    }
    items
        .iter()
        .map(|item| {
            let quantity = item.quantity.checked_mul(bundles).ok_or_else(|| {
                FootprintError::InvalidParameter(format!(
                    "{} {} for {} bundles overflows the quantity",
                    item.quantity, item.hardware, bundles
                ))
            })?;
            Ok(HardwareDescriptor::new(item.hardware.clone())
                .with_quantity(quantity)
                .with_label(format!("{} ({})", item.hardware, label)))
        })
        .collect()
}

fn sibling(
    parent: &MeetingScenario,
    kind: AlternativeKind,
    hardware: Vec<HardwareDescriptor>,
    config: &AlternativesConfig,
    journeys: Vec<JourneyDescriptor>,
) -> ScenarioDescriptor {
    ScenarioDescriptor {
        creator: parent.creator().to_string(),
        name: format!("{} ({})", parent.name(), kind),
        duration_minutes: parent.duration_minutes(),
        participant_count: parent.participant_count(),
        hardware,
        software: vec![SoftwareDescriptor::new(config.software.clone())],
        journeys,
    }
}

fn participant(index: u32) -> String {
    format!("participant {}", index)
}
