//! Shared fixtures for engine integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use footprint_catalog::StaticCatalog;
use footprint_engine::{
    EngineConfig, FootprintService, HardwareDescriptor, JourneyDescriptor, ScenarioDescriptor,
    SoftwareDescriptor,
};

pub const CATALOG_JSON: &str = include_str!("../fixtures/catalog.json");

pub fn catalog() -> StaticCatalog {
    StaticCatalog::from_json_str(CATALOG_JSON).expect("fixture catalog should load")
}

pub fn service() -> FootprintService {
    FootprintService::in_memory(Arc::new(catalog()), EngineConfig::default())
        .expect("default config is valid")
}

/// A hybrid meeting: two people on laptops, one meeting room with a TV and
/// monitors, a shared client and a mix of commutes.
pub fn hybrid_meeting(participant_count: u32, duration_minutes: u32) -> ScenarioDescriptor {
    ScenarioDescriptor {
        creator: "nora".into(),
        name: "hybrid review".into(),
        duration_minutes,
        participant_count,
        hardware: vec![
            HardwareDescriptor::new("laptop").with_quantity(2),
            HardwareDescriptor::new("tv").with_share(0.5),
            HardwareDescriptor::new("monitor").with_quantity(2).with_size(27.0),
            HardwareDescriptor::new("webcam"),
        ],
        software: vec![
            SoftwareDescriptor::new("jitsi"),
            SoftwareDescriptor::new("desktop-client"),
        ],
        journeys: vec![
            JourneyDescriptor::new("nora", "train", 35.0),
            JourneyDescriptor::new("omar", "car", 18.0).with_people(2),
            JourneyDescriptor::new("pia", "car", 18.0).with_people(2),
        ],
    }
}
