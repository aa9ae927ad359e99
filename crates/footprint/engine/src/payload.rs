//! Per-category parameters a damage computation needs.
//!
//! Components never store these: every compute call, including the one that
//! follows an update, is handed a fresh payload.

use footprint_types::Bound;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HardwarePayload {
    pub duration_minutes: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bound: Option<Bound>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SoftwarePayload {
    /// Number of running clients, which is also the participant count used
    /// for bandwidth lookups.
    pub instances_number: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bandwidth_bound: Option<Bound>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network_bound: Option<Bound>,
    pub duration_minutes: u32,
}

/// Journeys depend on nothing outside their own record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct JourneyPayload {}

/// Payloads for all three categories of a scenario.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DamagePayload {
    pub hardware: HardwarePayload,
    pub software: SoftwarePayload,
    #[serde(default)]
    pub journey: JourneyPayload,
}

impl DamagePayload {
    /// Same duration everywhere, one client per participant, and `bound`
    /// applied to hardware, bandwidth and network alike.
    pub fn uniform(duration_minutes: u32, participant_count: u32, bound: Option<Bound>) -> Self {
        Self {
            hardware: HardwarePayload {
                duration_minutes,
                bound,
            },
            software: SoftwarePayload {
                instances_number: participant_count,
                bandwidth_bound: bound,
                network_bound: bound,
                duration_minutes,
            },
            journey: JourneyPayload {},
        }
    }

    /// True when this payload describes a meeting of `duration_minutes` with
    /// one client per participant.
    pub fn fits(&self, duration_minutes: u32, participant_count: u32) -> bool {
        self.hardware.duration_minutes == duration_minutes
            && self.software.duration_minutes == duration_minutes
            && self.software.instances_number == participant_count
    }

    pub fn upper_bound(duration_minutes: u32, participant_count: u32) -> Self {
        Self::uniform(duration_minutes, participant_count, Some(Bound::Upper))
    }

    pub fn lower_bound(duration_minutes: u32, participant_count: u32) -> Self {
        Self::uniform(duration_minutes, participant_count, Some(Bound::Lower))
    }
}
