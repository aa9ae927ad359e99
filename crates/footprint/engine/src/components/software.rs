//! Conferencing client usage records.

use std::cmp::Reverse;

use footprint_catalog::Bandwidth;
use footprint_types::{Bound, DamageVector, Ranged};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::Resolver;
use crate::error::Result;
use crate::payload::SoftwarePayload;

const BITS_PER_BYTE: f64 = 8.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoftwareDescriptor {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl SoftwareDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SoftwarePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Usage record for one conferencing application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoftwareComponent {
    name: String,
    file_size_bytes: f64,
    bandwidth: Option<Bandwidth>,
    download_required: bool,
    /// Number of meetings one download is amortized over; 1 for streamed clients.
    spreading_factor: f64,
    /// Damage per transmitted bit.
    network: Ranged<DamageVector>,
}

impl SoftwareComponent {
    pub fn resolve(descriptor: &SoftwareDescriptor, resolver: &Resolver<'_>) -> Result<Self> {
        let definition = resolver.catalog.software(&descriptor.name)?;
        let network = *resolver.catalog.network(&resolver.config.network_profile)?;
        let spreading_factor = if definition.download_required {
            resolver.config.spreading_factor
        } else {
            1.0
        };

        Ok(Self {
            name: descriptor.name.clone(),
            file_size_bytes: definition.file_size_bytes,
            bandwidth: definition.bandwidth.clone(),
            download_required: definition.download_required,
            spreading_factor,
            network,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn download_required(&self) -> bool {
        self.download_required
    }

    pub fn spreading_factor(&self) -> f64 {
        self.spreading_factor
    }

    /// Inbound rate in Kbit/s for a meeting of `participants`, or `None`
    /// when the catalog has no bandwidth data for this client.
    ///
    /// Breakpoint tables use the breakpoint closest to `participants`; on a
    /// tie the larger breakpoint wins.
    pub fn inbound_bandwidth(&self, participants: u32, bound: Option<Bound>) -> Option<f64> {
        match self.bandwidth.as_ref()? {
            Bandwidth::Flat(kbits) => Some(*kbits),
            Bandwidth::ByParticipants(table) => table
                .iter()
                .min_by_key(|(breakpoint, _)| (breakpoint.abs_diff(participants), Reverse(**breakpoint)))
                .map(|(_, rate)| rate.resolve(bound)),
        }
    }

    /// Download damage, amortized by the spreading factor.
    pub fn compute_embodied_damage(&self, instances_number: u32, network_bound: Option<Bound>) -> DamageVector {
        if self.file_size_bytes <= 0.0 {
            return DamageVector::ZERO;
        }
        let bits = self.file_size_bytes * BITS_PER_BYTE;
        self.network
            .resolve(network_bound)
            .scale(bits * instances_number as f64 / self.spreading_factor)
    }

    /// Streaming damage for the whole meeting, every instance included.
    pub fn compute_operating_damage(
        &self,
        instances_number: u32,
        bandwidth_bound: Option<Bound>,
        network_bound: Option<Bound>,
        duration_minutes: u32,
    ) -> DamageVector {
        let Some(kbits) = self.inbound_bandwidth(instances_number, bandwidth_bound) else {
            return DamageVector::ZERO;
        };
        self.network.resolve(network_bound).scale(
            kbits / 1000.0 * 60.0 * instances_number as f64 * duration_minutes as f64,
        )
    }

    pub fn compute_damage(&self, payload: &SoftwarePayload) -> DamageVector {
        let damage = self.compute_embodied_damage(payload.instances_number, payload.network_bound)
            + self.compute_operating_damage(
                payload.instances_number,
                payload.bandwidth_bound,
                payload.network_bound,
                payload.duration_minutes,
            );
        debug!(
            software = %self.name,
            instances = payload.instances_number,
            climate_change = damage.climate_change,
            "Computed software damage"
        );
        damage
    }

    /// A software edit can only swap the client, which re-reads the catalog.
    pub fn update(&self, patch: &SoftwarePatch, resolver: &Resolver<'_>) -> Result<Self> {
        match &patch.name {
            Some(name) if *name != self.name => {
                Self::resolve(&SoftwareDescriptor::new(name.clone()), resolver)
            }
            _ => Ok(self.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::test_support::{catalog, config};

    fn software(name: &str) -> SoftwareComponent {
        let catalog = catalog();
        let config = config();
        SoftwareComponent::resolve(&SoftwareDescriptor::new(name), &Resolver::new(&catalog, &config)).unwrap()
    }

    fn network_upper() -> DamageVector {
        DamageVector::new(2.0e-17, 6.0e-12, 1.2e-11, 3.0e-10)
    }

    #[test]
    fn nearest_breakpoint_prefers_larger_on_tie() {
        let jitsi = software("jitsi");
        assert_eq!(jitsi.inbound_bandwidth(4, None), Some(1200.0));
        assert_eq!(jitsi.inbound_bandwidth(4, Some(Bound::Lower)), Some(900.0));
        assert_eq!(jitsi.inbound_bandwidth(6, None), Some(1500.0));
    }

    #[test]
    fn breakpoint_lookup_clamps_to_table_ends() {
        let jitsi = software("jitsi");
        assert_eq!(jitsi.inbound_bandwidth(9, None), Some(1500.0));
        assert_eq!(jitsi.inbound_bandwidth(1, None), Some(600.0));
        assert_eq!(jitsi.inbound_bandwidth(0, Some(Bound::Lower)), Some(600.0));
        assert_eq!(jitsi.inbound_bandwidth(3, None), Some(800.0));
    }

    #[test]
    fn flat_bandwidth_ignores_participants() {
        let client = software("desktop-client");
        assert_eq!(client.inbound_bandwidth(2, None), Some(1000.0));
        assert_eq!(client.inbound_bandwidth(40, Some(Bound::Lower)), Some(1000.0));
    }

    #[test]
    fn streamed_client_has_no_embodied_damage() {
        let jitsi = software("jitsi");
        assert_eq!(jitsi.spreading_factor(), 1.0);
        assert!(jitsi.compute_embodied_damage(5, None).is_zero());
    }

    #[test]
    fn downloaded_client_is_amortized() {
        let client = software("desktop-client");
        assert!(client.download_required());
        assert_eq!(client.spreading_factor(), 10.0);
        let damage = client.compute_embodied_damage(3, Some(Bound::Upper));
        let expected = network_upper().scale(80_000_000.0 * 8.0 * 3.0 / 10.0);
        assert!(damage.approx_eq(&expected, 1e-12));
    }

    #[test]
    fn operating_damage_converts_kbits_per_minute() {
        let client = software("desktop-client");
        let damage = client.compute_operating_damage(4, None, None, 30);
        let expected = network_upper().scale(1000.0 / 1000.0 * 60.0 * 4.0 * 30.0);
        assert!(damage.approx_eq(&expected, 1e-12));
    }

    #[test]
    fn missing_bandwidth_contributes_only_download() {
        let notes = software("offline-notes");
        assert_eq!(notes.inbound_bandwidth(3, None), None);
        assert!(notes.compute_operating_damage(3, None, None, 60).is_zero());

        let payload = SoftwarePayload {
            instances_number: 3,
            bandwidth_bound: None,
            network_bound: None,
            duration_minutes: 60,
        };
        let expected = network_upper().scale(2_000_000.0 * 8.0 * 3.0);
        assert!(notes.compute_damage(&payload).approx_eq(&expected, 1e-12));
    }

    #[test]
    fn unknown_software_is_not_found() {
        let catalog = catalog();
        let config = config();
        let err = SoftwareComponent::resolve(
            &SoftwareDescriptor::new("carrier-pigeon"),
            &Resolver::new(&catalog, &config),
        )
        .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn missing_network_profile_is_not_found() {
        let catalog = catalog();
        let config = crate::config::EngineConfig {
            network_profile: "satellite".into(),
            ..config()
        };
        let err = SoftwareComponent::resolve(
            &SoftwareDescriptor::new("jitsi"),
            &Resolver::new(&catalog, &config),
        )
        .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn rename_switches_client() {
        let catalog = catalog();
        let config = config();
        let resolver = Resolver::new(&catalog, &config);
        let jitsi = software("jitsi");
        let patch = SoftwarePatch {
            name: Some("desktop-client".into()),
        };
        let updated = jitsi.update(&patch, &resolver).unwrap();
        assert_eq!(updated.name(), "desktop-client");
        assert!(updated.download_required());
        assert_eq!(jitsi.update(&SoftwarePatch::default(), &resolver).unwrap(), jitsi);
    }
}
