//! Catalog lookup trait and the in-memory implementation.

use std::path::Path;

use footprint_types::{DamageVector, Ranged};
use tracing::{debug, info};

use crate::error::{CatalogError, Result};
use crate::schema::{
    CatalogData, HardwareDefinition, SoftwareDefinition, TableKind, TransportationMeanDefinition,
};
use crate::validate::validate;

/// Read-only keyed lookup into the coefficient tables.
///
/// A miss is always [`CatalogError::NotFound`]; callers never get a default entry.
pub trait CoefficientCatalog: Send + Sync {
    fn hardware(&self, name: &str) -> Result<&HardwareDefinition>;

    fn software(&self, name: &str) -> Result<&SoftwareDefinition>;

    fn transportation_mean(&self, name: &str) -> Result<&TransportationMeanDefinition>;

    /// Damage per transmitted bit for a network profile.
    fn network(&self, profile: &str) -> Result<&Ranged<DamageVector>>;
}

/// Catalog held entirely in memory. Entries are validated once in [`StaticCatalog::new`]
/// so lookups never have to re-check references or composite structure.
#[derive(Debug, Clone)]
pub struct StaticCatalog {
    data: CatalogData,
}

impl StaticCatalog {
    pub fn new(data: CatalogData) -> Result<Self> {
        validate(&data)?;
        info!(
            hardware = data.hardware.len(),
            software = data.software.len(),
            transportation_means = data.transportation_means.len(),
            network_profiles = data.network.len(),
            "Coefficient catalog loaded"
        );
        Ok(Self { data })
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let data: CatalogData = serde_json::from_str(json)?;
        Self::new(data)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "Reading coefficient catalog");
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    pub fn data(&self) -> &CatalogData {
        &self.data
    }
}

impl CoefficientCatalog for StaticCatalog {
    fn hardware(&self, name: &str) -> Result<&HardwareDefinition> {
        self.data
            .hardware
            .get(name)
            .ok_or_else(|| CatalogError::not_found(TableKind::Hardware, name))
    }

    fn software(&self, name: &str) -> Result<&SoftwareDefinition> {
        self.data
            .software
            .get(name)
            .ok_or_else(|| CatalogError::not_found(TableKind::Software, name))
    }

    fn transportation_mean(&self, name: &str) -> Result<&TransportationMeanDefinition> {
        self.data
            .transportation_means
            .get(name)
            .ok_or_else(|| CatalogError::not_found(TableKind::TransportationMean, name))
    }

    fn network(&self, profile: &str) -> Result<&Ranged<DamageVector>> {
        self.data
            .network
            .get(profile)
            .ok_or_else(|| CatalogError::not_found(TableKind::Network, profile))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{AtomicHardware, EmbodiedCoefficient};
    use std::collections::BTreeMap;

    fn atomic(embodied: Option<EmbodiedCoefficient>) -> HardwareDefinition {
        HardwareDefinition::Atomic(AtomicHardware {
            size_dependent: false,
            default_size: None,
            lifetime_years: 5.0,
            daily_operating_hours: 7.0,
            weight_grams: Some(Ranged::Single(100.0)),
            embodied,
            operating_visio: None,
            operating_standby: None,
            known_usage: None,
        })
    }

    fn composite(children: &[(&str, u32)]) -> HardwareDefinition {
        HardwareDefinition::Composite {
            components: children
                .iter()
                .map(|(n, q)| (n.to_string(), *q))
                .collect::<BTreeMap<_, _>>(),
        }
    }

    fn with_hardware(entries: Vec<(&str, HardwareDefinition)>) -> CatalogData {
        CatalogData {
            hardware: entries
                .into_iter()
                .map(|(n, d)| (n.to_string(), d))
                .collect(),
            ..Default::default()
        }
    }

    #[test]
    fn lookup_miss_is_not_found() {
        let catalog = StaticCatalog::new(CatalogData::default()).unwrap();
        assert!(matches!(
            catalog.hardware("laptop"),
            Err(CatalogError::NotFound {
                table: TableKind::Hardware,
                ..
            })
        ));
        assert!(matches!(
            catalog.network("default"),
            Err(CatalogError::NotFound {
                table: TableKind::Network,
                ..
            })
        ));
    }

    #[test]
    fn composite_with_valid_children_is_accepted() {
        let data = with_hardware(vec![
            ("tv", composite(&[("tv-base", 1), ("tv-screen", 1)])),
            ("tv-base", atomic(None)),
            ("tv-screen", atomic(None)),
        ]);
        let catalog = StaticCatalog::new(data).unwrap();
        assert!(catalog.hardware("tv").unwrap().is_composite());
    }

    #[test]
    fn direct_self_reference_is_rejected() {
        let data = with_hardware(vec![("loop", composite(&[("loop", 1)]))]);
        let err = StaticCatalog::new(data).unwrap_err();
        assert!(err.to_string().contains("composite cycle"));
    }

    #[test]
    fn transitive_cycle_is_rejected() {
        let data = with_hardware(vec![
            ("a", composite(&[("b", 1)])),
            ("b", composite(&[("c", 2)])),
            ("c", composite(&[("a", 1), ("leaf", 1)])),
            ("leaf", atomic(None)),
        ]);
        assert!(matches!(
            StaticCatalog::new(data),
            Err(CatalogError::InvalidEntry { .. })
        ));
    }

    #[test]
    fn shared_children_are_not_cycles() {
        let data = with_hardware(vec![
            ("desk-a", composite(&[("screen", 2), ("leaf", 1)])),
            ("desk-b", composite(&[("desk-a", 1), ("screen", 1)])),
            ("screen", atomic(None)),
            ("leaf", atomic(None)),
        ]);
        assert!(StaticCatalog::new(data).is_ok());
    }

    #[test]
    fn dangling_child_is_rejected() {
        let data = with_hardware(vec![("tv", composite(&[("missing", 1)]))]);
        assert!(StaticCatalog::new(data).is_err());
    }

    #[test]
    fn empty_composite_is_rejected() {
        let data = with_hardware(vec![("tv", composite(&[]))]);
        assert!(StaticCatalog::new(data).is_err());
    }

    #[test]
    fn assimilation_target_must_be_measured() {
        let data = with_hardware(vec![
            (
                "router",
                atomic(Some(EmbodiedCoefficient::AssimilatedTo("box".into()))),
            ),
            ("box", atomic(None)),
        ]);
        assert!(StaticCatalog::new(data).is_err());

        let data = with_hardware(vec![
            (
                "router",
                atomic(Some(EmbodiedCoefficient::AssimilatedTo("per-gram".into()))),
            ),
            (
                "per-gram",
                atomic(Some(EmbodiedCoefficient::Measured(Ranged::Single(
                    DamageVector::splat(1e-3),
                )))),
            ),
        ]);
        assert!(StaticCatalog::new(data).is_ok());
    }

    #[test]
    fn size_dependent_needs_default_size() {
        let mut screen = AtomicHardware {
            size_dependent: true,
            default_size: None,
            lifetime_years: 5.0,
            daily_operating_hours: 7.0,
            weight_grams: None,
            embodied: None,
            operating_visio: None,
            operating_standby: None,
            known_usage: None,
        };
        let data = with_hardware(vec![("screen", HardwareDefinition::Atomic(screen.clone()))]);
        assert!(StaticCatalog::new(data).is_err());

        screen.default_size = Some(24.0);
        let data = with_hardware(vec![("screen", HardwareDefinition::Atomic(screen))]);
        assert!(StaticCatalog::new(data).is_ok());
    }

    #[test]
    fn loads_from_json() {
        let catalog = StaticCatalog::from_json_str(
            r#"{
                "hardware": {
                    "laptop": {"kind": "atomic", "lifetime_years": 5, "daily_operating_hours": 7}
                },
                "software": {"jitsi": {"bandwidth": {"flat": 1200}}},
                "network": {"default": {"human_health": 1e-15, "ecosystem_quality": 1e-12, "climate_change": 1e-10, "resources": 1e-9}}
            }"#,
        )
        .unwrap();
        assert!(catalog.hardware("laptop").is_ok());
        assert!(catalog.software("jitsi").is_ok());
        assert!(catalog.network("default").is_ok());
        assert!(catalog.transportation_mean("train").is_err());
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        assert!(matches!(
            StaticCatalog::from_json_str("{ not json"),
            Err(CatalogError::Parse(_))
        ));
    }
}
