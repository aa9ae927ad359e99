use footprint_catalog::TransportSubcategory;
use footprint_types::DamageVector;
use serde::{Deserialize, Serialize};

use super::Resolver;
use crate::error::Result;

/// A transportation-mean entry resolved out of the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransportationMean {
    pub name: String,
    pub subcategory: TransportSubcategory,
    pub per_person_km: bool,
    pub coefficient: DamageVector,
}

impl TransportationMean {
    pub fn resolve(name: &str, resolver: &Resolver<'_>) -> Result<Self> {
        let definition = resolver.catalog.transportation_mean(name)?;
        Ok(Self {
            name: name.to_string(),
            subcategory: definition.subcategory,
            per_person_km: definition.per_person_km,
            coefficient: definition.coefficient,
        })
    }

    /// Cars are recorded once per passenger, each carrying an equal share.
    pub fn is_car(&self) -> bool {
        self.subcategory == TransportSubcategory::Car
    }
}
