//! Travel legs.
//!
//! Journeys only have an embodied phase. Per passenger-km means are charged
//! for every person on board; per vehicle-km means are charged once. Car legs
//! are stored one per passenger, so their damage is split by occupancy and the
//! passengers' records sum back to the vehicle total.

use footprint_types::DamageVector;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::transport::TransportationMean;
use super::Resolver;
use crate::error::{FootprintError, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JourneyDescriptor {
    pub passenger: String,
    /// Key into the transportation-mean table.
    pub mean: String,
    pub distance_km: f64,
    #[serde(default = "default_number_of_people")]
    pub number_of_people: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl JourneyDescriptor {
    pub fn new(passenger: impl Into<String>, mean: impl Into<String>, distance_km: f64) -> Self {
        Self {
            passenger: passenger.into(),
            mean: mean.into(),
            distance_km,
            number_of_people: default_number_of_people(),
            label: None,
        }
    }

    pub fn with_people(mut self, number_of_people: u32) -> Self {
        self.number_of_people = number_of_people;
        self
    }
}

fn default_number_of_people() -> u32 {
    1
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JourneyPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub passenger: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mean: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number_of_people: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JourneyComponent {
    passenger: String,
    mean: TransportationMean,
    distance_km: f64,
    number_of_people: u32,
}

impl JourneyComponent {
    pub fn resolve(descriptor: &JourneyDescriptor, resolver: &Resolver<'_>) -> Result<Self> {
        validate(descriptor.distance_km, descriptor.number_of_people)?;
        Ok(Self {
            passenger: descriptor.passenger.clone(),
            mean: TransportationMean::resolve(&descriptor.mean, resolver)?,
            distance_km: descriptor.distance_km,
            number_of_people: descriptor.number_of_people,
        })
    }

    pub fn passenger(&self) -> &str {
        &self.passenger
    }

    pub fn mean(&self) -> &TransportationMean {
        &self.mean
    }

    pub fn distance_km(&self) -> f64 {
        self.distance_km
    }

    pub fn number_of_people(&self) -> u32 {
        self.number_of_people
    }

    pub fn compute_embodied_damage(&self) -> DamageVector {
        let people = self.number_of_people as f64;
        let coefficient = self.mean.coefficient;
        let value = if self.mean.per_person_km {
            coefficient.scale(self.distance_km * people)
        } else {
            coefficient.scale(self.distance_km)
        };
        if self.mean.is_car() {
            value.transform(|v| v / people)
        } else {
            value
        }
    }

    pub fn compute_damage(&self) -> DamageVector {
        let damage = self.compute_embodied_damage();
        debug!(
            passenger = %self.passenger,
            mean = %self.mean.name,
            distance_km = self.distance_km,
            climate_change = damage.climate_change,
            "Computed journey damage"
        );
        damage
    }

    pub fn update(&self, patch: &JourneyPatch, resolver: &Resolver<'_>) -> Result<Self> {
        let distance_km = patch.distance_km.unwrap_or(self.distance_km);
        let number_of_people = patch.number_of_people.unwrap_or(self.number_of_people);
        validate(distance_km, number_of_people)?;

        let mean = match &patch.mean {
            Some(name) if *name != self.mean.name => TransportationMean::resolve(name, resolver)?,
            _ => self.mean.clone(),
        };
        Ok(Self {
            passenger: patch.passenger.clone().unwrap_or_else(|| self.passenger.clone()),
            mean,
            distance_km,
            number_of_people,
        })
    }
}

fn validate(distance_km: f64, number_of_people: u32) -> Result<()> {
    if !(distance_km.is_finite() && distance_km >= 0.0) {
        return Err(FootprintError::InvalidParameter(format!(
            "journey distance must be a non-negative number of km, got {}",
            distance_km
        )));
    }
    if number_of_people == 0 {
        return Err(FootprintError::InvalidParameter(
            "journey must carry at least one person".into(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::test_support::{catalog, config};

    fn journey(descriptor: JourneyDescriptor) -> Result<JourneyComponent> {
        let catalog = catalog();
        let config = config();
        JourneyComponent::resolve(&descriptor, &Resolver::new(&catalog, &config))
    }

    fn car_coefficient() -> DamageVector {
        DamageVector::new(8.0e-8, 0.024, 0.2, 3.2)
    }

    #[test]
    fn car_damage_is_split_between_passengers() {
        let three: Vec<_> = (0..3)
            .map(|i| journey(JourneyDescriptor::new(format!("p{}", i), "car", 100.0).with_people(3)).unwrap())
            .collect();
        let share = three[0].compute_damage();
        assert!(share.approx_eq(&car_coefficient().scale(100.0 / 3.0), 1e-12));

        let total: DamageVector = three.iter().map(|j| j.compute_damage()).sum();
        assert!(total.approx_eq(&car_coefficient().scale(100.0), 1e-12));

        let five = journey(JourneyDescriptor::new("p0", "car", 100.0).with_people(5)).unwrap();
        let smaller = five.compute_damage();
        assert!(smaller.approx_eq(&car_coefficient().scale(20.0), 1e-12));
        assert!(smaller.dominated_by(&share));
    }

    #[test]
    fn per_person_mean_scales_with_people() {
        let train = DamageVector::new(1.0e-8, 3.0e-3, 0.03, 0.5);
        let solo = journey(JourneyDescriptor::new("ann", "train", 50.0)).unwrap();
        let group = journey(JourneyDescriptor::new("ann", "train", 50.0).with_people(4)).unwrap();
        assert!(solo.compute_damage().approx_eq(&train.scale(50.0), 1e-12));
        assert!(group.compute_damage().approx_eq(&train.scale(200.0), 1e-12));
    }

    #[test]
    fn zero_distance_is_zero_damage() {
        let walk = journey(JourneyDescriptor::new("bob", "city-bus", 0.0)).unwrap();
        assert!(walk.compute_damage().is_zero());
    }

    #[test]
    fn invalid_journeys_are_rejected() {
        assert!(matches!(
            journey(JourneyDescriptor::new("bob", "car", -1.0)),
            Err(FootprintError::InvalidParameter(_))
        ));
        assert!(matches!(
            journey(JourneyDescriptor::new("bob", "car", 10.0).with_people(0)),
            Err(FootprintError::InvalidParameter(_))
        ));
        assert!(journey(JourneyDescriptor::new("bob", "hovercraft", 10.0))
            .unwrap_err()
            .is_not_found());
    }

    #[test]
    fn update_swaps_mean_and_keeps_the_rest() {
        let catalog = catalog();
        let config = config();
        let resolver = Resolver::new(&catalog, &config);
        let leg = journey(JourneyDescriptor::new("carol", "train", 30.0)).unwrap();
        let patch = JourneyPatch {
            mean: Some("plane".into()),
            ..Default::default()
        };
        let updated = leg.update(&patch, &resolver).unwrap();
        assert_eq!(updated.mean().name, "plane");
        assert_eq!(updated.passenger(), "carol");
        assert_eq!(updated.distance_km(), 30.0);
    }
}
