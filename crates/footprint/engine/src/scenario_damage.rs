use footprint_types::{Category, DamageDelta, DamageVector};
use serde::{Deserialize, Serialize};

use crate::aggregate::CategoryAggregate;
use crate::components::{ComponentDescriptor, Resolver};
use crate::error::Result;
use crate::payload::DamagePayload;

/// The three category aggregates of a scenario and their cached sum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioDamage {
    hardware: CategoryAggregate,
    software: CategoryAggregate,
    journey: CategoryAggregate,
    total: DamageVector,
}

impl ScenarioDamage {
    pub fn build(
        hardware: &[ComponentDescriptor],
        software: &[ComponentDescriptor],
        journeys: &[ComponentDescriptor],
        resolver: &Resolver<'_>,
    ) -> Result<Self> {
        Ok(Self {
            hardware: CategoryAggregate::rebuild(Category::Hardware, hardware, resolver)?,
            software: CategoryAggregate::rebuild(Category::Software, software, resolver)?,
            journey: CategoryAggregate::rebuild(Category::Journey, journeys, resolver)?,
            total: DamageVector::ZERO,
        })
    }

    pub fn aggregate(&self, category: Category) -> &CategoryAggregate {
        match category {
            Category::Hardware => &self.hardware,
            Category::Software => &self.software,
            Category::Journey => &self.journey,
        }
    }

    pub fn aggregate_mut(&mut self, category: Category) -> &mut CategoryAggregate {
        match category {
            Category::Hardware => &mut self.hardware,
            Category::Software => &mut self.software,
            Category::Journey => &mut self.journey,
        }
    }

    pub fn total(&self) -> DamageVector {
        self.total
    }

    /// Full recompute of every category.
    pub fn compute_damage(&mut self, payload: &DamagePayload) -> DamageVector {
        let total: DamageVector = Category::ALL
            .iter()
            .map(|category| self.aggregate_mut(*category).compute_damage(payload))
            .sum();
        self.total = total;
        total
    }

    /// Moves the scenario total by the change of one category total.
    pub fn apply_delta(&mut self, category_delta: &DamageDelta) -> DamageVector {
        self.total = category_delta.apply(&self.total);
        self.total
    }

    pub fn component_count(&self) -> usize {
        Category::ALL.iter().map(|c| self.aggregate(*c).len()).sum()
    }
}
