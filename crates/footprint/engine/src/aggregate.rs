//! Per-category collections of components and their summed damage.

use footprint_types::{Category, ComponentId, DamageDelta, DamageVector};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::components::{Component, ComponentDescriptor, ComponentPatch, Resolver};
use crate::error::{FootprintError, Result};
use crate::payload::DamagePayload;

/// A recomputed component together with the change it makes to its
/// category total. Produced without touching the aggregate.
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentUpdate {
    pub component: Component,
    pub delta: DamageDelta,
}

/// All components of one category in a scenario, in insertion order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryAggregate {
    category: Category,
    components: Vec<Component>,
    total: DamageVector,
}

impl CategoryAggregate {
    pub fn new(category: Category) -> Self {
        Self {
            category,
            components: Vec::new(),
            total: DamageVector::ZERO,
        }
    }

    /// Resolves every descriptor into a component with a fresh id.
    pub fn rebuild(
        category: Category,
        descriptors: &[ComponentDescriptor],
        resolver: &Resolver<'_>,
    ) -> Result<Self> {
        let components = descriptors
            .iter()
            .map(|descriptor| {
                if descriptor.category() != category {
                    return Err(FootprintError::InvalidParameter(format!(
                        "{} descriptor listed under {}",
                        descriptor.category(),
                        category
                    )));
                }
                Component::resolve(descriptor, resolver)
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            category,
            components,
            total: DamageVector::ZERO,
        })
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn components(&self) -> &[Component] {
        &self.components
    }

    pub fn total(&self) -> DamageVector {
        self.total
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    pub fn get(&self, id: ComponentId) -> Option<&Component> {
        self.components.iter().find(|c| c.id() == id)
    }

    fn position(&self, id: ComponentId) -> Result<usize> {
        self.components
            .iter()
            .position(|c| c.id() == id)
            .ok_or(FootprintError::ComponentNotFound {
                category: self.category,
                id,
            })
    }

    /// Recomputes every member and resets the total to their sum.
    pub fn compute_damage(&mut self, payload: &DamagePayload) -> DamageVector {
        self.total = self
            .components
            .iter_mut()
            .map(|component| component.compute(payload))
            .sum();
        debug!(
            category = %self.category,
            components = self.components.len(),
            climate_change = self.total.climate_change,
            "Computed category damage"
        );
        self.total
    }

    /// Sum of the members' cached damage, ignoring the running total.
    pub fn sum_components(&self) -> DamageVector {
        self.components
            .iter()
            .filter_map(Component::damage)
            .sum()
    }

    /// Builds the edited and recomputed component and its delta. The
    /// aggregate is left unchanged.
    pub fn update_component(
        &self,
        id: ComponentId,
        label: Option<&str>,
        patch: &ComponentPatch,
        payload: &DamagePayload,
        resolver: &Resolver<'_>,
    ) -> Result<ComponentUpdate> {
        let current = &self.components[self.position(id)?];
        let removed = current.damage().unwrap_or(DamageVector::ZERO);

        let mut component = current.updated(label, patch, resolver)?;
        let added = component.compute(payload);

        Ok(ComponentUpdate {
            component,
            delta: DamageDelta::new(removed, added),
        })
    }

    /// Swaps an updated component in and moves the total by its delta.
    /// Returns the resulting change of the category total.
    pub fn apply_update(&mut self, update: ComponentUpdate) -> Result<DamageDelta> {
        let index = self.position(update.component.id())?;
        let old_total = self.total;
        self.total = update.delta.apply(&old_total);
        self.components[index] = update.component;
        Ok(DamageDelta::new(old_total, self.total))
    }

    /// Swaps a component in without touching the total; a full recompute
    /// must follow.
    pub fn replace_component(&mut self, component: Component) -> Result<()> {
        let index = self.position(component.id())?;
        self.components[index] = component;
        Ok(())
    }
}
