//! Scenario store.
//!
//! Scenarios are held behind a per-scenario lock so that the read, update and
//! total adjustment of an incremental edit run as one unit.

use std::sync::Arc;

use dashmap::DashMap;
use footprint_types::ScenarioId;
use parking_lot::Mutex;

use crate::scenario::MeetingScenario;

/// A registered scenario and its lock.
pub type SharedScenario = Arc<Mutex<MeetingScenario>>;

/// Keyed store of scenarios.
pub trait ScenarioRegistry: Send + Sync {
    /// Inserts or replaces the scenario under its own id.
    fn set(&self, scenario: MeetingScenario) -> SharedScenario;

    fn get(&self, id: &ScenarioId) -> Option<SharedScenario>;

    /// Returns whether a scenario was removed.
    fn delete(&self, id: &ScenarioId) -> bool;

    /// Visits every scenario, locking each one in turn.
    fn for_each(&self, f: &mut dyn FnMut(&MeetingScenario));

    fn ids(&self) -> Vec<ScenarioId>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// In-memory scenario registry
pub struct InMemoryScenarioRegistry {
    scenarios: DashMap<ScenarioId, SharedScenario>,
}

impl InMemoryScenarioRegistry {
    pub fn new() -> Self {
        Self {
            scenarios: DashMap::new(),
        }
    }
}

impl Default for InMemoryScenarioRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ScenarioRegistry for InMemoryScenarioRegistry {
    fn set(&self, scenario: MeetingScenario) -> SharedScenario {
        let shared = Arc::new(Mutex::new(scenario));
        let id = shared.lock().id();
        self.scenarios.insert(id, Arc::clone(&shared));
        shared
    }

    fn get(&self, id: &ScenarioId) -> Option<SharedScenario> {
        self.scenarios.get(id).map(|s| Arc::clone(s.value()))
    }

    fn delete(&self, id: &ScenarioId) -> bool {
        self.scenarios.remove(id).is_some()
    }

    fn for_each(&self, f: &mut dyn FnMut(&MeetingScenario)) {
        // Snapshot the handles first so no map shard stays locked while a
        // scenario lock is held.
        let handles: Vec<SharedScenario> = self
            .scenarios
            .iter()
            .map(|entry| Arc::clone(entry.value()))
            .collect();
        for handle in handles {
            f(&handle.lock());
        }
    }

    fn ids(&self) -> Vec<ScenarioId> {
        self.scenarios.iter().map(|entry| *entry.key()).collect()
    }

    fn len(&self) -> usize {
        self.scenarios.len()
    }
}
