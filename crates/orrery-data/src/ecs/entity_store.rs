// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Internal entity ID allocation and the entity-location index.

use orrery_core::ecs::EntityId;

/// Where an entity's row currently lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct EntityLocation {
    /// Index of the archetype in the world's archetype list.
    pub(crate) archetype: u32,
    /// Row within that archetype.
    pub(crate) row: u32,
}

/// Internal manager for entity IDs and their current storage locations.
///
/// IDs come from a monotonic counter and are never reused, so they are dense:
/// the location index is a plain vector indexed by ID rather than a hash map.
/// Every entity that has ever been created has a location — there is no
/// destroy operation in this core, only migration between archetypes.
#[derive(Default)]
pub(crate) struct EntityStore {
    locations: Vec<EntityLocation>,
}

impl EntityStore {
    /// Allocates the next entity ID, recording `location` as its home.
    pub(crate) fn allocate(&mut self, location: EntityLocation) -> EntityId {
        let id = EntityId::from_raw(self.locations.len() as u64);
        self.locations.push(location);
        id
    }

    /// Returns the location of `entity`, or `None` for an ID this store
    /// never allocated.
    pub(crate) fn location(&self, entity: EntityId) -> Option<EntityLocation> {
        self.locations.get(entity.to_raw() as usize).copied()
    }

    /// Updates the location of `entity` after a migration or swap-remove.
    pub(crate) fn set_location(&mut self, entity: EntityId, location: EntityLocation) {
        self.locations[entity.to_raw() as usize] = location;
    }

    /// Returns the number of entities ever created.
    pub(crate) fn len(&self) -> usize {
        self.locations.len()
    }
}
