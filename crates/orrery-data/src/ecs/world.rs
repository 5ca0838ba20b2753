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

//! The central container of the entity/component store.

use std::any::type_name;
use std::collections::HashMap;

use orrery_core::ecs::EntityId;

use crate::ecs::archetype::Archetype;
use crate::ecs::component::Component;
use crate::ecs::entity_store::{EntityLocation, EntityStore};
use crate::ecs::error::EcsError;
use crate::ecs::mask::{ComponentMask, ComponentTypeId};
use crate::ecs::registry::ComponentRegistry;

/// Initial cell capacity of a freshly created archetype's columns.
pub(crate) const INITIAL_COLUMN_CAPACITY: usize = 10;

/// The central container for the entity/component store.
///
/// The `World` owns the component registry, the archetypes with their
/// columnar storage, and the entity-location index. Exactly one archetype
/// exists per distinct component mask the world has ever observed; adding or
/// removing a component migrates the entity's row to the archetype for its
/// new mask, creating that archetype on first use.
///
/// All operations take the world explicitly (`&self` / `&mut self`); there
/// is no global instance, so independent worlds can coexist — one per scene,
/// one per test. Everything here is single-threaded and synchronous:
/// `&mut self` on every mutating operation also makes it impossible to
/// mutate the store from inside a [`for_each`](Self::for_each) callback.
pub struct World {
    pub(crate) registry: ComponentRegistry,
    pub(crate) archetypes: Vec<Archetype>,
    /// Exactly one archetype index per distinct mask ever observed.
    pub(crate) archetype_index: HashMap<ComponentMask, u32>,
    pub(crate) entities: EntityStore,
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

impl World {
    /// Index of the canonical empty archetype, created with the world.
    const EMPTY_ARCHETYPE: u32 = 0;

    /// Creates an empty world containing only the canonical empty archetype.
    pub fn new() -> Self {
        let registry = ComponentRegistry::new();
        let empty = Archetype::new(ComponentMask::EMPTY, &registry, 0);
        let mut archetype_index = HashMap::new();
        archetype_index.insert(ComponentMask::EMPTY, Self::EMPTY_ARCHETYPE);
        Self {
            registry,
            archetypes: vec![empty],
            archetype_index,
            entities: EntityStore::default(),
        }
    }

    /// Registers the component type `C`, assigning it the next free bit
    /// index.
    ///
    /// Must be called exactly once per type, before any entity uses it.
    /// Fails with [`EcsError::RegistryFull`] past the
    /// [`MAX_COMPONENT_TYPES`](crate::ecs::MAX_COMPONENT_TYPES) limit and
    /// with [`EcsError::AlreadyRegistered`] on a duplicate.
    pub fn register_component<C: Component>(&mut self) -> Result<ComponentTypeId, EcsError> {
        self.registry.register::<C>()
    }

    /// Returns `true` if `C` has been registered with this world.
    pub fn is_registered<C: Component>(&self) -> bool {
        self.registry.is_registered::<C>()
    }

    /// Creates a new entity with no components.
    ///
    /// The entity starts in the canonical empty archetype; IDs are allocated
    /// from a monotonic counter and never reused.
    pub fn create_entity(&mut self) -> EntityId {
        let empty = &mut self.archetypes[Self::EMPTY_ARCHETYPE as usize];
        let row = empty.row_count() as u32;
        let id = self.entities.allocate(EntityLocation {
            archetype: Self::EMPTY_ARCHETYPE,
            row,
        });
        empty.push_row(id);
        id
    }

    /// Returns the number of entities ever created.
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Returns the number of archetypes, including the empty one.
    pub fn archetype_count(&self) -> usize {
        self.archetypes.len()
    }

    /// Returns the number of registered component types.
    pub fn component_count(&self) -> usize {
        self.registry.len()
    }

    fn location(&self, entity: EntityId) -> Result<EntityLocation, EcsError> {
        self.entities
            .location(entity)
            .ok_or(EcsError::EntityNotFound { entity })
    }

    /// Returns the index of the archetype for `mask`, creating it on first
    /// use.
    fn ensure_archetype(&mut self, mask: ComponentMask) -> u32 {
        if let Some(&index) = self.archetype_index.get(&mask) {
            return index;
        }
        let index = self.archetypes.len() as u32;
        log::debug!("creating archetype {} ({} columns)", mask, mask.count());
        self.archetypes
            .push(Archetype::new(mask, &self.registry, INITIAL_COLUMN_CAPACITY));
        self.archetype_index.insert(mask, index);
        index
    }

    /// Borrows two distinct archetypes mutably at once.
    ///
    /// Takes the archetype list rather than `&mut self` so the caller can
    /// keep updating the entity-location index while both borrows are live.
    fn two_archetypes(
        archetypes: &mut [Archetype],
        a: u32,
        b: u32,
    ) -> (&mut Archetype, &mut Archetype) {
        assert_ne!(a, b, "migration source and target archetypes must differ");
        let (a, b) = (a as usize, b as usize);
        if a < b {
            let (head, tail) = archetypes.split_at_mut(b);
            (&mut head[a], &mut tail[0])
        } else {
            let (head, tail) = archetypes.split_at_mut(a);
            (&mut tail[0], &mut head[b])
        }
    }

    /// Adds component `C` to `entity`, migrating its row to the archetype
    /// for the widened mask, and returns a reference to the stored value.
    ///
    /// If the entity already has a `C`, the old value is dropped and
    /// replaced in place — the mask is unchanged, so no migration happens.
    pub fn add_component<C: Component>(
        &mut self,
        entity: EntityId,
        value: C,
    ) -> Result<&mut C, EcsError> {
        let id = self.registry.lookup::<C>()?;
        let location = self.location(entity)?;
        let source_mask = self.archetypes[location.archetype as usize].mask();

        if source_mask.contains(id) {
            // Same mask, same archetype: replace the value in place.
            let archetype = &mut self.archetypes[location.archetype as usize];
            let cell = archetype.cell_ptr(id, location.row as usize).cast::<C>();
            // SAFETY: the mask says the cell holds a live `C`, and `&mut
            // self` guarantees exclusive access. The old value is read out
            // before the write so the cell is never left dead if its drop
            // panics.
            unsafe {
                let old = cell.read();
                cell.write(value);
                drop(old);
                return Ok(&mut *cell);
            }
        }

        let target_mask = source_mask.with(id);
        let target_index = self.ensure_archetype(target_mask);
        let (source, target) =
            Self::two_archetypes(&mut self.archetypes, location.archetype, target_index);

        if target.is_full() {
            target.grow();
        }
        let new_row = target.push_row(entity);
        let source_row = location.row as usize;
        // SAFETY: `source_row` is live in `source`; the freshly pushed row's
        // cells are vacant. After the relocation the source row's cells are
        // vacated, which is exactly what `swap_remove_row` requires.
        unsafe {
            target.relocate_shared_row(new_row, source, source_row);
            target.cell_ptr(id, new_row).cast::<C>().write(value);
            if let Some(moved) = source.swap_remove_row(source_row) {
                self.entities.set_location(moved, location);
            }
        }
        self.entities.set_location(
            entity,
            EntityLocation {
                archetype: target_index,
                row: new_row as u32,
            },
        );

        let archetype = &self.archetypes[target_index as usize];
        let cell = archetype.cell_ptr(id, new_row).cast::<C>();
        // SAFETY: the cell was just initialized; `&mut self` guarantees
        // exclusive access.
        unsafe { Ok(&mut *cell) }
    }

    /// Removes component `C` from `entity`, dropping the value and migrating
    /// the row to the archetype for the narrowed mask.
    ///
    /// Removing the last component parks the entity in the canonical empty
    /// archetype; the entity itself stays alive.
    pub fn remove_component<C: Component>(&mut self, entity: EntityId) -> Result<(), EcsError> {
        let id = self.registry.lookup::<C>()?;
        let location = self.location(entity)?;
        let source_mask = self.archetypes[location.archetype as usize].mask();
        if !source_mask.contains(id) {
            return Err(EcsError::ComponentNotPresent {
                entity,
                type_name: type_name::<C>(),
            });
        }

        let target_mask = source_mask.without(id);
        let target_index = self.ensure_archetype(target_mask);
        let (source, target) =
            Self::two_archetypes(&mut self.archetypes, location.archetype, target_index);

        if target.is_full() {
            target.grow();
        }
        let source_row = location.row as usize;
        // SAFETY: the mask says the removed cell is live; every other cell
        // of the row relocates into the vacant target row, after which the
        // whole source row is vacated for `swap_remove_row`.
        unsafe {
            source.drop_cell(id, source_row);
            let new_row = target.push_row(entity);
            target.relocate_shared_row(new_row, source, source_row);
            if let Some(moved) = source.swap_remove_row(source_row) {
                self.entities.set_location(moved, location);
            }
            self.entities.set_location(
                entity,
                EntityLocation {
                    archetype: target_index,
                    row: new_row as u32,
                },
            );
        }
        Ok(())
    }

    /// Returns `true` if `entity` currently has a `C` component.
    pub fn has_component<C: Component>(&self, entity: EntityId) -> Result<bool, EcsError> {
        let id = self.registry.lookup::<C>()?;
        let location = self.location(entity)?;
        Ok(self.archetypes[location.archetype as usize].mask().contains(id))
    }

    fn component_cell<C: Component>(&self, entity: EntityId) -> Result<*mut C, EcsError> {
        let id = self.registry.lookup::<C>()?;
        let location = self.location(entity)?;
        let archetype = &self.archetypes[location.archetype as usize];
        if !archetype.mask().contains(id) {
            return Err(EcsError::ComponentNotPresent {
                entity,
                type_name: type_name::<C>(),
            });
        }
        Ok(archetype.cell_ptr(id, location.row as usize).cast::<C>())
    }

    /// Returns a reference to `entity`'s `C` component.
    pub fn get_component<C: Component>(&self, entity: EntityId) -> Result<&C, EcsError> {
        let cell = self.component_cell::<C>(entity)?;
        // SAFETY: the mask check proved the cell holds a live `C`; `&self`
        // keeps the storage alive and immutable for the borrow.
        unsafe { Ok(&*cell) }
    }

    /// Returns a mutable reference to `entity`'s `C` component.
    pub fn get_component_mut<C: Component>(&mut self, entity: EntityId) -> Result<&mut C, EcsError> {
        let cell = self.component_cell::<C>(entity)?;
        // SAFETY: as in `get_component`, plus `&mut self` for exclusivity.
        unsafe { Ok(&mut *cell) }
    }

    /// Visits every archetype whose mask is a superset of `Q`'s components,
    /// invoking `callback` once per archetype with one mutable column slice
    /// per requested component.
    ///
    /// This is an archetype-batched, SoA-friendly visitor, not a per-entity
    /// callback: the slices of one invocation are parallel (equal length,
    /// row `r` of each belongs to the same entity), and the callback loops
    /// over rows itself. Iteration order across archetypes and rows is
    /// unspecified.
    ///
    /// ```
    /// # use orrery_data::ecs::{Component, World};
    /// # #[derive(Debug, PartialEq)]
    /// # struct Position(f32);
    /// # impl Component for Position {}
    /// # #[derive(Debug, PartialEq)]
    /// # struct Velocity(f32);
    /// # impl Component for Velocity {}
    /// # let mut world = World::new();
    /// # world.register_component::<Position>().unwrap();
    /// # world.register_component::<Velocity>().unwrap();
    /// # let e = world.create_entity();
    /// # world.add_component(e, Position(0.0)).unwrap();
    /// # world.add_component(e, Velocity(1.0)).unwrap();
    /// world.for_each::<(Position, Velocity), _>(|(positions, velocities)| {
    ///     for (position, velocity) in positions.iter_mut().zip(velocities.iter()) {
    ///         position.0 += velocity.0;
    ///     }
    /// })?;
    /// # assert_eq!(world.get_component::<Position>(e).unwrap(), &Position(1.0));
    /// # Ok::<(), orrery_data::ecs::EcsError>(())
    /// ```
    pub fn for_each<'w, Q, F>(&'w mut self, mut callback: F) -> Result<(), EcsError>
    where
        Q: QueryColumns,
        F: FnMut(Q::Columns<'w>),
    {
        let query_mask = Q::mask(&self.registry)?;
        for archetype in &mut self.archetypes {
            if !archetype.mask().contains_all(query_mask) || archetype.row_count() == 0 {
                continue;
            }
            let archetype: *mut Archetype = archetype;
            // SAFETY: the superset check proved every requested column
            // exists; `Q::fetch` borrows each requested column exactly once
            // (duplicates are rejected by `Q::mask`), each visited archetype
            // is distinct, and `&'w mut self` keeps the storage exclusive
            // for the borrows.
            callback(unsafe { Q::fetch(archetype, &self.registry) });
        }
        Ok(())
    }
}

/// A set of component types that can be fetched column-wise from matching
/// archetypes.
///
/// Implemented for tuples of up to eight component types; a query for
/// `(A, B)` yields `(&mut [A], &mut [B])` per matching archetype. Listing
/// the same component twice in one tuple is a programmer error and panics.
pub trait QueryColumns {
    /// The parallel column slices handed to the callback.
    type Columns<'a>;

    /// Computes the combined component mask of the query.
    fn mask(registry: &ComponentRegistry) -> Result<ComponentMask, EcsError>;

    /// Borrows the requested columns of one archetype.
    ///
    /// # Safety
    /// `archetype` must be valid for `'a`, its mask must be a superset of
    /// [`mask`](Self::mask)'s result for the same registry, and no other
    /// borrow of the fetched columns may exist for `'a`.
    unsafe fn fetch<'a>(archetype: *mut Archetype, registry: &ComponentRegistry)
        -> Self::Columns<'a>;
}

// Implemented via a macro to cover every tuple arity with the same safety
// reasoning.
macro_rules! impl_query_columns {
    ($($component:ident),+) => {
        impl<$($component: Component),+> QueryColumns for ($($component,)+) {
            type Columns<'a> = ($(&'a mut [$component],)+);

            fn mask(registry: &ComponentRegistry) -> Result<ComponentMask, EcsError> {
                let mut mask = ComponentMask::EMPTY;
                $(
                    let id = registry.lookup::<$component>()?;
                    assert!(
                        !mask.contains(id),
                        "component '{}' listed twice in one query",
                        type_name::<$component>()
                    );
                    mask = mask.with(id);
                )+
                Ok(mask)
            }

            unsafe fn fetch<'a>(
                archetype: *mut Archetype,
                registry: &ComponentRegistry,
            ) -> Self::Columns<'a> {
                ($(
                    Archetype::column_slice_raw::<$component>(
                        archetype,
                        registry.lookup::<$component>().unwrap(),
                    ),
                )+)
            }
        }
    };
}

impl_query_columns!(C1);
impl_query_columns!(C1, C2);
impl_query_columns!(C1, C2, C3);
impl_query_columns!(C1, C2, C3, C4);
impl_query_columns!(C1, C2, C3, C4, C5);
impl_query_columns!(C1, C2, C3, C4, C5, C6);
impl_query_columns!(C1, C2, C3, C4, C5, C6, C7);
impl_query_columns!(C1, C2, C3, C4, C5, C6, C7, C8);
