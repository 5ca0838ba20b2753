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

//! Columnar (structure-of-arrays) storage for one component combination.

use orrery_core::ecs::EntityId;

use crate::ecs::column::Column;
use crate::ecs::component::Component;
use crate::ecs::mask::{ComponentMask, ComponentTypeId};
use crate::ecs::registry::ComponentRegistry;

/// The storage for every entity sharing one exact component combination.
///
/// An archetype owns one [`Column`] per set bit of its mask, ordered by
/// ascending bit index, plus a parallel list of the entity IDs owning each
/// row. All columns share a single `capacity` and always have equal length;
/// the entity at `entities[r]` owns the components at row `r` of every
/// column.
///
/// The canonical empty archetype (the one keyed by
/// [`ComponentMask::EMPTY`]) owns no columns and has unlimited capacity —
/// entities without components live there.
pub struct Archetype {
    mask: ComponentMask,
    /// Columns in ascending bit-index order of `mask`.
    columns: Vec<Column>,
    /// Owner of each row; `entities.len()` is the live row count.
    entities: Vec<EntityId>,
    capacity: usize,
}

impl Archetype {
    /// Creates the archetype for `mask` with columns sized to `capacity`.
    pub(crate) fn new(mask: ComponentMask, registry: &ComponentRegistry, capacity: usize) -> Self {
        let columns: Vec<Column> = mask
            .iter()
            .map(|id| Column::new(registry.info(id), capacity))
            .collect();
        Self {
            mask,
            columns,
            entities: Vec::new(),
            capacity: if mask.is_empty() { 0 } else { capacity },
        }
    }

    /// Returns the component mask keying this archetype.
    #[inline]
    pub fn mask(&self) -> ComponentMask {
        self.mask
    }

    /// Returns the number of live rows.
    #[inline]
    pub fn row_count(&self) -> usize {
        self.entities.len()
    }

    /// Returns the shared cell capacity of the columns.
    ///
    /// The empty archetype stores no component data and reports 0.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the entity IDs owning each row.
    #[inline]
    pub fn entities(&self) -> &[EntityId] {
        &self.entities
    }

    /// Returns `true` if appending a row would first require growth.
    ///
    /// The empty archetype is never full: with no columns to size, its only
    /// storage is the entity list itself.
    pub(crate) fn is_full(&self) -> bool {
        !self.columns.is_empty() && self.entities.len() == self.capacity
    }

    /// Doubles the capacity of every column together, relocating all live
    /// rows.
    pub(crate) fn grow(&mut self) {
        debug_assert!(!self.columns.is_empty(), "the empty archetype never grows");
        let new_capacity = (self.capacity * 2).max(1);
        log::trace!(
            "growing archetype {} columns from {} to {} rows",
            self.mask,
            self.capacity,
            new_capacity
        );
        let live = self.entities.len();
        for column in &mut self.columns {
            column.grow(new_capacity, live);
        }
        self.capacity = new_capacity;
    }

    /// Appends a row owned by `entity` and returns its index.
    ///
    /// The row's component cells are left vacant; the caller writes them
    /// before the store hands out any reference to the row.
    pub(crate) fn push_row(&mut self, entity: EntityId) -> usize {
        assert!(!self.is_full(), "archetype row appended without capacity");
        let row = self.entities.len();
        self.entities.push(entity);
        row
    }

    /// Returns a raw pointer to the cell of component `id` at `row`.
    ///
    /// The component must be part of this archetype's mask; callers surface
    /// absence as an error before reaching the storage layer.
    #[inline]
    pub(crate) fn cell_ptr(&self, id: ComponentTypeId, row: usize) -> *mut u8 {
        debug_assert!(self.mask.contains(id));
        self.columns[self.mask.column_position(id)].cell_ptr(row)
    }

    /// Destroys the value of component `id` at `row`.
    ///
    /// # Safety
    /// The cell must hold a live value; afterwards it is vacant.
    pub(crate) unsafe fn drop_cell(&mut self, id: ComponentTypeId, row: usize) {
        debug_assert!(self.mask.contains(id));
        let position = self.mask.column_position(id);
        self.columns[position].drop_cell(row);
    }

    /// Relocates every cell of `src`'s row `src_row` that is also present in
    /// this archetype's mask into row `dst_row` here.
    ///
    /// Column order is the ascending bit order of each mask, so shared
    /// components pair up by bit index even though their column positions
    /// differ between the two archetypes.
    ///
    /// # Safety
    /// `src_row` must be live in `src` and `dst_row`'s shared cells must be
    /// vacant here; afterwards ownership of the copied cells has moved and
    /// `src_row`'s copies must be treated as vacant.
    pub(crate) unsafe fn relocate_shared_row(
        &mut self,
        dst_row: usize,
        src: &Archetype,
        src_row: usize,
    ) {
        for id in src.mask.iter() {
            if !self.mask.contains(id) {
                continue;
            }
            let dst_position = self.mask.column_position(id);
            let src_position = src.mask.column_position(id);
            self.columns[dst_position].copy_cell_from(
                dst_row,
                &src.columns[src_position],
                src_row,
            );
        }
    }

    /// Removes `row` by overwriting it with the last live row and shrinking
    /// the row count, avoiding a full shift.
    ///
    /// Returns the ID of the entity whose row moved into `row`, so the
    /// caller can fix that entity's location entry — or `None` if `row` was
    /// already the last.
    ///
    /// # Safety
    /// `row`'s component cells must already be vacant (relocated away or
    /// destroyed); the last row's cells must be live.
    pub(crate) unsafe fn swap_remove_row(&mut self, row: usize) -> Option<EntityId> {
        let last = self.entities.len() - 1;
        let moved = if row != last {
            for column in &mut self.columns {
                column.copy_cell_within(last, row);
            }
            self.entities[row] = self.entities[last];
            Some(self.entities[row])
        } else {
            None
        };
        self.entities.pop();
        moved
    }

    /// Borrows the column of component `id` as a typed mutable slice,
    /// through a raw archetype pointer.
    ///
    /// Shaped this way so that a query can hand out slices of *different*
    /// columns of one archetype simultaneously; the lifetime is the
    /// caller's assertion.
    ///
    /// # Safety
    /// The caller must ensure `archetype` is valid for `'a`, that `C` is the
    /// component registered at `id`, that the archetype's mask contains
    /// `id`, and that no other borrow of this column exists for `'a`.
    pub(crate) unsafe fn column_slice_raw<'a, C: Component>(
        archetype: *mut Archetype,
        id: ComponentTypeId,
    ) -> &'a mut [C] {
        let mask = (*archetype).mask;
        debug_assert!(mask.contains(id));
        let position = mask.column_position(id);
        let len = (*archetype).entities.len();
        let ptr = (&(*archetype).columns)[position].cell_ptr(0).cast::<C>();
        std::slice::from_raw_parts_mut(ptr, len)
    }
}

impl Drop for Archetype {
    fn drop(&mut self) {
        let live = self.entities.len();
        for column in &mut self.columns {
            // SAFETY: the first `live` cells of every column are live by the
            // archetype invariant; the columns free their allocations after.
            unsafe { column.drop_cells(live) };
        }
    }
}
