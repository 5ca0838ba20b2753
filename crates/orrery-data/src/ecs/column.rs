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

//! A type-erased, byte-addressed component column.

use std::alloc::{self, Layout};
use std::ptr::NonNull;

use crate::ecs::registry::ComponentInfo;

/// One column of an archetype: `capacity` contiguous cells of a single
/// component type, addressed as raw bytes.
///
/// A column knows its element layout and how to destroy a cell, but nothing
/// about which rows are live — the owning archetype tracks that and is
/// responsible for dropping live cells before the column is dropped.
/// Relocation (growth, swap-remove, cross-archetype migration) is always a
/// plain byte copy; the drop capability is only invoked when a value's
/// lifetime actually ends.
pub(crate) struct Column {
    data: NonNull<u8>,
    capacity: usize,
    size: usize,
    align: usize,
    drop_fn: Option<unsafe fn(*mut u8)>,
}

// SAFETY: a column only ever stores values of registered component types,
// which are `Send + Sync` by the `Component` trait bounds.
unsafe impl Send for Column {}
unsafe impl Sync for Column {}

impl Column {
    /// Allocates a column of `capacity` cells for the given component type.
    pub(crate) fn new(info: &ComponentInfo, capacity: usize) -> Self {
        let mut column = Self {
            data: Self::dangling(info.align),
            capacity: 0,
            size: info.size,
            align: info.align,
            drop_fn: info.drop_fn,
        };
        if capacity > 0 {
            column.data = Self::allocate(info.size, info.align, capacity);
            column.capacity = capacity;
        }
        column
    }

    /// A well-aligned placeholder pointer for empty or zero-sized storage.
    fn dangling(align: usize) -> NonNull<u8> {
        // SAFETY: alignments are non-zero powers of two, so this is non-null.
        unsafe { NonNull::new_unchecked(align as *mut u8) }
    }

    fn layout(size: usize, align: usize, capacity: usize) -> Layout {
        // The registry derived size and align from a real Rust type, so the
        // only way this fails is an internal accounting bug.
        Layout::from_size_align(size * capacity, align)
            .expect("component column layout overflowed")
    }

    fn allocate(size: usize, align: usize, capacity: usize) -> NonNull<u8> {
        let layout = Self::layout(size, align, capacity);
        if layout.size() == 0 {
            return Self::dangling(align);
        }
        // SAFETY: layout has non-zero size.
        let ptr = unsafe { alloc::alloc(layout) };
        match NonNull::new(ptr) {
            Some(ptr) => ptr,
            None => alloc::handle_alloc_error(layout),
        }
    }

    fn deallocate(&mut self) {
        let layout = Self::layout(self.size, self.align, self.capacity);
        if layout.size() != 0 {
            // SAFETY: `data` was allocated with exactly this layout.
            unsafe { alloc::dealloc(self.data.as_ptr(), layout) };
        }
    }

    /// Grows the column to `new_capacity` cells, relocating the first
    /// `live_rows` cells into the new allocation.
    ///
    /// Relocation is a bulk byte copy: Rust values move bitwise, so this is
    /// correct for every component type, droppable or not.
    pub(crate) fn grow(&mut self, new_capacity: usize, live_rows: usize) {
        debug_assert!(new_capacity > self.capacity);
        debug_assert!(live_rows <= self.capacity);
        let new_data = Self::allocate(self.size, self.align, new_capacity);
        if self.size != 0 && live_rows != 0 {
            // SAFETY: both allocations hold at least `live_rows` cells and
            // cannot overlap.
            unsafe {
                std::ptr::copy_nonoverlapping(
                    self.data.as_ptr(),
                    new_data.as_ptr(),
                    live_rows * self.size,
                );
            }
        }
        self.deallocate();
        self.data = new_data;
        self.capacity = new_capacity;
    }

    /// Returns a raw pointer to the cell at `row`.
    ///
    /// The pointer is valid for `size` bytes. Whether the cell holds a live
    /// value is the caller's knowledge, not the column's.
    #[inline]
    pub(crate) fn cell_ptr(&self, row: usize) -> *mut u8 {
        debug_assert!(row < self.capacity || self.size == 0);
        // SAFETY: `row` is within the allocation (or the type is zero-sized
        // and the pointer is never dereferenced for more than 0 bytes).
        unsafe { self.data.as_ptr().add(row * self.size) }
    }

    /// Copies the cell at `src_row` of `src` into the cell at `dst_row`.
    ///
    /// # Safety
    /// `src`'s cell must hold a live value and `dst_row`'s cell must be
    /// vacant; afterwards ownership of the value has transferred to `self`
    /// and `src`'s cell must be treated as vacant. Both columns must store
    /// the same component type.
    pub(crate) unsafe fn copy_cell_from(&mut self, dst_row: usize, src: &Column, src_row: usize) {
        debug_assert_eq!(self.size, src.size);
        if self.size != 0 {
            std::ptr::copy_nonoverlapping(src.cell_ptr(src_row), self.cell_ptr(dst_row), self.size);
        }
    }

    /// Copies the cell at `from_row` into the cell at `to_row` within this
    /// column (the swap-remove relocation).
    ///
    /// # Safety
    /// `from_row` must hold a live value, `to_row` must be vacant, and the
    /// rows must differ. Afterwards `from_row` must be treated as vacant.
    pub(crate) unsafe fn copy_cell_within(&mut self, from_row: usize, to_row: usize) {
        debug_assert_ne!(from_row, to_row);
        if self.size != 0 {
            std::ptr::copy_nonoverlapping(
                self.cell_ptr(from_row),
                self.cell_ptr(to_row),
                self.size,
            );
        }
    }

    /// Destroys the value in the cell at `row`, if the component type has a
    /// destructor.
    ///
    /// # Safety
    /// The cell must hold a live value; afterwards it must be treated as
    /// vacant.
    pub(crate) unsafe fn drop_cell(&mut self, row: usize) {
        if let Some(drop_fn) = self.drop_fn {
            drop_fn(self.cell_ptr(row));
        }
    }

    /// Destroys the values in the first `live_rows` cells.
    ///
    /// # Safety
    /// All of the first `live_rows` cells must hold live values; afterwards
    /// they must be treated as vacant.
    pub(crate) unsafe fn drop_cells(&mut self, live_rows: usize) {
        if let Some(drop_fn) = self.drop_fn {
            for row in 0..live_rows {
                drop_fn(self.cell_ptr(row));
            }
        }
    }
}

impl Drop for Column {
    fn drop(&mut self) {
        // Live cells were destroyed by the owning archetype; only the
        // allocation itself remains.
        self.deallocate();
    }
}
