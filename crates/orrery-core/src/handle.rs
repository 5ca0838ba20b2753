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

//! Defines the generational handle used to reference pooled objects.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

/// A generational reference to a slot in an object pool.
///
/// A handle pairs a slot index with the generation the slot had when the
/// handle was issued. A pool bumps a slot's generation every time the slot is
/// freed, so every handle issued before that point becomes detectably stale:
/// dereferencing it yields "not found" instead of the unrelated object that
/// may now occupy the slot.
///
/// Handles are plain copyable values. They may be stored, compared, hashed,
/// and passed across threads freely; only dereferencing one requires access
/// to the pool that issued it. Using a handle against a *different* pool
/// instance than the one that issued it is a caller error — the bounds and
/// generation checks make it yield `None` or an arbitrary *valid* slot of
/// that pool, never memory unsafety.
///
/// The type parameter ties a handle to the element type of its pool at
/// compile time; it is phantom and does not affect the representation.
#[repr(C)]
pub struct Handle<T> {
    index: u32,
    generation: u32,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Handle<T> {
    /// The null handle: never valid for any pool.
    ///
    /// Slot 0 of every pool starts at generation 1, so `(0, 0)` is reserved
    /// to mean "no object".
    pub const NULL: Self = Self::new(0, 0);

    /// Creates a handle from an index and a generation.
    ///
    /// This is normally called only by the pool that owns the slot.
    #[inline]
    pub const fn new(index: u32, generation: u32) -> Self {
        Self {
            index,
            generation,
            _marker: PhantomData,
        }
    }

    /// Returns the slot index this handle points at.
    #[inline]
    pub const fn index(self) -> u32 {
        self.index
    }

    /// Returns the generation the slot had when this handle was issued.
    #[inline]
    pub const fn generation(self) -> u32 {
        self.generation
    }

    /// Returns `true` if this is the null handle.
    #[inline]
    pub const fn is_null(self) -> bool {
        self.index == 0 && self.generation == 0
    }
}

// The derives would bound `T`, but a handle is a plain value regardless of
// what it points at.
impl<T> Clone for Handle<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Handle<T> {}

impl<T> PartialEq for Handle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index && self.generation == other.generation
    }
}

impl<T> Eq for Handle<T> {}

impl<T> Hash for Handle<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.index.hash(state);
        self.generation.hash(state);
    }
}

impl<T> Default for Handle<T> {
    fn default() -> Self {
        Self::NULL
    }
}

impl<T> fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handle")
            .field("index", &self.index)
            .field("generation", &self.generation)
            .finish()
    }
}

impl<T> fmt::Display for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            write!(f, "Handle(null)")
        } else {
            write!(f, "Handle({}v{})", self.index, self.generation)
        }
    }
}
