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

//! Component bit indices and the fixed-width mask keying archetypes.

use std::fmt;

/// Maximum number of distinct component types a world can register.
///
/// A component mask is a single `u64`, one bit per registered type.
/// Registration past this limit fails with
/// [`EcsError::RegistryFull`](crate::ecs::EcsError::RegistryFull).
pub const MAX_COMPONENT_TYPES: usize = u64::BITS as usize;

/// The bit index assigned to a component type at registration.
///
/// Indices are handed out in registration order, starting at 0, and identify
/// the component's bit in every [`ComponentMask`] for the lifetime of the
/// world that issued them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ComponentTypeId(u32);

impl ComponentTypeId {
    #[inline]
    pub(crate) const fn new(index: u32) -> Self {
        debug_assert!(index < MAX_COMPONENT_TYPES as u32);
        Self(index)
    }

    /// Returns the bit index of this component type.
    #[inline]
    pub const fn index(self) -> u32 {
        self.0
    }

    #[inline]
    const fn bit(self) -> u64 {
        1 << self.0
    }
}

impl fmt::Display for ComponentTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ComponentTypeId({})", self.0)
    }
}

/// The set of component types present on an entity (or archetype).
///
/// Bit `i` is set iff the component type registered at index `i` is present.
/// Masks are the key of the archetype table: exactly one archetype exists per
/// distinct mask a world has ever observed, and `add`/`remove` component
/// operations are transitions between masks.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    bytemuck::Pod,
    bytemuck::Zeroable,
)]
#[repr(transparent)]
pub struct ComponentMask(u64);

impl ComponentMask {
    /// The mask with no components: the key of the canonical empty archetype.
    pub const EMPTY: Self = Self(0);

    /// Returns `true` if no bit is set.
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Returns the number of set bits (the archetype's column count).
    #[inline]
    pub const fn count(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Returns this mask with the given component's bit set.
    #[inline]
    pub const fn with(self, id: ComponentTypeId) -> Self {
        Self(self.0 | id.bit())
    }

    /// Returns this mask with the given component's bit cleared.
    #[inline]
    pub const fn without(self, id: ComponentTypeId) -> Self {
        Self(self.0 & !id.bit())
    }

    /// Returns `true` if the given component's bit is set.
    #[inline]
    pub const fn contains(self, id: ComponentTypeId) -> bool {
        self.0 & id.bit() != 0
    }

    /// Returns `true` if every bit of `other` is also set in `self`.
    ///
    /// This is the archetype-matching test of queries: an archetype matches
    /// when its mask is a superset of the requested components.
    #[inline]
    pub const fn contains_all(self, other: ComponentMask) -> bool {
        self.0 & other.0 == other.0
    }

    /// Returns the column index of a component within an archetype keyed by
    /// this mask: the number of set bits at lower indices.
    ///
    /// Columns are stored in ascending bit-index order, so the position of a
    /// component's column is the popcount of the mask below its bit.
    #[inline]
    pub const fn column_position(self, id: ComponentTypeId) -> usize {
        (self.0 & (id.bit() - 1)).count_ones() as usize
    }

    /// Iterates over the set bits in ascending index order.
    pub fn iter(self) -> impl Iterator<Item = ComponentTypeId> {
        let mut remaining = self.0;
        std::iter::from_fn(move || {
            if remaining == 0 {
                return None;
            }
            let index = remaining.trailing_zeros();
            remaining &= remaining - 1;
            Some(ComponentTypeId::new(index))
        })
    }
}

impl fmt::Display for ComponentMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ComponentMask({:#018x})", self.0)
    }
}
