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

//! Defines core types related to entities in the ECS architecture.

use std::fmt;

/// A unique identifier for an entity in the world.
///
/// Entity IDs are allocated from a monotonically increasing counter and are
/// never reused within a run. An entity has no explicit destroy operation in
/// this core; removing its last component parks it in the empty archetype.
/// Because IDs are never recycled, a plain integer is sufficient to identify
/// an entity for the lifetime of the process — the generational machinery
/// that guards against stale references lives in [`Handle`](crate::Handle)
/// and the pools that issue them.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    bytemuck::Pod,
    bytemuck::Zeroable,
)]
#[repr(transparent)]
pub struct EntityId(u64);

impl EntityId {
    /// Reconstructs an `EntityId` from its raw integer value.
    ///
    /// This is intended for the storage layer that allocates IDs; fabricating
    /// an ID that was never returned by a world results in an
    /// "entity not found" error on use, never in aliasing another entity.
    #[inline]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw integer value of this ID.
    #[inline]
    pub const fn to_raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntityId({})", self.0)
    }
}
