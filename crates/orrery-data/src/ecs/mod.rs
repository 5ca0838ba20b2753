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

//! The archetype-based entity/component store.
//!
//! Entities are plain IDs; their component data lives in archetypes — one
//! per distinct component combination — as columnar (structure-of-arrays)
//! storage. Adding or removing a component migrates an entity's row between
//! archetypes with swap-remove compaction, so component access and queries
//! stay dense and branch-free:
//!
//! * [`World`] is the central container and the only public entry point.
//! * [`ComponentMask`] keys the archetype table; bit *i* stands for the
//!   component type registered at index *i*.
//! * [`DynamicBitset`] is the dense bit-vector primitive shared with the
//!   pool allocator.
//!
//! Everything is single-threaded and synchronous; worlds are independent
//! values with no global state.

mod archetype;
mod bitset;
mod column;
mod component;
mod entity_store;
mod error;
mod mask;
mod registry;
mod world;

pub use archetype::Archetype;
pub use bitset::DynamicBitset;
pub use component::Component;
pub use error::EcsError;
pub use mask::{ComponentMask, ComponentTypeId, MAX_COMPONENT_TYPES};
pub use orrery_core::ecs::EntityId;
pub use registry::ComponentRegistry;
pub use world::{QueryColumns, World};

#[cfg(test)]
mod tests;
