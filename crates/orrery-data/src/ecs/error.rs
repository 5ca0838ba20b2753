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

//! Defines the error type for recoverable entity/component store failures.

use orrery_core::ecs::EntityId;
use std::fmt;

use crate::ecs::mask::MAX_COMPONENT_TYPES;

/// An error produced by entity/component store operations.
///
/// These are the recoverable outcomes of ordinary misuse: asking for a
/// component an entity does not have, using a type that was never registered,
/// or running out of registration slots. Internal invariant violations
/// (mismatched column lengths, corrupted occupancy tracking) are not
/// represented here — they panic, because they indicate a broken store
/// rather than a recoverable condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EcsError {
    /// The registry already holds [`MAX_COMPONENT_TYPES`] component types.
    RegistryFull,
    /// The component type was already registered with this world.
    AlreadyRegistered {
        /// The name of the offending component type.
        type_name: &'static str,
    },
    /// The component type was never registered with this world.
    NotRegistered {
        /// The name of the offending component type.
        type_name: &'static str,
    },
    /// The entity's archetype does not include the requested component.
    ComponentNotPresent {
        /// The entity that was queried.
        entity: EntityId,
        /// The name of the missing component type.
        type_name: &'static str,
    },
    /// The entity ID was not allocated by this world.
    EntityNotFound {
        /// The unknown entity ID.
        entity: EntityId,
    },
}

impl fmt::Display for EcsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EcsError::RegistryFull => {
                write!(
                    f,
                    "component registry is full ({MAX_COMPONENT_TYPES} types)"
                )
            }
            EcsError::AlreadyRegistered { type_name } => {
                write!(f, "component type '{type_name}' is already registered")
            }
            EcsError::NotRegistered { type_name } => {
                write!(f, "component type '{type_name}' is not registered")
            }
            EcsError::ComponentNotPresent { entity, type_name } => {
                write!(f, "{entity} has no '{type_name}' component")
            }
            EcsError::EntityNotFound { entity } => {
                write!(f, "{entity} was not created by this world")
            }
        }
    }
}

impl std::error::Error for EcsError {}
