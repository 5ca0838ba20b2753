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

//! Component type registration and the per-type storage capabilities.

use std::any::{type_name, TypeId};
use std::collections::HashMap;

use crate::ecs::component::Component;
use crate::ecs::error::EcsError;
use crate::ecs::mask::{ComponentTypeId, MAX_COMPONENT_TYPES};

/// Everything the type-erased storage layer needs to know about a component
/// type: its memory layout and how to destroy a value in place.
///
/// Relocation needs no capability of its own — a Rust value moves by bitwise
/// copy, so columns relocate rows with `memcpy` for every type. `drop_fn` is
/// `None` for types with nothing to drop, which lets removal skip the call
/// entirely.
pub(crate) struct ComponentInfo {
    pub(crate) type_name: &'static str,
    pub(crate) size: usize,
    pub(crate) align: usize,
    pub(crate) drop_fn: Option<unsafe fn(*mut u8)>,
}

/// Drops the value of type `C` stored at `ptr`.
///
/// # Safety
/// `ptr` must point at a live, properly aligned value of type `C`.
unsafe fn drop_erased<C>(ptr: *mut u8) {
    std::ptr::drop_in_place(ptr.cast::<C>());
}

/// The registry mapping component types to their bit indices and storage
/// capabilities.
///
/// This is the single source of truth for what a bit in a
/// [`ComponentMask`](crate::ecs::ComponentMask) means. Bit indices are handed
/// out in registration order; a type must be registered exactly once, before
/// any entity uses it.
#[derive(Default)]
pub struct ComponentRegistry {
    infos: Vec<ComponentInfo>,
    by_type: HashMap<TypeId, ComponentTypeId>,
}

impl ComponentRegistry {
    /// Creates an empty registry.
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Registers `C` and assigns it the next free bit index.
    ///
    /// Fails with [`EcsError::RegistryFull`] once all
    /// [`MAX_COMPONENT_TYPES`] bits are taken, and with
    /// [`EcsError::AlreadyRegistered`] on a duplicate registration.
    pub(crate) fn register<C: Component>(&mut self) -> Result<ComponentTypeId, EcsError> {
        let type_id = TypeId::of::<C>();
        if self.by_type.contains_key(&type_id) {
            return Err(EcsError::AlreadyRegistered {
                type_name: type_name::<C>(),
            });
        }
        if self.infos.len() == MAX_COMPONENT_TYPES {
            return Err(EcsError::RegistryFull);
        }
        let id = ComponentTypeId::new(self.infos.len() as u32);
        let info = ComponentInfo {
            type_name: type_name::<C>(),
            size: std::mem::size_of::<C>(),
            align: std::mem::align_of::<C>(),
            drop_fn: std::mem::needs_drop::<C>().then_some(drop_erased::<C> as unsafe fn(*mut u8)),
        };
        log::debug!(
            "registered component '{}' at bit index {}",
            info.type_name,
            id.index()
        );
        self.infos.push(info);
        self.by_type.insert(type_id, id);
        Ok(id)
    }

    /// Returns the bit index assigned to `C`, or
    /// [`EcsError::NotRegistered`] if it was never registered.
    pub(crate) fn lookup<C: Component>(&self) -> Result<ComponentTypeId, EcsError> {
        self.by_type
            .get(&TypeId::of::<C>())
            .copied()
            .ok_or(EcsError::NotRegistered {
                type_name: type_name::<C>(),
            })
    }

    /// Returns `true` if `C` has been registered.
    pub(crate) fn is_registered<C: Component>(&self) -> bool {
        self.by_type.contains_key(&TypeId::of::<C>())
    }

    /// Returns the storage capabilities recorded for a bit index.
    pub(crate) fn info(&self, id: ComponentTypeId) -> &ComponentInfo {
        &self.infos[id.index() as usize]
    }

    /// Returns the number of registered component types.
    pub(crate) fn len(&self) -> usize {
        self.infos.len()
    }
}
