// Copyright 2025 John Brosnihan
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
//! Entity handles
//!
//! Entities are unique identifiers in the ECS. They carry no data and no
//! reference to their registry; every operation takes the registry explicitly.

use crate::ecs::{Component, Registry};
use crate::error::EcsResult;
use std::fmt;

/// Handle to an entity owned by a [`Registry`]
///
/// Ids are handed out sequentially from zero and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Entity(u32);

impl Entity {
    /// Create a handle from a raw id
    pub const fn new(id: u32) -> Self {
        Entity(id)
    }

    /// Get the raw id
    pub const fn id(self) -> u32 {
        self.0
    }

    /// The id as a storage index
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Attach `component`, replacing any existing value of the same type
    pub fn add_component<T: Component>(self, registry: &mut Registry, component: T) -> EcsResult<()> {
        registry.add_component(self, component)
    }

    /// Detach the component of type `T`
    pub fn remove_component<T: Component>(self, registry: &mut Registry) -> EcsResult<()> {
        registry.remove_component::<T>(self)
    }

    /// Check whether a `T` is attached
    pub fn has_component<T: Component>(self, registry: &Registry) -> EcsResult<bool> {
        registry.has_component::<T>(self)
    }

    /// Borrow the attached `T`
    pub fn get_component<T: Component>(self, registry: &Registry) -> EcsResult<&T> {
        registry.get_component::<T>(self)
    }

    /// Mutably borrow the attached `T`
    pub fn get_component_mut<T: Component>(self, registry: &mut Registry) -> EcsResult<&mut T> {
        registry.get_component_mut::<T>(self)
    }

    /// Queue this entity for destruction at the next flush
    pub fn kill(self, registry: &mut Registry) -> EcsResult<()> {
        registry.remove_entity(self)
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Entity({})", self.0)
    }
}
