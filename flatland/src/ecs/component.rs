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
//! Component types and their ids
//!
//! Components are plain data attached to entities. Each distinct component
//! type is given a small sequential id the first time a registry sees it; the
//! id selects the signature bit and the pool that stores values of that type.

use crate::ecs::MAX_COMPONENTS;
use crate::error::{EcsError, EcsResult};
use std::any::TypeId;
use std::collections::HashMap;
use std::fmt;

/// Trait that all components must implement
///
/// Components should be plain data structures without behavior.
pub trait Component: 'static + Send + Sync {}

/// Sequential id of a component type within one registry
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ComponentId(u8);

impl ComponentId {
    /// Create a component id from its raw value
    ///
    /// # Panics
    ///
    /// Panics if `id` does not fit in a signature.
    pub const fn new(id: u8) -> Self {
        assert!((id as usize) < MAX_COMPONENTS, "component id out of range");
        ComponentId(id)
    }

    /// The id as a pool/bit index
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ComponentId({})", self.0)
    }
}

/// Registry of component type ids
///
/// Owned by a [`Registry`](crate::ecs::Registry), so independent registries
/// never share or leak ids.
#[derive(Debug, Default)]
pub struct ComponentTypes {
    ids: HashMap<TypeId, ComponentId>,
    names: Vec<&'static str>,
}

impl ComponentTypes {
    /// Create an empty type registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Id of `T`, allocating the next one on first use
    ///
    /// Fails with [`EcsError::CapacityExceeded`] once [`MAX_COMPONENTS`] types
    /// are registered. A failed call allocates nothing.
    pub fn id_of<T: Component>(&mut self) -> EcsResult<ComponentId> {
        let type_id = TypeId::of::<T>();
        if let Some(&id) = self.ids.get(&type_id) {
            return Ok(id);
        }

        let next = self.names.len();
        if next >= MAX_COMPONENTS {
            return Err(EcsError::capacity_exceeded::<T>());
        }

        let id = ComponentId::new(next as u8);
        self.ids.insert(type_id, id);
        self.names.push(std::any::type_name::<T>());
        Ok(id)
    }

    /// Id of `T` if it has been registered
    pub fn get<T: Component>(&self) -> Option<ComponentId> {
        self.ids.get(&TypeId::of::<T>()).copied()
    }

    /// Type name registered under `id`
    pub fn name(&self, id: ComponentId) -> Option<&'static str> {
        self.names.get(id.index()).copied()
    }

    /// Number of registered types
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether no type has been registered
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Marker<const N: usize>;
    impl<const N: usize> Component for Marker<N> {}

    #[test]
    fn test_ids_are_sequential_and_stable() {
        let mut types = ComponentTypes::new();
        let a = types.id_of::<Marker<0>>().unwrap();
        let b = types.id_of::<Marker<1>>().unwrap();

        assert_eq!(a.index(), 0);
        assert_eq!(b.index(), 1);
        assert_eq!(types.id_of::<Marker<0>>().unwrap(), a);
        assert_eq!(types.get::<Marker<1>>(), Some(b));
        assert_eq!(types.len(), 2);
    }

    #[test]
    fn test_lookup_does_not_allocate() {
        let types = ComponentTypes::new();
        assert_eq!(types.get::<Marker<7>>(), None);
        assert!(types.is_empty());
    }

    #[test]
    fn test_registries_do_not_share_ids() {
        let mut first = ComponentTypes::new();
        let mut second = ComponentTypes::new();
        first.id_of::<Marker<0>>().unwrap();

        assert_eq!(second.id_of::<Marker<1>>().unwrap().index(), 0);
        assert_eq!(first.id_of::<Marker<1>>().unwrap().index(), 1);
    }

    #[test]
    fn test_names() {
        let mut types = ComponentTypes::new();
        let id = types.id_of::<Marker<3>>().unwrap();
        assert!(types.name(id).unwrap().contains("Marker"));
        assert_eq!(types.name(ComponentId::new(5)), None);
    }
}
