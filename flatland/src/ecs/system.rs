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
//! System membership
//!
//! Systems contain the logic that operates on entities and components. The
//! core only tracks, per system, which component types it requires and which
//! entities currently qualify; each concrete system defines its own `update`
//! with whatever external resources it needs.

use crate::ecs::{Component, ComponentTypes, Entity, Signature};
use crate::error::EcsResult;
use std::any::Any;

/// Required signature and current members of one system
#[derive(Debug, Clone, Default)]
pub struct SystemBase {
    signature: Signature,
    entities: Vec<Entity>,
}

impl SystemBase {
    /// Create a base with no requirements and no members
    pub fn new() -> Self {
        Self::default()
    }

    /// Require component `T` for membership
    ///
    /// Call while constructing the system, before it is added to a registry.
    pub fn require_component<T: Component>(&mut self, types: &mut ComponentTypes) -> EcsResult<()> {
        let id = types.id_of::<T>()?;
        self.signature.set(id);
        Ok(())
    }

    /// Builder form of [`require_component`](Self::require_component)
    pub fn with_component<T: Component>(mut self, types: &mut ComponentTypes) -> EcsResult<Self> {
        self.require_component::<T>(types)?;
        Ok(self)
    }

    /// Admit `entity`; already admitted entities are ignored
    pub(crate) fn add_entity(&mut self, entity: Entity) {
        if !self.entities.contains(&entity) {
            self.entities.push(entity);
        }
    }

    /// Evict `entity`, returning whether it was a member
    pub(crate) fn remove_entity(&mut self, entity: Entity) -> bool {
        match self.entities.iter().position(|&e| e == entity) {
            Some(index) => {
                self.entities.remove(index);
                true
            }
            None => false,
        }
    }

    pub(crate) fn clear_entities(&mut self) {
        self.entities.clear();
    }

    /// Current members in admission order
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    /// Component types required for membership
    pub fn signature(&self) -> Signature {
        self.signature
    }

    /// Whether `entity` is a member
    pub fn contains(&self, entity: Entity) -> bool {
        self.entities.contains(&entity)
    }
}

/// Trait for systems managed by a [`Registry`](crate::ecs::Registry)
///
/// # Examples
///
/// ```
/// use flatland::ecs::{Component, ComponentTypes, Registry, System, SystemBase};
/// use flatland::EcsResult;
///
/// struct Health(u32);
/// impl Component for Health {}
///
/// struct RegenSystem {
///     base: SystemBase,
/// }
///
/// impl RegenSystem {
///     fn new(types: &mut ComponentTypes) -> EcsResult<Self> {
///         let base = SystemBase::new().with_component::<Health>(types)?;
///         Ok(RegenSystem { base })
///     }
/// }
///
/// impl System for RegenSystem {
///     fn base(&self) -> &SystemBase { &self.base }
///     fn base_mut(&mut self) -> &mut SystemBase { &mut self.base }
/// }
///
/// let mut registry = Registry::new();
/// registry.add_system(RegenSystem::new).unwrap();
/// assert!(registry.has_system::<RegenSystem>());
/// ```
pub trait System: Send + Sync + 'static {
    /// Shared membership state
    fn base(&self) -> &SystemBase;

    /// Mutable membership state
    fn base_mut(&mut self) -> &mut SystemBase;

    /// Get the name of this system for debugging
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Current members in admission order
    fn entities(&self) -> &[Entity] {
        self.base().entities()
    }

    /// Component types required for membership
    fn signature(&self) -> Signature {
        self.base().signature()
    }

    /// Whether `entity` is currently a member
    fn contains(&self, entity: Entity) -> bool {
        self.base().contains(entity)
    }
}

/// Object-safe view of a boxed system, with downcasting
pub(crate) trait AnySystem: Send + Sync {
    fn base(&self) -> &SystemBase;
    fn base_mut(&mut self) -> &mut SystemBase;
    fn name(&self) -> &str;
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
    fn into_any(self: Box<Self>) -> Box<dyn Any>;
}

impl<S: System> AnySystem for S {
    fn base(&self) -> &SystemBase {
        System::base(self)
    }

    fn base_mut(&mut self) -> &mut SystemBase {
        System::base_mut(self)
    }

    fn name(&self) -> &str {
        System::name(self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Position;
    impl Component for Position {}
    struct Velocity;
    impl Component for Velocity {}

    struct TestSystem {
        base: SystemBase,
    }

    impl System for TestSystem {
        fn base(&self) -> &SystemBase {
            &self.base
        }

        fn base_mut(&mut self) -> &mut SystemBase {
            &mut self.base
        }

        fn name(&self) -> &str {
            "TestSystem"
        }
    }

    #[test]
    fn test_require_component_sets_bits() {
        let mut types = ComponentTypes::new();
        let base = SystemBase::new()
            .with_component::<Position>(&mut types)
            .unwrap()
            .with_component::<Velocity>(&mut types)
            .unwrap();

        let sig = base.signature();
        assert_eq!(sig.len(), 2);
        assert!(sig.test(types.get::<Position>().unwrap()));
        assert!(sig.test(types.get::<Velocity>().unwrap()));
    }

    #[test]
    fn test_membership() {
        let mut base = SystemBase::new();
        let (a, b) = (Entity::new(0), Entity::new(1));

        base.add_entity(a);
        base.add_entity(b);
        base.add_entity(a);
        assert_eq!(base.entities(), &[a, b]);

        assert!(base.remove_entity(a));
        assert!(!base.remove_entity(a));
        assert!(!base.contains(a));
        assert!(base.contains(b));
    }

    #[test]
    fn test_erased_downcast() {
        let boxed: Box<dyn AnySystem> = Box::new(TestSystem {
            base: SystemBase::new(),
        });
        assert_eq!(boxed.name(), "TestSystem");
        assert!(boxed.as_any().downcast_ref::<TestSystem>().is_some());
        assert!(boxed.into_any().downcast::<TestSystem>().is_ok());
    }
}
