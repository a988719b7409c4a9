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
//! The registry
//!
//! The registry is the central container for all ECS data. It owns the
//! component pools, the per-entity signatures, the systems, and the entity id
//! counter, and it mediates every entity, component, and system operation.
//!
//! Structural changes that affect system membership are deferred: entity
//! creation, component removal, and entity removal are queued and reconciled
//! against every system in [`Registry::update`], which the driver calls once
//! per frame before running systems. Systems therefore never observe an entity
//! that is only partially built.

use crate::config::RegistryConfig;
use crate::ecs::system::AnySystem;
use crate::ecs::{Component, ComponentId, ComponentTypes, Entity, ErasedPool, Pool, Signature, System};
use crate::error::{EcsError, EcsResult};
use std::any::TypeId;
use std::collections::{BTreeSet, HashMap};

/// Admission batches at least this large are matched on the rayon pool
#[cfg(feature = "parallel")]
pub const PARALLEL_MATCH_THRESHOLD: usize = 1024;

/// The main ECS container
///
/// # Examples
///
/// ```
/// use flatland::ecs::{Component, Registry};
///
/// struct Position(f32, f32);
/// impl Component for Position {}
///
/// let mut registry = Registry::new();
/// let entity = registry.create_entity();
/// registry.add_component(entity, Position(1.0, 2.0)).unwrap();
///
/// assert!(registry.has_component::<Position>(entity).unwrap());
/// assert_eq!(registry.get_component::<Position>(entity).unwrap().0, 1.0);
/// ```
pub struct Registry {
    config: RegistryConfig,
    signatures: Vec<Signature>,
    alive: Vec<bool>,
    types: ComponentTypes,
    pools: Vec<Option<Box<dyn ErasedPool>>>,
    systems: HashMap<TypeId, Box<dyn AnySystem>>,
    detached: Vec<TypeId>,
    clears: u64,
    pending_add: BTreeSet<Entity>,
    pending_check: BTreeSet<Entity>,
    pending_remove: BTreeSet<Entity>,
}

/// Counts reported by a single flush
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlushStats {
    /// Entities taken from the admission queue
    pub created: usize,
    /// Memberships added across all systems
    pub admitted: usize,
    /// Memberships dropped because a component was removed
    pub evicted: usize,
    /// Entities destroyed
    pub destroyed: usize,
}

impl Registry {
    /// Create an empty registry with default configuration
    pub fn new() -> Self {
        Self::with_config(RegistryConfig::default())
    }

    /// Create an empty registry with the given configuration
    pub fn with_config(config: RegistryConfig) -> Self {
        log::debug!("registry created ({:?})", config);
        Registry {
            signatures: Vec::with_capacity(config.entity_capacity),
            alive: Vec::with_capacity(config.entity_capacity),
            config,
            types: ComponentTypes::new(),
            pools: Vec::new(),
            systems: HashMap::new(),
            detached: Vec::new(),
            clears: 0,
            pending_add: BTreeSet::new(),
            pending_check: BTreeSet::new(),
            pending_remove: BTreeSet::new(),
        }
    }

    /// The configuration this registry was built with
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Component type ids known to this registry
    pub fn component_types(&self) -> &ComponentTypes {
        &self.types
    }

    // ----- entities -----------------------------------------------------

    /// Create a new entity
    ///
    /// The entity can receive components immediately but joins systems only
    /// at the next [`update`](Self::update).
    pub fn create_entity(&mut self) -> Entity {
        let entity = Entity::new(self.signatures.len() as u32);
        self.signatures.push(Signature::EMPTY);
        self.alive.push(true);
        self.pending_add.insert(entity);
        entity
    }

    /// Queue `entity` for destruction at the next flush
    ///
    /// The flush evicts it from every system and clears its signature. Its id
    /// is never handed out again.
    pub fn remove_entity(&mut self, entity: Entity) -> EcsResult<()> {
        self.check_alive(entity)?;
        self.pending_remove.insert(entity);
        Ok(())
    }

    /// Number of entities ever created
    pub fn entity_count(&self) -> usize {
        self.signatures.len()
    }

    /// Number of entities not yet destroyed
    pub fn alive_count(&self) -> usize {
        self.alive.iter().filter(|&&alive| alive).count()
    }

    /// Whether `entity` exists and has not been destroyed
    pub fn is_alive(&self, entity: Entity) -> bool {
        self.alive.get(entity.index()).copied().unwrap_or(false)
    }

    /// Component signature of `entity`
    pub fn signature(&self, entity: Entity) -> EcsResult<Signature> {
        self.check_exists(entity)?;
        Ok(self.signatures[entity.index()])
    }

    /// Number of entities waiting for admission
    pub fn pending_count(&self) -> usize {
        self.pending_add.len()
    }

    fn check_exists(&self, entity: Entity) -> EcsResult<()> {
        if entity.index() < self.signatures.len() {
            Ok(())
        } else {
            Err(EcsError::EntityNotFound(entity))
        }
    }

    fn check_alive(&self, entity: Entity) -> EcsResult<()> {
        self.check_exists(entity)?;
        if self.alive[entity.index()] {
            Ok(())
        } else {
            Err(EcsError::EntityNotAlive(entity))
        }
    }

    // ----- components ---------------------------------------------------

    /// Attach `component` to `entity`, replacing any previous `T`
    ///
    /// Membership is not re-evaluated: an entity that already went through a
    /// flush does not join new systems because of a later add.
    pub fn add_component<T: Component>(&mut self, entity: Entity, component: T) -> EcsResult<()> {
        self.check_alive(entity)?;
        let id = self.types.id_of::<T>()?;
        let index = entity.index();
        let min_len = self.signatures.len();

        let pool = self.pool_entry::<T>(id)?;
        if index >= pool.len() {
            pool.resize(min_len.max(index + 1));
        }
        pool.set(index, component)?;

        self.signatures[index].set(id);
        if self.config.log_component_events {
            log::trace!("{:?} <{}> added to {}", id, std::any::type_name::<T>(), entity);
        }
        Ok(())
    }

    /// Detach the `T` component from `entity`
    ///
    /// The pool slot keeps its old value until overwritten. Systems that
    /// require `T` drop the entity at the next flush. Removing a component
    /// that is not attached does nothing.
    pub fn remove_component<T: Component>(&mut self, entity: Entity) -> EcsResult<()> {
        self.check_exists(entity)?;
        let Some(id) = self.types.get::<T>() else {
            return Ok(());
        };

        let signature = &mut self.signatures[entity.index()];
        if signature.test(id) {
            signature.reset(id);
            self.pending_check.insert(entity);
            if self.config.log_component_events {
                log::trace!("{:?} <{}> removed from {}", id, std::any::type_name::<T>(), entity);
            }
        }
        Ok(())
    }

    /// Whether `entity` carries a `T`
    pub fn has_component<T: Component>(&self, entity: Entity) -> EcsResult<bool> {
        self.check_exists(entity)?;
        Ok(self
            .types
            .get::<T>()
            .is_some_and(|id| self.signatures[entity.index()].test(id)))
    }

    /// Borrow the `T` attached to `entity`
    ///
    /// Fails with [`EcsError::ComponentNotPresent`] if none is attached.
    pub fn get_component<T: Component>(&self, entity: Entity) -> EcsResult<&T> {
        let id = self.attached_id::<T>(entity)?;
        self.pool::<T>(id, entity)?.get(entity.index())
    }

    /// Mutably borrow the `T` attached to `entity`
    pub fn get_component_mut<T: Component>(&mut self, entity: Entity) -> EcsResult<&mut T> {
        let id = self.attached_id::<T>(entity)?;
        self.pool_mut::<T>(id, entity)?.get_mut(entity.index())
    }

    fn attached_id<T: Component>(&self, entity: Entity) -> EcsResult<ComponentId> {
        self.check_exists(entity)?;
        self.types
            .get::<T>()
            .filter(|&id| self.signatures[entity.index()].test(id))
            .ok_or_else(|| not_present::<T>(entity))
    }

    fn pool<T: Component>(&self, id: ComponentId, entity: Entity) -> EcsResult<&Pool<T>> {
        let erased = self
            .pools
            .get(id.index())
            .and_then(Option::as_ref)
            .ok_or_else(|| not_present::<T>(entity))?;
        let found = erased.component_name();
        erased
            .as_any()
            .downcast_ref::<Pool<T>>()
            .ok_or_else(|| mismatch::<T>(found))
    }

    fn pool_mut<T: Component>(&mut self, id: ComponentId, entity: Entity) -> EcsResult<&mut Pool<T>> {
        let erased = self
            .pools
            .get_mut(id.index())
            .and_then(Option::as_mut)
            .ok_or_else(|| not_present::<T>(entity))?;
        let found = erased.component_name();
        erased
            .as_any_mut()
            .downcast_mut::<Pool<T>>()
            .ok_or_else(|| mismatch::<T>(found))
    }

    /// Pool for `T`, created on first use
    fn pool_entry<T: Component>(&mut self, id: ComponentId) -> EcsResult<&mut Pool<T>> {
        if self.pools.len() <= id.index() {
            self.pools.resize_with(id.index() + 1, || None);
        }
        let initial = self.config.initial_pool_capacity;
        let erased = self.pools[id.index()].get_or_insert_with(|| Box::new(Pool::<T>::with_len(initial)));
        let found = erased.component_name();
        erased
            .as_any_mut()
            .downcast_mut::<Pool<T>>()
            .ok_or_else(|| mismatch::<T>(found))
    }

    // ----- systems ------------------------------------------------------

    /// Register a system built by `build`
    ///
    /// `build` receives the component type registry so the system can declare
    /// its requirements. Only one instance per system type may exist. Entities
    /// that were already admitted before the system was added are not matched
    /// against it.
    pub fn add_system<S, F>(&mut self, build: F) -> EcsResult<()>
    where
        S: System,
        F: FnOnce(&mut ComponentTypes) -> EcsResult<S>,
    {
        let key = TypeId::of::<S>();
        if self.systems.contains_key(&key) || self.detached.contains(&key) {
            return Err(EcsError::SystemAlreadyRegistered(std::any::type_name::<S>()));
        }

        let system = build(&mut self.types)?;
        log::info!(
            "system {} added, requires {:?}",
            System::name(&system),
            System::signature(&system)
        );
        self.systems.insert(key, Box::new(system));
        Ok(())
    }

    /// Unregister the system of type `S`
    pub fn remove_system<S: System>(&mut self) -> EcsResult<()> {
        match self.systems.remove(&TypeId::of::<S>()) {
            Some(system) => {
                log::info!("system {} removed", system.name());
                Ok(())
            }
            None => Err(EcsError::SystemNotFound(std::any::type_name::<S>())),
        }
    }

    /// Whether a system of type `S` is registered
    pub fn has_system<S: System>(&self) -> bool {
        self.systems.contains_key(&TypeId::of::<S>())
    }

    /// Borrow the system of type `S`
    pub fn get_system<S: System>(&self) -> EcsResult<&S> {
        self.systems
            .get(&TypeId::of::<S>())
            .and_then(|system| system.as_any().downcast_ref::<S>())
            .ok_or(EcsError::SystemNotFound(std::any::type_name::<S>()))
    }

    /// Mutably borrow the system of type `S`
    pub fn get_system_mut<S: System>(&mut self) -> EcsResult<&mut S> {
        self.systems
            .get_mut(&TypeId::of::<S>())
            .and_then(|system| system.as_any_mut().downcast_mut::<S>())
            .ok_or(EcsError::SystemNotFound(std::any::type_name::<S>()))
    }

    /// Run `f` with the system of type `S` and the registry borrowed together
    ///
    /// The system is detached from the registry for the duration of `f` and
    /// reattached afterwards, so `f` may read and write components through the
    /// registry while holding the system.
    ///
    /// While any system is detached, [`update`](Self::update) leaves its
    /// queues pending and [`add_system`](Self::add_system) rejects the
    /// detached type. A [`clear`](Self::clear) inside `f` also empties the
    /// detached system once it is reattached.
    ///
    /// # Examples
    ///
    /// ```
    /// use flatland::ecs::components::{RigidBody, Transform};
    /// use flatland::ecs::systems::MovementSystem;
    /// use flatland::ecs::Registry;
    /// use glam::Vec2;
    ///
    /// let mut registry = Registry::new();
    /// registry.add_system(MovementSystem::new).unwrap();
    ///
    /// let tank = registry.create_entity();
    /// registry.add_component(tank, Transform::at(Vec2::ZERO)).unwrap();
    /// registry.add_component(tank, RigidBody::new(Vec2::new(2.0, 0.0))).unwrap();
    /// registry.update();
    ///
    /// registry
    ///     .with_system(|movement: &mut MovementSystem, registry| movement.update(registry, 0.5))
    ///     .unwrap();
    /// let transform = registry.get_component::<Transform>(tank).unwrap();
    /// assert_eq!(transform.position, Vec2::new(1.0, 0.0));
    /// ```
    pub fn with_system<S, R, F>(&mut self, f: F) -> EcsResult<R>
    where
        S: System,
        F: FnOnce(&mut S, &mut Registry) -> EcsResult<R>,
    {
        let key = TypeId::of::<S>();
        let missing = || EcsError::SystemNotFound(std::any::type_name::<S>());
        let erased = self.systems.remove(&key).ok_or_else(missing)?;
        let mut system = erased.into_any().downcast::<S>().map_err(|_| missing())?;

        self.detached.push(key);
        let clears = self.clears;
        let result = f(&mut *system, self);
        self.detached.retain(|&detached| detached != key);
        if self.clears != clears {
            System::base_mut(&mut *system).clear_entities();
        }
        self.systems.insert(key, system);
        result
    }

    /// Number of registered systems
    pub fn system_count(&self) -> usize {
        self.systems.len()
    }

    // ----- flush --------------------------------------------------------

    /// Apply all deferred membership changes
    ///
    /// In order: newly created entities join every system whose required
    /// signature is a subset of theirs, in creation order; entities that lost
    /// a component leave the systems they no longer match; removed entities
    /// leave every system and are destroyed.
    ///
    /// Called from inside [`with_system`](Self::with_system), the flush does
    /// nothing and the queues wait for the next call.
    pub fn update(&mut self) -> FlushStats {
        let mut stats = FlushStats::default();
        if self.pending_add.is_empty() && self.pending_check.is_empty() && self.pending_remove.is_empty() {
            return stats;
        }
        if !self.detached.is_empty() {
            log::debug!("flush deferred: {} system(s) detached", self.detached.len());
            return stats;
        }

        let created: Vec<Entity> = std::mem::take(&mut self.pending_add).into_iter().collect();
        stats.created = created.len();
        if !created.is_empty() {
            for system in self.systems.values_mut() {
                let required = system.base().signature();
                for entity in matching_entities(&self.signatures, &created, required) {
                    system.base_mut().add_entity(entity);
                    stats.admitted += 1;
                }
            }
        }

        for entity in std::mem::take(&mut self.pending_check) {
            let signature = self.signatures[entity.index()];
            for system in self.systems.values_mut() {
                if !signature.contains(system.base().signature()) && system.base_mut().remove_entity(entity) {
                    stats.evicted += 1;
                }
            }
        }

        for entity in std::mem::take(&mut self.pending_remove) {
            self.destroy(entity);
            stats.destroyed += 1;
        }

        log::debug!(
            "flush: {} created, {} admitted, {} evicted, {} destroyed",
            stats.created,
            stats.admitted,
            stats.evicted,
            stats.destroyed
        );
        stats
    }

    /// Pool slots keep their values; ids are never reused so they stay
    /// unreachable.
    fn destroy(&mut self, entity: Entity) {
        let index = entity.index();
        for system in self.systems.values_mut() {
            system.base_mut().remove_entity(entity);
        }
        self.signatures[index].clear();
        self.alive[index] = false;
    }

    /// Destroy every entity immediately
    ///
    /// Systems stay registered with no members, component type ids are kept,
    /// and the id counter is not reset.
    pub fn clear(&mut self) {
        for system in self.systems.values_mut() {
            system.base_mut().clear_entities();
        }
        for pool in self.pools.iter_mut().flatten() {
            pool.clear();
        }
        self.signatures.iter_mut().for_each(Signature::clear);
        self.alive.iter_mut().for_each(|alive| *alive = false);
        self.pending_add.clear();
        self.pending_check.clear();
        self.pending_remove.clear();
        self.clears += 1;
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Registry {
    fn drop(&mut self) {
        log::debug!(
            "registry destroyed ({} entities, {} systems)",
            self.signatures.len(),
            self.systems.len()
        );
    }
}

fn not_present<T: Component>(entity: Entity) -> EcsError {
    EcsError::ComponentNotPresent {
        entity,
        component: std::any::type_name::<T>(),
    }
}

fn mismatch<T: Component>(found: &'static str) -> EcsError {
    EcsError::PoolTypeMismatch {
        expected: std::any::type_name::<T>(),
        found,
    }
}

/// Entities from `candidates` whose signature contains `required`, in order
fn matching_entities(signatures: &[Signature], candidates: &[Entity], required: Signature) -> Vec<Entity> {
    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        if candidates.len() >= PARALLEL_MATCH_THRESHOLD {
            return candidates
                .par_iter()
                .copied()
                .filter(|entity| signatures[entity.index()].contains(required))
                .collect();
        }
    }

    candidates
        .iter()
        .copied()
        .filter(|entity| signatures[entity.index()].contains(required))
        .collect()
}
