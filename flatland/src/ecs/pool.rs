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
//! Per-type component pools
//!
//! A [`Pool`] stores every value of one component type in a dense vector
//! indexed directly by entity id. Pools grow to fit new ids and never shrink.
//! The registry keeps them behind [`ErasedPool`], which exposes only the
//! lifecycle operations that do not need the concrete type.

use crate::ecs::Component;
use crate::error::{EcsError, EcsResult};
use std::any::Any;

/// Type-erased pool interface used by the registry
pub trait ErasedPool: Send + Sync {
    /// Drop every stored value and release the slots
    fn clear(&mut self);

    /// Grow to at least `len` slots
    fn resize(&mut self, len: usize);

    /// Number of slots
    fn len(&self) -> usize;

    /// Whether the pool has no slots
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Name of the stored component type
    fn component_name(&self) -> &'static str;

    /// Upcast for typed access
    fn as_any(&self) -> &dyn Any;

    /// Upcast for typed mutable access
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Dense storage for one component type, indexed by entity id
#[derive(Debug, Clone)]
pub struct Pool<T: Component> {
    slots: Vec<Option<T>>,
}

impl<T: Component> Pool<T> {
    /// Create an empty pool
    pub fn new() -> Self {
        Pool { slots: Vec::new() }
    }

    /// Create a pool with `len` empty slots
    pub fn with_len(len: usize) -> Self {
        let mut pool = Self::new();
        pool.resize(len);
        pool
    }

    /// Number of slots
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether the pool has no slots
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Grow to hold at least `len` slots
    ///
    /// Existing values are preserved. A smaller `len` is ignored.
    pub fn resize(&mut self, len: usize) {
        if len > self.slots.len() {
            self.slots.resize_with(len, || None);
        }
    }

    /// Store `value` at `index`, replacing any previous value
    pub fn set(&mut self, index: usize, value: T) -> EcsResult<()> {
        let len = self.slots.len();
        let slot = self
            .slots
            .get_mut(index)
            .ok_or(EcsError::IndexOutOfRange { index, len })?;
        *slot = Some(value);
        Ok(())
    }

    /// Get the value at `index`
    pub fn get(&self, index: usize) -> EcsResult<&T> {
        match self.slots.get(index) {
            Some(Some(value)) => Ok(value),
            Some(None) => Err(EcsError::EmptySlot { index }),
            None => Err(EcsError::IndexOutOfRange {
                index,
                len: self.slots.len(),
            }),
        }
    }

    /// Get a mutable reference to the value at `index`
    pub fn get_mut(&mut self, index: usize) -> EcsResult<&mut T> {
        let len = self.slots.len();
        match self.slots.get_mut(index) {
            Some(Some(value)) => Ok(value),
            Some(None) => Err(EcsError::EmptySlot { index }),
            None => Err(EcsError::IndexOutOfRange { index, len }),
        }
    }

    /// Drop the value at `index`, returning it
    pub fn take(&mut self, index: usize) -> Option<T> {
        self.slots.get_mut(index).and_then(Option::take)
    }

    /// Number of occupied slots
    pub fn occupied(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }
}

impl<T: Component> Default for Pool<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Component> ErasedPool for Pool<T> {
    fn clear(&mut self) {
        self.slots.clear();
    }

    fn resize(&mut self, len: usize) {
        Pool::resize(self, len);
    }

    fn len(&self) -> usize {
        self.slots.len()
    }

    fn component_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq)]
    struct TestComponent {
        x: f32,
        y: f32,
    }

    impl Component for TestComponent {}

    #[test]
    fn test_pool_set_and_get() {
        let mut pool = Pool::<TestComponent>::with_len(4);
        assert_eq!(pool.len(), 4);
        assert_eq!(pool.occupied(), 0);

        pool.set(2, TestComponent { x: 10.0, y: 20.0 }).unwrap();
        assert_eq!(pool.get(2).unwrap().x, 10.0);

        pool.get_mut(2).unwrap().y = 99.0;
        assert_eq!(pool.get(2).unwrap().y, 99.0);
    }

    #[test]
    fn test_pool_overwrite() {
        let mut pool = Pool::<TestComponent>::with_len(1);
        pool.set(0, TestComponent { x: 1.0, y: 2.0 }).unwrap();
        pool.set(0, TestComponent { x: 3.0, y: 4.0 }).unwrap();
        assert_eq!(*pool.get(0).unwrap(), TestComponent { x: 3.0, y: 4.0 });
        assert_eq!(pool.occupied(), 1);
    }

    #[test]
    fn test_pool_bounds() {
        let mut pool = Pool::<TestComponent>::with_len(2);
        assert_eq!(
            pool.set(2, TestComponent { x: 0.0, y: 0.0 }),
            Err(EcsError::IndexOutOfRange { index: 2, len: 2 })
        );
        assert_eq!(
            pool.get(5).unwrap_err(),
            EcsError::IndexOutOfRange { index: 5, len: 2 }
        );
        assert_eq!(pool.get(1).unwrap_err(), EcsError::EmptySlot { index: 1 });
    }

    #[test]
    fn test_pool_growth_preserves_values() {
        let mut pool = Pool::<TestComponent>::with_len(10);
        for i in 0..10 {
            pool.set(i, TestComponent { x: i as f32, y: 0.0 }).unwrap();
        }

        pool.resize(1000);
        assert_eq!(pool.len(), 1000);
        for i in 0..10 {
            assert_eq!(pool.get(i).unwrap().x, i as f32);
        }

        pool.resize(5);
        assert_eq!(pool.len(), 1000);
    }

    #[test]
    fn test_erased_lifecycle() {
        let mut pool = Pool::<TestComponent>::with_len(3);
        pool.set(1, TestComponent { x: 1.0, y: 1.0 }).unwrap();

        let erased: &mut dyn ErasedPool = &mut pool;
        assert!(erased.component_name().ends_with("TestComponent"));
        erased.resize(8);
        assert_eq!(erased.len(), 8);

        let typed = erased
            .as_any_mut()
            .downcast_mut::<Pool<TestComponent>>()
            .unwrap();
        assert_eq!(typed.take(1), Some(TestComponent { x: 1.0, y: 1.0 }));
        assert_eq!(typed.take(100), None);
        assert_eq!(typed.occupied(), 0);

        erased.clear();
        assert!(erased.is_empty());
    }
}
