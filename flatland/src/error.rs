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
//! Error types for the ECS core
//!
//! Every fallible registry, pool, and configuration operation reports one of
//! these variants synchronously to its caller.

use crate::ecs::{Entity, MAX_COMPONENTS};
use thiserror::Error;

/// Errors raised by the ECS core
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EcsError {
    /// More distinct component types were registered than a signature can hold.
    #[error("cannot register component `{type_name}`: at most {max} component types are supported")]
    CapacityExceeded {
        /// Type that failed to register
        type_name: &'static str,
        /// The compile-time limit
        max: usize,
    },

    /// A component was read from an entity that does not carry it.
    #[error("{entity} has no `{component}` component")]
    ComponentNotPresent {
        /// The entity that was queried
        entity: Entity,
        /// Name of the missing component type
        component: &'static str,
    },

    /// A system type was looked up or removed without being registered.
    #[error("system `{0}` is not registered")]
    SystemNotFound(&'static str),

    /// A second instance of an already registered system type was added.
    #[error("system `{0}` is already registered")]
    SystemAlreadyRegistered(&'static str),

    /// A pool index past the end of its storage.
    #[error("index {index} out of range for pool of length {len}")]
    IndexOutOfRange {
        /// Requested slot
        index: usize,
        /// Current pool length
        len: usize,
    },

    /// A pool slot that holds no value.
    #[error("pool slot {index} is empty")]
    EmptySlot {
        /// Requested slot
        index: usize,
    },

    /// A pool slot holds a different component type than its id maps to.
    #[error("pool for `{expected}` holds `{found}`")]
    PoolTypeMismatch {
        /// Type the caller asked for
        expected: &'static str,
        /// Type the pool stores
        found: &'static str,
    },

    /// The entity id was never handed out by this registry.
    #[error("{0} does not exist in this registry")]
    EntityNotFound(Entity),

    /// The entity was destroyed by an earlier flush.
    #[error("{0} has been removed")]
    EntityNotAlive(Entity),

    /// A configuration value could not be used.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl EcsError {
    pub(crate) fn capacity_exceeded<T: 'static>() -> Self {
        EcsError::CapacityExceeded {
            type_name: std::any::type_name::<T>(),
            max: MAX_COMPONENTS,
        }
    }
}

/// Result alias for ECS operations
pub type EcsResult<T> = Result<T, EcsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = EcsError::ComponentNotPresent {
            entity: Entity::new(4),
            component: "Velocity",
        };
        assert_eq!(err.to_string(), "Entity(4) has no `Velocity` component");

        let err = EcsError::IndexOutOfRange { index: 12, len: 10 };
        assert_eq!(err.to_string(), "index 12 out of range for pool of length 10");
    }

    #[test]
    fn test_capacity_error_names_type() {
        struct Marker;
        match EcsError::capacity_exceeded::<Marker>() {
            EcsError::CapacityExceeded { type_name, max } => {
                assert!(type_name.ends_with("Marker"));
                assert_eq!(max, 32);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
