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
//! # Flatland
//!
//! The entity component system core of a small 2D game engine.
//!
//! ## Features
//!
//! - **Bitset matching**: entities join every system whose required
//!   component signature is a subset of theirs
//! - **Dense storage**: one pool per component type, indexed by entity id
//! - **Deferred mutation**: entity admission and removal are applied once per
//!   frame in [`Registry::update`], so systems never see half-built entities
//! - **Parallelization**: optional Rayon matching of large admission batches
//!
//! ## Example
//!
//! ```rust
//! use flatland::ecs::components::{RigidBody, Transform};
//! use flatland::ecs::systems::MovementSystem;
//! use flatland::{Registry, System};
//! use glam::Vec2;
//!
//! let mut registry = Registry::new();
//! registry.add_system(MovementSystem::new).unwrap();
//!
//! let tank = registry.create_entity();
//! tank.add_component(&mut registry, Transform::at(Vec2::new(10.0, 30.0))).unwrap();
//! tank.add_component(&mut registry, RigidBody::new(Vec2::new(50.0, 0.0))).unwrap();
//!
//! registry.update();
//! assert_eq!(registry.get_system::<MovementSystem>().unwrap().entities(), &[tank]);
//! ```

#![warn(missing_docs)]

/// Entity Component System implementation
pub mod ecs;

/// Registry configuration
pub mod config;

/// Error types
pub mod error;

pub use config::RegistryConfig;
pub use ecs::{Component, Entity, Registry, System};
pub use error::{EcsError, EcsResult};
