//! Entity Component System (ECS) core implementation
//!
//! This module provides the foundational ECS architecture including:
//! - Component type ids and bitset signatures
//! - Dense per-type component pools behind a type-erased interface
//! - System membership tracking
//! - The registry with deferred entity admission and removal

mod signature;
mod component;
mod pool;
mod entity;
mod system;
mod registry;

/// 2D game components (transform, rigid body, sprite)
pub mod components;

/// 2D game systems (movement, rendering)
pub mod systems;

pub use signature::{Signature, MAX_COMPONENTS};
pub use component::{Component, ComponentId, ComponentTypes};
pub use pool::{ErasedPool, Pool};
pub use entity::Entity;
pub use system::{System, SystemBase};
pub use registry::{FlushStats, Registry};

#[cfg(feature = "parallel")]
pub use registry::PARALLEL_MATCH_THRESHOLD;
