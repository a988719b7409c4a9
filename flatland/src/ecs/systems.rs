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
//! 2D game systems
//!
//! Concrete systems built on the registry: [`MovementSystem`] integrates
//! rigid-body velocity into transforms, and [`RenderSystem`] turns sprites
//! into draw calls for an external renderer.
//!
//! Both are driven once per frame after [`Registry::update`], typically via
//! [`Registry::with_system`].

use crate::ecs::components::{Rect, RigidBody, Sprite, Transform};
use crate::ecs::{ComponentTypes, Registry, System, SystemBase};
use crate::error::EcsResult;

/// Moves every entity with a [`Transform`] and a [`RigidBody`]
pub struct MovementSystem {
    base: SystemBase,
}

impl MovementSystem {
    /// Create the system, registering its component requirements
    pub fn new(types: &mut ComponentTypes) -> EcsResult<Self> {
        let base = SystemBase::new()
            .with_component::<Transform>(types)?
            .with_component::<RigidBody>(types)?;
        Ok(MovementSystem { base })
    }

    /// Advance positions by `velocity * dt`
    ///
    /// `dt` is the frame time in seconds. Entities whose transform becomes
    /// non-finite are reported and left out of the returned count.
    ///
    /// # Returns
    ///
    /// Number of entities that were updated
    pub fn update(&self, registry: &mut Registry, dt: f64) -> EcsResult<usize> {
        let dt = dt as f32;
        let mut updated_count = 0;

        for &entity in self.base.entities() {
            let velocity = registry.get_component::<RigidBody>(entity)?.velocity;
            let transform = registry.get_component_mut::<Transform>(entity)?;
            transform.position += velocity * dt;

            if !transform.is_valid() {
                log::warn!("movement produced invalid transform for {}", entity);
                continue;
            }

            log::trace!("{} position is now {}", entity, transform.position);
            updated_count += 1;
        }

        Ok(updated_count)
    }
}

impl System for MovementSystem {
    fn base(&self) -> &SystemBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut SystemBase {
        &mut self.base
    }

    fn name(&self) -> &str {
        "MovementSystem"
    }
}

/// One textured quad to draw
#[derive(Debug, Clone, PartialEq)]
pub struct DrawCall {
    /// Texture key in the asset cache
    pub asset_id: String,
    /// Region of the texture
    pub src: Rect,
    /// Destination on the drawing surface
    pub dst: Rect,
    /// Rotation in degrees, clockwise
    pub rotation: f64,
}

/// Drawing surface the [`RenderSystem`] emits into
///
/// Implemented by the renderer that owns the window and texture cache.
pub trait RenderTarget {
    /// Draw one textured quad
    fn draw(&mut self, call: DrawCall);
}

/// Collects draw calls in submission order
impl RenderTarget for Vec<DrawCall> {
    fn draw(&mut self, call: DrawCall) {
        self.push(call);
    }
}

/// Draws every entity with a [`Transform`] and a [`Sprite`]
pub struct RenderSystem {
    base: SystemBase,
}

impl RenderSystem {
    /// Create the system, registering its component requirements
    pub fn new(types: &mut ComponentTypes) -> EcsResult<Self> {
        let base = SystemBase::new()
            .with_component::<Transform>(types)?
            .with_component::<Sprite>(types)?;
        Ok(RenderSystem { base })
    }

    /// Submit one draw call per member, in admission order
    ///
    /// # Returns
    ///
    /// Number of draw calls submitted
    pub fn update(&self, registry: &Registry, target: &mut impl RenderTarget) -> EcsResult<usize> {
        for &entity in self.base.entities() {
            let transform = registry.get_component::<Transform>(entity)?;
            let sprite = registry.get_component::<Sprite>(entity)?;
            target.draw(draw_call(transform, sprite));
        }
        Ok(self.base.entities().len())
    }
}

impl System for RenderSystem {
    fn base(&self) -> &SystemBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut SystemBase {
        &mut self.base
    }

    fn name(&self) -> &str {
        "RenderSystem"
    }
}

fn draw_call(transform: &Transform, sprite: &Sprite) -> DrawCall {
    let dst = Rect::new(
        transform.position.x as i32,
        transform.position.y as i32,
        (sprite.width as f32 * transform.scale.x) as i32,
        (sprite.height as f32 * transform.scale.y) as i32,
    );
    DrawCall {
        asset_id: sprite.asset_id.clone(),
        src: sprite.src_rect,
        dst,
        rotation: f64::from(transform.rotation),
    }
}
