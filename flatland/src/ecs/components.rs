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
//! 2D game components
//!
//! Plain data records for positioning, moving, and drawing entities. Vector
//! quantities use `glam::Vec2`.

use crate::ecs::Component;
use glam::Vec2;

/// Axis-aligned integer rectangle in pixels
///
/// Width and height are signed: a negative extent mirrors the drawn region.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Rect {
    /// Left edge
    pub x: i32,
    /// Top edge
    pub y: i32,
    /// Width
    pub w: i32,
    /// Height
    pub h: i32,
}

impl Rect {
    /// Create a rectangle
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Rect { x, y, w, h }
    }
}

/// Placement of an entity in world space
///
/// # Examples
///
/// ```
/// use flatland::ecs::components::Transform;
/// use glam::Vec2;
///
/// let transform = Transform::new(Vec2::new(10.0, 30.0), Vec2::ONE, 45.0);
/// assert_eq!(transform.rotation, 45.0);
/// assert_eq!(Transform::default().scale, Vec2::ONE);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    /// World position of the top-left corner
    pub position: Vec2,
    /// Per-axis scale factor
    pub scale: Vec2,
    /// Rotation in degrees, clockwise
    pub rotation: f32,
}

impl Transform {
    /// Create a transform
    pub fn new(position: Vec2, scale: Vec2, rotation: f32) -> Self {
        Transform {
            position,
            scale,
            rotation,
        }
    }

    /// Unscaled, unrotated transform at `position`
    pub fn at(position: Vec2) -> Self {
        Transform::new(position, Vec2::ONE, 0.0)
    }

    /// Whether every field is finite
    pub fn is_valid(&self) -> bool {
        self.position.is_finite() && self.scale.is_finite() && self.rotation.is_finite()
    }
}

impl Default for Transform {
    fn default() -> Self {
        Transform::at(Vec2::ZERO)
    }
}

impl Component for Transform {}

/// Linear motion in world units per second
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RigidBody {
    /// Velocity
    pub velocity: Vec2,
}

impl RigidBody {
    /// Create a rigid body moving at `velocity`
    pub fn new(velocity: Vec2) -> Self {
        RigidBody { velocity }
    }
}

impl Component for RigidBody {}

/// Textured quad drawn at the entity's transform
///
/// The source rectangle selects the region of the texture named by
/// `asset_id`; its size matches the sprite size.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sprite {
    /// Key of the texture in the asset cache
    pub asset_id: String,
    /// Unscaled width in pixels
    pub width: u32,
    /// Unscaled height in pixels
    pub height: u32,
    /// Region of the texture to draw
    pub src_rect: Rect,
}

impl Sprite {
    /// Sprite covering the top-left `width` x `height` region of a texture
    pub fn new(asset_id: impl Into<String>, width: u32, height: u32) -> Self {
        Self::with_source(asset_id, width, height, 0, 0)
    }

    /// Sprite covering the region at (`src_x`, `src_y`) of a texture atlas
    pub fn with_source(asset_id: impl Into<String>, width: u32, height: u32, src_x: i32, src_y: i32) -> Self {
        Sprite {
            asset_id: asset_id.into(),
            width,
            height,
            src_rect: Rect::new(src_x, src_y, pixels(width), pixels(height)),
        }
    }
}

impl Component for Sprite {}

fn pixels(extent: u32) -> i32 {
    i32::try_from(extent).unwrap_or(i32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transform_defaults() {
        let transform = Transform::default();
        assert_eq!(transform.position, Vec2::ZERO);
        assert_eq!(transform.scale, Vec2::ONE);
        assert_eq!(transform.rotation, 0.0);
        assert!(transform.is_valid());
    }

    #[test]
    fn test_transform_validity() {
        let mut transform = Transform::at(Vec2::new(1.0, 2.0));
        transform.position.x = f32::NAN;
        assert!(!transform.is_valid());
    }

    #[test]
    fn test_sprite_source_rect() {
        let sprite = Sprite::with_source("tilemap-image", 32, 32, 64, 96);
        assert_eq!(sprite.asset_id, "tilemap-image");
        assert_eq!(sprite.src_rect, Rect::new(64, 96, 32, 32));

        let sprite = Sprite::new("tank-image", 16, 8);
        assert_eq!(sprite.src_rect, Rect::new(0, 0, 16, 8));
    }

    #[test]
    fn test_rigid_body_default_is_at_rest() {
        assert_eq!(RigidBody::default().velocity, Vec2::ZERO);
    }
}
