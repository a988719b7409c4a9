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
//! Frame loop example
//!
//! Plays the role of the game driver: builds a level out of entities, then
//! runs a fixed number of frames, flushing the registry and invoking the
//! movement and render systems each frame. Draw calls are collected instead
//! of sent to a window.
//!
//! ```bash
//! RUST_LOG=debug cargo run --example frame_loop
//! ```

use flatland::ecs::components::{RigidBody, Sprite, Transform};
use flatland::ecs::systems::{DrawCall, MovementSystem, RenderSystem};
use flatland::{EcsError, EcsResult, Registry, RegistryConfig};
use glam::Vec2;

const FPS: u32 = 60;
const FRAMES: u32 = 120;
const TILE_SIZE: u32 = 32;
const TILE_SCALE: f32 = 1.5;

/// Two rows of tile indices; the tens digit picks the atlas row, the units digit the column
const TILEMAP: &str = "21,21,22,21\n20,10,11,12";

fn load_tilemap(registry: &mut Registry, map: &str) -> EcsResult<usize> {
    let mut count = 0;
    for (row, line) in map.lines().enumerate() {
        for (col, cell) in line.split(',').enumerate() {
            let index: i32 = cell
                .trim()
                .parse()
                .map_err(|_| EcsError::InvalidConfig(format!("bad tile index `{cell}`")))?;
            let src_x = (index % 10) * TILE_SIZE as i32;
            let src_y = (index / 10) * TILE_SIZE as i32;
            let position = Vec2::new(col as f32, row as f32) * TILE_SIZE as f32 * TILE_SCALE;

            let tile = registry.create_entity();
            tile.add_component(registry, Transform::new(position, Vec2::splat(TILE_SCALE), 0.0))?;
            tile.add_component(
                registry,
                Sprite::with_source("tilemap-image", TILE_SIZE, TILE_SIZE, src_x, src_y),
            )?;
            count += 1;
        }
    }
    Ok(count)
}

fn load_level(registry: &mut Registry) -> EcsResult<()> {
    registry.add_system(MovementSystem::new)?;
    registry.add_system(RenderSystem::new)?;

    let tiles = load_tilemap(registry, TILEMAP)?;
    log::info!("loaded {} tiles", tiles);

    let tank = registry.create_entity();
    tank.add_component(registry, Transform::new(Vec2::new(10.0, 30.0), Vec2::ONE, 45.0))?;
    tank.add_component(registry, RigidBody::new(Vec2::new(50.0, 0.0)))?;
    tank.add_component(registry, Sprite::new("tank-image", 32, 32))?;

    let truck = registry.create_entity();
    truck.add_component(registry, Transform::at(Vec2::new(50.0, 100.0)))?;
    truck.add_component(registry, RigidBody::new(Vec2::new(0.0, 50.0)))?;
    truck.add_component(registry, Sprite::new("truck-image", 32, 32))?;

    Ok(())
}

fn main() -> EcsResult<()> {
    env_logger::init();

    println!("Flatland - Frame Loop Example");
    println!("=============================\n");

    let mut registry = Registry::with_config(RegistryConfig::from_env()?);
    load_level(&mut registry)?;
    println!("Created {} entities", registry.entity_count());

    let dt = 1.0 / f64::from(FPS);
    let mut frame_calls: Vec<DrawCall> = Vec::new();

    for frame in 0..FRAMES {
        registry.update();

        registry.with_system(|movement: &mut MovementSystem, registry| movement.update(registry, dt))?;

        frame_calls.clear();
        registry
            .get_system::<RenderSystem>()?
            .update(&registry, &mut frame_calls)?;

        if frame % FPS == 0 {
            println!("Frame {frame:>3}: {} draw calls", frame_calls.len());
        }
    }

    println!("\nLast frame:");
    for call in frame_calls.iter().filter(|call| call.asset_id != "tilemap-image") {
        println!("  {:<12} at ({:>4}, {:>4})", call.asset_id, call.dst.x, call.dst.y);
    }

    Ok(())
}
