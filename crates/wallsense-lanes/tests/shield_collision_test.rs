// Copyright 2025 eraflo
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

use wallsense_core::math::{Rect, Vec2};
use wallsense_core::physics::{CollisionGeometry, Primitive};
use wallsense_data::{MazeLayout, OccupancyGrid, Rgba8, RgbaBitmap, SceneDefinition, WallRule};
use wallsense_lanes::CollisionShield;

fn corridor() -> MazeLayout {
    SceneDefinition::corridor(4).build_maze().unwrap()
}

fn rasterize(maze: &MazeLayout) -> OccupancyGrid {
    let size = maze.world_size();
    OccupancyGrid::from_obstacles(size.x as u32, size.y as u32, &maze.obstacles())
}

/// A 60 x 100 body sprite, long axis pointing up, centred in its mask.
fn body_shield() -> CollisionShield {
    let mut mask = RgbaBitmap::new(120, 120, Rgba8::TRANSPARENT, WallRule::Transparent);
    mask.fill_rect(&Rect::from_xywh(30.0, 10.0, 60.0, 100.0), Rgba8::WHITE);
    CollisionShield::from_mask(&mask, Vec2::new(60.0, 60.0), 72, 100.0).unwrap()
}

#[test]
fn test_shield_from_sprite_fits_start_cell() {
    let maze = corridor();
    let grid = rasterize(&maze);
    let shield = body_shield();
    assert_eq!(shield.len(), 72);
    assert!(shield.reach() > 50.0 && shield.reach() < 60.0);

    let start = maze.cell_center(0, 0);
    assert!(shield.can_occupy(&grid, start, 0.0));
    assert!(shield.can_occupy(&grid, start, 90.0));
}

#[test]
fn test_shield_rejects_move_into_wall() {
    let maze = corridor();
    let grid = rasterize(&maze);
    let shield = body_shield();
    let start = maze.cell_center(0, 0);

    // Sliding east toward the corridor wall at x = 180.
    assert!(shield.can_occupy(&grid, start + Vec2::new(40.0, 0.0), 0.0));
    assert!(shield.collides(&grid, start + Vec2::new(60.0, 0.0), 0.0));
}

#[test]
fn test_shield_rejects_turn_into_wall() {
    let maze = corridor();
    let grid = rasterize(&maze);
    let shield = body_shield();
    let near_wall = Vec2::new(140.0, maze.cell_center(0, 0).y);

    assert!(shield.can_occupy(&grid, near_wall, 0.0));
    // Turning side-on swings the long axis into the wall.
    let contact = shield.first_contact(&grid, near_wall, 90.0).unwrap();
    assert!(contact.x >= 180.0);
}

#[test]
fn test_body_geometry_against_neighborhood() {
    let maze = corridor();
    let scene = SceneDefinition::corridor(4);
    let nearby = maze.neighborhood(0, 0);
    let mut body = scene.build_body();

    body.set_position(maze.cell_center(0, 0));
    assert!(!body.collides_with_any(&nearby));

    body.set_position(Vec2::new(140.0, 636.0));
    assert!(!body.collides_with_any(&nearby));
    body.set_rotation(90.0);
    let index = body.first_collision(&nearby).unwrap();
    assert_eq!(nearby[index].min.x, 180.0);

    body.set_rotation(0.0);
    body.set_position(Vec2::new(150.0, 636.0));
    assert!(body.collides_with_any(&nearby));
}

#[test]
fn test_circle_body_and_shield_agree_on_corridor_walls() {
    let maze = corridor();
    let grid = rasterize(&maze);
    let nearby = maze.neighborhood(0, 0);
    let mut body = CollisionGeometry::new(Vec2::ZERO)
        .with_shape(Primitive::Circle { radius: 40.0 }, Vec2::ZERO);
    let shield = CollisionShield::circle(40.0, 90);
    let y = maze.cell_center(0, 0).y;

    for x in [60.0f32, 96.0, 120.0, 150.0, 170.0] {
        body.set_position(Vec2::new(x, y));
        let geometric = body.collides_with_any(&nearby);
        let sampled = shield.collides(&grid, Vec2::new(x, y), 0.0);
        assert_eq!(geometric, sampled, "disagreement at x = {x}");
    }
}
