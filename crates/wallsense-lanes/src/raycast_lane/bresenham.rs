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

use wallsense_core::field::OccupancyField;
use wallsense_core::math::Vec2;

/// How a cast ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RayOutcome {
    /// The ray reached an obstacle cell.
    Hit,
    /// The ray covered its full range through free space.
    Miss,
    /// The ray left the field before hitting anything.
    OutOfBounds,
}

/// The result of a single cast.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// Distance from the origin to the hit cell, or the maximum range when
    /// nothing was hit.
    pub distance: f32,
    /// Where the ray stopped: the hit cell, the first cell outside the field,
    /// or the end of the ray.
    pub point: Vec2,
    /// How the cast ended.
    pub outcome: RayOutcome,
}

impl RayHit {
    /// Returns `true` when the ray stopped on an obstacle.
    #[inline]
    pub fn is_hit(&self) -> bool {
        self.outcome == RayOutcome::Hit
    }
}

/// Casts a ray through an occupancy field.
///
/// The ray starts at `origin` and heads along `angle_degrees` (0 along `+x`,
/// increasing clockwise on screen). Cells are visited with integer Bresenham
/// traversal, each exactly once, from the origin's cell up to and including
/// the cell at `max_range`.
///
/// The walk stops at the first cell that is either outside the field
/// ([`RayOutcome::OutOfBounds`], distance `max_range`) or an obstacle
/// ([`RayOutcome::Hit`], Euclidean distance from `origin` to that cell).
/// When the origin and the end of the ray share a cell, the cast returns
/// immediately with distance `0`. Any finite `max_range` is accepted: the walk
/// is bounded by the size of the field, not by the range.
pub fn cast<F: OccupancyField + ?Sized>(
    origin: Vec2,
    angle_degrees: f32,
    max_range: f32,
    field: &F,
) -> RayHit {
    let direction = Vec2::from_angle_degrees(angle_degrees);
    // A ray starting inside the field leaves it within `width + height`, so
    // the walk never needs to aim further than that.
    let reach = field.width() as f32 + field.height() as f32 + 2.0;
    let end = origin + direction * max_range.min(reach);

    let mut x0 = origin.x.floor() as i32;
    let mut y0 = origin.y.floor() as i32;
    let x1 = end.x.floor() as i32;
    let y1 = end.y.floor() as i32;

    if x0 == x1 && y0 == y1 {
        let outcome = if !field.contains(x0, y0) {
            RayOutcome::OutOfBounds
        } else if field.is_obstacle(x0 as u32, y0 as u32) {
            RayOutcome::Hit
        } else {
            RayOutcome::Miss
        };
        return RayHit {
            distance: 0.0,
            point: origin,
            outcome,
        };
    }

    let dx = (i64::from(x1) - i64::from(x0)).abs();
    let dy = (i64::from(y1) - i64::from(y0)).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx - dy;

    loop {
        let cell = Vec2::new(x0 as f32, y0 as f32);
        if !field.contains(x0, y0) {
            return RayHit {
                distance: max_range,
                point: cell,
                outcome: RayOutcome::OutOfBounds,
            };
        }
        if field.is_obstacle(x0 as u32, y0 as u32) {
            return RayHit {
                distance: origin.distance(cell).min(max_range),
                point: cell,
                outcome: RayOutcome::Hit,
            };
        }
        if x0 == x1 && y0 == y1 {
            break;
        }
        let err2 = 2 * err;
        if err2 > -dy {
            err -= dy;
            x0 += sx;
        }
        if err2 < dx {
            err += dx;
            y0 += sy;
        }
    }

    RayHit {
        distance: max_range,
        point: end,
        outcome: RayOutcome::Miss,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    /// A small field with a vertical wall at `x == wall_x`.
    struct WallField {
        size: u32,
        wall_x: u32,
    }

    impl OccupancyField for WallField {
        fn width(&self) -> u32 {
            self.size
        }

        fn height(&self) -> u32 {
            self.size
        }

        fn is_obstacle(&self, x: u32, _y: u32) -> bool {
            x == self.wall_x
        }
    }

    /// Counts how many cells a cast visits.
    struct CountingField {
        visits: std::cell::Cell<u32>,
    }

    impl OccupancyField for CountingField {
        fn width(&self) -> u32 {
            1000
        }

        fn height(&self) -> u32 {
            1000
        }

        fn is_obstacle(&self, _x: u32, _y: u32) -> bool {
            self.visits.set(self.visits.get() + 1);
            false
        }
    }

    #[test]
    fn test_cast_hits_wall_at_known_distance() {
        let field = WallField {
            size: 200,
            wall_x: 150,
        };
        let hit = cast(Vec2::new(50.0, 100.0), 0.0, 500.0, &field);
        assert!(hit.is_hit());
        assert_abs_diff_eq!(hit.distance, 100.0, epsilon = 1.0);
        assert_eq!(hit.point, Vec2::new(150.0, 100.0));
    }

    #[test]
    fn test_cast_diagonal_hit() {
        let field = WallField {
            size: 200,
            wall_x: 130,
        };
        let hit = cast(Vec2::new(30.0, 30.0), 45.0, 500.0, &field);
        assert!(hit.is_hit());
        // 100 across at 45 degrees.
        assert_abs_diff_eq!(hit.distance, 100.0 * 2f32.sqrt(), epsilon = 1.5);
    }

    #[test]
    fn test_cast_miss_reports_max_range() {
        let field = WallField {
            size: 1000,
            wall_x: 999,
        };
        let hit = cast(Vec2::new(100.0, 100.0), 90.0, 300.0, &field);
        assert_eq!(hit.outcome, RayOutcome::Miss);
        assert_eq!(hit.distance, 300.0);
        assert_abs_diff_eq!(hit.point.y, 400.0, epsilon = 1e-3);
    }

    #[test]
    fn test_cast_leaving_field_is_out_of_bounds() {
        let field = WallField {
            size: 100,
            wall_x: 500,
        };
        let hit = cast(Vec2::new(50.0, 50.0), 180.0, 500.0, &field);
        assert_eq!(hit.outcome, RayOutcome::OutOfBounds);
        assert_eq!(hit.distance, 500.0);
        assert_eq!(hit.point, Vec2::new(-1.0, 50.0));
    }

    #[test]
    fn test_cast_zero_range_returns_immediately() {
        let field = WallField {
            size: 100,
            wall_x: 500,
        };
        let hit = cast(Vec2::new(10.5, 10.5), 33.0, 0.0, &field);
        assert_eq!(hit.distance, 0.0);
        assert_eq!(hit.outcome, RayOutcome::Miss);

        let hit = cast(Vec2::new(-3.0, 10.5), 33.0, 0.1, &field);
        assert_eq!(hit.distance, 0.0);
        assert_eq!(hit.outcome, RayOutcome::OutOfBounds);
    }

    #[test]
    fn test_cast_origin_on_obstacle_hits_at_zero() {
        let field = WallField {
            size: 100,
            wall_x: 10,
        };
        let hit = cast(Vec2::new(10.0, 20.0), 0.0, 50.0, &field);
        assert!(hit.is_hit());
        assert_eq!(hit.distance, 0.0);
    }

    #[test]
    fn test_cast_huge_range_stays_bounded() {
        let field = CountingField {
            visits: std::cell::Cell::new(0),
        };
        for angle in [0.0f32, 90.0, 180.0, -90.0, 37.0, 225.0] {
            field.visits.set(0);
            let hit = cast(Vec2::new(500.0, 500.0), angle, 1.0e10, &field);
            assert_eq!(hit.outcome, RayOutcome::OutOfBounds);
            assert_eq!(hit.distance, 1.0e10);
            assert!(field.visits.get() <= 1000, "{angle}: {}", field.visits.get());
        }

        let field = WallField {
            size: 100,
            wall_x: 90,
        };
        let hit = cast(Vec2::new(50.0, 50.0), 0.0, f32::MAX, &field);
        assert!(hit.is_hit());
        assert_abs_diff_eq!(hit.distance, 40.0, epsilon = 1.0);
    }

    #[test]
    fn test_cast_visits_each_cell_once() {
        let field = CountingField {
            visits: std::cell::Cell::new(0),
        };
        // Steep line: one cell per row.
        cast(Vec2::new(100.0, 100.0), 80.0, 200.0, &field);
        let end = Vec2::new(100.0, 100.0) + Vec2::from_angle_degrees(80.0) * 200.0;
        let rows = (end.y.floor() - 100.0) as u32 + 1;
        assert_eq!(field.visits.get(), rows);
    }
}
