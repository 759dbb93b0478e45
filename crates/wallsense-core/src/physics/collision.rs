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

use crate::math::{degrees_to_radians, Circle, OrientedRect, Rect, Vec2};

/// Below this magnitude a ray direction component is treated as parallel to the slab.
const PARALLEL_EPSILON: f32 = 1e-6;

/// Tests a circle against an axis-aligned rectangle.
///
/// Uses the closest-point method: the circle center is clamped to the
/// rectangle and the circle collides iff that point is strictly closer than
/// the radius. A center inside the rectangle, or on its boundary, clamps to
/// itself and always collides, even for a zero radius.
#[inline]
pub fn circle_hits_rect(circle: &Circle, rect: &Rect) -> bool {
    let closest = rect.closest_point(circle.center);
    overlaps_closest(circle.center - closest, circle.radius)
}

/// Closest-point verdict from the offset between the circle center and the
/// nearest point of the rectangle.
#[inline]
fn overlaps_closest(offset: Vec2, radius: f32) -> bool {
    let distance_squared = offset.length_squared();
    distance_squared == 0.0 || distance_squared < radius * radius
}

/// Tests a circle against a rotated rectangle.
///
/// The circle center is moved into the rectangle's local frame, where the
/// rectangle is axis aligned, and the closest-point test is applied there.
pub fn circle_hits_oriented_rect(circle: &Circle, rect: &OrientedRect) -> bool {
    let (sin, cos) = degrees_to_radians(rect.angle).sin_cos();
    // Inverse rotation: rotate by -angle.
    let local = (circle.center - rect.center).rotated_by(-sin, cos);
    let h = rect.half_extents;
    let closest = Vec2::new(local.x.clamp(-h.x, h.x), local.y.clamp(-h.y, h.y));
    overlaps_closest(local - closest, circle.radius)
}

/// Returns the two unit edge directions of a rotated rectangle.
///
/// Built from the angle rather than from the corners, so a rectangle of zero
/// width or height still yields usable axes.
#[inline]
fn edge_axes(rect: &OrientedRect) -> [Vec2; 2] {
    let (sin, cos) = degrees_to_radians(rect.angle).sin_cos();
    let u = Vec2::new(cos, sin);
    [u, u.perp()]
}

/// Projects a rotated rectangle onto a unit axis, returning `(min, max)`.
#[inline]
fn project(rect: &OrientedRect, axes: &[Vec2; 2], axis: Vec2) -> (f32, f32) {
    let center = rect.center.dot(axis);
    let radius = rect.half_extents.x * axes[0].dot(axis).abs()
        + rect.half_extents.y * axes[1].dot(axis).abs();
    (center - radius, center + radius)
}

/// Tests two rectangles, axis aligned or not, for overlap with the separating
/// axis test.
///
/// Each rectangle contributes its two edge directions. The rectangles are
/// disjoint iff their projections are disjoint on at least one of those four
/// axes; touching intervals count as overlapping. The test is symmetric in its
/// arguments.
pub fn rects_overlap(a: &OrientedRect, b: &OrientedRect) -> bool {
    let axes_a = edge_axes(a);
    let axes_b = edge_axes(b);
    for axis in axes_a.iter().chain(axes_b.iter()) {
        let (min_a, max_a) = project(a, &axes_a, *axis);
        let (min_b, max_b) = project(b, &axes_b, *axis);
        if max_a < min_b || max_b < min_a {
            return false;
        }
    }
    true
}

/// Tests whether a point lies within or on the boundary of a rectangle.
#[inline]
pub fn point_hits_rect(point: Vec2, rect: &Rect) -> bool {
    rect.contains_point(point)
}

/// Intersects a ray with an axis-aligned rectangle using the slab method.
///
/// `direction` must be a unit vector. Returns the distance to the nearest
/// intersection in `[0, max_range]`, or `None` when the rectangle is missed,
/// lies behind the origin, or starts beyond `max_range`. An origin inside the
/// rectangle is an immediate hit at distance `0`.
pub fn ray_hits_rect(origin: Vec2, direction: Vec2, rect: &Rect, max_range: f32) -> Option<f32> {
    let mut t_min = f32::NEG_INFINITY;
    let mut t_max = f32::INFINITY;

    for (o, d, lo, hi) in [
        (origin.x, direction.x, rect.min.x, rect.max.x),
        (origin.y, direction.y, rect.min.y, rect.max.y),
    ] {
        if d.abs() < PARALLEL_EPSILON {
            // Parallel to this slab: it either always or never overlaps.
            if o < lo || o > hi {
                return None;
            }
        } else {
            let inv = 1.0 / d;
            let (mut t1, mut t2) = ((lo - o) * inv, (hi - o) * inv);
            if t1 > t2 {
                std::mem::swap(&mut t1, &mut t2);
            }
            t_min = t_min.max(t1);
            t_max = t_max.min(t2);
            if t_min > t_max {
                return None;
            }
        }
    }

    if t_max < 0.0 {
        return None;
    }
    let distance = t_min.max(0.0);
    (distance <= max_range).then_some(distance)
}
