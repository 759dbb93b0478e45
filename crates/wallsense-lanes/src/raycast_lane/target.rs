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
use wallsense_core::math::{Rect, Vec2};
use wallsense_core::physics::ray_hits_rect;
use wallsense_data::ObstacleSet;

use super::bresenham::cast;

/// Anything a sensor ray can be cast against.
///
/// Implemented for occupancy fields (through [`FieldTarget`]), for slices of
/// axis-aligned rectangles and for [`ObstacleSet`].
pub trait RayTarget {
    /// Returns the distance to the closest obstacle along the ray, clamped to
    /// `max_range`. A ray that hits nothing reports `max_range`.
    fn ray_distance(&self, origin: Vec2, angle_degrees: f32, max_range: f32) -> f32;
}

impl<T: RayTarget + ?Sized> RayTarget for &T {
    #[inline]
    fn ray_distance(&self, origin: Vec2, angle_degrees: f32, max_range: f32) -> f32 {
        (**self).ray_distance(origin, angle_degrees, max_range)
    }
}

/// Adapts an [`OccupancyField`] for use as a [`RayTarget`], casting with
/// [`cast`].
#[derive(Debug, Clone, Copy)]
pub struct FieldTarget<'a, F: ?Sized>(pub &'a F);

impl<F: OccupancyField + ?Sized> RayTarget for FieldTarget<'_, F> {
    #[inline]
    fn ray_distance(&self, origin: Vec2, angle_degrees: f32, max_range: f32) -> f32 {
        cast(origin, angle_degrees, max_range, self.0).distance
    }
}

impl RayTarget for [Rect] {
    fn ray_distance(&self, origin: Vec2, angle_degrees: f32, max_range: f32) -> f32 {
        let direction = Vec2::from_angle_degrees(angle_degrees);
        self.iter()
            .filter_map(|rect| ray_hits_rect(origin, direction, rect, max_range))
            .fold(max_range, f32::min)
    }
}

impl RayTarget for Vec<Rect> {
    #[inline]
    fn ray_distance(&self, origin: Vec2, angle_degrees: f32, max_range: f32) -> f32 {
        self.as_slice().ray_distance(origin, angle_degrees, max_range)
    }
}

impl RayTarget for ObstacleSet {
    #[inline]
    fn ray_distance(&self, origin: Vec2, angle_degrees: f32, max_range: f32) -> f32 {
        self.as_slice().ray_distance(origin, angle_degrees, max_range)
    }
}
