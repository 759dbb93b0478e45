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
use wallsense_core::math::{degrees_to_radians, Vec2};
use wallsense_core::KernelError;

use crate::raycast_lane::cast;

/// A ring of body-relative sample points tested against an occupancy field.
///
/// The ring is built once, in the body frame with heading 0 pointing up the
/// screen, and then rotated and translated to every candidate pose. A pose is
/// free when no sample point lands on an obstacle cell or outside the field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollisionShield {
    points: Vec<Vec2>,
}

impl CollisionShield {
    /// Builds a shield by casting `steps` rays outward from `center` through a
    /// body mask, at `360 * i / steps` degrees.
    ///
    /// In the mask, cells inside the body are free and cells outside it are
    /// obstacles (an [`RgbaBitmap`](wallsense_data::RgbaBitmap) with
    /// [`WallRule::Transparent`](wallsense_data::WallRule::Transparent) reads a
    /// sprite that way). Each ray keeps the cell where it left the body, or
    /// the end of its range if it never did.
    ///
    /// # Errors
    ///
    /// Returns [`KernelError::InvalidRayCount`] when `steps` is zero.
    pub fn from_mask<F: OccupancyField + ?Sized>(
        mask: &F,
        center: Vec2,
        steps: usize,
        max_range: f32,
    ) -> Result<Self, KernelError> {
        if steps == 0 {
            return Err(KernelError::InvalidRayCount(steps));
        }
        let points = (0..steps)
            .map(|i| {
                let angle = 360.0 * i as f32 / steps as f32;
                cast(center, angle, max_range, mask).point - center
            })
            .collect();
        log::debug!(
            "Built collision shield with {steps} points from a {}x{} mask",
            mask.width(),
            mask.height()
        );
        Ok(Self { points })
    }

    /// Wraps an existing set of body-relative points.
    pub fn from_points(points: Vec<Vec2>) -> Self {
        Self { points }
    }

    /// Samples a circle of `radius` with `steps` evenly spaced points.
    pub fn circle(radius: f32, steps: usize) -> Self {
        let points = (0..steps)
            .map(|i| Vec2::from_angle_degrees(360.0 * i as f32 / steps as f32) * radius)
            .collect();
        Self { points }
    }

    /// Returns the body-relative points.
    #[inline]
    pub fn points(&self) -> &[Vec2] {
        &self.points
    }

    /// Returns the number of sample points.
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns `true` when the shield has no points and so never collides.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Returns the distance from the body center to the farthest point.
    pub fn reach(&self) -> f32 {
        self.points.iter().map(Vec2::length).fold(0.0, f32::max)
    }

    /// Yields the points placed at `position` with the body rotated by
    /// `angle` degrees.
    pub fn placed(&self, position: Vec2, angle: f32) -> impl Iterator<Item = Vec2> + '_ {
        let (sin, cos) = degrees_to_radians(angle).sin_cos();
        self.points
            .iter()
            .map(move |point| position + point.rotated_by(sin, cos))
    }

    /// Returns the first placed point that lands on an obstacle or outside
    /// the field.
    pub fn first_contact<F: OccupancyField + ?Sized>(
        &self,
        field: &F,
        position: Vec2,
        angle: f32,
    ) -> Option<Vec2> {
        self.placed(position, angle).find(|point| {
            let x = point.x.floor() as i32;
            let y = point.y.floor() as i32;
            !field.contains(x, y) || field.is_obstacle(x as u32, y as u32)
        })
    }

    /// Returns `true` when the body at this pose touches an obstacle or
    /// sticks out of the field.
    #[inline]
    pub fn collides<F: OccupancyField + ?Sized>(
        &self,
        field: &F,
        position: Vec2,
        angle: f32,
    ) -> bool {
        self.first_contact(field, position, angle).is_some()
    }

    /// Returns `true` when the body fits at this pose.
    #[inline]
    pub fn can_occupy<F: OccupancyField + ?Sized>(
        &self,
        field: &F,
        position: Vec2,
        angle: f32,
    ) -> bool {
        !self.collides(field, position, angle)
    }
}
