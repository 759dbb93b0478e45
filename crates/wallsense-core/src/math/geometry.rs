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

//! Provides geometric primitive shapes for spatial calculations.
//!
//! This module contains the 2D structures used by collision detection and
//! sensor ray casting: axis-aligned rectangles for static obstacles, oriented
//! rectangles for rotated body parts, and circles.

use serde::{Deserialize, Serialize};

use super::{degrees_to_radians, Vec2};

/// Represents a 2D Axis-Aligned Bounding Box.
///
/// Walls and posts of a maze are always axis aligned, so this is the shape
/// every static obstacle is stored as. Defined by its minimum (top-left on
/// screen) and maximum (bottom-right) corners.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// The corner of the rectangle with the smallest coordinates.
    pub min: Vec2,
    /// The corner of the rectangle with the largest coordinates.
    pub max: Vec2,
}

impl Rect {
    /// Creates a new `Rect` from two corner points.
    ///
    /// The corners may be passed in any order; `min` always receives the
    /// component-wise minimum.
    #[inline]
    pub fn from_min_max(a: Vec2, b: Vec2) -> Self {
        Self {
            min: Vec2::new(a.x.min(b.x), a.y.min(b.y)),
            max: Vec2::new(a.x.max(b.x), a.y.max(b.y)),
        }
    }

    /// Creates a `Rect` from its top-left corner and its size.
    ///
    /// Negative sizes are folded so the result is always valid.
    #[inline]
    pub fn from_xywh(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self::from_min_max(Vec2::new(x, y), Vec2::new(x + width, y + height))
    }

    /// Creates a new `Rect` from a center point and its half-extents.
    #[inline]
    pub fn from_center_half_extents(center: Vec2, half_extents: Vec2) -> Self {
        let half = half_extents.abs();
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Calculates the center point of the `Rect`.
    #[inline]
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// Calculates the half-extents of the `Rect`.
    #[inline]
    pub fn half_extents(&self) -> Vec2 {
        (self.max - self.min) * 0.5
    }

    /// Calculates the full size (width, height) of the `Rect`.
    #[inline]
    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    /// Checks if a point is contained within or on the boundary of the `Rect`.
    #[inline]
    pub fn contains_point(&self, point: Vec2) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
    }

    /// Checks if this `Rect` intersects another one.
    ///
    /// Rectangles that only touch at the boundary are considered intersecting.
    #[inline]
    pub fn intersects(&self, other: &Rect) -> bool {
        (self.min.x <= other.max.x && self.max.x >= other.min.x)
            && (self.min.y <= other.max.y && self.max.y >= other.min.y)
    }

    /// Returns the point of the `Rect` closest to `point`.
    ///
    /// A point inside the rectangle is returned unchanged.
    #[inline]
    pub fn closest_point(&self, point: Vec2) -> Vec2 {
        Vec2::new(
            point.x.clamp(self.min.x, self.max.x),
            point.y.clamp(self.min.y, self.max.y),
        )
    }

    /// Creates a new `Rect` grown by `margin` on every side.
    #[inline]
    pub fn inflated(&self, margin: f32) -> Self {
        let m = Vec2::new(margin, margin);
        Self::from_min_max(self.min - m, self.max + m)
    }

    /// Creates a new `Rect` that encompasses both this `Rect` and another one.
    #[inline]
    pub fn merge(&self, other: &Rect) -> Self {
        Self {
            min: Vec2::new(self.min.x.min(other.min.x), self.min.y.min(other.min.y)),
            max: Vec2::new(self.max.x.max(other.max.x), self.max.y.max(other.max.y)),
        }
    }

    /// Returns the four corners, clockwise on screen from the top-left.
    #[inline]
    pub fn corners(&self) -> [Vec2; 4] {
        [
            self.min,
            Vec2::new(self.max.x, self.min.y),
            self.max,
            Vec2::new(self.min.x, self.max.y),
        ]
    }

    /// Views this rectangle as an [`OrientedRect`] with no rotation.
    #[inline]
    pub fn to_oriented(&self) -> OrientedRect {
        OrientedRect::new(self.center(), self.half_extents(), 0.0)
    }
}

/// A rectangle rotated about its own center.
///
/// Rectangle parts of a composite body keep the body's rotation, so they are
/// stored in this form.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrientedRect {
    /// The center of the rectangle.
    pub center: Vec2,
    /// Half the width and height, before rotation.
    pub half_extents: Vec2,
    /// Rotation in degrees, clockwise on screen.
    pub angle: f32,
}

impl OrientedRect {
    /// Creates a new `OrientedRect`.
    #[inline]
    pub fn new(center: Vec2, half_extents: Vec2, angle: f32) -> Self {
        Self {
            center,
            half_extents: half_extents.abs(),
            angle,
        }
    }

    /// Returns the four corners in world space.
    ///
    /// Corners are ordered around the perimeter, so consecutive corners form
    /// the edges.
    pub fn corners(&self) -> [Vec2; 4] {
        let (sin, cos) = degrees_to_radians(self.angle).sin_cos();
        let h = self.half_extents;
        [
            Vec2::new(-h.x, -h.y),
            Vec2::new(h.x, -h.y),
            Vec2::new(h.x, h.y),
            Vec2::new(-h.x, h.y),
        ]
        .map(|local| self.center + local.rotated_by(sin, cos))
    }

    /// Returns the bounding `Rect` of the rotated rectangle.
    pub fn bounds(&self) -> Rect {
        let corners = self.corners();
        let mut bounds = Rect::from_min_max(corners[0], corners[0]);
        for corner in &corners[1..] {
            bounds = bounds.merge(&Rect::from_min_max(*corner, *corner));
        }
        bounds
    }
}

/// A circle given by its center and radius.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    /// The center of the circle.
    pub center: Vec2,
    /// The radius of the circle. Never negative.
    pub radius: f32,
}

impl Circle {
    /// Creates a new `Circle`. A negative radius is folded to its magnitude.
    #[inline]
    pub fn new(center: Vec2, radius: f32) -> Self {
        Self {
            center,
            radius: radius.abs(),
        }
    }
}
