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

//! Composite collision bodies made of circles and rectangles.

use serde::{Deserialize, Serialize};

use super::collision::{circle_hits_oriented_rect, circle_hits_rect, rects_overlap};
use crate::math::{degrees_to_radians, wrap_degrees, Circle, OrientedRect, Rect, Vec2};

/// A shape that can be attached to a [`CollisionGeometry`].
///
/// Primitives carry only their size; placement comes from the offset they are
/// attached with and the pose of the owning body.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Primitive {
    /// A circle of the given radius, centered on its attachment point.
    Circle {
        /// Radius of the circle.
        radius: f32,
    },
    /// A rectangle centered on its attachment point. It turns with the body.
    Rect {
        /// Extent along the body's local x axis.
        width: f32,
        /// Extent along the body's local y axis.
        height: f32,
    },
}

/// A primitive resolved to world space for the current pose.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlacedShape {
    /// A circle in world coordinates.
    Circle(Circle),
    /// A rectangle in world coordinates, rotated with the body.
    Rect(OrientedRect),
}

impl PlacedShape {
    /// Tests this shape against an axis-aligned obstacle.
    #[inline]
    pub fn overlaps(&self, obstacle: &Rect) -> bool {
        match self {
            PlacedShape::Circle(circle) => circle_hits_rect(circle, obstacle),
            PlacedShape::Rect(rect) => rects_overlap(rect, &obstacle.to_oriented()),
        }
    }

    /// Tests this shape against a rotated obstacle.
    #[inline]
    pub fn overlaps_oriented(&self, obstacle: &OrientedRect) -> bool {
        match self {
            PlacedShape::Circle(circle) => circle_hits_oriented_rect(circle, obstacle),
            PlacedShape::Rect(rect) => rects_overlap(rect, obstacle),
        }
    }

    /// Returns the axis-aligned bounds of the placed shape.
    pub fn bounds(&self) -> Rect {
        match self {
            PlacedShape::Circle(circle) => Rect::from_center_half_extents(
                circle.center,
                Vec2::new(circle.radius, circle.radius),
            ),
            PlacedShape::Rect(rect) => rect.bounds(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct ShapeData {
    primitive: Primitive,
    original_offset: Vec2,
    rotated_offset: Vec2,
}

/// A rigid body built from primitives attached at fixed offsets.
///
/// The body tracks a center and a heading in degrees. Each attached shape
/// remembers the offset it was attached with and that offset rotated by the
/// current heading; the rotated offset is only recomputed when the heading
/// changes, so moving the body is cheap.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CollisionGeometry {
    center: Vec2,
    angle: f32,
    shapes: Vec<ShapeData>,
}

impl CollisionGeometry {
    /// Creates an empty body at `center`, with a heading of zero.
    pub fn new(center: Vec2) -> Self {
        Self {
            center,
            angle: 0.0,
            shapes: Vec::new(),
        }
    }

    /// Attaches a primitive at `offset` from the body center.
    ///
    /// The offset is given in the body frame and is rotated by the current
    /// heading straight away.
    pub fn add_shape(&mut self, primitive: Primitive, offset: Vec2) {
        self.shapes.push(ShapeData {
            primitive,
            original_offset: offset,
            rotated_offset: offset.rotated_degrees(self.angle),
        });
    }

    /// Builder-style variant of [`CollisionGeometry::add_shape`].
    pub fn with_shape(mut self, primitive: Primitive, offset: Vec2) -> Self {
        self.add_shape(primitive, offset);
        self
    }

    /// Moves the body without changing its heading.
    #[inline]
    pub fn set_position(&mut self, center: Vec2) {
        self.center = center;
    }

    /// Returns the body center.
    #[inline]
    pub fn position(&self) -> Vec2 {
        self.center
    }

    /// Sets the absolute heading, in degrees, and re-rotates every offset from
    /// its original value.
    ///
    /// The angle is stored as given; only [`CollisionGeometry::rotate`] wraps.
    pub fn set_rotation(&mut self, angle: f32) {
        self.angle = angle;
        let (sin, cos) = degrees_to_radians(angle).sin_cos();
        for shape in &mut self.shapes {
            shape.rotated_offset = shape.original_offset.rotated_by(sin, cos);
        }
    }

    /// Turns the body by `delta` degrees. The resulting heading is wrapped into
    /// `[0, 360)`.
    pub fn rotate(&mut self, delta: f32) {
        self.set_rotation(wrap_degrees(self.angle + delta));
    }

    /// Returns the heading, in degrees.
    #[inline]
    pub fn angle(&self) -> f32 {
        self.angle
    }

    /// Returns the number of attached primitives.
    #[inline]
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    /// Returns `true` when nothing is attached.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Iterates over the attached shapes resolved to world space.
    pub fn shapes(&self) -> impl Iterator<Item = PlacedShape> + '_ {
        self.shapes.iter().map(move |shape| {
            let center = self.center + shape.rotated_offset;
            match shape.primitive {
                Primitive::Circle { radius } => PlacedShape::Circle(Circle::new(center, radius)),
                Primitive::Rect { width, height } => PlacedShape::Rect(OrientedRect::new(
                    center,
                    Vec2::new(width * 0.5, height * 0.5),
                    self.angle,
                )),
            }
        })
    }

    /// Returns the union of the bounds of every attached shape, or `None` for
    /// an empty body.
    pub fn bounds(&self) -> Option<Rect> {
        self.shapes()
            .map(|shape| shape.bounds())
            .reduce(|acc, bounds| acc.merge(&bounds))
    }

    /// Returns `true` when any attached shape overlaps `obstacle`.
    pub fn collides_with(&self, obstacle: &Rect) -> bool {
        self.shapes().any(|shape| shape.overlaps(obstacle))
    }

    /// Returns `true` when any attached shape overlaps any of `obstacles`.
    pub fn collides_with_any(&self, obstacles: &[Rect]) -> bool {
        obstacles.iter().any(|obstacle| self.collides_with(obstacle))
    }

    /// Returns the index of the first obstacle the body overlaps.
    pub fn first_collision(&self, obstacles: &[Rect]) -> Option<usize> {
        obstacles.iter().position(|obstacle| self.collides_with(obstacle))
    }
}
