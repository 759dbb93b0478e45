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

//! # Occupancy Fields
//!
//! The interface contract between pixel-level ray casting and whatever the
//! host uses to describe its scene (an RGBA bitmap, a boolean grid, ...).

/// A read-only 2D classification of integer cells into free space or obstacle.
///
/// Implementations are owned by the host and borrowed for the duration of a
/// cast. They must not be mutated while a cast is in progress.
pub trait OccupancyField {
    /// Number of columns.
    fn width(&self) -> u32;

    /// Number of rows.
    fn height(&self) -> u32;

    /// Returns `true` when the in-bounds cell `(x, y)` blocks rays.
    ///
    /// Callers check bounds with [`OccupancyField::contains`] first;
    /// implementations may treat out-of-range coordinates as free.
    fn is_obstacle(&self, x: u32, y: u32) -> bool;

    /// Returns `true` when `(x, y)` lies inside the field.
    #[inline]
    fn contains(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as u32) < self.width() && (y as u32) < self.height()
    }
}

impl<F: OccupancyField + ?Sized> OccupancyField for &F {
    fn width(&self) -> u32 {
        (**self).width()
    }

    fn height(&self) -> u32 {
        (**self).height()
    }

    fn is_obstacle(&self, x: u32, y: u32) -> bool {
        (**self).is_obstacle(x, y)
    }
}
