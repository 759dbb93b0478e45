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

//! Static axis-aligned obstacles.

use std::ops::Deref;

use serde::{Deserialize, Serialize};
use wallsense_core::math::Rect;

/// An owned list of axis-aligned obstacle rectangles, such as walls and posts.
///
/// Dereferences to `[Rect]`, so it can be passed anywhere the kernel expects
/// a slice of obstacles.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObstacleSet {
    rects: Vec<Rect>,
}

impl ObstacleSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty set with room for `capacity` rectangles.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            rects: Vec::with_capacity(capacity),
        }
    }

    /// Adds an obstacle.
    pub fn push(&mut self, rect: Rect) {
        self.rects.push(rect);
    }

    /// Removes every obstacle, keeping the allocation.
    pub fn clear(&mut self) {
        self.rects.clear();
    }

    /// Returns the obstacles as a slice.
    #[inline]
    pub fn as_slice(&self) -> &[Rect] {
        &self.rects
    }

    /// Returns the obstacles that intersect `region`.
    pub fn within(&self, region: &Rect) -> ObstacleSet {
        self.rects
            .iter()
            .filter(|rect| rect.intersects(region))
            .copied()
            .collect()
    }

    /// Returns the bounding box of every obstacle, or `None` when empty.
    pub fn bounds(&self) -> Option<Rect> {
        self.rects
            .iter()
            .copied()
            .reduce(|acc, rect| acc.merge(&rect))
    }
}

impl Deref for ObstacleSet {
    type Target = [Rect];

    fn deref(&self) -> &Self::Target {
        &self.rects
    }
}

impl AsRef<[Rect]> for ObstacleSet {
    fn as_ref(&self) -> &[Rect] {
        &self.rects
    }
}

impl From<Vec<Rect>> for ObstacleSet {
    fn from(rects: Vec<Rect>) -> Self {
        Self { rects }
    }
}

impl FromIterator<Rect> for ObstacleSet {
    fn from_iter<I: IntoIterator<Item = Rect>>(iter: I) -> Self {
        Self {
            rects: iter.into_iter().collect(),
        }
    }
}

impl Extend<Rect> for ObstacleSet {
    fn extend<I: IntoIterator<Item = Rect>>(&mut self, iter: I) {
        self.rects.extend(iter);
    }
}

impl<'a> IntoIterator for &'a ObstacleSet {
    type Item = &'a Rect;
    type IntoIter = std::slice::Iter<'a, Rect>;

    fn into_iter(self) -> Self::IntoIter {
        self.rects.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_obstacle_set_derefs_to_slice() {
        let set: ObstacleSet = vec![Rect::from_xywh(0.0, 0.0, 1.0, 1.0)].into();
        let slice: &[Rect] = &set;
        assert_eq!(slice.len(), 1);
        assert!(!set.is_empty());
    }

    #[test]
    fn test_obstacle_set_within_region() {
        let set: ObstacleSet = [
            Rect::from_xywh(0.0, 0.0, 10.0, 10.0),
            Rect::from_xywh(100.0, 100.0, 10.0, 10.0),
        ]
        .into_iter()
        .collect();
        let near = set.within(&Rect::from_xywh(5.0, 5.0, 20.0, 20.0));
        assert_eq!(near.len(), 1);
        assert_eq!(near[0], set[0]);
    }

    #[test]
    fn test_obstacle_set_bounds() {
        let mut set = ObstacleSet::new();
        assert!(set.bounds().is_none());
        set.push(Rect::from_xywh(0.0, 0.0, 10.0, 10.0));
        set.push(Rect::from_xywh(20.0, -5.0, 1.0, 1.0));
        let bounds = set.bounds().unwrap();
        assert_eq!(bounds, Rect::from_xywh(0.0, -5.0, 21.0, 15.0));
    }
}
