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

//! # Collision Detection
//!
//! Narrow-phase overlap tests between the primitive shapes and the composite
//! collision bodies built from them.
//!
//! There is no broad phase here: callers pass in the obstacles near the body
//! (typically the current maze cell and its eight neighbours) and every test
//! runs against exactly that slice.

pub mod collision;
pub mod composite;

pub use collision::{
    circle_hits_oriented_rect, circle_hits_rect, point_hits_rect, ray_hits_rect, rects_overlap,
};
pub use composite::{CollisionGeometry, PlacedShape, Primitive};
