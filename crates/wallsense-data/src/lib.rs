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

//! # Wallsense Data
//!
//! The data the host owns and hands to the kernel: occupancy fields built from
//! pixels or rectangles, obstacle sets, the micromouse maze layout, and the
//! scene files they are loaded from.

#![warn(missing_docs)]

pub mod error;
pub mod maze;
pub mod obstacles;
pub mod occupancy;
pub mod scene;

pub use error::DataError;
pub use maze::{Direction, MazeGeometry, MazeLayout, WallState};
pub use obstacles::ObstacleSet;
pub use occupancy::{OccupancyGrid, Rgba8, RgbaBitmap, WallRule};
pub use scene::{
    MazeDefinition, MoveDefinition, RobotDefinition, SceneDefinition, SensorDefinition,
    ShapeDefinition, WallDefinition,
};
