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

//! # Wallsense Lanes
//!
//! The per-tick hot paths of the simulator: pixel ray casting, sensor fans,
//! and the point-sampled collision shield. Everything here is synchronous
//! and allocation-free once constructed.

#![warn(missing_docs)]

pub mod collision_lane;
pub mod raycast_lane;
pub mod sensor_lane;

pub use collision_lane::CollisionShield;
pub use raycast_lane::{cast, FieldTarget, RayHit, RayOutcome, RayTarget};
pub use sensor_lane::{FanRay, SensorFan, SensorReading};
