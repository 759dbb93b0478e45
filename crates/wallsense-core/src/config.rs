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

//! Tunable parameters for sensors and motion profiles.
//!
//! These are plain serde structures so hosts can keep them in scene files.
//! Missing fields fall back to the defaults below, which are the values the
//! reference micromouse simulation was tuned with.

use serde::{Deserialize, Serialize};

use crate::error::{check_range, KernelError};
use crate::math::Vec2;

/// Configuration of one fan-shaped proximity sensor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SensorConfig {
    /// Mounting point, relative to the body center, in the body frame.
    pub offset: Vec2,
    /// Direction of the fan center, relative to the body heading, in degrees.
    pub heading_offset: f32,
    /// Half the angle subtended by the fan, in degrees.
    pub half_angle: f32,
    /// Number of rays in the fan.
    pub ray_count: usize,
    /// Distance beyond which a ray reports a miss.
    pub max_range: f32,
    /// The `K` in the per-ray power `(K / d)^2`.
    pub power_constant: f32,
    /// Saturation level of the averaged power.
    pub power_cap: f32,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            offset: Vec2::ZERO,
            heading_offset: 0.0,
            half_angle: 5.0,
            ray_count: 16,
            max_range: 500.0,
            power_constant: 855.0,
            power_cap: 1024.0,
        }
    }
}

impl SensorConfig {
    /// Checks the parameters a fan cannot work without.
    pub fn validate(&self) -> Result<(), KernelError> {
        if self.ray_count == 0 {
            return Err(KernelError::InvalidRayCount(self.ray_count));
        }
        if !self.half_angle.is_finite() || self.half_angle < 0.0 {
            return Err(KernelError::InvalidHalfAngle(self.half_angle));
        }
        check_range(self.max_range)?;
        Ok(())
    }
}

/// Speed limits used to build a trapezoidal motion profile.
///
/// The distance is supplied per move, so it is not part of the configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileConfig {
    /// Cruise speed cap, in units per second.
    pub max_speed: f32,
    /// Speed at the end of the move.
    pub final_speed: f32,
    /// Magnitude of both the acceleration and the deceleration.
    pub acceleration: f32,
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            max_speed: 500.0,
            final_speed: 0.0,
            acceleration: 1000.0,
        }
    }
}
