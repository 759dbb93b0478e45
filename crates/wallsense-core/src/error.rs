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

//! Defines the error type for the geometric kernel.
//!
//! Kernel operations are total: misses, empty obstacle lists and degenerate
//! shapes all produce well-defined results. The only failures are programmer
//! errors in the parameters handed to a constructor or initializer.

use std::fmt;

/// A rejected kernel parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum KernelError {
    /// A sensor fan was configured with no rays.
    InvalidRayCount(usize),
    /// A range was negative or not finite.
    NegativeRange(f32),
    /// A fan half-angle was negative or not finite.
    InvalidHalfAngle(f32),
    /// An acceleration was zero, negative or not finite.
    InvalidAcceleration(f32),
    /// A motion profile was asked for an impossible move.
    InvalidProfile {
        /// Which parameter was rejected.
        parameter: &'static str,
        /// The rejected value.
        value: f32,
    },
}

impl fmt::Display for KernelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KernelError::InvalidRayCount(count) => {
                write!(f, "Sensor fan needs at least one ray, got {count}")
            }
            KernelError::NegativeRange(range) => {
                write!(f, "Range must be finite and non-negative, got {range}")
            }
            KernelError::InvalidHalfAngle(angle) => {
                write!(f, "Half-angle must be finite and non-negative, got {angle}")
            }
            KernelError::InvalidAcceleration(acc) => {
                write!(f, "Acceleration must be finite and positive, got {acc}")
            }
            KernelError::InvalidProfile { parameter, value } => {
                write!(f, "Invalid motion profile {parameter}: {value}")
            }
        }
    }
}

impl std::error::Error for KernelError {}

/// Checks that `range` is a usable maximum range.
pub(crate) fn check_range(range: f32) -> Result<f32, KernelError> {
    if range.is_finite() && range >= 0.0 {
        Ok(range)
    } else {
        Err(KernelError::NegativeRange(range))
    }
}
