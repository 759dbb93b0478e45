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

use serde::{Deserialize, Serialize};

/// First-order exponential smoothing.
///
/// Each sample moves the output a fraction `1 - alpha` of the way towards the
/// new input: `value = alpha * value + (1 - alpha) * x`. An `alpha` of zero
/// passes samples straight through; values close to one smooth heavily.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExpFilter {
    alpha: f32,
    value: f32,
}

impl Default for ExpFilter {
    fn default() -> Self {
        Self::new(0.5)
    }
}

impl ExpFilter {
    /// Creates a filter starting at zero. `alpha` is clamped to `[0, 1]`.
    pub fn new(alpha: f32) -> Self {
        Self {
            alpha: alpha.clamp(0.0, 1.0),
            value: 0.0,
        }
    }

    /// Creates a filter whose output starts at `initial`.
    pub fn with_value(alpha: f32, initial: f32) -> Self {
        Self {
            value: initial,
            ..Self::new(alpha)
        }
    }

    /// Feeds one sample and returns the smoothed value.
    pub fn update(&mut self, x: f32) -> f32 {
        self.value = self.alpha * self.value + (1.0 - self.alpha) * x;
        self.value
    }

    /// Returns the smoothed value.
    #[inline]
    pub fn value(&self) -> f32 {
        self.value
    }

    /// Returns the smoothing factor.
    #[inline]
    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    /// Forces the output to `value`.
    pub fn reset(&mut self, value: f32) {
        self.value = value;
    }
}
