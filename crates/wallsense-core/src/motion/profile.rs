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

//! Trapezoidal speed profiles.

use serde::{Deserialize, Serialize};

use crate::config::ProfileConfig;
use crate::error::KernelError;

/// The stage a [`MotionProfile`] is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Speeding up towards the peak speed.
    Accelerating,
    /// Holding the peak speed.
    Cruising,
    /// Slowing down towards the final speed.
    Decelerating,
    /// The full distance has been covered.
    Complete,
}

/// A trapezoidal speed profile over a fixed distance.
///
/// The profile accelerates from rest, cruises, then decelerates to the final
/// speed. When the distance is too short to reach the maximum speed, the
/// cruise phase vanishes and the peak speed is lowered so that the profile
/// becomes triangular.
///
/// Integration is explicit Euler with the step supplied by the caller, so the
/// final position is only guaranteed to be within one step's displacement of
/// the requested distance.
#[derive(Debug, Clone, PartialEq)]
pub struct MotionProfile {
    distance: f32,
    max_speed: f32,
    final_speed: f32,
    acceleration: f32,
    peak_speed: f32,
    accel_distance: f32,
    cruise_distance: f32,
    decel_distance: f32,
    speed: f32,
    position: f32,
    phase: Phase,
}

impl Default for MotionProfile {
    /// An empty profile that is already complete.
    fn default() -> Self {
        Self {
            distance: 0.0,
            max_speed: 0.0,
            final_speed: 0.0,
            acceleration: 0.0,
            peak_speed: 0.0,
            accel_distance: 0.0,
            cruise_distance: 0.0,
            decel_distance: 0.0,
            speed: 0.0,
            position: 0.0,
            phase: Phase::Complete,
        }
    }
}

impl MotionProfile {
    /// Creates a profile ready to run.
    ///
    /// # Errors
    ///
    /// See [`MotionProfile::init`].
    pub fn new(
        distance: f32,
        max_speed: f32,
        final_speed: f32,
        acceleration: f32,
    ) -> Result<Self, KernelError> {
        let mut profile = Self::default();
        profile.init(distance, max_speed, final_speed, acceleration)?;
        Ok(profile)
    }

    /// Creates a profile for `distance` using configured speed limits.
    pub fn from_config(distance: f32, config: &ProfileConfig) -> Result<Self, KernelError> {
        Self::new(
            distance,
            config.max_speed,
            config.final_speed,
            config.acceleration,
        )
    }

    /// Resets the profile for a new move and precomputes the phase distances.
    ///
    /// # Errors
    ///
    /// - [`KernelError::InvalidAcceleration`] if `acceleration` is not a
    ///   finite positive number.
    /// - [`KernelError::InvalidProfile`] if `distance` is negative,
    ///   `max_speed` is not positive, or `final_speed` lies outside
    ///   `[0, max_speed]`.
    ///
    /// On error the profile is left unchanged.
    pub fn init(
        &mut self,
        distance: f32,
        max_speed: f32,
        final_speed: f32,
        acceleration: f32,
    ) -> Result<(), KernelError> {
        if !acceleration.is_finite() || acceleration <= 0.0 {
            return Err(KernelError::InvalidAcceleration(acceleration));
        }
        if !distance.is_finite() || distance < 0.0 {
            return Err(KernelError::InvalidProfile {
                parameter: "distance",
                value: distance,
            });
        }
        if !max_speed.is_finite() || max_speed <= 0.0 {
            return Err(KernelError::InvalidProfile {
                parameter: "max_speed",
                value: max_speed,
            });
        }
        if !final_speed.is_finite() || !(0.0..=max_speed).contains(&final_speed) {
            return Err(KernelError::InvalidProfile {
                parameter: "final_speed",
                value: final_speed,
            });
        }

        let two_a = 2.0 * acceleration;
        let vf2 = final_speed * final_speed;
        let mut peak_speed = max_speed;
        let mut accel_distance = max_speed * max_speed / two_a;
        let mut decel_distance = (max_speed * max_speed - vf2) / two_a;
        let mut cruise_distance = (distance - accel_distance - decel_distance).max(0.0);

        if accel_distance + decel_distance > distance {
            peak_speed = ((two_a * distance + vf2) / 2.0).sqrt();
            accel_distance = (peak_speed * peak_speed - vf2) / two_a;
            decel_distance = accel_distance;
            cruise_distance = 0.0;
            log::debug!(
                "Profile over {distance} too short for {max_speed}, peak lowered to {peak_speed}"
            );
        }

        *self = Self {
            distance,
            max_speed,
            final_speed,
            acceleration,
            peak_speed,
            accel_distance,
            cruise_distance,
            decel_distance,
            speed: 0.0,
            position: 0.0,
            phase: Phase::Accelerating,
        };
        Ok(())
    }

    /// Advances the profile by `dt` seconds and returns the current speed.
    ///
    /// Once [`Phase::Complete`] is reached further calls change nothing and
    /// return the final speed.
    pub fn update(&mut self, dt: f32) -> f32 {
        match self.phase {
            Phase::Accelerating => {
                self.speed = (self.speed + self.acceleration * dt).min(self.peak_speed);
                self.position += self.speed * dt;
                if self.position >= self.accel_distance {
                    self.enter(Phase::Cruising);
                }
            }
            Phase::Cruising => {
                // A triangular profile can leave acceleration below the peak.
                self.speed = (self.speed + self.acceleration * dt).min(self.peak_speed);
                self.position += self.speed * dt;
                if self.position >= self.accel_distance + self.cruise_distance {
                    self.enter(Phase::Decelerating);
                }
            }
            Phase::Decelerating => {
                self.speed = (self.speed - self.acceleration * dt).max(self.final_speed);
                self.position += self.speed * dt;
                // With a final speed of zero, rounding can leave the position a
                // hair short of the target after the speed has bottomed out.
                let stalled = self.speed <= 0.0 && self.position < self.distance;
                if self.position >= self.distance || stalled {
                    self.speed = self.final_speed;
                    self.enter(Phase::Complete);
                }
            }
            Phase::Complete => {}
        }
        self.speed
    }

    fn enter(&mut self, phase: Phase) {
        log::trace!(
            "Profile {:?} -> {:?} at position {} speed {}",
            self.phase,
            phase,
            self.position,
            self.speed
        );
        self.phase = phase;
    }

    /// Returns the current phase.
    #[inline]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Returns `true` once the whole distance has been covered.
    #[inline]
    pub fn is_complete(&self) -> bool {
        self.phase == Phase::Complete
    }

    /// Returns the current speed.
    #[inline]
    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Returns the distance covered so far.
    #[inline]
    pub fn position(&self) -> f32 {
        self.position
    }

    /// Returns the requested distance.
    #[inline]
    pub fn distance(&self) -> f32 {
        self.distance
    }

    /// Returns the configured maximum speed.
    #[inline]
    pub fn max_speed(&self) -> f32 {
        self.max_speed
    }

    /// Returns the final speed.
    #[inline]
    pub fn final_speed(&self) -> f32 {
        self.final_speed
    }

    /// Returns the acceleration magnitude.
    #[inline]
    pub fn acceleration(&self) -> f32 {
        self.acceleration
    }

    /// Returns the speed actually reached, which is below the maximum speed
    /// for a triangular profile.
    #[inline]
    pub fn peak_speed(&self) -> f32 {
        self.peak_speed
    }

    /// Returns the length of the acceleration phase.
    #[inline]
    pub fn accel_distance(&self) -> f32 {
        self.accel_distance
    }

    /// Returns the length of the cruise phase.
    #[inline]
    pub fn cruise_distance(&self) -> f32 {
        self.cruise_distance
    }

    /// Returns the length of the deceleration phase.
    #[inline]
    pub fn decel_distance(&self) -> f32 {
        self.decel_distance
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const DT: f32 = 0.001;

    /// Steps until complete, with a cap so a broken profile fails instead of hanging.
    fn run_to_completion(profile: &mut MotionProfile) -> Vec<Phase> {
        let mut phases = vec![profile.phase()];
        for _ in 0..1_000_000 {
            if profile.is_complete() {
                return phases;
            }
            profile.update(DT);
            if phases.last() != Some(&profile.phase()) {
                phases.push(profile.phase());
            }
        }
        panic!("profile did not complete: {profile:?}");
    }

    #[test]
    fn test_profile_phase_distances() {
        let profile = MotionProfile::new(1000.0, 500.0, 0.0, 1000.0).unwrap();
        assert_relative_eq!(profile.accel_distance(), 125.0);
        assert_relative_eq!(profile.decel_distance(), 125.0);
        assert_relative_eq!(profile.cruise_distance(), 750.0);
        assert_eq!(profile.peak_speed(), 500.0);
        assert_eq!(profile.phase(), Phase::Accelerating);
    }

    #[test]
    fn test_profile_runs_to_completion() {
        let mut profile = MotionProfile::new(1000.0, 500.0, 0.0, 1000.0).unwrap();
        let phases = run_to_completion(&mut profile);
        assert_eq!(
            phases,
            vec![
                Phase::Accelerating,
                Phase::Cruising,
                Phase::Decelerating,
                Phase::Complete
            ]
        );
        assert!((profile.position() - 1000.0).abs() <= 500.0 * DT);
        assert_eq!(profile.speed(), 0.0);
    }

    #[test]
    fn test_profile_speed_never_exceeds_max() {
        let mut profile = MotionProfile::new(1000.0, 500.0, 0.0, 1000.0).unwrap();
        while !profile.is_complete() {
            let speed = profile.update(DT);
            assert!(speed <= 500.0);
            assert!(speed >= 0.0);
            if profile.phase() == Phase::Cruising {
                assert_eq!(speed, 500.0);
            }
        }
    }

    #[test]
    fn test_profile_speed_is_continuous() {
        let limit = 1000.0 * DT * 1.001;
        let cases = [(1000.0, 0.0), (100.0, 0.0), (100.0, 200.0), (600.0, 200.0)];
        for (distance, final_speed) in cases {
            let mut profile = MotionProfile::new(distance, 500.0, final_speed, 1000.0).unwrap();
            let mut last = profile.speed();
            while !profile.is_complete() {
                let speed = profile.update(DT);
                // Completion snaps to the final speed.
                if !profile.is_complete() || final_speed > 0.0 {
                    assert!(
                        (speed - last).abs() <= limit,
                        "{distance}/{final_speed}: {last} -> {speed} in {:?}",
                        profile.phase()
                    );
                }
                last = speed;
            }
        }
    }

    #[test]
    fn test_profile_triangular_when_too_short() {
        let mut profile = MotionProfile::new(100.0, 500.0, 0.0, 1000.0).unwrap();
        assert_eq!(profile.cruise_distance(), 0.0);
        // sqrt(2 * 1000 * 100 / 2)
        assert_relative_eq!(profile.peak_speed(), 316.227_77, epsilon = 1e-3);
        assert_relative_eq!(profile.accel_distance(), 50.0, epsilon = 1e-3);
        assert_relative_eq!(profile.decel_distance(), 50.0, epsilon = 1e-3);

        run_to_completion(&mut profile);
        let overshoot = profile.position() - 100.0;
        assert!(overshoot <= profile.peak_speed() * DT, "overshoot {overshoot}");
        assert!(overshoot > -profile.peak_speed() * DT);
    }

    #[test]
    fn test_profile_with_final_speed() {
        let mut profile = MotionProfile::new(600.0, 500.0, 200.0, 1000.0).unwrap();
        assert_relative_eq!(profile.decel_distance(), 105.0);
        run_to_completion(&mut profile);
        assert_eq!(profile.speed(), 200.0);
    }

    #[test]
    fn test_profile_complete_is_idempotent() {
        let mut profile = MotionProfile::new(10.0, 100.0, 0.0, 1000.0).unwrap();
        run_to_completion(&mut profile);
        let position = profile.position();
        for _ in 0..10 {
            assert_eq!(profile.update(DT), 0.0);
        }
        assert_eq!(profile.position(), position);
        assert_eq!(profile.phase(), Phase::Complete);
    }

    #[test]
    fn test_profile_zero_distance_completes() {
        let mut profile = MotionProfile::new(0.0, 500.0, 0.0, 1000.0).unwrap();
        run_to_completion(&mut profile);
        assert!(profile.position() <= 500.0 * DT);
    }

    #[test]
    fn test_profile_rejects_bad_parameters() {
        assert_eq!(
            MotionProfile::new(100.0, 500.0, 0.0, 0.0),
            Err(KernelError::InvalidAcceleration(0.0))
        );
        assert!(matches!(
            MotionProfile::new(-1.0, 500.0, 0.0, 1000.0),
            Err(KernelError::InvalidProfile {
                parameter: "distance",
                ..
            })
        ));
        assert!(matches!(
            MotionProfile::new(100.0, 0.0, 0.0, 1000.0),
            Err(KernelError::InvalidProfile {
                parameter: "max_speed",
                ..
            })
        ));
        assert!(matches!(
            MotionProfile::new(100.0, 500.0, 600.0, 1000.0),
            Err(KernelError::InvalidProfile {
                parameter: "final_speed",
                ..
            })
        ));
    }

    #[test]
    fn test_profile_failed_init_keeps_state() {
        let mut profile = MotionProfile::new(1000.0, 500.0, 0.0, 1000.0).unwrap();
        profile.update(DT);
        let before = profile.clone();
        assert!(profile.init(100.0, 500.0, 0.0, -1.0).is_err());
        assert_eq!(profile, before);
    }

    #[test]
    fn test_profile_default_is_complete() {
        let mut profile = MotionProfile::default();
        assert!(profile.is_complete());
        assert_eq!(profile.update(DT), 0.0);
    }

    #[test]
    fn test_profile_from_config() {
        let profile = MotionProfile::from_config(1000.0, &ProfileConfig::default()).unwrap();
        assert_relative_eq!(profile.cruise_distance(), 750.0);
    }
}
