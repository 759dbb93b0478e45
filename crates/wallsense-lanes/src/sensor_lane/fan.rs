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

use wallsense_core::config::SensorConfig;
use wallsense_core::math::Vec2;
use wallsense_core::motion::Pose;
use wallsense_core::KernelError;

use crate::raycast_lane::RayTarget;

/// One averaged sensor sample.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct SensorReading {
    /// Mean of the per-ray powers `(K / d)^2`, clamped to the power cap.
    pub power: f32,
    /// Mean of the per-ray distances, clamped to the maximum range.
    pub distance: f32,
}

/// The outcome of one ray of the fan, kept for drawing.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct FanRay {
    /// Where the ray stopped.
    pub end: Vec2,
    /// Distance from the fan origin to `end`.
    pub distance: f32,
}

/// A proximity sensor modelled as a fan of rays.
///
/// Each update casts `ray_count` rays spread evenly over
/// `[heading - half_angle, heading + half_angle]` and averages two things
/// separately: the distances, and the per-ray power `(K / d)^2`. Power is
/// never derived from the averaged distance, because the inverse square is
/// not linear and a fan half on a near wall reads very differently from one
/// wholly at the mean distance.
#[derive(Debug, Clone)]
pub struct SensorFan {
    config: SensorConfig,
    origin: Vec2,
    heading: f32,
    rays: Vec<FanRay>,
    reading: SensorReading,
}

impl SensorFan {
    /// Creates a fan at the origin, pointing along `+x`.
    ///
    /// # Errors
    ///
    /// Returns the error from [`SensorConfig::validate`].
    pub fn new(config: SensorConfig) -> Result<Self, KernelError> {
        config.validate()?;
        Ok(Self {
            config,
            origin: Vec2::ZERO,
            heading: 0.0,
            rays: vec![FanRay::default(); config.ray_count],
            reading: SensorReading::default(),
        })
    }

    /// Returns the configuration.
    #[inline]
    pub fn config(&self) -> &SensorConfig {
        &self.config
    }

    /// Moves the fan origin.
    #[inline]
    pub fn set_origin(&mut self, origin: Vec2) {
        self.origin = origin;
    }

    /// Points the fan center along `heading`, in degrees (0 along `+x`).
    #[inline]
    pub fn set_heading(&mut self, heading: f32) {
        self.heading = heading;
    }

    /// Returns the fan origin.
    #[inline]
    pub fn origin(&self) -> Vec2 {
        self.origin
    }

    /// Returns the direction of the fan center, in degrees.
    #[inline]
    pub fn heading(&self) -> f32 {
        self.heading
    }

    /// Places the fan on a robot, using the configured mounting offset and
    /// heading offset in the robot's body frame.
    ///
    /// Robot headings point up the screen at 0 degrees, so the fan heading is
    /// the robot heading minus a quarter turn.
    pub fn attach_to(&mut self, pose: &Pose) {
        self.origin = pose.position() + self.config.offset.rotated_degrees(pose.theta);
        self.heading = pose.theta - 90.0 + self.config.heading_offset;
    }

    /// Returns the direction of ray `index`, in degrees.
    fn ray_angle(&self, index: usize) -> f32 {
        let count = self.config.ray_count;
        if count <= 1 {
            return self.heading;
        }
        let start = self.heading - self.config.half_angle;
        let step = 2.0 * self.config.half_angle / (count - 1) as f32;
        start + index as f32 * step
    }

    /// Casts every ray against `target` and returns the new reading.
    pub fn update<T: RayTarget + ?Sized>(&mut self, target: &T) -> SensorReading {
        let max_range = self.config.max_range;
        let k = self.config.power_constant;
        let mut total_power = 0.0;
        let mut total_distance = 0.0;

        for index in 0..self.rays.len() {
            let angle = self.ray_angle(index);
            let distance = target
                .ray_distance(self.origin, angle, max_range)
                .clamp(0.0, max_range);
            self.rays[index] = FanRay {
                end: self.origin + Vec2::from_angle_degrees(angle) * distance,
                distance,
            };

            let power = if distance > 0.0 {
                let ratio = k / distance;
                ratio * ratio
            } else {
                f32::INFINITY
            };
            total_power += power;
            total_distance += distance;
        }

        let count = self.rays.len() as f32;
        self.reading = SensorReading {
            power: (total_power / count).min(self.config.power_cap),
            distance: (total_distance / count).min(max_range),
        };
        self.reading
    }

    /// Returns the reading from the last update.
    #[inline]
    pub fn reading(&self) -> SensorReading {
        self.reading
    }

    /// Returns the rays from the last update, ordered from
    /// `heading - half_angle` to `heading + half_angle`.
    #[inline]
    pub fn rays(&self) -> &[FanRay] {
        &self.rays
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use wallsense_core::math::Rect;
    use wallsense_data::OccupancyGrid;

    use crate::raycast_lane::FieldTarget;

    fn fan(ray_count: usize, half_angle: f32) -> SensorFan {
        SensorFan::new(SensorConfig {
            ray_count,
            half_angle,
            ..SensorConfig::default()
        })
        .unwrap()
    }

    /// Records the angles it is queried with and reports a fixed distance.
    struct FixedTarget {
        distance: f32,
        angles: std::cell::RefCell<Vec<f32>>,
    }

    impl RayTarget for FixedTarget {
        fn ray_distance(&self, _origin: Vec2, angle: f32, _max_range: f32) -> f32 {
            self.angles.borrow_mut().push(angle);
            self.distance
        }
    }

    fn fixed(distance: f32) -> FixedTarget {
        FixedTarget {
            distance,
            angles: std::cell::RefCell::new(Vec::new()),
        }
    }

    #[test]
    fn test_fan_rejects_zero_rays() {
        assert!(matches!(
            SensorFan::new(SensorConfig {
                ray_count: 0,
                ..SensorConfig::default()
            }),
            Err(KernelError::InvalidRayCount(0))
        ));
    }

    #[test]
    fn test_fan_angles_span_inclusive() {
        let mut sensor = fan(5, 10.0);
        sensor.set_heading(30.0);
        let target = fixed(100.0);
        sensor.update(&target);
        let angles = target.angles.borrow();
        assert_eq!(angles.len(), 5);
        assert_relative_eq!(angles[0], 20.0);
        assert_relative_eq!(angles[2], 30.0);
        assert_relative_eq!(angles[4], 40.0);
    }

    #[test]
    fn test_fan_single_ray_follows_heading() {
        let mut sensor = fan(1, 10.0);
        sensor.set_heading(-45.0);
        let target = fixed(100.0);
        sensor.update(&target);
        assert_eq!(*target.angles.borrow(), vec![-45.0]);
    }

    #[test]
    fn test_fan_empty_target_reads_max_range() {
        let mut sensor = fan(16, 5.0);
        let empty: &[Rect] = &[];
        let reading = sensor.update(empty);
        assert_eq!(reading.distance, 500.0);
        // (855 / 500)^2
        assert_relative_eq!(reading.power, 2.924_1, epsilon = 1e-3);
        assert!(sensor
            .rays()
            .iter()
            .all(|ray| (ray.end.length() - 500.0).abs() < 1e-2));
    }

    #[test]
    fn test_fan_power_is_per_ray_average() {
        // Half of the rays see a wall at 100, half see nothing.
        struct Split;
        impl RayTarget for Split {
            fn ray_distance(&self, _origin: Vec2, angle: f32, max_range: f32) -> f32 {
                if angle < 0.0 {
                    100.0
                } else {
                    max_range
                }
            }
        }
        let mut sensor = fan(2, 10.0);
        let reading = sensor.update(&Split);
        let near = (855.0f32 / 100.0).powi(2);
        let far = (855.0f32 / 500.0).powi(2);
        assert_relative_eq!(reading.power, (near + far) / 2.0, epsilon = 1e-3);
        assert_relative_eq!(reading.distance, 300.0);
        // Power of the averaged distance would be much smaller.
        assert!(reading.power > (855.0f32 / 300.0).powi(2) * 2.0);
    }

    #[test]
    fn test_fan_power_is_capped() {
        let mut sensor = fan(4, 5.0);
        let reading = sensor.update(&fixed(1.0));
        assert_eq!(reading.power, 1024.0);
        let reading = sensor.update(&fixed(0.0));
        assert_eq!(reading.power, 1024.0);
        assert_eq!(reading.distance, 0.0);
    }

    #[test]
    fn test_fan_origin_inside_obstacle_saturates() {
        let mut sensor = fan(8, 5.0);
        sensor.set_origin(Vec2::new(5.0, 5.0));
        let walls = vec![Rect::from_xywh(0.0, 0.0, 10.0, 10.0)];
        let reading = sensor.update(&walls);
        assert_eq!(reading.distance, 0.0);
        assert_eq!(reading.power, 1024.0);
    }

    #[test]
    fn test_fan_attach_to_robot_pose() {
        let mut sensor = SensorFan::new(SensorConfig {
            offset: Vec2::new(10.0, -20.0),
            heading_offset: 30.0,
            ..SensorConfig::default()
        })
        .unwrap();
        sensor.attach_to(&Pose::new(100.0, 100.0, 90.0));
        // Body frame rotated a quarter turn: (10, -20) becomes (20, 10).
        assert_relative_eq!(sensor.origin().x, 120.0, epsilon = 1e-4);
        assert_relative_eq!(sensor.origin().y, 110.0, epsilon = 1e-4);
        assert_relative_eq!(sensor.heading(), 30.0);
    }

    #[test]
    fn test_fan_huge_range_over_grid() {
        let mut sensor = SensorFan::new(SensorConfig {
            max_range: 3.0e9,
            ..SensorConfig::default()
        })
        .unwrap();
        sensor.set_origin(Vec2::new(50.0, 50.0));
        let grid = OccupancyGrid::new(100, 100);
        let reading = sensor.update(&FieldTarget(&grid));
        assert_eq!(reading.distance, 3.0e9);
        assert!(reading.power < 1e-9);
    }

    #[test]
    fn test_fan_closer_wall_reads_stronger() {
        let mut sensor = fan(16, 5.0);
        let mut last = SensorReading {
            power: 0.0,
            distance: f32::INFINITY,
        };
        for wall_x in [400.0, 300.0, 200.0, 100.0] {
            let walls = vec![Rect::from_xywh(wall_x, -200.0, 12.0, 400.0)];
            let reading = sensor.update(&walls);
            assert!(reading.power > last.power);
            assert!(reading.distance < last.distance);
            last = reading;
        }
    }
}
