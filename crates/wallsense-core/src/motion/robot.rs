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

//! Kinematic model of a two-wheeled robot.
//!
//! Headings are in degrees with 0 pointing up the screen (towards negative
//! y) and increasing clockwise on screen.

use serde::{Deserialize, Serialize};

use crate::math::{fold_heading, Vec2};

/// Position and heading of the robot.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    /// Horizontal position.
    pub x: f32,
    /// Vertical position, growing downwards on screen.
    pub y: f32,
    /// Heading in degrees.
    pub theta: f32,
}

impl Pose {
    /// Creates a new `Pose`.
    pub const fn new(x: f32, y: f32, theta: f32) -> Self {
        Self { x, y, theta }
    }

    /// Returns the position part of the pose.
    #[inline]
    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// Returns the unit vector the robot faces.
    #[inline]
    pub fn forward(&self) -> Vec2 {
        Vec2::from_angle_degrees(self.theta - 90.0)
    }
}

/// Commanded speeds.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Velocity {
    /// Forward speed, in units per second.
    pub linear: f32,
    /// Turn rate, in degrees per second.
    pub angular: f32,
}

/// Integrates a pose from commanded velocities.
///
/// There is no dynamics: the robot instantly moves at whatever speed it is
/// told. Speed shaping is the job of a [`super::MotionProfile`].
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct RobotModel {
    pose: Pose,
    velocity: Velocity,
}

impl RobotModel {
    /// Creates a stationary robot at the given pose.
    pub fn new(pose: Pose) -> Self {
        Self {
            pose,
            velocity: Velocity::default(),
        }
    }

    /// Returns the current pose.
    #[inline]
    pub fn pose(&self) -> Pose {
        self.pose
    }

    /// Returns the commanded velocity.
    #[inline]
    pub fn velocity(&self) -> Velocity {
        self.velocity
    }

    /// Sets both commanded speeds.
    pub fn set_velocities(&mut self, linear: f32, angular: f32) {
        self.velocity = Velocity { linear, angular };
    }

    /// Sets the forward speed.
    pub fn set_speed(&mut self, linear: f32) {
        self.velocity.linear = linear;
    }

    /// Sets the turn rate.
    pub fn set_omega(&mut self, angular: f32) {
        self.velocity.angular = angular;
    }

    /// Teleports the robot without changing its heading.
    pub fn set_position(&mut self, position: Vec2) {
        self.pose.x = position.x;
        self.pose.y = position.y;
    }

    /// Sets the heading, in degrees.
    pub fn set_angle(&mut self, theta: f32) {
        self.pose.theta = theta;
    }

    /// Replaces the whole pose.
    pub fn set_pose(&mut self, pose: Pose) {
        self.pose = pose;
    }

    /// Shifts the robot by `delta`.
    pub fn translate(&mut self, delta: Vec2) {
        self.pose.x += delta.x;
        self.pose.y += delta.y;
    }

    /// Turns the robot by `delta` degrees.
    pub fn rotate(&mut self, delta: f32) {
        self.pose.theta += delta;
    }

    /// Returns the pose the robot would reach after `dt` seconds.
    ///
    /// The heading is integrated first, then the position moves along the new
    /// heading. Theta is kept within `(-360, 360]`.
    pub fn predict(&self, dt: f32) -> Pose {
        let theta = fold_heading(self.pose.theta + self.velocity.angular * dt);
        let next = Pose { theta, ..self.pose };
        let step = next.forward() * (self.velocity.linear * dt);
        Pose {
            x: next.x + step.x,
            y: next.y + step.y,
            theta,
        }
    }

    /// Advances the pose by `dt` seconds.
    pub fn update(&mut self, dt: f32) {
        self.pose = self.predict(dt);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_robot_heading_zero_moves_up() {
        let mut robot = RobotModel::new(Pose::new(100.0, 100.0, 0.0));
        robot.set_speed(100.0);
        robot.update(1.0);
        let pose = robot.pose();
        assert_abs_diff_eq!(pose.x, 100.0, epsilon = 1e-3);
        assert_abs_diff_eq!(pose.y, 0.0, epsilon = 1e-3);
    }

    #[test]
    fn test_robot_heading_ninety_moves_right() {
        let mut robot = RobotModel::new(Pose::new(0.0, 0.0, 90.0));
        robot.set_speed(10.0);
        robot.update(0.5);
        assert_abs_diff_eq!(robot.pose().x, 5.0, epsilon = 1e-4);
        assert_abs_diff_eq!(robot.pose().y, 0.0, epsilon = 1e-4);
    }

    #[test]
    fn test_robot_turns_before_moving() {
        let mut robot = RobotModel::new(Pose::default());
        robot.set_velocities(10.0, 90.0);
        robot.update(1.0);
        let pose = robot.pose();
        assert_abs_diff_eq!(pose.theta, 90.0);
        assert_abs_diff_eq!(pose.x, 10.0, epsilon = 1e-4);
        assert_abs_diff_eq!(pose.y, 0.0, epsilon = 1e-4);
    }

    #[test]
    fn test_robot_heading_wraps() {
        let mut robot = RobotModel::new(Pose::new(0.0, 0.0, 350.0));
        robot.set_omega(20.0);
        robot.update(1.0);
        assert_abs_diff_eq!(robot.pose().theta, 10.0, epsilon = 1e-4);

        let mut robot = RobotModel::new(Pose::new(0.0, 0.0, -350.0));
        robot.set_omega(-20.0);
        robot.update(1.0);
        assert_abs_diff_eq!(robot.pose().theta, -10.0, epsilon = 1e-4);
    }

    #[test]
    fn test_robot_predict_does_not_move() {
        let mut robot = RobotModel::new(Pose::new(1.0, 2.0, 0.0));
        robot.set_speed(50.0);
        let predicted = robot.predict(1.0);
        assert_eq!(robot.pose(), Pose::new(1.0, 2.0, 0.0));
        robot.update(1.0);
        assert_eq!(robot.pose(), predicted);
    }
}
