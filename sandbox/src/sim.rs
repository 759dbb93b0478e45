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

//! A headless maze run: motion profiles drive the robot, the collision body
//! vets every step, and the sensor worker reads the walls.

use std::sync::Arc;

use anyhow::{bail, Result};
use wallsense_core::config::ProfileConfig;
use wallsense_core::math::{fold_heading, Rect};
use wallsense_core::motion::{ExpFilter, MotionProfile, Pose, RobotModel};
use wallsense_core::physics::CollisionGeometry;
use wallsense_data::{MazeLayout, MoveDefinition, SceneDefinition};
use wallsense_lanes::{SensorFan, SensorReading};

use crate::worker::{PoseSnapshot, SensorFrame, SensorWorker};

/// Capacity of the sensor channels.
const SENSOR_QUEUE: usize = 64;
/// Weight of the previous value in the power smoothing filters.
const SENSOR_SMOOTHING: f32 = 0.5;
/// Upper bound on the ticks a single move may take.
const MAX_TICKS_PER_MOVE: u64 = 1_000_000;

/// How a move ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    Completed,
    Blocked,
}

/// Summary of a finished run.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub moves_completed: usize,
    pub blocked: bool,
    pub ticks: u64,
    pub elapsed: f32,
    pub final_pose: Pose,
    pub frames: u64,
    pub dropped_snapshots: u64,
    /// Smoothed power and last raw reading, per named sensor.
    pub sensors: Vec<(String, f32, SensorReading)>,
}

/// One simulated robot in one maze.
pub struct Simulation {
    maze: Arc<MazeLayout>,
    robot: RobotModel,
    body: CollisionGeometry,
    profile: ProfileConfig,
    turn_profile: ProfileConfig,
    moves: Vec<MoveDefinition>,
    dt: f32,
    ticks: u64,
    sensor_names: Vec<String>,
    filters: Vec<ExpFilter>,
    last_readings: Vec<SensorReading>,
    frames: u64,
    worker: SensorWorker,
}

impl Simulation {
    /// Builds the maze, robot and sensors of `scene` and starts the sensor
    /// worker.
    pub fn new(scene: &SceneDefinition, dt: f32) -> Result<Self> {
        if !dt.is_finite() || dt <= 0.0 {
            bail!("time step must be positive, got {dt}");
        }
        scene.validate()?;

        let maze = Arc::new(scene.build_maze()?);
        let pose = scene.start_pose(&maze);
        let mut body = scene.build_body();
        body.set_position(pose.position());
        body.set_rotation(pose.theta);

        let fans = scene
            .sensors
            .iter()
            .map(|sensor| SensorFan::new(sensor.config))
            .collect::<Result<Vec<_>, _>>()?;
        let sensor_names: Vec<String> = scene.sensors.iter().map(|s| s.name.clone()).collect();
        let filters = vec![ExpFilter::new(SENSOR_SMOOTHING); fans.len()];
        let last_readings = vec![SensorReading::default(); fans.len()];

        log::info!(
            "Scene: {}x{} maze, {} body shapes, {} sensors, {} moves, dt = {dt}s",
            maze.width(),
            maze.height(),
            body.len(),
            fans.len(),
            scene.moves.len()
        );

        let worker = SensorWorker::spawn(Arc::clone(&maze), fans, SENSOR_QUEUE);
        Ok(Self {
            maze,
            robot: RobotModel::new(pose),
            body,
            profile: scene.profile,
            turn_profile: scene.turn_profile,
            moves: scene.moves.clone(),
            dt,
            ticks: 0,
            sensor_names,
            filters,
            last_readings,
            frames: 0,
            worker,
        })
    }

    pub fn robot(&self) -> &RobotModel {
        &self.robot
    }

    pub fn body(&self) -> &CollisionGeometry {
        &self.body
    }

    pub fn maze(&self) -> &MazeLayout {
        &self.maze
    }

    /// Performs every move in order, stopping at the first blocked one, then
    /// shuts the sensor worker down.
    pub fn run(&mut self) -> Result<RunReport> {
        let moves = self.moves.clone();
        let mut moves_completed = 0;
        let mut blocked = false;

        for (index, command) in moves.iter().enumerate() {
            log::info!("Move {}/{}: {:?}", index + 1, moves.len(), command);
            match self.perform(*command)? {
                MoveOutcome::Completed => moves_completed += 1,
                MoveOutcome::Blocked => {
                    blocked = true;
                    break;
                }
            }
        }

        for frame in self.worker.shutdown() {
            self.absorb(frame);
        }

        let sensors = self
            .sensor_names
            .iter()
            .zip(&self.filters)
            .zip(&self.last_readings)
            .map(|((name, filter), reading)| (name.clone(), filter.value(), *reading))
            .collect();

        Ok(RunReport {
            moves_completed,
            blocked,
            ticks: self.ticks,
            elapsed: self.ticks as f32 * self.dt,
            final_pose: self.robot.pose(),
            frames: self.frames,
            dropped_snapshots: self.worker.dropped(),
            sensors,
        })
    }

    /// Drives one move to completion with a fresh motion profile.
    ///
    /// Negative distances and angles run the same profile in reverse. A turn
    /// settles onto the commanded heading once its profile completes.
    pub fn perform(&mut self, command: MoveDefinition) -> Result<MoveOutcome> {
        let (amount, config, linear) = match command {
            MoveDefinition::Forward(distance) => (distance, self.profile, true),
            MoveDefinition::Turn(angle) => (angle, self.turn_profile, false),
        };
        let sign = if amount < 0.0 { -1.0 } else { 1.0 };
        let target_heading = self.robot.pose().theta + amount;
        let mut profile = MotionProfile::from_config(amount.abs(), &config)?;

        let mut ticks = 0;
        while !profile.is_complete() {
            let before = profile.position();
            profile.update(self.dt);
            let rate = sign * (profile.position() - before) / self.dt;
            if linear {
                self.robot.set_velocities(rate, 0.0);
            } else {
                self.robot.set_velocities(0.0, rate);
            }

            if !self.step() {
                self.robot.set_velocities(0.0, 0.0);
                return Ok(MoveOutcome::Blocked);
            }

            ticks += 1;
            if ticks >= MAX_TICKS_PER_MOVE {
                bail!("{command:?} did not finish within {MAX_TICKS_PER_MOVE} ticks");
            }
        }

        self.robot.set_velocities(0.0, 0.0);
        if !linear {
            self.settle_heading(target_heading);
        }
        log::debug!("{command:?} finished after {ticks} ticks at {:?}", self.robot.pose());
        Ok(MoveOutcome::Completed)
    }

    /// Advances one tick unless the body would collide at the predicted pose.
    /// Returns `false`, leaving the robot in place, when the step is blocked.
    pub fn step(&mut self) -> bool {
        let next = self.robot.predict(self.dt);
        if let Some(obstacle) = self.collision_at(&next) {
            log::warn!(
                "Move blocked at ({:.1}, {:.1}) heading {:.1} by obstacle at {:?}",
                next.x,
                next.y,
                next.theta,
                obstacle
            );
            let current = self.robot.pose();
            self.place_body(&current);
            return false;
        }

        self.robot.update(self.dt);
        self.ticks += 1;
        self.worker.submit(PoseSnapshot {
            tick: self.ticks,
            pose: next,
        });
        let frames: Vec<SensorFrame> = self.worker.poll().collect();
        for frame in frames {
            self.absorb(frame);
        }
        true
    }

    /// Places the body at `pose` and returns the first obstacle of the
    /// surrounding cells it overlaps. Leaving the maze counts as a collision
    /// with the maze bounds.
    fn collision_at(&mut self, pose: &Pose) -> Option<Rect> {
        self.place_body(pose);
        let Some((x, y)) = self.maze.cell_of(pose.position()) else {
            let size = self.maze.world_size();
            return Some(Rect::from_xywh(0.0, 0.0, size.x, size.y));
        };
        let nearby = self.maze.neighborhood(x, y);
        self.body.first_collision(&nearby).map(|index| nearby[index])
    }

    fn place_body(&mut self, pose: &Pose) {
        self.body.set_position(pose.position());
        self.body.set_rotation(pose.theta);
    }

    fn settle_heading(&mut self, heading: f32) {
        let theta = fold_heading(heading);
        let mut pose = self.robot.pose();
        pose.theta = theta;
        if self.collision_at(&pose).is_none() {
            self.robot.set_angle(theta);
        } else {
            let current = self.robot.pose();
            self.place_body(&current);
        }
    }

    fn absorb(&mut self, frame: SensorFrame) {
        for ((filter, last), reading) in self
            .filters
            .iter_mut()
            .zip(self.last_readings.iter_mut())
            .zip(&frame.readings)
        {
            filter.update(reading.power);
            *last = *reading;
        }
        self.frames += 1;
        log::trace!("Sensor frame for tick {}: {:?}", frame.tick, frame.readings);
    }
}
