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

//! Sensor updates on a background thread.
//!
//! The simulation pushes pose snapshots into a bounded channel and collects
//! sensor frames from another. When the worker falls behind, new snapshots
//! are dropped rather than stalling the motion loop.

use std::sync::Arc;
use std::thread;

use crossbeam_channel::{Receiver, Sender, TrySendError};
use wallsense_core::motion::Pose;
use wallsense_data::{MazeLayout, ObstacleSet};
use wallsense_lanes::{SensorFan, SensorReading};

/// The robot pose at one simulation tick.
#[derive(Debug, Clone, Copy)]
pub struct PoseSnapshot {
    pub tick: u64,
    pub pose: Pose,
}

/// The readings of every fan for one snapshot, in fan order.
#[derive(Debug, Clone)]
pub struct SensorFrame {
    pub tick: u64,
    pub readings: Vec<SensorReading>,
}

/// Owns the sensor thread and both ends of its channels.
pub struct SensorWorker {
    snapshot_tx: Option<Sender<PoseSnapshot>>,
    frame_rx: Receiver<SensorFrame>,
    handle: Option<thread::JoinHandle<()>>,
    dropped: u64,
}

impl SensorWorker {
    /// Starts the thread. `capacity` bounds both channels.
    pub fn spawn(maze: Arc<MazeLayout>, fans: Vec<SensorFan>, capacity: usize) -> Self {
        let (snapshot_tx, snapshot_rx) = crossbeam_channel::bounded(capacity);
        let (frame_tx, frame_rx) = crossbeam_channel::bounded(capacity);
        let handle = thread::spawn(move || run(maze, fans, snapshot_rx, frame_tx));
        Self {
            snapshot_tx: Some(snapshot_tx),
            frame_rx,
            handle: Some(handle),
            dropped: 0,
        }
    }

    /// Queues a snapshot. Returns `false` when it was dropped.
    pub fn submit(&mut self, snapshot: PoseSnapshot) -> bool {
        let Some(tx) = &self.snapshot_tx else {
            return false;
        };
        match tx.try_send(snapshot) {
            Ok(()) => true,
            Err(TrySendError::Full(snapshot)) => {
                self.dropped += 1;
                log::warn!(
                    "Sensor worker busy, dropped snapshot for tick {} ({} so far)",
                    snapshot.tick,
                    self.dropped
                );
                false
            }
            Err(TrySendError::Disconnected(_)) => {
                log::warn!("Sensor worker has stopped, snapshot discarded");
                self.snapshot_tx = None;
                false
            }
        }
    }

    /// Returns the frames finished so far without waiting.
    pub fn poll(&self) -> impl Iterator<Item = SensorFrame> + '_ {
        self.frame_rx.try_iter()
    }

    /// Number of snapshots dropped because the worker was busy.
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    /// Stops accepting snapshots, waits for the queued ones, joins the thread
    /// and returns the frames it produced in the meantime.
    pub fn shutdown(&mut self) -> Vec<SensorFrame> {
        // Closing the snapshot channel ends the worker loop once it is drained.
        self.snapshot_tx = None;
        let Some(handle) = self.handle.take() else {
            return Vec::new();
        };
        let frames: Vec<SensorFrame> = self.frame_rx.iter().collect();
        if handle.join().is_err() {
            log::warn!("Sensor worker panicked");
        }
        frames
    }
}

impl Drop for SensorWorker {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn run(
    maze: Arc<MazeLayout>,
    mut fans: Vec<SensorFan>,
    snapshots: Receiver<PoseSnapshot>,
    frames: Sender<SensorFrame>,
) {
    log::debug!("Sensor worker started with {} fans", fans.len());
    for snapshot in snapshots.iter() {
        let nearby = match maze.cell_of(snapshot.pose.position()) {
            Some((x, y)) => maze.neighborhood(x, y),
            None => ObstacleSet::new(),
        };
        let readings = fans
            .iter_mut()
            .map(|fan| {
                fan.attach_to(&snapshot.pose);
                fan.update(&nearby)
            })
            .collect();
        let frame = SensorFrame {
            tick: snapshot.tick,
            readings,
        };
        if frames.send(frame).is_err() {
            break;
        }
    }
    log::debug!("Sensor worker stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use wallsense_data::SceneDefinition;

    fn worker(capacity: usize) -> (SensorWorker, Pose) {
        let scene = SceneDefinition::corridor(4);
        let maze = scene.build_maze().unwrap();
        let pose = scene.start_pose(&maze);
        let fans = scene
            .sensors
            .iter()
            .map(|sensor| SensorFan::new(sensor.config).unwrap())
            .collect();
        (SensorWorker::spawn(Arc::new(maze), fans, capacity), pose)
    }

    #[test]
    fn test_worker_returns_frames_in_order() {
        let (mut worker, pose) = worker(16);
        for tick in 0..8 {
            assert!(worker.submit(PoseSnapshot { tick, pose }));
        }
        let mut frames: Vec<SensorFrame> = worker.poll().collect();
        frames.extend(worker.shutdown());
        let ticks: Vec<u64> = frames.iter().map(|frame| frame.tick).collect();
        assert_eq!(ticks, (0..8).collect::<Vec<_>>());
        assert!(frames.iter().all(|frame| frame.readings.len() == 4));
        assert_eq!(worker.dropped(), 0);
    }

    #[test]
    fn test_worker_side_sensors_see_corridor() {
        let (mut worker, pose) = worker(4);
        worker.submit(PoseSnapshot { tick: 0, pose });
        let frames = worker.shutdown();
        let readings = &frames[0].readings;
        assert!(readings[0].distance < 500.0);
        assert!(readings[3].distance < 500.0);
    }

    #[test]
    fn test_worker_rejects_after_shutdown() {
        let (mut worker, pose) = worker(4);
        worker.shutdown();
        assert!(!worker.submit(PoseSnapshot { tick: 0, pose }));
        assert!(worker.shutdown().is_empty());
    }
}
