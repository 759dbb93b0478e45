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

//! Headless wallsense host: loads a scene, drives the robot through it and
//! logs what the sensors saw.

mod sim;
mod worker;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use wallsense_data::SceneDefinition;

use crate::sim::Simulation;

#[derive(Debug, Parser)]
#[command(name = "sandbox", about = "Drive a simulated micromouse through a maze scene")]
struct Args {
    /// Scene file to run (RON, or JSON with a `.json` extension).
    #[arg(long)]
    scene: Option<PathBuf>,

    /// Size of the built-in corridor scene, used when no scene file is given.
    #[arg(long, default_value_t = 16)]
    cells: u32,

    /// Fixed simulation time step, in seconds.
    #[arg(long, default_value_t = 0.01)]
    dt: f32,

    /// Write the scene that was run to this path.
    #[arg(long)]
    save_scene: Option<PathBuf>,
}

fn main() -> Result<()> {
    use env_logger::{Builder, Env};

    Builder::from_env(Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let scene = match &args.scene {
        Some(path) => SceneDefinition::load(path)
            .with_context(|| format!("failed to load scene {}", path.display()))?,
        None => SceneDefinition::corridor(args.cells),
    };
    if let Some(path) = &args.save_scene {
        scene
            .save(path)
            .with_context(|| format!("failed to save scene {}", path.display()))?;
        log::info!("Scene written to {}", path.display());
    }

    let mut simulation = Simulation::new(&scene, args.dt)?;
    let start = simulation.robot().pose();
    log::info!(
        "Start at ({:.1}, {:.1}) heading {:.1}, maze {:?}",
        start.x,
        start.y,
        start.theta,
        simulation.maze().world_size()
    );
    log::debug!("Body bounds {:?}", simulation.body().bounds());
    let report = simulation.run()?;

    if report.blocked {
        log::warn!(
            "Run stopped by a collision after {} of {} moves",
            report.moves_completed,
            scene.moves.len()
        );
    } else {
        log::info!("Run complete: {} moves", report.moves_completed);
    }
    log::info!(
        "{} ticks ({:.2}s simulated), final pose ({:.1}, {:.1}) heading {:.1}",
        report.ticks,
        report.elapsed,
        report.final_pose.x,
        report.final_pose.y,
        report.final_pose.theta
    );
    log::info!(
        "{} sensor frames, {} snapshots dropped",
        report.frames,
        report.dropped_snapshots
    );
    for (name, smoothed, last) in &report.sensors {
        log::info!(
            "  {name:<12} power {smoothed:8.2} (last {:.2}), distance {:.1}",
            last.power,
            last.distance
        );
    }
    Ok(())
}
