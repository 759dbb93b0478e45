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

//! # Scene Files
//!
//! A stable, serializable description of a simulation run: the maze, the
//! robot body and its sensors, the speed limits, and the moves to perform.
//!
//! Scenes are stored as RON for hand editing. JSON is accepted too, chosen by
//! the `.json` file extension.

use std::path::Path;

use serde::{Deserialize, Serialize};
use wallsense_core::config::{ProfileConfig, SensorConfig};
use wallsense_core::math::Vec2;
use wallsense_core::motion::Pose;
use wallsense_core::physics::{CollisionGeometry, Primitive};

use crate::error::DataError;
use crate::maze::{Direction, MazeGeometry, MazeLayout, WallState};

/// The root of a scene file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneDefinition {
    /// The maze the robot runs in.
    pub maze: MazeDefinition,
    /// The robot's body and starting point.
    pub robot: RobotDefinition,
    /// Sensors mounted on the robot.
    pub sensors: Vec<SensorDefinition>,
    /// Speed limits for straight moves, in units per second.
    pub profile: ProfileConfig,
    /// Speed limits for turns in place, in degrees per second.
    pub turn_profile: ProfileConfig,
    /// Moves performed in order.
    pub moves: Vec<MoveDefinition>,
}

/// Size, geometry and interior walls of a maze.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MazeDefinition {
    /// Width, in cells.
    pub width: u32,
    /// Height, in cells.
    pub height: u32,
    /// Physical dimensions.
    pub geometry: MazeGeometry,
    /// Walls present in addition to the boundary.
    pub walls: Vec<WallDefinition>,
}

/// One wall, named by a cell and the side it is on.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WallDefinition {
    /// Cell column.
    pub x: u32,
    /// Cell row, counted from the south.
    pub y: u32,
    /// Side of the cell.
    pub direction: Direction,
}

/// The robot's collision body and starting pose.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RobotDefinition {
    /// Starting cell, `[x, y]`.
    pub start_cell: [u32; 2],
    /// Starting heading, in degrees.
    pub heading: f32,
    /// Shapes making up the collision body, in the body frame (forward is `-y`).
    pub body: Vec<ShapeDefinition>,
}

/// A primitive attached to the robot body.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShapeDefinition {
    /// The shape.
    pub primitive: Primitive,
    /// Attachment point in the body frame.
    pub offset: Vec2,
}

/// A named sensor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorDefinition {
    /// Label used in logs.
    pub name: String,
    /// Sensor parameters.
    pub config: SensorConfig,
}

/// A single step of the run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum MoveDefinition {
    /// Drive straight ahead by a distance.
    Forward(f32),
    /// Turn in place by an angle in degrees, clockwise when positive.
    Turn(f32),
}

impl Default for MazeDefinition {
    fn default() -> Self {
        Self {
            width: 16,
            height: 16,
            geometry: MazeGeometry::default(),
            walls: Vec::new(),
        }
    }
}

impl Default for RobotDefinition {
    fn default() -> Self {
        Self {
            start_cell: [0, 0],
            heading: 0.0,
            body: vec![
                ShapeDefinition {
                    primitive: Primitive::Circle { radius: 38.0 },
                    offset: Vec2::new(0.0, -10.0),
                },
                ShapeDefinition {
                    primitive: Primitive::Rect {
                        width: 76.0,
                        height: 50.0,
                    },
                    offset: Vec2::new(0.0, 20.0),
                },
            ],
        }
    }
}

impl Default for SceneDefinition {
    fn default() -> Self {
        Self::corridor(16)
    }
}

fn default_sensors() -> Vec<SensorDefinition> {
    let sensor = |name: &str, offset: Vec2, heading_offset: f32| SensorDefinition {
        name: name.to_string(),
        config: SensorConfig {
            offset,
            heading_offset,
            ..SensorConfig::default()
        },
    };
    vec![
        sensor("left_side", Vec2::new(-28.0, -30.0), -60.0),
        sensor("left_front", Vec2::new(-20.0, -40.0), 0.0),
        sensor("right_front", Vec2::new(20.0, -40.0), 0.0),
        sensor("right_side", Vec2::new(28.0, -30.0), 60.0),
    ]
}

impl SceneDefinition {
    /// Builds an `n x n` scene with an L-shaped run: north up the first
    /// column, which is walled off on its east side, then east along the top
    /// row.
    pub fn corridor(cells: u32) -> Self {
        let span = cells.saturating_sub(1);
        let walls = (0..span)
            .map(|y| WallDefinition {
                x: 0,
                y,
                direction: Direction::East,
            })
            .collect();
        let geometry = MazeGeometry::default();
        let run = span as f32 * geometry.cell_size;
        let moves = if span == 0 {
            Vec::new()
        } else {
            vec![
                MoveDefinition::Forward(run),
                MoveDefinition::Turn(90.0),
                MoveDefinition::Forward(run),
            ]
        };
        Self {
            maze: MazeDefinition {
                width: cells,
                height: cells,
                geometry,
                walls,
            },
            robot: RobotDefinition::default(),
            sensors: default_sensors(),
            profile: ProfileConfig::default(),
            turn_profile: ProfileConfig {
                max_speed: 360.0,
                final_speed: 0.0,
                acceleration: 1440.0,
            },
            moves,
        }
    }

    /// Checks the parameters the kernel would reject at run time.
    pub fn validate(&self) -> Result<(), DataError> {
        for sensor in &self.sensors {
            sensor.config.validate()?;
        }
        let [x, y] = self.robot.start_cell;
        if x >= self.maze.width || y >= self.maze.height {
            return Err(DataError::CellOutOfBounds { x, y });
        }
        Ok(())
    }

    /// Builds the maze layout: boundary walls plus the listed ones.
    pub fn build_maze(&self) -> Result<MazeLayout, DataError> {
        let mut maze = MazeLayout::new(self.maze.width, self.maze.height, self.maze.geometry)?;
        for wall in &self.maze.walls {
            maze.set_wall(wall.x, wall.y, wall.direction, WallState::Present)?;
        }
        Ok(maze)
    }

    /// Builds the robot's collision body, centred on the origin.
    pub fn build_body(&self) -> CollisionGeometry {
        let mut body = CollisionGeometry::new(Vec2::ZERO);
        for shape in &self.robot.body {
            body.add_shape(shape.primitive, shape.offset);
        }
        body
    }

    /// Returns the starting pose: the middle of the start cell.
    pub fn start_pose(&self, maze: &MazeLayout) -> Pose {
        let [x, y] = self.robot.start_cell;
        let center = maze.cell_center(x, y);
        Pose::new(center.x, center.y, self.robot.heading)
    }

    /// Parses a RON scene.
    pub fn from_ron(source: &str) -> Result<Self, DataError> {
        ron::from_str(source).map_err(|e| DataError::Parse {
            format: "RON",
            message: e.to_string(),
        })
    }

    /// Parses a JSON scene.
    pub fn from_json(source: &str) -> Result<Self, DataError> {
        serde_json::from_str(source).map_err(|e| DataError::Parse {
            format: "JSON",
            message: e.to_string(),
        })
    }

    /// Writes the scene as pretty-printed RON.
    pub fn to_ron(&self) -> Result<String, DataError> {
        let pretty_config = ron::ser::PrettyConfig::default().indentor("  ".to_string());
        ron::ser::to_string_pretty(self, pretty_config)
            .map_err(|e| DataError::Serialize(e.to_string()))
    }

    /// Writes the scene as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, DataError> {
        serde_json::to_string_pretty(self).map_err(|e| DataError::Serialize(e.to_string()))
    }

    /// Loads a scene file, as JSON when the extension is `.json` and as RON
    /// otherwise.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DataError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let scene = if is_json(path) {
            Self::from_json(&content)?
        } else {
            Self::from_ron(&content)?
        };
        log::debug!(
            "Loaded scene {} ({}x{} maze, {} sensors, {} moves)",
            path.display(),
            scene.maze.width,
            scene.maze.height,
            scene.sensors.len(),
            scene.moves.len()
        );
        Ok(scene)
    }

    /// Saves the scene, picking the format from the extension like
    /// [`SceneDefinition::load`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), DataError> {
        let path = path.as_ref();
        let content = if is_json(path) {
            self.to_json()?
        } else {
            self.to_ron()?
        };
        std::fs::write(path, content)?;
        Ok(())
    }
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}
