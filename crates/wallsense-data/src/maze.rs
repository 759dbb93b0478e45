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

//! # Maze Layout
//!
//! A rectangular micromouse maze and the world-space geometry of its walls and
//! posts.
//!
//! ## Wall numbering
//!
//! Every wall between two cells has a single id, shared by both cells. Each
//! row of cells owns `2 * width + 1` wall slots: first the `width` south
//! walls of the row, then the `width + 1` west walls (the last of which is the
//! east boundary). The north walls of the top row come after the last full
//! row. With `i = (2 * width + 1) * y + x`:
//!
//! | Direction | Id |
//! |-----------|----|
//! | South | `i` |
//! | West | `i + width` |
//! | East | `i + width + 1` |
//! | North | `i + 2 * width + 1` |
//!
//! ## Coordinates
//!
//! Cells are addressed `(x, y)` with `y` growing northwards. World space is
//! screen space: `y` grows downwards, so row `y = 0` is drawn at the bottom.
//! Grid lines sit on multiples of the cell size; posts and walls extend the
//! wall thickness right of and below their grid line.

use serde::{Deserialize, Serialize};
use wallsense_core::math::{Rect, Vec2};

use crate::error::DataError;
use crate::obstacles::ObstacleSet;

/// One of the four sides of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Towards increasing `y`, up the screen.
    North,
    /// Towards increasing `x`.
    East,
    /// Towards decreasing `y`.
    South,
    /// Towards decreasing `x`.
    West,
}

impl Direction {
    /// All four directions, clockwise from north.
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    /// Returns the direction pointing the other way.
    pub fn opposite(self) -> Self {
        match self {
            Direction::North => Direction::South,
            Direction::East => Direction::West,
            Direction::South => Direction::North,
            Direction::West => Direction::East,
        }
    }

    /// Returns the cell offset one step in this direction.
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::North => (0, 1),
            Direction::East => (1, 0),
            Direction::South => (0, -1),
            Direction::West => (-1, 0),
        }
    }

    /// Returns the robot heading, in degrees, that faces this direction.
    pub fn heading(self) -> f32 {
        match self {
            Direction::North => 0.0,
            Direction::East => 90.0,
            Direction::South => 180.0,
            Direction::West => 270.0,
        }
    }
}

/// What is known about one wall slot.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WallState {
    /// No wall; the cells are connected.
    #[default]
    Absent,
    /// A physical wall.
    Present,
    /// Not yet observed.
    Unknown,
    /// Not physical, but treated as closed by route planning.
    Virtual,
}

/// Physical dimensions of the maze.
///
/// Defaults follow the classic half-size-scaled micromouse drawing: 180 unit
/// cells, 12 unit walls and posts, wall segments 166 long starting 13 after
/// the grid line.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MazeGeometry {
    /// Distance between neighbouring grid lines.
    pub cell_size: f32,
    /// Thickness of walls and side length of posts.
    pub wall_thickness: f32,
    /// Length of a wall segment between two posts.
    pub wall_length: f32,
    /// Gap from the grid line to the start of a wall segment.
    pub wall_inset: f32,
}

impl Default for MazeGeometry {
    fn default() -> Self {
        Self {
            cell_size: 180.0,
            wall_thickness: 12.0,
            wall_length: 166.0,
            wall_inset: 13.0,
        }
    }
}

/// The walls of a maze and where they are in the world.
#[derive(Debug, Clone, PartialEq)]
pub struct MazeLayout {
    width: u32,
    height: u32,
    geometry: MazeGeometry,
    walls: Vec<WallState>,
}

impl MazeLayout {
    /// Creates an open maze with only the boundary walls present.
    ///
    /// # Errors
    ///
    /// Returns [`DataError::EmptyMaze`] if either dimension is zero.
    pub fn new(width: u32, height: u32, geometry: MazeGeometry) -> Result<Self, DataError> {
        if width == 0 || height == 0 {
            return Err(DataError::EmptyMaze { width, height });
        }
        let walls_per_row = 2 * width as usize + 1;
        let count = walls_per_row * height as usize + width as usize;
        let mut maze = Self {
            width,
            height,
            geometry,
            walls: vec![WallState::Absent; count],
        };
        for x in 0..width {
            maze.set_wall(x, 0, Direction::South, WallState::Present)?;
            maze.set_wall(x, height - 1, Direction::North, WallState::Present)?;
        }
        for y in 0..height {
            maze.set_wall(0, y, Direction::West, WallState::Present)?;
            maze.set_wall(width - 1, y, Direction::East, WallState::Present)?;
        }
        Ok(maze)
    }

    /// Returns the width, in cells.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the height, in cells.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns the physical dimensions.
    #[inline]
    pub fn geometry(&self) -> &MazeGeometry {
        &self.geometry
    }

    /// Returns the number of wall slots in one row of cells.
    #[inline]
    pub fn walls_per_row(&self) -> usize {
        2 * self.width as usize + 1
    }

    /// Returns the total number of wall slots.
    #[inline]
    pub fn wall_count(&self) -> usize {
        self.walls.len()
    }

    /// Returns the id of a cell's wall, or `None` for a cell outside the maze.
    pub fn wall_id(&self, x: u32, y: u32, direction: Direction) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = self.walls_per_row() * y as usize + x as usize;
        let w = self.width as usize;
        Some(match direction {
            Direction::North => i + self.walls_per_row(),
            Direction::East => i + w + 1,
            Direction::West => i + w,
            Direction::South => i,
        })
    }

    /// Returns `true` when the wall runs east-west.
    #[inline]
    pub fn is_horizontal(&self, wall_id: usize) -> bool {
        wall_id % self.walls_per_row() < self.width as usize
    }

    /// Returns the cell that owns a wall as its south or west side.
    ///
    /// North walls of the top row report `y == height`, and east walls of the
    /// last column report `x == width`: the owning cell lies just outside the
    /// maze.
    pub fn cell_of_wall(&self, wall_id: usize) -> (u32, u32) {
        let y = wall_id / self.walls_per_row();
        let slot = wall_id % self.walls_per_row();
        let w = self.width as usize;
        let x = if slot < w { slot } else { slot - w };
        (x as u32, y as u32)
    }

    /// Returns the state of a wall slot. Ids past the end read as absent.
    pub fn wall_state(&self, wall_id: usize) -> WallState {
        self.walls.get(wall_id).copied().unwrap_or_default()
    }

    /// Returns the state of a cell's wall. Cells outside the maze read as
    /// absent.
    pub fn wall(&self, x: u32, y: u32, direction: Direction) -> WallState {
        self.wall_id(x, y, direction)
            .map_or(WallState::Absent, |id| self.wall_state(id))
    }

    /// Returns `true` when a physical wall blocks a cell side.
    pub fn has_wall(&self, x: u32, y: u32, direction: Direction) -> bool {
        self.wall(x, y, direction) == WallState::Present
    }

    /// Sets the state of a cell's wall, which is also the neighbour's wall.
    ///
    /// # Errors
    ///
    /// Returns [`DataError::CellOutOfBounds`] for a cell outside the maze.
    pub fn set_wall(
        &mut self,
        x: u32,
        y: u32,
        direction: Direction,
        state: WallState,
    ) -> Result<(), DataError> {
        let id = self
            .wall_id(x, y, direction)
            .ok_or(DataError::CellOutOfBounds { x, y })?;
        self.walls[id] = state;
        Ok(())
    }

    /// Returns the world-space size of the whole maze, boundary included.
    pub fn world_size(&self) -> Vec2 {
        let g = &self.geometry;
        Vec2::new(
            self.width as f32 * g.cell_size + g.wall_thickness,
            self.height as f32 * g.cell_size + g.wall_thickness,
        )
    }

    /// Converts a cell row inside the maze to the screen row it is drawn on.
    #[inline]
    fn screen_row(&self, y: u32) -> u32 {
        debug_assert!(y < self.height);
        self.height - 1 - y
    }

    /// Screen row of any cell row. Rows past the top of the maze come out
    /// negative.
    #[inline]
    fn screen_row_f32(&self, y: u32) -> f32 {
        self.height as f32 - 1.0 - y as f32
    }

    /// Returns the world-space rectangle of a cell, between its grid lines.
    ///
    /// Cells outside the maze are laid out on the same grid.
    pub fn cell_rect(&self, x: u32, y: u32) -> Rect {
        let size = self.geometry.cell_size;
        Rect::from_xywh(
            x as f32 * size,
            self.screen_row_f32(y) * size,
            size,
            size,
        )
    }

    /// Returns the middle of the open floor of a cell.
    ///
    /// Cells outside the maze are laid out on the same grid.
    pub fn cell_center(&self, x: u32, y: u32) -> Vec2 {
        let g = &self.geometry;
        let half = (g.cell_size + g.wall_thickness) * 0.5;
        Vec2::new(
            x as f32 * g.cell_size + half,
            self.screen_row_f32(y) * g.cell_size + half,
        )
    }

    /// Returns the cell under a world-space point, or `None` outside the maze.
    pub fn cell_of(&self, point: Vec2) -> Option<(u32, u32)> {
        let size = self.geometry.cell_size;
        let column = (point.x / size).floor();
        let row = (point.y / size).floor();
        if column < 0.0 || row < 0.0 || column >= self.width as f32 || row >= self.height as f32 {
            return None;
        }
        Some((column as u32, self.height - 1 - row as u32))
    }

    /// Returns the world-space rectangle of a wall slot.
    pub fn wall_rect(&self, wall_id: usize) -> Rect {
        let g = &self.geometry;
        let (x, y) = self.cell_of_wall(wall_id);
        if self.is_horizontal(wall_id) {
            // The south side of row y is grid line `height - y` counted from the top.
            let line = (self.height - y) as f32 * g.cell_size;
            Rect::from_xywh(
                x as f32 * g.cell_size + g.wall_inset,
                line,
                g.wall_length,
                g.wall_thickness,
            )
        } else {
            let line = x as f32 * g.cell_size;
            Rect::from_xywh(
                line,
                self.screen_row(y) as f32 * g.cell_size + g.wall_inset,
                g.wall_thickness,
                g.wall_length,
            )
        }
    }

    /// Returns the world-space rectangle of the post at grid intersection
    /// `(column, row)`, both counted from the top-left.
    pub fn post_rect(&self, column: u32, row: u32) -> Rect {
        let g = &self.geometry;
        Rect::from_xywh(
            column as f32 * g.cell_size,
            row as f32 * g.cell_size,
            g.wall_thickness,
            g.wall_thickness,
        )
    }

    /// Returns every present wall and every post.
    pub fn obstacles(&self) -> ObstacleSet {
        let mut set = ObstacleSet::with_capacity(
            self.walls.len() + (self.width as usize + 1) * (self.height as usize + 1),
        );
        set.extend(
            self.walls
                .iter()
                .enumerate()
                .filter(|(_, state)| **state == WallState::Present)
                .map(|(id, _)| self.wall_rect(id)),
        );
        for row in 0..=self.height {
            for column in 0..=self.width {
                set.push(self.post_rect(column, row));
            }
        }
        set
    }

    /// Returns the present walls and the posts of the 3x3 block of cells
    /// centred on `(x, y)`, clipped to the maze.
    ///
    /// This is the slice of the world a body in that cell can touch or see at
    /// short range. A cell outside the maze yields an empty set.
    pub fn neighborhood(&self, x: u32, y: u32) -> ObstacleSet {
        let mut set = ObstacleSet::new();
        if x >= self.width || y >= self.height {
            return set;
        }

        let x_range = x.saturating_sub(1)..=(x + 1).min(self.width - 1);
        let y_range = y.saturating_sub(1)..=(y + 1).min(self.height - 1);

        let mut ids = Vec::with_capacity(24);
        for cy in y_range.clone() {
            for cx in x_range.clone() {
                ids.extend(
                    Direction::ALL
                        .iter()
                        .filter_map(|&direction| self.wall_id(cx, cy, direction)),
                );
            }
        }
        ids.sort_unstable();
        ids.dedup();
        set.extend(
            ids.into_iter()
                .filter(|&id| self.wall_state(id) == WallState::Present)
                .map(|id| self.wall_rect(id)),
        );

        // Grid intersections around the block, in screen rows.
        let top = self.screen_row(*y_range.end());
        let bottom = self.screen_row(*y_range.start()) + 1;
        for row in top..=bottom {
            for column in *x_range.start()..=*x_range.end() + 1 {
                set.push(self.post_rect(column, row));
            }
        }
        set
    }
}
