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

//! # Occupancy Fields
//!
//! Two concrete [`OccupancyField`]s:
//!
//! - [`RgbaBitmap`], a pixel image where obstacles are recognised by colour or
//!   transparency, as when the scene is a rendered texture;
//! - [`OccupancyGrid`], a plain boolean grid, usually rasterized from a set of
//!   rectangles.

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};
use wallsense_core::field::OccupancyField;
use wallsense_core::math::Rect;

use crate::error::DataError;

/// An 8-bit RGBA pixel.
#[repr(C)]
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Pod, Zeroable, Serialize, Deserialize,
)]
pub struct Rgba8 {
    /// Red.
    pub r: u8,
    /// Green.
    pub g: u8,
    /// Blue.
    pub b: u8,
    /// Alpha. Zero is fully transparent.
    pub a: u8,
}

impl Rgba8 {
    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);
    /// Opaque white.
    pub const WHITE: Self = Self::new(255, 255, 255, 255);
    /// Opaque black.
    pub const BLACK: Self = Self::new(0, 0, 0, 255);
    /// The dark red maze walls are drawn in.
    pub const WALL: Self = Self::new(88, 0, 0, 255);

    /// Creates a new pixel.
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

/// Decides which pixels of an [`RgbaBitmap`] block rays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WallRule {
    /// Only pixels of exactly this colour are obstacles.
    Colour(Rgba8),
    /// Only fully transparent pixels are obstacles, as outside a sprite mask.
    Transparent,
    /// Pixels of this colour and fully transparent pixels are obstacles.
    ColourOrTransparent(Rgba8),
}

impl Default for WallRule {
    fn default() -> Self {
        WallRule::ColourOrTransparent(Rgba8::WALL)
    }
}

impl WallRule {
    /// Classifies one pixel.
    #[inline]
    pub fn is_wall(&self, pixel: Rgba8) -> bool {
        match *self {
            WallRule::Colour(colour) => pixel == colour,
            WallRule::Transparent => pixel.a == 0,
            WallRule::ColourOrTransparent(colour) => pixel == colour || pixel.a == 0,
        }
    }
}

/// A row-major RGBA image used as an occupancy field.
#[derive(Debug, Clone, PartialEq)]
pub struct RgbaBitmap {
    width: u32,
    height: u32,
    pixels: Vec<Rgba8>,
    rule: WallRule,
}

impl RgbaBitmap {
    /// Creates a bitmap filled with `background`.
    pub fn new(width: u32, height: u32, background: Rgba8, rule: WallRule) -> Self {
        Self {
            width,
            height,
            pixels: vec![background; width as usize * height as usize],
            rule,
        }
    }

    /// Builds a bitmap from tightly packed RGBA bytes, row by row.
    ///
    /// # Errors
    ///
    /// Returns [`DataError::BufferSize`] when `bytes` is not exactly
    /// `width * height * 4` long.
    pub fn from_raw(
        width: u32,
        height: u32,
        bytes: &[u8],
        rule: WallRule,
    ) -> Result<Self, DataError> {
        let expected = width as usize * height as usize * std::mem::size_of::<Rgba8>();
        if bytes.len() != expected {
            return Err(DataError::BufferSize {
                expected,
                actual: bytes.len(),
            });
        }
        let pixels: &[Rgba8] = bytemuck::try_cast_slice(bytes).map_err(|_| DataError::BufferSize {
            expected,
            actual: bytes.len(),
        })?;
        Ok(Self {
            width,
            height,
            pixels: pixels.to_vec(),
            rule,
        })
    }

    /// Returns the pixels as raw RGBA bytes.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    /// Returns the classification rule.
    pub fn rule(&self) -> WallRule {
        self.rule
    }

    /// Replaces the classification rule.
    pub fn set_rule(&mut self, rule: WallRule) {
        self.rule = rule;
    }

    /// Returns the pixel at `(x, y)`, or `None` outside the image.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba8> {
        (x < self.width && y < self.height).then(|| self.pixels[self.index(x, y)])
    }

    /// Sets the pixel at `(x, y)`. Writes outside the image are ignored.
    pub fn set_pixel(&mut self, x: u32, y: u32, colour: Rgba8) {
        if x < self.width && y < self.height {
            let index = self.index(x, y);
            self.pixels[index] = colour;
        }
    }

    /// Paints every pixel covered by `rect`, clipped to the image.
    pub fn fill_rect(&mut self, rect: &Rect, colour: Rgba8) {
        if let Some((x0, y0, x1, y1)) = pixel_span(rect, self.width, self.height) {
            for y in y0..y1 {
                let row = y as usize * self.width as usize;
                self.pixels[row + x0 as usize..row + x1 as usize].fill(colour);
            }
        }
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }
}

impl OccupancyField for RgbaBitmap {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    fn is_obstacle(&self, x: u32, y: u32) -> bool {
        self.pixel(x, y).is_some_and(|pixel| self.rule.is_wall(pixel))
    }
}

/// A row-major grid of obstacle flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OccupancyGrid {
    width: u32,
    height: u32,
    cells: Vec<bool>,
}

impl OccupancyGrid {
    /// Creates an empty grid.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            cells: vec![false; width as usize * height as usize],
        }
    }

    /// Creates a grid with every rectangle of `obstacles` rasterized in.
    pub fn from_obstacles(width: u32, height: u32, obstacles: &[Rect]) -> Self {
        let mut grid = Self::new(width, height);
        for rect in obstacles {
            grid.fill_rect(rect);
        }
        log::debug!(
            "Rasterized {} obstacles into a {}x{} grid",
            obstacles.len(),
            width,
            height
        );
        grid
    }

    /// Creates a grid from the classification of every pixel of any field.
    pub fn from_field<F: OccupancyField + ?Sized>(field: &F) -> Self {
        let (width, height) = (field.width(), field.height());
        let mut cells = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height {
            for x in 0..width {
                cells.push(field.is_obstacle(x, y));
            }
        }
        Self {
            width,
            height,
            cells,
        }
    }

    /// Marks or clears a single cell. Writes outside the grid are ignored.
    pub fn set(&mut self, x: u32, y: u32, occupied: bool) {
        if x < self.width && y < self.height {
            let index = y as usize * self.width as usize + x as usize;
            self.cells[index] = occupied;
        }
    }

    /// Marks every cell a rectangle covers.
    ///
    /// A cell `(x, y)` is the unit square `[x, x + 1) x [y, y + 1)`; it is
    /// covered when that square overlaps the rectangle's interior.
    pub fn fill_rect(&mut self, rect: &Rect) {
        if let Some((x0, y0, x1, y1)) = pixel_span(rect, self.width, self.height) {
            for y in y0..y1 {
                let row = y as usize * self.width as usize;
                self.cells[row + x0 as usize..row + x1 as usize].fill(true);
            }
        }
    }

    /// Clears every cell.
    pub fn clear(&mut self) {
        self.cells.fill(false);
    }

    /// Returns the number of occupied cells.
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|&&cell| cell).count()
    }
}

impl OccupancyField for OccupancyGrid {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    fn is_obstacle(&self, x: u32, y: u32) -> bool {
        x < self.width
            && y < self.height
            && self.cells[y as usize * self.width as usize + x as usize]
    }
}

/// Converts a rectangle to the half-open pixel range `[x0, x1) x [y0, y1)` it
/// covers, clipped to a `width x height` image. Returns `None` when nothing is
/// covered.
fn pixel_span(rect: &Rect, width: u32, height: u32) -> Option<(u32, u32, u32, u32)> {
    let clip = |lo: f32, hi: f32, limit: u32| -> Option<(u32, u32)> {
        let start = lo.floor().max(0.0);
        let end = hi.ceil().min(limit as f32);
        (end > start).then_some((start as u32, end as u32))
    };
    let (x0, x1) = clip(rect.min.x, rect.max.x, width)?;
    let (y0, y1) = clip(rect.min.y, rect.max.y, height)?;
    Some((x0, y0, x1, y1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wall_rule_classification() {
        let wall = Rgba8::WALL;
        let clear = Rgba8::WHITE;
        assert!(WallRule::Colour(wall).is_wall(wall));
        assert!(!WallRule::Colour(wall).is_wall(Rgba8::TRANSPARENT));
        assert!(WallRule::Transparent.is_wall(Rgba8::TRANSPARENT));
        assert!(!WallRule::Transparent.is_wall(wall));
        assert!(WallRule::default().is_wall(wall));
        assert!(WallRule::default().is_wall(Rgba8::new(10, 20, 30, 0)));
        assert!(!WallRule::default().is_wall(clear));
    }

    #[test]
    fn test_bitmap_from_raw_checks_size() {
        let bytes = vec![0u8; 2 * 3 * 4];
        assert!(RgbaBitmap::from_raw(2, 3, &bytes, WallRule::Transparent).is_ok());
        let err = RgbaBitmap::from_raw(2, 3, &bytes[1..], WallRule::Transparent).unwrap_err();
        assert!(matches!(
            err,
            DataError::BufferSize {
                expected: 24,
                actual: 23
            }
        ));
    }

    #[test]
    fn test_bitmap_from_raw_reads_row_major() {
        let mut bytes = vec![255u8; 3 * 2 * 4];
        // Pixel (1, 1) is index 4.
        bytes[16..20].copy_from_slice(&[88, 0, 0, 255]);
        let bitmap = RgbaBitmap::from_raw(3, 2, &bytes, WallRule::default()).unwrap();
        assert!(bitmap.is_obstacle(1, 1));
        assert!(!bitmap.is_obstacle(0, 1));
        assert_eq!(bitmap.as_bytes(), bytes.as_slice());
    }

    #[test]
    fn test_bitmap_fill_rect_clips() {
        let mut bitmap = RgbaBitmap::new(10, 10, Rgba8::WHITE, WallRule::default());
        bitmap.fill_rect(&Rect::from_xywh(8.0, -2.0, 5.0, 4.0), Rgba8::WALL);
        assert!(bitmap.is_obstacle(9, 0));
        assert!(bitmap.is_obstacle(8, 1));
        assert!(!bitmap.is_obstacle(8, 2));
        assert!(!bitmap.is_obstacle(7, 0));
        assert_eq!(bitmap.pixel(10, 0), None);
        assert!(!bitmap.is_obstacle(10, 0));
    }

    #[test]
    fn test_grid_rasterizes_covered_cells() {
        let grid = OccupancyGrid::from_obstacles(20, 20, &[Rect::from_xywh(2.0, 3.0, 4.0, 2.0)]);
        assert_eq!(grid.occupied_count(), 8);
        assert!(grid.is_obstacle(2, 3));
        assert!(grid.is_obstacle(5, 4));
        assert!(!grid.is_obstacle(6, 4));
        assert!(!grid.is_obstacle(5, 5));
    }

    #[test]
    fn test_grid_fractional_rect_covers_partial_cells() {
        let grid = OccupancyGrid::from_obstacles(10, 10, &[Rect::from_xywh(1.5, 1.5, 1.0, 1.0)]);
        assert_eq!(grid.occupied_count(), 4);
    }

    #[test]
    fn test_grid_ignores_rect_outside() {
        let grid = OccupancyGrid::from_obstacles(10, 10, &[Rect::from_xywh(20.0, 20.0, 5.0, 5.0)]);
        assert_eq!(grid.occupied_count(), 0);
    }

    #[test]
    fn test_grid_from_bitmap() {
        let mut bitmap = RgbaBitmap::new(4, 4, Rgba8::WHITE, WallRule::Colour(Rgba8::BLACK));
        bitmap.set_pixel(3, 2, Rgba8::BLACK);
        let grid = OccupancyGrid::from_field(&bitmap);
        assert_eq!(grid.occupied_count(), 1);
        assert!(grid.is_obstacle(3, 2));
    }
}
