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

//! Error type for building host data and loading scene files.

use std::{fmt, io};

use wallsense_core::KernelError;

/// An error raised while building or loading host-side data.
#[derive(Debug)]
pub enum DataError {
    /// A raw pixel buffer does not match the declared dimensions.
    BufferSize {
        /// Bytes required by the dimensions.
        expected: usize,
        /// Bytes actually supplied.
        actual: usize,
    },
    /// A maze was declared with a zero dimension.
    EmptyMaze {
        /// Declared width, in cells.
        width: u32,
        /// Declared height, in cells.
        height: u32,
    },
    /// A cell reference points outside the maze.
    CellOutOfBounds {
        /// Cell column.
        x: u32,
        /// Cell row.
        y: u32,
    },
    /// A scene file could not be parsed.
    Parse {
        /// The file format being parsed, such as `"RON"`.
        format: &'static str,
        /// The parser's message.
        message: String,
    },
    /// A scene could not be written out.
    Serialize(String),
    /// The scene describes parameters the kernel rejects.
    InvalidScene(KernelError),
    /// Reading or writing a file failed.
    Io(io::Error),
}

impl fmt::Display for DataError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataError::BufferSize { expected, actual } => write!(
                f,
                "Pixel buffer holds {actual} bytes but the dimensions need {expected}"
            ),
            DataError::EmptyMaze { width, height } => {
                write!(f, "Maze must have at least one cell, got {width}x{height}")
            }
            DataError::CellOutOfBounds { x, y } => {
                write!(f, "Cell ({x}, {y}) is outside the maze")
            }
            DataError::Parse { format, message } => {
                write!(f, "Failed to parse {format} scene: {message}")
            }
            DataError::Serialize(msg) => write!(f, "Failed to serialize scene: {msg}"),
            DataError::InvalidScene(err) => write!(f, "Invalid scene parameters: {err}"),
            DataError::Io(err) => write!(f, "I/O error: {err}"),
        }
    }
}

impl std::error::Error for DataError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DataError::Io(err) => Some(err),
            DataError::InvalidScene(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for DataError {
    fn from(err: io::Error) -> Self {
        DataError::Io(err)
    }
}

impl From<KernelError> for DataError {
    fn from(err: KernelError) -> Self {
        DataError::InvalidScene(err)
    }
}
