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

//! # Wallsense Core
//!
//! Foundational crate containing the geometric kernel of the maze simulator:
//! 2D math, collision primitives, composite collision bodies, motion profiles,
//! and the interface contracts (such as [`field::OccupancyField`]) that the data
//! and lane crates build on.
//!
//! Every operation here is a synchronous computation over caller-owned inputs.
//! Nothing in this crate allocates behind the caller's back in a hot path, and
//! nothing holds global state.

#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod field;
pub mod math;
pub mod motion;
pub mod physics;

pub use error::KernelError;
