#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Navigation engine used by pursuing agents.
//!
//! The engine is a leaf: it reads obstacle geometry and answers three
//! questions. [`SpatialGrid`] discretises a square region around a reference
//! point into walkable and blocked cells, [`PathFinder`] runs A* over that
//! grid, [`is_clear`] samples a straight sight line, and [`try_move`] applies
//! all-or-nothing box translation. None of these hold per-agent state.

mod collision;
mod grid;
mod pathfinder;
mod visibility;

pub use collision::{collides, try_move, try_walk, MoveOutcome};
pub use grid::{GridCoord, GridNode, SpatialGrid};
pub use outbreak_core::{GridError, GridSettings};
pub use pathfinder::{Path, PathFinder};
pub use visibility::{is_clear, SAMPLE_SPACING};
