#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Seeded generator for maze-like obstacle layouts around a reference point.

use outbreak_core::{Aabb, GridError, GridSettings, Obstacle, WorldPoint};
use rand::Rng;
use tracing::debug;

/// Parameters controlling maze generation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MazeSettings {
    /// Tiling of the generated region; each filled tile becomes one obstacle.
    pub grid: GridSettings,
    /// Chance that a tile outside the safe zone is filled.
    pub fill_probability: f32,
    /// Half extent of the square kept clear around the reference point.
    pub safe_margin: f32,
    /// Chance that a filled tile hurts the player on contact.
    pub harmful_probability: f32,
}

impl Default for MazeSettings {
    fn default() -> Self {
        Self {
            grid: GridSettings::default(),
            fill_probability: 0.3,
            safe_margin: 150.0,
            harmful_probability: 0.0,
        }
    }
}

/// Tiles the region centered on `reference` with randomly placed obstacles.
///
/// Tiles overlapping the safe zone around `reference` are never filled, so
/// a player standing there always has room to move. Obstacles are produced
/// column by column, top to bottom, which keeps the output stable for a
/// given generator state.
pub fn generate_maze<R: Rng + ?Sized>(
    reference: WorldPoint,
    settings: &MazeSettings,
    rng: &mut R,
) -> Result<Vec<Obstacle>, GridError> {
    if !reference.is_finite() {
        return Err(GridError::InvalidReference);
    }
    let tiles = settings.grid.cells_per_edge()?;
    let cell = settings.grid.cell_size();
    let half_region = settings.grid.region_size() / 2.0;
    let left = reference.x() - half_region;
    let top = reference.y() - half_region;
    let safe_zone = Aabb::new(reference, settings.safe_margin, settings.safe_margin);

    let mut obstacles = Vec::new();
    for column in 0..tiles {
        for row in 0..tiles {
            let tile = Aabb::from_corner(
                left + column as f32 * cell,
                top + row as f32 * cell,
                cell,
                cell,
            );
            if tile.overlaps(&safe_zone) {
                continue;
            }
            if rng.gen::<f32>() >= settings.fill_probability {
                continue;
            }
            let obstacle = if rng.gen::<f32>() < settings.harmful_probability {
                Obstacle::harmful(tile)
            } else {
                Obstacle::solid(tile)
            };
            obstacles.push(obstacle);
        }
    }

    debug!(
        obstacles = obstacles.len(),
        tiles = tiles * tiles,
        "maze generated"
    );
    Ok(obstacles)
}
