//! Walkability grid built around a reference point.

use outbreak_core::{Aabb, GridError, GridSettings, Obstacle, WorldPoint};
use tracing::debug;

/// Row and column of a cell within a [`SpatialGrid`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GridCoord {
    row: u32,
    column: u32,
}

impl GridCoord {
    /// Creates a new grid coordinate.
    #[must_use]
    pub const fn new(row: u32, column: u32) -> Self {
        Self { row, column }
    }

    /// Zero-based row index; rows grow with y.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Zero-based column index; columns grow with x.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }
}

/// A single cell of the grid.
///
/// Walkability is decided once when the grid is built. Search bookkeeping is
/// kept by the [`PathFinder`](crate::PathFinder), never on the node, so a grid
/// can be shared read-only between every agent evaluated in a tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridNode {
    coord: GridCoord,
    center: WorldPoint,
    walkable: bool,
}

impl GridNode {
    /// Position of the node within the grid.
    #[must_use]
    pub const fn coord(&self) -> GridCoord {
        self.coord
    }

    /// World-space centroid of the cell, used as a waypoint.
    #[must_use]
    pub const fn center(&self) -> WorldPoint {
        self.center
    }

    /// Whether no obstacle overlaps the cell.
    #[must_use]
    pub const fn is_walkable(&self) -> bool {
        self.walkable
    }
}

/// Square grid of walkable and blocked cells centered on a reference point.
///
/// The grid is a snapshot: it is rebuilt, never patched, when the obstacle
/// set or the reference point changes.
#[derive(Clone, Debug)]
pub struct SpatialGrid {
    settings: GridSettings,
    reference: WorldPoint,
    origin: WorldPoint,
    cells_per_edge: u32,
    nodes: Vec<GridNode>,
}

impl SpatialGrid {
    /// Builds a grid of `region_size / cell_size` cells per edge centered on
    /// `reference`, marking every cell that overlaps an obstacle as blocked.
    pub fn build(
        obstacles: &[Obstacle],
        reference: WorldPoint,
        settings: GridSettings,
    ) -> Result<Self, GridError> {
        if !reference.is_finite() {
            return Err(GridError::InvalidReference);
        }

        let cells_per_edge = settings.cells_per_edge()?;
        let cell_size = settings.cell_size();
        let half_region = settings.region_size() / 2.0;
        let origin = WorldPoint::new(reference.x() - half_region, reference.y() - half_region);

        let edge = cells_per_edge as usize;
        let mut nodes = Vec::with_capacity(edge * edge);
        let mut blocked = 0usize;
        for row in 0..cells_per_edge {
            for column in 0..cells_per_edge {
                let cell = Aabb::from_corner(
                    origin.x() + column as f32 * cell_size,
                    origin.y() + row as f32 * cell_size,
                    cell_size,
                    cell_size,
                );
                let walkable = !obstacles
                    .iter()
                    .any(|obstacle| cell.overlaps(obstacle.bounds()));
                if !walkable {
                    blocked += 1;
                }
                nodes.push(GridNode {
                    coord: GridCoord::new(row, column),
                    center: cell.center(),
                    walkable,
                });
            }
        }

        debug!(
            cells_per_edge,
            blocked,
            reference_x = reference.x(),
            reference_y = reference.y(),
            "built spatial grid"
        );

        Ok(Self {
            settings,
            reference,
            origin,
            cells_per_edge,
            nodes,
        })
    }

    /// Settings the grid was built with.
    #[must_use]
    pub const fn settings(&self) -> GridSettings {
        self.settings
    }

    /// Point the grid is centered on.
    #[must_use]
    pub const fn reference(&self) -> WorldPoint {
        self.reference
    }

    /// Number of rows, which equals the number of columns.
    #[must_use]
    pub const fn cells_per_edge(&self) -> u32 {
        self.cells_per_edge
    }

    /// Every node in row-major order.
    #[must_use]
    pub fn nodes(&self) -> &[GridNode] {
        &self.nodes
    }

    /// Number of cells not overlapped by any obstacle.
    #[must_use]
    pub fn walkable_count(&self) -> usize {
        self.nodes.iter().filter(|node| node.walkable).count()
    }

    /// Node at the provided coordinate, if it lies inside the grid.
    #[must_use]
    pub fn node(&self, coord: GridCoord) -> Option<&GridNode> {
        self.index(coord).map(|index| &self.nodes[index])
    }

    /// Node whose cell contains `point`, or `None` outside the covered region.
    #[must_use]
    pub fn node_at(&self, point: WorldPoint) -> Option<&GridNode> {
        self.coord_at(point).and_then(|coord| self.node(coord))
    }

    /// Coordinate of the cell containing `point`, or `None` outside the region.
    #[must_use]
    pub fn coord_at(&self, point: WorldPoint) -> Option<GridCoord> {
        if !point.is_finite() {
            return None;
        }

        let cell_size = self.settings.cell_size();
        let column = ((point.x() - self.origin.x()) / cell_size).floor();
        let row = ((point.y() - self.origin.y()) / cell_size).floor();
        let edge = self.cells_per_edge as f32;
        if column < 0.0 || row < 0.0 || column >= edge || row >= edge {
            return None;
        }

        Some(GridCoord::new(row as u32, column as u32))
    }

    /// Walkable, in-bounds nodes orthogonally adjacent to `coord`, visited in
    /// north, south, west, east order.
    pub fn neighbors(&self, coord: GridCoord) -> impl Iterator<Item = &GridNode> + '_ {
        self.neighbor_indices(coord)
            .map(move |index| &self.nodes[index])
    }

    pub(crate) fn neighbor_indices(&self, coord: GridCoord) -> impl Iterator<Item = usize> + '_ {
        let row = coord.row();
        let column = coord.column();
        let candidates = [
            row.checked_sub(1).map(|row| GridCoord::new(row, column)),
            row.checked_add(1).map(|row| GridCoord::new(row, column)),
            column.checked_sub(1).map(|column| GridCoord::new(row, column)),
            column.checked_add(1).map(|column| GridCoord::new(row, column)),
        ];

        candidates
            .into_iter()
            .flatten()
            .filter_map(move |candidate| self.index(candidate))
            .filter(move |&index| self.nodes[index].walkable)
    }

    pub(crate) fn index(&self, coord: GridCoord) -> Option<usize> {
        if coord.row() >= self.cells_per_edge || coord.column() >= self.cells_per_edge {
            return None;
        }
        let edge = usize::try_from(self.cells_per_edge).ok()?;
        let row = usize::try_from(coord.row()).ok()?;
        let column = usize::try_from(coord.column()).ok()?;
        row.checked_mul(edge)?.checked_add(column)
    }

    pub(crate) fn node_by_index(&self, index: usize) -> &GridNode {
        &self.nodes[index]
    }
}
