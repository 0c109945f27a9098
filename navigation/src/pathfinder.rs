//! A* search over a [`SpatialGrid`].

use std::{cmp::Ordering, collections::BinaryHeap};

use outbreak_core::WorldPoint;

use crate::grid::SpatialGrid;

/// Ordered list of waypoints produced by a search, with a cursor marking the
/// next waypoint to head for.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Path {
    waypoints: Vec<WorldPoint>,
    cursor: usize,
}

impl Path {
    /// A path with no waypoints, signalling that no route exists.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            waypoints: Vec::new(),
            cursor: 0,
        }
    }

    /// Creates a path that starts at the first of `waypoints`.
    #[must_use]
    pub fn from_waypoints(waypoints: Vec<WorldPoint>) -> Self {
        Self {
            waypoints,
            cursor: 0,
        }
    }

    /// Whether the path holds no waypoints at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    /// Total number of waypoints, including consumed ones.
    #[must_use]
    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    /// Every waypoint from start to goal.
    #[must_use]
    pub fn waypoints(&self) -> &[WorldPoint] {
        &self.waypoints
    }

    /// Index of the next waypoint.
    #[must_use]
    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    /// Waypoint currently being approached, if any remain.
    #[must_use]
    pub fn next_waypoint(&self) -> Option<WorldPoint> {
        self.waypoints.get(self.cursor).copied()
    }

    /// Marks the current waypoint as reached.
    pub fn advance(&mut self) {
        if self.cursor < self.waypoints.len() {
            self.cursor += 1;
        }
    }

    /// Whether every waypoint has been reached.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.cursor >= self.waypoints.len()
    }

    /// Sum of the straight-line distances between consecutive waypoints.
    #[must_use]
    pub fn cost(&self) -> f32 {
        self.waypoints
            .windows(2)
            .map(|pair| pair[0].distance_to(pair[1]))
            .sum()
    }
}

#[derive(Clone, Copy, Debug)]
struct NodeScratch {
    g: f32,
    parent: Option<usize>,
    closed: bool,
}

impl NodeScratch {
    const UNVISITED: Self = Self {
        g: f32::INFINITY,
        parent: None,
        closed: false,
    };
}

#[derive(Clone, Copy, Debug)]
struct OpenEntry {
    f: f32,
    sequence: u64,
    index: usize,
}

impl PartialEq for OpenEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for OpenEntry {}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OpenEntry {
    // Reversed so the max-heap pops the lowest f, then the earliest insertion.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .f
            .total_cmp(&self.f)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

/// Reusable A* search state.
///
/// Scratch costs are indexed by node and reset at the start of every search,
/// so results never depend on earlier searches and a single finder can serve
/// every agent in turn.
#[derive(Debug, Default)]
pub struct PathFinder {
    scratch: Vec<NodeScratch>,
    open: BinaryHeap<OpenEntry>,
    sequence: u64,
    expanded: usize,
}

impl PathFinder {
    /// Creates a finder with empty scratch buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of nodes expanded by the most recent search.
    #[must_use]
    pub const fn last_expanded(&self) -> usize {
        self.expanded
    }

    /// Finds the cheapest 4-connected route from the cell containing `start`
    /// to the cell containing `goal`.
    ///
    /// Waypoints are cell centers ordered from the start cell to the goal
    /// cell. The start cell may itself be blocked (an agent can stand in the
    /// free part of a partially covered cell); every other cell on the route
    /// is walkable. An empty path means either endpoint lies outside the grid
    /// or the goal cannot be reached.
    pub fn find_path(&mut self, grid: &SpatialGrid, start: WorldPoint, goal: WorldPoint) -> Path {
        self.expanded = 0;
        let (Some(start_coord), Some(goal_coord)) = (grid.coord_at(start), grid.coord_at(goal))
        else {
            return Path::empty();
        };
        let (Some(start_index), Some(goal_index)) =
            (grid.index(start_coord), grid.index(goal_coord))
        else {
            return Path::empty();
        };

        self.reset(grid.nodes().len());
        let goal_center = grid.node_by_index(goal_index).center();

        let start_center = grid.node_by_index(start_index).center();
        self.scratch[start_index] = NodeScratch {
            g: 0.0,
            parent: None,
            closed: false,
        };
        self.push(start_index, start_center.distance_to(goal_center));

        while let Some(entry) = self.open.pop() {
            let current = entry.index;
            if self.scratch[current].closed {
                continue;
            }
            if current == goal_index {
                return self.reconstruct(grid, goal_index);
            }
            self.scratch[current].closed = true;
            self.expanded += 1;

            let current_node = grid.node_by_index(current);
            let current_g = self.scratch[current].g;
            for neighbor in grid.neighbor_indices(current_node.coord()) {
                if self.scratch[neighbor].closed {
                    continue;
                }
                let neighbor_center = grid.node_by_index(neighbor).center();
                let tentative = current_g + current_node.center().distance_to(neighbor_center);
                if tentative < self.scratch[neighbor].g {
                    self.scratch[neighbor] = NodeScratch {
                        g: tentative,
                        parent: Some(current),
                        closed: false,
                    };
                    self.push(neighbor, tentative + neighbor_center.distance_to(goal_center));
                }
            }
        }

        Path::empty()
    }

    fn reset(&mut self, node_count: usize) {
        self.scratch.clear();
        self.scratch.resize(node_count, NodeScratch::UNVISITED);
        self.open.clear();
        self.sequence = 0;
    }

    fn push(&mut self, index: usize, f: f32) {
        self.open.push(OpenEntry {
            f,
            sequence: self.sequence,
            index,
        });
        self.sequence += 1;
    }

    fn reconstruct(&self, grid: &SpatialGrid, goal_index: usize) -> Path {
        let mut waypoints = Vec::new();
        let mut cursor = Some(goal_index);
        while let Some(index) = cursor {
            waypoints.push(grid.node_by_index(index).center());
            cursor = self.scratch[index].parent;
        }
        waypoints.reverse();
        Path::from_waypoints(waypoints)
    }
}
