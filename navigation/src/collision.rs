//! Box movement resolution against static obstacles.

use outbreak_core::{Aabb, Obstacle, WorldPoint};

/// Result of attempting to move a box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MoveOutcome {
    /// Box after the attempt; unchanged when the move was refused.
    pub bounds: Aabb,
    /// Whether the translation was applied.
    pub moved: bool,
}

/// Reports whether `bounds` strictly overlaps any obstacle.
#[must_use]
pub fn collides(bounds: &Aabb, obstacles: &[Obstacle]) -> bool {
    obstacles
        .iter()
        .any(|obstacle| bounds.overlaps(obstacle.bounds()))
}

/// Translates `current` by `delta` unless the translated box would overlap
/// an obstacle.
///
/// Moves are all-or-nothing: there is no sliding along walls. A box that
/// already overlaps an obstacle cannot move while the overlap persists.
#[must_use]
pub fn try_move(current: &Aabb, delta: WorldPoint, obstacles: &[Obstacle]) -> MoveOutcome {
    resolve(current, delta, |candidate| collides(candidate, obstacles))
}

/// Like [`try_move`], but only solid obstacles block. Harmful ground can be
/// walked onto and stood on.
#[must_use]
pub fn try_walk(current: &Aabb, delta: WorldPoint, obstacles: &[Obstacle]) -> MoveOutcome {
    resolve(current, delta, |candidate| {
        obstacles
            .iter()
            .any(|obstacle| !obstacle.is_harmful() && candidate.overlaps(obstacle.bounds()))
    })
}

fn resolve(current: &Aabb, delta: WorldPoint, blocked: impl Fn(&Aabb) -> bool) -> MoveOutcome {
    let candidate = current.translated(delta);
    if !candidate.center().is_finite() || blocked(&candidate) {
        return MoveOutcome {
            bounds: *current,
            moved: false,
        };
    }

    MoveOutcome {
        bounds: candidate,
        moved: true,
    }
}
