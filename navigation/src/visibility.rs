//! Sampled line-of-sight tests against obstacle boxes.

use outbreak_core::{Aabb, Obstacle, WorldPoint};

/// Distance between consecutive samples along a sight line.
pub const SAMPLE_SPACING: f32 = 5.0;

const PROBE_SIZE: f32 = 1.0;

/// Reports whether the segment between two points avoids every obstacle.
///
/// The segment is sampled every [`SAMPLE_SPACING`] units, endpoints
/// included, and a unit probe box placed at each sample is tested for strict
/// overlap. Obstacles thinner than the spacing can therefore be missed. The
/// endpoints are ordered before sampling so the answer is symmetric.
#[must_use]
pub fn is_clear(start: WorldPoint, end: WorldPoint, obstacles: &[Obstacle]) -> bool {
    let (from, to) = canonical_order(start, end);
    let steps = sample_steps(from.distance_to(to));

    (0..=steps).all(|step| {
        let point = from.lerp(to, step as f32 / steps as f32);
        let probe = Aabb::from_corner(point.x(), point.y(), PROBE_SIZE, PROBE_SIZE);
        !obstacles
            .iter()
            .any(|obstacle| probe.overlaps(obstacle.bounds()))
    })
}

fn sample_steps(distance: f32) -> u32 {
    let steps = (distance / SAMPLE_SPACING).floor();
    if steps.is_finite() && steps >= 1.0 {
        steps as u32
    } else {
        1
    }
}

fn canonical_order(a: WorldPoint, b: WorldPoint) -> (WorldPoint, WorldPoint) {
    let ordering = a
        .x()
        .total_cmp(&b.x())
        .then_with(|| a.y().total_cmp(&b.y()));
    if ordering.is_gt() {
        (b, a)
    } else {
        (a, b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wall() -> Obstacle {
        Obstacle::solid(Aabb::from_corner(50.0, -100.0, 20.0, 200.0))
    }

    #[test]
    fn open_field_is_clear() {
        assert!(is_clear(
            WorldPoint::new(0.0, 0.0),
            WorldPoint::new(300.0, 40.0),
            &[]
        ));
    }

    #[test]
    fn wall_between_points_blocks_sight() {
        let obstacles = [wall()];
        assert!(!is_clear(
            WorldPoint::new(0.0, 0.0),
            WorldPoint::new(120.0, 0.0),
            &obstacles
        ));
        assert!(!is_clear(
            WorldPoint::new(120.0, 0.0),
            WorldPoint::new(0.0, 0.0),
            &obstacles
        ));
    }

    #[test]
    fn wall_beside_segment_does_not_block() {
        let obstacles = [wall()];
        assert!(is_clear(
            WorldPoint::new(0.0, 150.0),
            WorldPoint::new(120.0, 150.0),
            &obstacles
        ));
    }

    #[test]
    fn coincident_points_sample_the_endpoint() {
        let obstacles = [wall()];
        let inside = WorldPoint::new(55.0, 0.0);
        assert!(!is_clear(inside, inside, &obstacles));
        assert!(is_clear(WorldPoint::ORIGIN, WorldPoint::ORIGIN, &obstacles));
    }

    #[test]
    fn sample_steps_never_drop_below_one() {
        assert_eq!(sample_steps(0.0), 1);
        assert_eq!(sample_steps(4.9), 1);
        assert_eq!(sample_steps(12.0), 2);
        assert_eq!(sample_steps(f32::NAN), 1);
    }
}
