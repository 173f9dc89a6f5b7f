use rand::Rng;

use crate::point::{Point, PointId};

/// Place `count` points uniformly at random inside a `width` x `height`
/// area, labelled 1..=count in generation order.
///
/// Each coordinate is drawn from `[radius, max(radius + 1, dim - radius))`
/// so the whole point stays inside the area when it fits; areas smaller than
/// twice the radius clamp to a 1-unit span instead of erroring. Points may
/// overlap each other; that is part of the game, not a bug.
pub fn spawn_points<R: Rng>(
    count: usize,
    width: f64,
    height: f64,
    radius: f64,
    run: u32,
    rng: &mut R,
) -> Vec<Point> {
    let max_x = (radius + 1.0).max(width - radius);
    let max_y = (radius + 1.0).max(height - radius);

    (0..count)
        .map(|i| Point {
            id: PointId {
                run,
                seq: i as u32,
            },
            x: rng.gen_range(radius..max_x),
            y: rng.gen_range(radius..max_y),
            label: i + 1,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    const RADIUS: f64 = 2.0;

    #[test]
    fn labels_are_contiguous_from_one() {
        let mut rng = rand::thread_rng();
        for count in [1usize, 2, 7, 40] {
            let points = spawn_points(count, 80.0, 24.0, RADIUS, 0, &mut rng);
            assert_eq!(points.len(), count);
            let labels: Vec<usize> = points.iter().map(|p| p.label).collect();
            assert_eq!(labels, (1..=count).collect::<Vec<_>>());
        }
    }

    #[test]
    fn ids_are_unique_within_a_call() {
        let mut rng = rand::thread_rng();
        let points = spawn_points(30, 80.0, 24.0, RADIUS, 3, &mut rng);
        let ids: HashSet<_> = points.iter().map(|p| p.id).collect();
        assert_eq!(ids.len(), 30);
        assert!(points.iter().all(|p| p.id.run == 3));
    }

    #[test]
    fn ids_differ_across_runs() {
        let mut rng = rand::thread_rng();
        let first = spawn_points(5, 80.0, 24.0, RADIUS, 1, &mut rng);
        let second = spawn_points(5, 80.0, 24.0, RADIUS, 2, &mut rng);
        for (a, b) in first.iter().zip(second.iter()) {
            assert_ne!(a.id, b.id);
        }
    }

    #[test]
    fn coordinates_stay_within_spawn_bounds() {
        let mut rng = rand::thread_rng();
        for _ in 0..50 {
            let points = spawn_points(20, 80.0, 24.0, RADIUS, 0, &mut rng);
            for p in points {
                assert!(p.x >= RADIUS && p.x < 80.0 - RADIUS, "x out of bounds: {}", p.x);
                assert!(p.y >= RADIUS && p.y < 24.0 - RADIUS, "y out of bounds: {}", p.y);
            }
        }
    }

    #[test]
    fn degenerate_area_clamps_instead_of_failing() {
        let mut rng = rand::thread_rng();
        // area smaller than twice the radius, even zero-sized
        for (w, h) in [(0.0, 0.0), (1.0, 1.0), (3.0, 0.5)] {
            let points = spawn_points(10, w, h, RADIUS, 0, &mut rng);
            assert_eq!(points.len(), 10);
            for p in points {
                assert!(p.x >= RADIUS && p.x < RADIUS + 1.0);
                assert!(p.y >= RADIUS && p.y < RADIUS + 1.0);
            }
        }
    }
}
