//! Construction heuristics for the TSP.

use crate::instance::TspInstance;
use crate::solution::Solution;
use ordered_float::OrderedFloat;

/// Trait for construction heuristics
pub trait ConstructionHeuristic {
    fn construct(&self, instance: &TspInstance) -> Solution;
    fn name(&self) -> &str;
}

/// Nearest Neighbor Heuristic
///
/// Starts at the first point and repeatedly moves to the closest point that
/// has not been visited yet. Ties go to the lowest point index.
#[derive(Debug, Clone, Copy, Default)]
pub struct NearestNeighborHeuristic;

impl NearestNeighborHeuristic {
    pub fn new() -> Self {
        NearestNeighborHeuristic
    }

    fn find_nearest(&self, instance: &TspInstance, current: usize, visited: &[bool]) -> Option<usize> {
        (0..instance.dimension())
            .filter(|&n| !visited[n])
            .min_by_key(|&n| OrderedFloat(instance.distance(current, n)))
    }
}

impl ConstructionHeuristic for NearestNeighborHeuristic {
    fn construct(&self, instance: &TspInstance) -> Solution {
        let start = std::time::Instant::now();
        let n = instance.dimension();

        let mut tour = Vec::with_capacity(n);
        let mut visited = vec![false; n];

        let mut current = 0;
        tour.push(current);
        visited[current] = true;

        while let Some(next) = self.find_nearest(instance, current, &visited) {
            tour.push(next);
            visited[next] = true;
            current = next;
        }

        let mut solution = Solution::from_tour(instance, tour, self.name());
        solution.computation_time = start.elapsed().as_secs_f64();

        log::debug!("Nearest neighbour tour of length {:.4}", solution.length);

        solution
    }

    fn name(&self) -> &str {
        "NearestNeighbor"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datasets;
    use crate::instance::Point;
    use proptest::prelude::*;
    use std::collections::HashSet;

    #[test]
    fn test_unit_square() {
        let points = vec![
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(1.0, 1.0),
            Point::new(0.0, 1.0),
        ];
        let instance = TspInstance::from_points("square", points).unwrap();
        let solution = NearestNeighborHeuristic::new().construct(&instance);

        // Points 1 and 3 tie from the start; the lower index wins.
        assert_eq!(solution.tour, vec![0, 1, 2, 3]);
        assert!((solution.length - 4.0).abs() < 1e-10);
    }

    #[test]
    fn test_two_points() {
        let points = vec![Point::new(0.0, 0.0), Point::new(3.0, 4.0)];
        let instance = TspInstance::from_points("pair", points).unwrap();
        let solution = NearestNeighborHeuristic::new().construct(&instance);

        assert_eq!(solution.tour, vec![0, 1]);
        assert!((solution.length - 10.0).abs() < 1e-10);
    }

    #[test]
    fn test_includes_return_edge() {
        let points = vec![Point::new(0.0, 0.0), Point::new(1.0, 0.0), Point::new(5.0, 0.0)];
        let instance = TspInstance::from_points("line", points).unwrap();
        let solution = NearestNeighborHeuristic::new().construct(&instance);

        assert_eq!(solution.tour, vec![0, 1, 2]);
        assert!((solution.length - 10.0).abs() < 1e-10);
    }

    #[test]
    fn test_demo_sets_are_permutations() {
        for instance in [datasets::path20().unwrap(), datasets::path30().unwrap()] {
            let solution = NearestNeighborHeuristic::new().construct(&instance);
            let seen: HashSet<usize> = solution.tour.iter().copied().collect();
            assert_eq!(seen, (0..instance.dimension()).collect::<HashSet<_>>());
            assert!(solution.is_complete(&instance));
        }
    }

    proptest! {
        #[test]
        fn prop_tour_is_permutation(
            coords in prop::collection::vec((-100i32..100, -100i32..100), 2..25)
        ) {
            let points: Vec<Point> = coords.iter().map(|&(x, y)| Point::new(x as f64, y as f64)).collect();
            let instance = TspInstance::from_points("random", points).unwrap();
            let solution = NearestNeighborHeuristic::new().construct(&instance);

            let seen: HashSet<usize> = solution.tour.iter().copied().collect();
            prop_assert_eq!(solution.tour.len(), instance.dimension());
            prop_assert_eq!(seen.len(), instance.dimension());
            prop_assert!((solution.length - instance.tour_length(&solution.tour)).abs() < 1e-9);
        }
    }
}
