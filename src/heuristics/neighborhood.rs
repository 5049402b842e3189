//! Pairwise-swap neighbourhoods.
//!
//! A swap move exchanges the points at two tour positions. Tabu Search scans
//! the whole neighbourhood; Simulated Annealing samples one move at a time.

use crate::heuristics::random::RandomSource;
use crate::instance::DistanceTable;
use crate::solution::Candidate;
use ordered_float::OrderedFloat;

/// Exchange of the points at two tour positions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapMove {
    pub i: usize,
    pub j: usize,
}

impl SwapMove {
    pub fn new(i: usize, j: usize) -> Self {
        SwapMove { i, j }
    }

    /// Apply the move to a copy of `tour`
    pub fn apply(&self, tour: &[usize]) -> Vec<usize> {
        let mut new_tour = tour.to_vec();
        new_tour.swap(self.i, self.j);
        new_tour
    }
}

/// A neighbouring tour together with the move that produced it
#[derive(Debug, Clone, PartialEq)]
pub struct Neighbor {
    pub swap: SwapMove,
    pub candidate: Candidate,
}

impl Neighbor {
    fn evaluate(table: &DistanceTable, tour: &[usize], swap: SwapMove) -> Self {
        Neighbor {
            swap,
            candidate: Candidate::from_tour(table, swap.apply(tour)),
        }
    }
}

/// Every tour reachable by one swap, C(n, 2) of them, sorted by ascending length.
///
/// Moves are generated in lexicographic `(i, j)` order with `i < j` and the sort
/// is stable, so equal lengths keep generation order.
pub fn swap_neighbors(table: &DistanceTable, tour: &[usize]) -> Vec<Neighbor> {
    let n = tour.len();
    let mut neighbors = Vec::with_capacity(n * n.saturating_sub(1) / 2);

    for i in 0..n {
        for j in i + 1..n {
            neighbors.push(Neighbor::evaluate(table, tour, SwapMove::new(i, j)));
        }
    }

    neighbors.sort_by_key(|nb| OrderedFloat(nb.candidate.length));
    neighbors
}

/// One random swap neighbour. Both positions are drawn independently, so a
/// draw of the same position twice returns the tour unchanged.
pub fn random_swap<R: RandomSource + ?Sized>(
    table: &DistanceTable,
    tour: &[usize],
    rng: &mut R,
) -> Neighbor {
    let n = tour.len();
    let i = rng.index(n);
    let j = rng.index(n);
    Neighbor::evaluate(table, tour, SwapMove::new(i, j))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heuristics::random::ScriptedSource;
    use crate::instance::Point;
    use crate::solution::is_permutation;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn square_table() -> DistanceTable {
        DistanceTable::from_points(&[
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(1.0, 1.0),
            Point::new(0.0, 1.0),
        ])
        .unwrap()
    }

    #[test]
    fn test_swap_neighbors_count_and_order() {
        let table = square_table();
        let neighbors = swap_neighbors(&table, &[0, 1, 2, 3]);

        assert_eq!(neighbors.len(), 6);
        for pair in neighbors.windows(2) {
            assert!(pair[0].candidate.length <= pair[1].candidate.length);
        }

        // Swapping opposite corners, (0,2) and (1,3), keeps the square: length 4.
        // Both tie at the top and keep their generation order.
        assert_eq!(neighbors[0].swap, SwapMove::new(0, 2));
        assert_eq!(neighbors[1].swap, SwapMove::new(1, 3));
        assert!((neighbors[0].candidate.length - 4.0).abs() < 1e-10);
        assert!((neighbors[1].candidate.length - 4.0).abs() < 1e-10);
    }

    #[test]
    fn test_ties_keep_generation_order() {
        // Collinear points at integer spacing give exact integer lengths.
        let points: Vec<Point> = (0..4).map(|k| Point::new(k as f64, 0.0)).collect();
        let table = DistanceTable::from_points(&points).unwrap();
        let neighbors = swap_neighbors(&table, &[0, 1, 2, 3]);

        let order: Vec<(SwapMove, f64)> = neighbors.iter().map(|nb| (nb.swap, nb.candidate.length)).collect();
        assert_eq!(
            order,
            vec![
                (SwapMove::new(0, 1), 6.0),
                (SwapMove::new(0, 2), 6.0),
                (SwapMove::new(1, 3), 6.0),
                (SwapMove::new(2, 3), 6.0),
                (SwapMove::new(0, 3), 8.0),
                (SwapMove::new(1, 2), 8.0),
            ]
        );
    }

    #[test]
    fn test_two_point_neighborhood() {
        let table = DistanceTable::from_points(&[Point::new(0.0, 0.0), Point::new(3.0, 4.0)]).unwrap();
        let neighbors = swap_neighbors(&table, &[0, 1]);

        assert_eq!(neighbors.len(), 1);
        assert_eq!(neighbors[0].candidate.tour, vec![1, 0]);
        assert!((neighbors[0].candidate.length - 10.0).abs() < 1e-10);
    }

    #[test]
    fn test_random_swap_uses_source() {
        let table = square_table();
        let mut source = ScriptedSource::new(&[3, 1, 2, 2], &[]);

        let nb = random_swap(&table, &[0, 1, 2, 3], &mut source);
        assert_eq!(nb.swap, SwapMove::new(3, 1));
        assert_eq!(nb.candidate.tour, vec![0, 3, 2, 1]);

        let same = random_swap(&table, &[0, 1, 2, 3], &mut source);
        assert_eq!(same.candidate.tour, vec![0, 1, 2, 3]);
        assert!(source.is_exhausted());
    }

    proptest! {
        #[test]
        fn prop_random_swap_keeps_permutation(seed in any::<u64>(), n in 2usize..12) {
            let points: Vec<Point> = (0..n).map(|k| Point::new(k as f64, (k * k) as f64)).collect();
            let table = DistanceTable::from_points(&points).unwrap();
            let tour: Vec<usize> = (0..n).rev().collect();
            let mut rng = ChaCha8Rng::seed_from_u64(seed);

            let nb = random_swap(&table, &tour, &mut rng);
            prop_assert!(is_permutation(&nb.candidate.tour, n));
            prop_assert!((nb.candidate.length - table.tour_length(&nb.candidate.tour)).abs() < 1e-9);
        }
    }
}
