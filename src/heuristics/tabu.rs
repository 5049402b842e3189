//! Tabu Search over the pairwise-swap neighbourhood.
//!
//! The tabu list stores whole tours. Each iteration moves to the shortest
//! neighbour that is not tabu; when every neighbour is tabu the shortest one is
//! taken anyway so the search always advances.

use crate::error::{Result, SolverError};
use crate::heuristics::local_search::LocalSearch;
use crate::heuristics::neighborhood::swap_neighbors;
use crate::heuristics::observer::{SearchObserver, TabuStep};
use crate::instance::{DistanceTable, TspInstance};
use crate::solution::{Candidate, Solution};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::Instant;

/// Bounded FIFO memory of visited tours
#[derive(Debug, Clone)]
pub struct TabuList {
    entries: VecDeque<Vec<usize>>,
    capacity: usize,
}

impl TabuList {
    pub fn new(capacity: usize) -> Self {
        TabuList {
            entries: VecDeque::new(),
            capacity,
        }
    }

    pub fn contains(&self, tour: &[usize]) -> bool {
        self.entries.iter().any(|entry| entry.as_slice() == tour)
    }

    /// Append a tour; returns the oldest entry if the list overflowed
    pub fn push(&mut self, tour: Vec<usize>) -> Option<Vec<usize>> {
        self.entries.push_back(tour);
        if self.entries.len() > self.capacity {
            self.entries.pop_front()
        } else {
            None
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries from oldest to newest
    pub fn iter(&self) -> impl Iterator<Item = &Vec<usize>> {
        self.entries.iter()
    }
}

/// Tabu Search parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TabuConfig {
    /// Maximum number of tours remembered
    pub capacity: usize,
    /// Number of iterations
    pub iterations: usize,
}

impl Default for TabuConfig {
    fn default() -> Self {
        TabuConfig {
            capacity: 4,
            iterations: 13,
        }
    }
}

impl TabuConfig {
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.capacity == 0 {
            return Err(SolverError::parameter("capacity", "must be a positive integer"));
        }
        if self.iterations == 0 {
            return Err(SolverError::parameter("iterations", "must be a positive integer"));
        }
        Ok(())
    }
}

/// Tabu Search
///
/// Local search with memory to avoid cycling.
#[derive(Debug, Clone, Default)]
pub struct TabuSearch {
    pub config: TabuConfig,
}

impl TabuSearch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_params(capacity: usize, iterations: usize) -> Self {
        TabuSearch {
            config: TabuConfig { capacity, iterations },
        }
    }

    pub fn with_config(config: TabuConfig) -> Self {
        TabuSearch { config }
    }

    /// Run the search from `initial` and return the best candidate seen
    pub fn run(
        &self,
        table: &DistanceTable,
        initial: Candidate,
        observer: &mut dyn SearchObserver,
    ) -> Result<Candidate> {
        self.config.validate()?;
        initial.validate(table)?;

        let mut tabu = TabuList::new(self.config.capacity);
        tabu.push(initial.tour.clone());

        let mut current = initial;
        let mut best = current.clone();

        log::info!(
            "Tabu search: {} points, capacity {}, {} iterations, initial length {:.4}",
            table.len(),
            self.config.capacity,
            self.config.iterations,
            best.length
        );

        for iteration in 0..self.config.iterations {
            let neighbors = swap_neighbors(table, &current.tour);

            let (index, fallback) = match neighbors
                .iter()
                .position(|nb| !tabu.contains(&nb.candidate.tour))
            {
                Some(index) => (index, false),
                None => (0, true),
            };

            current = neighbors
                .into_iter()
                .nth(index)
                .map(|nb| nb.candidate)
                .ok_or_else(|| SolverError::MalformedTour("tour has no swap neighbours".to_string()))?;

            if current.length < best.length {
                best = current.clone();
            }

            let evicted = tabu.push(current.tour.clone());

            observer.on_tabu_step(&TabuStep {
                iteration,
                current: &current,
                best_length: best.length,
                fallback,
                tabu_len: tabu.len(),
                evicted: evicted.as_deref(),
            });
        }

        log::info!("Tabu search finished: best length {:.4}", best.length);

        Ok(best)
    }
}

impl LocalSearch for TabuSearch {
    fn improve_observed(
        &self,
        instance: &TspInstance,
        solution: &Solution,
        observer: &mut dyn SearchObserver,
    ) -> Result<Solution> {
        let start = Instant::now();
        let best = self.run(&instance.table, solution.to_candidate(), observer)?;

        let mut improved = Solution::from_candidate(best, self.name());
        improved.computation_time = start.elapsed().as_secs_f64();
        improved.iterations = Some(self.config.iterations);
        Ok(improved)
    }

    fn name(&self) -> &str {
        "TabuSearch"
    }
}
