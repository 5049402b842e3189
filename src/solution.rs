//! Solution representation for the TSP.
//!
//! A [`Candidate`] is the pair the search engines work with: a tour and its
//! cyclic length. A [`Solution`] wraps the final candidate with the metadata
//! that gets reported (algorithm, timing, iteration count).

use crate::error::{Result, SolverError};
use crate::instance::{DistanceTable, TspInstance};
use serde::{Deserialize, Serialize};

/// Tolerance used when checking a carried length against a recomputed one
pub const LENGTH_EPSILON: f64 = 1e-6;

/// A tour paired with its total cyclic length
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    /// Point indices in visiting order; the last point connects back to the first
    pub tour: Vec<usize>,
    /// Sum of consecutive distances including the wraparound edge
    pub length: f64,
}

impl Candidate {
    /// Build a candidate, computing its length from the table
    pub fn from_tour(table: &DistanceTable, tour: Vec<usize>) -> Self {
        let length = table.tour_length(&tour);
        Candidate { tour, length }
    }

    /// Check that the tour is a permutation of the table's points and that the
    /// carried length matches the recomputed one.
    pub fn validate(&self, table: &DistanceTable) -> Result<()> {
        if !is_permutation(&self.tour, table.len()) {
            return Err(SolverError::MalformedTour(format!(
                "{:?} is not a permutation of 0..{}",
                self.tour,
                table.len()
            )));
        }

        let recomputed = table.tour_length(&self.tour);
        if (recomputed - self.length).abs() > LENGTH_EPSILON {
            return Err(SolverError::MalformedTour(format!(
                "carried length {} differs from recomputed length {}",
                self.length, recomputed
            )));
        }

        Ok(())
    }
}

/// Whether `tour` visits every index in `0..n` exactly once
pub fn is_permutation(tour: &[usize], n: usize) -> bool {
    if tour.len() != n {
        return false;
    }

    let mut seen = vec![false; n];
    for &node in tour {
        if node >= n || seen[node] {
            return false;
        }
        seen[node] = true;
    }

    true
}

/// Represents a reported solution to a TSP instance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Solution {
    /// The tour as a sequence of point indices
    pub tour: Vec<usize>,
    /// Total cyclic tour length
    pub length: f64,
    /// Algorithm that generated this solution
    pub algorithm: String,
    /// Computation time in seconds
    pub computation_time: f64,
    /// Number of iterations (if applicable)
    pub iterations: Option<usize>,
}

impl Solution {
    /// Create a solution from a tour
    pub fn from_tour(instance: &TspInstance, tour: Vec<usize>, algorithm: &str) -> Self {
        let length = instance.tour_length(&tour);
        Solution {
            tour,
            length,
            algorithm: algorithm.to_string(),
            computation_time: 0.0,
            iterations: None,
        }
    }

    /// Wrap a candidate produced by a search engine
    pub fn from_candidate(candidate: Candidate, algorithm: &str) -> Self {
        Solution {
            tour: candidate.tour,
            length: candidate.length,
            algorithm: algorithm.to_string(),
            computation_time: 0.0,
            iterations: None,
        }
    }

    /// The (tour, length) pair handed to the search engines
    pub fn to_candidate(&self) -> Candidate {
        Candidate {
            tour: self.tour.clone(),
            length: self.length,
        }
    }

    /// Check if all points are visited exactly once
    pub fn is_complete(&self, instance: &TspInstance) -> bool {
        is_permutation(&self.tour, instance.dimension())
    }

    /// Human-readable rendering: the length followed by each visited point
    pub fn render(&self, instance: &TspInstance) -> String {
        let mut out = format!("Tour length: {:.4}\n", self.length);
        for &node in &self.tour {
            out.push_str(&format!("{}\n", instance.points[node]));
        }
        out
    }
}

impl std::fmt::Display for Solution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Solution ({})", self.algorithm)?;
        writeln!(f, "  Length: {:.4}", self.length)?;
        writeln!(f, "  Time: {:.4}s", self.computation_time)?;
        if let Some(iter) = self.iterations {
            writeln!(f, "  Iterations: {}", iter)?;
        }
        writeln!(f, "  Tour: {:?}", self.tour)
    }
}
