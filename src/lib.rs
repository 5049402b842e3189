//! TSP Solver Library
//!
//! Approximate solutions to the Euclidean Traveling Salesman Problem.
//!
//! # Features
//!
//! - Greedy nearest-neighbour construction
//! - Tabu Search over the full pairwise-swap neighbourhood
//! - Simulated Annealing over random pairwise swaps
//! - Seedable, injectable randomness and pluggable progress observers
//! - Benchmarking and SVG visualization tools
//!
//! # Example
//!
//! ```no_run
//! use tsp_solver::instance::TspInstance;
//! use tsp_solver::heuristics::construction::{ConstructionHeuristic, NearestNeighborHeuristic};
//! use tsp_solver::heuristics::local_search::LocalSearch;
//! use tsp_solver::heuristics::tabu::TabuSearch;
//!
//! let instance = TspInstance::from_file("points.csv").unwrap();
//!
//! let initial = NearestNeighborHeuristic::new().construct(&instance);
//! let best = TabuSearch::with_params(4, 50).improve(&instance, &initial).unwrap();
//!
//! println!("Tour length: {:.2}", best.length);
//! ```

pub mod error;
pub mod instance;
pub mod solution;
pub mod heuristics;
pub mod config;
pub mod datasets;
pub mod benchmark;
pub mod visualization;

pub use error::{Result, SolverError};
pub use instance::{Point, TspInstance};
pub use solution::{Candidate, Solution};
