//! Heuristics module for the TSP.
//!
//! This module exports the construction heuristic, the swap neighbourhoods and
//! the two improvement metaheuristics.

pub mod construction;
pub mod neighborhood;
pub mod random;
pub mod observer;
pub mod local_search;
pub mod tabu;
pub mod annealing;

pub use construction::*;
pub use neighborhood::*;
pub use random::*;
pub use observer::*;
pub use local_search::*;
pub use tabu::*;
pub use annealing::*;
