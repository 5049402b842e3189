//! Common front-end for the improvement metaheuristics.

use crate::error::Result;
use crate::heuristics::observer::{LogObserver, SearchObserver};
use crate::instance::TspInstance;
use crate::solution::Solution;

/// Trait for improvement methods that start from an existing tour.
///
/// The input solution is left untouched; the best tour found is returned as a
/// new value.
pub trait LocalSearch {
    /// Improve `solution`, reporting progress to `observer`
    fn improve_observed(
        &self,
        instance: &TspInstance,
        solution: &Solution,
        observer: &mut dyn SearchObserver,
    ) -> Result<Solution>;

    fn name(&self) -> &str;

    /// Improve `solution`, logging progress through the `log` facade
    fn improve(&self, instance: &TspInstance, solution: &Solution) -> Result<Solution> {
        self.improve_observed(instance, solution, &mut LogObserver)
    }
}
