//! Simulated Annealing over random pairwise swaps.
//!
//! Each inner step proposes one random swap. Shorter tours are always
//! accepted. A tour that is not shorter is accepted with probability
//! `exp((current - proposed) / T)`, and only such an acceptance cools the
//! temperature. The best tour is sampled at the end of every outer iteration.

use crate::error::{Result, SolverError};
use crate::heuristics::local_search::LocalSearch;
use crate::heuristics::neighborhood::random_swap;
use crate::heuristics::observer::{Acceptance, AnnealingStep, SearchObserver};
use crate::heuristics::random::RandomSource;
use crate::instance::{DistanceTable, TspInstance};
use crate::solution::{Candidate, Solution};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Simulated Annealing parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnealingConfig {
    /// Starting temperature
    pub initial_temperature: f64,
    /// Number of outer iterations (epochs)
    pub outer_iterations: usize,
    /// Proposals per epoch
    pub inner_iterations: usize,
    /// Multiplier applied to the temperature on each accepted worsening move
    pub cooling_factor: f64,
}

impl Default for AnnealingConfig {
    fn default() -> Self {
        AnnealingConfig {
            initial_temperature: 50.0,
            outer_iterations: 50,
            inner_iterations: 50,
            cooling_factor: 0.99,
        }
    }
}

impl AnnealingConfig {
    pub fn with_initial_temperature(mut self, t: f64) -> Self {
        self.initial_temperature = t;
        self
    }

    pub fn with_iterations(mut self, outer: usize, inner: usize) -> Self {
        self.outer_iterations = outer;
        self.inner_iterations = inner;
        self
    }

    pub fn with_cooling_factor(mut self, factor: f64) -> Self {
        self.cooling_factor = factor;
        self
    }

    /// Total number of proposals
    pub fn total_steps(&self) -> usize {
        self.outer_iterations.saturating_mul(self.inner_iterations)
    }

    pub fn validate(&self) -> Result<()> {
        check_temperature(self.initial_temperature)?;
        if self.outer_iterations == 0 {
            return Err(SolverError::parameter("outer_iterations", "must be a positive integer"));
        }
        if self.inner_iterations == 0 {
            return Err(SolverError::parameter("inner_iterations", "must be a positive integer"));
        }
        if !(self.cooling_factor > 0.0 && self.cooling_factor <= 1.0) {
            return Err(SolverError::parameter(
                "cooling_factor",
                format!("must lie in (0, 1], got {}", self.cooling_factor),
            ));
        }
        Ok(())
    }
}

fn check_temperature(temperature: f64) -> Result<()> {
    if temperature > 0.0 && temperature.is_finite() {
        Ok(())
    } else {
        Err(SolverError::InvalidTemperature(temperature))
    }
}

/// Simulated Annealing
///
/// Metaheuristic that accepts worse solutions with decreasing probability.
#[derive(Debug, Clone)]
pub struct SimulatedAnnealing {
    pub config: AnnealingConfig,
    /// Random seed
    pub seed: u64,
}

impl SimulatedAnnealing {
    pub fn new() -> Self {
        SimulatedAnnealing {
            config: AnnealingConfig::default(),
            seed: 42,
        }
    }

    pub fn with_params(initial_temperature: f64, outer_iterations: usize, inner_iterations: usize) -> Self {
        SimulatedAnnealing {
            config: AnnealingConfig {
                initial_temperature,
                outer_iterations,
                inner_iterations,
                ..AnnealingConfig::default()
            },
            seed: 42,
        }
    }

    pub fn with_config(config: AnnealingConfig, seed: u64) -> Self {
        SimulatedAnnealing { config, seed }
    }

    /// Run the search from `initial` using the given random source
    pub fn run<R: RandomSource + ?Sized>(
        &self,
        table: &DistanceTable,
        initial: Candidate,
        rng: &mut R,
        observer: &mut dyn SearchObserver,
    ) -> Result<Candidate> {
        self.config.validate()?;
        initial.validate(table)?;

        let mut temperature = self.config.initial_temperature;
        let mut current = initial;
        let mut best = current.clone();

        log::info!(
            "Simulated annealing: {} points, T0={}, {}x{} iterations, initial length {:.4}",
            table.len(),
            temperature,
            self.config.outer_iterations,
            self.config.inner_iterations,
            best.length
        );

        for epoch in 0..self.config.outer_iterations {
            for step in 0..self.config.inner_iterations {
                let proposal = random_swap(table, &current.tour, rng);
                let proposed_length = proposal.candidate.length;

                let acceptance = if proposed_length < current.length {
                    Acceptance::Improving
                } else {
                    check_temperature(temperature)?;
                    let p = ((current.length - proposed_length) / temperature).exp();
                    if rng.unit() < p {
                        Acceptance::Worsening
                    } else {
                        Acceptance::Rejected
                    }
                };

                match acceptance {
                    Acceptance::Improving => current = proposal.candidate,
                    Acceptance::Worsening => {
                        current = proposal.candidate;
                        temperature *= self.config.cooling_factor;
                    }
                    Acceptance::Rejected => {}
                }

                observer.on_annealing_step(&AnnealingStep {
                    epoch,
                    step,
                    swap: proposal.swap,
                    proposed_length,
                    acceptance,
                    current: &current,
                    temperature,
                });
            }

            if current.length < best.length {
                best = current.clone();
            }

            observer.on_epoch(epoch, current.length);
        }

        log::info!(
            "Simulated annealing finished: best length {:.4}, final temperature {:.6}",
            best.length,
            temperature
        );

        Ok(best)
    }
}

impl Default for SimulatedAnnealing {
    fn default() -> Self {
        Self::new()
    }
}

impl LocalSearch for SimulatedAnnealing {
    fn improve_observed(
        &self,
        instance: &TspInstance,
        solution: &Solution,
        observer: &mut dyn SearchObserver,
    ) -> Result<Solution> {
        let start = Instant::now();
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        let best = self.run(&instance.table, solution.to_candidate(), &mut rng, observer)?;

        let mut improved = Solution::from_candidate(best, self.name());
        improved.computation_time = start.elapsed().as_secs_f64();
        improved.iterations = Some(self.config.total_steps());
        Ok(improved)
    }

    fn name(&self) -> &str {
        "SimulatedAnnealing"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datasets;
    use crate::heuristics::construction::{ConstructionHeuristic, NearestNeighborHeuristic};
    use crate::heuristics::observer::{NoopObserver, TraceRecorder};
    use crate::heuristics::random::ScriptedSource;
    use crate::instance::Point;

    fn square() -> TspInstance {
        let points = vec![
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(1.0, 1.0),
            Point::new(0.0, 1.0),
        ];
        TspInstance::from_points("square", points).unwrap()
    }

    fn nn_start(instance: &TspInstance) -> Candidate {
        NearestNeighborHeuristic::new().construct(instance).to_candidate()
    }

    #[test]
    fn test_config_validation() {
        assert!(AnnealingConfig::default().validate().is_ok());
        assert!(matches!(
            AnnealingConfig::default().with_initial_temperature(0.0).validate(),
            Err(SolverError::InvalidTemperature(_))
        ));
        assert!(AnnealingConfig::default().with_initial_temperature(f64::NAN).validate().is_err());
        assert!(AnnealingConfig::default().with_iterations(0, 5).validate().is_err());
        assert!(AnnealingConfig::default().with_cooling_factor(1.5).validate().is_err());
        assert!(AnnealingConfig::default().with_cooling_factor(0.0).validate().is_err());
    }

    #[test]
    fn test_total_steps_saturates() {
        assert_eq!(AnnealingConfig::default().total_steps(), 2500);
        let huge = AnnealingConfig::default().with_iterations(usize::MAX, 3);
        assert_eq!(huge.total_steps(), usize::MAX);
    }

    #[test]
    fn test_scripted_acceptance_sequence() {
        let instance = square();
        let initial = Candidate::from_tour(&instance.table, vec![0, 1, 2, 3]);

        // swap(1,2) -> crossing tour, r=0.5 rejects at T=1 (p ~ 0.437)
        // swap(1,2) -> crossing tour, r=0.1 accepts and cools to 0.99
        // swap(2,1) -> back to the square, strictly shorter
        let mut source = ScriptedSource::new(&[1, 2, 1, 2, 2, 1], &[0.5, 0.1]);
        let sa = SimulatedAnnealing::with_config(
            AnnealingConfig::default().with_initial_temperature(1.0).with_iterations(1, 3),
            0,
        );

        let mut recorder = TraceRecorder::new();
        let best = sa.run(&instance.table, initial.clone(), &mut source, &mut recorder).unwrap();

        assert!(source.is_exhausted());
        let acceptances: Vec<Acceptance> = recorder.annealing.iter().map(|r| r.acceptance).collect();
        assert_eq!(
            acceptances,
            vec![Acceptance::Rejected, Acceptance::Worsening, Acceptance::Improving]
        );
        let temperatures: Vec<f64> = recorder.annealing.iter().map(|r| r.temperature).collect();
        assert_eq!(temperatures, vec![1.0, 0.99, 0.99]);

        assert_eq!(recorder.annealing[0].tour, vec![0, 1, 2, 3]);
        assert_eq!(recorder.annealing[1].tour, vec![0, 2, 1, 3]);
        assert_eq!(recorder.annealing[2].tour, vec![0, 1, 2, 3]);

        // The epoch ends on a tour no shorter than the initial one.
        assert_eq!(recorder.epochs, vec![4.0]);
        assert_eq!(best, initial);
    }

    #[test]
    fn test_equal_length_counts_as_worsening() {
        let points = vec![Point::new(0.0, 0.0), Point::new(3.0, 4.0)];
        let instance = TspInstance::from_points("pair", points).unwrap();
        let initial = Candidate::from_tour(&instance.table, vec![0, 1]);

        // p = exp(0) = 1, so any r in [0, 1) accepts and cools.
        let mut source = ScriptedSource::new(&[0, 1], &[0.999]);
        let sa = SimulatedAnnealing::with_config(
            AnnealingConfig::default().with_initial_temperature(10.0).with_iterations(1, 1),
            0,
        );

        let mut recorder = TraceRecorder::new();
        let best = sa.run(&instance.table, initial, &mut source, &mut recorder).unwrap();

        assert_eq!(recorder.annealing[0].acceptance, Acceptance::Worsening);
        assert!((recorder.annealing[0].temperature - 9.9).abs() < 1e-12);
        assert_eq!(recorder.annealing[0].tour, vec![1, 0]);
        assert!((best.length - 10.0).abs() < 1e-10);
    }

    #[test]
    fn test_temperature_underflow_is_an_error() {
        let points = vec![Point::new(0.0, 0.0), Point::new(3.0, 4.0)];
        let instance = TspInstance::from_points("pair", points).unwrap();
        let initial = Candidate::from_tour(&instance.table, vec![0, 1]);

        // Every proposal has equal length and is accepted, halving T until it hits zero.
        let sa = SimulatedAnnealing::with_config(
            AnnealingConfig::default()
                .with_initial_temperature(f64::MIN_POSITIVE)
                .with_cooling_factor(0.5)
                .with_iterations(1, 200),
            0,
        );
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let result = sa.run(&instance.table, initial, &mut rng, &mut NoopObserver);

        assert!(matches!(result, Err(SolverError::InvalidTemperature(t)) if t == 0.0));
    }

    #[test]
    fn test_two_points_round_trip() {
        let points = vec![Point::new(0.0, 0.0), Point::new(3.0, 4.0)];
        let instance = TspInstance::from_points("pair", points).unwrap();

        let sa = SimulatedAnnealing::with_params(50.0, 5, 5);
        let start = Solution::from_tour(&instance, vec![0, 1], "start");
        let best = sa.improve(&instance, &start).unwrap();

        assert!((best.length - 10.0).abs() < 1e-10);
        assert_eq!(best.iterations, Some(25));
    }

    #[test]
    fn test_square_from_crossing_tour() {
        let instance = square();
        let initial = Candidate::from_tour(&instance.table, vec![0, 2, 1, 3]);

        let sa = SimulatedAnnealing::with_config(AnnealingConfig::default(), 42);
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let best = sa.run(&instance.table, initial, &mut rng, &mut NoopObserver).unwrap();

        assert!((best.length - 4.0).abs() < 1e-10);
        assert!(best.validate(&instance.table).is_ok());
    }

    #[test]
    fn test_seeded_runs_are_reproducible() {
        let instance = datasets::path20().unwrap();
        let sa = SimulatedAnnealing::with_config(AnnealingConfig::default().with_iterations(10, 20), 7);

        let mut first = TraceRecorder::new();
        let mut second = TraceRecorder::new();
        let a = sa
            .run(&instance.table, nn_start(&instance), &mut ChaCha8Rng::seed_from_u64(7), &mut first)
            .unwrap();
        let b = sa
            .run(&instance.table, nn_start(&instance), &mut ChaCha8Rng::seed_from_u64(7), &mut second)
            .unwrap();

        assert_eq!(a, b);
        assert_eq!(first, second);
        assert_eq!(first.annealing.len(), 200);
        assert_eq!(first.epochs.len(), 10);
    }

    #[test]
    fn test_temperature_only_cools_on_worsening_moves() {
        let instance = datasets::path30().unwrap();
        let config = AnnealingConfig::default();
        let sa = SimulatedAnnealing::with_config(config, 3);

        let mut recorder = TraceRecorder::new();
        sa.run(&instance.table, nn_start(&instance), &mut ChaCha8Rng::seed_from_u64(3), &mut recorder)
            .unwrap();

        let mut previous = config.initial_temperature;
        for record in &recorder.annealing {
            assert!(record.temperature <= previous);
            match record.acceptance {
                Acceptance::Worsening => {
                    assert_eq!(record.temperature, previous * config.cooling_factor)
                }
                _ => assert_eq!(record.temperature, previous),
            }
            previous = record.temperature;
        }
    }

    #[test]
    fn test_carried_length_matches_tour() {
        let instance = datasets::path30().unwrap();
        let initial = nn_start(&instance);
        let initial_length = initial.length;
        let sa = SimulatedAnnealing::with_config(AnnealingConfig::default().with_iterations(20, 30), 11);

        let mut recorder = TraceRecorder::new();
        let best = sa
            .run(&instance.table, initial, &mut ChaCha8Rng::seed_from_u64(11), &mut recorder)
            .unwrap();

        for record in &recorder.annealing {
            let recomputed = instance.tour_length(&record.tour);
            assert!((recomputed - record.current_length).abs() < 1e-6);
        }

        let min_epoch = recorder.epochs.iter().cloned().fold(initial_length, f64::min);
        assert_eq!(best.length, min_epoch);
        assert!(best.validate(&instance.table).is_ok());
    }
}
