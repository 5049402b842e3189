//! Benchmarking module for the TSP heuristics.
//!
//! Runs the nearest-neighbour constructor, Tabu Search and Simulated Annealing
//! on an instance, collects per-run results and aggregates them.

use crate::error::Result;
use crate::heuristics::annealing::{AnnealingConfig, SimulatedAnnealing};
use crate::heuristics::construction::{ConstructionHeuristic, NearestNeighborHeuristic};
use crate::heuristics::local_search::LocalSearch;
use crate::heuristics::observer::NoopObserver;
use crate::heuristics::tabu::{TabuConfig, TabuSearch};
use crate::instance::TspInstance;
use crate::solution::Solution;

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use statrs::statistics::{Data, Distribution};
use std::collections::BTreeMap;
use std::path::Path;

/// Result of running a single algorithm on an instance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlgorithmResult {
    pub algorithm: String,
    pub instance: String,
    pub dimension: usize,
    /// Seed used by the run, for stochastic methods
    pub seed: Option<u64>,
    pub length: f64,
    /// Computation time in seconds
    pub time: f64,
    pub iterations: Option<usize>,
}

/// Aggregated statistics for an algorithm
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlgorithmStatistics {
    pub algorithm: String,
    pub num_runs: usize,
    pub avg_length: f64,
    pub best_length: f64,
    pub worst_length: f64,
    pub std_length: f64,
    pub avg_time: f64,
}

/// Benchmark configuration
#[derive(Debug, Clone)]
pub struct BenchmarkConfig {
    /// Number of annealing runs, one per seed
    pub num_runs: usize,
    /// First seed; run `k` uses `base_seed + k`
    pub base_seed: u64,
    pub tabu: TabuConfig,
    pub annealing: AnnealingConfig,
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        BenchmarkConfig {
            num_runs: 5,
            base_seed: 0,
            tabu: TabuConfig::default(),
            annealing: AnnealingConfig::default(),
        }
    }
}

/// Benchmarking engine
pub struct Benchmark {
    config: BenchmarkConfig,
    results: Vec<AlgorithmResult>,
}

impl Benchmark {
    pub fn new(config: BenchmarkConfig) -> Self {
        Benchmark {
            config,
            results: Vec::new(),
        }
    }

    /// Run every algorithm on `instance`.
    /// Tabu Search is deterministic and runs once; annealing runs once per seed.
    pub fn run(&mut self, instance: &TspInstance) -> Result<()> {
        log::info!("Running benchmark on instance: {}", instance.name);

        let initial = NearestNeighborHeuristic::new().construct(instance);
        self.record_result(instance, &initial, None);

        let tabu = TabuSearch::with_config(self.config.tabu);
        let solution = tabu.improve_observed(instance, &initial, &mut NoopObserver)?;
        self.record_result(instance, &solution, None);

        for run in 0..self.config.num_runs as u64 {
            let seed = self.config.base_seed + run;
            let sa = SimulatedAnnealing::with_config(self.config.annealing, seed);
            let solution = sa.improve_observed(instance, &initial, &mut NoopObserver)?;
            log::debug!("SA seed {}: {:.4}", seed, solution.length);
            self.record_result(instance, &solution, Some(seed));
        }

        Ok(())
    }

    fn record_result(&mut self, instance: &TspInstance, solution: &Solution, seed: Option<u64>) {
        self.results.push(AlgorithmResult {
            algorithm: solution.algorithm.clone(),
            instance: instance.name.clone(),
            dimension: instance.dimension(),
            seed,
            length: solution.length,
            time: solution.computation_time,
            iterations: solution.iterations,
        });
    }

    /// Compute statistics for each algorithm, best average first
    pub fn compute_statistics(&self) -> Vec<AlgorithmStatistics> {
        let mut by_algorithm: BTreeMap<&str, Vec<&AlgorithmResult>> = BTreeMap::new();
        for result in &self.results {
            by_algorithm.entry(result.algorithm.as_str()).or_default().push(result);
        }

        let mut statistics: Vec<AlgorithmStatistics> = by_algorithm
            .into_iter()
            .map(|(algorithm, results)| {
                let lengths = Data::new(results.iter().map(|r| r.length).collect::<Vec<f64>>());
                let times = Data::new(results.iter().map(|r| r.time).collect::<Vec<f64>>());

                let std_length = if results.len() > 1 {
                    lengths.std_dev().unwrap_or(0.0)
                } else {
                    0.0
                };

                AlgorithmStatistics {
                    algorithm: algorithm.to_string(),
                    num_runs: results.len(),
                    avg_length: lengths.mean().unwrap_or(f64::NAN),
                    best_length: results.iter().map(|r| r.length).fold(f64::INFINITY, f64::min),
                    worst_length: results.iter().map(|r| r.length).fold(0.0, f64::max),
                    std_length,
                    avg_time: times.mean().unwrap_or(0.0),
                }
            })
            .collect();

        statistics.sort_by_key(|s| OrderedFloat(s.avg_length));
        statistics
    }

    /// Export results to CSV
    pub fn export_to_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut writer = csv::Writer::from_path(path)?;
        for result in &self.results {
            writer.serialize(result)?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Export statistics to CSV
    pub fn export_statistics_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut writer = csv::Writer::from_path(path)?;
        for stat in self.compute_statistics() {
            writer.serialize(stat)?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Generate summary report
    pub fn generate_report(&self) -> String {
        let mut report = String::new();

        report.push_str("========================================\n");
        report.push_str("        TSP Benchmark Report\n");
        report.push_str("========================================\n\n");

        report.push_str(&format!("{:<20} {:>6} {:>12} {:>12} {:>12} {:>10} {:>10}\n",
            "Algorithm", "Runs", "Avg Length", "Best", "Worst", "Std", "Avg Time"));
        report.push_str("-".repeat(88).as_str());
        report.push('\n');

        for stat in self.compute_statistics() {
            report.push_str(&format!("{:<20} {:>6} {:>12.2} {:>12.2} {:>12.2} {:>10.2} {:>10.4}\n",
                stat.algorithm,
                stat.num_runs,
                stat.avg_length,
                stat.best_length,
                stat.worst_length,
                stat.std_length,
                stat.avg_time));
        }

        report.push_str("-".repeat(88).as_str());
        report.push('\n');

        if let Some(best) = self.results.iter().min_by_key(|r| OrderedFloat(r.length)) {
            report.push_str(&format!("\nBest tour: {:.2} ({})\n", best.length, best.algorithm));
        }

        report
    }

    /// Get all results
    pub fn results(&self) -> &[AlgorithmResult] {
        &self.results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instance::Point;

    #[test]
    fn test_benchmark_config() {
        let config = BenchmarkConfig::default();
        assert_eq!(config.num_runs, 5);
    }

    #[test]
    fn test_run_on_square() {
        let points = vec![
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(1.0, 1.0),
            Point::new(0.0, 1.0),
        ];
        let instance = TspInstance::from_points("square", points).unwrap();

        let config = BenchmarkConfig {
            num_runs: 3,
            annealing: AnnealingConfig::default().with_iterations(5, 10),
            ..Default::default()
        };
        let mut benchmark = Benchmark::new(config);
        benchmark.run(&instance).unwrap();

        assert_eq!(benchmark.results().len(), 5);

        let stats = benchmark.compute_statistics();
        assert_eq!(stats.len(), 3);
        for stat in &stats {
            assert!((stat.best_length - 4.0).abs() < 1e-10);
            assert!(stat.std_length.abs() < 1e-10);
        }
        let sa = stats.iter().find(|s| s.algorithm == "SimulatedAnnealing").unwrap();
        assert_eq!(sa.num_runs, 3);

        let report = benchmark.generate_report();
        assert!(report.contains("TabuSearch"));
        assert!(report.contains("Best tour: 4.00"));
    }
}
