//! TSP Solver - Command Line Interface
//!
//! Builds a nearest-neighbour tour and improves it with Tabu Search and/or
//! Simulated Annealing.

use clap::{Args, Parser, Subcommand, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use tsp_solver::benchmark::{Benchmark, BenchmarkConfig};
use tsp_solver::config::SolverConfig;
use tsp_solver::datasets;
use tsp_solver::heuristics::annealing::SimulatedAnnealing;
use tsp_solver::heuristics::construction::{ConstructionHeuristic, NearestNeighborHeuristic};
use tsp_solver::heuristics::local_search::LocalSearch;
use tsp_solver::heuristics::observer::{
    AnnealingStep, LogObserver, NoopObserver, SearchObserver, TabuStep, Tee, TraceRecorder,
};
use tsp_solver::heuristics::tabu::TabuSearch;
use tsp_solver::visualization::Visualizer;
use tsp_solver::{Result, Solution, SolverError, TspInstance};

use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Parser)]
#[command(name = "tsp-solver")]
#[command(version = "1.0")]
#[command(about = "Nearest-neighbour, Tabu Search and Simulated Annealing for the Euclidean TSP")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct InputArgs {
    /// Instance file: TSPLIB, or CSV of x,y rows when the extension is .csv
    #[arg(short, long, conflicts_with = "builtin", required_unless_present = "builtin")]
    instance: Option<PathBuf>,

    /// Built-in point set: path20 or path30
    #[arg(short, long)]
    builtin: Option<String>,
}

#[derive(Args)]
struct ParamArgs {
    /// JSON configuration file; flags below override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Random seed for Simulated Annealing
    #[arg(short, long)]
    seed: Option<u64>,

    /// Tabu list capacity
    #[arg(long)]
    tabu_capacity: Option<usize>,

    /// Tabu Search iterations
    #[arg(long)]
    tabu_iterations: Option<usize>,

    /// Initial annealing temperature
    #[arg(long)]
    temperature: Option<f64>,

    /// Annealing outer iterations
    #[arg(long)]
    outer: Option<usize>,

    /// Annealing inner iterations per outer iteration
    #[arg(long)]
    inner: Option<usize>,

    /// Cooling factor applied on each accepted worsening move
    #[arg(long)]
    cooling: Option<f64>,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve an instance
    Solve {
        #[command(flatten)]
        input: InputArgs,

        #[command(flatten)]
        params: ParamArgs,

        /// Algorithm to use
        #[arg(short, long, value_enum, default_value = "both")]
        algorithm: Algorithm,

        /// Write the solutions as JSON
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Write an SVG drawing of the best tour
        #[arg(long)]
        svg: Option<PathBuf>,

        /// Write the best tour as plain-text plot data
        #[arg(long)]
        plot_data: Option<PathBuf>,

        /// Directory for per-step CSV traces
        #[arg(long)]
        trace: Option<PathBuf>,

        /// Show a progress bar
        #[arg(long)]
        progress: bool,

        /// Print every point of the tour
        #[arg(short, long)]
        verbose: bool,
    },

    /// Compare the algorithms over several seeds
    Compare {
        #[command(flatten)]
        input: InputArgs,

        #[command(flatten)]
        params: ParamArgs,

        /// Number of annealing runs
        #[arg(short, long, default_value = "10")]
        runs: usize,

        /// Output directory for CSV results
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Analyze an instance
    Analyze {
        #[command(flatten)]
        input: InputArgs,
    },
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum, Debug)]
enum Algorithm {
    /// Nearest Neighbor construction only
    Nn,
    /// Tabu Search
    Tabu,
    /// Simulated Annealing
    Sa,
    /// Tabu Search and Simulated Annealing, each from the same start
    Both,
}

/// Progress bar driven by search events
struct ProgressObserver {
    bar: ProgressBar,
}

impl ProgressObserver {
    fn new(total: u64) -> Self {
        let bar = ProgressBar::new(total);
        bar.set_style(
            ProgressStyle::with_template("{spinner} [{bar:40}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        ProgressObserver { bar }
    }
}

impl SearchObserver for ProgressObserver {
    fn on_tabu_step(&mut self, step: &TabuStep<'_>) {
        self.bar.inc(1);
        self.bar.set_message(format!("best {:.2}", step.best_length));
    }

    fn on_annealing_step(&mut self, step: &AnnealingStep<'_>) {
        if step.step == 0 {
            self.bar.set_message(format!("T {:.4}", step.temperature));
        }
    }

    fn on_epoch(&mut self, _epoch: usize, current_length: f64) {
        self.bar.inc(1);
        self.bar.set_message(format!("current {:.2}", current_length));
    }
}

impl Drop for ProgressObserver {
    fn drop(&mut self) {
        self.bar.finish_and_clear();
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Solve { input, params, algorithm, output, svg, plot_data, trace, progress, verbose } => {
            solve_instance(&input, &params, algorithm, output, svg, plot_data, trace, progress, verbose)
        }

        Commands::Compare { input, params, runs, output } => {
            compare_algorithms(&input, &params, runs, output)
        }

        Commands::Analyze { input } => analyze_instance(&input),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn load_instance(input: &InputArgs) -> Result<TspInstance> {
    if let Some(name) = &input.builtin {
        return datasets::by_name(name).unwrap_or_else(|| {
            Err(SolverError::InvalidParameter {
                name: "builtin",
                reason: format!("unknown point set `{}` (expected path20 or path30)", name),
            })
        });
    }

    match &input.instance {
        Some(path) => {
            println!("Loading instance from {:?}...", path);
            TspInstance::from_file(path)
        }
        None => Err(SolverError::InvalidParameter {
            name: "instance",
            reason: "an instance file or --builtin set is required".to_string(),
        }),
    }
}

fn load_config(params: &ParamArgs) -> Result<SolverConfig> {
    let mut config = match &params.config {
        Some(path) => SolverConfig::from_file(path)?,
        None => SolverConfig::default(),
    };

    if let Some(seed) = params.seed {
        config.seed = seed;
    }
    if let Some(capacity) = params.tabu_capacity {
        config.tabu.capacity = capacity;
    }
    if let Some(iterations) = params.tabu_iterations {
        config.tabu.iterations = iterations;
    }
    if let Some(temperature) = params.temperature {
        config.annealing.initial_temperature = temperature;
    }
    if let Some(outer) = params.outer {
        config.annealing.outer_iterations = outer;
    }
    if let Some(inner) = params.inner {
        config.annealing.inner_iterations = inner;
    }
    if let Some(cooling) = params.cooling {
        config.annealing.cooling_factor = cooling;
    }

    config.validate()?;
    log::debug!("Effective configuration: {:?}", config);
    Ok(config)
}

/// Run one engine with logging, an optional progress bar and a trace recorder
fn run_engine(
    engine: &dyn LocalSearch,
    instance: &TspInstance,
    initial: &Solution,
    progress_total: Option<u64>,
    recorder: &mut TraceRecorder,
) -> Result<Solution> {
    let mut progress: Box<dyn SearchObserver> = match progress_total {
        Some(total) => Box::new(ProgressObserver::new(total)),
        None => Box::new(NoopObserver),
    };
    let mut log = LogObserver;
    let mut sinks = Tee { first: &mut *progress, second: recorder };
    let mut observer = Tee { first: &mut log, second: &mut sinks };

    engine.improve_observed(instance, initial, &mut observer)
}

#[allow(clippy::too_many_arguments)]
fn solve_instance(
    input: &InputArgs,
    params: &ParamArgs,
    algorithm: Algorithm,
    output: Option<PathBuf>,
    svg: Option<PathBuf>,
    plot_data: Option<PathBuf>,
    trace: Option<PathBuf>,
    progress: bool,
    verbose: bool,
) -> Result<()> {
    let instance = load_instance(input)?;
    let config = load_config(params)?;

    if verbose {
        println!("{}", instance.statistics());
    }

    println!("Solving {} (n={}) with {:?}...", instance.name, instance.dimension(), algorithm);
    let start = Instant::now();

    let initial = NearestNeighborHeuristic::new().construct(&instance);
    let mut solutions = vec![initial.clone()];

    let mut tabu_trace = TraceRecorder::new();
    let mut annealing_trace = TraceRecorder::new();

    if matches!(algorithm, Algorithm::Tabu | Algorithm::Both) {
        let ts = TabuSearch::with_config(config.tabu);
        let total = progress.then_some(config.tabu.iterations as u64);
        solutions.push(run_engine(&ts, &instance, &initial, total, &mut tabu_trace)?);
    }

    if matches!(algorithm, Algorithm::Sa | Algorithm::Both) {
        let sa = SimulatedAnnealing::with_config(config.annealing, config.seed);
        let total = progress.then_some(config.annealing.outer_iterations as u64);
        solutions.push(run_engine(&sa, &instance, &initial, total, &mut annealing_trace)?);
    }

    let elapsed = start.elapsed();

    println!("\n========== Results ==========");
    for solution in &solutions {
        println!("{}", solution);
        if verbose {
            println!("{}", solution.render(&instance));
        }
    }
    println!("Total time: {:.4}s", elapsed.as_secs_f64());

    let best = solutions
        .iter()
        .min_by(|a, b| a.length.total_cmp(&b.length))
        .unwrap_or(&initial);
    println!("Best: {:.4} ({})", best.length, best.algorithm);

    if let Some(out_path) = output {
        let json = serde_json::to_string_pretty(&solutions)?;
        std::fs::write(&out_path, json)?;
        println!("\nSolutions saved to {:?}", out_path);
    }

    if let Some(svg_path) = svg {
        let viz = Visualizer::new();
        viz.save_svg(&viz.generate_svg(&instance, best), &svg_path)?;
        println!("Visualization saved to {:?}", svg_path);
    }

    if let Some(data_path) = plot_data {
        Visualizer::new().save_plot_data(&instance, best, &data_path)?;
        println!("Plot data saved to {:?}", data_path);
    }

    if let Some(dir) = trace {
        write_traces(&dir, &tabu_trace, &annealing_trace)?;
        println!("Traces saved to {:?}", dir);
    }

    Ok(())
}

fn write_traces(dir: &Path, tabu: &TraceRecorder, annealing: &TraceRecorder) -> Result<()> {
    std::fs::create_dir_all(dir)?;

    if !tabu.tabu.is_empty() {
        tabu.write_steps_csv(dir.join("tabu_steps.csv"))?;
    }
    if !annealing.annealing.is_empty() {
        annealing.write_steps_csv(dir.join("annealing_steps.csv"))?;
        annealing.write_epochs_csv(dir.join("annealing_epochs.csv"))?;
    }

    Ok(())
}

fn analyze_instance(input: &InputArgs) -> Result<()> {
    let instance = load_instance(input)?;

    println!("========== Instance Analysis ==========\n");
    println!("{}", instance.statistics());

    let nn_sol = NearestNeighborHeuristic::new().construct(&instance);
    println!("Quick Solution Estimate:");
    println!("  Nearest Neighbor: {:.2}", nn_sol.length);

    Ok(())
}

fn compare_algorithms(
    input: &InputArgs,
    params: &ParamArgs,
    runs: usize,
    output: Option<PathBuf>,
) -> Result<()> {
    let instance = load_instance(input)?;
    let config = load_config(params)?;

    println!("Comparing algorithms on {} (n={})...\n", instance.name, instance.dimension());

    let mut benchmark = Benchmark::new(BenchmarkConfig {
        num_runs: runs,
        base_seed: config.seed,
        tabu: config.tabu,
        annealing: config.annealing,
    });
    benchmark.run(&instance)?;

    let report = benchmark.generate_report();
    println!("{}", report);

    if let Some(dir) = output {
        std::fs::create_dir_all(&dir)?;

        let results_path = dir.join("results.csv");
        benchmark.export_to_csv(&results_path)?;
        println!("Results exported to {:?}", results_path);

        let stats_path = dir.join("statistics.csv");
        benchmark.export_statistics_csv(&stats_path)?;
        println!("Statistics exported to {:?}", stats_path);

        let report_path = dir.join("report.txt");
        std::fs::write(&report_path, &report)?;
        println!("Report saved to {:?}", report_path);
    }

    Ok(())
}
