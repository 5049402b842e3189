//! Progress reporting for the search engines.
//!
//! Observers receive read-only views of the search state. They cannot change
//! the outcome of a run.

use crate::error::Result;
use crate::heuristics::neighborhood::SwapMove;
use crate::solution::Candidate;
use serde::Serialize;
use std::path::Path;

/// Outcome of one annealing proposal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Acceptance {
    /// Strictly shorter than the current tour
    Improving,
    /// Not shorter, accepted by the probabilistic rule; the temperature cools
    Worsening,
    Rejected,
}

/// State after one Tabu Search iteration
#[derive(Debug)]
pub struct TabuStep<'a> {
    pub iteration: usize,
    pub current: &'a Candidate,
    pub best_length: f64,
    /// Every neighbour was tabu and the best-ranked one was taken anyway
    pub fallback: bool,
    pub tabu_len: usize,
    pub evicted: Option<&'a [usize]>,
}

/// State after one Simulated Annealing inner step
#[derive(Debug)]
pub struct AnnealingStep<'a> {
    pub epoch: usize,
    pub step: usize,
    pub swap: SwapMove,
    pub proposed_length: f64,
    pub acceptance: Acceptance,
    pub current: &'a Candidate,
    pub temperature: f64,
}

/// Receives search progress. Every method defaults to doing nothing.
pub trait SearchObserver {
    fn on_tabu_step(&mut self, _step: &TabuStep<'_>) {}

    fn on_annealing_step(&mut self, _step: &AnnealingStep<'_>) {}

    /// Called once per annealing outer iteration with the current length
    fn on_epoch(&mut self, _epoch: usize, _current_length: f64) {}
}

/// Discards all events
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl SearchObserver for NoopObserver {}

/// Forwards events to the `log` facade
#[derive(Debug, Default, Clone, Copy)]
pub struct LogObserver;

impl SearchObserver for LogObserver {
    fn on_tabu_step(&mut self, step: &TabuStep<'_>) {
        log::debug!(
            "tabu iteration {}: current={:.4} best={:.4} tabu_len={}{}",
            step.iteration,
            step.current.length,
            step.best_length,
            step.tabu_len,
            if step.fallback { " (all neighbours tabu)" } else { "" }
        );
    }

    fn on_annealing_step(&mut self, step: &AnnealingStep<'_>) {
        log::trace!(
            "annealing {}:{} swap({}, {}) proposed={:.4} {:?} current={:.4} T={:.6}",
            step.epoch,
            step.step,
            step.swap.i,
            step.swap.j,
            step.proposed_length,
            step.acceptance,
            step.current.length,
            step.temperature
        );
    }

    fn on_epoch(&mut self, epoch: usize, current_length: f64) {
        log::info!("epoch {}: current length {:.4}", epoch, current_length);
    }
}

/// One recorded Tabu Search iteration
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TabuRecord {
    pub iteration: usize,
    pub current_length: f64,
    pub best_length: f64,
    pub fallback: bool,
    pub tabu_len: usize,
    #[serde(skip)]
    pub tour: Vec<usize>,
    #[serde(skip)]
    pub evicted: Option<Vec<usize>>,
}

/// One recorded annealing step
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnnealingRecord {
    pub epoch: usize,
    pub step: usize,
    pub swap_i: usize,
    pub swap_j: usize,
    pub proposed_length: f64,
    pub acceptance: Acceptance,
    pub current_length: f64,
    pub temperature: f64,
    #[serde(skip)]
    pub tour: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
struct EpochRecord {
    epoch: usize,
    current_length: f64,
}

/// Keeps every event in memory, for tests and trace export
#[derive(Debug, Default, Clone, PartialEq)]
pub struct TraceRecorder {
    pub tabu: Vec<TabuRecord>,
    pub annealing: Vec<AnnealingRecord>,
    pub epochs: Vec<f64>,
}

impl TraceRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write the per-epoch annealing lengths as `epoch,current_length`
    pub fn write_epochs_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut writer = csv::Writer::from_path(path)?;
        for (epoch, &current_length) in self.epochs.iter().enumerate() {
            writer.serialize(EpochRecord { epoch, current_length })?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Write every recorded step, tabu iterations first
    pub fn write_steps_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut writer = csv::Writer::from_path(path)?;
        if !self.tabu.is_empty() {
            for record in &self.tabu {
                writer.serialize(record)?;
            }
        } else {
            for record in &self.annealing {
                writer.serialize(record)?;
            }
        }
        writer.flush()?;
        Ok(())
    }
}

impl SearchObserver for TraceRecorder {
    fn on_tabu_step(&mut self, step: &TabuStep<'_>) {
        self.tabu.push(TabuRecord {
            iteration: step.iteration,
            current_length: step.current.length,
            best_length: step.best_length,
            fallback: step.fallback,
            tabu_len: step.tabu_len,
            tour: step.current.tour.clone(),
            evicted: step.evicted.map(|t| t.to_vec()),
        });
    }

    fn on_annealing_step(&mut self, step: &AnnealingStep<'_>) {
        self.annealing.push(AnnealingRecord {
            epoch: step.epoch,
            step: step.step,
            swap_i: step.swap.i,
            swap_j: step.swap.j,
            proposed_length: step.proposed_length,
            acceptance: step.acceptance,
            current_length: step.current.length,
            temperature: step.temperature,
            tour: step.current.tour.clone(),
        });
    }

    fn on_epoch(&mut self, _epoch: usize, current_length: f64) {
        self.epochs.push(current_length);
    }
}

/// Fans every event out to two observers
pub struct Tee<'a, A: ?Sized, B: ?Sized> {
    pub first: &'a mut A,
    pub second: &'a mut B,
}

impl<'a, A: SearchObserver + ?Sized, B: SearchObserver + ?Sized> SearchObserver for Tee<'a, A, B> {
    fn on_tabu_step(&mut self, step: &TabuStep<'_>) {
        self.first.on_tabu_step(step);
        self.second.on_tabu_step(step);
    }

    fn on_annealing_step(&mut self, step: &AnnealingStep<'_>) {
        self.first.on_annealing_step(step);
        self.second.on_annealing_step(step);
    }

    fn on_epoch(&mut self, epoch: usize, current_length: f64) {
        self.first.on_epoch(epoch, current_length);
        self.second.on_epoch(epoch, current_length);
    }
}
