//! Solver configuration loaded from JSON.
//!
//! Every field has a default, so a file only needs the values it changes:
//!
//! ```json
//! { "seed": 7, "tabu": { "capacity": 6 }, "annealing": { "initial_temperature": 80.0 } }
//! ```

use crate::error::Result;
use crate::heuristics::annealing::AnnealingConfig;
use crate::heuristics::tabu::TabuConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Seed for the annealing random source
    pub seed: u64,
    pub tabu: TabuConfig,
    pub annealing: AnnealingConfig,
}

impl Default for SolverConfig {
    fn default() -> Self {
        SolverConfig {
            seed: 42,
            tabu: TabuConfig::default(),
            annealing: AnnealingConfig::default(),
        }
    }
}

impl SolverConfig {
    pub fn from_json(text: &str) -> Result<Self> {
        let config: SolverConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn validate(&self) -> Result<()> {
        self.tabu.validate()?;
        self.annealing.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SolverError;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = SolverConfig::from_json(r#"{ "tabu": { "capacity": 6 } }"#).unwrap();

        assert_eq!(config.seed, 42);
        assert_eq!(config.tabu.capacity, 6);
        assert_eq!(config.tabu.iterations, 13);
        assert_eq!(config.annealing, AnnealingConfig::default());
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let err = SolverConfig::from_json(r#"{ "annealing": { "initial_temperature": -1.0 } }"#).unwrap_err();
        assert!(matches!(err, SolverError::InvalidTemperature(_)));

        let err = SolverConfig::from_json(r#"{ "seed": "abc" }"#).unwrap_err();
        assert!(matches!(err, SolverError::Serialization(_)));
    }
}
