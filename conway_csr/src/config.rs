//! Run configuration: grid size, generation count and worker count.
//!
//! Values come from defaults, then an optional JSON file, then `LIFE_*`
//! environment variables; front ends apply command-line overrides last.

use std::env;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{LifeError, LifeResult};
use crate::topology::GridTopology;

pub const DEFAULT_WIDTH: usize = 160;
pub const DEFAULT_HEIGHT: usize = 40;
pub const DEFAULT_GENERATIONS: usize = 1000;
pub const DEFAULT_WORKERS: usize = 4;

/// Everything a run needs besides its initial state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Interior columns (Nx)
    pub width: usize,

    /// Interior rows (Ny)
    pub height: usize,

    /// Generations to compute before the run is done
    pub generations: usize,

    /// Parallel workers for each sub-operation
    pub workers: usize,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            generations: DEFAULT_GENERATIONS,
            workers: DEFAULT_WORKERS,
        }
    }
}

impl SimulationConfig {
    pub fn new(width: usize, height: usize, generations: usize, workers: usize) -> Self {
        Self { width, height, generations, workers }
    }

    /// Overlays any `LIFE_*` variables from the process environment.
    pub fn with_env(self) -> Self {
        self.with_overrides(|key| env::var(key).ok())
    }

    /// Reads a JSON config file; missing fields keep their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> LifeResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Applies `LIFE_WIDTH`, `LIFE_HEIGHT`, `LIFE_GENERATIONS` and `LIFE_WORKERS`
    /// from `lookup`. Unparseable values are logged and ignored.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let fields: [(&str, &mut usize); 4] = [
            ("LIFE_WIDTH", &mut self.width),
            ("LIFE_HEIGHT", &mut self.height),
            ("LIFE_GENERATIONS", &mut self.generations),
            ("LIFE_WORKERS", &mut self.workers),
        ];
        for (key, field) in fields {
            if let Some(raw) = lookup(key) {
                match raw.trim().parse() {
                    Ok(value) => *field = value,
                    Err(_) => warn!("ignoring {key}={raw:?}: not a non-negative integer"),
                }
            }
        }
        self
    }

    /// Fails fast on zero or oversized dimensions and a zero worker count.
    pub fn validate(&self) -> LifeResult<()> {
        GridTopology::new(self.width, self.height)?;
        if self.workers == 0 {
            return Err(LifeError::config("worker count must be positive"));
        }
        Ok(())
    }

    /// Padded cell count, `(Nx+2) * (Ny+2)`, saturating for grids `validate` rejects.
    pub fn total_cells(&self) -> usize {
        GridTopology::padded_len(self.width, self.height).unwrap_or(usize::MAX)
    }

    /// Worker count clamped so no block is forced empty by over-provisioning.
    pub fn effective_workers(&self) -> usize {
        let total = self.total_cells();
        if self.workers > total {
            warn!(requested = self.workers, total, "more workers than cells, clamping");
            total
        } else {
            self.workers
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn defaults_match_reference_run() {
        let config = SimulationConfig::default();
        assert_eq!(config, SimulationConfig::new(160, 40, 1000, 4));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn overrides_replace_only_parseable_values() {
        let env: HashMap<&str, &str> =
            [("LIFE_WIDTH", "20"), ("LIFE_WORKERS", " 8 "), ("LIFE_HEIGHT", "tall")].into();
        let config = SimulationConfig::default()
            .with_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.width, 20);
        assert_eq!(config.workers, 8);
        assert_eq!(config.height, DEFAULT_HEIGHT);
        assert_eq!(config.generations, DEFAULT_GENERATIONS);
    }

    #[test]
    fn zero_values_fail_validation() {
        for config in [
            SimulationConfig::new(0, 10, 5, 1),
            SimulationConfig::new(10, 0, 5, 1),
            SimulationConfig::new(10, 10, 5, 0),
        ] {
            assert!(matches!(config.validate(), Err(LifeError::Configuration(_))));
        }
        // Zero generations is a valid (empty) run.
        assert!(SimulationConfig::new(10, 10, 0, 1).validate().is_ok());
    }

    #[test]
    fn padded_size_overflow_fails_validation() {
        let config = SimulationConfig::new(usize::MAX, 1, 1, 1);
        assert!(matches!(config.validate(), Err(LifeError::Configuration(_))));
        assert_eq!(config.total_cells(), usize::MAX);
        assert!(matches!(
            SimulationConfig::new(usize::MAX / 2, 3, 1, 1).validate(),
            Err(LifeError::Configuration(_))
        ));
    }

    #[test]
    fn workers_are_clamped_to_cell_count() {
        let config = SimulationConfig::new(1, 1, 1, 100);
        assert_eq!(config.total_cells(), 9);
        assert_eq!(config.effective_workers(), 9);
        assert_eq!(SimulationConfig::new(1, 1, 1, 3).effective_workers(), 3);
    }

    #[test]
    fn json_fills_missing_fields_with_defaults() {
        let config: SimulationConfig = serde_json::from_str(r#"{"width": 10, "workers": 2}"#).unwrap();
        assert_eq!(config, SimulationConfig::new(10, DEFAULT_HEIGHT, DEFAULT_GENERATIONS, 2));
    }

    fn scratch_file(name: &str, contents: &str) -> std::path::PathBuf {
        let path = env::temp_dir().join(format!("conway_csr-{}-{name}", std::process::id()));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn json_file_is_read_with_defaults() {
        let path = scratch_file("partial.json", r#"{"height": 12, "generations": 30}"#);
        let config = SimulationConfig::from_json_file(&path);
        std::fs::remove_file(&path).unwrap();
        assert_eq!(config.unwrap(), SimulationConfig::new(DEFAULT_WIDTH, 12, 30, DEFAULT_WORKERS));
    }

    #[test]
    fn malformed_json_file_is_a_config_file_error() {
        let path = scratch_file("broken.json", r#"{"width": "wide"}"#);
        let result = SimulationConfig::from_json_file(&path);
        std::fs::remove_file(&path).unwrap();
        assert!(matches!(result, Err(LifeError::ConfigFile(_))));
    }

    #[test]
    fn missing_json_file_is_an_io_error() {
        let path = env::temp_dir().join(format!("conway_csr-{}-absent.json", std::process::id()));
        let result = SimulationConfig::from_json_file(&path);
        assert!(matches!(result, Err(LifeError::Io(_))));
    }
}
