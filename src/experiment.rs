use crate::errors::SelectorError;
use crate::logbook::Logbook;
use crate::param::Param;
use crate::population::Population;
use crate::report::HallOfFameEntry;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Complete run data and results
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Experiment {
    /// Experiment ID, i.e., output name and timestamp
    pub id: String,
    /// Timestamp of the experiment
    pub timestamp: String,
    /// gaselect version and git hash used
    pub gaselect_version: String,
    /// Parameters used
    pub parameters: Param,

    /// Names of the candidate features, in chromosome order
    pub features: Vec<String>,
    /// Best solutions by decreasing fitness
    pub hall_of_fame: Vec<HallOfFameEntry>,
    pub logbook: Logbook,
    pub final_population: Population,

    /// Execution time in seconds
    pub execution_time: f64,
}

pub fn version() -> String {
    match option_env!("GASELECT_GIT_SHA") {
        Some(sha) => format!("{}#{}", env!("CARGO_PKG_VERSION"), sha),
        None => format!("{}#unknown", env!("CARGO_PKG_VERSION")),
    }
}

impl Experiment {
    pub fn best(&self) -> Option<&HallOfFameEntry> {
        self.hall_of_fame.first()
    }

    /// Save the experiment, the format following the file extension (`json`, `bin`/`bincode`).
    /// Other extensions are saved as JSON.
    pub fn save_auto<P: AsRef<std::path::Path>>(&self, path: P) -> Result<(), SelectorError> {
        let path = path.as_ref();
        let saved_path = match extension(path).as_str() {
            "json" => {
                self.save_json(path)?;
                path.to_path_buf()
            }
            "bin" | "bincode" => {
                self.save_bincode(path)?;
                path.to_path_buf()
            }
            _ => {
                warn!("Unknown format. Saving experiment in json.");
                let json_path = path.with_extension("json");
                self.save_json(&json_path)?;
                json_path
            }
        };
        info!("Experiment saved to {}", saved_path.display());
        Ok(())
    }

    fn save_json<P: AsRef<std::path::Path>>(&self, path: P) -> Result<(), SelectorError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    fn save_bincode<P: AsRef<std::path::Path>>(&self, path: P) -> Result<(), SelectorError> {
        let bytes = bincode::serialize(self)?;
        std::fs::write(path, bytes)?;
        Ok(())
    }

    /// Load an experiment saved by [`Experiment::save_auto`]
    pub fn load_auto<P: AsRef<std::path::Path>>(path: P) -> Result<Self, SelectorError> {
        let path = path.as_ref();
        match extension(path).as_str() {
            "json" => Self::load_json(path),
            "bin" | "bincode" => Self::load_bincode(path),
            _ => Self::load_with_fallback(path),
        }
    }

    fn load_json<P: AsRef<std::path::Path>>(path: P) -> Result<Self, SelectorError> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    fn load_bincode<P: AsRef<std::path::Path>>(path: P) -> Result<Self, SelectorError> {
        let bytes = std::fs::read(path)?;
        Ok(bincode::deserialize(&bytes)?)
    }

    fn load_with_fallback<P: AsRef<std::path::Path>>(path: P) -> Result<Self, SelectorError> {
        let path = path.as_ref();
        if let Ok(experiment) = Self::load_bincode(path) {
            return Ok(experiment);
        }
        Self::load_json(path)
    }
}

fn extension(path: &std::path::Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase()
}

impl fmt::Display for Experiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Experiment {} ({})", self.id, self.gaselect_version)?;
        writeln!(f, "Timestamp: {}", self.timestamp)?;
        writeln!(f, "Features: {}   Generations: {}   Execution time: {:.2}s",
            self.features.len(), self.logbook.len().saturating_sub(1), self.execution_time)?;
        match self.best() {
            Some(best) => write!(f, "Best: {}", best),
            None => write!(f, "Best: none"),
        }
    }
}
