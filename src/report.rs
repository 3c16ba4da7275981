use crate::errors::SelectorError;
use crate::logbook::Logbook;
use crate::utils::mask_to_string;
use log::info;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A hall of fame individual as presented to the user
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct HallOfFameEntry {
    pub mask: Vec<bool>,
    pub fitness: f64,
    /// Mean cross-validated score re-derived through the evaluator
    pub accuracy: f64,
    pub feature_count: usize,
    pub features: Vec<String>,
}

impl fmt::Display for HallOfFameEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}  [{}]", mask_to_string(&self.mask), self.features.join(", "))?;
        write!(f, "fitness = {:.5}, accuracy = {:.5}, features = {}", self.fitness, self.accuracy, self.feature_count)
    }
}

/// Consumer of the results of a run
pub trait Reporter {
    fn report(&self, entries: &[HallOfFameEntry], logbook: &Logbook);
}

/// Writes the best solutions and the fitness history through the logger
pub struct LogReporter {
    /// 0 shows the whole hall of fame
    pub n_model_to_display: usize,
}

impl LogReporter {
    pub fn new(n_model_to_display: usize) -> LogReporter {
        LogReporter { n_model_to_display }
    }

    pub fn render(&self, entries: &[HallOfFameEntry], logbook: &Logbook) -> String {
        let limit = if self.n_model_to_display == 0 || self.n_model_to_display > entries.len() {
            entries.len()
        } else {
            self.n_model_to_display
        };

        let mut text = String::from("- Best solutions are:\n");
        for (rank, entry) in entries.iter().take(limit).enumerate() {
            text.push_str(&format!("{}: {}\n", rank, entry));
        }

        text.push_str("\n- Max / average fitness over generations:\n");
        for record in &logbook.records {
            text.push_str(&format!("{:>4}  max {:.5}  avg {:.5}\n", record.gen, record.max, record.avg));
        }
        text
    }
}

impl Reporter for LogReporter {
    fn report(&self, entries: &[HallOfFameEntry], logbook: &Logbook) {
        for line in self.render(entries, logbook).lines() {
            info!("{}", line);
        }
    }
}

/// Export the logbook as a CSV table for external charting
pub fn write_logbook_csv<P: AsRef<std::path::Path>>(logbook: &Logbook, path: P) -> Result<(), SelectorError> {
    let mut writer = csv::Writer::from_path(path)?;
    for record in &logbook.records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(())
}
