use crate::population::Population;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Fitness statistics of one generation
#[derive(Clone, Copy, Serialize, Deserialize, PartialEq, Debug)]
pub struct GenerationRecord {
    pub gen: usize,
    pub nevals: usize,     // fitness evaluations performed during this generation
    pub max: f64,
    pub avg: f64,
    pub min: f64,
    pub std: f64,
}

impl fmt::Display for GenerationRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\t{}\t{:.5}\t{:.5}\t{:.5}\t{:.5}", self.gen, self.nevals, self.max, self.avg, self.min, self.std)
    }
}

/// Append-only run history, one record per generation starting with generation 0
#[derive(Clone, Serialize, Deserialize, PartialEq, Debug, Default)]
pub struct Logbook {
    pub records: Vec<GenerationRecord>,
}

impl Logbook {
    pub fn new() -> Logbook {
        Logbook { records: Vec::new() }
    }

    /// Compute and append the statistics of `population`
    pub fn record(&mut self, gen: usize, nevals: usize, population: &Population) -> GenerationRecord {
        let (max, avg, min, std) = population.fitness_stats();
        let record = GenerationRecord { gen, nevals, max, avg, min, std };
        self.records.push(record);
        record
    }

    pub fn select_max(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.max).collect()
    }

    pub fn select_avg(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.avg).collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn header() -> &'static str {
        "gen\tnevals\tmax\tavg\tmin\tstd"
    }
}

impl fmt::Display for Logbook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", Logbook::header())?;
        for record in &self.records {
            writeln!(f, "{}", record)?;
        }
        Ok(())
    }
}
