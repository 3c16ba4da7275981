use crate::errors::SelectorError;
use crate::metric::ScoringMetric;
use crate::model::ModelKind;
use crate::operators::CrossoverMethod;
use log::warn;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;

// Field definitions and associated default values

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Param {
    #[serde(default)]
    pub general: General,
    #[serde(default)]
    pub data: Data,
    #[serde(default)]
    pub ga: GA,
    #[serde(default)]
    pub cv: CV,
    #[serde(default)]
    pub model: Model,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct General {
    #[serde(default = "seed_default")]
    pub seed: u64,
    #[serde(default = "one_default")]
    pub thread_number: usize,
    #[serde(default = "empty_string")]
    pub log_base: String,
    #[serde(default = "log_suffix_default")]
    pub log_suffix: String,
    #[serde(default = "log_level_default")]
    pub log_level: String,
    #[serde(default = "empty_string")]
    pub save_exp: String,
    #[serde(default = "empty_string")]
    pub save_logbook: String,
    #[serde(default = "uzero_default")]
    pub n_model_to_display: usize,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[allow(non_snake_case)]
pub struct Data {
    #[serde(default = "empty_string")]
    pub X: String,
    #[serde(default = "empty_string")]
    pub y: String,
    #[serde(default = "true_default")]
    pub features_in_rows: bool,
    #[serde(default = "class_names_default")]
    pub classes: Vec<String>,
}

/// Genetic algorithm parameters
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct GA {
    #[serde(default = "pop_size_default")]
    pub population_size: usize,
    #[serde(default = "p_crossover_default")]
    pub p_crossover: f64,
    #[serde(default = "p_mutation_default")]
    pub p_mutation: f64,
    #[serde(default = "max_generations_default")]
    pub max_generations: usize,
    #[serde(default = "hall_of_fame_size_default")]
    pub hall_of_fame_size: usize,
    #[serde(default = "feature_penalty_factor_default")]
    pub feature_penalty_factor: f64,
    #[serde(default = "tournament_size_default")]
    pub tournament_size: usize,
    #[serde(default = "crossover_default")]
    pub crossover: CrossoverMethod,
    /// Per-gene flip probability, 0.0 stands for 1/chromosome length
    #[serde(default = "zero_default")]
    pub gene_flip_probability: f64,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CV {
    #[serde(default = "folds_default")]
    pub folds: usize,
    #[serde(default = "false_default")]
    pub shuffle: bool,
    #[serde(default = "false_default")]
    pub stratify: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Model {
    #[serde(default = "model_default")]
    pub algo: ModelKind,
    #[serde(default = "knn_neighbors_default")]
    pub knn_neighbors: usize,
    #[serde(default = "metric_default")]
    pub metric: ScoringMetric,
}

// Default section definitions

impl Default for General {
    fn default() -> Self {
        serde_json::from_value(serde_json::json!({})).unwrap()
    }
}

impl Default for Data {
    fn default() -> Self {
        serde_json::from_value(serde_json::json!({})).unwrap()
    }
}

impl Default for GA {
    fn default() -> Self {
        serde_json::from_value(serde_json::json!({})).unwrap()
    }
}

impl Default for CV {
    fn default() -> Self {
        serde_json::from_value(serde_json::json!({})).unwrap()
    }
}

impl Default for Model {
    fn default() -> Self {
        serde_json::from_value(serde_json::json!({})).unwrap()
    }
}

impl Default for Param {
    fn default() -> Self {
        serde_json::from_value(serde_json::json!({})).unwrap()
    }
}

impl Param {
    pub fn new() -> Self {
        Self::default()
    }
}

impl GA {
    /// Flip probability actually used for a chromosome of `chromosome_len` genes.
    pub fn flip_probability(&self, chromosome_len: usize) -> f64 {
        if self.gene_flip_probability > 0.0 {
            self.gene_flip_probability
        } else if chromosome_len > 0 {
            1.0 / chromosome_len as f64
        } else {
            0.0
        }
    }
}

pub fn get(param_file: String) -> Result<Param, SelectorError> {
    let param_file_reader = File::open(param_file)?;
    let param_reader = BufReader::new(param_file_reader);

    let config: Param = serde_yaml::from_reader(param_reader)?;

    validate(&config)?;

    Ok(config)
}

pub fn validate(param: &Param) -> Result<(), SelectorError> {
    validate_ga(&param.ga)?;

    if param.cv.folds < 2 {
        return Err(SelectorError::configuration(format!(
            "Invalid folds={}. Cross-validation needs at least 2 folds.",
            param.cv.folds
        )));
    }

    if param.general.thread_number == 0 {
        return Err(SelectorError::configuration(
            "thread_number must be at least 1.",
        ));
    }

    if param.model.knn_neighbors == 0 {
        return Err(SelectorError::configuration(
            "knn_neighbors must be at least 1.",
        ));
    }

    if (param.data.X.is_empty() && !param.data.y.is_empty())
        || (!param.data.X.is_empty() && param.data.y.is_empty())
    {
        return Err(SelectorError::configuration(
            "Both X and y must be provided together.",
        ));
    }

    if param.cv.stratify && param.cv.shuffle {
        warn!("stratify=true already shuffles samples within each class: shuffle is ignored.");
    }

    Ok(())
}

pub fn validate_ga(ga: &GA) -> Result<(), SelectorError> {
    if ga.population_size < 2 {
        return Err(SelectorError::configuration(format!(
            "Invalid population_size={}. Must be >= 2.",
            ga.population_size
        )));
    }

    if ga.hall_of_fame_size == 0 || ga.hall_of_fame_size > ga.population_size {
        return Err(SelectorError::configuration(format!(
            "Invalid hall_of_fame_size={}. Must be in range [1, population_size={}].",
            ga.hall_of_fame_size, ga.population_size
        )));
    }

    if ga.max_generations == 0 {
        return Err(SelectorError::configuration(
            "max_generations must be a positive integer.",
        ));
    }

    for (name, value) in [
        ("p_crossover", ga.p_crossover),
        ("p_mutation", ga.p_mutation),
        ("gene_flip_probability", ga.gene_flip_probability),
    ] {
        if !(0.0..=1.0).contains(&value) {
            return Err(SelectorError::configuration(format!(
                "Invalid {}={:.3}. Must be in range [0, 1].",
                name, value
            )));
        }
    }

    if !(ga.feature_penalty_factor >= 0.0) {
        return Err(SelectorError::configuration(format!(
            "Invalid feature_penalty_factor={:.3}. Must be >= 0.",
            ga.feature_penalty_factor
        )));
    }

    if ga.tournament_size == 0 {
        return Err(SelectorError::configuration(
            "tournament_size must be at least 1.",
        ));
    }

    if ga.feature_penalty_factor > 0.01 {
        warn!(
            "feature_penalty_factor={} is large: it may outweigh genuine accuracy differences.",
            ga.feature_penalty_factor
        );
    }

    Ok(())
}

// Default value definitions

fn seed_default() -> u64 {
    42
}
fn empty_string() -> String {
    "".to_string()
}
fn log_suffix_default() -> String {
    "log".to_string()
}
fn log_level_default() -> String {
    "info".to_string()
}
fn class_names_default() -> Vec<String> {
    Vec::new()
}
fn false_default() -> bool {
    false
}
fn true_default() -> bool {
    true
}
fn zero_default() -> f64 {
    0.0
}
fn uzero_default() -> usize {
    0
}
fn one_default() -> usize {
    1
}
fn pop_size_default() -> usize {
    50
}
fn p_crossover_default() -> f64 {
    0.9
}
fn p_mutation_default() -> f64 {
    0.2
}
fn max_generations_default() -> usize {
    50
}
fn hall_of_fame_size_default() -> usize {
    5
}
fn feature_penalty_factor_default() -> f64 {
    0.001
}
fn tournament_size_default() -> usize {
    2
}
fn crossover_default() -> CrossoverMethod {
    CrossoverMethod::two_point
}
fn folds_default() -> usize {
    5
}
fn model_default() -> ModelKind {
    ModelKind::knn
}
fn knn_neighbors_default() -> usize {
    5
}
fn metric_default() -> ScoringMetric {
    ScoringMetric::accuracy
}
