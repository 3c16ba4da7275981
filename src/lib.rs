#![allow(non_snake_case)]

pub mod cv;
pub mod data;
pub mod errors;
pub mod evaluator;
pub mod experiment;
pub mod fitness;
pub mod ga;
pub mod hall_of_fame;
pub mod individual;
pub mod logbook;
pub mod metric;
pub mod model;
pub mod operators;
pub mod param;
pub mod population;
pub mod report;
pub mod utils;

use chrono::Local;
use data::Data;
use errors::SelectorError;
use evaluator::{CrossValidationEvaluator, Evaluator};
use experiment::Experiment;
use fitness::FitnessFunction;
use hall_of_fame::HallOfFame;
use log::{debug, info};
use param::Param;
use report::HallOfFameEntry;

/// Load the dataset named in `param.data` and run the feature selection on it
pub fn run(param: &Param) -> Result<Experiment, SelectorError> {
    if param.data.X.is_empty() {
        return Err(SelectorError::configuration("No dataset given: set data.X and data.y."));
    }

    let mut data = Data::new();
    data.load_data(&param.data.X, &param.data.y, param.data.features_in_rows)?;
    data.set_classes(param.data.classes.clone());
    debug!("\x1b[2;97m{:?}\x1b[0m", data);

    run_on_data(data, param)
}

pub fn run_on_data(data: Data, param: &Param) -> Result<Experiment, SelectorError> {
    let start = std::time::Instant::now();
    let timestamp = Local::now().format("%Y-%m-%d_%H-%M-%S").to_string();

    param::validate(param)?;
    info!("{} features, {} samples, classes {:?}", data.feature_len, data.sample_len, data.class_labels());

    let features = data.features.clone();
    let evaluator = CrossValidationEvaluator::from_param(data, param)?;
    let fitness = FitnessFunction::new(evaluator, param.ga.feature_penalty_factor);

    let evolution = ga::ga(&fitness, param)?;
    let hall_of_fame = hall_of_fame_entries(&evolution.hall_of_fame, fitness.evaluator())?;

    let name = param.general.save_exp.split('.').next().filter(|s| !s.is_empty()).unwrap_or("gaselect");

    Ok(Experiment {
        id: format!("{}_{}", name, timestamp),
        timestamp,
        gaselect_version: experiment::version(),
        parameters: param.clone(),
        features,
        hall_of_fame,
        logbook: evolution.logbook,
        final_population: evolution.population,
        execution_time: start.elapsed().as_secs_f64(),
    })
}

/// Describe each hall of fame individual, its accuracy being evaluated again without penalty
pub fn hall_of_fame_entries(hall_of_fame: &HallOfFame, evaluator: &CrossValidationEvaluator) -> Result<Vec<HallOfFameEntry>, SelectorError> {
    hall_of_fame.items().iter().map(|individual| {
        let feature_count = individual.k();
        let accuracy = if feature_count == 0 { 0.0 } else { evaluator.mean_accuracy(&individual.genes)? };
        Ok(HallOfFameEntry {
            mask: individual.genes.clone(),
            fitness: individual.rank_fitness(),
            accuracy,
            feature_count,
            features: evaluator.data.selected_feature_names(&individual.genes),
        })
    }).collect()
}
