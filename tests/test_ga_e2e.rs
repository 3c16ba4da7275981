/// End-to-End Integration Tests for the elitist GA feature selector
///
/// These tests validate the complete workflow:
/// 1. Fitness of a mask (empty-mask case and feature penalty)
/// 2. Invariants of the evolution (population size, chromosome length, elitism, caching)
/// 3. Reproducibility of a seeded run
/// 4. Convergence on a known optimum and edge configurations
/// 5. A full run on the sample dataset with saving/loading of the experiment
///
/// Run with: cargo test --test test_ga_e2e -- --nocapture
use gaselect::errors::SelectorError;
use gaselect::evaluator::Evaluator;
use gaselect::experiment::Experiment;
use gaselect::fitness::FitnessFunction;
use gaselect::ga::{ea_simple_with_elitism, ga};
use gaselect::hall_of_fame::HallOfFame;
use gaselect::param::Param;
use gaselect::population::Population;
use gaselect::utils::mask_to_string;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Accuracy = share of the target features that the mask selects
struct TargetEvaluator {
    feature_count: usize,
    target: Vec<usize>,
    calls: AtomicUsize,
}

impl TargetEvaluator {
    fn new(feature_count: usize, target: &[usize]) -> Self {
        TargetEvaluator { feature_count, target: target.to_vec(), calls: AtomicUsize::new(0) }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Evaluator for TargetEvaluator {
    fn feature_count(&self) -> usize {
        self.feature_count
    }

    fn mean_accuracy(&self, mask: &[bool]) -> Result<f64, SelectorError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let hits = self.target.iter().filter(|&&j| mask[j]).count();
        Ok(hits as f64 / self.target.len() as f64)
    }
}

/// Fails as soon as the first feature is selected
struct FirstFeatureFails;

impl Evaluator for FirstFeatureFails {
    fn feature_count(&self) -> usize {
        4
    }

    fn mean_accuracy(&self, mask: &[bool]) -> Result<f64, SelectorError> {
        if mask[0] {
            Err(SelectorError::Evaluation { mask: mask_to_string(mask), reason: "training failed".to_string() })
        } else {
            Ok(0.5)
        }
    }
}

/// Helper function to create GA parameters for the synthetic scenarios
fn create_ga_params(population_size: usize, max_generations: usize) -> Param {
    let mut param = Param::default();
    param.general.seed = 42;
    param.ga.population_size = population_size;
    param.ga.max_generations = max_generations;
    param.ga.hall_of_fame_size = 5.min(population_size);
    param.ga.feature_penalty_factor = 0.001;
    param
}

/// Helper function to create parameters for the sample dataset
fn create_sample_params() -> Param {
    let mut param = Param::default();
    param.general.seed = 42;
    param.data.X = "samples/tests/X.tsv".to_string();
    param.data.y = "samples/tests/y.tsv".to_string();
    param.data.features_in_rows = true;
    param.data.classes = vec!["healthy".to_string(), "sick".to_string()];
    param.ga.population_size = 20;
    param.ga.max_generations = 8;
    param.ga.hall_of_fame_size = 3;
    param.cv.folds = 3;
    param.cv.stratify = true;
    param.model.knn_neighbors = 3;
    param
}

#[test]
fn test_empty_mask_has_zero_fitness() {
    println!("\n=== Empty mask fitness ===\n");
    let fitness = FitnessFunction::new(FirstFeatureFails, 0.001);
    assert_eq!(fitness.evaluate(&[false; 4]).unwrap(), 0.0,
        "an empty mask should score 0.0 whatever the evaluator does");

    let fitness = FitnessFunction::new(TargetEvaluator::new(4, &[0, 1]), 0.5);
    assert_eq!(fitness.evaluate(&[false; 4]).unwrap(), 0.0);
    assert_eq!(fitness.evaluator().calls(), 0);
}

#[test]
fn test_fitness_is_accuracy_minus_penalty() {
    let fitness = FitnessFunction::new(TargetEvaluator::new(5, &[0, 2, 4]), 0.001);
    let cases = [
        ("10000", 1.0 / 3.0 - 0.001),
        ("11000", 1.0 / 3.0 - 0.002),
        ("10101", 1.0 - 0.003),
        ("11111", 1.0 - 0.005),
        ("01010", 0.0 - 0.002),
    ];
    for (mask, expected) in cases {
        let genes: Vec<bool> = mask.chars().map(|c| c == '1').collect();
        let value = fitness.evaluate(&genes).unwrap();
        assert!((value - expected).abs() < 1e-12, "fitness of {} is {}, expected {}", mask, value, expected);
    }
}

#[test]
fn test_population_size_and_chromosome_length_are_constant() {
    // Runs of increasing length share their first generations, so the final
    // population of each run is one generation of the longest run
    for max_generations in 1..=8 {
        let fitness = FitnessFunction::new(TargetEvaluator::new(7, &[1, 3]), 0.001);
        let evolution = ga(&fitness, &create_ga_params(15, max_generations)).unwrap();
        assert_eq!(evolution.population.len(), 15, "population size changed at generation {}", max_generations);
        assert!(evolution.population.individuals.iter().all(|i| i.len() == 7),
            "chromosome length changed at generation {}", max_generations);
        assert!(evolution.population.individuals.iter().all(|i| i.is_valid()),
            "every individual should be evaluated at the end of generation {}", max_generations);
    }
}

#[test]
fn test_runs_of_different_length_share_their_history() {
    let short = ga(&FitnessFunction::new(TargetEvaluator::new(6, &[0, 5]), 0.001), &create_ga_params(10, 3)).unwrap();
    let long = ga(&FitnessFunction::new(TargetEvaluator::new(6, &[0, 5]), 0.001), &create_ga_params(10, 6)).unwrap();
    assert_eq!(short.logbook.records[..], long.logbook.records[..4]);
}

#[test]
fn test_hall_of_fame_best_never_decreases() {
    let fitness = FitnessFunction::new(TargetEvaluator::new(12, &[0, 3, 6, 9, 11]), 0.001);
    let evolution = ga(&fitness, &create_ga_params(20, 25)).unwrap();

    let max = evolution.logbook.select_max();
    for (gen, window) in max.windows(2).enumerate() {
        assert!(window[1] >= window[0], "max fitness decreased after generation {}: {:?}", gen, max);
    }
    let best = evolution.hall_of_fame.best().unwrap().fitness.unwrap();
    assert_eq!(best, *max.last().unwrap(), "the hall of fame should hold the best fitness of the run");

    let hof_fitness: Vec<f64> = evolution.hall_of_fame.items().iter().map(|i| i.fitness.unwrap()).collect();
    assert!(hof_fitness.windows(2).all(|w| w[0] >= w[1]), "hall of fame should be sorted by decreasing fitness");
}

#[test]
fn test_same_seed_reproduces_the_run() {
    let param = create_ga_params(20, 10);
    let a = ga(&FitnessFunction::new(TargetEvaluator::new(10, &[2, 4, 8]), 0.001), &param).unwrap();
    let b = ga(&FitnessFunction::new(TargetEvaluator::new(10, &[2, 4, 8]), 0.001), &param).unwrap();
    assert_eq!(a.hall_of_fame, b.hall_of_fame);
    assert_eq!(a.logbook, b.logbook);

    let mut other_seed = param.clone();
    other_seed.general.seed = 7;
    let c = ga(&FitnessFunction::new(TargetEvaluator::new(10, &[2, 4, 8]), 0.001), &other_seed).unwrap();
    assert_ne!(a.logbook, c.logbook, "another seed should explore differently");
}

#[test]
fn test_unchanged_individuals_are_not_evaluated_again() {
    let fitness = FitnessFunction::new(TargetEvaluator::new(8, &[0, 1]), 0.001);
    let evolution = ga(&fitness, &create_ga_params(30, 10)).unwrap();

    let nevals: usize = evolution.logbook.records.iter().map(|r| r.nevals).sum();
    assert!(fitness.evaluator().calls() <= nevals, "the evaluator should only see invalidated individuals");
    assert!(evolution.logbook.records[1..].iter().all(|r| r.nevals <= 30));
    assert!(nevals < 30 * 11, "some individuals should keep their cached fitness");
}

#[test]
fn test_converges_on_known_optimum() {
    println!("\n=== Convergence on features {{0, 2, 4}} ===\n");
    let fitness = FitnessFunction::new(TargetEvaluator::new(5, &[0, 2, 4]), 0.001);
    let evolution = ga(&fitness, &create_ga_params(20, 10)).unwrap();

    let best = evolution.hall_of_fame.best().unwrap();
    println!("Best individual: {}", best);
    assert_eq!(mask_to_string(&best.genes), "10101");
    assert!((best.fitness.unwrap() - 0.997).abs() < 1e-9);
}

#[test]
fn test_single_feature_single_generation() {
    let mut param = create_ga_params(5, 1);
    param.ga.hall_of_fame_size = 5;
    let fitness = FitnessFunction::new(TargetEvaluator::new(1, &[0]), 0.001);
    let evolution = ga(&fitness, &param).unwrap();

    assert!(evolution.hall_of_fame.len() <= 2, "only two genotypes exist with one feature");
    assert_eq!(evolution.population.len(), 5);
    assert!(evolution.population.individuals.iter().all(|i| i.is_valid()),
        "every surviving individual should carry a fitness");
    for elite in evolution.hall_of_fame.items() {
        assert!(elite.is_valid());
    }
}

#[test]
fn test_no_variation_introduces_no_new_genotype() {
    let mut param = create_ga_params(12, 6);
    param.ga.p_crossover = 0.0;
    param.ga.p_mutation = 0.0;

    let fitness = FitnessFunction::new(TargetEvaluator::new(6, &[1, 2]), 0.001);
    let mut rng = ChaCha8Rng::seed_from_u64(param.general.seed);
    let initial = Population::generate(param.ga.population_size, 6, &mut rng);
    let initial_genotypes = initial.genotypes();

    let mut hall_of_fame = HallOfFame::new(param.ga.hall_of_fame_size);
    let (population, logbook) =
        ea_simple_with_elitism(initial, &fitness, &param.ga, &mut hall_of_fame, None, &mut rng).unwrap();

    assert!(population.genotypes().is_subset(&initial_genotypes), "selection alone cannot create genotypes");
    assert!(logbook.records[1..].iter().all(|r| r.nevals == 0), "no individual should be evaluated after generation 0");
    assert_eq!(population.len(), 12);

    // ga() draws the same initial population from the same seed
    let evolution = ga(&FitnessFunction::new(TargetEvaluator::new(6, &[1, 2]), 0.001), &param).unwrap();
    assert!(evolution.population.genotypes().is_subset(&initial_genotypes));
}

#[test]
fn test_evaluation_error_aborts_the_run() {
    let result = ga(&FitnessFunction::new(FirstFeatureFails, 0.001), &create_ga_params(20, 5));
    match result {
        Err(SelectorError::Evaluation { mask, reason }) => {
            assert!(mask.starts_with('1'));
            assert_eq!(reason, "training failed");
        }
        other => panic!("expected an evaluation error, got {:?}", other.map(|e| e.logbook)),
    }
}

#[test]
fn test_configuration_errors_prevent_the_run() {
    let mut param = create_ga_params(4, 5);
    param.ga.hall_of_fame_size = 5;
    let fitness = FitnessFunction::new(TargetEvaluator::new(4, &[0]), 0.001);
    assert!(matches!(ga(&fitness, &param), Err(SelectorError::Configuration(_))));
    assert_eq!(fitness.evaluator().calls(), 0, "nothing should be evaluated before the parameters are checked");

    let fitness = FitnessFunction::new(TargetEvaluator::new(0, &[]), 0.001);
    assert!(matches!(ga(&fitness, &create_ga_params(10, 5)), Err(SelectorError::Configuration(_))));
}

#[test]
fn test_sample_dataset_full_run() {
    println!("\n=== Full run on the sample dataset ===\n");
    let param = create_sample_params();
    assert!(Path::new(&param.data.X).exists(), "Training X file not found: {}", param.data.X);
    assert!(Path::new(&param.data.y).exists(), "Training y file not found: {}", param.data.y);

    let experiment = gaselect::run(&param).unwrap();
    println!("{}", experiment);

    assert!(!experiment.id.is_empty(), "Experiment ID should not be empty");
    assert_eq!(experiment.features.len(), 6);
    assert_eq!(experiment.logbook.len(), 9, "generation 0 plus 8 generations");
    assert_eq!(experiment.final_population.len(), 20);
    assert_eq!(experiment.hall_of_fame.len(), 3);

    let best = experiment.best().unwrap();
    assert_eq!(best.feature_count, best.features.len());
    assert!((best.fitness - (best.accuracy - 0.001 * best.feature_count as f64)).abs() < 1e-9,
        "the reported accuracy should match the fitness once the penalty is added back");
    assert!(best.accuracy >= 0.9, "the informative genes should be found, got {}", best);
    assert!(best.features.iter().any(|f| f == "gene_a" || f == "gene_c"), "got {:?}", best.features);

    // Save and reload
    let path = std::env::temp_dir().join(format!("gaselect_e2e_{}.json", std::process::id()));
    experiment.save_auto(&path).unwrap();
    let loaded = Experiment::load_auto(&path).unwrap();
    assert_eq!(loaded.hall_of_fame.len(), experiment.hall_of_fame.len());
    assert_eq!(loaded.logbook.len(), experiment.logbook.len());
    assert_eq!(loaded.features, experiment.features);
    std::fs::remove_file(path).unwrap();
}

#[test]
fn test_sample_dataset_same_seed_same_experiment() {
    let param = create_sample_params();
    let a = gaselect::run(&param).unwrap();
    let b = gaselect::run(&param).unwrap();
    assert_eq!(a.hall_of_fame, b.hall_of_fame);
    assert_eq!(a.logbook, b.logbook);
}

#[test]
fn test_run_without_dataset_is_a_configuration_error() {
    let param = Param::default();
    assert!(matches!(gaselect::run(&param), Err(SelectorError::Configuration(_))));
}
