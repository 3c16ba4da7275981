use crate::errors::SelectorError;
use crate::evaluator::Evaluator;
use crate::fitness::FitnessFunction;
use crate::hall_of_fame::HallOfFame;
use crate::logbook::{GenerationRecord, Logbook};
use crate::operators::{tournament_selection, var_and};
use crate::param::{self, Param, GA};
use crate::population::Population;
use log::{debug, info};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use rayon::ThreadPool;
use std::time::Instant;

/// Outcome of a complete run
#[derive(Clone, Debug)]
pub struct Evolution {
    pub population: Population,
    pub hall_of_fame: HallOfFame,
    pub logbook: Logbook,
}

//-----------------------------------------------------------------------------
// Genetic Algorithm core functions
//-----------------------------------------------------------------------------

/// Main function to run the genetic algorithm
///
/// # Arguments
///
/// * `fitness` - Scores a feature mask; its evaluator fixes the chromosome length.
/// * `param` - Parameters of the run (`general.seed`, `general.thread_number` and the `ga` section).
///
/// # Returns
///
/// The last population, the hall of fame and one logbook record per generation
/// (generation 0 included).
///
/// # Errors
///
/// A ConfigurationError before anything is evaluated, or the first evaluation
/// failure, which aborts the run.
pub fn ga<E: Evaluator>(fitness: &FitnessFunction<E>, param: &Param) -> Result<Evolution, SelectorError> {
    let time = Instant::now();

    param::validate_ga(&param.ga)?;
    let chromosome_len = fitness.feature_count();
    if chromosome_len == 0 {
        return Err(SelectorError::configuration("The evaluator exposes no feature to select."));
    }

    let pool = build_thread_pool(param.general.thread_number)?;
    let mut rng = ChaCha8Rng::seed_from_u64(param.general.seed);

    let population = Population::generate(param.ga.population_size, chromosome_len, &mut rng);
    info!(
        "Population size: {}, chromosome length: {}, generations: {}",
        population.len(), chromosome_len, param.ga.max_generations
    );

    let mut hall_of_fame = HallOfFame::new(param.ga.hall_of_fame_size);
    let (population, logbook) = ea_simple_with_elitism(
        population, fitness, &param.ga, &mut hall_of_fame, pool.as_ref(), &mut rng
    )?;

    info!(
        "Genetic algorithm computed {} generations in {:.2?}",
        param.ga.max_generations,
        time.elapsed()
    );

    Ok(Evolution { population, hall_of_fame, logbook })
}

/// Generational evolution where the hall of fame is carried over each generation.
///
/// Each generation draws a pool by tournament, applies crossover and mutation,
/// evaluates only the individuals whose genes changed, then overwrites the worst
/// offspring with copies of the hall of fame entries (fitness kept) before updating
/// the hall of fame and the logbook.
pub fn ea_simple_with_elitism<E: Evaluator>(
    mut population: Population,
    fitness: &FitnessFunction<E>,
    ga: &GA,
    hall_of_fame: &mut HallOfFame,
    pool: Option<&ThreadPool>,
    rng: &mut ChaCha8Rng,
) -> Result<(Population, Logbook), SelectorError> {
    let mut logbook = Logbook::new();
    info!("{}", Logbook::header());

    let nevals = evaluate_invalid(&mut population, fitness, pool)?;
    hall_of_fame.update(&population);
    log_record(&logbook.record(0, nevals, &population));

    for gen in 1..=ga.max_generations {
        let selected = tournament_selection(&population.individuals, population.len(), ga.tournament_size, rng);
        let mut offspring = Population { individuals: var_and(selected, ga, rng) };

        let nevals = evaluate_invalid(&mut offspring, fitness, pool)?;

        let slots = offspring.worst_indices(hall_of_fame.len());
        debug!("Replacing offspring {:?} by the {} elites", slots, slots.len());
        for (slot, elite) in slots.into_iter().zip(hall_of_fame.items()) {
            offspring.individuals[slot] = elite.clone();
        }

        hall_of_fame.update(&offspring);
        population = offspring;

        log_record(&logbook.record(gen, nevals, &population));
    }

    Ok((population, logbook))
}

/// Compute the fitness of every unevaluated individual and return how many were evaluated.
///
/// With a thread pool the evaluations run in parallel; results are stored back in
/// population order, and the first failure in that order is returned.
/// Without one, evaluation stops at the first failure and nothing is stored.
pub fn evaluate_invalid<E: Evaluator>(
    population: &mut Population,
    fitness: &FitnessFunction<E>,
    pool: Option<&ThreadPool>,
) -> Result<usize, SelectorError> {
    let invalid = population.invalid_indices();

    let values: Vec<f64> = {
        let individuals = &population.individuals;
        let evaluate = |&i: &usize| fitness.evaluate(&individuals[i].genes);
        match pool {
            Some(pool) => {
                let results: Vec<Result<f64, SelectorError>> =
                    pool.install(|| invalid.par_iter().map(evaluate).collect());
                results.into_iter().collect::<Result<_, _>>()?
            }
            // stops at the first failure
            None => invalid.iter().map(evaluate).collect::<Result<_, _>>()?,
        }
    };

    for (&i, value) in invalid.iter().zip(values) {
        population.individuals[i].set_fitness(value);
    }

    Ok(invalid.len())
}

fn build_thread_pool(thread_number: usize) -> Result<Option<ThreadPool>, SelectorError> {
    if thread_number <= 1 {
        return Ok(None);
    }
    rayon::ThreadPoolBuilder::new()
        .num_threads(thread_number)
        .build()
        .map(Some)
        .map_err(|e| SelectorError::configuration(format!("Cannot start {} threads: {}", thread_number, e)))
}

fn log_record(record: &GenerationRecord) {
    info!("{}", record);
}
