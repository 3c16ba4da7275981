use crate::individual::Individual;
use crate::param::GA;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Crossover variants available to the evolution loop
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
#[allow(non_camel_case_types)]
pub enum CrossoverMethod {
    one_point,
    two_point,
    uniform,
}

impl CrossoverMethod {
    /// Mate two individuals in place. Returns true when their genes changed.
    pub fn mate(&self, parent1: &mut Individual, parent2: &mut Individual, rng: &mut ChaCha8Rng) -> bool {
        match self {
            CrossoverMethod::one_point => one_point_crossover(parent1, parent2, rng),
            CrossoverMethod::two_point => two_point_crossover(parent1, parent2, rng),
            CrossoverMethod::uniform => uniform_crossover(parent1, parent2, rng),
        }
    }
}

/// Draw `k` individuals, each the fittest of `tournament_size` aspirants sampled
/// uniformly with replacement. The first aspirant wins on ties.
pub fn tournament_selection(individuals: &[Individual], k: usize, tournament_size: usize, rng: &mut ChaCha8Rng) -> Vec<Individual> {
    if individuals.is_empty() {
        return Vec::new();
    }

    (0..k).map(|_| {
        let mut winner = &individuals[rng.gen_range(0..individuals.len())];
        for _ in 1..tournament_size {
            let aspirant = &individuals[rng.gen_range(0..individuals.len())];
            if aspirant.rank_fitness() > winner.rank_fitness() {
                winner = aspirant;
            }
        }
        winner.clone()
    }).collect()
}

// Both children lose their fitness only if the exchanged segments differed
fn swap_segment(parent1: &mut Individual, parent2: &mut Individual, start: usize, end: usize) -> bool {
    if parent1.genes[start..end] == parent2.genes[start..end] {
        return false;
    }
    parent1.genes[start..end].swap_with_slice(&mut parent2.genes[start..end]);
    parent1.invalidate();
    parent2.invalidate();
    true
}

/// Swap the tails of both parents after a random cut point
pub fn one_point_crossover(parent1: &mut Individual, parent2: &mut Individual, rng: &mut ChaCha8Rng) -> bool {
    let size = parent1.len().min(parent2.len());
    if size < 2 {
        return false;
    }
    let cut = rng.gen_range(1..size);
    swap_segment(parent1, parent2, cut, size)
}

/// Swap the segment between two distinct random cut points
pub fn two_point_crossover(parent1: &mut Individual, parent2: &mut Individual, rng: &mut ChaCha8Rng) -> bool {
    let size = parent1.len().min(parent2.len());
    if size < 2 {
        return false;
    }
    let mut cut1 = rng.gen_range(1..=size);
    let mut cut2 = rng.gen_range(1..size);
    if cut2 >= cut1 {
        cut2 += 1;
    } else {
        std::mem::swap(&mut cut1, &mut cut2);
    }
    swap_segment(parent1, parent2, cut1, cut2)
}

/// Exchange each gene with probability 0.5
pub fn uniform_crossover(parent1: &mut Individual, parent2: &mut Individual, rng: &mut ChaCha8Rng) -> bool {
    let size = parent1.len().min(parent2.len());
    let mut changed = false;
    for i in 0..size {
        if rng.gen::<f64>() < 0.5 && parent1.genes[i] != parent2.genes[i] {
            std::mem::swap(&mut parent1.genes[i], &mut parent2.genes[i]);
            changed = true;
        }
    }
    if changed {
        parent1.invalidate();
        parent2.invalidate();
    }
    changed
}

/// Flip each gene independently with probability `flip_probability`
pub fn flip_bit_mutation(individual: &mut Individual, flip_probability: f64, rng: &mut ChaCha8Rng) -> bool {
    let mut changed = false;
    for gene in individual.genes.iter_mut() {
        if rng.gen::<f64>() < flip_probability {
            *gene = !*gene;
            changed = true;
        }
    }
    if changed {
        individual.invalidate();
    }
    changed
}

/// Crossover then mutation on a selected pool.
///
/// Consecutive pairs (0,1), (2,3)... are mated with probability `p_crossover`, then
/// every individual is mutated with probability `p_mutation`. With an odd pool the
/// last individual is only eligible for mutation.
pub fn var_and(mut offspring: Vec<Individual>, ga: &GA, rng: &mut ChaCha8Rng) -> Vec<Individual> {
    for i in (1..offspring.len()).step_by(2) {
        if rng.gen::<f64>() < ga.p_crossover {
            let (left, right) = offspring.split_at_mut(i);
            ga.crossover.mate(&mut left[i - 1], &mut right[0], rng);
        }
    }

    for individual in offspring.iter_mut() {
        if rng.gen::<f64>() < ga.p_mutation {
            let flip_probability = ga.flip_probability(individual.len());
            flip_bit_mutation(individual, flip_probability, rng);
        }
    }

    offspring
}
