use crate::individual::Individual;
use crate::utils::mean_and_std;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashSet;

#[derive(Clone, Serialize, Deserialize, PartialEq, Debug)]
pub struct Population {
    pub individuals: Vec<Individual>
}

impl Population {
    /// `population_size` random, unevaluated individuals of `chromosome_len` genes
    pub fn generate(population_size: usize, chromosome_len: usize, rng: &mut ChaCha8Rng) -> Population {
        Population {
            individuals: (0..population_size).map(|_| Individual::random(chromosome_len, rng)).collect()
        }
    }

    pub fn len(&self) -> usize {
        self.individuals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.individuals.is_empty()
    }

    /// Positions of the individuals whose fitness must be (re)computed
    pub fn invalid_indices(&self) -> Vec<usize> {
        self.individuals.iter()
            .enumerate()
            .filter(|(_, i)| !i.is_valid())
            .map(|(n, _)| n)
            .collect()
    }

    pub fn fitness_values(&self) -> Vec<f64> {
        self.individuals.iter().filter_map(|i| i.fitness).collect()
    }

    /// (max, avg, min, std) over the evaluated individuals
    pub fn fitness_stats(&self) -> (f64, f64, f64, f64) {
        let values = self.fitness_values();
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let (avg, std) = mean_and_std(&values);
        (max, avg, min, std)
    }

    /// Positions of the `n` least fit individuals, worst first.
    /// Equal fitness keeps population order.
    pub fn worst_indices(&self, n: usize) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.individuals.len()).collect();
        order.sort_by(|&a, &b| {
            self.individuals[a].rank_fitness()
                .partial_cmp(&self.individuals[b].rank_fitness())
                .unwrap_or(Ordering::Equal)
        });
        order.truncate(n);
        order
    }

    /// Distinct gene sequences present in the population
    pub fn genotypes(&self) -> HashSet<Vec<bool>> {
        self.individuals.iter().map(|i| i.genes.clone()).collect()
    }
}
