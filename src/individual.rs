use crate::utils::{count_selected, mask_to_string};
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A feature mask and its cached fitness.
///
/// `fitness` is `None` until the individual is evaluated, and goes back to `None`
/// whenever a genetic operator actually changes its genes.
#[derive(Clone, Serialize, Deserialize, PartialEq, Debug)]
pub struct Individual {
    pub genes: Vec<bool>,
    pub fitness: Option<f64>,
}

impl Individual {
    /// Generates a random Individual, each gene drawn uniformly from {0, 1}
    ///
    /// # Arguments
    ///
    /// * `chromosome_len` - Number of genes, i.e. the dimensionality of the feature space
    /// * `rng` - Mutable reference to the run's ChaCha8Rng random number generator
    ///
    /// # Returns
    ///
    /// An unevaluated Individual
    ///
    /// # Examples
    ///
    /// ```
    /// # use gaselect::individual::Individual;
    /// # use rand_chacha::ChaCha8Rng;
    /// # use rand::SeedableRng;
    /// let mut rng = ChaCha8Rng::seed_from_u64(42);
    /// let individual = Individual::random(8, &mut rng);
    /// assert_eq!(individual.genes.len(), 8);
    /// assert!(!individual.is_valid());
    /// ```
    pub fn random(chromosome_len: usize, rng: &mut ChaCha8Rng) -> Individual {
        Individual {
            genes: (0..chromosome_len).map(|_| rng.gen_bool(0.5)).collect(),
            fitness: None,
        }
    }

    pub fn from_genes(genes: Vec<bool>) -> Individual {
        Individual { genes, fitness: None }
    }

    /// True when the cached fitness can be trusted
    pub fn is_valid(&self) -> bool {
        self.fitness.is_some()
    }

    pub fn invalidate(&mut self) {
        self.fitness = None;
    }

    pub fn set_fitness(&mut self, fitness: f64) {
        self.fitness = Some(fitness);
    }

    /// Fitness used for ranking: unevaluated individuals rank below everything
    pub fn rank_fitness(&self) -> f64 {
        self.fitness.unwrap_or(f64::NEG_INFINITY)
    }

    /// Number of selected features
    pub fn k(&self) -> usize {
        count_selected(&self.genes)
    }

    pub fn len(&self) -> usize {
        self.genes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }
}

impl fmt::Display for Individual {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.fitness {
            Some(fitness) => write!(f, "{} [k={}] fitness {:.4}", mask_to_string(&self.genes), self.k(), fitness),
            None => write!(f, "{} [k={}] fitness n/a", mask_to_string(&self.genes), self.k()),
        }
    }
}
