use crate::individual::Individual;
use crate::population::Population;
use serde::{Deserialize, Serialize};

/// Best individuals seen during a run, by decreasing fitness.
///
/// Entries are owned copies: later changes to the working population never reach
/// them. Two entries never share the same genes.
#[derive(Clone, Serialize, Deserialize, PartialEq, Debug)]
pub struct HallOfFame {
    pub maxsize: usize,
    items: Vec<Individual>,
}

impl HallOfFame {
    pub fn new(maxsize: usize) -> HallOfFame {
        HallOfFame { maxsize, items: Vec::with_capacity(maxsize) }
    }

    /// Consider every evaluated individual of `population` for a place.
    ///
    /// An individual gets in when the hall is not full or when it beats the last
    /// entry, provided its genes are not already recorded. The last entry is
    /// dropped to make room.
    pub fn update(&mut self, population: &Population) {
        if self.maxsize == 0 {
            return;
        }

        for individual in &population.individuals {
            let fitness = match individual.fitness {
                Some(fitness) => fitness,
                None => continue,
            };

            let admissible = match self.items.last() {
                None => true,
                Some(last) => self.items.len() < self.maxsize || fitness > last.rank_fitness(),
            };
            if !admissible || self.items.iter().any(|i| i.genes == individual.genes) {
                continue;
            }

            if self.items.len() >= self.maxsize {
                self.items.pop();
            }
            // newcomers go ahead of entries with the same fitness
            let position = self.items.iter().take_while(|i| i.rank_fitness() > fitness).count();
            self.items.insert(position, individual.clone());
        }
    }

    pub fn best(&self) -> Option<&Individual> {
        self.items.first()
    }

    pub fn items(&self) -> &[Individual] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
