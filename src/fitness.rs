use crate::errors::SelectorError;
use crate::evaluator::Evaluator;
use crate::utils::count_selected;
use log::debug;

/// Penalized score of a feature mask: `mean_accuracy - penalty_factor * k`.
///
/// A mask selecting no feature scores 0.0 without reaching the evaluator.
/// A mask whose length differs from the evaluator's feature count is an evaluation error.
pub struct FitnessFunction<E: Evaluator> {
    evaluator: E,
    pub penalty_factor: f64,
}

impl<E: Evaluator> FitnessFunction<E> {
    pub fn new(evaluator: E, penalty_factor: f64) -> Self {
        FitnessFunction { evaluator, penalty_factor }
    }

    pub fn evaluate(&self, mask: &[bool]) -> Result<f64, SelectorError> {
        if mask.len() != self.feature_count() {
            return Err(SelectorError::evaluation(
                mask,
                format!("mask has {} genes but the evaluator expects {} features", mask.len(), self.feature_count()),
            ));
        }

        let k = count_selected(mask);
        if k == 0 {
            return Ok(0.0);
        }

        let accuracy = self.evaluator.mean_accuracy(mask)?;
        let fitness = accuracy - self.penalty_factor * k as f64;
        debug!("k={} accuracy={:.4} fitness={:.4}", k, accuracy, fitness);

        Ok(fitness)
    }

    /// Chromosome length expected by the evaluator
    pub fn feature_count(&self) -> usize {
        self.evaluator.feature_count()
    }

    pub fn evaluator(&self) -> &E {
        &self.evaluator
    }
}
