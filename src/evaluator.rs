use crate::cv::CV;
use crate::data::Data;
use crate::errors::SelectorError;
use crate::metric::ScoringMetric;
use crate::model::ModelKind;
use crate::param::Param;
use crate::utils::mean_and_std;
use log::debug;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Scores a feature mask. Implementations must be deterministic for a given mask.
pub trait Evaluator: Sync {
    /// Dimensionality of the feature space, i.e. the expected mask length
    fn feature_count(&self) -> usize;

    /// Mean score of a model restricted to the features selected by `mask`
    fn mean_accuracy(&self, mask: &[bool]) -> Result<f64, SelectorError>;
}

/// k-fold cross-validated score of a classifier on a fixed dataset.
///
/// The folds are drawn once at construction, so the same mask always trains and
/// validates on the same samples.
pub struct CrossValidationEvaluator {
    pub data: Data,
    pub model: ModelKind,
    pub knn_neighbors: usize,
    pub metric: ScoringMetric,
    pub cv: CV,
}

impl CrossValidationEvaluator {
    pub fn new(data: Data, model: ModelKind, knn_neighbors: usize, metric: ScoringMetric, cv: CV) -> Result<Self, SelectorError> {
        if cv.sample_len != data.sample_len {
            return Err(SelectorError::configuration(format!(
                "Folds cover {} samples but the dataset holds {}", cv.sample_len, data.sample_len
            )));
        }
        Ok(CrossValidationEvaluator { data, model, knn_neighbors, metric, cv })
    }

    /// Draw the folds from the `cv` section, seeded with the run seed
    pub fn from_param(data: Data, param: &Param) -> Result<Self, SelectorError> {
        let mut rng = ChaCha8Rng::seed_from_u64(param.general.seed);
        let cv = if param.cv.stratify {
            CV::new_stratified(&data.y, param.cv.folds, &mut rng)?
        } else {
            CV::new(data.sample_len, param.cv.folds, param.cv.shuffle, &mut rng)?
        };
        Self::new(data, param.model.algo, param.model.knn_neighbors, param.model.metric, cv)
    }

    fn fold_score(&self, fold: usize, mask: &[bool]) -> Result<f64, SelectorError> {
        let train = self.cv.training_indices(fold);
        let validation = self.cv.validation_indices(fold);

        let mut classifier = self.model.build(self.knn_neighbors);
        classifier.fit(&self.data.project(&train, mask), &self.data.labels(&train))
            .map_err(|reason| SelectorError::evaluation(mask, format!("fold #{}: {}", fold + 1, reason)))?;

        let y_pred = classifier.predict(&self.data.project(validation, mask));
        self.metric.score(&self.data.labels(validation), &y_pred)
            .ok_or_else(|| SelectorError::evaluation(mask, format!("fold #{}: nothing to score", fold + 1)))
    }
}

impl Evaluator for CrossValidationEvaluator {
    fn feature_count(&self) -> usize {
        self.data.feature_len
    }

    fn mean_accuracy(&self, mask: &[bool]) -> Result<f64, SelectorError> {
        if mask.len() != self.data.feature_len {
            return Err(SelectorError::evaluation(mask, format!(
                "mask has {} genes for {} features", mask.len(), self.data.feature_len
            )));
        }

        let scores = (0..self.cv.fold_number())
            .map(|fold| self.fold_score(fold, mask))
            .collect::<Result<Vec<f64>, SelectorError>>()?;

        let (mean, std) = mean_and_std(&scores);
        debug!("{:?} over {} folds: {:.4} (+/- {:.4})", self.metric, scores.len(), mean, std);

        Ok(mean)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // feature 0 separates the classes, feature 1 is noise
    fn separable_data() -> Data {
        let X = vec![
            vec![0.0, 3.0], vec![0.1, -1.0], vec![0.2, 2.0], vec![0.3, 0.0], vec![0.1, 1.0], vec![0.2, -2.0],
            vec![5.0, 1.0], vec![5.1, 0.0], vec![5.2, -1.0], vec![4.9, 2.0], vec![5.3, 3.0], vec![5.0, -2.0],
        ];
        let y = vec![0, 0, 0, 0, 0, 0, 1, 1, 1, 1, 1, 1];
        Data::from_matrix(X, y).unwrap()
    }

    fn evaluator(model: ModelKind) -> CrossValidationEvaluator {
        let mut param = Param::default();
        param.cv.folds = 3;
        param.cv.stratify = true;
        param.model.algo = model;
        param.model.knn_neighbors = 3;
        CrossValidationEvaluator::from_param(separable_data(), &param).unwrap()
    }

    #[test]
    fn test_informative_feature_scores_perfectly() {
        for model in [ModelKind::knn, ModelKind::gaussian_nb, ModelKind::nearest_centroid] {
            let evaluator = evaluator(model);
            assert_eq!(evaluator.feature_count(), 2);
            assert_eq!(evaluator.mean_accuracy(&[true, false]).unwrap(), 1.0,
                "{:?} should be perfect on the separating feature", model);
        }
    }

    #[test]
    fn test_evaluation_is_deterministic() {
        let evaluator = evaluator(ModelKind::knn);
        let first = evaluator.mean_accuracy(&[false, true]).unwrap();
        let second = evaluator.mean_accuracy(&[false, true]).unwrap();
        assert_eq!(first, second, "the same mask should always get the same score");
        assert!((0.0..=1.0).contains(&first));
    }

    #[test]
    fn test_mask_length_mismatch_is_an_evaluation_error() {
        let evaluator = evaluator(ModelKind::knn);
        assert!(matches!(evaluator.mean_accuracy(&[true]), Err(SelectorError::Evaluation { .. })));
    }

    #[test]
    fn test_folds_must_match_dataset() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let cv = CV::new(5, 2, false, &mut rng).unwrap();
        let result = CrossValidationEvaluator::new(separable_data(), ModelKind::knn, 3, ScoringMetric::accuracy, cv);
        assert!(matches!(result, Err(SelectorError::Configuration(_))));
    }

    #[test]
    fn test_too_few_samples_for_folds() {
        let mut param = Param::default();
        param.cv.folds = 20;
        assert!(CrossValidationEvaluator::from_param(separable_data(), &param).is_err());
    }
}
