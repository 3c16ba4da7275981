use crate::errors::SelectorError;
use crate::utils;
use log::debug;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// K-fold partition of the sample indices of a dataset.
///
/// The partition is fixed at construction so that evaluating the same mask twice
/// trains and scores on exactly the same folds.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct CV {
    pub validation_folds: Vec<Vec<usize>>,
    pub sample_len: usize,
}

impl CV {
    /// Split `sample_len` samples in `folds` folds.
    ///
    /// Without shuffling, folds are contiguous blocks and the first `sample_len % folds`
    /// folds hold one extra sample. With shuffling, samples are randomly dealt in
    /// balanced folds.
    pub fn new(sample_len: usize, folds: usize, shuffle: bool, rng: &mut ChaCha8Rng) -> Result<CV, SelectorError> {
        check_fold_number(sample_len, folds)?;

        let indices: Vec<usize> = (0..sample_len).collect();
        let validation_folds = if shuffle {
            utils::split_into_balanced_random_chunks(indices, folds, rng)
        } else {
            utils::split_into_balanced_chunks(indices, folds)
        };

        debug!("Fold sizes: {:?}", validation_folds.iter().map(|f| f.len()).collect::<Vec<_>>());

        Ok(CV { validation_folds, sample_len })
    }

    /// Split samples in `folds` folds keeping the class proportions of `y` in each fold.
    pub fn new_stratified(y: &[u8], folds: usize, rng: &mut ChaCha8Rng) -> Result<CV, SelectorError> {
        check_fold_number(y.len(), folds)?;

        let mut classes: Vec<u8> = y.to_vec();
        classes.sort_unstable();
        classes.dedup();

        let mut validation_folds: Vec<Vec<usize>> = vec![Vec::new(); folds];
        // Classes are dealt starting on the fold left shortest by the previous class
        let mut offset = 0;
        for class in classes {
            let indices_class: Vec<usize> = y.iter().enumerate()
                .filter(|(_, &c)| c == class)
                .map(|(i, _)| i)
                .collect();
            let class_len = indices_class.len();
            let chunks = utils::split_into_balanced_random_chunks(indices_class, folds, rng);
            for (i, chunk) in chunks.into_iter().enumerate() {
                validation_folds[(i + offset) % folds].extend(chunk);
            }
            offset = (offset + class_len) % folds;
        }

        for fold in validation_folds.iter_mut() {
            fold.sort_unstable();
        }

        if let Some(i) = validation_folds.iter().position(|f| f.is_empty()) {
            return Err(SelectorError::configuration(format!("Stratified fold #{} is empty", i + 1)));
        }

        Ok(CV { validation_folds, sample_len: y.len() })
    }

    pub fn fold_number(&self) -> usize {
        self.validation_folds.len()
    }

    pub fn validation_indices(&self, fold: usize) -> &[usize] {
        &self.validation_folds[fold]
    }

    /// Every sample outside the validation fold, in increasing order
    pub fn training_indices(&self, fold: usize) -> Vec<usize> {
        let mut in_fold = vec![false; self.sample_len];
        for &i in &self.validation_folds[fold] {
            in_fold[i] = true;
        }
        (0..self.sample_len).filter(|&i| !in_fold[i]).collect()
    }
}

fn check_fold_number(sample_len: usize, folds: usize) -> Result<(), SelectorError> {
    if folds < 2 {
        return Err(SelectorError::configuration(format!("Cross-validation needs at least 2 folds, got {}", folds)));
    }
    if sample_len < folds {
        return Err(SelectorError::configuration(format!(
            "Cannot split {} samples in {} folds", sample_len, folds
        )));
    }
    Ok(())
}
