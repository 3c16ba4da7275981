use serde::{Deserialize, Serialize};

/// Scoring metric used to rate the predictions of a validation fold.
///
/// Binary metrics consider class 1 as the positive class.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
#[allow(non_camel_case_types)]
pub enum ScoringMetric {
    accuracy,
    balanced_accuracy,
    sensitivity,
    specificity,
    f1_score,
    mcc,
}

impl ScoringMetric {
    /// Score predictions against the truth. `None` when there is nothing to score.
    pub fn score(&self, y_true: &[u8], y_pred: &[u8]) -> Option<f64> {
        if y_true.is_empty() || y_true.len() != y_pred.len() {
            return None;
        }

        let score = match self {
            ScoringMetric::accuracy => {
                let correct = y_true.iter().zip(y_pred).filter(|(t, p)| t == p).count();
                correct as f64 / y_true.len() as f64
            }
            ScoringMetric::balanced_accuracy => balanced_accuracy(y_true, y_pred),
            ScoringMetric::sensitivity => {
                let (tp, _, _, fn_) = confusion_matrix(y_true, y_pred);
                ratio(tp, tp + fn_)
            }
            ScoringMetric::specificity => {
                let (_, fp, tn, _) = confusion_matrix(y_true, y_pred);
                ratio(tn, tn + fp)
            }
            ScoringMetric::f1_score => {
                let (tp, fp, _, fn_) = confusion_matrix(y_true, y_pred);
                ratio(2.0 * tp, 2.0 * tp + fp + fn_)
            }
            ScoringMetric::mcc => {
                let (tp, fp, tn, fn_) = confusion_matrix(y_true, y_pred);
                let denominator = ((tp + fp) * (tp + fn_) * (tn + fp) * (tn + fn_)).sqrt();
                if denominator > 0.0 { (tp * tn - fp * fn_) / denominator } else { 0.0 }
            }
        };

        Some(score)
    }
}

/// (tp, fp, tn, fn) with class 1 as positive
fn confusion_matrix(y_true: &[u8], y_pred: &[u8]) -> (f64, f64, f64, f64) {
    let (mut tp, mut fp, mut tn, mut fn_) = (0.0, 0.0, 0.0, 0.0);
    for (&t, &p) in y_true.iter().zip(y_pred) {
        match (t == 1, p == 1) {
            (true, true) => tp += 1.0,
            (false, true) => fp += 1.0,
            (false, false) => tn += 1.0,
            (true, false) => fn_ += 1.0,
        }
    }
    (tp, fp, tn, fn_)
}

/// Mean of per-class recalls over the classes present in y_true
fn balanced_accuracy(y_true: &[u8], y_pred: &[u8]) -> f64 {
    let mut classes = y_true.to_vec();
    classes.sort_unstable();
    classes.dedup();

    let recalls: Vec<f64> = classes.iter().map(|&c| {
        let support = y_true.iter().filter(|&&t| t == c).count();
        let hits = y_true.iter().zip(y_pred).filter(|(&t, &p)| t == c && p == c).count();
        hits as f64 / support as f64
    }).collect();

    recalls.iter().sum::<f64>() / recalls.len() as f64
}

fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 { numerator / denominator } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    const Y_TRUE: [u8; 8] = [1, 1, 1, 0, 0, 0, 0, 0];
    const Y_PRED: [u8; 8] = [1, 1, 0, 0, 0, 0, 1, 0];

    #[test]
    fn test_accuracy() {
        assert_eq!(ScoringMetric::accuracy.score(&Y_TRUE, &Y_PRED), Some(0.75));
    }

    #[test]
    fn test_sensitivity_and_specificity() {
        let sens = ScoringMetric::sensitivity.score(&Y_TRUE, &Y_PRED).unwrap();
        let spec = ScoringMetric::specificity.score(&Y_TRUE, &Y_PRED).unwrap();
        assert!((sens - 2.0 / 3.0).abs() < 1e-12);
        assert!((spec - 0.8).abs() < 1e-12);
    }

    #[test]
    fn test_balanced_accuracy_is_mean_recall() {
        let score = ScoringMetric::balanced_accuracy.score(&Y_TRUE, &Y_PRED).unwrap();
        assert!((score - (2.0 / 3.0 + 0.8) / 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_f1_and_mcc() {
        // tp=2 fp=1 tn=4 fn=1
        let f1 = ScoringMetric::f1_score.score(&Y_TRUE, &Y_PRED).unwrap();
        assert!((f1 - 4.0 / 6.0).abs() < 1e-12);

        let mcc = ScoringMetric::mcc.score(&Y_TRUE, &Y_PRED).unwrap();
        let expected = (2.0 * 4.0 - 1.0 * 1.0) / (3.0_f64 * 3.0 * 5.0 * 5.0).sqrt();
        assert!((mcc - expected).abs() < 1e-12);
    }

    #[test]
    fn test_perfect_predictions() {
        for metric in [ScoringMetric::accuracy, ScoringMetric::balanced_accuracy, ScoringMetric::f1_score, ScoringMetric::mcc] {
            assert_eq!(metric.score(&Y_TRUE, &Y_TRUE), Some(1.0), "{:?} should be 1 on perfect predictions", metric);
        }
    }

    #[test]
    fn test_empty_or_mismatched_input() {
        assert_eq!(ScoringMetric::accuracy.score(&[], &[]), None);
        assert_eq!(ScoringMetric::accuracy.score(&[0, 1], &[0]), None);
    }

    #[test]
    fn test_metric_names_deserialize() {
        let metric: ScoringMetric = serde_yaml::from_str("f1_score").unwrap();
        assert_eq!(metric, ScoringMetric::f1_score);
    }
}
