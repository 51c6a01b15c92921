//! Decision Threshold Selection
//!
//! Offline step: picks the probability cutoff persisted as
//! `optimal_threshold`. Runtime never recomputes it.
//!
//! The positive class is rare, so a fixed 0.5 cut under-detects it. Instead
//! the ROC curve is scanned and the point maximizing Youden's J
//! (`TPR - FPR`) wins.
//!
//! Curve points count a sample positive when `probability >= threshold`.
//! Runtime labels with `probability > threshold`, so samples scoring exactly
//! the chosen threshold are positive on the curve but negative at runtime.
//! The reported `tpr`/`fpr` can therefore overstate what runtime achieves;
//! `accuracy_at` measures the runtime rule.

use serde::{Deserialize, Serialize};

use crate::error::{RiskError, RiskResult};

// ============================================================================
// DATA STRUCTURES
// ============================================================================

/// One evaluation example: true label and predicted P(positive)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LabeledScore {
    pub label: bool,
    pub probability: f64,
}

impl LabeledScore {
    pub fn new(label: bool, probability: f64) -> Self {
        Self { label, probability }
    }
}

/// ROC point for the rule `probability >= threshold`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RocPoint {
    pub threshold: f64,
    pub fpr: f64,
    pub tpr: f64,
}

impl RocPoint {
    /// Youden's J statistic
    pub fn youden_j(&self) -> f64 {
        self.tpr - self.fpr
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThresholdSelection {
    pub threshold: f64,
    pub youden_j: f64,
    pub tpr: f64,
    pub fpr: f64,
    /// Area under the curve (trapezoidal)
    pub auc: f64,
    /// Most permissive point first
    pub curve: Vec<RocPoint>,
}

// ============================================================================
// ROC CURVE
// ============================================================================

fn validate(samples: &[LabeledScore]) -> RiskResult<(usize, usize)> {
    if samples.is_empty() {
        return Err(RiskError::InvalidEvaluationSet("no samples".to_string()));
    }
    if let Some(bad) = samples
        .iter()
        .find(|s| !s.probability.is_finite() || !(0.0..=1.0).contains(&s.probability))
    {
        return Err(RiskError::InvalidEvaluationSet(format!(
            "probability {} outside [0, 1]",
            bad.probability
        )));
    }

    let positives = samples.iter().filter(|s| s.label).count();
    let negatives = samples.len() - positives;
    if positives == 0 || negatives == 0 {
        return Err(RiskError::InvalidEvaluationSet(format!(
            "both classes required (positives: {}, negatives: {})",
            positives, negatives
        )));
    }

    Ok((positives, negatives))
}

/// ROC curve ordered from most permissive (everything positive) to most
/// conservative (`+inf`, nothing positive). One point per distinct score.
pub fn roc_curve(samples: &[LabeledScore]) -> RiskResult<Vec<RocPoint>> {
    let (positives, negatives) = validate(samples)?;

    let mut sorted = samples.to_vec();
    sorted.sort_by(|a, b| {
        b.probability
            .partial_cmp(&a.probability)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut points = vec![RocPoint { threshold: f64::INFINITY, fpr: 0.0, tpr: 0.0 }];
    let (mut tp, mut fp) = (0usize, 0usize);

    for (i, sample) in sorted.iter().enumerate() {
        if sample.label {
            tp += 1;
        } else {
            fp += 1;
        }

        let closes_group = sorted
            .get(i + 1)
            .map_or(true, |next| next.probability != sample.probability);
        if closes_group {
            points.push(RocPoint {
                threshold: sample.probability,
                fpr: fp as f64 / negatives as f64,
                tpr: tp as f64 / positives as f64,
            });
        }
    }

    points.reverse();
    Ok(points)
}

/// Trapezoidal area under a curve
pub fn curve_auc(curve: &[RocPoint]) -> f64 {
    curve
        .windows(2)
        .map(|w| (w[0].fpr - w[1].fpr).abs() * (w[0].tpr + w[1].tpr) / 2.0)
        .sum()
}

// ============================================================================
// SELECTION
// ============================================================================

/// argmax J over a curve ordered permissive-first.
/// Ties go to the first maximal point.
pub fn select_from_curve(curve: &[RocPoint]) -> RiskResult<RocPoint> {
    let mut best: Option<RocPoint> = None;
    for point in curve {
        match best {
            Some(b) if point.youden_j() <= b.youden_j() => {}
            _ => best = Some(*point),
        }
    }
    best.ok_or_else(|| RiskError::InvalidEvaluationSet("empty ROC curve".to_string()))
}

/// Full selection from a labeled evaluation set
pub fn select_threshold(samples: &[LabeledScore]) -> RiskResult<ThresholdSelection> {
    let curve = roc_curve(samples)?;
    let best = select_from_curve(&curve)?;

    log::info!(
        "Optimal threshold: {:.3} (J = {:.3}, TPR = {:.3}, FPR = {:.3})",
        best.threshold,
        best.youden_j(),
        best.tpr,
        best.fpr
    );

    Ok(ThresholdSelection {
        threshold: best.threshold,
        youden_j: best.youden_j(),
        tpr: best.tpr,
        fpr: best.fpr,
        auc: curve_auc(&curve),
        curve,
    })
}

/// Same as `select_threshold` for parallel label/probability slices
pub fn select_threshold_from(labels: &[bool], probabilities: &[f64]) -> RiskResult<ThresholdSelection> {
    if labels.len() != probabilities.len() {
        return Err(RiskError::InvalidEvaluationSet(format!(
            "{} labels but {} probabilities",
            labels.len(),
            probabilities.len()
        )));
    }
    let samples: Vec<LabeledScore> = labels
        .iter()
        .zip(probabilities)
        .map(|(&label, &probability)| LabeledScore { label, probability })
        .collect();
    select_threshold(&samples)
}

/// Accuracy under the runtime rule `probability > threshold`
pub fn accuracy_at(samples: &[LabeledScore], threshold: f64) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    let correct = samples
        .iter()
        .filter(|s| (s.probability > threshold) == s.label)
        .count();
    correct as f64 / samples.len() as f64
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn samples(pairs: &[(bool, f64)]) -> Vec<LabeledScore> {
        pairs.iter().map(|&(l, p)| LabeledScore::new(l, p)).collect()
    }

    #[test]
    fn test_unique_maximum_is_selected() {
        let set = samples(&[(false, 0.1), (false, 0.2), (true, 0.7), (true, 0.9)]);
        let selection = select_threshold(&set).unwrap();
        assert_relative_eq!(selection.threshold, 0.7);
        assert_relative_eq!(selection.youden_j, 1.0);
        assert_relative_eq!(selection.auc, 1.0);
    }

    #[test]
    fn test_synthetic_curve_unique_point() {
        let curve = vec![
            RocPoint { threshold: 0.05, fpr: 1.0, tpr: 1.0 },
            RocPoint { threshold: 0.20, fpr: 0.6, tpr: 0.9 },
            RocPoint { threshold: 0.31, fpr: 0.2, tpr: 0.8 },
            RocPoint { threshold: 0.55, fpr: 0.1, tpr: 0.4 },
            RocPoint { threshold: f64::INFINITY, fpr: 0.0, tpr: 0.0 },
        ];
        let best = select_from_curve(&curve).unwrap();
        assert_relative_eq!(best.threshold, 0.31);
    }

    #[test]
    fn test_tie_goes_to_most_permissive() {
        // J = 2/3 at both 0.35 and 0.8
        let set = samples(&[
            (false, 0.1),
            (false, 0.3),
            (true, 0.35),
            (false, 0.4),
            (true, 0.8),
            (true, 0.9),
        ]);
        let selection = select_threshold(&set).unwrap();
        assert_relative_eq!(selection.threshold, 0.35);
        assert_relative_eq!(selection.youden_j, 2.0 / 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_curve_is_permissive_first() {
        let set = samples(&[(false, 0.2), (true, 0.6), (true, 0.6), (false, 0.9)]);
        let curve = roc_curve(&set).unwrap();

        // distinct scores + the +inf point
        assert_eq!(curve.len(), 4);
        assert_relative_eq!(curve[0].threshold, 0.2);
        assert_relative_eq!(curve[0].tpr, 1.0);
        assert_relative_eq!(curve[0].fpr, 1.0);
        assert!(curve[3].threshold.is_infinite());
        assert!(curve.windows(2).all(|w| w[0].threshold < w[1].threshold));
    }

    #[test]
    fn test_runtime_rule_is_strict_at_threshold() {
        let set = samples(&[(false, 0.2), (true, 0.9)]);
        let selection = select_threshold(&set).unwrap();
        assert_relative_eq!(selection.threshold, 0.9);
        assert_relative_eq!(selection.tpr, 1.0);

        // The sample sitting on the threshold is not positive at runtime
        assert_relative_eq!(accuracy_at(&set, selection.threshold), 0.5);
        assert_relative_eq!(accuracy_at(&set, 0.5), 1.0);
    }

    #[test]
    fn test_single_class_rejected() {
        let set = samples(&[(true, 0.2), (true, 0.8)]);
        assert!(matches!(
            select_threshold(&set),
            Err(RiskError::InvalidEvaluationSet(_))
        ));
        assert!(select_threshold(&[]).is_err());
    }

    #[test]
    fn test_invalid_probability_rejected() {
        let set = samples(&[(true, f64::NAN), (false, 0.3)]);
        assert!(select_threshold(&set).is_err());
        let set = samples(&[(true, 1.5), (false, 0.3)]);
        assert!(select_threshold(&set).is_err());
    }

    #[test]
    fn test_parallel_slices_must_match() {
        assert!(select_threshold_from(&[true, false], &[0.4]).is_err());
        let selection = select_threshold_from(&[true, false], &[0.8, 0.1]).unwrap();
        assert_relative_eq!(selection.threshold, 0.8);
    }

    #[test]
    fn test_accuracy_uses_strict_cut() {
        let set = samples(&[(true, 0.7), (false, 0.2), (true, 0.5)]);
        // 0.5 is not > 0.5, so the last sample is a miss
        assert_relative_eq!(accuracy_at(&set, 0.5), 2.0 / 3.0, epsilon = 1e-12);
        assert_relative_eq!(accuracy_at(&set, 0.4), 1.0);
    }
}
