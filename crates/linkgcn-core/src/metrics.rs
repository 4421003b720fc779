//! Binary classification metrics for link prediction.

/// Predictions strictly above this count as "edge".
pub const DECISION_THRESHOLD: f32 = 0.5;

/// Confusion counts for binary predictions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Confusion {
    pub true_positives: usize,
    pub false_positives: usize,
    pub false_negatives: usize,
    pub true_negatives: usize,
}

impl Confusion {
    /// Threshold `predictions` at [`DECISION_THRESHOLD`] and count against
    /// `labels` (1.0 = edge, 0.0 = non-edge).
    ///
    /// # Panics
    /// If the slices differ in length.
    pub fn from_predictions(predictions: &[f32], labels: &[f32]) -> Self {
        assert_eq!(
            predictions.len(),
            labels.len(),
            "predictions and labels must align"
        );
        let mut c = Self::default();
        for (&p, &y) in predictions.iter().zip(labels) {
            match (p > DECISION_THRESHOLD, y > DECISION_THRESHOLD) {
                (true, true) => c.true_positives += 1,
                (true, false) => c.false_positives += 1,
                (false, true) => c.false_negatives += 1,
                (false, false) => c.true_negatives += 1,
            }
        }
        c
    }

    /// `2TP / (2TP + FP + FN)`, or `None` when nothing was predicted or
    /// labelled positive.
    pub fn f1(&self) -> Option<f64> {
        let tp2 = 2 * self.true_positives;
        let denom = tp2 + self.false_positives + self.false_negatives;
        (denom > 0).then(|| tp2 as f64 / denom as f64)
    }
}

/// F1 of thresholded `predictions` against `labels`.
pub fn f1_score(predictions: &[f32], labels: &[f32]) -> Option<f64> {
    Confusion::from_predictions(predictions, labels).f1()
}
