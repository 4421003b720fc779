//! Binary cross-entropy over positive and negative edge predictions.
//!
//! Labels are `[1; |pos|] ++ [0; |neg|]`, predictions are concatenated in
//! the same order, and the mean loss is returned.
//!
//! # Logits vs Probabilities
//!
//! The decoder already applies a sigmoid, so its outputs lie in `[0, 1]`.
//! [`LossInput::Logits`] still feeds them through the combined
//! sigmoid + cross-entropy formula, as if they were unbounded logits:
//!
//! ```text
//! l(x, y) = max(x, 0) - x*y + ln(1 + e^{-|x|})
//! ```
//!
//! The second sigmoid squashes the useful range to `[0.5, 0.73]` and
//! flattens the gradients; the loss never reaches zero. It is the default.
//! [`LossInput::Probabilities`] applies plain BCE to the probabilities.

use candle_core::{DType, Result, Tensor};
use serde::{Deserialize, Serialize};

/// Probabilities are clamped to `[EPS, 1 - EPS]` before taking logs.
const EPS: f64 = 1e-7;

/// How decoder outputs are interpreted by the loss.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LossInput {
    /// Treat predictions as logits (sigmoid applied again).
    #[default]
    Logits,
    /// Treat predictions as probabilities.
    Probabilities,
}

/// Labels `[1; num_pos] ++ [0; num_neg]`.
pub fn link_labels(num_pos: usize, num_neg: usize) -> Vec<f32> {
    let mut labels = vec![1f32; num_pos];
    labels.resize(num_pos + num_neg, 0.0);
    labels
}

/// Mean BCE of positive (`pos`) and negative (`neg`) predictions.
///
/// Both are 1-D. The result is a scalar tensor.
pub fn link_loss(pos: &Tensor, neg: &Tensor, input: LossInput) -> Result<Tensor> {
    let (num_pos, num_neg) = (pos.dim(0)?, neg.dim(0)?);
    let preds = match (num_pos, num_neg) {
        (_, 0) => pos.clone(),
        (0, _) => neg.clone(),
        _ => Tensor::cat(&[pos, neg], 0)?,
    };
    let labels = Tensor::from_vec(link_labels(num_pos, num_neg), num_pos + num_neg, preds.device())?
        .to_dtype(preds.dtype())?;

    match input {
        LossInput::Logits => bce_with_logits(&preds, &labels),
        LossInput::Probabilities => bce(&preds, &labels),
    }
}

/// Numerically stable `mean(max(x, 0) - x*y + ln(1 + e^{-|x|}))`.
pub fn bce_with_logits(logits: &Tensor, labels: &Tensor) -> Result<Tensor> {
    let softplus = (logits.abs()?.neg()?.exp()? + 1.0)?.log()?;
    ((logits.relu()? - (logits * labels)?)? + softplus)?.mean_all()
}

/// `mean(-(y ln p + (1 - y) ln(1 - p)))` on clamped probabilities.
pub fn bce(probs: &Tensor, labels: &Tensor) -> Result<Tensor> {
    let p = probs.clamp(EPS, 1.0 - EPS)?;
    let pos = (labels * p.log()?)?;
    let neg = (labels.affine(-1.0, 1.0)? * p.affine(-1.0, 1.0)?.log()?)?;
    (pos + neg)?.neg()?.mean_all()
}

/// Scalar value of a loss tensor.
pub fn loss_value(loss: &Tensor) -> Result<f32> {
    loss.to_dtype(DType::F32)?.to_scalar::<f32>()
}
