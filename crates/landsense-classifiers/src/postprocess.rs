//! Softmax and ranking of raw model scores

use landsense_core::{ClassLabel, Error, Prediction, PredictionSet, Result};

/// Convert logits to probabilities, shifting by the max logit for stability
pub fn softmax(logits: &[f32]) -> Result<Vec<f64>> {
    if logits.is_empty() {
        return Err(Error::EmptyScores);
    }
    if let Some(bad) = logits.iter().find(|v| !v.is_finite()) {
        return Err(Error::inference(format!("model produced a non-finite score: {}", bad)));
    }

    let max = logits
        .iter()
        .map(|&v| v as f64)
        .fold(f64::NEG_INFINITY, f64::max);
    let exp: Vec<f64> = logits.iter().map(|&v| (v as f64 - max).exp()).collect();
    // The max element contributes exp(0) = 1, so the sum is at least 1
    let sum: f64 = exp.iter().sum();

    Ok(exp.into_iter().map(|e| e / sum).collect())
}

/// Turn raw per-class scores into a ranked prediction set.
///
/// `raw_scores[i]` belongs to `labels[i]`; ties keep label order.
pub fn to_predictions(raw_scores: &[f32], labels: &[ClassLabel]) -> Result<PredictionSet> {
    if raw_scores.is_empty() {
        return Err(Error::EmptyScores);
    }
    if raw_scores.len() != labels.len() {
        return Err(Error::load(format!(
            "model returned {} scores for {} labels",
            raw_scores.len(),
            labels.len()
        )));
    }

    let predictions = softmax(raw_scores)?
        .into_iter()
        .zip(labels)
        .map(|(p, label)| Prediction::new(label.clone(), p))
        .collect();

    Ok(PredictionSet::from_unsorted(predictions))
}
