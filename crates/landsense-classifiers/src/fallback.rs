//! Synthetic predictions for demo mode
//!
//! Used when the model is unavailable. Output is shaped like a confident real
//! prediction: one dominant class in [0.6, 0.9] and the rest sharing the
//! remainder unevenly, summing to 1.

use landsense_core::{ClassLabel, Error, Prediction, PredictionSet, Result};
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Lower bound of the dominant class confidence
pub const DOMINANT_MIN: f64 = 0.6;

/// Upper bound of the dominant class confidence
pub const DOMINANT_MAX: f64 = 0.9;

/// Share of the remainder that bounds each raw non-dominant weight
const SPREAD: f64 = 0.8;

/// Generate a synthetic prediction set using the given random source
pub fn generate_with_rng<R: Rng + ?Sized>(
    labels: &[ClassLabel],
    rng: &mut R,
) -> Result<PredictionSet> {
    if labels.len() < 2 {
        return Err(Error::InsufficientLabels(labels.len()));
    }

    let dominant = rng.gen_range(0..labels.len());
    let dominant_confidence = rng.gen_range(DOMINANT_MIN..=DOMINANT_MAX);
    let remaining = 1.0 - dominant_confidence;

    let mut weights: Vec<f64> = (0..labels.len() - 1)
        .map(|_| rng.gen_range(0.0..remaining * SPREAD))
        .collect();
    let mut sum: f64 = weights.iter().sum();
    if sum <= 0.0 {
        weights.iter_mut().for_each(|w| *w = 1.0);
        sum = weights.len() as f64;
    }
    let factor = remaining / sum;

    let mut others = weights.into_iter().map(|w| w * factor);
    let predictions = labels
        .iter()
        .enumerate()
        .map(|(i, label)| {
            let confidence = if i == dominant {
                dominant_confidence
            } else {
                others.next().unwrap_or(0.0)
            };
            Prediction::new(label.clone(), confidence)
        })
        .collect();

    Ok(PredictionSet::from_unsorted(predictions))
}

/// Generate a synthetic prediction set from the thread-local RNG
pub fn generate(labels: &[ClassLabel]) -> Result<PredictionSet> {
    generate_with_rng(labels, &mut rand::thread_rng())
}

/// Fallback predictor with an injectable random source
#[derive(Debug, Default)]
pub struct FallbackPredictor {
    seeded: Option<Mutex<StdRng>>,
}

impl FallbackPredictor {
    /// Predictor drawing from the thread-local RNG
    pub fn new() -> Self {
        Self::default()
    }

    /// Reproducible predictor for tests and demos
    pub fn seeded(seed: u64) -> Self {
        Self {
            seeded: Some(Mutex::new(StdRng::seed_from_u64(seed))),
        }
    }

    /// Whether output is reproducible
    pub fn is_seeded(&self) -> bool {
        self.seeded.is_some()
    }

    /// Generate a synthetic prediction set
    pub fn generate(&self, labels: &[ClassLabel]) -> Result<PredictionSet> {
        match &self.seeded {
            Some(rng) => generate_with_rng(labels, &mut *rng.lock()),
            None => generate(labels),
        }
    }
}
