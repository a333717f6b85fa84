//! Core types for LandSense

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

/// EuroSAT land-cover classes, in model output order
pub const EUROSAT_CLASSES: [&str; 10] = [
    "AnnualCrop",
    "Forest",
    "HerbaceousVegetation",
    "Highway",
    "Industrial",
    "Pasture",
    "PermanentCrop",
    "Residential",
    "River",
    "SeaLake",
];

/// Identifier of one land-cover category
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClassLabel(String);

impl ClassLabel {
    /// Create a new class label
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Get the label text
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ClassLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl AsRef<str> for ClassLabel {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ClassLabel {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ClassLabel {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl PartialEq<&str> for ClassLabel {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Ordered, validated list of class labels.
///
/// The position of a label is the index of its score in the model's output
/// vector. A set always holds at least two distinct, non-empty labels and is
/// cheap to clone and share between requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelSet(Arc<[ClassLabel]>);

impl LabelSet {
    /// Build a label set, rejecting lists that cannot form a distribution
    pub fn new<I, L>(labels: I) -> Result<Self>
    where
        I: IntoIterator<Item = L>,
        L: Into<ClassLabel>,
    {
        let labels: Vec<ClassLabel> = labels.into_iter().map(Into::into).collect();

        if labels.len() < 2 {
            return Err(Error::config(format!(
                "label list needs at least 2 classes, got {}",
                labels.len()
            )));
        }

        let mut seen = HashSet::with_capacity(labels.len());
        for label in &labels {
            if label.as_str().trim().is_empty() {
                return Err(Error::config("label list contains an empty label"));
            }
            if !seen.insert(label.as_str()) {
                return Err(Error::config(format!("duplicate label '{}'", label)));
            }
        }

        Ok(Self(labels.into()))
    }

    /// The ten EuroSAT classes
    pub fn eurosat() -> Self {
        Self(EUROSAT_CLASSES.iter().map(|s| ClassLabel::from(*s)).collect())
    }

    /// Labels as a slice
    pub fn as_slice(&self) -> &[ClassLabel] {
        &self.0
    }

    /// Find the output index of a label
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.0.iter().position(|l| l.as_str() == name)
    }
}

impl Default for LabelSet {
    fn default() -> Self {
        Self::eurosat()
    }
}

impl Deref for LabelSet {
    type Target = [ClassLabel];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// A single label with its confidence in [0, 1]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    /// Land-cover class
    pub label: ClassLabel,

    /// Probability assigned to the class
    pub confidence: f64,
}

impl Prediction {
    /// Create a new prediction
    pub fn new(label: impl Into<ClassLabel>, confidence: f64) -> Self {
        Self {
            label: label.into(),
            confidence,
        }
    }
}

/// Predictions for every known class, sorted by descending confidence.
///
/// Sorting is stable, so equal confidences keep their label order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct PredictionSet(Vec<Prediction>);

impl PredictionSet {
    /// Sort predictions into a ranked set
    pub fn from_unsorted(mut predictions: Vec<Prediction>) -> Self {
        predictions.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
        Self(predictions)
    }

    /// Highest-confidence prediction
    pub fn top(&self) -> Option<&Prediction> {
        self.0.first()
    }

    /// Iterate in rank order
    pub fn iter(&self) -> std::slice::Iter<'_, Prediction> {
        self.0.iter()
    }

    /// Number of predictions
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if the set is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Sum of all confidences (1.0 for a valid set, within rounding)
    pub fn total(&self) -> f64 {
        self.0.iter().map(|p| p.confidence).sum()
    }

    /// Confidence for a specific label
    pub fn confidence_of(&self, label: &str) -> Option<f64> {
        self.0
            .iter()
            .find(|p| p.label.as_str() == label)
            .map(|p| p.confidence)
    }

    /// Predictions as a slice
    pub fn as_slice(&self) -> &[Prediction] {
        &self.0
    }

    /// Consume into the ranked vector
    pub fn into_vec(self) -> Vec<Prediction> {
        self.0
    }
}

impl<'a> IntoIterator for &'a PredictionSet {
    type Item = &'a Prediction;
    type IntoIter = std::slice::Iter<'a, Prediction>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Outcome of one classification request
#[derive(Debug, Clone, Serialize)]
pub struct ClassificationResult {
    /// Ranked predictions
    pub predictions: PredictionSet,

    /// Wall-clock time of the path that produced the predictions (milliseconds)
    pub processing_time_ms: u64,

    /// False when the predictions are synthetic
    pub used_real_model: bool,
}

impl ClassificationResult {
    /// Create a new classification result
    pub fn new(predictions: PredictionSet, processing_time_ms: u64, used_real_model: bool) -> Self {
        Self {
            predictions,
            processing_time_ms,
            used_real_model,
        }
    }

    /// Highest-confidence prediction
    pub fn top(&self) -> Option<&Prediction> {
        self.predictions.top()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_set_validation() {
        assert!(LabelSet::new(["Forest", "River"]).is_ok());
        assert!(matches!(LabelSet::new(["Forest"]), Err(Error::Config(_))));
        assert!(matches!(
            LabelSet::new(Vec::<String>::new()),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            LabelSet::new(["Forest", "Forest"]),
            Err(Error::Config(_))
        ));
        assert!(matches!(LabelSet::new(["Forest", " "]), Err(Error::Config(_))));
    }

    #[test]
    fn test_eurosat_defaults() {
        let labels = LabelSet::default();
        assert_eq!(labels.len(), 10);
        assert_eq!(labels[0], "AnnualCrop");
        assert_eq!(labels.index_of("SeaLake"), Some(9));
        assert_eq!(labels.index_of("Desert"), None);
    }

    #[test]
    fn test_prediction_set_sorts_stably() {
        let set = PredictionSet::from_unsorted(vec![
            Prediction::new("A", 0.2),
            Prediction::new("B", 0.4),
            Prediction::new("C", 0.2),
            Prediction::new("D", 0.2),
        ]);

        let order: Vec<&str> = set.iter().map(|p| p.label.as_str()).collect();
        assert_eq!(order, vec!["B", "A", "C", "D"]);
        assert_eq!(set.top().map(|p| p.label.as_str()), Some("B"));
        assert!((set.total() - 1.0).abs() < 1e-12);
        assert_eq!(set.confidence_of("C"), Some(0.2));
    }

    #[test]
    fn test_result_serializes_flat() {
        let result = ClassificationResult::new(
            PredictionSet::from_unsorted(vec![
                Prediction::new("River", 0.25),
                Prediction::new("Forest", 0.75),
            ]),
            12,
            true,
        );

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["processing_time_ms"], 12);
        assert_eq!(json["used_real_model"], true);
        assert_eq!(json["predictions"][0]["label"], "Forest");
        assert_eq!(json["predictions"][1]["confidence"], 0.25);
    }

    #[test]
    fn test_label_list_serializes_as_strings() {
        let labels = LabelSet::new(["Forest", "River"]).unwrap();
        let json = serde_json::to_value(labels.to_vec()).unwrap();
        assert_eq!(json, serde_json::json!(["Forest", "River"]));
    }
}
