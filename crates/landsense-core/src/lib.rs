//! LandSense Core
//!
//! Core types, traits, and utilities shared across LandSense components.
//!
//! This crate provides:
//! - Class labels, predictions, and classification results
//! - The model input tensor and its normalization constants
//! - Error types and result handling

pub mod error;
pub mod tensor;
pub mod types;

pub use error::{Error, Result};
pub use tensor::{ImageTensor, NormalizationParams, INPUT_SIZE, TENSOR_LEN};
pub use types::{
    ClassLabel, ClassificationResult, LabelSet, Prediction, PredictionSet, EUROSAT_CLASSES,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::tensor::{ImageTensor, NormalizationParams};
    pub use crate::types::{ClassLabel, ClassificationResult, LabelSet, Prediction, PredictionSet};
}
