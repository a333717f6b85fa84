//! LandSense Classifiers
//!
//! Land-cover classification of satellite and aerial image tiles.
//!
//! A request flows through four stages:
//! - Preprocessing: decode, resize to 224x224, ImageNet-normalize, channel-major layout
//! - Inference: an ONNX graph behind a one-time initialized adapter
//! - Postprocessing: softmax and ranking against the model's label list
//! - Fallback: synthetic predictions while the model is unavailable (demo mode)
//!
//! [`LandCoverClassifier`] ties the stages together. Only undecodable input
//! surfaces as an error; every other failure degrades to demo mode.

pub mod adapter;
pub mod backend;
pub mod config;
pub mod fallback;
pub mod manifest;
pub mod model_loader;
#[cfg(feature = "ml-models")]
pub mod onnx;
pub mod orchestrator;
pub mod postprocess;
pub mod preprocess;
pub mod sample;

pub use adapter::{AdapterState, InferenceAdapter};
pub use backend::{InferenceBackend, ModelLoaderPlugin};
pub use config::{ClassifierConfig, ModelSourceSpec};
pub use fallback::FallbackPredictor;
pub use manifest::ModelManifest;
pub use model_loader::{resolve_model_path, ModelSource};
#[cfg(feature = "ml-models")]
pub use onnx::{OnnxBackend, OnnxModelLoader};
pub use orchestrator::{spawn_initialize, LandCoverClassifier};
pub use postprocess::{softmax, to_predictions};
pub use preprocess::{validate_image, TensorPreprocessor};
pub use sample::SampleKind;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::adapter::AdapterState;
    pub use crate::backend::{InferenceBackend, ModelLoaderPlugin};
    pub use crate::config::ClassifierConfig;
    pub use crate::fallback::FallbackPredictor;
    pub use crate::model_loader::ModelSource;
    pub use crate::orchestrator::LandCoverClassifier;
    pub use crate::sample::SampleKind;
    pub use landsense_core::prelude::*;
}
