//! Inference backend trait and loader extension point

use crate::model_loader::ModelSource;
use async_trait::async_trait;
use landsense_core::{ImageTensor, Result};
use std::sync::Arc;

/// A loaded model session that maps one image tensor to raw class scores
#[async_trait]
pub trait InferenceBackend: Send + Sync {
    /// Run the model on a `[1, 3, 224, 224]` tensor.
    ///
    /// Returns unnormalized scores (logits) in label order.
    async fn run(&self, tensor: &ImageTensor) -> Result<Vec<f32>>;

    /// Get the backend or model name
    fn name(&self) -> &str;
}

/// Pluggable backend for loading inference sessions.
///
/// Implement this trait to provide alternative runtimes (or test doubles)
/// without coupling the pipeline to a specific inference engine.
#[async_trait]
pub trait ModelLoaderPlugin: Send + Sync {
    /// Load a model session from the given source.
    async fn load_backend(&self, source: &ModelSource) -> Result<Arc<dyn InferenceBackend>>;
}
