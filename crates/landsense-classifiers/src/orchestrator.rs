//! Classification orchestrator
//!
//! Routes each request through the real model when the adapter is ready and
//! falls back to synthetic predictions otherwise. Undecodable images are the
//! only failure a caller ever sees; everything else degrades to demo mode.

use crate::adapter::{AdapterState, InferenceAdapter};
use crate::backend::{InferenceBackend, ModelLoaderPlugin};
use crate::fallback::FallbackPredictor;
use crate::model_loader::ModelSource;
use crate::postprocess::to_predictions;
use crate::preprocess::{self, TensorPreprocessor};
use landsense_core::{ClassificationResult, Error, LabelSet, PredictionSet, Result};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Land-cover classifier combining preprocessing, inference and fallback
pub struct LandCoverClassifier {
    labels: LabelSet,
    preprocessor: TensorPreprocessor,
    adapter: InferenceAdapter,
    fallback: FallbackPredictor,
}

impl LandCoverClassifier {
    /// Create a classifier that starts in demo mode
    pub fn new(labels: LabelSet) -> Self {
        Self {
            labels,
            preprocessor: TensorPreprocessor::new(),
            adapter: InferenceAdapter::new(),
            fallback: FallbackPredictor::new(),
        }
    }

    /// Create a classifier that is immediately ready with the given backend
    pub fn with_backend(labels: LabelSet, backend: Arc<dyn InferenceBackend>) -> Self {
        let adapter = InferenceAdapter::with_backend(backend, &labels);
        Self {
            labels,
            preprocessor: TensorPreprocessor::new(),
            adapter,
            fallback: FallbackPredictor::new(),
        }
    }

    /// Replace the fallback predictor
    pub fn with_fallback(mut self, fallback: FallbackPredictor) -> Self {
        self.fallback = fallback;
        self
    }

    /// Labels in model output order
    pub fn labels(&self) -> &LabelSet {
        &self.labels
    }

    /// Inference adapter state
    pub fn state(&self) -> AdapterState {
        self.adapter.state()
    }

    /// Check if requests currently take the real model path
    pub fn is_ready(&self) -> bool {
        self.adapter.is_ready()
    }

    /// Load the model. On failure the classifier stays in demo mode and the
    /// call may be repeated.
    pub async fn initialize(&self, loader: &dyn ModelLoaderPlugin, source: &ModelSource) -> Result<()> {
        self.adapter.initialize(loader, source, &self.labels).await
    }

    /// Classify one encoded image.
    ///
    /// Returns `Error::Decode` if the bytes are not a readable image. Any
    /// other failure on the model path yields a fallback result with
    /// `used_real_model == false`.
    pub async fn classify(&self, image: &[u8]) -> Result<ClassificationResult> {
        let start = Instant::now();

        if !self.adapter.is_ready() {
            debug!("Model not ready, using demo predictions");
            // Undecodable input is an error in demo mode too
            ensure_decodable(image.to_vec()).await?;
            return self.fallback_result(start, "not_ready");
        }

        match self.classify_real(image).await {
            Ok(predictions) => {
                let result = finish(predictions, start, true);
                debug!(
                    "Model prediction '{}' in {}ms",
                    result.top().map(|p| p.label.as_str()).unwrap_or("-"),
                    result.processing_time_ms
                );
                Ok(result)
            }
            Err(e) if e.is_decode() => Err(e),
            Err(e) => {
                warn!("Model prediction failed, using demo predictions: {}", e);
                self.fallback_result(start, e.kind())
            }
        }
    }

    async fn classify_real(&self, image: &[u8]) -> Result<PredictionSet> {
        let tensor = self.preprocessor.preprocess_async(image.to_vec()).await?;
        let scores = self.adapter.run(&tensor).await?;
        to_predictions(&scores, &self.labels)
    }

    fn fallback_result(&self, start: Instant, reason: &'static str) -> Result<ClassificationResult> {
        metrics::counter!("landsense_fallback_reasons_total", "reason" => reason).increment(1);

        let predictions = self.fallback.generate(&self.labels)?;
        Ok(finish(predictions, start, false))
    }
}

/// Decode the image on the blocking pool, discarding the pixels
async fn ensure_decodable(image: Vec<u8>) -> Result<()> {
    tokio::task::spawn_blocking(move || preprocess::decode(&image).map(|_| ()))
        .await
        .map_err(|e| Error::internal(format!("decode task failed: {}", e)))?
}

fn finish(predictions: PredictionSet, start: Instant, used_real_model: bool) -> ClassificationResult {
    let elapsed = start.elapsed();
    let path = if used_real_model { "model" } else { "fallback" };

    metrics::counter!("landsense_classifications_total", "path" => path).increment(1);
    metrics::histogram!("landsense_classification_latency_ms", "path" => path)
        .record(elapsed.as_secs_f64() * 1000.0);

    ClassificationResult::new(predictions, elapsed.as_millis() as u64, used_real_model)
}

impl std::fmt::Debug for LandCoverClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LandCoverClassifier")
            .field("labels", &self.labels.len())
            .field("state", &self.adapter.state())
            .field("seeded_fallback", &self.fallback.is_seeded())
            .finish()
    }
}

/// Initialize in the background, logging instead of failing
pub fn spawn_initialize(
    classifier: Arc<LandCoverClassifier>,
    loader: Arc<dyn ModelLoaderPlugin>,
    source: ModelSource,
) -> tokio::task::JoinHandle<bool> {
    tokio::spawn(async move {
        match classifier.initialize(loader.as_ref(), &source).await {
            Ok(()) => {
                info!("Model loaded from {}, real predictions enabled", source);
                true
            }
            Err(e) => {
                warn!("Model unavailable ({}), running in demo mode", e);
                false
            }
        }
    })
}
