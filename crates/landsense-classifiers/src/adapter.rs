//! Inference adapter: one-time model initialization gating `run`

use crate::backend::{InferenceBackend, ModelLoaderPlugin};
use crate::model_loader::ModelSource;
use landsense_core::{Error, ImageTensor, LabelSet, Result};
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::OnceCell;
use tracing::{debug, info};

/// Readiness of the inference adapter
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum AdapterState {
    /// No model session; callers must use the fallback
    NotReady,
    /// A model session is loaded
    Ready { model: String },
}

struct ReadyModel {
    backend: Arc<dyn InferenceBackend>,
    label_count: usize,
}

/// Wraps a model session behind a one-time, idempotent initialization.
///
/// The adapter starts `NotReady`. `initialize` moves it to `Ready` exactly
/// once; concurrent callers share a single load, and a failed load leaves the
/// adapter `NotReady` so a later `initialize` can retry. Readiness checks
/// never wait for an in-flight load.
#[derive(Default)]
pub struct InferenceAdapter {
    ready: OnceCell<ReadyModel>,
}

impl InferenceAdapter {
    /// Create an adapter in the `NotReady` state
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an adapter that is ready with the given backend
    pub fn with_backend(backend: Arc<dyn InferenceBackend>, labels: &LabelSet) -> Self {
        Self {
            ready: OnceCell::new_with(Some(ReadyModel {
                backend,
                label_count: labels.len(),
            })),
        }
    }

    /// Load a model session for the given labels.
    ///
    /// Returns immediately if the adapter is already ready. Every failure is
    /// reported as [`Error::Load`].
    pub async fn initialize(
        &self,
        loader: &dyn ModelLoaderPlugin,
        source: &ModelSource,
        labels: &LabelSet,
    ) -> Result<()> {
        if self.ready.initialized() {
            debug!("Inference adapter already initialized");
            return Ok(());
        }

        self.ready
            .get_or_try_init(|| async {
                let start = Instant::now();
                info!("Loading model from {}", source);

                let backend = loader.load_backend(source).await.map_err(as_load_error)?;

                info!(
                    "Model '{}' ready for {} labels in {:?}",
                    backend.name(),
                    labels.len(),
                    start.elapsed()
                );

                Ok::<_, Error>(ReadyModel {
                    backend,
                    label_count: labels.len(),
                })
            })
            .await?;

        Ok(())
    }

    /// Run the model and return raw scores in label order.
    ///
    /// Fails with [`Error::NotReady`] before initialization, with
    /// [`Error::Inference`] when the backend fails, and with [`Error::Load`]
    /// when the output length does not match the label count.
    pub async fn run(&self, tensor: &ImageTensor) -> Result<Vec<f32>> {
        let ready = self.ready.get().ok_or(Error::NotReady)?;

        let scores = ready
            .backend
            .run(tensor)
            .await
            .map_err(as_inference_error)?;

        if scores.len() != ready.label_count {
            return Err(Error::load(format!(
                "model '{}' produced {} scores but {} labels are configured",
                ready.backend.name(),
                scores.len(),
                ready.label_count
            )));
        }

        Ok(scores)
    }

    /// Check if a model session is loaded
    pub fn is_ready(&self) -> bool {
        self.ready.initialized()
    }

    /// Current state, without waiting for an in-flight load
    pub fn state(&self) -> AdapterState {
        match self.ready.get() {
            Some(ready) => AdapterState::Ready {
                model: ready.backend.name().to_string(),
            },
            None => AdapterState::NotReady,
        }
    }
}

fn as_load_error(e: Error) -> Error {
    match e {
        Error::Load(_) => e,
        other => Error::load(other.to_string()),
    }
}

fn as_inference_error(e: Error) -> Error {
    match e {
        Error::Inference(_) => e,
        other => Error::inference(other.to_string()),
    }
}
