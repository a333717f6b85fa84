//! ONNX inference backend built on candle-onnx
//!
//! Graphs are evaluated on the CPU. Evaluation is CPU-bound and runs on the
//! blocking thread pool so it never stalls the async runtime.

use crate::backend::{InferenceBackend, ModelLoaderPlugin};
use crate::model_loader::{resolve_model_path, ModelSource};
use async_trait::async_trait;
use candle_core::{DType, Device, Tensor};
use candle_onnx::onnx::ModelProto;
use landsense_core::{Error, ImageTensor, Result};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

/// A loaded ONNX graph with one image input and one score output
pub struct OnnxBackend {
    name: String,
    model: Arc<ModelProto>,
    input_name: String,
    output_name: String,
}

impl OnnxBackend {
    /// Read and inspect an ONNX file.
    ///
    /// The input is the first graph input that is not an initializer; the
    /// output is the first graph output.
    pub fn from_file(path: &Path) -> Result<Self> {
        let model = candle_onnx::read_file(path)
            .map_err(|e| Error::load(format!("Failed to read ONNX model {}: {}", path.display(), e)))?;

        let graph = model
            .graph
            .as_ref()
            .ok_or_else(|| Error::load(format!("ONNX model {} has no graph", path.display())))?;

        let initializers: HashSet<&str> =
            graph.initializer.iter().map(|t| t.name.as_str()).collect();

        let input_name = graph
            .input
            .iter()
            .map(|i| i.name.as_str())
            .find(|name| !initializers.contains(name))
            .ok_or_else(|| Error::load("ONNX graph declares no image input"))?
            .to_string();

        let output_name = graph
            .output
            .first()
            .map(|o| o.name.clone())
            .ok_or_else(|| Error::load("ONNX graph declares no output"))?;

        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "onnx".to_string());

        debug!(
            "ONNX graph '{}': input '{}', output '{}'",
            name, input_name, output_name
        );

        Ok(Self {
            name,
            model: Arc::new(model),
            input_name,
            output_name,
        })
    }

    /// Name of the graph input fed with the image tensor
    pub fn input_name(&self) -> &str {
        &self.input_name
    }

    /// Name of the graph output read as class scores
    pub fn output_name(&self) -> &str {
        &self.output_name
    }
}

fn evaluate(
    model: &ModelProto,
    input_name: &str,
    output_name: &str,
    data: Vec<f32>,
) -> Result<Vec<f32>> {
    let input = Tensor::from_vec(data, ImageTensor::SHAPE.to_vec(), &Device::Cpu)
        .map_err(|e| Error::inference(format!("Failed to build input tensor: {}", e)))?;

    let mut inputs = HashMap::new();
    inputs.insert(input_name.to_string(), input);

    let mut outputs = candle_onnx::simple_eval(model, inputs)
        .map_err(|e| Error::inference(format!("ONNX evaluation failed: {}", e)))?;

    let scores = outputs
        .remove(output_name)
        .ok_or_else(|| Error::inference(format!("ONNX output '{}' missing", output_name)))?;

    scores
        .flatten_all()
        .and_then(|t| t.to_dtype(DType::F32))
        .and_then(|t| t.to_vec1::<f32>())
        .map_err(|e| Error::inference(format!("Failed to read ONNX output: {}", e)))
}

#[async_trait]
impl InferenceBackend for OnnxBackend {
    async fn run(&self, tensor: &ImageTensor) -> Result<Vec<f32>> {
        let model = Arc::clone(&self.model);
        let input_name = self.input_name.clone();
        let output_name = self.output_name.clone();
        let data = tensor.as_slice().to_vec();

        tokio::task::spawn_blocking(move || evaluate(&model, &input_name, &output_name, data))
            .await
            .map_err(|e| Error::internal(format!("ONNX evaluation task failed: {}", e)))?
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Default loader: resolves the source and reads it as an ONNX graph
#[derive(Debug, Default, Clone, Copy)]
pub struct OnnxModelLoader;

impl OnnxModelLoader {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ModelLoaderPlugin for OnnxModelLoader {
    async fn load_backend(&self, source: &ModelSource) -> Result<Arc<dyn InferenceBackend>> {
        let source = source.clone();

        let backend = tokio::task::spawn_blocking(move || {
            let path = resolve_model_path(&source)?;
            info!("Reading ONNX model from {}", path.display());
            OnnxBackend::from_file(&path)
        })
        .await
        .map_err(|e| Error::load(format!("Model loading task failed: {}", e)))??;

        Ok(Arc::new(backend))
    }
}
