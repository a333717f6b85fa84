//! Model manifest (`model_config.json`) shipped next to the ONNX graph

use landsense_core::{Error, LabelSet, NormalizationParams, Result, INPUT_SIZE};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Describes the class order and input contract of an exported model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelManifest {
    /// Display name of the model
    #[serde(default)]
    pub model_name: Option<String>,

    /// Class labels in model output order
    pub classes: Vec<String>,

    /// Square input edge length the model was exported with
    #[serde(default)]
    pub input_size: Option<usize>,

    /// Per-channel normalization mean
    #[serde(default)]
    pub mean: Option<[f32; 3]>,

    /// Per-channel normalization standard deviation
    #[serde(default)]
    pub std: Option<[f32; 3]>,
}

impl ModelManifest {
    /// Parse a manifest from JSON text
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| Error::load(format!("Failed to parse model manifest: {}", e)))
    }

    /// Read a manifest from disk
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            Error::load(format!(
                "Failed to read model manifest {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::from_json(&json)
    }

    /// Check the manifest against the fixed preprocessing contract
    pub fn validate(&self) -> Result<()> {
        if let Some(size) = self.input_size {
            if size != INPUT_SIZE {
                return Err(Error::config(format!(
                    "model expects {}x{} input, preprocessing produces {}x{}",
                    size, size, INPUT_SIZE, INPUT_SIZE
                )));
            }
        }

        let imagenet = NormalizationParams::IMAGENET;
        if let Some(mean) = self.mean {
            if !approx_eq(&mean, &imagenet.mean()) {
                return Err(Error::config(format!(
                    "model normalization mean {:?} differs from {:?}",
                    mean,
                    imagenet.mean()
                )));
            }
        }
        if let Some(std) = self.std {
            if !approx_eq(&std, &imagenet.std()) {
                return Err(Error::config(format!(
                    "model normalization std {:?} differs from {:?}",
                    std,
                    imagenet.std()
                )));
            }
        }

        Ok(())
    }

    /// Validated label set in model output order
    pub fn labels(&self) -> Result<LabelSet> {
        self.validate()?;
        LabelSet::new(self.classes.iter().map(String::as_str))
    }
}

fn approx_eq(a: &[f32; 3], b: &[f32; 3]) -> bool {
    a.iter().zip(b).all(|(x, y)| (x - y).abs() < 1e-4)
}
