//! Configuration for the classifier and model loading

use crate::fallback::FallbackPredictor;
use crate::manifest::ModelManifest;
use crate::model_loader::ModelSource;
use crate::orchestrator::LandCoverClassifier;
use landsense_core::{Error, LabelSet, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Configuration for the land-cover classifier
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Model source specification
    #[serde(default = "default_model")]
    pub model: ModelSourceSpec,

    /// Path to the model manifest listing classes in output order
    #[serde(default = "default_manifest")]
    pub manifest: PathBuf,

    /// Seed for reproducible demo predictions
    #[serde(default)]
    pub fallback_seed: Option<u64>,
}

/// Model source specification (for config files)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ModelSourceSpec {
    /// Local file path
    Local {
        path: PathBuf,
    },

    /// Hugging Face Hub
    HuggingFace {
        repo_id: String,
        filename: String,
        revision: Option<String>,
    },
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            manifest: default_manifest(),
            fallback_seed: None,
        }
    }
}

impl ClassifierConfig {
    /// Load from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml)
            .map_err(|e| Error::config(format!("Invalid classifier config: {}", e)))
    }

    /// Load from file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!("Failed to read config {}: {}", path.display(), e))
        })?;
        Self::from_yaml(&content)
    }

    /// Convert to a ModelSource for loading
    pub fn to_model_source(&self) -> ModelSource {
        match &self.model {
            ModelSourceSpec::Local { path } => ModelSource::LocalPath(path.clone()),
            ModelSourceSpec::HuggingFace {
                repo_id,
                filename,
                revision,
            } => ModelSource::HuggingFace {
                repo_id: repo_id.clone(),
                revision: revision.clone(),
                filename: filename.clone(),
            },
        }
    }

    /// Labels from the manifest, or the EuroSAT classes if it cannot be used
    pub fn load_labels(&self) -> LabelSet {
        match ModelManifest::from_file(&self.manifest).and_then(|m| m.labels()) {
            Ok(labels) => {
                info!(
                    "Loaded {} classes from {}",
                    labels.len(),
                    self.manifest.display()
                );
                labels
            }
            Err(e) => {
                warn!("Using default EuroSAT classes: {}", e);
                LabelSet::eurosat()
            }
        }
    }

    /// Fallback predictor honoring the configured seed
    pub fn fallback(&self) -> FallbackPredictor {
        match self.fallback_seed {
            Some(seed) => FallbackPredictor::seeded(seed),
            None => FallbackPredictor::new(),
        }
    }

    /// Build an uninitialized classifier from this configuration
    pub fn build_classifier(&self) -> LandCoverClassifier {
        LandCoverClassifier::new(self.load_labels()).with_fallback(self.fallback())
    }
}

fn default_model() -> ModelSourceSpec {
    ModelSourceSpec::Local {
        path: PathBuf::from("./models/crop_model_web.onnx"),
    }
}

fn default_manifest() -> PathBuf {
    PathBuf::from("./models/model_config.json")
}
