//! Model source description and resolution to a local file

use landsense_core::{Error, Result};
use std::fmt;
use std::path::PathBuf;

/// Source location for the model graph
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelSource {
    /// Load from local file system
    LocalPath(PathBuf),

    /// Download from Hugging Face Hub
    HuggingFace {
        repo_id: String,
        revision: Option<String>,
        filename: String,
    },
}

impl ModelSource {
    /// Model file on the local file system
    pub fn from_local(path: impl Into<PathBuf>) -> Self {
        Self::LocalPath(path.into())
    }

    /// Model file in a Hugging Face repository
    pub fn from_hf(repo_id: impl Into<String>, filename: impl Into<String>) -> Self {
        Self::HuggingFace {
            repo_id: repo_id.into(),
            revision: None,
            filename: filename.into(),
        }
    }

    /// Set Hugging Face revision
    pub fn with_revision(self, revision: impl Into<String>) -> Self {
        match self {
            Self::HuggingFace {
                repo_id, filename, ..
            } => Self::HuggingFace {
                repo_id,
                revision: Some(revision.into()),
                filename,
            },
            local => local,
        }
    }
}

impl fmt::Display for ModelSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LocalPath(path) => write!(f, "{}", path.display()),
            Self::HuggingFace {
                repo_id,
                revision,
                filename,
            } => write!(
                f,
                "hf://{}@{}/{}",
                repo_id,
                revision.as_deref().unwrap_or("main"),
                filename
            ),
        }
    }
}

/// Resolve a model source to a readable local file.
///
/// Hugging Face sources are downloaded into the hub cache; this blocks on
/// network I/O, so call it from a blocking context.
pub fn resolve_model_path(source: &ModelSource) -> Result<PathBuf> {
    match source {
        ModelSource::LocalPath(path) => {
            if !path.is_file() {
                return Err(Error::load(format!(
                    "Model file not found: {}",
                    path.display()
                )));
            }
            Ok(path.clone())
        }
        ModelSource::HuggingFace {
            repo_id,
            revision,
            filename,
        } => download_from_hf(repo_id, revision.as_deref(), filename),
    }
}

#[cfg(feature = "ml-models")]
fn download_from_hf(repo_id: &str, revision: Option<&str>, filename: &str) -> Result<PathBuf> {
    use hf_hub::{api::sync::Api, Repo, RepoType};

    tracing::info!("Downloading model from HuggingFace: {}/{}", repo_id, filename);

    let api = Api::new()
        .map_err(|e| Error::load(format!("Failed to initialize HF API: {}", e)))?;

    let repo = api.repo(Repo::with_revision(
        repo_id.to_string(),
        RepoType::Model,
        revision.unwrap_or("main").to_string(),
    ));

    repo.get(filename)
        .map_err(|e| Error::load(format!("Failed to download model from HF: {}", e)))
}

#[cfg(not(feature = "ml-models"))]
fn download_from_hf(_repo_id: &str, _revision: Option<&str>, _filename: &str) -> Result<PathBuf> {
    Err(Error::load(
        "HuggingFace download requires 'ml-models' feature",
    ))
}
