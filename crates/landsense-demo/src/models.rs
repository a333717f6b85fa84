//! Demo configuration and API payloads

use landsense_classifiers::{AdapterState, ClassifierConfig};
use landsense_core::ClassLabel;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Largest accepted upload (10 MB)
pub const DEFAULT_BODY_LIMIT: usize = 10 * 1024 * 1024;

/// Demo configuration: the classifier settings plus the HTTP server section
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DemoConfig {
    /// Model, manifest and fallback settings
    #[serde(flatten)]
    pub classifier: ClassifierConfig,

    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Listen address
    #[serde(default = "default_address")]
    pub address: String,

    /// Listen port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Maximum upload size in bytes
    #[serde(default = "default_body_limit")]
    pub body_limit: usize,

    /// Origins allowed by CORS; empty allows any origin
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: default_address(),
            port: default_port(),
            body_limit: default_body_limit(),
            cors_origins: Vec::new(),
        }
    }
}

impl DemoConfig {
    /// Load from YAML string
    pub fn from_yaml(yaml: &str) -> anyhow::Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Load from file
    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Load from an optional file, using defaults when none is given
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }
}

fn default_address() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_body_limit() -> usize {
    DEFAULT_BODY_LIMIT
}

/// Response of `GET /api/status`
#[derive(Debug, Clone, Serialize)]
pub struct StatusResponse {
    /// Inference adapter state
    pub model: AdapterState,

    /// True while requests are served with synthetic predictions
    pub demo_mode: bool,

    /// Labels in model output order
    pub labels: Vec<ClassLabel>,

    /// Seconds since the server started
    pub uptime_secs: u64,
}
