use crate::models::{DemoConfig, StatusResponse};
use landsense_classifiers::LandCoverClassifier;
use std::sync::Arc;
use std::time::Instant;

/// Shared application state
#[derive(Clone)]
pub struct DemoAppState {
    /// Demo configuration
    pub config: Arc<DemoConfig>,

    /// Classifier shared by every request
    pub classifier: Arc<LandCoverClassifier>,

    /// Server start time
    pub started_at: Instant,
}

impl DemoAppState {
    pub fn new(config: DemoConfig, classifier: Arc<LandCoverClassifier>) -> Self {
        Self {
            config: Arc::new(config),
            classifier,
            started_at: Instant::now(),
        }
    }

    /// Build state with a fresh, uninitialized classifier from the config
    pub fn from_config(config: DemoConfig) -> Self {
        let classifier = Arc::new(config.classifier.build_classifier());
        Self::new(config, classifier)
    }

    /// Snapshot for the status endpoint
    pub fn status(&self) -> StatusResponse {
        StatusResponse {
            model: self.classifier.state(),
            demo_mode: !self.classifier.is_ready(),
            labels: self.classifier.labels().to_vec(),
            uptime_secs: self.started_at.elapsed().as_secs(),
        }
    }
}
