//! Error types for LandSense

/// Result type alias using LandSense's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for LandSense operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Image bytes could not be decoded
    #[error("image decode error: {0}")]
    Decode(String),

    /// Model, label list, or manifest failed to load, or label count mismatch
    #[error("model load error: {0}")]
    Load(String),

    /// The inference backend failed while executing
    #[error("inference error: {0}")]
    Inference(String),

    /// Postprocessing received a zero-length score vector
    #[error("cannot build predictions from an empty score vector")]
    EmptyScores,

    /// Fewer labels than a distribution needs
    #[error("at least 2 class labels are required, got {0}")]
    InsufficientLabels(usize),

    /// The inference adapter has not been initialized
    #[error("inference adapter is not ready")]
    NotReady,

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(String),

    /// Generic internal errors
    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a new decode error
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Create a new load error
    pub fn load(msg: impl Into<String>) -> Self {
        Self::Load(msg.into())
    }

    /// Create a new inference error
    pub fn inference(msg: impl Into<String>) -> Self {
        Self::Inference(msg.into())
    }

    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Whether the input image itself was unusable
    pub fn is_decode(&self) -> bool {
        matches!(self, Self::Decode(_))
    }

    /// Short machine-readable name, used as a metrics label
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Decode(_) => "decode",
            Self::Load(_) => "load",
            Self::Inference(_) => "inference",
            Self::EmptyScores => "empty_scores",
            Self::InsufficientLabels(_) => "insufficient_labels",
            Self::NotReady => "not_ready",
            Self::Config(_) => "config",
            Self::Internal(_) => "internal",
        }
    }
}
