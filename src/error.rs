use thiserror::Error;

/// Failure to read or write a saved network.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("model io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("model json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("network shape mismatch: expected {expected} weights, got {actual}")]
    Shape { expected: usize, actual: usize },
}

/// Failure to load or validate configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("config json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}
