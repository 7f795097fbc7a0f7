//! Mimir error types

/// Mimir error types
#[derive(Debug, thiserror::Error)]
pub enum MimirError {
    // Settings facility errors
    /// The host's settings facility is missing or could not be read.
    /// `SettingsStore` degrades to ephemeral defaults on this error.
    #[error("settings unavailable: {0}")]
    ConfigurationUnavailable(String),

    #[error("failed to persist settings: {0}")]
    Persistence(String),

    // Decision errors
    /// The live settings record could not be read as typed settings.
    /// Absorbed at the wrap boundary; the request proceeds untouched.
    #[error("policy evaluation failed: {0}")]
    PolicyEvaluation(String),

    // Wiring errors
    #[error("no request sender available to wrap")]
    SenderUnavailable,

    #[error("configuration error: {0}")]
    Configuration(String),

    // Input errors
    #[error("unknown setting: {0}")]
    UnknownSetting(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl MimirError {
    /// Whether this error is absorbed locally rather than surfaced.
    ///
    /// Absorbed errors never change the outcome of the underlying request;
    /// at worst the cache directive is omitted.
    pub fn is_absorbed(&self) -> bool {
        matches!(
            self,
            MimirError::ConfigurationUnavailable(_)
                | MimirError::Persistence(_)
                | MimirError::PolicyEvaluation(_)
                | MimirError::SenderUnavailable
        )
    }
}

/// Result type alias for Mimir operations
pub type Result<T> = std::result::Result<T, MimirError>;
