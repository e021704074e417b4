use crate::domain::model::Provider;
use thiserror::Error;

/// Failure of a single translation request.
///
/// Every variant is terminal for the request: nothing here is retried
/// automatically, the user re-triggers instead.
#[derive(Error, Debug)]
pub enum TranslateError {
    #[error("Local command is empty")]
    EmptyCommand,

    #[error("Local translation failed (exit code {code}): {stderr}")]
    ProcessFailed { code: i32, stderr: String },

    #[error("Failed to launch local translator: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("{0}")]
    QuotaExceeded(String),

    #[error("{0}")]
    Backend(String),

    #[error("Empty response.")]
    EmptyResponse,

    #[error("Nothing to translate.")]
    EmptyInput,

    #[error("No selected text found. Check Accessibility / Input Monitoring permissions and try again.")]
    NoSelectionFound,

    #[error("{0} API key is missing. Store one with `hkt --set-key {setting}`.", setting = .0.setting_name())]
    MissingApiKey(Provider),
}

impl TranslateError {
    /// Quota exhaustion calls for billing action rather than a retry.
    pub fn is_quota(&self) -> bool {
        matches!(self, TranslateError::QuotaExceeded(_))
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Translate(#[from] TranslateError),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Credential store error: {0}")]
    Keyring(#[from] keyring::Error),

    #[error("Clipboard error: {0}")]
    Clipboard(String),

    #[error("Input synthesis error: {0}")]
    Input(String),

    #[error("Configuration error: {0}")]
    Config(String),
}
