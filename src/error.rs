use thiserror::Error;

/// Error classes reported through `hello_errors_total{type=...}`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorType {
    /// The Hello API rejected the configured credentials
    Auth,
    /// Everything else: transport failures, unexpected statuses, bad payloads
    Other,
}

impl ErrorType {
    pub const ALL: [ErrorType; 2] = [ErrorType::Auth, ErrorType::Other];

    /// Label value used for the `type` label
    pub fn as_label(&self) -> &'static str {
        match self {
            ErrorType::Auth => "auth",
            ErrorType::Other => "other",
        }
    }
}

#[derive(Debug, Error)]
pub enum ExporterError {
    #[error("wrong credentials")]
    WrongCredentials,

    #[error("unexpected status code: {0}")]
    UnexpectedStatus(reqwest::StatusCode),

    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Metrics error: {0}")]
    Metrics(#[from] prometheus::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ExporterError {
    /// Classifies the error for scrape error accounting
    pub fn error_type(&self) -> ErrorType {
        match self {
            ExporterError::WrongCredentials => ErrorType::Auth,
            _ => ErrorType::Other,
        }
    }
}

pub type Result<T> = std::result::Result<T, ExporterError>;
