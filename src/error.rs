use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Key not found: {0}")]
    KeyNotFound(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected status {status} from {url}")]
    Status { url: String, status: u16 },

    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl AppError {
    /// Short label used as the `error.kind` field in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::KeyNotFound(_) => "key_not_found",
            AppError::Http(e) if e.is_timeout() => "timeout",
            AppError::Http(e) if e.is_connect() => "network_error",
            AppError::Http(e) if e.is_decode() => "decode_error",
            AppError::Http(_) => "http_error",
            AppError::Status { status, .. } if *status >= 500 => "server_error",
            AppError::Status { .. } => "client_error",
            AppError::Decode(_) => "decode_error",
            AppError::Config(_) => "config_error",
        }
    }

    /// The HTTP status behind the error, when the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            AppError::Status { status, .. } => Some(*status),
            AppError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
