// Error types for the proxy. Remote failures are classified once at the HTTP boundary.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ProxyError>;

/// Classification of a non-success HTTP status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Throttled,
    NotFound,
    Invalid,
    Unauthorized,
    Unknown,
}

impl ErrorKind {
    pub fn from_status(status: u16) -> Self {
        match status {
            408 | 429 => ErrorKind::Throttled,
            404 => ErrorKind::NotFound,
            400 | 409 | 422 => ErrorKind::Invalid,
            401 | 403 => ErrorKind::Unauthorized,
            _ => ErrorKind::Unknown,
        }
    }
}

#[derive(Error, Debug)]
pub enum ProxyError {
    /// Remote API answered with a status >= 300 (after any throttling retries)
    #[error("API error {status} ({kind:?}): {message}")]
    Api {
        kind: ErrorKind,
        status: u16,
        message: String,
    },

    /// Bad caller input, rejected before any network call
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Configuration error: {0}")]
    Config(String),

    /// Selection text could not be parsed
    #[error("Parse error at offset {offset}: {message}")]
    Parse { offset: usize, message: String },

    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlDe(#[from] toml::de::Error),

    #[error("TOML write error: {0}")]
    TomlSer(#[from] toml::ser::Error),
}

impl ProxyError {
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        ProxyError::Api {
            kind: ErrorKind::from_status(status),
            status,
            message: message.into(),
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        ProxyError::InvalidArgument(message.into())
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ProxyError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            ProxyError::Api { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    /// True when the remote reported one of `statuses`; used for the soft
    /// not-found handling of optional waypoint sub-resources.
    pub fn has_status(&self, statuses: &[u16]) -> bool {
        self.status().is_some_and(|s| statuses.contains(&s))
    }
}
