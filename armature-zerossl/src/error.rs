/// Error types for ZeroSSL API operations
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ZeroSslError {
    /// The request could not be sent or the response could not be read.
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The API answered with a status code of 400 or above.
    #[error("ZeroSSL API returned status code {status}{}", body_suffix(.body))]
    Api {
        /// HTTP status code
        status: u16,
        /// Raw response body, when it was read
        body: Option<String>,
    },

    /// The response body did not match the expected shape.
    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn body_suffix(body: &Option<String>) -> String {
    match body {
        Some(body) => format!(", body {}", body),
        None => String::new(),
    }
}

impl ZeroSslError {
    /// HTTP status code if this is an API error
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Whether the API reported the resource as missing
    pub fn is_not_found(&self) -> bool {
        self.status_code() == Some(404)
    }
}

impl From<url::ParseError> for ZeroSslError {
    fn from(err: url::ParseError) -> Self {
        ZeroSslError::InvalidRequest(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ZeroSslError>;
