//! Error types for the device farm client

use thiserror::Error;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur when using the device farm client
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// API returned an error status code
    #[error("API error (status {status}{}): {message}", code_suffix(.code))]
    ApiError {
        /// HTTP status code
        status: u16,
        /// Service exception name, e.g. `NotFoundException`
        code: Option<String>,
        /// Error message from the API
        message: String,
    },

    /// Failed to parse response
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// A response lacked a field the caller depends on
    #[error("Response is missing `{0}`")]
    MissingField(&'static str),

    /// No usable AWS credentials were found
    #[error("Missing credentials: {0}")]
    MissingCredentials(String),

    /// Invalid request
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Local file could not be read
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn code_suffix(code: &Option<String>) -> String {
    code.as_deref().map(|c| format!(", {}", c)).unwrap_or_default()
}

impl ClientError {
    /// Create an API error from status code and message
    pub fn api_error(status: u16, message: impl Into<String>) -> Self {
        Self::ApiError {
            status,
            code: None,
            message: message.into(),
        }
    }

    /// Build an API error from a failed response body
    ///
    /// The service answers with `{"__type": "...#NotFoundException", "message": "..."}`;
    /// bodies that are not in that shape are kept verbatim as the message.
    pub fn from_body(status: u16, body: &str) -> Self {
        #[derive(serde::Deserialize)]
        struct RawError {
            #[serde(rename = "__type")]
            kind: Option<String>,
            #[serde(alias = "Message")]
            message: Option<String>,
        }

        match serde_json::from_str::<RawError>(body) {
            Ok(raw) => Self::ApiError {
                status,
                code: raw
                    .kind
                    .map(|k| k.rsplit('#').next().unwrap_or_default().to_string()),
                message: raw.message.unwrap_or_else(|| body.to_string()),
            },
            Err(_) => Self::api_error(status, body),
        }
    }

    /// Check if this error is a "not found" error
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::ApiError { status: 404, .. } => true,
            Self::ApiError { code: Some(code), .. } => code == "NotFoundException",
            _ => false,
        }
    }

    /// Check if this error is a client error (4xx status)
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::ApiError { status, .. } if *status >= 400 && *status < 500)
    }

    /// Check if this error is a server error (5xx status)
    pub fn is_server_error(&self) -> bool {
        matches!(self, Self::ApiError { status, .. } if *status >= 500)
    }
}
