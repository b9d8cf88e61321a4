//! Error types for the Microsoft Graph drive client.
//!
//! Failures surface to callers through one of three families:
//!
//! - [`ArgumentError`]: the caller supplied an invalid or incomplete
//!   resource reference; raised before any network I/O.
//! - [`ApiError`]: a failed response whose body is a parseable Graph error
//!   payload, classified by status code.
//! - [`TransportError`]: connection-level failures, plus non-2xx responses
//!   whose body is not JSON (including the pre-signed download endpoint,
//!   which does not speak the Graph error format).

use reqwest::StatusCode;
use thiserror::Error;

/// Result type for Graph drive operations.
pub type GraphDriveResult<T> = Result<T, GraphDriveError>;

/// Top-level error type for the Graph drive client.
#[derive(Debug, Error)]
pub enum GraphDriveError {
    /// Invalid or missing caller-supplied arguments.
    #[error("argument error: {0}")]
    Argument(#[from] ArgumentError),

    /// Classified Graph API error.
    #[error("graph api error: {0}")]
    Api(#[from] ApiError),

    /// Transport-level failure or unclassifiable HTTP error.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Response decoding failure.
    #[error("response error: {0}")]
    Response(#[from] ResponseError),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    /// Local file I/O failure during download or upload.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

impl GraphDriveError {
    /// Returns the HTTP status code behind this error, if it came off the wire.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            GraphDriveError::Api(err) => Some(err.status()),
            GraphDriveError::Transport(TransportError::Status { status, .. }) => Some(*status),
            _ => None,
        }
    }

    /// Returns true for transient server-side failures (HTTP 500, 502, 503, 504).
    pub fn is_retryable(&self) -> bool {
        matches!(self.status_code(), Some(500 | 502 | 503 | 504))
    }
}

/// Caller-side argument failures, raised before any request is sent.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ArgumentError {
    /// A drive identifier is required for this scope.
    #[error("missing drive_id argument")]
    MissingDriveId,

    /// Neither an item identifier nor an item path was supplied.
    #[error("missing arguments: item_id or item_path")]
    MissingItemReference,

    /// Both an item identifier and an item path were supplied.
    #[error("ambiguous arguments: item_id and item_path are mutually exclusive")]
    AmbiguousItemReference,

    /// A local file path argument is required.
    #[error("missing file_path argument")]
    MissingFilePath,

    /// The assembled request URL is not valid.
    #[error("invalid request url: {0}")]
    InvalidUrl(String),
}

/// Graph API errors classified from a failed response with a JSON body.
///
/// The message is lifted from the payload's `error.message` field and is
/// empty when the field is absent.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ApiError {
    /// HTTP 401, the access token was rejected.
    #[error("invalid access token: {0}")]
    InvalidToken(String),

    /// HTTP 404, the item, drive, or site does not exist.
    #[error("item not found: {0}")]
    NotFound(String),

    /// HTTP 429, request throttled by the service.
    #[error("rate limited: {0}")]
    RateLimited(String),

    /// Any other non-2xx status with a parseable error body.
    #[error("request failed (HTTP {status}): {message}")]
    Generic {
        /// HTTP status code.
        status: u16,
        /// Message from the error payload, possibly empty.
        message: String,
    },
}

impl ApiError {
    pub(crate) fn from_status(status: StatusCode, message: String) -> Self {
        match status.as_u16() {
            401 => ApiError::InvalidToken(message),
            404 => ApiError::NotFound(message),
            429 => ApiError::RateLimited(message),
            status => ApiError::Generic { status, message },
        }
    }

    /// The HTTP status code this error was classified from.
    pub fn status(&self) -> u16 {
        match self {
            ApiError::InvalidToken(_) => 401,
            ApiError::NotFound(_) => 404,
            ApiError::RateLimited(_) => 429,
            ApiError::Generic { status, .. } => *status,
        }
    }

    /// The message extracted from the error payload.
    pub fn message(&self) -> &str {
        match self {
            ApiError::InvalidToken(message)
            | ApiError::NotFound(message)
            | ApiError::RateLimited(message) => message,
            ApiError::Generic { message, .. } => message,
        }
    }
}

/// Transport-level failures.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Connection could not be established.
    #[error("connection failed: {0}")]
    Network(String),

    /// The request timed out.
    #[error("request timed out: {0}")]
    Timeout(String),

    /// Non-2xx response whose body could not be decoded as JSON.
    #[error("HTTP {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Raw response body, lossily decoded.
        body: String,
    },

    /// Any other HTTP-level failure.
    #[error("http error: {0}")]
    Http(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TransportError::Timeout(err.to_string())
        } else if err.is_connect() {
            TransportError::Network(err.to_string())
        } else {
            TransportError::Http(err.to_string())
        }
    }
}

/// Response decoding failures.
#[derive(Debug, Error)]
pub enum ResponseError {
    /// The response body did not deserialize into the expected type.
    #[error("failed to deserialize response: {0}")]
    Deserialization(String),

    /// The response was missing a field the operation depends on.
    #[error("unexpected response shape: {0}")]
    UnexpectedFormat(String),
}

/// Configuration validation failures.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigurationError {
    /// A required access token was not supplied.
    #[error("missing access token")]
    MissingAccessToken,

    /// A configuration value is out of range or malformed.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
}

/// Checks a response's status and classifies failures.
///
/// This is the single boundary every call site goes through after a request
/// completes:
///
/// - 2xx → `Ok(())`.
/// - non-2xx with a body that parses as JSON → [`ApiError`], keyed by status,
///   carrying `error.message` from the payload (empty when absent).
/// - non-2xx with a body that is not JSON → [`TransportError::Status`],
///   preserving the raw status and body for callers not matching on the
///   classified taxonomy.
pub fn classify_response(status: StatusCode, body: &[u8]) -> Result<(), GraphDriveError> {
    if status.is_success() {
        return Ok(());
    }

    match serde_json::from_slice::<serde_json::Value>(body) {
        Ok(payload) => {
            let message = payload
                .pointer("/error/message")
                .and_then(|m| m.as_str())
                .unwrap_or_default()
                .to_string();
            Err(ApiError::from_status(status, message).into())
        }
        Err(_) => Err(TransportError::Status {
            status: status.as_u16(),
            body: String::from_utf8_lossy(body).into_owned(),
        }
        .into()),
    }
}
