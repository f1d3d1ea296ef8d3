//! Error types for GameHub API calls.
//!
//! [`Error`] covers every way a call can fail: building the request, reaching the
//! server, decoding what came back, and the server reporting a business failure.
//! Business failures carry an [`ApiError`], which is either one of a small set of
//! well-known errors or a generic error holding the server's own code and message.

use http::StatusCode;
use std::fmt;

/// An application-level error reported by the GameHub service.
///
/// Produced when the response envelope has `success: false`. The well-known
/// variants are fixed values; [`ApiError::Other`] carries whatever the server sent.
///
/// # Examples
///
/// ```
/// use gamehub_client::ApiError;
///
/// let err = ApiError::from_status(400, "insufficient coins");
/// assert_eq!(err, ApiError::InsufficientCoins);
///
/// let err = ApiError::from_status(400, "bad amount");
/// assert_eq!(err.kind(), "bad_request");
/// assert_eq!(err.message(), "bad amount");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// The session token or credentials were rejected.
    Unauthorized,
    /// The user does not hold enough coins for the deduction.
    InsufficientCoins,
    /// The user does not exist.
    UserNotFound,
    /// The service API key was rejected.
    InvalidApiKey,
    /// Too many requests.
    RateLimited,
    /// The service failed internally.
    ServerError,
    /// Any other failure, as reported by the server.
    Other {
        /// HTTP status code.
        code: u16,
        /// Server-provided message.
        message: String,
        /// Short machine-readable tag.
        kind: String,
    },
}

impl ApiError {
    /// Creates a generic error with an arbitrary code, message and kind.
    pub fn new(code: u16, message: impl Into<String>, kind: impl Into<String>) -> Self {
        ApiError::Other {
            code,
            message: message.into(),
            kind: kind.into(),
        }
    }

    /// Maps an HTTP status and the envelope's `error` string to an [`ApiError`].
    pub fn from_status(status: u16, message: &str) -> Self {
        match status {
            401 => ApiError::Unauthorized,
            404 => ApiError::UserNotFound,
            429 => ApiError::RateLimited,
            400 if message == "insufficient coins" => ApiError::InsufficientCoins,
            400 => ApiError::new(status, message, "bad_request"),
            500 => ApiError::ServerError,
            _ => ApiError::new(status, message, "unknown_error"),
        }
    }

    /// The HTTP status code associated with this error.
    pub fn code(&self) -> u16 {
        match self {
            ApiError::Unauthorized | ApiError::InvalidApiKey => 401,
            ApiError::InsufficientCoins => 400,
            ApiError::UserNotFound => 404,
            ApiError::RateLimited => 429,
            ApiError::ServerError => 500,
            ApiError::Other { code, .. } => *code,
        }
    }

    /// A human-readable description.
    pub fn message(&self) -> &str {
        match self {
            ApiError::Unauthorized => "Unauthorized",
            ApiError::InsufficientCoins => "Insufficient coins",
            ApiError::UserNotFound => "User not found",
            ApiError::InvalidApiKey => "Invalid API key",
            ApiError::RateLimited => "Rate limit exceeded",
            ApiError::ServerError => "Internal server error",
            ApiError::Other { message, .. } => message,
        }
    }

    /// The machine-readable tag.
    pub fn kind(&self) -> &str {
        match self {
            ApiError::Unauthorized => "auth_error",
            ApiError::InsufficientCoins => "insufficient_funds",
            ApiError::UserNotFound => "user_not_found",
            ApiError::InvalidApiKey => "invalid_api_key",
            ApiError::RateLimited => "rate_limited",
            ApiError::ServerError => "server_error",
            ApiError::Other { kind, .. } => kind,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GameHub API Error [{}]: {}", self.code(), self.message())
    }
}

impl std::error::Error for ApiError {}

/// The main error type for GameHub API calls.
///
/// # Examples
///
/// ```no_run
/// use gamehub_client::{ApiError, Client, Error};
/// use tokio_util::sync::CancellationToken;
///
/// # async fn example() -> Result<(), Error> {
/// let client = Client::with_credentials("https://hub.example.com", "snake", "secret")?;
/// let cancel = CancellationToken::new();
///
/// match client.deduct_coins(&cancel, 42, 100, "entry fee", "match-1").await {
///     Ok(()) => println!("Deducted"),
///     Err(Error::Api(ApiError::InsufficientCoins)) => println!("Not enough coins"),
///     Err(e) if e.is_transient() => eprintln!("Try again later: {}", e),
///     Err(e) => return Err(e),
/// }
/// # Ok(())
/// # }
/// ```
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Failed to serialize the request body.
    #[error("Failed to serialize request: {0}")]
    SerializationFailed(String),

    /// The base URL joined with the endpoint path is not a valid URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Invalid configuration, such as a missing base URL or an unencodable header.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// The server could not be reached, or the response body could not be read.
    ///
    /// When returned after retrying, `source` is the error from the last attempt.
    #[error("Network error after {attempts} attempts: {source}")]
    Network {
        /// The number of attempts made
        attempts: usize,
        /// The underlying transport error
        #[source]
        source: reqwest::Error,
    },

    /// The call did not finish within the configured timeout.
    #[error("Request timed out")]
    Timeout,

    /// The caller cancelled the call.
    #[error("Request cancelled")]
    Cancelled,

    /// The response body was not a valid response envelope.
    #[error("Failed to decode response (status {status}): {serde_error}")]
    DecodeFailed {
        /// The raw response body
        raw_response: String,
        /// The serde error message
        serde_error: String,
        /// The HTTP status code
        status: StatusCode,
    },

    /// The envelope's `data` did not match the expected type.
    #[error("Failed to unmarshal response data (status {status}): {serde_error}")]
    DataMismatch {
        /// The `data` field, re-serialized
        raw_data: String,
        /// The serde error message
        serde_error: String,
        /// The HTTP status code
        status: StatusCode,
    },

    /// The service reported a failure.
    #[error(transparent)]
    Api(#[from] ApiError),
}

impl Error {
    /// Returns `true` if the failure is presumed transient.
    ///
    /// Network errors, timeouts and server-side API errors (5xx) are transient.
    /// Cancellation, build, decode and 4xx API errors are not.
    ///
    /// # Examples
    ///
    /// ```
    /// use gamehub_client::{ApiError, Error};
    ///
    /// assert!(Error::Api(ApiError::ServerError).is_transient());
    /// assert!(!Error::Api(ApiError::RateLimited).is_transient());
    /// assert!(!Error::Cancelled.is_transient());
    /// ```
    pub fn is_transient(&self) -> bool {
        match self {
            Error::Network { .. } => true,
            Error::Timeout => true,
            Error::Api(api) => api.code() >= 500,
            Error::Cancelled => false,
            Error::DecodeFailed { .. } => false,
            Error::DataMismatch { .. } => false,
            Error::ConfigurationError(_) => false,
            Error::SerializationFailed(_) => false,
            Error::InvalidUrl(_) => false,
        }
    }

    /// Returns the HTTP status code if this error has one.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Error::DecodeFailed { status, .. } => Some(*status),
            Error::DataMismatch { status, .. } => Some(*status),
            Error::Api(api) => StatusCode::from_u16(api.code()).ok(),
            _ => None,
        }
    }

    /// Returns the API error if the service reported one.
    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            Error::Api(api) => Some(api),
            _ => None,
        }
    }

    /// Returns the raw body (or `data` field) that failed to decode.
    pub fn raw_response(&self) -> Option<&str> {
        match self {
            Error::DecodeFailed { raw_response, .. } => Some(raw_response),
            Error::DataMismatch { raw_data, .. } => Some(raw_data),
            _ => None,
        }
    }

    /// Returns `true` if the caller cancelled the call.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Error::Cancelled)
    }
}

/// A specialized `Result` type for GameHub API calls.
pub type Result<T> = std::result::Result<T, Error>;
