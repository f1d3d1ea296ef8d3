//! Decoded response data together with details of the exchange that produced it.

use http::StatusCode;
use std::time::Duration;

/// The `data` of a successful envelope, plus call details.
///
/// Endpoint methods on [`Client`](crate::Client) return the data alone; use
/// [`Client::call`](crate::Client::call) to get the whole `Response`.
///
/// # Examples
///
/// ```
/// # use gamehub_client::Response;
/// # use http::StatusCode;
/// # use std::time::Duration;
/// let response = Response::new(42, StatusCode::OK, Duration::from_millis(100), 3);
///
/// assert!(response.was_retried());
/// assert_eq!(*response, 42);
/// ```
#[derive(Debug, Clone)]
pub struct Response<T> {
    /// The deserialized `data` field.
    pub data: T,

    /// The HTTP status code of the final attempt.
    pub status: StatusCode,

    /// Time from the first attempt until the envelope was decoded, backoff included.
    pub latency: Duration,

    /// The number of attempts made.
    pub attempts: usize,
}

impl<T> Response<T> {
    /// Creates a new `Response`.
    pub fn new(data: T, status: StatusCode, latency: Duration, attempts: usize) -> Self {
        Self {
            data,
            status,
            latency,
            attempts,
        }
    }

    /// Maps the data, keeping the call details.
    ///
    /// ```
    /// # use gamehub_client::Response;
    /// # use http::StatusCode;
    /// # use std::time::Duration;
    /// let response = Response::new(Some(7), StatusCode::OK, Duration::ZERO, 1);
    /// let response = response.map(Option::unwrap_or_default);
    /// assert_eq!(response.data, 7);
    /// ```
    pub fn map<U, F>(self, f: F) -> Response<U>
    where
        F: FnOnce(T) -> U,
    {
        Response {
            data: f(self.data),
            status: self.status,
            latency: self.latency,
            attempts: self.attempts,
        }
    }

    /// Returns `true` if more than one attempt was needed.
    pub fn was_retried(&self) -> bool {
        self.attempts > 1
    }

    /// Discards the call details.
    pub fn into_data(self) -> T {
        self.data
    }
}

impl<T> AsRef<T> for Response<T> {
    fn as_ref(&self) -> &T {
        &self.data
    }
}

impl<T> std::ops::Deref for Response<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.data
    }
}
