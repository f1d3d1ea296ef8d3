//! Outbound request descriptors.

use crate::{Error, Result};
use http::{HeaderMap, HeaderName, HeaderValue, Method};
use serde::Serialize;

/// Header carrying the service API key on privileged requests.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Header carrying the game identifier on privileged requests.
pub const GAME_ID_HEADER: &str = "x-game-id";

/// A single outbound request, built per call and discarded after sending.
///
/// The body is serialized when the descriptor is built, so every retry sends
/// the same bytes and a serialization failure surfaces before any network I/O.
#[derive(Debug, Clone)]
pub struct RequestDescriptor {
    /// The HTTP method.
    pub method: Method,

    /// The endpoint path, including any query string, appended to the base URL.
    pub path: String,

    /// The JSON-encoded body, if any.
    pub body: Option<Vec<u8>>,

    /// Headers for this request, on top of the client defaults.
    pub headers: HeaderMap,
}

impl RequestDescriptor {
    /// Creates a descriptor with no body and no extra headers.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
            headers: HeaderMap::new(),
        }
    }

    /// Serializes `body` as the JSON request body.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SerializationFailed`] if `body` cannot be serialized.
    pub fn with_json<B>(mut self, body: &B) -> Result<Self>
    where
        B: Serialize + ?Sized,
    {
        let bytes =
            serde_json::to_vec(body).map_err(|e| Error::SerializationFailed(e.to_string()))?;
        self.body = Some(bytes);
        Ok(self)
    }

    /// Adds a header to the request.
    ///
    /// # Errors
    ///
    /// Returns an error if the header name or value is invalid.
    pub fn with_header(mut self, name: impl AsRef<str>, value: impl AsRef<str>) -> Result<Self> {
        let name = HeaderName::try_from(name.as_ref())
            .map_err(|e| Error::ConfigurationError(format!("Invalid header name: {}", e)))?;
        let value = HeaderValue::try_from(value.as_ref())
            .map_err(|e| Error::ConfigurationError(format!("Invalid header value: {}", e)))?;
        self.headers.insert(name, value);
        Ok(self)
    }

    /// Adds an `Authorization: Bearer` header.
    pub fn with_bearer(self, token: &str) -> Result<Self> {
        self.with_header(http::header::AUTHORIZATION, format!("Bearer {}", token))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_json_body() {
        let mut body = BTreeMap::new();
        body.insert("user_id", 7);

        let request = RequestDescriptor::new(Method::POST, "/x").with_json(&body).unwrap();
        assert_eq!(request.body.as_deref(), Some(br#"{"user_id":7}"#.as_slice()));
    }

    #[test]
    fn test_unserializable_body() {
        // JSON object keys must be strings.
        let mut body = BTreeMap::new();
        body.insert(vec![1u8], 1);

        let err = RequestDescriptor::new(Method::POST, "/x").with_json(&body).unwrap_err();
        assert!(matches!(err, Error::SerializationFailed(_)));
    }

    #[test]
    fn test_invalid_header_value() {
        let err = RequestDescriptor::new(Method::GET, "/x")
            .with_header(API_KEY_HEADER, "bad\nvalue")
            .unwrap_err();
        assert!(matches!(err, Error::ConfigurationError(_)));
    }

    #[test]
    fn test_bearer() {
        let request = RequestDescriptor::new(Method::GET, "/x").with_bearer("tok").unwrap();
        assert_eq!(request.headers["authorization"], "Bearer tok");
    }
}
