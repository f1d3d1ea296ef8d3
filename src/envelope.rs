//! The standard GameHub response envelope.
//!
//! Every response body has the shape
//! `{"success": bool, "data": any, "error": string, "message": string}`,
//! with all fields but `success` optional.

use crate::{ApiError, Error, Result};
use http::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;

/// A decoded response envelope.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Envelope {
    /// Whether the call succeeded.
    #[serde(default)]
    pub success: bool,
    /// Payload on success.
    #[serde(default)]
    pub data: Option<serde_json::Value>,
    /// Failure description on error.
    #[serde(default)]
    pub error: Option<String>,
    /// Informational message.
    #[serde(default)]
    pub message: Option<String>,
}

impl Envelope {
    /// Decodes an envelope from a raw response body.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DecodeFailed`] if the body is not an envelope.
    pub fn decode(raw_body: &str, status: StatusCode) -> Result<Self> {
        serde_json::from_str(raw_body).map_err(|e| {
            tracing::error!(
                error = %e,
                status = status.as_u16(),
                raw_response = %raw_body,
                "Failed to decode response envelope"
            );

            Error::DecodeFailed {
                raw_response: raw_body.to_string(),
                serde_error: e.to_string(),
                status,
            }
        })
    }

    /// Turns a failed envelope into its [`ApiError`]; passes successful ones through.
    pub fn check(self, status: StatusCode) -> Result<Self> {
        if self.success {
            return Ok(self);
        }

        let message = self.error.as_deref().unwrap_or_default();
        Err(Error::Api(ApiError::from_status(status.as_u16(), message)))
    }

    /// Deserializes `data` into `T`. A missing `data` field is read as `null`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DataMismatch`] if `data` does not fit `T`.
    pub fn into_data<T>(self, status: StatusCode) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let data = self.data.unwrap_or(serde_json::Value::Null);

        T::deserialize(&data).map_err(|e| {
            tracing::error!(
                error = %e,
                status = status.as_u16(),
                "Failed to unmarshal response data"
            );

            Error::DataMismatch {
                raw_data: data.to_string(),
                serde_error: e.to_string(),
                status,
            }
        })
    }
}
