//! HTTP-specific error types for the Tastypie client.
//!
//! This module contains error types for HTTP operations, including status
//! translation, request validation failures, and transport errors.
//!
//! # Error Handling
//!
//! The transport layer uses specific error types for different failure
//! scenarios:
//!
//! - [`BadHttpStatus`]: A response whose status code does not match what the
//!   operation requires
//! - [`InvalidHttpRequestError`]: When a request fails validation before sending
//! - [`HttpError`]: Unified error type for transport-level failures
//!
//! Note that [`HttpClient::request`](crate::HttpClient::request) itself does
//! not fail on non-2xx responses; each API operation checks the returned
//! status against the code Tastypie documents for it and raises
//! [`BadHttpStatus`] on a mismatch.
//!
//! # Example
//!
//! ```rust,ignore
//! use tastypie_client::{ApiError, HttpError};
//!
//! match endpoint.get("1").await {
//!     Ok(resource) => println!("Fetched {resource}"),
//!     Err(ApiError::BadStatus(e)) => {
//!         println!("Service replied {}: {}", e.status, e.message);
//!     }
//!     Err(ApiError::Http(HttpError::Network(e))) => {
//!         println!("Network error: {e}");
//!     }
//!     Err(e) => println!("Error: {e}"),
//! }
//! ```

use thiserror::Error;

use crate::clients::http_response::HttpResponse;

/// Error returned when a response status does not match the one the
/// operation requires.
///
/// Tastypie documents an exact success code for every operation (`200` for
/// reads, `201` for creates, `202` for updates, `204` for deletes). Any
/// other status becomes this error.
///
/// The message is taken from the `error_message` field of the JSON error
/// document when the service provides one, and falls back to the raw
/// response body otherwise. The full response is retained for callers that
/// need headers or the undecoded body.
///
/// # Example
///
/// ```rust
/// use std::collections::HashMap;
/// use tastypie_client::{BadHttpStatus, HttpResponse};
///
/// let response = HttpResponse::new(
///     404,
///     HashMap::new(),
///     r#"{"error_message": "No Note matches the given query."}"#.to_string(),
/// );
/// let error = BadHttpStatus::from_response(response);
///
/// assert_eq!(error.status, 404);
/// assert_eq!(error.to_string(), "HTTP 404: No Note matches the given query.");
/// ```
#[derive(Debug, Error)]
#[error("HTTP {status}: {message}")]
pub struct BadHttpStatus {
    /// The HTTP status code of the response.
    pub status: u16,
    /// The error message extracted from the response.
    pub message: String,
    /// The full response that carried the unexpected status.
    pub response: HttpResponse,
}

impl BadHttpStatus {
    /// Builds the error from a response, extracting the service's error
    /// message.
    ///
    /// Tastypie serializes failures as `{"error_message": "...", ...}` when
    /// debug output is enabled; anything else (HTML error pages, empty
    /// bodies) is carried through as raw text.
    #[must_use]
    pub fn from_response(response: HttpResponse) -> Self {
        let message = serde_json::from_str::<serde_json::Value>(&response.body)
            .ok()
            .and_then(|body| {
                body.get("error_message")
                    .and_then(serde_json::Value::as_str)
                    .map(str::to_string)
            })
            .unwrap_or_else(|| response.body.trim().to_string());

        Self {
            status: response.code,
            message,
            response,
        }
    }
}

/// Error returned when an HTTP request fails validation.
///
/// This error is raised before a request is sent if it fails validation
/// checks, such as a missing body for POST/PATCH requests.
///
/// # Example
///
/// ```rust
/// use tastypie_client::InvalidHttpRequestError;
///
/// let error = InvalidHttpRequestError::MissingBody {
///     method: "post".to_string(),
/// };
///
/// println!("{}", error); // "Cannot use post without specifying data."
/// ```
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvalidHttpRequestError {
    /// A POST or PATCH request was made without a body.
    #[error("Cannot use {method} without specifying data.")]
    MissingBody {
        /// The HTTP method that requires a body.
        method: String,
    },
}

/// Unified error type for transport-level failures.
///
/// This enum provides a single error type for HTTP plumbing, making it
/// easier to handle errors at API boundaries. Use pattern matching to
/// handle specific error types.
#[derive(Debug, Error)]
pub enum HttpError {
    /// Request validation failed.
    #[error(transparent)]
    InvalidRequest(#[from] InvalidHttpRequestError),

    /// Network or connection error.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// A response body could not be decoded as the expected JSON shape.
    #[error("Failed to decode response body: {0}")]
    Decode(#[from] serde_json::Error),
}
