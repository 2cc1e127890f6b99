//! HTTP response types for the Tastypie client.
//!
//! This module provides the [`HttpResponse`] type for accessing response
//! data returned by a Tastypie service.

use std::collections::HashMap;

/// An HTTP response from a Tastypie service.
///
/// The body is kept as raw text. Tastypie replies to `PATCH` and `DELETE`
/// with empty bodies, and error responses are not always JSON, so decoding
/// is deferred to [`HttpResponse::json`].
#[derive(Clone, Debug)]
pub struct HttpResponse {
    /// The HTTP status code.
    pub code: u16,
    /// Response headers, keyed by lowercased name (headers may have
    /// multiple values).
    pub headers: HashMap<String, Vec<String>>,
    /// The raw response body.
    pub body: String,
}

impl HttpResponse {
    /// Creates a new `HttpResponse`.
    ///
    /// Header names are expected to be lowercased already; the transport
    /// layer normalizes them when it assembles the response.
    #[must_use]
    pub const fn new(code: u16, headers: HashMap<String, Vec<String>>, body: String) -> Self {
        Self {
            code,
            headers,
            body,
        }
    }

    /// Returns `true` if the response status code is in the 2xx range.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.code >= 200 && self.code <= 299
    }

    /// Returns the first value of the named header, if present.
    ///
    /// Lookup is by lowercased header name.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(name)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// Returns the `Location` header value, if present.
    ///
    /// Tastypie points at a freshly created resource through this header
    /// in its `201 Created` responses.
    #[must_use]
    pub fn location(&self) -> Option<&str> {
        self.header("location")
    }

    /// Returns the number of seconds to wait before retrying, parsed from
    /// the `Retry-After` header.
    #[must_use]
    pub fn retry_after(&self) -> Option<f64> {
        self.header("retry-after")
            .and_then(|value| value.parse::<f64>().ok())
    }

    /// Decodes the response body as JSON into the given type.
    ///
    /// # Errors
    ///
    /// Returns a [`serde_json::Error`] if the body is not valid JSON or
    /// does not match the target type.
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_str(&self.body)
    }
}
