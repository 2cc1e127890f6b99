//! Error types for client configuration.
//!
//! This module contains error types used for configuration and validation
//! failures raised before any request is made.
//!
//! # Error Handling
//!
//! All configuration constructors return `Result<T, ConfigError>` to enable
//! fail-fast validation. Error messages are designed to be clear and actionable.
//!
//! # Example
//!
//! ```rust
//! use tastypie_client::{ServiceUrl, ConfigError};
//!
//! let result = ServiceUrl::new("not a url");
//! assert!(matches!(result, Err(ConfigError::InvalidServiceUrl { .. })));
//! ```

use thiserror::Error;

/// Errors that can occur during client configuration.
///
/// This enum represents all possible errors that can occur when creating
/// or validating configuration types. Each variant provides a clear,
/// actionable error message.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The service URL is not a usable HTTP(S) URL.
    #[error("Invalid service URL '{url}'. Expected an http(s) URL such as 'http://example.com/api/v1/'.")]
    InvalidServiceUrl {
        /// The invalid URL that was provided.
        url: String,
    },

    /// A credential value is empty.
    #[error("Credential field '{field}' cannot be empty.")]
    EmptyCredential {
        /// The name of the empty credential field.
        field: &'static str,
    },

    /// A required field is missing.
    #[error("Missing required field: '{field}'. This field must be set before building the configuration.")]
    MissingRequiredField {
        /// The name of the missing field.
        field: &'static str,
    },
}
