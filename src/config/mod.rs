//! Configuration types for the API client.
//!
//! This module provides the core configuration types used to initialize
//! a client for a Tastypie-style service.
//!
//! # Overview
//!
//! The main types in this module are:
//!
//! - [`ClientConfig`]: The main configuration struct holding all client settings
//! - [`ClientConfigBuilder`]: A builder for constructing [`ClientConfig`] instances
//! - [`ServiceUrl`]: A validated service root URL
//! - [`Auth`]: The authentication scheme applied at the transport boundary
//!
//! # Example
//!
//! ```rust
//! use tastypie_client::{ClientConfig, ServiceUrl, Auth};
//!
//! let config = ClientConfig::builder()
//!     .service_url(ServiceUrl::new("http://localhost:8000/api/v1/").unwrap())
//!     .auth(Auth::ApiKey {
//!         username: "worker".to_string(),
//!         key: "d65b0b...".to_string(),
//!     })
//!     .build()
//!     .unwrap();
//! ```

mod newtypes;

pub use newtypes::{Auth, ServiceUrl};

use std::time::Duration;

use crate::error::ConfigError;

/// Default request timeout applied when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration for the API client.
///
/// This struct holds everything needed to construct a client: the service
/// root URL, optional authentication, and transport tuning knobs.
///
/// # Thread Safety
///
/// `ClientConfig` is `Clone`, `Send`, and `Sync`, making it safe to share
/// across threads and async tasks.
///
/// # Example
///
/// ```rust
/// use tastypie_client::{ClientConfig, ServiceUrl};
///
/// let config = ClientConfig::builder()
///     .service_url(ServiceUrl::new("http://localhost:8000/api/v1/").unwrap())
///     .user_agent_prefix("MyApp/1.0")
///     .build()
///     .unwrap();
///
/// assert_eq!(config.service_url().as_ref(), "http://localhost:8000/api/v1/");
/// ```
#[derive(Clone, Debug)]
pub struct ClientConfig {
    service_url: ServiceUrl,
    auth: Option<Auth>,
    user_agent_prefix: Option<String>,
    timeout: Duration,
    strip_trailing_slash: bool,
}

impl ClientConfig {
    /// Creates a new builder for constructing a `ClientConfig`.
    #[must_use]
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::new()
    }

    /// Returns the service root URL.
    #[must_use]
    pub const fn service_url(&self) -> &ServiceUrl {
        &self.service_url
    }

    /// Returns the authentication scheme, if configured.
    #[must_use]
    pub const fn auth(&self) -> Option<&Auth> {
        self.auth.as_ref()
    }

    /// Returns the user agent prefix, if configured.
    #[must_use]
    pub fn user_agent_prefix(&self) -> Option<&str> {
        self.user_agent_prefix.as_deref()
    }

    /// Returns the request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Returns whether built URLs drop their trailing slash.
    #[must_use]
    pub const fn strip_trailing_slash(&self) -> bool {
        self.strip_trailing_slash
    }
}

// Verify ClientConfig is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ClientConfig>();
};

/// Builder for constructing [`ClientConfig`] instances.
///
/// The only required field is `service_url`. All other fields have
/// sensible defaults.
///
/// # Defaults
///
/// - `auth`: `None` (anonymous requests)
/// - `user_agent_prefix`: `None`
/// - `timeout`: [`DEFAULT_TIMEOUT`] (30 seconds)
/// - `strip_trailing_slash`: `false`
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use tastypie_client::{ClientConfig, ServiceUrl, Auth};
///
/// let config = ClientConfig::builder()
///     .service_url(ServiceUrl::new("https://example.com/api/v1/").unwrap())
///     .auth(Auth::Basic {
///         username: "alice".to_string(),
///         password: "secret".to_string(),
///     })
///     .timeout(Duration::from_secs(10))
///     .strip_trailing_slash(true)
///     .build()
///     .unwrap();
/// ```
#[derive(Debug, Default)]
pub struct ClientConfigBuilder {
    service_url: Option<ServiceUrl>,
    auth: Option<Auth>,
    user_agent_prefix: Option<String>,
    timeout: Option<Duration>,
    strip_trailing_slash: Option<bool>,
}

impl ClientConfigBuilder {
    /// Creates a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the service root URL (required).
    #[must_use]
    pub fn service_url(mut self, url: ServiceUrl) -> Self {
        self.service_url = Some(url);
        self
    }

    /// Sets the authentication scheme.
    #[must_use]
    pub fn auth(mut self, auth: Auth) -> Self {
        self.auth = Some(auth);
        self
    }

    /// Sets the user agent prefix for HTTP requests.
    #[must_use]
    pub fn user_agent_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.user_agent_prefix = Some(prefix.into());
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets whether built URLs drop their trailing slash.
    ///
    /// Some deployments route resource URLs without the canonical trailing
    /// slash; this mirrors that server configuration.
    #[must_use]
    pub const fn strip_trailing_slash(mut self, strip: bool) -> Self {
        self.strip_trailing_slash = Some(strip);
        self
    }

    /// Builds the [`ClientConfig`], validating that required fields are set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingRequiredField`] if `service_url` is not
    /// set, or [`ConfigError::EmptyCredential`] if a configured [`Auth`]
    /// carries an empty credential field.
    pub fn build(self) -> Result<ClientConfig, ConfigError> {
        let service_url = self.service_url.ok_or(ConfigError::MissingRequiredField {
            field: "service_url",
        })?;

        if let Some(auth) = &self.auth {
            auth.validate()?;
        }

        Ok(ClientConfig {
            service_url,
            auth: self.auth,
            user_agent_prefix: self.user_agent_prefix,
            timeout: self.timeout.unwrap_or(DEFAULT_TIMEOUT),
            strip_trailing_slash: self.strip_trailing_slash.unwrap_or(false),
        })
    }
}
