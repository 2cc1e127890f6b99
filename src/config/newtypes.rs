//! Validated newtype wrappers for configuration values.
//!
//! This module provides type-safe wrappers around string values that validate
//! their contents on construction. Invalid values are rejected with clear error messages.

use crate::error::ConfigError;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A validated service root URL.
///
/// The service URL points at the API root that serves the endpoint discovery
/// document, e.g. `http://example.com/api/v1/`. A trailing slash is appended
/// if missing, since all resource URLs are built by concatenation.
///
/// # Accepted Formats
///
/// - `http://example.com/api/v1/` - used as-is
/// - `http://example.com/api/v1` - normalized with a trailing slash
/// - `https://example.com` - normalized to `https://example.com/`
///
/// URLs with a query string or fragment are rejected.
///
/// # Example
///
/// ```rust
/// use tastypie_client::ServiceUrl;
///
/// let url = ServiceUrl::new("http://localhost:8000/api/v1").unwrap();
/// assert_eq!(url.as_ref(), "http://localhost:8000/api/v1/");
/// assert_eq!(url.base_url(), "http://localhost:8000");
/// assert_eq!(url.base_path(), "/api/v1/");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServiceUrl {
    url: String,
    path_start: usize,
}

impl ServiceUrl {
    /// Creates a new validated service URL.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidServiceUrl`] if the URL does not have an
    /// http(s) scheme, has an empty host, or carries a query string or
    /// fragment.
    pub fn new(url: impl Into<String>) -> Result<Self, ConfigError> {
        let url = url.into();
        let mut url = url.trim().to_string();

        let scheme_end = url
            .find("://")
            .ok_or_else(|| ConfigError::InvalidServiceUrl { url: url.clone() })?;

        let scheme = &url[..scheme_end];
        if !(scheme.eq_ignore_ascii_case("http") || scheme.eq_ignore_ascii_case("https")) {
            return Err(ConfigError::InvalidServiceUrl { url });
        }

        // Query strings and fragments would corrupt concatenated resource URLs
        if url.contains('?') || url.contains('#') {
            return Err(ConfigError::InvalidServiceUrl { url });
        }

        let host_start = scheme_end + 3;
        {
            let remainder = &url[host_start..];
            if remainder.is_empty() || remainder.starts_with('/') {
                return Err(ConfigError::InvalidServiceUrl { url });
            }
        }

        let path_start = match url[host_start..].find('/') {
            Some(i) => host_start + i,
            None => {
                url.push('/');
                url.len() - 1
            }
        };

        if !url.ends_with('/') {
            url.push('/');
        }

        Ok(Self { url, path_start })
    }

    /// Returns the origin part of the URL (`scheme://host[:port]`).
    ///
    /// Server-relative URLs from the API (pagination cursors, `Location`
    /// headers, `resource_uri` values) are resolved against this prefix.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.url[..self.path_start]
    }

    /// Returns the path part of the URL, with its trailing slash.
    ///
    /// Resource URLs in payloads are recognized by this prefix.
    #[must_use]
    pub fn base_path(&self) -> &str {
        &self.url[self.path_start..]
    }
}

impl AsRef<str> for ServiceUrl {
    fn as_ref(&self) -> &str {
        &self.url
    }
}

impl Serialize for ServiceUrl {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.url)
    }
}

impl<'de> Deserialize<'de> for ServiceUrl {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::new(s).map_err(de::Error::custom)
    }
}

/// Authentication scheme applied to every outgoing request.
///
/// Authentication is opaque to the resource layer: the transport injects the
/// corresponding header and nothing else in the crate inspects it.
///
/// # Security
///
/// The `Debug` implementation masks credential material, so configurations
/// can be logged without exposing secrets.
///
/// # Example
///
/// ```rust
/// use tastypie_client::Auth;
///
/// let auth = Auth::ApiKey {
///     username: "worker".to_string(),
///     key: "d65b0b...".to_string(),
/// };
/// assert!(!format!("{auth:?}").contains("d65b0b"));
/// ```
#[derive(Clone, PartialEq, Eq)]
pub enum Auth {
    /// HTTP Basic authentication.
    Basic {
        /// The user name.
        username: String,
        /// The password.
        password: String,
    },
    /// Bearer token authentication (`Authorization: Bearer <token>`).
    Bearer {
        /// The bearer token.
        token: String,
    },
    /// Tastypie API-key authentication (`Authorization: ApiKey user:key`).
    ApiKey {
        /// The user name the key belongs to.
        username: String,
        /// The API key.
        key: String,
    },
}

impl Auth {
    /// Validates that no credential field is empty.
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        let empty = |field| Err(ConfigError::EmptyCredential { field });
        match self {
            Self::Basic { username, password } => {
                if username.is_empty() {
                    return empty("username");
                }
                if password.is_empty() {
                    return empty("password");
                }
            }
            Self::Bearer { token } => {
                if token.is_empty() {
                    return empty("token");
                }
            }
            Self::ApiKey { username, key } => {
                if username.is_empty() {
                    return empty("username");
                }
                if key.is_empty() {
                    return empty("key");
                }
            }
        }
        Ok(())
    }
}

impl fmt::Debug for Auth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Basic { username, .. } => {
                write!(f, "Auth::Basic {{ username: {username:?}, password: ***** }}")
            }
            Self::Bearer { .. } => f.write_str("Auth::Bearer(*****)"),
            Self::ApiKey { username, .. } => {
                write!(f, "Auth::ApiKey {{ username: {username:?}, key: ***** }}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_url_appends_trailing_slash() {
        let url = ServiceUrl::new("http://example.com/api/v1").unwrap();
        assert_eq!(url.as_ref(), "http://example.com/api/v1/");
    }

    #[test]
    fn test_service_url_keeps_existing_trailing_slash() {
        let url = ServiceUrl::new("http://example.com/api/v1/").unwrap();
        assert_eq!(url.as_ref(), "http://example.com/api/v1/");
    }

    #[test]
    fn test_service_url_splits_base_url_and_path() {
        let url = ServiceUrl::new("http://127.0.0.1:8000/api/v1/").unwrap();
        assert_eq!(url.base_url(), "http://127.0.0.1:8000");
        assert_eq!(url.base_path(), "/api/v1/");
    }

    #[test]
    fn test_service_url_without_path_gets_root_path() {
        let url = ServiceUrl::new("https://example.com").unwrap();
        assert_eq!(url.as_ref(), "https://example.com/");
        assert_eq!(url.base_url(), "https://example.com");
        assert_eq!(url.base_path(), "/");
    }

    #[test]
    fn test_service_url_trims_whitespace() {
        let url = ServiceUrl::new("  http://example.com/api/v1/  ").unwrap();
        assert_eq!(url.as_ref(), "http://example.com/api/v1/");
    }

    #[test]
    fn test_service_url_rejects_invalid() {
        // No scheme
        assert!(ServiceUrl::new("example.com/api/v1/").is_err());

        // Unsupported scheme
        assert!(ServiceUrl::new("ftp://example.com/api/v1/").is_err());

        // Empty host
        assert!(ServiceUrl::new("http:///api/v1/").is_err());
        assert!(ServiceUrl::new("http://").is_err());

        // Query or fragment
        assert!(ServiceUrl::new("http://example.com/api/v1/?format=json").is_err());
        assert!(ServiceUrl::new("http://example.com/api/v1/#anchor").is_err());
    }

    #[test]
    fn test_service_url_serializes_to_string() {
        let url = ServiceUrl::new("http://example.com/api/v1").unwrap();
        let json = serde_json::to_string(&url).unwrap();
        assert_eq!(json, r#""http://example.com/api/v1/""#);
    }

    #[test]
    fn test_service_url_deserializes_with_validation() {
        let url: ServiceUrl = serde_json::from_str(r#""http://example.com/api/v1""#).unwrap();
        assert_eq!(url.as_ref(), "http://example.com/api/v1/");

        let bad: Result<ServiceUrl, _> = serde_json::from_str(r#""not a url""#);
        assert!(bad.is_err());
    }

    #[test]
    fn test_auth_debug_masks_basic_password() {
        let auth = Auth::Basic {
            username: "alice".to_string(),
            password: "hunter2".to_string(),
        };
        let debug = format!("{auth:?}");
        assert!(debug.contains("alice"));
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("*****"));
    }

    #[test]
    fn test_auth_debug_masks_bearer_token() {
        let auth = Auth::Bearer {
            token: "secret-token".to_string(),
        };
        let debug = format!("{auth:?}");
        assert!(!debug.contains("secret-token"));
    }

    #[test]
    fn test_auth_debug_masks_api_key() {
        let auth = Auth::ApiKey {
            username: "worker".to_string(),
            key: "the-key".to_string(),
        };
        let debug = format!("{auth:?}");
        assert!(debug.contains("worker"));
        assert!(!debug.contains("the-key"));
    }

    #[test]
    fn test_auth_validation_rejects_empty_fields() {
        let auth = Auth::Basic {
            username: String::new(),
            password: "pw".to_string(),
        };
        assert!(matches!(
            auth.validate(),
            Err(ConfigError::EmptyCredential { field: "username" })
        ));

        let auth = Auth::Bearer {
            token: String::new(),
        };
        assert!(matches!(
            auth.validate(),
            Err(ConfigError::EmptyCredential { field: "token" })
        ));
    }
}
