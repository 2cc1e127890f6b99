//! Error types for API operations.
//!
//! This module contains the [`ApiError`] enum covering everything that can
//! go wrong while talking to a Tastypie service, from lookup misses to
//! wire-level failures.
//!
//! # Error Handling
//!
//! The client maps failure conditions to semantic variants:
//!
//! - [`ApiError::MissingIdentifier`]: A lookup was attempted with nothing to
//!   look up
//! - [`ApiError::AmbiguousResult`]: A single-resource search matched the
//!   wrong number of resources
//! - [`ApiError::ResourceGone`]: A mutation was attempted on a deleted
//!   resource
//! - [`ApiError::UnknownEndpoint`]: The service does not expose the named
//!   endpoint
//! - [`ApiError::BadStatus`]: The service replied with a status other than
//!   the one the operation requires
//! - [`ApiError::Http`]: Transport-level failure
//!
//! # Example
//!
//! ```rust,ignore
//! use tastypie_client::ApiError;
//!
//! match endpoint.find(filters).await {
//!     Ok(resource) => println!("Found {resource}"),
//!     Err(ApiError::AmbiguousResult { matched }) => {
//!         println!("Search matched {matched} resources, expected exactly one");
//!     }
//!     Err(ApiError::BadStatus(e)) => {
//!         println!("Service replied {}: {}", e.status, e.message);
//!     }
//!     Err(e) => println!("Error: {e}"),
//! }
//! ```

use thiserror::Error;

use crate::clients::{BadHttpStatus, HttpError};

/// Error type for API operations.
///
/// # Example
///
/// ```rust
/// use tastypie_client::ApiError;
///
/// let error = ApiError::UnknownEndpoint {
///     name: "note".to_string(),
/// };
/// assert!(error.to_string().contains("note"));
/// ```
#[derive(Debug, Error)]
pub enum ApiError {
    /// A single-resource lookup was attempted without an id or filters.
    #[error("Either a resource id or at least one filter is required")]
    MissingIdentifier,

    /// A single-resource search matched the wrong number of resources.
    ///
    /// Raised by [`Endpoint::find`](crate::Endpoint::find) when the filter
    /// set matches zero or several resources instead of exactly one.
    #[error("Expected exactly one matching resource, found {matched}")]
    AmbiguousResult {
        /// How many resources the search matched.
        matched: u64,
    },

    /// A mutation was attempted on a resource that has been deleted.
    ///
    /// Deletion is one-way; once a [`Resource`](crate::Resource) has been
    /// deleted through the client, further updates or deletes are refused
    /// locally.
    #[error("{resource_type}/{id} has been deleted and can no longer be modified")]
    ResourceGone {
        /// The resource type of the deleted resource.
        resource_type: String,
        /// The id of the deleted resource.
        id: String,
    },

    /// The service does not expose an endpoint with the given name.
    #[error("No endpoint named \"{name}\" is exposed by the service")]
    UnknownEndpoint {
        /// The endpoint name that was requested.
        name: String,
    },

    /// An id was requested from a reference list that does not declare it.
    #[error("Id \"{id}\" is not part of this reference list")]
    UnknownId {
        /// The id that was requested.
        id: String,
    },

    /// A field accessor was called with a name the resource does not have.
    #[error("Resource has no field named \"{field}\"")]
    FieldNotFound {
        /// The field name that was requested.
        field: String,
    },

    /// A string could not be parsed as a resource URL.
    ///
    /// Resource URLs must carry a type segment and an id segment under the
    /// service's base path, e.g. `/api/v1/note/1/`.
    #[error("Cannot extract a resource type and id from URL \"{url}\"")]
    MalformedResourceUrl {
        /// The string that failed to parse.
        url: String,
    },

    /// A response document did not have the shape the client requires.
    #[error("Invalid resource document: {reason}")]
    InvalidPayload {
        /// What was wrong with the document.
        reason: String,
    },

    /// The service replied with a status other than the one the operation
    /// requires.
    #[error(transparent)]
    BadStatus(#[from] BadHttpStatus),

    /// A transport-level error occurred.
    #[error(transparent)]
    Http(#[from] HttpError),
}

// Verify ApiError is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ApiError>();
};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::HttpResponse;
    use std::collections::HashMap;

    #[test]
    fn test_missing_identifier_message() {
        let error = ApiError::MissingIdentifier;
        assert_eq!(
            error.to_string(),
            "Either a resource id or at least one filter is required"
        );
    }

    #[test]
    fn test_ambiguous_result_includes_match_count() {
        let error = ApiError::AmbiguousResult { matched: 3 };
        assert_eq!(
            error.to_string(),
            "Expected exactly one matching resource, found 3"
        );

        let error = ApiError::AmbiguousResult { matched: 0 };
        assert!(error.to_string().contains("found 0"));
    }

    #[test]
    fn test_resource_gone_names_the_resource() {
        let error = ApiError::ResourceGone {
            resource_type: "note".to_string(),
            id: "7".to_string(),
        };
        let message = error.to_string();

        assert!(message.contains("note/7"));
        assert!(message.contains("deleted"));
    }

    #[test]
    fn test_unknown_endpoint_names_the_endpoint() {
        let error = ApiError::UnknownEndpoint {
            name: "missing".to_string(),
        };
        assert!(error.to_string().contains("\"missing\""));
    }

    #[test]
    fn test_malformed_resource_url_includes_url() {
        let error = ApiError::MalformedResourceUrl {
            url: "/somewhere/else/".to_string(),
        };
        assert!(error.to_string().contains("/somewhere/else/"));
    }

    #[test]
    fn test_bad_status_is_transparent() {
        let response = HttpResponse::new(
            404,
            HashMap::new(),
            r#"{"error_message": "gone"}"#.to_string(),
        );
        let error = ApiError::from(BadHttpStatus::from_response(response));

        assert!(matches!(error, ApiError::BadStatus(_)));
        assert_eq!(error.to_string(), "HTTP 404: gone");
    }

    #[test]
    fn test_all_error_variants_implement_std_error() {
        let missing: &dyn std::error::Error = &ApiError::MissingIdentifier;
        let _ = missing;

        let gone: &dyn std::error::Error = &ApiError::ResourceGone {
            resource_type: "note".to_string(),
            id: "1".to_string(),
        };
        let _ = gone;

        let field: &dyn std::error::Error = &ApiError::FieldNotFound {
            field: "title".to_string(),
        };
        let _ = field;
    }
}
