//! HTTP transport types for Tastypie service communication.
//!
//! This module provides the transport layer for making authenticated
//! requests to a Tastypie service. It handles request/response
//! processing, credential injection, and retry logic; interpreting
//! status codes and payloads is the resource layer's job.
//!
//! # Overview
//!
//! The main types in this module are:
//!
//! - [`HttpClient`]: The async HTTP client for service communication
//! - [`HttpRequest`]: A request to be sent to the service
//! - [`HttpResponse`]: A parsed response from the service
//! - [`HttpMethod`]: Supported HTTP methods (GET, POST, PATCH, DELETE)
//! - [`BadHttpStatus`]: A response whose status does not match the one
//!   the operation requires
//!
//! # Example
//!
//! ```rust,ignore
//! use tastypie_client::{ClientConfig, HttpClient, HttpRequest, HttpMethod, ServiceUrl};
//!
//! let config = ClientConfig::builder()
//!     .service_url(ServiceUrl::new("http://localhost:8000/api/v1/")?)
//!     .build()?;
//!
//! let client = HttpClient::new(&config);
//!
//! let request = HttpRequest::builder(HttpMethod::Get, "http://localhost:8000/api/v1/note/1/")
//!     .build()?;
//!
//! let response = client.request(request).await?;
//! ```
//!
//! # Retry Behavior
//!
//! The client implements automatic retry logic for transient failures:
//!
//! - **429 (Rate Limited)**: Retries using `Retry-After` header value, or 1 second if not present
//! - **500 (Server Error)**: Retries with fixed 1-second delay
//! - **Other statuses**: Returned immediately without retry
//!
//! The default `tries` is 1, meaning no automatic retries. Configure via
//! [`HttpRequest::builder`] with `.tries(n)` to enable retries.

mod errors;
mod http_client;
mod http_request;
mod http_response;

pub use errors::{BadHttpStatus, HttpError, InvalidHttpRequestError};
pub use http_client::{HttpClient, SDK_VERSION};
pub use http_request::{HttpMethod, HttpRequest, HttpRequestBuilder};
pub use http_response::HttpResponse;

