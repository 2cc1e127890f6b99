//! The API client: service discovery and endpoint access.
//!
//! This module provides [`ApiClient`], the entry point of the crate. The
//! client downloads the service's endpoint directory once at construction
//! and hands out [`Endpoint`] handles backed by a shared connection.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Deserialize;

use crate::clients::{
    BadHttpStatus, HttpClient, HttpError, HttpMethod, HttpRequest, HttpResponse,
};
use crate::config::ClientConfig;
use crate::rest::endpoint::Endpoint;
use crate::rest::errors::ApiError;
use crate::rest::filters::Filters;
use crate::rest::url::UrlParser;

/// One entry of the service's endpoint directory.
///
/// Tastypie's top-level document maps each resource name to its list URL
/// and schema URL:
///
/// ```json
/// {"note": {"list_endpoint": "/api/v1/note/", "schema": "/api/v1/note/schema/"}}
/// ```
#[derive(Clone, Debug, Deserialize)]
pub(crate) struct EndpointEntry {
    /// Path of the resource's list view.
    pub(crate) list_endpoint: String,
    /// Path of the resource's schema view.
    pub(crate) schema: String,
}

#[derive(Debug)]
struct ClientInner {
    http: HttpClient,
    parser: UrlParser,
    registry: BTreeMap<String, EndpointEntry>,
    strip_trailing_slash: bool,
}

/// A client for one Tastypie service.
///
/// Construction performs service discovery: the client fetches the service
/// root and records which endpoints exist, so an unknown endpoint name
/// fails fast without touching the network. The client is a cheap handle
/// over shared state and can be cloned freely across tasks.
///
/// # Example
///
/// ```rust,ignore
/// use tastypie_client::{ApiClient, ClientConfig, ServiceUrl};
///
/// let config = ClientConfig::builder()
///     .service_url(ServiceUrl::new("http://localhost:8000/api/v1/")?)
///     .build()?;
///
/// let client = ApiClient::connect(config).await?;
///
/// let note = client.endpoint("note")?.get("1").await?;
/// println!("Fetched {note}");
/// ```
#[derive(Clone, Debug)]
pub struct ApiClient {
    inner: Arc<ClientInner>,
}

// Verify ApiClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ApiClient>();
};

impl ApiClient {
    /// Connects to the service and discovers its endpoints.
    ///
    /// Issues a GET against the configured service root and decodes the
    /// endpoint directory from the response.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::BadStatus`] if the service root does not answer
    /// with `200 OK`, or [`ApiError::Http`] if the request fails or the
    /// directory cannot be decoded.
    pub async fn connect(config: ClientConfig) -> Result<Self, ApiError> {
        let http = HttpClient::new(&config);
        let parser = UrlParser::new(config.service_url());

        let request = HttpRequest::builder(HttpMethod::Get, parser.service_url())
            .build()
            .map_err(HttpError::from)?;
        let response = http.request(request).await?;
        let response = Self::expect_status(response, 200)?;

        let registry: BTreeMap<String, EndpointEntry> =
            response.json().map_err(HttpError::from)?;

        tracing::debug!(
            "Discovered {} endpoints at {}",
            registry.len(),
            parser.service_url()
        );

        Ok(Self {
            inner: Arc::new(ClientInner {
                http,
                parser,
                registry,
                strip_trailing_slash: config.strip_trailing_slash(),
            }),
        })
    }

    /// Returns a handle for the named endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::UnknownEndpoint`] if the service did not
    /// advertise an endpoint with this name during discovery.
    pub fn endpoint(&self, name: &str) -> Result<Endpoint, ApiError> {
        let entry = self
            .inner
            .registry
            .get(name)
            .ok_or_else(|| ApiError::UnknownEndpoint {
                name: name.to_string(),
            })?;

        Ok(Endpoint::new(self.clone(), name.to_string(), entry.clone()))
    }

    /// Returns the names of all discovered endpoints, in sorted order.
    pub fn endpoint_names(&self) -> impl Iterator<Item = &str> {
        self.inner.registry.keys().map(String::as_str)
    }

    /// Returns the service root URL this client talks to.
    #[must_use]
    pub fn service_url(&self) -> &str {
        self.inner.parser.service_url()
    }

    /// Fetches a path under the service root and returns the decoded JSON
    /// document.
    ///
    /// The path is taken relative to the service root, so `note/1/`
    /// fetches `{service_url}note/1/`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::BadStatus`] unless the service answers with
    /// `200 OK`, or [`ApiError::Http`] on transport or decode failure.
    pub async fn get(&self, path: &str) -> Result<serde_json::Value, ApiError> {
        let url = format!(
            "{}{}",
            self.inner.parser.service_url(),
            path.trim_start_matches('/')
        );
        self.fetch_json(&url).await
    }

    /// Fetches an absolute URL and returns the decoded JSON document.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::BadStatus`] unless the service answers with
    /// `200 OK`, or [`ApiError::Http`] on transport or decode failure.
    pub async fn get_absolute(&self, url: &str) -> Result<serde_json::Value, ApiError> {
        self.fetch_json(url).await
    }

    /// Returns the URL parser for this service.
    pub(crate) fn parser(&self) -> &UrlParser {
        &self.inner.parser
    }

    /// Builds a URL from the service root, an optional resource type, an
    /// optional id segment, and optional query filters.
    pub(crate) fn build_url(
        &self,
        resource: Option<&str>,
        id: Option<&str>,
        filters: Option<&Filters>,
    ) -> String {
        let mut url = self.inner.parser.service_url().to_string();

        if let Some(resource) = resource {
            url.push_str(resource);
            url.push('/');
            if let Some(id) = id {
                url.push_str(id);
                url.push('/');
            }
        }

        if self.inner.strip_trailing_slash && url.ends_with('/') {
            url.pop();
        }

        if let Some(filters) = filters {
            if !filters.is_empty() {
                url.push('?');
                url.push_str(&filters.to_query_string());
            }
        }

        url
    }

    /// Makes a path-only URL absolute against the service's host.
    ///
    /// Tastypie returns paths like `/api/v1/note/?offset=20` in pagination
    /// cursors and resource URIs; already-absolute URLs pass through.
    pub(crate) fn resolve_url(&self, url: &str) -> String {
        if url.contains("://") {
            url.to_string()
        } else {
            format!("{}{}", self.inner.parser.base_url(), url)
        }
    }

    /// Sends a request and returns the response without interpreting its
    /// status.
    pub(crate) async fn execute(
        &self,
        method: HttpMethod,
        url: &str,
        body: Option<serde_json::Value>,
    ) -> Result<HttpResponse, ApiError> {
        let mut builder = HttpRequest::builder(method, url);
        if let Some(body) = body {
            builder = builder.body(body);
        }
        let request = builder.build().map_err(HttpError::from)?;

        Ok(self.inner.http.request(request).await?)
    }

    /// Sends a request and requires the exact status code Tastypie
    /// documents for the operation.
    pub(crate) async fn execute_expect(
        &self,
        method: HttpMethod,
        url: &str,
        body: Option<serde_json::Value>,
        expected: u16,
    ) -> Result<HttpResponse, ApiError> {
        let response = self.execute(method, url, body).await?;
        Self::expect_status(response, expected)
    }

    /// Fetches a URL with GET, requires `200 OK`, and decodes the body.
    pub(crate) async fn fetch_json<T>(&self, url: &str) -> Result<T, ApiError>
    where
        T: serde::de::DeserializeOwned,
    {
        let response = self.execute_expect(HttpMethod::Get, url, None, 200).await?;
        response
            .json()
            .map_err(|e| ApiError::Http(HttpError::Decode(e)))
    }

    /// Checks a response against the exact status an operation requires.
    pub(crate) fn expect_status(
        response: HttpResponse,
        expected: u16,
    ) -> Result<HttpResponse, ApiError> {
        if response.code == expected {
            Ok(response)
        } else {
            Err(ApiError::BadStatus(BadHttpStatus::from_response(response)))
        }
    }

    /// Builds a client with a fixed endpoint directory, skipping discovery.
    #[cfg(test)]
    pub(crate) fn stubbed(config: &ClientConfig, endpoint_names: &[&str]) -> Self {
        let base_path = config.service_url().base_path();
        let registry = endpoint_names
            .iter()
            .map(|name| {
                (
                    (*name).to_string(),
                    EndpointEntry {
                        list_endpoint: format!("{base_path}{name}/"),
                        schema: format!("{base_path}{name}/schema/"),
                    },
                )
            })
            .collect();

        Self {
            inner: Arc::new(ClientInner {
                http: HttpClient::new(config),
                parser: UrlParser::new(config.service_url()),
                registry,
                strip_trailing_slash: config.strip_trailing_slash(),
            }),
        }
    }
}
