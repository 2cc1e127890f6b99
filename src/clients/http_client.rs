//! HTTP client for Tastypie service communication.
//!
//! This module provides the [`HttpClient`] type for making authenticated
//! requests to a Tastypie service with automatic retry handling.

use std::collections::HashMap;

use crate::clients::http_request::{HttpMethod, HttpRequest};
use crate::clients::http_response::HttpResponse;
use crate::clients::HttpError;
use crate::config::{Auth, ClientConfig};

/// Fixed retry wait time in seconds.
pub const RETRY_WAIT_TIME: u64 = 1;

/// Library version from Cargo.toml.
pub const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");

/// HTTP client for making requests to a Tastypie service.
///
/// The client handles:
/// - Default headers including User-Agent and Accept
/// - Credential injection for the configured [`Auth`] scheme
/// - Automatic retry logic for 429 and 500 responses
///
/// Status codes are not interpreted here. Tastypie assigns each operation
/// an exact success code, so the response is handed back as-is and the
/// caller checks the code it requires.
///
/// # Thread Safety
///
/// `HttpClient` is `Send + Sync`, making it safe to share across async tasks.
///
/// # Example
///
/// ```rust,ignore
/// use tastypie_client::{ClientConfig, HttpClient, HttpRequest, HttpMethod, ServiceUrl};
///
/// let config = ClientConfig::builder()
///     .service_url(ServiceUrl::new("http://localhost:8000/api/v1/")?)
///     .build()?;
///
/// let client = HttpClient::new(&config);
///
/// let request = HttpRequest::builder(HttpMethod::Get, "http://localhost:8000/api/v1/note/1/")
///     .build()?;
///
/// let response = client.request(request).await?;
/// ```
#[derive(Debug)]
pub struct HttpClient {
    /// The internal reqwest HTTP client.
    client: reqwest::Client,
    /// Default headers to include in all requests.
    default_headers: HashMap<String, String>,
    /// Credentials applied to every request.
    auth: Option<Auth>,
}

// Verify HttpClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<HttpClient>();
};

impl HttpClient {
    /// Creates a new HTTP client from the given configuration.
    ///
    /// # Panics
    ///
    /// Panics if the underlying reqwest client cannot be created. This should
    /// only happen in extremely unusual circumstances (e.g., TLS initialization failure).
    ///
    /// # Example
    ///
    /// ```rust
    /// use tastypie_client::{ClientConfig, HttpClient, ServiceUrl};
    ///
    /// let config = ClientConfig::builder()
    ///     .service_url(ServiceUrl::new("http://localhost:8000/api/v1/").unwrap())
    ///     .build()
    ///     .unwrap();
    ///
    /// let client = HttpClient::new(&config);
    /// ```
    #[must_use]
    pub fn new(config: &ClientConfig) -> Self {
        // Build User-Agent header
        let user_agent_prefix = config
            .user_agent_prefix()
            .map_or(String::new(), |prefix| format!("{prefix} | "));
        let rust_version = env!("CARGO_PKG_RUST_VERSION");
        let user_agent = format!(
            "{user_agent_prefix}Tastypie Client Library v{SDK_VERSION} | Rust {rust_version}"
        );

        // Build default headers
        let mut default_headers = HashMap::new();
        default_headers.insert("User-Agent".to_string(), user_agent);
        default_headers.insert("Accept".to_string(), "application/json".to_string());

        // Create reqwest client
        let client = reqwest::Client::builder()
            .use_rustls_tls()
            .timeout(config.timeout())
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            default_headers,
            auth: config.auth().cloned(),
        }
    }

    /// Returns the default headers for this client.
    #[must_use]
    pub const fn default_headers(&self) -> &HashMap<String, String> {
        &self.default_headers
    }

    /// Sends an HTTP request to the service.
    ///
    /// This method handles:
    /// - Request validation
    /// - Header merging and credential injection
    /// - Retry logic for 429 and 500 responses
    ///
    /// The returned response may carry any status code; retries stop once
    /// the configured tries are spent and the last response is handed back.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] if:
    /// - Request validation fails (`InvalidRequest`)
    /// - Network error occurs (`Network`)
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let request = HttpRequest::builder(HttpMethod::Get, url)
    ///     .tries(3) // Enable retries
    ///     .build()?;
    ///
    /// let response = client.request(request).await?;
    /// if response.is_ok() {
    ///     println!("Body: {}", response.body);
    /// }
    /// ```
    pub async fn request(&self, request: HttpRequest) -> Result<HttpResponse, HttpError> {
        // Validate request first
        request.verify()?;

        // Merge headers
        let mut headers = self.default_headers.clone();
        if request.body.is_some() {
            headers.insert("Content-Type".to_string(), "application/json".to_string());
        }
        if let Some(extra) = &request.extra_headers {
            for (key, value) in extra {
                headers.insert(key.clone(), value.clone());
            }
        }

        // Retry loop
        let mut tries: u32 = 0;
        loop {
            tries += 1;

            // Build the reqwest request
            let mut req_builder = match request.http_method {
                HttpMethod::Get => self.client.get(&request.url),
                HttpMethod::Post => self.client.post(&request.url),
                HttpMethod::Patch => self.client.patch(&request.url),
                HttpMethod::Delete => self.client.delete(&request.url),
            };

            // Add headers
            for (key, value) in &headers {
                req_builder = req_builder.header(key, value);
            }

            // Inject credentials
            req_builder = match &self.auth {
                Some(Auth::Basic { username, password }) => {
                    req_builder.basic_auth(username, Some(password))
                }
                Some(Auth::Bearer { token }) => req_builder.bearer_auth(token),
                Some(Auth::ApiKey { username, key }) => {
                    req_builder.header("Authorization", format!("ApiKey {username}:{key}"))
                }
                None => req_builder,
            };

            // Add body
            if let Some(body) = &request.body {
                req_builder = req_builder.body(body.to_string());
            }

            // Send request
            tracing::debug!(
                "Sending {} request to {}",
                request.http_method,
                request.url
            );
            let res = req_builder.send().await?;

            // Parse response
            let code = res.status().as_u16();
            let res_headers = Self::parse_response_headers(res.headers());
            let body = res.text().await.unwrap_or_default();

            let response = HttpResponse::new(code, res_headers, body);

            if response.is_ok() {
                return Ok(response);
            }

            // Only 429 and 500 are worth retrying; everything else is
            // the caller's to interpret
            let should_retry = (code == 429 || code == 500) && tries < request.tries;
            if !should_retry {
                return Ok(response);
            }

            let delay = Self::calculate_retry_delay(&response, code);
            tracing::warn!(
                "Request to {} returned {}, retrying in {:?} (try {}/{})",
                request.url,
                code,
                delay,
                tries,
                request.tries
            );
            tokio::time::sleep(delay).await;
        }
    }

    /// Parses response headers into a `HashMap`, lowercasing the names.
    fn parse_response_headers(
        headers: &reqwest::header::HeaderMap,
    ) -> HashMap<String, Vec<String>> {
        let mut result: HashMap<String, Vec<String>> = HashMap::new();
        for (name, value) in headers {
            let key = name.as_str().to_lowercase();
            let value = value.to_str().unwrap_or_default().to_string();
            result.entry(key).or_default().push(value);
        }
        result
    }

    /// Calculates the retry delay based on response and status code.
    fn calculate_retry_delay(response: &HttpResponse, status: u16) -> std::time::Duration {
        // For 429: use Retry-After if present, otherwise fixed delay
        // For 500: always use fixed delay (ignore Retry-After)
        if status == 429 {
            if let Some(retry_after) = response.retry_after() {
                return std::time::Duration::from_secs_f64(retry_after);
            }
        }
        std::time::Duration::from_secs(RETRY_WAIT_TIME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServiceUrl;

    fn config() -> ClientConfig {
        ClientConfig::builder()
            .service_url(ServiceUrl::new("http://localhost:8000/api/v1/").unwrap())
            .build()
            .unwrap()
    }

    #[test]
    fn test_user_agent_header_format() {
        let client = HttpClient::new(&config());

        let user_agent = client.default_headers().get("User-Agent").unwrap();
        assert!(user_agent.contains("Tastypie Client Library v"));
        assert!(user_agent.contains("Rust"));
    }

    #[test]
    fn test_user_agent_with_prefix() {
        let config = ClientConfig::builder()
            .service_url(ServiceUrl::new("http://localhost:8000/api/v1/").unwrap())
            .user_agent_prefix("MyApp/1.0")
            .build()
            .unwrap();

        let client = HttpClient::new(&config);

        let user_agent = client.default_headers().get("User-Agent").unwrap();
        assert!(user_agent.starts_with("MyApp/1.0 | "));
        assert!(user_agent.contains("Tastypie Client Library"));
    }

    #[test]
    fn test_accept_header_is_json() {
        let client = HttpClient::new(&config());

        assert_eq!(
            client.default_headers().get("Accept"),
            Some(&"application/json".to_string())
        );
    }

    #[test]
    fn test_client_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<HttpClient>();
    }

    #[test]
    fn test_retry_delay_honors_retry_after_for_429() {
        let mut headers = HashMap::new();
        headers.insert("retry-after".to_string(), vec!["2.5".to_string()]);
        let response = HttpResponse::new(429, headers, String::new());

        let delay = HttpClient::calculate_retry_delay(&response, 429);
        assert_eq!(delay, std::time::Duration::from_secs_f64(2.5));
    }

    #[test]
    fn test_retry_delay_fixed_for_500() {
        let mut headers = HashMap::new();
        headers.insert("retry-after".to_string(), vec!["9.0".to_string()]);
        let response = HttpResponse::new(500, headers, String::new());

        let delay = HttpClient::calculate_retry_delay(&response, 500);
        assert_eq!(delay, std::time::Duration::from_secs(RETRY_WAIT_TIME));
    }
}
