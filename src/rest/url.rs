//! Resource URL classification and parsing.
//!
//! Tastypie names every resource by URL: a resource's identity is the
//! `type/id` tail of its `resource_uri`, rooted at the service's base path.
//! [`UrlParser`] decides whether a string is such a URL and extracts the
//! identity from it.

use crate::config::ServiceUrl;
use crate::rest::errors::ApiError;

/// Classifies and parses resource URLs for one service.
///
/// Relation URLs in payloads are server-relative (`/api/v1/note/1/`), so
/// classification tests the base path prefix only. [`identify`] additionally
/// accepts absolute URLs on the service's own host, which appear in
/// `Location` headers.
///
/// [`identify`]: Self::identify
///
/// # Example
///
/// ```rust
/// use tastypie_client::{ServiceUrl, UrlParser};
///
/// let parser = UrlParser::new(&ServiceUrl::new("http://localhost:8000/api/v1/").unwrap());
///
/// assert!(parser.classify("/api/v1/note/1/"));
/// assert!(!parser.classify("/media/note.txt"));
///
/// let (resource_type, id) = parser.identify("/api/v1/note/1/").unwrap();
/// assert_eq!(resource_type, "note");
/// assert_eq!(id, "1");
/// ```
#[derive(Clone, Debug)]
pub struct UrlParser {
    service_url: String,
    base_url: String,
    base_path: String,
}

impl UrlParser {
    /// Creates a parser for the given service root.
    #[must_use]
    pub fn new(service_url: &ServiceUrl) -> Self {
        Self {
            service_url: service_url.as_ref().to_string(),
            base_url: service_url.base_url().to_string(),
            base_path: service_url.base_path().to_string(),
        }
    }

    /// Returns the full service root URL, e.g. `http://localhost:8000/api/v1/`.
    #[must_use]
    pub fn service_url(&self) -> &str {
        &self.service_url
    }

    /// Returns the scheme and host part, e.g. `http://localhost:8000`.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the path part of the service root, e.g. `/api/v1/`.
    #[must_use]
    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    /// Returns `true` if the string looks like a resource URL of this
    /// service.
    ///
    /// This is a cheap prefix test on the base path; [`identify`](Self::identify)
    /// performs the full parse. Absolute URLs never classify, since payload
    /// relation URLs are server-relative.
    #[must_use]
    pub fn classify(&self, url: &str) -> bool {
        url.starts_with(&self.base_path)
    }

    /// Extracts the `(resource_type, id)` identity from a resource URL.
    ///
    /// The URL must consist of the service's base path followed by exactly
    /// two non-empty segments. The trailing slash is optional, so both
    /// `/api/v1/note/1/` and `/api/v1/note/1` parse.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::MalformedResourceUrl`] if the string is routed
    /// elsewhere, has the wrong number of segments, or carries a query
    /// string or fragment.
    pub fn identify(&self, url: &str) -> Result<(String, String), ApiError> {
        let malformed = || ApiError::MalformedResourceUrl {
            url: url.to_string(),
        };

        let tail = self
            .relative(url)
            .strip_prefix(&self.base_path)
            .ok_or_else(malformed)?;

        // A query string or fragment would leak into the id segment
        if tail.contains('?') || tail.contains('#') {
            return Err(malformed());
        }

        let tail = tail.strip_suffix('/').unwrap_or(tail);

        let mut segments = tail.split('/');
        let resource_type = segments.next().filter(|s| !s.is_empty());
        let id = segments.next().filter(|s| !s.is_empty());

        match (resource_type, id, segments.next()) {
            (Some(resource_type), Some(id), None) => {
                Ok((resource_type.to_string(), id.to_string()))
            }
            _ => Err(malformed()),
        }
    }

    /// Strips the service's own scheme and host from an absolute URL.
    ///
    /// URLs on other hosts are returned unchanged and fail the base path
    /// test downstream.
    fn relative<'a>(&self, url: &'a str) -> &'a str {
        url.strip_prefix(&self.base_url).unwrap_or(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parser() -> UrlParser {
        UrlParser::new(&ServiceUrl::new("http://localhost:8000/api/v1/").unwrap())
    }

    #[test]
    fn test_classify_accepts_service_paths() {
        let parser = parser();

        assert!(parser.classify("/api/v1/note/1/"));
        assert!(parser.classify("/api/v1/user/42/"));
    }

    #[test]
    fn test_classify_rejects_foreign_paths() {
        let parser = parser();

        assert!(!parser.classify("/media/note.txt"));
        assert!(!parser.classify("/api/v2/note/1/"));
        assert!(!parser.classify("just a string"));
    }

    #[test]
    fn test_classify_rejects_absolute_urls() {
        // Payload relation URLs are server-relative; absolute URLs only
        // appear in Location headers, which go through identify instead
        let parser = parser();

        assert!(!parser.classify("http://localhost:8000/api/v1/note/1/"));
        assert!(!parser.classify("https://other.example.com/api/v1/note/1/"));
    }

    #[test]
    fn test_identify_extracts_type_and_id() {
        let parser = parser();

        let (resource_type, id) = parser.identify("/api/v1/note/1/").unwrap();
        assert_eq!(resource_type, "note");
        assert_eq!(id, "1");
    }

    #[test]
    fn test_identify_accepts_absolute_urls_on_own_host() {
        let parser = parser();

        let (resource_type, id) = parser
            .identify("http://localhost:8000/api/v1/user/42/")
            .unwrap();
        assert_eq!(resource_type, "user");
        assert_eq!(id, "42");
    }

    #[test]
    fn test_identify_trailing_slash_is_optional() {
        let parser = parser();

        let (resource_type, id) = parser.identify("/api/v1/note/1").unwrap();
        assert_eq!(resource_type, "note");
        assert_eq!(id, "1");
    }

    #[test]
    fn test_identify_accepts_non_numeric_ids() {
        let parser = parser();

        let (resource_type, id) = parser.identify("/api/v1/profile/alice-b/").unwrap();
        assert_eq!(resource_type, "profile");
        assert_eq!(id, "alice-b");
    }

    #[test]
    fn test_identify_rejects_foreign_hosts() {
        let parser = parser();

        let result = parser.identify("https://other.example.com/api/v1/note/1/");
        assert!(matches!(
            result,
            Err(ApiError::MalformedResourceUrl { url }) if url.contains("other.example.com")
        ));
    }

    #[test]
    fn test_identify_rejects_wrong_segment_count() {
        let parser = parser();

        // Service root, list URL, nested path
        assert!(parser.identify("/api/v1/").is_err());
        assert!(parser.identify("/api/v1/note/").is_err());
        assert!(parser.identify("/api/v1/note/1/comments/2/").is_err());
    }

    #[test]
    fn test_identify_rejects_empty_segments() {
        let parser = parser();

        assert!(parser.identify("/api/v1/note//").is_err());
        assert!(parser.identify("/api/v1//1/").is_err());
    }

    #[test]
    fn test_identify_rejects_queries_and_fragments() {
        let parser = parser();

        assert!(parser.identify("/api/v1/note/1/?format=json").is_err());
        assert!(parser.identify("/api/v1/note/1/#section").is_err());
    }
}
