//! Endpoint handles for resource operations.
//!
//! An [`Endpoint`] is a lightweight handle for one resource type of the
//! service, produced by [`ApiClient::endpoint`]. It carries the operations
//! Tastypie exposes on a resource: single and batched reads, filtered
//! searches, and creation.

use std::collections::HashMap;
use std::fmt;

use serde::Deserialize;

use crate::clients::HttpMethod;
use crate::rest::api::{ApiClient, EndpointEntry};
use crate::rest::errors::ApiError;
use crate::rest::filters::Filters;
use crate::rest::paged::{ListPage, PagedResult};
use crate::rest::resource::Resource;

/// Response envelope of the `set/` batch view.
#[derive(Debug, Deserialize)]
struct SetEnvelope {
    objects: Vec<serde_json::Value>,
    #[serde(default)]
    not_found: Vec<serde_json::Value>,
}

/// A handle for one resource type of the service.
///
/// Endpoints are cheap to clone; they share the connection of the client
/// that produced them.
///
/// # Example
///
/// ```rust,ignore
/// use tastypie_client::Filters;
///
/// let notes = client.endpoint("note")?;
///
/// // Fetch one resource by id
/// let note = notes.get("1").await?;
///
/// // Search for exactly one resource
/// let note = notes.find(Filters::new().param("slug", "first-post")).await?;
///
/// // Page through a filtered listing
/// let mut recent = notes.filter(Filters::new().param("published", true)).await?;
/// for note in recent.fetch_all().await? {
///     println!("{note}");
/// }
/// ```
#[derive(Clone, Debug)]
pub struct Endpoint {
    client: ApiClient,
    name: String,
    entry: EndpointEntry,
}

impl Endpoint {
    pub(crate) fn new(client: ApiClient, name: String, entry: EndpointEntry) -> Self {
        Self {
            client,
            name,
            entry,
        }
    }

    /// Returns the resource name of this endpoint, e.g. `note`.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the absolute URL of this endpoint's list view.
    #[must_use]
    pub fn url(&self) -> String {
        self.client.resolve_url(&self.entry.list_endpoint)
    }

    /// Returns the client this endpoint belongs to.
    #[must_use]
    pub(crate) fn client(&self) -> &ApiClient {
        &self.client
    }

    /// Fetches the resource with the given id.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::BadStatus`] unless the service answers with
    /// `200 OK`; a missing id surfaces as the service's 404.
    pub async fn get(&self, id: &str) -> Result<Resource, ApiError> {
        let url = self.client.build_url(Some(&self.name), Some(id), None);
        let raw = self.client.fetch_json::<serde_json::Value>(&url).await?;

        Resource::materialize(self, raw)
    }

    /// Searches for the single resource matching the given filters.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::MissingIdentifier`] if `filters` is empty, and
    /// [`ApiError::AmbiguousResult`] if the search matches any number of
    /// resources other than one.
    pub async fn find(&self, filters: Filters) -> Result<Resource, ApiError> {
        if filters.is_empty() {
            return Err(ApiError::MissingIdentifier);
        }

        let mut page = self.filter(filters).await?;
        let matched = page.count();
        if matched != 1 {
            return Err(ApiError::AmbiguousResult { matched });
        }

        let resources = page.fetch_all().await?;
        resources
            .first()
            .cloned()
            .ok_or(ApiError::AmbiguousResult { matched: 0 })
    }

    /// Fetches several resources by id in one request, using the `set/`
    /// batch view.
    ///
    /// The result maps each id to `Some(resource)`, or to `None` for ids
    /// the service reported as not found. Ids are expected to be distinct
    /// within one call; duplicates collapse to a single entry.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::BadStatus`] unless the service answers with
    /// `200 OK`, or [`ApiError::InvalidPayload`] if the envelope cannot be
    /// interpreted.
    pub async fn get_many<I, S>(
        &self,
        ids: I,
    ) -> Result<HashMap<String, Option<Resource>>, ApiError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let ids: Vec<String> = ids.into_iter().map(|id| id.as_ref().to_string()).collect();
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let set_segment = format!("set/{}", ids.join(";"));
        let url = self
            .client
            .build_url(Some(&self.name), Some(&set_segment), None);
        let envelope: SetEnvelope = self.client.fetch_json(&url).await?;

        let mut results = HashMap::with_capacity(ids.len());
        for raw in envelope.objects {
            let resource = Resource::materialize(self, raw)?;
            results.insert(resource.id().to_string(), Some(resource));
        }
        for missing in &envelope.not_found {
            results.insert(not_found_id(missing)?, None);
        }

        Ok(results)
    }

    /// Searches for resources matching the given filters.
    ///
    /// The request establishes how many resources match; the returned
    /// [`PagedResult`] fetches the matches page by page on demand.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::BadStatus`] unless the service answers with
    /// `200 OK`.
    pub async fn filter(&self, filters: Filters) -> Result<PagedResult, ApiError> {
        let url = self.client.build_url(Some(&self.name), None, Some(&filters));
        let page: ListPage = self.client.fetch_json(&url).await?;

        Ok(PagedResult::new(
            self.clone(),
            filters,
            page.meta.total_count,
        ))
    }

    /// Returns all resources of this endpoint as a paged result.
    ///
    /// Shorthand for [`filter`](Self::filter) with no filters.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::BadStatus`] unless the service answers with
    /// `200 OK`.
    pub async fn all(&self) -> Result<PagedResult, ApiError> {
        self.filter(Filters::new()).await
    }

    /// Creates a new resource from the given field document.
    ///
    /// The service answers creation with `201 Created` and a `Location`
    /// header; the created resource is fetched back from that URL so the
    /// returned [`Resource`] carries the server-assigned id and defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::BadStatus`] unless the service answers with
    /// `201 Created`, or [`ApiError::InvalidPayload`] if the response
    /// lacks a `Location` header.
    pub async fn create(&self, fields: serde_json::Value) -> Result<Resource, ApiError> {
        let url = self.client.build_url(Some(&self.name), None, None);
        let response = self
            .client
            .execute_expect(HttpMethod::Post, &url, Some(fields), 201)
            .await?;

        let location = response.location().ok_or_else(|| ApiError::InvalidPayload {
            reason: "create response did not carry a Location header".to_string(),
        })?;
        let location = self.client.resolve_url(location);

        let raw = self.client.fetch_json::<serde_json::Value>(&location).await?;
        Resource::materialize(self, raw)
    }

    /// Fetches the endpoint's schema document.
    ///
    /// The schema describes the resource's fields, allowed filters, and
    /// allowed methods.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::BadStatus`] unless the service answers with
    /// `200 OK`.
    pub async fn schema(&self) -> Result<serde_json::Value, ApiError> {
        let url = self.client.resolve_url(&self.entry.schema);
        self.client.fetch_json(&url).await
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} @ {}", self.name, self.url())
    }
}

/// Interprets one entry of the `not_found` array as an id.
///
/// The service writes ids back as strings, but numeric ids have been seen
/// as JSON numbers; both normalize to the decimal string form.
fn not_found_id(value: &serde_json::Value) -> Result<String, ApiError> {
    match value {
        serde_json::Value::String(s) => Ok(s.clone()),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        _ => Err(ApiError::InvalidPayload {
            reason: format!("not_found entries must be ids, got {value}"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ClientConfig, ServiceUrl};
    use serde_json::json;

    fn endpoint() -> Endpoint {
        let config = ClientConfig::builder()
            .service_url(ServiceUrl::new("http://localhost:8000/api/v1/").unwrap())
            .build()
            .unwrap();
        let client = ApiClient::stubbed(&config, &["note", "user"]);

        client.endpoint("note").unwrap()
    }

    #[test]
    fn test_endpoint_exposes_name_and_url() {
        let endpoint = endpoint();

        assert_eq!(endpoint.name(), "note");
        assert_eq!(endpoint.url(), "http://localhost:8000/api/v1/note/");
    }

    #[test]
    fn test_endpoint_display_names_endpoint_and_url() {
        let endpoint = endpoint();

        assert_eq!(
            endpoint.to_string(),
            "note @ http://localhost:8000/api/v1/note/"
        );
    }

    #[tokio::test]
    async fn test_find_rejects_empty_filters() {
        let result = endpoint().find(Filters::new()).await;

        assert!(matches!(result, Err(ApiError::MissingIdentifier)));
    }

    #[tokio::test]
    async fn test_get_many_with_no_ids_skips_the_request() {
        let results = endpoint().get_many(Vec::<String>::new()).await.unwrap();

        assert!(results.is_empty());
    }

    #[test]
    fn test_not_found_id_normalizes_numbers() {
        assert_eq!(not_found_id(&json!("5")).unwrap(), "5");
        assert_eq!(not_found_id(&json!(5)).unwrap(), "5");
        assert!(not_found_id(&json!(["5"])).is_err());
    }

    #[test]
    fn test_set_envelope_tolerates_missing_not_found() {
        let envelope: SetEnvelope =
            serde_json::from_value(json!({"objects": []})).unwrap();

        assert!(envelope.objects.is_empty());
        assert!(envelope.not_found.is_empty());
    }
}
