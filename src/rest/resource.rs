//! Materialized resources and their field values.
//!
//! A Tastypie document is a flat JSON object whose relations are encoded
//! as resource URLs. Materialization turns such a document into a
//! [`Resource`]: the `resource_uri` entry becomes the resource's identity,
//! and every other field is classified into a [`FieldValue`]:
//!
//! - a string holding a resource URL of this service becomes a lazy
//!   [`ResourceRef`],
//! - an array holding resource URLs becomes a lazy [`ResourceRefList`],
//! - everything else stays a plain JSON value.
//!
//! Relations resolve on demand; materializing a resource never issues
//! requests of its own.

use std::collections::BTreeMap;
use std::fmt;

use crate::clients::HttpMethod;
use crate::rest::endpoint::Endpoint;
use crate::rest::errors::ApiError;
use crate::rest::lazy::{ResourceRef, ResourceRefList};

/// One field of a materialized resource.
///
/// # Example
///
/// ```rust,ignore
/// let note = client.endpoint("note")?.get("1").await?;
///
/// // Scalars are plain JSON values
/// let title = note.get("title")?.as_str().unwrap();
///
/// // Relations resolve lazily
/// let author = note.get("user")?.as_resource_ref().unwrap();
/// let user = author.resolve().await?;
/// ```
#[derive(Clone, Debug)]
pub enum FieldValue {
    /// A plain JSON value: string, number, bool, null, or nested object.
    Scalar(serde_json::Value),
    /// A to-one relation, encoded on the wire as a resource URL string.
    Ref(ResourceRef),
    /// A to-many relation, encoded on the wire as an array of resource
    /// URL strings.
    RefList(ResourceRefList),
    /// An array with no resource URLs in it, kept as plain JSON values.
    RawList(Vec<serde_json::Value>),
}

impl FieldValue {
    /// Returns the string value, if this is a string scalar.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Scalar(serde_json::Value::String(s)) => Some(s),
            _ => None,
        }
    }

    /// Returns the integer value, if this is an integer scalar.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Scalar(value) => value.as_i64(),
            _ => None,
        }
    }

    /// Returns the float value, if this is a numeric scalar.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Scalar(value) => value.as_f64(),
            _ => None,
        }
    }

    /// Returns the boolean value, if this is a boolean scalar.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Scalar(value) => value.as_bool(),
            _ => None,
        }
    }

    /// Returns `true` if this is a null scalar.
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Scalar(serde_json::Value::Null))
    }

    /// Parses the field as a timestamp, if this is a string scalar in one
    /// of the service's datetime formats.
    ///
    /// Tastypie's default serializer writes naive local timestamps like
    /// `2012-05-29T14:21:36.392000`; RFC 3339 timestamps with an offset
    /// are accepted as well and converted to their UTC wall time.
    #[must_use]
    pub fn as_datetime(&self) -> Option<chrono::NaiveDateTime> {
        let text = self.as_str()?;
        chrono::DateTime::parse_from_rfc3339(text)
            .map(|dt| dt.naive_utc())
            .ok()
            .or_else(|| chrono::NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f").ok())
    }

    /// Returns the relation, if this is a to-one relation field.
    #[must_use]
    pub fn as_resource_ref(&self) -> Option<&ResourceRef> {
        match self {
            Self::Ref(r) => Some(r),
            _ => None,
        }
    }

    /// Returns the relation list, if this is a to-many relation field.
    #[must_use]
    pub fn as_ref_list(&self) -> Option<&ResourceRefList> {
        match self {
            Self::RefList(list) => Some(list),
            _ => None,
        }
    }

    /// Returns the plain items, if this is a non-relation array field.
    #[must_use]
    pub fn as_raw_list(&self) -> Option<&[serde_json::Value]> {
        match self {
            Self::RawList(items) => Some(items),
            _ => None,
        }
    }

    /// Serializes the field back to its wire form.
    ///
    /// Relations encode back to their resource URLs, so the output of
    /// `to_json` is valid inside an update or create document.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Scalar(value) => value.clone(),
            Self::Ref(r) => serde_json::Value::String(r.resource_uri()),
            Self::RefList(list) => serde_json::Value::Array(
                list.resource_uris()
                    .into_iter()
                    .map(serde_json::Value::String)
                    .collect(),
            ),
            Self::RawList(items) => serde_json::Value::Array(items.clone()),
        }
    }
}

/// A materialized resource.
///
/// Resources are snapshots: fields hold what the service returned at fetch
/// time, and mutations go through the service rather than the local copy.
/// [`update`](Self::update) returns a freshly fetched resource instead of
/// patching this one, and [`delete`](Self::delete) marks this copy as
/// deleted so later mutations fail fast.
///
/// # Example
///
/// ```rust,ignore
/// let note = client.endpoint("note")?.get("1").await?;
/// assert_eq!(note.resource_type(), "note");
/// assert_eq!(note.id(), "1");
///
/// let updated = note.update(serde_json::json!({"title": "Renamed"})).await?;
/// assert_eq!(updated.get("title")?.as_str(), Some("Renamed"));
/// ```
#[derive(Clone, Debug)]
pub struct Resource {
    endpoint: Endpoint,
    id: String,
    fields: BTreeMap<String, FieldValue>,
    deleted: bool,
}

impl Resource {
    /// Materializes a resource from its wire document.
    ///
    /// The document must be a JSON object with a string `resource_uri`;
    /// the identity is parsed from that URL and the entry is removed from
    /// the field map. When the URL names a different type than the
    /// fetching endpoint, the owning client's registry supplies the right
    /// endpoint.
    pub(crate) fn materialize(endpoint: &Endpoint, raw: serde_json::Value) -> Result<Self, ApiError> {
        let mut map = match raw {
            serde_json::Value::Object(map) => map,
            _ => {
                return Err(ApiError::InvalidPayload {
                    reason: "resource documents must be JSON objects".to_string(),
                })
            }
        };

        let uri = match map.remove("resource_uri") {
            Some(serde_json::Value::String(uri)) => uri,
            Some(_) => {
                return Err(ApiError::InvalidPayload {
                    reason: "resource_uri must be a string".to_string(),
                })
            }
            None => {
                return Err(ApiError::InvalidPayload {
                    reason: "resource document lacks a resource_uri".to_string(),
                })
            }
        };

        let (resource_type, id) = endpoint.client().parser().identify(&uri)?;
        let endpoint = resolve_target(endpoint, &resource_type)?;

        let mut fields = BTreeMap::new();
        for (name, value) in map {
            fields.insert(name, classify_field(&endpoint, value)?);
        }

        Ok(Self {
            endpoint,
            id,
            fields,
            deleted: false,
        })
    }

    /// Materializes a batch of wire documents, preserving order.
    pub(crate) fn materialize_many(
        endpoint: &Endpoint,
        raws: Vec<serde_json::Value>,
    ) -> Result<Vec<Self>, ApiError> {
        raws.into_iter()
            .map(|raw| Self::materialize(endpoint, raw))
            .collect()
    }

    /// Returns the resource type name, e.g. `note`.
    #[must_use]
    pub fn resource_type(&self) -> &str {
        self.endpoint.name()
    }

    /// Returns the resource id.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the server-relative URL of this resource.
    #[must_use]
    pub fn resource_uri(&self) -> String {
        format!(
            "{}{}/{}/",
            self.endpoint.client().parser().base_path(),
            self.endpoint.name(),
            self.id
        )
    }

    /// Returns `true` once this copy has been deleted through
    /// [`delete`](Self::delete).
    #[must_use]
    pub fn is_deleted(&self) -> bool {
        self.deleted
    }

    /// Returns the endpoint this resource belongs to.
    #[must_use]
    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// Returns the named field.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::FieldNotFound`] if the resource has no field
    /// with this name.
    pub fn get(&self, field: &str) -> Result<&FieldValue, ApiError> {
        self.fields.get(field).ok_or_else(|| ApiError::FieldNotFound {
            field: field.to_string(),
        })
    }

    /// Iterates over all fields in name order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Applies a partial update to this resource on the service.
    ///
    /// Sends a PATCH with the given field document, then re-fetches the
    /// resource so the returned copy carries the server's authoritative
    /// state. This copy is left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::ResourceGone`] if this copy has been deleted,
    /// and [`ApiError::BadStatus`] unless the service answers the PATCH
    /// with `202 Accepted`.
    pub async fn update(&self, fields: serde_json::Value) -> Result<Self, ApiError> {
        if self.deleted {
            return Err(self.gone());
        }

        let client = self.endpoint.client();
        let url = client.build_url(Some(self.endpoint.name()), Some(&self.id), None);
        client
            .execute_expect(HttpMethod::Patch, &url, Some(fields), 202)
            .await?;

        // The 202 body is empty; the authoritative state is re-fetched
        self.endpoint.get(&self.id).await
    }

    /// Deletes this resource on the service.
    ///
    /// Deletion is one-way: the local copy is marked deleted and every
    /// later [`update`](Self::update) or `delete` call fails without
    /// touching the network.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::ResourceGone`] if this copy has already been
    /// deleted, and [`ApiError::BadStatus`] unless the service answers
    /// with `204 No Content`.
    pub async fn delete(&mut self) -> Result<(), ApiError> {
        if self.deleted {
            return Err(self.gone());
        }

        let client = self.endpoint.client();
        let url = client.build_url(Some(self.endpoint.name()), Some(&self.id), None);
        client
            .execute_expect(HttpMethod::Delete, &url, None, 204)
            .await?;

        self.deleted = true;
        Ok(())
    }

    fn gone(&self) -> ApiError {
        ApiError::ResourceGone {
            resource_type: self.endpoint.name().to_string(),
            id: self.id.clone(),
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.endpoint.name(), self.id)
    }
}

/// Classifies one field value per the data model.
fn classify_field(endpoint: &Endpoint, value: serde_json::Value) -> Result<FieldValue, ApiError> {
    match value {
        serde_json::Value::String(s) => classify_string(endpoint, s),
        serde_json::Value::Array(items) => classify_list(endpoint, items),
        other => Ok(FieldValue::Scalar(other)),
    }
}

/// Turns a string field into a relation when it is a resource URL.
fn classify_string(endpoint: &Endpoint, value: String) -> Result<FieldValue, ApiError> {
    let parser = endpoint.client().parser();
    if parser.classify(&value) {
        if let Ok((resource_type, id)) = parser.identify(&value) {
            let target = resolve_target(endpoint, &resource_type)?;
            return Ok(FieldValue::Ref(ResourceRef::new(target, id)));
        }
    }

    Ok(FieldValue::Scalar(serde_json::Value::String(value)))
}

/// Turns an array field into a relation list when it holds resource URLs.
///
/// Relation lists are homogeneous: the first entry that parses fixes the
/// target type, and entries that do not parse (or parse to another type)
/// are dropped. Arrays with no resource URLs at all, the empty array
/// included, stay raw.
fn classify_list(
    endpoint: &Endpoint,
    items: Vec<serde_json::Value>,
) -> Result<FieldValue, ApiError> {
    let parser = endpoint.client().parser();

    let mut list_type: Option<String> = None;
    let mut ids: Vec<String> = Vec::new();
    for item in &items {
        let url = match item.as_str() {
            Some(url) if parser.classify(url) => url,
            _ => continue,
        };
        let (resource_type, id) = match parser.identify(url) {
            Ok(identity) => identity,
            Err(_) => continue,
        };
        match &list_type {
            None => {
                list_type = Some(resource_type);
                ids.push(id);
            }
            Some(expected) if *expected == resource_type => ids.push(id),
            Some(_) => {}
        }
    }

    match list_type {
        Some(resource_type) => {
            let target = resolve_target(endpoint, &resource_type)?;
            Ok(FieldValue::RefList(ResourceRefList::new(target, ids)))
        }
        None => Ok(FieldValue::RawList(items)),
    }
}

/// Resolves the endpoint for a parsed resource type.
fn resolve_target(endpoint: &Endpoint, resource_type: &str) -> Result<Endpoint, ApiError> {
    if resource_type == endpoint.name() {
        Ok(endpoint.clone())
    } else {
        endpoint.client().endpoint(resource_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ClientConfig, ServiceUrl};
    use crate::rest::api::ApiClient;
    use serde_json::json;

    fn client() -> ApiClient {
        let config = ClientConfig::builder()
            .service_url(ServiceUrl::new("http://localhost:8000/api/v1/").unwrap())
            .build()
            .unwrap();

        ApiClient::stubbed(&config, &["note", "user", "tag"])
    }

    fn note_endpoint() -> Endpoint {
        client().endpoint("note").unwrap()
    }

    #[test]
    fn test_materialize_extracts_identity_from_self_url() {
        let resource = Resource::materialize(
            &note_endpoint(),
            json!({
                "resource_uri": "/api/v1/note/1/",
                "title": "First note"
            }),
        )
        .unwrap();

        assert_eq!(resource.resource_type(), "note");
        assert_eq!(resource.id(), "1");
        assert_eq!(resource.to_string(), "note/1");
        assert!(!resource.is_deleted());
    }

    #[test]
    fn test_materialize_removes_resource_uri_from_fields() {
        let resource = Resource::materialize(
            &note_endpoint(),
            json!({
                "resource_uri": "/api/v1/note/1/",
                "title": "First note"
            }),
        )
        .unwrap();

        assert!(matches!(
            resource.get("resource_uri"),
            Err(ApiError::FieldNotFound { .. })
        ));
        assert_eq!(resource.fields().count(), 1);
    }

    #[test]
    fn test_materialize_switches_endpoint_when_types_differ() {
        // A document fetched through the note endpoint may describe a user
        let resource = Resource::materialize(
            &note_endpoint(),
            json!({
                "resource_uri": "/api/v1/user/9/",
                "username": "alice"
            }),
        )
        .unwrap();

        assert_eq!(resource.resource_type(), "user");
        assert_eq!(resource.id(), "9");
    }

    #[test]
    fn test_materialize_rejects_non_objects() {
        let result = Resource::materialize(&note_endpoint(), json!(["not", "an", "object"]));

        assert!(matches!(result, Err(ApiError::InvalidPayload { .. })));
    }

    #[test]
    fn test_materialize_requires_resource_uri() {
        let result = Resource::materialize(&note_endpoint(), json!({"title": "No identity"}));
        assert!(matches!(result, Err(ApiError::InvalidPayload { .. })));

        let result = Resource::materialize(
            &note_endpoint(),
            json!({"resource_uri": 17, "title": "Wrong type"}),
        );
        assert!(matches!(result, Err(ApiError::InvalidPayload { .. })));
    }

    #[test]
    fn test_scalar_fields_stay_plain() {
        let resource = Resource::materialize(
            &note_endpoint(),
            json!({
                "resource_uri": "/api/v1/note/1/",
                "title": "First note",
                "rating": 4,
                "score": 1.5,
                "published": true,
                "subtitle": null,
                "extra": {"nested": "object"}
            }),
        )
        .unwrap();

        assert_eq!(resource.get("title").unwrap().as_str(), Some("First note"));
        assert_eq!(resource.get("rating").unwrap().as_i64(), Some(4));
        assert_eq!(resource.get("score").unwrap().as_f64(), Some(1.5));
        assert_eq!(resource.get("published").unwrap().as_bool(), Some(true));
        assert!(resource.get("subtitle").unwrap().is_null());
        assert!(matches!(
            resource.get("extra").unwrap(),
            FieldValue::Scalar(serde_json::Value::Object(_))
        ));
    }

    #[test]
    fn test_resource_url_strings_become_refs() {
        let resource = Resource::materialize(
            &note_endpoint(),
            json!({
                "resource_uri": "/api/v1/note/1/",
                "user": "/api/v1/user/5/"
            }),
        )
        .unwrap();

        let user = resource.get("user").unwrap().as_resource_ref().unwrap();
        assert_eq!(user.resource_type(), "user");
        assert_eq!(user.id(), "5");
        assert_eq!(user.resource_uri(), "/api/v1/user/5/");
    }

    #[test]
    fn test_absolute_urls_stay_scalar() {
        // Payload relations are server-relative; anything absolute is data
        let resource = Resource::materialize(
            &note_endpoint(),
            json!({
                "resource_uri": "/api/v1/note/1/",
                "homepage": "http://localhost:8000/api/v1/user/5/"
            }),
        )
        .unwrap();

        assert!(resource.get("homepage").unwrap().as_str().is_some());
    }

    #[test]
    fn test_ref_arrays_become_ref_lists() {
        let resource = Resource::materialize(
            &note_endpoint(),
            json!({
                "resource_uri": "/api/v1/note/1/",
                "tags": ["/api/v1/tag/2/", "/api/v1/tag/7/", "/api/v1/tag/2/"]
            }),
        )
        .unwrap();

        let tags = resource.get("tags").unwrap().as_ref_list().unwrap();
        assert_eq!(tags.resource_type(), "tag");
        // Duplicates collapse, first occurrence kept
        assert_eq!(tags.ids(), &["2".to_string(), "7".to_string()]);
    }

    #[test]
    fn test_ref_lists_drop_stray_entries() {
        let resource = Resource::materialize(
            &note_endpoint(),
            json!({
                "resource_uri": "/api/v1/note/1/",
                "tags": ["/api/v1/tag/2/", "unrelated", "/api/v1/user/3/", "/api/v1/tag/9/"]
            }),
        )
        .unwrap();

        let tags = resource.get("tags").unwrap().as_ref_list().unwrap();
        assert_eq!(tags.resource_type(), "tag");
        assert_eq!(tags.ids(), &["2".to_string(), "9".to_string()]);
    }

    #[test]
    fn test_plain_arrays_stay_raw() {
        let resource = Resource::materialize(
            &note_endpoint(),
            json!({
                "resource_uri": "/api/v1/note/1/",
                "scores": [1, 2, 3],
                "empty": []
            }),
        )
        .unwrap();

        let scores = resource.get("scores").unwrap().as_raw_list().unwrap();
        assert_eq!(scores.len(), 3);

        assert!(resource.get("empty").unwrap().as_raw_list().unwrap().is_empty());
    }

    #[test]
    fn test_fields_iterate_in_name_order() {
        let resource = Resource::materialize(
            &note_endpoint(),
            json!({
                "resource_uri": "/api/v1/note/1/",
                "zebra": 1,
                "apple": 2,
                "mango": 3
            }),
        )
        .unwrap();

        let names: Vec<&str> = resource.fields().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["apple", "mango", "zebra"]);
    }

    #[test]
    fn test_resource_uri_reconstruction() {
        let resource = Resource::materialize(
            &note_endpoint(),
            json!({"resource_uri": "/api/v1/note/12/"}),
        )
        .unwrap();

        assert_eq!(resource.resource_uri(), "/api/v1/note/12/");
    }

    #[test]
    fn test_as_datetime_parses_service_timestamps() {
        let resource = Resource::materialize(
            &note_endpoint(),
            json!({
                "resource_uri": "/api/v1/note/1/",
                "created": "2012-05-29T14:21:36.392000",
                "updated": "2012-05-29T14:21:36+02:00",
                "title": "not a date"
            }),
        )
        .unwrap();

        let created = resource.get("created").unwrap().as_datetime().unwrap();
        assert_eq!(created.date().to_string(), "2012-05-29");

        let updated = resource.get("updated").unwrap().as_datetime().unwrap();
        assert_eq!(updated.time().to_string(), "12:21:36");

        assert!(resource.get("title").unwrap().as_datetime().is_none());
    }

    #[test]
    fn test_to_json_restores_wire_form() {
        let resource = Resource::materialize(
            &note_endpoint(),
            json!({
                "resource_uri": "/api/v1/note/1/",
                "title": "First note",
                "user": "/api/v1/user/5/",
                "tags": ["/api/v1/tag/2/", "/api/v1/tag/7/"]
            }),
        )
        .unwrap();

        assert_eq!(resource.get("title").unwrap().to_json(), json!("First note"));
        assert_eq!(
            resource.get("user").unwrap().to_json(),
            json!("/api/v1/user/5/")
        );
        assert_eq!(
            resource.get("tags").unwrap().to_json(),
            json!(["/api/v1/tag/2/", "/api/v1/tag/7/"])
        );
    }

    #[tokio::test]
    async fn test_mutations_on_deleted_copy_fail_fast() {
        let mut resource = Resource::materialize(
            &note_endpoint(),
            json!({"resource_uri": "/api/v1/note/1/", "title": "Doomed"}),
        )
        .unwrap();
        resource.deleted = true;

        // Both paths refuse before touching the network
        let update_result = resource.update(json!({"title": "Zombie"})).await;
        assert!(matches!(
            update_result,
            Err(ApiError::ResourceGone { ref resource_type, ref id })
                if resource_type == "note" && id == "1"
        ));

        let delete_result = resource.delete().await;
        assert!(matches!(delete_result, Err(ApiError::ResourceGone { .. })));
    }
}
