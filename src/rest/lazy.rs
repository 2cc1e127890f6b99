//! Lazy references to related resources.
//!
//! Tastypie encodes relations as resource URLs, so fetching one resource
//! never drags its whole neighborhood across the wire. Materialization
//! mirrors that on the client side: a to-one relation becomes a
//! [`ResourceRef`] and a to-many relation becomes a [`ResourceRefList`],
//! and neither touches the network until resolved.
//!
//! Both types memoize. A ref fetches its target at most once; a ref list
//! resolves its ids in batches through the `set/` view and keeps every
//! answer, including "not found", so a second pass is free.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::OnceCell;

use crate::rest::endpoint::Endpoint;
use crate::rest::errors::ApiError;
use crate::rest::resource::Resource;

/// How many ids a [`ResourceRefList`] resolves per batch request.
pub const DEFAULT_CHUNK_SIZE: usize = 20;

/// A lazy reference to one related resource.
///
/// The ref holds the target's endpoint and id; the resource itself is
/// fetched on the first [`resolve`](Self::resolve) call and memoized for
/// the life of the ref. Clones share the memoized slot, so resolving a
/// field once resolves it for every copy of that field.
///
/// # Example
///
/// ```rust,ignore
/// let note = client.endpoint("note")?.get("1").await?;
/// let author = note.get("user")?.as_resource_ref().unwrap();
///
/// // First access fetches /api/v1/user/5/
/// let user = author.resolve().await?;
///
/// // Later accesses reuse the memoized resource
/// let same = author.resolve().await?;
/// assert_eq!(user.id(), same.id());
/// ```
#[derive(Clone, Debug)]
pub struct ResourceRef {
    endpoint: Endpoint,
    id: String,
    resolved: Arc<OnceCell<Resource>>,
}

impl ResourceRef {
    pub(crate) fn new(endpoint: Endpoint, id: String) -> Self {
        Self {
            endpoint,
            id,
            resolved: Arc::new(OnceCell::new()),
        }
    }

    /// Returns the resource type of the target, e.g. `user`.
    #[must_use]
    pub fn resource_type(&self) -> &str {
        self.endpoint.name()
    }

    /// Returns the id of the target.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the server-relative URL of the target.
    ///
    /// This is the wire form the relation came from, so an unresolved ref
    /// can be written back into an update document as-is.
    #[must_use]
    pub fn resource_uri(&self) -> String {
        format!(
            "{}{}/{}/",
            self.endpoint.client().parser().base_path(),
            self.endpoint.name(),
            self.id
        )
    }

    /// Returns the memoized resource without fetching, if it has been
    /// resolved already.
    #[must_use]
    pub fn resolved(&self) -> Option<&Resource> {
        self.resolved.get()
    }

    /// Resolves the reference, fetching the target on first call.
    ///
    /// The fetched resource is memoized; later calls return it without a
    /// request. A failed fetch leaves the slot empty, so the next call
    /// retries.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::BadStatus`] unless the service answers the
    /// fetch with `200 OK`.
    pub async fn resolve(&self) -> Result<&Resource, ApiError> {
        self.resolved
            .get_or_try_init(|| self.endpoint.get(&self.id))
            .await
    }
}

impl fmt::Display for ResourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "&{}/{}", self.endpoint.name(), self.id)
    }
}

#[derive(Debug, Default)]
struct ListState {
    cache: HashMap<String, Option<Resource>>,
    fully_resolved: bool,
}

/// A lazy reference to a list of related resources.
///
/// The list holds the target endpoint and the declared ids. Resolution
/// goes through the `set/` batch view in chunks of
/// [`DEFAULT_CHUNK_SIZE`] ids, so a list of N ids costs `ceil(N / 20)`
/// requests to resolve fully, and nothing at all to resolve again: every
/// answer is cached, including ids the service reports as not found.
///
/// Clones share the cache.
///
/// # Example
///
/// ```rust,ignore
/// let note = client.endpoint("note")?.get("1").await?;
/// let tags = note.get("tags")?.as_ref_list().unwrap();
///
/// // One batch request for up to 20 tags
/// for (id, tag) in tags.resolve().await? {
///     match tag {
///         Some(tag) => println!("{tag}"),
///         None => println!("tag {id} no longer exists"),
///     }
/// }
/// ```
#[derive(Clone, Debug)]
pub struct ResourceRefList {
    endpoint: Endpoint,
    ids: Vec<String>,
    chunk_size: usize,
    state: Arc<Mutex<ListState>>,
}

impl ResourceRefList {
    pub(crate) fn new(endpoint: Endpoint, ids: Vec<String>) -> Self {
        // Duplicate ids share a cache slot anyway; collapse them up front,
        // keeping the first occurrence's position
        let mut declared: Vec<String> = Vec::with_capacity(ids.len());
        for id in ids {
            if !declared.contains(&id) {
                declared.push(id);
            }
        }

        Self {
            endpoint,
            ids: declared,
            chunk_size: DEFAULT_CHUNK_SIZE,
            state: Arc::new(Mutex::new(ListState::default())),
        }
    }

    /// Overrides the batch chunk size. Values below 1 are clamped to 1.
    #[must_use]
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    /// Returns the resource type of the targets, e.g. `tag`.
    #[must_use]
    pub fn resource_type(&self) -> &str {
        self.endpoint.name()
    }

    /// Returns the declared ids, in their original order.
    #[must_use]
    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    /// Returns the number of declared ids.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Returns `true` if the list declares no ids.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Returns the server-relative URLs of the targets.
    ///
    /// This is the wire form the relation came from, usable inside update
    /// and create documents.
    #[must_use]
    pub fn resource_uris(&self) -> Vec<String> {
        let base_path = self.endpoint.client().parser().base_path();
        self.ids
            .iter()
            .map(|id| format!("{}{}/{}/", base_path, self.endpoint.name(), id))
            .collect()
    }

    /// Returns `true` once every declared id has been resolved.
    #[must_use]
    pub fn is_fully_resolved(&self) -> bool {
        self.state().fully_resolved
    }

    /// Resolves the whole list, batching unresolved ids through the
    /// `set/` view.
    ///
    /// Returns one entry per declared id, in declared order; ids the
    /// service does not know map to `None`. Once the list has been fully
    /// resolved, later calls replay the cache without any requests.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::BadStatus`] unless the service answers every
    /// batch request with `200 OK`.
    pub async fn resolve(&self) -> Result<Vec<(String, Option<Resource>)>, ApiError> {
        if !self.state().fully_resolved {
            for chunk in self.ids.chunks(self.chunk_size) {
                let fetched = self.endpoint.get_many(chunk).await?;
                self.state().cache.extend(fetched);
            }
            self.state().fully_resolved = true;
        }

        let state = self.state();
        Ok(self
            .ids
            .iter()
            .map(|id| (id.clone(), state.cache.get(id).cloned().flatten()))
            .collect())
    }

    /// Resolves one declared id, independent of the batch path.
    ///
    /// A cached answer is served as-is; otherwise the id is fetched on
    /// its own through the endpoint's detail view and cached.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::UnknownId`] if the list does not declare the
    /// id, and [`ApiError::BadStatus`] unless the service answers the
    /// fetch with `200 OK`.
    pub async fn get(&self, id: &str) -> Result<Option<Resource>, ApiError> {
        if !self.ids.iter().any(|declared| declared == id) {
            return Err(ApiError::UnknownId { id: id.to_string() });
        }

        if let Some(cached) = self.state().cache.get(id) {
            return Ok(cached.clone());
        }

        let resource = self.endpoint.get(id).await?;
        self.state()
            .cache
            .insert(id.to_string(), Some(resource.clone()));
        Ok(Some(resource))
    }

    /// Locks the shared cache, recovering from a poisoned lock.
    ///
    /// The lock is never held across an await, and every write is an
    /// idempotent insert, so a panic mid-write cannot leave the cache
    /// inconsistent.
    fn state(&self) -> MutexGuard<'_, ListState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Display for ResourceRefList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "&{}[{}]", self.endpoint.name(), self.ids.join(";"))
    }
}
