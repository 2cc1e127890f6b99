//! Lazily paginated listing results.
//!
//! Tastypie answers list requests with an envelope of `meta` and
//! `objects`, where `meta.next` carries a server-relative URL for the
//! following page (or null on the last one). [`PagedResult`] walks that
//! cursor chain with an explicit loop, accumulating materialized
//! resources as pages arrive, and replays the accumulated cache once the
//! chain is exhausted.

use serde::Deserialize;

use crate::rest::endpoint::Endpoint;
use crate::rest::errors::ApiError;
use crate::rest::filters::Filters;
use crate::rest::resource::Resource;

/// The `meta` block of a list envelope.
///
/// Tastypie also reports `previous`, `limit`, and `offset`; only the
/// total and the forward cursor are consumed.
#[derive(Debug, Deserialize)]
pub(crate) struct ListMeta {
    /// How many resources match, across all pages.
    pub(crate) total_count: u64,
    /// Server-relative URL of the next page, absent on the last page.
    #[serde(default)]
    pub(crate) next: Option<String>,
}

/// One page of a listing: `{"meta": {...}, "objects": [...]}`.
#[derive(Debug, Deserialize)]
pub(crate) struct ListPage {
    pub(crate) meta: ListMeta,
    pub(crate) objects: Vec<serde_json::Value>,
}

#[derive(Debug)]
enum PageState {
    /// No page fetched yet; the first step re-issues the filter request.
    Unfetched,
    /// Mid-listing, holding the cursor of the page to fetch next.
    Accumulating { next: String },
    /// The cursor chain is exhausted; the cache is the whole result.
    Complete,
}

/// The lazily-fetched result of a filtered listing.
///
/// A `PagedResult` is seeded with the server-reported match count and the
/// original filter parameters; the matching resources are fetched page by
/// page as the result is stepped or drained. Fetched pages accumulate in
/// an internal cache, so draining a completed result issues no requests.
///
/// # Example
///
/// ```rust,ignore
/// use tastypie_client::Filters;
///
/// let mut notes = client
///     .endpoint("note")?
///     .filter(Filters::new().param("published", true))
///     .await?;
///
/// println!("{} notes match", notes.count());
///
/// for note in notes.fetch_all().await? {
///     println!("{note}");
/// }
/// ```
#[derive(Debug)]
pub struct PagedResult {
    endpoint: Endpoint,
    filters: Filters,
    total_count: u64,
    cache: Vec<Resource>,
    state: PageState,
}

impl PagedResult {
    pub(crate) fn new(endpoint: Endpoint, filters: Filters, total_count: u64) -> Self {
        Self {
            endpoint,
            filters,
            total_count,
            cache: Vec::new(),
            state: PageState::Unfetched,
        }
    }

    /// Returns how many resources match, as reported by the service when
    /// the search was issued.
    ///
    /// The count is not refreshed by later pages.
    #[must_use]
    pub const fn count(&self) -> u64 {
        self.total_count
    }

    /// Returns `true` once the last page has been fetched.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        matches!(self.state, PageState::Complete)
    }

    /// Returns the resources fetched so far, in page order.
    #[must_use]
    pub fn fetched(&self) -> &[Resource] {
        &self.cache
    }

    /// Fetches the next page and appends it to the cache.
    ///
    /// Returns the newly fetched resources, or `None` once the listing is
    /// complete. The first call re-issues the original filter request;
    /// later calls follow the `meta.next` cursor.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::BadStatus`] unless the service answers with
    /// `200 OK`.
    pub async fn next_page(&mut self) -> Result<Option<&[Resource]>, ApiError> {
        let client = self.endpoint.client();
        let url = match &self.state {
            PageState::Unfetched => {
                client.build_url(Some(self.endpoint.name()), None, Some(&self.filters))
            }
            PageState::Accumulating { next } => client.resolve_url(next),
            PageState::Complete => return Ok(None),
        };

        let page: ListPage = client.fetch_json(&url).await?;

        tracing::debug!(
            "Fetched page of {} {} resources ({} of {} accumulated)",
            page.objects.len(),
            self.endpoint.name(),
            self.cache.len() + page.objects.len(),
            self.total_count
        );

        let start = self.cache.len();
        self.cache
            .extend(Resource::materialize_many(&self.endpoint, page.objects)?);

        self.state = match page.meta.next {
            Some(next) => PageState::Accumulating { next },
            None => PageState::Complete,
        };

        Ok(Some(&self.cache[start..]))
    }

    /// Drains the listing and returns all matching resources in page
    /// order.
    ///
    /// Pages that are already cached are not fetched again; draining a
    /// completed result issues no requests at all.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::BadStatus`] unless the service answers every
    /// page request with `200 OK`.
    pub async fn fetch_all(&mut self) -> Result<Vec<Resource>, ApiError> {
        while self.next_page().await?.is_some() {}

        Ok(self.cache.clone())
    }
}
