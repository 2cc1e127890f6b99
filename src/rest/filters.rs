//! Query filters for list and search operations.
//!
//! Tastypie filters are expressed as query parameters using the
//! `field__lookup` convention, e.g. `title__startswith=Chainsaw`. The same
//! key may appear several times, so filters are kept as an ordered list of
//! pairs rather than a map.

/// An ordered set of query parameters.
///
/// Parameters serialize in insertion order, and repeating a key produces a
/// repeated query parameter.
///
/// # Example
///
/// ```rust
/// use tastypie_client::Filters;
///
/// let filters = Filters::new()
///     .param("user__username", "alice")
///     .param("published", true);
///
/// assert_eq!(filters.len(), 2);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Filters {
    params: Vec<(String, String)>,
}

impl Filters {
    /// Creates an empty filter set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one query parameter.
    ///
    /// The value may be anything printable; numbers and booleans serialize
    /// the way Tastypie expects them.
    #[must_use]
    pub fn param(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.params.push((key.into(), value.to_string()));
        self
    }

    /// Appends one parameter per value, all under the same key.
    ///
    /// # Example
    ///
    /// ```rust
    /// use tastypie_client::Filters;
    ///
    /// let filters = Filters::new().params("id__in", [1, 2, 3]);
    /// assert_eq!(filters.len(), 3);
    /// ```
    #[must_use]
    pub fn params<I, V>(mut self, key: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: ToString,
    {
        let key = key.into();
        for value in values {
            self.params.push((key.clone(), value.to_string()));
        }
        self
    }

    /// Returns `true` if no parameters have been added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Returns the number of parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// Serializes the parameters as a percent-encoded query string,
    /// without the leading `?`.
    pub(crate) fn to_query_string(&self) -> String {
        let mut query = String::new();
        for (key, value) in &self.params {
            if !query.is_empty() {
                query.push('&');
            }
            query.push_str(&urlencoding::encode(key));
            query.push('=');
            query.push_str(&urlencoding::encode(value));
        }
        query
    }
}
