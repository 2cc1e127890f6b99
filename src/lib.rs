//! # Tastypie Client
//!
//! A Rust client SDK for REST APIs following the Django Tastypie
//! conventions: endpoint discovery at the service root, cursor-style
//! pagination through `meta.next` links, relations encoded as resource
//! URLs, and batched multi-id fetches through the `set/` view.
//!
//! ## Overview
//!
//! This SDK provides:
//! - Type-safe configuration via [`ClientConfig`] and [`ClientConfigBuilder`]
//! - Endpoint discovery at construction via [`ApiClient::connect`]
//! - Per-resource-type operations via [`Endpoint`]: get, find, batch
//!   get-many, filtered listing, create
//! - Dynamic resources ([`Resource`]) whose relation fields are lazy
//!   placeholders ([`ResourceRef`], [`ResourceRefList`]) resolved on
//!   first access and memoized
//! - Transparent cursor pagination via [`PagedResult`]
//! - Async HTTP transport with credential injection and opt-in retry
//!   handling
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use tastypie_client::{ApiClient, ClientConfig, Filters, ServiceUrl};
//!
//! // Point the client at the service root; discovery happens on connect
//! let config = ClientConfig::builder()
//!     .service_url(ServiceUrl::new("http://localhost:8000/api/v1/")?)
//!     .build()?;
//! let client = ApiClient::connect(config).await?;
//!
//! // Fetch one resource by id
//! let note = client.endpoint("note")?.get("1").await?;
//! println!("{}", note.get("title")?.as_str().unwrap_or(""));
//!
//! // Search for exactly one resource
//! let note = client
//!     .endpoint("note")?
//!     .find(Filters::new().param("slug", "first-post"))
//!     .await?;
//! ```
//!
//! ## Lazy Relations
//!
//! Materialized resources carry their relations as unresolved
//! placeholders. Touching a placeholder fetches the target, once:
//!
//! ```rust,ignore
//! let note = client.endpoint("note")?.get("1").await?;
//!
//! // To-one relations fetch their target on first resolve
//! let author = note.get("user")?.as_resource_ref().unwrap();
//! let user = author.resolve().await?;
//!
//! // To-many relations resolve through the set/ view, 20 ids per request
//! let tags = note.get("tags")?.as_ref_list().unwrap();
//! for (id, tag) in tags.resolve().await? {
//!     match tag {
//!         Some(tag) => println!("{tag}"),
//!         None => println!("tag {id} no longer exists on the server"),
//!     }
//! }
//! ```
//!
//! ## Pagination
//!
//! Filtered listings report their total immediately and fetch matches
//! page by page, following the server's `meta.next` cursor:
//!
//! ```rust,ignore
//! let mut notes = client
//!     .endpoint("note")?
//!     .filter(Filters::new().param("published", true))
//!     .await?;
//!
//! println!("{} notes match", notes.count());
//!
//! // Drains every page; a second fetch_all replays the cache
//! for note in notes.fetch_all().await? {
//!     println!("{note}");
//! }
//! ```
//!
//! ## Writing
//!
//! ```rust,ignore
//! use serde_json::json;
//!
//! let notes = client.endpoint("note")?;
//!
//! // POST, then re-fetch the Location the service points at
//! let note = notes
//!     .create(json!({"title": "New note", "user": "/api/v1/user/1/"}))
//!     .await?;
//!
//! // PATCH, then re-fetch; the returned copy is the server's state
//! let note = note.update(json!({"title": "Renamed"})).await?;
//!
//! // DELETE; the local copy refuses further mutations
//! let mut note = note;
//! note.delete().await?;
//! ```
//!
//! ## Authentication
//!
//! Credentials are applied at the transport boundary and are opaque to
//! the resource layer:
//!
//! ```rust
//! use tastypie_client::{Auth, ClientConfig, ServiceUrl};
//!
//! let config = ClientConfig::builder()
//!     .service_url(ServiceUrl::new("http://localhost:8000/api/v1/").unwrap())
//!     .auth(Auth::ApiKey {
//!         username: "worker".to_string(),
//!         key: "d65b0b...".to_string(),
//!     })
//!     .build()
//!     .unwrap();
//! ```
//!
//! ## Design Principles
//!
//! - **No global state**: The endpoint registry is client-owned,
//!   discovered once at construction and immutable afterwards
//! - **Fail-fast validation**: Configuration newtypes validate on
//!   construction; malformed resource URLs are errors, not garbage
//! - **Memoize-once laziness**: Every placeholder resolves at most once
//!   per instance; caches only grow and are never invalidated
//! - **Exact status contracts**: Each operation requires the one status
//!   code Tastypie documents for it; anything else is a typed error
//!   carrying the service's message
//! - **Thread-safe**: All types are `Send + Sync`; clients and endpoints
//!   are cheap handles over shared state

pub mod clients;
pub mod config;
pub mod error;
pub mod rest;

// Re-export public types at crate root for convenience
pub use config::{Auth, ClientConfig, ClientConfigBuilder, ServiceUrl};
pub use error::ConfigError;

// Re-export HTTP transport types
pub use clients::{
    BadHttpStatus, HttpClient, HttpError, HttpMethod, HttpRequest, HttpRequestBuilder,
    HttpResponse, InvalidHttpRequestError,
};

// Re-export resource layer types
pub use rest::{
    ApiClient, ApiError, Endpoint, FieldValue, Filters, PagedResult, Resource, ResourceRef,
    ResourceRefList, UrlParser, DEFAULT_CHUNK_SIZE,
};
