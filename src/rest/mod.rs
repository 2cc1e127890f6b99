//! The resource layer: endpoints, resources, and lazy graph resolution.
//!
//! This module is the domain core of the crate. It turns the wire
//! conventions of a Tastypie service into a navigable resource graph:
//!
//! - **[`ApiClient`]**: Service discovery and request execution
//! - **[`Endpoint`]**: Per-resource-type operations (get, find, batch,
//!   filter, create)
//! - **[`Resource`]** and **[`FieldValue`]**: Materialized resources with
//!   tagged field values
//! - **[`ResourceRef`]** and **[`ResourceRefList`]**: Lazy relation
//!   placeholders, resolved on first access and memoized
//! - **[`PagedResult`]**: Cursor-following pagination over filtered
//!   listings
//! - **[`Filters`]**: Ordered `field__lookup` query parameters
//! - **[`UrlParser`]**: Resource URL classification and identity parsing
//!
//! # Example: Walking the Resource Graph
//!
//! ```rust,ignore
//! use tastypie_client::{ApiClient, ClientConfig, Filters, ServiceUrl};
//!
//! let config = ClientConfig::builder()
//!     .service_url(ServiceUrl::new("http://localhost:8000/api/v1/")?)
//!     .build()?;
//! let client = ApiClient::connect(config).await?;
//!
//! // Fetch a resource; its relations stay unfetched
//! let note = client.endpoint("note")?.get("1").await?;
//! println!("{}", note.get("title")?.as_str().unwrap_or(""));
//!
//! // Touching a relation resolves it, once
//! let author = note.get("user")?.as_resource_ref().unwrap();
//! let user = author.resolve().await?;
//!
//! // To-many relations resolve in batches of 20
//! let tags = note.get("tags")?.as_ref_list().unwrap();
//! for (id, tag) in tags.resolve().await? {
//!     match tag {
//!         Some(tag) => println!("{tag}"),
//!         None => println!("tag {id} is gone"),
//!     }
//! }
//!
//! // Listings follow pagination cursors on demand
//! let mut all_notes = client.endpoint("note")?.all().await?;
//! println!("{} notes total", all_notes.count());
//! let notes = all_notes.fetch_all().await?;
//! ```

mod api;
mod endpoint;
mod errors;
mod filters;
mod lazy;
mod paged;
mod resource;
mod url;

// Public exports
pub use api::ApiClient;
pub use endpoint::Endpoint;
pub use errors::ApiError;
pub use filters::Filters;
pub use lazy::{ResourceRef, ResourceRefList, DEFAULT_CHUNK_SIZE};
pub use paged::PagedResult;
pub use resource::{FieldValue, Resource};
pub use url::UrlParser;
