//! Search for VeloCommerce.
//!
//! Thin adapter over the external search index, with an in-memory
//! TTL-cached fallback scorer for deployments that do not use one. The
//! fallback favors availability over freshness: a failed snapshot reload
//! serves the stale snapshot rather than failing the search.

pub mod error;
pub mod fallback;
pub mod index;
pub mod service;
pub mod source;
pub mod typeahead;

pub use error::SearchError;
pub use fallback::{FallbackIndex, SnapshotCache, SNAPSHOT_TTL};
pub use index::{Highlight, SearchHit, SearchIndex, SearchRequest, SearchResponse};
pub use service::SearchService;
pub use source::ProductSource;
pub use typeahead::{Ticket, Typeahead};
