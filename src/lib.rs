//! App Store catalog client
//!
//! Queries the public iTunes/App Store endpoints and normalizes what they
//! return:
//! - App details by track id or bundle id, with screenshot and ratings enrichment
//! - Paginated search, optionally ids only
//! - Ratings histogram, version history and privacy labels scraped from HTML
//! - Autocomplete suggestions (XML plist)
//! - Developer catalogs and customer reviews
//!
//! All network access goes through the [`Transport`] trait. The HTML
//! extractors are also exposed on their own, and everything is reachable
//! from C through a JSON-over-FFI interface.

pub mod client;
pub mod config;
mod enrich;
pub mod error;
pub mod extractors;
pub mod ffi;
pub mod models;
pub mod normalize;
pub mod paginate;
pub mod reviews;
pub mod storefront;
pub mod suggest;
pub mod transport;
pub mod validate;

pub use client::{
    AppPageRequest, AppRequest, AppStore, DeveloperRequest, ReviewsRequest, SearchRequest,
    SuggestRequest,
};
pub use config::{ClientConfig, Endpoints, RequestOptions};
pub use error::{Error, Result};
pub use extractors::{
    extract_privacy, extract_ratings, extract_screenshots, extract_version_history, MarkupVersion,
};
pub use ffi::*;
pub use models::*;
pub use reviews::ReviewSort;
pub use storefront::storefront;
pub use transport::{HttpRequest, HttpResponse, Transport, UreqTransport};
