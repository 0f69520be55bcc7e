//! Catalog engine: HTTP fetching, response normalization and effect execution.
mod controller;
mod credentials;
mod endpoint;
mod engine;
mod fetch;
mod normalize;
mod types;

pub use controller::ListingController;
pub use credentials::{BearerToken, CredentialProvider, NoCredentials};
pub use endpoint::{endpoint_url, listing_url};
pub use engine::EngineHandle;
pub use fetch::{FetchSettings, ListingFetcher, PageSizeParam, ReqwestFetcher};
pub use normalize::{normalize_listing, parse_total_header, RawListing};
pub use types::{EngineEvent, FailureKind, FetchError};
