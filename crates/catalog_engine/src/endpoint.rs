use catalog_core::ListingQuery;
use url::Url;

use crate::{FailureKind, FetchError, FetchSettings};

/// Joins `segments` onto the base URL, percent-encoding each one.
pub fn endpoint_url(base_url: &str, segments: &[&str]) -> Result<Url, FetchError> {
    let mut url = Url::parse(base_url)
        .map_err(|err| FetchError::new(FailureKind::InvalidUrl, err.to_string()))?;
    {
        let mut path = url
            .path_segments_mut()
            .map_err(|_| FetchError::new(FailureKind::InvalidUrl, "base url cannot hold a path"))?;
        path.pop_if_empty().extend(segments);
    }
    Ok(url)
}

/// `GET {base}/tools` URL for one listing page.
pub fn listing_url(settings: &FetchSettings, query: &ListingQuery) -> Result<Url, FetchError> {
    let mut url = endpoint_url(&settings.base_url, &["tools"])?;
    {
        let mut pairs = url.query_pairs_mut();
        for (name, value) in query.filter_params() {
            pairs.append_pair(name, value);
        }
        pairs.append_pair("page", &query.page.to_string());
        pairs.append_pair(
            settings.page_size_param.as_str(),
            &query.page_size.to_string(),
        );
    }
    Ok(url)
}
