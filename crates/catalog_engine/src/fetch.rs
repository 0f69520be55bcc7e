use std::sync::Arc;
use std::time::Duration;

use catalog_core::{ListingPage, ListingQuery, ToolDetail, ToolSummary};
use catalog_logging::catalog_debug;
use futures_util::StreamExt;
use reqwest::header::{HeaderMap, ACCEPT, AUTHORIZATION};
use reqwest::Url;

use crate::endpoint::{endpoint_url, listing_url};
use crate::normalize::{decode_json, normalize_listing, parse_total_header};
use crate::{CredentialProvider, FailureKind, FetchError, NoCredentials};

/// Query parameter name the backend reads the page size from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PageSizeParam {
    #[default]
    PageSize,
    Limit,
}

impl PageSizeParam {
    pub fn as_str(self) -> &'static str {
        match self {
            PageSizeParam::PageSize => "page_size",
            PageSizeParam::Limit => "limit",
        }
    }
}

#[derive(Debug, Clone)]
pub struct FetchSettings {
    /// API root, e.g. `http://localhost:8000/api`.
    pub base_url: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub max_bytes: u64,
    pub page_size_param: PageSizeParam,
    /// Response header carrying an out-of-band total count.
    pub total_count_header: String,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000/api".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            max_bytes: 5 * 1024 * 1024,
            page_size_param: PageSizeParam::PageSize,
            total_count_header: "X-Total-Count".to_string(),
        }
    }
}

#[async_trait::async_trait]
pub trait ListingFetcher: Send + Sync {
    async fn fetch_page(&self, query: &ListingQuery) -> Result<ListingPage, FetchError>;
}

struct RawResponse {
    body: Vec<u8>,
    headers: HeaderMap,
}

#[derive(Clone)]
pub struct ReqwestFetcher {
    settings: FetchSettings,
    client: reqwest::Client,
    credentials: Arc<dyn CredentialProvider>,
}

impl ReqwestFetcher {
    pub fn new(settings: FetchSettings) -> Result<Self, FetchError> {
        Self::with_credentials(settings, Arc::new(NoCredentials))
    }

    pub fn with_credentials(
        settings: FetchSettings,
        credentials: Arc<dyn CredentialProvider>,
    ) -> Result<Self, FetchError> {
        // Fail on a bad base URL here rather than on the first request.
        endpoint_url(&settings.base_url, &[])?;
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| FetchError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self {
            settings,
            client,
            credentials,
        })
    }

    pub async fn fetch_tool(&self, tool_id: &str) -> Result<ToolDetail, FetchError> {
        let url = endpoint_url(&self.settings.base_url, &["tools", tool_id])?;
        let response = self.get(url).await?;
        decode_json(&response.body)
    }

    pub async fn fetch_featured(&self) -> Result<Vec<ToolSummary>, FetchError> {
        let url = endpoint_url(&self.settings.base_url, &["tools", "featured"])?;
        let response = self.get(url).await?;
        decode_json(&response.body)
    }

    pub async fn fetch_categories(&self) -> Result<Vec<String>, FetchError> {
        let url = endpoint_url(&self.settings.base_url, &["categories"])?;
        let response = self.get(url).await?;
        decode_json(&response.body)
    }

    pub async fn fetch_price_types(&self) -> Result<Vec<String>, FetchError> {
        let url = endpoint_url(&self.settings.base_url, &["price-types"])?;
        let response = self.get(url).await?;
        decode_json(&response.body)
    }

    async fn get(&self, url: Url) -> Result<RawResponse, FetchError> {
        catalog_debug!("GET {}", url);
        let mut request = self.client.get(url).header(ACCEPT, "application/json");
        if let Some(value) = self.credentials.authorization() {
            request = request.header(AUTHORIZATION, value);
        }
        let response = request.send().await.map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        if let Some(content_len) = response.content_length() {
            if content_len > self.settings.max_bytes {
                return Err(self.too_large(Some(content_len)));
            }
        }

        let headers = response.headers().clone();
        let mut body = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = body.len() as u64 + chunk.len() as u64;
            if next_len > self.settings.max_bytes {
                return Err(self.too_large(Some(next_len)));
            }
            body.extend_from_slice(&chunk);
        }

        Ok(RawResponse { body, headers })
    }

    fn too_large(&self, actual: Option<u64>) -> FetchError {
        FetchError::new(
            FailureKind::TooLarge {
                max_bytes: self.settings.max_bytes,
                actual,
            },
            "response too large",
        )
    }

    fn header_total(&self, headers: &HeaderMap) -> Option<u64> {
        headers
            .get(self.settings.total_count_header.as_str())
            .and_then(|value| value.to_str().ok())
            .and_then(parse_total_header)
    }
}

#[async_trait::async_trait]
impl ListingFetcher for ReqwestFetcher {
    async fn fetch_page(&self, query: &ListingQuery) -> Result<ListingPage, FetchError> {
        let url = listing_url(&self.settings, query)?;
        let response = self.get(url).await?;
        let header_total = self.header_total(&response.headers);
        let page = normalize_listing(&response.body, header_total, query.page_size)?;
        catalog_debug!(
            "Listing page {} received {} items (total {:?})",
            query.page,
            page.received(),
            page.total
        );
        Ok(page)
    }
}

fn map_reqwest_error(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        return FetchError::new(FailureKind::Timeout, err.to_string());
    }
    FetchError::new(FailureKind::Network, err.to_string())
}
