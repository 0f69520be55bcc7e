//! Loading of `catalog.ron` and merging with command-line overrides.

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use catalog_core::ListingConfig;
use catalog_engine::{FetchSettings, PageSizeParam};
use catalog_logging::{catalog_info, catalog_warn};
use serde::Deserialize;

use crate::cli::Cli;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum PageSizeParamSetting {
    PageSize,
    Limit,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub base_url: String,
    pub page_size: u32,
    pub debounce_ms: u64,
    pub request_timeout_secs: u64,
    pub page_size_param: PageSizeParamSetting,
    pub total_count_header: String,
    pub token: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        let fetch = FetchSettings::default();
        let listing = ListingConfig::default();
        Self {
            base_url: fetch.base_url,
            page_size: listing.page_size,
            debounce_ms: listing.debounce.as_millis() as u64,
            request_timeout_secs: fetch.request_timeout.as_secs(),
            page_size_param: PageSizeParamSetting::PageSize,
            total_count_header: fetch.total_count_header,
            token: None,
        }
    }
}

impl AppConfig {
    /// Reads the config file, or returns defaults when it does not exist.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                catalog_info!("No config at {:?}; using defaults", path);
                return Ok(Self::default());
            }
            Err(err) => {
                return Err(err).with_context(|| format!("reading config {}", path.display()));
            }
        };
        let config: AppConfig =
            ron::from_str(&content).with_context(|| format!("parsing config {}", path.display()))?;
        catalog_info!("Loaded config from {:?}", path);
        Ok(config)
    }

    pub fn with_overrides(mut self, cli: &Cli) -> Self {
        if let Some(base_url) = &cli.base_url {
            self.base_url = base_url.clone();
        }
        if let Some(page_size) = cli.page_size {
            self.page_size = page_size;
        }
        if self.page_size == 0 {
            catalog_warn!("page_size 0 is not usable; falling back to the default");
            self.page_size = ListingConfig::default().page_size;
        }
        self
    }

    pub fn fetch_settings(&self) -> FetchSettings {
        FetchSettings {
            base_url: self.base_url.clone(),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            page_size_param: match self.page_size_param {
                PageSizeParamSetting::PageSize => PageSizeParam::PageSize,
                PageSizeParamSetting::Limit => PageSizeParam::Limit,
            },
            total_count_header: self.total_count_header.clone(),
            ..FetchSettings::default()
        }
    }

    pub fn listing_config(&self) -> ListingConfig {
        ListingConfig {
            page_size: self.page_size,
            debounce: Duration::from_millis(self.debounce_ms),
        }
    }

    /// Upper bound for waiting on one fetch to settle.
    pub fn settle_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs) + Duration::from_millis(self.debounce_ms)
    }
}
