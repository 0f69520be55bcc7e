use std::collections::HashSet;

use crate::ToolSummary;

/// Sentinel the filter dropdowns use for "no filter".
pub const ALL_FILTER: &str = "All";

/// Listing filters. Always held in normalized form: `search` trimmed,
/// `"All"` and blank collapsed to an empty string.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Filters {
    search: String,
    category: String,
    price_type: String,
}

impl Filters {
    pub fn new(
        search: impl Into<String>,
        category: impl Into<String>,
        price_type: impl Into<String>,
    ) -> Self {
        Self {
            search: search.into().trim().to_string(),
            category: normalize_choice(category.into()),
            price_type: normalize_choice(price_type.into()),
        }
    }

    pub fn with_search(self, search: impl Into<String>) -> Self {
        Self::new(search, self.category, self.price_type)
    }

    pub fn with_category(self, category: impl Into<String>) -> Self {
        Self::new(self.search, category, self.price_type)
    }

    pub fn with_price_type(self, price_type: impl Into<String>) -> Self {
        Self::new(self.search, self.category, price_type)
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn price_type(&self) -> &str {
        &self.price_type
    }

    pub fn is_empty(&self) -> bool {
        self.search.is_empty() && self.category.is_empty() && self.price_type.is_empty()
    }
}

fn normalize_choice(raw: String) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(ALL_FILTER) {
        String::new()
    } else {
        trimmed.to_string()
    }
}

/// Everything needed to request one page of the listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingQuery {
    pub filters: Filters,
    /// 1-based page number.
    pub page: u32,
    pub page_size: u32,
}

impl ListingQuery {
    /// Filter parameters in wire order. Absent filters are omitted so the
    /// backend applies its own "no filter" default.
    pub fn filter_params(&self) -> Vec<(&'static str, &str)> {
        let mut params = Vec::with_capacity(3);
        if !self.filters.search.is_empty() {
            params.push(("search", self.filters.search.as_str()));
        }
        if !self.filters.category.is_empty() {
            params.push(("category", self.filters.category.as_str()));
        }
        if !self.filters.price_type.is_empty() {
            params.push(("price_type", self.filters.price_type.as_str()));
        }
        params
    }
}

/// Canonical page produced by response normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingPage {
    pub items: Vec<ToolSummary>,
    /// Total matching tools, when the backend reported one.
    pub total: Option<u64>,
    pub page_size: u32,
}

impl ListingPage {
    pub fn received(&self) -> usize {
        self.items.len()
    }

    pub fn is_full(&self) -> bool {
        self.page_size > 0 && self.items.len() >= self.page_size as usize
    }
}

/// Appends tools whose id is not yet present, preserving existing order.
/// Returns how many tools were appended.
pub fn merge_unique(items: &mut Vec<ToolSummary>, incoming: Vec<ToolSummary>) -> usize {
    let mut seen: HashSet<String> = items.iter().map(|tool| tool.id.clone()).collect();
    let before = items.len();
    for tool in incoming {
        if seen.insert(tool.id.clone()) {
            items.push(tool);
        }
    }
    items.len() - before
}
