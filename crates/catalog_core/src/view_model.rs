use crate::{Filters, ListingPhase, PriceType, ToolSummary};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ListingViewModel {
    pub phase: ListingPhase,
    pub rows: Vec<ToolRowView>,
    pub current_page: u32,
    pub total_count: Option<u64>,
    pub has_more: bool,
    pub is_initial_loading: bool,
    pub is_loading_more: bool,
    pub error: Option<String>,
    pub filters: Filters,
    pub dirty: bool,
}

/// Tags shown on a listing card.
pub const CARD_TAG_LIMIT: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolRowView {
    pub id: String,
    pub name: String,
    pub category: String,
    pub price_type: PriceType,
    pub tags: Vec<String>,
    pub description: String,
}

impl From<&ToolSummary> for ToolRowView {
    fn from(tool: &ToolSummary) -> Self {
        Self {
            id: tool.id.clone(),
            name: tool.name.clone(),
            category: tool.category.clone(),
            price_type: tool.price_type,
            tags: tool.tags.iter().take(CARD_TAG_LIMIT).cloned().collect(),
            description: tool.description.clone(),
        }
    }
}
