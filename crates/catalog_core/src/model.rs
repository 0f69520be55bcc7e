use std::fmt;

use serde::Deserialize;

pub type ToolId = String;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub enum PriceType {
    Free,
    Paid,
    Freemium,
}

impl fmt::Display for PriceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PriceType::Free => write!(f, "Free"),
            PriceType::Paid => write!(f, "Paid"),
            PriceType::Freemium => write!(f, "Freemium"),
        }
    }
}

/// One row of the public listing, as returned by `GET /tools`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ToolSummary {
    pub id: ToolId,
    pub name: String,
    pub description: String,
    pub category: String,
    pub price_type: PriceType,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Full record behind the tool detail view (`GET /tools/{id}`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ToolDetail {
    #[serde(flatten)]
    pub summary: ToolSummary,
    pub website_url: String,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default)]
    pub featured_order: Option<i64>,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

fn default_active() -> bool {
    true
}
