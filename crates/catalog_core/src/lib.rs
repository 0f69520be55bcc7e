//! Catalog core: pure listing state machine and view-model helpers.
mod effect;
mod error;
mod model;
mod msg;
mod query;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use error::{ListingError, NetworkFailure};
pub use model::{PriceType, ToolDetail, ToolId, ToolSummary};
pub use msg::Msg;
pub use query::{merge_unique, Filters, ListingPage, ListingQuery, ALL_FILTER};
pub use state::{
    FetchClass, ListingConfig, ListingPhase, ListingState, RequestId, DEFAULT_DEBOUNCE,
    DEFAULT_PAGE_SIZE,
};
pub use update::update;
pub use view_model::{ListingViewModel, ToolRowView, CARD_TAG_LIMIT};
