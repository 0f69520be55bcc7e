use std::time::Duration;

use crate::{FetchClass, ListingQuery, RequestId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    FetchPage {
        request_id: RequestId,
        class: FetchClass,
        query: ListingQuery,
    },
    CancelFetch { request_id: RequestId },
    /// Deliver `Msg::DebounceElapsed { generation }` after `delay`.
    ScheduleDebounce { generation: u64, delay: Duration },
}
