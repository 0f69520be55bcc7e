use crate::{Filters, ListingError, ListingPage, RequestId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Start the listing over with these filters right away.
    Initialize(Filters),
    /// User edited a filter control; evaluated once the debounce window settles.
    FiltersChanged(Filters),
    /// Debounce timer for `generation` fired.
    DebounceElapsed { generation: u64 },
    /// User asked for the next page.
    LoadMoreRequested,
    /// Abort everything in flight (teardown or explicit cancel).
    CancelRequested,
    /// Engine completion for a page fetch.
    PageLoaded {
        request_id: RequestId,
        result: Result<ListingPage, ListingError>,
    },
}
