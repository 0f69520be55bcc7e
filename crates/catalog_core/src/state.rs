use std::time::Duration;

use crate::query::merge_unique;
use crate::view_model::{ListingViewModel, ToolRowView};
use crate::{Filters, ListingError, ListingPage, ListingQuery, ToolSummary};

pub type RequestId = u64;

pub const DEFAULT_PAGE_SIZE: u32 = 24;
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListingConfig {
    pub page_size: u32,
    pub debounce: Duration,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            debounce: DEFAULT_DEBOUNCE,
        }
    }
}

/// Request class. A replace fetch starts the list over, an append fetch
/// extends it with the next page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchClass {
    Replace,
    Append,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListingPhase {
    #[default]
    Idle,
    Loading,
    Ready,
    Errored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct InFlight {
    request_id: RequestId,
    page: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingState {
    config: ListingConfig,
    items: Vec<ToolSummary>,
    current_page: u32,
    total_count: Option<u64>,
    filters: Filters,
    phase: ListingPhase,
    last_error: Option<ListingError>,
    last_page_full: bool,
    exhausted: bool,
    replace_in_flight: Option<InFlight>,
    append_in_flight: Option<InFlight>,
    pending_filters: Option<Filters>,
    debounce_generation: u64,
    next_request_id: RequestId,
    dirty: bool,
}

impl Default for ListingState {
    fn default() -> Self {
        Self::new(ListingConfig::default())
    }
}

impl ListingState {
    pub fn new(config: ListingConfig) -> Self {
        Self {
            config,
            items: Vec::new(),
            current_page: 1,
            total_count: None,
            filters: Filters::default(),
            phase: ListingPhase::Idle,
            last_error: None,
            last_page_full: false,
            exhausted: false,
            replace_in_flight: None,
            append_in_flight: None,
            pending_filters: None,
            debounce_generation: 0,
            next_request_id: 1,
            dirty: false,
        }
    }

    pub fn config(&self) -> ListingConfig {
        self.config
    }

    pub fn items(&self) -> &[ToolSummary] {
        &self.items
    }

    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    pub fn total_count(&self) -> Option<u64> {
        self.total_count
    }

    pub fn filters(&self) -> &Filters {
        &self.filters
    }

    pub fn phase(&self) -> ListingPhase {
        self.phase
    }

    pub fn last_error(&self) -> Option<&ListingError> {
        self.last_error.as_ref()
    }

    pub fn is_initial_loading(&self) -> bool {
        self.replace_in_flight.is_some()
    }

    pub fn is_loading_more(&self) -> bool {
        self.append_in_flight.is_some()
    }

    pub fn has_pending_filters(&self) -> bool {
        self.pending_filters.is_some()
    }

    /// Whether another page may exist. A known total wins; otherwise a
    /// full last page suggests more.
    pub fn has_more(&self) -> bool {
        if self.exhausted {
            return false;
        }
        match self.total_count {
            Some(total) => (self.items.len() as u64) < total,
            None => self.last_page_full,
        }
    }

    pub fn in_flight_request_ids(&self) -> Vec<RequestId> {
        self.replace_in_flight
            .iter()
            .chain(self.append_in_flight.iter())
            .map(|flight| flight.request_id)
            .collect()
    }

    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub fn view(&self) -> ListingViewModel {
        ListingViewModel {
            phase: self.phase,
            rows: self.items.iter().map(ToolRowView::from).collect(),
            current_page: self.current_page,
            total_count: self.total_count,
            has_more: self.has_more(),
            is_initial_loading: self.is_initial_loading(),
            is_loading_more: self.is_loading_more(),
            error: self.last_error.as_ref().map(ToString::to_string),
            filters: self.filters.clone(),
            dirty: self.dirty,
        }
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    fn allocate_request_id(&mut self) -> RequestId {
        let id = self.next_request_id;
        self.next_request_id += 1;
        id
    }

    fn query_for(&self, page: u32) -> ListingQuery {
        ListingQuery {
            filters: self.filters.clone(),
            page,
            page_size: self.config.page_size,
        }
    }

    /// Drops every in-flight request and returns the ids to cancel.
    pub(crate) fn abandon_in_flight(&mut self) -> Vec<RequestId> {
        let ids = self.in_flight_request_ids();
        self.replace_in_flight = None;
        self.append_in_flight = None;
        ids
    }

    /// Invalidates any pending debounce timer.
    pub(crate) fn abandon_debounce(&mut self) {
        if self.pending_filters.take().is_some() {
            self.debounce_generation += 1;
        }
    }

    pub(crate) fn start_replace(&mut self, filters: Filters) -> (RequestId, ListingQuery) {
        self.filters = filters;
        self.items.clear();
        self.current_page = 1;
        self.total_count = None;
        self.last_error = None;
        self.last_page_full = false;
        self.exhausted = false;
        self.phase = ListingPhase::Loading;
        let request_id = self.allocate_request_id();
        self.replace_in_flight = Some(InFlight { request_id, page: 1 });
        self.mark_dirty();
        (request_id, self.query_for(1))
    }

    /// Starts an append fetch for the next page, or `None` when refused.
    pub(crate) fn start_append(&mut self) -> Option<(RequestId, ListingQuery)> {
        if !self.has_more() || self.replace_in_flight.is_some() || self.append_in_flight.is_some()
        {
            return None;
        }
        let page = self.current_page + 1;
        let request_id = self.allocate_request_id();
        self.append_in_flight = Some(InFlight { request_id, page });
        self.mark_dirty();
        Some((request_id, self.query_for(page)))
    }

    /// Records new pending filters and returns the generation the timer
    /// must carry to be honored.
    pub(crate) fn stage_filters(&mut self, filters: Filters) -> u64 {
        self.pending_filters = Some(filters);
        self.debounce_generation += 1;
        self.debounce_generation
    }

    /// Takes the pending filters if `generation` is the latest one.
    pub(crate) fn take_settled_filters(&mut self, generation: u64) -> Option<Filters> {
        if generation != self.debounce_generation {
            return None;
        }
        self.pending_filters.take()
    }

    /// Applies a completed fetch. Results for ids that are no longer in
    /// flight are ignored and leave the state untouched.
    pub(crate) fn apply_result(
        &mut self,
        request_id: RequestId,
        result: Result<ListingPage, ListingError>,
    ) {
        if self.replace_in_flight.map(|flight| flight.request_id) == Some(request_id) {
            self.replace_in_flight = None;
            self.apply_replace(result);
            self.mark_dirty();
        } else if let Some(flight) = self
            .append_in_flight
            .filter(|flight| flight.request_id == request_id)
        {
            self.append_in_flight = None;
            self.apply_append(flight.page, result);
            self.mark_dirty();
        }
    }

    fn apply_replace(&mut self, result: Result<ListingPage, ListingError>) {
        match result {
            Ok(page) => {
                self.last_page_full = page.is_full();
                self.total_count = page.total;
                self.items.clear();
                let added = merge_unique(&mut self.items, page.items);
                self.exhausted = added == 0;
                self.current_page = 1;
                self.last_error = None;
                self.phase = ListingPhase::Ready;
            }
            Err(ListingError::Canceled) => {
                self.phase = ListingPhase::Idle;
            }
            Err(err) => {
                self.items.clear();
                self.total_count = None;
                self.last_page_full = false;
                self.last_error = Some(err);
                self.phase = ListingPhase::Errored;
            }
        }
    }

    fn apply_append(&mut self, page_number: u32, result: Result<ListingPage, ListingError>) {
        match result {
            Ok(page) => {
                self.last_page_full = page.is_full();
                if page.total.is_some() {
                    self.total_count = page.total;
                }
                let added = merge_unique(&mut self.items, page.items);
                if added == 0 {
                    self.exhausted = true;
                }
                self.current_page = page_number;
                self.last_error = None;
            }
            Err(ListingError::Canceled) => {}
            Err(err) => {
                self.last_error = Some(err);
            }
        }
    }

    /// Cancels everything without touching items, page, total or error.
    pub(crate) fn cancel_all(&mut self) -> Vec<RequestId> {
        self.abandon_debounce();
        let ids = self.abandon_in_flight();
        // A replace clears the list up front, so nothing is left to show.
        if self.phase == ListingPhase::Loading {
            self.phase = ListingPhase::Idle;
        }
        if !ids.is_empty() {
            self.mark_dirty();
        }
        ids
    }
}
