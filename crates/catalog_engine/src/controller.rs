use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};

use catalog_core::{
    update, Effect, FetchClass, Filters, ListingConfig, ListingError, ListingState,
    ListingViewModel, Msg,
};
use catalog_logging::{catalog_debug, catalog_info, catalog_warn};

use crate::{EngineEvent, EngineHandle, ListingFetcher};

/// Drives the listing state machine: public operations and engine events
/// are turned into messages for [`update`], and the resulting effects are
/// executed on the engine.
///
/// State is only mutated here, on the owning thread. Settled fetches are
/// picked up by [`pump`](Self::pump) or [`wait_for_event`](Self::wait_for_event).
pub struct ListingController {
    state: ListingState,
    engine: EngineHandle,
}

impl ListingController {
    pub fn new(fetcher: Arc<dyn ListingFetcher>, config: ListingConfig) -> io::Result<Self> {
        Ok(Self {
            state: ListingState::new(config),
            engine: EngineHandle::new(fetcher)?,
        })
    }

    pub fn initialize(&mut self, filters: Filters) {
        self.dispatch(Msg::Initialize(filters));
    }

    pub fn apply_filters(&mut self, filters: Filters) {
        self.dispatch(Msg::FiltersChanged(filters));
    }

    pub fn load_more(&mut self) {
        self.dispatch(Msg::LoadMoreRequested);
    }

    pub fn has_more(&self) -> bool {
        self.state.has_more()
    }

    pub fn cancel(&mut self) {
        self.dispatch(Msg::CancelRequested);
    }

    pub fn state(&self) -> &ListingState {
        &self.state
    }

    pub fn view(&self) -> ListingViewModel {
        self.state.view()
    }

    pub fn consume_dirty(&mut self) -> bool {
        self.state.consume_dirty()
    }

    /// Applies every event that has already settled. Never blocks.
    pub fn pump(&mut self) -> usize {
        let mut applied = 0;
        while let Some(event) = self.engine.try_recv() {
            self.handle_event(event);
            applied += 1;
        }
        applied
    }

    /// Blocks up to `timeout` for the next event, then drains the rest.
    /// Returns `false` if nothing arrived in time.
    pub fn wait_for_event(&mut self, timeout: Duration) -> bool {
        match self.engine.recv_timeout(timeout) {
            Some(event) => {
                self.handle_event(event);
                self.pump();
                true
            }
            None => false,
        }
    }

    /// Waits until no fetch is in flight and no filter change is pending.
    pub fn wait_until_settled(&mut self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        while self.is_busy() {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() || !self.wait_for_event(remaining) {
                return !self.is_busy();
            }
        }
        true
    }

    fn is_busy(&self) -> bool {
        self.state.is_initial_loading()
            || self.state.is_loading_more()
            || self.state.has_pending_filters()
    }

    fn dispatch(&mut self, msg: Msg) {
        let state = std::mem::take(&mut self.state);
        let (state, effects) = update(state, msg);
        self.state = state;
        self.run_effects(effects);
    }

    fn run_effects(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::FetchPage {
                    request_id,
                    class,
                    query,
                } => {
                    match class {
                        FetchClass::Replace => catalog_info!(
                            "Replace fetch request_id={} filters={:?}",
                            request_id,
                            query.filter_params()
                        ),
                        FetchClass::Append => catalog_info!(
                            "Append fetch request_id={} page={}",
                            request_id,
                            query.page
                        ),
                    }
                    self.engine.fetch(request_id, query);
                }
                Effect::CancelFetch { request_id } => self.engine.cancel(request_id),
                Effect::ScheduleDebounce { generation, delay } => {
                    self.engine.schedule_debounce(generation, delay);
                }
            }
        }
    }

    fn handle_event(&mut self, event: EngineEvent) {
        match event {
            EngineEvent::PageFetched { request_id, result } => {
                let result = result.map_err(|err| {
                    let listing_err = ListingError::from(err.clone());
                    if listing_err.is_canceled() {
                        catalog_debug!("Listing request {} cancelled", request_id);
                    } else {
                        catalog_warn!("Listing request {} failed: {}", request_id, err);
                    }
                    listing_err
                });
                self.dispatch(Msg::PageLoaded { request_id, result });
            }
            EngineEvent::DebounceElapsed { generation } => {
                self.dispatch(Msg::DebounceElapsed { generation });
            }
        }
    }
}

impl Drop for ListingController {
    fn drop(&mut self) {
        self.engine.cancel_all();
    }
}
