use crate::{Effect, FetchClass, Filters, ListingState, Msg, RequestId};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: ListingState, msg: Msg) -> (ListingState, Vec<Effect>) {
    let effects = match msg {
        Msg::Initialize(filters) => initialize(&mut state, filters),
        Msg::FiltersChanged(filters) => {
            let generation = state.stage_filters(filters);
            vec![Effect::ScheduleDebounce {
                generation,
                delay: state.config().debounce,
            }]
        }
        Msg::DebounceElapsed { generation } => match state.take_settled_filters(generation) {
            // Compared against the filters of the last replace, so a burst
            // that ends where it started issues nothing.
            Some(filters) if &filters != state.filters() => initialize(&mut state, filters),
            _ => Vec::new(),
        },
        Msg::LoadMoreRequested => match state.start_append() {
            Some((request_id, query)) => vec![Effect::FetchPage {
                request_id,
                class: FetchClass::Append,
                query,
            }],
            None => Vec::new(),
        },
        Msg::CancelRequested => cancel_effects(state.cancel_all()),
        Msg::PageLoaded { request_id, result } => {
            state.apply_result(request_id, result);
            Vec::new()
        }
    };

    (state, effects)
}

fn initialize(state: &mut ListingState, filters: Filters) -> Vec<Effect> {
    state.abandon_debounce();
    let mut effects = cancel_effects(state.abandon_in_flight());
    let (request_id, query) = state.start_replace(filters);
    effects.push(Effect::FetchPage {
        request_id,
        class: FetchClass::Replace,
        query,
    });
    effects
}

fn cancel_effects(request_ids: Vec<RequestId>) -> Vec<Effect> {
    request_ids
        .into_iter()
        .map(|request_id| Effect::CancelFetch { request_id })
        .collect()
}
