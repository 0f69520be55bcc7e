use std::sync::Once;
use std::time::Duration;

use catalog_core::{
    update, Effect, FetchClass, Filters, ListingConfig, ListingError, ListingPage, ListingPhase,
    ListingState, Msg, NetworkFailure, PriceType, RequestId, ToolSummary,
};
use pretty_assertions::assert_eq;

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(catalog_logging::initialize_for_tests);
}

fn tool(id: &str) -> ToolSummary {
    ToolSummary {
        id: id.to_string(),
        name: format!("Tool {id}"),
        description: "An AI tool".to_string(),
        category: "Chatbot".to_string(),
        price_type: PriceType::Freemium,
        image_url: None,
        tags: vec!["AI".to_string()],
    }
}

fn tools(prefix: &str, count: usize) -> Vec<ToolSummary> {
    (0..count).map(|i| tool(&format!("{prefix}{i}"))).collect()
}

fn bare(items: Vec<ToolSummary>) -> ListingPage {
    ListingPage {
        items,
        total: None,
        page_size: 24,
    }
}

fn fetch_ids(effects: &[Effect]) -> Vec<(RequestId, FetchClass, u32)> {
    effects
        .iter()
        .filter_map(|effect| match effect {
            Effect::FetchPage {
                request_id,
                class,
                query,
            } => Some((*request_id, *class, query.page)),
            _ => None,
        })
        .collect()
}

fn only_fetch(effects: &[Effect]) -> RequestId {
    let fetches = fetch_ids(effects);
    assert_eq!(fetches.len(), 1, "expected exactly one fetch in {effects:?}");
    fetches[0].0
}

fn initialized(page: ListingPage) -> ListingState {
    let (state, effects) = update(ListingState::default(), Msg::Initialize(Filters::default()));
    let request_id = only_fetch(&effects);
    let (state, _) = update(
        state,
        Msg::PageLoaded {
            request_id,
            result: Ok(page),
        },
    );
    state
}

fn network_error() -> ListingError {
    ListingError::Network(NetworkFailure::Transport("connection reset".to_string()))
}

#[test]
fn initialize_resets_and_fetches_first_page() {
    init_logging();
    let (mut state, effects) = update(
        ListingState::default(),
        Msg::Initialize(Filters::new("chat", "All", "")),
    );

    assert_eq!(state.phase(), ListingPhase::Loading);
    assert!(state.is_initial_loading());
    assert!(state.items().is_empty());
    assert_eq!(state.current_page(), 1);
    assert_eq!(state.total_count(), None);
    assert!(state.consume_dirty());
    match &effects[..] {
        [Effect::FetchPage {
            class: FetchClass::Replace,
            query,
            ..
        }] => {
            assert_eq!(query.page, 1);
            assert_eq!(query.page_size, 24);
            assert_eq!(query.filter_params(), vec![("search", "chat")]);
        }
        other => panic!("unexpected effects {other:?}"),
    }
}

#[test]
fn full_bare_page_then_short_page_ends_listing() {
    init_logging();
    let state = initialized(bare(tools("a", 24)));
    assert_eq!(state.phase(), ListingPhase::Ready);
    assert!(state.has_more());

    let (state, effects) = update(state, Msg::LoadMoreRequested);
    assert!(state.is_loading_more());
    let fetches = fetch_ids(&effects);
    assert_eq!(fetches.len(), 1);
    let (request_id, class, page) = fetches[0];
    assert_eq!((class, page), (FetchClass::Append, 2));

    let (state, _) = update(
        state,
        Msg::PageLoaded {
            request_id,
            result: Ok(bare(tools("b", 10))),
        },
    );
    assert_eq!(state.items().len(), 34);
    assert_eq!(state.current_page(), 2);
    assert!(!state.has_more());
    assert!(!state.is_loading_more());
}

#[test]
fn short_page_without_total_has_no_more() {
    init_logging();
    let state = initialized(bare(tools("a", 23)));
    assert!(!state.has_more());
}

#[test]
fn envelope_total_reached_makes_load_more_noop() {
    init_logging();
    let state = initialized(ListingPage {
        items: tools("a", 5),
        total: Some(5),
        page_size: 24,
    });
    assert!(!state.has_more());

    let before = state.clone();
    let (next, effects) = update(state, Msg::LoadMoreRequested);
    assert!(effects.is_empty());
    assert_eq!(next, before);
}

#[test]
fn known_total_drives_has_more_over_page_fullness() {
    init_logging();
    let state = initialized(ListingPage {
        items: tools("a", 10),
        total: Some(25),
        page_size: 10,
    });
    assert!(state.has_more());

    // Header-style total with a short page still reports more.
    let state = initialized(ListingPage {
        items: tools("a", 3),
        total: Some(40),
        page_size: 24,
    });
    assert!(state.has_more());
}

#[test]
fn append_skips_overlapping_ids_and_keeps_order() {
    init_logging();
    let state = initialized(bare(tools("a", 24)));
    let (state, effects) = update(state, Msg::LoadMoreRequested);
    let request_id = only_fetch(&effects);

    let mut overlapping = vec![tool("a22"), tool("a23")];
    overlapping.extend(tools("b", 3));
    overlapping.push(tool("b1"));
    let (state, _) = update(
        state,
        Msg::PageLoaded {
            request_id,
            result: Ok(bare(overlapping)),
        },
    );

    let ids: Vec<&str> = state.items().iter().map(|t| t.id.as_str()).collect();
    let mut expected: Vec<String> = (0..24).map(|i| format!("a{i}")).collect();
    expected.extend(["b0", "b1", "b2"].map(String::from));
    assert_eq!(ids, expected.iter().map(String::as_str).collect::<Vec<_>>());
}

#[test]
fn repeated_page_with_no_new_items_ends_listing() {
    init_logging();
    let page = tools("a", 24);
    let state = initialized(bare(page.clone()));
    let (state, effects) = update(state, Msg::LoadMoreRequested);
    let request_id = only_fetch(&effects);

    let (state, _) = update(
        state,
        Msg::PageLoaded {
            request_id,
            result: Ok(bare(page)),
        },
    );
    assert_eq!(state.items().len(), 24);
    assert!(!state.has_more());
}

#[test]
fn failed_load_more_keeps_items_and_retries_same_page() {
    init_logging();
    let state = initialized(bare(tools("a", 24)));
    let (state, effects) = update(state, Msg::LoadMoreRequested);
    let request_id = only_fetch(&effects);

    let (state, _) = update(
        state,
        Msg::PageLoaded {
            request_id,
            result: Err(network_error()),
        },
    );
    assert_eq!(state.items().len(), 24);
    assert_eq!(state.current_page(), 1);
    assert_eq!(state.last_error(), Some(&network_error()));
    assert_eq!(state.phase(), ListingPhase::Ready);

    let (state, effects) = update(state, Msg::LoadMoreRequested);
    let fetches = fetch_ids(&effects);
    assert_eq!(fetches.len(), 1);
    assert_eq!(fetches[0].2, 2);
    assert!(state.is_loading_more());
}

#[test]
fn failed_replace_clears_items_and_sets_error() {
    init_logging();
    let state = initialized(bare(tools("a", 24)));
    let (state, effects) = update(state, Msg::Initialize(Filters::default().with_search("x")));
    let request_id = only_fetch(&effects);

    let error = ListingError::MalformedResponse("expected array".to_string());
    let (state, _) = update(
        state,
        Msg::PageLoaded {
            request_id,
            result: Err(error.clone()),
        },
    );
    assert_eq!(state.phase(), ListingPhase::Errored);
    assert!(state.items().is_empty());
    assert_eq!(state.last_error(), Some(&error));
    assert!(!state.has_more());

    // Errored recovers through a fresh initialize.
    let (state, effects) = update(state, Msg::Initialize(Filters::default()));
    assert_eq!(fetch_ids(&effects).len(), 1);
    assert_eq!(state.phase(), ListingPhase::Loading);
    assert_eq!(state.last_error(), None);
}

#[test]
fn superseded_replace_result_is_ignored() {
    init_logging();
    let (state, first) = update(ListingState::default(), Msg::Initialize(Filters::default()));
    let first_id = only_fetch(&first);

    let (state, second) = update(
        state,
        Msg::Initialize(Filters::default().with_category("Chatbot")),
    );
    assert!(second.contains(&Effect::CancelFetch {
        request_id: first_id
    }));
    let second_id = only_fetch(&second);
    assert_ne!(first_id, second_id);

    let before = state.clone();
    let (state, effects) = update(
        state,
        Msg::PageLoaded {
            request_id: first_id,
            result: Ok(bare(tools("stale", 24))),
        },
    );
    assert!(effects.is_empty());
    assert_eq!(state, before);

    let (state, _) = update(
        state,
        Msg::PageLoaded {
            request_id: first_id,
            result: Err(network_error()),
        },
    );
    assert_eq!(state, before);

    let (state, _) = update(
        state,
        Msg::PageLoaded {
            request_id: second_id,
            result: Ok(bare(tools("fresh", 3))),
        },
    );
    assert_eq!(state.items().len(), 3);
    assert_eq!(state.items()[0].id, "fresh0");
}

#[test]
fn load_more_refused_while_replace_in_flight() {
    init_logging();
    let state = initialized(bare(tools("a", 24)));
    let (state, _) = update(state, Msg::Initialize(Filters::default().with_search("q")));
    let (state, effects) = update(state, Msg::LoadMoreRequested);
    assert!(effects.is_empty());
    assert!(!state.is_loading_more());
}

#[test]
fn second_load_more_refused_while_first_in_flight() {
    init_logging();
    let state = initialized(bare(tools("a", 24)));
    let (state, first) = update(state, Msg::LoadMoreRequested);
    assert_eq!(fetch_ids(&first).len(), 1);
    let (_, second) = update(state, Msg::LoadMoreRequested);
    assert!(second.is_empty());
}

#[test]
fn initialize_cancels_in_flight_append() {
    init_logging();
    let state = initialized(bare(tools("a", 24)));
    let (state, effects) = update(state, Msg::LoadMoreRequested);
    let append_id = only_fetch(&effects);

    let (state, effects) = update(state, Msg::Initialize(Filters::default().with_search("q")));
    assert_eq!(effects[0], Effect::CancelFetch { request_id: append_id });
    assert!(!state.is_loading_more());

    let before = state.clone();
    let (state, _) = update(
        state,
        Msg::PageLoaded {
            request_id: append_id,
            result: Ok(bare(tools("b", 10))),
        },
    );
    assert_eq!(state, before);
}

#[test]
fn debounce_burst_collapses_to_last_filters() {
    init_logging();
    let config = ListingConfig {
        page_size: 24,
        debounce: Duration::from_millis(300),
    };
    let state = ListingState::new(config);
    let mut generations = Vec::new();
    let mut state = state;
    for search in ["c", "ch", "cha", "chat"] {
        let (next, effects) = update(
            state,
            Msg::FiltersChanged(Filters::default().with_search(search)),
        );
        match &effects[..] {
            [Effect::ScheduleDebounce { generation, delay }] => {
                assert_eq!(*delay, Duration::from_millis(300));
                generations.push(*generation);
            }
            other => panic!("unexpected effects {other:?}"),
        }
        state = next;
    }
    assert!(state.has_pending_filters());

    let mut fetched = Vec::new();
    for generation in generations {
        let (next, effects) = update(state, Msg::DebounceElapsed { generation });
        for effect in effects {
            if let Effect::FetchPage { query, .. } = effect {
                fetched.push(query.filters.search().to_string());
            }
        }
        state = next;
    }
    assert_eq!(fetched, vec!["chat".to_string()]);
    assert!(!state.has_pending_filters());
}

#[test]
fn filter_round_trip_within_window_issues_no_extra_fetch() {
    init_logging();
    let all = Filters::default().with_category("All");
    let (state, effects) = update(ListingState::default(), Msg::Initialize(all.clone()));
    let request_id = only_fetch(&effects);
    let mut fetch_count = 1;
    let (state, _) = update(
        state,
        Msg::PageLoaded {
            request_id,
            result: Ok(bare(tools("a", 24))),
        },
    );

    let (state, _) = update(state, Msg::FiltersChanged(all.clone().with_category("Chatbot")));
    let (state, effects) = update(state, Msg::FiltersChanged(all));
    let generation = match &effects[..] {
        [Effect::ScheduleDebounce { generation, .. }] => *generation,
        other => panic!("unexpected effects {other:?}"),
    };
    let (state, effects) = update(state, Msg::DebounceElapsed { generation });
    fetch_count += fetch_ids(&effects).len();

    assert_eq!(fetch_count, 1);
    assert_eq!(state.items().len(), 24);
    assert_eq!(state.filters().category(), "");
}

#[test]
fn initialize_discards_pending_debounce() {
    init_logging();
    let (state, effects) = update(
        ListingState::default(),
        Msg::FiltersChanged(Filters::default().with_search("old")),
    );
    let generation = match &effects[..] {
        [Effect::ScheduleDebounce { generation, .. }] => *generation,
        other => panic!("unexpected effects {other:?}"),
    };
    let (state, _) = update(state, Msg::Initialize(Filters::default().with_search("new")));
    let (state, effects) = update(state, Msg::DebounceElapsed { generation });

    assert!(effects.is_empty());
    assert_eq!(state.filters().search(), "new");
}

#[test]
fn cancel_aborts_without_touching_listing() {
    init_logging();
    let state = initialized(bare(tools("a", 24)));
    let (state, effects) = update(state, Msg::LoadMoreRequested);
    let append_id = only_fetch(&effects);

    let (state, effects) = update(state, Msg::CancelRequested);
    assert_eq!(effects, vec![Effect::CancelFetch { request_id: append_id }]);
    assert_eq!(state.items().len(), 24);
    assert_eq!(state.current_page(), 1);
    assert_eq!(state.phase(), ListingPhase::Ready);
    assert!(!state.is_loading_more());
    assert!(state.has_more());

    let before = state.clone();
    let (state, _) = update(
        state,
        Msg::PageLoaded {
            request_id: append_id,
            result: Err(ListingError::Canceled),
        },
    );
    assert_eq!(state, before);
    assert_eq!(state.last_error(), None);
}

#[test]
fn cancel_discards_pending_debounce() {
    init_logging();
    let state = initialized(bare(tools("a", 24)));
    let (state, effects) = update(
        state,
        Msg::FiltersChanged(Filters::default().with_search("chat")),
    );
    let generation = match &effects[..] {
        [Effect::ScheduleDebounce { generation, .. }] => *generation,
        other => panic!("unexpected effects {other:?}"),
    };

    let (state, effects) = update(state, Msg::CancelRequested);
    assert!(effects.is_empty());
    assert!(!state.has_pending_filters());

    let (state, effects) = update(state, Msg::DebounceElapsed { generation });
    assert!(effects.is_empty());
    assert_eq!(state.filters().search(), "");
    assert_eq!(state.items().len(), 24);
    assert_eq!(state.phase(), ListingPhase::Ready);
}

#[test]
fn cancel_in_flight_replace_goes_idle() {
    init_logging();
    let (state, effects) = update(
        ListingState::default(),
        Msg::Initialize(Filters::default().with_category("Chatbot")),
    );
    let request_id = only_fetch(&effects);

    let (state, effects) = update(state, Msg::CancelRequested);
    assert_eq!(effects, vec![Effect::CancelFetch { request_id }]);
    assert_eq!(state.phase(), ListingPhase::Idle);
    assert!(!state.is_initial_loading());
    assert!(state.in_flight_request_ids().is_empty());

    // The page still arrives because the response raced the cancel.
    let before = state.clone();
    let (state, effects) = update(
        state,
        Msg::PageLoaded {
            request_id,
            result: Ok(bare(tools("late", 24))),
        },
    );
    assert!(effects.is_empty());
    assert_eq!(state, before);
    assert!(state.items().is_empty());
    assert_eq!(state.phase(), ListingPhase::Idle);
}

#[test]
fn load_more_before_any_response_is_refused() {
    init_logging();
    let state = ListingState::new(ListingConfig::default());
    let (next, effects) = update(state.clone(), Msg::LoadMoreRequested);

    assert_eq!(state, next);
    assert!(effects.is_empty());
}

#[test]
fn canceled_result_is_never_surfaced() {
    init_logging();
    let (state, effects) = update(ListingState::default(), Msg::Initialize(Filters::default()));
    let request_id = only_fetch(&effects);
    let (state, _) = update(
        state,
        Msg::PageLoaded {
            request_id,
            result: Err(ListingError::Canceled),
        },
    );
    assert_eq!(state.last_error(), None);
    assert_eq!(state.phase(), ListingPhase::Idle);
    assert!(!state.is_initial_loading());
}

#[test]
fn view_reflects_listing() {
    init_logging();
    let mut first = tool("a0");
    first.tags = vec!["AI".into(), "Chat".into(), "NLP".into()];
    let mut page = vec![first];
    page.extend(tools("b", 2));
    let state = initialized(ListingPage {
        items: page,
        total: Some(3),
        page_size: 24,
    });
    let view = state.view();

    assert_eq!(view.phase, ListingPhase::Ready);
    assert_eq!(view.rows.len(), 3);
    assert_eq!(view.rows[0].tags, vec!["AI".to_string(), "Chat".to_string()]);
    assert_eq!(view.total_count, Some(3));
    assert!(!view.has_more);
    assert!(view.error.is_none());
    assert!(view.dirty);
}
