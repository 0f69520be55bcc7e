use std::collections::HashMap;
use std::io;
use std::sync::{mpsc, Arc, Mutex, MutexGuard, PoisonError};
use std::thread;
use std::time::Duration;

use catalog_core::{ListingQuery, RequestId};
use catalog_logging::{catalog_debug, catalog_info};
use tokio_util::sync::CancellationToken;

use crate::fetch::ListingFetcher;
use crate::{EngineEvent, FetchError};

enum EngineCommand {
    Fetch {
        request_id: RequestId,
        query: ListingQuery,
    },
    Cancel {
        request_id: RequestId,
    },
    CancelAll,
    ScheduleDebounce {
        generation: u64,
        delay: Duration,
    },
}

type TokenMap = Arc<Mutex<HashMap<RequestId, CancellationToken>>>;

/// Runs listing fetches and timers on a background tokio runtime and
/// reports their outcomes as [`EngineEvent`]s.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    pub fn new(fetcher: Arc<dyn ListingFetcher>) -> io::Result<Self> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("catalog-engine")
            .enable_all()
            .build()?;

        thread::Builder::new()
            .name("catalog-engine-commands".to_string())
            .spawn(move || {
                let tokens: TokenMap = Arc::new(Mutex::new(HashMap::new()));
                while let Ok(command) = cmd_rx.recv() {
                    handle_command(&runtime, &fetcher, &tokens, &event_tx, command);
                }
                // Handle dropped: nothing can observe the results any more.
                cancel_all(&tokens);
            })?;

        Ok(Self { cmd_tx, event_rx })
    }

    pub fn fetch(&self, request_id: RequestId, query: ListingQuery) {
        let _ = self.cmd_tx.send(EngineCommand::Fetch { request_id, query });
    }

    pub fn cancel(&self, request_id: RequestId) {
        let _ = self.cmd_tx.send(EngineCommand::Cancel { request_id });
    }

    pub fn cancel_all(&self) {
        let _ = self.cmd_tx.send(EngineCommand::CancelAll);
    }

    pub fn schedule_debounce(&self, generation: u64, delay: Duration) {
        let _ = self
            .cmd_tx
            .send(EngineCommand::ScheduleDebounce { generation, delay });
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }
}

fn handle_command(
    runtime: &tokio::runtime::Runtime,
    fetcher: &Arc<dyn ListingFetcher>,
    tokens: &TokenMap,
    event_tx: &mpsc::Sender<EngineEvent>,
    command: EngineCommand,
) {
    match command {
        EngineCommand::Fetch { request_id, query } => {
            let token = CancellationToken::new();
            lock(tokens).insert(request_id, token.clone());
            let fetcher = fetcher.clone();
            let tokens = tokens.clone();
            let event_tx = event_tx.clone();
            runtime.spawn(async move {
                let result = tokio::select! {
                    _ = token.cancelled() => Err(FetchError::cancelled()),
                    result = fetcher.fetch_page(&query) => result,
                };
                lock(&tokens).remove(&request_id);
                let _ = event_tx.send(EngineEvent::PageFetched { request_id, result });
            });
        }
        EngineCommand::Cancel { request_id } => {
            if let Some(token) = lock(tokens).remove(&request_id) {
                catalog_debug!("Cancelling listing request {}", request_id);
                token.cancel();
            }
        }
        EngineCommand::CancelAll => cancel_all(tokens),
        EngineCommand::ScheduleDebounce { generation, delay } => {
            let event_tx = event_tx.clone();
            runtime.spawn(async move {
                tokio::time::sleep(delay).await;
                let _ = event_tx.send(EngineEvent::DebounceElapsed { generation });
            });
        }
    }
}

fn cancel_all(tokens: &TokenMap) {
    let drained: Vec<(RequestId, CancellationToken)> = lock(tokens).drain().collect();
    if !drained.is_empty() {
        catalog_info!("Cancelling {} in-flight listing requests", drained.len());
    }
    for (_, token) in drained {
        token.cancel();
    }
}

fn lock(tokens: &TokenMap) -> MutexGuard<'_, HashMap<RequestId, CancellationToken>> {
    tokens.lock().unwrap_or_else(PoisonError::into_inner)
}
