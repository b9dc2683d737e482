use std::sync::Arc;

use tokio::sync::{mpsc, RwLock};
use tokio::task::JoinHandle;

use crate::store::history::SearchHistoryStore;

/// Maximum number of search terms retained
pub const RECENT_SEARCH_CAPACITY: usize = 5;

/// Bounded, deduplicated history of the user's recent search terms
///
/// Terms are kept most-recent-first with a fixed capacity of five. Recording
/// a term already present moves it to the front instead of duplicating it.
/// Every mutation queues a snapshot for a background writer task, so callers
/// never wait on the store; a failed write is logged and otherwise ignored,
/// the in-memory sequence stays authoritative for the session.
#[derive(Clone)]
pub struct RecentSearchCache {
    terms: Arc<RwLock<Vec<String>>>,
    write_tx: mpsc::UnboundedSender<String>,
}

/// Handle for gracefully shutting down the history writer
pub struct HistoryWriterHandle {
    shutdown_tx: mpsc::Sender<()>,
    task: JoinHandle<()>,
}

impl HistoryWriterHandle {
    /// Signals the writer task and waits for it to flush pending writes
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(()).await;
        let _ = self.task.await;
        tracing::debug!("History writer stopped");
    }
}

impl RecentSearchCache {
    /// Opens the cache over a history store and starts the writer task
    ///
    /// The persisted payload is read once here. A malformed payload is
    /// treated as absent rather than an error: search history is a
    /// convenience, so the cache fails open to empty.
    pub fn open(store: Arc<dyn SearchHistoryStore>) -> (Self, HistoryWriterHandle) {
        let terms = Self::load(store.as_ref());

        let (write_tx, write_rx) = mpsc::unbounded_channel();
        let (shutdown_tx, shutdown_rx) = mpsc::channel(1);

        let writer_store = Arc::clone(&store);
        let task = tokio::spawn(async move {
            Self::history_writer_task(writer_store, write_rx, shutdown_rx).await;
        });

        let cache = Self {
            terms: Arc::new(RwLock::new(terms)),
            write_tx,
        };

        (cache, HistoryWriterHandle { shutdown_tx, task })
    }

    /// Reads and decodes the persisted term sequence
    fn load(store: &dyn SearchHistoryStore) -> Vec<String> {
        let payload = match store.read() {
            Ok(Some(payload)) => payload,
            Ok(None) => return Vec::new(),
            Err(e) => {
                tracing::warn!(error = %e, "Could not read search history, starting empty");
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<String>>(&payload) {
            Ok(mut terms) => {
                terms.truncate(RECENT_SEARCH_CAPACITY);
                terms
            }
            Err(e) => {
                tracing::warn!(error = %e, "Malformed search history, starting empty");
                Vec::new()
            }
        }
    }

    /// Background task that persists snapshots as they arrive
    ///
    /// On shutdown, drains whatever is still queued before exiting so the
    /// last mutation reaches the store.
    async fn history_writer_task(
        store: Arc<dyn SearchHistoryStore>,
        mut write_rx: mpsc::UnboundedReceiver<String>,
        mut shutdown_rx: mpsc::Receiver<()>,
    ) {
        loop {
            tokio::select! {
                Some(payload) = write_rx.recv() => {
                    if let Err(e) = store.write(&payload) {
                        tracing::warn!(error = %e, "Failed to persist search history");
                    }
                }
                _ = shutdown_rx.recv() => {
                    while let Ok(payload) = write_rx.try_recv() {
                        if let Err(e) = store.write(&payload) {
                            tracing::warn!(error = %e, "Failed to flush search history");
                        }
                    }
                    break;
                }
            }
        }
    }

    /// Queues the current sequence for persistence without blocking
    fn persist(&self, terms: &[String]) {
        let payload = match serde_json::to_string(terms) {
            Ok(json) => json,
            Err(e) => {
                tracing::error!(error = %e, "Search history serialization error");
                return;
            }
        };

        if self.write_tx.send(payload).is_err() {
            tracing::warn!("History writer is gone, search history not persisted");
        }
    }

    /// Records a search term at the front of the history
    ///
    /// An existing occurrence moves to the front rather than duplicating,
    /// and the oldest term beyond capacity is dropped. Blank terms are
    /// ignored. Returns the resulting sequence.
    pub async fn record(&self, term: &str) -> Vec<String> {
        let term = term.trim();

        let mut terms = self.terms.write().await;
        if term.is_empty() {
            return terms.clone();
        }

        terms.retain(|existing| existing != term);
        terms.insert(0, term.to_string());
        terms.truncate(RECENT_SEARCH_CAPACITY);

        let snapshot = terms.clone();
        drop(terms);

        tracing::debug!(term = %term, terms = snapshot.len(), "Search term recorded");

        self.persist(&snapshot);
        snapshot
    }

    /// Removes a term from the history
    ///
    /// Absent terms are a no-op and nothing is written.
    pub async fn remove(&self, term: &str) -> Vec<String> {
        let mut terms = self.terms.write().await;

        let position = match terms.iter().position(|existing| existing == term) {
            Some(position) => position,
            None => return terms.clone(),
        };
        terms.remove(position);

        let snapshot = terms.clone();
        drop(terms);

        self.persist(&snapshot);
        snapshot
    }

    /// Current terms, most recent first
    pub async fn terms(&self) -> Vec<String> {
        self.terms.read().await.clone()
    }
}
