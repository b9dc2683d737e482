use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::{broadcast, RwLock};

use crate::{
    api::MovieApi,
    error::{AppError, AppResult},
    models::{ListEntry, ListKind, MovieId},
    session::SessionContext,
};

const EVENT_CHANNEL_CAPACITY: usize = 32;

/// Notification delivered to subscribers after every list operation
#[derive(Debug, Clone)]
pub enum ListEvent {
    /// The list now holds exactly these entries
    Updated {
        kind: ListKind,
        entries: Vec<ListEntry>,
    },
    /// An operation failed; any rollback has already been applied
    OperationFailed { kind: ListKind, message: String },
}

/// Per-list in-memory state
#[derive(Debug, Default)]
struct ListState {
    entries: Vec<ListEntry>,
    last_synced: Option<DateTime<Utc>>,
}

/// Keeps the watchlist and favorites consistent with the server
///
/// The server is the source of truth. Adds are confirmed remotely before
/// local state changes; removes are applied optimistically and rolled back
/// to their original position when the server rejects them. `load` replaces
/// a list wholesale and never merges, so optimistic edits of a stale
/// snapshot cannot drift.
///
/// Operations on one list are expected to be issued one at a time; if two
/// are in flight concurrently, the last response wins.
#[derive(Clone)]
pub struct ListSyncStore {
    api: Arc<dyn MovieApi>,
    session: SessionContext,
    inner: Arc<RwLock<HashMap<ListKind, ListState>>>,
    events: broadcast::Sender<ListEvent>,
}

impl ListSyncStore {
    /// Creates an empty store for one user session
    pub fn new(api: Arc<dyn MovieApi>, session: SessionContext) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);

        let mut lists = HashMap::new();
        lists.insert(ListKind::Watchlist, ListState::default());
        lists.insert(ListKind::Favorites, ListState::default());

        Self {
            api,
            session,
            inner: Arc::new(RwLock::new(lists)),
            events,
        }
    }

    /// Subscribe to state notifications
    ///
    /// Slow subscribers that fall behind the channel capacity miss events;
    /// the next `Updated` carries the full snapshot so they recover.
    pub fn subscribe(&self) -> broadcast::Receiver<ListEvent> {
        self.events.subscribe()
    }

    fn notify(&self, event: ListEvent) {
        // No subscribers is fine
        let _ = self.events.send(event);
    }

    /// Current entries of a list
    pub async fn entries(&self, kind: ListKind) -> Vec<ListEntry> {
        let lists = self.inner.read().await;
        lists
            .get(&kind)
            .map(|state| state.entries.clone())
            .unwrap_or_default()
    }

    /// Whether a movie is present in a list
    pub async fn contains(&self, kind: ListKind, movie_id: &MovieId) -> bool {
        let lists = self.inner.read().await;
        lists
            .get(&kind)
            .map(|state| state.entries.iter().any(|e| &e.movie_id == movie_id))
            .unwrap_or(false)
    }

    /// When the list was last replaced from the server
    pub async fn last_synced(&self, kind: ListKind) -> Option<DateTime<Utc>> {
        let lists = self.inner.read().await;
        lists.get(&kind).and_then(|state| state.last_synced)
    }

    /// Adds an entry to a list once the server confirms it
    ///
    /// Adding a movie already present is an idempotent no-op that skips the
    /// network entirely, so a double-click cannot create a duplicate row.
    /// On rejection local state is untouched and the server's message is
    /// carried in the error.
    pub async fn add(&self, kind: ListKind, entry: ListEntry) -> AppResult<Vec<ListEntry>> {
        if entry.movie_id.is_blank() {
            return Err(AppError::InvalidInput(
                "Movie id cannot be empty".to_string(),
            ));
        }

        if self.contains(kind, &entry.movie_id).await {
            tracing::debug!(
                username = %self.session.username,
                list = %kind,
                movie_id = %entry.movie_id,
                "Movie already in list, nothing to do"
            );
            return Ok(self.entries(kind).await);
        }

        if let Err(e) = self.api.add_to_list(kind, &entry).await {
            let message = e.user_message();
            tracing::warn!(
                username = %self.session.username,
                list = %kind,
                movie_id = %entry.movie_id,
                error = %e,
                "Add rejected, local state unchanged"
            );
            self.notify(ListEvent::OperationFailed {
                kind,
                message: message.clone(),
            });
            return Err(AppError::AddFailed {
                list: kind,
                message,
            });
        }

        let entries = {
            let mut lists = self.inner.write().await;
            let state = lists.entry(kind).or_default();
            // Re-check under the lock: a concurrent add may have won the race
            if !state.entries.iter().any(|e| e.movie_id == entry.movie_id) {
                state.entries.push(entry.clone());
            }
            state.entries.clone()
        };

        tracing::info!(
            username = %self.session.username,
            session_id = %self.session.session_id,
            list = %kind,
            movie_id = %entry.movie_id,
            entries = entries.len(),
            "Added to list"
        );

        self.notify(ListEvent::Updated {
            kind,
            entries: entries.clone(),
        });

        Ok(entries)
    }

    /// Removes a movie from a list, optimistically
    ///
    /// The entry disappears locally before the delete request goes out. If
    /// the server rejects the delete, the entry is reinserted at its
    /// original position; subscribers observe both transitions. Removing a
    /// movie that is not present is a no-op.
    pub async fn remove(&self, kind: ListKind, movie_id: &MovieId) -> AppResult<Vec<ListEntry>> {
        if movie_id.is_blank() {
            return Err(AppError::InvalidInput(
                "Movie id cannot be empty".to_string(),
            ));
        }

        // Phase one: drop the entry locally, remembering where it was
        let (removed, entries) = {
            let mut lists = self.inner.write().await;
            let state = lists.entry(kind).or_default();
            match state.entries.iter().position(|e| &e.movie_id == movie_id) {
                Some(position) => {
                    let entry = state.entries.remove(position);
                    (Some((position, entry)), state.entries.clone())
                }
                None => (None, state.entries.clone()),
            }
        };

        let (position, entry) = match removed {
            Some(removed) => removed,
            None => {
                tracing::debug!(
                    username = %self.session.username,
                    list = %kind,
                    movie_id = %movie_id,
                    "Movie not in list, nothing to do"
                );
                return Ok(entries);
            }
        };

        self.notify(ListEvent::Updated {
            kind,
            entries: entries.clone(),
        });

        // Phase two: confirm with the server, rolling back on rejection
        if let Err(e) = self.api.remove_from_list(kind, movie_id).await {
            let message = e.user_message();

            let entries = {
                let mut lists = self.inner.write().await;
                let state = lists.entry(kind).or_default();
                let position = position.min(state.entries.len());
                state.entries.insert(position, entry);
                state.entries.clone()
            };

            tracing::warn!(
                username = %self.session.username,
                list = %kind,
                movie_id = %movie_id,
                error = %e,
                "Remove rejected, entry restored"
            );

            self.notify(ListEvent::Updated {
                kind,
                entries: entries.clone(),
            });
            self.notify(ListEvent::OperationFailed {
                kind,
                message: message.clone(),
            });

            return Err(AppError::RemoveFailed {
                list: kind,
                message,
            });
        }

        tracing::info!(
            username = %self.session.username,
            session_id = %self.session.session_id,
            list = %kind,
            movie_id = %movie_id,
            entries = entries.len(),
            "Removed from list"
        );

        Ok(entries)
    }

    /// Replaces a list wholesale with the server's authoritative contents
    pub async fn load(&self, kind: ListKind) -> AppResult<Vec<ListEntry>> {
        let fetched = match self.api.fetch_list(kind).await {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(
                    username = %self.session.username,
                    list = %kind,
                    error = %e,
                    "List fetch failed, keeping local snapshot"
                );
                self.notify(ListEvent::OperationFailed {
                    kind,
                    message: e.user_message(),
                });
                return Err(e);
            }
        };

        let entries = {
            let mut lists = self.inner.write().await;
            let state = lists.entry(kind).or_default();
            state.entries = fetched;
            state.last_synced = Some(Utc::now());
            state.entries.clone()
        };

        tracing::info!(
            username = %self.session.username,
            session_id = %self.session.session_id,
            list = %kind,
            entries = entries.len(),
            "List loaded from server"
        );

        self.notify(ListEvent::Updated {
            kind,
            entries: entries.clone(),
        });

        Ok(entries)
    }
}
