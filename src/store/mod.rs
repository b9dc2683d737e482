pub mod history;
pub mod list_sync;
pub mod recent_searches;

pub use history::FileHistoryStore;
pub use history::InMemoryHistory;
pub use history::SearchHistoryStore;
pub use list_sync::ListEvent;
pub use list_sync::ListSyncStore;
pub use recent_searches::HistoryWriterHandle;
pub use recent_searches::RecentSearchCache;
pub use recent_searches::RECENT_SEARCH_CAPACITY;
