pub mod api;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod session;
pub mod store;

pub use api::HttpMovieApi;
pub use api::MovieApi;
pub use config::Config;
pub use error::AppError;
pub use error::AppResult;
pub use models::ListEntry;
pub use models::ListKind;
pub use models::Movie;
pub use models::MovieId;
pub use models::Review;
pub use session::SessionContext;
pub use store::FileHistoryStore;
pub use store::HistoryWriterHandle;
pub use store::ListEvent;
pub use store::ListSyncStore;
pub use store::RecentSearchCache;
pub use store::SearchHistoryStore;
