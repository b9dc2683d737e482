/// Movie API abstraction
///
/// The backend owns authentication, storage, and business rules; this crate
/// only consumes its HTTP contract. The trait keeps the stores independent of
/// the transport so tests can swap in a scripted double.
use crate::{
    error::AppResult,
    models::{ListEntry, ListKind, Movie, MovieId, Review},
};

pub mod http;

pub use http::HttpMovieApi;

/// Trait for the remote movie and review API
///
/// All user-visible state lives behind this boundary. Implementations must
/// normalize wire payloads into the crate's domain types, including the
/// canonical string form of movie ids.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait MovieApi: Send + Sync {
    /// Search for movies by title
    async fn search(&self, query: &str) -> AppResult<Vec<Movie>>;

    /// Fetch full details for a single movie
    async fn movie_details(&self, movie_id: &MovieId) -> AppResult<Movie>;

    /// Fetch the current popular movies
    async fn popular(&self) -> AppResult<Vec<Movie>>;

    /// Fetch movies now playing in theaters
    async fn new_releases(&self) -> AppResult<Vec<Movie>>;

    /// Create a list entry on the server
    async fn add_to_list(&self, kind: ListKind, entry: &ListEntry) -> AppResult<()>;

    /// Delete a list entry on the server
    async fn remove_from_list(&self, kind: ListKind, movie_id: &MovieId) -> AppResult<()>;

    /// Fetch the authoritative contents of a list
    async fn fetch_list(&self, kind: ListKind) -> AppResult<Vec<ListEntry>>;

    /// Submit a review for a movie
    async fn submit_review(
        &self,
        username: &str,
        movie_id: &MovieId,
        review: &str,
        rating: u8,
    ) -> AppResult<()>;

    /// Fetch all reviews for a movie
    async fn reviews_for(&self, movie_id: &MovieId) -> AppResult<Vec<Review>>;
}
