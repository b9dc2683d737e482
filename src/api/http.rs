/// HTTP implementation of the movie API
///
/// Talks to the movie backend over JSON and tolerates the backend as-is. The
/// wire format is uneven (see the notes on the wire types in `models`), so
/// every payload is normalized at this boundary and callers only ever see
/// domain types.
///
/// Requests fail closed after the configured timeout rather than leaving an
/// optimistic local update stuck waiting on a dead connection.
use crate::{
    api::MovieApi,
    config::Config,
    error::{AppError, AppResult},
    models::{
        ApiAck, ApiMovie, FavoritesResponse, ListEntry, ListKind, Movie, MovieId, Review,
        ReviewsResponse, SearchResponse, WatchlistResponse,
    },
};
use reqwest::Client as HttpClient;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

#[derive(Clone)]
pub struct HttpMovieApi {
    http_client: HttpClient,
    base_url: String,
    image_base_url: String,
}

impl HttpMovieApi {
    /// Creates a client for the backend at `config.api_base_url`
    pub fn new(config: &Config) -> AppResult<Self> {
        let http_client = HttpClient::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            http_client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            image_base_url: config.image_base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Map a non-2xx response to an error, preferring the server's own message
    ///
    /// Mutation failures arrive as `{"success": false, "message": ...}` with a
    /// 4xx status, fetch failures as `{"error": ...}`. Anything unparseable is
    /// reported with the raw status and body.
    async fn error_from_response(response: reqwest::Response) -> AppError {
        #[derive(Deserialize)]
        struct ErrorBody {
            #[serde(default)]
            message: Option<String>,
            #[serde(default)]
            error: Option<String>,
        }

        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();

        match serde_json::from_str::<ErrorBody>(&body) {
            Ok(parsed) => match parsed.message.or(parsed.error) {
                Some(message) => AppError::Api(message),
                None => AppError::UnexpectedStatus { status, body },
            },
            Err(_) => AppError::UnexpectedStatus { status, body },
        }
    }

    /// POST a JSON body and interpret the acknowledgment envelope
    async fn post_ack(&self, path: &str, body: serde_json::Value) -> AppResult<()> {
        let url = format!("{}{}", self.base_url, path);

        let response = self.http_client.post(&url).json(&body).send().await?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }

        let ack: ApiAck = response.json().await?;
        if !ack.is_success() {
            return Err(AppError::Api(
                ack.message.unwrap_or_else(|| "request rejected".to_string()),
            ));
        }

        Ok(())
    }

    /// GET a movie collection route and normalize its payload
    async fn fetch_movies(&self, path: &str, query: &[(&str, &str)]) -> AppResult<Vec<Movie>> {
        let url = format!("{}{}", self.base_url, path);

        let response = self.http_client.get(&url).query(query).send().await?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }

        let payload: SearchResponse = response.json().await?;
        if !payload.success {
            return Err(AppError::Api(
                payload
                    .message
                    .unwrap_or_else(|| "request rejected".to_string()),
            ));
        }

        Ok(payload
            .movies
            .into_iter()
            .map(Movie::from)
            .map(|movie| self.resolve_movie_poster(movie))
            .collect())
    }

    /// Prefix relative poster paths with the configured image host
    fn resolve_poster_path(&self, path: String) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.image_base_url, path)
        } else {
            path
        }
    }

    fn resolve_movie_poster(&self, mut movie: Movie) -> Movie {
        movie.poster_url = movie.poster_url.map(|p| self.resolve_poster_path(p));
        movie
    }

    fn resolve_entry_poster(&self, mut entry: ListEntry) -> ListEntry {
        entry.poster_url = entry.poster_url.map(|p| self.resolve_poster_path(p));
        entry
    }
}

#[async_trait::async_trait]
impl MovieApi for HttpMovieApi {
    async fn search(&self, query: &str) -> AppResult<Vec<Movie>> {
        if query.trim().is_empty() {
            return Err(AppError::InvalidInput(
                "Search query cannot be empty".to_string(),
            ));
        }

        let movies = self.fetch_movies("/search", &[("query", query)]).await?;

        tracing::info!(query = %query, results = movies.len(), "Movie search completed");

        Ok(movies)
    }

    async fn movie_details(&self, movie_id: &MovieId) -> AppResult<Movie> {
        if movie_id.is_blank() {
            return Err(AppError::InvalidInput(
                "Movie id cannot be empty".to_string(),
            ));
        }

        let url = format!("{}/movie/{}", self.base_url, movie_id);

        let response = self.http_client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }

        let api_movie: ApiMovie = response.json().await?;

        Ok(self.resolve_movie_poster(api_movie.into()))
    }

    async fn popular(&self) -> AppResult<Vec<Movie>> {
        self.fetch_movies("/movies/poster", &[]).await
    }

    async fn new_releases(&self) -> AppResult<Vec<Movie>> {
        self.fetch_movies("/movies/new-releases", &[]).await
    }

    async fn add_to_list(&self, kind: ListKind, entry: &ListEntry) -> AppResult<()> {
        self.post_ack(
            kind.add_path(),
            json!({
                "movie_id": entry.movie_id,
                "title": entry.title,
                "poster_url": entry.poster_url,
            }),
        )
        .await?;

        tracing::debug!(list = %kind, movie_id = %entry.movie_id, "List add confirmed");

        Ok(())
    }

    async fn remove_from_list(&self, kind: ListKind, movie_id: &MovieId) -> AppResult<()> {
        self.post_ack(kind.remove_path(), json!({ "movie_id": movie_id }))
            .await?;

        tracing::debug!(list = %kind, movie_id = %movie_id, "List remove confirmed");

        Ok(())
    }

    async fn fetch_list(&self, kind: ListKind) -> AppResult<Vec<ListEntry>> {
        let url = format!("{}{}", self.base_url, kind.fetch_path());

        let response = self.http_client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }

        let (success, message, entries) = match kind {
            ListKind::Watchlist => {
                let payload: WatchlistResponse = response.json().await?;
                (payload.success, payload.message, payload.watchlist)
            }
            ListKind::Favorites => {
                let payload: FavoritesResponse = response.json().await?;
                (payload.success, payload.message, payload.favorites)
            }
        };

        if !success {
            return Err(AppError::Api(
                message.unwrap_or_else(|| "request rejected".to_string()),
            ));
        }

        let entries: Vec<ListEntry> = entries
            .into_iter()
            .map(ListEntry::from)
            .map(|entry| self.resolve_entry_poster(entry))
            .collect();

        tracing::info!(list = %kind, entries = entries.len(), "List fetched");

        Ok(entries)
    }

    async fn submit_review(
        &self,
        username: &str,
        movie_id: &MovieId,
        review: &str,
        rating: u8,
    ) -> AppResult<()> {
        if review.trim().is_empty() {
            return Err(AppError::InvalidInput(
                "Review text cannot be empty".to_string(),
            ));
        }
        if !(1..=10).contains(&rating) {
            return Err(AppError::InvalidInput(format!(
                "Rating must be between 1 and 10, got {}",
                rating
            )));
        }

        self.post_ack(
            "/review",
            json!({
                "movie_id": movie_id,
                "username": username,
                "review": review,
                "rating": rating,
            }),
        )
        .await?;

        tracing::info!(movie_id = %movie_id, rating = rating, "Review submitted");

        Ok(())
    }

    async fn reviews_for(&self, movie_id: &MovieId) -> AppResult<Vec<Review>> {
        let url = format!("{}/lists/reviews/{}", self.base_url, movie_id);

        let response = self.http_client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }

        let payload: ReviewsResponse = response.json().await?;

        Ok(payload.reviews)
    }
}
