use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Canonical movie identifier.
///
/// The backend is inconsistent about id typing (JSON numbers in search and
/// browse payloads, strings in list payloads). Everything is normalized to a
/// string at the edge so the rest of the crate compares ids with `==`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MovieId(String);

impl MovieId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when the id is empty or whitespace-only
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl Display for MovieId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for MovieId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for MovieId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<u64> for MovieId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

impl From<i64> for MovieId {
    fn from(id: i64) -> Self {
        Self(id.to_string())
    }
}

/// The two user-curated lists kept in sync with the server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListKind {
    Watchlist,
    Favorites,
}

impl ListKind {
    pub fn add_path(&self) -> &'static str {
        match self {
            ListKind::Watchlist => "/lists/add",
            ListKind::Favorites => "/favorites/add",
        }
    }

    pub fn remove_path(&self) -> &'static str {
        match self {
            ListKind::Watchlist => "/lists/remove",
            ListKind::Favorites => "/favorites/remove",
        }
    }

    pub fn fetch_path(&self) -> &'static str {
        match self {
            ListKind::Watchlist => "/lists",
            ListKind::Favorites => "/favorites",
        }
    }
}

impl Display for ListKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ListKind::Watchlist => write!(f, "watchlist"),
            ListKind::Favorites => write!(f, "favorites"),
        }
    }
}

/// A denormalized snapshot of a movie at the moment it was added to a list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListEntry {
    pub movie_id: MovieId,
    pub title: String,
    #[serde(default)]
    pub poster_url: Option<String>,
}

impl ListEntry {
    pub fn new(movie_id: impl Into<MovieId>, title: impl Into<String>) -> Self {
        Self {
            movie_id: movie_id.into(),
            title: title.into(),
            poster_url: None,
        }
    }

    pub fn with_poster(mut self, poster_url: impl Into<String>) -> Self {
        self.poster_url = Some(poster_url.into());
        self
    }
}

impl From<&Movie> for ListEntry {
    fn from(movie: &Movie) -> Self {
        Self {
            movie_id: movie.id.clone(),
            title: movie.title.clone(),
            poster_url: movie.poster_url.clone(),
        }
    }
}

/// A movie as returned by the search, browse, and detail endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub id: MovieId,
    pub title: String,
    pub year: Option<String>,
    pub poster_url: Option<String>,
    pub overview: Option<String>,
    pub director: Option<String>,
    pub genre: Option<String>,
}

/// A user review of a movie
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub username: String,
    pub review: String,
    pub rating: u8,
}

// ============================================================================
// Movie API Wire Types
// ============================================================================

/// Raw identifier as the backend serializes it
///
/// List payloads carry ids as strings, search and browse payloads as numbers.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ApiId {
    Text(String),
    Number(i64),
}

impl From<ApiId> for MovieId {
    fn from(id: ApiId) -> Self {
        match id {
            ApiId::Text(s) => MovieId::new(s),
            ApiId::Number(n) => MovieId::new(n.to_string()),
        }
    }
}

/// One entry of a list payload
///
/// Watchlist entries arrive keyed `id`/`poster_url`, favorites entries keyed
/// `movie_id` with no poster field.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiListEntry {
    #[serde(alias = "movie_id")]
    pub id: ApiId,
    pub title: String,
    #[serde(default, alias = "poster")]
    pub poster_url: Option<String>,
}

impl From<ApiListEntry> for ListEntry {
    fn from(entry: ApiListEntry) -> Self {
        ListEntry {
            movie_id: entry.id.into(),
            title: entry.title,
            poster_url: entry.poster_url,
        }
    }
}

/// A movie as the search, browse, and detail endpoints serialize it
#[derive(Debug, Clone, Deserialize)]
pub struct ApiMovie {
    pub id: ApiId,
    pub title: String,
    /// Search results carry a pre-truncated year
    #[serde(default)]
    pub year: Option<String>,
    /// Browse routes carry a full release date instead
    #[serde(default, rename = "release-date", alias = "release_date")]
    pub release_date: Option<String>,
    #[serde(default, alias = "poster")]
    pub poster_url: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub director: Option<String>,
    #[serde(default)]
    pub genre: Option<String>,
}

impl From<ApiMovie> for Movie {
    fn from(api: ApiMovie) -> Self {
        // The backend sends the literal string "Unknown" for missing dates
        let year = match (api.year, api.release_date) {
            (Some(y), _) if !y.is_empty() && y != "Unknown" => Some(y),
            (_, Some(d)) if !d.is_empty() && d != "Unknown" => d.get(..4).map(str::to_string),
            _ => None,
        };

        Movie {
            id: api.id.into(),
            title: api.title,
            year,
            poster_url: api.poster_url,
            overview: api.overview,
            director: api.director,
            genre: api.genre,
        }
    }
}

/// Mutation acknowledgment from the backend
///
/// The backend mixes two envelope styles: `{"success": bool, ...}` on
/// watchlist and review routes, `{"status": "success"|"error", ...}` on
/// favorites routes. A payload carrying neither flag is treated as a failure.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiAck {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ApiAck {
    pub fn is_success(&self) -> bool {
        match (self.success, self.status.as_deref()) {
            (Some(flag), _) => flag,
            (None, Some(status)) => status == "success",
            (None, None) => false,
        }
    }
}

/// Watchlist fetch payload: `{"success": true, "watchlist": [...]}`
#[derive(Debug, Clone, Deserialize)]
pub struct WatchlistResponse {
    #[serde(default = "default_true")]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default, alias = "Watchlist")]
    pub watchlist: Vec<ApiListEntry>,
}

/// Favorites fetch payload: `{"favorites": [...]}` with no success flag
#[derive(Debug, Clone, Deserialize)]
pub struct FavoritesResponse {
    #[serde(default = "default_true")]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default, alias = "Favorites")]
    pub favorites: Vec<ApiListEntry>,
}

/// Search and browse payload: `{"movies": [...]}`
///
/// The browse routes add a success flag, the search route does not.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    #[serde(default = "default_true")]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub movies: Vec<ApiMovie>,
}

/// Reviews fetch payload: `{"reviews": [...]}`
#[derive(Debug, Clone, Deserialize)]
pub struct ReviewsResponse {
    #[serde(default)]
    pub reviews: Vec<Review>,
}

fn default_true() -> bool {
    true
}
