#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tokio::sync::RwLock;

use cinelog::Config;

/// In-memory movie backend mirroring the production API's contract
///
/// Routes, envelope styles, and key spellings match the real backend,
/// quirks included: watchlist entries come back keyed `id`, favorites keyed
/// `movie_id`; watchlist and review routes acknowledge with a `success`
/// flag, favorites routes with a `status` string.
#[derive(Clone, Default)]
pub struct StubBackend {
    state: Arc<RwLock<StubState>>,
}

#[derive(Default)]
struct StubState {
    watchlist: Vec<StoredEntry>,
    favorites: Vec<StoredEntry>,
    reviews: HashMap<String, Vec<Value>>,
    /// When set, remove routes fail even for entries that exist
    fail_removes: bool,
    /// When set, the search route stalls long enough to trip client timeouts
    stall_searches: bool,
}

#[derive(Clone)]
struct StoredEntry {
    movie_id: String,
    title: String,
    poster_url: Option<String>,
}

impl StubBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds a random local port and serves the backend until the test ends
    pub async fn spawn(&self) -> SocketAddr {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = self.clone().router();

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        addr
    }

    pub fn router(self) -> Router {
        Router::new()
            .route("/search", get(search))
            .route("/movies/poster", get(popular))
            .route("/movies/new-releases", get(new_releases))
            .route("/movie/:movie_id", get(movie_details))
            .route("/lists/add", post(watchlist_add))
            .route("/lists/remove", post(watchlist_remove))
            .route("/lists", get(watchlist_fetch))
            .route("/favorites/add", post(favorites_add))
            .route("/favorites/remove", post(favorites_remove))
            .route("/favorites", get(favorites_fetch))
            .route("/review", post(review_submit))
            .route("/lists/reviews/:movie_id", get(reviews_fetch))
            .with_state(self)
    }

    pub async fn set_fail_removes(&self, fail: bool) {
        self.state.write().await.fail_removes = fail;
    }

    pub async fn set_stall_searches(&self, stall: bool) {
        self.state.write().await.stall_searches = stall;
    }

    pub async fn watchlist_ids(&self) -> Vec<String> {
        let state = self.state.read().await;
        state.watchlist.iter().map(|e| e.movie_id.clone()).collect()
    }

    pub async fn favorites_ids(&self) -> Vec<String> {
        let state = self.state.read().await;
        state.favorites.iter().map(|e| e.movie_id.clone()).collect()
    }

    pub async fn reviews_for(&self, movie_id: &str) -> usize {
        let state = self.state.read().await;
        state.reviews.get(movie_id).map(Vec::len).unwrap_or(0)
    }
}

/// Client configuration pointing at a spawned stub backend
pub fn test_config(addr: SocketAddr) -> Config {
    Config {
        api_base_url: format!("http://{}", addr),
        image_base_url: "https://image.test/w500".to_string(),
        ..Config::default()
    }
}

fn required_str(body: &Value, key: &str) -> Option<String> {
    body.get(key).and_then(Value::as_str).and_then(|s| {
        if s.is_empty() {
            None
        } else {
            Some(s.to_string())
        }
    })
}

async fn search(
    State(backend): State<StubBackend>,
    Query(params): Query<HashMap<String, String>>,
) -> (StatusCode, Json<Value>) {
    if backend.state.read().await.stall_searches {
        tokio::time::sleep(Duration::from_secs(10)).await;
    }

    let query = match params.get("query") {
        Some(query) if !query.is_empty() => query.clone(),
        _ => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({"error": "No search query provided"})),
            )
        }
    };

    if query == "nothing matches this" {
        return (StatusCode::OK, Json(json!({"movies": []})));
    }

    (
        StatusCode::OK,
        Json(json!({
            "movies": [
                {
                    "id": 949,
                    "title": "Heat",
                    "year": "1995",
                    "poster": "/heat.jpg",
                    "director": "Michael Mann",
                    "genre": "Crime, Drama"
                },
                {
                    "id": 348,
                    "title": "Alien",
                    "year": "Unknown",
                    "poster": null,
                    "director": "Ridley Scott",
                    "genre": "Horror, Science Fiction"
                }
            ]
        })),
    )
}

async fn popular() -> Json<Value> {
    Json(json!({
        "success": true,
        "movies": [
            {
                "id": 603,
                "title": "The Matrix",
                "release-date": "1999-03-31",
                "poster": "/matrix.jpg"
            }
        ]
    }))
}

async fn new_releases() -> Json<Value> {
    Json(json!({
        "success": true,
        "movies": [
            {
                "id": 1184918,
                "title": "The Wild Robot",
                "release-date": "Unknown",
                "poster": null
            }
        ]
    }))
}

async fn movie_details(Path(movie_id): Path<String>) -> (StatusCode, Json<Value>) {
    if movie_id != "949" {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"error": "Failed to fetch movie details"})),
        );
    }

    (
        StatusCode::OK,
        Json(json!({
            "id": 949,
            "title": "Heat",
            "poster": "/heat.jpg",
            "overview": "Obsessive master thief Neil McCauley leads a top-notch crew.",
            "director": "Michael Mann",
            "genre": "Crime, Drama"
        })),
    )
}

async fn watchlist_add(
    State(backend): State<StubBackend>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let movie_id = required_str(&body, "movie_id");
    let title = required_str(&body, "title");

    let (movie_id, title) = match (movie_id, title) {
        (Some(movie_id), Some(title)) => (movie_id, title),
        _ => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({"success": false, "message": "Missing required fields"})),
            )
        }
    };

    let mut state = backend.state.write().await;
    if state.watchlist.iter().any(|e| e.movie_id == movie_id) {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"success": false, "message": "Movie already exists in watchlist"})),
        );
    }

    state.watchlist.push(StoredEntry {
        movie_id,
        title,
        poster_url: required_str(&body, "poster_url"),
    });

    (
        StatusCode::CREATED,
        Json(json!({"success": true, "message": "Movie added to watchlist"})),
    )
}

async fn watchlist_remove(
    State(backend): State<StubBackend>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let movie_id = match required_str(&body, "movie_id") {
        Some(movie_id) => movie_id,
        None => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({"success": false, "message": "Missing required fields"})),
            )
        }
    };

    let mut state = backend.state.write().await;
    if state.fail_removes {
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({"success": false, "message": "Service unavailable"})),
        );
    }

    let position = state.watchlist.iter().position(|e| e.movie_id == movie_id);
    match position {
        Some(position) => {
            state.watchlist.remove(position);
            (
                StatusCode::OK,
                Json(json!({"success": true, "message": "Movie removed from watchlist"})),
            )
        }
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({"success": false, "message": "Movie not found"})),
        ),
    }
}

async fn watchlist_fetch(State(backend): State<StubBackend>) -> Json<Value> {
    let state = backend.state.read().await;
    let watchlist: Vec<Value> = state
        .watchlist
        .iter()
        .map(|e| json!({"id": e.movie_id, "title": e.title, "poster_url": e.poster_url}))
        .collect();

    Json(json!({"success": true, "watchlist": watchlist}))
}

async fn favorites_add(
    State(backend): State<StubBackend>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let movie_id = required_str(&body, "movie_id");
    let title = required_str(&body, "title");

    let (movie_id, title) = match (movie_id, title) {
        (Some(movie_id), Some(title)) => (movie_id, title),
        _ => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({"status": "error", "message": "Missing required fields"})),
            )
        }
    };

    let mut state = backend.state.write().await;
    state.favorites.push(StoredEntry {
        movie_id,
        title,
        poster_url: None,
    });

    (
        StatusCode::OK,
        Json(json!({"status": "success", "message": "Movie added to favorites"})),
    )
}

async fn favorites_remove(
    State(backend): State<StubBackend>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let movie_id = match required_str(&body, "movie_id") {
        Some(movie_id) => movie_id,
        None => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({"status": "error", "message": "Missing required fields"})),
            )
        }
    };

    let mut state = backend.state.write().await;
    if state.fail_removes {
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({"status": "error", "message": "Service unavailable"})),
        );
    }

    let position = state.favorites.iter().position(|e| e.movie_id == movie_id);
    match position {
        Some(position) => {
            state.favorites.remove(position);
            (
                StatusCode::OK,
                Json(json!({"status": "success", "message": "Movie removed from favorites"})),
            )
        }
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({"status": "error", "message": "Movie not found"})),
        ),
    }
}

async fn favorites_fetch(State(backend): State<StubBackend>) -> Json<Value> {
    let state = backend.state.read().await;
    let favorites: Vec<Value> = state
        .favorites
        .iter()
        .map(|e| json!({"movie_id": e.movie_id, "title": e.title}))
        .collect();

    Json(json!({"favorites": favorites}))
}

async fn review_submit(
    State(backend): State<StubBackend>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let movie_id = required_str(&body, "movie_id");
    let username = required_str(&body, "username");
    let review = required_str(&body, "review");
    let rating = body.get("rating").and_then(Value::as_u64);

    let (movie_id, username, review, rating) = match (movie_id, username, review, rating) {
        (Some(movie_id), Some(username), Some(review), Some(rating)) => {
            (movie_id, username, review, rating)
        }
        _ => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({"success": false, "message": "Missing Field"})),
            )
        }
    };

    let mut state = backend.state.write().await;
    state.reviews.entry(movie_id).or_default().push(json!({
        "username": username,
        "review": review,
        "rating": rating,
    }));

    (
        StatusCode::CREATED,
        Json(json!({"success": true, "message": "Review submitted successfully"})),
    )
}

async fn reviews_fetch(
    State(backend): State<StubBackend>,
    Path(movie_id): Path<String>,
) -> Json<Value> {
    let state = backend.state.read().await;
    let reviews = state.reviews.get(&movie_id).cloned().unwrap_or_default();

    Json(json!({"reviews": reviews}))
}
