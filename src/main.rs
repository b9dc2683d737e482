use std::sync::Arc;

use cinelog::{
    logging, Config, FileHistoryStore, HttpMovieApi, ListEntry, ListKind, ListSyncStore, Movie,
    MovieApi, MovieId, RecentSearchCache, SessionContext,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init();

    let config = Config::from_env()?;
    let session = SessionContext::new(
        std::env::var("CINELOG_USER").unwrap_or_else(|_| "guest".to_string()),
    );

    let api = Arc::new(HttpMovieApi::new(&config)?);
    let lists = ListSyncStore::new(api.clone(), session.clone());

    let history = Arc::new(FileHistoryStore::new(config.recent_searches_path()));
    let (searches, writer) = RecentSearchCache::open(history);

    let args: Vec<String> = std::env::args().skip(1).collect();
    let command: Vec<&str> = args.iter().map(String::as_str).collect();

    let result = run(&command, api.as_ref(), &lists, &searches, &session).await;

    // Flush queued history writes before exiting
    writer.shutdown().await;

    result
}

async fn run(
    command: &[&str],
    api: &HttpMovieApi,
    lists: &ListSyncStore,
    searches: &RecentSearchCache,
    session: &SessionContext,
) -> anyhow::Result<()> {
    match command {
        ["search", term @ ..] if !term.is_empty() => {
            let query = term.join(" ");
            let movies = api.search(&query).await?;
            searches.record(&query).await;
            print_movies(&movies);
        }
        ["recent"] => {
            for term in searches.terms().await {
                println!("{}", term);
            }
        }
        ["forget", term @ ..] if !term.is_empty() => {
            searches.remove(&term.join(" ")).await;
        }
        ["popular"] => print_movies(&api.popular().await?),
        ["new-releases"] => print_movies(&api.new_releases().await?),
        ["details", movie_id] => {
            let movie = api.movie_details(&MovieId::from(*movie_id)).await?;
            println!("{} ({})", movie.title, movie.year.as_deref().unwrap_or("?"));
            if let Some(director) = &movie.director {
                println!("Directed by {}", director);
            }
            if let Some(genre) = &movie.genre {
                println!("{}", genre);
            }
            if let Some(overview) = &movie.overview {
                println!("\n{}", overview);
            }
        }
        ["review", movie_id, rating, text @ ..] if !text.is_empty() => {
            let rating: u8 = rating.parse()?;
            api.submit_review(
                &session.username,
                &MovieId::from(*movie_id),
                &text.join(" "),
                rating,
            )
            .await?;
            println!("Review submitted");
        }
        ["reviews", movie_id] => {
            for review in api.reviews_for(&MovieId::from(*movie_id)).await? {
                println!("{} ({}/10): {}", review.username, review.rating, review.review);
            }
        }
        [list, rest @ ..] => match parse_list_kind(list) {
            Some(kind) => list_command(kind, rest, lists).await?,
            None => usage(),
        },
        [] => usage(),
    }

    Ok(())
}

async fn list_command(
    kind: ListKind,
    rest: &[&str],
    lists: &ListSyncStore,
) -> anyhow::Result<()> {
    match rest {
        [] => {
            for entry in lists.load(kind).await? {
                println!("{}  {}", entry.movie_id, entry.title);
            }
        }
        ["add", movie_id, title @ ..] if !title.is_empty() => {
            let entry = ListEntry::new(*movie_id, title.join(" "));
            lists.add(kind, entry).await?;
            println!("Added to {}", kind);
        }
        ["remove", movie_id] => {
            lists.remove(kind, &MovieId::from(*movie_id)).await?;
            println!("Removed from {}", kind);
        }
        _ => usage(),
    }

    Ok(())
}

fn parse_list_kind(name: &str) -> Option<ListKind> {
    match name {
        "watchlist" => Some(ListKind::Watchlist),
        "favorites" => Some(ListKind::Favorites),
        _ => None,
    }
}

fn print_movies(movies: &[Movie]) {
    for movie in movies {
        match &movie.year {
            Some(year) => println!("{}  {} ({})", movie.id, movie.title, year),
            None => println!("{}  {}", movie.id, movie.title),
        }
    }
}

fn usage() {
    eprintln!("Usage: cinelog <command>");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  search <term>                      Search movies and record the term");
    eprintln!("  recent                             Show recent search terms");
    eprintln!("  forget <term>                      Drop a term from recent searches");
    eprintln!("  popular                            Browse popular movies");
    eprintln!("  new-releases                       Browse movies now playing");
    eprintln!("  details <movie_id>                 Show one movie");
    eprintln!("  watchlist | favorites              Load and print a list");
    eprintln!("  watchlist | favorites add <id> <title>");
    eprintln!("  watchlist | favorites remove <id>");
    eprintln!("  review <movie_id> <rating> <text>  Submit a review (rating 1-10)");
    eprintln!("  reviews <movie_id>                 Show reviews for a movie");
    eprintln!();
    eprintln!("Set CINELOG_USER to attribute reviews, API_BASE_URL for the backend.");
}
