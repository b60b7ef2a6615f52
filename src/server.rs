//! HTTP front for the word library.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::sync::Arc;

use axum::Router;
use axum::extract::{Query, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::source::WordLibrary;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
    pub words_dir: PathBuf,
    pub log_level: String,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        let port = std::env::var("PORT")
            .ok()
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(8080);

        let host = std::env::var("HOST")
            .ok()
            .and_then(|value| value.parse::<IpAddr>().ok())
            .unwrap_or(IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1)));

        let words_dir = std::env::var("WORDS_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("word"));

        let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        Self {
            host,
            port,
            words_dir,
            log_level,
        }
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

#[derive(Debug, serde::Deserialize)]
struct WordsQuery {
    #[serde(default)]
    book: String,
}

pub fn router(library: WordLibrary) -> Router {
    Router::new()
        .route("/get_words", get(get_words))
        .with_state(Arc::new(library))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

async fn get_words(
    State(library): State<Arc<WordLibrary>>,
    Query(query): Query<WordsQuery>,
) -> Response {
    let result = tokio::task::spawn_blocking(move || library.lookup(&query.book)).await;

    let (status, body) = match result {
        Ok(Ok(body)) => (StatusCode::OK, body),
        Ok(Err(error)) => {
            tracing::warn!(error = %error, "word lookup failed");
            let status =
                StatusCode::from_u16(error.status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            (status, error.body())
        }
        Err(error) => {
            tracing::error!(error = %error, "word lookup task failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                serde_json::json!({ "error": "Failed to read word list" }).to_string(),
            )
        }
    };

    (status, [(header::CONTENT_TYPE, "application/json")], body).into_response()
}
