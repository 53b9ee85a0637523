pub mod health;
pub mod submit;

use std::path::Path;

use axum::routing::{get, get_service};
use axum::Router;
use tower_http::services::{ServeDir, ServeFile};

use crate::state::SharedState;

/// Form API and health, plus the landing and feedback pages. Any other path
/// is looked up under `static_dir`.
pub fn routes(static_dir: &Path) -> Router<SharedState> {
    let feedback = static_dir.join("feedback.html");

    Router::new()
        .route("/health", get(health::health))
        .route(
            "/submit-form",
            get_service(ServeFile::new(&feedback)).post(submit::submit_form),
        )
        .route_service("/", ServeFile::new(static_dir.join("index.html")))
        .route_service("/form", ServeFile::new(&feedback))
        .route_service("/about", ServeFile::new(&feedback))
        .fallback_service(ServeDir::new(static_dir))
}
