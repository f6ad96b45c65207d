pub mod calendar;
pub mod dates;
pub mod stats;
pub mod subscribe;
pub mod trend;

use std::path::Path;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::services::{ServeDir, ServeFile};

use crate::state::AppState;

/// The API routes and the admin page, everything else is served from `public_dir`.
pub fn router(state: AppState, public_dir: &Path) -> Router {
    Router::new()
        .route("/api/dates", get(dates::handler))
        .route("/api/subscribe", post(subscribe::handler))
        .route("/api/calendar/:user_id", get(calendar::handler))
        .route("/api/stats", get(stats::handler))
        .route("/api/update-trend", post(trend::handler))
        .route_service("/admin", ServeFile::new(public_dir.join("admin.html")))
        .fallback_service(ServeDir::new(public_dir))
        .with_state(state)
}
