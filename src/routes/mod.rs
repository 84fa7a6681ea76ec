use axum::{
    http::StatusCode,
    middleware,
    routing::{get, put},
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::request_id::{make_span_with_request_id, request_id_middleware};

pub mod extract;
pub mod films;
pub mod reference;
pub mod state;
pub mod users;

pub use extract::{ApiPath, ApiQuery};
pub use state::AppState;

/// Creates the application router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .merge(film_routes())
        .route("/users/:id/recommendations", get(users::recommendations))
        .route("/genres", get(reference::genres))
        .route("/genres/:id", get(reference::genre))
        .route("/mpa", get(reference::mpa_ratings))
        .route("/mpa/:id", get(reference::mpa))
        .with_state(state)
        .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(CorsLayer::permissive())
}

/// Film routes: rankings, search and likes
fn film_routes() -> Router<AppState> {
    Router::new()
        .route("/films/popular", get(films::popular))
        .route("/films/common", get(films::common))
        .route("/films/search", get(films::search))
        .route("/films/director/:director_id", get(films::by_director))
        .route(
            "/films/:id/like/:user_id",
            put(films::add_like).delete(films::remove_like),
        )
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}
