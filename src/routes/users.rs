use axum::{
    extract::State,
    Extension, Json,
};

use crate::{
    error::AppResult,
    middleware::request_id::RequestId,
    models::{FilmSummary, UserId},
    routes::{ApiPath, AppState},
};

/// Handler for the recommendations endpoint
pub async fn recommendations(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    ApiPath(user_id): ApiPath<UserId>,
) -> AppResult<Json<Vec<FilmSummary>>> {
    tracing::info!(request_id = %request_id, user_id, "Processing recommendations request");

    let films = state.recommendations.recommendations(user_id).await?;

    tracing::info!(
        request_id = %request_id,
        count = films.len(),
        "Recommendations completed"
    );

    Ok(Json(films))
}
