use axum::{
    extract::State,
    Json,
};

use crate::{
    error::AppResult,
    models::{Genre, GenreId, Mpa, MpaId},
    routes::{ApiPath, AppState},
};

pub async fn genres(State(state): State<AppState>) -> AppResult<Json<Vec<Genre>>> {
    Ok(Json(state.reference.genres().await?))
}

pub async fn genre(
    State(state): State<AppState>,
    ApiPath(genre_id): ApiPath<GenreId>,
) -> AppResult<Json<Genre>> {
    Ok(Json(state.reference.genre(genre_id).await?))
}

pub async fn mpa_ratings(State(state): State<AppState>) -> AppResult<Json<Vec<Mpa>>> {
    Ok(Json(state.reference.mpa_ratings().await?))
}

pub async fn mpa(
    State(state): State<AppState>,
    ApiPath(mpa_id): ApiPath<MpaId>,
) -> AppResult<Json<Mpa>> {
    Ok(Json(state.reference.mpa(mpa_id).await?))
}
