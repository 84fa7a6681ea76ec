use axum::{
    extract::State,
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;

use crate::{
    error::AppResult,
    middleware::request_id::RequestId,
    models::{DirectorId, FilmId, FilmSummary, GenreId, UserId},
    routes::{ApiPath, ApiQuery, AppState},
    services::{catalog::DEFAULT_POPULAR_COUNT, DirectorSort, PopularQuery},
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PopularParams {
    count: Option<i64>,
    genre_id: Option<GenreId>,
    year: Option<i32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommonParams {
    user_id: UserId,
    friend_id: UserId,
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    query: String,
    by: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectorParams {
    sort_by: Option<String>,
}

/// Handler for the popular films endpoint
pub async fn popular(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    ApiQuery(params): ApiQuery<PopularParams>,
) -> AppResult<Json<Vec<FilmSummary>>> {
    tracing::info!(
        request_id = %request_id,
        count = ?params.count,
        genre_id = ?params.genre_id,
        year = ?params.year,
        "Processing popular films request"
    );

    let films = state
        .catalog
        .get_popular_films(PopularQuery {
            limit: params.count.unwrap_or(DEFAULT_POPULAR_COUNT),
            genre_id: params.genre_id,
            year: params.year,
        })
        .await?;

    Ok(Json(films))
}

/// Handler for films liked by both users
pub async fn common(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<CommonParams>,
) -> AppResult<Json<Vec<FilmSummary>>> {
    let films = state
        .catalog
        .common_films(params.user_id, params.friend_id)
        .await?;
    Ok(Json(films))
}

/// Handler for title/director search
pub async fn search(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    ApiQuery(params): ApiQuery<SearchParams>,
) -> AppResult<Json<Vec<FilmSummary>>> {
    let by = params.by.as_deref().unwrap_or("title");
    tracing::info!(
        request_id = %request_id,
        query = %params.query,
        by,
        "Processing search request"
    );

    let films = state.search.search(&params.query, by).await?;
    Ok(Json(films))
}

/// Handler for a director's films
pub async fn by_director(
    State(state): State<AppState>,
    ApiPath(director_id): ApiPath<DirectorId>,
    ApiQuery(params): ApiQuery<DirectorParams>,
) -> AppResult<Json<Vec<FilmSummary>>> {
    let sort = match params.sort_by.as_deref() {
        Some(sort_by) => sort_by.parse()?,
        None => DirectorSort::default(),
    };

    let films = state.catalog.films_by_director(director_id, sort).await?;
    Ok(Json(films))
}

pub async fn add_like(
    State(state): State<AppState>,
    ApiPath((film_id, user_id)): ApiPath<(FilmId, UserId)>,
) -> AppResult<StatusCode> {
    state.likes.add_like(film_id, user_id).await?;
    Ok(StatusCode::OK)
}

pub async fn remove_like(
    State(state): State<AppState>,
    ApiPath((film_id, user_id)): ApiPath<(FilmId, UserId)>,
) -> AppResult<StatusCode> {
    state.likes.remove_like(film_id, user_id).await?;
    Ok(StatusCode::OK)
}
