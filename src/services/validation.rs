//! Argument checks run before any storage access.

use crate::{
    error::{AppError, AppResult},
    models::GenreId,
};

/// Year of the first public film screening; no release can predate it.
pub const FIRST_FILM_YEAR: i32 = 1895;

pub fn validate_limit(limit: i64) -> AppResult<usize> {
    usize::try_from(limit)
        .map_err(|_| AppError::InvalidInput(format!("count must not be negative, got {}", limit)))
}

pub fn validate_year(year: i32) -> AppResult<i32> {
    if year < FIRST_FILM_YEAR {
        return Err(AppError::InvalidInput(format!(
            "year must be {} or later, got {}",
            FIRST_FILM_YEAR, year
        )));
    }
    Ok(year)
}

pub fn validate_genre_id(genre_id: GenreId) -> AppResult<GenreId> {
    if genre_id <= 0 {
        return Err(AppError::InvalidInput(format!(
            "genreId must be positive, got {}",
            genre_id
        )));
    }
    Ok(genre_id)
}
