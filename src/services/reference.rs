use crate::{
    error::{AppError, AppResult},
    models::{Genre, GenreId, Mpa, MpaId},
    storage::Storage,
};

/// Genre and MPA rating lookups
pub struct ReferenceService {
    storage: Storage,
}

impl ReferenceService {
    pub fn new(storage: Storage) -> Self {
        Self { storage }
    }

    pub async fn genres(&self) -> AppResult<Vec<Genre>> {
        let mut genres = self.storage.genres.genres().await?;
        genres.sort_by_key(|g| g.id);
        Ok(genres)
    }

    pub async fn genre(&self, genre_id: GenreId) -> AppResult<Genre> {
        self.storage
            .genres
            .genre(genre_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Genre {} not found", genre_id)))
    }

    pub async fn mpa_ratings(&self) -> AppResult<Vec<Mpa>> {
        let mut ratings = self.storage.mpa.mpa_ratings().await?;
        ratings.sort_by_key(|m| m.id);
        Ok(ratings)
    }

    pub async fn mpa(&self, mpa_id: MpaId) -> AppResult<Mpa> {
        self.storage
            .mpa
            .mpa(mpa_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("MPA rating {} not found", mpa_id)))
    }
}
