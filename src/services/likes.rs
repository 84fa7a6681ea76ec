use tracing::instrument;

use crate::{
    error::{AppError, AppResult},
    models::{FilmId, UserId},
    storage::Storage,
};

/// Records and withdraws likes after checking both sides exist
pub struct LikeService {
    storage: Storage,
}

impl LikeService {
    pub fn new(storage: Storage) -> Self {
        Self { storage }
    }

    #[instrument(skip(self))]
    pub async fn add_like(&self, film_id: FilmId, user_id: UserId) -> AppResult<()> {
        self.ensure_film_and_user(film_id, user_id).await?;

        if self.storage.likes.has_like(film_id, user_id).await? {
            return Err(AppError::Conflict(format!(
                "User {} already likes film {}",
                user_id, film_id
            )));
        }

        self.storage.likes.add_like(film_id, user_id).await?;
        tracing::info!(film_id, user_id, "Like added");
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn remove_like(&self, film_id: FilmId, user_id: UserId) -> AppResult<()> {
        self.ensure_film_and_user(film_id, user_id).await?;

        if !self.storage.likes.remove_like(film_id, user_id).await? {
            return Err(AppError::NotFound(format!(
                "User {} has not liked film {}",
                user_id, film_id
            )));
        }

        tracing::info!(film_id, user_id, "Like removed");
        Ok(())
    }

    async fn ensure_film_and_user(&self, film_id: FilmId, user_id: UserId) -> AppResult<()> {
        if !self.storage.films.film_exists(film_id).await? {
            return Err(AppError::NotFound(format!("Film {} not found", film_id)));
        }
        if !self.storage.users.user_exists(user_id).await? {
            return Err(AppError::NotFound(format!("User {} not found", user_id)));
        }
        Ok(())
    }
}
