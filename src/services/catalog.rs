use std::collections::HashSet;
use std::str::FromStr;

use tracing::instrument;

use crate::{
    error::{AppError, AppResult},
    models::{DirectorId, FilmId, FilmSummary, GenreId, UserId},
    services::{
        ranking::{rank_by_popularity, rank_by_release, top_film_ids},
        validation::{validate_genre_id, validate_limit, validate_year},
    },
    storage::Storage,
};

/// Number of films returned by the popularity query when none is requested
pub const DEFAULT_POPULAR_COUNT: i64 = 10;

/// Parameters of a popularity query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PopularQuery {
    pub limit: i64,
    pub genre_id: Option<GenreId>,
    pub year: Option<i32>,
}

impl PopularQuery {
    pub fn top(limit: i64) -> Self {
        Self {
            limit,
            genre_id: None,
            year: None,
        }
    }
}

/// Ordering for a director's filmography
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DirectorSort {
    #[default]
    Year,
    Likes,
}

impl FromStr for DirectorSort {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "year" => Ok(DirectorSort::Year),
            "likes" => Ok(DirectorSort::Likes),
            other => Err(AppError::InvalidInput(format!(
                "sortBy must be 'year' or 'likes', got '{}'",
                other
            ))),
        }
    }
}

/// Ranked film queries: popularity, shared likes and director listings
pub struct CatalogService {
    storage: Storage,
}

impl CatalogService {
    pub fn new(storage: Storage) -> Self {
        Self { storage }
    }

    pub async fn popular_films(&self, limit: i64) -> AppResult<Vec<FilmSummary>> {
        self.get_popular_films(PopularQuery::top(limit)).await
    }

    pub async fn popular_films_by_year(
        &self,
        limit: i64,
        year: i32,
    ) -> AppResult<Vec<FilmSummary>> {
        self.get_popular_films(PopularQuery {
            limit,
            genre_id: None,
            year: Some(year),
        })
        .await
    }

    pub async fn popular_films_by_genre(
        &self,
        limit: i64,
        genre_id: GenreId,
    ) -> AppResult<Vec<FilmSummary>> {
        self.get_popular_films(PopularQuery {
            limit,
            genre_id: Some(genre_id),
            year: None,
        })
        .await
    }

    pub async fn popular_films_by_genre_and_year(
        &self,
        limit: i64,
        genre_id: GenreId,
        year: i32,
    ) -> AppResult<Vec<FilmSummary>> {
        self.get_popular_films(PopularQuery {
            limit,
            genre_id: Some(genre_id),
            year: Some(year),
        })
        .await
    }

    /// Most liked films, optionally restricted to a genre and/or release year
    #[instrument(skip(self))]
    pub async fn get_popular_films(&self, query: PopularQuery) -> AppResult<Vec<FilmSummary>> {
        let limit = validate_limit(query.limit)?;
        let genre_id = query.genre_id.map(validate_genre_id).transpose()?;
        let year = query.year.map(validate_year).transpose()?;

        if let Some(genre_id) = genre_id {
            if !self.storage.genres.genre_exists(genre_id).await? {
                return Err(AppError::NotFound(format!("Genre {} not found", genre_id)));
            }
        }

        if limit == 0 {
            return Ok(Vec::new());
        }

        let candidates: Vec<FilmId> = match (genre_id, year) {
            (Some(genre_id), Some(year)) => {
                let by_genre = self.storage.films.film_ids_by_genre(genre_id).await?;
                let by_year = self.storage.films.film_ids_by_year(year).await?;
                by_genre.intersection(&by_year).copied().collect()
            }
            (Some(genre_id), None) => self
                .storage
                .films
                .film_ids_by_genre(genre_id)
                .await?
                .into_iter()
                .collect(),
            (None, Some(year)) => self
                .storage
                .films
                .film_ids_by_year(year)
                .await?
                .into_iter()
                .collect(),
            (None, None) => self.storage.films.film_ids().await?,
        };

        if candidates.is_empty() {
            return Ok(Vec::new());
        }

        let counts = self.storage.likes.like_counts(&candidates).await?;
        let top = top_film_ids(&counts, limit);
        let films = self.storage.films.film_summaries(&top).await?;

        tracing::info!(
            requested = limit,
            candidates = candidates.len(),
            returned = films.len(),
            "Popular films ranked"
        );

        Ok(rank_by_popularity(films))
    }

    /// Films liked by both users, most popular first
    #[instrument(skip(self))]
    pub async fn common_films(
        &self,
        user_id: UserId,
        friend_id: UserId,
    ) -> AppResult<Vec<FilmSummary>> {
        self.ensure_user(user_id).await?;
        self.ensure_user(friend_id).await?;

        let likes = self.storage.likes.likes_by_user().await?;
        let (Some(first), Some(second)) = (likes.get(&user_id), likes.get(&friend_id)) else {
            return Ok(Vec::new());
        };

        let shared: Vec<FilmId> = first.intersection(second).copied().collect();
        if shared.is_empty() {
            return Ok(Vec::new());
        }

        let films = self.storage.films.film_summaries(&shared).await?;
        tracing::info!(user_id, friend_id, shared = films.len(), "Common films found");

        Ok(rank_by_popularity(films))
    }

    /// A director's films ordered by release date or popularity
    #[instrument(skip(self))]
    pub async fn films_by_director(
        &self,
        director_id: DirectorId,
        sort: DirectorSort,
    ) -> AppResult<Vec<FilmSummary>> {
        if !self.storage.directors.director_exists(director_id).await? {
            return Err(AppError::NotFound(format!("Director {} not found", director_id)));
        }

        let ids: HashSet<FilmId> = self.storage.directors.film_ids_by_director(director_id).await?;
        let ids: Vec<FilmId> = ids.into_iter().collect();
        let films = self.storage.films.film_summaries(&ids).await?;

        Ok(match sort {
            DirectorSort::Year => rank_by_release(films),
            DirectorSort::Likes => rank_by_popularity(films),
        })
    }

    async fn ensure_user(&self, user_id: UserId) -> AppResult<()> {
        if !self.storage.users.user_exists(user_id).await? {
            return Err(AppError::NotFound(format!("User {} not found", user_id)));
        }
        Ok(())
    }
}
