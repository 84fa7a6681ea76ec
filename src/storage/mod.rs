//! Storage collaborators consumed by the catalog services.
//!
//! Each trait covers one slice of the relational model. Services receive
//! them as `Arc<dyn Trait>` so the same logic runs over PostgreSQL in
//! production and over [`MemoryStorage`] in tests and local runs.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::{
    config::{Config, StorageBackend},
    error::AppResult,
    models::{DirectorId, FilmId, FilmSummary, Genre, GenreId, Mpa, MpaId, UserId},
};

pub mod memory;
pub mod postgres;

pub use memory::MemoryStorage;
pub use postgres::{create_pool, PgStorage};

/// Like relation between users and films
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait LikeStorage: Send + Sync {
    /// Every like, grouped by user, built in one pass
    async fn likes_by_user(&self) -> AppResult<HashMap<UserId, HashSet<FilmId>>>;

    async fn like_count(&self, film_id: FilmId) -> AppResult<u64>;

    /// Like counts for the given films; films without likes map to zero
    async fn like_counts(&self, film_ids: &[FilmId]) -> AppResult<HashMap<FilmId, u64>>;

    async fn has_like(&self, film_id: FilmId, user_id: UserId) -> AppResult<bool>;

    async fn add_like(&self, film_id: FilmId, user_id: UserId) -> AppResult<()>;

    /// Returns `false` when there was no such like
    async fn remove_like(&self, film_id: FilmId, user_id: UserId) -> AppResult<bool>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait FilmStorage: Send + Sync {
    async fn film_exists(&self, film_id: FilmId) -> AppResult<bool>;

    async fn film_ids(&self) -> AppResult<Vec<FilmId>>;

    async fn film_ids_by_genre(&self, genre_id: GenreId) -> AppResult<HashSet<FilmId>>;

    async fn film_ids_by_year(&self, year: i32) -> AppResult<HashSet<FilmId>>;

    /// (film id, title) for every film
    async fn film_titles(&self) -> AppResult<Vec<(FilmId, String)>>;

    /// Enriched summaries for the given ids, in no particular order.
    /// Ids that do not exist are skipped.
    async fn film_summaries(&self, film_ids: &[FilmId]) -> AppResult<Vec<FilmSummary>>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait DirectorStorage: Send + Sync {
    async fn director_exists(&self, director_id: DirectorId) -> AppResult<bool>;

    /// (film id, director name) for every film/director link
    async fn director_names_by_film(&self) -> AppResult<Vec<(FilmId, String)>>;

    async fn film_ids_by_director(&self, director_id: DirectorId) -> AppResult<HashSet<FilmId>>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait UserStorage: Send + Sync {
    async fn user_exists(&self, user_id: UserId) -> AppResult<bool>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait GenreStorage: Send + Sync {
    async fn genres(&self) -> AppResult<Vec<Genre>>;

    async fn genre(&self, genre_id: GenreId) -> AppResult<Option<Genre>>;

    async fn genre_exists(&self, genre_id: GenreId) -> AppResult<bool> {
        Ok(self.genre(genre_id).await?.is_some())
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait MpaStorage: Send + Sync {
    async fn mpa_ratings(&self) -> AppResult<Vec<Mpa>>;

    async fn mpa(&self, mpa_id: MpaId) -> AppResult<Option<Mpa>>;
}

/// Builds the configured backend.
///
/// PostgreSQL gets its migrations applied; the memory backend gets the same
/// reference rows plus, unless disabled, the demo catalog.
pub async fn connect(config: &Config) -> anyhow::Result<Storage> {
    match config.storage {
        StorageBackend::Postgres => {
            let pool = create_pool(&config.database_url, config.db_max_connections).await?;
            postgres::run_migrations(&pool).await?;
            tracing::info!(
                max_connections = config.db_max_connections,
                "Connected to PostgreSQL"
            );
            Ok(Storage::postgres(PgStorage::new(pool)))
        }
        StorageBackend::Memory => {
            let store = Arc::new(MemoryStorage::new());
            store.seed_reference_data().await;
            if config.memory_demo_data {
                store.seed_demo_catalog().await;
            }
            tracing::warn!(
                demo_data = config.memory_demo_data,
                "Using in-memory storage; data is lost on shutdown"
            );
            Ok(Storage::in_memory(store))
        }
    }
}

/// The full set of storage collaborators, wired once at startup
#[derive(Clone)]
pub struct Storage {
    pub likes: Arc<dyn LikeStorage>,
    pub films: Arc<dyn FilmStorage>,
    pub directors: Arc<dyn DirectorStorage>,
    pub users: Arc<dyn UserStorage>,
    pub genres: Arc<dyn GenreStorage>,
    pub mpa: Arc<dyn MpaStorage>,
}

impl Storage {
    /// Uses a single in-memory store for every collaborator
    pub fn in_memory(store: Arc<MemoryStorage>) -> Self {
        Self {
            likes: store.clone(),
            films: store.clone(),
            directors: store.clone(),
            users: store.clone(),
            genres: store.clone(),
            mpa: store,
        }
    }

    /// Uses PostgreSQL for every collaborator
    pub fn postgres(store: PgStorage) -> Self {
        let store = Arc::new(store);
        Self {
            likes: store.clone(),
            films: store.clone(),
            directors: store.clone(),
            users: store.clone(),
            genres: store.clone(),
            mpa: store,
        }
    }
}
