use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use chrono::{Datelike, NaiveDate};
use tokio::sync::RwLock;

use crate::{
    error::{AppError, AppResult},
    models::{
        Director, DirectorId, FilmId, FilmRecord, FilmSummary, Genre, GenreId, Mpa, MpaId, UserId,
    },
};

use super::{DirectorStorage, FilmStorage, GenreStorage, LikeStorage, MpaStorage, UserStorage};

/// In-memory storage backed by ordered maps behind a single lock
#[derive(Default)]
pub struct MemoryStorage {
    inner: RwLock<MemoryStorageInner>,
}

#[derive(Default)]
struct MemoryStorageInner {
    films: BTreeMap<FilmId, FilmRecord>,
    film_genres: HashMap<FilmId, BTreeSet<GenreId>>,
    film_directors: HashMap<FilmId, BTreeSet<DirectorId>>,
    users: BTreeSet<UserId>,
    genres: BTreeMap<GenreId, Genre>,
    mpa: BTreeMap<MpaId, Mpa>,
    directors: BTreeMap<DirectorId, Director>,
    /// film id -> users who liked it
    likes: HashMap<FilmId, HashSet<UserId>>,
}

impl MemoryStorageInner {
    fn summary(&self, record: &FilmRecord) -> AppResult<FilmSummary> {
        let mpa = self.mpa.get(&record.mpa_id).cloned().ok_or_else(|| {
            AppError::Internal(format!(
                "Film {} references unknown MPA rating {}",
                record.id, record.mpa_id
            ))
        })?;

        let genres: Vec<Genre> = self
            .film_genres
            .get(&record.id)
            .into_iter()
            .flatten()
            .filter_map(|id| self.genres.get(id).cloned())
            .collect();

        let directors: Vec<Director> = self
            .film_directors
            .get(&record.id)
            .into_iter()
            .flatten()
            .filter_map(|id| self.directors.get(id).cloned())
            .collect();

        let like_count = self.likes.get(&record.id).map_or(0, |users| users.len() as u64);

        Ok(FilmSummary::assemble(record.clone(), mpa, &genres, &directors, like_count))
    }
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert_mpa(&self, mpa: Mpa) {
        self.inner.write().await.mpa.insert(mpa.id, mpa);
    }

    pub async fn insert_genre(&self, genre: Genre) {
        self.inner.write().await.genres.insert(genre.id, genre);
    }

    pub async fn insert_director(&self, director: Director) {
        self.inner.write().await.directors.insert(director.id, director);
    }

    pub async fn insert_user(&self, user_id: UserId) {
        self.inner.write().await.users.insert(user_id);
    }

    /// Inserts or replaces a film together with its genre and director links
    pub async fn insert_film(
        &self,
        record: FilmRecord,
        genre_ids: &[GenreId],
        director_ids: &[DirectorId],
    ) {
        let mut inner = self.inner.write().await;
        let id = record.id;
        inner.films.insert(id, record);
        inner
            .film_genres
            .insert(id, genre_ids.iter().copied().collect());
        inner
            .film_directors
            .insert(id, director_ids.iter().copied().collect());
    }

    /// MPA ratings and genres, identical to the rows the SQL migration seeds
    pub async fn seed_reference_data(&self) {
        let mut inner = self.inner.write().await;
        for (id, name) in [(1, "G"), (2, "PG"), (3, "PG-13"), (4, "R"), (5, "NC-17")] {
            inner.mpa.insert(id, Mpa::new(id, name));
        }
        for (id, name) in [
            (1, "Comedy"),
            (2, "Drama"),
            (3, "Cartoon"),
            (4, "Thriller"),
            (5, "Documentary"),
            (6, "Action"),
        ] {
            inner.genres.insert(id, Genre::new(id, name));
        }
    }

    /// A small catalog with users and likes so a memory-backed server has
    /// something to rank, search and recommend. Expects reference data.
    pub async fn seed_demo_catalog(&self) {
        self.insert_director(Director::new(1, "Lana Wachowski")).await;
        self.insert_director(Director::new(2, "Sofia Coppola")).await;
        self.insert_director(Director::new(3, "Michael Mann")).await;

        let films = [
            (1, "The Matrix", (1999, 3, 31), 136, 4, &[6][..], &[1][..]),
            (2, "Lost in Translation", (2003, 9, 12), 102, 4, &[1, 2][..], &[2][..]),
            (3, "Heat", (1995, 12, 15), 170, 4, &[4, 6][..], &[3][..]),
            (4, "Speed Racer", (2008, 5, 9), 135, 2, &[6][..], &[1][..]),
            (5, "Marie Antoinette", (2006, 10, 20), 123, 3, &[2][..], &[2][..]),
        ];
        for (id, name, (y, m, d), duration, mpa_id, genres, directors) in films {
            let Some(release_date) = NaiveDate::from_ymd_opt(y, m, d) else {
                continue;
            };
            let record = FilmRecord {
                id,
                name: name.to_string(),
                description: String::new(),
                release_date,
                duration,
                mpa_id,
            };
            self.insert_film(record, genres, directors).await;
        }

        let mut inner = self.inner.write().await;
        inner.users.extend(1..=3);
        for (film_id, user_id) in [(1, 1), (2, 1), (1, 2), (2, 2), (3, 2), (2, 3)] {
            inner.likes.entry(film_id).or_default().insert(user_id);
        }
    }
}

#[async_trait::async_trait]
impl LikeStorage for MemoryStorage {
    async fn likes_by_user(&self) -> AppResult<HashMap<UserId, HashSet<FilmId>>> {
        let inner = self.inner.read().await;
        let mut by_user: HashMap<UserId, HashSet<FilmId>> = HashMap::new();
        for (film_id, users) in &inner.likes {
            for user_id in users {
                by_user.entry(*user_id).or_default().insert(*film_id);
            }
        }
        Ok(by_user)
    }

    async fn like_count(&self, film_id: FilmId) -> AppResult<u64> {
        let inner = self.inner.read().await;
        Ok(inner.likes.get(&film_id).map_or(0, |users| users.len() as u64))
    }

    async fn like_counts(&self, film_ids: &[FilmId]) -> AppResult<HashMap<FilmId, u64>> {
        let inner = self.inner.read().await;
        Ok(film_ids
            .iter()
            .map(|id| (*id, inner.likes.get(id).map_or(0, |users| users.len() as u64)))
            .collect())
    }

    async fn has_like(&self, film_id: FilmId, user_id: UserId) -> AppResult<bool> {
        let inner = self.inner.read().await;
        Ok(inner
            .likes
            .get(&film_id)
            .is_some_and(|users| users.contains(&user_id)))
    }

    async fn add_like(&self, film_id: FilmId, user_id: UserId) -> AppResult<()> {
        let mut inner = self.inner.write().await;
        if !inner.films.contains_key(&film_id) {
            return Err(AppError::NotFound(format!("Film {} not found", film_id)));
        }
        if !inner.users.contains(&user_id) {
            return Err(AppError::NotFound(format!("User {} not found", user_id)));
        }
        if !inner.likes.entry(film_id).or_default().insert(user_id) {
            return Err(AppError::Conflict(format!(
                "User {} already likes film {}",
                user_id, film_id
            )));
        }
        Ok(())
    }

    async fn remove_like(&self, film_id: FilmId, user_id: UserId) -> AppResult<bool> {
        let mut inner = self.inner.write().await;
        Ok(inner
            .likes
            .get_mut(&film_id)
            .is_some_and(|users| users.remove(&user_id)))
    }
}

#[async_trait::async_trait]
impl FilmStorage for MemoryStorage {
    async fn film_exists(&self, film_id: FilmId) -> AppResult<bool> {
        Ok(self.inner.read().await.films.contains_key(&film_id))
    }

    async fn film_ids(&self) -> AppResult<Vec<FilmId>> {
        Ok(self.inner.read().await.films.keys().copied().collect())
    }

    async fn film_ids_by_genre(&self, genre_id: GenreId) -> AppResult<HashSet<FilmId>> {
        let inner = self.inner.read().await;
        Ok(inner
            .film_genres
            .iter()
            .filter(|(_, genres)| genres.contains(&genre_id))
            .map(|(film_id, _)| *film_id)
            .collect())
    }

    async fn film_ids_by_year(&self, year: i32) -> AppResult<HashSet<FilmId>> {
        let inner = self.inner.read().await;
        Ok(inner
            .films
            .values()
            .filter(|film| film.release_date.year() == year)
            .map(|film| film.id)
            .collect())
    }

    async fn film_titles(&self) -> AppResult<Vec<(FilmId, String)>> {
        let inner = self.inner.read().await;
        Ok(inner
            .films
            .values()
            .map(|film| (film.id, film.name.clone()))
            .collect())
    }

    async fn film_summaries(&self, film_ids: &[FilmId]) -> AppResult<Vec<FilmSummary>> {
        let inner = self.inner.read().await;
        film_ids
            .iter()
            .filter_map(|id| inner.films.get(id))
            .map(|record| inner.summary(record))
            .collect()
    }
}

#[async_trait::async_trait]
impl DirectorStorage for MemoryStorage {
    async fn director_exists(&self, director_id: DirectorId) -> AppResult<bool> {
        Ok(self.inner.read().await.directors.contains_key(&director_id))
    }

    async fn director_names_by_film(&self) -> AppResult<Vec<(FilmId, String)>> {
        let inner = self.inner.read().await;
        let mut names = Vec::new();
        for film_id in inner.films.keys() {
            for director_id in inner.film_directors.get(film_id).into_iter().flatten() {
                if let Some(director) = inner.directors.get(director_id) {
                    names.push((*film_id, director.name.clone()));
                }
            }
        }
        Ok(names)
    }

    async fn film_ids_by_director(&self, director_id: DirectorId) -> AppResult<HashSet<FilmId>> {
        let inner = self.inner.read().await;
        Ok(inner
            .film_directors
            .iter()
            .filter(|(_, directors)| directors.contains(&director_id))
            .map(|(film_id, _)| *film_id)
            .collect())
    }
}

#[async_trait::async_trait]
impl UserStorage for MemoryStorage {
    async fn user_exists(&self, user_id: UserId) -> AppResult<bool> {
        Ok(self.inner.read().await.users.contains(&user_id))
    }
}

#[async_trait::async_trait]
impl GenreStorage for MemoryStorage {
    async fn genres(&self) -> AppResult<Vec<Genre>> {
        Ok(self.inner.read().await.genres.values().cloned().collect())
    }

    async fn genre(&self, genre_id: GenreId) -> AppResult<Option<Genre>> {
        Ok(self.inner.read().await.genres.get(&genre_id).cloned())
    }
}

#[async_trait::async_trait]
impl MpaStorage for MemoryStorage {
    async fn mpa_ratings(&self) -> AppResult<Vec<Mpa>> {
        Ok(self.inner.read().await.mpa.values().cloned().collect())
    }

    async fn mpa(&self, mpa_id: MpaId) -> AppResult<Option<Mpa>> {
        Ok(self.inner.read().await.mpa.get(&mpa_id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn film(id: FilmId, name: &str, year: i32) -> FilmRecord {
        FilmRecord {
            id,
            name: name.to_string(),
            description: String::new(),
            release_date: NaiveDate::from_ymd_opt(year, 1, 1).unwrap(),
            duration: 100,
            mpa_id: 1,
        }
    }

    async fn seeded() -> MemoryStorage {
        let store = MemoryStorage::new();
        store.insert_mpa(Mpa::new(1, "G")).await;
        store.insert_genre(Genre::new(1, "Comedy")).await;
        store.insert_genre(Genre::new(2, "Drama")).await;
        store.insert_director(Director::new(1, "Greta Gerwig")).await;
        store.insert_film(film(1, "Lady Bird", 2017), &[1, 2], &[1]).await;
        store.insert_film(film(2, "Heat", 1995), &[2], &[]).await;
        store.insert_user(10).await;
        store.insert_user(11).await;
        store
    }

    #[tokio::test]
    async fn test_like_counts_follow_likes() {
        let store = seeded().await;
        store.add_like(1, 10).await.unwrap();
        store.add_like(1, 11).await.unwrap();
        store.add_like(2, 10).await.unwrap();

        assert_eq!(store.like_count(1).await.unwrap(), 2);
        let counts = store.like_counts(&[1, 2, 99]).await.unwrap();
        assert_eq!(counts[&1], 2);
        assert_eq!(counts[&2], 1);
        assert_eq!(counts[&99], 0);

        assert!(store.remove_like(1, 11).await.unwrap());
        assert!(!store.remove_like(1, 11).await.unwrap());
        let summaries = store.film_summaries(&[1]).await.unwrap();
        assert_eq!(summaries[0].like_count, 1);
    }

    #[tokio::test]
    async fn test_demo_catalog_is_consistent() {
        let store = MemoryStorage::new();
        store.seed_reference_data().await;
        store.seed_demo_catalog().await;

        assert_eq!(store.genres().await.unwrap().len(), 6);
        assert_eq!(store.mpa(3).await.unwrap(), Some(Mpa::new(3, "PG-13")));

        let ids = store.film_ids().await.unwrap();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
        // every film resolves its MPA rating
        assert_eq!(store.film_summaries(&ids).await.unwrap().len(), 5);
        assert_eq!(store.like_count(2).await.unwrap(), 3);
        assert!(store.user_exists(3).await.unwrap());
    }

    #[tokio::test]
    async fn test_duplicate_like_conflicts() {
        let store = seeded().await;
        store.add_like(2, 11).await.unwrap();
        let err = store.add_like(2, 11).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_like_for_unknown_entities_is_not_found() {
        let store = seeded().await;
        assert!(matches!(store.add_like(42, 10).await, Err(AppError::NotFound(_))));
        assert!(matches!(store.add_like(1, 42).await, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_likes_grouped_by_user() {
        let store = seeded().await;
        store.add_like(1, 10).await.unwrap();
        store.add_like(2, 10).await.unwrap();
        store.add_like(2, 11).await.unwrap();

        let by_user = store.likes_by_user().await.unwrap();
        assert_eq!(by_user[&10], HashSet::from([1, 2]));
        assert_eq!(by_user[&11], HashSet::from([2]));
    }

    #[tokio::test]
    async fn test_filters_and_enrichment() {
        let store = seeded().await;
        assert_eq!(store.film_ids_by_genre(2).await.unwrap(), HashSet::from([1, 2]));
        assert_eq!(store.film_ids_by_year(1995).await.unwrap(), HashSet::from([2]));
        assert_eq!(store.film_ids_by_director(1).await.unwrap(), HashSet::from([1]));
        assert_eq!(
            store.director_names_by_film().await.unwrap(),
            vec![(1, "Greta Gerwig".to_string())]
        );

        let summaries = store.film_summaries(&[1, 404]).await.unwrap();
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].genres.len(), 2);
        assert_eq!(summaries[0].directors[0].name, "Greta Gerwig");
        assert_eq!(summaries[0].mpa.name, "G");
    }
}
