use serde::{Deserialize, Serialize};
use sqlx::FromRow;

pub mod film;

pub use film::{FilmRecord, FilmSummary};

pub type FilmId = i64;
pub type UserId = i64;
pub type GenreId = i64;
pub type DirectorId = i64;
pub type MpaId = i64;

/// A film genre (comedy, drama, ...)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, FromRow)]
pub struct Genre {
    pub id: GenreId,
    pub name: String,
}

impl Genre {
    pub fn new(id: GenreId, name: impl Into<String>) -> Self {
        Self { id, name: name.into() }
    }
}

/// Motion Picture Association age rating
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, FromRow)]
pub struct Mpa {
    pub id: MpaId,
    pub name: String,
}

impl Mpa {
    pub fn new(id: MpaId, name: impl Into<String>) -> Self {
        Self { id, name: name.into() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, FromRow)]
pub struct Director {
    pub id: DirectorId,
    pub name: String,
}

impl Director {
    pub fn new(id: DirectorId, name: impl Into<String>) -> Self {
        Self { id, name: name.into() }
    }
}

/// A (film, matched text) pair produced while searching
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    pub film_id: FilmId,
    pub text: String,
}

impl SearchHit {
    pub fn new(film_id: FilmId, text: impl Into<String>) -> Self {
        Self { film_id, text: text.into() }
    }
}

impl From<(FilmId, String)> for SearchHit {
    fn from((film_id, text): (FilmId, String)) -> Self {
        Self { film_id, text }
    }
}
