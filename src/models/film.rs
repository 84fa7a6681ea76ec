use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use super::{Director, FilmId, Genre, Mpa};

/// Descriptive film columns as stored, before enrichment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilmRecord {
    pub id: FilmId,
    pub name: String,
    pub description: String,
    pub release_date: NaiveDate,
    pub duration: i32,
    pub mpa_id: i64,
}

/// A fully populated film returned to clients
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FilmSummary {
    pub id: FilmId,
    pub name: String,
    pub description: String,
    pub release_date: NaiveDate,
    /// Duration in minutes
    pub duration: i32,
    pub mpa: Mpa,
    pub genres: Vec<Genre>,
    pub directors: Vec<Director>,
    pub like_count: u64,
}

impl FilmSummary {
    /// Builds a summary from its parts.
    ///
    /// Genres and directors are copied and ordered by id, so the resulting
    /// value shares nothing with the collections it was built from.
    pub fn assemble(
        record: FilmRecord,
        mpa: Mpa,
        genres: &[Genre],
        directors: &[Director],
        like_count: u64,
    ) -> Self {
        let mut genres = genres.to_vec();
        genres.sort_by_key(|g| g.id);
        genres.dedup_by_key(|g| g.id);

        let mut directors = directors.to_vec();
        directors.sort_by_key(|d| d.id);
        directors.dedup_by_key(|d| d.id);

        Self {
            id: record.id,
            name: record.name,
            description: record.description,
            release_date: record.release_date,
            duration: record.duration,
            mpa,
            genres,
            directors,
            like_count,
        }
    }

    pub fn release_year(&self) -> i32 {
        self.release_date.year()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> FilmRecord {
        FilmRecord {
            id: 7,
            name: "The Matrix".to_string(),
            description: "A hacker learns the truth".to_string(),
            release_date: NaiveDate::from_ymd_opt(1999, 3, 31).unwrap(),
            duration: 136,
            mpa_id: 4,
        }
    }

    #[test]
    fn test_assemble_orders_and_dedups_genres() {
        let genres = vec![
            Genre::new(6, "Action"),
            Genre::new(2, "Drama"),
            Genre::new(6, "Action"),
        ];
        let summary = FilmSummary::assemble(record(), Mpa::new(4, "R"), &genres, &[], 3);

        let ids: Vec<i64> = summary.genres.iter().map(|g| g.id).collect();
        assert_eq!(ids, vec![2, 6]);
        assert_eq!(summary.like_count, 3);
        assert_eq!(summary.release_year(), 1999);
        // The input slice is untouched
        assert_eq!(genres.len(), 3);
    }

    #[test]
    fn test_summary_serializes_camel_case() {
        let directors = vec![Director::new(1, "Lana Wachowski")];
        let summary = FilmSummary::assemble(record(), Mpa::new(4, "R"), &[], &directors, 0);
        let json = serde_json::to_value(&summary).unwrap();

        assert_eq!(json["releaseDate"], "1999-03-31");
        assert_eq!(json["likeCount"], 0);
        assert_eq!(json["mpa"]["name"], "R");
        assert_eq!(json["directors"][0]["name"], "Lana Wachowski");
    }
}
