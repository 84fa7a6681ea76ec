//! Popularity ordering shared by every ranked query.
//!
//! Films are ordered by like count, highest first. Equal counts fall back
//! to ascending film id so repeated calls over the same data agree.

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::models::{FilmId, FilmSummary};

fn by_popularity(a: (u64, FilmId), b: (u64, FilmId)) -> Ordering {
    b.0.cmp(&a.0).then(a.1.cmp(&b.1))
}

/// Orders film ids by their like counts and keeps at most `limit` of them
pub fn top_film_ids(counts: &HashMap<FilmId, u64>, limit: usize) -> Vec<FilmId> {
    let mut ranked: Vec<(u64, FilmId)> = counts.iter().map(|(id, count)| (*count, *id)).collect();
    ranked.sort_by(|a, b| by_popularity(*a, *b));
    ranked.into_iter().take(limit).map(|(_, id)| id).collect()
}

/// Sorts summaries into popularity order
pub fn rank_by_popularity(mut films: Vec<FilmSummary>) -> Vec<FilmSummary> {
    films.sort_by(|a, b| by_popularity((a.like_count, a.id), (b.like_count, b.id)));
    films
}

/// Sorts summaries by release date, oldest first
pub fn rank_by_release(mut films: Vec<FilmSummary>) -> Vec<FilmSummary> {
    films.sort_by(|a, b| a.release_date.cmp(&b.release_date).then(a.id.cmp(&b.id)));
    films
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FilmRecord, Mpa};
    use chrono::NaiveDate;

    fn summary(id: FilmId, likes: u64, year: i32) -> FilmSummary {
        let record = FilmRecord {
            id,
            name: format!("Film {}", id),
            description: String::new(),
            release_date: NaiveDate::from_ymd_opt(year, 6, 1).unwrap(),
            duration: 90,
            mpa_id: 1,
        };
        FilmSummary::assemble(record, Mpa::new(1, "G"), &[], &[], likes)
    }

    #[test]
    fn test_top_ids_breaks_ties_by_id() {
        let counts = HashMap::from([(1, 5), (2, 2), (3, 5)]);
        assert_eq!(top_film_ids(&counts, 2), vec![1, 3]);
        assert_eq!(top_film_ids(&counts, 10), vec![1, 3, 2]);
    }

    #[test]
    fn test_top_ids_zero_limit_is_empty() {
        let counts = HashMap::from([(1, 5)]);
        assert!(top_film_ids(&counts, 0).is_empty());
    }

    #[test]
    fn test_rank_by_popularity_is_non_increasing() {
        let films = vec![summary(4, 1, 2000), summary(2, 9, 2001), summary(3, 1, 1999)];
        let ranked = rank_by_popularity(films);
        let ids: Vec<FilmId> = ranked.iter().map(|f| f.id).collect();
        assert_eq!(ids, vec![2, 3, 4]);
        assert!(ranked.windows(2).all(|w| w[0].like_count >= w[1].like_count));
    }

    #[test]
    fn test_rank_by_release() {
        let films = vec![summary(1, 0, 2010), summary(2, 0, 1990), summary(3, 0, 2000)];
        let ids: Vec<FilmId> = rank_by_release(films).iter().map(|f| f.id).collect();
        assert_eq!(ids, vec![2, 3, 1]);
    }
}
