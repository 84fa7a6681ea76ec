//! Nearest-neighbour film recommendations.
//!
//! The neighbour of a user is the other user whose liked films overlap
//! theirs the most. Recommendations are the films the neighbour liked that
//! the user has not. Only one neighbour is ever used; when several share
//! the highest overlap, the one with the lowest id wins.

use std::collections::{HashMap, HashSet};

use tracing::instrument;

use crate::{
    error::{AppError, AppResult},
    models::{FilmId, FilmSummary, UserId},
    storage::Storage,
};

/// Likes of every user, as read from storage for one computation
pub type LikeProfiles = HashMap<UserId, HashSet<FilmId>>;

/// Finds the user sharing the most likes with `target`.
///
/// Returns `None` when the target has no likes or nobody shares any of them.
pub fn most_similar_user(profiles: &LikeProfiles, target: UserId) -> Option<UserId> {
    let target_likes = profiles.get(&target).filter(|likes| !likes.is_empty())?;

    profiles
        .iter()
        .filter(|(user_id, _)| **user_id != target)
        .map(|(user_id, likes)| (*user_id, target_likes.intersection(likes).count()))
        .filter(|(_, overlap)| *overlap > 0)
        .max_by(|a, b| a.1.cmp(&b.1).then(b.0.cmp(&a.0)))
        .map(|(user_id, _)| user_id)
}

/// Films the neighbour of `target` liked that `target` has not, ascending by id
pub fn recommended_film_ids(profiles: &LikeProfiles, target: UserId) -> Vec<FilmId> {
    let Some(neighbor) = most_similar_user(profiles, target) else {
        return Vec::new();
    };

    let empty = HashSet::new();
    let target_likes = profiles.get(&target).unwrap_or(&empty);
    let mut ids: Vec<FilmId> = profiles
        .get(&neighbor)
        .unwrap_or(&empty)
        .difference(target_likes)
        .copied()
        .collect();
    ids.sort_unstable();
    ids
}

/// Builds recommendations from fresh like data on every call
pub struct RecommendationService {
    storage: Storage,
}

impl RecommendationService {
    pub fn new(storage: Storage) -> Self {
        Self { storage }
    }

    #[instrument(skip(self))]
    pub async fn recommendations(&self, user_id: UserId) -> AppResult<Vec<FilmSummary>> {
        if !self.storage.users.user_exists(user_id).await? {
            return Err(AppError::NotFound(format!("User {} not found", user_id)));
        }

        let profiles = self.storage.likes.likes_by_user().await?;
        let ids = recommended_film_ids(&profiles, user_id);
        if ids.is_empty() {
            tracing::debug!(user_id, users = profiles.len(), "No recommendation basis");
            return Ok(Vec::new());
        }

        let mut films = self.storage.films.film_summaries(&ids).await?;
        films.sort_by_key(|film| film.id);

        tracing::info!(user_id, recommended = films.len(), "Recommendations computed");
        Ok(films)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::fixtures;

    fn profiles(entries: &[(UserId, &[FilmId])]) -> LikeProfiles {
        entries
            .iter()
            .map(|(user, films)| (*user, films.iter().copied().collect()))
            .collect()
    }

    #[test]
    fn test_picks_largest_overlap() {
        let likes = profiles(&[(1, &[1, 2]), (2, &[1, 2, 3]), (3, &[2])]);
        assert_eq!(most_similar_user(&likes, 1), Some(2));
        assert_eq!(recommended_film_ids(&likes, 1), vec![3]);
    }

    #[test]
    fn test_tie_prefers_lowest_user_id() {
        let likes = profiles(&[(9, &[1, 5]), (4, &[1, 6]), (7, &[1, 7]), (1, &[1])]);
        assert_eq!(most_similar_user(&likes, 1), Some(4));
        assert_eq!(recommended_film_ids(&likes, 1), vec![6]);
    }

    #[test]
    fn test_no_likes_anywhere() {
        assert_eq!(most_similar_user(&LikeProfiles::new(), 1), None);
        assert!(recommended_film_ids(&LikeProfiles::new(), 1).is_empty());
    }

    #[test]
    fn test_target_without_likes() {
        let likes = profiles(&[(2, &[1, 2]), (3, &[3])]);
        assert!(recommended_film_ids(&likes, 1).is_empty());

        let with_empty = profiles(&[(1, &[]), (2, &[1])]);
        assert!(recommended_film_ids(&with_empty, 1).is_empty());
    }

    #[test]
    fn test_no_shared_like() {
        let likes = profiles(&[(1, &[1]), (2, &[2, 3])]);
        assert_eq!(most_similar_user(&likes, 1), None);
        assert!(recommended_film_ids(&likes, 1).is_empty());
    }

    #[test]
    fn test_neighbor_with_nothing_new() {
        // User 2 overlaps most but liked nothing user 1 hasn't; user 3 is not consulted
        let likes = profiles(&[(1, &[1, 2, 3]), (2, &[1, 2]), (3, &[3, 4])]);
        assert_eq!(most_similar_user(&likes, 1), Some(2));
        assert!(recommended_film_ids(&likes, 1).is_empty());
    }

    #[test]
    fn test_recommendations_exclude_own_likes() {
        let likes = profiles(&[(1, &[1, 2, 8]), (2, &[1, 2, 3, 8, 9]), (3, &[4])]);
        let recommended = recommended_film_ids(&likes, 1);
        assert_eq!(recommended, vec![3, 9]);
        assert!(recommended.iter().all(|id| !likes[&1].contains(id)));
    }

    #[test]
    fn test_service_end_to_end() {
        tokio_test::block_on(async {
            let (_, storage) = fixtures::seeded().await;
            let service = RecommendationService::new(storage);

            let films = service.recommendations(fixtures::U1).await.unwrap();
            assert_eq!(films.iter().map(|f| f.id).collect::<Vec<_>>(), vec![3]);
            assert_eq!(films[0].name, "Cloud Atlas");

            // U3 ties between U1 and U2; U1 wins and contributes film 1
            let films = service.recommendations(fixtures::U3).await.unwrap();
            assert_eq!(films.iter().map(|f| f.id).collect::<Vec<_>>(), vec![1]);

            assert!(service.recommendations(fixtures::U4).await.unwrap().is_empty());
        });
    }

    #[tokio::test]
    async fn test_unknown_user_is_not_found() {
        let (_, storage) = fixtures::seeded().await;
        let service = RecommendationService::new(storage);

        let err = service.recommendations(404).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
