use std::collections::HashSet;
use std::str::FromStr;

use tracing::instrument;

use crate::{
    error::{AppError, AppResult},
    models::{FilmId, FilmSummary, SearchHit},
    services::ranking::rank_by_popularity,
    storage::Storage,
};

/// Which film attributes a search query is matched against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchMode {
    Title,
    Director,
    TitleAndDirector,
}

impl SearchMode {
    fn includes_title(self) -> bool {
        matches!(self, SearchMode::Title | SearchMode::TitleAndDirector)
    }

    fn includes_director(self) -> bool {
        matches!(self, SearchMode::Director | SearchMode::TitleAndDirector)
    }
}

impl FromStr for SearchMode {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "title" => Ok(SearchMode::Title),
            "director" => Ok(SearchMode::Director),
            "title,director" | "director,title" => Ok(SearchMode::TitleAndDirector),
            other => Err(AppError::InvalidInput(format!(
                "by must be one of 'title', 'director', 'title,director', got '{}'",
                other
            ))),
        }
    }
}

/// Case-insensitive substring match.
///
/// Uses Unicode lowercase mapping, which does not depend on the process
/// locale.
fn contains_folded(text: &str, folded_query: &str) -> bool {
    text.to_lowercase().contains(folded_query)
}

/// Keeps the hits whose text contains the query
pub fn matching_hits<I>(hits: I, query: &str) -> Vec<SearchHit>
where
    I: IntoIterator<Item = SearchHit>,
{
    let folded = query.to_lowercase();
    hits.into_iter()
        .filter(|hit| contains_folded(&hit.text, &folded))
        .collect()
}

/// Film ids of the hits in first-seen order, each id once
pub fn distinct_film_ids(hits: &[SearchHit]) -> Vec<FilmId> {
    let mut seen = HashSet::new();
    hits.iter()
        .filter(|hit| seen.insert(hit.film_id))
        .map(|hit| hit.film_id)
        .collect()
}

/// Substring search over film titles and director names
pub struct SearchService {
    storage: Storage,
}

impl SearchService {
    pub fn new(storage: Storage) -> Self {
        Self { storage }
    }

    /// Parses `mode` and runs the search; see [`SearchService::search_with_mode`]
    pub async fn search(&self, query: &str, mode: &str) -> AppResult<Vec<FilmSummary>> {
        let mode: SearchMode = mode.parse()?;
        self.search_with_mode(query, mode).await
    }

    /// Films whose title and/or director name contains `query`, most popular first
    #[instrument(skip(self))]
    pub async fn search_with_mode(
        &self,
        query: &str,
        mode: SearchMode,
    ) -> AppResult<Vec<FilmSummary>> {
        let mut hits = Vec::new();

        if mode.includes_title() {
            let titles = self.storage.films.film_titles().await?;
            hits.extend(matching_hits(titles.into_iter().map(SearchHit::from), query));
        }

        if mode.includes_director() {
            let names = self.storage.directors.director_names_by_film().await?;
            hits.extend(matching_hits(names.into_iter().map(SearchHit::from), query));
        }

        let ids = distinct_film_ids(&hits);
        tracing::info!(query, ?mode, hits = hits.len(), films = ids.len(), "Search matched");

        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let films = self.storage.films.film_summaries(&ids).await?;
        Ok(rank_by_popularity(films))
    }
}
