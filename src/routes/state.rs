use std::sync::Arc;

use crate::{
    services::{CatalogService, LikeService, RecommendationService, ReferenceService, SearchService},
    storage::Storage,
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<CatalogService>,
    pub recommendations: Arc<RecommendationService>,
    pub search: Arc<SearchService>,
    pub likes: Arc<LikeService>,
    pub reference: Arc<ReferenceService>,
}

impl AppState {
    /// Wires every service to the given storage collaborators
    pub fn new(storage: Storage) -> Self {
        Self {
            catalog: Arc::new(CatalogService::new(storage.clone())),
            recommendations: Arc::new(RecommendationService::new(storage.clone())),
            search: Arc::new(SearchService::new(storage.clone())),
            likes: Arc::new(LikeService::new(storage.clone())),
            reference: Arc::new(ReferenceService::new(storage)),
        }
    }
}
