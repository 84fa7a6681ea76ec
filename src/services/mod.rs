pub mod catalog;
pub mod likes;
pub mod ranking;
pub mod recommendations;
pub mod reference;
pub mod search;
pub mod validation;

pub use catalog::{CatalogService, DirectorSort, PopularQuery};
pub use likes::LikeService;
pub use recommendations::RecommendationService;
pub use reference::ReferenceService;
pub use search::{SearchMode, SearchService};
