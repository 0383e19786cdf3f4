use std::sync::Arc;

use crate::services::catalog::MovieCatalog;
use crate::services::favorites::FavoritesStore;
use crate::services::trending::TrendingAggregator;

/// Shared application state
///
/// Everything behind a trait seam so the endpoint tests can swap in stubs
/// and in-memory stores.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<dyn MovieCatalog>,
    pub trending: TrendingAggregator,
    pub favorites: Arc<dyn FavoritesStore>,
}

impl AppState {
    pub fn new(
        catalog: Arc<dyn MovieCatalog>,
        trending: TrendingAggregator,
        favorites: Arc<dyn FavoritesStore>,
    ) -> Self {
        Self {
            catalog,
            trending,
            favorites,
        }
    }
}
