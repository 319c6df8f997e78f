//! Thin recommendation facade over the movie store.

use crate::catalog_store::{Movie, MovieStore, StoreError};
use std::sync::Arc;

/// High-level recommendation surface.
///
/// Delegates directly to the underlying [`MovieStore`] with no ranking,
/// caching or scoring; kept as a stable seam for future enrichment.
pub struct MovieRecommender {
    store: Arc<dyn MovieStore>,
}

impl MovieRecommender {
    /// Create a recommender backed by the given store.
    pub fn new(store: Arc<dyn MovieStore>) -> Self {
        Self { store }
    }

    /// All movies matching the given genre, case-insensitively.
    pub fn recommend_by_genre(&self, genre: &str) -> Result<Vec<Movie>, StoreError> {
        self.store.movies_by_genre(genre)
    }
}
