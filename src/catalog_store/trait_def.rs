//! MovieStore trait definition.
//!
//! This trait abstracts the catalog data operations so that consumers such
//! as the recommender work against the seam rather than a concrete backend.

use super::models::Movie;
use super::store::StoreError;
use std::path::Path;

/// Trait for movie catalog storage backends.
pub trait MovieStore: Send + Sync {
    /// Ensure the movies table exists. Safe to call more than once.
    fn create_schema(&self) -> Result<(), StoreError>;

    /// Insert one movie. Genres are stored comma-joined, so a genre
    /// containing a literal comma will not round-trip.
    fn insert(&self, movie: &Movie) -> Result<(), StoreError>;

    /// Delete every row. A missing movies table is treated as a no-op.
    fn clear(&self) -> Result<(), StoreError>;

    /// Delete all rows whose title matches exactly (case-sensitive).
    /// Deleting an absent title is not an error.
    fn delete_by_title(&self, title: &str) -> Result<(), StoreError>;

    /// All movies, in whatever order the storage engine returns them.
    fn all_movies(&self) -> Result<Vec<Movie>, StoreError>;

    /// Movies with at least one genre equal to `genre`, compared
    /// case-insensitively (exact token match, not substring).
    fn movies_by_genre(&self, genre: &str) -> Result<Vec<Movie>, StoreError>;

    /// Bulk-load movies from a CSV file (header line skipped). Returns the
    /// number of rows inserted.
    fn load_from_csv(&self, path: &Path) -> Result<usize, StoreError>;

    /// Number of rows in the movies table.
    fn count(&self) -> Result<usize, StoreError>;
}
