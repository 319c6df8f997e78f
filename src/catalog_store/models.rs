//! Catalog models for the movie store.

use serde::{Deserialize, Serialize};

/// A single movie in the catalog.
///
/// Plain value object with no validation on construction: empty titles,
/// empty genre lists and negative years are all accepted. The genre list
/// preserves duplicates and insertion order, since the store re-serializes
/// it verbatim.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Movie {
    pub title: String,
    pub genres: Vec<String>,
    pub year: i32,
}

impl Movie {
    /// Create a new movie.
    pub fn new(
        title: impl Into<String>,
        genres: impl IntoIterator<Item = impl Into<String>>,
        year: i32,
    ) -> Self {
        Self {
            title: title.into(),
            genres: genres.into_iter().map(Into::into).collect(),
            year,
        }
    }
}
