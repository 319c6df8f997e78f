mod models;
mod schema;
mod store;
mod trait_def;

pub use models::Movie;
pub use schema::{CatalogSchema, MOVIE_VERSIONED_SCHEMAS};
pub use store::{SqliteMovieStore, StoreError};
pub use trait_def::MovieStore;
