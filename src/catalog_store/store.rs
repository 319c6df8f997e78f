//! SQLite-backed movie store implementation.
//!
//! The store owns a single shared connection for its whole lifetime. This is
//! required for the `:memory:` mode: SQLite creates a fresh empty database
//! per connection, so reopening per call would lose all prior state.

use super::models::Movie;
use super::schema::MOVIE_VERSIONED_SCHEMAS;
use super::trait_def::MovieStore;
use crate::csv_line;
use rusqlite::{params, Connection};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use thiserror::Error;
use tracing::{debug, info};

/// Errors surfaced by the movie store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to open database connection: {0}")]
    Connection(rusqlite::Error),

    #[error("Failed to create movies table: {0}")]
    Schema(rusqlite::Error),

    #[error("Write to movies table failed: {0}")]
    Write(rusqlite::Error),

    #[error("Query against movies table failed: {0}")]
    Read(rusqlite::Error),

    #[error("Failed to close database connection: {0}")]
    Close(rusqlite::Error),

    #[error("Store used after close")]
    Closed,

    #[error("CSV file not found: {0}")]
    CsvNotFound(PathBuf),

    #[error("Invalid year {value:?} on CSV line {line}")]
    YearParse { line: usize, value: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// SQLite-backed movie catalog store.
///
/// Clones share the same underlying connection. All calls are blocking and
/// complete or fail before returning; the store stays usable after a failed
/// call. After [`close`](SqliteMovieStore::close), every operation returns
/// [`StoreError::Closed`].
#[derive(Clone)]
pub struct SqliteMovieStore {
    conn: Arc<Mutex<Option<Connection>>>,
}

impl SqliteMovieStore {
    /// Open a store at the given location.
    ///
    /// `":memory:"` opens an ephemeral in-memory database; any other value
    /// is treated as a file path. The schema is not created here, call
    /// [`create_schema`](MovieStore::create_schema) before writing.
    pub fn open(location: &str) -> Result<Self, StoreError> {
        let conn = Connection::open(location).map_err(StoreError::Connection)?;
        info!("Opened movie catalog database at {}", location);
        Ok(Self {
            conn: Arc::new(Mutex::new(Some(conn))),
        })
    }

    /// Close the store, releasing the connection.
    ///
    /// Exactly one close per open succeeds; closing again (or calling any
    /// other operation afterwards) returns [`StoreError::Closed`].
    pub fn close(&self) -> Result<(), StoreError> {
        let mut guard = self.conn.lock().unwrap();
        let conn = guard.take().ok_or(StoreError::Closed)?;
        conn.close().map_err(|(_, err)| StoreError::Close(err))?;
        Ok(())
    }
}

impl MovieStore for SqliteMovieStore {
    fn create_schema(&self) -> Result<(), StoreError> {
        let guard = self.conn.lock().unwrap();
        let conn = guard.as_ref().ok_or(StoreError::Closed)?;
        let schema = MOVIE_VERSIONED_SCHEMAS.last().unwrap();
        conn.execute_batch(schema.up).map_err(StoreError::Schema)?;
        Ok(())
    }

    fn insert(&self, movie: &Movie) -> Result<(), StoreError> {
        let guard = self.conn.lock().unwrap();
        let conn = guard.as_ref().ok_or(StoreError::Closed)?;
        conn.execute(
            "INSERT INTO movies (title, genres, year) VALUES (?1, ?2, ?3)",
            params![movie.title, movie.genres.join(","), movie.year],
        )
        .map_err(StoreError::Write)?;
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        let guard = self.conn.lock().unwrap();
        let conn = guard.as_ref().ok_or(StoreError::Closed)?;
        // A clear before create_schema is a no-op, not an error.
        if let Err(err) = conn.execute("DELETE FROM movies", []) {
            if !is_missing_table(&err) {
                return Err(StoreError::Write(err));
            }
            debug!("clear() before create_schema(), nothing to delete");
        }
        Ok(())
    }

    fn delete_by_title(&self, title: &str) -> Result<(), StoreError> {
        let guard = self.conn.lock().unwrap();
        let conn = guard.as_ref().ok_or(StoreError::Closed)?;
        conn.execute("DELETE FROM movies WHERE title = ?1", params![title])
            .map_err(StoreError::Write)?;
        Ok(())
    }

    fn all_movies(&self) -> Result<Vec<Movie>, StoreError> {
        let guard = self.conn.lock().unwrap();
        let conn = guard.as_ref().ok_or(StoreError::Closed)?;
        let mut stmt = conn
            .prepare("SELECT title, genres, year FROM movies")
            .map_err(StoreError::Read)?;
        let movies = stmt
            .query_map([], |row| {
                let title: String = row.get(0)?;
                let genres: String = row.get(1)?;
                let year: i32 = row.get(2)?;
                Ok(Movie {
                    title,
                    genres: split_genres(&genres),
                    year,
                })
            })
            .map_err(StoreError::Read)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(StoreError::Read)?;
        Ok(movies)
    }

    fn movies_by_genre(&self, genre: &str) -> Result<Vec<Movie>, StoreError> {
        // The genres column is comma-joined text, so the token match has to
        // happen here rather than in SQL.
        let needle = genre.to_lowercase();
        let movies = self.all_movies()?;
        Ok(movies
            .into_iter()
            .filter(|movie| movie.genres.iter().any(|g| g.to_lowercase() == needle))
            .collect())
    }

    fn load_from_csv(&self, path: &Path) -> Result<usize, StoreError> {
        if !path.exists() {
            return Err(StoreError::CsvNotFound(path.to_path_buf()));
        }

        let reader = BufReader::new(File::open(path)?);
        let mut loaded = 0usize;

        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            if index == 0 {
                // header
                continue;
            }
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            let fields = csv_line::split_line(trimmed);
            if fields.len() < 3 {
                debug!(
                    "Skipping CSV line {} with {} fields (need 3)",
                    index + 1,
                    fields.len()
                );
                continue;
            }

            let year = fields[2]
                .trim()
                .parse::<i32>()
                .map_err(|_| StoreError::YearParse {
                    line: index + 1,
                    value: fields[2].clone(),
                })?;
            let genres = split_genres(&fields[1]);
            self.insert(&Movie {
                title: fields[0].clone(),
                genres,
                year,
            })?;
            loaded += 1;
        }

        info!("Loaded {} movies from {}", loaded, path.display());
        Ok(loaded)
    }

    fn count(&self) -> Result<usize, StoreError> {
        let guard = self.conn.lock().unwrap();
        let conn = guard.as_ref().ok_or(StoreError::Closed)?;
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM movies", [], |row| row.get(0))
            .map_err(StoreError::Read)?;
        Ok(count as usize)
    }
}

/// Decode the comma-joined genres column. Always yields at least one token,
/// possibly the empty string.
fn split_genres(raw: &str) -> Vec<String> {
    raw.split(',').map(|g| g.trim().to_string()).collect()
}

fn is_missing_table(err: &rusqlite::Error) -> bool {
    err.to_string().contains("no such table")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_store() -> SqliteMovieStore {
        let store = SqliteMovieStore::open(":memory:").unwrap();
        store.create_schema().unwrap();
        store
    }

    #[test]
    fn test_insert_and_get_all_movies() {
        let store = create_test_store();
        store
            .insert(&Movie::new("Test Movie", ["Drama"], 2020))
            .unwrap();

        let movies = store.all_movies().unwrap();
        assert_eq!(movies.len(), 1);
        assert_eq!(movies[0].title, "Test Movie");
        assert_eq!(movies[0].year, 2020);
        assert_eq!(movies[0].genres, vec!["Drama"]);
    }

    #[test]
    fn test_round_trip_preserves_genre_order() {
        let store = create_test_store();
        store
            .insert(&Movie::new(
                "Mad Max: Fury Road",
                ["Action", "Adventure", "Sci-Fi"],
                2015,
            ))
            .unwrap();

        let movies = store.all_movies().unwrap();
        assert_eq!(movies[0].genres, vec!["Action", "Adventure", "Sci-Fi"]);
    }

    #[test]
    fn test_delete_by_title() {
        let store = create_test_store();
        store.insert(&Movie::new("Movie1", ["Action"], 2000)).unwrap();
        store.insert(&Movie::new("Movie2", ["Drama"], 2001)).unwrap();

        store.delete_by_title("Movie1").unwrap();

        let remaining = store.all_movies().unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].title, "Movie2");
    }

    #[test]
    fn test_delete_by_absent_title_is_not_an_error() {
        let store = create_test_store();
        store.insert(&Movie::new("Movie1", ["Action"], 2000)).unwrap();

        store.delete_by_title("No Such Movie").unwrap();

        assert_eq!(store.count().unwrap(), 1);
    }

    #[test]
    fn test_delete_by_title_is_case_sensitive() {
        let store = create_test_store();
        store.insert(&Movie::new("Movie1", ["Action"], 2000)).unwrap();

        store.delete_by_title("movie1").unwrap();

        assert_eq!(store.count().unwrap(), 1);
    }

    #[test]
    fn test_movies_by_genre() {
        let store = create_test_store();
        store
            .insert(&Movie::new("Movie1", ["Action", "Comedy"], 2000))
            .unwrap();
        store.insert(&Movie::new("Movie2", ["Drama"], 2001)).unwrap();

        let action = store.movies_by_genre("Action").unwrap();
        assert_eq!(action.len(), 1);
        assert_eq!(action[0].title, "Movie1");

        let drama = store.movies_by_genre("Drama").unwrap();
        assert_eq!(drama.len(), 1);
        assert_eq!(drama[0].title, "Movie2");
    }

    #[test]
    fn test_genre_match_is_case_insensitive() {
        let store = create_test_store();
        store.insert(&Movie::new("Movie1", ["Action"], 2000)).unwrap();

        assert_eq!(store.movies_by_genre("action").unwrap().len(), 1);
        assert_eq!(store.movies_by_genre("ACTION").unwrap().len(), 1);
    }

    #[test]
    fn test_genre_match_is_exact_not_substring() {
        let store = create_test_store();
        store.insert(&Movie::new("Movie1", ["Action"], 2000)).unwrap();

        assert!(store.movies_by_genre("Act").unwrap().is_empty());
    }

    #[test]
    fn test_clear_removes_all_rows() {
        let store = create_test_store();
        store.insert(&Movie::new("Movie1", ["Action"], 2000)).unwrap();
        store.insert(&Movie::new("Movie2", ["Drama"], 2001)).unwrap();

        store.clear().unwrap();

        assert_eq!(store.count().unwrap(), 0);
    }

    #[test]
    fn test_clear_without_schema_is_a_no_op() {
        let store = SqliteMovieStore::open(":memory:").unwrap();
        store.clear().unwrap();
    }

    #[test]
    fn test_create_schema_is_idempotent() {
        let store = create_test_store();
        store.insert(&Movie::new("Movie1", ["Action"], 2000)).unwrap();

        store.create_schema().unwrap();

        assert_eq!(store.count().unwrap(), 1);
    }

    #[test]
    fn test_use_after_close() {
        let store = create_test_store();
        store.close().unwrap();

        assert!(matches!(store.all_movies(), Err(StoreError::Closed)));
        assert!(matches!(
            store.insert(&Movie::new("Movie1", ["Action"], 2000)),
            Err(StoreError::Closed)
        ));
    }

    #[test]
    fn test_double_close() {
        let store = create_test_store();
        store.close().unwrap();
        assert!(matches!(store.close(), Err(StoreError::Closed)));
    }

    #[test]
    fn test_clones_share_the_same_database() {
        let store = create_test_store();
        let clone = store.clone();

        store.insert(&Movie::new("Movie1", ["Action"], 2000)).unwrap();

        assert_eq!(clone.count().unwrap(), 1);
    }

    #[test]
    fn test_genre_with_empty_list_round_trips_to_empty_token() {
        let store = create_test_store();
        store
            .insert(&Movie::new("Untagged", Vec::<String>::new(), 1999))
            .unwrap();

        let movies = store.all_movies().unwrap();
        assert_eq!(movies[0].genres, vec![""]);
    }
}
