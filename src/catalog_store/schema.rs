//! Schema definition for the movie catalog table.

/// Schema definition for catalog tables.
pub struct CatalogSchema {
    pub version: usize,
    pub up: &'static str,
}

pub const MOVIE_VERSIONED_SCHEMAS: &[CatalogSchema] = &[CatalogSchema {
    version: 1,
    up: r#"
            CREATE TABLE IF NOT EXISTS movies (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                genres TEXT NOT NULL,
                year INTEGER NOT NULL
            );
        "#,
}];
