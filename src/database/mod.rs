// Copyright 2023 Remi Bernotavicius

use crate::error::{Result, StoreError};
use diesel::prelude::Connection as _;
use diesel::RunQueryDsl as _;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};

pub mod models;
pub mod schema;

pub type Connection = diesel::sqlite::SqliteConnection;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

/// Opens the database at `database_url` (a path, or `:memory:`) and brings it
/// up to date. Foreign keys must be switched on per connection for the
/// cascade and restrict rules in the schema to apply.
pub fn establish_connection(database_url: &str) -> Result<Connection> {
    let mut connection = Connection::establish(database_url)?;
    diesel::sql_query("PRAGMA foreign_keys = ON;").execute(&mut connection)?;
    diesel::sql_query("PRAGMA busy_timeout = 5000;").execute(&mut connection)?;
    connection
        .run_pending_migrations(MIGRATIONS)
        .map_err(|e| StoreError::Migration(e.to_string()))?;
    Ok(connection)
}

#[cfg(test)]
pub fn test_connection() -> Connection {
    establish_connection(":memory:").unwrap()
}

#[cfg(test)]
mod tests {
    use diesel::QueryDsl as _;
    use diesel::RunQueryDsl as _;

    #[test]
    fn migrations() {
        let mut conn = super::test_connection();

        // All tables from the initial migration exist and are empty.
        use super::schema::recipes::dsl::*;
        let count: i64 = recipes.count().get_result(&mut conn).unwrap();
        assert_eq!(count, 0);
    }
}
