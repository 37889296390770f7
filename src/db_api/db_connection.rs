use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};

use crate::{config::Config, utils::env::database_url};

/// Create a connection pool to the database in `DATABASE_URL`, or the one in the config if unset.
///
/// For file databases, append `?mode=rwc` to the url to create the file if it doesn't exist yet.
pub async fn get_db_connection(config: &Config) -> Result<SqlitePool, sqlx::Error> {
    let url = database_url(config);
    log::info!("Connecting to database at {url}");
    SqlitePoolOptions::new().connect(&url).await
}
