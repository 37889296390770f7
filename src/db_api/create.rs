use sqlx::{Executor, SqlitePool};

pub fn format_sql_create_issues_table_command(table_name: &str) -> String {
    format!(
        "CREATE TABLE IF NOT EXISTS \"{0}\" (
            \"id\" INTEGER PRIMARY KEY,
            \"repository\" TEXT NOT NULL,
            \"number\" INTEGER NOT NULL,
            \"is_pull_request\" INTEGER NOT NULL,
            \"state\" TEXT NOT NULL,
            \"updated_at\" TEXT NOT NULL,
            \"data\" TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS \"{0}_updated_at\" ON \"{0}\" (\"updated_at\");",
        table_name
    )
}

/// Create the issues table and its index, unless they already exist
pub async fn create_issues_table_if_missing(
    db_conn: &SqlitePool,
    table_name: &str,
) -> Result<(), sqlx::Error> {
    log::debug!("Creating table \"{table_name}\" if missing");
    db_conn
        .execute(format_sql_create_issues_table_command(table_name).as_str())
        .await?;
    Ok(())
}
