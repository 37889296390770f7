use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};

use crate::github::api_response::IssueSearchItem;

use super::{format_timestamp, sql_id, StoreError};

/// Counts the total number of entries in the given table.
pub async fn count_table_entries(
    db_conn: &SqlitePool,
    table_name: &str,
) -> Result<i64, sqlx::Error> {
    let query_str = format!("SELECT count(*) AS count FROM \"{table_name}\";");
    let row = sqlx::query(&query_str).fetch_one(db_conn).await?;
    row.try_get("count")
}

/// Stored issue with the given id, if any
pub async fn fetch_issue(
    db_conn: &SqlitePool,
    table_name: &str,
    id: u64,
) -> Result<Option<IssueSearchItem>, StoreError> {
    let query_str = format!("SELECT \"data\" FROM \"{table_name}\" WHERE \"id\" = ?1;");
    let row = sqlx::query(&query_str)
        .bind(sql_id(id)?)
        .fetch_optional(db_conn)
        .await?;
    match row {
        Some(row) => Ok(Some(serde_json::from_str(&row.try_get::<String, _>("data")?)?)),
        None => Ok(None),
    }
}

/// Stored issues updated at or after `since`, most recently updated first.
///
/// Optionally restricted to a single repository (`owner/name`).
pub async fn fetch_issues_updated_since(
    db_conn: &SqlitePool,
    table_name: &str,
    since: DateTime<Utc>,
    repository: Option<&str>,
) -> Result<Vec<IssueSearchItem>, StoreError> {
    let query_str = format!(
        "SELECT \"data\" FROM \"{table_name}\"
        WHERE \"updated_at\" >= ?1 AND (?2 IS NULL OR \"repository\" = ?2)
        ORDER BY \"updated_at\" DESC, \"id\" ASC;"
    );
    let rows = sqlx::query(&query_str)
        .bind(format_timestamp(&since))
        .bind(repository)
        .fetch_all(db_conn)
        .await?;

    let mut issues = Vec::with_capacity(rows.len());
    for row in rows {
        issues.push(serde_json::from_str(&row.try_get::<String, _>("data")?)?);
    }
    Ok(issues)
}
