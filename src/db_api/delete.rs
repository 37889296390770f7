use sqlx::SqlitePool;

use super::{sql_id, StoreError};

/// Remove a stored issue. Returns false if there was nothing to remove.
pub async fn delete_issue(
    db_conn: &SqlitePool,
    table_name: &str,
    id: u64,
) -> Result<bool, StoreError> {
    let query_str = format!("DELETE FROM \"{table_name}\" WHERE \"id\" = ?1;");
    let result = sqlx::query(&query_str)
        .bind(sql_id(id)?)
        .execute(db_conn)
        .await?;
    Ok(result.rows_affected() > 0)
}
