use std::time::Instant;

use sqlx::SqlitePool;

use crate::github::api_response::IssueSearchItem;

use super::{format_timestamp, sql_id, StoreError};

/// Insert issues, replacing any stored row with the same id.
///
/// All rows are written in a single transaction: either every item is stored or none is.
///
/// Returns the number of rows affected.
pub async fn upsert_issues(
    db_conn: &SqlitePool,
    table_name: &str,
    issues: &[IssueSearchItem],
) -> Result<u64, StoreError> {
    let instant = Instant::now();
    let sql_query = format!(
        "INSERT INTO \"{table_name}\" (\"id\", \"repository\", \"number\", \"is_pull_request\", \"state\", \"updated_at\", \"data\")
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
        ON CONFLICT(\"id\") DO UPDATE SET
            \"repository\" = excluded.\"repository\",
            \"number\" = excluded.\"number\",
            \"is_pull_request\" = excluded.\"is_pull_request\",
            \"state\" = excluded.\"state\",
            \"updated_at\" = excluded.\"updated_at\",
            \"data\" = excluded.\"data\""
    );

    let mut transaction = db_conn.begin().await?;
    let mut rows_affected = 0;
    for issue in issues {
        let result = sqlx::query(&sql_query)
            .bind(sql_id(issue.id)?)
            .bind(issue.repository_full_name())
            .bind(sql_id(issue.number)?)
            .bind(issue.is_pull_request())
            .bind(issue.state.as_str())
            .bind(format_timestamp(&issue.updated_at))
            .bind(serde_json::to_string(issue)?)
            .execute(&mut *transaction)
            .await?;
        rows_affected += result.rows_affected();
    }
    transaction.commit().await?;

    log::info!(
        "database upsert {:.2?}, size {}",
        instant.elapsed(),
        issues.len(),
    );
    Ok(rows_affected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        db_api::{create::create_issues_table_if_missing, memory_pool, query_db},
        github::api_response::{tests::issue, IssueState},
    };

    #[tokio::test]
    async fn upsert_replaces_by_id() {
        let pool = memory_pool().await;
        create_issues_table_if_missing(&pool, "issues").await.unwrap();

        let first = vec![issue(1, "a/b", 1, false), issue(2, "a/b", 2, true)];
        assert_eq!(upsert_issues(&pool, "issues", &first).await.unwrap(), 2);

        let mut changed = issue(1, "a/b", 1, false);
        changed.state = IssueState::Closed;
        changed.title = "Renamed".to_owned();
        upsert_issues(&pool, "issues", &[changed.clone(), issue(3, "c/d", 9, false)])
            .await
            .unwrap();

        assert_eq!(query_db::count_table_entries(&pool, "issues").await.unwrap(), 3);
        let stored = query_db::fetch_issue(&pool, "issues", 1).await.unwrap().unwrap();
        assert_eq!(stored, changed);
    }

    #[tokio::test]
    async fn failed_upsert_stores_nothing() {
        let pool = memory_pool().await;
        create_issues_table_if_missing(&pool, "issues").await.unwrap();

        let too_big = issue(u64::MAX, "a/b", 1, false);
        let err = upsert_issues(&pool, "issues", &[issue(1, "a/b", 1, false), too_big])
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::IdOutOfRange(u64::MAX)));
        assert_eq!(query_db::count_table_entries(&pool, "issues").await.unwrap(), 0);
    }
}
