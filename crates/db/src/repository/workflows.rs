//! Reads and updates on n8n's `workflow_entity` table.

use tracing::debug;

use crate::connection::release;
use crate::models::{DeployStatusRow, WorkflowEntityRow, WorkflowRef, WorkflowSummaryRow, WorkflowUpdate};
use crate::{Database, DbError};

/// Fetch the backup columns of a single workflow.
///
/// Returns `DbError::NotFound` if no row has this id.
pub async fn get_workflow(db: &Database, id: &str) -> Result<WorkflowEntityRow, DbError> {
    let mut conn = db.connect().await?;
    let result = sqlx::query_as::<_, WorkflowEntityRow>(
        r#"SELECT id, name, active, nodes, connections, settings FROM workflow_entity WHERE id = ?"#,
    )
    .bind(id)
    .fetch_optional(&mut conn)
    .await;
    release(conn).await;

    result
        .map_err(DbError::Query)?
        .ok_or_else(|| DbError::NotFound(id.to_string()))
}

/// Return every workflow whose name starts with `prefix`, ignoring ASCII case.
pub async fn find_workflows_by_prefix(
    db: &Database,
    prefix: &str,
) -> Result<Vec<WorkflowRef>, DbError> {
    let pattern = like_prefix(prefix);
    debug!(%pattern, "searching workflows by name prefix");

    let mut conn = db.connect().await?;
    let result = sqlx::query_as::<_, WorkflowRef>(
        r#"
        SELECT id, name FROM workflow_entity
        WHERE name LIKE ? ESCAPE '\'
        ORDER BY name, id
        "#,
    )
    .bind(pattern)
    .fetch_all(&mut conn)
    .await;
    release(conn).await;

    result.map_err(DbError::Query)
}

/// Overwrite the definition columns of one workflow and bump `updatedAt`.
///
/// Columns not named in [`WorkflowUpdate`] (`active`, `createdAt`, …) are left
/// alone.  Returns the number of rows affected; `0` means the id does not
/// exist, which callers must treat differently from a failed statement.
pub async fn update_workflow(
    db: &Database,
    id: &str,
    update: WorkflowUpdate<'_>,
) -> Result<u64, DbError> {
    let mut conn = db.connect().await?;
    let result = sqlx::query(
        r#"
        UPDATE workflow_entity
        SET nodes = ?,
            connections = ?,
            settings = ?,
            name = ?,
            updatedAt = STRFTIME('%Y-%m-%d %H:%M:%f', 'NOW')
        WHERE id = ?
        "#,
    )
    .bind(update.nodes)
    .bind(update.connections)
    .bind(update.settings)
    .bind(update.name)
    .bind(id)
    .execute(&mut conn)
    .await;
    release(conn).await;

    Ok(result.map_err(DbError::Query)?.rows_affected())
}

/// Read back name, active flag and node count after a deploy.
pub async fn get_deploy_status(db: &Database, id: &str) -> Result<DeployStatusRow, DbError> {
    let mut conn = db.connect().await?;
    let result = sqlx::query_as::<_, DeployStatusRow>(
        r#"
        SELECT name, active, json_array_length(nodes) AS node_count
        FROM workflow_entity
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(&mut conn)
    .await;
    release(conn).await;

    result
        .map_err(DbError::Query)?
        .ok_or_else(|| DbError::NotFound(id.to_string()))
}

/// Summary rows for the list report, most recently updated first.
///
/// With `prefix = None` every workflow in the database is returned.
pub async fn list_workflows(
    db: &Database,
    prefix: Option<&str>,
) -> Result<Vec<WorkflowSummaryRow>, DbError> {
    let mut conn = db.connect().await?;
    let result = match prefix {
        Some(prefix) => {
            sqlx::query_as::<_, WorkflowSummaryRow>(
                r#"
                SELECT id, name, active,
                       CAST(createdAt AS TEXT) AS created_at,
                       CAST(updatedAt AS TEXT) AS updated_at,
                       json_array_length(nodes) AS node_count
                FROM workflow_entity
                WHERE name LIKE ? ESCAPE '\'
                ORDER BY updatedAt DESC
                "#,
            )
            .bind(like_prefix(prefix))
            .fetch_all(&mut conn)
            .await
        }
        None => {
            sqlx::query_as::<_, WorkflowSummaryRow>(
                r#"
                SELECT id, name, active,
                       CAST(createdAt AS TEXT) AS created_at,
                       CAST(updatedAt AS TEXT) AS updated_at,
                       json_array_length(nodes) AS node_count
                FROM workflow_entity
                ORDER BY updatedAt DESC
                "#,
            )
            .fetch_all(&mut conn)
            .await
        }
    };
    release(conn).await;

    result.map_err(DbError::Query)
}

/// Build a `LIKE … ESCAPE '\'` pattern matching names that start with `prefix`.
fn like_prefix(prefix: &str) -> String {
    let mut pattern = String::with_capacity(prefix.len() + 1);
    for c in prefix.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
