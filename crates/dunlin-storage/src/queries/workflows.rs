// SPDX-FileCopyrightText: 2026 Dunlin Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Workflow definition lookups.
//!
//! Definition CRUD is owned by admin tooling elsewhere; the engine only
//! resolves and reads. Inserts exist for the admin path and test fixtures.

use rusqlite::params;

use dunlin_core::DunlinError;

use crate::database::Database;
use crate::models::{Workflow, WorkflowStep};

fn row_to_workflow(row: &rusqlite::Row<'_>) -> Result<Workflow, rusqlite::Error> {
    Ok(Workflow {
        id: row.get(0)?,
        account_id: row.get(1)?,
        bucket: row.get(2)?,
        name: row.get(3)?,
        is_active: row.get::<_, i64>(4)? != 0,
        created_at: row.get(5)?,
    })
}

/// Insert a workflow definition.
pub async fn insert_workflow(db: &Database, workflow: &Workflow) -> Result<(), DunlinError> {
    let workflow = workflow.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO workflows (id, account_id, bucket, name, is_active, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    workflow.id,
                    workflow.account_id,
                    workflow.bucket,
                    workflow.name,
                    workflow.is_active as i64,
                    workflow.created_at,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Insert a workflow step.
pub async fn insert_step(db: &Database, step: &WorkflowStep) -> Result<(), DunlinError> {
    let step = step.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO workflow_steps (id, workflow_id, step_order, day_offset, channel,
                                             subject, body)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    step.id,
                    step.workflow_id,
                    step.step_order,
                    step.day_offset,
                    step.channel,
                    step.subject,
                    step.body,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Find the single workflow definition governing `(account, bucket)`.
///
/// Precedence: an active account-owned definition wins over an active
/// platform default (`account_id IS NULL`). Among several of the same rank
/// the newest wins. Returns `None` when no active definition exists — a
/// normal outcome, not an error.
pub async fn resolve_for(
    db: &Database,
    account_id: &str,
    bucket: &str,
) -> Result<Option<Workflow>, DunlinError> {
    let account_id = account_id.to_string();
    let bucket = bucket.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, account_id, bucket, name, is_active, created_at
                 FROM workflows
                 WHERE bucket = ?1 AND is_active = 1
                   AND (account_id = ?2 OR account_id IS NULL)
                 ORDER BY (account_id IS NULL) ASC, created_at DESC
                 LIMIT 1",
            )?;
            let result = stmt.query_row(params![bucket, account_id], row_to_workflow);
            match result {
                Ok(workflow) => Ok(Some(workflow)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// All steps of a workflow in step order.
pub async fn steps_for(db: &Database, workflow_id: &str) -> Result<Vec<WorkflowStep>, DunlinError> {
    let workflow_id = workflow_id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, workflow_id, step_order, day_offset, channel, subject, body
                 FROM workflow_steps
                 WHERE workflow_id = ?1
                 ORDER BY step_order ASC",
            )?;
            let rows = stmt.query_map(params![workflow_id], |row| {
                Ok(WorkflowStep {
                    id: row.get(0)?,
                    workflow_id: row.get(1)?,
                    step_order: row.get(2)?,
                    day_offset: row.get(3)?,
                    channel: row.get(4)?,
                    subject: row.get(5)?,
                    body: row.get(6)?,
                })
            })?;
            let mut steps = Vec::new();
            for row in rows {
                steps.push(row?);
            }
            Ok(steps)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    async fn setup_db() -> (Database, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let db = Database::open(db_path.to_str().unwrap()).await.unwrap();
        (db, dir)
    }

    fn make_workflow(id: &str, account_id: Option<&str>, bucket: &str, active: bool) -> Workflow {
        Workflow {
            id: id.to_string(),
            account_id: account_id.map(str::to_string),
            bucket: bucket.to_string(),
            name: format!("wf {id}"),
            is_active: active,
            created_at: "2026-01-01T00:00:00.000Z".to_string(),
        }
    }

    fn make_step(id: &str, workflow_id: &str, order: i64, offset: i64) -> WorkflowStep {
        WorkflowStep {
            id: id.to_string(),
            workflow_id: workflow_id.to_string(),
            step_order: order,
            day_offset: offset,
            channel: "email".to_string(),
            subject: Some("Reminder: {{invoice_number}}".to_string()),
            body: "Dear {{debtor_name}}, please pay.".to_string(),
        }
    }

    #[tokio::test]
    async fn account_specific_wins_over_platform_default() {
        let (db, _dir) = setup_db().await;
        insert_workflow(&db, &make_workflow("wf-default", None, "dpd_31_60", true))
            .await
            .unwrap();
        insert_workflow(
            &db,
            &make_workflow("wf-acct", Some("acct-1"), "dpd_31_60", true),
        )
        .await
        .unwrap();

        let resolved = resolve_for(&db, "acct-1", "dpd_31_60").await.unwrap().unwrap();
        assert_eq!(resolved.id, "wf-acct");

        // A different account falls back to the platform default.
        let fallback = resolve_for(&db, "acct-2", "dpd_31_60").await.unwrap().unwrap();
        assert_eq!(fallback.id, "wf-default");

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn inactive_definitions_are_invisible() {
        let (db, _dir) = setup_db().await;
        insert_workflow(
            &db,
            &make_workflow("wf-off", Some("acct-1"), "dpd_1_30", false),
        )
        .await
        .unwrap();

        assert!(resolve_for(&db, "acct-1", "dpd_1_30").await.unwrap().is_none());
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn no_definition_resolves_to_none() {
        let (db, _dir) = setup_db().await;
        assert!(
            resolve_for(&db, "acct-1", "dpd_150_plus")
                .await
                .unwrap()
                .is_none()
        );
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn steps_come_back_in_order() {
        let (db, _dir) = setup_db().await;
        insert_workflow(&db, &make_workflow("wf-1", None, "dpd_1_30", true))
            .await
            .unwrap();
        insert_step(&db, &make_step("s2", "wf-1", 2, 7)).await.unwrap();
        insert_step(&db, &make_step("s1", "wf-1", 1, 0)).await.unwrap();
        insert_step(&db, &make_step("s3", "wf-1", 3, 14)).await.unwrap();

        let steps = steps_for(&db, "wf-1").await.unwrap();
        let orders: Vec<i64> = steps.iter().map(|s| s.step_order).collect();
        assert_eq!(orders, vec![1, 2, 3]);
        assert_eq!(steps[0].day_offset, 0);

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn duplicate_step_order_rejected() {
        let (db, _dir) = setup_db().await;
        insert_workflow(&db, &make_workflow("wf-1", None, "dpd_1_30", true))
            .await
            .unwrap();
        insert_step(&db, &make_step("s1", "wf-1", 1, 0)).await.unwrap();

        let result = insert_step(&db, &make_step("s1-dup", "wf-1", 1, 3)).await;
        assert!(result.is_err(), "unique (workflow_id, step_order) should reject");

        db.close().await.unwrap();
    }
}
