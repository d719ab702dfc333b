// SPDX-FileCopyrightText: 2026 Dunlin Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Outreach draft operations.
//!
//! Insert-only from the engine's perspective; approval and sending mutate
//! status downstream. The partial unique index over `(invoice_id)` for live
//! statuses turns a check-then-insert race between two overlapping runs
//! into one success and one clean conflict.

use rusqlite::params;

use dunlin_core::DunlinError;

use crate::database::{Database, is_unique_violation, map_tr_err};
use crate::models::Draft;

fn row_to_draft(row: &rusqlite::Row<'_>) -> Result<Draft, rusqlite::Error> {
    Ok(Draft {
        id: row.get(0)?,
        invoice_id: row.get(1)?,
        workflow_id: row.get(2)?,
        step_id: row.get(3)?,
        channel: row.get(4)?,
        subject: row.get(5)?,
        body: row.get(6)?,
        status: row.get(7)?,
        created_at: row.get(8)?,
        updated_at: row.get(9)?,
    })
}

/// True when the invoice already has a draft in a non-terminal status
/// (`pending_approval`, `approved`, or `sent`).
pub async fn has_live_draft(db: &Database, invoice_id: &str) -> Result<bool, DunlinError> {
    let invoice_id = invoice_id.to_string();
    db.connection()
        .call(move |conn| {
            let count: i64 = conn.query_row(
                "SELECT COUNT(*) FROM drafts
                 WHERE invoice_id = ?1
                   AND status IN ('pending_approval', 'approved', 'sent')",
                params![invoice_id],
                |row| row.get(0),
            )?;
            Ok(count > 0)
        })
        .await
        .map_err(map_tr_err)
}

/// Persist a new draft.
///
/// Returns [`DunlinError::Conflict`] when a live draft already exists for
/// the invoice — the caller counts this as a skip, not a failure.
pub async fn insert_draft(db: &Database, draft: &Draft) -> Result<(), DunlinError> {
    let draft = draft.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO drafts (id, invoice_id, workflow_id, step_id, channel, subject,
                                     body, status, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
                params![
                    draft.id,
                    draft.invoice_id,
                    draft.workflow_id,
                    draft.step_id,
                    draft.channel,
                    draft.subject,
                    draft.body,
                    draft.status,
                    draft.created_at,
                    draft.updated_at,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                DunlinError::conflict(format!("live draft already exists: {e}"))
            } else {
                map_tr_err(e)
            }
        })
}

/// Mutate a draft's status (approval-flow surface; also used to clear the
/// way for a new draft once one is discarded).
pub async fn update_status(db: &Database, id: &str, status: &str) -> Result<(), DunlinError> {
    let id = id.to_string();
    let status = status.to_string();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "UPDATE drafts
                 SET status = ?1, updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
                 WHERE id = ?2",
                params![status, id],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// All drafts for an invoice, newest first.
pub async fn list_for_invoice(db: &Database, invoice_id: &str) -> Result<Vec<Draft>, DunlinError> {
    let invoice_id = invoice_id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, invoice_id, workflow_id, step_id, channel, subject, body, status,
                        created_at, updated_at
                 FROM drafts
                 WHERE invoice_id = ?1
                 ORDER BY created_at DESC",
            )?;
            let rows = stmt.query_map(params![invoice_id], row_to_draft)?;
            let mut drafts = Vec::new();
            for row in rows {
                drafts.push(row?);
            }
            Ok(drafts)
        })
        .await
        .map_err(map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Invoice, Workflow, WorkflowStep};
    use crate::queries::{invoices, workflows};
    use tempfile::tempdir;

    async fn setup_db() -> (Database, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let db = Database::open(db_path.to_str().unwrap()).await.unwrap();
        (db, dir)
    }

    async fn seed(db: &Database) {
        invoices::insert_invoice(
            db,
            &Invoice {
                id: "inv-1".to_string(),
                account_id: "acct-1".to_string(),
                debtor_id: None,
                invoice_number: "INV-1".to_string(),
                amount_cents: 10_000,
                currency: "USD".to_string(),
                status: "open".to_string(),
                due_date: "2026-06-01".to_string(),
                aging_bucket: None,
                bucket_entered_at: None,
                created_at: "2026-06-01T00:00:00.000Z".to_string(),
                updated_at: "2026-06-01T00:00:00.000Z".to_string(),
            },
        )
        .await
        .unwrap();
        workflows::insert_workflow(
            db,
            &Workflow {
                id: "wf-1".to_string(),
                account_id: None,
                bucket: "dpd_1_30".to_string(),
                name: "gentle reminder".to_string(),
                is_active: true,
                created_at: "2026-01-01T00:00:00.000Z".to_string(),
            },
        )
        .await
        .unwrap();
        workflows::insert_step(
            db,
            &WorkflowStep {
                id: "step-1".to_string(),
                workflow_id: "wf-1".to_string(),
                step_order: 1,
                day_offset: 0,
                channel: "email".to_string(),
                subject: Some("subject".to_string()),
                body: "body".to_string(),
            },
        )
        .await
        .unwrap();
    }

    fn make_draft(id: &str, status: &str) -> Draft {
        Draft {
            id: id.to_string(),
            invoice_id: "inv-1".to_string(),
            workflow_id: "wf-1".to_string(),
            step_id: "step-1".to_string(),
            channel: "email".to_string(),
            subject: Some("subject".to_string()),
            body: "body".to_string(),
            status: status.to_string(),
            created_at: "2026-07-01T00:00:00.000Z".to_string(),
            updated_at: "2026-07-01T00:00:00.000Z".to_string(),
        }
    }

    #[tokio::test]
    async fn insert_then_has_live_draft() {
        let (db, _dir) = setup_db().await;
        seed(&db).await;

        assert!(!has_live_draft(&db, "inv-1").await.unwrap());
        insert_draft(&db, &make_draft("d-1", "pending_approval"))
            .await
            .unwrap();
        assert!(has_live_draft(&db, "inv-1").await.unwrap());

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn second_live_draft_is_a_conflict() {
        let (db, _dir) = setup_db().await;
        seed(&db).await;

        insert_draft(&db, &make_draft("d-1", "pending_approval"))
            .await
            .unwrap();
        let err = insert_draft(&db, &make_draft("d-2", "pending_approval"))
            .await
            .unwrap_err();
        assert!(err.is_conflict(), "expected Conflict, got: {err}");

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn discarded_draft_does_not_block_a_new_one() {
        let (db, _dir) = setup_db().await;
        seed(&db).await;

        insert_draft(&db, &make_draft("d-1", "pending_approval"))
            .await
            .unwrap();
        update_status(&db, "d-1", "discarded").await.unwrap();
        assert!(!has_live_draft(&db, "inv-1").await.unwrap());

        insert_draft(&db, &make_draft("d-2", "pending_approval"))
            .await
            .unwrap();

        let all = list_for_invoice(&db, "inv-1").await.unwrap();
        assert_eq!(all.len(), 2);

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn sent_draft_still_blocks_new_drafts() {
        let (db, _dir) = setup_db().await;
        seed(&db).await;

        insert_draft(&db, &make_draft("d-1", "pending_approval"))
            .await
            .unwrap();
        update_status(&db, "d-1", "sent").await.unwrap();

        let err = insert_draft(&db, &make_draft("d-2", "pending_approval"))
            .await
            .unwrap_err();
        assert!(err.is_conflict());

        db.close().await.unwrap();
    }
}
