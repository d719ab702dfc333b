// SPDX-FileCopyrightText: 2026 Dunlin Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Workflow assignment operations.
//!
//! Reassignment is destructive-then-additive inside one transaction: the
//! stale active row is deactivated (never deleted — history stays
//! auditable) and a fresh active row is inserted. The partial unique index
//! on `(invoice_id) WHERE is_active = 1` backstops concurrent reassignments
//! from separate processes.

use rusqlite::params;

use dunlin_core::DunlinError;

use crate::database::{Database, is_unique_violation, map_tr_err};
use crate::models::Assignment;

fn row_to_assignment(row: &rusqlite::Row<'_>) -> Result<Assignment, rusqlite::Error> {
    Ok(Assignment {
        id: row.get(0)?,
        invoice_id: row.get(1)?,
        workflow_id: row.get(2)?,
        is_active: row.get::<_, i64>(3)? != 0,
        assigned_at: row.get(4)?,
        deactivated_at: row.get(5)?,
    })
}

/// The invoice's active assignment, if any.
pub async fn get_active(db: &Database, invoice_id: &str) -> Result<Option<Assignment>, DunlinError> {
    let invoice_id = invoice_id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, invoice_id, workflow_id, is_active, assigned_at, deactivated_at
                 FROM workflow_assignments
                 WHERE invoice_id = ?1 AND is_active = 1",
            )?;
            let result = stmt.query_row(params![invoice_id], row_to_assignment);
            match result {
                Ok(assignment) => Ok(Some(assignment)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
        .await
        .map_err(map_tr_err)
}

/// Atomically replace the invoice's active assignment with one referencing
/// `workflow_id`. Returns the new assignment row ID.
///
/// Callers must skip this entirely when the active assignment already
/// references `workflow_id` — deactivate-and-recreate churn would reset
/// nothing but would falsify `assigned_at`-based audit ordering.
pub async fn reassign(
    db: &Database,
    invoice_id: &str,
    workflow_id: &str,
    now: &str,
) -> Result<i64, DunlinError> {
    let invoice_id = invoice_id.to_string();
    let workflow_id = workflow_id.to_string();
    let now = now.to_string();
    db.connection()
        .call(move |conn| {
            let tx = conn.transaction()?;
            tx.execute(
                "UPDATE workflow_assignments
                 SET is_active = 0, deactivated_at = ?2
                 WHERE invoice_id = ?1 AND is_active = 1",
                params![invoice_id, now],
            )?;
            tx.execute(
                "INSERT INTO workflow_assignments (invoice_id, workflow_id, is_active, assigned_at)
                 VALUES (?1, ?2, 1, ?3)",
                params![invoice_id, workflow_id, now],
            )?;
            let id = tx.last_insert_rowid();
            tx.commit()?;
            Ok(id)
        })
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                DunlinError::conflict(format!("active assignment already exists: {e}"))
            } else {
                map_tr_err(e)
            }
        })
}

/// Full assignment history for an invoice, newest first. Deactivated rows
/// included — this is the audit trail.
pub async fn history(db: &Database, invoice_id: &str) -> Result<Vec<Assignment>, DunlinError> {
    let invoice_id = invoice_id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, invoice_id, workflow_id, is_active, assigned_at, deactivated_at
                 FROM workflow_assignments
                 WHERE invoice_id = ?1
                 ORDER BY id DESC",
            )?;
            let rows = stmt.query_map(params![invoice_id], row_to_assignment)?;
            let mut assignments = Vec::new();
            for row in rows {
                assignments.push(row?);
            }
            Ok(assignments)
        })
        .await
        .map_err(map_tr_err)
}
