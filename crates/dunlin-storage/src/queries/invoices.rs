// SPDX-FileCopyrightText: 2026 Dunlin Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Invoice read/write operations.
//!
//! The batch engine owns exactly two fields on this table: `aging_bucket`
//! and `bucket_entered_at`. Everything else is written at import/entry time.

use rusqlite::params;

use dunlin_core::DunlinError;

use crate::database::Database;
use crate::models::Invoice;

const INVOICE_COLUMNS: &str = "id, account_id, debtor_id, invoice_number, amount_cents, currency,
     status, due_date, aging_bucket, bucket_entered_at, created_at, updated_at";

fn row_to_invoice(row: &rusqlite::Row<'_>) -> Result<Invoice, rusqlite::Error> {
    Ok(Invoice {
        id: row.get(0)?,
        account_id: row.get(1)?,
        debtor_id: row.get(2)?,
        invoice_number: row.get(3)?,
        amount_cents: row.get(4)?,
        currency: row.get(5)?,
        status: row.get(6)?,
        due_date: row.get(7)?,
        aging_bucket: row.get(8)?,
        bucket_entered_at: row.get(9)?,
        created_at: row.get(10)?,
        updated_at: row.get(11)?,
    })
}

/// Insert a new invoice (import/entry path).
pub async fn insert_invoice(db: &Database, invoice: &Invoice) -> Result<(), DunlinError> {
    let invoice = invoice.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO invoices (id, account_id, debtor_id, invoice_number, amount_cents,
                                       currency, status, due_date, aging_bucket, bucket_entered_at,
                                       created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
                params![
                    invoice.id,
                    invoice.account_id,
                    invoice.debtor_id,
                    invoice.invoice_number,
                    invoice.amount_cents,
                    invoice.currency,
                    invoice.status,
                    invoice.due_date,
                    invoice.aging_bucket,
                    invoice.bucket_entered_at,
                    invoice.created_at,
                    invoice.updated_at,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Get an invoice by ID.
pub async fn get_invoice(db: &Database, id: &str) -> Result<Option<Invoice>, DunlinError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {INVOICE_COLUMNS} FROM invoices WHERE id = ?1"
            ))?;
            let result = stmt.query_row(params![id], row_to_invoice);
            match result {
                Ok(invoice) => Ok(Some(invoice)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Fetch one page of workflow-eligible invoices, ordered by ID for stable
/// pagination. Only `open` and `in_payment_plan` invoices are returned; the
/// status filter is the eligibility gate.
pub async fn list_processable(
    db: &Database,
    limit: i64,
    offset: i64,
) -> Result<Vec<Invoice>, DunlinError> {
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {INVOICE_COLUMNS} FROM invoices
                 WHERE status IN ('open', 'in_payment_plan')
                 ORDER BY id ASC
                 LIMIT ?1 OFFSET ?2"
            ))?;
            let rows = stmt.query_map(params![limit, offset], row_to_invoice)?;
            let mut invoices = Vec::new();
            for row in rows {
                invoices.push(row?);
            }
            Ok(invoices)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Rewrite the cached bucket label and its entry timestamp.
///
/// Called only when the freshly computed bucket differs from the stored one;
/// an unconditional write would corrupt the entry timestamp that step
/// day-offsets are measured from.
pub async fn update_bucket(
    db: &Database,
    id: &str,
    bucket: &str,
    entered_at: &str,
) -> Result<(), DunlinError> {
    let id = id.to_string();
    let bucket = bucket.to_string();
    let entered_at = entered_at.to_string();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "UPDATE invoices
                 SET aging_bucket = ?1, bucket_entered_at = ?2,
                     updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
                 WHERE id = ?3",
                params![bucket, entered_at, id],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}
