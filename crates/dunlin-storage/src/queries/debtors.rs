// SPDX-FileCopyrightText: 2026 Dunlin Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Debtor lookups. Read-only from the engine's perspective; the insert
//! exists for the import path and test fixtures.

use rusqlite::params;

use dunlin_core::DunlinError;

use crate::database::Database;
use crate::models::Debtor;

/// Insert a debtor record.
pub async fn insert_debtor(db: &Database, debtor: &Debtor) -> Result<(), DunlinError> {
    let debtor = debtor.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO debtors (id, account_id, company_name, contact_name, email, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    debtor.id,
                    debtor.account_id,
                    debtor.company_name,
                    debtor.contact_name,
                    debtor.email,
                    debtor.created_at,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Get a debtor by ID.
pub async fn get_debtor(db: &Database, id: &str) -> Result<Option<Debtor>, DunlinError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, account_id, company_name, contact_name, email, created_at
                 FROM debtors WHERE id = ?1",
            )?;
            let result = stmt.query_row(params![id], |row| {
                Ok(Debtor {
                    id: row.get(0)?,
                    account_id: row.get(1)?,
                    company_name: row.get(2)?,
                    contact_name: row.get(3)?,
                    email: row.get(4)?,
                    created_at: row.get(5)?,
                })
            });
            match result {
                Ok(debtor) => Ok(Some(debtor)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}
