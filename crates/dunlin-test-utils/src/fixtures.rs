// SPDX-FileCopyrightText: 2026 Dunlin Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Temp-database harness and entity builders.

use chrono::NaiveDate;

use dunlin_core::DunlinError;
use dunlin_core::types::{Debtor, Invoice, Workflow, WorkflowStep};
use dunlin_storage::Database;
use dunlin_storage::queries::workflows;

/// A fresh migrated SQLite database in a temp directory, cleaned up on drop.
pub struct CollectionsHarness {
    pub db: Database,
    _temp_dir: tempfile::TempDir,
}

impl CollectionsHarness {
    /// Create an isolated harness with its own database file.
    pub async fn new() -> Result<Self, DunlinError> {
        let temp_dir =
            tempfile::TempDir::new().map_err(|e| DunlinError::Storage { source: e.into() })?;
        let db_path = temp_dir.path().join("collections.db");
        let db = Database::open(&db_path.to_string_lossy()).await?;
        Ok(Self {
            db,
            _temp_dir: temp_dir,
        })
    }
}

/// An open invoice with no cached bucket, due on `due_date` (`YYYY-MM-DD`).
pub fn make_invoice(id: &str, account_id: &str, due_date: NaiveDate, status: &str) -> Invoice {
    Invoice {
        id: id.to_string(),
        account_id: account_id.to_string(),
        debtor_id: None,
        invoice_number: id.to_uppercase(),
        amount_cents: 50_000,
        currency: "USD".to_string(),
        status: status.to_string(),
        due_date: due_date.to_string(),
        aging_bucket: None,
        bucket_entered_at: None,
        created_at: format!("{due_date}T00:00:00.000Z"),
        updated_at: format!("{due_date}T00:00:00.000Z"),
    }
}

/// A debtor with an optional named contact.
pub fn make_debtor(
    id: &str,
    account_id: &str,
    company_name: &str,
    contact_name: Option<&str>,
) -> Debtor {
    Debtor {
        id: id.to_string(),
        account_id: account_id.to_string(),
        company_name: company_name.to_string(),
        contact_name: contact_name.map(str::to_string),
        email: Some(format!("ap@{}.example", id)),
        created_at: "2026-01-01T00:00:00.000Z".to_string(),
    }
}

/// One step of a seeded workflow.
pub struct StepSpec<'a> {
    pub day_offset: i64,
    pub channel: &'a str,
    pub subject: Option<&'a str>,
    pub body: &'a str,
}

/// Seed an active workflow definition with its steps. Step IDs are
/// `{workflow_id}-s{order}` and orders start at 1.
pub async fn seed_workflow(
    db: &Database,
    id: &str,
    account_id: Option<&str>,
    bucket: &str,
    steps: &[StepSpec<'_>],
) -> Result<(), DunlinError> {
    workflows::insert_workflow(
        db,
        &Workflow {
            id: id.to_string(),
            account_id: account_id.map(str::to_string),
            bucket: bucket.to_string(),
            name: format!("workflow {id}"),
            is_active: true,
            created_at: "2026-01-01T00:00:00.000Z".to_string(),
        },
    )
    .await?;

    for (index, spec) in steps.iter().enumerate() {
        let order = index as i64 + 1;
        workflows::insert_step(
            db,
            &WorkflowStep {
                id: format!("{id}-s{order}"),
                workflow_id: id.to_string(),
                step_order: order,
                day_offset: spec.day_offset,
                channel: spec.channel.to_string(),
                subject: spec.subject.map(str::to_string),
                body: spec.body.to_string(),
            },
        )
        .await?;
    }

    Ok(())
}
