// SPDX-FileCopyrightText: 2026 Dunlin Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The scheduled batch pass over all eligible invoices.
//!
//! Stages per invoice, strictly in order: classify, detect transition,
//! persist bucket change, resolve workflow, reassign if changed, pick the
//! step due today, render, guard, persist draft. A failure on one invoice is
//! recorded and never aborts the pass; only failing to fetch an invoice page
//! is fatal.
//!
//! The pass is safely re-runnable: with no intervening data changes a second
//! run produces zero bucket writes, zero reassignments, and zero drafts.

use chrono::NaiveDate;
use tracing::{debug, info, warn};

use dunlin_config::model::EngineConfig;
use dunlin_core::DunlinError;
use dunlin_core::types::{AgingBucket, Draft, Invoice, RunError, RunSummary};
use dunlin_storage::Database;
use dunlin_storage::queries::{assignments, debtors, drafts, invoices};

use crate::resolver;
use crate::template::{self, UnknownTokenPolicy};
use crate::transition;
use crate::{aging, classify};

/// What happened to a single invoice during the pass.
#[derive(Debug, Default)]
struct InvoiceOutcome {
    bucket_updated: bool,
    escalated: bool,
    reassigned: bool,
    draft_created: bool,
    skipped_existing: bool,
    skipped_no_workflow: bool,
}

/// Run one batch pass over every workflow-eligible invoice.
///
/// `as_of` is the single reference date for the whole pass; the system
/// clock is never consulted here. Invoices are fetched in pages of
/// `config.batch_size` and the pass stops gracefully (with
/// `truncated = true`) at `config.max_invoices_per_run`.
pub async fn run_daily_pass(
    db: &Database,
    as_of: NaiveDate,
    config: &EngineConfig,
) -> Result<RunSummary, DunlinError> {
    let policy = UnknownTokenPolicy::from_config(&config.unknown_tokens);
    let batch = config.batch_size as i64;
    let mut summary = RunSummary::default();
    let mut offset: i64 = 0;

    info!(%as_of, batch_size = config.batch_size, "starting collections pass");

    'pages: loop {
        // A page fetch failure is the one fatal error: without the invoice
        // list there is nothing to iterate. Results committed for earlier
        // pages stay committed.
        let page = invoices::list_processable(db, batch, offset).await?;
        if page.is_empty() {
            break;
        }
        let page_len = page.len();

        for invoice in &page {
            if summary.invoices_scanned >= config.max_invoices_per_run as u64 {
                summary.truncated = true;
                warn!(
                    limit = config.max_invoices_per_run,
                    "safety cap reached; reporting partial completion"
                );
                break 'pages;
            }
            summary.invoices_scanned += 1;

            match process_invoice(db, invoice, as_of, policy).await {
                Ok(outcome) => {
                    summary.invoices_updated += outcome.bucket_updated as u64;
                    summary.escalations += outcome.escalated as u64;
                    summary.assigned += outcome.reassigned as u64;
                    summary.drafts_created += outcome.draft_created as u64;
                    summary.skipped_existing += outcome.skipped_existing as u64;
                    summary.skipped_no_workflow += outcome.skipped_no_workflow as u64;
                }
                Err(e) if e.is_conflict() => {
                    // A concurrent pass won the race on this invoice.
                    debug!(invoice_id = %invoice.id, error = %e, "write lost a race; skipping");
                    summary.skipped_existing += 1;
                }
                Err(e) => {
                    warn!(invoice_id = %invoice.id, error = %e, "invoice processing failed");
                    summary.errors.push(RunError {
                        invoice_id: invoice.id.clone(),
                        message: e.to_string(),
                    });
                }
            }
        }

        if page_len < batch as usize {
            break;
        }
        offset += batch;
    }

    info!(
        scanned = summary.invoices_scanned,
        updated = summary.invoices_updated,
        escalations = summary.escalations,
        assigned = summary.assigned,
        drafts = summary.drafts_created,
        errors = summary.errors.len(),
        "collections pass complete"
    );
    Ok(summary)
}

async fn process_invoice(
    db: &Database,
    invoice: &Invoice,
    as_of: NaiveDate,
    policy: UnknownTokenPolicy,
) -> Result<InvoiceOutcome, DunlinError> {
    let mut outcome = InvoiceOutcome::default();
    let as_of_ts = midnight_utc(as_of);

    let due_date = aging::parse_day(&invoice.due_date)?;
    let fresh = classify(due_date, as_of);

    // An unreadable stored label is treated like no label: reclassified and
    // rewritten this pass.
    let stored = invoice
        .aging_bucket
        .as_deref()
        .and_then(|label| label.parse::<AgingBucket>().ok());
    let t = transition::detect(stored, fresh);

    let entered_date = if t.changed {
        invoices::update_bucket(db, &invoice.id, &fresh.to_string(), &as_of_ts).await?;
        outcome.bucket_updated = true;
        outcome.escalated = t.is_escalation;
        as_of
    } else {
        match &invoice.bucket_entered_at {
            Some(ts) => aging::parse_day(ts)?,
            None => {
                // Label matches but the entry timestamp was never recorded;
                // repair it so step offsets have an anchor.
                invoices::update_bucket(db, &invoice.id, &fresh.to_string(), &as_of_ts).await?;
                outcome.bucket_updated = true;
                as_of
            }
        }
    };

    let Some(resolved) = resolver::resolve(db, &invoice.account_id, fresh).await? else {
        debug!(invoice_id = %invoice.id, bucket = %fresh, "no usable workflow; left unassigned");
        outcome.skipped_no_workflow = true;
        return Ok(outcome);
    };

    let active = assignments::get_active(db, &invoice.id).await?;
    let same_workflow = active
        .as_ref()
        .is_some_and(|a| a.workflow_id == resolved.workflow.id);
    if !same_workflow {
        // Deactivate-and-recreate only on real change. Re-running this for
        // an unchanged workflow would churn the audit trail for nothing.
        assignments::reassign(db, &invoice.id, &resolved.workflow.id, &as_of_ts).await?;
        outcome.reassigned = true;
    }

    // Day-offset gating: the draftable step is the one scheduled for
    // exactly today, measured from bucket entry.
    let days_in_bucket = (as_of - entered_date).num_days();
    let Some(step) = resolved
        .steps
        .iter()
        .find(|s| s.day_offset == days_in_bucket)
    else {
        return Ok(outcome);
    };

    if drafts::has_live_draft(db, &invoice.id).await? {
        debug!(invoice_id = %invoice.id, "live draft exists; skipping draft creation");
        outcome.skipped_existing = true;
        return Ok(outcome);
    }

    let debtor = match &invoice.debtor_id {
        Some(debtor_id) => debtors::get_debtor(db, debtor_id).await?,
        None => None,
    };
    let fields = template::invoice_fields(
        invoice,
        debtor.as_ref(),
        due_date,
        aging::days_past_due(due_date, as_of),
    );
    let subject = step
        .subject
        .as_ref()
        .map(|s| template::render_with_policy(s, &fields, policy));
    let body = template::render_with_policy(&step.body, &fields, policy);

    let draft = Draft {
        id: uuid::Uuid::new_v4().to_string(),
        invoice_id: invoice.id.clone(),
        workflow_id: resolved.workflow.id.clone(),
        step_id: step.id.clone(),
        channel: step.channel.clone(),
        subject,
        body,
        status: "pending_approval".to_string(),
        created_at: as_of_ts.clone(),
        updated_at: as_of_ts,
    };
    match drafts::insert_draft(db, &draft).await {
        Ok(()) => outcome.draft_created = true,
        // Two overlapping passes raced the unique index; the other one won.
        Err(e) if e.is_conflict() => outcome.skipped_existing = true,
        Err(e) => return Err(e),
    }

    Ok(outcome)
}

fn midnight_utc(date: NaiveDate) -> String {
    format!("{date}T00:00:00.000Z")
}
