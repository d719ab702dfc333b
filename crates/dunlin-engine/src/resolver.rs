// SPDX-FileCopyrightText: 2026 Dunlin Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Workflow resolution with the usability gate.
//!
//! Storage answers "which definition governs (account, bucket)"; this module
//! additionally refuses definitions that would produce a blank or
//! placeholder message, so nothing unpresentable ever reaches a customer.

use tracing::debug;

use dunlin_core::DunlinError;
use dunlin_core::types::{AgingBucket, Workflow, WorkflowStep};
use dunlin_storage::Database;
use dunlin_storage::queries::workflows;

/// Sentinel text the admin UI leaves in a step body until someone writes a
/// real template. A first step carrying it makes the definition unusable.
pub const PLACEHOLDER_BODY: &str = "[draft your message]";

/// A resolved, usable workflow definition with its steps in order.
#[derive(Debug, Clone)]
pub struct ResolvedWorkflow {
    pub workflow: Workflow,
    pub steps: Vec<WorkflowStep>,
}

/// Find the workflow governing `(account_id, bucket)`.
///
/// Precedence: active account-specific definition, else active platform
/// default, else `None`. A definition with no steps or with an unusable
/// first step also resolves to `None` — the invoice is left unassigned for
/// this pass, which is an expected outcome rather than an error.
pub async fn resolve(
    db: &Database,
    account_id: &str,
    bucket: AgingBucket,
) -> Result<Option<ResolvedWorkflow>, DunlinError> {
    let Some(workflow) = workflows::resolve_for(db, account_id, &bucket.to_string()).await? else {
        return Ok(None);
    };

    let steps = workflows::steps_for(db, &workflow.id).await?;
    if !is_usable(&steps) {
        debug!(
            workflow_id = %workflow.id,
            bucket = %bucket,
            "resolved workflow has no usable first step; skipping"
        );
        return Ok(None);
    }

    Ok(Some(ResolvedWorkflow { workflow, steps }))
}

/// A definition is usable when it has at least one step and the first step
/// would render real content: a non-blank, non-placeholder body, and for
/// email a non-blank subject.
fn is_usable(steps: &[WorkflowStep]) -> bool {
    let Some(first) = steps.first() else {
        return false;
    };
    let body = first.body.trim();
    if body.is_empty() || body.eq_ignore_ascii_case(PLACEHOLDER_BODY) {
        return false;
    }
    if first.channel == "email" {
        match &first.subject {
            Some(subject) if !subject.trim().is_empty() => {}
            _ => return false,
        }
    }
    true
}
