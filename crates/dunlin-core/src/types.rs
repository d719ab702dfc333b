// SPDX-FileCopyrightText: 2026 Dunlin Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types used across the Dunlin workspace.
//!
//! Entity structs mirror their storage rows: timestamps and dates are kept
//! as RFC 3339 / `YYYY-MM-DD` strings the way the rows store them, and the
//! engine parses them at its boundary so that a single malformed row fails
//! that row only.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Ordered delinquency tiers, from least to most overdue.
///
/// The declaration order IS the escalation order: moving to a bucket that
/// compares strictly greater is an escalation. Never compare bucket labels
/// as strings.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumString, Serialize,
    Deserialize,
)]
pub enum AgingBucket {
    #[strum(serialize = "current")]
    #[serde(rename = "current")]
    Current,
    #[strum(serialize = "dpd_1_30")]
    #[serde(rename = "dpd_1_30")]
    Dpd1To30,
    #[strum(serialize = "dpd_31_60")]
    #[serde(rename = "dpd_31_60")]
    Dpd31To60,
    #[strum(serialize = "dpd_61_90")]
    #[serde(rename = "dpd_61_90")]
    Dpd61To90,
    #[strum(serialize = "dpd_91_120")]
    #[serde(rename = "dpd_91_120")]
    Dpd91To120,
    #[strum(serialize = "dpd_121_150")]
    #[serde(rename = "dpd_121_150")]
    Dpd121To150,
    #[strum(serialize = "dpd_150_plus")]
    #[serde(rename = "dpd_150_plus")]
    Dpd150Plus,
}

impl AgingBucket {
    /// Maps whole days past due onto the bucket table.
    ///
    /// Buckets partition the integer line with no gaps: zero and anything
    /// earlier is `current`, each 30-day band is inclusive on its upper
    /// boundary, and everything past 150 lands in the terminal bucket.
    pub fn for_days_past_due(days: i64) -> Self {
        match days {
            i64::MIN..=0 => AgingBucket::Current,
            1..=30 => AgingBucket::Dpd1To30,
            31..=60 => AgingBucket::Dpd31To60,
            61..=90 => AgingBucket::Dpd61To90,
            91..=120 => AgingBucket::Dpd91To120,
            121..=150 => AgingBucket::Dpd121To150,
            _ => AgingBucket::Dpd150Plus,
        }
    }

    /// Position in the escalation order, starting at zero.
    pub fn position(self) -> usize {
        self as usize
    }
}

/// Invoice lifecycle states.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum InvoiceStatus {
    #[strum(serialize = "open")]
    #[serde(rename = "open")]
    Open,
    #[strum(serialize = "in_payment_plan")]
    #[serde(rename = "in_payment_plan")]
    InPaymentPlan,
    #[strum(serialize = "paid")]
    #[serde(rename = "paid")]
    Paid,
    #[strum(serialize = "disputed")]
    #[serde(rename = "disputed")]
    Disputed,
    #[strum(serialize = "written_off")]
    #[serde(rename = "written_off")]
    WrittenOff,
}

impl InvoiceStatus {
    /// Only open and in-payment-plan invoices move through collection
    /// workflows.
    pub fn is_workflow_eligible(self) -> bool {
        matches!(self, InvoiceStatus::Open | InvoiceStatus::InPaymentPlan)
    }
}

/// Outreach draft lifecycle states.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum DraftStatus {
    #[strum(serialize = "pending_approval")]
    #[serde(rename = "pending_approval")]
    PendingApproval,
    #[strum(serialize = "approved")]
    #[serde(rename = "approved")]
    Approved,
    #[strum(serialize = "sent")]
    #[serde(rename = "sent")]
    Sent,
    #[strum(serialize = "discarded")]
    #[serde(rename = "discarded")]
    Discarded,
}

impl DraftStatus {
    /// A live draft blocks creation of another draft for the same invoice.
    /// Only discarded drafts are out of the way.
    pub fn is_live(self) -> bool {
        !matches!(self, DraftStatus::Discarded)
    }
}

/// Outreach channels supported by workflow steps.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum Channel {
    #[strum(serialize = "email")]
    #[serde(rename = "email")]
    Email,
    #[strum(serialize = "sms")]
    #[serde(rename = "sms")]
    Sms,
}

/// A billable obligation owed by a debtor account.
///
/// `aging_bucket` is a cache of the classifier's output, never a source of
/// truth; the orchestrator owns writes to it and to `bucket_entered_at`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invoice {
    pub id: String,
    pub account_id: String,
    pub debtor_id: Option<String>,
    pub invoice_number: String,
    pub amount_cents: i64,
    pub currency: String,
    pub status: String,
    /// Due date as `YYYY-MM-DD`.
    pub due_date: String,
    pub aging_bucket: Option<String>,
    pub bucket_entered_at: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// A debtor account contact record, read-only display-name source for
/// template rendering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Debtor {
    pub id: String,
    pub account_id: String,
    pub company_name: String,
    pub contact_name: Option<String>,
    pub email: Option<String>,
    pub created_at: String,
}

/// A named, ordered sequence of outreach steps scoped to one aging bucket.
///
/// `account_id = None` marks a platform-wide default; account-specific
/// definitions take precedence for the same bucket.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Workflow {
    pub id: String,
    pub account_id: Option<String>,
    pub bucket: String,
    pub name: String,
    pub is_active: bool,
    pub created_at: String,
}

/// One step of a workflow: when to fire (days since bucket entry), over
/// which channel, and with which templates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowStep {
    pub id: String,
    pub workflow_id: String,
    pub step_order: i64,
    pub day_offset: i64,
    pub channel: String,
    pub subject: Option<String>,
    pub body: String,
}

/// The live binding between an invoice and the workflow governing its
/// outreach. Deactivated rows are kept for audit, never deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assignment {
    pub id: i64,
    pub invoice_id: String,
    pub workflow_id: String,
    pub is_active: bool,
    pub assigned_at: String,
    pub deactivated_at: Option<String>,
}

/// An unsent candidate outreach message awaiting approval.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Draft {
    pub id: String,
    pub invoice_id: String,
    pub workflow_id: String,
    pub step_id: String,
    pub channel: String,
    pub subject: Option<String>,
    pub body: String,
    pub status: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Per-invoice failure captured during a batch run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunError {
    pub invoice_id: String,
    pub message: String,
}

/// Summary returned by one orchestrator pass. This is the JSON body the
/// triggering caller receives.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSummary {
    /// Eligible invoices examined this pass.
    pub invoices_scanned: u64,
    /// Invoices whose bucket (and entry timestamp) was rewritten.
    pub invoices_updated: u64,
    /// Bucket changes that moved strictly forward in the escalation order.
    pub escalations: u64,
    /// Workflow assignments created (stale ones deactivated alongside).
    pub assigned: u64,
    /// New drafts persisted with `pending_approval` status.
    pub drafts_created: u64,
    /// Draftable steps skipped because a live draft already existed.
    pub skipped_existing: u64,
    /// Invoices with no usable workflow for their bucket.
    pub skipped_no_workflow: u64,
    /// True when the max-invoices safety cap stopped the pass early.
    pub truncated: bool,
    /// Per-invoice failures; never aborts the pass.
    pub errors: Vec<RunError>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn bucket_order_follows_declaration() {
        assert!(AgingBucket::Current < AgingBucket::Dpd1To30);
        assert!(AgingBucket::Dpd1To30 < AgingBucket::Dpd31To60);
        assert!(AgingBucket::Dpd121To150 < AgingBucket::Dpd150Plus);
        assert_eq!(AgingBucket::Current.position(), 0);
        assert_eq!(AgingBucket::Dpd150Plus.position(), 6);
    }

    #[test]
    fn bucket_labels_round_trip() {
        let buckets = [
            AgingBucket::Current,
            AgingBucket::Dpd1To30,
            AgingBucket::Dpd31To60,
            AgingBucket::Dpd61To90,
            AgingBucket::Dpd91To120,
            AgingBucket::Dpd121To150,
            AgingBucket::Dpd150Plus,
        ];
        assert_eq!(buckets.len(), 7, "bucket table must have exactly 7 tiers");
        for bucket in buckets {
            let label = bucket.to_string();
            let parsed = AgingBucket::from_str(&label).expect("label should parse back");
            assert_eq!(bucket, parsed);
        }
        assert_eq!(AgingBucket::Dpd1To30.to_string(), "dpd_1_30");
        assert_eq!(AgingBucket::Dpd150Plus.to_string(), "dpd_150_plus");
    }

    #[test]
    fn days_past_due_boundaries_are_exact() {
        assert_eq!(AgingBucket::for_days_past_due(-14), AgingBucket::Current);
        assert_eq!(AgingBucket::for_days_past_due(0), AgingBucket::Current);
        assert_eq!(AgingBucket::for_days_past_due(1), AgingBucket::Dpd1To30);
        assert_eq!(AgingBucket::for_days_past_due(30), AgingBucket::Dpd1To30);
        assert_eq!(AgingBucket::for_days_past_due(31), AgingBucket::Dpd31To60);
        assert_eq!(AgingBucket::for_days_past_due(60), AgingBucket::Dpd31To60);
        assert_eq!(AgingBucket::for_days_past_due(61), AgingBucket::Dpd61To90);
        assert_eq!(AgingBucket::for_days_past_due(90), AgingBucket::Dpd61To90);
        assert_eq!(AgingBucket::for_days_past_due(91), AgingBucket::Dpd91To120);
        assert_eq!(AgingBucket::for_days_past_due(120), AgingBucket::Dpd91To120);
        assert_eq!(AgingBucket::for_days_past_due(121), AgingBucket::Dpd121To150);
        assert_eq!(AgingBucket::for_days_past_due(150), AgingBucket::Dpd121To150);
        assert_eq!(AgingBucket::for_days_past_due(151), AgingBucket::Dpd150Plus);
        assert_eq!(AgingBucket::for_days_past_due(10_000), AgingBucket::Dpd150Plus);
    }

    #[test]
    fn invoice_status_eligibility() {
        assert!(InvoiceStatus::Open.is_workflow_eligible());
        assert!(InvoiceStatus::InPaymentPlan.is_workflow_eligible());
        assert!(!InvoiceStatus::Paid.is_workflow_eligible());
        assert!(!InvoiceStatus::Disputed.is_workflow_eligible());
        assert!(!InvoiceStatus::WrittenOff.is_workflow_eligible());
    }

    #[test]
    fn draft_status_liveness() {
        assert!(DraftStatus::PendingApproval.is_live());
        assert!(DraftStatus::Approved.is_live());
        assert!(DraftStatus::Sent.is_live());
        assert!(!DraftStatus::Discarded.is_live());
    }

    #[test]
    fn status_labels_round_trip() {
        assert_eq!(InvoiceStatus::InPaymentPlan.to_string(), "in_payment_plan");
        assert_eq!(
            InvoiceStatus::from_str("in_payment_plan").unwrap(),
            InvoiceStatus::InPaymentPlan
        );
        assert_eq!(DraftStatus::PendingApproval.to_string(), "pending_approval");
        assert_eq!(Channel::from_str("sms").unwrap(), Channel::Sms);
    }

    #[test]
    fn run_summary_serializes_camel_case() {
        let summary = RunSummary {
            invoices_scanned: 3,
            invoices_updated: 2,
            escalations: 1,
            assigned: 2,
            drafts_created: 2,
            skipped_existing: 1,
            skipped_no_workflow: 0,
            truncated: false,
            errors: vec![RunError {
                invoice_id: "inv-1".to_string(),
                message: "boom".to_string(),
            }],
        };
        let json = serde_json::to_string(&summary).unwrap();
        assert!(json.contains("\"invoicesUpdated\":2"));
        assert!(json.contains("\"draftsCreated\":2"));
        assert!(json.contains("\"skippedExisting\":1"));
        assert!(json.contains("\"invoiceId\":\"inv-1\""));
    }
}
