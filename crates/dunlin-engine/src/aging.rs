// SPDX-FileCopyrightText: 2026 Dunlin Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Pure aging classification: (due date, as-of date) -> bucket.

use chrono::NaiveDate;

use dunlin_core::DunlinError;
use dunlin_core::types::AgingBucket;

/// Classify an invoice into its aging bucket as of `as_of`.
///
/// Both inputs are day-granular, so time-of-day skew cannot move an invoice
/// across a bucket boundary. Callers must pass the same `as_of` for every
/// invoice in a batch run.
pub fn classify(due_date: NaiveDate, as_of: NaiveDate) -> AgingBucket {
    AgingBucket::for_days_past_due(days_past_due(due_date, as_of))
}

/// Whole days elapsed between the due date and the reference date. Negative
/// when the invoice is not yet due.
pub fn days_past_due(due_date: NaiveDate, as_of: NaiveDate) -> i64 {
    (as_of - due_date).num_days()
}

/// Parse the day component of a stored date string.
///
/// Accepts both plain `YYYY-MM-DD` dates and RFC 3339 timestamps (the first
/// ten characters are the day either way). Rejects anything else with a
/// validation error that fails the single invoice carrying the bad value.
pub fn parse_day(raw: &str) -> Result<NaiveDate, DunlinError> {
    let day = raw
        .get(..10)
        .ok_or_else(|| DunlinError::validation(format!("unparseable date `{raw}`")))?;
    NaiveDate::parse_from_str(day, "%Y-%m-%d")
        .map_err(|e| DunlinError::validation(format!("unparseable date `{raw}`: {e}")))
}
