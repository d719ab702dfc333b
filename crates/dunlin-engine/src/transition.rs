// SPDX-FileCopyrightText: 2026 Dunlin Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bucket transition detection.

use dunlin_core::types::AgingBucket;

/// The result of comparing an invoice's stored bucket against a freshly
/// computed one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    /// True when the stored bucket differs from the fresh one (or no bucket
    /// was stored yet). Only then may the caller persist the new label and
    /// a fresh entry timestamp.
    pub changed: bool,
    pub old_bucket: Option<AgingBucket>,
    pub new_bucket: AgingBucket,
    /// True only for strictly forward movement in the escalation order.
    /// Comparison is by bucket position, never by label text.
    pub is_escalation: bool,
}

/// Compare a stored bucket against the freshly computed one.
///
/// A missing stored bucket (fresh import, or an unreadable label) counts as
/// changed but not as an escalation — there is no prior tier to escalate
/// from.
pub fn detect(stored: Option<AgingBucket>, fresh: AgingBucket) -> Transition {
    let changed = stored != Some(fresh);
    let is_escalation = match stored {
        Some(old) => fresh > old,
        None => false,
    };
    Transition {
        changed,
        old_bucket: stored,
        new_bucket: fresh,
        is_escalation,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unchanged_bucket_is_not_a_transition() {
        let t = detect(Some(AgingBucket::Dpd1To30), AgingBucket::Dpd1To30);
        assert!(!t.changed);
        assert!(!t.is_escalation);
    }

    #[test]
    fn forward_movement_is_an_escalation() {
        let t = detect(Some(AgingBucket::Dpd1To30), AgingBucket::Dpd31To60);
        assert!(t.changed);
        assert!(t.is_escalation);
        assert_eq!(t.old_bucket, Some(AgingBucket::Dpd1To30));
        assert_eq!(t.new_bucket, AgingBucket::Dpd31To60);
    }

    #[test]
    fn backward_movement_is_not_an_escalation() {
        // A due-date extension after partial payment can move an invoice
        // back to a less delinquent tier.
        let t = detect(Some(AgingBucket::Dpd61To90), AgingBucket::Dpd31To60);
        assert!(t.changed);
        assert!(!t.is_escalation);
    }

    #[test]
    fn first_classification_changes_without_escalating() {
        let t = detect(None, AgingBucket::Dpd91To120);
        assert!(t.changed);
        assert!(!t.is_escalation);
        assert_eq!(t.old_bucket, None);
    }

    #[test]
    fn skipping_tiers_is_still_one_escalation() {
        let t = detect(Some(AgingBucket::Current), AgingBucket::Dpd150Plus);
        assert!(t.changed);
        assert!(t.is_escalation);
    }
}
