// SPDX-FileCopyrightText: 2026 Dunlin Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Deterministic template substitution.
//!
//! Replaces `{{field_name}}` tokens from a field map. No I/O, no clock, no
//! AI involvement — scheduled cadence content must be reproducible, and it
//! is fully unit-testable from literal string fixtures.

use std::collections::HashMap;

use chrono::NaiveDate;

use dunlin_core::types::{Debtor, Invoice};

/// Field values available to a template.
pub type FieldMap = HashMap<String, String>;

/// What to do with a `{{token}}` that has no entry in the field map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnknownTokenPolicy {
    /// Leave the token text in place so the human approver can see the
    /// missing data. The default.
    Literal,
    /// Remove the token entirely.
    Blank,
}

impl UnknownTokenPolicy {
    /// Map the config string (`"literal"` or `"blank"`) onto a policy.
    /// Config validation guarantees the value; anything else falls back to
    /// the literal default.
    pub fn from_config(raw: &str) -> Self {
        if raw == "blank" {
            UnknownTokenPolicy::Blank
        } else {
            UnknownTokenPolicy::Literal
        }
    }
}

/// Render with the default literal policy for unknown tokens.
pub fn render(template: &str, fields: &FieldMap) -> String {
    render_with_policy(template, fields, UnknownTokenPolicy::Literal)
}

/// Replace every `{{field_name}}` occurrence with its mapped value.
///
/// Token names are trimmed, so `{{ debtor_name }}` and `{{debtor_name}}`
/// are equivalent. An unterminated `{{` is ordinary text.
pub fn render_with_policy(template: &str, fields: &FieldMap, policy: UnknownTokenPolicy) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find("}}") {
            Some(end) => {
                let token = &after[..end];
                match fields.get(token.trim()) {
                    Some(value) => out.push_str(value),
                    None => match policy {
                        UnknownTokenPolicy::Literal => {
                            out.push_str("{{");
                            out.push_str(token);
                            out.push_str("}}");
                        }
                        UnknownTokenPolicy::Blank => {}
                    },
                }
                rest = &after[end + 2..];
            }
            None => {
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }

    out.push_str(rest);
    out
}

/// The standard field set the orchestrator feeds every step template.
///
/// Debtor display name falls back contact name -> company name -> a generic
/// salutation, so a sparse debtor record still yields a presentable message.
pub fn invoice_fields(
    invoice: &Invoice,
    debtor: Option<&Debtor>,
    due_date: NaiveDate,
    days_past_due: i64,
) -> FieldMap {
    let mut fields = FieldMap::new();

    let debtor_name = debtor
        .and_then(|d| d.contact_name.as_deref())
        .filter(|name| !name.trim().is_empty())
        .or_else(|| debtor.map(|d| d.company_name.as_str()))
        .filter(|name| !name.trim().is_empty())
        .unwrap_or("Valued Customer");
    fields.insert("debtor_name".to_string(), debtor_name.to_string());

    if let Some(debtor) = debtor {
        fields.insert("company_name".to_string(), debtor.company_name.clone());
    }

    fields.insert("invoice_number".to_string(), invoice.invoice_number.clone());
    fields.insert(
        "amount".to_string(),
        format_amount(invoice.amount_cents, &invoice.currency),
    );
    fields.insert("due_date".to_string(), format_long_date(due_date));
    fields.insert("days_past_due".to_string(), days_past_due.to_string());
    fields.insert("currency".to_string(), invoice.currency.clone());
    // Replaced with a real link by the sending pipeline downstream.
    fields.insert("payment_link".to_string(), "[payment link]".to_string());

    fields
}

/// Format a cent amount with a currency symbol for the majors, `CODE n.nn`
/// otherwise.
pub fn format_amount(amount_cents: i64, currency: &str) -> String {
    let sign = if amount_cents < 0 { "-" } else { "" };
    let abs = amount_cents.unsigned_abs();
    let units = abs / 100;
    let fraction = abs % 100;
    match currency {
        "USD" => format!("{sign}${units}.{fraction:02}"),
        "EUR" => format!("{sign}\u{20ac}{units}.{fraction:02}"),
        "GBP" => format!("{sign}\u{a3}{units}.{fraction:02}"),
        other => format!("{sign}{other} {units}.{fraction:02}"),
    }
}

/// Human-readable long date, e.g. `June 17, 2026`.
pub fn format_long_date(date: NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(pairs: &[(&str, &str)]) -> FieldMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn substitutes_every_token() {
        let rendered = render(
            "Dear {{debtor_name}}, invoice {{invoice_number}} for {{amount}} is due.",
            &fields(&[
                ("debtor_name", "Acme Corp"),
                ("invoice_number", "INV-100"),
                ("amount", "$500.00"),
            ]),
        );
        assert_eq!(
            rendered,
            "Dear Acme Corp, invoice INV-100 for $500.00 is due."
        );
        assert!(!rendered.contains("{{"), "no residual tokens");
    }

    #[test]
    fn repeated_tokens_are_all_replaced() {
        let rendered = render(
            "{{name}} and {{name}} again",
            &fields(&[("name", "Acme")]),
        );
        assert_eq!(rendered, "Acme and Acme again");
    }

    #[test]
    fn unknown_token_stays_literal_by_default() {
        let rendered = render("Hello {{missing_field}}!", &FieldMap::new());
        assert_eq!(rendered, "Hello {{missing_field}}!");
    }

    #[test]
    fn unknown_token_blanked_under_blank_policy() {
        let rendered = render_with_policy(
            "Hello {{missing_field}}!",
            &FieldMap::new(),
            UnknownTokenPolicy::Blank,
        );
        assert_eq!(rendered, "Hello !");
    }

    #[test]
    fn token_names_are_trimmed() {
        let rendered = render("Hi {{ debtor_name }}", &fields(&[("debtor_name", "Pat")]));
        assert_eq!(rendered, "Hi Pat");
    }

    #[test]
    fn unterminated_braces_are_plain_text() {
        let rendered = render("tail {{oops", &fields(&[("oops", "x")]));
        assert_eq!(rendered, "tail {{oops");
    }

    #[test]
    fn amount_formatting_by_currency() {
        assert_eq!(format_amount(50_000, "USD"), "$500.00");
        assert_eq!(format_amount(1, "USD"), "$0.01");
        assert_eq!(format_amount(123_456, "EUR"), "\u{20ac}1234.56");
        assert_eq!(format_amount(200, "SEK"), "SEK 2.00");
        assert_eq!(format_amount(-5_000, "USD"), "-$50.00");
    }

    #[test]
    fn long_date_formatting() {
        let date = NaiveDate::from_ymd_opt(2026, 6, 7).unwrap();
        assert_eq!(format_long_date(date), "June 7, 2026");
    }

    #[test]
    fn field_map_falls_back_through_name_chain() {
        let invoice = dunlin_core::types::Invoice {
            id: "inv-1".to_string(),
            account_id: "acct-1".to_string(),
            debtor_id: Some("deb-1".to_string()),
            invoice_number: "INV-100".to_string(),
            amount_cents: 50_000,
            currency: "USD".to_string(),
            status: "open".to_string(),
            due_date: "2026-06-17".to_string(),
            aging_bucket: None,
            bucket_entered_at: None,
            created_at: "2026-06-17T00:00:00.000Z".to_string(),
            updated_at: "2026-06-17T00:00:00.000Z".to_string(),
        };
        let due = NaiveDate::from_ymd_opt(2026, 6, 17).unwrap();

        let with_contact = dunlin_core::types::Debtor {
            id: "deb-1".to_string(),
            account_id: "acct-1".to_string(),
            company_name: "Acme Corp".to_string(),
            contact_name: Some("Pat Doe".to_string()),
            email: None,
            created_at: "2026-01-01T00:00:00.000Z".to_string(),
        };
        let f = invoice_fields(&invoice, Some(&with_contact), due, 45);
        assert_eq!(f.get("debtor_name").unwrap(), "Pat Doe");
        assert_eq!(f.get("company_name").unwrap(), "Acme Corp");
        assert_eq!(f.get("amount").unwrap(), "$500.00");
        assert_eq!(f.get("due_date").unwrap(), "June 17, 2026");
        assert_eq!(f.get("days_past_due").unwrap(), "45");

        let mut no_contact = with_contact.clone();
        no_contact.contact_name = None;
        let f = invoice_fields(&invoice, Some(&no_contact), due, 45);
        assert_eq!(f.get("debtor_name").unwrap(), "Acme Corp");

        let f = invoice_fields(&invoice, None, due, 45);
        assert_eq!(f.get("debtor_name").unwrap(), "Valued Customer");
        assert!(
            f.get("company_name").is_none(),
            "missing debtor leaves company_name unset so the token stays visible"
        );
    }
}
