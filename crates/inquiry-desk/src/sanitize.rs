//! Helpers for masking personal data before it enters log and span fields.
//!
//! Logs are safe to share for debugging: contact details are reduced to
//! enough characters to correlate a record, never the full value.

/// Number of trailing phone characters left visible.
const PHONE_VISIBLE: usize = 4;

/// Keeps the first character of the local part and the full domain.
///
/// - `jane@x.com` → `j***@x.com`
/// - `no-at-sign` → `***`
pub fn mask_email(email: &str) -> String {
    match email.split_once('@') {
        Some((local, domain)) => {
            let first: String = local.chars().take(1).collect();
            format!("{}***@{}", first, domain)
        }
        None => "***".to_string(),
    }
}

/// Replaces every character except the last four with `*`.
///
/// - `5551234567` → `******4567`
/// - `123` → `***`
pub fn mask_phone(phone: &str) -> String {
    let len = phone.chars().count();
    if len <= PHONE_VISIBLE {
        return "*".repeat(len);
    }
    let hidden = len - PHONE_VISIBLE;
    phone
        .chars()
        .enumerate()
        .map(|(i, c)| if i < hidden { '*' } else { c })
        .collect()
}
