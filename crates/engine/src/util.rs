//! Internal helpers for input validation.
//!
//! These utilities are **not** part of the public API. They centralize
//! validation so every service enforces the same rules.

use crate::{EngineError, ResultEngine};

/// Trim a required name, rejecting empty values.
pub(crate) fn normalize_required_name(value: &str, label: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::InvalidName(format!(
            "{label} name must not be empty"
        )));
    }
    Ok(trimmed.to_string())
}

/// Trim optional free text, mapping blank values to `None`.
pub(crate) fn normalize_optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}

/// Validate and normalize an e-mail address (trimmed, lowercase).
pub(crate) fn normalize_email(value: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    let valid = trimmed
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'));
    if !valid {
        return Err(EngineError::InvalidName(format!(
            "invalid e-mail address: {trimmed}"
        )));
    }
    Ok(trimmed.to_lowercase())
}

/// The last four digits printed on a card: exactly four ASCII digits.
pub(crate) fn validate_last_four_digits(value: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.len() != 4 || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return Err(EngineError::InvalidName(
            "card last four digits must be exactly 4 digits".to_string(),
        ));
    }
    Ok(trimmed.to_string())
}

/// Sum minor-unit amounts, failing instead of wrapping on overflow.
pub(crate) fn checked_sum(amounts: impl IntoIterator<Item = i64>) -> ResultEngine<i64> {
    amounts.into_iter().try_fold(0i64, |acc, amount| {
        acc.checked_add(amount)
            .ok_or_else(|| EngineError::InvalidAmount("amount total overflows".to_string()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_name_is_rejected() {
        assert!(normalize_required_name("   ", "family").is_err());
        assert_eq!(normalize_required_name(" Rossi ", "family").unwrap(), "Rossi");
    }

    #[test]
    fn blank_optional_text_becomes_none() {
        assert_eq!(normalize_optional_text(Some("  ")), None);
        assert_eq!(normalize_optional_text(Some(" a ")), Some("a".to_string()));
        assert_eq!(normalize_optional_text(None), None);
    }

    #[test]
    fn email_is_normalized() {
        assert_eq!(normalize_email(" Bob@Example.com ").unwrap(), "bob@example.com");
        assert!(normalize_email("bob").is_err());
        assert!(normalize_email("@example.com").is_err());
    }

    #[test]
    fn last_four_digits_must_be_digits() {
        assert_eq!(validate_last_four_digits("0042").unwrap(), "0042");
        assert!(validate_last_four_digits("42").is_err());
        assert!(validate_last_four_digits("12a4").is_err());
    }

    #[test]
    fn checked_sum_detects_overflow() {
        assert_eq!(checked_sum([10, 15]).unwrap(), 25);
        assert_eq!(checked_sum([]).unwrap(), 0);
        assert!(checked_sum([i64::MAX, 1]).is_err());
    }
}
