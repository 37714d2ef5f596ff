use crate::models::display::parse_date;

/// Validate an email: must contain '@' and '.', max 254 chars.
pub fn validate_email(email: &str) -> Option<String> {
    let trimmed = email.trim();
    if trimmed.is_empty() {
        return Some("Email is required".to_string());
    }
    if trimmed.len() > 254 {
        return Some("Email must be at most 254 characters".to_string());
    }
    if !trimmed.contains('@') || !trimmed.contains('.') {
        return Some("Email must be a valid address".to_string());
    }
    None
}

/// Like `validate_email`, but a blank value is fine.
pub fn validate_optional_email(email: &str) -> Option<String> {
    if email.trim().is_empty() { None } else { validate_email(email) }
}

/// Validate a required text field with a max length.
pub fn validate_required(value: &str, field_name: &str, max_len: usize) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Some(format!("{field_name} is required"));
    }
    if trimmed.chars().count() > max_len {
        return Some(format!("{field_name} must be at most {max_len} characters"));
    }
    None
}

/// Validate an optional text field with a max length (empty is OK).
pub fn validate_optional(value: &str, field_name: &str, max_len: usize) -> Option<String> {
    if value.trim().chars().count() > max_len {
        return Some(format!("{field_name} must be at most {max_len} characters"));
    }
    None
}

/// Value must be one of `allowed`.
pub fn validate_choice(value: &str, field_name: &str, allowed: &[&str]) -> Option<String> {
    if allowed.contains(&value.trim()) {
        None
    } else {
        Some(format!("{field_name} must be one of: {}", allowed.join(", ")))
    }
}

/// Required `YYYY-MM-DD` date.
pub fn validate_date(value: &str, field_name: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Some(format!("{field_name} is required"));
    }
    match parse_date(trimmed) {
        Some(_) => None,
        None => Some(format!("{field_name} must be a date (YYYY-MM-DD)")),
    }
}

/// Parse a strictly positive amount.
pub fn parse_amount(value: &str) -> Result<f64, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err("Amount is required for monetary donations".to_string());
    }
    match trimmed.parse::<f64>() {
        Ok(v) if v.is_finite() && v > 0.0 => Ok(v),
        _ => Err("Amount must be a positive number".to_string()),
    }
}

/// Three-letter currency code, normalised to upper case.
pub fn parse_currency(value: &str) -> Result<String, String> {
    let trimmed = value.trim();
    if trimmed.len() == 3 && trimmed.chars().all(|c| c.is_ascii_alphabetic()) {
        Ok(trimmed.to_ascii_uppercase())
    } else {
        Err("Currency must be a three-letter code such as USD".to_string())
    }
}

/// Trimmed value, or `None` when blank.
pub fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() { None } else { Some(trimmed.to_string()) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_rules() {
        assert!(validate_email("a@b.org").is_none());
        assert!(validate_email("").is_some());
        assert!(validate_email("nope").is_some());
        assert!(validate_optional_email("  ").is_none());
        assert!(validate_optional_email("x").is_some());
    }

    #[test]
    fn text_rules_count_characters() {
        assert!(validate_required("  ", "Name", 10).is_some());
        assert!(validate_required("héllo", "Name", 5).is_none());
        assert_eq!(validate_optional("abcdef", "Notes", 5).as_deref(), Some("Notes must be at most 5 characters"));
    }

    #[test]
    fn choices_and_dates() {
        assert!(validate_choice("active", "Status", &["active", "archived"]).is_none());
        assert!(validate_choice("gone", "Status", &["active", "archived"]).is_some());
        assert!(validate_date("2024-02-29", "Date").is_none());
        assert!(validate_date("2023-02-29", "Date").is_some());
        assert!(validate_date("", "Date").is_some());
    }

    #[test]
    fn amounts_and_currencies() {
        assert_eq!(parse_amount(" 12.50 "), Ok(12.5));
        assert!(parse_amount("0").is_err());
        assert!(parse_amount("-3").is_err());
        assert!(parse_amount("NaN").is_err());
        assert!(parse_amount("").is_err());
        assert_eq!(parse_currency("eur"), Ok("EUR".to_string()));
        assert!(parse_currency("EURO").is_err());
        assert!(parse_currency("E1R").is_err());
    }

    #[test]
    fn non_blank_trims() {
        assert_eq!(non_blank("  x "), Some("x".to_string()));
        assert_eq!(non_blank("   "), None);
    }
}
