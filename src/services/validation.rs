use chrono::NaiveDate;
use url::Url;

use super::ServiceError;

fn invalid(message: impl Into<String>) -> ServiceError {
    ServiceError::Validation(message.into())
}

pub fn required(label: &str, value: &str) -> Result<(), ServiceError> {
    if value.trim().is_empty() {
        return Err(invalid(format!("{} is required", label)));
    }
    Ok(())
}

/// `local@domain` with no whitespace and exactly one `@`
pub fn email(value: &str) -> Result<(), ServiceError> {
    let valid = match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && !domain.contains('@')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !value.chars().any(char::is_whitespace)
        }
        None => false,
    };

    if !valid {
        return Err(invalid("invalid email format"));
    }
    Ok(())
}

/// Optional leading `+`, then 10 to 15 digits
pub fn phone(value: &str) -> Result<(), ServiceError> {
    let digits = value.strip_prefix('+').unwrap_or(value);
    if !(10..=15).contains(&digits.len()) || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid("invalid phone number"));
    }
    Ok(())
}

/// Absolute http(s) URL whose host has at least one dot
pub fn http_url(label: &str, value: &str) -> Result<(), ServiceError> {
    let valid = Url::parse(value).is_ok_and(|url| {
        matches!(url.scheme(), "http" | "https") && url.host_str().is_some_and(|host| host.contains('.'))
    });

    if !valid {
        return Err(invalid(format!("invalid {} URL", label)));
    }
    Ok(())
}

/// Calendar date written as `YYYY-MM-DD`
pub fn date(label: &str, value: &str) -> Result<(), ServiceError> {
    if value.len() != 10 || NaiveDate::parse_from_str(value, "%Y-%m-%d").is_err() {
        return Err(invalid(format!("invalid {} format", label)));
    }
    Ok(())
}
