// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Shape checks applied to request bodies before they reach storage.

use crate::auth::password::MIN_PASSWORD_LEN;
use crate::error::ApiError;

/// Trimmed, non-empty text content.
pub fn content(field: &str, value: &str) -> Result<String, ApiError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ApiError::bad_request(format!("{field} must not be empty")));
    }
    Ok(trimmed.to_string())
}

/// A plausible email address: `local@domain.tld`, no whitespace.
pub fn email(value: &str) -> Result<(), ApiError> {
    let value = value.trim();
    let valid = match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !value.chars().any(char::is_whitespace)
        }
        None => false,
    };
    if !valid {
        return Err(ApiError::bad_request("email is not a valid address"));
    }
    Ok(())
}

pub fn password(value: &str) -> Result<(), ApiError> {
    if value.chars().count() < MIN_PASSWORD_LEN {
        return Err(ApiError::bad_request(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_is_trimmed_and_required() {
        assert_eq!(content("content", "  hi ").unwrap(), "hi");
        assert!(content("content", "   ").is_err());
        assert_eq!(
            content("eventName", "").unwrap_err().message,
            "eventName must not be empty"
        );
    }

    #[test]
    fn email_shapes() {
        assert!(email("ada@example.com").is_ok());
        assert!(email(" ada@example.com ").is_ok());
        assert!(email("ada.example.com").is_err());
        assert!(email("@example.com").is_err());
        assert!(email("ada@localhost").is_err());
        assert!(email("ada@@example.com").is_err());
        assert!(email("a da@example.com").is_err());
    }

    #[test]
    fn password_length() {
        assert!(password("12345678").is_ok());
        assert!(password("1234567").is_err());
    }
}
