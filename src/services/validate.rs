//! Stateless field guards used while constructing request values.

use crate::error::ValidationError;

/// Delimiter joining canonical field values into the signing input. Values
/// must never contain it; the wire format has no escaping.
pub const DIGEST_DELIMITER: char = '|';

pub fn max_length(field: &'static str, value: &str, max: usize) -> Result<(), ValidationError> {
    if value.len() > max {
        return Err(ValidationError::TooLong {
            field,
            max,
            len: value.len(),
        });
    }
    Ok(())
}

/// Only printable ASCII (0x20-0x7E) may appear in wire field values.
pub fn printable_ascii(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.bytes().any(|b| !(0x20..=0x7E).contains(&b)) {
        return Err(ValidationError::NonPrintable { field });
    }
    Ok(())
}

pub fn no_delimiter(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.contains(DIGEST_DELIMITER) {
        return Err(ValidationError::ContainsDelimiter { field });
    }
    Ok(())
}

pub fn digits_max(field: &'static str, value: u64, max_digits: u32) -> Result<(), ValidationError> {
    if value >= 10u64.pow(max_digits) {
        return Err(ValidationError::TooManyDigits { field, max_digits });
    }
    Ok(())
}

/// Minimal e-mail shape check: printable ASCII without the signing
/// delimiter, no spaces, exactly one `@` with a non-empty local part and a
/// dotted domain.
pub fn email(field: &'static str, value: &str) -> Result<(), ValidationError> {
    printable_ascii(field, value)?;
    no_delimiter(field, value)?;

    let invalid = || ValidationError::InvalidEmail {
        field,
        value: value.to_string(),
    };

    if value.contains(' ') {
        return Err(invalid());
    }
    let mut parts = value.splitn(2, '@');
    let local = parts.next().unwrap_or("");
    let domain = parts.next().ok_or_else(invalid)?;
    if local.is_empty() || domain.contains('@') {
        return Err(invalid());
    }
    if !domain.contains('.') || domain.starts_with('.') || domain.ends_with('.') {
        return Err(invalid());
    }
    Ok(())
}

pub fn language(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.len() != 2 || !value.bytes().all(|b| b.is_ascii_alphabetic()) {
        return Err(ValidationError::InvalidLanguage {
            field,
            value: value.to_string(),
        });
    }
    Ok(())
}
