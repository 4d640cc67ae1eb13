//! Input validation for task generation.
//!
//! Errors carry the offending field and a suggestion worded for the person
//! filling the form.

use thiserror::Error;

pub const FIELD_PHONE_NUMBER: &str = "phoneNumber";
pub const FIELD_PRODUCT_PRICE: &str = "productPrice";

/// Reasons a form submission is rejected before a record is generated.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("[{field}] {label} tidak boleh kosong")]
    MissingField {
        field: &'static str,
        label: &'static str,
    },
    #[error("[{field}] '{value}' bukan angka yang valid")]
    InvalidNumber { field: &'static str, value: String },
    #[error("[{field}] Harga produk tidak boleh negatif")]
    NegativePrice { field: &'static str, value: f64 },
}

impl ValidationError {
    pub fn missing(field: &'static str, label: &'static str) -> Self {
        Self::MissingField { field, label }
    }

    pub fn field(&self) -> &'static str {
        match self {
            Self::MissingField { field, .. }
            | Self::InvalidNumber { field, .. }
            | Self::NegativePrice { field, .. } => field,
        }
    }

    /// How to fix the input.
    pub fn suggestion(&self) -> String {
        match self {
            Self::MissingField { label, .. } => {
                format!("Mohon isi {} dengan data yang valid", label.to_lowercase())
            }
            Self::InvalidNumber { .. } => {
                "Gunakan angka tanpa pemisah ribuan, contoh: 150000".to_string()
            }
            Self::NegativePrice { .. } => "Masukkan harga 0 atau lebih".to_string(),
        }
    }

    /// Message plus suggestion, as shown next to the form.
    pub fn to_user_message(&self) -> String {
        format!("{}. {}", self, self.suggestion())
    }
}

/// Fail with `MissingField` only when the value is empty; blanks count as input.
pub fn validate_present(
    value: &str,
    field: &'static str,
    label: &'static str,
) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::missing(field, label));
    }
    Ok(())
}

/// Fail with `MissingField` when the value is empty after trimming.
pub fn validate_required(
    value: &str,
    field: &'static str,
    label: &'static str,
) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::missing(field, label));
    }
    Ok(())
}

/// Parse a free-text decimal price.
///
/// Only finite, non-negative values pass; `NaN` and infinities never reach a
/// record.
pub fn parse_price(raw: &str, field: &'static str) -> Result<f64, ValidationError> {
    let trimmed = raw.trim();
    let value: f64 = trimmed
        .parse()
        .map_err(|_| ValidationError::InvalidNumber {
            field,
            value: trimmed.to_string(),
        })?;

    if !value.is_finite() {
        return Err(ValidationError::InvalidNumber {
            field,
            value: trimmed.to_string(),
        });
    }
    if value < 0.0 {
        return Err(ValidationError::NegativePrice { field, value });
    }

    // "-0" parses fine; store it as plain zero.
    Ok(if value == 0.0 { 0.0 } else { value })
}
