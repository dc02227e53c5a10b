//! Reusable field validators
//!
//! Each factory returns a check that takes the field descriptor and the raw
//! value and reports the first problem it finds as a [`FieldViolation`].

use crate::core::error::{ErrorKind, FieldViolation};
use crate::core::field::{DATE_FORMAT, FieldDescriptor, FieldValue};

/// A single check applied to one field value
pub type FieldCheck = Box<dyn Fn(&FieldDescriptor, &FieldValue) -> Result<(), FieldViolation> + Send + Sync>;

/// Validator: value is present and not whitespace-only
pub fn required() -> impl Fn(&FieldDescriptor, &FieldValue) -> Result<(), FieldViolation> + Send + Sync + Clone {
    |field: &FieldDescriptor, value: &FieldValue| {
        if value.is_blank() {
            Err(FieldViolation::new(
                &field.id,
                ErrorKind::MissingField,
                format!("{} is required", field.label),
            ))
        } else {
            Ok(())
        }
    }
}

/// Validator: value parses as a real number
pub fn numeric() -> impl Fn(&FieldDescriptor, &FieldValue) -> Result<(), FieldViolation> + Send + Sync + Clone {
    |field: &FieldDescriptor, value: &FieldValue| match value.parse_number() {
        Some(_) => Ok(()),
        None => Err(FieldViolation::new(
            &field.id,
            ErrorKind::TypeMismatch,
            format!("{} must be a number", field.label),
        )),
    }
}

/// Validator: textual value matches the DD/MM/YYYY date format
///
/// Non-textual values pass; only strings carry a date format.
pub fn date_format() -> impl Fn(&FieldDescriptor, &FieldValue) -> Result<(), FieldViolation> + Send + Sync + Clone {
    |field: &FieldDescriptor, value: &FieldValue| {
        let Some(s) = value.as_text() else {
            return Ok(());
        };
        match chrono::NaiveDate::parse_from_str(s, DATE_FORMAT) {
            Ok(_) => Ok(()),
            Err(_) => Err(FieldViolation::new(
                &field.id,
                ErrorKind::DateParseError,
                format!("{} must be in DD/MM/YYYY format", field.label),
            )),
        }
    }
}

/// Validator: numeric value is not below `min`
pub fn min_value(min: f64) -> impl Fn(&FieldDescriptor, &FieldValue) -> Result<(), FieldViolation> + Send + Sync + Clone {
    move |field: &FieldDescriptor, value: &FieldValue| match value.parse_number() {
        Some(num) if num < min => Err(FieldViolation::new(
            &field.id,
            ErrorKind::OutOfRange,
            format!("{} must be >= {}", field.label, min),
        )),
        _ => Ok(()),
    }
}

/// Validator: numeric value does not exceed `max`
pub fn max_value(max: f64) -> impl Fn(&FieldDescriptor, &FieldValue) -> Result<(), FieldViolation> + Send + Sync + Clone {
    move |field: &FieldDescriptor, value: &FieldValue| match value.parse_number() {
        Some(num) if num > max => Err(FieldViolation::new(
            &field.id,
            ErrorKind::OutOfRange,
            format!("{} must be <= {}", field.label, max),
        )),
        _ => Ok(()),
    }
}

/// Validator: value is one of `allowed`
///
/// Numeric fields compare the parsed number, other fields compare the raw value.
pub fn in_list(
    allowed: Vec<FieldValue>,
) -> impl Fn(&FieldDescriptor, &FieldValue) -> Result<(), FieldViolation> + Send + Sync + Clone {
    move |field: &FieldDescriptor, value: &FieldValue| {
        let found = if field.is_numeric() {
            value
                .parse_number()
                .is_some_and(|num| allowed.iter().any(|a| a.parse_number() == Some(num)))
        } else {
            allowed.contains(value)
        };

        if found {
            Ok(())
        } else {
            Err(FieldViolation::new(
                &field.id,
                ErrorKind::InvalidEnum,
                format!("{} must be one of {}", field.label, format_allowed(&allowed)),
            ))
        }
    }
}

/// Render allowed values as a bracketed list, quoting text: `[0, 5]`, `['a', 'b']`
pub fn format_allowed(allowed: &[FieldValue]) -> String {
    let items: Vec<String> = allowed
        .iter()
        .map(|v| match v {
            FieldValue::Text(s) => format!("'{}'", s),
            FieldValue::Null => "None".to_string(),
            other => other.to_string(),
        })
        .collect();
    format!("[{}]", items.join(", "))
}
