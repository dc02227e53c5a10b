//! Schema-driven invoice validation

use super::validators::{self, FieldCheck};
use crate::core::error::{ErrorKind, FieldViolation};
use crate::core::field::{FieldDescriptor, FieldType, FieldValue};
use crate::core::record::InvoiceRecord;
use crate::core::schema::FieldSchema;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Outcome of a validation check, as returned to callers
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: Vec<String>,
}

impl From<Result<(), Vec<FieldViolation>>> for ValidationReport {
    fn from(result: Result<(), Vec<FieldViolation>>) -> Self {
        match result {
            Ok(()) => Self {
                valid: true,
                errors: Vec::new(),
            },
            Err(violations) => Self {
                valid: false,
                errors: violations.into_iter().map(|v| v.message).collect(),
            },
        }
    }
}

/// Validates invoice input against a [`FieldSchema`]
///
/// Checks for each field run in a fixed order (presence, type, then rule
/// constraints) and stop at the first failure.
pub struct InvoiceValidator {
    schema: Arc<FieldSchema>,
    checks: HashMap<String, Vec<FieldCheck>>,
}

impl InvoiceValidator {
    pub fn new(schema: Arc<FieldSchema>) -> Self {
        let checks = schema
            .iter()
            .map(|field| (field.id.clone(), checks_for(field)))
            .collect();
        Self { schema, checks }
    }

    pub fn schema(&self) -> &FieldSchema {
        &self.schema
    }

    /// Validate one field value
    pub fn validate_field(&self, field_id: &str, value: &FieldValue) -> Result<(), FieldViolation> {
        let (Some(field), Some(checks)) = (self.schema.get(field_id), self.checks.get(field_id))
        else {
            return Err(FieldViolation::new(
                field_id,
                ErrorKind::UnknownField,
                format!("Unknown field: {}", field_id),
            ));
        };

        checks.iter().try_for_each(|check| check(field, value))
    }

    /// Validate every entry of `record`
    ///
    /// Fields absent from the record are not checked. Violations are returned
    /// in record order, at most one per field.
    pub fn validate_all(&self, record: &InvoiceRecord) -> Result<(), Vec<FieldViolation>> {
        let violations: Vec<FieldViolation> = record
            .iter()
            .filter_map(|(id, value)| self.validate_field(id, value).err())
            .collect();

        if violations.is_empty() {
            Ok(())
        } else {
            tracing::debug!(count = violations.len(), "invoice record failed validation");
            Err(violations)
        }
    }

    /// Validate the listed fields of `record`
    ///
    /// Listed fields absent from the record are skipped.
    pub fn validate_fields(
        &self,
        record: &InvoiceRecord,
        field_ids: &[&str],
    ) -> Result<(), Vec<FieldViolation>> {
        let violations: Vec<FieldViolation> = field_ids
            .iter()
            .filter_map(|id| {
                let value = record.get(id)?;
                self.validate_field(id, value).err()
            })
            .collect();

        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations)
        }
    }

    /// Validate `record` and summarize the outcome as plain messages
    pub fn report(&self, record: &InvoiceRecord) -> ValidationReport {
        self.validate_all(record).into()
    }
}

impl Default for InvoiceValidator {
    fn default() -> Self {
        Self::new(Arc::new(FieldSchema::default()))
    }
}

impl fmt::Debug for InvoiceValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InvoiceValidator")
            .field("fields", &self.schema.len())
            .finish()
    }
}

fn checks_for(field: &FieldDescriptor) -> Vec<FieldCheck> {
    let mut checks: Vec<FieldCheck> = Vec::new();
    checks.push(Box::new(validators::required()));

    match field.field_type {
        FieldType::Numeric => checks.push(Box::new(validators::numeric())),
        FieldType::Date => checks.push(Box::new(validators::date_format())),
        FieldType::String => {}
    }

    if let Some(rule) = &field.rule {
        if field.is_numeric() {
            if let Some(min) = rule.min {
                checks.push(Box::new(validators::min_value(min)));
            }
            if let Some(max) = rule.max {
                checks.push(Box::new(validators::max_value(max)));
            }
        }
        if let Some(allowed) = &rule.allowed_values {
            checks.push(Box::new(validators::in_list(allowed.clone())));
        }
    }

    checks
}
