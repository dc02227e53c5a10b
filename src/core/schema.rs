//! The invoice field table
//!
//! A `FieldSchema` maps field identifiers to their descriptors in a fixed
//! order. It is built once at startup (either the standard table or one read
//! from configuration) and shared read-only afterwards.

use crate::core::error::ConfigError;
use crate::core::field::{CellLocation, FieldDescriptor, FieldType, FieldValue, ValidationRule};
use indexmap::IndexMap;
use std::collections::HashMap;
use std::sync::OnceLock;

/// Sheet holding every field of the standard template
pub const INVOICE_SHEET: &str = "Invoice";

/// Immutable lookup table of invoice fields
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSchema {
    fields: IndexMap<String, FieldDescriptor>,
}

impl FieldSchema {
    /// Build a schema from descriptors
    ///
    /// Fails on duplicate ids, empty labels or malformed cell references.
    pub fn new(descriptors: Vec<FieldDescriptor>) -> Result<Self, ConfigError> {
        let mut fields = IndexMap::with_capacity(descriptors.len());

        for descriptor in descriptors {
            if descriptor.label.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: format!("fields.{}.label", descriptor.id),
                    value: descriptor.label.clone(),
                    message: "label must not be empty".to_string(),
                });
            }

            if !descriptor.location.is_valid_reference() {
                return Err(ConfigError::InvalidValue {
                    field: format!("fields.{}.cell", descriptor.id),
                    value: descriptor.location.cell.clone(),
                    message: "expected an A1-style cell reference".to_string(),
                });
            }

            if fields.contains_key(&descriptor.id) {
                return Err(ConfigError::InvalidValue {
                    field: "fields".to_string(),
                    value: descriptor.id.clone(),
                    message: "duplicate field id".to_string(),
                });
            }

            fields.insert(descriptor.id.clone(), descriptor);
        }

        Ok(Self { fields })
    }

    /// The standard invoice template layout
    pub fn standard() -> &'static FieldSchema {
        static STANDARD: OnceLock<FieldSchema> = OnceLock::new();
        STANDARD.get_or_init(|| Self {
            fields: standard_descriptors()
                .into_iter()
                .map(|d| (d.id.clone(), d))
                .collect(),
        })
    }

    /// Replace the validation rules of the listed fields
    pub fn with_rules(mut self, rules: HashMap<String, ValidationRule>) -> Result<Self, ConfigError> {
        for (field_id, rule) in rules {
            let descriptor = self.fields.get_mut(&field_id).ok_or_else(|| {
                ConfigError::InvalidValue {
                    field: "validation_rules".to_string(),
                    value: field_id.clone(),
                    message: "rule targets an unknown field".to_string(),
                }
            })?;
            descriptor.rule = Some(rule);
        }
        Ok(self)
    }

    /// Look up a field by id
    pub fn get(&self, id: &str) -> Option<&FieldDescriptor> {
        self.fields.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.fields.contains_key(id)
    }

    /// Iterate over descriptors in table order
    pub fn iter(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields.values()
    }

    /// Field ids in table order
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Descriptors that may be written from caller input
    pub fn writable(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.iter().filter(|d| !d.read_only)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Default for FieldSchema {
    fn default() -> Self {
        Self::standard().clone()
    }
}

/// Descriptors of the standard template, rules included
pub fn standard_descriptors() -> Vec<FieldDescriptor> {
    let at = |cell: &str| CellLocation::new(INVOICE_SHEET, cell);

    vec![
        FieldDescriptor::new("invoice_no", "Invoice No.", at("B2"), FieldType::String),
        FieldDescriptor::new("client_name", "Client Name", at("B3"), FieldType::String),
        FieldDescriptor::new("client_address", "Client Address", at("B4"), FieldType::String),
        FieldDescriptor::new("client_trn", "Client TRN No.", at("B5"), FieldType::String),
        FieldDescriptor::new("date", "Date", at("B6"), FieldType::Date),
        FieldDescriptor::new("bo_no", "BO No.", at("B7"), FieldType::String),
        FieldDescriptor::new("delivery_month", "Delivery Month", at("B8"), FieldType::String),
        FieldDescriptor::new("quantity", "Quantity", at("B9"), FieldType::Numeric)
            .with_rule(ValidationRule::min(0.0)),
        FieldDescriptor::new("rate", "Rate", at("B10"), FieldType::Numeric)
            .with_rule(ValidationRule::min(0.0)),
        FieldDescriptor::new("budget", "Budget", at("B11"), FieldType::Numeric)
            .with_rule(ValidationRule::min(0.0)),
        FieldDescriptor::new("vat_rate", "VAT Rate (%)", at("B12"), FieldType::Numeric).with_rule(
            ValidationRule::one_of([FieldValue::Number(0.0), FieldValue::Number(5.0)]),
        ),
        FieldDescriptor::new("total_amount", "Total Amount", at("B13"), FieldType::Numeric)
            .read_only(),
    ]
}
