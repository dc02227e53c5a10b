//! Field values, field descriptors and validation rules

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

/// Date format accepted on input and produced on output (DD/MM/YYYY)
pub const DATE_FORMAT: &str = "%d/%m/%Y";

/// A raw invoice field value as supplied by a caller or read from a template
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum FieldValue {
    Number(f64),
    Text(String),
    Null,
}

impl FieldValue {
    /// Get the value as a string slice if it is textual
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Get the value as a number if it is numeric
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Check if the value is null
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    /// Null, or text that is empty once surrounding whitespace is removed
    pub fn is_blank(&self) -> bool {
        match self {
            FieldValue::Null => true,
            FieldValue::Text(s) => s.trim().is_empty(),
            FieldValue::Number(_) => false,
        }
    }

    /// Interpret the value as a real number
    ///
    /// Text is trimmed before parsing. Returns `None` for null and for text
    /// that is not a number.
    pub fn parse_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => Some(*n),
            FieldValue::Text(s) => s.trim().parse::<f64>().ok(),
            FieldValue::Null => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Number(n) => write!(f, "{}", n),
            FieldValue::Text(s) => write!(f, "{}", s),
            FieldValue::Null => Ok(()),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Number(value)
    }
}

/// The value type a field is expected to hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    String,
    Numeric,
    Date,
}

/// Where a field lives in the template workbook
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellLocation {
    pub sheet: String,
    pub cell: String,
}

impl CellLocation {
    pub fn new(sheet: impl Into<String>, cell: impl Into<String>) -> Self {
        Self {
            sheet: sheet.into(),
            cell: cell.into(),
        }
    }

    /// Check that `cell` is a plain A1-style reference (e.g. `B12`)
    pub fn is_valid_reference(&self) -> bool {
        static A1_REGEX: OnceLock<Regex> = OnceLock::new();
        let regex = A1_REGEX.get_or_init(|| Regex::new(r"^[A-Z]{1,3}[1-9][0-9]{0,6}$").unwrap());
        regex.is_match(&self.cell)
    }
}

impl fmt::Display for CellLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}!{}", self.sheet, self.cell)
    }
}

/// Range and membership constraints attached to a field
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationRule {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed_values: Option<Vec<FieldValue>>,
}

impl ValidationRule {
    /// Rule with only a lower bound
    pub fn min(min: f64) -> Self {
        Self {
            min: Some(min),
            ..Self::default()
        }
    }

    /// Rule with only an allowed-values set
    pub fn one_of(values: impl IntoIterator<Item = FieldValue>) -> Self {
        Self {
            allowed_values: Some(values.into_iter().collect()),
            ..Self::default()
        }
    }
}

/// Static metadata describing one invoice field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub id: String,

    pub label: String,

    #[serde(flatten)]
    pub location: CellLocation,

    #[serde(rename = "type", default = "default_field_type")]
    pub field_type: FieldType,

    #[serde(default)]
    pub read_only: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule: Option<ValidationRule>,
}

fn default_field_type() -> FieldType {
    FieldType::String
}

impl FieldDescriptor {
    pub fn new(
        id: impl Into<String>,
        label: impl Into<String>,
        location: CellLocation,
        field_type: FieldType,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            location,
            field_type,
            read_only: false,
            rule: None,
        }
    }

    /// Mark the field as system-derived
    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    /// Attach a validation rule
    pub fn with_rule(mut self, rule: ValidationRule) -> Self {
        self.rule = Some(rule);
        self
    }

    pub fn is_numeric(&self) -> bool {
        self.field_type == FieldType::Numeric
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_value_text() {
        let value = FieldValue::from("test");
        assert_eq!(value.as_text(), Some("test"));
        assert_eq!(value.as_number(), None);
        assert!(!value.is_null());
    }

    #[test]
    fn test_field_value_blank() {
        assert!(FieldValue::Null.is_blank());
        assert!(FieldValue::from("").is_blank());
        assert!(FieldValue::from("   \t").is_blank());
        assert!(!FieldValue::from("x").is_blank());
        assert!(!FieldValue::Number(0.0).is_blank());
    }

    #[test]
    fn test_parse_number_trims_text() {
        assert_eq!(FieldValue::from(" 12.5 ").parse_number(), Some(12.5));
        assert_eq!(FieldValue::Number(3.0).parse_number(), Some(3.0));
        assert_eq!(FieldValue::from("abc").parse_number(), None);
        assert_eq!(FieldValue::Null.parse_number(), None);
    }

    #[test]
    fn test_display_drops_trailing_zero_fraction() {
        assert_eq!(FieldValue::Number(5.0).to_string(), "5");
        assert_eq!(FieldValue::Number(0.05).to_string(), "0.05");
        assert_eq!(FieldValue::Null.to_string(), "");
    }

    #[test]
    fn test_untagged_deserialization() {
        let values: Vec<FieldValue> = serde_json::from_str(r#"[100, "GCC", null, 1.5]"#).unwrap();
        assert_eq!(
            values,
            vec![
                FieldValue::Number(100.0),
                FieldValue::from("GCC"),
                FieldValue::Null,
                FieldValue::Number(1.5),
            ]
        );
    }

    #[test]
    fn test_cell_reference_validation() {
        assert!(CellLocation::new("Invoice", "B2").is_valid_reference());
        assert!(CellLocation::new("Invoice", "AA100").is_valid_reference());
        assert!(!CellLocation::new("Invoice", "b2").is_valid_reference());
        assert!(!CellLocation::new("Invoice", "B0").is_valid_reference());
        assert!(!CellLocation::new("Invoice", "12").is_valid_reference());
    }

    #[test]
    fn test_descriptor_yaml_shape() {
        let yaml = r#"
id: quantity
label: Quantity
sheet: Invoice
cell: B9
type: numeric
rule:
  min: 0
"#;
        let descriptor: FieldDescriptor = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(descriptor.location, CellLocation::new("Invoice", "B9"));
        assert_eq!(descriptor.field_type, FieldType::Numeric);
        assert!(!descriptor.read_only);
        assert_eq!(descriptor.rule, Some(ValidationRule::min(0.0)));
    }
}
