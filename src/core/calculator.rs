//! Derived invoice fields: due date, budget, VAT, total and amount in words
//!
//! All functions here are pure. [`compute_derived_fields`] runs the steps in
//! a fixed order and either returns a fully enriched record or an error; it
//! never emits a partially enriched one.

use crate::core::error::CalculationError;
use crate::core::field::{DATE_FORMAT, FieldValue};
use crate::core::record::InvoiceRecord;
use crate::core::words::amount_in_words;
use chrono::{Days, NaiveDate};

/// Fields a save request must carry
pub const REQUIRED_FIELDS: [&str; 6] = [
    "invoice_no",
    "client_name",
    "date",
    "description",
    "quantity",
    "rate",
];

/// Payment term in calendar days
pub const PAYMENT_TERM_DAYS: u64 = 30;

/// Marker in the VAT text selecting the GCC rate
pub const GCC_MARKER: &str = "GCC";

/// VAT percent applied when the marker is present
pub const GCC_VAT_PERCENT: u32 = 5;

/// VAT text assumed when a record carries no `vat_rate`
///
/// It contains the marker, so an unspecified rate is charged GCC VAT.
pub const DEFAULT_VAT_TEXT: &str = "non-GCC (0%)";

/// Quantity × rate is expressed per thousand units
const BUDGET_DIVISOR: f64 = 1000.0;

/// The computed part of an invoice
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedFields {
    pub due_date: String,
    pub budget: f64,
    pub vat_percent: u32,
    pub vat_amount: f64,
    pub total_amount: f64,
    pub total_in_words: String,
}

impl DerivedFields {
    /// Display form written back into `vat_rate`, e.g. `VAT(5%)`
    pub fn vat_label(&self) -> String {
        format!("VAT({}%)", self.vat_percent)
    }

    /// Write the derived values into `record`, overwriting caller-supplied ones
    pub fn apply_to(&self, record: &mut InvoiceRecord) {
        record.insert("due_date", self.due_date.clone());
        record.insert("budget", self.budget);
        record.insert("vat_amount", self.vat_amount);
        record.insert("vat_rate", self.vat_label());
        record.insert("total_amount", self.total_amount);
        record.insert("total_in_words", self.total_in_words.clone());
    }
}

/// Names of required fields that are absent, null or blank, in declaration order
pub fn missing_required_fields(record: &InvoiceRecord) -> Vec<String> {
    REQUIRED_FIELDS
        .iter()
        .filter(|id| record.is_missing(id))
        .map(|id| id.to_string())
        .collect()
}

/// `date` plus the payment term, both DD/MM/YYYY
pub fn due_date(date: &str) -> Result<String, CalculationError> {
    let invalid = |message: String| CalculationError::InvalidDate {
        value: date.to_string(),
        message,
    };

    let parsed = NaiveDate::parse_from_str(date, DATE_FORMAT).map_err(|e| invalid(e.to_string()))?;
    let due = parsed
        .checked_add_days(Days::new(PAYMENT_TERM_DAYS))
        .ok_or_else(|| invalid("date out of range".to_string()))?;

    Ok(due.format(DATE_FORMAT).to_string())
}

/// Budget for `quantity` units at `rate` per thousand
pub fn budget(quantity: f64, rate: f64) -> f64 {
    (quantity * rate) / BUDGET_DIVISOR
}

/// VAT percent selected by free-form VAT text
///
/// Case-sensitive substring match: any text containing "GCC" selects the
/// GCC rate, everything else is zero-rated.
pub fn vat_percent(text: &str) -> u32 {
    if text.contains(GCC_MARKER) {
        GCC_VAT_PERCENT
    } else {
        0
    }
}

/// VAT due on `budget` at `percent`
pub fn vat_amount(budget: f64, percent: u32) -> f64 {
    (budget * f64::from(percent)) / 100.0
}

/// Derive every computed field from the raw record
pub fn derive(record: &InvoiceRecord) -> Result<DerivedFields, CalculationError> {
    let missing = missing_required_fields(record);
    if !missing.is_empty() {
        return Err(CalculationError::MissingFields { fields: missing });
    }

    let date = match record.get("date") {
        Some(FieldValue::Text(s)) => s.as_str(),
        other => {
            return Err(CalculationError::InvalidDate {
                value: other.map(ToString::to_string).unwrap_or_default(),
                message: "expected text".to_string(),
            });
        }
    };
    let due_date = due_date(date)?;

    let quantity = number_or_zero(record, "quantity")?;
    let rate = number_or_zero(record, "rate")?;
    let budget = budget(quantity, rate);

    let vat_percent = vat_percent(vat_text(record)?);
    let vat_amount = vat_amount(budget, vat_percent);

    let total_amount = budget + vat_amount;
    if !total_amount.is_finite() {
        return Err(CalculationError::NonFiniteAmount {
            field: "total_amount".to_string(),
        });
    }

    let total_in_words = amount_in_words(total_amount).ok_or_else(|| {
        CalculationError::AmountOutOfRange {
            field: "total_amount".to_string(),
        }
    })?;

    Ok(DerivedFields {
        due_date,
        budget,
        vat_percent,
        vat_amount,
        total_amount,
        total_in_words: total_in_words.to_uppercase(),
    })
}

/// Enrich a copy of `record` with the derived fields
pub fn compute_derived_fields(record: &InvoiceRecord) -> Result<InvoiceRecord, CalculationError> {
    let derived = derive(record)?;
    let mut enriched = record.clone();
    derived.apply_to(&mut enriched);
    Ok(enriched)
}

/// The free-form VAT text; absent falls back to [`DEFAULT_VAT_TEXT`]
fn vat_text(record: &InvoiceRecord) -> Result<&str, CalculationError> {
    match record.get("vat_rate") {
        None => Ok(DEFAULT_VAT_TEXT),
        Some(FieldValue::Text(text)) => Ok(text.as_str()),
        Some(other) => Err(CalculationError::InvalidVatRate {
            value: other.to_string(),
        }),
    }
}

/// Numeric value of a field; absent, null or blank counts as zero
fn number_or_zero(record: &InvoiceRecord, field: &str) -> Result<f64, CalculationError> {
    match record.get(field) {
        None => Ok(0.0),
        Some(value) if value.is_blank() => Ok(0.0),
        Some(value) => value
            .parse_number()
            .ok_or_else(|| CalculationError::InvalidNumber {
                field: field.to_string(),
                value: value.to_string(),
            }),
    }
}
