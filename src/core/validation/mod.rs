//! Validation of caller-supplied invoice fields
//!
//! Field checks are small composable validators; the [`InvoiceValidator`]
//! assembles them per field from the schema and runs them in order.

pub mod validator;
pub mod validators;

pub use validator::{InvoiceValidator, ValidationReport};
