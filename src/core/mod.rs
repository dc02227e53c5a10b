//! Core module containing the invoice domain: fields, records, validation,
//! calculation, store traits and the invoice service

pub mod calculator;
pub mod client;
pub mod error;
pub mod field;
pub mod record;
pub mod schema;
pub mod service;
pub mod store;
pub mod validation;
pub mod words;

pub use client::ClientEntry;
pub use error::{ErrorKind, InvoiceError};
pub use field::{CellLocation, FieldDescriptor, FieldType, FieldValue, ValidationRule};
pub use record::InvoiceRecord;
pub use schema::FieldSchema;
pub use service::{InvoiceService, SavedInvoice};
pub use store::{ClientDirectory, TemplateStore};
pub use validation::{InvoiceValidator, ValidationReport};
