//! The invoice service: validation, calculation, persistence and numbering
//!
//! This is the single entry point used by the REST handlers. A save runs the
//! required-field gate, derives computed fields, writes them into the
//! template, persists a new workbook and only then advances the counter.

use crate::core::calculator::{REQUIRED_FIELDS, compute_derived_fields, missing_required_fields};
use crate::core::client::ClientEntry;
use crate::core::error::{CalculationError, InvoiceError};
use crate::core::record::InvoiceRecord;
use crate::core::schema::FieldSchema;
use crate::core::store::{ClientDirectory, TemplateStore};
use crate::core::validation::{InvoiceValidator, ValidationReport};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Result of a successful save
#[derive(Debug, Clone, Serialize)]
pub struct SavedInvoice {
    /// Path of the workbook written for this invoice
    pub output_path: PathBuf,
    /// The record as saved, derived fields included
    pub invoice: InvoiceRecord,
}

/// Orchestrates the invoice workflow over a template store and a client directory
pub struct InvoiceService {
    validator: InvoiceValidator,
    templates: Arc<dyn TemplateStore>,
    clients: Arc<dyn ClientDirectory>,
    save_lock: Mutex<()>,
}

impl InvoiceService {
    pub fn new(
        schema: Arc<FieldSchema>,
        templates: Arc<dyn TemplateStore>,
        clients: Arc<dyn ClientDirectory>,
    ) -> Self {
        Self {
            validator: InvoiceValidator::new(schema),
            templates,
            clients,
            save_lock: Mutex::new(()),
        }
    }

    pub fn schema(&self) -> &FieldSchema {
        self.validator.schema()
    }

    pub fn validator(&self) -> &InvoiceValidator {
        &self.validator
    }

    /// Current template values, used to prefill a new invoice
    pub async fn initial_data(&self) -> Result<InvoiceRecord, InvoiceError> {
        Ok(self.templates.get_all().await?)
    }

    pub async fn list_clients(&self) -> Result<Vec<ClientEntry>, InvoiceError> {
        Ok(self.clients.list_clients().await?)
    }

    pub async fn add_client(&self, name: &str, address: &str) -> Result<ClientEntry, InvoiceError> {
        let entry = self.clients.add_client(name, address).await?;
        tracing::info!(client = %entry.name, "client added");
        Ok(entry)
    }

    pub async fn next_invoice_number(&self) -> Result<u64, InvoiceError> {
        Ok(self.clients.next_invoice_number().await?)
    }

    /// Check a record against the schema without saving anything
    pub fn validate(&self, record: &InvoiceRecord) -> ValidationReport {
        self.validator.report(record)
    }

    /// Required fields that the schema types as numeric
    fn required_amounts(&self) -> Vec<&'static str> {
        REQUIRED_FIELDS
            .iter()
            .copied()
            .filter(|id| self.schema().get(id).is_some_and(|field| field.is_numeric()))
            .collect()
    }

    /// Gate, range-check and enrich a save request
    ///
    /// Missing required fields are reported first. The numeric required
    /// fields then go through their schema checks, so a negative quantity or
    /// rate never reaches the calculator.
    fn prepare(&self, record: &InvoiceRecord) -> Result<InvoiceRecord, InvoiceError> {
        let missing = missing_required_fields(record);
        if !missing.is_empty() {
            return Err(CalculationError::MissingFields { fields: missing }.into());
        }

        self.validator.validate_fields(record, &self.required_amounts())?;

        Ok(compute_derived_fields(record)?)
    }

    /// Compute, persist and number one invoice
    ///
    /// Saves are serialized per service instance. On any failure no counter
    /// change happens, and nothing is written unless the failure is in the
    /// final write itself.
    pub async fn save_invoice(&self, record: InvoiceRecord) -> Result<SavedInvoice, InvoiceError> {
        let _guard = self.save_lock.lock().await;

        let invoice = self.prepare(&record).inspect_err(|e| {
            tracing::warn!(error = %e, "invoice save rejected");
        })?;

        let invoice_no = invoice
            .get("invoice_no")
            .map(ToString::to_string)
            .unwrap_or_default();
        let filename = output_filename(Some(&invoice_no));

        let written = self.templates.apply_updates(&invoice).await?;
        let output_path = self.templates.save_as(filename.as_deref()).await?;
        let next_number = self.clients.increment_invoice_number().await?;

        tracing::info!(
            invoice_no = %invoice_no,
            path = %output_path.display(),
            cells = written,
            next_number,
            "invoice saved"
        );

        Ok(SavedInvoice {
            output_path,
            invoice,
        })
    }
}

/// Workbook filename for an invoice number
///
/// The number is trimmed, `/` becomes `-` and newlines become `_`. Returns
/// `None` when nothing is left, so the store falls back to a timestamped name.
pub fn output_filename(invoice_no: Option<&str>) -> Option<String> {
    let stem = invoice_no?.trim().replace('/', "-").replace('\n', "_");
    if stem.is_empty() {
        None
    } else {
        Some(format!("{}.xlsx", stem))
    }
}
