//! Store traits for the template workbook and the client directory
//!
//! Both traits are agnostic to the backing medium; see `crate::storage` for
//! the spreadsheet, JSON file and in-memory implementations.

use crate::core::client::ClientEntry;
use crate::core::error::{ClientError, StorageError};
use crate::core::record::InvoiceRecord;
use async_trait::async_trait;
use chrono::Local;
use std::path::PathBuf;

/// Key-value view of an invoice template, keyed by field id
///
/// The loaded template is never modified. Updates go to a pending copy of
/// it, and [`TemplateStore::save_as`] writes that copy to a new file and
/// discards it whether or not the write succeeds, so the next invoice
/// starts again from the template.
#[async_trait]
pub trait TemplateStore: Send + Sync {
    /// Load (or reload) the template, dropping any pending updates
    ///
    /// Selects the configured invoice sheet when present, else the first sheet.
    async fn load(&self) -> Result<(), StorageError>;

    /// Value of every schema field in the loaded template, in schema order
    ///
    /// Pending updates are not visible here. A cell that cannot be read
    /// yields empty text.
    async fn get_all(&self) -> Result<InvoiceRecord, StorageError>;

    /// Write record values into the pending copy
    ///
    /// The copy is taken from the template on the first update after a load
    /// or save. Unknown and read-only fields are skipped. Returns the number
    /// of cells written.
    async fn apply_updates(&self, record: &InvoiceRecord) -> Result<usize, StorageError>;

    /// Persist the pending copy under the output directory and discard it
    ///
    /// With nothing pending, the template itself is written. Creates the
    /// directory if needed. Without a filename, a timestamped one is
    /// generated (see [`default_output_filename`]).
    async fn save_as(&self, filename: Option<&str>) -> Result<PathBuf, StorageError>;
}

/// Client names and addresses plus the invoice counter
///
/// Every mutation is persisted before the call returns.
#[async_trait]
pub trait ClientDirectory: Send + Sync {
    /// All clients in insertion order
    async fn list_clients(&self) -> Result<Vec<ClientEntry>, ClientError>;

    /// Add a client; the name and address are trimmed
    async fn add_client(&self, name: &str, address: &str) -> Result<ClientEntry, ClientError>;

    /// Number the next saved invoice will get, without consuming it
    async fn next_invoice_number(&self) -> Result<u64, ClientError>;

    /// Advance the counter and return the new value
    async fn increment_invoice_number(&self) -> Result<u64, ClientError>;
}

/// `Invoice_{YYYYmmdd_HHMMSS}.xlsx` for the current local time
pub fn default_output_filename() -> String {
    format!("Invoice_{}.xlsx", Local::now().format("%Y%m%d_%H%M%S"))
}
