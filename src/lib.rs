//! # Invoice Automation
//!
//! Fills a spreadsheet invoice template from form data, derives the computed
//! amounts and writes one workbook per invoice.
//!
//! ## Features
//!
//! - **Schema-Driven Fields**: a fixed table maps field ids to template cells
//! - **Validation**: presence, type, range and allowed-value checks per field
//! - **Derived Amounts**: due date, budget, VAT, total and total in words
//! - **Template Storage**: `.xlsx` templates via `umya-spreadsheet`
//! - **Client Directory**: clients and the invoice counter in a JSON file
//! - **REST API**: Axum server with CORS and request tracing
//! - **Configuration-Based**: paths, listen address and fields via YAML
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use invoice::prelude::*;
//!
//! let schema = Arc::new(FieldSchema::default());
//! let service = InvoiceService::new(
//!     schema.clone(),
//!     Arc::new(InMemoryTemplateStore::new(schema)),
//!     Arc::new(InMemoryClientDirectory::default()),
//! );
//!
//! let record: InvoiceRecord = [
//!     ("invoice_no", "INV-1"),
//!     ("client_name", "Acme"),
//!     ("date", "01/01/2024"),
//!     ("description", "Goods"),
//!     ("quantity", "100"),
//!     ("rate", "10"),
//!     ("vat_rate", "GCC"),
//! ]
//! .into_iter()
//! .collect();
//!
//! let saved = service.save_invoice(record).await?;
//! assert_eq!(saved.invoice.text("total_in_words"), Some("ONE DOLLARS AND FIVE CENTS"));
//! ```

pub mod config;
pub mod core;
pub mod server;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core ===
    pub use crate::core::{
        calculator::{DerivedFields, compute_derived_fields},
        client::ClientEntry,
        error::{
            CalculationError, ClientError, ConfigError, ErrorKind, ErrorResponse,
            FieldViolation, InvoiceError, StorageError, ValidationError,
        },
        field::{CellLocation, FieldDescriptor, FieldType, FieldValue, ValidationRule},
        record::InvoiceRecord,
        schema::FieldSchema,
        service::{InvoiceService, SavedInvoice},
        store::{ClientDirectory, TemplateStore},
        validation::{InvoiceValidator, ValidationReport},
        words::amount_in_words,
    };

    // === Storage ===
    pub use crate::storage::{
        InMemoryClientDirectory, InMemoryTemplateStore, JsonClientDirectory, XlsxTemplateStore,
    };

    // === Config ===
    pub use crate::config::AppConfig;

    // === Server ===
    pub use crate::server::{AppState, RestExposure, ServerBuilder};

    // === External dependencies ===
    pub use anyhow::Result;
    pub use async_trait::async_trait;
    pub use serde::{Deserialize, Serialize};
    pub use std::sync::Arc;

    // === Axum ===
    pub use axum::{
        Router,
        routing::{get, post},
    };
}
