//! Typed error handling for invoice operations
//!
//! Every failure maps to one [`ErrorKind`] so callers can branch on the cause
//! instead of parsing message text.
//!
//! # Error Categories
//!
//! - [`ValidationError`]: field-level input validation
//! - [`CalculationError`]: derived-field computation
//! - [`StorageError`]: template workbook and directory file I/O
//! - [`ClientError`]: client directory operations
//! - [`ConfigError`]: configuration parsing and validation
//!
//! # Example
//!
//! ```rust,ignore
//! match service.save_invoice(record).await {
//!     Ok(saved) => println!("written to {}", saved.output_path.display()),
//!     Err(InvoiceError::Calculation(CalculationError::MissingFields { fields })) => {
//!         println!("fill in: {}", fields.join(", "));
//!     }
//!     Err(e) => eprintln!("{}", e),
//! }
//! ```

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// Failure taxonomy shared by every error type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    UnknownField,
    MissingField,
    TypeMismatch,
    DateParseError,
    OutOfRange,
    InvalidEnum,
    FileNotFound,
    IoError,
    InvalidClient,
    Config,
    Internal,
}

/// The main error type for invoice operations
#[derive(Debug)]
pub enum InvoiceError {
    /// Caller input failed field validation
    Validation(ValidationError),

    /// Derived fields could not be computed
    Calculation(CalculationError),

    /// Template or file I/O failed
    Storage(StorageError),

    /// Client directory rejected the operation
    Client(ClientError),
}

impl fmt::Display for InvoiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvoiceError::Validation(e) => write!(f, "{}", e),
            InvoiceError::Calculation(e) => write!(f, "{}", e),
            InvoiceError::Storage(e) => write!(f, "{}", e),
            InvoiceError::Client(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for InvoiceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            InvoiceError::Validation(e) => Some(e),
            InvoiceError::Calculation(e) => Some(e),
            InvoiceError::Storage(e) => Some(e),
            InvoiceError::Client(e) => Some(e),
        }
    }
}

/// Error body returned by the HTTP exposure
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Always `false`; mirrors the success flag of the save endpoint
    pub success: bool,
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable summary
    pub message: String,
    /// Every individual message, one per failed check
    pub errors: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl InvoiceError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            InvoiceError::Validation(_) => StatusCode::BAD_REQUEST,
            InvoiceError::Calculation(_) => StatusCode::BAD_REQUEST,
            InvoiceError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            InvoiceError::Client(e) => e.status_code(),
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            InvoiceError::Validation(_) => "VALIDATION_ERROR",
            InvoiceError::Calculation(e) => e.error_code(),
            InvoiceError::Storage(e) => e.error_code(),
            InvoiceError::Client(e) => e.error_code(),
        }
    }

    /// The failure kind; for multi-field validation errors, the kind of the first violation
    pub fn kind(&self) -> ErrorKind {
        match self {
            InvoiceError::Validation(e) => e.kind(),
            InvoiceError::Calculation(e) => e.kind(),
            InvoiceError::Storage(e) => e.kind(),
            InvoiceError::Client(e) => e.kind(),
        }
    }

    /// Human-readable messages, one per failed check
    pub fn messages(&self) -> Vec<String> {
        match self {
            InvoiceError::Validation(ValidationError::Fields(violations)) => {
                violations.iter().map(|v| v.message.clone()).collect()
            }
            other => vec![other.to_string()],
        }
    }

    /// Convert to an error response
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            success: false,
            code: self.error_code().to_string(),
            message: self.to_string(),
            errors: self.messages(),
            details: self.details(),
        }
    }

    fn details(&self) -> Option<serde_json::Value> {
        match self {
            InvoiceError::Validation(ValidationError::Fields(violations)) => {
                Some(serde_json::json!({ "fields": violations }))
            }
            InvoiceError::Calculation(CalculationError::MissingFields { fields }) => {
                Some(serde_json::json!({ "missing": fields }))
            }
            _ => None,
        }
    }
}

impl IntoResponse for InvoiceError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(self.to_response());
        (status, body).into_response()
    }
}

// =============================================================================
// Validation Errors
// =============================================================================

/// One failed field check
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldViolation {
    pub field: String,
    pub kind: ErrorKind,
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: impl Into<String>, kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// Errors related to input validation
#[derive(Debug)]
pub enum ValidationError {
    /// One or more fields failed validation
    Fields(Vec<FieldViolation>),
}

impl ValidationError {
    pub fn violations(&self) -> &[FieldViolation] {
        match self {
            ValidationError::Fields(v) => v,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.violations()
            .first()
            .map(|v| v.kind)
            .unwrap_or(ErrorKind::Internal)
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::Fields(violations) => {
                let msgs: Vec<&str> = violations.iter().map(|v| v.message.as_str()).collect();
                write!(f, "Validation errors: {}", msgs.join("; "))
            }
        }
    }
}

impl std::error::Error for ValidationError {}

impl From<Vec<FieldViolation>> for InvoiceError {
    fn from(violations: Vec<FieldViolation>) -> Self {
        InvoiceError::Validation(ValidationError::Fields(violations))
    }
}

// =============================================================================
// Calculation Errors
// =============================================================================

/// Errors raised while deriving computed invoice fields
#[derive(Debug, Clone, PartialEq)]
pub enum CalculationError {
    /// Required fields were absent or empty
    MissingFields { fields: Vec<String> },

    /// The invoice date is not DD/MM/YYYY
    InvalidDate { value: String, message: String },

    /// A numeric input could not be parsed
    InvalidNumber { field: String, value: String },

    /// A computed amount is infinite or NaN
    NonFiniteAmount { field: String },

    /// A computed amount is too large to spell out
    AmountOutOfRange { field: String },

    /// `vat_rate` was supplied as something other than text
    InvalidVatRate { value: String },
}

impl fmt::Display for CalculationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CalculationError::MissingFields { fields } => {
                write!(f, "Missing required fields: {}", fields.join(", "))
            }
            CalculationError::InvalidDate { value, message } => {
                write!(
                    f,
                    "Invalid date format. Use DD/MM/YYYY: '{}' ({})",
                    value, message
                )
            }
            CalculationError::InvalidNumber { field, value } => {
                write!(
                    f,
                    "Error calculating fields: {} '{}' is not a number",
                    field, value
                )
            }
            CalculationError::NonFiniteAmount { field } => {
                write!(f, "Error calculating fields: {} is not a finite amount", field)
            }
            CalculationError::AmountOutOfRange { field } => {
                write!(f, "Error calculating fields: {} is too large to spell out", field)
            }
            CalculationError::InvalidVatRate { value } => {
                write!(f, "Error calculating fields: vat_rate must be text, got '{}'", value)
            }
        }
    }
}

impl std::error::Error for CalculationError {}

impl CalculationError {
    pub fn error_code(&self) -> &'static str {
        match self {
            CalculationError::MissingFields { .. } => "MISSING_REQUIRED_FIELDS",
            CalculationError::InvalidDate { .. } => "INVALID_DATE",
            CalculationError::InvalidNumber { .. } => "INVALID_NUMBER",
            CalculationError::NonFiniteAmount { .. } => "NON_FINITE_AMOUNT",
            CalculationError::AmountOutOfRange { .. } => "AMOUNT_OUT_OF_RANGE",
            CalculationError::InvalidVatRate { .. } => "INVALID_VAT_RATE",
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            CalculationError::MissingFields { .. } => ErrorKind::MissingField,
            CalculationError::InvalidDate { .. } => ErrorKind::DateParseError,
            CalculationError::InvalidNumber { .. } => ErrorKind::TypeMismatch,
            CalculationError::NonFiniteAmount { .. } => ErrorKind::OutOfRange,
            CalculationError::AmountOutOfRange { .. } => ErrorKind::OutOfRange,
            CalculationError::InvalidVatRate { .. } => ErrorKind::TypeMismatch,
        }
    }
}

impl From<CalculationError> for InvoiceError {
    fn from(err: CalculationError) -> Self {
        InvoiceError::Calculation(err)
    }
}

// =============================================================================
// Storage Errors
// =============================================================================

/// Errors raised by template and directory backends
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Template file not found: {}", .path.display())]
    TemplateNotFound { path: PathBuf },

    #[error("Template has not been loaded")]
    TemplateNotLoaded,

    #[error("Template '{}' has no worksheet", .path.display())]
    NoWorksheet { path: PathBuf },

    #[error("Error loading template '{}': {message}", .path.display())]
    TemplateUnreadable { path: PathBuf, message: String },

    #[error("Error saving invoice to '{}': {message}", .path.display())]
    WriteFailed { path: PathBuf, message: String },

    #[error("Malformed data in '{}': {message}", .path.display())]
    Corrupt { path: PathBuf, message: String },

    #[error("Store state unavailable: {0}")]
    LockPoisoned(String),

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

impl StorageError {
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        StorageError::Io {
            context: context.into(),
            source,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            StorageError::TemplateNotFound { .. } => "TEMPLATE_NOT_FOUND",
            StorageError::TemplateNotLoaded => "TEMPLATE_NOT_LOADED",
            StorageError::NoWorksheet { .. } => "TEMPLATE_NO_WORKSHEET",
            StorageError::TemplateUnreadable { .. } => "TEMPLATE_UNREADABLE",
            StorageError::WriteFailed { .. } => "WRITE_FAILED",
            StorageError::Corrupt { .. } => "CORRUPT_DATA",
            StorageError::LockPoisoned(_) => "STORE_UNAVAILABLE",
            StorageError::Io { .. } => "IO_ERROR",
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            StorageError::TemplateNotFound { .. } => ErrorKind::FileNotFound,
            _ => ErrorKind::IoError,
        }
    }
}

impl From<StorageError> for InvoiceError {
    fn from(err: StorageError) -> Self {
        InvoiceError::Storage(err)
    }
}

// =============================================================================
// Client Errors
// =============================================================================

/// Errors raised by the client directory
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Client name is required")]
    EmptyName,

    #[error("Client '{name}' already exists")]
    AlreadyExists { name: String },

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl ClientError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ClientError::EmptyName | ClientError::AlreadyExists { .. } => StatusCode::BAD_REQUEST,
            ClientError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            ClientError::EmptyName => "CLIENT_NAME_REQUIRED",
            ClientError::AlreadyExists { .. } => "CLIENT_ALREADY_EXISTS",
            ClientError::Storage(e) => e.error_code(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ClientError::EmptyName | ClientError::AlreadyExists { .. } => ErrorKind::InvalidClient,
            ClientError::Storage(e) => e.kind(),
        }
    }
}

impl From<ClientError> for InvoiceError {
    fn from(err: ClientError) -> Self {
        InvoiceError::Client(err)
    }
}

// =============================================================================
// Config Errors
// =============================================================================

/// Errors related to configuration
#[derive(Debug)]
pub enum ConfigError {
    /// Failed to parse configuration file
    ParseError {
        file: Option<String>,
        message: String,
    },

    /// Invalid value in configuration
    InvalidValue {
        field: String,
        value: String,
        message: String,
    },

    /// Configuration file not found
    FileNotFound { path: String },

    /// IO error while reading configuration
    IoError { message: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ParseError { file, message } => {
                if let Some(file) = file {
                    write!(f, "Failed to parse config file '{}': {}", file, message)
                } else {
                    write!(f, "Failed to parse config: {}", message)
                }
            }
            ConfigError::InvalidValue {
                field,
                value,
                message,
            } => {
                write!(
                    f,
                    "Invalid value '{}' for field '{}': {}",
                    value, field, message
                )
            }
            ConfigError::FileNotFound { path } => {
                write!(f, "Configuration file not found: {}", path)
            }
            ConfigError::IoError { message } => {
                write!(f, "IO error: {}", message)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl ConfigError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ConfigError::FileNotFound { .. } => ErrorKind::FileNotFound,
            ConfigError::IoError { .. } => ErrorKind::IoError,
            ConfigError::ParseError { .. } | ConfigError::InvalidValue { .. } => ErrorKind::Config,
        }
    }
}
