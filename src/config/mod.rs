//! Configuration loading and management

use crate::core::error::ConfigError;
use crate::core::field::{FieldDescriptor, ValidationRule};
use crate::core::schema::{FieldSchema, INVOICE_SHEET};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

/// Application configuration
///
/// Every key is optional in YAML; missing keys take the defaults below.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Template workbook read at startup
    pub template_path: PathBuf,

    /// Directory generated invoices are written to
    pub output_dir: PathBuf,

    /// JSON file holding clients and the invoice counter
    pub clients_path: PathBuf,

    /// Address the HTTP server binds to
    pub listen_addr: String,

    /// Preferred worksheet of the template
    pub sheet_name: String,

    /// Counter value used when no client file exists yet
    pub first_invoice_number: u64,

    /// Field table replacing the standard one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<FieldDescriptor>>,

    /// Rules replacing the defaults of the listed fields (field id -> rule)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation_rules: Option<HashMap<String, ValidationRule>>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::default_config()
    }
}

impl AppConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ConfigError::FileNotFound {
                path: path.display().to_string(),
            },
            _ => ConfigError::IoError {
                message: format!("{}: {}", path.display(), e),
            },
        })?;

        let config: Self = serde_yaml::from_str(&content).map_err(|e| ConfigError::ParseError {
            file: Some(path.display().to_string()),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml).map_err(|e| ConfigError::ParseError {
            file: None,
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Configuration with every default applied
    pub fn default_config() -> Self {
        Self {
            template_path: PathBuf::from("../Yazle_Invoice_Template_Final.xlsx"),
            output_dir: PathBuf::from("./generated_invoices/"),
            clients_path: PathBuf::from("./clients.json"),
            listen_addr: "0.0.0.0:8000".to_string(),
            sheet_name: INVOICE_SHEET.to_string(),
            first_invoice_number: 1,
            fields: None,
            validation_rules: None,
        }
    }

    /// Check values that deserialize fine but cannot be used
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.socket_addr()?;

        if self.sheet_name.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "sheet_name".to_string(),
                value: self.sheet_name.clone(),
                message: "sheet name must not be empty".to_string(),
            });
        }

        self.field_schema().map(|_| ())
    }

    /// Parsed listen address
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.listen_addr
            .parse()
            .map_err(|e: std::net::AddrParseError| ConfigError::InvalidValue {
                field: "listen_addr".to_string(),
                value: self.listen_addr.clone(),
                message: e.to_string(),
            })
    }

    /// Field schema described by this configuration
    ///
    /// Starts from `fields` (or the standard table) and then applies
    /// `validation_rules`.
    pub fn field_schema(&self) -> Result<FieldSchema, ConfigError> {
        let schema = match &self.fields {
            Some(fields) => FieldSchema::new(fields.clone())?,
            None => FieldSchema::standard().clone(),
        };

        match &self.validation_rules {
            Some(rules) => schema.with_rules(rules.clone()),
            None => Ok(schema),
        }
    }
}
