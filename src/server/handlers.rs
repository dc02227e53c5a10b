//! HTTP handlers for invoice and client operations

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::path::PathBuf;
use std::sync::Arc;
use validator::{Validate, ValidationError};

use crate::core::client::ClientEntry;
use crate::core::error::{ClientError, InvoiceError};
use crate::core::record::InvoiceRecord;
use crate::core::service::InvoiceService;
use crate::core::validation::ValidationReport;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<InvoiceService>,
}

impl AppState {
    pub fn new(service: Arc<InvoiceService>) -> Self {
        Self { service }
    }
}

/// Request body of `POST /api/clients/add`
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AddClientRequest {
    #[serde(default)]
    #[validate(custom(function = "not_blank"))]
    pub name: String,

    #[serde(default)]
    pub address: String,
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct ClientsResponse {
    pub clients: Vec<ClientEntry>,
}

#[derive(Debug, Serialize)]
pub struct NextNumberResponse {
    /// The next invoice number, as text
    pub number: String,
}

#[derive(Debug, Serialize)]
pub struct SaveInvoiceResponse {
    pub success: bool,
    pub message: String,
    pub output_path: PathBuf,
    pub invoice: InvoiceRecord,
}

/// API description: `GET /`
pub async fn index() -> Json<Value> {
    Json(json!({
        "message": "Invoice Automation API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "/health": "Health check",
            "/api/invoice/initial": "Get initial invoice data",
            "/api/clients": "Get all clients",
            "/api/clients/add": "Add new client (POST)",
            "/api/invoice/next-number": "Get next invoice number",
            "/api/invoice/validate": "Validate invoice (POST)",
            "/api/invoice/save": "Save invoice (POST)"
        }
    }))
}

pub async fn health_check() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Template values used to prefill a new invoice
pub async fn initial_invoice(
    State(state): State<AppState>,
) -> Result<Json<InvoiceRecord>, InvoiceError> {
    Ok(Json(state.service.initial_data().await?))
}

pub async fn list_clients(
    State(state): State<AppState>,
) -> Result<Json<ClientsResponse>, InvoiceError> {
    let clients = state.service.list_clients().await?;
    Ok(Json(ClientsResponse { clients }))
}

pub async fn add_client(
    State(state): State<AppState>,
    Json(payload): Json<AddClientRequest>,
) -> Result<Json<Value>, InvoiceError> {
    payload.validate().map_err(|_| ClientError::EmptyName)?;

    let entry = state
        .service
        .add_client(&payload.name, &payload.address)
        .await?;

    Ok(Json(json!({
        "success": true,
        "message": format!("Client {} added successfully", entry.name)
    })))
}

pub async fn next_invoice_number(
    State(state): State<AppState>,
) -> Result<Json<NextNumberResponse>, InvoiceError> {
    let number = state.service.next_invoice_number().await?;
    Ok(Json(NextNumberResponse {
        number: number.to_string(),
    }))
}

/// Check a record without saving; always answers 200 with the outcome
pub async fn validate_invoice(
    State(state): State<AppState>,
    Json(record): Json<InvoiceRecord>,
) -> Json<ValidationReport> {
    Json(state.service.validate(&record))
}

pub async fn save_invoice(
    State(state): State<AppState>,
    Json(record): Json<InvoiceRecord>,
) -> Result<Json<SaveInvoiceResponse>, InvoiceError> {
    let saved = state.service.save_invoice(record).await?;

    Ok(Json(SaveInvoiceResponse {
        success: true,
        message: "Invoice saved successfully".to_string(),
        output_path: saved.output_path,
        invoice: saved.invoice,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_client_request_rejects_blank_name() {
        let request: AddClientRequest = serde_json::from_str(r#"{"name": "  "}"#).unwrap();
        assert!(request.validate().is_err());

        let missing: AddClientRequest = serde_json::from_str("{}").unwrap();
        assert!(missing.validate().is_err());
    }

    #[test]
    fn test_add_client_request_accepts_name_without_address() {
        let request: AddClientRequest = serde_json::from_str(r#"{"name": "Acme"}"#).unwrap();
        assert!(request.validate().is_ok());
        assert_eq!(request.address, "");
    }
}
