//! Route table of the invoice API

use super::handlers::{
    AppState, add_client, health_check, index, initial_invoice, list_clients,
    next_invoice_number, save_invoice, validate_invoice,
};
use axum::{
    Router,
    routing::{get, post},
};

/// Health and description routes
///
/// - GET / - API description
/// - GET /health - Health check
pub fn build_health_routes() -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health_check))
}

/// Invoice and client routes
///
/// - GET /api/invoice/initial - Template values
/// - GET /api/invoice/next-number - Next invoice number
/// - POST /api/invoice/validate - Validate a record
/// - POST /api/invoice/save - Save an invoice
/// - GET /api/clients - List clients
/// - POST /api/clients/add - Add a client
pub fn build_invoice_routes(state: AppState) -> Router {
    Router::new()
        .route("/api/invoice/initial", get(initial_invoice))
        .route("/api/invoice/next-number", get(next_invoice_number))
        .route("/api/invoice/validate", post(validate_invoice))
        .route("/api/invoice/save", post(save_invoice))
        .route("/api/clients", get(list_clients))
        .route("/api/clients/add", post(add_client))
        .with_state(state)
}
