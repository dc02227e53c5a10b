//! End-to-end tests of the REST API
//!
//! These tests drive the full router over HTTP with in-memory stores and
//! check status codes and response bodies of every endpoint.

use axum::http::StatusCode;
use axum_test::TestServer;
use invoice::prelude::*;
use serde_json::{Value, json};

// =============================================================================
// Test Setup
// =============================================================================

struct TestApp {
    server: TestServer,
    templates: Arc<InMemoryTemplateStore>,
    clients: Arc<InMemoryClientDirectory>,
}

fn create_test_app() -> TestApp {
    let schema = Arc::new(FieldSchema::default());
    let template_values: InvoiceRecord = [("invoice_no", "TEMPLATE"), ("client_trn", "100200300")]
        .into_iter()
        .collect();
    let templates = Arc::new(InMemoryTemplateStore::with_values(schema.clone(), template_values));
    let clients = Arc::new(InMemoryClientDirectory::new(1));

    let service = Arc::new(InvoiceService::new(schema, templates.clone(), clients.clone()));
    let app = RestExposure::build_router(service, Vec::new());
    let server = TestServer::new(app).expect("Failed to create test server");

    TestApp {
        server,
        templates,
        clients,
    }
}

fn sample_invoice() -> Value {
    json!({
        "invoice_no": "INV-1",
        "client_name": "Acme",
        "date": "01/01/2024",
        "description": "Goods",
        "quantity": "100",
        "rate": "10",
        "vat_rate": "GCC"
    })
}

// =============================================================================
// Health and description
// =============================================================================

mod health_tests {
    use super::*;

    #[tokio::test]
    async fn test_health_check() {
        let app = create_test_app();

        let response = app.server.get("/health").await;
        response.assert_status_ok();
        response.assert_json(&json!({ "status": "ok" }));
    }

    #[tokio::test]
    async fn test_index_lists_endpoints() {
        let app = create_test_app();

        let response = app.server.get("/").await;
        response.assert_status_ok();

        let body: Value = response.json();
        assert_eq!(body["message"], "Invoice Automation API");
        assert!(body["endpoints"]["/api/invoice/save"].is_string());
    }
}

// =============================================================================
// Invoice endpoints
// =============================================================================

mod invoice_tests {
    use super::*;

    #[tokio::test]
    async fn test_initial_data_returns_template_values() {
        let app = create_test_app();

        let response = app.server.get("/api/invoice/initial").await;
        response.assert_status_ok();

        let body: Value = response.json();
        assert_eq!(body["invoice_no"], "TEMPLATE");
        assert_eq!(body["client_trn"], "100200300");
        assert_eq!(body["client_name"], "");
        assert_eq!(body.as_object().unwrap().len(), 12);
    }

    #[tokio::test]
    async fn test_next_number_is_text() {
        let app = create_test_app();

        let response = app.server.get("/api/invoice/next-number").await;
        response.assert_status_ok();
        response.assert_json(&json!({ "number": "1" }));
    }

    #[tokio::test]
    async fn test_validate_valid_record() {
        let app = create_test_app();

        let response = app
            .server
            .post("/api/invoice/validate")
            .json(&json!({ "client_name": "Acme", "quantity": 3, "date": "15/06/2024" }))
            .await;
        response.assert_status_ok();
        response.assert_json(&json!({ "valid": true, "errors": [] }));
    }

    #[tokio::test]
    async fn test_validate_reports_every_bad_field() {
        let app = create_test_app();

        let response = app
            .server
            .post("/api/invoice/validate")
            .json(&json!({ "quantity": -1, "vat_rate": 7, "discount": "5" }))
            .await;
        response.assert_status_ok();

        let body: Value = response.json();
        assert_eq!(body["valid"], false);

        let mut errors: Vec<&str> = body["errors"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(Value::as_str)
            .collect();
        errors.sort_unstable();
        assert_eq!(
            errors,
            vec![
                "Quantity must be >= 0",
                "Unknown field: discount",
                "VAT Rate (%) must be one of [0, 5]",
            ]
        );
    }

    #[tokio::test]
    async fn test_save_invoice() {
        let app = create_test_app();

        let response = app
            .server
            .post("/api/invoice/save")
            .json(&sample_invoice())
            .await;
        response.assert_status_ok();

        let body: Value = response.json();
        assert_eq!(body["success"], true);
        assert_eq!(body["message"], "Invoice saved successfully");
        assert_eq!(body["output_path"], "INV-1.xlsx");
        assert_eq!(body["invoice"]["due_date"], "31/01/2024");
        assert_eq!(body["invoice"]["vat_rate"], "VAT(5%)");
        assert_eq!(body["invoice"]["total_in_words"], "ONE DOLLARS AND FIVE CENTS");
        assert!((body["invoice"]["total_amount"].as_f64().unwrap() - 1.05).abs() < 1e-9);

        let next = app.server.get("/api/invoice/next-number").await;
        next.assert_json(&json!({ "number": "2" }));
    }

    #[tokio::test]
    async fn test_save_missing_rate_is_rejected() {
        let app = create_test_app();
        let mut invoice = sample_invoice();
        invoice.as_object_mut().unwrap().remove("rate");

        let response = app.server.post("/api/invoice/save").json(&invoice).await;
        response.assert_status(StatusCode::BAD_REQUEST);

        let body: Value = response.json();
        assert_eq!(body["success"], false);
        assert_eq!(body["code"], "MISSING_REQUIRED_FIELDS");
        assert_eq!(body["errors"], json!(["Missing required fields: rate"]));

        assert!(app.templates.saved().is_empty());
        assert_eq!(app.clients.next_invoice_number().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_save_invalid_date_is_rejected() {
        let app = create_test_app();
        let mut invoice = sample_invoice();
        invoice["date"] = json!("2024-01-01");

        let response = app.server.post("/api/invoice/save").json(&invoice).await;
        response.assert_status(StatusCode::BAD_REQUEST);

        let body: Value = response.json();
        assert_eq!(body["code"], "INVALID_DATE");
        assert!(
            body["message"]
                .as_str()
                .unwrap()
                .starts_with("Invalid date format. Use DD/MM/YYYY")
        );
        assert_eq!(app.clients.next_invoice_number().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_save_negative_quantity_is_rejected() {
        let app = create_test_app();
        let mut invoice = sample_invoice();
        invoice["quantity"] = json!("-1");

        let response = app.server.post("/api/invoice/save").json(&invoice).await;
        response.assert_status(StatusCode::BAD_REQUEST);

        let body: Value = response.json();
        assert_eq!(body["success"], false);
        assert_eq!(body["code"], "VALIDATION_ERROR");
        assert_eq!(body["errors"], json!(["Quantity must be >= 0"]));
        assert_eq!(body["details"]["fields"][0]["field"], "quantity");
        assert_eq!(body["details"]["fields"][0]["kind"], "out_of_range");

        assert!(app.templates.saved().is_empty());
        assert_eq!(app.clients.next_invoice_number().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_save_without_vat_rate_charges_gcc_vat() {
        let app = create_test_app();
        let mut invoice = sample_invoice();
        invoice.as_object_mut().unwrap().remove("vat_rate");

        let response = app.server.post("/api/invoice/save").json(&invoice).await;
        response.assert_status_ok();

        let body: Value = response.json();
        assert_eq!(body["invoice"]["vat_rate"], "VAT(5%)");
        assert_eq!(body["invoice"]["total_in_words"], "ONE DOLLARS AND FIVE CENTS");
    }

    #[tokio::test]
    async fn test_save_numeric_vat_rate_is_rejected() {
        let app = create_test_app();
        let mut invoice = sample_invoice();
        invoice["vat_rate"] = json!(5);

        let response = app.server.post("/api/invoice/save").json(&invoice).await;
        response.assert_status(StatusCode::BAD_REQUEST);

        let body: Value = response.json();
        assert_eq!(body["code"], "INVALID_VAT_RATE");
        assert_eq!(app.clients.next_invoice_number().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_initial_data_unchanged_by_save() {
        let app = create_test_app();
        let mut invoice = sample_invoice();
        invoice["client_trn"] = json!("TRN-ACME");

        app.server
            .post("/api/invoice/save")
            .json(&invoice)
            .await
            .assert_status_ok();

        let body: Value = app.server.get("/api/invoice/initial").await.json();
        assert_eq!(body["invoice_no"], "TEMPLATE");
        assert_eq!(body["client_trn"], "100200300");
        assert_eq!(body["client_name"], "");
    }

    #[tokio::test]
    async fn test_save_uses_sanitized_invoice_number_as_filename() {
        let app = create_test_app();
        let mut invoice = sample_invoice();
        invoice["invoice_no"] = json!(" 2024/07 ");

        let response = app.server.post("/api/invoice/save").json(&invoice).await;
        response.assert_status_ok();

        let body: Value = response.json();
        assert_eq!(body["output_path"], "2024-07.xlsx");
    }
}

// =============================================================================
// Client endpoints
// =============================================================================

mod client_tests {
    use super::*;

    #[tokio::test]
    async fn test_add_and_list_clients() {
        let app = create_test_app();

        let response = app
            .server
            .post("/api/clients/add")
            .json(&json!({ "name": " Acme ", "address": "Dubai" }))
            .await;
        response.assert_status_ok();
        response.assert_json(&json!({
            "success": true,
            "message": "Client Acme added successfully"
        }));

        let response = app.server.get("/api/clients").await;
        response.assert_status_ok();
        response.assert_json(&json!({
            "clients": [{ "name": "Acme", "address": "Dubai" }]
        }));
    }

    #[tokio::test]
    async fn test_add_client_requires_name() {
        let app = create_test_app();

        let response = app
            .server
            .post("/api/clients/add")
            .json(&json!({ "address": "Dubai" }))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);

        let body: Value = response.json();
        assert_eq!(body["code"], "CLIENT_NAME_REQUIRED");
        assert_eq!(body["message"], "Client name is required");
    }

    #[tokio::test]
    async fn test_add_duplicate_client() {
        let app = create_test_app();

        app.server
            .post("/api/clients/add")
            .json(&json!({ "name": "Acme", "address": "" }))
            .await
            .assert_status_ok();

        let response = app
            .server
            .post("/api/clients/add")
            .json(&json!({ "name": "Acme", "address": "Elsewhere" }))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);

        let body: Value = response.json();
        assert_eq!(body["code"], "CLIENT_ALREADY_EXISTS");
        assert_eq!(app.clients.list_clients().await.unwrap().len(), 1);
    }
}
