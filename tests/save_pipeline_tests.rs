//! Save pipeline against a real workbook
//!
//! These tests run the invoice service over the spreadsheet template store
//! and the JSON client directory inside a temporary directory, then read
//! the generated workbooks back to check what was written.

use invoice::prelude::*;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

// =============================================================================
// Test Setup
// =============================================================================

fn write_template(dir: &Path) -> PathBuf {
    let mut book = umya_spreadsheet::new_file();
    {
        let sheet = book.get_sheet_mut(&0).unwrap();
        sheet.set_name("Invoice");
        sheet.get_cell_mut("A1").set_value("YAZLE INVOICE");
        sheet.get_cell_mut("B2").set_value("TEMPLATE-0");
        sheet.get_cell_mut("B13").set_formula("=B11+B11*5/100");
    }

    let path = dir.join("template.xlsx");
    umya_spreadsheet::writer::xlsx::write(&book, &path).unwrap();
    path
}

async fn create_service(dir: &TempDir) -> (InvoiceService, PathBuf) {
    let schema = Arc::new(FieldSchema::default());
    let template = write_template(dir.path());

    let templates = XlsxTemplateStore::new(&template, dir.path().join("generated"), schema.clone());
    templates.load().await.unwrap();

    let clients = JsonClientDirectory::open(dir.path().join("clients.json"), 100)
        .await
        .unwrap();

    let service = InvoiceService::new(schema, Arc::new(templates), Arc::new(clients));
    (service, template)
}

fn sample_invoice() -> InvoiceRecord {
    [
        ("invoice_no", "INV/7"),
        ("client_name", "Acme"),
        ("client_address", "Dubai"),
        ("date", "01/01/2024"),
        ("description", "Goods"),
        ("quantity", "100"),
        ("rate", "10"),
        ("vat_rate", "GCC"),
    ]
    .into_iter()
    .collect()
}

fn read_cell(path: &Path, cell: &str) -> String {
    let book = umya_spreadsheet::reader::xlsx::read(path).unwrap();
    book.get_sheet_by_name("Invoice").unwrap().get_value(cell)
}

// =============================================================================
// Tests
// =============================================================================

#[tokio::test]
async fn test_save_writes_new_workbook() {
    let dir = TempDir::new().unwrap();
    let (service, _) = create_service(&dir).await;

    let saved = service.save_invoice(sample_invoice()).await.unwrap();

    assert_eq!(saved.output_path, dir.path().join("generated").join("INV-7.xlsx"));
    assert!(saved.output_path.exists());

    assert_eq!(read_cell(&saved.output_path, "B2"), "INV/7");
    assert_eq!(read_cell(&saved.output_path, "B3"), "Acme");
    assert_eq!(read_cell(&saved.output_path, "B4"), "Dubai");
    assert_eq!(read_cell(&saved.output_path, "B6"), "01/01/2024");
    assert_eq!(read_cell(&saved.output_path, "B11"), "1");
    assert_eq!(read_cell(&saved.output_path, "B12"), "VAT(5%)");
    assert_eq!(read_cell(&saved.output_path, "A1"), "YAZLE INVOICE");
}

#[tokio::test]
async fn test_template_file_is_never_modified() {
    let dir = TempDir::new().unwrap();
    let (service, template) = create_service(&dir).await;

    service.save_invoice(sample_invoice()).await.unwrap();

    assert_eq!(read_cell(&template, "B2"), "TEMPLATE-0");
    assert_eq!(read_cell(&template, "B3"), "");
}

#[tokio::test]
async fn test_save_advances_persisted_counter() {
    let dir = TempDir::new().unwrap();
    let (service, _) = create_service(&dir).await;

    assert_eq!(service.next_invoice_number().await.unwrap(), 100);
    service.save_invoice(sample_invoice()).await.unwrap();
    assert_eq!(service.next_invoice_number().await.unwrap(), 101);

    let reopened = JsonClientDirectory::open(dir.path().join("clients.json"), 1)
        .await
        .unwrap();
    assert_eq!(reopened.next_invoice_number().await.unwrap(), 101);
}

#[tokio::test]
async fn test_rejected_save_leaves_no_trace() {
    let dir = TempDir::new().unwrap();
    let (service, _) = create_service(&dir).await;

    let mut record = sample_invoice();
    record.insert("rate", "");

    let err = service.save_invoice(record).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MissingField);
    assert_eq!(err.to_string(), "Missing required fields: rate");

    assert!(!dir.path().join("generated").exists());
    assert!(!dir.path().join("clients.json").exists());
    assert_eq!(service.next_invoice_number().await.unwrap(), 100);
}

#[tokio::test]
async fn test_negative_amount_leaves_no_trace() {
    let dir = TempDir::new().unwrap();
    let (service, _) = create_service(&dir).await;

    let mut record = sample_invoice();
    record.insert("rate", "-10");

    let err = service.save_invoice(record).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::OutOfRange);
    assert_eq!(err.messages(), vec!["Rate must be >= 0"]);

    assert!(!dir.path().join("generated").exists());
    assert_eq!(service.next_invoice_number().await.unwrap(), 100);
}

#[tokio::test]
async fn test_consecutive_invoices_do_not_share_client_details() {
    let dir = TempDir::new().unwrap();
    let (service, _) = create_service(&dir).await;

    let mut first = sample_invoice();
    first.insert("client_trn", "TRN-ACME");
    let first = service.save_invoice(first).await.unwrap();

    let second: InvoiceRecord = [
        ("invoice_no", "INV/8"),
        ("client_name", "Globex"),
        ("date", "02/01/2024"),
        ("description", "Services"),
        ("quantity", "50"),
        ("rate", "20"),
        ("vat_rate", "GCC"),
    ]
    .into_iter()
    .collect();
    let second = service.save_invoice(second).await.unwrap();

    assert_eq!(read_cell(&first.output_path, "B4"), "Dubai");
    assert_eq!(read_cell(&first.output_path, "B5"), "TRN-ACME");
    assert_eq!(read_cell(&second.output_path, "B3"), "Globex");
    assert_eq!(read_cell(&second.output_path, "B4"), "");
    assert_eq!(read_cell(&second.output_path, "B5"), "");

    let initial = service.initial_data().await.unwrap();
    assert_eq!(initial.text("client_trn"), Some(""));
    assert_eq!(initial.text("invoice_no"), Some("TEMPLATE-0"));
}

#[tokio::test]
async fn test_failed_write_keeps_template_clean() {
    let dir = TempDir::new().unwrap();
    let schema = Arc::new(FieldSchema::default());
    let template = write_template(dir.path());
    let blocker = dir.path().join("blocker");
    std::fs::write(&blocker, "not a directory").unwrap();

    let templates = XlsxTemplateStore::new(&template, blocker.join("generated"), schema.clone());
    templates.load().await.unwrap();
    let clients = JsonClientDirectory::open(dir.path().join("clients.json"), 100)
        .await
        .unwrap();
    let service = InvoiceService::new(schema, Arc::new(templates), Arc::new(clients));

    let err = service.save_invoice(sample_invoice()).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::IoError);
    assert_eq!(service.next_invoice_number().await.unwrap(), 100);

    let initial = service.initial_data().await.unwrap();
    assert_eq!(initial.text("client_name"), Some(""));
    assert_eq!(initial.text("budget"), Some(""));

    std::fs::remove_file(&blocker).unwrap();
    let mut retry = sample_invoice();
    retry.remove("client_address");
    let saved = service.save_invoice(retry).await.unwrap();
    assert_eq!(read_cell(&saved.output_path, "B4"), "");
    assert_eq!(service.next_invoice_number().await.unwrap(), 101);
}

#[tokio::test]
async fn test_initial_data_reads_template() {
    let dir = TempDir::new().unwrap();
    let (service, _) = create_service(&dir).await;

    let initial = service.initial_data().await.unwrap();
    assert_eq!(initial.text("invoice_no"), Some("TEMPLATE-0"));
    assert_eq!(initial.len(), 12);
}

#[tokio::test]
async fn test_save_as_without_filename_uses_timestamp() {
    let dir = TempDir::new().unwrap();
    let schema = Arc::new(FieldSchema::default());
    let template = write_template(dir.path());
    let store = XlsxTemplateStore::new(&template, dir.path().join("out"), schema);
    store.load().await.unwrap();

    let path = store.save_as(None).await.unwrap();

    let name = path.file_name().unwrap().to_string_lossy().to_string();
    assert!(name.starts_with("Invoice_"));
    assert!(name.ends_with(".xlsx"));
    assert!(path.exists());
}
