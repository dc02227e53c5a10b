//! Spreadsheet-backed template store
//!
//! The template workbook is read with `umya-spreadsheet` and kept as loaded.
//! Field values are read from the template's A1 cells and written to a
//! pending copy; saving writes that copy as a new workbook under the output
//! directory and leaves the template untouched, in memory and on disk.

use crate::core::error::StorageError;
use crate::core::field::{FieldDescriptor, FieldValue};
use crate::core::record::InvoiceRecord;
use crate::core::schema::{FieldSchema, INVOICE_SHEET};
use crate::core::store::{TemplateStore, default_output_filename};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, RwLock};
use umya_spreadsheet::{Spreadsheet, Worksheet};

/// A loaded workbook and the sheet fields default to
#[derive(Clone)]
struct Workbook {
    book: Spreadsheet,
    sheet: usize,
}

impl Workbook {
    /// Sheet holding `field`: its configured sheet when present, else the default sheet
    fn sheet_for(&self, field: &FieldDescriptor) -> Option<&Worksheet> {
        self.book
            .get_sheet_by_name(&field.location.sheet)
            .or_else(|| self.book.get_sheet(&self.sheet))
    }

    fn sheet_for_mut(&mut self, field: &FieldDescriptor) -> Option<&mut Worksheet> {
        if self.book.get_sheet_by_name(&field.location.sheet).is_some() {
            self.book.get_sheet_by_name_mut(&field.location.sheet)
        } else {
            self.book.get_sheet_mut(&self.sheet)
        }
    }
}

/// Template store over an `.xlsx` workbook
pub struct XlsxTemplateStore {
    template_path: PathBuf,
    output_dir: PathBuf,
    sheet_name: String,
    schema: Arc<FieldSchema>,
    template: RwLock<Option<Workbook>>,
    pending: Mutex<Option<Workbook>>,
}

impl XlsxTemplateStore {
    pub fn new(
        template_path: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
        schema: Arc<FieldSchema>,
    ) -> Self {
        Self {
            template_path: template_path.into(),
            output_dir: output_dir.into(),
            sheet_name: INVOICE_SHEET.to_string(),
            schema,
            template: RwLock::new(None),
            pending: Mutex::new(None),
        }
    }

    /// Prefer `name` over the standard sheet when selecting the working sheet
    pub fn with_sheet_name(mut self, name: impl Into<String>) -> Self {
        self.sheet_name = name.into();
        self
    }

    pub fn template_path(&self) -> &Path {
        &self.template_path
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Clone of the loaded template, failing if it was never loaded
    fn snapshot(&self) -> Result<Workbook, StorageError> {
        self.template
            .read()
            .map_err(|e| StorageError::LockPoisoned(e.to_string()))?
            .clone()
            .ok_or(StorageError::TemplateNotLoaded)
    }

    /// Remove and return the pending copy, or a fresh template copy if none
    fn take_pending(&self) -> Result<Workbook, StorageError> {
        let pending = self
            .pending
            .lock()
            .map_err(|e| StorageError::LockPoisoned(e.to_string()))?
            .take();

        match pending {
            Some(workbook) => Ok(workbook),
            None => self.snapshot(),
        }
    }
}

fn read_template(path: &Path, sheet_name: &str) -> Result<Workbook, StorageError> {
    if !path.exists() {
        return Err(StorageError::TemplateNotFound {
            path: path.to_path_buf(),
        });
    }

    let book = umya_spreadsheet::reader::xlsx::read(path).map_err(|e| {
        StorageError::TemplateUnreadable {
            path: path.to_path_buf(),
            message: e.to_string(),
        }
    })?;

    let sheets = book.get_sheet_collection();
    if sheets.is_empty() {
        return Err(StorageError::NoWorksheet {
            path: path.to_path_buf(),
        });
    }
    let sheet = sheets
        .iter()
        .position(|ws| ws.get_name() == sheet_name)
        .unwrap_or(0);

    Ok(Workbook { book, sheet })
}

/// Write `value` into `cell`; numbers stay numeric, null clears the cell text
fn write_cell(sheet: &mut Worksheet, cell: &str, value: &FieldValue) {
    let target = sheet.get_cell_mut(cell);
    match value {
        FieldValue::Number(n) => {
            target.set_value_number(*n);
        }
        FieldValue::Text(s) => {
            target.set_value(s.as_str());
        }
        FieldValue::Null => {
            target.set_value("");
        }
    }
}

#[async_trait]
impl TemplateStore for XlsxTemplateStore {
    async fn load(&self) -> Result<(), StorageError> {
        let path = self.template_path.clone();
        let sheet_name = self.sheet_name.clone();

        let loaded = tokio::task::spawn_blocking(move || read_template(&path, &sheet_name))
            .await
            .map_err(|e| StorageError::TemplateUnreadable {
                path: self.template_path.clone(),
                message: e.to_string(),
            })??;

        let sheet = loaded
            .book
            .get_sheet(&loaded.sheet)
            .map(|ws| ws.get_name().to_string())
            .unwrap_or_default();

        *self
            .template
            .write()
            .map_err(|e| StorageError::LockPoisoned(e.to_string()))? = Some(loaded);
        *self
            .pending
            .lock()
            .map_err(|e| StorageError::LockPoisoned(e.to_string()))? = None;

        tracing::info!(path = %self.template_path.display(), %sheet, "template loaded");
        Ok(())
    }

    async fn get_all(&self) -> Result<InvoiceRecord, StorageError> {
        let guard = self
            .template
            .read()
            .map_err(|e| StorageError::LockPoisoned(e.to_string()))?;
        let workbook = guard.as_ref().ok_or(StorageError::TemplateNotLoaded)?;

        Ok(self
            .schema
            .iter()
            .map(|field| {
                let value = match workbook.sheet_for(field) {
                    Some(sheet) => sheet.get_value(field.location.cell.as_str()),
                    None => {
                        tracing::warn!(field = %field.id, cell = %field.location, "cell not readable");
                        String::new()
                    }
                };
                (field.id.as_str(), FieldValue::Text(value))
            })
            .collect())
    }

    async fn apply_updates(&self, record: &InvoiceRecord) -> Result<usize, StorageError> {
        let mut pending = self
            .pending
            .lock()
            .map_err(|e| StorageError::LockPoisoned(e.to_string()))?;
        if pending.is_none() {
            *pending = Some(self.snapshot()?);
        }
        let workbook = pending.as_mut().ok_or(StorageError::TemplateNotLoaded)?;

        let mut written = 0;
        for (id, value) in record.iter() {
            let Some(field) = self.schema.get(id).filter(|f| !f.read_only) else {
                continue;
            };
            if let Some(sheet) = workbook.sheet_for_mut(field) {
                write_cell(sheet, &field.location.cell, value);
                written += 1;
            }
        }
        Ok(written)
    }

    async fn save_as(&self, filename: Option<&str>) -> Result<PathBuf, StorageError> {
        let workbook = self.take_pending()?;

        tokio::fs::create_dir_all(&self.output_dir).await.map_err(|e| {
            StorageError::io(
                format!("Error creating output directory '{}'", self.output_dir.display()),
                e,
            )
        })?;

        let name = filename.map(str::to_string).unwrap_or_else(default_output_filename);
        let path = self.output_dir.join(name);

        let target = path.clone();
        tokio::task::spawn_blocking(move || {
            umya_spreadsheet::writer::xlsx::write(&workbook.book, &target).map_err(|e| {
                StorageError::WriteFailed {
                    path: target.clone(),
                    message: e.to_string(),
                }
            })
        })
        .await
        .map_err(|e| StorageError::WriteFailed {
            path: path.clone(),
            message: e.to_string(),
        })??;

        Ok(path)
    }
}
