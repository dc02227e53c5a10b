//! In-memory template store and client directory for testing and development

use crate::core::client::{ClientEntry, ensure_unique};
use crate::core::error::{ClientError, StorageError};
use crate::core::field::FieldValue;
use crate::core::record::InvoiceRecord;
use crate::core::schema::FieldSchema;
use crate::core::store::{ClientDirectory, TemplateStore, default_output_filename};
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};

fn poisoned<E: std::fmt::Display>(e: E) -> StorageError {
    StorageError::LockPoisoned(e.to_string())
}

/// Map-backed template store
///
/// Starts with every schema field set to empty text (or the supplied
/// values). `save_as` records a snapshot of the pending copy instead of
/// writing a file; snapshots are available through [`InMemoryTemplateStore::saved`].
pub struct InMemoryTemplateStore {
    schema: Arc<FieldSchema>,
    output_dir: PathBuf,
    initial: InvoiceRecord,
    template: RwLock<InvoiceRecord>,
    pending: RwLock<Option<InvoiceRecord>>,
    saved: RwLock<Vec<(String, InvoiceRecord)>>,
}

impl InMemoryTemplateStore {
    pub fn new(schema: Arc<FieldSchema>) -> Self {
        let initial: InvoiceRecord = schema.ids().map(|id| (id, FieldValue::from(""))).collect();
        Self::with_values(schema, initial)
    }

    /// Store whose template holds `values`; schema fields not listed start empty
    pub fn with_values(schema: Arc<FieldSchema>, values: InvoiceRecord) -> Self {
        let mut initial: InvoiceRecord = schema.ids().map(|id| (id, FieldValue::from(""))).collect();
        for (id, value) in values.iter() {
            if schema.contains(id) {
                initial.insert(id, value.clone());
            }
        }

        Self {
            schema,
            output_dir: PathBuf::new(),
            template: RwLock::new(initial.clone()),
            initial,
            pending: RwLock::new(None),
            saved: RwLock::new(Vec::new()),
        }
    }

    /// Report saved paths under `dir`
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Snapshots recorded by `save_as`, as (filename, values) pairs
    pub fn saved(&self) -> Vec<(String, InvoiceRecord)> {
        self.saved.read().map(|s| s.clone()).unwrap_or_default()
    }

    fn take_pending(&self) -> Result<InvoiceRecord, StorageError> {
        match self.pending.write().map_err(poisoned)?.take() {
            Some(record) => Ok(record),
            None => Ok(self.template.read().map_err(poisoned)?.clone()),
        }
    }
}

#[async_trait]
impl TemplateStore for InMemoryTemplateStore {
    async fn load(&self) -> Result<(), StorageError> {
        *self.template.write().map_err(poisoned)? = self.initial.clone();
        *self.pending.write().map_err(poisoned)? = None;
        Ok(())
    }

    async fn get_all(&self) -> Result<InvoiceRecord, StorageError> {
        let template = self.template.read().map_err(poisoned)?;
        Ok(template.clone())
    }

    async fn apply_updates(&self, record: &InvoiceRecord) -> Result<usize, StorageError> {
        let mut pending = self.pending.write().map_err(poisoned)?;
        if pending.is_none() {
            *pending = Some(self.template.read().map_err(poisoned)?.clone());
        }
        let Some(values) = pending.as_mut() else {
            return Ok(0);
        };

        let mut written = 0;
        for (id, value) in record.iter() {
            if self.schema.get(id).is_some_and(|f| !f.read_only) {
                values.insert(id, value.clone());
                written += 1;
            }
        }
        Ok(written)
    }

    async fn save_as(&self, filename: Option<&str>) -> Result<PathBuf, StorageError> {
        let name = filename.map(str::to_string).unwrap_or_else(default_output_filename);
        let snapshot = self.take_pending()?;

        self.saved
            .write()
            .map_err(poisoned)?
            .push((name.clone(), snapshot));

        Ok(self.output_dir.join(name))
    }
}

/// Lock-guarded client directory held in memory
#[derive(Clone)]
pub struct InMemoryClientDirectory {
    state: Arc<RwLock<DirectoryState>>,
}

#[derive(Debug, Clone)]
struct DirectoryState {
    next_invoice_number: u64,
    clients: Vec<ClientEntry>,
}

impl InMemoryClientDirectory {
    /// Empty directory whose counter starts at `first_invoice_number`
    pub fn new(first_invoice_number: u64) -> Self {
        Self {
            state: Arc::new(RwLock::new(DirectoryState {
                next_invoice_number: first_invoice_number,
                clients: Vec::new(),
            })),
        }
    }
}

impl Default for InMemoryClientDirectory {
    fn default() -> Self {
        Self::new(1)
    }
}

#[async_trait]
impl ClientDirectory for InMemoryClientDirectory {
    async fn list_clients(&self) -> Result<Vec<ClientEntry>, ClientError> {
        let state = self.state.read().map_err(poisoned)?;
        Ok(state.clients.clone())
    }

    async fn add_client(&self, name: &str, address: &str) -> Result<ClientEntry, ClientError> {
        let entry = ClientEntry::new(name, address)?;
        let mut state = self.state.write().map_err(poisoned)?;

        ensure_unique(&state.clients, &entry)?;
        state.clients.push(entry.clone());
        Ok(entry)
    }

    async fn next_invoice_number(&self) -> Result<u64, ClientError> {
        let state = self.state.read().map_err(poisoned)?;
        Ok(state.next_invoice_number)
    }

    async fn increment_invoice_number(&self) -> Result<u64, ClientError> {
        let mut state = self.state.write().map_err(poisoned)?;
        state.next_invoice_number += 1;
        Ok(state.next_invoice_number)
    }
}
