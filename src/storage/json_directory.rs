//! Client directory persisted as a JSON file
//!
//! File layout:
//!
//! ```json
//! {
//!   "next_invoice_number": 12,
//!   "clients": [{ "name": "Acme", "address": "Dubai" }]
//! }
//! ```

use crate::core::client::{ClientEntry, ensure_unique};
use crate::core::error::{ClientError, StorageError};
use crate::core::store::ClientDirectory;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct DirectoryFile {
    next_invoice_number: u64,
    #[serde(default)]
    clients: Vec<ClientEntry>,
}

/// Client directory backed by a JSON file
///
/// The file is read once on open and rewritten after every mutation. The
/// async mutex keeps the in-memory state and the file in step.
pub struct JsonClientDirectory {
    path: PathBuf,
    state: Mutex<DirectoryFile>,
}

impl JsonClientDirectory {
    /// Open the directory at `path`
    ///
    /// A missing file yields an empty directory whose counter starts at
    /// `first_invoice_number`; the file is created on the first mutation.
    pub async fn open(
        path: impl Into<PathBuf>,
        first_invoice_number: u64,
    ) -> Result<Self, StorageError> {
        let path = path.into();

        let state: DirectoryFile = match tokio::fs::read_to_string(&path).await {
            Ok(content) => serde_json::from_str(&content).map_err(|e| StorageError::Corrupt {
                path: path.clone(),
                message: e.to_string(),
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => DirectoryFile {
                next_invoice_number: first_invoice_number,
                clients: Vec::new(),
            },
            Err(e) => {
                return Err(StorageError::io(
                    format!("Error reading client directory '{}'", path.display()),
                    e,
                ));
            }
        };

        tracing::debug!(
            path = %path.display(),
            clients = state.clients.len(),
            next_invoice_number = state.next_invoice_number,
            "client directory opened"
        );

        Ok(Self {
            path,
            state: Mutex::new(state),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn persist(&self, state: &DirectoryFile) -> Result<(), StorageError> {
        let content = serde_json::to_string_pretty(state).map_err(|e| StorageError::Corrupt {
            path: self.path.clone(),
            message: e.to_string(),
        })?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                StorageError::io(format!("Error creating '{}'", parent.display()), e)
            })?;
        }

        tokio::fs::write(&self.path, content).await.map_err(|e| {
            StorageError::io(
                format!("Error writing client directory '{}'", self.path.display()),
                e,
            )
        })
    }
}

#[async_trait]
impl ClientDirectory for JsonClientDirectory {
    async fn list_clients(&self) -> Result<Vec<ClientEntry>, ClientError> {
        Ok(self.state.lock().await.clients.clone())
    }

    async fn add_client(&self, name: &str, address: &str) -> Result<ClientEntry, ClientError> {
        let entry = ClientEntry::new(name, address)?;
        let mut state = self.state.lock().await;
        ensure_unique(&state.clients, &entry)?;

        let mut updated = state.clone();
        updated.clients.push(entry.clone());
        self.persist(&updated).await?;
        *state = updated;

        Ok(entry)
    }

    async fn next_invoice_number(&self) -> Result<u64, ClientError> {
        Ok(self.state.lock().await.next_invoice_number)
    }

    async fn increment_invoice_number(&self) -> Result<u64, ClientError> {
        let mut state = self.state.lock().await;

        let mut updated = state.clone();
        updated.next_invoice_number += 1;
        self.persist(&updated).await?;
        *state = updated;

        Ok(state.next_invoice_number)
    }
}
