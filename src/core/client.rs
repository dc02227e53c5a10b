//! Client directory entries

use crate::core::error::ClientError;
use serde::{Deserialize, Serialize};

/// A client known to the directory, keyed by name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientEntry {
    pub name: String,
    #[serde(default)]
    pub address: String,
}

impl ClientEntry {
    /// Build an entry from user input, trimming both parts
    ///
    /// Fails when the trimmed name is empty.
    pub fn new(name: &str, address: &str) -> Result<Self, ClientError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ClientError::EmptyName);
        }

        Ok(Self {
            name: name.to_string(),
            address: address.trim().to_string(),
        })
    }
}

/// Check `entry` against the existing names; exact matches are duplicates
pub fn ensure_unique(existing: &[ClientEntry], entry: &ClientEntry) -> Result<(), ClientError> {
    if existing.iter().any(|c| c.name == entry.name) {
        return Err(ClientError::AlreadyExists {
            name: entry.name.clone(),
        });
    }
    Ok(())
}
