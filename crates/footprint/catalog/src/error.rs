//! Catalog error types

use crate::schema::TableKind;
use thiserror::Error;

/// Catalog errors
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("{table} entry not found: {name}")]
    NotFound { table: TableKind, name: String },

    #[error("invalid {table} entry {name}: {reason}")]
    InvalidEntry {
        table: TableKind,
        name: String,
        reason: String,
    },

    #[error("failed to read catalog: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),
}

impl CatalogError {
    pub fn not_found(table: TableKind, name: impl Into<String>) -> Self {
        CatalogError::NotFound {
            table,
            name: name.into(),
        }
    }

    pub fn invalid(table: TableKind, name: impl Into<String>, reason: impl Into<String>) -> Self {
        CatalogError::InvalidEntry {
            table,
            name: name.into(),
            reason: reason.into(),
        }
    }
}

/// Result type for catalog operations
pub type Result<T> = std::result::Result<T, CatalogError>;
