//! Engine error types

use footprint_catalog::CatalogError;
use footprint_types::{Category, ComponentId, ScenarioId};
use thiserror::Error;

/// Errors raised while building, computing or modifying scenarios.
#[derive(Debug, Error)]
pub enum FootprintError {
    #[error("scenario not found: {0}")]
    ScenarioNotFound(ScenarioId),

    #[error("{category} component not found: {id}")]
    ComponentNotFound { category: Category, id: ComponentId },

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("missing parameters: {0}")]
    MissingParameters(String),

    #[error("not implemented: {0}")]
    Unimplemented(String),

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

impl FootprintError {
    /// True for every lookup miss: scenario id, component id or table key.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            FootprintError::ScenarioNotFound(_)
                | FootprintError::ComponentNotFound { .. }
                | FootprintError::Catalog(CatalogError::NotFound { .. })
        )
    }
}

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, FootprintError>;
