use thiserror::Error;

#[derive(Error, Debug)]
pub enum WidgetError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Storage unavailable for key '{key}'")]
    StorageUnavailable { key: String },

    #[error("Analytics reporter '{reporter}' unavailable")]
    ReporterUnavailable { reporter: String },

    #[error("Duplicate product id '{id}' in catalog")]
    DuplicateProduct { id: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type WidgetResult<T> = Result<T, WidgetError>;
