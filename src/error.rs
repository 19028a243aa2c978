use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    /// A table or column id that does not resolve in the store.
    #[error("Invalid reference: column {column} of table {table} does not exist")]
    InvalidReference { table: String, column: String },
    #[error("Invalid JSON payload: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Unknown relationship type: {0}")]
    UnknownRelationshipType(String),
}
