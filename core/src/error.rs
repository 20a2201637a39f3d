use crate::types::ComplaintStatus;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DeskError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid timestamp '{value}': {source}")]
    Timestamp {
        value: String,
        source: chrono::ParseError,
    },

    #[error("Missing or invalid field '{field}': {reason}")]
    Validation { field: &'static str, reason: String },

    #[error("Unknown {kind} '{value}'")]
    InvalidEnum { kind: &'static str, value: String },

    #[error("Invalid status transition for {complaint_id}: {from} -> {to}")]
    InvalidTransition {
        complaint_id: String,
        from: ComplaintStatus,
        to: ComplaintStatus,
    },

    #[error("Complaint '{id}' not found")]
    ComplaintNotFound { id: String },

    #[error("Could not allocate a unique tracking code after {attempts} attempts")]
    TrackingCodeExhausted { attempts: u32 },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type DeskResult<T> = Result<T, DeskError>;
