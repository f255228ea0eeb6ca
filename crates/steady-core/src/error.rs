use crate::view::ElementId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SteadyError {
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV Parsing Error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON Parsing Error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration Error: {0}")]
    Config(String),

    #[error("Data Validation Error: {0}")]
    Validation(String),
}

pub type SaResult<T> = Result<T, SteadyError>;

/// Failures reported by a page view. Callers treat these as silent no-ops.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ViewError {
    #[error("element {0} is no longer attached to the document")]
    Detached(ElementId),

    #[error("element {0} is unknown to this page")]
    Unknown(ElementId),
}

/// Failures of the messaging/storage host.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BridgeError {
    #[error("bridge unavailable (host context torn down)")]
    Unavailable,

    #[error("bridge rejected the request: {0}")]
    Rejected(String),
}
