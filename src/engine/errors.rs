use crate::engine::Operation;
use crate::models::TransactionError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("An id is required for [{operation:?}]")]
    MissingId {
        operation: Operation
    },
    #[error("[{}]:[{}] {}", .0.status_code(), .0.error_type(), .0)]
    Rejected(#[from] TransactionError)
}
