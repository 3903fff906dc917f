use aws_sdk_dynamodb::error::SdkError;
use aws_sdk_dynamodb::operation::get_item::GetItemError;
use aws_sdk_dynamodb::operation::scan::ScanError;
use aws_sdk_dynamodb::operation::transact_write_items::TransactWriteItemsError;
use aws_sdk_dynamodb::types::CancellationReason;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ServiceError>;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Internal server error: {0}")]
    InternalError(String),
}

// Helper function to map general DynamoDB errors
pub fn map_dynamo_error<E>(operation: &str, err: SdkError<E>) -> ServiceError {
    ServiceError::InternalError(format!("DynamoDB {} error: {}", operation, err))
}

// Helper function to map GetItem errors
pub fn map_get_dynamo_error(err: SdkError<GetItemError>) -> ServiceError {
    map_dynamo_error("get_item", err)
}

// Helper function to map Scan errors
pub fn map_scan_dynamo_error(err: SdkError<ScanError>) -> ServiceError {
    map_dynamo_error("scan", err)
}

/// Positions of the transaction items whose condition check failed.
///
/// DynamoDB reports one cancellation reason per item, in request order.
pub fn failed_condition_indexes(reasons: &[CancellationReason]) -> Vec<usize> {
    reasons
        .iter()
        .enumerate()
        .filter(|(_, reason)| reason.code() == Some("ConditionalCheckFailed"))
        .map(|(index, _)| index)
        .collect()
}

/// True when DynamoDB cancelled the transaction because another one was in flight
pub fn has_transaction_conflict(reasons: &[CancellationReason]) -> bool {
    reasons
        .iter()
        .any(|reason| reason.code() == Some("TransactionConflict"))
}

/// Per-item cancellation reasons of a cancelled transaction; empty for any other error
pub fn cancellation_reasons(err: &SdkError<TransactWriteItemsError>) -> &[CancellationReason] {
    match err {
        SdkError::ServiceError(service_err) => match service_err.err() {
            TransactWriteItemsError::TransactionCanceledException(cancelled) => {
                cancelled.cancellation_reasons()
            }
            _ => &[],
        },
        _ => &[],
    }
}

impl From<aws_sdk_dynamodb::error::BuildError> for ServiceError {
    fn from(err: aws_sdk_dynamodb::error::BuildError) -> Self {
        ServiceError::InternalError(format!("DynamoDB request build error: {}", err))
    }
}

impl From<serde_dynamo::Error> for ServiceError {
    fn from(err: serde_dynamo::Error) -> Self {
        ServiceError::InternalError(format!("DynamoDB serialization error: {}", err))
    }
}

impl From<serde_json::Error> for ServiceError {
    fn from(err: serde_json::Error) -> Self {
        ServiceError::InternalError(format!("JSON serialization error: {}", err))
    }
}
