//! Error types for wordtable.
//!
//! This module maps AWS SDK errors to the crate's [`Error`] enum.
//! Uses typed `SdkError` variant matching, no string parsing of debug output.

use aws_sdk_dynamodb::error::{ProvideErrorMetadata, SdkError};
use std::path::PathBuf;

/// Result alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{0}")]
    ResourceNotFound(String),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("the condition expression evaluated to false")]
    ConditionalCheckFailed,

    #[error("{0}")]
    Throughput(String),

    #[error("{0}")]
    AccessDenied(String),

    #[error("{0}")]
    Credentials(String),

    #[error("{0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("DynamoDB error: {0}")]
    Dynamo(String),

    #[error("cannot read '{}': {source}", path.display())]
    Input {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl Error {
    /// Whether the store rejected a write because its condition did not hold.
    pub fn is_conditional_check_failed(&self) -> bool {
        matches!(self, Error::ConditionalCheckFailed)
    }
}

// ========== TYPED ERROR MAPPING ==========

/// Map non-service `SdkError` variants (dispatch failures, timeouts, etc.).
///
/// Returns `Some(Error)` for non-service errors, `None` for `ServiceError`.
fn map_outer_sdk_error<E, R>(err: &SdkError<E, R>) -> Option<Error>
where
    E: std::fmt::Debug,
    R: std::fmt::Debug,
{
    match err {
        SdkError::DispatchFailure(dispatch) => {
            if dispatch.is_timeout() {
                Some(Error::Connection(
                    "Connection timed out to DynamoDB. Check your network or endpoint.".into(),
                ))
            } else if dispatch.is_io() {
                Some(Error::Connection(
                    "Connection failed to DynamoDB (I/O error). Check if the endpoint is reachable."
                        .into(),
                ))
            } else {
                Some(Error::Connection(
                    "Connection failed to DynamoDB. Check if the endpoint is reachable.".into(),
                ))
            }
        }
        SdkError::TimeoutError(_) => Some(Error::Connection(
            "Connection timed out to DynamoDB. Check your network or endpoint.".into(),
        )),
        SdkError::ConstructionFailure(err) => {
            let msg = format!("{:?}", err);
            if msg.contains("credentials")
                || msg.contains("Credentials")
                || msg.contains("NoCredentialsError")
            {
                Some(Error::Credentials(
                    "No AWS credentials found. Configure credentials via environment variables \
                    (AWS_ACCESS_KEY_ID, AWS_SECRET_ACCESS_KEY), AWS profile, or IAM role."
                        .into(),
                ))
            } else {
                Some(Error::Dynamo(format!("Failed to build request: {}", msg)))
            }
        }
        SdkError::ResponseError(err) => Some(Error::Dynamo(format!(
            "Invalid response from DynamoDB: {:?}",
            err
        ))),
        SdkError::ServiceError(_) => None,
        _ => Some(Error::Dynamo(format!(
            "Unknown error from DynamoDB: {:?}",
            err
        ))),
    }
}

/// Map a DynamoDB service error code + message to an [`Error`].
fn map_dynamodb_code(
    code: Option<&str>,
    message: Option<&str>,
    display: &str,
    table: Option<&str>,
) -> Error {
    match code {
        Some("UnrecognizedClientException") => {
            Error::Credentials("Invalid AWS credentials. Check your access key and secret.".into())
        }
        Some("ExpiredTokenException") => Error::Credentials(
            "AWS credentials have expired. Refresh your session token.".into(),
        ),
        Some("AccessDeniedException") => Error::AccessDenied(format!(
            "Access denied to DynamoDB: {}",
            message.unwrap_or("Check your IAM permissions.")
        )),
        Some("ProvisionedThroughputExceededException")
        | Some("LimitExceededException")
        | Some("RequestLimitExceeded")
        | Some("ThrottlingException") => Error::Throughput(
            "DynamoDB request rate too high. Try again with exponential backoff.".into(),
        ),
        Some("ResourceNotFoundException") => {
            let msg = if let Some(t) = table {
                format!("Table '{}' not found", t)
            } else {
                "Resource not found".to_string()
            };
            Error::ResourceNotFound(msg)
        }
        Some("ValidationException") => Error::Validation(message.unwrap_or(display).to_string()),
        Some("ConditionalCheckFailedException") => Error::ConditionalCheckFailed,
        _ => Error::Dynamo(message.unwrap_or(display).to_string()),
    }
}

/// Map DynamoDB errors using typed `SdkError` variants.
///
/// For `ServiceError`, uses `ProvideErrorMetadata` to get the error code and message
/// instead of parsing debug strings.
pub fn map_sdk_error<E, R>(err: SdkError<E, R>, table: Option<&str>) -> Error
where
    E: ProvideErrorMetadata + std::fmt::Debug + std::fmt::Display,
    R: std::fmt::Debug,
{
    if let Some(mapped) = map_outer_sdk_error(&err) {
        return mapped;
    }

    if let Some(service_err) = err.as_service_error() {
        let code = service_err.code();
        let message = service_err.message();
        let display = service_err.to_string();
        return map_dynamodb_code(code, message, &display, table);
    }

    Error::Dynamo(format!("Unexpected DynamoDB error: {:?}", err))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resource_not_found_names_the_table() {
        let err = map_dynamodb_code(
            Some("ResourceNotFoundException"),
            None,
            "not found",
            Some("WordleWords"),
        );
        assert_eq!(err.to_string(), "Table 'WordleWords' not found");
    }

    #[test]
    fn conditional_check_is_recognised() {
        let err = map_dynamodb_code(Some("ConditionalCheckFailedException"), None, "", None);
        assert!(err.is_conditional_check_failed());
    }

    #[test]
    fn throttling_codes_collapse_to_throughput() {
        for code in ["ThrottlingException", "ProvisionedThroughputExceededException"] {
            let err = map_dynamodb_code(Some(code), None, "", None);
            assert!(matches!(err, Error::Throughput(_)), "{code}");
        }
    }

    #[test]
    fn unknown_code_keeps_service_message() {
        let err = map_dynamodb_code(Some("Weird"), Some("something odd"), "display", None);
        assert_eq!(err.to_string(), "DynamoDB error: something odd");

        let err = map_dynamodb_code(None, None, "display text", None);
        assert_eq!(err.to_string(), "DynamoDB error: display text");
    }
}
