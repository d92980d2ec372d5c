use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Error response type
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

/// Response type for health check endpoint
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct HealthResponse {
    pub status: String,
}

/// Response type for unhealthy status
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct UnhealthyResponse {
    pub status: String,
    pub error: String,
}

/// The product operation a fault occurred in, as named in 500 responses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Put,
    Post,
    GetAll,
    GetById,
    Delete,
}

impl Operation {
    pub fn as_str(self) -> &'static str {
        match self {
            Operation::Put => "Put",
            Operation::Post => "Post",
            Operation::GetAll => "GetAll",
            Operation::GetById => "GetById",
            Operation::Delete => "Delete",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error type shared by the product handlers
///
/// Every handler converts its faults into one of these at its own boundary;
/// the dispatcher turns them into a JSON `ErrorResponse` with a status code.
#[derive(Debug)]
pub enum ApiError {
    /// Body id conflicts with the path id on PUT
    IdMismatch,
    /// No record under the requested id
    NotFound(String),
    /// Store failure, body decode failure, or the injected test fault
    Internal {
        operation: Operation,
        source: anyhow::Error,
    },
    /// Method and path combination no handler accepts
    UnsupportedRoute,
}

impl ApiError {
    pub fn internal(operation: Operation, source: impl Into<anyhow::Error>) -> Self {
        ApiError::Internal {
            operation,
            source: source.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::IdMismatch => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal { .. } | ApiError::UnsupportedRoute => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn message(&self) -> String {
        match self {
            ApiError::IdMismatch => {
                "Product ID in the body does not match path parameter".to_string()
            }
            ApiError::NotFound(message) => message.clone(),
            ApiError::Internal { operation, source } => {
                format!("Internal Server Error for {} :: {:#}", operation, source)
            }
            ApiError::UnsupportedRoute => "some error happened".to_string(),
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}
