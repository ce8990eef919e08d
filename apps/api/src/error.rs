//! Error handling for the Feedgraph API
//!
//! This module provides a unified error type using thiserror, with an HTTP
//! status classification and conversion into GraphQL field errors.

use std::sync::Arc;

use async_graphql::ErrorExtensions;
use axum::http::StatusCode;
use thiserror::Error;

use crate::store::StoreError;

/// Main API error type
#[derive(Error, Debug)]
pub enum ApiError {
    // ========== Resource Errors ==========
    /// Requested resource not found
    #[error("{resource_type} not found: {id}")]
    NotFound {
        resource_type: &'static str,
        id: String,
    },

    /// Resource already exists (conflict)
    #[error("{resource_type} already exists: {id}")]
    Conflict {
        resource_type: &'static str,
        id: String,
    },

    // ========== Validation Errors ==========
    /// Request validation failed
    #[error("validation error: {0}")]
    ValidationError(String),

    // ========== Store Errors ==========
    /// Store read or write failed
    #[error("store error: {0}")]
    Store(Arc<StoreError>),
}

impl ApiError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Conflict { .. } => StatusCode::CONFLICT,
            Self::ValidationError(_) => StatusCode::BAD_REQUEST,
            Self::Store(err) if matches!(err.as_ref(), StoreError::Unavailable(_)) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            Self::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code string for client-side handling
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "NOT_FOUND",
            Self::Conflict { .. } => "CONFLICT",
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::Store(err) if matches!(err.as_ref(), StoreError::Unavailable(_)) => {
                "STORE_UNAVAILABLE"
            }
            Self::Store(_) => "STORE_ERROR",
        }
    }

    /// Create a not found error for a specific resource
    pub fn not_found(resource_type: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            resource_type,
            id: id.to_string(),
        }
    }

    /// Log the error with appropriate severity based on status code
    pub fn log(&self) {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(
                error = %self,
                code = self.error_code(),
                status = status.as_u16(),
                "Server error occurred"
            );
        } else {
            tracing::debug!(
                error = %self,
                code = self.error_code(),
                status = status.as_u16(),
                "Client error"
            );
        }
    }

    /// Convert into a GraphQL field error.
    ///
    /// Client errors keep their message. Server errors are logged and
    /// replaced with a generic message. Both carry a `code` extension.
    pub fn into_graphql(self) -> async_graphql::Error {
        self.log();
        let code = self.error_code();
        let message = if self.status_code().is_server_error() {
            "An unexpected error occurred".to_string()
        } else {
            self.to_string()
        };
        async_graphql::Error::new(message).extend_with(|_, e| e.set("code", code))
    }
}

// ========== Conversion Implementations ==========

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { entity, id } => Self::NotFound {
                resource_type: entity,
                id,
            },
            StoreError::DuplicateEdge {
                subscriber_id,
                author_id,
            } => Self::Conflict {
                resource_type: "subscription",
                id: format!("{}->{}", subscriber_id, author_id),
            },
            StoreError::UniqueViolation(constraint) => Self::Conflict {
                resource_type: "record",
                id: constraint,
            },
            StoreError::ForeignKeyViolation(constraint) => Self::ValidationError(format!(
                "referenced record does not exist ({})",
                constraint
            )),
            other => Self::Store(Arc::new(other)),
        }
    }
}

impl From<Arc<StoreError>> for ApiError {
    fn from(err: Arc<StoreError>) -> Self {
        match Arc::try_unwrap(err) {
            Ok(err) => err.into(),
            Err(shared) => Self::Store(shared),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ApiError::not_found("user", "123").status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::ValidationError("test".to_string()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(StoreError::Unavailable("down".to_string())).status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn test_store_error_mapping() {
        let duplicate = StoreError::DuplicateEdge {
            subscriber_id: Uuid::nil(),
            author_id: Uuid::nil(),
        };
        assert_eq!(ApiError::from(duplicate).error_code(), "CONFLICT");

        let missing = StoreError::not_found("post", "abc");
        assert_eq!(ApiError::from(missing).to_string(), "post not found: abc");

        let fk = StoreError::ForeignKeyViolation("posts_author_id_fkey".to_string());
        assert_eq!(ApiError::from(fk).error_code(), "VALIDATION_ERROR");
    }

    #[test]
    fn test_shared_store_error_keeps_kind() {
        let shared = Arc::new(StoreError::Unavailable("down".to_string()));
        let _other_holder = Arc::clone(&shared);

        let err = ApiError::from(shared);

        assert_eq!(err.error_code(), "STORE_UNAVAILABLE");
    }

    #[test]
    fn test_graphql_error_hides_server_details() {
        let err = ApiError::from(StoreError::Unavailable("secret".to_string())).into_graphql();
        assert_eq!(err.message, "An unexpected error occurred");

        let err = ApiError::not_found("user", "42").into_graphql();
        assert_eq!(err.message, "user not found: 42");
    }
}
