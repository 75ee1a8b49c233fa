use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::fmt;
use utoipa::ToSchema;

/// A single failed constraint on a procedure input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct FieldIssue {
    /// Name of the offending field, `input` for the payload itself.
    #[schema(example = "email")]
    pub field: String,
    /// Human-readable reason.
    #[schema(example = "must be a valid email address")]
    pub message: String,
}

impl FieldIssue {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Application-specific error types.
#[derive(Debug)]
pub enum AppError {
    /// Input failed one or more declared constraints.
    Validation(Vec<FieldIssue>),
    /// Resource not found error.
    NotFound(String),
    /// A foreign reference names a record that does not exist.
    Referential(String),
    /// Database-related errors.
    DatabaseError(sqlx::Error),
    /// Bad request error (malformed transport payload).
    BadRequest(String),
    /// A query was invoked as a mutation or vice versa.
    MethodNotAllowed(String),
    /// Internal server error.
    InternalError(String),
    /// Error with context chain for better debugging.
    WithContext {
        /// The underlying source of the error.
        source: Box<AppError>,
        /// Additional context message.
        context: String,
    },
}

impl AppError {
    /// Shorthand for a validation failure on a single field.
    pub fn invalid_field(field: impl Into<String>, message: impl Into<String>) -> Self {
        AppError::Validation(vec![FieldIssue::new(field, message)])
    }

    /// The error with any context wrappers peeled off.
    pub fn root(&self) -> &AppError {
        match self {
            AppError::WithContext { source, .. } => source.root(),
            other => other,
        }
    }

    /// Field issues carried by a validation failure, empty otherwise.
    pub fn issues(&self) -> &[FieldIssue] {
        match self.root() {
            AppError::Validation(issues) => issues,
            _ => &[],
        }
    }

    /// Machine-readable error code sent over the wire.
    pub fn code(&self) -> &'static str {
        match self.root() {
            AppError::Validation(_) | AppError::BadRequest(_) => "BAD_REQUEST",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Referential(_) => "CONFLICT",
            AppError::MethodNotAllowed(_) => "METHOD_NOT_SUPPORTED",
            AppError::DatabaseError(_) | AppError::InternalError(_) => "INTERNAL_SERVER_ERROR",
            AppError::WithContext { .. } => unreachable!("root() never returns a context wrapper"),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self.root() {
            AppError::Validation(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Referential(_) => StatusCode::CONFLICT,
            AppError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            AppError::DatabaseError(_) | AppError::InternalError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::WithContext { .. } => unreachable!("root() never returns a context wrapper"),
        }
    }
}

impl fmt::Display for AppError {
    /// Formats the error for display.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Validation(issues) => {
                write!(f, "Validation failed: ")?;
                for (i, issue) in issues.iter().enumerate() {
                    if i > 0 {
                        write!(f, "; ")?;
                    }
                    write!(f, "{}", issue)?;
                }
                Ok(())
            }
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::Referential(msg) => write!(f, "Referential integrity: {}", msg),
            AppError::DatabaseError(e) => write!(f, "Database error: {}", e),
            AppError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            AppError::MethodNotAllowed(msg) => write!(f, "Method not allowed: {}", msg),
            AppError::InternalError(msg) => write!(f, "Internal error: {}", msg),
            AppError::WithContext { source, context } => {
                write!(f, "{}: {}", context, source)
            }
        }
    }
}

impl std::error::Error for AppError {}

/// Wire shape of a failed procedure call.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorDetail {
    #[schema(value_type = String, example = "BAD_REQUEST")]
    pub code: &'static str,
    pub message: String,
    /// Present on validation failures only.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub issues: Vec<FieldIssue>,
}

impl IntoResponse for AppError {
    /// Converts the error into an HTTP response.
    ///
    /// Server-side failures are logged with full detail and reported to the
    /// caller with a generic message.
    fn into_response(self) -> Response {
        let status = self.status();
        let code = self.code();

        let message = match self.root() {
            AppError::DatabaseError(_) => {
                tracing::error!("Database error: {}", self);
                "Database error".to_string()
            }
            AppError::InternalError(_) => {
                tracing::error!("Internal error: {}", self);
                "Internal server error".to_string()
            }
            AppError::Validation(issues) => {
                tracing::debug!("Rejected input with {} issue(s)", issues.len());
                "Input validation failed".to_string()
            }
            AppError::NotFound(msg)
            | AppError::Referential(msg)
            | AppError::BadRequest(msg)
            | AppError::MethodNotAllowed(msg) => msg.clone(),
            AppError::WithContext { .. } => unreachable!("root() never returns a context wrapper"),
        };

        let body = Json(ErrorBody {
            error: ErrorDetail {
                code,
                message,
                issues: self.issues().to_vec(),
            },
        });

        (status, body).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    /// Converts a `sqlx::Error` into an `AppError`.
    fn from(err: sqlx::Error) -> Self {
        AppError::DatabaseError(err)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::InternalError(format!("serialization failed: {}", err))
    }
}

/// Extension trait for adding context to errors.
/// Similar to `anyhow::Context` but for our `AppError` type.
pub trait ResultExt<T> {
    /// Add context to an error.
    fn context(self, context: impl Into<String>) -> Result<T, AppError>;

    /// Add context lazily (only evaluated on error).
    fn with_context<F>(self, f: F) -> Result<T, AppError>
    where
        F: FnOnce() -> String;
}

impl<T> ResultExt<T> for Result<T, AppError> {
    fn context(self, context: impl Into<String>) -> Result<T, AppError> {
        self.map_err(|e| AppError::WithContext {
            source: Box::new(e),
            context: context.into(),
        })
    }

    fn with_context<F>(self, f: F) -> Result<T, AppError>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| AppError::WithContext {
            source: Box::new(e),
            context: f(),
        })
    }
}

/// Extension for sqlx::Error to add context
impl<T> ResultExt<T> for Result<T, sqlx::Error> {
    fn context(self, context: impl Into<String>) -> Result<T, AppError> {
        self.map_err(|e| AppError::WithContext {
            source: Box::new(AppError::DatabaseError(e)),
            context: context.into(),
        })
    }

    fn with_context<F>(self, f: F) -> Result<T, AppError>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| AppError::WithContext {
            source: Box::new(AppError::DatabaseError(e)),
            context: f(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_keeps_root_classification() {
        let err: Result<(), AppError> = Err(AppError::NotFound("inquiry 9".to_string()));
        let err = err.context("updateInquiryStatus").unwrap_err();

        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.code(), "NOT_FOUND");
        assert_eq!(err.to_string(), "updateInquiryStatus: Not found: inquiry 9");
    }

    #[test]
    fn test_database_error_is_internal() {
        let err: Result<(), sqlx::Error> = Err(sqlx::Error::PoolTimedOut);
        let err = err.with_context(|| "listing plans".to_string()).unwrap_err();

        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.issues().is_empty());
    }

    #[test]
    fn test_validation_display_lists_fields() {
        let err = AppError::Validation(vec![
            FieldIssue::new("email", "must be a valid email address"),
            FieldIssue::new("first_name", "must not be empty"),
        ]);

        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            err.to_string(),
            "Validation failed: email: must be a valid email address; first_name: must not be empty"
        );
    }

    #[test]
    fn test_referential_maps_to_conflict() {
        let err = AppError::Referential("inquiry -1 does not exist".to_string());
        assert_eq!(err.status(), StatusCode::CONFLICT);
        assert_eq!(err.code(), "CONFLICT");
    }
}
