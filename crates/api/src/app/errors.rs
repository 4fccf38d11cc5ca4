//! Error type carried through handler chains and its JSON failure body.

use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use solestore_core::DomainError;

/// Extra detail from the persistence layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorMeta {
    /// Fields of a violated uniqueness constraint.
    #[serde(default)]
    pub target: Vec<String>,
}

/// Error raised by a handler step.
///
/// The status is optional; failures without one are reported as 500.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ApiError {
    status: Option<StatusCode>,
    message: String,
    meta: Option<ErrorMeta>,
}

impl ApiError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status: None,
            message: message.into(),
            meta: None,
        }
    }

    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_meta(mut self, meta: ErrorMeta) -> Self {
        self.meta = Some(meta);
        self
    }

    pub fn status(status: StatusCode, message: impl Into<String>) -> Self {
        Self::new(message).with_status(status)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::status(StatusCode::BAD_REQUEST, message)
    }

    pub fn malformed() -> Self {
        Self::bad_request("Malformed Request")
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::status(StatusCode::NOT_FOUND, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::status(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    /// Uniqueness violation on `target`, as the persistence layer reports it.
    pub fn unique_violation<I, T>(target: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self::new("Unique constraint failed").with_meta(ErrorMeta {
            target: target.into_iter().map(Into::into).collect(),
        })
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn meta(&self) -> Option<&ErrorMeta> {
        self.meta.as_ref()
    }

    /// Status and message as they go on the wire.
    ///
    /// A non-empty conflict target wins over any carried status (409).
    /// Missing status means 500; an empty message becomes "Internal Server Error".
    pub fn resolve(&self) -> (StatusCode, String) {
        if let Some(meta) = self.meta.as_ref().filter(|m| !m.target.is_empty()) {
            return (
                StatusCode::CONFLICT,
                format!("{} already exists in database", meta.target.join(",")),
            );
        }

        let status = self.status.unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let message = if self.message.is_empty() {
            "Internal Server Error".to_string()
        } else {
            self.message.clone()
        };
        (status, message)
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(msg) => ApiError::bad_request(msg),
            DomainError::InvariantViolation(msg) => {
                ApiError::status(StatusCode::UNPROCESSABLE_ENTITY, msg)
            }
            DomainError::InvalidId(msg) => ApiError::bad_request(msg),
            DomainError::NotFound(what) => ApiError::not_found(format!("Cannot find {what}")),
            DomainError::Conflict { target } => ApiError::unique_violation(target),
            DomainError::Unauthorized => {
                ApiError::status(StatusCode::UNAUTHORIZED, "Unauthorized Request")
            }
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(_: serde_json::Error) -> Self {
        ApiError::malformed()
    }
}

/// Body of every failure response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureBody {
    pub success: bool,
    pub error: bool,
    pub message: String,
}

impl FailureBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: true,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_status_is_internal() {
        let (status, message) = ApiError::new("boom").resolve();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(message, "boom");
    }

    #[test]
    fn empty_message_gets_generic_text() {
        let (_, message) = ApiError::new("").resolve();
        assert_eq!(message, "Internal Server Error");
    }

    #[test]
    fn conflict_target_overrides_status() {
        let err = ApiError::bad_request("dup").with_meta(ErrorMeta {
            target: vec!["email".into()],
        });
        let (status, message) = err.resolve();
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(message, "email already exists in database");
    }

    #[test]
    fn empty_target_is_not_a_conflict() {
        let err = ApiError::not_found("gone").with_meta(ErrorMeta::default());
        assert_eq!(err.resolve().0, StatusCode::NOT_FOUND);
    }

    #[test]
    fn domain_errors_map_to_statuses() {
        let cases = [
            (DomainError::validation("x"), StatusCode::BAD_REQUEST),
            (DomainError::not_found("cart"), StatusCode::NOT_FOUND),
            (DomainError::conflict(["productId"]), StatusCode::CONFLICT),
            (DomainError::Unauthorized, StatusCode::UNAUTHORIZED),
            (DomainError::invariant("x"), StatusCode::UNPROCESSABLE_ENTITY),
        ];
        for (err, expected) in cases {
            assert_eq!(ApiError::from(err).resolve().0, expected);
        }
    }

    #[test]
    fn failure_body_shape() {
        let body = serde_json::to_value(FailureBody::new("nope")).unwrap();
        assert_eq!(
            body,
            serde_json::json!({"success": false, "error": true, "message": "nope"})
        );
    }
}
