//! Store error types.

use thiserror::Error;

/// Canonical error codes reported by the backing document store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// The service is temporarily unreachable.
    Unavailable,
    /// The request ran past its deadline.
    DeadlineExceeded,
    /// Quota or rate limit exhausted.
    ResourceExhausted,
    /// The operation was aborted by the backend (e.g. contention).
    Aborted,
    /// Backend-side internal failure.
    Internal,
    /// Missing or invalid credentials.
    Unauthenticated,
    /// The caller is not allowed to perform the operation.
    PermissionDenied,
    /// The request was malformed.
    InvalidArgument,
    /// The referenced document or collection does not exist.
    NotFound,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::Unavailable => "unavailable",
            ErrorCode::DeadlineExceeded => "deadline-exceeded",
            ErrorCode::ResourceExhausted => "resource-exhausted",
            ErrorCode::Aborted => "aborted",
            ErrorCode::Internal => "internal",
            ErrorCode::Unauthenticated => "unauthenticated",
            ErrorCode::PermissionDenied => "permission-denied",
            ErrorCode::InvalidArgument => "invalid-argument",
            ErrorCode::NotFound => "not-found",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "unavailable" => Some(ErrorCode::Unavailable),
            "deadline-exceeded" => Some(ErrorCode::DeadlineExceeded),
            "resource-exhausted" => Some(ErrorCode::ResourceExhausted),
            "aborted" => Some(ErrorCode::Aborted),
            "internal" => Some(ErrorCode::Internal),
            "unauthenticated" => Some(ErrorCode::Unauthenticated),
            "permission-denied" => Some(ErrorCode::PermissionDenied),
            "invalid-argument" => Some(ErrorCode::InvalidArgument),
            "not-found" => Some(ErrorCode::NotFound),
            _ => None,
        }
    }

    /// Whether a failure of this class is worth retrying.
    ///
    /// Transient infrastructure classes retry; authentication, permission,
    /// argument, and missing-resource classes never do.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            ErrorCode::Unavailable
                | ErrorCode::DeadlineExceeded
                | ErrorCode::ResourceExhausted
                | ErrorCode::Aborted
                | ErrorCode::Internal
        )
    }
}

/// Errors surfaced by the document store and object storage.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The backend rejected or failed the request.
    #[error("store error ({}): {message}", code.as_str())]
    Backend { code: ErrorCode, message: String },

    /// The backend has no server-side count aggregation.
    #[error("count aggregation is not supported by this backend")]
    AggregationUnsupported,

    /// A document could not be serialized or deserialized.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl StoreError {
    /// Create a backend error with an explicit code.
    pub fn backend(code: ErrorCode, message: impl Into<String>) -> Self {
        StoreError::Backend {
            code,
            message: message.into(),
        }
    }

    /// The backend error code, when one applies.
    pub fn code(&self) -> Option<ErrorCode> {
        match self {
            StoreError::Backend { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// Whether the error is a transient infrastructure failure.
    pub fn is_transient(&self) -> bool {
        self.code().map(|c| c.is_transient()).unwrap_or(false)
    }
}
