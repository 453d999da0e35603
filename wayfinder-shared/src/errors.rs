use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::types::ApiErrorResponse;

/// Application error codes following the pattern E{area}{sequence}
///
/// Ranges:
/// - E0xxx: Shared/infrastructure errors
/// - E1xxx: Account errors
/// - E2xxx: Place errors
/// - E3xxx: Review errors
/// - E4xxx: Moderation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    // Shared (E0xxx)
    InternalError,
    ValidationError,
    NotFound,
    Unauthorized,
    Forbidden,
    RateLimited,
    ServiceUnavailable,
    BadRequest,

    // Accounts (E1xxx)
    InvalidCredentials,
    UsernameTaken,
    EmailAlreadyExists,
    AccountNotActivated,
    ActivationInvalid,
    TokenExpired,
    TokenInvalid,
    PasswordTooWeak,

    // Places (E2xxx)
    PlaceNotFound,
    GeocodeFailed,
    OpeningHoursNotApplicable,
    OpeningHoursLocked,

    // Reviews (E3xxx)
    ReviewNotFound,
    AlreadyReviewed,
    GuestReviewLimit,
    ReviewRestricted,
    DuplicateReview,
    CaptchaIncorrect,
    SecurityCheckRequired,

    // Moderation (E4xxx)
    ReportNotFound,
    CannotReportSelf,
    DuplicateReport,
    NotReported,
}

impl ErrorCode {
    pub fn code(&self) -> &'static str {
        match self {
            // Shared
            Self::InternalError => "E0001",
            Self::ValidationError => "E0002",
            Self::NotFound => "E0003",
            Self::Unauthorized => "E0004",
            Self::Forbidden => "E0005",
            Self::RateLimited => "E0006",
            Self::ServiceUnavailable => "E0007",
            Self::BadRequest => "E0008",

            // Accounts
            Self::InvalidCredentials => "E1001",
            Self::UsernameTaken => "E1002",
            Self::EmailAlreadyExists => "E1003",
            Self::AccountNotActivated => "E1004",
            Self::ActivationInvalid => "E1005",
            Self::TokenExpired => "E1006",
            Self::TokenInvalid => "E1007",
            Self::PasswordTooWeak => "E1008",

            // Places
            Self::PlaceNotFound => "E2001",
            Self::GeocodeFailed => "E2002",
            Self::OpeningHoursNotApplicable => "E2003",
            Self::OpeningHoursLocked => "E2004",

            // Reviews
            Self::ReviewNotFound => "E3001",
            Self::AlreadyReviewed => "E3002",
            Self::GuestReviewLimit => "E3003",
            Self::ReviewRestricted => "E3004",
            Self::DuplicateReview => "E3005",
            Self::CaptchaIncorrect => "E3006",
            Self::SecurityCheckRequired => "E3007",

            // Moderation
            Self::ReportNotFound => "E4001",
            Self::CannotReportSelf => "E4002",
            Self::DuplicateReport => "E4003",
            Self::NotReported => "E4004",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InternalError | Self::ServiceUnavailable => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ValidationError | Self::BadRequest | Self::PasswordTooWeak
            | Self::GeocodeFailed | Self::OpeningHoursNotApplicable => StatusCode::BAD_REQUEST,
            Self::NotFound | Self::PlaceNotFound | Self::ReviewNotFound
            | Self::ReportNotFound => StatusCode::NOT_FOUND,
            Self::Unauthorized | Self::InvalidCredentials | Self::AccountNotActivated
            | Self::ActivationInvalid | Self::TokenExpired | Self::TokenInvalid => StatusCode::UNAUTHORIZED,
            Self::Forbidden | Self::ReviewRestricted | Self::GuestReviewLimit
            | Self::CannotReportSelf | Self::OpeningHoursLocked => StatusCode::FORBIDDEN,
            Self::RateLimited | Self::SecurityCheckRequired => StatusCode::TOO_MANY_REQUESTS,
            Self::UsernameTaken | Self::EmailAlreadyExists | Self::AlreadyReviewed
            | Self::DuplicateReview | Self::DuplicateReport | Self::NotReported => StatusCode::CONFLICT,
            Self::CaptchaIncorrect => StatusCode::BAD_REQUEST,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{message}")]
    Known {
        code: ErrorCode,
        message: String,
        details: Option<serde_json::Value>,
    },

    #[error("internal server error")]
    Internal(#[from] anyhow::Error),

    #[error("database error: {0}")]
    Database(#[from] diesel::result::Error),

    #[error("validation error: {0}")]
    Validation(String),
}

impl AppError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::Known {
            code,
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(code: ErrorCode, message: impl Into<String>, details: serde_json::Value) -> Self {
        Self::Known {
            code,
            message: message.into(),
            details: Some(details),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Unauthorized, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::BadRequest, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Forbidden, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    /// True when the underlying database error is a unique-constraint violation.
    ///
    /// Concurrent duplicate submissions are serialized by unique indexes, so
    /// handlers use this to convert the race into the same user-facing
    /// message as the pre-check path.
    pub fn is_unique_violation(&self) -> bool {
        matches!(
            self,
            AppError::Database(diesel::result::Error::DatabaseError(
                diesel::result::DatabaseErrorKind::UniqueViolation,
                _,
            ))
        )
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_response) = match &self {
            AppError::Known { code, message, details } => {
                let status = code.status_code();
                let mut resp = ApiErrorResponse::new(code.code(), message);
                if let Some(d) = details {
                    resp = resp.with_details(d.clone());
                }
                (status, resp)
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, "internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiErrorResponse::new("E0001", "internal server error"),
                )
            }
            AppError::Database(err) => {
                tracing::error!(error = %err, "database error");
                match err {
                    diesel::result::Error::NotFound => (
                        StatusCode::NOT_FOUND,
                        ApiErrorResponse::new("E0003", "resource not found"),
                    ),
                    _ => (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        ApiErrorResponse::new("E0001", "database error"),
                    ),
                }
            }
            AppError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                ApiErrorResponse::new("E0002", msg),
            ),
        };

        (status, Json(error_response)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
