//! Error handling - every failure renders as a `{success: false}` envelope
//! carrying an RFC 7807 problem.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use thiserror::Error;

use quill_core::ports::{AuthError, RateLimitError};
use quill_core::{DomainError, RepoError};
use quill_harness::HarnessError;
use quill_shared::{ApiResponse, ErrorResponse};

/// Application-level error type.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden")]
    Forbidden,

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Validation errors: {}", .0.join("; "))]
    Validation(Vec<String>),

    #[error("Service unavailable: {0}")]
    Unavailable(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn problem(&self) -> ErrorResponse {
        match self {
            AppError::NotFound(detail) => ErrorResponse::not_found(detail),
            AppError::BadRequest(detail) => ErrorResponse::bad_request(detail),
            AppError::Unauthorized(detail) => ErrorResponse::unauthorized().with_detail(detail),
            AppError::Forbidden => ErrorResponse::forbidden()
                .with_detail("This action requires the admin role."),
            AppError::Conflict(detail) => ErrorResponse::new(409, "Conflict").with_detail(detail),
            AppError::Validation(errors) => ErrorResponse::new(422, "Validation Failed")
                .with_detail(errors.join("; "))
                .with_errors(errors.clone()),
            AppError::Unavailable(detail) => {
                tracing::error!(detail = %detail, "Upstream unavailable");
                ErrorResponse::new(503, "Service Unavailable")
                    .with_detail("The content store is unavailable. Try again later.")
            }
            AppError::Internal(detail) => {
                // Causes stay in the logs only.
                tracing::error!(detail = %detail, "Internal error");
                ErrorResponse::internal_error()
            }
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ApiResponse::<()>::failure(self.problem()))
    }
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(errors) => AppError::Validation(errors),
        }
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound => AppError::NotFound("Resource not found".to_string()),
            RepoError::Constraint(msg) => AppError::Conflict(msg),
            RepoError::Connection(msg) => AppError::Unavailable(msg),
            RepoError::Query(msg) => AppError::Internal(format!("content store query: {msg}")),
            RepoError::Unauthorized => {
                AppError::Internal("content store rejected credentials".to_string())
            }
        }
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials => {
                AppError::Unauthorized("Invalid email or password.".to_string())
            }
            AuthError::TokenExpired => AppError::Unauthorized(
                "Your authentication token has expired. Please login again.".to_string(),
            ),
            AuthError::InvalidToken(msg) => AppError::Unauthorized(msg),
            AuthError::MissingAuth => AppError::Unauthorized(
                "Please provide a valid Bearer token in the Authorization header.".to_string(),
            ),
            AuthError::InsufficientPermissions => AppError::Forbidden,
            AuthError::HashingError(msg) => AppError::Internal(msg),
        }
    }
}

impl From<HarnessError> for AppError {
    fn from(err: HarnessError) -> Self {
        match err {
            HarnessError::Invalid(e) => e.into(),
            HarnessError::Repo(e) => e.into(),
            HarnessError::CreationFailed { source, .. } => source.into(),
        }
    }
}

impl From<RateLimitError> for AppError {
    fn from(err: RateLimitError) -> Self {
        AppError::Internal(err.to_string())
    }
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    #[actix_rt::test]
    async fn test_validation_renders_every_problem() {
        let err: AppError = DomainError::Validation(vec!["a".into(), "b".into()]).into();
        assert_eq!(err.status_code(), StatusCode::UNPROCESSABLE_ENTITY);

        let body = to_bytes(err.error_response().into_body()).await.unwrap();
        let envelope: ApiResponse<()> = serde_json::from_slice(&body).unwrap();
        assert!(!envelope.success);
        assert_eq!(envelope.error.unwrap().errors, vec!["a", "b"]);
    }

    #[test]
    fn test_internal_causes_are_hidden() {
        let err: AppError = RepoError::Query("syntax error at or near".to_string()).into();
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.problem().detail.is_none());
    }

    #[test]
    fn test_auth_mapping() {
        assert_eq!(
            AppError::from(AuthError::MissingAuth).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::from(AuthError::InsufficientPermissions).status_code(),
            StatusCode::FORBIDDEN
        );
    }
}
