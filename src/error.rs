use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde_json::json;
use thiserror::Error;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Email already registered")]
    DuplicateEmail,

    #[error("Incorrect email or password")]
    InvalidCredentials,

    #[error("This account uses {0} authentication")]
    WrongAuthProvider(String),

    #[error("Inactive user")]
    InactiveAccount,

    #[error("Could not validate credentials")]
    InvalidToken,

    #[error("Unsupported OAuth provider: {0}")]
    UnsupportedProvider(String),

    #[error("Invalid OAuth token")]
    InvalidOAuthToken,

    #[error("User not found")]
    UserNotFound,

    #[error("Status does not belong to this point")]
    StatusNotFound,

    #[error("Order is already in a final status")]
    OrderAlreadyFinal,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Forbidden")]
    Forbidden,

    #[error("Database error: {0}")]
    DatabaseError(#[from] sea_orm::DbErr),

    #[error("JWT error: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),

    #[error("Config error: {0}")]
    ConfigError(String),

    #[error("Internal server error: {0}")]
    InternalError(String),
}

impl AppError {
    fn code(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::ValidationError(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            AppError::DuplicateEmail => (StatusCode::BAD_REQUEST, "DUPLICATE_EMAIL"),
            AppError::InvalidCredentials => (StatusCode::UNAUTHORIZED, "INVALID_CREDENTIALS"),
            AppError::WrongAuthProvider(_) => (StatusCode::BAD_REQUEST, "WRONG_AUTH_PROVIDER"),
            AppError::InactiveAccount => (StatusCode::BAD_REQUEST, "INACTIVE_ACCOUNT"),
            AppError::InvalidToken => (StatusCode::UNAUTHORIZED, "INVALID_TOKEN"),
            AppError::UnsupportedProvider(_) => (StatusCode::BAD_REQUEST, "UNSUPPORTED_PROVIDER"),
            AppError::InvalidOAuthToken => (StatusCode::BAD_REQUEST, "INVALID_OAUTH_TOKEN"),
            AppError::UserNotFound => (StatusCode::UNAUTHORIZED, "USER_NOT_FOUND"),
            AppError::StatusNotFound => (StatusCode::NOT_FOUND, "STATUS_NOT_FOUND"),
            AppError::OrderAlreadyFinal => (StatusCode::CONFLICT, "ORDER_ALREADY_FINAL"),
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            AppError::Forbidden => (StatusCode::FORBIDDEN, "FORBIDDEN"),
            AppError::DatabaseError(_) => (StatusCode::INTERNAL_SERVER_ERROR, "DATABASE_ERROR"),
            AppError::JwtError(_) | AppError::InternalError(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
            }
            AppError::ConfigError(_) => (StatusCode::INTERNAL_SERVER_ERROR, "CONFIG_ERROR"),
        }
    }
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        let (status_code, error_code) = self.code();

        // Internal details stay in the logs, not in the response body.
        let message = match self {
            AppError::DatabaseError(err) => {
                log::error!("Database error: {err}");
                "Database error".to_string()
            }
            AppError::JwtError(err) => {
                log::error!("JWT error: {err}");
                "Internal server error".to_string()
            }
            AppError::InternalError(msg) => {
                log::error!("Internal error: {msg}");
                "Internal server error".to_string()
            }
            AppError::ConfigError(msg) => {
                log::error!("Config error: {msg}");
                "Configuration error".to_string()
            }
            other => {
                if status_code == StatusCode::UNAUTHORIZED || status_code == StatusCode::FORBIDDEN {
                    log::warn!("{other}");
                }
                other.to_string()
            }
        };

        HttpResponse::build(status_code).json(json!({
            "success": false,
            "error": {
                "code": error_code,
                "message": message
            }
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(AppError::InvalidCredentials.code().0, StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::InvalidToken.code().0, StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::DuplicateEmail.code().0, StatusCode::BAD_REQUEST);
        assert_eq!(AppError::OrderAlreadyFinal.code().0, StatusCode::CONFLICT);
        assert_eq!(AppError::StatusNotFound.code().0, StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_wrong_provider_message_names_provider() {
        let err = AppError::WrongAuthProvider("google".to_string());
        assert_eq!(err.to_string(), "This account uses google authentication");
    }
}
