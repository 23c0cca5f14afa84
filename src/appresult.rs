use axum::{Json, http::StatusCode, response::{IntoResponse, Response}};
use serde_json::json;
use thiserror::Error;
use tracing::error;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug)]
pub struct AppError(pub anyhow::Error);

/// Failures reported to the client by code.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiError {
    #[error("The requested username was not found.")]
    UsernameNotFound,
    #[error("The requested username already exists.")]
    UsernameOrEmailAlreadyExists,
    #[error("The login credentials have expired.")]
    InvalidRefreshToken,
    #[error("The login session has expired.")]
    InvalidToken,
    #[error("The password is incorrect.")]
    IncorrectPassword,
    #[error("The username is invalid.")]
    InvalidUsername,
    #[error("The email is invalid.")]
    InvalidEmail,
    #[error("The password is invalid.")]
    InvalidPassword,
    #[error("No changes were made.")]
    NoChanges,
    #[error("The expiry must be a positive number of seconds within range.")]
    InvalidExpiry,
    #[error("The requested item was not found.")]
    NotFound,
    #[error("You are not allowed to see this.")]
    Forbidden,
    #[error("An unknown error occurred. Please try again later.")]
    Unknown,
}

impl ApiError {
    pub fn code(&self) -> &'static str {
        use ApiError::*;
        match self {
            UsernameNotFound => "USERNAME_NOT_FOUND",
            UsernameOrEmailAlreadyExists => "USERNAME_OR_EMAIL_ALREADY_EXISTS",
            InvalidRefreshToken => "INVALID_REFRESH_TOKEN",
            InvalidToken => "INVALID_TOKEN",
            IncorrectPassword => "INCORRECT_PASSWORD",
            InvalidUsername => "INVALID_USERNAME",
            InvalidEmail => "INVALID_EMAIL",
            InvalidPassword => "INVALID_PASSWORD",
            NoChanges => "NO_CHANGES",
            InvalidExpiry => "INVALID_EXPIRY",
            NotFound => "NOT_FOUND",
            Forbidden => "FORBIDDEN",
            Unknown => "UNKNOWN",
        }
    }

    pub fn status(&self) -> StatusCode {
        use ApiError::*;
        match self {
            UsernameNotFound | NotFound => StatusCode::NOT_FOUND,
            UsernameOrEmailAlreadyExists => StatusCode::CONFLICT,
            InvalidRefreshToken | InvalidToken | IncorrectPassword => StatusCode::UNAUTHORIZED,
            InvalidUsername | InvalidEmail | InvalidPassword | NoChanges | InvalidExpiry => {
                StatusCode::BAD_REQUEST
            }
            Forbidden => StatusCode::FORBIDDEN,
            Unknown => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status(),
            Json(json!({ "err": { "code": self.code(), "friendly": self.to_string() } })),
        )
            .into_response()
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self.0.downcast_ref::<ApiError>() {
            Some(api_error) => api_error.into_response(),
            None => {
                error!("{:#}\n\n{}", self.0, self.0.backtrace());
                ApiError::Unknown.into_response()
            }
        }
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
