use axum::{
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use tracing::{debug, error};

use crate::token::TokenError;

/// Why a protected request could not be tied to a user.
#[derive(Debug, thiserror::Error)]
pub enum AuthFailure {
    #[error("no session cookie")]
    MissingCookie,
    #[error(transparent)]
    Token(#[from] TokenError),
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("authentication required: {0}")]
    Unauthenticated(#[from] AuthFailure),

    #[error("wrong username or password")]
    InvalidCredentials,

    #[error("{0}")]
    Duplicate(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("storage error: {0}")]
    Storage(#[from] sqlx::Error),

    #[error("storage call timed out")]
    Timeout,

    #[error("internal error: {0}")]
    Internal(String),

    #[error("configuration error: {0}")]
    Config(String),
}

impl AppError {
    /// Maps a unique-constraint violation to `Duplicate`, anything else to `Storage`.
    pub fn from_insert(err: sqlx::Error, duplicate_message: impl Into<String>) -> Self {
        match &err {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                AppError::Duplicate(duplicate_message.into())
            }
            _ => AppError::Storage(err),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Unauthenticated(reason) => {
                debug!("redirecting to login: {}", reason);
                Redirect::to("/login").into_response()
            }
            AppError::Validation(message) | AppError::Duplicate(message) => {
                (StatusCode::BAD_REQUEST, message).into_response()
            }
            AppError::InvalidCredentials => {
                (StatusCode::BAD_REQUEST, "wrong username or password").into_response()
            }
            AppError::NotFound(message) => (StatusCode::NOT_FOUND, message).into_response(),
            err @ (AppError::Storage(_)
            | AppError::Timeout
            | AppError::Internal(_)
            | AppError::Config(_)) => {
                error!("request failed: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Something bad happened, please try again later",
                )
                    .into_response()
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
