//! Request-level errors and their HTTP mapping

use std::convert::Infallible;

use serde::Serialize;
use thiserror::Error;
use warp::http::StatusCode;
use warp::{Rejection, Reply};

use crate::llm::LlmError;
use crate::speech::SpeechError;
use crate::store;

/// Errors surfaced by the vocabulary flows
#[derive(Debug, Error)]
pub enum AppError {
    /// Invalid caller input
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    /// Missing or unknown API token
    #[error("Authentication credentials were not provided or are invalid")]
    Unauthorized,

    /// A unique value is already taken
    #[error("{0}")]
    Conflict(String),

    #[error("Language model request failed: {0}")]
    Llm(#[from] LlmError),

    #[error("Speech synthesis failed: {0}")]
    Speech(#[from] SpeechError),

    #[error("Storage failure: {0}")]
    Store(store::Error),
}

impl From<store::Error> for AppError {
    fn from(err: store::Error) -> Self {
        match err {
            store::Error::ValidationError(msg) => AppError::Validation(msg),
            store::Error::NotFoundError(msg) => AppError::NotFound(msg),
            store::Error::ConflictError(msg) => AppError::Conflict(msg),
            other => AppError::Store(other),
        }
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Llm(_) | AppError::Speech(_) => StatusCode::BAD_GATEWAY,
            AppError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to show to the caller
    pub fn public_message(&self) -> String {
        match self {
            AppError::Store(_) => "Internal server error".to_string(),
            other => other.to_string(),
        }
    }
}

impl warp::reject::Reject for AppError {}

/// JSON body of every error response
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

pub fn error_reply(status: StatusCode, message: impl Into<String>) -> warp::reply::Response {
    let body = ErrorBody {
        error: message.into(),
    };
    warp::reply::with_status(warp::reply::json(&body), status).into_response()
}

/// Turn any rejection into a JSON error response
pub async fn handle_rejection(err: Rejection) -> Result<impl Reply, Infallible> {
    if err.is_not_found() {
        return Ok(error_reply(StatusCode::NOT_FOUND, "Not found"));
    }

    if let Some(app_error) = err.find::<AppError>() {
        let status = app_error.status();
        if status.is_server_error() {
            log::error!("request failed: {}", app_error);
        }
        return Ok(error_reply(status, app_error.public_message()));
    }

    if let Some(e) = err.find::<warp::filters::body::BodyDeserializeError>() {
        return Ok(error_reply(StatusCode::BAD_REQUEST, format!("Invalid request body: {}", e)));
    }

    if let Some(e) = err.find::<warp::reject::InvalidHeader>() {
        return Ok(error_reply(StatusCode::BAD_REQUEST, e.to_string()));
    }

    if err.find::<warp::reject::UnsupportedMediaType>().is_some() {
        return Ok(error_reply(
            StatusCode::BAD_REQUEST,
            "Request body must be application/json",
        ));
    }

    if err.find::<warp::reject::PayloadTooLarge>().is_some() {
        return Ok(error_reply(StatusCode::BAD_REQUEST, "Request body is too large"));
    }

    if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        return Ok(error_reply(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed"));
    }

    log::error!("unhandled rejection: {:?}", err);
    Ok(error_reply(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_errors_keep_their_meaning() {
        let err: AppError = store::Error::NotFoundError("word".to_string()).into();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);

        let err: AppError = store::Error::ConflictError("username".to_string()).into();
        assert_eq!(err.status(), StatusCode::CONFLICT);

        let err: AppError = store::Error::PoolError("timed out".to_string()).into();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.public_message(), "Internal server error");
    }

    #[test]
    fn upstream_failures_are_bad_gateway() {
        let err = AppError::from(LlmError::AuthenticationError("bad key".to_string()));
        assert_eq!(err.status(), StatusCode::BAD_GATEWAY);
        assert!(err.public_message().contains("bad key"));
    }

    #[tokio::test]
    async fn rejection_maps_to_json_body() {
        let rejection = warp::reject::custom(AppError::Unauthorized);
        let response = handle_rejection(rejection).await.unwrap().into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            response.headers()["content-type"],
            "application/json"
        );
    }

    #[tokio::test]
    async fn not_found_rejection() {
        let response = handle_rejection(warp::reject::not_found())
            .await
            .unwrap()
            .into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
