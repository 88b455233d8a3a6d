use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

/// Error surface of the job endpoint. Handler failures carry no taxonomy:
/// whatever the wrapped model or encoding step reported is forwarded to the
/// caller as an internal server error.
#[derive(Debug)]
pub struct WorkerError {
    pub status: StatusCode,
    pub message: HttpErrorResponse,
}

#[derive(Debug, Serialize)]
pub struct HttpErrorResponse {
    error: String,
}

impl HttpErrorResponse {
    pub fn error(&self) -> &str {
        &self.error
    }
}

impl From<String> for HttpErrorResponse {
    fn from(message: String) -> Self {
        HttpErrorResponse { error: message }
    }
}

impl From<&str> for HttpErrorResponse {
    fn from(message: &str) -> Self {
        HttpErrorResponse {
            error: message.to_string(),
        }
    }
}

impl IntoResponse for WorkerError {
    fn into_response(self) -> Response {
        let mut res = Json(self.message).into_response();
        *res.status_mut() = self.status;
        res
    }
}

impl<E> From<E> for WorkerError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        WorkerError {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: HttpErrorResponse::from(format!("{:#}", err.into())),
        }
    }
}

pub type WorkerResult<T, E = WorkerError> = Result<T, E>;

#[macro_export]
macro_rules! bail_worker {
    ($error_message:expr) => {
        return Err($crate::error::WorkerError { status: StatusCode::INTERNAL_SERVER_ERROR, message: $crate::error::HttpErrorResponse::from($error_message) })
    };
    ($status_code:expr, $error_message:expr) => {
        return Err($crate::error::WorkerError { status: $status_code, message: $crate::error::HttpErrorResponse::from($error_message) })
    };
    ($status:expr, $fmt:expr $(, $arg:expr)*) => {
        return Err($crate::error::WorkerError {
            status: $status,
            message: $crate::error::HttpErrorResponse::from(format!($fmt $(, $arg)*)),
        })
    };
}

#[cfg(test)]
mod tests {
    use anyhow::anyhow;
    use axum::http::StatusCode;

    use super::WorkerError;

    #[test]
    fn anyhow_errors_map_to_internal_server_error() {
        let err = WorkerError::from(anyhow!("model exploded"));
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.message.error().contains("model exploded"));
    }

    #[test]
    fn error_context_chain_is_preserved() {
        let err = anyhow!("missing field `text`").context("invalid job input");
        let err = WorkerError::from(err);
        assert!(err.message.error().contains("invalid job input"));
        assert!(err.message.error().contains("missing field `text`"));
    }
}
