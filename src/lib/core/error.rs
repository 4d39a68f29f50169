use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

#[cfg(feature = "tracing")]
use tracing::{error, warn};

#[derive(Error, Debug)]
pub enum TodoError {
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Todo {0} not found")]
    NotFound(i64),
    #[error("Storage error: {0}")]
    Storage(#[from] sqlx::Error),
    #[error("Template error: {0}")]
    Template(#[from] tera::Error),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl TodoError {
    pub fn status(&self) -> StatusCode {
        match self {
            TodoError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            TodoError::NotFound(_) => StatusCode::NOT_FOUND,
            TodoError::Storage(_)
            | TodoError::Template(_)
            | TodoError::Config(_)
            | TodoError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for TodoError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            TodoError::Validation(msg) => {
                #[cfg(feature = "tracing")]
                warn!(reason = %msg, "Rejected invalid input");
                (status, msg.clone()).into_response()
            }
            TodoError::NotFound(_) => {
                #[cfg(feature = "tracing")]
                warn!(error = %self, "Requested todo does not exist");
                (status, self.to_string()).into_response()
            }
            _ => {
                #[cfg(feature = "tracing")]
                error!(error = %self, "Request failed");
                // Internal details stay in the log.
                (status, "Internal server error").into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_each_kind_to_its_status() {
        assert_eq!(
            TodoError::Validation("empty".into()).status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(TodoError::NotFound(7).status(), StatusCode::NOT_FOUND);
        assert_eq!(
            TodoError::Storage(sqlx::Error::RowNotFound).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            TodoError::Config("bad port".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn storage_errors_hide_details_from_the_client() {
        let response = TodoError::Storage(sqlx::Error::PoolClosed).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
