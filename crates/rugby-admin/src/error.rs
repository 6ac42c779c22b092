//! Handler errors and their HTTP mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use rugby_store::StoreError;
use thiserror::Error;

use crate::export::ExportError;

#[derive(Error, Debug)]
pub enum AdminError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("template rendering failed: {0}")]
    Render(#[from] askama::Error),
    #[error(transparent)]
    Export(#[from] ExportError),
    #[error("{0} not found")]
    NotFound(String),
}

impl AdminError {
    pub fn status(&self) -> StatusCode {
        match self {
            AdminError::Store(StoreError::NotFound(_)) | AdminError::NotFound(_) => StatusCode::NOT_FOUND,
            AdminError::Store(StoreError::Duplicate(_)) => StatusCode::CONFLICT,
            AdminError::Store(StoreError::Invalid(_)) => StatusCode::UNPROCESSABLE_ENTITY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AdminError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        (status, self.to_string()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rugby_core::ValidationError;

    #[test]
    fn store_errors_map_to_client_statuses() {
        assert_eq!(
            AdminError::from(StoreError::NotFound("result 3".into())).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AdminError::from(StoreError::Duplicate("team Lions".into())).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AdminError::from(StoreError::Invalid(ValidationError::EmptyTeam)).status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[test]
    fn io_errors_are_server_errors() {
        let err = StoreError::Io {
            path: "results.json".into(),
            source: std::io::Error::other("disk full"),
        };
        assert_eq!(AdminError::from(err).status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
