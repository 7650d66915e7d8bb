use ide_models::TransitionError;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Connector,
    Image,
    Runner,
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            EntityKind::Connector => "Cloud connector",
            EntityKind::Image => "Image",
            EntityKind::Runner => "Runner",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug)]
pub enum ConsoleError {
    #[error("{kind} not found: {id}")]
    NotFound { kind: EntityKind, id: String },

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid input: {0}")]
    InvalidInput(#[from] validator::ValidationErrors),

    #[error("Storage error: {0}")]
    Storage(#[from] ide_storage::StorageError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ConsoleError {
    pub fn not_found(kind: EntityKind, id: impl Into<String>) -> Self {
        ConsoleError::NotFound {
            kind,
            id: id.into(),
        }
    }
}

impl From<TransitionError> for ConsoleError {
    fn from(err: TransitionError) -> Self {
        match err {
            TransitionError::EmptyUser => {
                ConsoleError::Validation(err.to_string())
            }
            TransitionError::Invalid { .. } => {
                ConsoleError::InvalidState(err.to_string())
            }
        }
    }
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal server error: {0}")]
    InternalServerError(String),
}

impl From<ConsoleError> for ApiError {
    fn from(err: ConsoleError) -> Self {
        let message = err.to_string();
        match err {
            ConsoleError::NotFound { .. } => ApiError::NotFound(message),
            ConsoleError::InvalidState(_) => ApiError::Conflict(message),
            ConsoleError::Validation(_) | ConsoleError::InvalidInput(_) => {
                ApiError::BadRequest(message)
            }
            ConsoleError::Storage(_) | ConsoleError::Internal(_) => {
                ApiError::InternalServerError(message)
            }
        }
    }
}

impl axum::response::IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        use axum::{Json, http::StatusCode};
        use serde_json::json;

        let (status, error_message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ApiError::InternalServerError(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}
