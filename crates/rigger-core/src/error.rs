//! Core error types for the rigger engine.
//!
//! - `WorkflowError` — raised while turning a workflow source into a
//!   `Workflow`. Parsing never yields a partial workflow.
//! - `CommandError` — a command could not even attempt its effect.
//! - `ServerError` — control-plane errors (install lookups, bad requests).
//!   When the `axum` feature is enabled, it also implements `IntoResponse`
//!   so it can be used directly as an axum handler error type.

#[derive(Debug, thiserror::Error)]
pub enum WorkflowError {
    #[error("Template error: {0}")]
    Template(String),

    #[error("Malformed workflow definition: {0}")]
    MalformedDefinition(String),

    #[error("Unknown command: type={category} name={name}")]
    UnknownCommand { category: String, name: String },
}

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<WorkflowError> for ServerError {
    fn from(err: WorkflowError) -> Self {
        ServerError::BadRequest(err.to_string())
    }
}

// ---------------------------------------------------------------------------
// axum integration (opt-in via feature flag)
// ---------------------------------------------------------------------------

#[cfg(feature = "axum")]
impl axum::response::IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        use axum::http::StatusCode;

        let (status, message) = match &self {
            ServerError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            ServerError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ServerError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
            ServerError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
        };

        let body = serde_json::json!({ "error": message });
        (status, axum::Json(body)).into_response()
    }
}
