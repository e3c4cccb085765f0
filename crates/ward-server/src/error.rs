//! Error types for the HTTP server.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use ward_docs::DocsError;

/// Server error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum ServerError {
    /// A required query parameter is missing or empty.
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),

    /// No category with this slug.
    #[error("Category '{0}' not found")]
    CategoryNotFound(String),

    /// No file matching the path inside the category.
    #[error("File '{file}' not found in category '{category}'")]
    FileNotFound {
        /// Category slug from the request.
        category: String,
        /// File path from the request.
        file: String,
    },

    /// Requested asset is not on the retrieve allowlist.
    #[error("File '{0}' is not available")]
    Forbidden(String),

    /// Allowed asset could not be read.
    #[error("File '{0}' not found")]
    AssetNotFound(String),

    /// Documentation lookup failed.
    #[error(transparent)]
    Docs(#[from] DocsError),
}

impl ServerError {
    fn status(&self) -> StatusCode {
        match self {
            Self::MissingParameter(_) => StatusCode::BAD_REQUEST,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::CategoryNotFound(_)
            | Self::FileNotFound { .. }
            | Self::AssetNotFound(_)
            | Self::Docs(DocsError::RootNotFound(_)) => StatusCode::NOT_FOUND,
            Self::Docs(DocsError::Storage(_)) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            // The root path is not exposed to clients
            Self::Docs(DocsError::RootNotFound(root)) => {
                tracing::warn!(root = %root.display(), "Documentation root not found");
                json!({"error": "No Categories found"})
            }
            Self::Docs(e) => {
                tracing::error!(error = %e, "Documentation lookup failed");
                json!({"error": "Internal server error"})
            }
            other => json!({"error": other.to_string()}),
        };

        (status, axum::Json(body)).into_response()
    }
}
