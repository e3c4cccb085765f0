//! Allowlisted static file endpoint.
//!
//! Serves a fixed set of files (privacy policy, terms) from the assets
//! directory. Anything not on the allowlist is refused before the
//! filesystem is touched.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::{HeaderValue, header};
use axum::response::{IntoResponse, Response};
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::error::ServerError;
use crate::handlers::required;
use crate::state::AppState;

/// Query for `GET /api/retrieve`.
#[derive(Debug, Deserialize)]
pub(crate) struct RetrieveQuery {
    file: Option<String>,
}

/// Handle GET /api/retrieve?file=/legal/privacy.md.
pub(crate) async fn retrieve(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RetrieveQuery>,
) -> Result<Response, ServerError> {
    let file = required(query.file, "file")?;
    if !state.retrieve.is_allowed(&file) {
        tracing::warn!(file = %file, "Refused retrieve of file outside allowlist");
        return Err(ServerError::Forbidden(file));
    }

    let path = state.retrieve.assets_dir.join(file.trim_start_matches('/'));
    let content = match tokio::fs::read(&path).await {
        Ok(content) => content,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Failed to read retrieve file");
            return Err(ServerError::AssetNotFound(file));
        }
    };

    let mime = mime_guess::from_path(&path).first_or_octet_stream();
    let mut response = ([(header::CONTENT_TYPE, mime.to_string())], content).into_response();

    let modified = tokio::fs::metadata(&path)
        .await
        .and_then(|meta| meta.modified())
        .ok();
    if let Some(modified) = modified {
        let modified: DateTime<Utc> = modified.into();
        let value = modified.format("%a, %d %b %Y %H:%M:%S GMT").to_string();
        if let Ok(value) = HeaderValue::from_str(&value) {
            response.headers_mut().insert(header::LAST_MODIFIED, value);
        }
    }

    Ok(response)
}
