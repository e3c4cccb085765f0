//! Documentation API endpoints.
//!
//! Category listings, category landing pages and single files. Markdown is
//! rendered per request; the scan behind every lookup is cached by the
//! library.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use ward_docs::{DocCategory, DocFile};
use ward_renderer::Fragment;

use crate::error::ServerError;
use crate::handlers::{DOCS_CACHE_CONTROL, compute_etag, is_not_modified, required};
use crate::state::AppState;

/// Query for `GET /api/docs/category`.
#[derive(Debug, Deserialize)]
pub(crate) struct CategoryQuery {
    category: Option<String>,
}

/// Query for `GET /api/docs/file`.
#[derive(Debug, Deserialize)]
pub(crate) struct FileQuery {
    category: Option<String>,
    file: Option<String>,
}

/// File listing entry, without content.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FileSummary {
    name: String,
    file_path: String,
    file_name: String,
    is_parent: bool,
    /// Site path of the rendered page.
    link: String,
}

impl From<&DocFile> for FileSummary {
    fn from(file: &DocFile) -> Self {
        Self {
            name: file.name.clone(),
            file_path: file.file_path.clone(),
            file_name: file.file_name.clone(),
            is_parent: file.is_parent,
            link: file.link_path(),
        }
    }
}

/// Category listing entry.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CategorySummary {
    name: String,
    title: String,
    icon: String,
    description: Option<String>,
    file_count: usize,
    parent_file: Option<FileSummary>,
    files: Vec<FileSummary>,
}

impl From<&DocCategory> for CategorySummary {
    fn from(category: &DocCategory) -> Self {
        Self {
            name: category.name.clone(),
            title: category.display_name(),
            icon: category.icon.clone(),
            description: category.description.clone(),
            file_count: category.file_count(),
            parent_file: category.parent_file.as_ref().map(FileSummary::from),
            files: category.files.iter().map(FileSummary::from).collect(),
        }
    }
}

/// Response for `GET /api/docs/categories`.
#[derive(Serialize)]
struct CategoriesResponse {
    success: bool,
    categories: Vec<CategorySummary>,
    count: usize,
}

/// Response for `GET /api/docs/category`.
#[derive(Serialize)]
struct CategoryResponse {
    success: bool,
    category: CategorySummary,
    /// Markdown of the parent file, empty without one.
    content: String,
    fragments: Vec<Fragment>,
    html: String,
}

/// Response for `GET /api/docs/file`.
#[derive(Serialize)]
struct FileResponse {
    success: bool,
    file: DocFile,
    html: String,
    fragments: Vec<Fragment>,
}

/// Response for `POST /api/docs/cache/invalidate`.
#[derive(Serialize)]
struct InvalidateResponse {
    success: bool,
}

/// Handle GET /api/docs/categories.
pub(crate) async fn get_categories(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ServerError> {
    let categories: Vec<CategorySummary> = state
        .library
        .categories(true)?
        .iter()
        .map(CategorySummary::from)
        .collect();

    let response = CategoriesResponse {
        success: true,
        count: categories.len(),
        categories,
    };
    Ok(([(header::CACHE_CONTROL, DOCS_CACHE_CONTROL)], Json(response)))
}

/// Handle GET /api/docs/category?category=slug.
pub(crate) async fn get_category(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CategoryQuery>,
) -> Result<impl IntoResponse, ServerError> {
    let slug = required(query.category, "category")?;
    let category = state
        .library
        .category(&slug, true)?
        .ok_or(ServerError::CategoryNotFound(slug))?;

    let content = category
        .parent_file
        .as_ref()
        .map(|parent| parent.content.clone())
        .unwrap_or_default();
    let rendered = ward_renderer::render(&content);

    let response = CategoryResponse {
        success: true,
        category: CategorySummary::from(&category),
        html: rendered.to_html(),
        fragments: rendered.fragments().to_vec(),
        content,
    };
    Ok(([(header::CACHE_CONTROL, DOCS_CACHE_CONTROL)], Json(response)))
}

/// Handle GET /api/docs/file?category=slug&file=path.
///
/// `file` is matched tolerantly, so `auto-mod`, `auto mod.md` and
/// `commands/auto mod.md` all find `commands/auto mod.md`.
pub(crate) async fn get_file(
    State(state): State<Arc<AppState>>,
    Query(query): Query<FileQuery>,
    headers: HeaderMap,
) -> Result<Response, ServerError> {
    let slug = required(query.category, "category")?;
    let path = required(query.file, "file")?;
    let Some(file) = state.library.file_by_path(&slug, &path, true)? else {
        return Err(ServerError::FileNotFound {
            category: slug,
            file: path,
        });
    };

    let etag = compute_etag(&state.version, &file.content);
    if is_not_modified(&headers, &etag) {
        return Ok(StatusCode::NOT_MODIFIED.into_response());
    }

    let rendered = ward_renderer::render(&file.content);
    let response = FileResponse {
        success: true,
        html: rendered.to_html(),
        fragments: rendered.fragments().to_vec(),
        file,
    };
    Ok((
        [
            (header::ETAG, etag),
            (header::CACHE_CONTROL, DOCS_CACHE_CONTROL.to_owned()),
        ],
        Json(response),
    )
        .into_response())
}

/// Handle POST /api/docs/cache/invalidate.
pub(crate) async fn invalidate_cache(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    state.library.invalidate_cache();
    tracing::info!("Documentation cache invalidated by request");
    Json(InvalidateResponse { success: true })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn doc_file(name: &str, path: &str, is_parent: bool) -> DocFile {
        DocFile {
            name: name.to_owned(),
            category: "commands".to_owned(),
            category_icon: None,
            category_description: None,
            is_parent,
            content: format!("{name} body"),
            file_path: path.to_owned(),
            file_name: path.rsplit('/').next().unwrap_or(path).to_owned(),
        }
    }

    #[test]
    fn test_category_summary_serialization() {
        let category = DocCategory {
            name: "bot-commands".to_owned(),
            icon: "Terminal".to_owned(),
            description: None,
            parent_file: Some(doc_file("Commands", "commands/index.md", true)),
            files: vec![doc_file("Auto Mod", "commands/auto mod.md", false)],
        };

        let json = serde_json::to_value(CategorySummary::from(&category)).unwrap();

        assert_eq!(json["name"], "bot-commands");
        assert_eq!(json["title"], "Bot Commands");
        assert_eq!(json["icon"], "Terminal");
        assert!(json["description"].is_null());
        assert_eq!(json["fileCount"], 2);
        assert_eq!(json["parentFile"]["isParent"], true);
        assert_eq!(json["parentFile"]["link"], "/docs/commands");
        assert_eq!(json["files"][0]["filePath"], "commands/auto mod.md");
        assert_eq!(json["files"][0]["link"], "/docs/commands/auto-mod");
        assert!(json["files"][0].get("content").is_none());
    }
}
