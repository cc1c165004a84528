//! Static file serving module
//!
//! Serves the storefront page, uploaded images and other assets with MIME
//! detection, ETag-based conditional requests and path traversal protection.

use crate::handler::router::RequestContext;
use crate::http::{self, mime};
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::path::Path;
use tokio::fs;

const INDEX_FILE: &str = "index.html";

/// Serve the storefront page
pub async fn serve_index(ctx: &RequestContext<'_>, static_dir: &str) -> Response<Full<Bytes>> {
    let index_path = Path::new(static_dir).join(INDEX_FILE);
    match load_single_file(&index_path).await {
        Some((content, content_type)) => {
            if ctx.access_log {
                logger::log_response(content.len());
            }
            build_static_file_response(
                &content,
                content_type,
                ctx.if_none_match.as_deref(),
                ctx.is_head,
            )
        }
        None => {
            logger::log_warning(&format!(
                "Storefront page missing: {}",
                index_path.display()
            ));
            http::build_404_response()
        }
    }
}

/// Serve static files from a directory
pub async fn serve_directory(
    ctx: &RequestContext<'_>,
    dir: &str,
    route_prefix: &str,
) -> Response<Full<Bytes>> {
    match load_from_directory(dir, ctx.path, route_prefix).await {
        Some((content, content_type)) => {
            if ctx.access_log {
                logger::log_response(content.len());
            }
            build_static_file_response(
                &content,
                content_type,
                ctx.if_none_match.as_deref(),
                ctx.is_head,
            )
        }
        None => http::build_404_response(),
    }
}

/// Load a static file from a directory, refusing paths that escape it
async fn load_from_directory(
    static_dir: &str,
    path: &str,
    route_prefix: &str,
) -> Option<(Vec<u8>, &'static str)> {
    // Remove leading slash and prevent directory traversal
    let clean_path = path.trim_start_matches('/').replace("..", "");

    // Remove route prefix from path
    let prefix_clean = route_prefix.trim_matches('/');
    let relative_path = if prefix_clean.is_empty() {
        clean_path.as_str()
    } else {
        clean_path
            .strip_prefix(&format!("{prefix_clean}/"))
            .unwrap_or(&clean_path)
    };

    let file_path = Path::new(static_dir).join(relative_path);

    // Security: ensure file_path is within static_dir
    let static_dir_canonical = match Path::new(static_dir).canonicalize() {
        Ok(p) => p,
        Err(e) => {
            logger::log_warning(&format!(
                "Static directory not found or inaccessible '{static_dir}': {e}"
            ));
            return None;
        }
    };

    // File not found is common (404), no need to log at warning level
    let Ok(file_path_canonical) = file_path.canonicalize() else {
        return None;
    };
    if !file_path_canonical.starts_with(&static_dir_canonical) {
        logger::log_warning(&format!(
            "Path traversal attempt blocked: {} -> {}",
            path,
            file_path_canonical.display()
        ));
        return None;
    }

    if !file_path_canonical.is_file() {
        return None;
    }

    let content = match fs::read(&file_path_canonical).await {
        Ok(c) => c,
        Err(e) => {
            logger::log_error(&format!(
                "Failed to read file '{}': {}",
                file_path_canonical.display(),
                e
            ));
            return None;
        }
    };

    let content_type =
        mime::get_content_type(file_path_canonical.extension().and_then(|e| e.to_str()));

    Some((content, content_type))
}

/// Load a single file
async fn load_single_file(path: &Path) -> Option<(Vec<u8>, &'static str)> {
    let content = fs::read(path).await.ok()?;
    let content_type = mime::get_content_type(path.extension().and_then(|e| e.to_str()));
    Some((content, content_type))
}

/// Build static file response with `ETag` support
fn build_static_file_response(
    data: &[u8],
    content_type: &str,
    if_none_match: Option<&str>,
    is_head: bool,
) -> Response<Full<Bytes>> {
    let etag = generate_etag(data);

    // Check if client has cached version
    if check_etag_match(if_none_match, &etag) {
        return http::build_304_response(&etag);
    }

    // Content-Length must reflect the full entity; build_cached_response
    // drops the body itself for HEAD after computing the length.
    http::response::build_cached_response(
        Bytes::from(data.to_owned()),
        content_type,
        &etag,
        is_head,
    )
}

/// Generate `ETag` using fast hashing
fn generate_etag(content: &[u8]) -> String {
    let mut hasher = DefaultHasher::new();
    content.hash(&mut hasher);
    let v = hasher.finish();
    format!("\"{v:x}\"")
}

/// Check if client's `If-None-Match` header matches the server's `ETag`
///
/// Handles single tags, comma-separated lists and the `*` wildcard.
fn check_etag_match(if_none_match: Option<&str>, etag: &str) -> bool {
    if_none_match.is_some_and(|client_etag| {
        client_etag
            .split(',')
            .any(|e| e.trim() == etag || e.trim() == "*")
    })
}
