//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: method validation, body-size
//! guard, and dispatch between the JSON API and static file serving.

use crate::api;
use crate::config::AppState;
use crate::handler::static_files;
use crate::http;
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Method, Request, Response, StatusCode};
use std::convert::Infallible;
use std::sync::Arc;

/// Request context for static file serving
pub struct RequestContext<'a> {
    pub path: &'a str,
    pub is_head: bool,
    pub if_none_match: Option<String>,
    pub access_log: bool,
}

/// Main entry point for HTTP request handling
pub async fn handle_request(
    req: Request<hyper::body::Incoming>,
    state: Arc<AppState>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let is_head = method == Method::HEAD;

    let access_log = state
        .cached_access_log
        .load(std::sync::atomic::Ordering::Relaxed);
    if access_log {
        logger::log_request(&method, req.uri(), req.version());
    }

    // 1. Check body size for anything that carries one
    if let Some(resp) = check_body_size(req.headers(), state.config.http.max_body_size) {
        return Ok(resp);
    }

    // 2. API routes own their method handling (POST/DELETE/OPTIONS)
    if path == "/api" || path.starts_with("/api/") {
        return api::handle_api(req, state).await;
    }

    // 3. Health check
    if path == "/health" {
        return Ok(api::json_response(StatusCode::OK, &api::HealthResponse::ok()));
    }

    // 4. Everything else is static content: GET/HEAD only
    if let Some(resp) = check_http_method(&method, state.config.http.enable_cors) {
        return Ok(resp);
    }

    let ctx = RequestContext {
        path: &path,
        is_head,
        if_none_match: req
            .headers()
            .get("if-none-match")
            .and_then(|v| v.to_str().ok())
            .map(ToString::to_string),
        access_log,
    };

    Ok(route_static(&ctx, &state).await)
}

/// Check HTTP method for static content requests
fn check_http_method(method: &Method, enable_cors: bool) -> Option<Response<Full<Bytes>>> {
    match *method {
        Method::GET | Method::HEAD => None,
        Method::OPTIONS => Some(http::build_options_response(enable_cors)),
        _ => {
            logger::log_warning(&format!("Method not allowed: {method}"));
            Some(http::build_405_response())
        }
    }
}

/// Validate the Content-Length header
///
/// Returns 413 when the declared size exceeds the limit and 400 when the
/// header is malformed; buffering a body whose size cannot be trusted is
/// never attempted.
fn check_body_size(headers: &hyper::HeaderMap, max_body_size: u64) -> Option<Response<Full<Bytes>>> {
    let content_length = headers.get("content-length")?;

    let Ok(size_str) = content_length.to_str() else {
        logger::log_warning("Content-Length header contains non-ASCII characters");
        return Some(http::build_400_response("Malformed Content-Length header"));
    };

    match size_str.parse::<u64>() {
        Ok(size) if size > max_body_size => {
            logger::log_error(&format!(
                "Request body too large: {size} bytes (max: {max_body_size})"
            ));
            Some(http::build_413_response())
        }
        Ok(_) => None,
        Err(_) => {
            logger::log_warning(&format!("Invalid Content-Length value: '{size_str}'"));
            Some(http::build_400_response("Malformed Content-Length header"))
        }
    }
}

/// Route static content requests by path
async fn route_static(ctx: &RequestContext<'_>, state: &Arc<AppState>) -> Response<Full<Bytes>> {
    let storage = &state.config.storage;

    // Storefront page
    if ctx.path == "/" {
        return static_files::serve_index(ctx, &storage.static_dir).await;
    }

    // Uploaded product and slider images
    if ctx.path.starts_with("/uploads/") {
        return static_files::serve_directory(ctx, &storage.uploads_dir, "/uploads").await;
    }

    // Other storefront assets
    static_files::serve_directory(ctx, &storage.static_dir, "").await
}

#[cfg(test)]
mod tests {
    use super::*;
    use hyper::header::{HeaderMap, HeaderValue};

    const MAX: u64 = 1024;

    #[test]
    fn test_body_size_within_limit_passes() {
        let mut headers = HeaderMap::new();
        headers.insert("content-length", HeaderValue::from_static("512"));
        assert!(check_body_size(&headers, MAX).is_none());
    }

    #[test]
    fn test_missing_content_length_passes() {
        assert!(check_body_size(&HeaderMap::new(), MAX).is_none());
    }

    #[test]
    fn test_oversized_body_rejected() {
        let mut headers = HeaderMap::new();
        headers.insert("content-length", HeaderValue::from_static("2048"));
        let response = check_body_size(&headers, MAX).expect("413 response");
        assert_eq!(response.status(), 413);
    }

    #[test]
    fn test_malformed_content_length_rejected() {
        let mut headers = HeaderMap::new();
        headers.insert("content-length", HeaderValue::from_static("not-a-number"));
        let response = check_body_size(&headers, MAX).expect("400 response");
        assert_eq!(response.status(), 400);
    }
}
