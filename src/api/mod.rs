// API module entry
// JSON endpoints for the storefront catalog, slider and order pipeline

mod handlers;
mod multipart;
mod response;
mod types;

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::HeaderValue;
use hyper::{Method, Request, Response};
use std::convert::Infallible;
use std::sync::Arc;

use crate::config::AppState;
use crate::http;
use crate::logger;

// Re-export public types
pub use response::{bad_request, json_response, not_found, server_error};
pub use types::{HealthResponse, MutationResponse, OrderRequest, OrderResponse};

/// API route handler
///
/// Dispatches to handler functions based on request path and method.
pub async fn handle_api(
    req: Request<hyper::body::Incoming>,
    state: Arc<AppState>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let path = req.uri().path().to_string();
    let method = req.method().clone();
    let enable_cors = state.config.http.enable_cors;

    let mut response = match (method, path.as_str()) {
        // Storefront
        (Method::GET, "/api/products") => handlers::list_products(state).await,
        (Method::GET, "/api/slider") => handlers::list_slider(state).await,
        (Method::POST, "/api/order") => handlers::submit_order(req, state).await,
        // Admin
        (Method::GET, "/api/admin/orders") => handlers::list_orders(state).await,
        (Method::POST, "/api/admin/products") => handlers::create_product(req, state).await,
        (Method::POST, "/api/admin/slider") => handlers::create_slider_entry(req, state).await,
        (Method::DELETE, p) => match p.strip_prefix("/api/admin/products/") {
            Some(id) => handlers::delete_product(state, id).await,
            None => match p.strip_prefix("/api/admin/slider/") {
                Some(index) => handlers::delete_slider_entry(state, index).await,
                None => {
                    logger::log_api_request("DELETE", &path, 404);
                    not_found()
                }
            },
        },
        // CORS preflight
        (Method::OPTIONS, _) => http::build_options_response(enable_cors),
        // Unknown route
        (method, _) => {
            logger::log_api_request(method.as_str(), &path, 404);
            not_found()
        }
    };

    if enable_cors {
        response
            .headers_mut()
            .insert("Access-Control-Allow-Origin", HeaderValue::from_static("*"));
    }

    Ok(response)
}
