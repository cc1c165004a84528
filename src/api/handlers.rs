// Storefront and admin API handlers

use http_body_util::BodyExt;
use hyper::body::Bytes;
use hyper::{Request, Response, StatusCode};
use std::path::Path;
use std::sync::Arc;

use super::multipart::{self, UploadedFile};
use super::response::{bad_request, json_response, server_error};
use super::types::{MutationResponse, OrderRequest, OrderResponse};
use crate::config::AppState;
use crate::logger;
use crate::notify;
use crate::store::{decrement_stock, Order, Product, SliderImage};

/// `GET /api/products` - full product collection
pub async fn list_products(state: Arc<AppState>) -> Response<http_body_util::Full<Bytes>> {
    let products = state.stores.products.all().await;
    logger::log_api_request("GET", "/api/products", 200);
    json_response(StatusCode::OK, &products)
}

/// `GET /api/slider` - full slider collection
pub async fn list_slider(state: Arc<AppState>) -> Response<http_body_util::Full<Bytes>> {
    let slider = state.stores.slider.all().await;
    logger::log_api_request("GET", "/api/slider", 200);
    json_response(StatusCode::OK, &slider)
}

/// `GET /api/admin/orders` - all orders, most recent first
pub async fn list_orders(state: Arc<AppState>) -> Response<http_body_util::Full<Bytes>> {
    let mut orders = state.stores.orders.all().await;
    orders.sort_by(|a, b| b.id.cmp(&a.id));
    logger::log_api_request("GET", "/api/admin/orders", 200);
    json_response(StatusCode::OK, &orders)
}

/// `POST /api/order` - submit an order
///
/// Decrements stock for each referenced product, appends the order record,
/// then relays the notification. Stock and order mutations are committed
/// before the notification is attempted; a notification failure surfaces as
/// 500 without rollback.
pub async fn submit_order(
    req: Request<hyper::body::Incoming>,
    state: Arc<AppState>,
) -> Response<http_body_util::Full<Bytes>> {
    let body = match req.collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) => {
            logger::log_api_request("POST", "/api/order", 400);
            return bad_request(&format!("Failed to read request body: {e}"));
        }
    };

    let order_req: OrderRequest = match serde_json::from_slice(&body) {
        Ok(r) => r,
        Err(e) => {
            logger::log_api_request("POST", "/api/order", 400);
            return bad_request(&format!("Invalid JSON: {e}"));
        }
    };

    // Stock decrement runs as one critical section on the product collection.
    if let Err(e) = state
        .stores
        .products
        .update(|products| decrement_stock(products, &order_req.product_ids))
        .await
    {
        logger::log_error(&format!("Failed to persist stock update: {e}"));
        logger::log_api_request("POST", "/api/order", 500);
        return server_error("Failed to update stock");
    }

    let now = chrono::Local::now();
    let order = Order {
        id: now.timestamp_millis(),
        customer_name: order_req.customer_name,
        phone: order_req.phone,
        governorate: order_req.governorate,
        area: order_req.area,
        items: order_req.items,
        total: order_req.total,
        date: now.format("%Y-%m-%d %H:%M:%S").to_string(),
    };

    if let Err(e) = state.stores.orders.append(order.clone()).await {
        logger::log_error(&format!("Failed to persist order: {e}"));
        logger::log_api_request("POST", "/api/order", 500);
        return server_error("Failed to save order");
    }
    logger::log_order_created(order.id, order.total);

    let phone = notify::normalize_phone(&order.phone);
    let message = notify::format_order_message(&order);
    let whatsapp_url = notify::whatsapp_link(&phone, &message);

    match state.notifier.send_message(&message).await {
        Ok(()) => {
            logger::log_api_request("POST", "/api/order", 200);
            json_response(
                StatusCode::OK,
                &OrderResponse {
                    success: true,
                    order_id: order.id,
                    whatsapp_url,
                },
            )
        }
        Err(e) => {
            // The order is already committed; only the notification failed.
            logger::log_notify_failure(&format!("Order {}: {e}", order.id));
            logger::log_api_request("POST", "/api/order", 500);
            json_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                &OrderResponse {
                    success: false,
                    order_id: order.id,
                    whatsapp_url,
                },
            )
        }
    }
}

/// `POST /api/admin/products` - create a product from a multipart form
pub async fn create_product(
    req: Request<hyper::body::Incoming>,
    state: Arc<AppState>,
) -> Response<http_body_util::Full<Bytes>> {
    let form = match read_multipart(req, "/api/admin/products").await {
        Ok(form) => form,
        Err(resp) => return resp,
    };

    let Some(name) = form.field("name").map(ToString::to_string) else {
        logger::log_api_request("POST", "/api/admin/products", 400);
        return bad_request("Missing field: name");
    };
    let price = match form.numeric_field::<f64>("price") {
        Ok(v) => v,
        Err(e) => {
            logger::log_api_request("POST", "/api/admin/products", 400);
            return bad_request(&e);
        }
    };
    let discount = match form.field("discount") {
        Some(_) => match form.numeric_field::<f64>("discount") {
            Ok(v) => v,
            Err(e) => {
                logger::log_api_request("POST", "/api/admin/products", 400);
                return bad_request(&e);
            }
        },
        None => 0.0,
    };
    let stock = match form.numeric_field::<u32>("stock") {
        Ok(v) => v,
        Err(e) => {
            logger::log_api_request("POST", "/api/admin/products", 400);
            return bad_request(&e);
        }
    };
    let Some(file) = form.file else {
        logger::log_api_request("POST", "/api/admin/products", 400);
        return bad_request("Missing image file");
    };

    let image = match save_upload(Path::new(&state.config.storage.uploads_dir), file).await {
        Ok(path) => path,
        Err(e) => {
            logger::log_error(&format!("Failed to store upload: {e}"));
            logger::log_api_request("POST", "/api/admin/products", 500);
            return server_error("Failed to store image");
        }
    };

    let product = Product {
        id: chrono::Local::now().timestamp_millis(),
        name,
        price,
        discount,
        stock,
        image,
    };

    match state.stores.products.append(product.clone()).await {
        Ok(()) => {
            logger::log_api_request("POST", "/api/admin/products", 200);
            json_response(StatusCode::OK, &product)
        }
        Err(e) => {
            logger::log_error(&format!("Failed to persist product: {e}"));
            logger::log_api_request("POST", "/api/admin/products", 500);
            server_error("Failed to save product")
        }
    }
}

/// `DELETE /api/admin/products/:id` - remove a product; no-op when absent
pub async fn delete_product(
    state: Arc<AppState>,
    id: &str,
) -> Response<http_body_util::Full<Bytes>> {
    let Ok(id) = id.parse::<i64>() else {
        logger::log_api_request("DELETE", "/api/admin/products/:id", 400);
        return bad_request("Invalid product id");
    };

    let result = state
        .stores
        .products
        .update(|products| {
            if let Some(pos) = products.iter().position(|p| p.id == id) {
                products.remove(pos);
            }
        })
        .await;

    match result {
        Ok(()) => {
            logger::log_api_request("DELETE", "/api/admin/products/:id", 200);
            json_response(StatusCode::OK, &MutationResponse { success: true })
        }
        Err(e) => {
            logger::log_error(&format!("Failed to persist product removal: {e}"));
            logger::log_api_request("DELETE", "/api/admin/products/:id", 500);
            server_error("Failed to delete product")
        }
    }
}

/// `POST /api/admin/slider` - append a slider image from a multipart form
pub async fn create_slider_entry(
    req: Request<hyper::body::Incoming>,
    state: Arc<AppState>,
) -> Response<http_body_util::Full<Bytes>> {
    let form = match read_multipart(req, "/api/admin/slider").await {
        Ok(form) => form,
        Err(resp) => return resp,
    };

    let Some(file) = form.file else {
        logger::log_api_request("POST", "/api/admin/slider", 400);
        return bad_request("Missing image file");
    };

    let image = match save_upload(Path::new(&state.config.storage.uploads_dir), file).await {
        Ok(path) => path,
        Err(e) => {
            logger::log_error(&format!("Failed to store upload: {e}"));
            logger::log_api_request("POST", "/api/admin/slider", 500);
            return server_error("Failed to store image");
        }
    };

    let entry = SliderImage { image };
    match state.stores.slider.append(entry.clone()).await {
        Ok(()) => {
            logger::log_api_request("POST", "/api/admin/slider", 200);
            json_response(StatusCode::OK, &entry)
        }
        Err(e) => {
            logger::log_error(&format!("Failed to persist slider entry: {e}"));
            logger::log_api_request("POST", "/api/admin/slider", 500);
            server_error("Failed to save slider entry")
        }
    }
}

/// `DELETE /api/admin/slider/:index` - remove the entry at a position
///
/// Subsequent entries shift down; an out-of-range index is rejected.
pub async fn delete_slider_entry(
    state: Arc<AppState>,
    index: &str,
) -> Response<http_body_util::Full<Bytes>> {
    let Ok(index) = index.parse::<usize>() else {
        logger::log_api_request("DELETE", "/api/admin/slider/:index", 400);
        return bad_request("Invalid slider index");
    };

    let result = state
        .stores
        .slider
        .update(|entries| {
            if index < entries.len() {
                entries.remove(index);
                true
            } else {
                false
            }
        })
        .await;

    match result {
        Ok(true) => {
            logger::log_api_request("DELETE", "/api/admin/slider/:index", 200);
            json_response(StatusCode::OK, &MutationResponse { success: true })
        }
        Ok(false) => {
            logger::log_api_request("DELETE", "/api/admin/slider/:index", 400);
            bad_request("Slider index out of range")
        }
        Err(e) => {
            logger::log_error(&format!("Failed to persist slider removal: {e}"));
            logger::log_api_request("DELETE", "/api/admin/slider/:index", 500);
            server_error("Failed to delete slider entry")
        }
    }
}

/// Collect a multipart request body and decode its form
async fn read_multipart(
    req: Request<hyper::body::Incoming>,
    path: &str,
) -> Result<multipart::UploadForm, Response<http_body_util::Full<Bytes>>> {
    let boundary = multipart::parse_boundary(
        req.headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok()),
    );
    let Some(boundary) = boundary else {
        logger::log_api_request("POST", path, 400);
        return Err(bad_request("Expected multipart/form-data body"));
    };

    let body = match req.collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) => {
            logger::log_api_request("POST", path, 400);
            return Err(bad_request(&format!("Failed to read request body: {e}")));
        }
    };

    multipart::parse_form(body, boundary).await.map_err(|e| {
        logger::log_api_request("POST", path, 400);
        bad_request(&format!("Invalid multipart body: {e}"))
    })
}

/// Store an uploaded image under the uploads directory
///
/// The stored filename is timestamp-prefixed to avoid collisions. Returns
/// the URL path clients use to fetch the image.
async fn save_upload(uploads_dir: &Path, file: UploadedFile) -> std::io::Result<String> {
    let filename = format!(
        "{}_{}",
        chrono::Local::now().timestamp_millis(),
        multipart::sanitize_filename(&file.filename)
    );
    let dest = uploads_dir.join(&filename);
    tokio::fs::write(&dest, &file.data).await?;
    Ok(format!("/uploads/{filename}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use hyper::body::Bytes;

    #[tokio::test]
    async fn test_save_upload_stores_file_and_returns_url_path() {
        let dir = tempfile::tempdir().unwrap();
        let file = UploadedFile {
            filename: "shoes.png".to_string(),
            data: Bytes::from_static(b"\x89PNG fake bytes"),
        };

        let url_path = save_upload(dir.path(), file).await.unwrap();

        assert!(url_path.starts_with("/uploads/"));
        assert!(url_path.ends_with("_shoes.png"));

        // The stored file carries the same name as the URL path and the
        // uploaded bytes.
        let stored_name = url_path.strip_prefix("/uploads/").unwrap();
        let stored = std::fs::read(dir.path().join(stored_name)).unwrap();
        assert_eq!(&stored[..], b"\x89PNG fake bytes");
    }

    #[tokio::test]
    async fn test_save_upload_sanitizes_hostile_filenames() {
        let dir = tempfile::tempdir().unwrap();
        let file = UploadedFile {
            filename: "../../etc/passwd".to_string(),
            data: Bytes::from_static(b"data"),
        };

        let url_path = save_upload(dir.path(), file).await.unwrap();
        assert!(url_path.ends_with("_passwd"));

        // Exactly one file, inside the uploads directory.
        let entries: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }
}
