// API types module
// Request/response payloads for the storefront and admin endpoints

use serde::{Deserialize, Serialize};

/// Order submission request body
#[derive(Debug, Deserialize)]
pub struct OrderRequest {
    pub customer_name: String,
    pub phone: String,
    pub governorate: String,
    pub area: String,
    /// Human-readable item description shown to the shopkeeper
    pub items: String,
    pub total: f64,
    /// Ids of the ordered products; each decrements stock by one
    #[serde(default)]
    pub product_ids: Vec<i64>,
}

/// Order submission response
///
/// `success` mirrors the notification outcome; the order itself is persisted
/// either way.
#[derive(Debug, Serialize)]
pub struct OrderResponse {
    pub success: bool,
    pub order_id: i64,
    pub whatsapp_url: String,
}

/// Generic mutation acknowledgement
#[derive(Debug, Serialize)]
pub struct MutationResponse {
    pub success: bool,
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub message: &'static str,
}

impl HealthResponse {
    pub const fn ok() -> Self {
        Self {
            status: "OK",
            message: "Sky Store is running",
        }
    }
}
