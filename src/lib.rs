//! Sky Store - storefront backend
//!
//! Single-process HTTP service that serves the storefront page and uploaded
//! images, exposes JSON endpoints for products, the promotional slider and
//! orders, and forwards new orders to a chat-bot messaging API.

pub mod api;
pub mod config;
pub mod handler;
pub mod http;
pub mod logger;
pub mod notify;
pub mod store;
