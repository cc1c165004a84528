//! Request handler module
//!
//! Routing dispatch for the storefront server: the JSON API under `/api`,
//! the health endpoint, and static serving of the storefront page and
//! uploaded images.

pub mod router;
pub mod static_files;

// Re-export main entry point
pub use router::handle_request;
