//! HTTP protocol layer module
//!
//! HTTP protocol-related base functionality shared by the static file
//! handlers and the JSON API, decoupled from business logic.

pub mod mime;
pub mod response;

// Re-export commonly used builders
pub use response::{
    build_304_response, build_400_response, build_404_response, build_405_response,
    build_413_response, build_options_response,
};
