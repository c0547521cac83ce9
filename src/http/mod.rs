//! HTTP protocol layer module
//!
//! Protocol helpers shared by the API handlers and the asset file handler,
//! independent of the ingestion logic.

pub mod cache;
pub mod cors;
pub mod mime;
pub mod response;
pub mod uri;

// Re-export commonly used types
pub use response::{
    build_304_response, build_404_response, build_405_response, build_413_response,
    build_422_response, build_cached_response, build_redirect_response_with_code, error_response,
    json_response, HttpResponse,
};
