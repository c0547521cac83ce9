//! Request handler module
//!
//! Routes requests to the JSON API (upload, paste, list, redirect) or to the
//! stored asset files.

pub mod api;
pub mod router;
pub mod static_files;

// Re-export main entry point
pub use router::handle_request;
