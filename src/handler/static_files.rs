//! Stored asset serving module
//!
//! Serves files from the storage root under the public URL prefix. Only flat
//! file names are accepted, matching the store's layout.

use crate::http::{self, cache, mime, HttpResponse};
use crate::logger;
use hyper::body::Bytes;
use std::path::Path;
use tokio::fs;

/// Serve one stored asset by file name
pub async fn serve_asset(
    root: &Path,
    name: &str,
    if_none_match: Option<&str>,
    is_head: bool,
) -> HttpResponse {
    match load_asset(root, name).await {
        Some(content) => build_asset_response(content, name, if_none_match, is_head),
        None => http::build_404_response(),
    }
}

/// Read an asset, refusing names that would resolve outside `root`
pub async fn load_asset(root: &Path, name: &str) -> Option<Vec<u8>> {
    if name.is_empty() || name.contains(['/', '\\']) || name == "." || name == ".." {
        return None;
    }

    let root_canonical = match fs::canonicalize(root).await {
        Ok(p) => p,
        Err(e) => {
            logger::log_warning(&format!(
                "Storage directory not found or inaccessible '{}': {e}",
                root.display()
            ));
            return None;
        }
    };

    // Missing files are a plain 404, not worth a log line
    let file_canonical = fs::canonicalize(root.join(name)).await.ok()?;
    if !file_canonical.starts_with(&root_canonical) {
        logger::log_warning(&format!(
            "Path escape blocked: {name} -> {}",
            file_canonical.display()
        ));
        return None;
    }

    match fs::read(&file_canonical).await {
        Ok(content) => Some(content),
        Err(e) => {
            logger::log_error(&format!(
                "Failed to read asset '{}': {e}",
                file_canonical.display()
            ));
            None
        }
    }
}

fn build_asset_response(
    content: Vec<u8>,
    name: &str,
    if_none_match: Option<&str>,
    is_head: bool,
) -> HttpResponse {
    let etag = cache::generate_etag(&content);
    if cache::check_etag_match(if_none_match, &etag) {
        return http::build_304_response(&etag);
    }
    http::build_cached_response(
        Bytes::from(content),
        mime::content_type_for(name),
        &etag,
        is_head,
    )
}
