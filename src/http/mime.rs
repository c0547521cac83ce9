//! MIME type detection module
//!
//! Picks a Content-Type from the extension of a stored file name.

use std::path::Path;

/// Get MIME Content-Type for a stored file name
///
/// Matching is case-insensitive; unknown or missing extensions fall back to
/// `application/octet-stream`.
///
/// # Examples
/// ```
/// use static_drop::http::mime::content_type_for;
/// assert_eq!(content_type_for("a.HTML"), "text/html; charset=utf-8");
/// assert_eq!(content_type_for("clip.mp4"), "video/mp4");
/// assert_eq!(content_type_for("noext"), "application/octet-stream");
/// ```
pub fn content_type_for(file_name: &str) -> &'static str {
    let extension = Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        // Text
        Some("html" | "htm") => "text/html; charset=utf-8",
        Some("css") => "text/css; charset=utf-8",
        Some("txt" | "md" | "log") => "text/plain; charset=utf-8",
        Some("csv") => "text/csv; charset=utf-8",
        Some("xml") => "application/xml",

        // Scripts and data
        Some("js" | "mjs") => "text/javascript; charset=utf-8",
        Some("json") => "application/json",
        Some("wasm") => "application/wasm",

        // Images
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        Some("ico") => "image/x-icon",
        Some("webp") => "image/webp",

        // Video
        Some("mp4") => "video/mp4",
        Some("webm") => "video/webm",
        Some("ogv") => "video/ogg",
        Some("mov") => "video/quicktime",

        // Audio
        Some("mp3") => "audio/mpeg",
        Some("wav") => "audio/wav",
        Some("ogg") => "audio/ogg",
        Some("flac") => "audio/flac",

        // Fonts
        Some("woff") => "font/woff",
        Some("woff2") => "font/woff2",
        Some("ttf") => "font/ttf",

        // Documents and archives
        Some("pdf") => "application/pdf",
        Some("zip") => "application/zip",
        Some("gz") => "application/gzip",
        Some("tar") => "application/x-tar",

        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_common_types() {
        assert_eq!(content_type_for("x.html"), "text/html; charset=utf-8");
        assert_eq!(content_type_for("x.txt"), "text/plain; charset=utf-8");
        assert_eq!(content_type_for("x.PDF"), "application/pdf");
        assert_eq!(content_type_for("x.tar.gz"), "application/gzip");
    }

    #[test]
    fn test_unknown_extension() {
        assert_eq!(content_type_for("x.xyz"), "application/octet-stream");
        assert_eq!(content_type_for("x"), "application/octet-stream");
        assert_eq!(content_type_for("x."), "application/octet-stream");
    }
}
