//! Cross-origin policy
//!
//! Any origin may call the API with credentials. Since `*` is not honored
//! together with credentials, the request's `Origin` is echoed back.

use hyper::header::{self, HeaderMap, HeaderValue};
use hyper::StatusCode;

use super::response::HttpResponse;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;

pub const ALLOWED_METHODS: &str = "GET, POST, OPTIONS";
const PREFLIGHT_MAX_AGE: &str = "600";

/// Add the CORS response headers for a request carrying `origin`
pub fn apply_cors_headers(resp: &mut HttpResponse, origin: Option<&HeaderValue>) {
    let headers = resp.headers_mut();
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        origin.cloned().unwrap_or_else(|| HeaderValue::from_static("*")),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_CREDENTIALS,
        HeaderValue::from_static("true"),
    );
    headers.append(header::VARY, HeaderValue::from_static("Origin"));
}

/// Answer an `OPTIONS` preflight
pub fn build_preflight_response(request_headers: &HeaderMap, enable_cors: bool) -> HttpResponse {
    let mut resp = Response::builder()
        .status(StatusCode::NO_CONTENT)
        .header(header::ALLOW, ALLOWED_METHODS)
        .body(Full::new(Bytes::new()))
        .unwrap_or_else(|_| Response::new(Full::new(Bytes::new())));

    if !enable_cors {
        return resp;
    }

    apply_cors_headers(&mut resp, request_headers.get(header::ORIGIN));
    let headers = resp.headers_mut();
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(ALLOWED_METHODS),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        request_headers
            .get(header::ACCESS_CONTROL_REQUEST_HEADERS)
            .cloned()
            .unwrap_or_else(|| HeaderValue::from_static("*")),
    );
    headers.insert(
        header::ACCESS_CONTROL_MAX_AGE,
        HeaderValue::from_static(PREFLIGHT_MAX_AGE),
    );
    resp
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_origin_is_echoed() {
        let mut resp = Response::new(Full::new(Bytes::new()));
        let origin = HeaderValue::from_static("https://app.example");
        apply_cors_headers(&mut resp, Some(&origin));

        assert_eq!(resp.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "https://app.example");
        assert_eq!(resp.headers()[header::ACCESS_CONTROL_ALLOW_CREDENTIALS], "true");
    }

    #[test]
    fn test_wildcard_without_origin() {
        let mut resp = Response::new(Full::new(Bytes::new()));
        apply_cors_headers(&mut resp, None);
        assert_eq!(resp.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    }

    #[test]
    fn test_preflight() {
        let mut request_headers = HeaderMap::new();
        request_headers.insert(header::ORIGIN, HeaderValue::from_static("https://app.example"));
        request_headers.insert(
            header::ACCESS_CONTROL_REQUEST_HEADERS,
            HeaderValue::from_static("content-type"),
        );

        let resp = build_preflight_response(&request_headers, true);

        assert_eq!(resp.status(), StatusCode::NO_CONTENT);
        assert_eq!(resp.headers()[header::ACCESS_CONTROL_ALLOW_METHODS], ALLOWED_METHODS);
        assert_eq!(resp.headers()[header::ACCESS_CONTROL_ALLOW_HEADERS], "content-type");
        assert_eq!(resp.headers()[header::ACCESS_CONTROL_MAX_AGE], "600");
    }

    #[test]
    fn test_preflight_without_cors() {
        let resp = build_preflight_response(&HeaderMap::new(), false);
        assert!(resp.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).is_none());
        assert_eq!(resp.headers()[header::ALLOW], ALLOWED_METHODS);
    }
}
