//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: preflight handling, body size
//! validation, route matching, CORS decoration and access logging.

use crate::config::AppState;
use crate::handler::{api, static_files};
use crate::http::{self, cors, uri, HttpResponse};
use crate::logger::{self, AccessLogEntry};
use hyper::body::{Body, Bytes};
use hyper::header::{self, HeaderValue};
use hyper::{Method, Request};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

/// Request metadata kept for logging and header decoration
struct RequestInfo {
    method: Method,
    path: String,
    query: Option<String>,
    version: hyper::Version,
    origin: Option<HeaderValue>,
    referer: Option<String>,
    user_agent: Option<String>,
}

impl RequestInfo {
    fn from_request<B>(req: &Request<B>) -> Self {
        let header_str = |name: header::HeaderName| {
            req.headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(ToString::to_string)
        };
        Self {
            method: req.method().clone(),
            path: req.uri().path().to_string(),
            query: req.uri().query().map(ToString::to_string),
            version: req.version(),
            origin: req.headers().get(header::ORIGIN).cloned(),
            referer: header_str(header::REFERER),
            user_agent: header_str(header::USER_AGENT),
        }
    }
}

/// Main entry point for HTTP request handling
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<HttpResponse, Infallible>
where
    B: Body<Data = Bytes> + Send + 'static,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let started = Instant::now();
    let info = RequestInfo::from_request(&req);
    let enable_cors = state.config.http.enable_cors;

    let mut response = if info.method == Method::OPTIONS {
        cors::build_preflight_response(req.headers(), enable_cors)
    } else if let Some(resp) = check_body_size(&req, state.config.http.max_body_size) {
        resp
    } else {
        route_request(req, &state).await
    };

    if enable_cors && info.method != Method::OPTIONS {
        cors::apply_cors_headers(&mut response, info.origin.as_ref());
    }
    if let Ok(server) = HeaderValue::from_str(&state.config.http.server_name) {
        response.headers_mut().insert(header::SERVER, server);
    }

    if state.access_log_enabled() {
        log_access(&info, &response, peer_addr, started, &state);
    }
    Ok(response)
}

/// Validate Content-Length header and return 413 if exceeded
fn check_body_size<B>(req: &Request<B>, max_body_size: u64) -> Option<HttpResponse> {
    let content_length = req.headers().get(header::CONTENT_LENGTH)?;
    let Ok(size_str) = content_length.to_str() else {
        logger::log_warning("Content-Length header contains non-ASCII characters");
        return None;
    };
    match size_str.parse::<u64>() {
        Ok(size) if size > max_body_size => {
            logger::log_warning(&format!(
                "Request body too large: {size} bytes (max: {max_body_size})"
            ));
            Some(http::build_413_response(max_body_size))
        }
        Ok(_) => None,
        Err(_) => {
            logger::log_warning(&format!(
                "Invalid Content-Length value: '{size_str}', skipping size check"
            ));
            None
        }
    }
}

/// Route request based on method and path
async fn route_request<B>(req: Request<B>, state: &Arc<AppState>) -> HttpResponse
where
    B: Body<Data = Bytes> + Send + 'static,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let is_head = method == Method::HEAD;

    if let Some(raw_name) = asset_name(&path, &state.config.storage.url_prefix) {
        return match method {
            Method::GET | Method::HEAD => {
                // Decode first so the flat-name checks see the real name
                let Some(name) = uri::decode_segment(raw_name) else {
                    return http::build_404_response();
                };
                let if_none_match = req
                    .headers()
                    .get(header::IF_NONE_MATCH)
                    .and_then(|v| v.to_str().ok());
                static_files::serve_asset(
                    state.ingestion.store().root(),
                    &name,
                    if_none_match,
                    is_head,
                )
                .await
            }
            _ => http::build_405_response("GET, HEAD"),
        };
    }

    match (method, path.as_str()) {
        (Method::GET | Method::HEAD, "/") => api::root(),
        (Method::POST, "/uploadfile/" | "/uploadfile") => api::upload_file(req, state).await,
        (Method::POST, "/pastecontent/" | "/pastecontent") => {
            api::paste_content(req, state).await
        }
        (Method::GET, "/list/" | "/list") => api::list_resources(state).await,
        (Method::GET, p) if p.starts_with("/go/") => match redirect_id(p) {
            Some(id) => api::go_to_resource(id, state).await,
            None => http::build_404_response(),
        },
        (_, "/") => http::build_405_response("GET, HEAD"),
        (_, "/uploadfile/" | "/uploadfile" | "/pastecontent/" | "/pastecontent") => {
            http::build_405_response("POST")
        }
        (_, "/list/" | "/list") => http::build_405_response("GET"),
        (_, p) if redirect_id(p).is_some() => http::build_405_response("GET"),
        _ => http::build_404_response(),
    }
}

/// `/go/{id}` with a single non-empty segment
fn redirect_id(path: &str) -> Option<&str> {
    path.strip_prefix("/go/")
        .filter(|id| !id.is_empty() && !id.contains('/'))
}

/// File name below the public asset prefix
fn asset_name<'a>(path: &'a str, url_prefix: &str) -> Option<&'a str> {
    let prefix = url_prefix.trim_end_matches('/');
    path.strip_prefix(prefix)?.strip_prefix('/')
}

fn log_access(
    info: &RequestInfo,
    response: &HttpResponse,
    peer_addr: SocketAddr,
    started: Instant,
    state: &AppState,
) {
    let mut entry = AccessLogEntry::new(
        peer_addr.ip().to_string(),
        info.method.to_string(),
        info.path.clone(),
    );
    entry.query.clone_from(&info.query);
    entry.http_version = match info.version {
        hyper::Version::HTTP_10 => "1.0",
        hyper::Version::HTTP_2 => "2",
        _ => "1.1",
    }
    .to_string();
    entry.status = response.status().as_u16();
    entry.body_bytes = usize::try_from(response.body().size_hint().exact().unwrap_or(0))
        .unwrap_or(usize::MAX);
    entry.referer.clone_from(&info.referer);
    entry.user_agent.clone_from(&info.user_agent);
    entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);

    logger::log_access(&entry, &state.config.logging.access_log_format);
}
