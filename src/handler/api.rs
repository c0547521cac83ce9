//! JSON API handlers
//!
//! Decode the request, hand it to the ingestion service and map the outcome
//! to a response.

use futures_util::TryStreamExt;
use http_body_util::{BodyExt, LengthLimitError, Limited};
use hyper::body::{Body, Bytes};
use hyper::header;
use hyper::{Request, StatusCode};
use serde::{Deserialize, Serialize};
use std::io;
use std::sync::Arc;
use tokio_util::io::StreamReader;

use crate::config::AppState;
use crate::http::{self, uri, HttpResponse};
use crate::id::ResourceId;
use crate::ingest::{IngestError, Ingested, DEFAULT_PASTE_EXTENSION};
use crate::resource::Resource;

const GREETING: &str = "Welcome to the static page hosting backend!";
const UPLOAD_FIELD: &str = "file";

#[derive(Serialize)]
struct Message {
    message: &'static str,
}

/// Body of a successful upload or paste
#[derive(Serialize)]
struct IngestResponse {
    message: &'static str,
    url: String,
    id: ResourceId,
}

impl IngestResponse {
    fn new(message: &'static str, ingested: Ingested) -> Self {
        Self {
            message,
            url: ingested.url,
            id: ingested.id,
        }
    }
}

#[derive(Serialize)]
struct ListResponse {
    resources: Vec<Resource>,
}

#[derive(Debug, Deserialize)]
struct PasteContent {
    content: String,
    #[serde(default = "default_paste_extension")]
    file_extension: String,
}

fn default_paste_extension() -> String {
    DEFAULT_PASTE_EXTENSION.to_string()
}

/// `GET /`
pub fn root() -> HttpResponse {
    http::json_response(StatusCode::OK, &Message { message: GREETING })
}

/// `POST /uploadfile/`: multipart body with a `file` part, streamed to disk
pub async fn upload_file<B>(req: Request<B>, state: &Arc<AppState>) -> HttpResponse
where
    B: Body<Data = Bytes> + Send + 'static,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let boundary = req
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|ct| multer::parse_boundary(ct).ok());
    let Some(boundary) = boundary else {
        return http::build_422_response("Expected a multipart/form-data body");
    };

    let stream = Limited::new(req.into_body(), body_limit(state)).into_data_stream();
    let mut multipart = multer::Multipart::new(stream, boundary);

    let field = loop {
        match multipart.next_field().await {
            Ok(Some(field)) if field.name() == Some(UPLOAD_FIELD) => break field,
            Ok(Some(_)) => {}
            Ok(None) => {
                return http::build_422_response(&format!("Field '{UPLOAD_FIELD}' is required"));
            }
            Err(e) if exceeds_body_limit(&e) => {
                return http::build_413_response(state.config.http.max_body_size);
            }
            Err(e) => return http::build_422_response(&format!("Invalid multipart body: {e}")),
        }
    };
    let Some(filename) = field.file_name().map(ToString::to_string) else {
        return http::build_422_response(&format!("Field '{UPLOAD_FIELD}' must be a file"));
    };

    let reader = std::pin::pin!(StreamReader::new(field.map_err(io::Error::other)));
    match state.ingestion.ingest_upload(&filename, reader).await {
        Ok(ingested) => http::json_response(
            StatusCode::OK,
            &IngestResponse::new("File uploaded successfully", ingested),
        ),
        Err(e) if exceeds_body_limit(&e) => {
            http::build_413_response(state.config.http.max_body_size)
        }
        Err(e) => storage_failure("Failed to upload file", &e),
    }
}

/// `POST /pastecontent/`: JSON `{content, file_extension}`
pub async fn paste_content<B>(req: Request<B>, state: &Arc<AppState>) -> HttpResponse
where
    B: Body<Data = Bytes> + Send + 'static,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let limit = body_limit(state);
    let bytes = match Limited::new(req.into_body(), limit).collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) if e.downcast_ref::<LengthLimitError>().is_some() => {
            return http::build_413_response(state.config.http.max_body_size);
        }
        Err(e) => return http::build_422_response(&format!("Failed to read body: {e}")),
    };

    let item: PasteContent = match serde_json::from_slice(&bytes) {
        Ok(item) => item,
        Err(e) => return http::build_422_response(&format!("Invalid paste body: {e}")),
    };

    match state
        .ingestion
        .ingest_paste(&item.content, &item.file_extension)
        .await
    {
        Ok(ingested) => http::json_response(
            StatusCode::OK,
            &IngestResponse::new("Content saved successfully", ingested),
        ),
        Err(e) => storage_failure("Failed to save content", &e),
    }
}

/// `GET /list/`
pub async fn list_resources(state: &Arc<AppState>) -> HttpResponse {
    let resources = state.ingestion.list_resources().await;
    http::json_response(StatusCode::OK, &ListResponse { resources })
}

/// `GET /go/{id}`
pub async fn go_to_resource(id: &str, state: &Arc<AppState>) -> HttpResponse {
    match state.ingestion.resolve_redirect(&ResourceId::from(id)).await {
        Ok(url) => http::build_redirect_response_with_code(
            &uri::encode_location(&url),
            StatusCode::TEMPORARY_REDIRECT,
        ),
        Err(e) => {
            tracing::debug!(error = %e, "redirect lookup missed");
            http::error_response(StatusCode::NOT_FOUND, "Resource not found")
        }
    }
}

fn storage_failure(context: &str, err: &IngestError) -> HttpResponse {
    http::error_response(
        StatusCode::INTERNAL_SERVER_ERROR,
        &format!("{context}: {err}"),
    )
}

/// Whether `err` was caused by the `Limited` body cap.
///
/// The cap surfaces wrapped in `multer::Error::StreamReadFailed` while parts
/// are parsed, or inside the `io::Error` the store reports when it fires in
/// the middle of the file part.
fn exceeds_body_limit(err: &(dyn std::error::Error + 'static)) -> bool {
    let mut current = Some(err);
    while let Some(e) = current {
        if e.is::<LengthLimitError>() {
            return true;
        }
        if let Some(multer::Error::StreamReadFailed(inner)) = e.downcast_ref::<multer::Error>() {
            if exceeds_body_limit(inner.as_ref()) {
                return true;
            }
        }
        if let Some(inner) = e.downcast_ref::<io::Error>().and_then(io::Error::get_ref) {
            if exceeds_body_limit(inner) {
                return true;
            }
        }
        current = e.source();
    }
    false
}

fn body_limit(state: &AppState) -> usize {
    usize::try_from(state.config.http.max_body_size).unwrap_or(usize::MAX)
}
