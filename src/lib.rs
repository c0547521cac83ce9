//! static-drop
//!
//! A small static-content hosting service. Clients upload files or paste text,
//! each submission is stored as one file named after a fresh UUID, and the
//! service lists, serves and redirects to the stored assets.

pub mod config;
pub mod handler;
pub mod http;
pub mod id;
pub mod ingest;
pub mod logger;
pub mod registry;
pub mod resource;
pub mod server;
pub mod store;

pub use id::ResourceId;
pub use ingest::{IngestError, Ingested, IngestionService};
pub use registry::ResourceRegistry;
pub use resource::{Resource, ResourceKind};
pub use store::{AssetStore, StorageWriteError};
