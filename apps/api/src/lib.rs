//! Feedgraph API library
//!
//! This module exposes the core API components for use by the server binary
//! and in integration tests.

pub mod batch;
pub mod config;
pub mod error;
pub mod graphql;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod store;

// Re-export commonly used types
pub use error::ApiError;
pub use graphql::{build_schema, FeedSchema, RequestContext};
pub use store::{MemoryStore, PgStore, SharedStore, Store};
