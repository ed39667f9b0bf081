//! HTTP API layer for the fasum admin backend.
//!
//! This crate provides the REST API and real-time updates:
//!
//! - **Endpoints**: dashboard CRUD, analytics, and export APIs
//! - **Extractors**: authentication and role checks
//! - **Middleware**: bearer-token session resolution
//! - **Events**: Server-Sent Events for live dashboard refresh
//!
//! Built on Axum 0.8 with Tower middleware stack.

pub mod endpoints;
pub mod events;
pub mod extractors;
pub mod middleware;
pub mod response;

pub use endpoints::router;
pub use events::{ChangeBroadcaster, ChangeEvent};
