//! JSON-over-HTTP client for the MediCore platform.
//!
//! Endpoints are opaque collaborators: [`types`] fixes the request shapes and
//! models only the response fields the desk reads, [`client`] performs the
//! calls, and [`error`] splits failures into the two kinds the UI handles
//! (transport trouble vs. an application-level rejection).

pub mod client;
pub mod error;
pub mod types;

pub use client::ApiClient;
pub use error::{ApiError, ApiResult};
