//! HTTP layer for the image question page.
//!
//! Axum router serving the page at `/`, a JSON API at `/api/v1/` using the
//! envelope response format, and `/health`.

pub mod error;
pub mod handlers;
pub mod response;
pub mod router;
