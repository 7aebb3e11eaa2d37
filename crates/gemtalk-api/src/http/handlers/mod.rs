//! HTTP request handlers.

pub mod ask;
pub mod page;
pub mod session;
