//! Image question answering: the display buffer, the decoder port, and the
//! per-submission handler used by the web page.

pub mod decoder;
pub mod history;
pub mod service;
