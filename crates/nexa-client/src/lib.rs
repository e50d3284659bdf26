//! nexa-client: HTTP generation backend
//!
//! Implements the `ReplyGenerator` port from nexa-core against the
//! remote text and image generation endpoints.

pub mod http;

pub use http::HttpGenerator;
