//! Client boundary for the device HTTP/JSON API.
//!
//! This crate only composes URLs and hands requests to a [`JsonTransport`].
//! Talking HTTP and decoding JSON is the transport's job.

pub mod error;
mod interface;
mod transport;

pub use error::{ApiError, Result};
pub use interface::{ApiInterface, TEST_GET_PATH};
pub use transport::{JsonObject, JsonTransport};
