//! Utility functions and helpers.

pub mod http;
pub mod url;

pub use http::{Fetcher, HttpTransport, Query, create_async_client, fetch_json};
