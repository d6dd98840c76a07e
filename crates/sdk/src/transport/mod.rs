//! Transport layer for the ExtraHop client.

pub mod http;

pub use http::HttpTransport;
