//! API endpoint groups of the ExtraHop REST API.

pub mod metrics;

pub use metrics::MetricsApi;
