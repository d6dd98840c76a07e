//! # hophop SDK
//!
//! Rust client for the ExtraHop REST API v1 metrics endpoint, with
//! projection of the results onto OpenTSDB data points.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use hophop_sdk::{Cycle, HopClient, HopResult, ObjectType, QueryScope};
//! use std::collections::HashMap;
//!
//! #[tokio::main]
//! async fn main() -> HopResult<()> {
//!     let client = HopClient::new("https://extrahop.example.com", "api-key")?;
//!
//!     let scope = QueryScope::new(Cycle::ThirtySeconds, "net", ObjectType::Device, -60_000, 0);
//!     let devices = HashMap::from([(42, "web01".to_string())]);
//!
//!     let points = client
//!         .metrics()
//!         .simple_data_points(scope, &["bytes_in", "bytes_out"], "device", &devices)
//!         .await?;
//!     for point in &points {
//!         println!("{} {} {} {}", point.metric, point.timestamp, point.value, point.tags);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Faceted metrics
//!
//! ```rust,no_run
//! use hophop_sdk::{Cycle, HopClient, MetricSpec, ObjectType, QueryScope};
//! use std::collections::HashMap;
//!
//! # async fn example() -> hophop_sdk::HopResult<()> {
//! let client = HopClient::new("https://extrahop.example.com", "api-key")?;
//! let specs = [MetricSpec::new("bytes")
//!     .key1(".*", "proto")
//!     .opentsdb_metric("extrahop.device.bytes")];
//! let scope = QueryScope::new(Cycle::Auto, "net_detail", ObjectType::Device, -60_000, 0);
//!
//! let response = client.metrics().keyed_query(scope, &specs, &[42]).await?;
//! let names = HashMap::from([(42, "web01".to_string())]);
//! let points = response.opentsdb_data_points(&specs, "device", &names)?;
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod transport;

// Re-export main client
pub use client::{HopClient, HopClientBuilder};
pub use config::ClientConfig;
pub use error::{HopError, HopResult};

// Re-export core types for convenience
pub use hophop_core::{
    // Query
    Cycle, KeyPair, MetricQuery, MetricSpec, ObjectType, QueryScope,
    // Response
    FacetKey, KeyedMetricResponse, KeyedValue, MetricResponse, MetricResponseBase, MetricStat,
    SimpleMetricResponse,
    // Data points
    DataPoint, MultiDataPoint, TagSet,
    // Projection
    ProjectionError, ProjectionErrorKind,
};
