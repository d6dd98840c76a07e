//! Example: Exporting device metrics as OpenTSDB data points.
//!
//! This example queries plain and per-protocol byte counters for a couple of
//! devices over the last five minutes and prints the resulting data points as
//! an OpenTSDB `/api/put` body.
//!
//! Run with: RUST_LOG=hophop_sdk=debug cargo run --example opentsdb_export

use chrono::{Duration as ChronoDuration, Utc};
use hophop_sdk::{Cycle, HopClient, HopResult, MetricSpec, ObjectType, QueryScope};
use std::collections::HashMap;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> HopResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let client = HopClient::builder()
        .base_url("https://extrahop.example.com")
        .api_key("your-api-key")
        .timeout(Duration::from_secs(30))
        .build()?;

    // Object ids as listed by the appliance, mapped to the host tag value
    let devices = HashMap::from([(12, "web01".to_string()), (13, "db01".to_string())]);

    let until = Utc::now();
    let scope = QueryScope::between(
        Cycle::ThirtySeconds,
        "net",
        ObjectType::Device,
        until - ChronoDuration::minutes(5),
        until,
    );

    let mut points = client
        .metrics()
        .simple_data_points(scope.clone(), &["bytes_in", "bytes_out"], "host", &devices)
        .await?;
    println!("Fetched {} plain data points", points.len());

    let specs = [MetricSpec::new("bytes_in")
        .key1(".*", "proto")
        .opentsdb_metric("extrahop.device.l7.bytes_in")];
    let scope = QueryScope {
        category: "app_detail".to_string(),
        ..scope
    };
    let keyed = client
        .metrics()
        .keyed_data_points(scope, &specs, "host", &devices)
        .await?;
    println!("Fetched {} per-protocol data points", keyed.len());
    points.extend(keyed);

    println!("{}", serde_json::to_string_pretty(&points)?);

    Ok(())
}
