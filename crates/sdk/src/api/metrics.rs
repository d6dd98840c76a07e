//! Metrics API endpoints.

use crate::client::HopClient;
use crate::error::HopResult;
use hophop_core::{
    KeyedMetricResponse, MetricQuery, MetricResponse, MetricSpec, MultiDataPoint, QueryScope,
    SimpleMetricResponse,
};
use serde::de::DeserializeOwned;
use std::collections::HashMap;

/// Resource path of the metrics endpoint, relative to `/api/v1`.
pub const METRICS_PATH: &str = "metrics";

/// Metrics API for querying time-series stats.
pub struct MetricsApi<'a> {
    client: &'a HopClient,
}

impl<'a> MetricsApi<'a> {
    pub(crate) fn new(client: &'a HopClient) -> Self {
        Self { client }
    }

    /// Post an arbitrary metric query.
    ///
    /// `V` must match the shape the specs produce: `i64` without facet keys,
    /// `Vec<KeyedValue>` with them.
    pub async fn query<V: DeserializeOwned>(
        &self,
        query: &MetricQuery,
    ) -> HopResult<MetricResponse<V>> {
        self.client.http.post(METRICS_PATH, query).await
    }

    /// Query metrics without facets, one spec per name.
    pub async fn simple_query<S: AsRef<str>>(
        &self,
        scope: QueryScope,
        metric_names: &[S],
        object_ids: &[i64],
    ) -> HopResult<SimpleMetricResponse> {
        let query = MetricQuery::simple(scope, metric_names, object_ids);
        self.query(&query).await
    }

    /// Query metrics split by facet keys, e.g. bytes by L7 protocol.
    pub async fn keyed_query(
        &self,
        scope: QueryScope,
        specs: &[MetricSpec],
        object_ids: &[i64],
    ) -> HopResult<KeyedMetricResponse> {
        let query = MetricQuery::keyed(scope, specs, object_ids);
        self.query(&query).await
    }

    /// Run a simple query for every object in `objects` and project the
    /// result, naming points after `metric_names`.
    pub async fn simple_data_points<S: AsRef<str>>(
        &self,
        scope: QueryScope,
        metric_names: &[S],
        object_key: &str,
        objects: &HashMap<i64, String>,
    ) -> HopResult<MultiDataPoint> {
        let response = self
            .simple_query(scope, metric_names, &object_ids(objects))
            .await?;
        Ok(response.opentsdb_data_points(metric_names, object_key, objects)?)
    }

    /// Run a keyed query for every object in `objects` and project the result.
    pub async fn keyed_data_points(
        &self,
        scope: QueryScope,
        specs: &[MetricSpec],
        object_key: &str,
        objects: &HashMap<i64, String>,
    ) -> HopResult<MultiDataPoint> {
        let response = self.keyed_query(scope, specs, &object_ids(objects)).await?;
        Ok(response.opentsdb_data_points(specs, object_key, objects)?)
    }
}

fn object_ids(objects: &HashMap<i64, String>) -> Vec<i64> {
    let mut ids: Vec<i64> = objects.keys().copied().collect();
    ids.sort_unstable();
    ids
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HopError;
    use hophop_core::{Cycle, ObjectType, ProjectionErrorKind};
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> HopClient {
        HopClient::new(&server.uri(), "test-key").unwrap()
    }

    fn scope() -> QueryScope {
        QueryScope::new(Cycle::FiveMinutes, "net", ObjectType::Device, 1000, 2000)
    }

    fn objects() -> HashMap<i64, String> {
        HashMap::from([(42, "host1".to_string()), (7, "host2".to_string())])
    }

    #[tokio::test]
    async fn test_simple_query() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/v1/metrics"))
            .and(header("Authorization", "ExtraHop apikey=test-key"))
            .and(body_json(json!({
                "cycle": "5min",
                "from": 1000,
                "metric_category": "net",
                "metric_specs": [{"name": "bytes_in"}, {"name": "bytes_out"}],
                "object_ids": [42],
                "object_type": "device",
                "until": 2000
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "cycle": "5min",
                "from": 1000,
                "node_id": 0,
                "until": 2000,
                "stats": [{"duration": 300000, "oid": 42, "time": 1500, "values": [10, 20]}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let response = client(&server)
            .metrics()
            .simple_query(scope(), &["bytes_in", "bytes_out"], &[42])
            .await
            .unwrap();

        assert_eq!(response.base.cycle, "5min");
        assert_eq!(response.stats[0].values, vec![10, 20]);
    }

    #[tokio::test]
    async fn test_keyed_query_sends_keys_only() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/v1/metrics"))
            .and(body_json(json!({
                "cycle": "30sec",
                "from": 1000,
                "metric_category": "net",
                "metric_specs": [{"name": "bytes", "calc_type": "sum", "key1": ".*"}],
                "object_ids": [42],
                "object_type": "device",
                "until": 2000
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "cycle": "30sec",
                "from": 1000,
                "node_id": 0,
                "until": 2000,
                "stats": [{
                    "duration": 30000,
                    "oid": 42,
                    "time": 60000,
                    "values": [[{"key": {"key_type": "string", "str": "tcp"}, "value": 5, "vtype": "count"}]]
                }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let specs = [MetricSpec::new("bytes")
            .calc_type("sum")
            .key1(".*", "proto")
            .opentsdb_metric("extrahop.bytes")];
        let scope = QueryScope {
            cycle: Cycle::ThirtySeconds,
            ..scope()
        };

        let response = client(&server)
            .metrics()
            .keyed_query(scope, &specs, &[42])
            .await
            .unwrap();

        assert_eq!(response.stats[0].values[0][0].key.str, "tcp");
    }

    #[tokio::test]
    async fn test_keyed_data_points() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/v1/metrics"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "cycle": "5min",
                "from": 1000,
                "node_id": 0,
                "until": 2000,
                "stats": [{
                    "duration": 300000,
                    "oid": 42,
                    "time": 60000,
                    "values": [[{"key": {"key_type": "string", "str": "tcp"}, "value": 5, "vtype": "count"}]]
                }]
            })))
            .mount(&server)
            .await;

        let specs = [MetricSpec::new("bytes").key1(".*", "proto")];
        let points = client(&server)
            .metrics()
            .keyed_data_points(scope(), &specs, "device", &objects())
            .await
            .unwrap();

        assert_eq!(points.len(), 1);
        assert_eq!(points[0].metric, "bytes");
        assert_eq!(points[0].timestamp, 60);
        assert_eq!(points[0].value, 5);
        assert_eq!(points[0].tags.to_string(), "{device=host1,proto=tcp}");
    }

    #[tokio::test]
    async fn test_simple_data_points_requests_all_objects() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/v1/metrics"))
            .and(body_json(json!({
                "cycle": "5min",
                "from": 1000,
                "metric_category": "net",
                "metric_specs": [{"name": "bytes_in"}],
                "object_ids": [7, 42],
                "object_type": "device",
                "until": 2000
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "cycle": "5min",
                "from": 1000,
                "node_id": 0,
                "until": 2000,
                "stats": [
                    {"duration": 300000, "oid": 7, "time": 60000, "values": [1]},
                    {"duration": 300000, "oid": 42, "time": 60000, "values": [2]}
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let points = client(&server)
            .metrics()
            .simple_data_points(scope(), &["bytes_in"], "device", &objects())
            .await
            .unwrap();

        assert_eq!(points.len(), 2);
        assert_eq!(points[0].tags.get("device"), Some("host2"));
        assert_eq!(points[1].tags.get("device"), Some("host1"));
    }

    #[tokio::test]
    async fn test_data_points_projection_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/v1/metrics"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "cycle": "5min",
                "from": 1000,
                "node_id": 0,
                "until": 2000,
                "stats": [{"duration": 300000, "oid": 99, "time": 60000, "values": [1]}]
            })))
            .mount(&server)
            .await;

        let err = client(&server)
            .metrics()
            .simple_data_points(scope(), &["bytes_in"], "device", &objects())
            .await
            .unwrap_err();

        match err {
            HopError::Projection(e) => {
                assert_eq!(e.kind, ProjectionErrorKind::NameNotFound { oid: 99 })
            }
            other => panic!("Expected projection error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_query_surfaces_api_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/v1/metrics"))
            .respond_with(ResponseTemplate::new(400).set_body_string("metric_specs must not be empty"))
            .mount(&server)
            .await;

        let err = client(&server)
            .metrics()
            .simple_query::<&str>(scope(), &[], &[42])
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(400));
        assert!(err.to_string().contains("metric_specs must not be empty"));
    }

    #[tokio::test]
    async fn test_keyed_body_for_simple_query_is_decode_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/v1/metrics"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "cycle": "5min",
                "from": 1000,
                "node_id": 0,
                "until": 2000,
                "stats": [{
                    "duration": 300000,
                    "oid": 42,
                    "time": 60000,
                    "values": [[{"key": {"key_type": "string", "str": "tcp"}, "value": 5}]]
                }]
            })))
            .mount(&server)
            .await;

        let result = client(&server)
            .metrics()
            .simple_query(scope(), &["bytes"], &[42])
            .await;

        assert!(matches!(result, Err(HopError::Json(_))));
    }
}
