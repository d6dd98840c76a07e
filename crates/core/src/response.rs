use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Fields echoed back by the appliance on every metric response
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricResponseBase {
    pub cycle: String,
    pub from: i64,
    pub node_id: i64,
    pub until: i64,
}

/// One stat record for a single object and time bucket.
///
/// `values[i]` belongs to the i-th spec of the originating query. `oid`,
/// `time` and `values` are required since projection cannot place a record
/// without them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricStat<V> {
    #[serde(default)]
    pub duration: i64,
    pub oid: i64,
    /// Epoch milliseconds.
    pub time: i64,
    pub values: Vec<V>,
}

impl<V> MetricStat<V> {
    /// Bucket time in whole seconds.
    pub fn timestamp_secs(&self) -> i64 {
        self.time / 1000
    }

    pub fn observed_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.time)
    }
}

/// Facet a keyed value was split on
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FacetKey {
    pub key_type: String,
    pub str: String,
}

/// A single faceted value of a keyed stat
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyedValue {
    #[serde(default)]
    pub key: FacetKey,
    pub value: i64,
    #[serde(default)]
    pub vtype: String,
}

/// Response to a metric query.
///
/// The shape of `values` depends on whether the query asked for facet keys,
/// see [`SimpleMetricResponse`] and [`KeyedMetricResponse`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricResponse<V> {
    #[serde(flatten)]
    pub base: MetricResponseBase,
    pub stats: Vec<MetricStat<V>>,
}

/// Response for a query without facet keys
pub type SimpleMetricResponse = MetricResponse<i64>;

/// Response for a query with facet keys
pub type KeyedMetricResponse = MetricResponse<Vec<KeyedValue>>;

impl<V> MetricResponse<V> {
    /// Total number of values across all stat records.
    pub fn value_count(&self) -> usize {
        self.stats.iter().map(|stat| stat.values.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_simple_response() {
        let body = json!({
            "cycle": "5min",
            "from": 1000,
            "node_id": 0,
            "until": 2000,
            "stats": [
                {"duration": 300000, "oid": 42, "time": 1500, "values": [10, 20]},
                {"duration": 300000, "oid": 43, "time": 1500, "values": [30]}
            ]
        });

        let response: SimpleMetricResponse = serde_json::from_value(body).unwrap();
        assert_eq!(response.base.cycle, "5min");
        assert_eq!(response.base.until, 2000);
        assert_eq!(response.stats.len(), 2);
        assert_eq!(response.stats[0].values, vec![10, 20]);
        assert_eq!(response.value_count(), 3);
    }

    #[test]
    fn test_decode_keyed_response() {
        let body = json!({
            "cycle": "30sec",
            "from": 1000,
            "node_id": 7,
            "until": 2000,
            "stats": [{
                "duration": 30000,
                "oid": 42,
                "time": 60000,
                "values": [[
                    {"key": {"key_type": "string", "str": "tcp"}, "value": 5, "vtype": "count"},
                    {"key": {"key_type": "string", "str": "udp"}, "value": 2, "vtype": "count"}
                ]]
            }]
        });

        let response: KeyedMetricResponse = serde_json::from_value(body).unwrap();
        assert_eq!(response.base.node_id, 7);
        let facets = &response.stats[0].values[0];
        assert_eq!(facets.len(), 2);
        assert_eq!(facets[0].key.str, "tcp");
        assert_eq!(facets[1].value, 2);
    }

    #[test]
    fn test_keyed_body_rejected_as_simple() {
        let body = json!({
            "cycle": "30sec",
            "from": 1000,
            "node_id": 0,
            "until": 2000,
            "stats": [{
                "duration": 30000,
                "oid": 42,
                "time": 60000,
                "values": [[{"key": {"key_type": "string", "str": "tcp"}, "value": 5}]]
            }]
        });

        assert!(serde_json::from_value::<SimpleMetricResponse>(body).is_err());
    }

    #[test]
    fn test_decode_tolerates_missing_optional_fields() {
        let simple: SimpleMetricResponse = serde_json::from_value(json!({
            "cycle": "30sec",
            "from": 1,
            "until": 2,
            "stats": [{"oid": 42, "time": 60000, "values": [1]}]
        }))
        .unwrap();
        assert_eq!(simple.base.node_id, 0);
        assert_eq!(simple.stats[0].duration, 0);
        assert_eq!(simple.stats[0].values, vec![1]);

        let keyed: KeyedMetricResponse = serde_json::from_value(json!({
            "stats": [{
                "duration": 30000,
                "oid": 42,
                "time": 60000,
                "values": [[{"key": {"str": "tcp"}, "value": 5}]]
            }]
        }))
        .unwrap();
        assert_eq!(keyed.base, MetricResponseBase::default());
        let facet = &keyed.stats[0].values[0][0];
        assert_eq!(facet.key.str, "tcp");
        assert_eq!(facet.key.key_type, "");
        assert_eq!(facet.value, 5);
    }

    #[test]
    fn test_decode_requires_oid() {
        let body = json!({"stats": [{"time": 60000, "values": [1]}]});
        assert!(serde_json::from_value::<SimpleMetricResponse>(body).is_err());
    }

    #[test]
    fn test_stat_time_conversions() {
        let stat = MetricStat::<i64> {
            duration: 30000,
            oid: 1,
            time: 60_500,
            values: vec![],
        };

        assert_eq!(stat.timestamp_secs(), 60);
        assert_eq!(stat.observed_at().unwrap().timestamp_millis(), 60_500);
    }
}
