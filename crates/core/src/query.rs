use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Aggregation granularity of a metric query
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cycle {
    #[default]
    #[serde(rename = "auto")]
    Auto,
    #[serde(rename = "30sec")]
    ThirtySeconds,
    #[serde(rename = "5min")]
    FiveMinutes,
    #[serde(rename = "1hr")]
    OneHour,
    #[serde(rename = "24hr")]
    OneDay,
}

impl Cycle {
    pub fn as_str(&self) -> &'static str {
        match self {
            Cycle::Auto => "auto",
            Cycle::ThirtySeconds => "30sec",
            Cycle::FiveMinutes => "5min",
            Cycle::OneHour => "1hr",
            Cycle::OneDay => "24hr",
        }
    }
}

impl std::fmt::Display for Cycle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of monitored object a query targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectType {
    Network,
    Device,
    Application,
    Vlan,
    DeviceGroup,
    ActivityGroup,
}

impl std::fmt::Display for ObjectType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ObjectType::Network => "network",
            ObjectType::Device => "device",
            ObjectType::Application => "application",
            ObjectType::Vlan => "vlan",
            ObjectType::DeviceGroup => "device_group",
            ObjectType::ActivityGroup => "activity_group",
        };
        f.write_str(s)
    }
}

/// Facet keys of a metric spec.
///
/// `key1`/`key2` are sent to the appliance as regexes selecting facet
/// values. The `opentsdb_*` fields name the tag each facet is written under
/// when projecting and never leave the process.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyPair {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub key1: Option<String>,
    /// Accepted by the API, but no projection reads it yet.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub key2: Option<String>,
    #[serde(skip)]
    pub opentsdb_key1: Option<String>,
    #[serde(skip)]
    pub opentsdb_key2: Option<String>,
}

impl KeyPair {
    pub fn is_keyed(&self) -> bool {
        self.key1.is_some() || self.key2.is_some()
    }
}

/// A single metric requested in a [`MetricQuery`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricSpec {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub calc_type: Option<String>,
    #[serde(flatten)]
    pub keys: KeyPair,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub percentiles: Vec<i64>,
    /// Output metric name used by the keyed projection.
    #[serde(skip)]
    pub opentsdb_metric: Option<String>,
}

impl MetricSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn calc_type(mut self, calc_type: impl Into<String>) -> Self {
        self.calc_type = Some(calc_type.into());
        self
    }

    /// Facet on `regex`, tagging projected points with `tag`.
    pub fn key1(mut self, regex: impl Into<String>, tag: impl Into<String>) -> Self {
        self.keys.key1 = Some(regex.into());
        self.keys.opentsdb_key1 = Some(tag.into());
        self
    }

    pub fn percentiles(mut self, percentiles: impl IntoIterator<Item = i64>) -> Self {
        self.percentiles = percentiles.into_iter().collect();
        self
    }

    pub fn opentsdb_metric(mut self, metric: impl Into<String>) -> Self {
        self.opentsdb_metric = Some(metric.into());
        self
    }

    /// Name written on projected points, defaulting to the appliance metric name.
    pub fn output_metric(&self) -> &str {
        self.opentsdb_metric.as_deref().unwrap_or(&self.name)
    }
}

/// Parameters shared by every metric query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryScope {
    pub cycle: Cycle,
    pub category: String,
    pub object_type: ObjectType,
    /// Epoch milliseconds.
    pub from: i64,
    /// Epoch milliseconds.
    pub until: i64,
}

impl QueryScope {
    pub fn new(
        cycle: Cycle,
        category: impl Into<String>,
        object_type: ObjectType,
        from: i64,
        until: i64,
    ) -> Self {
        Self {
            cycle,
            category: category.into(),
            object_type,
            from,
            until,
        }
    }

    /// Scope covering `[from, until]`.
    pub fn between(
        cycle: Cycle,
        category: impl Into<String>,
        object_type: ObjectType,
        from: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> Self {
        Self::new(
            cycle,
            category,
            object_type,
            from.timestamp_millis(),
            until.timestamp_millis(),
        )
    }
}

/// Body of a `POST /api/v1/metrics` request.
///
/// Response values are index-aligned with `specs`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricQuery {
    pub cycle: Cycle,
    pub from: i64,
    #[serde(rename = "metric_category")]
    pub category: String,
    #[serde(rename = "metric_specs")]
    pub specs: Vec<MetricSpec>,
    pub object_ids: Vec<i64>,
    pub object_type: ObjectType,
    pub until: i64,
}

impl MetricQuery {
    pub fn new(scope: QueryScope, specs: Vec<MetricSpec>, object_ids: Vec<i64>) -> Self {
        Self {
            cycle: scope.cycle,
            from: scope.from,
            category: scope.category,
            specs,
            object_ids,
            object_type: scope.object_type,
            until: scope.until,
        }
    }

    /// Query without facets, one spec per metric name.
    pub fn simple<S: AsRef<str>>(scope: QueryScope, metric_names: &[S], object_ids: &[i64]) -> Self {
        let specs = metric_names
            .iter()
            .map(|name| MetricSpec::new(name.as_ref()))
            .collect();
        Self::new(scope, specs, object_ids.to_vec())
    }

    /// Query whose specs carry facet keys.
    pub fn keyed(scope: QueryScope, specs: &[MetricSpec], object_ids: &[i64]) -> Self {
        Self::new(scope, specs.to_vec(), object_ids.to_vec())
    }

    pub fn is_keyed(&self) -> bool {
        self.specs.iter().any(|spec| spec.keys.is_keyed())
    }
}
