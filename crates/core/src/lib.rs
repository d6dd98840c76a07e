// Wire types and OpenTSDB projection for the ExtraHop metrics API

pub mod datapoint;
pub mod projection;
pub mod query;
pub mod response;

pub use datapoint::{DataPoint, MultiDataPoint, TagSet};
pub use projection::{ProjectionError, ProjectionErrorKind};
pub use query::{Cycle, KeyPair, MetricQuery, MetricSpec, ObjectType, QueryScope};
pub use response::{
    FacetKey, KeyedMetricResponse, KeyedValue, MetricResponse, MetricResponseBase, MetricStat,
    SimpleMetricResponse,
};
