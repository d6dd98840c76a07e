//! Projection of metric responses onto OpenTSDB data points.
//!
//! Both variants walk stat records in response order and values in index
//! order. The first invalid record aborts the projection; the points emitted
//! before it are kept on the returned [`ProjectionError`].

use crate::datapoint::{DataPoint, MultiDataPoint, TagSet};
use crate::query::MetricSpec;
use crate::response::{KeyedMetricResponse, MetricStat, SimpleMetricResponse};
use std::collections::HashMap;
use tracing::debug;

/// Reason a projection stopped
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProjectionErrorKind {
    #[error("no name found for oid {oid}")]
    NameNotFound { oid: i64 },

    #[error("encountered a time less than 1 (oid {oid}, time {time})")]
    InvalidTimestamp { oid: i64, time: i64 },

    #[error("no corresponding metric name at index {index}")]
    MissingMetricName { index: usize },

    #[error("no facet tag configured for metric spec at index {index}")]
    MissingFacetTag { index: usize },
}

/// A failed projection together with the points produced before the failure
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{kind} (after {} data points)", .partial.len())]
pub struct ProjectionError {
    pub kind: ProjectionErrorKind,
    pub partial: MultiDataPoint,
}

impl ProjectionError {
    fn new(kind: ProjectionErrorKind, partial: MultiDataPoint) -> Self {
        Self { kind, partial }
    }

    pub fn kind(&self) -> &ProjectionErrorKind {
        &self.kind
    }

    pub fn into_partial(self) -> MultiDataPoint {
        self.partial
    }
}

/// Resolves the object name of a record and checks its timestamp.
fn validate_stat<'a, V>(
    stat: &MetricStat<V>,
    object_id_to_name: &'a HashMap<i64, String>,
) -> Result<&'a str, ProjectionErrorKind> {
    let name = object_id_to_name
        .get(&stat.oid)
        .map(String::as_str)
        .ok_or(ProjectionErrorKind::NameNotFound { oid: stat.oid })?;
    if stat.time < 1 {
        return Err(ProjectionErrorKind::InvalidTimestamp {
            oid: stat.oid,
            time: stat.time,
        });
    }
    Ok(name)
}

impl SimpleMetricResponse {
    /// Project into one point per value.
    ///
    /// `metric_names[i]` names the values at index `i`; each point is tagged
    /// `{object_key: <object name>}`.
    pub fn opentsdb_data_points<S: AsRef<str>>(
        &self,
        metric_names: &[S],
        object_key: &str,
        object_id_to_name: &HashMap<i64, String>,
    ) -> Result<MultiDataPoint, ProjectionError> {
        let mut points = MultiDataPoint::with_capacity(self.value_count());

        for stat in &self.stats {
            let name = match validate_stat(stat, object_id_to_name) {
                Ok(name) => name,
                Err(kind) => return Err(ProjectionError::new(kind, points)),
            };

            for (index, value) in stat.values.iter().enumerate() {
                let Some(metric) = metric_names.get(index) else {
                    return Err(ProjectionError::new(
                        ProjectionErrorKind::MissingMetricName { index },
                        points,
                    ));
                };

                let mut tags = TagSet::new();
                tags.insert(object_key, name);
                points.push(DataPoint {
                    metric: metric.as_ref().to_string(),
                    timestamp: stat.timestamp_secs(),
                    value: *value,
                    tags,
                });
            }
        }

        debug!(
            stats = self.stats.len(),
            points = points.len(),
            "Projected simple metric response"
        );
        Ok(points)
    }
}

impl KeyedMetricResponse {
    /// Project into one point per facet entry.
    ///
    /// Values at index `i` are named by `specs[i]` and tagged with
    /// `{object_key: <object name>, <specs[i] key1 tag>: <facet>}`. Only the
    /// first facet key is projected.
    ///
    /// The metric is `specs[i].opentsdb_metric`, or `specs[i].name` when no
    /// output metric is configured. A spec without an `opentsdb_key1` tag
    /// fails with [`ProjectionErrorKind::MissingFacetTag`], as an empty tag
    /// key is not a valid OpenTSDB tag.
    pub fn opentsdb_data_points(
        &self,
        specs: &[MetricSpec],
        object_key: &str,
        object_id_to_name: &HashMap<i64, String>,
    ) -> Result<MultiDataPoint, ProjectionError> {
        let mut points = MultiDataPoint::new();

        for stat in &self.stats {
            let name = match validate_stat(stat, object_id_to_name) {
                Ok(name) => name,
                Err(kind) => return Err(ProjectionError::new(kind, points)),
            };

            for (index, facets) in stat.values.iter().enumerate() {
                let Some(spec) = specs.get(index) else {
                    return Err(ProjectionError::new(
                        ProjectionErrorKind::MissingMetricName { index },
                        points,
                    ));
                };
                let Some(facet_tag) = spec.keys.opentsdb_key1.as_deref() else {
                    return Err(ProjectionError::new(
                        ProjectionErrorKind::MissingFacetTag { index },
                        points,
                    ));
                };

                for facet in facets {
                    let mut tags = TagSet::new();
                    tags.insert(object_key, name);
                    tags.insert(facet_tag, facet.key.str.as_str());
                    points.push(DataPoint {
                        metric: spec.output_metric().to_string(),
                        timestamp: stat.timestamp_secs(),
                        value: facet.value,
                        tags,
                    });
                }
            }
        }

        debug!(
            stats = self.stats.len(),
            points = points.len(),
            "Projected keyed metric response"
        );
        Ok(points)
    }
}
