/*!
 * Metric Events
 * Integer and float samples stored in metric stream blocks
 */

use super::metadata::MetricMetadata;
use crate::properties::PropertySet;
use crate::queue::HeterogeneousQueue;

#[derive(Debug, Clone)]
pub struct TaggedIntegerMetricEvent {
    pub desc: &'static MetricMetadata,
    pub properties: &'static PropertySet,
    pub value: u64,
    pub time: i64,
}

crate::wire_record!(TaggedIntegerMetricEvent {
    desc: &'static MetricMetadata => "desc",
    properties: &'static PropertySet => "properties",
    value: u64 => "value",
    time: i64 => "time",
});

#[derive(Debug, Clone)]
pub struct TaggedFloatMetricEvent {
    pub desc: &'static MetricMetadata,
    pub properties: &'static PropertySet,
    pub value: f64,
    pub time: i64,
}

crate::wire_record!(TaggedFloatMetricEvent {
    desc: &'static MetricMetadata => "desc",
    properties: &'static PropertySet => "properties",
    value: f64 => "value",
    time: i64 => "time",
});

crate::declare_queue! {
    /// Records of a metric block
    pub enum MetricEvent {
        Integer(TaggedIntegerMetricEvent),
        Float(TaggedFloatMetricEvent),
    }
}

pub type MetricQueue = HeterogeneousQueue<MetricEvent>;

impl MetricEvent {
    pub fn desc(&self) -> &'static MetricMetadata {
        match self {
            MetricEvent::Integer(evt) => evt.desc,
            MetricEvent::Float(evt) => evt.desc,
        }
    }

    pub fn time(&self) -> i64 {
        match self {
            MetricEvent::Integer(evt) => evt.time,
            MetricEvent::Float(evt) => evt.time,
        }
    }
}
