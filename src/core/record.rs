// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! One row of metrics, computed for a single frame.

use std::fmt;

/// Names of the metrics, as they appear in the columns of the saved table.
///
/// Downstream analysis scripts rely on these exact names.
pub mod keys {
    #![allow(missing_docs)]

    pub const FRAME_IDX: &str = "frame_idx";
    pub const TIMESTAMP: &str = "timestamp";

    pub const FLOW_MAGNITUDE_MEAN: &str = "flow_magnitude_mean";
    pub const FLOW_MAGNITUDE_STD: &str = "flow_magnitude_std";
    pub const FLOW_COVERAGE: &str = "flow_coverage";
    pub const FLOW_UNCERTAINTY_MEAN: &str = "flow_uncertainty_mean";
    pub const FLOW_UNCERTAINTY_STD: &str = "flow_uncertainty_std";

    pub const DEPTH_MEAN: &str = "depth_mean";
    pub const DEPTH_STD: &str = "depth_std";
    pub const DEPTH_COVERAGE: &str = "depth_coverage";
    pub const DISPARITY_MEAN: &str = "disparity_mean";
    pub const DISPARITY_STD: &str = "disparity_std";
    pub const DISPARITY_UNCERTAINTY_MEAN: &str = "disparity_uncertainty_mean";
    pub const DISPARITY_UNCERTAINTY_STD: &str = "disparity_uncertainty_std";
    pub const DISPARITY_UNCERTAINTY_MIN: &str = "disparity_uncertainty_min";
    pub const DISPARITY_UNCERTAINTY_MAX: &str = "disparity_uncertainty_max";
    pub const DEPTH_UNCERTAINTY_MEAN: &str = "depth_uncertainty_mean";
    pub const DEPTH_UNCERTAINTY_STD: &str = "depth_uncertainty_std";

    pub const POINT3D_UNCERTAINTY_MEAN: &str = "point3d_uncertainty_mean";
    pub const POINT3D_UNCERTAINTY_STD: &str = "point3d_uncertainty_std";

    pub const INITIAL_POINT_COUNT: &str = "initial_point_count";
    pub const FINAL_POINT_COUNT: &str = "final_point_count";
    pub const REJECTION_RATE: &str = "rejection_rate";

    /// Columns holding integer values, all others hold floats.
    pub const INTEGER_KEYS: [&str; 3] = [FRAME_IDX, INITIAL_POINT_COUNT, FINAL_POINT_COUNT];
}

/// A scalar metric value.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Value {
    /// Counts.
    Int(u64),
    /// Everything else.
    Float(f64),
}

impl Value {
    /// Numeric value, converting integers to f64.
    #[allow(clippy::cast_precision_loss)]
    pub fn as_f64(self) -> f64 {
        match self {
            Value::Int(x) => x as f64,
            Value::Float(x) => x,
        }
    }
}

impl From<u64> for Value {
    fn from(x: u64) -> Self {
        Value::Int(x)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

/// Integers without decimal point, floats in their shortest round-trip form.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Value::Int(x) => write!(f, "{}", x),
            Value::Float(x) => write!(f, "{}", x),
        }
    }
}

/// Metrics computed by one reduction, in insertion order.
/// Empty when the corresponding input was missing or fully invalid.
pub type Entries = Vec<(&'static str, Value)>;

/// Metrics of one frame.
///
/// Apart from `frame_idx` and `timestamp`, the set of keys varies from one
/// record to another, depending on which artifacts were available.
#[derive(Clone, Debug, PartialEq)]
pub struct MetricRecord {
    /// Index of the frame.
    pub frame_idx: u64,
    /// Timestamp of the frame.
    pub timestamp: f64,
    entries: Vec<(String, Value)>,
}

impl MetricRecord {
    /// Record with only a frame index and timestamp.
    pub fn new(frame_idx: u64, timestamp: f64) -> Self {
        Self {
            frame_idx,
            timestamp,
            entries: Vec::new(),
        }
    }

    /// Set a metric, replacing the previous value with the same key.
    ///
    /// `frame_idx` and `timestamp` update the corresponding fields.
    /// A `frame_idx` must be an integer value, a float one is ignored.
    pub fn insert<K: Into<String>>(&mut self, key: K, value: Value) {
        let key = key.into();
        if key == keys::FRAME_IDX {
            match value {
                Value::Int(idx) => self.frame_idx = idx,
                Value::Float(_) => {
                    debug_assert!(false, "frame_idx must be an integer, got {:?}", value)
                }
            }
        } else if key == keys::TIMESTAMP {
            self.timestamp = value.as_f64();
        } else {
            match self.entries.iter_mut().find(|(k, _)| *k == key) {
                Some(entry) => entry.1 = value,
                None => self.entries.push((key, value)),
            }
        }
    }

    /// Value of a metric, including `frame_idx` and `timestamp`.
    pub fn get(&self, key: &str) -> Option<Value> {
        match key {
            keys::FRAME_IDX => Some(Value::Int(self.frame_idx)),
            keys::TIMESTAMP => Some(Value::Float(self.timestamp)),
            _ => self
                .entries
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| *v),
        }
    }

    /// True if the metric is present in the record.
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// All keys of the record, starting with `frame_idx` and `timestamp`.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        vec![keys::FRAME_IDX, keys::TIMESTAMP]
            .into_iter()
            .chain(self.entries.iter().map(|(k, _)| k.as_str()))
    }

    /// Optional metrics, without `frame_idx` and `timestamp`.
    pub fn entries(&self) -> impl Iterator<Item = (&str, Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

impl Extend<(&'static str, Value)> for MetricRecord {
    fn extend<I: IntoIterator<Item = (&'static str, Value)>>(&mut self, iter: I) {
        iter.into_iter().for_each(|(k, v)| self.insert(k, v));
    }
}

// TESTS #############################################################
