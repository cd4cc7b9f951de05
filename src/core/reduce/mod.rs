// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Reductions of per-frame artifacts into summary metrics.
//!
//! Each reduction takes an optional input and returns the entries it computed.
//! No entry is produced when the input is missing or has no valid value,
//! so a NaN or placeholder value never ends up in a record.

pub mod covariance;
pub mod filtering;
pub mod flow;
pub mod stereo;

use crate::core::record::{Entries, Value};
use crate::math::stats::Stats;

/// Mean and standard deviation entries, empty if no value was accumulated.
fn mean_std(stats: &Stats, mean_key: &'static str, std_key: &'static str) -> Entries {
    match (stats.mean(), stats.std()) {
        (Some(mean), Some(std)) => vec![(mean_key, Value::Float(mean)), (std_key, Value::Float(std))],
        _ => Vec::new(),
    }
}
