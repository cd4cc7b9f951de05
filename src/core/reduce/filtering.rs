// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Point filtering bookkeeping.

use log::warn;

use crate::core::artifact::FilteringStats;
use crate::core::record::{keys, Entries, Value};

/// Point counts and rejection rate of the filtering stage.
///
/// Missing counts default to 0.
/// The rejection rate is `1 - final / max(initial, 1)`,
/// so a frame without any candidate point reports a rejection rate of 1.
/// A zero initial count usually means that a previous stage failed,
/// it is reported with a warning.
#[allow(clippy::cast_precision_loss)]
pub fn filtering_metrics(stats: Option<&FilteringStats>) -> Entries {
    let stats = match stats {
        Some(stats) => stats,
        None => return Vec::new(),
    };
    let initial_count = stats.initial_count.unwrap_or(0);
    let final_count = stats.final_count.unwrap_or(0);
    let rejection_rate = 1.0 - final_count as f64 / initial_count.max(1) as f64;
    if initial_count == 0 {
        warn!(
            "Filtering stage received no candidate point ({} retained), rejection rate set to {}",
            final_count, rejection_rate
        );
    }
    vec![
        (keys::INITIAL_POINT_COUNT, Value::Int(initial_count)),
        (keys::FINAL_POINT_COUNT, Value::Int(final_count)),
        (keys::REJECTION_RATE, Value::Float(rejection_rate)),
    ]
}

// TESTS #############################################################
