// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Optical flow metrics.

use itertools::izip;

use super::mean_std;
use crate::core::artifact::FlowArtifact;
use crate::core::record::{keys, Entries, Value};
use crate::error::{Error, Result};
use crate::math::stats::Stats;
use crate::misc::helper;

/// Mean and std of the flow magnitude, and the flow coverage.
///
/// Only cells where both `dx` and `dy` are valid are taken into account.
/// Coverage is the fraction of such cells over the whole grid.
/// Nothing is produced if no cell is valid.
pub fn magnitude_metrics(flow: Option<&FlowArtifact>) -> Result<Entries> {
    let flow = match flow {
        Some(flow) => flow,
        None => return Ok(Vec::new()),
    };
    if flow.dx.shape() != flow.dy.shape() {
        return Err(Error::grid_mismatch("flow dy", flow.dx.shape(), flow.dy.shape()));
    }

    let mask = helper::valid_mask_2(&flow.dx, &flow.dy);
    let magnitudes: Stats = izip!(flow.dx.iter(), flow.dy.iter(), mask.iter())
        .filter(|&(_, _, &valid)| valid)
        .map(|(&x, &y, _)| f64::from(x).hypot(f64::from(y)))
        .collect();

    let mut entries = mean_std(
        &magnitudes,
        keys::FLOW_MAGNITUDE_MEAN,
        keys::FLOW_MAGNITUDE_STD,
    );
    if !entries.is_empty() {
        if let Some(coverage) = helper::coverage(&mask) {
            entries.push((keys::FLOW_COVERAGE, Value::Float(coverage)));
        }
    }
    Ok(entries)
}

/// Mean and std of the valid entries of the flow uncertainty.
///
/// The uncertainty validity is independent of the flow validity.
pub fn uncertainty_metrics(flow: Option<&FlowArtifact>) -> Result<Entries> {
    let (flow, uncertainty) = match flow {
        Some(flow) => match &flow.uncertainty {
            Some(uncertainty) => (flow, uncertainty),
            None => return Ok(Vec::new()),
        },
        None => return Ok(Vec::new()),
    };
    if uncertainty.shape() != flow.dx.shape() {
        return Err(Error::grid_mismatch(
            "flow uncertainty",
            flow.dx.shape(),
            uncertainty.shape(),
        ));
    }
    let stats: Stats = helper::valid_values(uncertainty).collect();
    Ok(mean_std(
        &stats,
        keys::FLOW_UNCERTAINTY_MEAN,
        keys::FLOW_UNCERTAINTY_STD,
    ))
}

// TESTS #############################################################
