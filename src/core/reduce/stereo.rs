// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Stereo depth and disparity metrics.

use super::mean_std;
use crate::core::artifact::StereoArtifact;
use crate::core::record::{keys, Entries, Value};
use crate::error::{Error, Result};
use crate::math::stats::Stats;
use crate::misc::helper;
use crate::misc::type_aliases::Field;

/// Metrics of every present field of a stereo artifact.
///
/// * depth: mean, std and coverage,
/// * disparity: mean and std,
/// * disparity uncertainty: mean, std, min and max,
/// * depth uncertainty: mean and std.
///
/// Each field is reduced independently, a field without valid entries
/// is simply skipped. All present fields must share the same grid.
pub fn stereo_metrics(stereo: Option<&StereoArtifact>) -> Result<Entries> {
    let stereo = match stereo {
        Some(stereo) => stereo,
        None => return Ok(Vec::new()),
    };
    check_shared_grid(stereo)?;

    let mut entries = Vec::new();
    if let Some(depth) = &stereo.depth {
        let stats = field_stats(depth);
        entries.extend(mean_std(&stats, keys::DEPTH_MEAN, keys::DEPTH_STD));
        if !stats.is_empty() {
            if let Some(coverage) = helper::coverage(&helper::valid_mask(depth)) {
                entries.push((keys::DEPTH_COVERAGE, Value::Float(coverage)));
            }
        }
    }
    if let Some(disparity) = &stereo.disparity {
        let stats = field_stats(disparity);
        entries.extend(mean_std(&stats, keys::DISPARITY_MEAN, keys::DISPARITY_STD));
    }
    if let Some(uncertainty) = &stereo.disparity_uncertainty {
        let stats = field_stats(uncertainty);
        entries.extend(mean_std(
            &stats,
            keys::DISPARITY_UNCERTAINTY_MEAN,
            keys::DISPARITY_UNCERTAINTY_STD,
        ));
        // Extreme values are used downstream to spot uncertainty spikes.
        if let (Some(min), Some(max)) = (stats.min(), stats.max()) {
            entries.push((keys::DISPARITY_UNCERTAINTY_MIN, Value::Float(min)));
            entries.push((keys::DISPARITY_UNCERTAINTY_MAX, Value::Float(max)));
        }
    }
    if let Some(uncertainty) = &stereo.depth_uncertainty {
        let stats = field_stats(uncertainty);
        entries.extend(mean_std(
            &stats,
            keys::DEPTH_UNCERTAINTY_MEAN,
            keys::DEPTH_UNCERTAINTY_STD,
        ));
    }
    Ok(entries)
}

fn field_stats(field: &Field) -> Stats {
    helper::valid_values(field).collect()
}

/// All present fields must have the shape of the first present one.
fn check_shared_grid(stereo: &StereoArtifact) -> Result<()> {
    let mut fields = stereo.fields();
    if let Some((_, first)) = fields.next() {
        let grid = first.shape();
        for (name, field) in fields {
            if field.shape() != grid {
                return Err(Error::grid_mismatch(name, grid, field.shape()));
            }
        }
    }
    Ok(())
}

// TESTS #############################################################
