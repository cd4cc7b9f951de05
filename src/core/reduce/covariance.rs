// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Uncertainty of tracked 3D points.

use super::mean_std;
use crate::core::artifact::CovarianceBatch;
use crate::core::record::{keys, Entries};
use crate::math::stats::Stats;
use crate::misc::helper;
use crate::misc::type_aliases::Mat3;

/// Mean and std of the covariance traces over the valid matrices of the batch.
///
/// A matrix is valid if all its entries are finite (not NaN nor infinite).
pub fn trace_metrics(batch: Option<&CovarianceBatch>) -> Entries {
    match batch {
        Some(batch) => {
            let traces: Stats = batch.covariances.iter().filter_map(trace).collect();
            mean_std(
                &traces,
                keys::POINT3D_UNCERTAINTY_MEAN,
                keys::POINT3D_UNCERTAINTY_STD,
            )
        }
        None => Vec::new(),
    }
}

/// Sum of the diagonal, a scalar proxy of the total positional uncertainty.
/// `None` if the covariance is invalid.
pub fn trace(cov: &Mat3) -> Option<f64> {
    if cov.iter().all(|&x| helper::is_valid(x)) {
        Some(cov.diagonal().iter().map(|&x| f64::from(x)).sum())
    } else {
        None
    }
}

// TESTS #############################################################
