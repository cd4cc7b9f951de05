// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Typed per-frame inputs of the metrics collector.
//!
//! Every input is optional, and every entry of a field may be marked invalid
//! with a NaN value. The collector never modifies them.

use crate::error::{Error, Result};
use crate::misc::type_aliases::{Field, Float, Mat3};

/// Dense optical flow between two frames, with an optional per-pixel uncertainty.
#[derive(Clone, Debug)]
pub struct FlowArtifact {
    /// Horizontal displacement channel.
    pub dx: Field,
    /// Vertical displacement channel.
    pub dy: Field,
    /// Per-pixel flow uncertainty, same grid as `dx` and `dy`.
    pub uncertainty: Option<Field>,
}

impl FlowArtifact {
    /// Flow without uncertainty.
    pub fn new(dx: Field, dy: Field) -> Self {
        Self {
            dx,
            dy,
            uncertainty: None,
        }
    }

    /// Attach an uncertainty field.
    pub fn with_uncertainty(mut self, uncertainty: Field) -> Self {
        self.uncertainty = Some(uncertainty);
        self
    }
}

/// Output of stereo matching over a shared grid.
/// Any field may be missing.
#[derive(Clone, Debug, Default)]
pub struct StereoArtifact {
    /// Depth map.
    pub depth: Option<Field>,
    /// Disparity map.
    pub disparity: Option<Field>,
    /// Per-pixel disparity uncertainty.
    pub disparity_uncertainty: Option<Field>,
    /// Per-pixel depth uncertainty (variance).
    pub depth_uncertainty: Option<Field>,
}

impl StereoArtifact {
    /// Present fields with their names, in a fixed order.
    pub fn fields(&self) -> impl Iterator<Item = (&'static str, &Field)> {
        vec![
            ("depth", &self.depth),
            ("disparity", &self.disparity),
            ("disparity_uncertainty", &self.disparity_uncertainty),
            ("depth_uncertainty", &self.depth_uncertainty),
        ]
        .into_iter()
        .filter_map(|(name, field)| field.as_ref().map(|f| (name, f)))
    }
}

/// Covariance matrices of tracked 3D points, one per point.
#[derive(Clone, Debug, Default)]
pub struct CovarianceBatch {
    /// 3x3 symmetric covariance matrices.
    pub covariances: Vec<Mat3>,
}

impl CovarianceBatch {
    /// Batch from already typed matrices.
    pub fn new(covariances: Vec<Mat3>) -> Self {
        Self { covariances }
    }

    /// Build a batch from a flat row-major buffer of shape `(n, 3, 3)`.
    ///
    /// Any other shape, or a buffer whose length does not match the shape,
    /// is a shape mismatch.
    pub fn from_flat(shape: &[usize], data: &[Float]) -> Result<Self> {
        let mismatch = |actual: String| Error::ShapeMismatch {
            artifact: "point3d_covariances",
            expected: "(n, 3, 3)".to_string(),
            actual,
        };
        match *shape {
            [nb_points, 3, 3] if data.len() == nb_points * 9 => Ok(Self::new(
                data.chunks_exact(9).map(Mat3::from_row_slice).collect(),
            )),
            [_, 3, 3] => Err(mismatch(format!(
                "{:?} with {} values",
                shape,
                data.len()
            ))),
            _ => Err(mismatch(format!("{:?}", shape))),
        }
    }

    /// Number of points in the batch.
    pub fn len(&self) -> usize {
        self.covariances.len()
    }

    /// True if the batch has no point.
    pub fn is_empty(&self) -> bool {
        self.covariances.is_empty()
    }
}

/// Point counts before and after an outlier filtering stage.
/// A missing count is considered to be 0.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FilteringStats {
    /// Number of candidate points considered.
    pub initial_count: Option<u64>,
    /// Number of points retained.
    pub final_count: Option<u64>,
}

impl FilteringStats {
    /// Both counts known.
    pub fn new(initial_count: u64, final_count: u64) -> Self {
        Self {
            initial_count: Some(initial_count),
            final_count: Some(final_count),
        }
    }
}

/// All optional inputs of a single frame.
///
/// ```
/// # use vo_frame_metrics::core::artifact::{FilteringStats, FrameInputs};
/// let filtering = FilteringStats::new(10, 4);
/// let inputs = FrameInputs { filtering: Some(&filtering), ..Default::default() };
/// assert!(inputs.flow.is_none());
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct FrameInputs<'a> {
    /// Optical flow.
    pub flow: Option<&'a FlowArtifact>,
    /// Stereo depth and disparity.
    pub stereo: Option<&'a StereoArtifact>,
    /// Covariances of tracked 3D points.
    pub covariances: Option<&'a CovarianceBatch>,
    /// Outlier filtering counts.
    pub filtering: Option<&'a FilteringStats>,
}

// TESTS #############################################################
