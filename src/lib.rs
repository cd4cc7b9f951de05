// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Per-frame quality metrics for visual odometry.
//!
//! Each processing frame, the odometry pipeline produces intermediate artifacts
//! (optical flow fields, stereo depth and disparity maps, 3D point covariances).
//! A [`FrameMetricsCollector`](core::collector::FrameMetricsCollector) reduces them
//! into a handful of summary statistics, ignoring NaN and infinite entries,
//! accumulates one record per frame, and saves them as a CSV table.
//!
//! ```no_run
//! use vo_frame_metrics::core::artifact::{FilteringStats, FrameInputs};
//! use vo_frame_metrics::core::collector::FrameMetricsCollector;
//!
//! let mut collector = FrameMetricsCollector::new("out/sequence_01");
//! let filtering = FilteringStats::new(100, 73);
//! collector.record(0, 0.0, FrameInputs { filtering: Some(&filtering), ..Default::default() });
//! collector.save();
//! ```

#![warn(missing_docs)]

pub mod core;
pub mod dataset;
pub mod error;
pub mod math;
pub mod misc;
