// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Accumulation of per-frame metrics and persistence to a CSV table.
//!
//! Both `record` and `save` always return:
//! metrics collection must never interrupt the odometry loop.

use log::{error, info, warn};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::core::artifact::FrameInputs;
use crate::core::record::{Entries, MetricRecord};
use crate::core::reduce::{covariance, filtering, flow, stereo};
use crate::dataset::frame_metrics;
use crate::error::Result;

/// Configuration of the collector.
#[derive(Clone, Debug)]
pub struct Config {
    /// Directory where the table is saved.
    pub output_dir: PathBuf,
    /// Name of the table file in `output_dir`.
    pub file_name: String,
}

impl Config {
    /// Default configuration, saving to `frame_metrics.csv` in `output_dir`.
    pub fn new<P: Into<PathBuf>>(output_dir: P) -> Self {
        Self {
            output_dir: output_dir.into(),
            file_name: frame_metrics::FILE_NAME.to_string(),
        }
    }

    /// Initialize a collector without any record.
    pub fn init(self) -> FrameMetricsCollector {
        let output_path = self.output_dir.join(&self.file_name);
        info!("Frame metrics will be saved to {}", output_path.display());
        FrameMetricsCollector {
            output_path,
            records: Vec::new(),
        }
    }
}

/// Collects one metrics record per frame.
/// Can only be constructed by initialization from a `Config` (or with `new`).
///
/// Not synchronized: when fed from multiple producers,
/// put it behind a lock covering both `record` and `save`.
#[derive(Debug)]
pub struct FrameMetricsCollector {
    output_path: PathBuf,
    records: Vec<MetricRecord>,
}

impl FrameMetricsCollector {
    /// Collector with the default configuration.
    pub fn new<P: Into<PathBuf>>(output_dir: P) -> Self {
        Config::new(output_dir).init()
    }

    /// Path of the saved table.
    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    /// Records collected so far, in frame arrival order.
    pub fn records(&self) -> &[MetricRecord] {
        &self.records
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True if no frame has been recorded yet.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Compute the metrics of a frame and append them as a new record.
    ///
    /// Missing or fully invalid inputs simply contribute no metric.
    /// An input with an inconsistent shape is skipped with a warning,
    /// the rest of the record is still computed.
    pub fn record(&mut self, frame_idx: u64, timestamp: f64, inputs: FrameInputs) {
        let mut record = MetricRecord::new(frame_idx, timestamp);
        let reductions: Vec<(&str, Result<Entries>)> = vec![
            ("flow magnitude", flow::magnitude_metrics(inputs.flow)),
            ("flow uncertainty", flow::uncertainty_metrics(inputs.flow)),
            ("stereo", stereo::stereo_metrics(inputs.stereo)),
            ("point3d uncertainty", Ok(covariance::trace_metrics(inputs.covariances))),
            ("filtering", Ok(filtering::filtering_metrics(inputs.filtering))),
        ];
        for (category, reduction) in reductions {
            match reduction {
                Ok(entries) => record.extend(entries),
                Err(err) => warn!(
                    "Skipping {} metrics of frame {}: {}",
                    category, frame_idx, err
                ),
            }
        }
        self.records.push(record);
    }

    /// Save all records, reporting the outcome in the logs.
    ///
    /// Nothing is written if no frame was recorded.
    /// Saving again overwrites the file with the current records.
    pub fn save(&self) {
        if self.records.is_empty() {
            warn!("No frame metrics to save");
            return;
        }
        match self.try_save() {
            Ok(nb_rows) => info!(
                "Saved {} frame metrics to {}",
                nb_rows,
                self.output_path.display()
            ),
            Err(err) => error!(
                "Failed to save frame metrics to {}: {}",
                self.output_path.display(),
                err
            ),
        }
    }

    /// Save all records and return the number of rows written.
    ///
    /// The output directory is created if needed.
    /// Nothing is written if no frame was recorded.
    pub fn try_save(&self) -> Result<usize> {
        if self.records.is_empty() {
            return Ok(0);
        }
        if let Some(dir) = self.output_path.parent() {
            fs::create_dir_all(dir)?;
        }
        frame_metrics::write(&self.output_path, &self.records)?;
        Ok(self.records.len())
    }
}

// TESTS #############################################################

#[cfg(test)]
mod tests {

    use super::*;
    use crate::core::artifact::{
        CovarianceBatch, FilteringStats, FlowArtifact, StereoArtifact,
    };
    use crate::core::record::{keys, Value};
    use crate::misc::type_aliases::{Field, Float, Mat3};
    use approx;
    use quickcheck_macros;
    use tempfile::TempDir;

    const NAN: Float = Float::NAN;

    fn float(record: &MetricRecord, key: &str) -> f64 {
        record.get(key).unwrap().as_f64()
    }

    #[test]
    fn output_path_in_output_dir() {
        let collector = FrameMetricsCollector::new("out/seq");
        assert_eq!(collector.output_path(), Path::new("out/seq/frame_metrics.csv"));
        assert!(collector.is_empty());

        let config = Config {
            output_dir: PathBuf::from("out"),
            file_name: "metrics.csv".to_string(),
        };
        assert_eq!(config.init().output_path(), Path::new("out/metrics.csv"));
    }

    #[test]
    fn record_without_inputs() {
        let mut collector = FrameMetricsCollector::new("unused");
        collector.record(7, 1.25, FrameInputs::default());
        assert_eq!(collector.len(), 1);
        let record = &collector.records()[0];
        assert_eq!(record.frame_idx, 7);
        assert_eq!(record.timestamp, 1.25);
        assert_eq!(record.entries().count(), 0);
    }

    #[test]
    fn fully_invalid_inputs_are_like_missing_inputs() {
        let flow = FlowArtifact::new(Field::from_element(3, 4, NAN), Field::from_element(3, 4, NAN))
            .with_uncertainty(Field::from_element(3, 4, NAN));
        let stereo = StereoArtifact {
            depth: Some(Field::from_element(3, 4, NAN)),
            disparity: Some(Field::from_element(3, 4, NAN)),
            disparity_uncertainty: Some(Field::from_element(3, 4, NAN)),
            depth_uncertainty: Some(Field::from_element(3, 4, NAN)),
        };
        let covariances = CovarianceBatch::new(vec![Mat3::from_element(NAN); 2]);
        let mut collector = FrameMetricsCollector::new("unused");
        collector.record(0, 0.0, FrameInputs::default());
        collector.record(
            0,
            0.0,
            FrameInputs {
                flow: Some(&flow),
                stereo: Some(&stereo),
                covariances: Some(&covariances),
                filtering: None,
            },
        );
        assert_eq!(collector.records()[0], collector.records()[1]);
    }

    #[test]
    fn all_categories() {
        let flow = FlowArtifact::new(Field::from_element(2, 2, 3.0), Field::from_element(2, 2, 4.0))
            .with_uncertainty(Field::from_element(2, 2, 0.5));
        let stereo = StereoArtifact {
            depth: Some(Field::from_element(2, 2, 10.0)),
            disparity: Some(Field::from_element(2, 2, 2.0)),
            disparity_uncertainty: Some(Field::from_element(2, 2, 0.1)),
            depth_uncertainty: Some(Field::from_element(2, 2, 0.2)),
        };
        let covariances = CovarianceBatch::new(vec![Mat3::identity()]);
        let filtering = FilteringStats::new(10, 4);
        let mut collector = FrameMetricsCollector::new("unused");
        collector.record(
            2,
            0.1,
            FrameInputs {
                flow: Some(&flow),
                stereo: Some(&stereo),
                covariances: Some(&covariances),
                filtering: Some(&filtering),
            },
        );
        let record = &collector.records()[0];
        assert_eq!(
            record.keys().collect::<Vec<_>>(),
            vec![
                keys::FRAME_IDX,
                keys::TIMESTAMP,
                keys::FLOW_MAGNITUDE_MEAN,
                keys::FLOW_MAGNITUDE_STD,
                keys::FLOW_COVERAGE,
                keys::FLOW_UNCERTAINTY_MEAN,
                keys::FLOW_UNCERTAINTY_STD,
                keys::DEPTH_MEAN,
                keys::DEPTH_STD,
                keys::DEPTH_COVERAGE,
                keys::DISPARITY_MEAN,
                keys::DISPARITY_STD,
                keys::DISPARITY_UNCERTAINTY_MEAN,
                keys::DISPARITY_UNCERTAINTY_STD,
                keys::DISPARITY_UNCERTAINTY_MIN,
                keys::DISPARITY_UNCERTAINTY_MAX,
                keys::DEPTH_UNCERTAINTY_MEAN,
                keys::DEPTH_UNCERTAINTY_STD,
                keys::POINT3D_UNCERTAINTY_MEAN,
                keys::POINT3D_UNCERTAINTY_STD,
                keys::INITIAL_POINT_COUNT,
                keys::FINAL_POINT_COUNT,
                keys::REJECTION_RATE,
            ]
        );
        assert_eq!(float(record, keys::FLOW_MAGNITUDE_MEAN), 5.0);
        assert_eq!(float(record, keys::FLOW_COVERAGE), 1.0);
        assert_eq!(float(record, keys::POINT3D_UNCERTAINTY_MEAN), 3.0);
        approx::assert_relative_eq!(float(record, keys::REJECTION_RATE), 0.6);
    }

    #[test]
    fn shape_mismatch_only_skips_its_category() {
        let flow = FlowArtifact::new(Field::zeros(2, 2), Field::zeros(1, 2));
        let filtering = FilteringStats::new(4, 4);
        let mut collector = FrameMetricsCollector::new("unused");
        collector.record(
            0,
            0.0,
            FrameInputs {
                flow: Some(&flow),
                filtering: Some(&filtering),
                ..Default::default()
            },
        );
        let record = &collector.records()[0];
        assert!(!record.contains_key(keys::FLOW_MAGNITUDE_MEAN));
        assert_eq!(record.get(keys::REJECTION_RATE), Some(Value::Float(0.0)));
    }

    #[test]
    fn save_and_read_back_scenario() {
        let dir = TempDir::new().unwrap();
        let mut collector = FrameMetricsCollector::new(dir.path());

        let filtering = FilteringStats::new(100, 73);
        collector.record(
            0,
            0.0,
            FrameInputs {
                filtering: Some(&filtering),
                ..Default::default()
            },
        );
        let covariances = CovarianceBatch::new(vec![
            Mat3::from_diagonal_element(1.0),
            Mat3::from_diagonal_element(2.0),
        ]);
        collector.record(
            1,
            0.1,
            FrameInputs {
                covariances: Some(&covariances),
                ..Default::default()
            },
        );
        assert_eq!(collector.try_save().unwrap(), 2);

        let rows = frame_metrics::read(collector.output_path()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!((rows[0].frame_idx, rows[0].timestamp), (0, 0.0));
        assert_eq!((rows[1].frame_idx, rows[1].timestamp), (1, 0.1));

        approx::assert_relative_eq!(float(&rows[0], keys::REJECTION_RATE), 0.27);
        assert_eq!(rows[0].get(keys::INITIAL_POINT_COUNT), Some(Value::Int(100)));
        assert!(!rows[0].contains_key(keys::POINT3D_UNCERTAINTY_MEAN));
        assert!(!rows[0].contains_key(keys::POINT3D_UNCERTAINTY_STD));

        assert_eq!(float(&rows[1], keys::POINT3D_UNCERTAINTY_MEAN), 4.5);
        assert_eq!(float(&rows[1], keys::POINT3D_UNCERTAINTY_STD), 1.5);
        assert!(!rows[1].contains_key(keys::INITIAL_POINT_COUNT));
        assert!(!rows[1].contains_key(keys::FINAL_POINT_COUNT));
        assert!(!rows[1].contains_key(keys::REJECTION_RATE));

        let content = fs::read_to_string(collector.output_path()).unwrap();
        let mut lines = content.lines();
        assert_eq!(
            lines.next(),
            Some("frame_idx,timestamp,initial_point_count,final_point_count,rejection_rate,point3d_uncertainty_mean,point3d_uncertainty_std")
        );
        assert!(lines.next().unwrap().ends_with(",,"));
        assert_eq!(lines.next(), Some("1,0.1,,,,4.5,1.5"));
    }

    #[test]
    fn save_twice_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let mut collector = FrameMetricsCollector::new(dir.path());
        let dx = Field::from_fn(8, 8, |i, j| (i as Float - 3.5) * 0.3 + j as Float);
        let dy = Field::from_fn(8, 8, |i, j| if i == j { NAN } else { 0.1 * i as Float });
        let flow = FlowArtifact::new(dx, dy);
        collector.record(0, 0.0, FrameInputs { flow: Some(&flow), ..Default::default() });
        collector.record(1, 0.05, FrameInputs::default());

        collector.save();
        let first = fs::read(collector.output_path()).unwrap();
        collector.save();
        let second = fs::read(collector.output_path()).unwrap();
        assert_eq!(first, second);
        assert_eq!(collector.len(), 2);
    }

    #[test]
    fn empty_save_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let collector = FrameMetricsCollector::new(dir.path().join("never_created"));
        collector.save();
        assert_eq!(collector.try_save().unwrap(), 0);
        assert!(!collector.output_path().exists());
        assert!(!dir.path().join("never_created").exists());
    }

    #[test]
    fn save_failure_does_not_panic() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "not a directory").unwrap();
        let mut collector = FrameMetricsCollector::new(blocker.join("metrics"));
        collector.record(0, 0.0, FrameInputs::default());

        collector.save();
        assert!(collector.try_save().is_err());
        assert!(!collector.output_path().exists());
    }

    // PROPERTY TESTS ################################################

    #[quickcheck_macros::quickcheck]
    fn one_row_per_record_whatever_the_inputs(
        present: (bool, bool, bool, bool),
        frame_idx: u32,
        timestamp: i32,
    ) -> bool {
        let (with_flow, with_stereo, with_covariances, with_filtering) = present;
        let frame_idx = u64::from(frame_idx);
        let timestamp = f64::from(timestamp) / 64.0;

        let flow = FlowArtifact::new(Field::from_element(2, 3, 1.0), Field::from_element(2, 3, NAN));
        let stereo = StereoArtifact {
            depth: Some(Field::from_row_slice(1, 2, &[2.0, NAN])),
            disparity_uncertainty: Some(Field::from_element(1, 2, 0.5)),
            ..Default::default()
        };
        let covariances = CovarianceBatch::new(vec![Mat3::identity()]);
        let filtering = FilteringStats::new(5, 2);
        let inputs = FrameInputs {
            flow: Some(&flow).filter(|_| with_flow),
            stereo: Some(&stereo).filter(|_| with_stereo),
            covariances: Some(&covariances).filter(|_| with_covariances),
            filtering: Some(&filtering).filter(|_| with_filtering),
        };

        let dir = TempDir::new().unwrap();
        let mut collector = FrameMetricsCollector::new(dir.path());
        collector.record(frame_idx, timestamp, inputs);
        if collector.try_save().unwrap() != 1 {
            return false;
        }
        let rows = frame_metrics::read(collector.output_path()).unwrap();
        rows.len() == 1
            && rows[0].frame_idx == frame_idx
            && rows[0].timestamp == timestamp
            && rows[0].contains_key(keys::DEPTH_MEAN) == with_stereo
            && rows[0].contains_key(keys::POINT3D_UNCERTAINTY_MEAN) == with_covariances
            && rows[0].contains_key(keys::REJECTION_RATE) == with_filtering
            && !rows[0].contains_key(keys::FLOW_MAGNITUDE_MEAN)
    }
}
