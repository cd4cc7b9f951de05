// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Helper type to accumulate summary statistics of a lot of values.

use std::iter::FromIterator;

/// Streaming accumulator of count, mean, variance, min and max.
///
/// Uses Welford's update so that large fields (a full resolution depth map
/// is a few hundred thousand values) do not lose precision.
/// The variance is the population variance (normalized by the number of values).
#[derive(Clone, Debug)]
pub struct Stats {
    nb_data: u64,
    mean: f64,
    m2: f64,
    min: f64,
    max: f64,
}

impl Stats {
    /// Initialize without any value.
    #[inline]
    pub fn new() -> Self {
        Self {
            nb_data: 0,
            mean: 0.0,
            m2: 0.0,
            min: std::f64::INFINITY,
            max: std::f64::NEG_INFINITY,
        }
    }

    /// Add a value to the accumulator.
    #[inline]
    #[allow(clippy::cast_precision_loss)]
    pub fn push(&mut self, x: f64) {
        self.nb_data += 1;
        let delta = x - self.mean;
        self.mean += delta / self.nb_data as f64;
        self.m2 += delta * (x - self.mean);
        self.min = self.min.min(x);
        self.max = self.max.max(x);
    }

    /// Number of accumulated values.
    #[inline]
    pub fn nb_data(&self) -> u64 {
        self.nb_data
    }

    /// True if no value was accumulated.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nb_data == 0
    }

    /// Mean of accumulated values.
    pub fn mean(&self) -> Option<f64> {
        self.non_empty(self.mean)
    }

    /// Population variance of accumulated values.
    #[allow(clippy::cast_precision_loss)]
    pub fn variance(&self) -> Option<f64> {
        self.non_empty(self.m2 / self.nb_data as f64)
    }

    /// Population standard deviation of accumulated values.
    ///
    /// Non-finite inputs are not filtered here, a NaN they produce is kept.
    pub fn std(&self) -> Option<f64> {
        self.variance().map(f64::sqrt)
    }

    /// Smallest accumulated value.
    pub fn min(&self) -> Option<f64> {
        self.non_empty(self.min)
    }

    /// Biggest accumulated value.
    pub fn max(&self) -> Option<f64> {
        self.non_empty(self.max)
    }

    fn non_empty(&self, value: f64) -> Option<f64> {
        if self.is_empty() {
            None
        } else {
            Some(value)
        }
    }
}

impl Default for Stats {
    fn default() -> Self {
        Self::new()
    }
}

impl Extend<f64> for Stats {
    fn extend<I: IntoIterator<Item = f64>>(&mut self, iter: I) {
        iter.into_iter().for_each(|x| self.push(x));
    }
}

impl FromIterator<f64> for Stats {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        let mut stats = Self::new();
        stats.extend(iter);
        stats
    }
}

// TESTS #############################################################
