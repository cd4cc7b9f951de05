// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Type aliases for common types used all over the code base.

use nalgebra as na;

/// Upstream artifacts are produced in single precision.
/// Statistics are accumulated in `f64` though, see `math::stats`.
pub type Float = f32;

/// A dense 2D grid of Floats (flow channel, depth map, disparity map, ...).
pub type Field = na::DMatrix<Float>;

/// A 3x3 matrix of Floats.
pub type Mat3 = na::Matrix3<Float>;
