// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use vo_frame_metrics::core::artifact::{FlowArtifact, StereoArtifact};
use vo_frame_metrics::core::reduce::{flow, stereo};
use vo_frame_metrics::misc::type_aliases::{Field, Float};

// Inputs.

/// VGA sized field with one invalid entry every `nan_every`.
fn field(nan_every: usize, scale: Float) -> Field {
    Field::from_fn(480, 640, |i, j| {
        if (i * 640 + j) % nan_every == 0 {
            Float::NAN
        } else {
            scale * ((i + j) % 17) as Float
        }
    })
}

// Benches.

fn criterion_benchmark(c: &mut Criterion) {
    let flow = FlowArtifact::new(field(7, 0.5), field(11, -0.25)).with_uncertainty(field(5, 0.1));
    let stereo = StereoArtifact {
        depth: Some(field(3, 2.0)),
        disparity: Some(field(3, 0.5)),
        disparity_uncertainty: Some(field(13, 0.01)),
        depth_uncertainty: Some(field(13, 0.02)),
    };

    c.bench_function("Flow magnitude", |b| {
        b.iter(|| flow::magnitude_metrics(black_box(Some(&flow))))
    });
    c.bench_function("Flow uncertainty", |b| {
        b.iter(|| flow::uncertainty_metrics(black_box(Some(&flow))))
    });
    c.bench_function("Stereo", |b| {
        b.iter(|| stereo::stereo_metrics(black_box(Some(&stereo))))
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
