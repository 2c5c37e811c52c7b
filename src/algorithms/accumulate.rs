//! The two phases shared by SART and SIRT.
//!
//! 1. Accumulate: project a batch of rays forwards and backwards against the
//!    current image, which is only read. With the `rayon` feature, the rays
//!    are folded in parallel and the per-thread results summed.
//!
//! 2. Apply: add the normalized corrections to the image, which is written.

use std::ops::Range;

use ndarray::azip;

#[cfg(feature = "rayon")]
use rayon::prelude::*;

use crate::algorithms::Problem;
use crate::geometry::Geometry;
use crate::image::{Image, ImageData};
use crate::projection::{back_project, elementwise_add, forward_project};
use crate::projector::Projector;
use crate::system_matrix::SystemMatrixRow;
use crate::types::Weightf32;

/// How each ray's residual is normalized.
#[derive(Clone, Copy, Debug)]
pub(crate) enum RowSums<'s> {
    /// Computed from each row as it is generated. Column sums over the batch
    /// are accumulated alongside the corrections.
    OnTheFly,
    /// Looked up by ray index. No column sums are accumulated.
    Precomputed(&'s [Weightf32]),
}

/// Result of the accumulation phase.
pub(crate) struct Corrections {
    /// Per-voxel sum over rays of weight times normalized residual
    pub correction: ImageData,
    /// Per-voxel sum of the weights of the batch; empty if row sums were
    /// precomputed
    pub column_sums: ImageData,
    /// Rays with no weight in the volume
    pub skipped: usize,
}

impl Corrections {
    fn zeros(len: usize, with_columns: bool) -> Self {
        Self {
            correction: vec![0.0; len],
            column_sums: if with_columns { vec![0.0; len] } else { vec![] },
            skipped: 0,
        }
    }

    #[cfg_attr(not(feature = "rayon"), allow(unused))]
    fn merge(self, other: Self) -> Self {
        Self {
            correction : elementwise_add(self.correction , other.correction ),
            column_sums: elementwise_add(self.column_sums, other.column_sums),
            skipped    : self.skipped + other.skipped,
        }
    }
}

/// Data needed to be passed efficiently between the projection of one ray
/// and the next. Needs to work in conjunction with `fold`s.
struct FoldState<'img, const D: usize> {
    corrections: Corrections,
    system_matrix_row: SystemMatrixRow,
    image: &'img Image<D>,
}

/// Accumulation phase over the rays in `rays`.
pub(crate) fn accumulate<const D: usize, G, P>(
    problem: &Problem<'_, D, G, P>,
    image: &Image<D>,
    rays: Range<usize>,
    row_sums: RowSums<'_>,
) -> Corrections
where
    G: Geometry<D>,
    P: Projector<D>,
{
    let with_columns = matches!(row_sums, RowSums::OnTheFly);
    let len = image.volume().cells();

    // Closure preparing the state needed by `fold`: with rayon it will be
    // called at the start of every job that is launched.
    let initial_state = || FoldState {
        corrections: Corrections::zeros(len, with_columns),
        system_matrix_row: problem.projector.buffers(),
        image,
    };

    #[cfg(feature = "rayon")]
    let corrections = rays
        .into_par_iter()
        .fold(initial_state, |state, i| project_one_ray(problem, row_sums, state, i))
        .map(|state| state.corrections)
        .reduce(|| Corrections::zeros(len, with_columns), Corrections::merge);

    #[cfg(not(feature = "rayon"))]
    let corrections = rays
        .fold(initial_state(), |state, i| project_one_ray(problem, row_sums, state, i))
        .corrections;

    corrections
}

fn project_one_ray<'img, const D: usize, G, P>(
    problem: &Problem<'_, D, G, P>,
    row_sums: RowSums<'_>,
    state: FoldState<'img, D>,
    i: usize,
) -> FoldState<'img, D>
where
    G: Geometry<D>,
    P: Projector<D>,
{
    let FoldState { mut corrections, mut system_matrix_row, image } = state;
    problem.projector.update_system_matrix_row(&mut system_matrix_row, &problem.geometry.ray(i));

    let row_sum = match row_sums {
        RowSums::OnTheFly          => system_matrix_row.weight_sum(),
        RowSums::Precomputed(sums) => sums[i],
    };

    // Written so that NaN sums are skipped too
    if row_sum > 0.0 {
        let residual = problem.sinogram[i] - forward_project(&system_matrix_row, image);
        back_project(&mut corrections.correction, &system_matrix_row, residual / row_sum);
        if !corrections.column_sums.is_empty() {
            back_project(&mut corrections.column_sums, &system_matrix_row, 1.0);
        }
    } else {
        corrections.skipped += 1;
    }
    // Return values needed by next ray's iteration
    FoldState { corrections, system_matrix_row, image }
}

/// Apply phase: `x += beta * correction / column_sum` wherever the column sum
/// is positive. Voxels no ray touches are left alone.
pub(crate) fn apply<const D: usize>(image: &mut Image<D>, correction: &[Weightf32], column_sums: &[Weightf32], beta: f32) {
    azip!((x in image.data_mut(), &c in correction, &s in column_sums) {
        if s > 0.0 { *x += beta * c / s }
    });
}
