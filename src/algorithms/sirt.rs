//! Simultaneous Iterative Reconstruction Technique.
//!
//! All rays are treated together: each sweep accumulates the corrections of
//! the whole sinogram against the same image, then applies them at once.
//! Residuals are normalized by the row sums of the system matrix, and
//! corrections by its column sums, both computed once up front.

use log::debug;

use crate::algorithms::accumulate::{accumulate, apply, RowSums};
use crate::algorithms::{check_beta, Iterative, Problem, Sweep};
use crate::error::Result;
use crate::geometry::Geometry;
use crate::image::{Image, ImageData};
use crate::projection::{back_projection, forward_projection};
use crate::projector::Projector;
use crate::sinogram::Sinogram;
use crate::types::{Intensityf32, Weightf32};
use crate::utils::timing::Progress;
use crate::volume::Volume;

pub struct Sirt<'a, const D: usize, G, P> {
    problem: Problem<'a, D, G, P>,
    beta: f32,
    /// Sum of weights of each ray
    row_sums: Vec<Weightf32>,
    /// Sum of weights of each voxel, over all rays
    column_sums: ImageData,
}

impl<'a, const D: usize, G, P> Sirt<'a, D, G, P>
where
    G: Geometry<D>,
    P: Projector<D>,
{
    pub fn new(geometry: &'a G, projector: &'a P, sinogram: &'a Sinogram, beta: f32) -> Result<Self> {
        check_beta(beta)?;
        let problem = Problem::new(geometry, projector, sinogram)?;
        let volume = *geometry.volume();
        let mut progress = Progress::new();
        // A x 1 and A^T 1
        progress.start("SIRT: computing row sums");
        let row_sums    =    forward_projection(&Image::ones(volume), geometry, projector)?.into_data();
        progress.done_with_message("SIRT: computed row sums");
        progress.start("SIRT: computing column sums");
        let column_sums = back_projection(&Sinogram::filled(sinogram.shape(), 1.0), geometry, projector)?.into_data();
        progress.done_with_message("SIRT: computed column sums");
        debug!("SIRT: {} voxels are not touched by any ray",
               column_sums.iter().filter(|&&c| !(c > 0.0)).count());
        Ok(Self { problem, beta, row_sums, column_sums })
    }

    pub fn row_sums   (&self) -> &[Weightf32] { &self.row_sums }
    pub fn column_sums(&self) -> &[Weightf32] { &self.column_sums }
}

impl<'a, const D: usize, G, P> Iterative<D> for Sirt<'a, D, G, P>
where
    G: Geometry<D>,
    P: Projector<D>,
{
    fn name(&self) -> &'static str { "SIRT" }

    fn volume(&self) -> &Volume<D> { self.problem.volume() }

    fn ray_count(&self) -> usize { self.problem.geometry.ray_count() }

    fn iterate(&self, image: &mut Image<D>) -> Sweep {
        let rays = 0..self.ray_count();
        let corrections = accumulate(&self.problem, image, rays, RowSums::Precomputed(&self.row_sums));
        apply(image, &corrections.correction, &self.column_sums, self.beta);
        Sweep { skipped: corrections.skipped }
    }

    fn residual_norm(&self, image: &Image<D>) -> Intensityf32 { self.problem.residual_norm(image) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::ListGeometry;
    use crate::projector::{AnyProjector, ProjectorKind};
    use crate::types::Ray;
    use float_eq::assert_float_eq;
    use voxmath::point;

    fn cross() -> (Volume<2>, ListGeometry<2>) {
        // One horizontal and one vertical ray through a 2x2 volume
        let v = Volume::cubic(2).unwrap();
        let rays = vec![
            Ray::new(point([-1.0, 0.5]), point([3.0, 0.5])),
            Ray::new(point([0.5, -1.0]), point([0.5, 3.0])),
        ];
        (v, ListGeometry::new(rays, v).unwrap())
    }

    #[test]
    fn weight_sums() {
        let (v, g) = cross();
        let p = AnyProjector::new(ProjectorKind::Closest, v);
        let s = Sinogram::for_geometry(&g);
        let sirt = Sirt::new(&g, &p, &s, 1.0).unwrap();
        assert_eq!(sirt.row_sums(), &[2.0, 2.0]);
        // [0,0] is on both rays, [1,1] on neither
        assert_eq!(sirt.column_sums(), &[2.0, 1.0, 1.0, 0.0]);
    }

    #[test]
    fn corrections_are_applied_simultaneously() {
        let (v, g) = cross();
        let p = AnyProjector::new(ProjectorKind::Closest, v);
        let s = Sinogram::from_geometry(&g, vec![4.0, 8.0]).unwrap();
        let mut image = Image::zeros(v);
        Sirt::new(&g, &p, &s, 1.0).unwrap().iterate(&mut image);
        // [0,0]: (4/2 + 8/2) / 2; [1,0]: (4/2) / 1; [0,1]: (8/2) / 1
        let data: [f32; 4] = image.data().try_into().unwrap();
        assert_float_eq!(data, [3.0, 2.0, 4.0, 0.0], ulps_all <= 1);
    }
}
