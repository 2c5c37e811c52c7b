//! Simultaneous Algebraic Reconstruction Technique.
//!
//! The rays of one projection are treated together: their corrections are
//! accumulated against the same image, and applied once the whole projection
//! has been seen. Projections are processed in order.

use crate::algorithms::accumulate::{accumulate, apply, RowSums};
use crate::algorithms::{check_beta, Iterative, Problem, Sweep};
use crate::error::Result;
use crate::geometry::Geometry;
use crate::image::Image;
use crate::projector::Projector;
use crate::sinogram::Sinogram;
use crate::types::Intensityf32;
use crate::volume::Volume;

pub struct Sart<'a, const D: usize, G, P> {
    problem: Problem<'a, D, G, P>,
    beta: f32,
}

impl<'a, const D: usize, G, P> Sart<'a, D, G, P>
where
    G: Geometry<D>,
    P: Projector<D>,
{
    pub fn new(geometry: &'a G, projector: &'a P, sinogram: &'a Sinogram, beta: f32) -> Result<Self> {
        check_beta(beta)?;
        Ok(Self { problem: Problem::new(geometry, projector, sinogram)?, beta })
    }
}

impl<'a, const D: usize, G, P> Iterative<D> for Sart<'a, D, G, P>
where
    G: Geometry<D>,
    P: Projector<D>,
{
    fn name(&self) -> &'static str { "SART" }

    fn volume(&self) -> &Volume<D> { self.problem.volume() }

    fn ray_count(&self) -> usize { self.problem.geometry.ray_count() }

    fn iterate(&self, image: &mut Image<D>) -> Sweep {
        let geometry = self.problem.geometry;
        let mut skipped = 0;
        for p in 0..geometry.projection_count() {
            let corrections = accumulate(&self.problem, image, geometry.projection(p), RowSums::OnTheFly);
            apply(image, &corrections.correction, &corrections.column_sums, self.beta);
            skipped += corrections.skipped;
        }
        Sweep { skipped }
    }

    fn residual_norm(&self, image: &Image<D>) -> Intensityf32 { self.problem.residual_norm(image) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{ListGeometry, ParallelGeometry};
    use crate::projection::forward_projection;
    use crate::projector::{AnyProjector, ProjectorKind};
    use crate::types::Ray;
    use float_eq::assert_float_eq;
    use voxmath::point;

    #[test]
    fn single_projection_of_parallel_rows() {
        // Horizontal rays through each row of a 3x3 volume, all in one projection
        let v = Volume::<2>::cubic(3).unwrap();
        let rays = (0..3)
            .map(|y| Ray::new(point([-1.0, y as f32 + 0.5]), point([4.0, y as f32 + 0.5])))
            .collect();
        let g = ListGeometry::new(rays, v).unwrap();
        let p = AnyProjector::new(ProjectorKind::Closest, v);
        let s = Sinogram::from_geometry(&g, vec![3.0, 6.0, 9.0]).unwrap();
        let mut image = Image::zeros(v);
        Sart::new(&g, &p, &s, 1.0).unwrap().iterate(&mut image);
        // Each row is set to its mean
        for y in 0..3 {
            for x in 0..3 {
                assert_float_eq!(image[[x, y]], (y + 1) as f32, ulps <= 1);
            }
        }
    }

    #[test]
    fn projections_are_applied_in_turn() {
        let v = Volume::<2>::cubic(8).unwrap();
        let g = ParallelGeometry::new(4, 8, v).unwrap();
        let p = AnyProjector::new(ProjectorKind::Linear, v);
        let truth = Image::from_fn(v, |q| if (q - v.centre()).norm() < 3.0 { 1.0 } else { 0.0 });
        let s = forward_projection(&truth, &g, &p).unwrap();
        let sart = Sart::new(&g, &p, &s, 0.5).unwrap();
        let mut image = Image::zeros(v);
        let before = sart.residual_norm(&image);
        let sweep = sart.iterate(&mut image);
        assert_eq!(sweep.skipped, 0);
        assert!(sart.residual_norm(&image) < before);
    }
}
