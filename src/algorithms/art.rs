//! Algebraic Reconstruction Technique: the Kaczmarz method.
//!
//! Each ray in turn projects the current image onto the hyperplane of images
//! consistent with that ray's measurement (scaled by the relaxation factor).
//! Every update is visible to the next ray, so rays must be processed
//! sequentially, in index order.

use crate::algorithms::{check_beta, Iterative, Problem, Sweep};
use crate::error::Result;
use crate::geometry::Geometry;
use crate::image::Image;
use crate::projection::{back_project, forward_project};
use crate::projector::Projector;
use crate::sinogram::Sinogram;
use crate::system_matrix::SystemMatrixRow;
use crate::types::Intensityf32;
use crate::volume::Volume;

pub struct Art<'a, const D: usize, G, P> {
    problem: Problem<'a, D, G, P>,
    beta: f32,
}

impl<'a, const D: usize, G, P> Art<'a, D, G, P>
where
    G: Geometry<D>,
    P: Projector<D>,
{
    pub fn new(geometry: &'a G, projector: &'a P, sinogram: &'a Sinogram, beta: f32) -> Result<Self> {
        check_beta(beta)?;
        Ok(Self { problem: Problem::new(geometry, projector, sinogram)?, beta })
    }

    /// Correct `image` using ray `i` alone. Returns `false` if the ray has no
    /// weight in the volume and was skipped.
    fn correct_one_ray(&self, i: usize, image: &mut Image<D>, system_matrix_row: &mut SystemMatrixRow) -> bool {
        let Problem { geometry, projector, sinogram } = self.problem;
        projector.update_system_matrix_row(system_matrix_row, &geometry.ray(i));

        let norm = system_matrix_row.squared_norm();
        // Written so that NaN norms are skipped too
        if !(norm > 0.0) { return false }

        let residual = sinogram[i] - forward_project(system_matrix_row, image);
        back_project(image.data_mut(), system_matrix_row, self.beta * residual / norm);
        true
    }
}

impl<'a, const D: usize, G, P> Iterative<D> for Art<'a, D, G, P>
where
    G: Geometry<D>,
    P: Projector<D>,
{
    fn name(&self) -> &'static str { "ART" }

    fn volume(&self) -> &Volume<D> { self.problem.volume() }

    fn ray_count(&self) -> usize { self.problem.geometry.ray_count() }

    fn iterate(&self, image: &mut Image<D>) -> Sweep {
        let mut system_matrix_row = self.problem.projector.buffers();
        let mut skipped = 0;
        for i in 0..self.ray_count() {
            if !self.correct_one_ray(i, image, &mut system_matrix_row) { skipped += 1 }
        }
        Sweep { skipped }
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

    #[test]
    fn single_ray_is_satisfied_exactly_with_unit_relaxation() {
        let v = Volume::<2>::cubic(4).unwrap();
        let g = ListGeometry::new(vec![Ray::new(point([-1.0, 1.5]), point([5.0, 1.5]))], v).unwrap();
        let p = AnyProjector::new(ProjectorKind::Closest, v);
        let s = Sinogram::from_geometry(&g, vec![8.0]).unwrap();
        let art = Art::new(&g, &p, &s, 1.0).unwrap();
        let mut image = Image::zeros(v);
        art.iterate(&mut image);
        // Residual 8 spread evenly over the 4 voxels of row 1
        for x in 0..4 {
            assert_float_eq!(image[[x, 1]], 2.0, ulps <= 1);
        }
        assert_eq!(image.data().iter().sum::<f32>(), 8.0);
        assert_float_eq!(art.residual_norm(&image), 0.0, abs <= 1e-6);
    }

    #[test]
    fn later_rays_see_earlier_updates() {
        let v = Volume::<2>::cubic(2).unwrap();
        // The same horizontal ray twice, with inconsistent measurements
        let ray = Ray::new(point([-1.0, 0.5]), point([3.0, 0.5]));
        let g = ListGeometry::new(vec![ray, ray], v).unwrap();
        let p = AnyProjector::new(ProjectorKind::Closest, v);
        let s = Sinogram::from_geometry(&g, vec![2.0, 4.0]).unwrap();
        let mut image = Image::zeros(v);
        Art::new(&g, &p, &s, 1.0).unwrap().iterate(&mut image);
        // The second ray corrects the first ray's result, rather than the
        // starting image
        assert_eq!(image.data(), &[2.0, 2.0, 0.0, 0.0]);
    }

    #[test]
    fn rays_missing_the_volume_are_skipped() {
        let v = Volume::<2>::cubic(4).unwrap();
        let hit  = Ray::new(point([-1.0, 1.5]), point([5.0, 1.5]));
        let miss = Ray::new(point([-1.0, 7.0]), point([5.0, 7.0]));
        let g = ListGeometry::new(vec![miss, hit], v).unwrap();
        let p = AnyProjector::new(ProjectorKind::Linear, v);
        let s = Sinogram::from_geometry(&g, vec![3.0, 4.0]).unwrap();
        let mut image = Image::zeros(v);
        let sweep = Art::new(&g, &p, &s, 0.5).unwrap().iterate(&mut image);
        assert_eq!(sweep, Sweep { skipped: 1 });
        assert!(image.data().iter().all(|x| x.is_finite()));
    }

    #[test]
    fn sweep_counts_every_skipped_ray() {
        let v = Volume::<2>::cubic(4).unwrap();
        let miss = |y: f32| Ray::new(point([-1.0, y]), point([5.0, y]));
        let g = ListGeometry::new(vec![miss(-2.0), miss(6.0), miss(9.0)], v).unwrap();
        let p = AnyProjector::new(ProjectorKind::Joseph, v);
        let s = Sinogram::from_geometry(&g, vec![1.0, 2.0, 3.0]).unwrap();
        let mut image = Image::zeros(v);
        let sweep = Art::new(&g, &p, &s, 1.0).unwrap().iterate(&mut image);
        assert_eq!(sweep, Sweep { skipped: 3 });
        assert!(image.data().iter().all(|&x| x == 0.0));
    }
}
