//! Acquisition geometries: which rays pass through the volume.
//!
//! A geometry owns a fixed, finite, ordered set of rays. Ray `i` of a geometry
//! corresponds to entry `i` of any sinogram made for it. Rays are grouped into
//! projections: contiguous ranges of ray indices which SART processes as one
//! batch.

use std::ops::Range;

use crate::error::{Result, TomoError};
use crate::types::Ray;
use crate::volume::Volume;

pub mod parallel;
pub mod list;

pub use parallel::ParallelGeometry;
pub use list::ListGeometry;

/// Read-only, indexed access to the rays of an acquisition.
///
/// Implementations must be cheap to query concurrently: reconstructions ask
/// for rays from many threads.
pub trait Geometry<const D: usize>: Sync {

    /// The volume which the rays were generated for.
    fn volume(&self) -> &Volume<D>;

    fn ray_count(&self) -> usize;

    /// The ray with index `i`.
    ///
    /// # Panics
    /// Panics if `i >= self.ray_count()`. See `try_ray`.
    fn ray(&self, i: usize) -> Ray<D>;

    /// Number of rays in each projection.
    fn detectors_per_projection(&self) -> usize;

    fn projection_count(&self) -> usize {
        self.ray_count() / self.detectors_per_projection()
    }

    /// Indices of the rays making up projection `p`.
    fn projection(&self, p: usize) -> Range<usize> {
        let n = self.detectors_per_projection();
        p * n .. (p + 1) * n
    }

    /// `[detectors per projection, number of projections]`
    fn sinogram_shape(&self) -> [usize; 2] {
        [self.detectors_per_projection(), self.projection_count()]
    }

    fn try_ray(&self, i: usize) -> Result<Ray<D>> {
        let len = self.ray_count();
        if i >= len { return Err(TomoError::IndexOutOfRange { index: i, len }) }
        Ok(self.ray(i))
    }

    /// Iterate over all rays in index order.
    fn rays(&self) -> Rays<'_, Self, D> where Self: Sized {
        Rays { geometry: self, next: 0, end: self.ray_count() }
    }
}

/// Iterator over the rays of a `Geometry`, produced by `Geometry::rays`.
#[derive(Debug)]
pub struct Rays<'g, G, const D: usize> {
    geometry: &'g G,
    next: usize,
    end: usize,
}

impl<'g, G, const D: usize> Clone for Rays<'g, G, D> {
    fn clone(&self) -> Self { Self { geometry: self.geometry, next: self.next, end: self.end } }
}

impl<'g, G: Geometry<D>, const D: usize> Iterator for Rays<'g, G, D> {
    type Item = Ray<D>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.end { return None }
        let ray = self.geometry.ray(self.next);
        self.next += 1;
        Some(ray)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.end - self.next;
        (n, Some(n))
    }
}

impl<'g, G: Geometry<D>, const D: usize> DoubleEndedIterator for Rays<'g, G, D> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.next >= self.end { return None }
        self.end -= 1;
        Some(self.geometry.ray(self.end))
    }
}

impl<'g, G: Geometry<D>, const D: usize> ExactSizeIterator for Rays<'g, G, D> {}

/// The geometries provided by this crate, selectable at runtime.
#[derive(Clone, Debug)]
pub enum AnyGeometry<const D: usize> {
    Parallel(ParallelGeometry<D>),
    List(ListGeometry<D>),
}

macro_rules! delegate {
    ($self:ident, $g:ident => $body:expr) => {
        match $self {
            AnyGeometry::Parallel($g) => $body,
            AnyGeometry::List    ($g) => $body,
        }
    };
}

impl<const D: usize> Geometry<D> for AnyGeometry<D> {
    fn volume(&self) -> &Volume<D>               { delegate!(self, g => g.volume()) }
    fn ray_count(&self) -> usize                 { delegate!(self, g => g.ray_count()) }
    fn ray(&self, i: usize) -> Ray<D>            { delegate!(self, g => g.ray(i)) }
    fn detectors_per_projection(&self) -> usize  { delegate!(self, g => g.detectors_per_projection()) }
    fn projection_count(&self) -> usize          { delegate!(self, g => g.projection_count()) }
}

impl<const D: usize> From<ParallelGeometry<D>> for AnyGeometry<D> {
    fn from(g: ParallelGeometry<D>) -> Self { Self::Parallel(g) }
}

impl<const D: usize> From<ListGeometry<D>> for AnyGeometry<D> {
    fn from(g: ListGeometry<D>) -> Self { Self::List(g) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use voxmath::point;

    fn three_rays() -> ListGeometry<2> {
        let v = Volume::cubic(4).unwrap();
        let rays = (0..3)
            .map(|k| Ray::new(point([-1.0, k as f32 + 0.5]), point([5.0, k as f32 + 0.5])))
            .collect();
        ListGeometry::new(rays, v).unwrap()
    }

    #[test]
    fn rays_iterates_in_index_order() {
        let g = three_rays();
        let rays = g.rays();
        assert_eq!(rays.len(), 3);
        let ys: Vec<_> = rays.map(|r| r.source.y).collect();
        assert_eq!(ys, vec![0.5, 1.5, 2.5]);
        let last = g.rays().next_back().unwrap();
        assert_eq!(last, g.ray(2));
    }

    #[test]
    fn try_ray_reports_out_of_range() {
        let g = three_rays();
        assert_eq!(g.try_ray(3), Err(TomoError::IndexOutOfRange { index: 3, len: 3 }));
        assert!(g.try_ray(2).is_ok());
    }

    #[test]
    fn any_geometry_delegates() {
        let g = three_rays();
        let any: AnyGeometry<2> = g.clone().into();
        assert_eq!(any.ray_count(), 3);
        assert_eq!(any.ray(1), g.ray(1));
        assert_eq!(any.sinogram_shape(), [3, 1]);
    }
}
