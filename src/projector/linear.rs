//! Multilinear interpolation between voxel centres.

use crate::index::index_d_to_1;
use crate::projector::{max_samples, sampling::Samples, Projector};
use crate::types::{BoxDim_u, Lengthf32, Point, Ray, SystemMatrixElement, Weightf32};
use crate::volume::Volume;

/// The voxels surrounding a point, weighted by multilinear interpolation
/// between their centres.
///
/// Yields the `2^k` corners of the interpolation cell in binary order, with
/// bit `b` of the corner number selecting the upper neighbour along the
/// `b`-th interpolated axis. Corner 0 is the voxel whose centre lies just
/// below the point on every axis. Corners outside the volume are skipped;
/// corners with zero weight are not.
#[derive(Clone, Debug)]
pub struct Interpolation<const D: usize> {
    extents: BoxDim_u<D>,
    base: [isize; D],
    fraction: [Lengthf32; D],
    axes: [usize; D],
    n_axes: usize,
    scale: Weightf32,
    corner: usize,
}

/// Interpolation weights of `p` over all axes of `volume`.
pub fn interpolate<const D: usize>(p: &Point<D>, volume: &Volume<D>) -> Interpolation<D> {
    Interpolation::around(volume, p)
}

impl<const D: usize> Interpolation<D> {

    pub fn around(volume: &Volume<D>, p: &Point<D>) -> Self {
        Self::new(volume, p, None, 1.0)
    }

    /// Interpolate within the slice `slice` perpendicular to `axis`, ignoring
    /// the position of `p` along that axis. All weights are multiplied by
    /// `scale`.
    pub fn across(volume: &Volume<D>, p: &Point<D>, axis: usize, slice: usize, scale: Weightf32) -> Self {
        Self::new(volume, p, Some((axis, slice)), scale)
    }

    fn new(volume: &Volume<D>, p: &Point<D>, fixed: Option<(usize, usize)>, scale: Weightf32) -> Self {
        let mut base     = [0; D];
        let mut fraction = [0.0; D];
        let mut axes     = [0; D];
        let mut n_axes = 0;
        for axis in 0..D {
            match fixed {
                Some((fixed_axis, slice)) if fixed_axis == axis => base[axis] = slice as isize,
                _ => {
                    // Position relative to the grid of voxel centres
                    let q = p[axis] - 0.5;
                    let lower = q.floor();
                    base    [axis] = lower as isize;
                    fraction[axis] = q - lower;
                    axes[n_axes] = axis;
                    n_axes += 1;
                }
            }
        }
        Self { extents: volume.extents(), base, fraction, axes, n_axes, scale, corner: 0 }
    }

    fn corner_count(&self) -> usize { 1 << self.n_axes }
}

impl<const D: usize> Iterator for Interpolation<D> {
    type Item = SystemMatrixElement;

    fn next(&mut self) -> Option<Self::Item> {
        'corners: while self.corner < self.corner_count() {
            let corner = self.corner;
            self.corner += 1;

            let mut position = self.base;
            let mut weight = self.scale;
            for (bit, &axis) in self.axes[..self.n_axes].iter().enumerate() {
                let f = self.fraction[axis];
                if (corner >> bit) & 1 == 1 { position[axis] += 1; weight *= f }
                else                        {                      weight *= 1.0 - f }
            }

            let mut coords = [0; D];
            for axis in 0..D {
                let x = position[axis];
                if x < 0 || x as usize >= self.extents[axis] { continue 'corners }
                coords[axis] = x as usize;
            }
            return Some((index_d_to_1(coords, self.extents), weight))
        }
        None
    }
}

/// Samples as in `ClosestProjector`, each spread over the voxels surrounding
/// it by multilinear interpolation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinearProjector<const D: usize> {
    volume: Volume<D>,
}

impl<const D: usize> LinearProjector<D> {
    pub fn new(volume: Volume<D>) -> Self { Self { volume } }
}

#[derive(Clone, Debug)]
pub struct LinearRow<const D: usize> {
    samples: Samples<D>,
    volume: Volume<D>,
    current: Option<Interpolation<D>>,
}

impl<const D: usize> Iterator for LinearRow<D> {
    type Item = SystemMatrixElement;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(element) = self.current.as_mut().and_then(Iterator::next) {
                return Some(element)
            }
            let p = self.samples.next()?;
            self.current = Some(Interpolation::around(&self.volume, &p));
        }
    }
}

impl<const D: usize> Projector<D> for LinearProjector<D> {
    type Row<'p> = LinearRow<D> where Self: 'p;

    fn volume(&self) -> &Volume<D> { &self.volume }

    fn row(&self, ray: &Ray<D>) -> LinearRow<D> {
        LinearRow { samples: Samples::new(&self.volume, ray), volume: self.volume, current: None }
    }

    fn max_row_len(&self) -> usize { max_samples(&self.volume) << D }
}
