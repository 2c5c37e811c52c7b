//! The extent and granularity of the region in which images are reconstructed.
//!
//! Voxels are unit cubes, so a volume with `n` voxels along some axis spans
//! `[0, n)` on that axis.

use crate::error::{Result, TomoError};
use crate::index::{index_d_to_1, index1_to_d};
use crate::types::{BoxDim_u, Index1_u, IndexD_u, Lengthf32, Point, Ray, Vector};
use voxmath::{Aabb, Segment};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Volume<const D: usize> {
    n: BoxDim_u<D>,
}

impl<const D: usize> Volume<D> {

    /// A (hyper)rectangular volume with `n[a]` voxels along axis `a`.
    pub fn new(n: BoxDim_u<D>) -> Result<Self> {
        if D == 0 {
            return Err(TomoError::UnsupportedDimension { dimension: D, component: "Volume" })
        }
        if let Some(axis) = n.iter().position(|&k| k == 0) {
            return Err(TomoError::ZeroExtent { axis })
        }
        Ok(Self { n })
    }

    /// A volume spanning `k` voxels on each axis.
    pub fn cubic(k: usize) -> Result<Self> { Self::new([k; D]) }

    pub fn extents(&self) -> BoxDim_u<D> { self.n }

    /// Number of voxels along `axis`.
    pub fn extent(&self, axis: usize) -> usize { self.n[axis] }

    /// Extents along the first three axes.
    ///
    /// # Panics
    /// If the volume has fewer dimensions than the axis asked for: `z` panics
    /// on a 2-dimensional volume. Use `extent` for dimension-generic code.
    pub fn x(&self) -> usize { self.n[0] }
    pub fn y(&self) -> usize { self.n[1] }
    pub fn z(&self) -> usize { self.n[2] }

    /// Total number of voxels.
    pub fn cells(&self) -> usize { self.n.iter().product() }

    /// Linear index of the voxel at `coords`.
    ///
    /// # Panics
    /// Panics if any coordinate lies outside the volume. See `try_index`.
    pub fn index(&self, coords: IndexD_u<D>) -> Index1_u {
        match self.try_index(coords) {
            Ok(i) => i,
            Err(e) => panic!("{e}"),
        }
    }

    pub fn try_index(&self, coords: IndexD_u<D>) -> Result<Index1_u> {
        for axis in 0..D {
            if coords[axis] >= self.n[axis] {
                return Err(TomoError::CoordinateOutOfRange {
                    axis, coordinate: coords[axis], extent: self.n[axis]
                })
            }
        }
        Ok(index_d_to_1(coords, self.n))
    }

    /// D-dimensional coordinates of the voxel with linear index `i`.
    ///
    /// # Panics
    /// Panics if `i >= self.cells()`. See `try_unroll`.
    pub fn unroll(&self, i: Index1_u) -> IndexD_u<D> {
        match self.try_unroll(i) {
            Ok(coords) => coords,
            Err(e) => panic!("{e}"),
        }
    }

    pub fn try_unroll(&self, i: Index1_u) -> Result<IndexD_u<D>> {
        let len = self.cells();
        if i >= len { return Err(TomoError::IndexOutOfRange { index: i, len }) }
        Ok(index1_to_d(i, self.n))
    }

    /// Physical side lengths.
    pub fn lengths(&self) -> Vector<D> { Vector::from(self.n.map(|k| k as Lengthf32)) }

    pub fn centre(&self) -> Point<D> { Point::from(self.lengths() / 2.0) }

    /// Find centre of voxel with given D-dimensional index
    pub fn voxel_centre(&self, i: IndexD_u<D>) -> Point<D> {
        Point::from(i.map(|n| n as Lengthf32 + 0.5))
    }

    /// Linear index of the voxel containing `p`, if `p` lies in the volume.
    pub fn voxel_containing(&self, p: &Point<D>) -> Option<Index1_u> {
        let mut coords = [0; D];
        for axis in 0..D {
            let x = p[axis].floor();
            // Written so that NaN is rejected too
            if !(x >= 0.0 && x < self.n[axis] as Lengthf32) { return None }
            coords[axis] = x as usize;
        }
        Some(index_d_to_1(coords, self.n))
    }

    pub fn aabb(&self) -> Aabb<D> { Aabb::new(self.lengths()) }

    /// Is `p` strictly inside the volume? Points on its surface are not.
    pub fn inside(&self, p: &Point<D>) -> bool { self.aabb().inside(p) }

    /// The part of `ray` which passes through the volume.
    pub fn entry(&self, ray: &Ray<D>) -> Option<Segment<D>> { self.aabb().clip(ray) }
}
