//! Conversion between 1-dimensional (linear) and D-dimensional voxel indices.
//!
//! The first axis varies fastest. These functions do no range checking:
//! `Volume::index` and `Volume::unroll` wrap them with checks.

use crate::types::{BoxDim_u, Index1_u, IndexD_u};

#[inline]
pub fn index_d_to_1<const D: usize>(index: IndexD_u<D>, size: BoxDim_u<D>) -> Index1_u {
    let mut linear = 0;
    let mut stride = 1;
    for axis in 0..D {
        linear += index[axis] * stride;
        stride *= size[axis];
    }
    linear
}

#[inline]
pub fn index1_to_d<const D: usize>(mut i: Index1_u, size: BoxDim_u<D>) -> IndexD_u<D> {
    let mut index = [0; D];
    for axis in 0..D {
        index[axis] = i % size[axis];
        i /= size[axis];
    }
    index
}
