//! Scalar, index and geometric types used throughout the crate.

pub use voxmath::{Lengthf32, Point, Vector, Ray};

pub type Weightf32    = f32;
pub type Intensityf32 = f32;

#[allow(non_camel_case_types)] pub type Index1_u = usize;
#[allow(non_camel_case_types)] pub type IndexD_u<const D: usize> = [usize; D];
#[allow(non_camel_case_types)] pub type BoxDim_u<const D: usize> = [usize; D];

/// One non-zero element of the system matrix: a voxel and its weight in the
/// current ray.
pub type SystemMatrixElement = (Index1_u, Weightf32);

pub const PI: Lengthf32 = std::f32::consts::PI;
