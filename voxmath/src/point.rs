/// Lengths are measured in voxels: a voxel is the unit cube.
pub type Lengthf32 = f32;

pub type Point <const D: usize> = nalgebra::Point  <Lengthf32, D>;
pub type Vector<const D: usize> = nalgebra::SVector<Lengthf32, D>;

// Building points from literals through nalgebra is long-winded, so provide
// some pithily-named convenience constructors.
pub fn point <const D: usize>(xs: [Lengthf32; D]) -> Point <D> { Point ::from(xs) }
pub fn vector<const D: usize>(xs: [Lengthf32; D]) -> Vector<D> { Vector::from(xs) }
