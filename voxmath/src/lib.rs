//! Points, rays and boxes in voxel-unit space, for any number of dimensions.

mod point;
mod ray;
mod aabb;

pub use point::{Point, Vector, Lengthf32, point, vector};
pub use ray::Ray;
pub use aabb::{Aabb, Segment};
