//! Geometry made of an explicit list of rays.

use rand::Rng;
use rand_distr::StandardNormal;

use crate::error::{Result, TomoError};
use crate::geometry::Geometry;
use crate::types::{Lengthf32, Point, Ray, Vector};
use crate::volume::Volume;

/// An arbitrary collection of rays, treated as a single projection.
#[derive(Clone, Debug)]
pub struct ListGeometry<const D: usize> {
    volume: Volume<D>,
    rays: Vec<Ray<D>>,
}

impl<const D: usize> ListGeometry<D> {

    pub fn new(rays: Vec<Ray<D>>, volume: Volume<D>) -> Result<Self> {
        if rays.is_empty() { return Err(TomoError::EmptyRayList) }
        Ok(Self { volume, rays })
    }

    /// `count` rays in uniformly random directions, each passing through a
    /// random point in the central half of the volume (along each axis).
    pub fn random<R: Rng + ?Sized>(count: usize, volume: Volume<D>, rng: &mut R) -> Result<Self> {
        if count == 0 { return Err(TomoError::NonPositive { what: "rays" }) }
        let lengths = volume.lengths();
        // Long enough to start and end outside the volume from any interior point
        let reach = lengths.norm();
        let rays = (0..count)
            .map(|_| {
                let p = Point::from(lengths.map(|l| l * rng.gen_range(0.25..0.75)));
                let u = random_direction::<D, R>(rng);
                Ray::new(p - u * reach, p + u * reach)
            })
            .collect();
        Self::new(rays, volume)
    }

    pub fn as_slice(&self) -> &[Ray<D>] { &self.rays }
}

/// Isotropic unit vector: normalized Gaussian samples.
fn random_direction<const D: usize, R: Rng + ?Sized>(rng: &mut R) -> Vector<D> {
    loop {
        let v: Vector<D> = Vector::from_fn(|_, _| rng.sample::<Lengthf32, _>(StandardNormal));
        let norm = v.norm();
        if norm > 1e-3 { return v / norm }
    }
}

impl<const D: usize> Geometry<D> for ListGeometry<D> {
    fn volume(&self) -> &Volume<D> { &self.volume }
    fn ray_count(&self) -> usize { self.rays.len() }
    fn ray(&self, i: usize) -> Ray<D> { self.rays[i] }
    fn detectors_per_projection(&self) -> usize { self.rays.len() }
    fn projection_count(&self) -> usize { 1 }
}
