//! Parallel-beam geometry: at each of a number of equally spaced angles, a
//! row (2D) or grid (3D) of parallel rays crosses the volume.

use nalgebra::{Point2, Rotation2, Vector2};

use crate::error::{Result, TomoError};
use crate::geometry::Geometry;
use crate::types::{Lengthf32, Point, Ray, PI};
use crate::volume::Volume;

/// Rays are ordered detector-fastest: ray `i` is seen by detector
/// `i % detectors` at angle `i / detectors`.
///
/// The rays are centred on the middle of the volume and span `[-x, x]` along
/// their own direction, where `x` is the volume's first extent, so they always
/// start and end outside the volume.
///
/// The detector spacing is derived from the volume's second extent alone, so
/// it only covers the whole volume when the volume is square (cubic in 3D).
#[derive(Clone, Debug)]
pub struct ParallelGeometry<const D: usize> {
    volume: Volume<D>,
    angles: Vec<Lengthf32>,
    /// Offset of each detector from the central ray: in the plane of rotation,
    /// and along the third axis (unused in 2D).
    detectors: Vec<[Lengthf32; 2]>,
}

impl<const D: usize> ParallelGeometry<D> {

    /// `angle_count` angles equally spaced over `[0, pi)`, each with
    /// `detector_count` detectors per axis perpendicular to the rays.
    pub fn new(angle_count: usize, detector_count: usize, volume: Volume<D>) -> Result<Self> {
        if D != 2 && D != 3 {
            return Err(TomoError::UnsupportedDimension { dimension: D, component: "Parallel geometry" })
        }
        if angle_count    == 0 { return Err(TomoError::NonPositive { what: "angles"    }) }
        if detector_count == 0 { return Err(TomoError::NonPositive { what: "detectors" }) }

        let angle_step = PI / angle_count as Lengthf32;
        let angles = (0..angle_count)
            .map(|k| k as Lengthf32 * angle_step)
            .collect();

        let detector_step = volume.y() as Lengthf32 / detector_count as Lengthf32;
        let detectors = (0..detector_count.pow(D as u32 - 1))
            .map(|d| detector_location::<D>(d, detector_count, detector_step))
            .collect();

        Ok(Self { volume, angles, detectors })
    }

    pub fn angles(&self) -> &[Lengthf32] { &self.angles }

    /// Offsets of the detectors from the central ray.
    pub fn detectors(&self) -> &[[Lengthf32; 2]] { &self.detectors }
}

fn detector_location<const D: usize>(d: usize, count: usize, step: Lengthf32) -> [Lengthf32; 2] {
    let centre = (count - 1) as Lengthf32 * 0.5;
    let across = ((d % count) as Lengthf32 - centre) * step;
    let along  = if D == 3 { ((d / count) as Lengthf32 - centre) * step } else { 0.0 };
    [across, along]
}

/// The ray at `offset` from the central ray, rotated clockwise by `angle`,
/// in the plane of the first two axes.
fn in_plane_ray(offset: Lengthf32, angle: Lengthf32, nx: Lengthf32, ny: Lengthf32) -> (Point2<Lengthf32>, Point2<Lengthf32>) {
    let rotation = Rotation2::new(-angle);
    let centre = Vector2::new(0.5 * nx, 0.5 * ny);
    let source   = rotation * Point2::new(-nx, offset) + centre;
    let detector = rotation * Point2::new( nx, offset) + centre;
    (source, detector)
}

impl<const D: usize> Geometry<D> for ParallelGeometry<D> {

    fn volume(&self) -> &Volume<D> { &self.volume }

    fn ray_count(&self) -> usize { self.angles.len() * self.detectors.len() }

    fn ray(&self, i: usize) -> Ray<D> {
        assert!(i < self.ray_count(), "Ray index {i} out of range for geometry with {} rays", self.ray_count());
        let per_angle = self.detectors.len();
        let [across, along] = self.detectors[i % per_angle];
        let angle = self.angles[i / per_angle];

        let v = &self.volume;
        let (s, d) = in_plane_ray(across, angle, v.x() as Lengthf32, v.y() as Lengthf32);

        let mut source   = [0.0; D];
        let mut detector = [0.0; D];
        source  [..2].copy_from_slice(&[s.x, s.y]);
        detector[..2].copy_from_slice(&[d.x, d.y]);
        // The third coordinate does not depend on the angle
        if let (Some(sz), Some(dz)) = (source.get_mut(2), detector.get_mut(2)) {
            let z = along + 0.5 * v.extent(2) as Lengthf32;
            *sz = z;
            *dz = z;
        }
        Ray::new(Point::from(source), Point::from(detector))
    }

    fn detectors_per_projection(&self) -> usize { self.detectors.len() }

    fn projection_count(&self) -> usize { self.angles.len() }
}
