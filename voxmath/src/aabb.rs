//! Axis-aligned box with one corner at the origin, and the part of a ray which
//! lies inside it.

use crate::{Lengthf32, Point, Ray, Vector};

/// Coordinates this close to a lower face are snapped onto it.
const EPS: Lengthf32 = 1e-5;

/// Axis-Aligned Bounding Box spanning `[0, upper[a]]` on every axis `a`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb<const D: usize> {
    pub upper: Vector<D>,
}

/// The portion of a ray which lies inside an `Aabb`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segment<const D: usize> {
    /// Where the ray enters the box
    pub entry: Point<D>,
    /// Unit vector pointing from the ray's source towards its detector
    pub direction: Vector<D>,
    /// Distance between entry and exit
    pub length: Lengthf32,
}

impl<const D: usize> Segment<D> {
    /// The point at distance `t` from the entry point.
    #[inline]
    pub fn at(&self, t: Lengthf32) -> Point<D> { self.entry + self.direction * t }

    pub fn exit(&self) -> Point<D> { self.at(self.length) }
}

impl<const D: usize> Aabb<D> {

    pub fn new(upper: Vector<D>) -> Self { Self { upper } }

    /// Is `p` strictly inside the box? Points on any face are outside.
    pub fn inside(&self, p: &Point<D>) -> bool {
        (0..D).all(|a| p[a] > 0.0 && p[a] < self.upper[a])
    }

    /// Find the part of `ray` which lies inside the box, using the slab
    /// method: intersect the parameter intervals in which the ray lies between
    /// each pair of opposite faces.
    ///
    /// Returns `None` if the ray misses the box, only touches its surface, or
    /// has zero length. A ray running within a face is treated as missing.
    pub fn clip(&self, ray: &Ray<D>) -> Option<Segment<D>> {
        let length = ray.length();
        if !(length > 0.0) { return None }
        let direction = ray.direction() / length;

        // Parameter range along the ray, limited to the segment itself
        let (mut t_in, mut t_out): (Lengthf32, Lengthf32) = (0.0, length);

        for axis in 0..D {
            let (s, u, hi) = (ray.source[axis], direction[axis], self.upper[axis]);
            if u == 0.0 {
                // Parallel to this pair of faces: it never crosses them, so it
                // must lie strictly between them
                if s <= 0.0 || s >= hi { return None }
            } else {
                let a = (0.0 - s) / u;
                let b = (hi  - s) / u;
                t_in  = t_in .max(a.min(b));
                t_out = t_out.min(a.max(b));
            }
        }
        if t_out <= t_in { return None }

        // Floating-point subtractions which should give zero usually miss very
        // slightly: a tiny negative coordinate would place the entry point in a
        // non-existent voxel.
        let entry = (ray.source + direction * t_in)
            .map(|x| if x.abs() < EPS { 0.0 } else { x });

        Some(Segment { entry, direction, length: t_out - t_in })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{point, vector};
    use float_eq::assert_float_eq;
    #[allow(unused)] use pretty_assertions::{assert_eq, assert_ne};
    use rstest::rstest;

    fn cube<const D: usize>(k: Lengthf32) -> Aabb<D> { Aabb::new(Vector::repeat(k)) }

    // k = 4; k/2 = 2; k/3 = 1 (integer division); k/4 = 1
    #[rstest(/**/ p       , expected,
             case([0.0, 0.0], false),
             case([4.0, 4.0], false),
             case([2.0, 2.0], true ),
             case([1.0, 2.0], true ),
             case([0.0, 4.0], false),
             case([4.0, 0.0], false),
             case([1.0, 1.0], true ),
    )]
    fn inside_2d(p: [Lengthf32; 2], expected: bool) {
        assert_eq!(cube::<2>(4.0).inside(&point(p)), expected);
    }

    #[rstest(/**/ p            , expected,
             case([0.0, 0.0, 0.0], false),
             case([4.0, 4.0, 0.0], false),
             case([2.0, 2.0, 2.0], true ),
             case([1.0, 2.0, 1.0], true ),
             case([0.0, 4.0, 0.0], false),
             case([4.0, 0.0, 0.0], false),
             case([1.0, 1.0, 1.0], true ),
    )]
    fn inside_3d(p: [Lengthf32; 3], expected: bool) {
        assert_eq!(cube::<3>(4.0).inside(&point(p)), expected);
    }

    // This set of hand-picked values should be easy to verify by humans.
    #[rstest(/**/   source   ,  detector   , length, entry     ,
             // straight through, both directions
             case([-1.0, 2.5], [ 9.0, 2.5],  8.0  , [0.0, 2.5]),
             case([ 9.0, 2.5], [-1.0, 2.5],  8.0  , [8.0, 2.5]),
             case([ 3.0, 9.0], [ 3.0,-9.0],  8.0  , [3.0, 8.0]),
             // main diagonal
             case([-1.0,-1.0], [ 9.0, 9.0], 11.313708, [0.0, 0.0]),
             // detector inside the box
             case([-2.0, 4.0], [ 5.0, 4.0],  5.0  , [0.0, 4.0]),
             // clipping a corner
             case([-1.0, 1.0], [ 1.0,-1.0],  0.0  , [0.0, 0.0]),
             case([-1.0, 2.0], [ 2.0,-1.0],  1.4142135, [0.0, 1.0]),
    )]
    fn clip_hand_picked(source: [Lengthf32; 2], detector: [Lengthf32; 2], length: Lengthf32, entry: [Lengthf32; 2]) {
        let ray = Ray::new(point(source), point(detector));
        match cube::<2>(8.0).clip(&ray) {
            None => assert_eq!(length, 0.0, "expected a hit for {ray}"),
            Some(segment) => {
                assert_float_eq!(segment.length, length, abs <= 1e-4);
                assert_float_eq!([segment.entry.x, segment.entry.y], entry, abs <= [1e-4, 1e-4]);
            }
        }
    }

    #[rstest(/**/   source   ,  detector   ,
             // passes beside the box
             case([-1.0, 9.0], [ 9.0, 9.0]),
             // runs exactly along a face
             case([-1.0, 0.0], [ 9.0, 0.0]),
             case([-1.0, 8.0], [ 9.0, 8.0]),
             // stops before reaching the box
             case([-9.0, 4.0], [-1.0, 4.0]),
             // degenerate
             case([ 4.0, 4.0], [ 4.0, 4.0]),
    )]
    fn clip_misses(source: [Lengthf32; 2], detector: [Lengthf32; 2]) {
        let ray = Ray::new(point(source), point(detector));
        assert_eq!(cube::<2>(8.0).clip(&ray), None);
    }

    #[test]
    fn clip_3d_axis_parallel_in_z() {
        let ray = Ray::new(point([-4.0, 2.0, 1.5]), point([12.0, 2.0, 1.5]));
        let aabb = Aabb::new(vector([8.0, 4.0, 3.0]));
        let segment = aabb.clip(&ray).unwrap();
        assert_float_eq!(segment.length, 8.0, ulps <= 1);
        assert_eq!(segment.exit(), point([8.0, 2.0, 1.5]));
    }

    use proptest::prelude::*;
    // Every ray through an interior point must be clipped to a segment whose
    // ends lie on the surface of the box, and which contains the interior point.
    proptest! {
        #[test]
        fn clipped_segment_stays_in_box(
            px in 0.1..(0.9 as Lengthf32),
            py in 0.1..(0.9 as Lengthf32),
            pz in 0.1..(0.9 as Lengthf32),
            theta in 0.0..std::f32::consts::PI,
            phi   in 0.0..std::f32::consts::TAU,
            (nx, ny, nz) in (1..40_u16, 1..40_u16, 1..40_u16),
        ) {
            let upper = vector([nx as Lengthf32, ny as Lengthf32, nz as Lengthf32]);
            let aabb = Aabb::new(upper);
            let p = point([px * upper.x, py * upper.y, pz * upper.z]);
            let u = vector([theta.sin() * phi.cos(), theta.sin() * phi.sin(), theta.cos()]);
            let reach = upper.norm() * 2.0;
            let ray = Ray::new(p - u * reach, p + u * reach);
            let segment = aabb.clip(&ray).unwrap();
            let tol = 1e-3;
            for end in [segment.entry, segment.exit()] {
                for a in 0..3 {
                    assert!(end[a] >= -tol && end[a] <= upper[a] + tol);
                }
            }
            // The interior point lies between entry and exit
            let along = (p - segment.entry).dot(&segment.direction);
            assert!(along > 0.0 && along < segment.length);
        }
    }
}
