use crate::{Lengthf32, Point, Vector};

/// A line segment from a source to a detector.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray<const D: usize> {
    pub source: Point<D>,
    pub detector: Point<D>,
}

impl<const D: usize> Ray<D> {
    pub fn new(source: Point<D>, detector: Point<D>) -> Self { Self { source, detector } }

    /// Unnormalized direction: from source to detector.
    pub fn direction(&self) -> Vector<D> { self.detector - self.source }

    pub fn length(&self) -> Lengthf32 { self.direction().norm() }

    /// Translate both ends of the ray by `offset`.
    pub fn shifted(&self, offset: Vector<D>) -> Self {
        Self { source: self.source + offset, detector: self.detector + offset }
    }
}

use core::fmt;
impl<const D: usize> fmt::Display for Ray<D> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let (p, q) = (self.source, self.detector);
        write!(f, "<Ray (")?;
        for x in p.coords.iter() { write!(f, " {x:8.2}")?; }
        write!(f, " ) -> (")?;
        for x in q.coords.iter() { write!(f, " {x:8.2}")?; }
        write!(f, " ) /{:8.2} >", self.length())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{point, vector};
    use float_eq::assert_float_eq;
    #[allow(unused)] use pretty_assertions::{assert_eq, assert_ne};

    #[test]
    fn direction_and_length() {
        let ray = Ray::new(point([1.0, 1.0]), point([4.0, 5.0]));
        assert_eq!(ray.direction(), vector([3.0, 4.0]));
        assert_float_eq!(ray.length(), 5.0, ulps <= 1);
    }

    #[test]
    fn shifting_preserves_direction() {
        let ray = Ray::new(point([0.0, 0.0, 0.0]), point([1.0, 2.0, 3.0]));
        let moved = ray.shifted(vector([10.0, 10.0, 10.0]));
        assert_eq!(moved.source, point([10.0, 10.0, 10.0]));
        assert_eq!(moved.direction(), ray.direction());
    }

    #[test]
    fn display() {
        let ray = Ray::new(point([0.0, 0.0]), point([3.0, 4.0]));
        let shown = ray.to_string();
        assert!(shown.starts_with("<Ray ("));
        assert!(shown.contains("5.00"));
    }
}
