//! Equally spaced sample points along the part of a ray inside a volume.

use crate::types::{Lengthf32, Point, Ray};
use crate::volume::Volume;
use voxmath::Segment;

/// Unit-spaced points along the segment of a ray within a volume, centred on
/// the segment: a segment of length `L` gets `n = ceil(L)` samples, the first
/// at distance `(L - (n - 1)) / 2` from the entry point. Each sample stands
/// for unit length of the ray.
#[derive(Clone, Debug)]
pub struct Samples<const D: usize> {
    segment: Option<Segment<D>>,
    offset: Lengthf32,
    next: usize,
    count: usize,
}

impl<const D: usize> Samples<D> {

    pub fn new(volume: &Volume<D>, ray: &Ray<D>) -> Self {
        match volume.entry(ray) {
            None => Self { segment: None, offset: 0.0, next: 0, count: 0 },
            Some(segment) => {
                let count = (segment.length.ceil() as usize).max(1);
                let offset = (segment.length - (count - 1) as Lengthf32) * 0.5;
                Self { segment: Some(segment), offset, next: 0, count }
            }
        }
    }
}

impl<const D: usize> Iterator for Samples<D> {
    type Item = Point<D>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let segment = self.segment.as_ref()?;
        if self.next >= self.count { return None }
        let p = segment.at(self.offset + self.next as Lengthf32);
        self.next += 1;
        Some(p)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.count - self.next;
        (n, Some(n))
    }
}

impl<const D: usize> ExactSizeIterator for Samples<D> {}
