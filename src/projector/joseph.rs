//! Joseph's method: step through the volume one slice at a time along the
//! axis which the ray is most nearly parallel to, interpolating linearly
//! within each slice.

use crate::projector::{Interpolation, Projector};
use crate::types::{Lengthf32, Ray, SystemMatrixElement, Weightf32};
use crate::volume::Volume;
use voxmath::Segment;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct JosephProjector<const D: usize> {
    volume: Volume<D>,
}

impl<const D: usize> JosephProjector<D> {
    pub fn new(volume: Volume<D>) -> Self { Self { volume } }
}

/// Row produced by `JosephProjector`: for each slice whose centre plane the
/// ray crosses inside the volume, the `2^(D-1)` in-slice neighbours of the
/// crossing point, weighted by the length of ray per slice.
#[derive(Clone, Debug)]
pub struct JosephRow<const D: usize> {
    volume: Volume<D>,
    segment: Option<Segment<D>>,
    axis: usize,
    step: Weightf32,
    next_slice: usize,
    end_slice: usize,
    current: Option<Interpolation<D>>,
}

impl<const D: usize> JosephRow<D> {

    fn empty(volume: Volume<D>) -> Self {
        Self { volume, segment: None, axis: 0, step: 0.0, next_slice: 0, end_slice: 0, current: None }
    }

    fn new(volume: Volume<D>, segment: Segment<D>) -> Self {
        let u = segment.direction;
        // Dominant axis: the ray advances at least 1/sqrt(D) along it per unit length
        let axis = u.iamax();
        let step = 1.0 / u[axis].abs();

        let (a, b) = (segment.entry[axis], segment.exit()[axis]);
        let (lo, hi) = if a < b { (a, b) } else { (b, a) };
        // Slices whose centres (s + 0.5) lie in [lo, hi]
        let last_in_volume = (volume.extent(axis) - 1) as Lengthf32;
        let first = (lo - 0.5).ceil().max(0.0);
        let last  = (hi - 0.5).floor().min(last_in_volume);
        if first > last { return Self::empty(volume) }

        Self {
            volume, segment: Some(segment), axis, step,
            next_slice: first as usize,
            end_slice: last as usize + 1,
            current: None,
        }
    }
}

impl<const D: usize> Iterator for JosephRow<D> {
    type Item = SystemMatrixElement;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(element) = self.current.as_mut().and_then(Iterator::next) {
                return Some(element)
            }
            let segment = self.segment.as_ref()?;
            if self.next_slice >= self.end_slice { return None }
            let slice = self.next_slice;
            self.next_slice += 1;

            let axis = self.axis;
            let t = (slice as Lengthf32 + 0.5 - segment.entry[axis]) / segment.direction[axis];
            let p = segment.at(t);
            self.current = Some(Interpolation::across(&self.volume, &p, axis, slice, self.step));
        }
    }
}

impl<const D: usize> Projector<D> for JosephProjector<D> {
    type Row<'p> = JosephRow<D> where Self: 'p;

    fn volume(&self) -> &Volume<D> { &self.volume }

    fn row(&self, ray: &Ray<D>) -> JosephRow<D> {
        match self.volume.entry(ray) {
            None          => JosephRow::empty(self.volume),
            Some(segment) => JosephRow::new(self.volume, segment),
        }
    }

    fn max_row_len(&self) -> usize {
        let longest = self.volume.extents().into_iter().max().unwrap_or(0);
        longest << (D - 1)
    }
}
