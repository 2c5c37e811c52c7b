//! Measured or simulated ray integrals, one per ray of a geometry.

use std::ops::Range;

use ndarray::{ArrayView2, ShapeBuilder};

use crate::error::{Result, TomoError};
use crate::geometry::Geometry;
use crate::types::{Index1_u, Intensityf32};

/// Ray integrals laid out as `[detector, projection]`, with the detector
/// index varying fastest. Entry `i` belongs to ray `i` of the geometry which
/// the sinogram was made for.
#[derive(Clone, Debug, PartialEq)]
pub struct Sinogram {
    shape: [usize; 2],
    data: Vec<Intensityf32>,
}

impl Sinogram {

    /// `shape` is `[detectors per projection, number of projections]`.
    pub fn new(shape: [usize; 2], data: Vec<Intensityf32>) -> Result<Self> {
        let expected = shape[0] * shape[1];
        if data.len() != expected {
            return Err(TomoError::SizeMismatch { what: "Sinogram data", expected, got: data.len() })
        }
        Ok(Self { shape, data })
    }

    pub fn zeros(shape: [usize; 2]) -> Self { Self::filled(shape, 0.0) }

    pub fn filled(shape: [usize; 2], value: Intensityf32) -> Self {
        Self { shape, data: vec![value; shape[0] * shape[1]] }
    }

    /// An empty sinogram with one entry per ray of `geometry`.
    pub fn for_geometry<const D: usize>(geometry: &impl Geometry<D>) -> Self {
        Self::zeros(geometry.sinogram_shape())
    }

    /// Wrap `data` as the sinogram of `geometry`.
    pub fn from_geometry<const D: usize>(geometry: &impl Geometry<D>, data: Vec<Intensityf32>) -> Result<Self> {
        Self::new(geometry.sinogram_shape(), data)
    }

    pub fn shape(&self) -> [usize; 2] { self.shape }
    pub fn detectors  (&self) -> usize { self.shape[0] }
    pub fn projections(&self) -> usize { self.shape[1] }

    pub fn len(&self) -> usize { self.data.len() }
    pub fn is_empty(&self) -> bool { self.data.is_empty() }

    pub fn data    (&    self) -> &    [Intensityf32] { &    self.data }
    pub fn data_mut(&mut self) -> &mut [Intensityf32] { &mut self.data }
    pub fn into_data(self) -> Vec<Intensityf32> { self.data }

    /// Ray indices belonging to projection `p`.
    pub fn projection_range(&self, p: usize) -> Range<Index1_u> {
        let n = self.detectors();
        p * n .. (p + 1) * n
    }

    /// The entries of projection `p`.
    pub fn projection(&self, p: usize) -> &[Intensityf32] { &self.data[self.projection_range(p)] }

    /// View as a 2-dimensional array indexed by `[detector, projection]`.
    pub fn view(&self) -> ArrayView2<'_, Intensityf32> {
        // Constructors guarantee that the data length matches the shape
        ArrayView2::from_shape(self.shape.f(), &self.data)
            .expect("sinogram data length matches its shape")
    }
}

impl core::ops::Index<Index1_u> for Sinogram {
    type Output = Intensityf32;
    #[inline]
    fn index(&self, i: Index1_u) -> &Self::Output { &self.data[i] }
}

impl core::ops::IndexMut<Index1_u> for Sinogram {
    #[inline]
    fn index_mut(&mut self, i: Index1_u) -> &mut Self::Output { &mut self.data[i] }
}
