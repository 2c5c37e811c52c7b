use ndarray::{ArrayViewD, ShapeBuilder};

use crate::error::{Result, TomoError};
use crate::types::{BoxDim_u, Index1_u, IndexD_u, Intensityf32, Point};
use crate::volume::Volume;

pub type ImageData = Vec<Intensityf32>;

/// One value per voxel of a `Volume`, stored with the first axis varying
/// fastest.
#[derive(Clone, Debug, PartialEq)]
pub struct Image<const D: usize> {
    volume: Volume<D>,
    data: ImageData,
}

impl<const D: usize> Image<D> {

    pub fn new(volume: Volume<D>, data: ImageData) -> Result<Self> {
        if data.len() != volume.cells() {
            return Err(TomoError::SizeMismatch {
                what: "Image data", expected: volume.cells(), got: data.len()
            })
        }
        Ok(Self { volume, data })
    }

    pub fn zeros(volume: Volume<D>) -> Self { Self::filled(volume, 0.0) }
    pub fn ones (volume: Volume<D>) -> Self { Self::filled(volume, 1.0) }

    pub fn filled(volume: Volume<D>, value: Intensityf32) -> Self {
        Self { volume, data: vec![value; volume.cells()] }
    }

    /// Sample `f` at the centre of every voxel.
    pub fn from_fn(volume: Volume<D>, f: impl Fn(Point<D>) -> Intensityf32) -> Self {
        let data = (0..volume.cells())
            .map(|i| f(volume.voxel_centre(volume.unroll(i))))
            .collect();
        Self { volume, data }
    }

    // A new empty data store with matching size
    pub(crate) fn zeros_buffer(volume: &Volume<D>) -> ImageData { vec![0.0; volume.cells()] }

    pub fn volume(&self) -> &Volume<D> { &self.volume }

    pub fn dimensions(&self) -> BoxDim_u<D> { self.volume.extents() }

    pub fn data    (&    self) -> &    [Intensityf32] { &    self.data }
    pub fn data_mut(&mut self) -> &mut [Intensityf32] { &mut self.data }
    pub fn into_data(self) -> ImageData { self.data }

    /// View the data as an n-dimensional array indexed by `[x, y, ...]`.
    pub fn view(&self) -> ArrayViewD<'_, Intensityf32> {
        let shape = self.dimensions().to_vec();
        // Constructors guarantee that the data length matches the volume
        ArrayViewD::from_shape(shape.f(), &self.data)
            .expect("image data length matches its volume")
    }
}

impl<const D: usize> core::ops::IndexMut<Index1_u> for Image<D> {
    #[inline]
    fn index_mut(&mut self, i: Index1_u) -> &mut Self::Output { &mut self.data[i] }
}

impl<const D: usize> core::ops::Index<Index1_u> for Image<D> {
    type Output = Intensityf32;
    #[inline]
    fn index(&self, i: Index1_u) -> &Self::Output { &self.data[i] }
}

impl<const D: usize> core::ops::IndexMut<IndexD_u<D>> for Image<D> {
    fn index_mut(&mut self, i: IndexD_u<D>) -> &mut Self::Output {
        let i1 = self.volume.index(i);
        &mut self.data[i1]
    }
}

impl<const D: usize> core::ops::Index<IndexD_u<D>> for Image<D> {
    type Output = Intensityf32;
    fn index(&self, i: IndexD_u<D>) -> &Self::Output {
        let i1 = self.volume.index(i);
        &self.data[i1]
    }
}
