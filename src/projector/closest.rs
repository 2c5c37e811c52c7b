use crate::projector::{max_samples, sampling::Samples, Projector};
use crate::types::{Ray, SystemMatrixElement};
use crate::volume::Volume;

/// Nearest-voxel sampling: every sample point contributes unit weight to the
/// voxel which contains it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClosestProjector<const D: usize> {
    volume: Volume<D>,
}

impl<const D: usize> ClosestProjector<D> {
    pub fn new(volume: Volume<D>) -> Self { Self { volume } }
}

#[derive(Clone, Debug)]
pub struct ClosestRow<const D: usize> {
    samples: Samples<D>,
    volume: Volume<D>,
}

impl<const D: usize> Iterator for ClosestRow<D> {
    type Item = SystemMatrixElement;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let p = self.samples.next()?;
            // Samples lie within the volume, barring rounding at its surface
            if let Some(j) = self.volume.voxel_containing(&p) {
                return Some((j, 1.0))
            }
        }
    }
}

impl<const D: usize> Projector<D> for ClosestProjector<D> {
    type Row<'p> = ClosestRow<D> where Self: 'p;

    fn volume(&self) -> &Volume<D> { &self.volume }

    fn row(&self, ray: &Ray<D>) -> ClosestRow<D> {
        ClosestRow { samples: Samples::new(&self.volume, ray), volume: self.volume }
    }

    fn max_row_len(&self) -> usize { max_samples(&self.volume) }
}
