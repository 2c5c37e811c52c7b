//! Discretizations of the line integral along a ray: each projector turns a
//! ray into a lazily generated row of the system matrix.
//!
//! + `ClosestProjector`: unit-spaced samples along the ray, each attributed
//!   entirely to the voxel containing it
//!
//! + `LinearProjector`: the same samples, spread over the 2^D surrounding
//!   voxel centres by multilinear interpolation
//!
//! + `JosephProjector`: one sample per slice perpendicular to the ray's
//!   dominant axis, interpolated within the slice
//!
//! Rows may contain repeated voxel indices and zero weights. Consumers must
//! accumulate, never overwrite.

pub mod sampling;
pub mod closest;
pub mod linear;
pub mod joseph;

pub use closest::{ClosestProjector, ClosestRow};
pub use linear::{LinearProjector, LinearRow, Interpolation, interpolate};
pub use joseph::{JosephProjector, JosephRow};

/// Abstract interface for system matrix row generators.
pub trait Projector<const D: usize>: Sync {

    /// The lazily evaluated elements of one system matrix row.
    type Row<'p>: Iterator<Item = SystemMatrixElement> + Clone where Self: 'p;

    /// The volume whose voxels the row indices refer to.
    fn volume(&self) -> &Volume<D>;

    /// The system matrix row belonging to `ray`. Empty if the ray misses the
    /// volume.
    fn row(&self, ray: &Ray<D>) -> Self::Row<'_>;

    /// Upper bound on the number of elements in any row: sizes the buffers.
    fn max_row_len(&self) -> usize;

    // Sparse storage of the slice through the system matrix which corresponds
    // to the current ray.
    fn buffers(&self) -> SystemMatrixRow {
        SystemMatrixRow::with_capacity(self.max_row_len())
    }

    /// Place the elements of the row belonging to `ray` in the output
    /// parameter `system_matrix_row`, discarding its previous contents.
    fn update_system_matrix_row(&self, system_matrix_row: &mut SystemMatrixRow, ray: &Ray<D>) {
        // Throw away previous ray's values
        system_matrix_row.clear();
        system_matrix_row.extend(self.row(ray));
    }
}

/// Names of the projectors provided by this crate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectorKind {
    Closest,
    #[default]
    Linear,
    Joseph,
}

/// The projectors provided by this crate, selectable at runtime.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AnyProjector<const D: usize> {
    Closest(ClosestProjector<D>),
    Linear ( LinearProjector<D>),
    Joseph ( JosephProjector<D>),
}

impl<const D: usize> AnyProjector<D> {
    pub fn new(kind: ProjectorKind, volume: Volume<D>) -> Self {
        match kind {
            ProjectorKind::Closest => Self::Closest(ClosestProjector::new(volume)),
            ProjectorKind::Linear  => Self::Linear ( LinearProjector::new(volume)),
            ProjectorKind::Joseph  => Self::Joseph ( JosephProjector::new(volume)),
        }
    }

    pub fn kind(&self) -> ProjectorKind {
        match self {
            Self::Closest(_) => ProjectorKind::Closest,
            Self::Linear (_) => ProjectorKind::Linear,
            Self::Joseph (_) => ProjectorKind::Joseph,
        }
    }
}

/// Row of an `AnyProjector`.
#[derive(Clone, Debug)]
pub enum AnyRow<const D: usize> {
    Closest(ClosestRow<D>),
    Linear ( LinearRow<D>),
    Joseph ( JosephRow<D>),
}

impl<const D: usize> Iterator for AnyRow<D> {
    type Item = SystemMatrixElement;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        match self {
            Self::Closest(row) => row.next(),
            Self::Linear (row) => row.next(),
            Self::Joseph (row) => row.next(),
        }
    }
}

impl<const D: usize> Projector<D> for AnyProjector<D> {
    type Row<'p> = AnyRow<D> where Self: 'p;

    fn volume(&self) -> &Volume<D> {
        match self {
            Self::Closest(p) => p.volume(),
            Self::Linear (p) => p.volume(),
            Self::Joseph (p) => p.volume(),
        }
    }

    fn row(&self, ray: &Ray<D>) -> AnyRow<D> {
        match self {
            Self::Closest(p) => AnyRow::Closest(p.row(ray)),
            Self::Linear (p) => AnyRow::Linear (p.row(ray)),
            Self::Joseph (p) => AnyRow::Joseph (p.row(ray)),
        }
    }

    fn max_row_len(&self) -> usize {
        match self {
            Self::Closest(p) => p.max_row_len(),
            Self::Linear (p) => p.max_row_len(),
            Self::Joseph (p) => p.max_row_len(),
        }
    }
}

// Every sample along a ray lies within the volume's diagonal
pub(crate) fn max_samples<const D: usize>(volume: &Volume<D>) -> usize {
    volume.lengths().norm().ceil() as usize + 1
}


// ----- Imports ------------------------------------------------------------------------------------------
use serde::Deserialize;

use crate::{
    system_matrix::SystemMatrixRow,
    types::{Ray, SystemMatrixElement},
    volume::Volume,
};
