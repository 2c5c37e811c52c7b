//! Iterative tomographic reconstruction on regular voxel grids.
//!
//! A `Geometry` enumerates rays through a `Volume`; a `Projector` turns each
//! ray into a sparse row of the system matrix; the algorithms in
//! `algorithms` (ART, SART, SIRT) use those rows to improve an `Image` until
//! its forward projection matches a measured `Sinogram`.

pub mod error;
pub mod types;
pub mod index;
pub mod volume;
pub mod image;
pub mod sinogram;
pub mod geometry;
pub mod system_matrix;
pub mod projector;
pub mod projection;
pub mod algorithms;
pub mod config;
pub mod utils;

pub use error::{Result, TomoError};
pub use types::{Index1_u, IndexD_u, BoxDim_u, Intensityf32, Lengthf32, Weightf32, Point, Vector, Ray};
pub use volume::Volume;
pub use image::{Image, ImageData};
pub use sinogram::Sinogram;
pub use geometry::{Geometry, AnyGeometry, ParallelGeometry, ListGeometry};
pub use system_matrix::SystemMatrixRow;
pub use projector::{Projector, ProjectorKind, AnyProjector, ClosestProjector, LinearProjector, JosephProjector};
pub use projection::{forward_projection, back_projection, residual_norm};
pub use algorithms::{Algorithm, Parameters, Iterative, Art, Sart, Sirt, art, sart, sirt, reconstruct, reconstruct_with};
pub use config::{Config, ConfigError, Setup, read_config_file};
