//! Forward and backward projection of whole images and sinograms.
//!
//! + `forward_projection`: apply the system matrix to an image, giving one
//!   integral per ray of a geometry
//!
//! + `back_projection`: apply its transpose to a sinogram, smearing each
//!   entry back along its ray
//!
//! With the `rayon` feature, rays are distributed over rayon's thread pool;
//! otherwise they are processed serially in index order.

/// Integrate `image` along every ray of `geometry`.
pub fn forward_projection<const D: usize, G, P>(image: &Image<D>, geometry: &G, projector: &P) -> Result<Sinogram>
where
    G: Geometry<D>,
    P: Projector<D>,
{
    check_volumes(geometry.volume(), projector.volume())?;
    check_volumes(geometry.volume(), image.volume())?;

    let project = |row: &mut SystemMatrixRow, i: usize| {
        projector.update_system_matrix_row(row, &geometry.ray(i));
        forward_project(row, image)
    };

    #[cfg(feature = "rayon")]
    let data = (0..geometry.ray_count())
        .into_par_iter()
        .map_init(|| projector.buffers(), project)
        .collect();

    #[cfg(not(feature = "rayon"))]
    let data = {
        let mut row = projector.buffers();
        (0..geometry.ray_count())
            .map(|i| project(&mut row, i))
            .collect()
    };

    Sinogram::from_geometry(geometry, data)
}

/// Spread every entry of `sinogram` back along its ray, weighted by the
/// system matrix: the transpose of `forward_projection`.
pub fn back_projection<const D: usize, G, P>(sinogram: &Sinogram, geometry: &G, projector: &P) -> Result<Image<D>>
where
    G: Geometry<D>,
    P: Projector<D>,
{
    check_volumes(geometry.volume(), projector.volume())?;
    check_sinogram(sinogram, geometry)?;
    let volume = geometry.volume();

    // Closure preparing the state needed by `fold`: with rayon it will be
    // called at the start of every job that is launched.
    let initial_state = || (Image::zeros_buffer(volume), projector.buffers());

    let project_one_ray = |(mut backprojection, mut row): (ImageData, SystemMatrixRow), i: usize| {
        projector.update_system_matrix_row(&mut row, &geometry.ray(i));
        back_project(&mut backprojection, &row, sinogram[i]);
        (backprojection, row)
    };

    #[cfg(feature = "rayon")]
    let data = (0..geometry.ray_count())
        .into_par_iter()
        .fold(initial_state, project_one_ray)
        // Keep only the backprojection
        .map(|(backprojection, _)| backprojection)
        // Sum the backprojections calculated on each thread
        .reduce(|| Image::zeros_buffer(volume), elementwise_add);

    #[cfg(not(feature = "rayon"))]
    let (data, _) = (0..geometry.ray_count()).fold(initial_state(), project_one_ray);

    Image::new(*volume, data)
}

/// Euclidean norm of the difference between `sinogram` and the forward
/// projection of `image`.
pub fn residual_norm<const D: usize, G, P>(image: &Image<D>, sinogram: &Sinogram, geometry: &G, projector: &P) -> Result<Intensityf32>
where
    G: Geometry<D>,
    P: Projector<D>,
{
    check_sinogram(sinogram, geometry)?;
    let projected = forward_projection(image, geometry, projector)?;
    Ok(distance(projected.data(), sinogram.data()))
}

pub(crate) fn distance(a: &[Intensityf32], b: &[Intensityf32]) -> Intensityf32 {
    a.iter().zip(b).map(|(a, b)| (a - b) * (a - b)).sum::<Intensityf32>().sqrt()
}

/// Sum product of the row's weights and the corresponding voxels' values.
#[inline]
pub fn forward_project<const D: usize>(system_matrix_row: &SystemMatrixRow, image: &Image<D>) -> Intensityf32 {
    let mut projection = 0.0;
    for (j, w) in system_matrix_row {
        projection += w * image[j]
    }
    projection
}

/// Add `value`, weighted by the row's weights, to the corresponding voxels.
#[inline]
pub fn back_project(backprojection: &mut [Intensityf32], system_matrix_row: &SystemMatrixRow, value: Intensityf32) {
    for (j, w) in system_matrix_row {
        backprojection[j] += w * value;
    }
}

#[cfg_attr(not(feature = "rayon"), allow(unused))]
pub(crate) fn elementwise_add(a: Vec<f32>, b: Vec<f32>) -> Vec<f32> {
    a.iter().zip(b.iter()).map(|(l,r)| l+r).collect()
}

pub(crate) fn check_volumes<const D: usize>(a: &Volume<D>, b: &Volume<D>) -> Result<()> {
    if a == b { return Ok(()) }
    Err(TomoError::VolumeMismatch { left: a.extents().to_vec(), right: b.extents().to_vec() })
}

pub(crate) fn check_sinogram<const D: usize>(sinogram: &Sinogram, geometry: &impl Geometry<D>) -> Result<()> {
    let expected = geometry.ray_count();
    if sinogram.len() != expected {
        return Err(TomoError::SizeMismatch { what: "Sinogram", expected, got: sinogram.len() })
    }
    Ok(())
}


// ----- Imports ------------------------------------------------------------------------------------------
#[cfg(feature = "rayon")]
use rayon::prelude::*;

use crate::{
    error::{Result, TomoError},
    geometry::Geometry,
    image::{Image, ImageData},
    projector::Projector,
    sinogram::Sinogram,
    system_matrix::SystemMatrixRow,
    types::Intensityf32,
    volume::Volume,
};
