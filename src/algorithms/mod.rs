//! Iterative reconstruction: estimate the image whose forward projection
//! matches a sinogram.
//!
//! + `Art`: Kaczmarz row-action method, one ray at a time, strictly in order
//!
//! + `Sart`: simultaneous corrections over each projection
//!
//! + `Sirt`: simultaneous corrections over the whole sinogram
//!
//! Every algorithm performs a fixed number of full sweeps over the geometry.
//! There is no convergence test: the caller can stop early through the
//! per-iteration callback of `reconstruct_with`.

use std::ops::ControlFlow;

use log::{debug, info, log_enabled, Level};
use serde::Deserialize;

use crate::error::{Result, TomoError};
use crate::geometry::Geometry;
use crate::image::Image;
use crate::projection::{check_sinogram, check_volumes, forward_project};
use crate::projector::Projector;
use crate::sinogram::Sinogram;
use crate::system_matrix::SystemMatrixRow;
use crate::types::Intensityf32;
use crate::utils::{group_digits, timing::Progress};
use crate::volume::Volume;

#[cfg(feature = "rayon")]
use rayon::prelude::*;

pub mod art;
pub mod sart;
pub mod sirt;
mod accumulate;

pub use art::Art;
pub use sart::Sart;
pub use sirt::Sirt;

/// Names of the reconstruction algorithms provided by this crate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    Art,
    Sart,
    #[default]
    Sirt,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Parameters {
    /// Relaxation factor: scales every correction
    pub beta: f32,
    /// Number of full sweeps over the geometry
    pub iterations: usize,
}

impl Default for Parameters {
    fn default() -> Self { Self { beta: 0.5, iterations: 10 } }
}

impl Parameters {
    pub fn validate(&self) -> Result<()> { check_beta(self.beta) }
}

pub(crate) fn check_beta(beta: f32) -> Result<()> {
    if beta.is_finite() && beta > 0.0 { Ok(()) }
    else { Err(TomoError::InvalidRelaxation(beta)) }
}

/// Summary of one sweep.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Sweep {
    /// Rays which contributed nothing because their row was empty or all zero
    pub skipped: usize,
}

/// One full sweep of an iterative algorithm over its geometry.
pub trait Iterative<const D: usize> {
    fn name(&self) -> &'static str;

    /// The volume of the images which `iterate` accepts.
    fn volume(&self) -> &Volume<D>;

    fn ray_count(&self) -> usize;

    /// Update `image` in place with one full sweep.
    fn iterate(&self, image: &mut Image<D>) -> Sweep;

    /// Distance between the sinogram and the forward projection of `image`.
    fn residual_norm(&self, image: &Image<D>) -> Intensityf32;
}

/// The inputs shared by all algorithms, checked for consistency.
pub struct Problem<'a, const D: usize, G, P> {
    pub geometry: &'a G,
    pub projector: &'a P,
    pub sinogram: &'a Sinogram,
}

impl<'a, const D: usize, G, P> Clone for Problem<'a, D, G, P> {
    fn clone(&self) -> Self { *self }
}

impl<'a, const D: usize, G, P> Copy for Problem<'a, D, G, P> {}

impl<'a, const D: usize, G, P> Problem<'a, D, G, P>
where
    G: Geometry<D>,
    P: Projector<D>,
{
    pub fn new(geometry: &'a G, projector: &'a P, sinogram: &'a Sinogram) -> Result<Self> {
        check_volumes(geometry.volume(), projector.volume())?;
        check_sinogram(sinogram, geometry)?;
        Ok(Self { geometry, projector, sinogram })
    }

    pub fn volume(&self) -> &Volume<D> { self.geometry.volume() }

    pub fn residual_norm(&self, image: &Image<D>) -> Intensityf32 {
        let squared_residual = |row: &mut SystemMatrixRow, i: usize| {
            self.projector.update_system_matrix_row(row, &self.geometry.ray(i));
            let r = self.sinogram[i] - forward_project(row, image);
            r * r
        };

        #[cfg(feature = "rayon")]
        let sum: Intensityf32 = (0..self.geometry.ray_count())
            .into_par_iter()
            .map_init(|| self.projector.buffers(), squared_residual)
            .sum();

        #[cfg(not(feature = "rayon"))]
        let sum: Intensityf32 = {
            let mut row = self.projector.buffers();
            (0..self.geometry.ray_count())
                .map(|i| squared_residual(&mut row, i))
                .sum()
        };

        sum.sqrt()
    }
}

/// Run `iterations` sweeps of `solver` on `image`, calling `on_iteration`
/// after each one. Returns the number of sweeps performed, which is smaller
/// than `iterations` if `on_iteration` asked to stop.
pub fn run<const D: usize, S>(
    solver: &S,
    image: &mut Image<D>,
    iterations: usize,
    mut on_iteration: impl FnMut(usize, &Image<D>) -> ControlFlow<()>,
) -> Result<usize>
where
    S: Iterative<D>,
{
    check_volumes(solver.volume(), image.volume())?;
    let name = solver.name();
    info!("{name}: {iterations} iterations over {} rays and {} voxels",
          group_digits(solver.ray_count()),
          group_digits(image.volume().cells()));

    let mut progress = Progress::new();
    for iteration in 0..iterations {
        let Sweep { skipped } = solver.iterate(image);
        progress.done_with_message(&format!("{name} iteration {iteration:>3}"));
        if iteration == 0 && skipped > 0 {
            debug!("{name}: {} rays contribute nothing and are skipped", group_digits(skipped));
        }
        if log_enabled!(Level::Debug) {
            debug!("{name}: residual norm after iteration {iteration:>3}: {:.6e}", solver.residual_norm(image));
        }
        if on_iteration(iteration, image).is_break() {
            info!("{name}: stopped after {} iterations", iteration + 1);
            return Ok(iteration + 1)
        }
    }
    Ok(iterations)
}

/// Improve `image` in place using `algorithm`.
pub fn reconstruct<const D: usize, G, P>(
    algorithm : Algorithm,
    geometry  : &G,
    projector : &P,
    sinogram  : &Sinogram,
    image     : &mut Image<D>,
    parameters: Parameters,
) -> Result<()>
where
    G: Geometry<D>,
    P: Projector<D>,
{
    reconstruct_with(algorithm, geometry, projector, sinogram, image, parameters, |_, _| ControlFlow::Continue(()))?;
    Ok(())
}

/// As `reconstruct`, calling `on_iteration` with the iteration number and
/// current image after every sweep. Returning `ControlFlow::Break` stops the
/// reconstruction. Returns the number of sweeps performed.
pub fn reconstruct_with<const D: usize, G, P>(
    algorithm   : Algorithm,
    geometry    : &G,
    projector   : &P,
    sinogram    : &Sinogram,
    image       : &mut Image<D>,
    parameters  : Parameters,
    on_iteration: impl FnMut(usize, &Image<D>) -> ControlFlow<()>,
) -> Result<usize>
where
    G: Geometry<D>,
    P: Projector<D>,
{
    parameters.validate()?;
    let Parameters { beta, iterations } = parameters;
    match algorithm {
        Algorithm::Art  => run(&Art ::new(geometry, projector, sinogram, beta)?, image, iterations, on_iteration),
        Algorithm::Sart => run(&Sart::new(geometry, projector, sinogram, beta)?, image, iterations, on_iteration),
        Algorithm::Sirt => run(&Sirt::new(geometry, projector, sinogram, beta)?, image, iterations, on_iteration),
    }
}

fn from_zero<const D: usize, G, P>(algorithm: Algorithm, geometry: &G, projector: &P, sinogram: &Sinogram, parameters: Parameters) -> Result<Image<D>>
where
    G: Geometry<D>,
    P: Projector<D>,
{
    let mut image = Image::zeros(*geometry.volume());
    reconstruct(algorithm, geometry, projector, sinogram, &mut image, parameters)?;
    Ok(image)
}

/// Reconstruct with ART, starting from an empty image.
pub fn art<const D: usize, G, P>(geometry: &G, projector: &P, sinogram: &Sinogram, parameters: Parameters) -> Result<Image<D>>
where G: Geometry<D>, P: Projector<D>,
{ from_zero(Algorithm::Art, geometry, projector, sinogram, parameters) }

/// Reconstruct with SART, starting from an empty image.
pub fn sart<const D: usize, G, P>(geometry: &G, projector: &P, sinogram: &Sinogram, parameters: Parameters) -> Result<Image<D>>
where G: Geometry<D>, P: Projector<D>,
{ from_zero(Algorithm::Sart, geometry, projector, sinogram, parameters) }

/// Reconstruct with SIRT, starting from an empty image.
pub fn sirt<const D: usize, G, P>(geometry: &G, projector: &P, sinogram: &Sinogram, parameters: Parameters) -> Result<Image<D>>
where G: Geometry<D>, P: Projector<D>,
{ from_zero(Algorithm::Sirt, geometry, projector, sinogram, parameters) }
