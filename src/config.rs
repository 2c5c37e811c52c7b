//! Configuration file parser for reconstructions
//!
//! ```toml
//! volume = [64, 64]
//! projector = "joseph"     # closest | linear | joseph
//! algorithm = "sart"       # art | sart | sirt
//! beta = 0.5
//! iterations = 10
//!
//! [geometry]
//! kind = "parallel"
//! angles = 90
//! detectors = 64
//! ```

use std::fs;
use std::ops::ControlFlow;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use log::debug;
use rand::{rngs::StdRng, SeedableRng};
use serde::Deserialize;
use thiserror::Error;

use crate::algorithms::{self, Algorithm, Parameters};
use crate::error::TomoError;
use crate::geometry::{AnyGeometry, Geometry, ListGeometry, ParallelGeometry};
use crate::image::Image;
use crate::projection;
use crate::projector::{AnyProjector, ProjectorKind};
use crate::sinogram::Sinogram;
use crate::utils::group_digits;
use crate::volume::Volume;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Couldn't read config file `{path:?}`: {source}")]
    Read { path: PathBuf, source: std::io::Error },

    #[error("Invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Config describes a {got}-dimensional volume, but {expected} dimensions were requested")]
    Dimension { expected: usize, got: usize },

    #[error(transparent)]
    Tomo(#[from] TomoError),
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Number of voxels along each axis
    pub volume: Vec<usize>,
    pub geometry: GeometryConfig,
    #[serde(default)]
    pub projector: ProjectorKind,
    #[serde(default)]
    pub algorithm: Algorithm,
    /// Relaxation factor
    #[serde(default = "default_beta")]
    pub beta: f32,
    /// Number of full sweeps over the geometry
    #[serde(default = "default_iterations")]
    pub iterations: usize,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "kind", rename_all = "lowercase", deny_unknown_fields)]
pub enum GeometryConfig {
    Parallel { angles: usize, detectors: usize },
    /// Uniformly random rays, reproducible from `seed`
    Random { rays: usize, #[serde(default)] seed: u64 },
}

fn default_beta      () -> f32   { Parameters::default().beta }
fn default_iterations() -> usize { Parameters::default().iterations }

pub fn read_config_file(path: impl AsRef<Path>) -> Result<Config, ConfigError> {
    let path = path.as_ref();
    let config = fs::read_to_string(path)
        .map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;
    config.parse()
}

impl FromStr for Config {
    type Err = ConfigError;
    fn from_str(s: &str) -> Result<Self, Self::Err> { Ok(toml::from_str(s)?) }
}

impl Config {

    pub fn parameters(&self) -> Parameters {
        Parameters { beta: self.beta, iterations: self.iterations }
    }

    /// Build the components described by the configuration, for a
    /// `D`-dimensional volume.
    pub fn setup<const D: usize>(&self) -> Result<Setup<D>, ConfigError> {
        let extents: [usize; D] = self.volume.as_slice().try_into()
            .map_err(|_| ConfigError::Dimension { expected: D, got: self.volume.len() })?;
        let volume = Volume::new(extents)?;

        let geometry: AnyGeometry<D> = match self.geometry {
            GeometryConfig::Parallel { angles, detectors } =>
                ParallelGeometry::new(angles, detectors, volume)?.into(),
            GeometryConfig::Random { rays, seed } =>
                ListGeometry::random(rays, volume, &mut StdRng::seed_from_u64(seed))?.into(),
        };
        debug!("Geometry with {} rays in {} projections",
               group_digits(geometry.ray_count()),
               group_digits(geometry.projection_count()));

        let parameters = self.parameters();
        parameters.validate()?;

        Ok(Setup {
            volume,
            geometry,
            projector: AnyProjector::new(self.projector, volume),
            algorithm: self.algorithm,
            parameters,
        })
    }
}

/// Everything needed to simulate data and reconstruct it, with components
/// chosen at runtime.
#[derive(Clone, Debug)]
pub struct Setup<const D: usize> {
    pub volume: Volume<D>,
    pub geometry: AnyGeometry<D>,
    pub projector: AnyProjector<D>,
    pub algorithm: Algorithm,
    pub parameters: Parameters,
}

impl<const D: usize> Setup<D> {

    pub fn forward_projection(&self, image: &Image<D>) -> crate::Result<Sinogram> {
        projection::forward_projection(image, &self.geometry, &self.projector)
    }

    /// Reconstruct `sinogram` starting from an empty image.
    pub fn reconstruct(&self, sinogram: &Sinogram) -> crate::Result<Image<D>> {
        let mut image = Image::zeros(self.volume);
        self.reconstruct_with(sinogram, &mut image, |_, _| ControlFlow::Continue(()))?;
        Ok(image)
    }

    /// Improve `image` in place, calling `on_iteration` after every sweep.
    pub fn reconstruct_with(
        &self,
        sinogram: &Sinogram,
        image: &mut Image<D>,
        on_iteration: impl FnMut(usize, &Image<D>) -> ControlFlow<()>,
    ) -> crate::Result<usize> {
        algorithms::reconstruct_with(
            self.algorithm, &self.geometry, &self.projector,
            sinogram, image, self.parameters, on_iteration,
        )
    }
}
