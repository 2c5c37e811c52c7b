//! Error types for tomo

use thiserror::Error;

/// Result type alias using tomo's Error
pub type Result<T> = std::result::Result<T, TomoError>;

/// Errors that can occur while setting up or running a reconstruction.
///
/// All of these are detected before any numerical work starts: degenerate
/// rays met during a reconstruction are skipped, not reported.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TomoError {
    /// A volume must contain at least one voxel along every axis
    #[error("Volume extent along axis {axis} must be positive")]
    ZeroExtent {
        /// The offending axis
        axis: usize,
    },

    /// The component only works in some numbers of dimensions
    #[error("{component} does not support {dimension}-dimensional volumes")]
    UnsupportedDimension {
        /// Dimension of the volume provided
        dimension: usize,
        /// What was being constructed
        component: &'static str,
    },

    /// A count given at construction time was zero
    #[error("Number of {what} must be positive")]
    NonPositive {
        /// What was being counted
        what: &'static str,
    },

    /// A list geometry needs at least one ray
    #[error("Ray list is empty")]
    EmptyRayList,

    /// A D-dimensional voxel coordinate lies outside the volume
    #[error("Coordinate {coordinate} on axis {axis} is outside [0, {extent})")]
    CoordinateOutOfRange {
        /// The axis
        axis: usize,
        /// The invalid coordinate
        coordinate: usize,
        /// Number of voxels along that axis
        extent: usize,
    },

    /// A linear index lies outside a buffer
    #[error("Index {index} is outside [0, {len})")]
    IndexOutOfRange {
        /// The invalid index
        index: usize,
        /// Size of the indexed range
        len: usize,
    },

    /// A buffer does not have the size its volume or geometry requires
    #[error("{what} has {got} elements, expected {expected}")]
    SizeMismatch {
        /// Which buffer
        what: &'static str,
        /// Required number of elements
        expected: usize,
        /// Actual number of elements
        got: usize,
    },

    /// Two components which must describe the same volume do not
    #[error("Components were built for different volumes: {left:?} vs {right:?}")]
    VolumeMismatch {
        /// Per-axis extents of one component's volume
        left: Vec<usize>,
        /// Per-axis extents of the other's
        right: Vec<usize>,
    },

    /// The relaxation factor must be a finite, positive number
    #[error("Invalid relaxation factor {0}")]
    InvalidRelaxation(f32),
}
