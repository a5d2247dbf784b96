//! Error types for track loading, population configuration, and controller
//! evaluation.
//!
//! Physics and per-frame updates never error for normal driving conditions:
//! leaving the track is modeled as car state (`disabled`), not as an error.

use thiserror::Error;

/// Errors raised when loading malformed or degenerate track data.
///
/// All variants are fatal at load time; there is no recovery path.
#[derive(Debug, Error, PartialEq)]
pub enum GeometryError {
    /// A closed path needs at least two vertices.
    #[error("track path must contain at least 2 points, got {count}")]
    TooFewPathPoints {
        /// Number of path points supplied.
        count: usize,
    },
    /// Consecutive identical path points would produce a zero-length segment
    /// and break the projection used by progress queries.
    #[error("zero-length path segment starting at vertex {index}")]
    DegenerateSegment {
        /// Index of the segment's first vertex in traversal order.
        index: usize,
    },
    /// A raster classifier mask does not match its declared dimensions.
    #[error("surface mask has {actual} cells, expected {width}x{height} = {expected}")]
    SurfaceSizeMismatch {
        /// Declared raster width.
        width: usize,
        /// Declared raster height.
        height: usize,
        /// `width * height`.
        expected: usize,
        /// Cells actually supplied.
        actual: usize,
    },
    /// Path point text that is not whitespace-separated pairs of numbers.
    #[error("malformed path data at token {token}: {reason}")]
    MalformedPathData {
        /// Zero-based index of the offending token.
        token: usize,
        /// Human-readable cause.
        reason: String,
    },
}

/// Errors raised when validating population parameters.
///
/// A failed generation advance leaves the previous generation active.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigurationError {
    /// Elitism cannot copy more cars than the population holds.
    #[error("population size {population} is smaller than elite count {elite}")]
    PopulationTooSmall {
        /// Requested population size.
        population: usize,
        /// Configured number of elites.
        elite: usize,
    },
    /// Network layer sizes must form a valid topology for the sensing setup.
    #[error("layer sizes {layer_sizes:?} invalid: {reason}")]
    BadTopology {
        /// The offending layer size list.
        layer_sizes: Vec<usize>,
        /// Human-readable cause.
        reason: String,
    },
    /// The half-normal parent sampler needs a strictly positive spread.
    #[error("selection standard deviation {std_dev} must be positive")]
    InvalidSelectionSpread {
        /// Effective standard deviation that was rejected.
        std_dev: f32,
    },
    /// Mutation noise cannot be negative.
    #[error("mutation rate {rate} must be non-negative")]
    InvalidMutationRate {
        /// The rejected rate.
        rate: f32,
    },
    /// Random weight initialization needs a positive amplitude.
    #[error("weight init scale {scale} must be positive")]
    InvalidWeightInitScale {
        /// The rejected amplitude.
        scale: f32,
    },
}

/// Error raised when a controller produces the wrong output shape.
///
/// Fatal for that evaluation call only; the population step skips the
/// offending car for the frame instead of failing wholesale.
#[derive(Debug, Error, PartialEq)]
pub enum ControllerError {
    /// The network returned a number of outputs other than two.
    #[error("controller produced {actual} outputs, expected {expected}")]
    OutputShape {
        /// Required output count (acceleration, turning).
        expected: usize,
        /// Outputs actually produced.
        actual: usize,
    },
}
