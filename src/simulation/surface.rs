//! Drivable-surface classification over 2D space.
//!
//! A surface classifier answers one question: is this coordinate legal for a
//! car to be on? The production classifier is a raster mask derived from a
//! track image; tests can pass a plain closure instead.

use serde::{Deserialize, Serialize};

use super::error::GeometryError;

/// Classifies 2D coordinates as drivable or not.
///
/// Coordinates outside the classifier's domain must report non-drivable.
pub trait Surface {
    /// Returns `true` if the given coordinate is legal for a car to be on.
    fn is_drivable(&self, x: f32, y: f32) -> bool;
}

impl<F> Surface for F
where
    F: Fn(f32, f32) -> bool,
{
    fn is_drivable(&self, x: f32, y: f32) -> bool {
        self(x, y)
    }
}

/// A raster surface classifier backed by a boolean mask.
///
/// The mask is row-major with y pointing down, matching image pixel layout.
/// Anything outside the raster bounds (including negative coordinates) is
/// non-drivable, which also guarantees that outward raycasts terminate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RasterSurface {
    width: usize,
    height: usize,
    drivable: Vec<bool>,
}

impl RasterSurface {
    /// Creates a raster classifier from a row-major mask.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::SurfaceSizeMismatch`] if the mask length does
    /// not equal `width * height`.
    pub fn new(width: usize, height: usize, drivable: Vec<bool>) -> Result<Self, GeometryError> {
        let expected = width * height;
        if drivable.len() != expected {
            return Err(GeometryError::SurfaceSizeMismatch {
                width,
                height,
                expected,
                actual: drivable.len(),
            });
        }
        Ok(Self {
            width,
            height,
            drivable,
        })
    }

    /// Creates a raster classifier by sampling a predicate at every cell center.
    pub fn from_fn(width: usize, height: usize, f: impl Fn(usize, usize) -> bool) -> Self {
        let mut drivable = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                drivable.push(f(x, y));
            }
        }
        Self {
            width,
            height,
            drivable,
        }
    }

    /// Raster width in cells.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Raster height in cells.
    pub fn height(&self) -> usize {
        self.height
    }
}

impl Surface for RasterSurface {
    fn is_drivable(&self, x: f32, y: f32) -> bool {
        if x < 0.0 || y < 0.0 {
            return false;
        }
        let (col, row) = (x as usize, y as usize);
        if col >= self.width || row >= self.height {
            return false;
        }
        self.drivable[row * self.width + col]
    }
}
