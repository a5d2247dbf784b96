//! Geometric utility functions for distance calculations.

use ndarray::Array1;

/// Calculates the squared Euclidean distance between two 2D points.
///
/// # Arguments
///
/// * `first` - First point
/// * `second` - Second point
///
/// # Returns
///
/// The squared distance (no square root taken).
pub fn square_dist(first: &Array1<f32>, second: &Array1<f32>) -> f32 {
    let dx = first[0] - second[0];
    let dy = first[1] - second[1];
    dx * dx + dy * dy
}

/// Calculates the Euclidean distance between two 2D points.
pub fn dist(first: &Array1<f32>, second: &Array1<f32>) -> f32 {
    square_dist(first, second).sqrt()
}
