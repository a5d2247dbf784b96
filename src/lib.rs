//! # Raceline - Evolving Vehicle Controllers
//!
//! A simulation of vehicle agents that learn to drive around a closed track by
//! evolving small feed-forward neural controllers with a genetic algorithm.
//!
//! ## Features
//!
//! - Frame-stepped car physics (acceleration falloff, turning threshold, friction)
//! - Raycast wall sensing against a raster surface classifier
//! - Signed track-progress fitness with lap-wraparound accounting
//! - Generational genetic algorithm (elitism, half-normal rank selection,
//!   parameter-averaging crossover, mutation)
//! - Neural network controllers (MLP with tanh activation)
//!
//! ## Core Modules
//!
//! - [`simulation::track`] - Closed-loop track geometry and progress queries
//! - [`simulation::car`] - Car physics, sensing, and fitness accounting
//! - [`simulation::brain`] - Neural network implementation
//! - [`simulation::generation`] - Population lockstep and the genetic algorithm

/// Core simulation logic and data structures.
pub mod simulation {
    /// Neural network implementation for car controllers.
    pub mod brain;
    /// Car physics, raycast sensing, and fitness accounting.
    pub mod car;
    /// Polymorphic decision unit turning sensed distances into control inputs.
    pub mod controller;
    /// Error types for track loading, configuration, and controller evaluation.
    pub mod error;
    /// Population management and the generational genetic algorithm.
    pub mod generation;
    /// Geometric utility functions for distance calculations.
    pub mod geometry;
    /// Simulation parameters.
    pub mod params;
    /// Drivable-surface classification over 2D space.
    pub mod surface;
    /// Closed-loop track geometry, scale, and progress queries.
    pub mod track;
}
