//! Simulation parameters.

use serde::{Deserialize, Serialize};

use super::error::ConfigurationError;

/// Simulation parameters that control car physics and evolution.
///
/// Defaults carry a tuning known to learn on pixel-scale tracks; tests
/// construct their own values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Params {
    /// Largest meaningful input for turning and acceleration. Larger inputs
    /// are capped at this value.
    pub max_effective_input: f32,
    /// Increase to velocity in one frame at input level 1.0.
    pub accel_gain: f32,
    /// Radians to rotate the car in one frame at input level 1.0.
    pub turn_gain: f32,
    /// Minimum speed magnitude required to turn.
    pub min_turning_velocity: f32,
    /// Largest negative velocity a car can have.
    pub min_velocity: f32,
    /// Step size of outward raycast marching, in surface units.
    pub raycast_granularity: f32,
    /// Display/physics scale of the car body, multiplied by the track scale.
    pub car_scale: f32,
    /// Distance from the car center to a body corner, before scaling.
    pub body_radius: f32,
    /// Bearings (radians relative to heading) of the body corners checked for
    /// wall collisions.
    pub corner_bearings: Vec<f32>,
    /// Bearings (radians relative to heading) sensed as controller inputs.
    pub sensor_bearings: Vec<f32>,
    /// Number of frames between fitness recomputations.
    pub fitness_update_period: u32,
    /// Number of cars in each generation.
    pub population_size: usize,
    /// Standard deviation of car rankings chosen as parents for the next
    /// generation's offspring. Should be no more than `population_size / 3`.
    pub selection_std_dev: f32,
    /// Number of top-performing cars copied unchanged to the next generation.
    pub elite_count: usize,
    /// Amplitude of uniform noise added to every offspring parameter.
    pub mutation_rate: f32,
    /// Amplitude of uniform noise used to initialize random network weights.
    pub weight_init_scale: f32,
    /// Maximum number of frames to run a single generation.
    pub max_generation_frames: u32,
    /// Neural network layer dimensions. The first entry must equal the number
    /// of sensor bearings plus one (velocity); the last must be 2.
    pub layer_sizes: Vec<usize>,
}

impl Default for Params {
    fn default() -> Self {
        let sensor_bearings = vec![-1.0, -0.5, 0.0, 0.5, 1.0];
        let layer_sizes = vec![sensor_bearings.len() + 1, 3, 3, 2];

        Self {
            max_effective_input: 4.0,
            accel_gain: 0.4,
            turn_gain: 0.005,
            min_turning_velocity: 0.5,
            min_velocity: -1.0,
            raycast_granularity: 15.0,
            car_scale: 0.25,
            body_radius: 20.0,
            corner_bearings: vec![-0.3735, 0.3735, 2.7869, 3.4963],
            sensor_bearings,
            fitness_update_period: 10,
            population_size: 50,
            selection_std_dev: 6.0,
            elite_count: 8,
            mutation_rate: 0.1,
            weight_init_scale: 1.0,
            max_generation_frames: 6000,
            layer_sizes,
        }
    }
}

impl Params {
    /// Checks internal consistency of the parameter set.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigurationError`] describing the first violation found:
    /// a network topology that does not match the sensing setup, an elite
    /// count exceeding the population size, a non-positive selection spread,
    /// or a negative mutation rate.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.layer_sizes.len() < 2 {
            return Err(ConfigurationError::BadTopology {
                layer_sizes: self.layer_sizes.clone(),
                reason: "need at least an input and an output layer".to_string(),
            });
        }
        let expected_inputs = self.sensor_bearings.len() + 1;
        if self.layer_sizes[0] != expected_inputs {
            return Err(ConfigurationError::BadTopology {
                layer_sizes: self.layer_sizes.clone(),
                reason: format!(
                    "input layer must match sensor bearings + velocity = {expected_inputs}"
                ),
            });
        }
        if *self.layer_sizes.last().unwrap_or(&0) != 2 {
            return Err(ConfigurationError::BadTopology {
                layer_sizes: self.layer_sizes.clone(),
                reason: "output layer must produce (acceleration, turning)".to_string(),
            });
        }
        if self.population_size == 0 || self.elite_count > self.population_size {
            return Err(ConfigurationError::PopulationTooSmall {
                population: self.population_size,
                elite: self.elite_count,
            });
        }
        if self.selection_std_dev <= 0.0 {
            return Err(ConfigurationError::InvalidSelectionSpread {
                std_dev: self.selection_std_dev,
            });
        }
        if self.mutation_rate < 0.0 {
            return Err(ConfigurationError::InvalidMutationRate {
                rate: self.mutation_rate,
            });
        }
        if self.weight_init_scale <= 0.0 {
            return Err(ConfigurationError::InvalidWeightInitScale {
                scale: self.weight_init_scale,
            });
        }
        Ok(())
    }
}
