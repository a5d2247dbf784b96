//! Polymorphic decision unit turning sensed distances into control inputs.

use ndarray::Array1;
use serde::{Deserialize, Serialize};

use super::brain::Brain;
use super::error::ControllerError;

/// Control inputs applied to a car for one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CarInputs {
    /// Signed throttle input; positive accelerates forward.
    pub acceleration: f32,
    /// Signed steering input; positive turns toward increasing angle.
    pub turning: f32,
}

impl CarInputs {
    /// Creates control inputs from raw values.
    pub fn new(acceleration: f32, turning: f32) -> Self {
        Self {
            acceleration,
            turning,
        }
    }
}

/// Produces control inputs from sensed wall distances and velocity.
///
/// Each car owns its controller exclusively; crossover and mutation build new
/// controllers rather than mutating one in place across generations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Controller {
    /// A neural network drives the car.
    Network(Brain),
    /// No controller attached; the car is driven manually or not at all.
    None,
}

impl Controller {
    /// Evaluates the controller on a sensed input vector.
    ///
    /// For [`Controller::None`] this is always zero input. For a network
    /// controller the first output maps to acceleration, the second to
    /// turning.
    ///
    /// # Errors
    ///
    /// Returns [`ControllerError::OutputShape`] if the network produces a
    /// number of outputs other than two.
    pub fn evaluate(&self, inputs: &Array1<f32>) -> Result<CarInputs, ControllerError> {
        match self {
            Controller::None => Ok(CarInputs::default()),
            Controller::Network(brain) => {
                let outputs = brain.think(inputs);
                if outputs.len() != 2 {
                    return Err(ControllerError::OutputShape {
                        expected: 2,
                        actual: outputs.len(),
                    });
                }
                Ok(CarInputs::new(outputs[0], outputs[1]))
            }
        }
    }

    /// Returns the underlying network, if any.
    pub fn brain(&self) -> Option<&Brain> {
        match self {
            Controller::Network(brain) => Some(brain),
            Controller::None => None,
        }
    }

    /// Returns `true` if no network is attached.
    pub fn is_none(&self) -> bool {
        matches!(self, Controller::None)
    }
}
