//! Car physics, raycast sensing, and fitness accounting.
//!
//! A car is one simulated vehicle: position, heading, scalar velocity along
//! the heading, a terminal disabled flag, and a signed track-progress fitness.
//! Once disabled, a car never mutates again; it is replaced wholesale at the
//! next generation boundary.

use ndarray::Array1;
use serde::{Deserialize, Serialize};

use super::controller::{CarInputs, Controller};
use super::error::ControllerError;
use super::params::Params;
use super::track::Track;

/// A simulated vehicle, optionally driven by a controller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Car {
    /// Identifier, unique within a generation.
    pub id: usize,
    /// Position in 2D space.
    pub position: Array1<f32>,
    /// Heading in radians (0 is due east).
    pub rotation: f32,
    /// Signed scalar speed along the heading (position increment per frame).
    pub velocity: f32,
    /// Signed cumulative progress around the track:
    /// `laps_completed * track.length + distance_along_current_lap`.
    pub fitness: f32,
    /// Completed laps; may go negative internally to keep fitness continuous
    /// when a car reverses past the start line.
    pub laps_completed: i32,
    /// Number of frames this car has been updated.
    pub frame_count: u32,
    /// Terminal flag; once set, no further state mutation occurs.
    pub disabled: bool,
    /// Decision unit producing driving inputs each frame.
    pub controller: Controller,
}

impl Car {
    /// Creates a car at the track's start position, heading east, at rest.
    pub fn new(track: &Track, id: usize, controller: Controller) -> Self {
        Self {
            id,
            position: track.start_position().clone(),
            rotation: 0.0,
            velocity: 0.0,
            fitness: 0.0,
            laps_completed: 0,
            frame_count: 0,
            disabled: false,
            controller,
        }
    }

    /// Advances the car by one frame: integrates physics, recomputes fitness
    /// on its update period, and runs the wall-collision check.
    ///
    /// No-op if the car is disabled. Driving off the track is modeled as
    /// state (`disabled` becomes `true`), never as an error.
    pub fn frame_update(&mut self, track: &Track, params: &Params, inputs: CarInputs) {
        if self.disabled {
            return;
        }

        let acceleration = inputs.acceleration.clamp(
            -params.max_effective_input,
            params.max_effective_input,
        );
        let turning = inputs
            .turning
            .clamp(-params.max_effective_input, params.max_effective_input);

        // Acceleration effect diminishes as speed magnitude grows, and
        // min_velocity is the most negative speed reachable.
        if self.velocity > params.min_velocity {
            self.velocity += acceleration * params.accel_gain / (self.velocity.abs() + 1.0);
        }

        if self.velocity.abs() > params.min_turning_velocity {
            self.rotation += turning * params.turn_gain;
        }

        let scale = self.effective_scale(track, params);
        self.position[0] += self.velocity * self.rotation.cos() * scale;
        self.position[1] += self.velocity * self.rotation.sin() * scale;

        if self.velocity.abs() < track.friction() {
            self.velocity = 0.0;
        } else if self.velocity > 0.0 {
            self.velocity -= track.friction();
        } else {
            self.velocity += track.friction();
        }

        if self.frame_count % params.fitness_update_period == 0 {
            self.update_fitness(track);
        }

        for &bearing in &params.corner_bearings {
            if self.cast_ray(track, params, bearing) < params.body_radius * scale {
                self.disabled = true;
            }
        }

        self.frame_count += 1;
    }

    /// Recomputes fitness from the current position, adjusting the lap count
    /// when the progress measure jumps discontinuously at the start line.
    ///
    /// A jump of more than half the track length signals a wrap: a large
    /// positive jump means the car crossed the line backward (lap count goes
    /// down), a large negative jump means it crossed forward (lap count goes
    /// up). Path points are assumed ordered in the intended direction of
    /// travel; the sign logic holds for either winding as long as fitness
    /// grows along the point order.
    fn update_fitness(&mut self, track: &Track) {
        let curr_lap_dist = track.distance_along_path(&self.position);

        let fitness_diff =
            self.laps_completed as f32 * track.length() + curr_lap_dist - self.fitness;
        if fitness_diff.abs() > track.length() / 2.0 {
            if fitness_diff > 0.0 {
                self.laps_completed -= 1;
            } else {
                self.laps_completed += 1;
            }
        }

        self.fitness = self.laps_completed as f32 * track.length() + curr_lap_dist;
    }

    /// Returns the distance to the nearest wall along `bearing` (radians
    /// relative to the heading).
    ///
    /// Marches outward in coarse steps while still on the surface, then backs
    /// up in unit steps until on-surface again. The result is scaled by the
    /// track scale and can be negative when the car's own position is already
    /// off-surface, which is the "how far into the wall" signal that triggers
    /// disabling.
    pub fn cast_ray(&self, track: &Track, params: &Params, bearing: f32) -> f32 {
        let direction = self.rotation + bearing;
        let (dir_x, dir_y) = (direction.cos(), direction.sin());

        let mut distance = 0.0;
        let mut tip_x = self.position[0];
        let mut tip_y = self.position[1];

        while track.is_on_surface(tip_x, tip_y) {
            tip_x += params.raycast_granularity * dir_x;
            tip_y += params.raycast_granularity * dir_y;
            distance += params.raycast_granularity;
        }
        while !track.is_on_surface(tip_x, tip_y) {
            tip_x -= dir_x;
            tip_y -= dir_y;
            distance -= 1.0;
        }

        distance * track.scale() + 1.0
    }

    /// Senses the track and asks the controller for this frame's inputs.
    ///
    /// Builds one raycast distance per sensor bearing, appends the current
    /// velocity, and maps the controller's two outputs to (acceleration,
    /// turning). Cars without a controller always get zero input.
    ///
    /// # Errors
    ///
    /// Propagates [`ControllerError`] if the controller's output shape is
    /// wrong.
    pub fn sense(&self, track: &Track, params: &Params) -> Result<CarInputs, ControllerError> {
        if self.controller.is_none() {
            return Ok(CarInputs::default());
        }

        let mut inputs = Array1::zeros(params.sensor_bearings.len() + 1);
        for (i, &bearing) in params.sensor_bearings.iter().enumerate() {
            inputs[i] = self.cast_ray(track, params, bearing);
        }
        inputs[params.sensor_bearings.len()] = self.velocity;

        self.controller.evaluate(&inputs)
    }

    /// Returns the car's effective display/physics scale.
    pub fn effective_scale(&self, track: &Track, params: &Params) -> f32 {
        params.car_scale * track.scale()
    }

    /// Returns the car's signed cumulative progress fitness.
    pub fn fitness(&self) -> f32 {
        self.fitness
    }

    /// Returns completed laps, clamped to zero.
    ///
    /// `laps_completed` can store negative values so fitness stays continuous
    /// across backward start-line crossings, but negative laps are never
    /// reported externally.
    pub fn laps(&self) -> i32 {
        self.laps_completed.max(0)
    }

    /// Returns `true` if the car has crashed or was manually disabled.
    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// Permanently disables the car.
    pub fn disable(&mut self) {
        self.disabled = true;
    }

    /// Returns the heading in radians.
    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    /// Returns the position.
    pub fn position(&self) -> &Array1<f32> {
        &self.position
    }

    /// Restores the start-line state without replacing the controller.
    pub fn reset(&mut self, track: &Track) {
        self.position = track.start_position().clone();
        self.rotation = 0.0;
        self.velocity = 0.0;
        self.fitness = 0.0;
        self.laps_completed = 0;
        self.disabled = false;
    }
}
