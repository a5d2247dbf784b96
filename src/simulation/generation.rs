//! Population management and the generational genetic algorithm.
//!
//! The manager owns the track and a fixed-size population of cars, advances
//! them in lockstep one frame at a time, and performs the reproduction step
//! at generation boundaries: fitness ranking, elitism, half-normal rank
//! selection of parents, parameter-averaging crossover, and mutation.

use log::{info, warn};
use ndarray::Array1;
use ndarray_rand::RandomExt;
use ndarray_rand::rand_distr::Normal;

use super::brain::Brain;
use super::car::Car;
use super::controller::Controller;
use super::error::ConfigurationError;
use super::params::Params;
use super::track::Track;

/// Owns a car population and evolves it generation by generation.
///
/// Execution is single-threaded and frame-stepped: the host drives the
/// simulation by calling [`GenerationManager::advance_frame`] once per tick.
/// Generation advancement is a stop-the-world step between frames.
pub struct GenerationManager {
    track: Track,
    population: Vec<Car>,
    population_size: usize,
    generation_number: u32,
    generation_frame_count: u32,
    disabled_count: usize,
    auto_advance: bool,
}

impl GenerationManager {
    /// Creates a manager on a track with an empty population.
    ///
    /// Call [`GenerationManager::seed_random`] to create the first
    /// generation.
    pub fn new(track: Track, params: &Params) -> Self {
        Self {
            track,
            population: Vec::new(),
            population_size: params.population_size,
            generation_number: 1,
            generation_frame_count: 0,
            disabled_count: 0,
            auto_advance: true,
        }
    }

    /// Replaces the population with randomly initialized cars and restarts
    /// generation counting.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigurationError`] if the parameter set is inconsistent.
    pub fn seed_random(&mut self, params: &Params) -> Result<(), ConfigurationError> {
        params.validate()?;

        self.population = (0..self.population_size)
            .map(|i| {
                let brain = Brain::new(&params.layer_sizes, params.weight_init_scale);
                Car::new(&self.track, i, Controller::Network(brain))
            })
            .collect();

        self.generation_number = 1;
        self.generation_frame_count = 0;
        self.disabled_count = 0;
        Ok(())
    }

    /// Advances the simulation by one frame.
    ///
    /// When auto-advance is enabled and the generation has either exhausted
    /// its frame budget or lost every car, the reproduction step runs
    /// instead. Otherwise every live car senses the track, asks its
    /// controller for inputs, and integrates physics. A controller whose
    /// output shape is wrong only costs its own car the frame.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigurationError`] if a triggered generation advance
    /// fails; the previous generation stays active in that case.
    pub fn advance_frame(&mut self, params: &Params) -> Result<(), ConfigurationError> {
        if !self.auto_advance
            || (self.generation_frame_count < params.max_generation_frames
                && self.disabled_count < self.population_size)
        {
            let track = &self.track;
            for car in &mut self.population {
                if car.is_disabled() {
                    continue;
                }

                let inputs = match car.sense(track, params) {
                    Ok(inputs) => inputs,
                    Err(err) => {
                        warn!("car {} skipped this frame: {err}", car.id);
                        continue;
                    }
                };

                car.frame_update(track, params, inputs);
                if car.is_disabled() {
                    self.disabled_count += 1;
                }
            }
        } else {
            self.advance_generation(params)?;
        }
        self.generation_frame_count += 1;
        Ok(())
    }

    /// Runs the reproduction step and swaps in the next generation.
    ///
    /// The current population is ranked descending by fitness. The top
    /// `elite_count` controllers are deep-copied unchanged to the front of
    /// the new population with fresh ids. Every remaining slot gets an
    /// offspring of two parents drawn independently from a half-normal
    /// distribution over ranks (favoring fitter cars without a hard cutoff),
    /// built by parameter-averaging crossover followed by mutation. The swap
    /// is atomic from the caller's perspective: on error the previous
    /// generation remains active.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::PopulationTooSmall`] when the current
    /// population size cannot hold the configured elites, or another
    /// [`ConfigurationError`] for an inconsistent parameter set.
    pub fn advance_generation(&mut self, params: &Params) -> Result<(), ConfigurationError> {
        params.validate()?;

        let new_size = self.population_size;
        if new_size < params.elite_count {
            return Err(ConfigurationError::PopulationTooSmall {
                population: new_size,
                elite: params.elite_count,
            });
        }
        if self.population.is_empty() {
            // Nothing to select from yet; start from scratch at the new size.
            return self.seed_random(params);
        }

        self.population
            .sort_by(|a, b| b.fitness().total_cmp(&a.fitness()));
        let old = &self.population;
        let old_len = old.len();

        // Rank spread scales with the actual population relative to the
        // configured default size.
        let std_dev = params.selection_std_dev * old_len as f32 / params.population_size as f32;
        let normal = Normal::new(0.0, std_dev)
            .map_err(|_| ConfigurationError::InvalidSelectionSpread { std_dev })?;
        let samples: Array1<f32> = Array1::random(new_size * 2, normal);
        let parent_index = |slot: usize| (samples[slot].abs() as usize).min(old_len - 1);

        let mut new_population = Vec::with_capacity(new_size);
        let id_base = self.generation_number as usize * new_size;

        for i in 0..params.elite_count.min(new_size) {
            let elite = &old[i % old_len];
            new_population.push(Car::new(&self.track, id_base + i, elite.controller.clone()));
        }

        for i in params.elite_count..new_size {
            let parent_one = &old[parent_index(i * 2)];
            let parent_two = &old[parent_index(i * 2 + 1)];

            let controller = match (parent_one.controller.brain(), parent_two.controller.brain()) {
                (Some(first), Some(second)) => {
                    let mut offspring = Brain::crossover(first, second);
                    offspring.mutate(params.mutation_rate);
                    Controller::Network(offspring)
                }
                // Manually driven parents have nothing to recombine.
                _ => Controller::None,
            };

            new_population.push(Car::new(&self.track, id_base + i, controller));
        }

        info!(
            "generation {} complete after {} frames, top fitness {:.1}",
            self.generation_number,
            self.generation_frame_count,
            self.top_fitness().unwrap_or(0.0),
        );

        self.population = new_population;
        self.generation_frame_count = 0;
        self.disabled_count = 0;
        self.generation_number += 1;
        Ok(())
    }

    /// Sets the population size and forces an immediate generation advance at
    /// the new size. A negative size resets to the configured default.
    ///
    /// # Errors
    ///
    /// Propagates the [`ConfigurationError`] of the forced advance.
    pub fn set_population_size(
        &mut self,
        new_size: i64,
        params: &Params,
    ) -> Result<(), ConfigurationError> {
        if new_size < 0 {
            self.population_size = params.population_size;
        } else {
            self.population_size = new_size as usize;
        }
        self.advance_generation(params)
    }

    /// Replaces the track and, if a population exists, starts the next
    /// generation on it.
    ///
    /// # Errors
    ///
    /// Propagates the [`ConfigurationError`] of the forced advance.
    pub fn set_track(&mut self, track: Track, params: &Params) -> Result<(), ConfigurationError> {
        self.track = track;
        if self.population.is_empty() {
            return Ok(());
        }
        self.advance_generation(params)
    }

    /// Set to `false` to keep running the current generation past its frame
    /// budget or after every car has crashed.
    pub fn set_auto_advance(&mut self, auto_advance: bool) {
        self.auto_advance = auto_advance;
    }

    /// Returns the current track.
    pub fn track(&self) -> &Track {
        &self.track
    }

    /// Sets the track scale. Non-positive values are ignored.
    pub fn set_track_scale(&mut self, scale: f32) {
        self.track.set_scale(scale);
    }

    /// Returns the current population.
    pub fn cars(&self) -> &[Car] {
        &self.population
    }

    /// Returns the current population mutably.
    ///
    /// Intended for hosts that drive a manual car or for tests that arrange
    /// specific fitness values.
    pub fn cars_mut(&mut self) -> &mut [Car] {
        &mut self.population
    }

    /// Returns the fitness of the most-fit car, if any.
    pub fn top_fitness(&self) -> Option<f32> {
        self.population
            .iter()
            .map(Car::fitness)
            .reduce(f32::max)
    }

    /// Returns the generation number of the current population.
    pub fn generation_number(&self) -> u32 {
        self.generation_number
    }

    /// Returns the number of frames completed in the current generation.
    pub fn frame_count(&self) -> u32 {
        self.generation_frame_count
    }

    /// Returns how many cars of the current generation have crashed.
    pub fn disabled_count(&self) -> usize {
        self.disabled_count
    }

    /// Returns the current population size target.
    pub fn population_size(&self) -> usize {
        self.population_size
    }
}
