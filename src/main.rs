//! Headless training loop: evolves car controllers on a procedural ring track
//! and logs per-generation progress.

use env_logger::Env;
use log::info;
use ndarray::Array1;

use raceline::simulation::generation::GenerationManager;
use raceline::simulation::params::Params;
use raceline::simulation::surface::RasterSurface;
use raceline::simulation::track::Track;

const WIDTH: usize = 800;
const HEIGHT: usize = 600;
const RING_RADIUS: f32 = 200.0;
const RING_HALF_WIDTH: f32 = 60.0;
const PATH_POINTS: usize = 32;
const GENERATIONS: u32 = 20;

/// Builds a ring-shaped track centered in the raster. The path starts at the
/// top of the ring and winds so that the first segment heads east, matching
/// the cars' initial heading.
fn ring_track() -> Result<Track, Box<dyn std::error::Error>> {
    let center_x = WIDTH as f32 / 2.0;
    let center_y = HEIGHT as f32 / 2.0;

    let surface = RasterSurface::from_fn(WIDTH, HEIGHT, |x, y| {
        let dx = x as f32 - center_x;
        let dy = y as f32 - center_y;
        ((dx * dx + dy * dy).sqrt() - RING_RADIUS).abs() < RING_HALF_WIDTH
    });

    let path_points = (0..PATH_POINTS)
        .map(|i| {
            let angle = -std::f32::consts::FRAC_PI_2
                + i as f32 * std::f32::consts::TAU / PATH_POINTS as f32;
            Array1::from_vec(vec![
                center_x + RING_RADIUS * angle.cos(),
                center_y + RING_RADIUS * angle.sin(),
            ])
        })
        .collect();

    Ok(Track::new(path_points, Box::new(surface))?)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let params = Params::default();
    let track = ring_track()?;
    info!(
        "ring track: length {:.0}, start {:?}",
        track.length(),
        track.start_position().to_vec()
    );

    let mut manager = GenerationManager::new(track, &params);
    manager.seed_random(&params)?;

    while manager.generation_number() <= GENERATIONS {
        manager.advance_frame(&params)?;
    }

    info!(
        "finished after {} generations, final population {}",
        GENERATIONS,
        manager.cars().len()
    );
    Ok(())
}
