use crate::constants::*;
use crate::entities::{Asteroid, AsteroidSize};
use crate::types::Vector2D;
use log::debug;
use rand::Rng;

pub fn wave_size(score: u32) -> usize {
    let bonus = (score / WAVE_SCORE_STEP) as usize;
    (INITIAL_ASTEROIDS + bonus).min(MAX_WAVE_ASTEROIDS)
}

/// A random integer position more than `SPAWN_SAFE_DISTANCE` away from `avoid`.
/// Gives up after `SPAWN_MAX_ATTEMPTS` rejections and takes any position.
pub fn spawn_position(avoid: Vector2D, rng: &mut impl Rng) -> Vector2D {
    for _ in 0..SPAWN_MAX_ATTEMPTS {
        let candidate = random_cell(rng);
        if candidate.distance(avoid) > SPAWN_SAFE_DISTANCE {
            return candidate;
        }
    }
    debug!("No spawn point clear of ({:.0}, {:.0}) after {} tries", avoid.x, avoid.y, SPAWN_MAX_ATTEMPTS);
    random_cell(rng)
}

fn random_cell(rng: &mut impl Rng) -> Vector2D {
    let x = rng.gen_range(0..SCREEN_WIDTH as u32);
    let y = rng.gen_range(0..SCREEN_HEIGHT as u32);
    Vector2D::new(x as f64, y as f64)
}

pub fn spawn_asteroids(count: usize, avoid: Vector2D, rng: &mut impl Rng) -> Vec<Asteroid> {
    (0..count)
        .map(|_| {
            let position = spawn_position(avoid, rng);
            Asteroid::new(position, AsteroidSize::Large, rng)
        })
        .collect()
}
