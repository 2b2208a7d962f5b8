//! Timed random placement of world objects around the player

use std::f32::consts::TAU;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::objects::ObjectKind;
use crate::config::{Mode7Config, DEFAULT_HAZARD_CHANCE};
use crate::rasterizer::Vec2;

#[derive(Debug)]
pub struct Spawner {
    rng: StdRng,
    timer: f32,
    last_spawn: Option<Vec2>,
    interval: f32,
    attempts: u32,
    min_distance: f32,
    radius: f32,
    min_delta: f32,
    hazard_chance: f64,
}

impl Spawner {
    pub fn new(config: &Mode7Config, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let min_distance = config.min_spawn_distance.max(0.0);
        let radius = config.spawn_radius.max(min_distance);
        let hazard_chance = if config.hazard_chance.is_finite() {
            config.hazard_chance.clamp(0.0, 1.0)
        } else {
            log::warn!("hazard_chance {} is not a probability, using {}", config.hazard_chance, DEFAULT_HAZARD_CHANCE);
            DEFAULT_HAZARD_CHANCE
        };
        Self {
            rng,
            timer: 0.0,
            last_spawn: None,
            interval: config.spawn_interval,
            attempts: config.max_spawn_attempts,
            min_distance,
            radius: if radius.is_finite() { radius } else { min_distance },
            min_delta: config.min_spawn_delta,
            hazard_chance,
        }
    }

    pub fn timer(&self) -> f32 {
        self.timer
    }

    pub fn last_spawn(&self) -> Option<Vec2> {
        self.last_spawn
    }

    /// Record a placement made outside the spawner
    pub fn set_last_spawn(&mut self, position: Vec2) {
        self.last_spawn = Some(position);
    }

    fn far_enough(&self, candidate: Vec2) -> bool {
        match self.last_spawn {
            None => true,
            Some(last) => {
                (candidate.x - last.x).abs() > self.min_delta
                    && (candidate.y - last.y).abs() > self.min_delta
            }
        }
    }

    /// Advance the timer. When it reaches the interval, try to pick a spot
    /// near `player`; the timer resets whether or not a spot was found.
    pub fn update(&mut self, dt: f32, player: Vec2) -> Option<(Vec2, ObjectKind)> {
        self.timer += dt;
        if self.timer < self.interval {
            return None;
        }
        self.timer = 0.0;

        for _ in 0..self.attempts {
            let angle = self.rng.gen_range(0.0..TAU);
            let distance = self.rng.gen_range(self.min_distance..=self.radius);
            let candidate = player.polar_offset(angle, distance);
            if !self.far_enough(candidate) {
                continue;
            }
            let kind = if self.rng.gen_bool(self.hazard_chance) {
                ObjectKind::Hazard
            } else {
                ObjectKind::Collectible
            };
            self.last_spawn = Some(candidate);
            return Some((candidate, kind));
        }
        log::debug!("no spawn point found after {} attempts", self.attempts);
        None
    }
}
