//! The world aggregate
//!
//! Everything a run owns lives here: the corridor, the pools, the player,
//! the seeded RNG and the score ledger. The whole simulation is a pure
//! function of the seed and the per-frame inputs; nothing is global.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::items::Item;
use super::particles::ParticlePool;
use super::player::Player;
use super::tilemap::Tilemap;
use crate::consts::{
    DEFAULT_HIGH_SCORE, MAP_HEIGHT, MAP_WIDTH, PLAYER_SPAWN_X, PLAYER_SPAWN_Y, STARTUP_DELAY,
};
use crate::tuning::Tuning;

/// Run phase. Startup is the countdown window after a (re)start; the world
/// already scrolls and renders, but input is held back until the last two
/// seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Startup,
    Playing,
}

pub struct World {
    pub seed: u64,
    pub rng: Pcg32,
    pub tuning: Tuning,
    pub map: Tilemap,
    pub particles: ParticlePool,
    pub items: Vec<Item>,
    pub player: Player,
    pub phase: Phase,
    /// Startup countdown, seconds
    pub delay: f32,
    /// Current scroll speed, columns per second
    pub speed: f32,
    /// Fractional scroll accumulator; whole units become discrete column
    /// steps, the remainder is the smooth visual offset
    pub map_warp: f32,
    pub score: u64,
    pub last_score: u64,
    pub best_score: u64,
    pub high_score: u64,
    /// Blast score earned mid-frame, drained into `score` next frame
    pub pending_score: u32,
}

impl World {
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(seed, Tuning::default())
    }

    pub fn with_tuning(seed: u64, tuning: Tuning) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let map = Tilemap::generate(MAP_WIDTH, MAP_HEIGHT, &mut rng);
        Self {
            seed,
            rng,
            tuning,
            map,
            particles: ParticlePool::new(),
            items: Vec::new(),
            player: Player::new(PLAYER_SPAWN_X, PLAYER_SPAWN_Y),
            phase: Phase::Startup,
            delay: STARTUP_DELAY,
            speed: 0.0,
            map_warp: 0.0,
            score: 0,
            last_score: 0,
            best_score: 0,
            high_score: DEFAULT_HIGH_SCORE,
            pending_score: 0,
        }
    }

    /// End the run and roll straight into a fresh countdown: new corridor,
    /// reset player and pools, scores folded into the ledger. Long-lived
    /// allocations (pools, player) are reused.
    pub fn restart(&mut self) {
        self.map = Tilemap::generate(MAP_WIDTH, MAP_HEIGHT, &mut self.rng);
        self.player.reset();
        self.items.clear();
        self.particles.clear();
        self.particles.restart_burst(&mut self.rng, 0.7, 1.0);

        log::info!("run ended with score {} (seed {})", self.score, self.seed);
        self.last_score = self.score;
        if self.score > self.best_score {
            self.best_score = self.score;
        }
        if self.score > self.high_score {
            log::info!("new high score {}", self.score);
            self.high_score = self.score;
        }
        self.score = 0;
        self.pending_score = 0;
        self.speed = 0.0;
        self.map_warp = 0.0;
        self.delay = STARTUP_DELAY;
        self.phase = Phase::Startup;
    }
}
