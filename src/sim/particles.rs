//! Visual particle pool
//!
//! A flat growable pool of short-lived quads used for every bit of visual
//! feedback: block debris, pickups, screen flashes, thrust trails and the
//! restart animation. Particles are simulation state (they scroll with the
//! world) but never affect gameplay.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use crate::consts::{MAP_HEIGHT, MAP_WIDTH};

/// Acceleration damping applied each integration step
const ACC_DAMPING: f32 = 0.8;
/// Depth velocity damping applied each integration step
const DEPTH_DAMPING: f32 = 0.9;

/// Debris shards per axis when a block splits
const SHARD_GRID: i32 = 2;
/// Base shard acceleration scale
const SHARD_ACC: f32 = 10.0;

#[derive(Debug, Clone, Copy)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub acc: Vec2,
    /// Visual layering only, not physics
    pub depth: f32,
    pub depth_vel: f32,
    pub radius: f32,
    pub life: f32,
    /// Not rendered and not aging while positive
    pub delay: f32,
    pub color: [u8; 3],
    alpha: f32,
}

impl Particle {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        pos: Vec2,
        vel: Vec2,
        acc: Vec2,
        depth: f32,
        depth_vel: f32,
        radius: f32,
        life: f32,
        delay: f32,
        color: [u8; 3],
        alpha: f32,
    ) -> Self {
        Self {
            pos,
            vel,
            acc,
            depth,
            depth_vel,
            radius,
            life,
            delay,
            color,
            // Out-of-range alpha maps to fully opaque, not clamped ends
            alpha: if (0.0..=1.0).contains(&alpha) { alpha } else { 1.0 },
        }
    }

    /// Still waiting out its activation delay
    pub fn waiting(&self) -> bool {
        self.delay > 0.0
    }

    /// Alpha as the renderer should draw it: the stored value, fading
    /// linearly over the last half second of life. Computed at read time,
    /// never stored back.
    pub fn rendered_alpha(&self) -> f32 {
        if self.life > 0.5 {
            self.alpha
        } else {
            self.life * 2.0 * self.alpha
        }
    }
}

pub struct ParticlePool {
    particles: Vec<Particle>,
}

impl Default for ParticlePool {
    fn default() -> Self {
        Self::new()
    }
}

impl ParticlePool {
    pub fn new() -> Self {
        Self {
            particles: Vec::with_capacity(2048),
        }
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter()
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }

    pub fn spawn(&mut self, particle: Particle) {
        self.particles.push(particle);
    }

    /// Advance every particle by one frame.
    ///
    /// `offset` is the world scroll distance this frame; particles ride the
    /// terrain. Delay is consumed before life, and any delay overshoot is
    /// credited back onto life so the effective lifetime is never shortened.
    /// Expired particles are removed by swap-with-last; order is not stable.
    pub fn advance(&mut self, dt: f32, offset: f32) {
        let mut i = 0;
        while i < self.particles.len() {
            let p = &mut self.particles[i];
            p.pos.x -= offset;
            if p.delay <= 0.0 {
                p.life -= dt;
                if p.life > 0.0 {
                    p.pos += p.vel * dt;
                    p.vel += p.acc * dt;
                    p.acc *= ACC_DAMPING;
                    p.depth += p.depth_vel * dt;
                    p.depth_vel *= DEPTH_DAMPING;
                    i += 1;
                } else {
                    self.particles.swap_remove(i);
                }
            } else {
                p.delay -= dt;
                if p.delay < 0.0 {
                    p.life += p.delay;
                }
                i += 1;
            }
        }
    }

    // ---- effect spawners -------------------------------------------------

    fn flash_pos(rng: &mut Pcg32) -> Vec2 {
        Vec2::new(
            rng.random_range(1.0..MAP_WIDTH as f32 - 1.0),
            rng.random_range(1.0..MAP_HEIGHT as f32 - 1.0),
        )
    }

    /// Full-screen rainbow flash
    pub fn flash_rainbow(&mut self, rng: &mut Pcg32, amount: u32, life: f32, intensity: f32) {
        for _ in 0..amount {
            let pos = Self::flash_pos(rng);
            self.spawn(Particle::new(
                pos,
                Vec2::ZERO,
                Vec2::ZERO,
                11.0,
                1.0,
                rng.random_range(1.0..2.0),
                life / rng.random_range(1.0..2.0),
                rng.random_range(0.0..life),
                [rng.random(), rng.random(), rng.random()],
                intensity,
            ));
        }
    }

    /// Full-screen purple flash
    pub fn flash_purple(&mut self, rng: &mut Pcg32, amount: u32, life: f32, intensity: f32) {
        for _ in 0..amount {
            let pos = Self::flash_pos(rng);
            self.spawn(Particle::new(
                pos,
                Vec2::ZERO,
                Vec2::ZERO,
                11.0,
                1.0,
                rng.random_range(0.3..1.2),
                life / rng.random_range(1.0..2.0),
                rng.random_range(0.0..life),
                [rng.random_range(100..140), 50, rng.random_range(190..240)],
                intensity,
            ));
        }
    }

    /// Full-screen red flash
    pub fn flash_red(&mut self, rng: &mut Pcg32, amount: u32, life: f32, intensity: f32) {
        for _ in 0..amount {
            let pos = Self::flash_pos(rng);
            self.spawn(Particle::new(
                pos,
                Vec2::ZERO,
                Vec2::ZERO,
                11.0,
                1.0,
                rng.random_range(0.5..1.0),
                life / rng.random_range(1.0..2.0),
                rng.random_range(0.0..life),
                [rng.random_range(200..255), 0, rng.random_range(0..50)],
                intensity,
            ));
        }
    }

    /// White static burst played when the player slams into terrain
    pub fn glitch(&mut self, rng: &mut Pcg32) {
        for _ in 0..40 {
            let pos = Vec2::new(
                rng.random_range(5.0..MAP_WIDTH as f32 - 5.0),
                rng.random_range(5.0..MAP_HEIGHT as f32 - 5.0),
            );
            self.spawn(Particle::new(
                pos,
                Vec2::ZERO,
                Vec2::ZERO,
                10.0,
                1.0,
                rng.random_range(0.3..0.7),
                rng.random_range(0.1..0.4),
                rng.random_range(0.0..0.2),
                [255, 255, 255],
                rng.random_range(0.4..0.6),
            ));
        }
    }

    /// Sparkle trail behind a drifting star power-up
    pub fn star_trail(&mut self, rng: &mut Pcg32, x: f32, y: f32) {
        for _ in 0..5 {
            self.spawn(Particle::new(
                Vec2::new(x + 0.5, y + 0.5),
                Vec2::new(rng.random_range(-5.0..40.0), rng.random_range(-25.0..25.0)),
                Vec2::ZERO,
                0.3,
                0.0,
                rng.random_range(0.05..0.1),
                rng.random_range(0.3..0.6),
                rng.random_range(0.0..0.01),
                [
                    rng.random_range(150..255),
                    rng.random_range(150..255),
                    rng.random_range(150..255),
                ],
                rng.random_range(0.4..0.7),
            ));
        }
    }

    /// Rearward exhaust burst (missiles)
    pub fn thrust(
        &mut self,
        rng: &mut Pcg32,
        pos: Vec2,
        depth: f32,
        depth_vel: f32,
        radius: f32,
        life: f32,
        delay: f32,
    ) {
        for _ in 0..5 {
            self.spawn(Particle::new(
                pos,
                Vec2::new(rng.random_range(-50.0..-15.0), rng.random_range(-10.0..10.0)),
                Vec2::ZERO,
                depth,
                depth_vel,
                radius,
                life,
                delay,
                [rng.random_range(200..255), 0, rng.random_range(0..50)],
                0.5,
            ));
        }
    }

    /// Five-point cross burst played on pickup
    pub fn collect_burst(&mut self, x: f32, y: f32, color: [u8; 3]) {
        self.spawn(Particle::new(
            Vec2::new(x, y),
            Vec2::ZERO,
            Vec2::ZERO,
            0.5,
            2.0,
            0.6,
            0.5,
            0.0,
            color,
            0.5,
        ));
        for (dx, dy) in [(-0.5, -0.5), (-0.5, 0.5), (0.5, -0.5), (0.5, 0.5)] {
            self.spawn(Particle::new(
                Vec2::new(x + dx, y + dy),
                Vec2::new(dx * 4.0, dy * 4.0),
                Vec2::ZERO,
                0.5,
                0.0,
                0.3,
                0.4,
                0.2,
                color,
                0.5,
            ));
        }
    }

    /// Restart animation: a big central fading disc plus ~100 staggered
    /// flashes across five visual layers.
    pub fn restart_burst(&mut self, rng: &mut Pcg32, life: f32, intensity: f32) {
        let life = life.clamp(0.5, 1.2);
        let intensity = intensity.clamp(0.1, 1.0);
        let center = Vec2::new(MAP_WIDTH as f32 / 2.0, MAP_HEIGHT as f32 / 2.0);

        self.spawn(Particle::new(
            center,
            Vec2::ZERO,
            Vec2::ZERO,
            10.0,
            1.0,
            40.0,
            life,
            0.0,
            [255, 255, 255],
            intensity,
        ));
        for _ in 0..10 {
            let pos = Vec2::new(
                rng.random_range(5.0..MAP_WIDTH as f32 - 5.0),
                rng.random_range(5.0..MAP_HEIGHT as f32 - 5.0),
            );
            self.spawn(Particle::new(
                pos,
                Vec2::ZERO,
                Vec2::ZERO,
                10.0,
                1.0,
                rng.random_range(5.0..15.0),
                life / rng.random_range(1.0..2.0),
                rng.random_range(0.0..life),
                [255, 255, 255],
                intensity,
            ));
        }
        for _ in 0..20 {
            let pos = Vec2::new(
                rng.random_range(5.0..MAP_WIDTH as f32 - 5.0),
                rng.random_range(5.0..MAP_HEIGHT as f32 - 5.0),
            );
            let grey = rng.random_range(150..200);
            self.spawn(Particle::new(
                pos,
                Vec2::ZERO,
                Vec2::ZERO,
                10.0,
                1.0,
                rng.random_range(2.0..8.0),
                life / rng.random_range(1.0..2.0),
                rng.random_range(life / 2.0..life * 2.0),
                [grey, grey, grey],
                intensity * 0.8,
            ));
        }
        for _ in 0..30 {
            let pos = Self::flash_pos(rng);
            self.spawn(Particle::new(
                pos,
                Vec2::ZERO,
                Vec2::ZERO,
                11.0,
                1.0,
                rng.random_range(1.0..2.0),
                life / rng.random_range(1.0..2.0),
                rng.random_range(life / 2.0..life * 2.0),
                [rng.random_range(100..140), 50, rng.random_range(190..240)],
                intensity * 0.5,
            ));
        }
        for _ in 0..40 {
            let pos = Self::flash_pos(rng);
            self.spawn(Particle::new(
                pos,
                Vec2::ZERO,
                Vec2::ZERO,
                11.0,
                1.0,
                rng.random_range(0.5..1.0),
                life / rng.random_range(1.0..3.0),
                rng.random_range(life * 1.5..life * 3.0),
                [rng.random_range(200..255), 0, rng.random_range(0..50)],
                intensity * 0.5,
            ));
        }
    }

    /// Debris burst when a block at cell (x, y) is destroyed: one slow
    /// center shard plus a grid of accelerating fragments.
    pub fn block_debris(&mut self, rng: &mut Pcg32, x: i32, y: i32) {
        let center = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
        self.spawn(Particle::new(
            center,
            Vec2::new(rng.random_range(-0.5..0.5), rng.random_range(-5.0..5.0)),
            Vec2::ZERO,
            0.1,
            rng.random_range(5.0..10.0),
            rng.random_range(0.4..0.5),
            rng.random_range(0.4..1.2),
            0.0,
            [rng.random_range(100..140), 50, rng.random_range(190..240)],
            rng.random_range(0.5..0.7),
        ));
        for xp in 0..SHARD_GRID {
            for yp in 0..SHARD_GRID {
                let pos = Vec2::new(
                    x as f32 + xp as f32 / SHARD_GRID as f32,
                    y as f32 + yp as f32 / SHARD_GRID as f32,
                );
                let half = SHARD_GRID as f32 / 2.0;
                let acc = Vec2::new(
                    (xp as f32 - half) * SHARD_ACC * rng.random_range(2.5..4.0),
                    (yp as f32 - half) * SHARD_ACC * rng.random_range(2.5..4.0),
                );
                self.spawn(Particle::new(
                    pos,
                    Vec2::ZERO,
                    acc,
                    -1.0,
                    rng.random_range(0.5..20.0) - 5.0,
                    rng.random_range(0.1..0.25),
                    rng.random_range(0.3..1.3),
                    0.0,
                    [rng.random_range(80..160), 50, rng.random_range(180..250)],
                    rng.random_range(0.2..0.6),
                ));
            }
        }
    }

    /// Cosmetic ember rolled per blast candidate cell, independent of
    /// whether a block was actually destroyed there.
    pub fn melt(&mut self, rng: &mut Pcg32, x: i32, y: i32) {
        self.spawn(Particle::new(
            Vec2::new(x as f32 + 0.5, y as f32 + 0.5),
            Vec2::ZERO,
            Vec2::new(rng.random_range(-15.0..15.0), rng.random_range(-15.0..15.0)),
            -0.1,
            rng.random_range(-10.0..-5.0),
            2.45,
            rng.random_range(0.0..1.0),
            rng.random_range(0.0..0.5),
            [rng.random_range(200..255), 0, rng.random_range(0..50)],
            rng.random_range(0.1..0.3),
        ));
    }
}
