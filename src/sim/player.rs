//! The player craft
//!
//! A single long-lived entity: explicit Euler integration with impulse
//! forces (acceleration is re-applied by the caller every frame, never
//! persistent), contact friction, damped bouncing off terrain and a timed
//! star mode that trades bouncing for a destructive sparkle trail.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::blast::blast;
use super::collision::{Contacts, probe};
use super::particles::ParticlePool;
use super::tilemap::Tilemap;
use crate::consts::STAR_DURATION;

/// Contact friction coefficient (opposes the sliding velocity component)
const FRICTION: f32 = -50.0;

/// Bounce reverses and divides the impacted velocity component by this
const BOUNCE_DAMPING: f32 = 10.0;

/// Impact speed above which a bounce detonates a tier-3 blast
const HARD_IMPACT_SPEED: f32 = 15.0;

/// Probe radius used for the player's collision sampling
const PLAYER_PROBE_RADIUS: f32 = 0.5;

/// Interval between star-mode sparkle detonations, after a 0.5 lead-in
const STAR_PULSE: f32 = 0.05;

#[derive(Debug, Clone)]
pub struct Player {
    pub pos: Vec2,
    pub vel: Vec2,
    pub acc: Vec2,
    spawn_pos: Vec2,
    pub gravity_flipped: bool,
    pub active: bool,
    pub contacts: Contacts,
    pub grenades: u32,
    pub cluster_grenades: u32,
    pub missiles: u32,
    /// Remaining star time; 0 means inactive
    pub star_time: f32,
    /// Star pulse accumulator; per-run state, reset on restart
    star_warp: f32,
}

impl Player {
    pub fn new(x: f32, y: f32) -> Self {
        let spawn_pos = Vec2::new(x, y);
        Self {
            pos: spawn_pos,
            vel: Vec2::ZERO,
            acc: Vec2::ZERO,
            spawn_pos,
            gravity_flipped: false,
            active: true,
            contacts: Contacts::NONE,
            grenades: 10,
            cluster_grenades: 0,
            missiles: 0,
            star_time: STAR_DURATION,
            star_warp: 0.0,
        }
    }

    /// Back to spawn defaults. The instance is reused across restarts,
    /// never reallocated.
    pub fn reset(&mut self) {
        self.pos = self.spawn_pos;
        self.vel = Vec2::ZERO;
        self.acc = Vec2::ZERO;
        self.gravity_flipped = false;
        self.contacts = Contacts::NONE;
        self.grenades = 10;
        self.cluster_grenades = 0;
        self.missiles = 0;
        self.star_time = STAR_DURATION;
        self.star_warp = 0.0;
    }

    /// Impulse force for this frame
    pub fn push(&mut self, x: f32, y: f32) {
        self.acc += Vec2::new(x, y);
    }

    pub fn flip_gravity(&mut self) {
        self.gravity_flipped = !self.gravity_flipped;
    }

    pub fn shoot_grenade(&mut self) -> bool {
        if self.grenades > 0 {
            self.grenades -= 1;
            true
        } else {
            false
        }
    }

    pub fn shoot_cluster_grenade(&mut self) -> bool {
        if self.cluster_grenades > 0 {
            self.cluster_grenades -= 1;
            true
        } else {
            false
        }
    }

    pub fn shoot_missile(&mut self) -> bool {
        if self.missiles > 0 {
            self.missiles -= 1;
            true
        } else {
            false
        }
    }

    /// Advance the player by one frame: scroll shift, Euler step, star mode,
    /// contact sampling, friction, bounce. Returns score earned by any
    /// blasts triggered along the way (star pulses and hard impacts).
    pub fn integrate(
        &mut self,
        dt: f32,
        offset: f32,
        map: &mut Tilemap,
        particles: &mut ParticlePool,
        rng: &mut Pcg32,
    ) -> u32 {
        let mut earned = 0;

        self.pos.x -= offset;
        self.pos += self.vel * dt;
        self.vel += self.acc * dt;
        self.acc = Vec2::ZERO;

        if self.star_time > 0.0 {
            self.star_time -= dt;
            self.star_warp += dt;
            while self.star_warp > 0.5 {
                earned += blast(1, self.pos.x as i32, self.pos.y as i32, map, particles, rng);
                if self.star_time > 2.0 {
                    particles.collect_burst(
                        self.pos.x + 0.05,
                        self.pos.y + 0.05,
                        [
                            rng.random_range(150..255),
                            rng.random_range(150..255),
                            rng.random_range(150..255),
                        ],
                    );
                } else {
                    // Red warning sparkle as the star runs out
                    particles.collect_burst(self.pos.x + 0.05, self.pos.y + 0.05, [255, 0, 50]);
                }
                self.star_warp -= STAR_PULSE;
            }
            // Star flight never dips into the lava bands
            if self.pos.y < 2.0 {
                self.vel.y = 15.0;
                self.pos.y += 0.3;
            } else if self.pos.y > map.height() as f32 - 2.0 {
                self.vel.y = -15.0;
                self.pos.y -= 0.3;
            }
        }

        self.contacts = probe(map, self.pos, PLAYER_PROBE_RADIUS, offset);

        self.friction();
        earned += self.bounce(map, particles, rng);

        if self.star_time < 0.0 {
            self.star_time = 0.0;
            self.star_warp = 0.0;
        }

        earned
    }

    /// Oppose the velocity component sliding along any contacted surface.
    /// Star mode halves it.
    fn friction(&mut self) {
        let mut friction = FRICTION;
        if self.star_time > 0.0 {
            friction *= 0.5;
        }
        if self.contacts.vertical() {
            self.acc.x += friction * self.vel.x;
        }
        if self.contacts.horizontal() {
            self.acc.y += friction * self.vel.y;
        }
    }

    /// Reverse and damp the impacted velocity component, nudge off the
    /// surface, and detonate on hard impacts. Only when the star timer is
    /// fully expired.
    fn bounce(
        &mut self,
        map: &mut Tilemap,
        particles: &mut ParticlePool,
        rng: &mut Pcg32,
    ) -> u32 {
        if self.star_time != 0.0 {
            return 0;
        }
        let impact = self.vel;
        let mut bounced = false;

        if self.contacts.contains(Contacts::BOTTOM) {
            self.vel.y = -self.vel.y / BOUNCE_DAMPING;
            self.pos.y += 0.1;
            bounced = true;
        } else if self.contacts.contains(Contacts::TOP) {
            self.vel.y = -self.vel.y / BOUNCE_DAMPING;
            self.pos.y -= 0.1;
            bounced = true;
        }
        if self.contacts.contains(Contacts::RIGHT) {
            self.vel.x = -self.vel.x / BOUNCE_DAMPING;
            self.pos.x -= 0.1;
            bounced = true;
        } else if self.contacts.contains(Contacts::LEFT) {
            self.vel.x = -self.vel.x / BOUNCE_DAMPING;
            self.pos.x += 0.1;
            bounced = true;
        }

        if !bounced {
            return 0;
        }

        particles.glitch(rng);
        let hard = (impact.x.abs() > HARD_IMPACT_SPEED && self.contacts.horizontal())
            || (impact.y.abs() > HARD_IMPACT_SPEED && self.contacts.vertical());
        let tier = if hard { 3 } else { 1 };
        blast(tier, self.pos.x as i32, self.pos.y as i32, map, particles, rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{PLAYER_SPAWN_X, PLAYER_SPAWN_Y};
    use crate::sim::tilemap::Tile;
    use rand::SeedableRng;

    fn rng() -> Pcg32 {
        Pcg32::seed_from_u64(21)
    }

    fn open_map(rng: &mut Pcg32) -> Tilemap {
        let mut map = Tilemap::generate(80, 40, rng);
        for y in 1..39 {
            for x in 0..80 {
                map.set(x, y, Tile::Empty);
            }
        }
        map
    }

    #[test]
    fn ammo_counters_never_go_negative() {
        let mut p = Player::new(5.0, 20.0);
        p.grenades = 1;
        assert!(p.shoot_grenade());
        assert!(!p.shoot_grenade());
        assert_eq!(p.grenades, 0);

        assert!(!p.shoot_cluster_grenade());
        assert_eq!(p.cluster_grenades, 0);
        assert!(!p.shoot_missile());
        assert_eq!(p.missiles, 0);
    }

    #[test]
    fn forces_are_impulses() {
        let mut r = rng();
        let mut map = open_map(&mut r);
        let mut particles = ParticlePool::new();
        let mut p = Player::new(20.0, 20.0);
        p.star_time = 0.0;
        p.push(100.0, 0.0);
        p.integrate(0.1, 0.0, &mut map, &mut particles, &mut r);
        assert!((p.vel.x - 10.0).abs() < 1e-4);
        // Acceleration does not persist into the next frame
        assert_eq!(p.acc, Vec2::ZERO);
        let vx = p.vel.x;
        p.integrate(0.1, 0.0, &mut map, &mut particles, &mut r);
        assert!((p.vel.x - vx).abs() < 1e-4);
    }

    #[test]
    fn left_wall_bounce_damps_and_reverses() {
        let mut r = rng();
        let mut map = open_map(&mut r);
        // Wall behind the player
        for y in 1..39 {
            map.set(19, y, Tile::Block);
        }
        let mut particles = ParticlePool::new();
        let mut p = Player::new(20.3, 20.5);
        p.star_time = 0.0;
        p.vel.x = 20.0;
        let earned = p.integrate(0.0, 0.0, &mut map, &mut particles, &mut r);
        assert!(p.contacts.contains(Contacts::LEFT));
        assert!(p.vel.x < 0.0);
        assert!((p.vel.x + 2.0).abs() < 0.1);
        // |20| > 15: the hard-impact tier-3 blast cleared the wall cells
        assert_eq!(map.get(19, 20), Tile::Empty);
        assert!(earned > 0);
        // Glitch burst fired
        assert!(particles.len() >= 40);
    }

    #[test]
    fn soft_bounce_uses_tier_one() {
        let mut r = rng();
        let mut map = open_map(&mut r);
        for x in 0..80 {
            map.set(x, 22, Tile::Block);
        }
        // Fill a wide band so we can tell tier 1 (radius 1) from tier 3
        for x in 0..80 {
            map.set(x, 23, Tile::Block);
            map.set(x, 24, Tile::Block);
        }
        let mut particles = ParticlePool::new();
        let mut p = Player::new(40.5, 21.6);
        p.star_time = 0.0;
        p.vel.y = 2.0;
        p.integrate(0.0, 0.0, &mut map, &mut particles, &mut r);
        assert!(p.contacts.contains(Contacts::TOP));
        assert!(p.vel.y < 0.0);
        // Tier 1 clears the 3x3 but a tier-3 cell three out survives
        assert_eq!(map.get(40, 22), Tile::Empty);
        assert_eq!(map.get(40, 24), Tile::Block);
    }

    #[test]
    fn star_mode_suppresses_bouncing() {
        let mut r = rng();
        let mut map = open_map(&mut r);
        for y in 1..39 {
            map.set(19, y, Tile::Block);
        }
        let mut particles = ParticlePool::new();
        let mut p = Player::new(20.3, 20.5);
        p.star_time = 5.0;
        p.vel.x = 20.0;
        p.integrate(0.01, 0.0, &mut map, &mut particles, &mut r);
        // No reversal while the star is active
        assert!(p.vel.x > 0.0);
    }

    #[test]
    fn star_expiry_clamps_timer_and_warp() {
        let mut r = rng();
        let mut map = open_map(&mut r);
        let mut particles = ParticlePool::new();
        let mut p = Player::new(40.0, 20.0);
        p.star_time = 0.005;
        p.integrate(0.01, 0.0, &mut map, &mut particles, &mut r);
        assert_eq!(p.star_time, 0.0);
        assert_eq!(p.star_warp, 0.0);
    }

    #[test]
    fn star_flight_is_clamped_off_the_lava_bands() {
        let mut r = rng();
        let mut map = open_map(&mut r);
        let mut particles = ParticlePool::new();
        let mut p = Player::new(40.0, 1.5);
        p.star_time = 5.0;
        p.integrate(0.01, 0.0, &mut map, &mut particles, &mut r);
        assert!(p.vel.y > 0.0);
        assert!(p.pos.y > 1.5);
    }

    #[test]
    fn reset_restores_spawn_defaults() {
        let mut p = Player::new(PLAYER_SPAWN_X, PLAYER_SPAWN_Y);
        p.pos = Vec2::new(100.0, 3.0);
        p.vel = Vec2::new(9.0, -4.0);
        p.grenades = 0;
        p.star_time = 0.0;
        p.flip_gravity();
        assert!(p.gravity_flipped);
        p.reset();
        assert_eq!(p.pos, Vec2::new(PLAYER_SPAWN_X, PLAYER_SPAWN_Y));
        assert_eq!(p.vel, Vec2::ZERO);
        assert_eq!(p.grenades, 10);
        assert_eq!(p.star_time, STAR_DURATION);
        assert!(!p.gravity_flipped);
    }
}
