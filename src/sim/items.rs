//! Game items: projectiles, pickups and the star power-up
//!
//! Each active item is updated once per frame: shifted with the world
//! scroll, collision-sampled, then advanced by its kind-specific rule. The
//! match on [`ItemKind`] keeps the rules exhaustive at compile time.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::blast::blast;
use super::collision::{Contacts, probe};
use super::particles::ParticlePool;
use super::tilemap::Tilemap;
use crate::consts::{DETONATE_X, ITEM_RADIUS};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    Star,
    Grenade,
    GrenadePack,
    ClusterGrenade,
    ClusterChild,
    ClusterGrenadePack,
    Missile,
    MissilePack,
}

/// Velocity fan for the five cluster children, front-loaded rightward.
/// A fixed 5-point fan, not random.
pub const CLUSTER_FAN: [Vec2; 5] = [
    Vec2::new(15.0, 15.0),
    Vec2::new(25.0, 15.0),
    Vec2::new(40.0, 0.0),
    Vec2::new(25.0, -15.0),
    Vec2::new(15.0, -15.0),
];

/// Per-frame gain of the missile's internal velocity accumulator
const MISSILE_ACCEL: f32 = 20.0;

/// Leftward drift of a star power-up
const STAR_DRIFT: f32 = 10.0;

#[derive(Debug, Clone, Copy)]
pub struct Item {
    pub pos: Vec2,
    pub vel: Vec2,
    pub acc: Vec2,
    /// Launch velocity inherited from the shooter; floored at 0 in flight
    pub init_vel: f32,
    pub radius: f32,
    pub kind: ItemKind,
    pub active: bool,
}

impl Item {
    pub fn new(x: f32, y: f32, init_vel: f32, radius: f32, kind: ItemKind) -> Self {
        Self {
            pos: Vec2::new(x, y),
            vel: Vec2::ZERO,
            acc: Vec2::ZERO,
            init_vel,
            radius,
            kind,
            active: true,
        }
    }
}

/// Weighted ammo pack dropped by a spawner tile:
/// 70% grenades, 20% missiles, 10% cluster grenades.
pub fn random_collectable(rng: &mut Pcg32, x: f32, y: f32) -> Item {
    let kind = match rng.random_range(0..100) {
        0..70 => ItemKind::GrenadePack,
        70..90 => ItemKind::MissilePack,
        _ => ItemKind::ClusterGrenadePack,
    };
    Item::new(x, y, 0.0, ITEM_RADIUS, kind)
}

pub fn random_power_up(x: f32, y: f32) -> Item {
    Item::new(x, y, 1.0, ITEM_RADIUS, ItemKind::Star)
}

/// Shared world slices an item update may touch. Spawned children go into
/// `spawned` and are appended to the pool by the caller.
pub struct ItemCtx<'a> {
    pub map: &'a mut Tilemap,
    pub particles: &'a mut ParticlePool,
    pub rng: &'a mut Pcg32,
    pub pending_score: &'a mut u32,
    pub spawned: &'a mut Vec<Item>,
}

/// Advance one item by one frame. `offset` is the world scroll distance this
/// frame; items ride the terrain like everything else.
pub fn update_item(item: &mut Item, dt: f32, offset: f32, ctx: &mut ItemCtx) {
    item.pos.x -= offset;
    let contacts = probe(ctx.map, item.pos, item.radius * 2.0, offset);
    // Projectiles fly rightward; a wall behind them never detonates them
    let blocked = contacts.intersects(Contacts::RIGHT | Contacts::TOP | Contacts::BOTTOM);

    match item.kind {
        ItemKind::Grenade => {
            if !blocked && item.pos.x < DETONATE_X {
                item.init_vel = item.init_vel.max(0.0);
                item.pos.x += (item.init_vel + 50.0) * dt;
            } else {
                detonate(item, 3, ctx);
            }
        }
        ItemKind::ClusterGrenade => {
            if !blocked && item.pos.x < DETONATE_X {
                item.init_vel = item.init_vel.max(0.0);
                item.pos.x += (item.init_vel + 50.0) * dt;
            } else {
                detonate(item, 4, ctx);
                for vel in CLUSTER_FAN {
                    let mut child =
                        Item::new(item.pos.x, item.pos.y, 0.0, ITEM_RADIUS, ItemKind::ClusterChild);
                    child.vel = vel;
                    ctx.spawned.push(child);
                }
            }
        }
        ItemKind::ClusterChild => {
            if !blocked {
                item.pos += item.vel * dt;
            } else {
                detonate(item, 4, ctx);
            }
        }
        ItemKind::Missile => {
            item.acc.x += MISSILE_ACCEL;
            item.vel.x += item.acc.x * dt;
            if !blocked && item.pos.x < DETONATE_X {
                item.init_vel = item.init_vel.max(0.0);
                item.pos.x += (item.init_vel + 20.0 + item.vel.x) * dt;
            } else {
                detonate(item, 4, ctx);
            }
            // Exhaust burns whether or not the motor still matters
            ctx.particles.thrust(
                ctx.rng,
                Vec2::new(item.pos.x - 1.0, item.pos.y),
                -0.1,
                10.0,
                0.2,
                1.0,
                0.0,
            );
        }
        ItemKind::Star => {
            item.pos.x -= STAR_DRIFT * dt;
            ctx.particles.star_trail(ctx.rng, item.pos.x, item.pos.y);
        }
        // Packs sit still and only interact via pickup
        ItemKind::GrenadePack | ItemKind::ClusterGrenadePack | ItemKind::MissilePack => {}
    }
}

fn detonate(item: &mut Item, tier: u32, ctx: &mut ItemCtx) {
    *ctx.pending_score += blast(
        tier,
        item.pos.x as i32,
        item.pos.y as i32,
        ctx.map,
        ctx.particles,
        ctx.rng,
    );
    item.active = false;
}
