//! Terrain destruction
//!
//! Four blast tiers, each a hand-enumerated neighbourhood around the impact
//! cell. The shapes are not clean circles: tier N is tier N-1 plus one more
//! outer ring, and the rings are kept cell-for-cell as tuned (gameplay
//! balance depends on the exact sets, so they are tables, not formulas).

use rand::Rng;
use rand_pcg::Pcg32;

use super::particles::ParticlePool;
use super::tilemap::{Tile, Tilemap};
use crate::consts::BLOCK_SCORE;

/// Chance of a cosmetic melt ember per candidate cell
const MELT_CHANCE: f32 = 0.8;

/// Tier 1: the full 3x3 around the center
const RING_1: &[(i32, i32)] = &[
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 0),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

const RING_2: &[(i32, i32)] = &[
    (-2, -1),
    (-2, 0),
    (-2, 1),
    (-1, -2),
    (-1, 2),
    (0, -2),
    (0, 2),
    (1, -2),
    (1, 2),
    (2, -1),
    (2, 0),
    (2, 1),
];

const RING_3: &[(i32, i32)] = &[
    (-3, -1),
    (-3, 0),
    (-3, 1),
    (-2, -2),
    (-2, 2),
    (-1, -3),
    (-1, 3),
    (0, -3),
    (0, 3),
    (1, -3),
    (1, 3),
    (2, -2),
    (2, 2),
    (3, -1),
    (3, 0),
    (3, 1),
];

/// The outermost ring is wider at the diagonals than ring 3 would suggest;
/// kept exactly as tuned.
const RING_4: &[(i32, i32)] = &[
    (-4, -1),
    (-4, 0),
    (-4, 1),
    (-3, -3),
    (-3, -2),
    (-3, 2),
    (-3, 3),
    (-2, -3),
    (-2, 3),
    (-1, -4),
    (-1, 4),
    (0, -4),
    (0, 4),
    (1, -4),
    (1, 4),
    (2, -3),
    (2, 3),
    (3, -3),
    (3, -2),
    (3, 2),
    (3, 3),
    (4, -1),
    (4, 0),
    (4, 1),
];

const RINGS: [&[(i32, i32)]; 4] = [RING_1, RING_2, RING_3, RING_4];

/// Cell offsets covered by a blast of the given tier (1..=4)
pub fn blast_cells(tier: u32) -> impl Iterator<Item = (i32, i32)> {
    let tier = tier.clamp(1, 4) as usize;
    RINGS[..tier].iter().flat_map(|ring| ring.iter().copied())
}

/// Detonate a tier-N blast centered on cell (cx, cy).
///
/// Every covered cell that is in bounds and currently a Block becomes Empty,
/// emits a debris burst and earns `BLOCK_SCORE`; the total earned is
/// returned for the caller's pending-score accumulator. Every covered cell,
/// hit or not, also rolls for a cosmetic melt ember.
pub fn blast(
    tier: u32,
    cx: i32,
    cy: i32,
    map: &mut Tilemap,
    particles: &mut ParticlePool,
    rng: &mut Pcg32,
) -> u32 {
    let mut earned = 0;
    for (dx, dy) in blast_cells(tier) {
        earned += demolish(cx + dx, cy + dy, map, particles, rng);
    }
    earned
}

/// Clear a single cell if it holds a Block. The writable band excludes the
/// rightmost column and the boundary rows.
fn demolish(
    x: i32,
    y: i32,
    map: &mut Tilemap,
    particles: &mut ParticlePool,
    rng: &mut Pcg32,
) -> u32 {
    let mut earned = 0;
    if x >= 0 && x < map.width() - 1 && y >= 1 && y < map.height() - 1 && map.get(x, y) == Tile::Block
    {
        particles.block_debris(rng, x, y);
        map.set(x, y, Tile::Empty);
        earned = BLOCK_SCORE;
    }
    if rng.random_range(0.0..1.0f32) < MELT_CHANCE {
        particles.melt(rng, x, y);
    }
    earned
}
