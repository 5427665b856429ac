//! Grid collision sampling
//!
//! Moving entities are tested against the tilemap with four pairs of probe
//! points, one pair per side, inset 0.2 units from the corners so a clipped
//! corner does not flag both axes at once.

use std::ops::{BitOr, BitOrAssign};

use glam::Vec2;

use super::tilemap::{Tile, Tilemap};

/// Bitmask of sides currently in contact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Contacts(u8);

impl Contacts {
    pub const NONE: Self = Self(0);
    pub const TOP: Self = Self(1 << 0);
    pub const BOTTOM: Self = Self(1 << 1);
    pub const LEFT: Self = Self(1 << 2);
    pub const RIGHT: Self = Self(1 << 3);

    pub fn contains(self, side: Self) -> bool {
        self.0 & side.0 == side.0
    }

    pub fn intersects(self, sides: Self) -> bool {
        self.0 & sides.0 != 0
    }

    /// Touching the floor or ceiling
    pub fn vertical(self) -> bool {
        self.intersects(Self::TOP | Self::BOTTOM)
    }

    /// Touching a wall ahead or behind
    pub fn horizontal(self) -> bool {
        self.intersects(Self::LEFT | Self::RIGHT)
    }
}

impl BitOr for Contacts {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for Contacts {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

/// Corner inset that keeps diagonal probes off neighbouring cells
const PROBE_INSET: f32 = 0.2;

/// Sample the map around `pos` with probe radius `r`.
///
/// `offset` is the horizontal scroll distance applied to the world this
/// frame; it is subtracted from x first so entities that were just shifted
/// test against the cells they actually occupy. Pure: the map is never
/// mutated.
///
/// Top/Bottom share an else-if (as do Left/Right), so at most one flag per
/// axis comes from the probes; the out-of-bounds checks can still add the
/// opposite side.
pub fn probe(map: &Tilemap, pos: Vec2, r: f32, offset: f32) -> Contacts {
    let pos = Vec2::new(pos.x - offset, pos.y);
    let mut contacts = Contacts::NONE;

    if (pos.x.floor() as i32) < 0 {
        contacts |= Contacts::LEFT;
    }
    if (pos.y.floor() as i32) < 0 {
        contacts |= Contacts::TOP;
    }
    if pos.x.floor() as i32 >= map.width() {
        contacts |= Contacts::RIGHT;
    }
    if pos.y.floor() as i32 >= map.height() {
        contacts |= Contacts::BOTTOM;
    }

    let solid = |dx: f32, dy: f32| map.get((pos.x + dx) as i32, (pos.y + dy) as i32) != Tile::Empty;

    if solid(r - PROBE_INSET, r) || solid(-r + PROBE_INSET, r) {
        contacts |= Contacts::TOP;
    } else if solid(r - PROBE_INSET, -r) || solid(-r + PROBE_INSET, -r) {
        contacts |= Contacts::BOTTOM;
    }
    if solid(-r, r - PROBE_INSET) || solid(-r, -r + PROBE_INSET) {
        contacts |= Contacts::LEFT;
    } else if solid(r, r - PROBE_INSET) || solid(r, -r + PROBE_INSET) {
        contacts |= Contacts::RIGHT;
    }

    contacts
}
