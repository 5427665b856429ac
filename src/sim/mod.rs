//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Frame-synchronous, single-threaded updates only
//! - Seeded RNG only (one `Pcg32` owned by the [`World`])
//! - No rendering or platform dependencies

pub mod blast;
pub mod collision;
pub mod items;
pub mod particles;
pub mod player;
pub mod state;
pub mod tick;
pub mod tilemap;

pub use blast::{blast, blast_cells};
pub use collision::{Contacts, probe};
pub use items::{Item, ItemKind, random_collectable, random_power_up};
pub use particles::{Particle, ParticlePool};
pub use player::Player;
pub use state::{Phase, World};
pub use tick::{TickInput, tick};
pub use tilemap::{Tile, Tilemap};
