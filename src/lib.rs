//! Blastway - a side-scrolling destructible-corridor arcade game core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (tilemap, blasts, items, particles, player)
//! - `scene`: Render-facing output surface (colored quads + HUD snapshot)
//! - `tuning`: Data-driven game balance
//!
//! Windowing, input polling and drawing are left to the embedding frame
//! driver; the crate only consumes per-frame input flags and produces a
//! `Scene` to draw.

pub mod scene;
pub mod sim;
pub mod tuning;

pub use scene::{Hud, Quad, Scene};
pub use sim::{Contacts, Item, ItemKind, Particle, Phase, Player, Tile, Tilemap, World};
pub use sim::{TickInput, tick};
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep for headless/driver use (120 Hz)
    pub const SIM_DT: f32 = 1.0 / 120.0;

    /// Corridor dimensions in tiles
    pub const MAP_WIDTH: i32 = 80;
    pub const MAP_HEIGHT: i32 = 40;

    /// Player spawn point
    pub const PLAYER_SPAWN_X: f32 = 5.0;
    pub const PLAYER_SPAWN_Y: f32 = 20.0;

    /// Countdown before a run goes live
    pub const STARTUP_DELAY: f32 = 5.0;

    /// Compiled-in high score to beat (no persistence)
    pub const DEFAULT_HIGH_SCORE: u64 = 3_178_705;

    /// Score credited per destroyed block
    pub const BLOCK_SCORE: u32 = 100;

    /// Thrust impulse applied per held direction key
    pub const THRUST: f32 = 100.0;

    /// Collision radius of fired projectiles and spawned packs
    pub const ITEM_RADIUS: f32 = 0.25;

    /// Projectiles detonate past this x even without a collision
    pub const DETONATE_X: f32 = 210.0;

    /// Items outside this rectangle are culled
    pub const CULL_X_MIN: f32 = -10.0;
    pub const CULL_X_MAX: f32 = 160.0;
    pub const CULL_Y_MIN: f32 = -10.0;
    pub const CULL_Y_MAX: f32 = 50.0;

    /// Duration of the star power-up
    pub const STAR_DURATION: f32 = 10.0;
}
