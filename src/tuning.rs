//! Data-driven game balance
//!
//! The difficulty policy is an ordered table of thresholds instead of a
//! cascade of conditionals, so it can be tested and tuned independently.
//! Defaults are compiled in; a JSON override can be loaded by the driver.

use serde::{Deserialize, Serialize};

/// Which full-screen flash a speed band plays
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlashKind {
    Red,
    Purple,
    Rainbow,
}

/// Flash effect parameters for a speed band
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FlashSpec {
    pub kind: FlashKind,
    pub amount: u32,
    pub life: f32,
    pub intensity: f32,
}

/// One position-keyed difficulty band: applies while the player's x is
/// below `max_x`. Bands are matched in order, first hit wins.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SpeedBand {
    pub max_x: f32,
    pub speed: f32,
    pub flash: FlashSpec,
}

/// One score-keyed speed multiplier: applies while the score is below
/// `below`. Matched in order, first hit wins; past the last entry
/// `final_factor` applies.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ScoreMultiplier {
    pub below: u64,
    pub factor: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tuning {
    /// Position-keyed speed bands, ascending `max_x`
    pub speed_bands: Vec<SpeedBand>,
    /// Scroll speed past the last band (the terminal sprint)
    pub terminal_speed: f32,
    /// Score awarded per frame while in the terminal sprint
    pub terminal_bonus: u64,
    /// Braking impulse applied during the terminal sprint
    pub terminal_brake: f32,
    /// Chance per frame of a band flash
    pub flash_chance: f32,
    /// Score-keyed speed multipliers, ascending `below`
    pub score_multipliers: Vec<ScoreMultiplier>,
    /// Multiplier once the score is past every table entry
    pub final_factor: f32,
    /// Ammo granted per collected pack
    pub pack_ammo: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            speed_bands: vec![
                SpeedBand {
                    max_x: 50.0,
                    speed: 6.0,
                    flash: FlashSpec {
                        kind: FlashKind::Red,
                        amount: 60,
                        life: 0.5,
                        intensity: 0.5,
                    },
                },
                SpeedBand {
                    max_x: 100.0,
                    speed: 12.0,
                    flash: FlashSpec {
                        kind: FlashKind::Purple,
                        amount: 30,
                        life: 0.5,
                        intensity: 0.3,
                    },
                },
                SpeedBand {
                    max_x: 159.0,
                    speed: 18.0,
                    flash: FlashSpec {
                        kind: FlashKind::Rainbow,
                        amount: 30,
                        life: 0.5,
                        intensity: 0.3,
                    },
                },
            ],
            terminal_speed: 100.0,
            terminal_bonus: 10_000,
            terminal_brake: -10.0,
            flash_chance: 0.02,
            score_multipliers: vec![
                ScoreMultiplier { below: 10_000, factor: 0.7 },
                ScoreMultiplier { below: 50_000, factor: 0.9 },
                ScoreMultiplier { below: 100_000, factor: 1.0 },
                ScoreMultiplier { below: 500_000, factor: 1.25 },
                ScoreMultiplier { below: 1_000_000, factor: 1.5 },
                ScoreMultiplier { below: 5_000_000, factor: 1.65 },
                ScoreMultiplier { below: 10_000_000, factor: 1.85 },
            ],
            final_factor: 2.0,
            pack_ammo: 5,
        }
    }
}

impl Tuning {
    /// The speed band covering the given x, or None in the terminal sprint
    pub fn band_for(&self, x: f32) -> Option<&SpeedBand> {
        self.speed_bands.iter().find(|band| x < band.max_x)
    }

    /// Speed multiplier for the given score
    pub fn multiplier_for(&self, score: u64) -> f32 {
        self.score_multipliers
            .iter()
            .find(|m| score < m.below)
            .map(|m| m.factor)
            .unwrap_or(self.final_factor)
    }
}
