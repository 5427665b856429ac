//! Render-facing output surface
//!
//! The simulation never talks to a graphics API. Each frame the embedding
//! driver asks for a [`Scene`]: a flat list of colored boxes (screen-space
//! tiles, entities and particles) plus a HUD snapshot. What happens to it
//! afterwards (vertex submission, text drawing) is the driver's problem.

use glam::Vec2;
use rand::Rng;

use crate::sim::{ItemKind, Phase, World};
use crate::sim::tilemap::Tile;

/// One axis-aligned colored box. `depth`/`base` are the visual layer's top
/// and bottom; the driver may flatten them for a pure 2D presentation.
#[derive(Debug, Clone, Copy)]
pub struct Quad {
    pub min: Vec2,
    pub max: Vec2,
    pub depth: f32,
    pub base: f32,
    pub color: [u8; 4],
}

impl Quad {
    fn new(x1: f32, y1: f32, x2: f32, y2: f32, depth: f32, base: f32, color: [u8; 4]) -> Self {
        Self {
            min: Vec2::new(x1, y1),
            max: Vec2::new(x2, y2),
            depth,
            base,
            color,
        }
    }
}

/// Text overlay snapshot
#[derive(Debug, Clone, Copy, Default)]
pub struct Hud {
    pub score: u64,
    pub last_score: u64,
    pub best_score: u64,
    pub grenades: u32,
    pub missiles: u32,
    pub cluster_grenades: u32,
    /// Whole seconds left on the countdown, if the run is not live yet
    pub countdown: Option<u32>,
}

#[derive(Default)]
pub struct Scene {
    pub quads: Vec<Quad>,
    pub hud: Hud,
}

impl Scene {
    /// Snapshot the world into draw data. Takes `&mut World` because the
    /// lava shimmer draws from the world RNG; it mutates nothing else.
    pub fn build(world: &mut World) -> Self {
        let mut scene = Scene {
            quads: Vec::with_capacity(4096),
            hud: Hud {
                score: world.score,
                last_score: world.last_score,
                best_score: world.best_score,
                grenades: world.player.grenades,
                missiles: world.player.missiles,
                cluster_grenades: world.player.cluster_grenades,
                countdown: match world.phase {
                    Phase::Startup if world.delay > 2.0 => Some(world.delay as u32 - 1),
                    _ => None,
                },
            },
        };
        scene.push_map(world);
        scene.push_lava(world);
        scene.push_player(world);
        scene.push_items(world);
        scene.push_particles(world);
        scene
    }

    fn push_map(&mut self, world: &World) {
        let warp = world.map_warp;
        let px = world.player.pos.x;
        for y in 1..world.map.height() - 1 {
            for x in 0..world.map.width() {
                let (fx, fy) = (x as f32, y as f32);
                if world.map.get(x, y) == Tile::Block {
                    // Blocks dim with horizontal distance from the player
                    let alpha = 255.0 - 150.0 * ((fx - px).abs() / 100.0);
                    self.quads.push(Quad::new(
                        fx + 0.05 - warp,
                        fy + 0.05,
                        fx + 0.95 - warp,
                        fy + 0.95,
                        1.0,
                        -0.1,
                        [120, 50, 210, alpha.clamp(0.0, 255.0) as u8],
                    ));
                } else {
                    // Empty cells carry a faint floor glow: red near the
                    // deadly left edge, fading to purple further in
                    let color = if x < 10 {
                        [255, 0, 0, 80]
                    } else if x < 30 {
                        let t = (fx - 10.0) / 20.0;
                        [
                            (255.0 - 105.0 * t) as u8,
                            0,
                            (60.0 + 195.0 * t) as u8,
                            (80.0 - 40.0 * t) as u8,
                        ]
                    } else {
                        [150, 0, 255, 40]
                    };
                    self.quads.push(Quad::new(
                        fx + 0.1 - warp,
                        fy + 0.1,
                        fx + 0.9 - warp,
                        fy + 0.9,
                        0.0,
                        -0.05,
                        color,
                    ));
                }
            }
        }
    }

    /// Shimmering lava curtains above and below the corridor
    fn push_lava(&mut self, world: &mut World) {
        let warp = world.map_warp;
        let h = world.map.height() as f32;
        for x in 0..160 {
            for y in 0..20 {
                let (fx, fy) = (x as f32, y as f32);
                let rng = &mut world.rng;
                let alpha = rng.random_range(150.0..190.0) * ((20.0 - fy) / 20.0);
                let color = [
                    rng.random_range(205..255),
                    rng.random_range(0..20),
                    rng.random_range(10..50),
                    alpha as u8,
                ];
                self.quads
                    .push(Quad::new(fx - warp, -fy, fx + 1.0 - warp, 1.0 - fy, 0.5, 0.0, color));
                self.quads.push(Quad::new(
                    fx - warp,
                    h - 1.0 + fy,
                    fx + 1.0 - warp,
                    h + fy,
                    0.5,
                    0.0,
                    color,
                ));
            }
        }
    }

    /// The craft is a three-quad cross
    fn push_player(&mut self, world: &World) {
        let p = world.player.pos;
        const BODY: [u8; 4] = [255, 0, 200, 255];
        self.quads
            .push(Quad::new(p.x - 0.3, p.y - 0.55, p.x + 0.3, p.y - 0.3, 0.4, 0.2, BODY));
        self.quads
            .push(Quad::new(p.x - 0.55, p.y - 0.3, p.x + 0.55, p.y + 0.3, 0.6, 0.2, BODY));
        self.quads
            .push(Quad::new(p.x - 0.3, p.y + 0.3, p.x + 0.3, p.y + 0.55, 0.4, 0.2, BODY));
    }

    fn push_items(&mut self, world: &World) {
        for item in world.items.iter().filter(|i| i.active) {
            let (x, y) = (item.pos.x, item.pos.y);
            let quad = match item.kind {
                ItemKind::Grenade => {
                    Quad::new(x - 0.25, y - 0.25, x + 0.25, y + 0.25, 0.6, 0.3, [255, 255, 100, 255])
                }
                ItemKind::GrenadePack => {
                    Quad::new(x + 0.25, y + 0.25, x + 0.75, y + 0.75, 0.6, 0.3, [255, 255, 100, 255])
                }
                ItemKind::ClusterGrenade | ItemKind::ClusterChild => {
                    Quad::new(x - 0.25, y - 0.25, x + 0.25, y + 0.25, 0.6, 0.3, [100, 255, 0, 255])
                }
                ItemKind::ClusterGrenadePack => {
                    Quad::new(x + 0.25, y + 0.25, x + 0.75, y + 0.75, 0.6, 0.3, [100, 255, 0, 255])
                }
                ItemKind::Missile => {
                    Quad::new(x - 1.0, y - 0.15, x + 0.25, y + 0.15, 0.6, 0.3, [255, 0, 0, 255])
                }
                ItemKind::MissilePack => {
                    Quad::new(x + 0.25, y + 0.25, x + 0.75, y + 0.75, 0.6, 0.3, [255, 0, 0, 255])
                }
                ItemKind::Star => {
                    Quad::new(x + 0.35, y + 0.35, x + 0.65, y + 0.65, 0.6, 0.3, [255, 255, 255, 100])
                }
            };
            self.quads.push(quad);
        }
    }

    fn push_particles(&mut self, world: &World) {
        for p in world.particles.iter().filter(|p| !p.waiting()) {
            let [r, g, b] = p.color;
            let alpha = (255.0 * p.rendered_alpha()) as u8;
            self.quads.push(Quad::new(
                p.pos.x - p.radius,
                p.pos.y - p.radius,
                p.pos.x + p.radius,
                p.pos.y + p.radius,
                p.depth + 0.15,
                p.depth,
                [r, g, b, alpha],
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{MAP_HEIGHT, MAP_WIDTH};

    #[test]
    fn scene_covers_every_interior_tile() {
        let mut w = World::new(17);
        let scene = Scene::build(&mut w);
        let interior = (MAP_WIDTH * (MAP_HEIGHT - 2)) as usize;
        let lava = 160 * 20 * 2;
        // tiles + lava curtains + 3 player quads, plus any particles/items
        assert!(scene.quads.len() >= interior + lava + 3);
    }

    #[test]
    fn hud_mirrors_the_ledger() {
        let mut w = World::new(17);
        w.score = 42;
        w.last_score = 7;
        w.best_score = 9000;
        w.player.missiles = 3;
        let scene = Scene::build(&mut w);
        assert_eq!(scene.hud.score, 42);
        assert_eq!(scene.hud.last_score, 7);
        assert_eq!(scene.hud.best_score, 9000);
        assert_eq!(scene.hud.missiles, 3);
        // Fresh world is still counting down
        assert_eq!(scene.hud.countdown, Some(4));
    }

    #[test]
    fn waiting_particles_are_not_drawn() {
        let mut w = World::new(17);
        let before = Scene::build(&mut w).quads.len();
        w.particles.spawn(crate::sim::Particle::new(
            glam::Vec2::new(10.0, 10.0),
            glam::Vec2::ZERO,
            glam::Vec2::ZERO,
            0.0,
            0.0,
            0.2,
            1.0,
            5.0,
            [255, 255, 255],
            1.0,
        ));
        let after = Scene::build(&mut w).quads.len();
        assert_eq!(before, after);
    }
}
