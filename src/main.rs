//! Blastway headless demo driver
//!
//! Runs the simulation at the fixed timestep with a trivial autopilot and
//! logs the run ledger. Real presentation (window, input, drawing) belongs
//! to an embedding frontend; this binary exists to exercise the core and
//! as a reference for wiring one up.
//!
//! Usage: `blastway [seed] [tuning.json]`

use std::error::Error;
use std::fs;

use blastway::consts::SIM_DT;
use blastway::{Scene, TickInput, Tuning, World, tick};

fn load_tuning(path: &str) -> Result<Tuning, Box<dyn Error>> {
    let text = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let seed = args
        .next()
        .and_then(|s| s.parse().ok())
        .unwrap_or(0xb1a57);
    let tuning = match args.next() {
        Some(path) => match load_tuning(&path) {
            Ok(t) => {
                log::info!("loaded tuning from {path}");
                t
            }
            Err(err) => {
                log::warn!("failed to load tuning from {path}: {err}; using defaults");
                Tuning::default()
            }
        },
        None => Tuning::default(),
    };

    log::info!("blastway starting, seed {seed}");
    let mut world = World::with_tuning(seed, tuning);

    // Sixty simulated seconds of a very simple autopilot: hold forward,
    // steer off the lava bands, lob a grenade now and then
    let frames = (60.0 / SIM_DT) as u32;
    for frame in 0..frames {
        let input = TickInput {
            forward: true,
            up: world.player.pos.y > 30.0,
            down: world.player.pos.y < 10.0,
            fire: frame % 90 == 0,
            ..Default::default()
        };
        tick(&mut world, input, SIM_DT);

        if frame % 600 == 0 {
            let scene = Scene::build(&mut world);
            log::debug!(
                "t={:.0}s score={} items={} quads={}",
                frame as f32 * SIM_DT,
                world.score,
                world.items.len(),
                scene.quads.len()
            );
        }
    }

    let final_score = world.score.max(world.last_score);
    log::info!(
        "done: score {final_score}, best {}, high {}",
        world.best_score.max(final_score),
        world.high_score
    );
    println!("SCORE : {final_score}");
}
