//! Headless tour run on a simulated 60 Hz clock.
//!
//! Usage: `tour [seed]`. Logs every camera pose, selection change and cursor
//! move so a recording can be replayed frame-accurately.

use std::time::Duration;

use anyhow::Context;
use facet_focus::prelude::*;
use rand::{rngs::StdRng, SeedableRng};

const FRAME: Duration = Duration::from_nanos(16_666_667);
const SETTLE: Duration = Duration::from_secs(2);

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let seed = match std::env::args().nth(1) {
        Some(arg) => arg.parse::<u64>().with_context(|| format!("invalid seed `{arg}`"))?,
        None => 0,
    };

    let scene = Scene::block_grid(3, 3, 2.0)?;
    let mut engine = FocusEngine::new(scene, EngineConfig::default())?;
    engine.resize(1920, 1080);

    engine.on_camera_pose_changed(|pose| {
        log::info!(
            "Camera settled: azimuth {:.3} polar {:.3} distance {:.2} fov {:.3}",
            pose.azimuth,
            pose.polar,
            pose.distance,
            pose.fov
        );
    });
    engine.on_selection_changed(|state, transition| {
        log::info!("Selection {:?} after {:?}", state.selected(), transition);
    });
    engine.on_cursor_moved(|at| log::info!("Cursor at ({:.0}, {:.0})", at.x, at.y));

    let mut rng = StdRng::seed_from_u64(seed);
    let script = Script::tour(engine.scene(), &mut rng).context("scene has no tourable block")?;
    let budget = script.paused_duration() + SETTLE;
    let handle = engine.run_script(script);

    let mut now = Duration::ZERO;
    while !handle.is_finished() || !engine.registry().is_idle() {
        engine.tick(now);
        now += FRAME;
        if now > budget + SETTLE {
            anyhow::bail!("tour did not settle within {:?}", budget + SETTLE);
        }
    }

    log::info!("Tour finished after {} frames ({:?})", engine.frame(), now);
    Ok(())
}
