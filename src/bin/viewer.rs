//! Interactive viewer: click faces to focus them, `P` plays the tour, `H`
//! resets, `Esc` stops a tour or quits.
//!
//! This is a host skeleton. The window carries input and the title shows the
//! current selection, but nothing is drawn; a renderer would read block
//! scales, face opacities and the camera from the `on_frame` callback below.
//! Run with `RUST_LOG=debug` to see that per-frame state.

use facet_focus::prelude::*;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let scene = Scene::block_grid(4, 3, 2.2)?;
    let mut app = FocusApp::new(scene, EngineConfig::default())?;
    app.engine_mut()
        .on_guided_mode_changed(|guided| log::info!("Guided mode: {}", guided));
    app.engine_mut().on_selection_changed(|state, transition| {
        log::info!("{:?} -> {:?}", transition, state.selected());
    });

    app.on_frame(|engine, report| {
        if report.intro_finished {
            log::info!("Intro finished after {} frames", report.frame);
        }
        if let Some(done) = report.camera_finished {
            log::info!("Camera settled at {:?}", done.pose);
        }
        if report.retired_opacity + report.retired_scale > 0 {
            let scene = engine.scene();
            let emphasized: Vec<&str> = scene
                .faces
                .iter()
                .filter(|face| face.emphasis)
                .map(|face| face.name.as_str())
                .collect();
            log::debug!(
                "Frame {}: {} tweens live, emphasized {:?}",
                report.frame,
                engine.registry().active_count(),
                emphasized
            );
        }
    });

    app.run()
}
