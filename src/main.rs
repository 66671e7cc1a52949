//! sonitorus - A torus that breathes with the music
//!
//! Bass swells the ring, treble roughens its surface with simplex noise.

use anyhow::Result;
use clap::Parser;

use sonitorus::cli::Args;
use sonitorus::frame_loop::{self, StopFlag};
use sonitorus::host::WindowHost;
use sonitorus::logging::{init_logging, LoggingConfig};
use sonitorus::visualizer::Visualizer;

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(LoggingConfig {
        env_filter: args.log.clone(),
    });

    let settings = args.settings();
    log::info!("sonitorus - audio-reactive torus");
    log::info!("press ESC to quit");

    let stop = StopFlag::new();
    let mut host = WindowHost::new("sonitorus", &settings.render, stop.clone())?;
    let mut visualizer = Visualizer::new(host.window(), &settings)?;

    if !visualizer.is_audio_playing() {
        log::warn!("no audio playing; the torus will not react");
    }

    let frames = frame_loop::run(&mut host, &stop, |tick| {
        visualizer.frame(tick);

        if args
            .duration
            .is_some_and(|limit| tick.elapsed.as_secs_f32() >= limit)
        {
            stop.stop();
        }
    });

    log::info!("stopped after {frames} frames");
    Ok(())
}
