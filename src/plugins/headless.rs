use bevy::{
    app::ScheduleRunnerPlugin,
    log::{Level, LogPlugin},
    prelude::*,
};
use std::time::Duration;

use super::HeliflightPlugin;
use crate::resources::SimulationConfig;

/// Frame rate of the headless runner.
pub const HEADLESS_FRAME_RATE: f64 = 60.0;

/// Builds a windowless app that ticks the simulation at [`HEADLESS_FRAME_RATE`].
pub fn build_headless_app(config: SimulationConfig) -> App {
    let mut app = App::new();
    app.add_plugins(
        MinimalPlugins.set(ScheduleRunnerPlugin::run_loop(Duration::from_secs_f64(
            1.0 / HEADLESS_FRAME_RATE,
        ))),
    )
    .add_plugins(LogPlugin {
        level: Level::INFO,
        filter: "heliflight=info".to_string(),
        ..Default::default()
    })
    .add_plugins(HeliflightPlugin::new(config));
    app
}
