use bevy::prelude::*;
use std::env;

use heliflight::{plugins::build_headless_app, SimulationConfig};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = match env::args().nth(1) {
        Some(path) => SimulationConfig::load(&path)?,
        None => SimulationConfig::default(),
    };
    config.validate()?;

    match build_headless_app(config).run() {
        AppExit::Success => Ok(()),
        AppExit::Error(code) => Err(format!("simulation exited with code {}", code).into()),
    }
}
