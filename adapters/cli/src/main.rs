#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that boots the Propeller level editor.

mod app;
mod collision;
mod fixed_step;
mod level_file;
mod level_transfer;
mod settings;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use propeller_core::Command;
use propeller_rendering::{Presentation, RenderingBackend};
use propeller_rendering_macroquad::MacroquadBackend;
use propeller_world::{query, World, WorldConfig};

use crate::{
    app::{App, AppOptions},
    level_file::{read_level, with_level_extension},
    settings::Settings,
};

/// Level editor and platformer built around a propeller-powered hero.
#[derive(Debug, Parser)]
#[command(name = "propeller", version, about)]
struct CliArgs {
    /// Level file loaded at start-up and used by the save and load buttons.
    #[arg(long, value_name = "PATH")]
    level: Option<PathBuf>,
    /// TOML file overriding the playfield, physics and tick rate.
    #[arg(long, value_name = "PATH")]
    settings: Option<PathBuf>,
    /// Seed for the patrol direction generator.
    #[arg(long, value_name = "SEED")]
    seed: Option<u64>,
    /// Draw grid lines from the first frame.
    #[arg(long)]
    show_grid: bool,
    /// Share string to load instead of the level file.
    #[arg(long, value_name = "STRING")]
    import: Option<String>,
    /// Print the loaded level as a share string and exit.
    #[arg(long)]
    export: bool,
    /// Sprite manifest to load instead of `assets/manifest.toml`.
    #[arg(long, value_name = "PATH")]
    sprites: Option<PathBuf>,
    /// Disable vertical sync.
    #[arg(long)]
    no_vsync: bool,
}

/// Installs the logger, honouring `RUST_LOG` and defaulting to `info`.
fn init_logging() {
    let env = env_logger::Env::default().default_filter_or("info");
    let _ = env_logger::Builder::from_env(env).try_init();
}

/// Entry point for the Propeller command-line interface.
fn main() -> Result<()> {
    init_logging();
    let args = CliArgs::parse();

    let settings = match &args.settings {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };
    let mut config = WorldConfig {
        playfield: settings.playfield()?,
        simulation: settings.simulation.clone(),
        masks: collision::load_masks(args.sprites.as_deref())?,
        ..WorldConfig::default()
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }

    let level_path = args.level.clone().map(with_level_extension);
    let mut app = App::new(
        World::with_config(config),
        AppOptions {
            tick_rate: settings.tick_rate,
            show_grid: args.show_grid,
            level_path: level_path.clone(),
        },
    );
    info!("{}", query::welcome_banner(app.world()));

    if let Some(share) = &args.import {
        let snapshot = level_transfer::decode(share).context("failed to import level")?;
        app.submit(Command::LoadLevel { snapshot });
    } else if let Some(path) = level_path.as_deref().filter(|path| path.exists()) {
        let snapshot = read_level(path)?;
        app.submit(Command::LoadLevel { snapshot });
    }

    if args.export {
        let share = level_transfer::encode(&query::level_snapshot(app.world()))
            .context("failed to export level")?;
        println!("{share}");
        return Ok(());
    }

    let mut backend = MacroquadBackend::new().with_vsync(!args.no_vsync);
    if let Some(manifest) = args.sprites {
        backend = backend.with_sprite_manifest(manifest);
    }

    let presentation = Presentation::new("Propeller", app.initial_scene());
    backend.run(presentation, move |frame_time, input, scene| {
        app.frame(frame_time, input, scene);
    })
}
