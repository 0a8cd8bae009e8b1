//! Optional TOML settings overriding the playfield, physics and tick rate.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use propeller_core::{Playfield, TICKS_PER_SECOND};
use propeller_simulation::SimulationConfig;
use serde::Deserialize;

/// Screen geometry as written in the settings file.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub(crate) struct PlayfieldSettings {
    pub(crate) width: u32,
    pub(crate) height: u32,
    pub(crate) cell_size: u32,
    pub(crate) top_boundary: u32,
    pub(crate) left_boundary: u32,
}

impl Default for PlayfieldSettings {
    fn default() -> Self {
        let playfield = Playfield::default();
        Self {
            width: playfield.width(),
            height: playfield.height(),
            cell_size: playfield.cell_size(),
            top_boundary: playfield.top_boundary(),
            left_boundary: playfield.left_boundary(),
        }
    }
}

/// Everything the settings file may override.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct Settings {
    pub(crate) playfield: PlayfieldSettings,
    pub(crate) simulation: SimulationConfig,
    pub(crate) tick_rate: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            playfield: PlayfieldSettings::default(),
            simulation: SimulationConfig::default(),
            tick_rate: TICKS_PER_SECOND,
        }
    }
}

impl Settings {
    /// Reads settings from a TOML file.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read settings at {}", path.display()))?;
        Self::parse(&contents)
            .with_context(|| format!("failed to parse settings at {}", path.display()))
    }

    fn parse(contents: &str) -> Result<Self> {
        let settings: Self = toml::from_str(contents)?;
        anyhow::ensure!(settings.tick_rate > 0, "tick_rate must be positive");
        Ok(settings)
    }

    /// Validated playfield geometry.
    pub(crate) fn playfield(&self) -> Result<Playfield> {
        let PlayfieldSettings {
            width,
            height,
            cell_size,
            top_boundary,
            left_boundary,
        } = self.playfield;
        Playfield::new(width, height, cell_size, top_boundary, left_boundary)
            .context("invalid [playfield] settings")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_keeps_defaults() {
        let settings = Settings::parse("").expect("empty settings parse");
        assert_eq!(settings, Settings::default());
        assert_eq!(
            settings.playfield().expect("default playfield is valid"),
            Playfield::default()
        );
    }

    #[test]
    fn sections_override_individual_fields() {
        let settings = Settings::parse(
            r#"
            tick_rate = 30

            [playfield]
            cell_size = 32

            [simulation]
            gravity = 0.5
            oriented_spike_hitbox = true
            "#,
        )
        .expect("settings parse");

        assert_eq!(settings.tick_rate, 30);
        assert_eq!(settings.playfield.cell_size, 32);
        assert_eq!(settings.playfield.width, 1024);
        assert_eq!(settings.simulation.gravity, 0.5);
        assert!(settings.simulation.oriented_spike_hitbox);
        assert_eq!(
            settings.simulation.jump_speed,
            SimulationConfig::default().jump_speed
        );
    }

    #[test]
    fn rejects_unusable_values() {
        assert!(Settings::parse("tick_rate = 0").is_err());
        assert!(Settings::parse("unknown = 1").is_err());

        let settings = Settings::parse("[playfield]\ncell_size = 0").expect("syntax is fine");
        assert!(settings.playfield().is_err());
    }
}
