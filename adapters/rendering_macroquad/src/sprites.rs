use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context, Result};
use macroquad::{
    math::Vec2 as MacroquadVec2,
    texture::{self, DrawTextureParams, Image, Texture2D},
};
use propeller_rendering::{Color, SceneSprite, SpriteKey};

use crate::{to_macroquad_color, ViewportMetrics};

const SUPPORTED_MANIFEST_VERSION: u32 = 1;

/// Sprite manifest used when no other manifest is requested.
pub const DEFAULT_SPRITE_MANIFEST: &str = "assets/manifest.toml";

/// Decoded RGBA pixels of a sprite image.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SpritePixels {
    /// Image width in pixels.
    pub width: u16,
    /// Image height in pixels.
    pub height: u16,
    /// Row-major RGBA samples, four bytes per pixel.
    pub rgba: Vec<u8>,
}

/// Decodes every image listed in a sprite manifest without opening a window.
pub fn load_sprite_pixels(path: impl AsRef<Path>) -> Result<HashMap<SpriteKey, SpritePixels>> {
    let entries = manifest_entries(path.as_ref())?;
    pixels_from_entries(entries, |path| {
        let bytes = fs::read(path)
            .with_context(|| format!("failed to read sprite asset at {}", path.display()))?;
        let image = Image::from_file_with_format(&bytes, None);
        Ok(SpritePixels {
            width: image.width,
            height: image.height,
            rgba: image.bytes,
        })
    })
}

fn pixels_from_entries(
    entries: Vec<(SpriteKey, PathBuf)>,
    mut decoder: impl FnMut(&Path) -> Result<SpritePixels>,
) -> Result<HashMap<SpriteKey, SpritePixels>> {
    let mut pixels = HashMap::with_capacity(entries.len());
    for (key, path) in entries {
        let decoded = decoder(&path).with_context(|| {
            format!("failed to decode sprite {} from {}", key.name(), path.display())
        })?;
        let expected = usize::from(decoded.width) * usize::from(decoded.height) * 4;
        if decoded.rgba.len() != expected {
            bail!(
                "sprite {} holds {} bytes, expected {expected}",
                key.name(),
                decoded.rgba.len()
            );
        }
        let _ = pixels.insert(key, decoded);
    }
    Ok(pixels)
}

/// Cache of textures loaded from the sprite manifest.
#[derive(Debug)]
pub(crate) struct SpriteAtlas {
    textures: HashMap<SpriteKey, Texture2D>,
}

impl SpriteAtlas {
    /// Loads sprites from the manifest located at the provided path.
    pub(crate) fn from_manifest_path(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_manifest_with_loader(path, default_loader)
    }

    /// Returns the default manifest path relative to the working directory.
    #[must_use]
    pub(crate) fn default_manifest_path() -> PathBuf {
        PathBuf::from(DEFAULT_SPRITE_MANIFEST)
    }

    /// Draws a scene sprite if its texture is loaded.
    pub(crate) fn draw(&self, sprite: &SceneSprite, metrics: &ViewportMetrics, tint: Color) {
        let Some(&texture) = self.textures.get(&sprite.sprite) else {
            return;
        };

        let position = metrics.to_screen(sprite.position);
        let size = sprite.size * metrics.scale();
        let draw_params = DrawTextureParams {
            dest_size: Some(MacroquadVec2::new(size.x, size.y)),
            rotation: -f32::from(sprite.rotation_degrees).to_radians(),
            flip_x: sprite.flip_x,
            ..DrawTextureParams::default()
        };

        texture::draw_texture_ex(
            texture,
            position.x,
            position.y,
            to_macroquad_color(tint),
            draw_params,
        );
    }

    /// Returns whether the atlas contains the provided key.
    #[must_use]
    pub(crate) fn contains(&self, key: SpriteKey) -> bool {
        self.textures.contains_key(&key)
    }

    fn from_manifest_with_loader(
        path: impl AsRef<Path>,
        mut loader: impl FnMut(SpriteKey, &Path) -> Result<Texture2D>,
    ) -> Result<Self> {
        let entries = manifest_entries(path.as_ref())?;
        Self::from_entries(entries, &mut loader)
    }

    fn from_entries(
        entries: Vec<(SpriteKey, PathBuf)>,
        loader: &mut impl FnMut(SpriteKey, &Path) -> Result<Texture2D>,
    ) -> Result<Self> {
        let mut textures = HashMap::with_capacity(entries.len());
        for (key, path) in entries {
            let texture = loader(key, &path).with_context(|| {
                format!("failed to load sprite {} from {}", key.name(), path.display())
            })?;
            if textures.insert(key, texture).is_some() {
                bail!("duplicate sprite entry for {}", key.name());
            }
        }
        Ok(Self { textures })
    }
}

fn default_loader(_key: SpriteKey, path: &Path) -> Result<Texture2D> {
    let bytes = fs::read(path)
        .with_context(|| format!("failed to read sprite asset at {}", path.display()))?;
    Ok(Texture2D::from_file_with_format(&bytes, None))
}

fn manifest_entries(manifest_path: &Path) -> Result<Vec<(SpriteKey, PathBuf)>> {
    let contents = fs::read_to_string(manifest_path).with_context(|| {
        format!(
            "failed to read sprite manifest at {}",
            manifest_path.display()
        )
    })?;
    let base = manifest_path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    parse_manifest(&contents, &base)
}

#[derive(Debug, serde::Deserialize)]
struct Manifest {
    version: u32,
    sprites: HashMap<String, String>,
}

fn parse_manifest(contents: &str, base_path: &Path) -> Result<Vec<(SpriteKey, PathBuf)>> {
    let manifest: Manifest =
        toml::from_str(contents).context("failed to parse sprite manifest toml contents")?;
    if manifest.version != SUPPORTED_MANIFEST_VERSION {
        bail!(
            "unsupported sprite manifest version {}; expected {}",
            manifest.version,
            SUPPORTED_MANIFEST_VERSION
        );
    }

    let mut resolved = HashMap::new();
    for (name, relative_path) in manifest.sprites {
        let Some(key) = SpriteKey::from_name(&name) else {
            bail!("unknown sprite key `{name}` in manifest");
        };
        if resolved.insert(key, base_path.join(relative_path)).is_some() {
            bail!("sprite manifest contains duplicate entry for {name}");
        }
    }

    let mut ordered = Vec::with_capacity(SpriteKey::ALL.len());
    for key in SpriteKey::ALL {
        let Some(path) = resolved.remove(&key) else {
            bail!("sprite manifest missing entry for {}", key.name());
        };
        ordered.push((key, path));
    }

    Ok(ordered)
}

/// Flat colour drawn for a sprite when no texture is available.
pub(crate) const fn fallback_color(key: SpriteKey) -> Color {
    match key {
        SpriteKey::Player | SpriteKey::PlayerPropeller => Color::from_rgb_u8(40, 90, 220),
        SpriteKey::Wall => Color::from_rgb_u8(90, 60, 40),
        SpriteKey::StickyBlock => Color::from_rgb_u8(60, 160, 60),
        SpriteKey::ReverseWall => Color::from_rgb_u8(200, 200, 200).with_alpha(0.4),
        SpriteKey::Flyer => Color::from_rgb_u8(170, 40, 170),
        SpriteKey::SmilyRobot | SpriteKey::SmilyRobotStep => Color::from_rgb_u8(230, 120, 20),
        SpriteKey::DoorClosed => Color::from_rgb_u8(110, 70, 30),
        SpriteKey::DoorOpen => Color::from_rgb_u8(250, 220, 90),
        SpriteKey::Diamond => Color::from_rgb_u8(80, 220, 240),
        SpriteKey::Spring => Color::from_rgb_u8(240, 240, 60),
        SpriteKey::FallSpikes | SpriteKey::StandSpikes => Color::from_rgb_u8(200, 30, 30),
        SpriteKey::BlankBox => Color::from_rgb_u8(120, 120, 120).with_alpha(0.5),
        _ => Color::from_rgb_u8(70, 70, 70),
    }
}
