#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Propeller adapters.
//!
//! The scene is a read-only description of one frame: the toolbar, every
//! visible entity as a sprite, the optional placement ghost, the HUD and the
//! sound cues raised since the previous frame. Backends draw it and report
//! raw input back through [`FrameInput`].

mod sounds;
mod sprites;
mod toolbar;

use std::time::Duration;

use anyhow::Result as AnyResult;
use glam::Vec2;
use propeller_core::{BackgroundColor, PlayMode, Playfield};

pub use sounds::{sound_for_event, SoundKey};
pub use sprites::SpriteKey;
pub use toolbar::{Toolbar, ToolbarButton, UiAction};

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Returns a new color with the provided alpha.
    #[must_use]
    pub const fn with_alpha(self, alpha: f32) -> Self {
        Self { alpha, ..self }
    }
}

impl From<BackgroundColor> for Color {
    fn from(color: BackgroundColor) -> Self {
        Self::from_rgb_u8(color.red(), color.green(), color.blue())
    }
}

/// Raw input observed by the backend during one frame.
///
/// Cursor coordinates are expressed in scene pixels, so adapters never need
/// to know how the backend scales the window.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct FrameInput {
    /// Cursor position, if it lies inside the scene.
    pub cursor: Option<Vec2>,
    /// Left mouse button went down on this frame.
    pub primary_click: bool,
    /// Right mouse button went down on this frame.
    pub secondary_click: bool,
    /// Left arrow is held.
    pub left_held: bool,
    /// Right arrow is held.
    pub right_held: bool,
    /// Up arrow went down on this frame.
    pub jump_pressed: bool,
    /// Escape went down on this frame.
    pub exit_pressed: bool,
    /// Pause key went down on this frame.
    pub pause_pressed: bool,
    /// The help screen's close button was pressed.
    pub dismiss_info: bool,
}

/// Single image drawn at a pixel position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneSprite {
    /// Image to draw.
    pub sprite: SpriteKey,
    /// Top-left corner in scene pixels.
    pub position: Vec2,
    /// Drawn width and height.
    pub size: Vec2,
    /// Mirror the image horizontally.
    pub flip_x: bool,
    /// Counter-clockwise rotation around the centre, in degrees.
    pub rotation_degrees: u16,
}

impl SceneSprite {
    /// Creates an unrotated, unflipped sprite.
    #[must_use]
    pub const fn new(sprite: SpriteKey, position: Vec2, size: Vec2) -> Self {
        Self {
            sprite,
            position,
            size,
            flip_x: false,
            rotation_degrees: 0,
        }
    }

    /// Overrides whether the sprite is mirrored.
    #[must_use]
    pub const fn with_flip(mut self, flip_x: bool) -> Self {
        self.flip_x = flip_x;
        self
    }

    /// Overrides the rotation applied to the sprite.
    #[must_use]
    pub const fn with_rotation(mut self, rotation_degrees: u16) -> Self {
        self.rotation_degrees = rotation_degrees;
        self
    }
}

/// Text overlays drawn on top of the level.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Hud {
    /// Deaths in the current play session, shown while playing.
    pub deaths: Option<u32>,
    /// Collected and total diamonds, shown while playing.
    pub diamonds: Option<(u32, u32)>,
    /// Last rejection or status message.
    pub message: Option<String>,
    /// The simulation is paused.
    pub paused: bool,
}

impl Hud {
    /// Formats the death counter the way the toolbar shows it.
    #[must_use]
    pub fn death_label(&self) -> Option<String> {
        self.deaths.map(|deaths| format!("Deaths: {deaths}"))
    }
}

/// Describes everything drawn in a single frame.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Grid geometry and screen size.
    pub playfield: Playfield,
    /// Active mode.
    pub play_mode: PlayMode,
    /// Colour painted behind the level.
    pub background: Color,
    /// Draw grid lines over the playfield.
    pub show_grid: bool,
    /// Show the help screen instead of the level.
    pub show_info: bool,
    /// Toolbar buttons and palette icons.
    pub toolbar: Vec<SceneSprite>,
    /// Placed or play entities, in draw order.
    pub sprites: Vec<SceneSprite>,
    /// Ghost of the selected palette entry under the cursor.
    pub preview: Option<SceneSprite>,
    /// Text overlays.
    pub hud: Hud,
    /// Sound cues raised since the previous frame.
    pub sounds: Vec<SoundKey>,
}

impl Scene {
    /// Creates an empty edit-mode scene.
    #[must_use]
    pub fn new(playfield: Playfield, background: Color) -> Self {
        Self {
            playfield,
            play_mode: PlayMode::Edit,
            background,
            show_grid: false,
            show_info: false,
            toolbar: Vec::new(),
            sprites: Vec::new(),
            preview: None,
            hud: Hud::default(),
            sounds: Vec::new(),
        }
    }

    /// Width and height of the scene in pixels.
    #[must_use]
    pub fn size(&self) -> Vec2 {
        Vec2::new(
            self.playfield.width() as f32,
            self.playfield.height() as f32,
        )
    }
}

/// Describes the window and the scene shown when it opens.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title shown on the window.
    pub window_title: String,
    /// Scene drawn on the first frame.
    pub scene: Scene,
}

impl Presentation {
    /// Creates a new presentation descriptor.
    #[must_use]
    pub fn new<T>(window_title: T, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            scene,
        }
    }
}

/// Interface implemented by concrete rendering backends.
pub trait RenderingBackend {
    /// Opens the window and drives the frame loop until the user quits.
    ///
    /// `update_scene` receives the frame time and the input observed during
    /// the frame, and updates the scene in place before it is drawn.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn background_colour_converts_to_opaque_color() {
        let color = Color::from(BackgroundColor::from_rgb(255, 0, 51));
        assert_eq!(color, Color::new(1.0, 0.0, 0.2, 1.0));
    }

    #[test]
    fn new_scene_matches_playfield_size() {
        let scene = Scene::new(Playfield::default(), Color::from_rgb_u8(0, 0, 0));
        assert_eq!(scene.size(), Vec2::new(1024.0, 600.0));
        assert_eq!(scene.play_mode, PlayMode::Edit);
        assert!(scene.sprites.is_empty());
    }

    #[test]
    fn death_label_only_shown_while_counting() {
        let mut hud = Hud::default();
        assert_eq!(hud.death_label(), None);
        hud.deaths = Some(3);
        assert_eq!(hud.death_label().as_deref(), Some("Deaths: 3"));
    }

    #[test]
    fn sprite_builders_override_defaults() {
        let sprite = SceneSprite::new(
            SpriteKey::StandSpikes,
            Vec2::new(24.0, 48.0),
            Vec2::splat(24.0),
        )
        .with_flip(true)
        .with_rotation(90);
        assert!(sprite.flip_x);
        assert_eq!(sprite.rotation_degrees, 90);
    }
}
