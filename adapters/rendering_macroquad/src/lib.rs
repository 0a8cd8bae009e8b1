#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Macroquad-backed rendering adapter for Propeller.
//!
//! Macroquad's optional audio stack depends on native ALSA development
//! libraries, which are unavailable in the containerised CI environment.
//! To keep `cargo test` usable everywhere we depend on macroquad without its
//! default `audio` feature, so sound cues raised by the scene are logged and
//! dropped.
//!
//! The help screen uses Macroquad's immediate-mode UI module. All UI-specific
//! calls live inside the local `ui` module to avoid leaking Macroquad UI types
//! throughout the renderer.

mod sprites;
mod ui;

pub use sprites::{load_sprite_pixels, SpritePixels, DEFAULT_SPRITE_MANIFEST};

use self::{
    sprites::{fallback_color, SpriteAtlas},
    ui::{draw_info_panel_ui, InfoPanelUiContext, InfoPanelUiResult},
};
use anyhow::{Context, Result};
use glam::Vec2;
use log::{debug, info, warn};
use macroquad::{
    color::BLACK,
    input::{
        is_key_down, is_key_pressed, is_mouse_button_pressed, mouse_position, KeyCode,
        MouseButton,
    },
    math::Vec2 as MacroquadVec2,
};
use propeller_rendering::{
    Color, FrameInput, Presentation, RenderingBackend, Scene, SceneSprite,
};
use std::{path::PathBuf, sync::mpsc, time::Duration};

const PREVIEW_ALPHA: f32 = 0.5;
const HUD_FONT_SIZE: f32 = 24.0;
const GRID_LINE_COLOR: Color = Color::new(0.0, 0.0, 0.0, 0.25);
const HUD_TEXT_COLOR: Color = Color::new(0.05, 0.05, 0.05, 1.0);

/// Tracks UI-sourced interactions so they can be merged with physical input on the next frame.
#[doc(hidden)]
#[derive(Clone, Copy, Debug, Default)]
pub struct InfoPanelInputState {
    dismiss_latched: bool,
}

impl InfoPanelInputState {
    /// Returns whether the help screen asked to close and clears the latch so the
    /// action fires only once.
    pub fn take_dismiss(&mut self) -> bool {
        let latched = self.dismiss_latched;
        self.dismiss_latched = false;
        latched
    }

    /// Records that the help screen's close button was pressed this frame.
    pub fn register_dismiss(&mut self) {
        self.dismiss_latched = true;
    }
}

/// Snapshot of the keyboard state observed during a single frame.
#[doc(hidden)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct KeyboardShortcuts {
    /// `Q` closes the window.
    pub quit_requested: bool,
    /// `Escape` leaves play mode.
    pub exit_pressed: bool,
    /// `Space` pauses the simulation.
    pub pause_pressed: bool,
    /// `Up` went down this frame.
    pub jump_pressed: bool,
    /// `Left` is held.
    pub left_held: bool,
    /// `Right` is held.
    pub right_held: bool,
}

impl KeyboardShortcuts {
    fn poll() -> Self {
        Self {
            quit_requested: is_key_pressed(KeyCode::Q),
            exit_pressed: is_key_pressed(KeyCode::Escape),
            pause_pressed: is_key_pressed(KeyCode::Space),
            jump_pressed: is_key_pressed(KeyCode::Up),
            left_held: is_key_down(KeyCode::Left),
            right_held: is_key_down(KeyCode::Right),
        }
    }
}

/// Rendering backend implemented on top of macroquad.
#[derive(Debug)]
pub struct MacroquadBackend {
    swap_interval: Option<i32>,
    sprite_manifest: Option<PathBuf>,
    load_sprites: bool,
}

impl Default for MacroquadBackend {
    fn default() -> Self {
        Self {
            swap_interval: None,
            sprite_manifest: None,
            load_sprites: true,
        }
    }
}

impl MacroquadBackend {
    /// Returns a backend that requests the platform's default swap interval.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the backend to request a specific swap interval from the platform.
    #[must_use]
    pub fn with_swap_interval(mut self, swap_interval: Option<i32>) -> Self {
        self.swap_interval = swap_interval;
        self
    }

    /// Configures the backend to either synchronise presentation with the display refresh rate
    /// or render as fast as possible.
    #[must_use]
    pub fn with_vsync(self, enabled: bool) -> Self {
        let swap_interval = if enabled { Some(1) } else { Some(0) };
        self.with_swap_interval(swap_interval)
    }

    /// Loads sprites from the provided manifest instead of `assets/manifest.toml`.
    ///
    /// A manifest chosen this way must load; failures abort the run.
    #[must_use]
    pub fn with_sprite_manifest(mut self, path: impl Into<PathBuf>) -> Self {
        self.sprite_manifest = Some(path.into());
        self
    }

    /// Configures whether the backend should attempt to load sprite assets.
    #[must_use]
    pub fn with_sprite_loading(mut self, enabled: bool) -> Self {
        self.load_sprites = enabled;
        self
    }
}

fn load_atlas(manifest: Option<PathBuf>) -> Result<Option<SpriteAtlas>> {
    match manifest {
        Some(path) => SpriteAtlas::from_manifest_path(&path)
            .with_context(|| format!("failed to load sprites from {}", path.display()))
            .map(Some),
        None => {
            let path = SpriteAtlas::default_manifest_path();
            match SpriteAtlas::from_manifest_path(&path) {
                Ok(atlas) => Ok(Some(atlas)),
                Err(error) => {
                    warn!("drawing flat colours, sprites unavailable: {error:#}");
                    Ok(None)
                }
            }
        }
    }
}

impl RenderingBackend for MacroquadBackend {
    fn run<F>(self, presentation: Presentation, mut update_scene: F) -> Result<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static,
    {
        let Self {
            swap_interval,
            sprite_manifest,
            load_sprites,
        } = self;

        let Presentation {
            window_title,
            scene,
        } = presentation;

        let size = scene.size();
        let mut config = macroquad::window::Conf {
            window_title,
            window_width: size.x as i32,
            window_height: size.y as i32,
            window_resizable: true,
            ..macroquad::window::Conf::default()
        };
        if let Some(swap_interval) = swap_interval {
            config.platform.swap_interval = Some(swap_interval);
        }

        let (atlas_init_sender, atlas_init_receiver) = mpsc::channel::<Result<()>>();

        macroquad::Window::from_config(config, async move {
            let mut scene = scene;
            let sprite_atlas = if load_sprites {
                match load_atlas(sprite_manifest) {
                    Ok(atlas) => atlas,
                    Err(error) => {
                        let _ = atlas_init_sender.send(Err(error));
                        return;
                    }
                }
            } else {
                None
            };
            let _ = atlas_init_sender.send(Ok(()));

            let mut info_panel_input = InfoPanelInputState::default();

            loop {
                let keyboard = KeyboardShortcuts::poll();
                if keyboard.quit_requested {
                    info!("quit requested");
                    break;
                }

                macroquad::window::clear_background(BLACK);

                let screen_width = macroquad::window::screen_width();
                let screen_height = macroquad::window::screen_height();

                let dt_seconds = macroquad::time::get_frame_time();
                let frame_dt = Duration::from_secs_f32(dt_seconds.max(0.0));
                let metrics_before =
                    ViewportMetrics::from_viewport(scene.size(), screen_width, screen_height);
                let (cursor_x, cursor_y) = mouse_position();
                let frame_input = gather_frame_input_from_observations(
                    &metrics_before,
                    Vec2::new(cursor_x, cursor_y),
                    is_mouse_button_pressed(MouseButton::Left),
                    is_mouse_button_pressed(MouseButton::Right),
                    keyboard,
                    info_panel_input.take_dismiss(),
                );

                update_scene(frame_dt, frame_input, &mut scene);

                for sound in scene.sounds.drain(..) {
                    debug!("sound cue {} dropped, audio disabled", sound.name());
                }

                let metrics =
                    ViewportMetrics::from_viewport(scene.size(), screen_width, screen_height);
                draw_scene(&scene, &metrics, sprite_atlas.as_ref());

                if scene.show_info {
                    let mut info_ui = macroquad::ui::root_ui();
                    let context = info_panel_context(&scene, &metrics);
                    let InfoPanelUiResult { close_pressed } =
                        draw_info_panel_ui(&mut info_ui, context);
                    if close_pressed {
                        info_panel_input.register_dismiss();
                    }
                }

                macroquad::window::next_frame().await;
            }
        });

        atlas_init_receiver.recv().unwrap_or_else(|_| Ok(()))?;

        Ok(())
    }
}

/// Maps between window pixels and scene pixels.
///
/// The scene keeps its aspect ratio and is centred in the window, leaving
/// black bars on the sides that do not fit.
#[doc(hidden)]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewportMetrics {
    scale: f32,
    offset: Vec2,
    scene_size: Vec2,
}

impl ViewportMetrics {
    /// Fits a scene of the provided size into the window.
    #[must_use]
    pub fn from_viewport(scene_size: Vec2, screen_width: f32, screen_height: f32) -> Self {
        let scale = if scene_size.x <= f32::EPSILON || scene_size.y <= f32::EPSILON {
            1.0
        } else {
            (screen_width / scene_size.x)
                .min(screen_height / scene_size.y)
                .max(0.0)
        };
        let scaled = scene_size * scale;
        let offset = Vec2::new(
            ((screen_width - scaled.x) * 0.5).max(0.0),
            ((screen_height - scaled.y) * 0.5).max(0.0),
        );
        Self {
            scale,
            offset,
            scene_size,
        }
    }

    /// Window pixels per scene pixel.
    #[must_use]
    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Window position of the scene's top-left corner.
    #[must_use]
    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    /// Converts a scene position into window pixels.
    #[must_use]
    pub fn to_screen(&self, scene_position: Vec2) -> Vec2 {
        self.offset + scene_position * self.scale
    }

    /// Converts a window position into scene pixels, if it lies on the scene.
    #[must_use]
    pub fn to_scene(&self, screen_position: Vec2) -> Option<Vec2> {
        if self.scale <= f32::EPSILON {
            return None;
        }
        let scene_position = (screen_position - self.offset) / self.scale;
        let inside = scene_position.x >= 0.0
            && scene_position.y >= 0.0
            && scene_position.x < self.scene_size.x
            && scene_position.y < self.scene_size.y;
        inside.then_some(scene_position)
    }
}

/// Combines the frame's raw observations into the adapter-facing input.
///
/// Clicks only count when the cursor is over the scene.
#[doc(hidden)]
#[must_use]
pub fn gather_frame_input_from_observations(
    metrics: &ViewportMetrics,
    cursor_position: Vec2,
    primary_click: bool,
    secondary_click: bool,
    keyboard: KeyboardShortcuts,
    dismiss_info: bool,
) -> FrameInput {
    let cursor = metrics.to_scene(cursor_position);
    FrameInput {
        cursor,
        primary_click: primary_click && cursor.is_some(),
        secondary_click: secondary_click && cursor.is_some(),
        left_held: keyboard.left_held,
        right_held: keyboard.right_held,
        jump_pressed: keyboard.jump_pressed,
        exit_pressed: keyboard.exit_pressed,
        pause_pressed: keyboard.pause_pressed,
        dismiss_info,
    }
}

fn draw_scene(scene: &Scene, metrics: &ViewportMetrics, atlas: Option<&SpriteAtlas>) {
    let origin = metrics.offset();
    let size = scene.size() * metrics.scale();
    macroquad::shapes::draw_rectangle(
        origin.x,
        origin.y,
        size.x,
        size.y,
        to_macroquad_color(scene.background),
    );

    if scene.show_info {
        return;
    }

    for sprite in &scene.sprites {
        draw_sprite(sprite, metrics, atlas, Color::new(1.0, 1.0, 1.0, 1.0));
    }

    if scene.show_grid {
        draw_grid(scene, metrics);
    }

    if let Some(preview) = &scene.preview {
        draw_sprite(
            preview,
            metrics,
            atlas,
            Color::new(1.0, 1.0, 1.0, PREVIEW_ALPHA),
        );
    }

    for button in &scene.toolbar {
        draw_sprite(button, metrics, atlas, Color::new(1.0, 1.0, 1.0, 1.0));
    }

    draw_hud(scene, metrics);
}

fn draw_sprite(
    sprite: &SceneSprite,
    metrics: &ViewportMetrics,
    atlas: Option<&SpriteAtlas>,
    tint: Color,
) {
    if let Some(atlas) = atlas.filter(|atlas| atlas.contains(sprite.sprite)) {
        atlas.draw(sprite, metrics, tint);
        return;
    }

    let (position, size) = primitive_rectangle(sprite, metrics);
    let fill = fallback_color(sprite.sprite);
    let color = fill.with_alpha(fill.alpha * tint.alpha);
    macroquad::shapes::draw_rectangle(
        position.x,
        position.y,
        size.x,
        size.y,
        to_macroquad_color(color),
    );
}

/// Screen rectangle covered by an unrotated sprite with quarter-turn rotation applied.
fn primitive_rectangle(sprite: &SceneSprite, metrics: &ViewportMetrics) -> (Vec2, Vec2) {
    let size = sprite.size * metrics.scale();
    let position = metrics.to_screen(sprite.position);
    if sprite.rotation_degrees % 180 == 90 {
        let centre = position + size * 0.5;
        let turned = Vec2::new(size.y, size.x);
        (centre - turned * 0.5, turned)
    } else {
        (position, size)
    }
}

fn draw_grid(scene: &Scene, metrics: &ViewportMetrics) {
    let playfield = scene.playfield;
    let cell = playfield.cell_size() as f32;
    let left = playfield.left_boundary() as f32;
    let top = playfield.top_boundary() as f32;
    let right = left + playfield.columns() as f32 * cell;
    let bottom = top + playfield.rows() as f32 * cell;
    let thickness = metrics.scale().max(1.0);
    let color = to_macroquad_color(GRID_LINE_COLOR);

    for column in 0..=playfield.columns() {
        let x = left + column as f32 * cell;
        let start = metrics.to_screen(Vec2::new(x, top));
        let end = metrics.to_screen(Vec2::new(x, bottom));
        macroquad::shapes::draw_line(start.x, start.y, end.x, end.y, thickness, color);
    }
    for row in 0..=playfield.rows() {
        let y = top + row as f32 * cell;
        let start = metrics.to_screen(Vec2::new(left, y));
        let end = metrics.to_screen(Vec2::new(right, y));
        macroquad::shapes::draw_line(start.x, start.y, end.x, end.y, thickness, color);
    }
}

/// Text drawn over the scene, with scene-space baselines.
fn hud_lines(scene: &Scene) -> Vec<(String, Vec2)> {
    let hud = &scene.hud;
    let mut lines = Vec::new();
    if let Some(label) = hud.death_label() {
        lines.push((label, Vec2::new(370.0, 30.0)));
    }
    if let Some((collected, total)) = hud.diamonds {
        lines.push((
            format!("Diamonds: {collected}/{total}"),
            Vec2::new(500.0, 30.0),
        ));
    }
    if hud.paused {
        let size = scene.size();
        lines.push(("Paused".to_string(), Vec2::new(size.x * 0.5 - 36.0, size.y * 0.5)));
    }
    if let Some(message) = &hud.message {
        lines.push((message.clone(), Vec2::new(10.0, scene.size().y - 10.0)));
    }
    lines
}

fn draw_hud(scene: &Scene, metrics: &ViewportMetrics) {
    let color = to_macroquad_color(HUD_TEXT_COLOR);
    let font_size = HUD_FONT_SIZE * metrics.scale();
    for (text, baseline) in hud_lines(scene) {
        let position = metrics.to_screen(baseline);
        let _ = macroquad::text::draw_text(&text, position.x, position.y, font_size, color);
    }
}

fn info_panel_context(scene: &Scene, metrics: &ViewportMetrics) -> InfoPanelUiContext {
    let size = scene.size();
    let margin = Vec2::new(size.x * 0.15, size.y * 0.15);
    let origin = metrics.to_screen(margin);
    let extent = (size - margin * 2.0) * metrics.scale();
    InfoPanelUiContext {
        origin: MacroquadVec2::new(origin.x, origin.y),
        size: MacroquadVec2::new(extent.x, extent.y),
        background: macroquad::color::Color::from_rgba(30, 30, 40, 235),
        play_mode: scene.play_mode,
    }
}

pub(crate) fn to_macroquad_color(color: Color) -> macroquad::color::Color {
    macroquad::color::Color::new(color.red, color.green, color.blue, color.alpha)
}

#[cfg(test)]
mod tests {
    use super::*;
    use propeller_core::Playfield;
    use propeller_rendering::SpriteKey;

    fn scene() -> Scene {
        Scene::new(Playfield::default(), Color::from_rgb_u8(255, 255, 255))
    }

    #[test]
    fn wide_windows_letterbox_on_the_sides() {
        let metrics = ViewportMetrics::from_viewport(Vec2::new(1024.0, 600.0), 2048.0, 600.0);
        assert_eq!(metrics.scale(), 1.0);
        assert_eq!(metrics.offset(), Vec2::new(512.0, 0.0));
    }

    #[test]
    fn cursor_outside_scene_suppresses_clicks() {
        let metrics = ViewportMetrics::from_viewport(Vec2::new(1024.0, 600.0), 2048.0, 600.0);
        let input = gather_frame_input_from_observations(
            &metrics,
            Vec2::new(100.0, 100.0),
            true,
            true,
            KeyboardShortcuts::default(),
            false,
        );
        assert_eq!(input.cursor, None);
        assert!(!input.primary_click);
        assert!(!input.secondary_click);
    }

    #[test]
    fn cursor_maps_into_scene_pixels() {
        let metrics = ViewportMetrics::from_viewport(Vec2::new(1024.0, 600.0), 2048.0, 1200.0);
        let keyboard = KeyboardShortcuts {
            right_held: true,
            jump_pressed: true,
            ..KeyboardShortcuts::default()
        };
        let input = gather_frame_input_from_observations(
            &metrics,
            Vec2::new(50.0, 120.0),
            true,
            false,
            keyboard,
            true,
        );
        assert_eq!(input.cursor, Some(Vec2::new(25.0, 60.0)));
        assert!(input.primary_click);
        assert!(input.right_held && input.jump_pressed);
        assert!(input.dismiss_info);
    }

    #[test]
    fn quarter_turns_swap_primitive_extent() {
        let metrics = ViewportMetrics::from_viewport(Vec2::new(1024.0, 600.0), 1024.0, 600.0);
        let sprite = SceneSprite::new(
            SpriteKey::StandSpikes,
            Vec2::new(0.0, 0.0),
            Vec2::new(24.0, 12.0),
        )
        .with_rotation(90);
        let (position, size) = primitive_rectangle(&sprite, &metrics);
        assert_eq!(size, Vec2::new(12.0, 24.0));
        assert_eq!(position, Vec2::new(6.0, -6.0));
    }

    #[test]
    fn hud_lines_follow_scene_state() {
        let mut scene = scene();
        assert!(hud_lines(&scene).is_empty());

        scene.hud.deaths = Some(2);
        scene.hud.diamonds = Some((1, 3));
        scene.hud.paused = true;
        let texts: Vec<_> = hud_lines(&scene).into_iter().map(|(text, _)| text).collect();
        assert_eq!(texts, vec!["Deaths: 2", "Diamonds: 1/3", "Paused"]);
    }
}
