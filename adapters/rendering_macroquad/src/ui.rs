//! Immediate-mode UI helpers for the Macroquad rendering backend.
//!
//! This module hosts all uses of `macroquad::ui` so the rest of the adapter can
//! remain agnostic of Macroquad's UI types.

use macroquad::{
    color::{Color, WHITE},
    math::{RectOffset, Vec2},
    ui::{hash, Ui},
};
use propeller_core::PlayMode;

const EDIT_HELP: [&str; 6] = [
    "Pick an entity from the palette, then left click to place it.",
    "Right click removes whatever occupies the cell.",
    "Only one player and one door may exist at a time.",
    "The rotate button turns the stand spikes before placing them.",
    "Save and load use the level file passed on the command line.",
    "Press the play button to try the level.",
];

const PLAY_HELP: [&str; 6] = [
    "Left and right arrows run, the up arrow jumps.",
    "A second jump in mid-air spins the propeller.",
    "Collect every diamond to open the door.",
    "Spikes, robots and flyers send you back to the start.",
    "Space pauses, Escape returns to the editor.",
    "Q closes the window.",
];

/// Outcome of rendering the help screen during the current frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct InfoPanelUiResult {
    /// Whether the close button was pressed during this frame.
    pub close_pressed: bool,
}

/// Snapshot of the help screen's layout for the current frame.
#[derive(Clone, Copy, Debug)]
pub(crate) struct InfoPanelUiContext {
    /// Top-left corner of the panel in screen coordinates.
    pub origin: Vec2,
    /// Panel dimensions in screen space.
    pub size: Vec2,
    /// Background colour applied to the window skin.
    pub background: Color,
    /// Mode whose controls are described.
    pub play_mode: PlayMode,
}

/// Lines of help text shown for the provided mode.
pub(crate) const fn help_lines(play_mode: PlayMode) -> &'static [&'static str] {
    match play_mode {
        PlayMode::Edit => &EDIT_HELP,
        PlayMode::Play => &PLAY_HELP,
    }
}

/// Renders the help screen and reports whether it was dismissed.
pub(crate) fn draw_info_panel_ui(ui: &mut Ui, context: InfoPanelUiContext) -> InfoPanelUiResult {
    let mut skin = ui.default_skin();
    skin.margin = 0.0;

    let window_style = ui
        .style_builder()
        .color(context.background)
        .color_hovered(context.background)
        .color_clicked(context.background)
        .color_selected(context.background)
        .color_selected_hovered(context.background)
        .color_inactive(context.background)
        .text_color(WHITE)
        .margin(RectOffset::new(24.0, 24.0, 24.0, 24.0))
        .build();
    skin.window_style = window_style;

    let label_style = ui
        .style_builder()
        .text_color(WHITE)
        .text_color_hovered(WHITE)
        .text_color_clicked(WHITE)
        .margin(RectOffset::new(0.0, 0.0, 4.0, 4.0))
        .build();
    skin.label_style = label_style;

    let button_style = ui
        .style_builder()
        .text_color(WHITE)
        .text_color_hovered(WHITE)
        .text_color_clicked(WHITE)
        .color(Color::from_rgba(70, 70, 70, 255))
        .color_hovered(Color::from_rgba(96, 96, 96, 255))
        .color_clicked(Color::from_rgba(56, 56, 56, 255))
        .margin(RectOffset::new(8.0, 8.0, 8.0, 8.0))
        .build();
    skin.button_style = button_style;

    ui.push_skin(&skin);

    let mut close_pressed = false;
    let _ = ui.window(hash!("info_panel"), context.origin, context.size, |ui| {
        let title = match context.play_mode {
            PlayMode::Edit => "Editing",
            PlayMode::Play => "Playing",
        };
        ui.label(None, title);
        for line in help_lines(context.play_mode) {
            ui.label(None, line);
        }
        close_pressed = ui.button(None, "Close");
    });

    ui.pop_skin();

    InfoPanelUiResult { close_pressed }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn help_text_differs_between_modes() {
        assert_ne!(help_lines(PlayMode::Edit), help_lines(PlayMode::Play));
        assert!(help_lines(PlayMode::Play)
            .iter()
            .any(|line| line.contains("diamond")));
    }
}
