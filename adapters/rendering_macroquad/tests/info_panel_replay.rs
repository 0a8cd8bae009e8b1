use glam::Vec2;
use propeller_rendering_macroquad::{
    gather_frame_input_from_observations, InfoPanelInputState, KeyboardShortcuts,
    ViewportMetrics,
};

fn run_sequence(sequence: &[bool]) -> Vec<bool> {
    let mut state = InfoPanelInputState::default();
    let mut dismissals = Vec::new();
    for &pressed in sequence {
        dismissals.push(state.take_dismiss());
        if pressed {
            state.register_dismiss();
        }
    }

    // Flush any trailing latched press so the harness observes the final dismissal.
    dismissals.push(state.take_dismiss());
    dismissals
}

#[test]
fn close_button_sequence_is_deterministic() {
    let button_sequence = [false, true, false, true, true, false];
    let expected = vec![false, false, true, false, true, true, false];

    let first_run = run_sequence(&button_sequence);
    let second_run = run_sequence(&button_sequence);

    assert_eq!(first_run, expected);
    assert_eq!(first_run, second_run);
}

#[test]
fn latched_dismissal_reaches_frame_input_once() {
    let metrics = ViewportMetrics::from_viewport(Vec2::new(1024.0, 600.0), 1024.0, 600.0);
    let mut state = InfoPanelInputState::default();
    state.register_dismiss();

    let first = gather_frame_input_from_observations(
        &metrics,
        Vec2::new(10.0, 10.0),
        false,
        false,
        KeyboardShortcuts::default(),
        state.take_dismiss(),
    );
    let second = gather_frame_input_from_observations(
        &metrics,
        Vec2::new(10.0, 10.0),
        false,
        false,
        KeyboardShortcuts::default(),
        state.take_dismiss(),
    );

    assert!(first.dismiss_info);
    assert!(!second.dismiss_info);
}

#[test]
fn tall_windows_letterbox_above_and_below() {
    let metrics = ViewportMetrics::from_viewport(Vec2::new(1024.0, 600.0), 512.0, 600.0);

    assert_eq!(metrics.scale(), 0.5);
    assert_eq!(metrics.offset(), Vec2::new(0.0, 150.0));
    assert_eq!(metrics.to_screen(Vec2::new(1024.0, 600.0)), Vec2::new(512.0, 450.0));
    assert_eq!(metrics.to_scene(Vec2::new(256.0, 100.0)), None);
    assert_eq!(
        metrics.to_scene(Vec2::new(256.0, 300.0)),
        Some(Vec2::new(512.0, 300.0))
    );
}
