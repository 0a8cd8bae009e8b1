use propeller_core::{Command, Event, PlayMode, PlayerAction};
use propeller_system_controls::{Controls, ControlsInput};

fn playing() -> Controls {
    let mut controls = Controls::default();
    let mut commands = Vec::new();
    controls.handle(
        &[Event::PlayModeChanged {
            mode: PlayMode::Play,
        }],
        ControlsInput::default(),
        &mut commands,
    );
    assert!(commands.is_empty());
    controls
}

fn control(action: PlayerAction) -> Command {
    Command::Control { action }
}

#[test]
fn keys_are_ignored_in_edit_mode() {
    let mut controls = Controls::default();
    let mut commands = Vec::new();

    controls.handle(
        &[],
        ControlsInput {
            right_held: true,
            jump_pressed: true,
            exit_pressed: true,
            ..ControlsInput::default()
        },
        &mut commands,
    );

    assert!(commands.is_empty(), "edit mode must not emit play commands");
}

#[test]
fn holding_a_direction_runs_once_and_release_stops() {
    let mut controls = playing();
    let mut commands = Vec::new();
    let right = ControlsInput {
        right_held: true,
        ..ControlsInput::default()
    };

    controls.handle(&[], right, &mut commands);
    controls.handle(&[], right, &mut commands);
    controls.handle(&[], ControlsInput::default(), &mut commands);

    assert_eq!(
        commands,
        vec![control(PlayerAction::GoRight), control(PlayerAction::Stop)]
    );
}

#[test]
fn right_wins_when_both_arrows_are_held() {
    let mut controls = playing();
    let mut commands = Vec::new();

    controls.handle(
        &[],
        ControlsInput {
            left_held: true,
            right_held: true,
            ..ControlsInput::default()
        },
        &mut commands,
    );

    assert_eq!(commands, vec![control(PlayerAction::GoRight)]);
}

#[test]
fn jump_fires_on_the_press_edge() {
    let mut controls = playing();
    let mut commands = Vec::new();

    controls.handle(
        &[],
        ControlsInput {
            left_held: true,
            jump_pressed: true,
            ..ControlsInput::default()
        },
        &mut commands,
    );

    assert_eq!(
        commands,
        vec![control(PlayerAction::GoLeft), control(PlayerAction::Jump)]
    );
}

#[test]
fn escape_returns_to_edit() {
    let mut controls = playing();
    let mut commands = Vec::new();

    controls.handle(
        &[],
        ControlsInput {
            exit_pressed: true,
            right_held: true,
            ..ControlsInput::default()
        },
        &mut commands,
    );

    assert_eq!(
        commands,
        vec![Command::SetPlayMode {
            mode: PlayMode::Edit
        }]
    );
}

#[test]
fn pause_toggles_and_swallows_movement() {
    let mut controls = playing();
    let mut commands = Vec::new();
    let pause = ControlsInput {
        pause_pressed: true,
        ..ControlsInput::default()
    };

    controls.handle(&[], pause, &mut commands);
    assert!(controls.is_paused());

    controls.handle(
        &[],
        ControlsInput {
            right_held: true,
            jump_pressed: true,
            ..ControlsInput::default()
        },
        &mut commands,
    );
    assert!(commands.is_empty(), "paused play ignores movement");

    controls.handle(&[], pause, &mut commands);
    assert!(!controls.is_paused());
}

#[test]
fn leaving_play_clears_pause() {
    let mut controls = playing();
    let mut commands = Vec::new();
    controls.handle(
        &[],
        ControlsInput {
            pause_pressed: true,
            ..ControlsInput::default()
        },
        &mut commands,
    );

    controls.handle(
        &[Event::PlayModeChanged {
            mode: PlayMode::Edit,
        }],
        ControlsInput::default(),
        &mut commands,
    );

    assert!(!controls.is_paused());
}

#[test]
fn held_direction_is_resent_after_a_restart() {
    let mut controls = playing();
    let mut commands = Vec::new();
    let right = ControlsInput {
        right_held: true,
        ..ControlsInput::default()
    };

    controls.handle(&[], right, &mut commands);
    controls.handle(&[Event::LevelRestarted { deaths: 1 }], right, &mut commands);
    controls.handle(&[], right, &mut commands);

    assert_eq!(
        commands,
        vec![control(PlayerAction::GoRight), control(PlayerAction::GoRight)]
    );
}

#[test]
fn restart_without_held_keys_emits_nothing() {
    let mut controls = playing();
    let mut commands = Vec::new();

    controls.handle(
        &[Event::LevelRestarted { deaths: 2 }],
        ControlsInput::default(),
        &mut commands,
    );

    assert!(commands.is_empty());
}
