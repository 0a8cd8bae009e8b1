//! Per-frame glue between the backend, the pure systems and the world.

use std::{path::PathBuf, time::Duration};

use glam::Vec2;
use log::{info, warn};
use propeller_core::{
    BackgroundColor, CellCoord, Command, EntityKind, Event, Orientation, PixelPoint, PlayMode,
};
use propeller_rendering::{
    sound_for_event, Color, FrameInput, Hud, Scene, SceneSprite, SpriteKey, Toolbar, UiAction,
};
use propeller_simulation::{EntityState, PlayEntity, Simulation};
use propeller_system_builder::{Builder, BuilderInput};
use propeller_system_controls::{Controls, ControlsInput};
use propeller_world::{self as world, query, World};

use crate::{
    fixed_step::FixedStep,
    level_file::{read_level, save_level},
};

/// Ticks each walking robot animation frame stays on screen.
const ROBOT_FRAME_TICKS: u64 = 5;

/// Colours offered by the background button, in cycling order.
const BACKGROUND_PRESETS: [BackgroundColor; 6] = [
    BackgroundColor::from_rgb(160, 160, 160),
    BackgroundColor::from_rgb(135, 206, 235),
    BackgroundColor::from_rgb(255, 228, 181),
    BackgroundColor::from_rgb(144, 238, 144),
    BackgroundColor::from_rgb(221, 160, 221),
    BackgroundColor::from_rgb(64, 64, 80),
];

/// Start-up choices that shape the frame loop.
#[derive(Clone, Debug, Default)]
pub(crate) struct AppOptions {
    /// Fixed simulation ticks per second.
    pub(crate) tick_rate: u32,
    /// Draw grid lines from the first frame.
    pub(crate) show_grid: bool,
    /// Target of the save and load buttons.
    pub(crate) level_path: Option<PathBuf>,
}

/// Owns the world and the systems that drive it.
#[derive(Debug)]
pub(crate) struct App {
    world: World,
    builder: Builder,
    controls: Controls,
    toolbar: Toolbar,
    fixed_step: FixedStep,
    events: Vec<Event>,
    commands: Vec<Command>,
    show_grid: bool,
    show_info: bool,
    message: Option<String>,
    level_path: Option<PathBuf>,
}

impl App {
    /// Wraps a world prepared by the caller.
    pub(crate) fn new(world: World, options: AppOptions) -> Self {
        let screen_width = query::playfield(&world).width() as f32;
        Self {
            world,
            builder: Builder::new(),
            controls: Controls::new(),
            toolbar: Toolbar::new(screen_width),
            fixed_step: FixedStep::new(options.tick_rate),
            events: Vec::new(),
            commands: Vec::new(),
            show_grid: options.show_grid,
            show_info: false,
            message: None,
            level_path: options.level_path,
        }
    }

    /// World driven by the app.
    pub(crate) fn world(&self) -> &World {
        &self.world
    }

    /// Applies a command outside the frame loop, such as a start-up load.
    pub(crate) fn submit(&mut self, command: Command) {
        let start = self.events.len();
        world::apply(&mut self.world, command, &mut self.events);
        self.note_events(start, None);
    }

    /// Scene describing the app before the first frame.
    pub(crate) fn initial_scene(&self) -> Scene {
        let playfield = *query::playfield(&self.world);
        let mut scene = Scene::new(playfield, Color::from(query::background(&self.world)));
        self.populate(&mut scene, None);
        scene
    }

    /// Runs one frame: input, edit or play commands, fixed ticks, then the scene.
    pub(crate) fn frame(&mut self, frame_time: Duration, input: FrameInput, scene: &mut Scene) {
        let mode = query::play_mode(&self.world);
        let playfield = *query::playfield(&self.world);

        if input.dismiss_info {
            self.show_info = false;
        }

        let ui_action = if input.primary_click {
            input
                .cursor
                .and_then(|cursor| self.toolbar.hit_test(cursor, mode))
        } else {
            None
        };
        let cursor_cell = input
            .cursor
            .and_then(|cursor| playfield.cell_at(pixel_at(cursor)));

        let mut builder_input = BuilderInput {
            cursor_cell,
            confirm_action: input.primary_click && ui_action.is_none() && !self.show_info,
            remove_action: input.secondary_click && !self.show_info,
            ..BuilderInput::default()
        };
        if let Some(action) = ui_action {
            self.run_ui_action(action, mode, &mut builder_input);
        }

        let controls_input = ControlsInput {
            left_held: input.left_held,
            right_held: input.right_held,
            jump_pressed: input.jump_pressed,
            exit_pressed: input.exit_pressed,
            pause_pressed: input.pause_pressed,
        };

        let level = query::level(&self.world);
        self.builder.handle(
            &self.events,
            builder_input,
            |kind| level.count(kind) > 0,
            &mut self.commands,
        );
        self.controls
            .handle(&self.events, controls_input, &mut self.commands);

        self.events.clear();
        for command in self.commands.drain(..) {
            world::apply(&mut self.world, command, &mut self.events);
        }

        if query::play_mode(&self.world) == PlayMode::Play && !self.controls.is_paused() {
            for _ in 0..self.fixed_step.advance(frame_time) {
                world::apply(&mut self.world, Command::Tick, &mut self.events);
            }
        } else {
            self.fixed_step.reset();
        }

        self.note_events(0, Some(scene));
        self.populate(scene, cursor_cell);
    }

    fn run_ui_action(
        &mut self,
        action: UiAction,
        mode: PlayMode,
        builder_input: &mut BuilderInput,
    ) {
        match action {
            UiAction::TogglePlay => {
                let mode = match mode {
                    PlayMode::Edit => PlayMode::Play,
                    PlayMode::Play => PlayMode::Edit,
                };
                self.commands.push(Command::SetPlayMode { mode });
            }
            UiAction::Clear => self.commands.push(Command::ClearLevel),
            UiAction::ToggleGrid => self.show_grid = !self.show_grid,
            UiAction::Restart => self.commands.push(Command::RestartLevel),
            UiAction::CycleBackground => {
                let color = next_background(query::background(&self.world));
                self.commands.push(Command::SetBackground { color });
            }
            UiAction::Save => self.save(),
            UiAction::Load => self.load(),
            UiAction::Info => self.show_info = !self.show_info,
            UiAction::Rotate => builder_input.rotate_action = true,
            UiAction::Select(kind) => builder_input.select = Some(kind),
        }
    }

    fn save(&mut self) {
        let Some(path) = self.level_path.as_deref() else {
            self.message = Some("start with --level <file> to save".to_string());
            return;
        };
        self.message = Some(match save_level(&self.world, path) {
            Ok(()) => {
                info!("saved level to {}", path.display());
                format!("saved {}", path.display())
            }
            Err(error) => {
                warn!("save failed: {error}");
                format!("save failed: {error}")
            }
        });
    }

    fn load(&mut self) {
        let Some(path) = self.level_path.as_deref() else {
            self.message = Some("start with --level <file> to load".to_string());
            return;
        };
        match read_level(path) {
            Ok(snapshot) => self.commands.push(Command::LoadLevel { snapshot }),
            Err(error) => {
                warn!("load failed: {error}");
                self.message = Some(format!("load failed: {error}"));
            }
        }
    }

    /// Turns events from `start` onwards into HUD messages and sound cues.
    fn note_events(&mut self, start: usize, mut scene: Option<&mut Scene>) {
        for event in &self.events[start..] {
            if let Some(scene) = scene.as_deref_mut() {
                scene.sounds.extend(sound_for_event(event));
            }
            let message = match event {
                Event::PlacementRejected { kind, reason, .. } => {
                    format!("cannot place {kind}: {reason}")
                }
                Event::EditRejected { reason } => reason.to_string(),
                Event::PlayModeRejected { reason } => reason.to_string(),
                Event::LevelLoadRejected { reason } => format!("level rejected: {reason}"),
                Event::LevelLoaded { entities } => format!("loaded {entities} entities"),
                Event::LevelWon { deaths } => format!("level complete, {deaths} deaths"),
                Event::PlayModeChanged {
                    mode: PlayMode::Play,
                } => {
                    self.message = None;
                    continue;
                }
                _ => continue,
            };
            self.message = Some(message);
        }
    }

    fn populate(&self, scene: &mut Scene, cursor_cell: Option<CellCoord>) {
        let mode = query::play_mode(&self.world);
        let playfield = *query::playfield(&self.world);

        scene.playfield = playfield;
        scene.play_mode = mode;
        scene.background = Color::from(query::background(&self.world));
        scene.show_grid = self.show_grid;
        scene.show_info = self.show_info;
        scene.toolbar = self.toolbar_sprites(mode);

        scene.sprites.clear();
        match query::simulation(&self.world) {
            Some(simulation) => push_play_sprites(simulation, &mut scene.sprites),
            None => {
                for placed in query::level(&self.world).entities() {
                    scene.sprites.push(entity_sprite(
                        placed.kind(),
                        SpriteKey::for_kind(placed.kind()),
                        to_vec2(playfield.cell_origin(placed.cell())),
                        placed.orientation(),
                    ));
                }
            }
        }

        scene.preview = self.builder.preview(cursor_cell).map(|preview| {
            entity_sprite(
                preview.kind,
                SpriteKey::for_kind(preview.kind),
                to_vec2(playfield.cell_origin(preview.cell)),
                preview.orientation,
            )
        });

        let simulation = query::simulation(&self.world);
        scene.hud = Hud {
            deaths: simulation.map(|_| query::death_count(&self.world)),
            diamonds: simulation.map(|simulation| (simulation.score(), simulation.diamond_count())),
            message: self.message.clone(),
            paused: simulation.is_some() && self.controls.is_paused(),
        };
    }

    fn toolbar_sprites(&self, mode: PlayMode) -> Vec<SceneSprite> {
        let level = query::level(&self.world);
        self.toolbar
            .visible(mode)
            .map(|button| {
                let (sprite, rotation) = match button.action {
                    UiAction::Select(kind) if kind.is_singleton() && level.count(kind) > 0 => {
                        (SpriteKey::BlankBox, 0)
                    }
                    UiAction::Select(kind) if kind.traits().orientable => {
                        (button.sprite(mode), self.builder.orientation().degrees())
                    }
                    _ => (button.sprite(mode), 0),
                };
                SceneSprite::new(sprite, button.origin, button.size).with_rotation(rotation)
            })
            .collect()
    }
}

fn push_play_sprites(simulation: &Simulation, sprites: &mut Vec<SceneSprite>) {
    let others = simulation
        .entities()
        .filter(|entity| entity.kind() != EntityKind::Player && entity.is_active());
    for entity in others.chain(std::iter::once(simulation.player())) {
        sprites.push(play_sprite(simulation, entity));
    }
}

fn play_sprite(simulation: &Simulation, entity: &PlayEntity) -> SceneSprite {
    let key = match (entity.kind(), entity.state()) {
        (EntityKind::Player, EntityState::Player(player)) if player.propeller => {
            SpriteKey::PlayerPropeller
        }
        (EntityKind::Door, _) if simulation.door_open() => SpriteKey::DoorOpen,
        (EntityKind::SmilyRobot, _) if (simulation.elapsed_ticks() / ROBOT_FRAME_TICKS) % 2 == 1 => {
            SpriteKey::SmilyRobotStep
        }
        (kind, _) => SpriteKey::for_kind(kind),
    };
    entity_sprite(entity.kind(), key, entity.position(), entity.orientation())
        .with_flip(entity.faces_left())
}

fn entity_sprite(
    kind: EntityKind,
    sprite: SpriteKey,
    position: Vec2,
    orientation: Orientation,
) -> SceneSprite {
    let hitbox = kind.hitbox();
    let size = Vec2::new(hitbox.width() as f32, hitbox.height() as f32);
    let rotation = if kind.traits().orientable {
        orientation.degrees()
    } else {
        0
    };
    SceneSprite::new(sprite, position, size).with_rotation(rotation)
}

fn next_background(current: BackgroundColor) -> BackgroundColor {
    let next = BACKGROUND_PRESETS
        .iter()
        .position(|preset| *preset == current)
        .map_or(0, |index| (index + 1) % BACKGROUND_PRESETS.len());
    BACKGROUND_PRESETS[next]
}

fn pixel_at(cursor: Vec2) -> PixelPoint {
    PixelPoint::new(cursor.x.floor() as i32, cursor.y.floor() as i32)
}

fn to_vec2(point: PixelPoint) -> Vec2 {
    Vec2::new(point.x as f32, point.y as f32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use propeller_core::{LevelSnapshot, Playfield};
    use propeller_rendering::SoundKey;

    fn app() -> App {
        App::new(
            World::new(),
            AppOptions {
                tick_rate: 60,
                ..AppOptions::default()
            },
        )
    }

    /// Scene-space centre of a cell on the default playfield.
    fn cell_centre(column: u32, row: u32) -> Vec2 {
        let origin = Playfield::default().cell_origin(CellCoord::new(column, row));
        to_vec2(origin) + Vec2::splat(12.0)
    }

    fn click(app: &mut App, scene: &mut Scene, cursor: Vec2) {
        let input = FrameInput {
            cursor: Some(cursor),
            primary_click: true,
            ..FrameInput::default()
        };
        app.frame(Duration::ZERO, input, scene);
    }

    fn idle(app: &mut App, scene: &mut Scene, frame_time: Duration) {
        app.frame(frame_time, FrameInput::default(), scene);
    }

    fn palette_entry(app: &App, kind: EntityKind) -> Vec2 {
        let button = app
            .toolbar
            .buttons()
            .iter()
            .find(|button| button.action == UiAction::Select(kind))
            .expect("palette entry exists");
        button.origin + Vec2::splat(2.0)
    }

    fn action_button(app: &App, action: UiAction) -> Vec2 {
        let button = app
            .toolbar
            .buttons()
            .iter()
            .find(|button| button.action == action)
            .expect("toolbar button exists");
        button.origin + Vec2::splat(2.0)
    }

    #[test]
    fn palette_then_grid_click_places_entity() {
        let mut app = app();
        let mut scene = app.initial_scene();

        let at = palette_entry(&app, EntityKind::Wall);
        click(&mut app, &mut scene, at);
        click(&mut app, &mut scene, cell_centre(3, 5));

        assert_eq!(query::level(app.world()).count(EntityKind::Wall), 1);
        assert_eq!(scene.sprites.len(), 1);
        assert_eq!(scene.sprites[0].sprite, SpriteKey::Wall);
        assert_eq!(
            scene.sprites[0].position,
            to_vec2(Playfield::default().cell_origin(CellCoord::new(3, 5)))
        );
    }

    #[test]
    fn placed_player_blanks_its_palette_entry() {
        let mut app = app();
        let mut scene = app.initial_scene();

        let at = palette_entry(&app, EntityKind::Player);
        click(&mut app, &mut scene, at);
        click(&mut app, &mut scene, cell_centre(1, 1));
        idle(&mut app, &mut scene, Duration::ZERO);

        assert_eq!(scene.toolbar[0].sprite, SpriteKey::BlankBox);
        assert_eq!(app.builder.selected(), None);
    }

    #[test]
    fn starting_without_player_shows_rejection() {
        let mut app = app();
        let mut scene = app.initial_scene();

        let at = action_button(&app, UiAction::TogglePlay);
        click(&mut app, &mut scene, at);

        assert_eq!(query::play_mode(app.world()), PlayMode::Edit);
        assert!(scene.hud.message.is_some());
    }

    #[test]
    fn play_mode_runs_fixed_ticks_and_exits_on_escape() {
        let mut app = app();
        let mut scene = app.initial_scene();
        let at = palette_entry(&app, EntityKind::Player);
        click(&mut app, &mut scene, at);
        click(&mut app, &mut scene, cell_centre(1, 1));
        let at = palette_entry(&app, EntityKind::Wall);
        click(&mut app, &mut scene, at);
        click(&mut app, &mut scene, cell_centre(1, 2));

        let at = action_button(&app, UiAction::TogglePlay);
        click(&mut app, &mut scene, at);
        assert_eq!(query::play_mode(app.world()), PlayMode::Play);
        assert_eq!(scene.sounds, vec![SoundKey::PlayMusic]);
        assert_eq!(scene.hud.deaths, Some(0));

        idle(&mut app, &mut scene, Duration::from_millis(50));
        let ticks = query::simulation(app.world())
            .map(Simulation::elapsed_ticks)
            .expect("simulation is running");
        assert_eq!(ticks, 3);

        let escape = FrameInput {
            exit_pressed: true,
            ..FrameInput::default()
        };
        app.frame(Duration::ZERO, escape, &mut scene);
        assert_eq!(query::play_mode(app.world()), PlayMode::Edit);
        assert_eq!(scene.hud.deaths, None);
    }

    #[test]
    fn background_button_cycles_presets() {
        let mut app = app();
        let mut scene = app.initial_scene();

        let at = action_button(&app, UiAction::CycleBackground);
        click(&mut app, &mut scene, at);

        assert_eq!(query::background(app.world()), BACKGROUND_PRESETS[1]);
        assert_eq!(scene.background, Color::from(BACKGROUND_PRESETS[1]));
        assert_eq!(next_background(BACKGROUND_PRESETS[5]), BACKGROUND_PRESETS[0]);
        assert_eq!(
            next_background(BackgroundColor::from_rgb(1, 2, 3)),
            BACKGROUND_PRESETS[0]
        );
    }

    #[test]
    fn save_without_level_path_explains_itself() {
        let mut app = app();
        let mut scene = app.initial_scene();

        let at = action_button(&app, UiAction::Save);
        click(&mut app, &mut scene, at);

        assert_eq!(
            scene.hud.message.as_deref(),
            Some("start with --level <file> to save")
        );
    }

    #[test]
    fn startup_load_is_reported() {
        let mut app = app();
        app.submit(Command::LoadLevel {
            snapshot: LevelSnapshot::default(),
        });
        let scene = app.initial_scene();

        assert_eq!(
            scene.hud.message.as_deref(),
            Some("loaded 0 entities"),
            "an empty level is valid to load"
        );
    }

    #[test]
    fn info_screen_blocks_grid_clicks_until_dismissed() {
        let mut app = app();
        let mut scene = app.initial_scene();
        let at = palette_entry(&app, EntityKind::Wall);
        click(&mut app, &mut scene, at);
        let at = action_button(&app, UiAction::Info);
        click(&mut app, &mut scene, at);
        assert!(scene.show_info);

        click(&mut app, &mut scene, cell_centre(2, 2));
        assert_eq!(query::level(app.world()).count(EntityKind::Wall), 0);

        let dismiss = FrameInput {
            dismiss_info: true,
            ..FrameInput::default()
        };
        app.frame(Duration::ZERO, dismiss, &mut scene);
        click(&mut app, &mut scene, cell_centre(2, 2));
        assert!(!scene.show_info);
        assert_eq!(query::level(app.world()).count(EntityKind::Wall), 1);
    }
}
